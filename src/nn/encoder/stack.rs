/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 多层循环层的堆叠（LayerStack），以及分层编码器在中间层的抽头（tap）
 *
 * 每层：循环层 ->（可选）层间方向合并 ->（按计划）降采样 -> 下一层。
 * 抽头处只是把当前（未mask的）序列与长度另存一份作为子分支（最终状态按层收集），
 * 后续各层继续在同一份序列上运行。
 */

use super::EncoderConfig;
use crate::errors::{EncoderError, EncoderResult};
use crate::nn::merge::MergeMode;
use crate::nn::recurrent::RecurrentLayer;
use crate::nn::subsample::subsample;
use crate::nn::Init;
use crate::tensor::Tensor;
use rand::Rng;
use rand::rngs::StdRng;

/// 某一分辨率上的编码结果（批次仍为排序后的顺序，时间优先）
#[derive(Debug, Clone)]
pub struct BranchState {
    /// [T', B, W]
    pub outputs: Tensor,
    /// 该分辨率下各序列的有效长度
    pub lengths: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct StackOutput {
    /// 最后一层之后的序列
    pub main: BranchState,
    /// 各层最终状态，依层序排列，每个为 [directions, B, num_units]
    pub layer_final_states: Vec<Tensor>,
}

#[derive(Debug, Clone)]
pub struct LayerStack {
    layers: Vec<RecurrentLayer>,
    /// 每层送往下一层（或作为返回值）的序列宽度
    feed_widths: Vec<usize>,
    subsample_list: Vec<bool>,
    config: EncoderConfig,
}

impl LayerStack {
    /// 依配置逐层计算输入维度并创建各层。
    /// 第i层的输入维度 = 第i-1层送出的宽度：
    /// 基础宽度为`num_proj`（有投影时）、`num_units`（层间合并时）或`num_units × 方向数`，
    /// 若第i-1层做了concat降采样再乘2。
    pub fn new(config: &EncoderConfig, rng: &mut StdRng) -> Self {
        assert!(!config.subsample_list.is_empty(), "LayerStack至少包含一层");
        let init = Init::Uniform(config.parameter_init);
        let mut input_size = config.input_size;
        let mut layers = Vec::with_capacity(config.num_layers);
        let mut feed_widths = Vec::with_capacity(config.num_layers);
        for &subsampled in &config.subsample_list {
            let layer = RecurrentLayer::new(
                config.rnn_type,
                input_size,
                config.num_units,
                config.bidirectional,
                config.num_proj,
                &init,
                rng,
            );
            let mut feed_width = if config.merges_between_layers() {
                config.num_units
            } else {
                layer.output_size()
            };
            if subsampled {
                feed_width *= config.subsample_type.width_factor();
            }
            input_size = feed_width;
            feed_widths.push(feed_width);
            layers.push(layer);
        }

        Self {
            layers,
            feed_widths,
            subsample_list: config.subsample_list.clone(),
            config: config.clone(),
        }
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[RecurrentLayer] {
        &self.layers
    }

    /// 前`layers`层之后序列的特征宽度
    pub fn width_after(&self, layers: usize) -> usize {
        self.feed_widths[layers - 1]
    }

    /// 逐层前向
    ///
    /// # 参数
    /// - `inputs`: 已按长度降序排列的时间优先批次 [T, B, input_size]
    /// - `training`: 训练模式下在层间施加dropout
    pub fn forward(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        training: bool,
    ) -> EncoderResult<StackOutput> {
        self.run(inputs, lengths, None, training).map(|(output, _)| output)
    }

    /// 逐层前向，并另存第`tap`层（从1计）之后的序列作为子分支
    pub fn forward_with_tap(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        tap: usize,
        training: bool,
    ) -> EncoderResult<(StackOutput, BranchState)> {
        match self.run(inputs, lengths, Some(tap), training)? {
            (output, Some(sub)) => Ok((output, sub)),
            (_, None) => Err(EncoderError::LayerConfigMismatch(format!(
                "抽头层数须在[1, {}]内，实际为{tap}",
                self.num_layers()
            ))),
        }
    }

    fn run(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        tap: Option<usize>,
        training: bool,
    ) -> EncoderResult<(StackOutput, Option<BranchState>)> {
        let feed_merge = self.config.merges_between_layers();
        let mut sequence = inputs.clone();
        let mut lengths = lengths.to_vec();
        let mut sub = None;
        let mut layer_final_states = Vec::with_capacity(self.layers.len());

        for (i, (layer, &subsampled)) in self.layers.iter().zip(&self.subsample_list).enumerate() {
            if i > 0 && training && self.config.dropout > 0. {
                sequence = dropout(&sequence, self.config.dropout);
            }
            let output = layer.forward(&sequence, &lengths, None)?;
            sequence = output.outputs;
            if feed_merge {
                sequence = MergeMode::Sum.apply(&sequence, self.config.num_units);
            }
            if subsampled {
                let reduced = subsample(&sequence, &lengths, self.config.subsample_type, i)?;
                sequence = reduced.outputs;
                lengths = reduced.lengths;
            }
            tracing::debug!(
                layer = i,
                time = sequence.shape()[0],
                width = sequence.shape()[2],
                subsampled,
                "循环层前向完成"
            );

            if tap == Some(i + 1) {
                tracing::debug!(layer = i, "抽取子分支输出");
                sub = Some(BranchState {
                    outputs: sequence.clone(),
                    lengths: lengths.clone(),
                });
            }
            layer_final_states.push(output.final_state);
        }

        let main = BranchState {
            outputs: sequence,
            lengths,
        };
        Ok((
            StackOutput {
                main,
                layer_final_states,
            },
            sub,
        ))
    }
}

/// 反向缩放的dropout：以概率`p`置零，其余元素乘以`1 / (1 - p)`
fn dropout(sequence: &Tensor, p: f32) -> Tensor {
    let mut rng = rand::thread_rng();
    let keep = 1. - p;
    let mask = (0..sequence.size())
        .map(|_| if rng.gen_bool(f64::from(keep)) { 1. / keep } else { 0. })
        .collect::<Vec<_>>();
    sequence * &Tensor::new(&mask, sequence.shape())
}
