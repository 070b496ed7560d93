/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 金字塔式循环编码器（及其分层变体）的对外入口
 *
 * 一次编码：布局转换 -> 按长度排序 -> 逐层前向（可抽头）-> 方向合并 -> mask -> 恢复原顺序 -> 布局还原。
 * 除配置、参数与train/eval模式外不跨调用保存任何状态，中间结果对调用方不可见。
 */

mod config;
mod factory;
mod stack;

pub use config::EncoderConfig;
pub use factory::{EncoderType, EncoderVariant, build_encoder, load_encoder};
pub use stack::{BranchState, LayerStack, StackOutput};

use crate::errors::{EncoderError, EncoderResult};
use crate::nn::mask::mask_sequence;
use crate::nn::merge::MergeMode;
use crate::nn::sort::{Permutation, SortedBatch, sort_by_length};
use crate::nn::Layout;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 某一分辨率上的编码输出（已恢复为原批次顺序）
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    /// 布局由`batch_first`决定：[T', B, W] 或 [B, T', W]
    pub outputs: Tensor,
    /// 最终隐藏状态，方向（与层）在首维：[*, B, num_units]
    pub final_state: Tensor,
    /// 该分辨率下各序列的有效长度
    pub lengths: Vec<usize>,
}

/// 分层编码器的输出
#[derive(Debug, Clone)]
pub struct HierarchicalOutput {
    /// 全部层之后的主分支
    pub main: EncoderOutput,
    /// 第`num_layers_sub`层之后的子分支
    pub sub: EncoderOutput,
    /// 排序时使用的置换（排序位置 -> 原下标）；输出已恢复原顺序，
    /// 仅供调用方对齐同样按长度排过序的其他数据（如标签）
    pub perm: Permutation,
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓两种编码器共用的内核↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
#[derive(Debug, Clone)]
struct EncoderCore {
    config: EncoderConfig,
    stack: LayerStack,
    is_train_mode: bool,
}

impl EncoderCore {
    fn new(config: EncoderConfig) -> EncoderResult<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let stack = LayerStack::new(&config, &mut rng);
        tracing::info!(
            rnn_type = %config.rnn_type,
            bidirectional = config.bidirectional,
            num_units = config.num_units,
            num_layers = config.num_layers,
            num_layers_sub = ?config.num_layers_sub,
            subsample_list = ?config.subsample_list,
            subsample_type = %config.subsample_type,
            "编码器构建完成"
        );
        Ok(Self {
            config,
            stack,
            is_train_mode: false,
        })
    }

    const fn layout(&self) -> Layout {
        self.config.layout()
    }

    /// 返回的序列是否需要在此处按方向求和（层间已合并过的不再重复合并）
    const fn merges_returned(&self) -> bool {
        self.config.bidirectional
            && self.config.merge_bidirectional
            && !self.config.merges_between_layers()
    }

    fn output_size_after(&self, layers: usize) -> usize {
        let width = self.stack.width_after(layers);
        if self.merges_returned() { width / 2 } else { width }
    }

    /// 布局转换、输入检查并按长度排序
    fn prepare(&self, inputs: &Tensor, lengths: &[usize]) -> EncoderResult<SortedBatch> {
        if inputs.dimension() != 3 {
            return Err(EncoderError::InputShapeMismatch {
                expected: vec![0, 0, self.config.input_size],
                got: inputs.shape().to_vec(),
                message: "输入须为3维张量".to_string(),
            });
        }
        let inputs = self.layout().to_time_major(inputs);
        if inputs.shape()[2] != self.config.input_size {
            return Err(EncoderError::InputShapeMismatch {
                expected: vec![inputs.shape()[0], inputs.shape()[1], self.config.input_size],
                got: inputs.shape().to_vec(),
                message: "输入特征维度与input_size不一致".to_string(),
            });
        }
        sort_by_length(&inputs, lengths)
    }

    /// 排序后交给`forward`在层堆叠上运行，并把降采样下溢报回原批次下标
    fn run<T>(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        forward: impl FnOnce(&LayerStack, &SortedBatch) -> EncoderResult<T>,
    ) -> EncoderResult<(SortedBatch, T)> {
        let sorted = self.prepare(inputs, lengths)?;
        let output = forward(&self.stack, &sorted).map_err(|e| match e {
            EncoderError::SubsampleUnderflow {
                layer,
                index,
                length,
            } => EncoderError::SubsampleUnderflow {
                layer,
                index: sorted.perm.indices()[index],
                length,
            },
            other => other,
        })?;
        Ok((sorted, output))
    }

    /// 合并方向、mask、恢复原顺序并还原布局
    fn finish(
        &self,
        sorted: &SortedBatch,
        branch: BranchState,
        final_state: &Tensor,
        mask: bool,
    ) -> EncoderOutput {
        let mut outputs = MergeMode::from_merge_flag(self.merges_returned())
            .apply(&branch.outputs, self.config.num_units);
        if mask {
            mask_sequence(&mut outputs, &branch.lengths);
        }
        let outputs = sorted.restore(&outputs, 1);
        EncoderOutput {
            outputs: self.layout().from_time_major(&outputs),
            final_state: sorted.restore(final_state, 1),
            lengths: sorted.restore_lengths(&branch.lengths),
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑两种编码器共用的内核↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓金字塔编码器↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 金字塔式循环编码器：单一输出，按`subsample_list`逐层降采样（全false即普通多层编码器）
#[derive(Debug, Clone)]
pub struct PyramidRnnEncoder {
    core: EncoderCore,
}

impl PyramidRnnEncoder {
    pub fn new(config: EncoderConfig) -> EncoderResult<Self> {
        if config.num_layers_sub.is_some() {
            return Err(EncoderError::LayerConfigMismatch(
                "num_layers_sub只适用于分层编码器".to_string(),
            ));
        }
        Ok(Self {
            core: EncoderCore::new(config)?,
        })
    }

    /// 编码一个批次
    ///
    /// # 参数
    /// - `inputs`: [T, B, input_size] 或（batch_first时）[B, T, input_size]
    /// - `lengths`: 各序列有效长度，须在[1, T]内
    /// - `mask_sequence`: 是否将超出有效长度的输出置零
    ///
    /// # 返回
    /// 输出形状为[floor(T / 2^k), B, W]（或batch_first布局），
    /// 最终状态为[num_layers × directions, B, num_units]
    pub fn encode(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        mask_sequence: bool,
    ) -> EncoderResult<EncoderOutput> {
        let training = self.core.is_train_mode;
        let (sorted, output) = self.core.run(inputs, lengths, |stack, sorted| {
            stack.forward(&sorted.inputs, &sorted.lengths, training)
        })?;
        let final_state = Tensor::concat(&output.layer_final_states.iter().collect::<Vec<_>>(), 0);
        Ok(self
            .core
            .finish(&sorted, output.main, &final_state, mask_sequence))
    }

    pub const fn config(&self) -> &EncoderConfig {
        &self.core.config
    }

    pub fn num_layers(&self) -> usize {
        self.core.config.num_layers
    }

    pub const fn num_directions(&self) -> usize {
        self.core.config.num_directions()
    }

    pub fn num_units(&self) -> usize {
        self.core.config.num_units
    }

    pub fn subsample_list(&self) -> &[bool] {
        &self.core.config.subsample_list
    }

    /// 返回序列的特征宽度
    pub fn output_size(&self) -> usize {
        self.core.output_size_after(self.num_layers())
    }

    pub fn set_train_mode(&mut self) {
        self.core.is_train_mode = true;
    }

    pub fn set_eval_mode(&mut self) {
        self.core.is_train_mode = false;
    }

    pub const fn is_train_mode(&self) -> bool {
        self.core.is_train_mode
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑金字塔编码器↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓分层金字塔编码器↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 分层金字塔式循环编码器：在第`num_layers_sub`层之后额外输出子分支。
/// 两个分支共享抽头之前的所有层，且各自独立计算有效长度与mask。
#[derive(Debug, Clone)]
pub struct HierarchicalPyramidRnnEncoder {
    core: EncoderCore,
    num_layers_sub: usize,
}

impl HierarchicalPyramidRnnEncoder {
    pub fn new(config: EncoderConfig) -> EncoderResult<Self> {
        let num_layers_sub = config.num_layers_sub.ok_or_else(|| {
            EncoderError::LayerConfigMismatch("分层编码器须配置num_layers_sub".to_string())
        })?;
        Ok(Self {
            core: EncoderCore::new(config)?,
            num_layers_sub,
        })
    }

    /// 编码一个批次，参数同[`PyramidRnnEncoder::encode`]。
    ///
    /// 主、子分支的最终状态均为[directions, B, num_units]，分别来自最后一层与第`num_layers_sub`层。
    pub fn encode(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        mask_sequence: bool,
    ) -> EncoderResult<HierarchicalOutput> {
        let training = self.core.is_train_mode;
        let (sorted, (output, sub)) = self.core.run(inputs, lengths, |stack, sorted| {
            stack.forward_with_tap(&sorted.inputs, &sorted.lengths, self.num_layers_sub, training)
        })?;

        let main_final = &output.layer_final_states[self.num_layers() - 1];
        let sub_final = &output.layer_final_states[self.num_layers_sub - 1];
        Ok(HierarchicalOutput {
            main: self.core.finish(&sorted, output.main, main_final, mask_sequence),
            sub: self.core.finish(&sorted, sub, sub_final, mask_sequence),
            perm: sorted.perm,
        })
    }

    pub const fn config(&self) -> &EncoderConfig {
        &self.core.config
    }

    pub fn num_layers(&self) -> usize {
        self.core.config.num_layers
    }

    pub const fn num_layers_sub(&self) -> usize {
        self.num_layers_sub
    }

    pub const fn num_directions(&self) -> usize {
        self.core.config.num_directions()
    }

    pub fn num_units(&self) -> usize {
        self.core.config.num_units
    }

    pub fn subsample_list(&self) -> &[bool] {
        &self.core.config.subsample_list
    }

    /// 主分支序列的特征宽度
    pub fn output_size(&self) -> usize {
        self.core.output_size_after(self.num_layers())
    }

    /// 子分支序列的特征宽度
    pub fn output_size_sub(&self) -> usize {
        self.core.output_size_after(self.num_layers_sub)
    }

    pub fn set_train_mode(&mut self) {
        self.core.is_train_mode = true;
    }

    pub fn set_eval_mode(&mut self) {
        self.core.is_train_mode = false;
    }

    pub const fn is_train_mode(&self) -> bool {
        self.core.is_train_mode
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑分层金字塔编码器↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓工厂产物↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 工厂函数构造出的编码器
#[derive(Debug, Clone)]
pub enum Encoder {
    Pyramid(PyramidRnnEncoder),
    Hierarchical(HierarchicalPyramidRnnEncoder),
}

/// [`Encoder::encode`]的结果
#[derive(Debug, Clone)]
pub enum EncodedBatch {
    Single(EncoderOutput),
    Hierarchical(HierarchicalOutput),
}

impl EncodedBatch {
    /// 主分支（非分层编码器即唯一的输出）
    pub const fn main(&self) -> &EncoderOutput {
        match self {
            Self::Single(output) => output,
            Self::Hierarchical(output) => &output.main,
        }
    }

    pub const fn sub(&self) -> Option<&EncoderOutput> {
        match self {
            Self::Single(_) => None,
            Self::Hierarchical(output) => Some(&output.sub),
        }
    }
}

impl Encoder {
    pub fn encode(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        mask_sequence: bool,
    ) -> EncoderResult<EncodedBatch> {
        match self {
            Self::Pyramid(encoder) => encoder
                .encode(inputs, lengths, mask_sequence)
                .map(EncodedBatch::Single),
            Self::Hierarchical(encoder) => encoder
                .encode(inputs, lengths, mask_sequence)
                .map(EncodedBatch::Hierarchical),
        }
    }

    pub const fn is_hierarchical(&self) -> bool {
        matches!(self, Self::Hierarchical(_))
    }

    pub const fn config(&self) -> &EncoderConfig {
        match self {
            Self::Pyramid(encoder) => encoder.config(),
            Self::Hierarchical(encoder) => encoder.config(),
        }
    }

    pub fn set_train_mode(&mut self) {
        match self {
            Self::Pyramid(encoder) => encoder.set_train_mode(),
            Self::Hierarchical(encoder) => encoder.set_train_mode(),
        }
    }

    pub fn set_eval_mode(&mut self) {
        match self {
            Self::Pyramid(encoder) => encoder.set_eval_mode(),
            Self::Hierarchical(encoder) => encoder.set_eval_mode(),
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑工厂产物↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
