/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 编码器配置：可由JSON反序列化，也可用`with_*`链式构造；
 *                 所有能在构造时发现的错误都在`validate`中报出
 */

use crate::errors::{EncoderError, EncoderResult};
use crate::nn::Layout;
use crate::nn::layer::CellType;
use crate::nn::subsample::SubsampleType;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// 输入特征维度
    pub input_size: usize,
    pub rnn_type: CellType,
    pub bidirectional: bool,
    /// 每个方向的隐藏维度
    pub num_units: usize,
    /// 为0时不做投影
    pub num_proj: usize,
    pub num_layers: usize,
    /// 取“子”分支输出的层数（从1计）；有值即为分层编码器
    pub num_layers_sub: Option<usize>,
    /// 每层输出是否在送入下一层前降采样，长度须等于`num_layers`
    #[serde(alias = "downsample_list")]
    pub subsample_list: Vec<bool>,
    pub subsample_type: SubsampleType,
    /// 层间dropout概率，仅训练模式下生效
    pub dropout: f32,
    /// 参数在[-parameter_init, parameter_init]内均匀初始化
    pub parameter_init: f32,
    pub batch_first: bool,
    /// 返回的序列中是否将前、后向输出相加（而非拼接）
    pub merge_bidirectional: bool,
    /// 与`merge_bidirectional`配合：为true时层与层之间也传递相加后的窄输出，
    /// 否则层间始终传递拼接后的宽输出，只对返回值做合并
    pub merge_between_layers: bool,
    /// 参数初始化的随机种子，缺省时使用系统熵
    pub seed: Option<u64>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            input_size: 0,
            rnn_type: CellType::default(),
            bidirectional: false,
            num_units: 256,
            num_proj: 0,
            num_layers: 1,
            num_layers_sub: None,
            subsample_list: Vec::new(),
            subsample_type: SubsampleType::default(),
            dropout: 0.,
            parameter_init: 0.1,
            batch_first: false,
            merge_bidirectional: false,
            merge_between_layers: false,
            seed: None,
        }
    }
}

impl EncoderConfig {
    /// 不降采样的最简配置
    pub fn new(input_size: usize, rnn_type: CellType, num_units: usize, num_layers: usize) -> Self {
        Self {
            input_size,
            rnn_type,
            num_units,
            num_layers,
            subsample_list: vec![false; num_layers],
            ..Self::default()
        }
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓链式构造↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    pub fn with_subsample_list(mut self, subsample_list: &[bool]) -> Self {
        self.subsample_list = subsample_list.to_vec();
        self
    }

    pub fn with_subsample_type(mut self, subsample_type: SubsampleType) -> Self {
        self.subsample_type = subsample_type;
        self
    }

    pub fn with_num_layers_sub(mut self, num_layers_sub: usize) -> Self {
        self.num_layers_sub = Some(num_layers_sub);
        self
    }

    pub fn with_num_proj(mut self, num_proj: usize) -> Self {
        self.num_proj = num_proj;
        self
    }

    pub fn with_dropout(mut self, dropout: f32) -> Self {
        self.dropout = dropout;
        self
    }

    pub fn with_parameter_init(mut self, parameter_init: f32) -> Self {
        self.parameter_init = parameter_init;
        self
    }

    pub fn with_batch_first(mut self, batch_first: bool) -> Self {
        self.batch_first = batch_first;
        self
    }

    pub fn with_merge_bidirectional(mut self, merge_bidirectional: bool) -> Self {
        self.merge_bidirectional = merge_bidirectional;
        self
    }

    pub fn with_merge_between_layers(mut self, merge_between_layers: bool) -> Self {
        self.merge_between_layers = merge_between_layers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑链式构造↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓JSON↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    /// 从JSON文本读取配置并校验。
    /// `rnn_type`与`subsample_type`先按字符串检查，以便报出对应的错误种类而非笼统的JSON错误。
    pub fn from_json_str(json: &str) -> EncoderResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(rnn_type) = value.get("rnn_type").and_then(serde_json::Value::as_str) {
            rnn_type.parse::<CellType>()?;
        }
        if let Some(subsample_type) = value
            .get("subsample_type")
            .and_then(serde_json::Value::as_str)
        {
            subsample_type.parse::<SubsampleType>()?;
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> EncoderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> EncoderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑JSON↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /// 构造期校验
    pub fn validate(&self) -> EncoderResult<()> {
        if self.input_size == 0 {
            return Err(EncoderError::InvalidConfig("input_size须>0".to_string()));
        }
        if self.num_units == 0 {
            return Err(EncoderError::InvalidConfig("num_units须>0".to_string()));
        }
        if self.num_layers == 0 {
            return Err(EncoderError::InvalidConfig("num_layers须>0".to_string()));
        }
        if !(0. ..1.).contains(&self.dropout) {
            return Err(EncoderError::InvalidConfig(format!(
                "dropout须在[0, 1)内，实际为{}",
                self.dropout
            )));
        }
        if self.parameter_init <= 0. || !self.parameter_init.is_finite() {
            return Err(EncoderError::InvalidConfig(format!(
                "parameter_init须为正数，实际为{}",
                self.parameter_init
            )));
        }
        if self.subsample_list.len() != self.num_layers {
            return Err(EncoderError::LayerConfigMismatch(format!(
                "subsample_list的长度{}与num_layers={}不一致",
                self.subsample_list.len(),
                self.num_layers
            )));
        }
        if let Some(num_layers_sub) = self.num_layers_sub {
            if num_layers_sub == 0 || num_layers_sub >= self.num_layers {
                return Err(EncoderError::LayerConfigMismatch(format!(
                    "num_layers_sub须在[1, {})内，实际为{num_layers_sub}",
                    self.num_layers
                )));
            }
        }
        if self.num_proj > 0 && self.bidirectional && self.merge_bidirectional {
            return Err(EncoderError::LayerConfigMismatch(
                "投影会混合前、后向特征，不能再按方向合并（num_proj>0 与 merge_bidirectional 冲突）"
                    .to_string(),
            ));
        }
        if self.merge_between_layers && !self.merge_bidirectional {
            return Err(EncoderError::LayerConfigMismatch(
                "merge_between_layers须配合merge_bidirectional使用".to_string(),
            ));
        }
        Ok(())
    }

    pub const fn num_directions(&self) -> usize {
        if self.bidirectional { 2 } else { 1 }
    }

    pub const fn layout(&self) -> Layout {
        Layout::from_batch_first(self.batch_first)
    }

    /// 层间是否传递方向相加后的输出
    pub const fn merges_between_layers(&self) -> bool {
        self.bidirectional && self.merge_bidirectional && self.merge_between_layers
    }
}
