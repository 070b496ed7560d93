/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 编码器类型与工厂函数
 *
 * 支持的类型是封闭集合（单元种类 × 变体），用枚举表达，不依赖任何全局可变的字符串注册表；
 * 字符串标签只在入口`EncoderType::parse`处解析一次。
 */

use super::{Encoder, EncoderConfig, HierarchicalPyramidRnnEncoder, PyramidRnnEncoder};
use crate::errors::{EncoderError, EncoderResult};
use crate::nn::layer::CellType;
use std::fmt;
use std::str::FromStr;

/// 编码器变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderVariant {
    /// 普通多层循环编码器，不降采样
    Flat,
    /// 金字塔式：按`subsample_list`逐层降采样
    Pyramid,
    /// 金字塔式且额外输出中间层（子分支）
    Hierarchical,
}

/// 编码器类型 = 单元种类 × 变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderType {
    pub cell: CellType,
    pub variant: EncoderVariant,
}

impl EncoderType {
    /// 全部支持的类型
    pub const ALL: [Self; 9] = {
        const fn of(cell: CellType, variant: EncoderVariant) -> EncoderType {
            EncoderType { cell, variant }
        }
        [
            of(CellType::Lstm, EncoderVariant::Flat),
            of(CellType::Gru, EncoderVariant::Flat),
            of(CellType::Rnn, EncoderVariant::Flat),
            of(CellType::Lstm, EncoderVariant::Pyramid),
            of(CellType::Gru, EncoderVariant::Pyramid),
            of(CellType::Rnn, EncoderVariant::Pyramid),
            of(CellType::Lstm, EncoderVariant::Hierarchical),
            of(CellType::Gru, EncoderVariant::Hierarchical),
            of(CellType::Rnn, EncoderVariant::Hierarchical),
        ]
    };

    /// 解析如`lstm`、`pgru`、`prnn_hierarchical`这样的标签
    pub fn parse(tag: &str) -> EncoderResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| {
                let supported = Self::ALL.iter().map(Self::tag).collect::<Vec<_>>();
                EncoderError::InvalidEncoderType(format!(
                    "{tag}（须为[{}]之一）",
                    supported.join(", ")
                ))
            })
    }

    pub fn tag(&self) -> String {
        match self.variant {
            EncoderVariant::Flat => self.cell.name().to_string(),
            EncoderVariant::Pyramid => format!("p{}", self.cell.name()),
            EncoderVariant::Hierarchical => format!("p{}_hierarchical", self.cell.name()),
        }
    }
}

impl fmt::Display for EncoderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for EncoderType {
    type Err = EncoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// 按类型构造编码器。
///
/// 类型中的单元种类会覆盖配置里的`rnn_type`。
/// `Flat`变体在`subsample_list`为空时补全为全false，若含true则报`LayerConfigMismatch`；
/// `Hierarchical`变体要求配置了`num_layers_sub`，其余变体则不允许配置它。
pub fn build_encoder(encoder_type: EncoderType, mut config: EncoderConfig) -> EncoderResult<Encoder> {
    config.rnn_type = encoder_type.cell;
    match encoder_type.variant {
        EncoderVariant::Flat => {
            if config.subsample_list.is_empty() {
                config.subsample_list = vec![false; config.num_layers];
            }
            if config.subsample_list.iter().any(|&s| s) {
                return Err(EncoderError::LayerConfigMismatch(format!(
                    "{encoder_type}编码器不降采样，但subsample_list中含有true"
                )));
            }
            Ok(Encoder::Pyramid(PyramidRnnEncoder::new(config)?))
        }
        EncoderVariant::Pyramid => Ok(Encoder::Pyramid(PyramidRnnEncoder::new(config)?)),
        EncoderVariant::Hierarchical => Ok(Encoder::Hierarchical(
            HierarchicalPyramidRnnEncoder::new(config)?,
        )),
    }
}

/// `build_encoder`的字符串入口
pub fn load_encoder(tag: &str, config: EncoderConfig) -> EncoderResult<Encoder> {
    build_encoder(EncoderType::parse(tag)?, config)
}
