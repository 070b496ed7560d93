/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 时间维降采样（减半）
 *
 * - drop: 保留偶数时间步（0, 2, 4, ...）
 * - concat: 将第2i与2i+1步的特征拼接为一步（特征维翻倍），时间长度为奇数时丢弃末尾未配对的一步
 *
 * 两种方式下新的有效长度都是`floor(len / 2)`，每次降采样各自向下取整。
 */

use crate::errors::{EncoderError, EncoderResult};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 降采样方式，对应配置项`subsample_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsampleType {
    #[default]
    Drop,
    Concat,
}

impl SubsampleType {
    /// 降采样一次后特征维的倍数
    pub const fn width_factor(&self) -> usize {
        match self {
            Self::Drop => 1,
            Self::Concat => 2,
        }
    }
}

impl fmt::Display for SubsampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Concat => write!(f, "concat"),
        }
    }
}

impl FromStr for SubsampleType {
    type Err = EncoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Self::Drop),
            "concat" => Ok(Self::Concat),
            _ => Err(EncoderError::UnsupportedSubsampleType(s.to_string())),
        }
    }
}

/// 降采样后的序列及其长度
#[derive(Debug, Clone)]
pub struct Subsampled {
    /// [floor(T / 2), B, W * width_factor]
    pub outputs: Tensor,
    pub lengths: Vec<usize>,
}

/// 对时间优先的序列[T, B, W]做一次降采样
///
/// `layer`仅用于报错：若某条序列减半后有效长度为0，返回`SubsampleUnderflow`
/// （此时`index`为该序列在传入批次中的下标）。
pub fn subsample(
    outputs: &Tensor,
    lengths: &[usize],
    subsample_type: SubsampleType,
    layer: usize,
) -> EncoderResult<Subsampled> {
    if let Some((index, &length)) = lengths.iter().enumerate().find(|&(_, &l)| l < 2) {
        return Err(EncoderError::SubsampleUnderflow {
            layer,
            index,
            length,
        });
    }
    let new_lengths = lengths.iter().map(|&l| l / 2).collect::<Vec<_>>();

    let shape = outputs.shape();
    let (t_max, batch_size, width) = (shape[0], shape[1], shape[2]);
    let reduced = match subsample_type {
        SubsampleType::Drop => outputs.step_slice(0, 2),
        SubsampleType::Concat => {
            let half = t_max / 2;
            // [2*half, B, W] -> [half, 2, B, W] -> [half, B, 2, W] -> [half, B, 2W]
            outputs
                .narrow(0, 0, half * 2)
                .reshape(&[half, 2, batch_size, width])
                .permute(&[0, 2, 1, 3])
                .reshape(&[half, batch_size, width * 2])
        }
    };

    Ok(Subsampled {
        outputs: reduced,
        lengths: new_lengths,
    })
}
