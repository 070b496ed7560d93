/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 张量布局。编码器内部统一使用时间优先，仅在入口与出口处各转换一次
 */

use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// [T, B, D]
    #[default]
    TimeMajor,
    /// [B, T, D]
    BatchFirst,
}

impl Layout {
    pub const fn from_batch_first(batch_first: bool) -> Self {
        if batch_first { Self::BatchFirst } else { Self::TimeMajor }
    }

    /// 转为内部使用的时间优先布局
    pub fn to_time_major(&self, tensor: &Tensor) -> Tensor {
        match self {
            Self::TimeMajor => tensor.clone(),
            Self::BatchFirst => tensor.swap_axes(0, 1),
        }
    }

    /// 由时间优先布局转回本布局
    pub fn from_time_major(&self, tensor: &Tensor) -> Tensor {
        // 交换前两维是自逆的
        self.to_time_major(tensor)
    }
}
