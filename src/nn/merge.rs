/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 双向输出的合并方式
 */

use crate::tensor::Tensor;

/// 双向循环层前、后向输出的合并方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// 沿特征维拼接（宽度翻倍），循环层的输出本就是这种布局
    #[default]
    Concat,
    /// 逐元素相加（宽度不变）
    Sum,
}

impl MergeMode {
    pub const fn from_merge_flag(merge_bidirectional: bool) -> Self {
        if merge_bidirectional { Self::Sum } else { Self::Concat }
    }

    /// 合并序列[T, B, W]中的方向。
    ///
    /// 特征维被视为`groups`个`[前向 | 后向]`块（concat降采样会让块数翻倍），
    /// 求和在每个块内部进行，因此W须为`2 * hidden_size`的整数倍。
    /// 最终状态始终保留单独的方向维，不经过此处。
    pub fn apply(&self, outputs: &Tensor, hidden_size: usize) -> Tensor {
        match self {
            Self::Concat => outputs.clone(),
            Self::Sum => {
                let shape = outputs.shape();
                let (t_max, batch_size, width) = (shape[0], shape[1], shape[2]);
                assert!(
                    width % (2 * hidden_size) == 0,
                    "特征维{width}不是2×{hidden_size}的整数倍，无法按方向求和"
                );
                let groups = width / (2 * hidden_size);
                outputs
                    .reshape(&[t_max, batch_size, groups, 2, hidden_size])
                    .sum_axis(3)
                    .reshape(&[t_max, batch_size, groups * hidden_size])
            }
        }
    }
}
