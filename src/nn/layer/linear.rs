/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : 无偏置的线性投影，用于将循环层（拼接方向后）的输出收窄为`num_proj`维
 */

use crate::nn::Init;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 投影层：`output = x @ W`
///
/// # 输入/输出形状
/// - 输入：[T, B, in_features]
/// - 输出：[T, B, out_features]
///
/// 不带偏置，因此填充位置（全零）投影后仍为零。
#[derive(Debug, Clone)]
pub struct Projection {
    /// 权重参数 [in_features, out_features]
    weights: Tensor,
    in_features: usize,
    out_features: usize,
}

impl Projection {
    pub fn new(in_features: usize, out_features: usize, init: &Init, rng: &mut StdRng) -> Self {
        Self {
            weights: init.generate_with_rng(&[in_features, out_features], rng),
            in_features,
            out_features,
        }
    }

    pub fn forward(&self, sequence: &Tensor) -> Tensor {
        let shape = sequence.shape();
        let (t_max, batch_size) = (shape[0], shape[1]);
        assert_eq!(shape[2], self.in_features, "投影层的输入维度不匹配");
        sequence
            .reshape(&[t_max * batch_size, self.in_features])
            .mat_mul(&self.weights)
            .reshape(&[t_max, batch_size, self.out_features])
    }

    pub const fn out_features(&self) -> usize {
        self.out_features
    }
}
