/*
 * @Author       : 老董
 * @Date         : 2026-01-08
 * @Description  : 参数初始化策略
 */

use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 参数初始化策略
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// [-bound, bound]区间内的均匀分布，即配置项`parameter_init`
    Uniform(f32),
}

impl Init {
    /// 生成初始化后的 Tensor（使用指定的 RNG，以便同一种子可复现同一组参数）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => &Tensor::ones(shape) * *v,
            Self::Uniform(bound) => Tensor::new_uniform(-bound, *bound, shape, rng),
        }
    }
}
