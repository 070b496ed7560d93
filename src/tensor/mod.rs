/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 编码器内部使用的稠密张量。底层为`ndarray`的动态维度数组，
 *                 仅提供序列编码所需的构造、形状、按维度切取/写回以及逐元素运算。
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::errors::{ComparisonOperator, TensorError};

mod ops {
    pub mod add;
    pub mod mat_mul;
    pub mod mul;
    pub mod others;
    pub mod sub;
}

mod axis;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 编码器中最常见的是形状为`[T, B, D]`（时间优先）的序列张量和`[B, H]`的隐藏状态。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量；`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        assert!(
            data.len() == shape.iter().product::<usize>(),
            "{}",
            TensorError::IncompatibleShape
        );
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap();
        Self { data }
    }

    /// 创建全零张量
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建全一张量
    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间内均匀分布。
    /// 随机数生成器由调用方传入，以便用同一个种子复现参数。
    pub fn new_uniform<R: Rng + ?Sized>(min: f32, max: f32, shape: &[usize], rng: &mut R) -> Self {
        assert!(
            max > min,
            "{}",
            TensorError::ValueMustSatisfyComparison {
                value_name: "均匀分布的区间宽度".to_string(),
                operator: ComparisonOperator::GreaterThan,
                threshold: 0,
            }
        );
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    pub(crate) fn from_array(data: Array<f32, IxDyn>) -> Self {
        Self { data }
    }
}
