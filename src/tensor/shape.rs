use super::Tensor;
use crate::errors::{Operator, TensorError};
use ndarray::{Axis, IxDyn};
use std::collections::HashSet;

impl Tensor {
    /// 改变形状（元素总数须一致），返回新张量
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let new_total_elements: usize = shape.iter().product();
        assert!(
            self.size() == new_total_elements,
            "{}",
            TensorError::IncompatibleShape
        );
        // 先转为标准行优先布局，以免permute后的视图无法直接reshape
        let data = self.data.as_standard_layout().to_owned();
        Self {
            data: data.into_shape(IxDyn(shape)).unwrap(),
        }
    }

    /// 交换张量的两个（以上）维度，并将其返回（不影响原张量）
    pub fn permute(&self, axes: &[usize]) -> Self {
        assert!(axes.len() >= 2, "{}", TensorError::PermuteNeedAtLeast2Dims);
        // 检查axes中的所有元素必须是唯一且在[0, <张量维数>)范围内
        let unique_axes = axes.iter().copied().collect::<HashSet<_>>();
        assert!(
            unique_axes.len() == axes.len()
                && axes.len() == self.dimension()
                && unique_axes.iter().all(|&a| a < self.dimension()),
            "{}",
            TensorError::PermuteNeedUniqueAndInRange
        );

        let permuted = self.data.clone().permuted_axes(IxDyn(axes));
        Self {
            data: permuted.as_standard_layout().to_owned(),
        }
    }

    /// 交换第`a`与第`b`维
    pub fn swap_axes(&self, a: usize, b: usize) -> Self {
        let mut axes = (0..self.dimension()).collect::<Vec<_>>();
        axes.swap(a, b);
        self.permute(&axes)
    }

    /// 沿`axis`维拼接多个张量，除`axis`外的其余维度须一致
    pub fn concat(tensors: &[&Self], axis: usize) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        let first = tensors[0];
        Self::check_axis(first, axis);
        for t in &tensors[1..] {
            let compatible = t.dimension() == first.dimension()
                && t.shape()
                    .iter()
                    .zip(first.shape())
                    .enumerate()
                    .all(|(i, (a, b))| i == axis || a == b);
            assert!(
                compatible,
                "{}",
                TensorError::OperatorError {
                    operator: Operator::Concat,
                    tensor1_shape: first.shape().to_vec(),
                    tensor2_shape: t.shape().to_vec(),
                }
            );
        }

        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        Self {
            data: ndarray::concatenate(Axis(axis), &views).unwrap(),
        }
    }

    /// 将多个形状相同的张量堆叠到一个新的首维上
    pub fn stack(tensors: &[&Self]) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        assert!(
            tensors.iter().all(|t| t.is_same_shape(tensors[0])),
            "{}",
            TensorError::InconsitentShape
        );
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        Self {
            data: ndarray::stack(Axis(0), &views).unwrap(),
        }
    }

    /// 沿`axis`维求和，该维度会被移除
    pub fn sum_axis(&self, axis: usize) -> Self {
        Self::check_axis(self, axis);
        Self {
            data: self.data.sum_axis(Axis(axis)),
        }
    }

    pub(in crate::tensor) fn check_axis(tensor: &Self, axis: usize) {
        assert!(
            axis < tensor.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: tensor.dimension(),
            }
        );
    }
}
