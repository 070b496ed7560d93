/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 按有效长度降序重排批次，并记录恢复原顺序所需的置换
 */

use crate::errors::{EncoderError, EncoderResult};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// 批次置换：第i个（排序后）位置上的样本来自原批次的第`indices[i]`个
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permutation {
    indices: Vec<usize>,
}

impl Permutation {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// 逆置换：满足`self.inverse().apply_slice(&self.apply_slice(x)) == x`
    pub fn inverse(&self) -> Self {
        let mut inverse = vec![0; self.indices.len()];
        for (sorted, &original) in self.indices.iter().enumerate() {
            inverse[original] = sorted;
        }
        Self { indices: inverse }
    }

    /// 沿`axis`维按本置换取样本
    pub fn apply(&self, tensor: &Tensor, axis: usize) -> Tensor {
        tensor.index_select(axis, &self.indices)
    }

    pub fn apply_slice<T: Clone>(&self, values: &[T]) -> Vec<T> {
        self.indices.iter().map(|&i| values[i].clone()).collect()
    }
}

/// 排序后的批次（时间优先 [T, B, D]）
#[derive(Debug, Clone)]
pub struct SortedBatch {
    pub inputs: Tensor,
    pub lengths: Vec<usize>,
    /// 排序位置 -> 原批次下标
    pub perm: Permutation,
}

impl SortedBatch {
    /// 将排序后批次上得到的张量恢复为原批次顺序
    pub fn restore(&self, tensor: &Tensor, batch_axis: usize) -> Tensor {
        self.perm.inverse().apply(tensor, batch_axis)
    }

    pub fn restore_lengths(&self, lengths: &[usize]) -> Vec<usize> {
        self.perm.inverse().apply_slice(lengths)
    }
}

/// 检查长度向量：条数须与批次一致，每个长度须在[1, T]内
pub fn validate_lengths(lengths: &[usize], batch_size: usize, max_time: usize) -> EncoderResult<()> {
    if lengths.len() != batch_size {
        return Err(EncoderError::InputShapeMismatch {
            expected: vec![batch_size],
            got: vec![lengths.len()],
            message: "长度向量的条数须等于批次大小".to_string(),
        });
    }
    match lengths
        .iter()
        .enumerate()
        .find(|&(_, &length)| length == 0 || length > max_time)
    {
        Some((index, &length)) => Err(EncoderError::InvalidLength {
            index,
            length,
            max_time,
        }),
        None => Ok(()),
    }
}

/// 按长度降序（稳定排序，长度相同者保持原相对顺序）重排时间优先的批次
pub fn sort_by_length(inputs: &Tensor, lengths: &[usize]) -> EncoderResult<SortedBatch> {
    let (max_time, batch_size) = (inputs.shape()[0], inputs.shape()[1]);
    validate_lengths(lengths, batch_size, max_time)?;

    let mut indices = (0..batch_size).collect::<Vec<_>>();
    indices.sort_by(|&a, &b| lengths[b].cmp(&lengths[a]));
    let perm = Permutation { indices };
    tracing::debug!(perm = ?perm.indices(), "按长度降序重排批次");

    Ok(SortedBatch {
        inputs: perm.apply(inputs, 1),
        lengths: perm.apply_slice(lengths),
        perm,
    })
}
