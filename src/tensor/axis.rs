/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @Description  : 沿某一维度的切取与写回。
 *                 切取类方法均为“克隆式”，返回新张量；写回类方法（`assign_*`/`fill_*`）就地修改本张量。
 */

use super::Tensor;
use crate::errors::TensorError;
use ndarray::{ArrayViewMutD, Axis, Slice};

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓克隆式切取↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 取`axis`维上第`index`个切片，该维度会被移除。
    /// 如对形状为`[T, B, D]`的序列执行`select(0, t)`得到形状为`[B, D]`的第t个时间步。
    pub fn select(&self, axis: usize, index: usize) -> Self {
        self.check_index(axis, index);
        Self::from_array(self.data.index_axis(Axis(axis), index).to_owned())
    }

    /// 取`axis`维上`[start, start + len)`区间，维度数不变
    pub fn narrow(&self, axis: usize, start: usize, len: usize) -> Self {
        Self::check_axis(self, axis);
        assert!(
            start + len <= self.shape()[axis],
            "{}",
            TensorError::IndexOutOfRange {
                index: start + len,
                len: self.shape()[axis],
            }
        );
        let end = (start + len) as isize;
        Self::from_array(
            self.data
                .slice_axis(Axis(axis), Slice::new(start as isize, Some(end), 1))
                .to_owned(),
        )
    }

    /// 从0开始，每隔`step`个取一个，只保留能凑够完整一步的位置：
    /// 长度为L的维度结果长度为`L / step`（向下取整）。
    pub fn step_slice(&self, axis: usize, step: usize) -> Self {
        Self::check_axis(self, axis);
        assert!(step >= 1, "{}", TensorError::IncompatibleShape);
        let kept = self.shape()[axis] / step;
        let end = (kept * step) as isize;
        Self::from_array(
            self.data
                .slice_axis(Axis(axis), Slice::new(0, Some(end), step as isize))
                .to_owned(),
        )
    }

    /// 按给定索引顺序在`axis`维上重新取出切片（索引可重复）
    pub fn index_select(&self, axis: usize, indices: &[usize]) -> Self {
        Self::check_axis(self, axis);
        for &index in indices {
            self.check_index(axis, index);
        }
        Self::from_array(self.data.select(Axis(axis), indices))
    }

    /// 依次沿首维取索引，得到剩余维度构成的子张量。
    /// 如对`[T, B, D]`的序列执行`get_at(&[t, b])`得到形状为`[D]`的特征向量。
    pub fn get_at(&self, index: &[usize]) -> Self {
        let mut view = self.data.view();
        for &i in index {
            assert!(
                i < view.len_of(Axis(0)),
                "{}",
                TensorError::IndexOutOfRange {
                    index: i,
                    len: view.len_of(Axis(0)),
                }
            );
            view = view.index_axis_move(Axis(0), i);
        }
        Self::from_array(view.to_owned())
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑克隆式切取↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓就地写回↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl Tensor {
    /// 将`value`写入由首维索引`index`定位的子张量，`value`的形状须与该子张量一致
    pub fn assign_at(&mut self, index: &[usize], value: &Self) {
        let mut view = self.leading_view_mut(index);
        assert!(
            view.shape() == value.shape(),
            "{}",
            TensorError::InconsitentShape
        );
        view.assign(&value.data);
    }

    /// 将`axis`维上`[start, start + value.shape()[axis])`区间替换为`value`
    pub fn assign_narrow(&mut self, axis: usize, start: usize, value: &Self) {
        Self::check_axis(self, axis);
        let len = value.shape()[axis];
        assert!(
            start + len <= self.shape()[axis],
            "{}",
            TensorError::IndexOutOfRange {
                index: start + len,
                len: self.shape()[axis],
            }
        );
        let end = (start + len) as isize;
        let mut view = self
            .data
            .slice_axis_mut(Axis(axis), Slice::new(start as isize, Some(end), 1));
        assert!(
            view.shape() == value.shape(),
            "{}",
            TensorError::InconsitentShape
        );
        view.assign(&value.data);
    }

    /// 将由首维索引`index`定位的子张量全部置为`value`
    pub fn fill_at(&mut self, index: &[usize], value: f32) {
        self.leading_view_mut(index).fill(value);
    }

    fn leading_view_mut(&mut self, index: &[usize]) -> ArrayViewMutD<'_, f32> {
        let mut view = self.data.view_mut();
        for &i in index {
            assert!(
                i < view.len_of(Axis(0)),
                "{}",
                TensorError::IndexOutOfRange {
                    index: i,
                    len: view.len_of(Axis(0)),
                }
            );
            view = view.index_axis_move(Axis(0), i);
        }
        view
    }

    fn check_index(&self, axis: usize, index: usize) {
        Self::check_axis(self, axis);
        assert!(
            index < self.shape()[axis],
            "{}",
            TensorError::IndexOutOfRange {
                index,
                len: self.shape()[axis],
            }
        );
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑就地写回↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
