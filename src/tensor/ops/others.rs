use crate::tensor::Tensor;
use std::cmp::PartialEq;

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Tensor {
    /// 对每个元素施加`f`，返回新张量
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }

    pub fn sigmoid(&self) -> Self {
        self.map(|x| 1. / (1. + (-x).exp()))
    }

    pub fn tanh(&self) -> Self {
        self.map(f32::tanh)
    }
}
