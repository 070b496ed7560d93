use crate::errors::TensorError;
use crate::tensor::Tensor;
use std::ops::Sub;

impl Sub for &Tensor {
    type Output = Tensor;

    fn sub(self, other: Self) -> Tensor {
        assert!(self.is_same_shape(other), "{}", TensorError::InconsitentShape);
        Tensor {
            data: &self.data - &other.data,
        }
    }
}
