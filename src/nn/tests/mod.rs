use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

mod cell;
mod subsample;

/// 形状为`shape`、取值在[-1, 1]内的可复现随机张量
fn random_tensor(shape: &[usize], seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    Tensor::new_uniform(-1., 1., shape, &mut rng)
}

/// 逐元素近似相等
fn assert_tensor_close(actual: &Tensor, expected: &Tensor) {
    assert_eq!(actual.shape(), expected.shape(), "形状不一致");
    for (a, e) in actual.to_vec().iter().zip(expected.to_vec()) {
        assert_abs_diff_eq!(*a, e, epsilon = 1e-5);
    }
}
