use crate::assert_panic;
use crate::errors::TensorError;
use crate::tensor::Tensor;

/// [T=4, B=2, D=1]，值为`10 * t + b`
fn sequence() -> Tensor {
    Tensor::new(&[0., 1., 10., 11., 20., 21., 30., 31.], &[4, 2, 1])
}

#[test]
fn test_select() {
    let step = sequence().select(0, 2);
    assert_eq!(step.shape(), &[2, 1]);
    assert_eq!(step.to_vec(), vec![20., 21.]);

    let row = sequence().select(1, 1);
    assert_eq!(row.shape(), &[4, 1]);
    assert_eq!(row.to_vec(), vec![1., 11., 21., 31.]);

    assert_panic!(
        sequence().select(0, 4),
        TensorError::IndexOutOfRange { index: 4, len: 4 }
    );
}

#[test]
fn test_narrow() {
    let narrowed = sequence().narrow(0, 1, 2);
    assert_eq!(narrowed.shape(), &[2, 2, 1]);
    assert_eq!(narrowed.to_vec(), vec![10., 11., 20., 21.]);

    assert_panic!(
        sequence().narrow(0, 3, 2),
        TensorError::IndexOutOfRange { index: 5, len: 4 }
    );
}

#[test]
fn test_step_slice() {
    let even = sequence().step_slice(0, 2);
    assert_eq!(even.shape(), &[2, 2, 1]);
    assert_eq!(even.to_vec(), vec![0., 1., 20., 21.]);

    // 奇数长度：末尾未凑够一步的位置被丢弃
    let odd = sequence().narrow(0, 0, 3).step_slice(0, 2);
    assert_eq!(odd.shape(), &[1, 2, 1]);
    assert_eq!(odd.to_vec(), vec![0., 1.]);
}

#[test]
fn test_index_select() {
    let reordered = sequence().index_select(1, &[1, 0]);
    assert_eq!(reordered.to_vec(), vec![1., 0., 11., 10., 21., 20., 31., 30.]);

    let repeated = sequence().index_select(0, &[3, 3]);
    assert_eq!(repeated.to_vec(), vec![30., 31., 30., 31.]);

    assert_panic!(
        sequence().index_select(1, &[0, 2]),
        TensorError::IndexOutOfRange { index: 2, len: 2 }
    );
}

#[test]
fn test_get_at() {
    let feature = sequence().get_at(&[2, 1]);
    assert_eq!(feature.shape(), &[1]);
    assert_eq!(feature.to_vec(), vec![21.]);
    assert_eq!(sequence().get_at(&[3]).shape(), &[2, 1]);
}

#[test]
fn test_assign_and_fill() {
    let mut tensor = sequence();
    tensor.assign_at(&[0, 1], &Tensor::new(&[-1.], &[1]));
    assert_eq!(tensor.value_at(&[0, 1, 0]), -1.);

    tensor.fill_at(&[3], 0.);
    assert_eq!(tensor.select(0, 3).to_vec(), vec![0., 0.]);

    tensor.assign_narrow(0, 1, &Tensor::new(&[7., 7., 8., 8.], &[2, 2, 1]));
    assert_eq!(tensor.to_vec(), vec![0., -1., 7., 7., 8., 8., 0., 0.]);

    assert_panic!(
        tensor.assign_at(&[0], &Tensor::zeros(&[3, 1])),
        TensorError::InconsitentShape
    );
}
