use crate::assert_err;
use crate::errors::EncoderError;
use crate::nn::subsample::{SubsampleType, subsample};
use crate::tensor::Tensor;

/// [T=5, B=2, W=1]，值为`10 * t + b`
fn sequence() -> Tensor {
    let data = (0..5)
        .flat_map(|t| (0..2).map(move |b| (10 * t + b) as f32))
        .collect::<Vec<_>>();
    Tensor::new(&data, &[5, 2, 1])
}

#[test]
fn test_drop_keeps_even_steps() -> Result<(), EncoderError> {
    let reduced = subsample(&sequence(), &[5, 3], SubsampleType::Drop, 0)?;
    assert_eq!(reduced.outputs.shape(), &[2, 2, 1]);
    assert_eq!(reduced.outputs.to_vec(), vec![0., 1., 20., 21.]);
    assert_eq!(reduced.lengths, vec![2, 1]);
    Ok(())
}

#[test]
fn test_concat_pairs_adjacent_steps() -> Result<(), EncoderError> {
    let reduced = subsample(&sequence(), &[5, 4], SubsampleType::Concat, 0)?;
    assert_eq!(reduced.outputs.shape(), &[2, 2, 2]);
    // 第i步 = [第2i步, 第2i+1步]，奇数末步被丢弃
    assert_eq!(
        reduced.outputs.to_vec(),
        vec![0., 10., 1., 11., 20., 30., 21., 31.]
    );
    assert_eq!(reduced.lengths, vec![2, 2]);
    Ok(())
}

#[test]
fn test_lengths_floor_each_time() -> Result<(), EncoderError> {
    let once = subsample(&sequence(), &[5, 3], SubsampleType::Drop, 0)?;
    assert_eq!(once.lengths, vec![2, 1]);
    // 先floor(5/2)=2再floor(2/2)=1，与一次性floor(5/4)=1一致
    let twice = subsample(&once.outputs, &[2, 2], SubsampleType::Drop, 1)?;
    assert_eq!(twice.lengths, vec![1, 1]);
    assert_eq!(twice.outputs.shape(), &[1, 2, 1]);
    Ok(())
}

#[test]
fn test_underflow() {
    assert_err!(
        subsample(&sequence(), &[5, 1], SubsampleType::Concat, 3),
        EncoderError::SubsampleUnderflow {
            layer: 3,
            index: 1,
            length: 1
        }
    );
}

#[test]
fn test_subsample_type_parse() {
    assert_eq!("concat".parse::<SubsampleType>().ok(), Some(SubsampleType::Concat));
    assert_eq!(SubsampleType::default(), SubsampleType::Drop);
    assert_eq!(SubsampleType::Drop.to_string(), "drop");
    assert_eq!(SubsampleType::Concat.width_factor(), 2);
    assert_err!(
        "average".parse::<SubsampleType>(),
        EncoderError::UnsupportedSubsampleType("average")
    );
}
