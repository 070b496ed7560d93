/*
 * IT-2: 分层金字塔编码器集成测试
 *
 * 验收标准：
 *   1. 子分支取自第num_layers_sub层之后，主分支取自最后一层
 *   2. 两个分支各自的长度只取决于各自之前的降采样计划
 *   3. 输出已恢复为原批次顺序，perm可用于对齐其他按长度排序的数据
 *   4. 子分支的最终状态 = 抽头层各序列最后一个有效步的输出（前向）与t=0处的输出（反向）
 */

use approx::assert_abs_diff_eq;
use pyramid_encoder::errors::EncoderError;
use pyramid_encoder::nn::layer::CellType;
use pyramid_encoder::nn::{EncodedBatch, EncoderConfig, EncoderType, build_encoder};
use pyramid_encoder::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn random_batch(shape: &[usize], seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    Tensor::new_uniform(-1., 1., shape, &mut rng)
}

fn assert_close(actual: &Tensor, expected: &Tensor) {
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.to_vec().iter().zip(expected.to_vec()) {
        assert_abs_diff_eq!(*a, e, epsilon = 1e-5);
    }
}

/// 6层，抽头于第4层，计划[F, T, T, F, F, F]：两个分支的长度恰好相同
#[test]
fn test_tap_after_last_subsample() -> Result<(), EncoderError> {
    let config = EncoderConfig::new(40, CellType::Lstm, 32, 6)
        .with_subsample_list(&[false, true, true, false, false, false])
        .with_num_layers_sub(4)
        .with_seed(11);
    let encoder = build_encoder(EncoderType::parse("plstm_hierarchical")?, config)?;
    assert!(encoder.is_hierarchical());

    let batch = encoder.encode(&random_batch(&[20, 4, 40], 1), &[20, 17, 15, 10], true)?;
    let EncodedBatch::Hierarchical(output) = batch else {
        panic!("分层编码器须返回两个分支");
    };
    assert_eq!(output.main.outputs.shape(), &[5, 4, 32]);
    assert_eq!(output.sub.outputs.shape(), &[5, 4, 32]);
    assert_eq!(output.main.lengths, vec![5, 4, 3, 2]);
    assert_eq!(output.sub.lengths, vec![5, 4, 3, 2]);
    assert_eq!(output.main.final_state.shape(), &[1, 4, 32]);
    assert_eq!(output.sub.final_state.shape(), &[1, 4, 32]);
    // 两个分支来自不同的层
    assert_ne!(output.main.outputs, output.sub.outputs);
    Ok(())
}

#[test]
fn test_branches_have_independent_lengths() -> Result<(), EncoderError> {
    let config = EncoderConfig::new(6, CellType::Gru, 4, 4)
        .with_bidirectional(true)
        .with_subsample_list(&[true, false, true, true])
        .with_num_layers_sub(2)
        .with_seed(12);
    let encoder = build_encoder(EncoderType::parse("pgru_hierarchical")?, config)?;
    let lengths = [11, 32, 24];
    let batch = encoder.encode(&random_batch(&[32, 3, 6], 2), &lengths, true)?;

    let sub = batch.sub().expect("分层编码器须有子分支");
    assert_eq!(sub.outputs.shape(), &[16, 3, 8]);
    assert_eq!(sub.lengths, vec![5, 16, 12]);
    assert_eq!(sub.final_state.shape(), &[2, 3, 4]);

    let main = batch.main();
    assert_eq!(main.outputs.shape(), &[4, 3, 8]);
    assert_eq!(main.lengths, vec![1, 4, 3]);
    assert_eq!(main.final_state.shape(), &[2, 3, 4]);

    // 子分支在各自有效长度之后为零
    for t in 5..16 {
        assert!(sub.outputs.get_at(&[t, 0]).is_all_zero());
    }
    Ok(())
}

#[test]
fn test_perm_sorts_by_length() -> Result<(), EncoderError> {
    let config = EncoderConfig::new(2, CellType::Rnn, 3, 2)
        .with_num_layers_sub(1)
        .with_seed(13);
    let encoder = build_encoder(EncoderType::parse("prnn_hierarchical")?, config)?;
    let lengths = [3, 5, 5, 1];
    let batch = encoder.encode(&random_batch(&[5, 4, 2], 3), &lengths, false)?;
    let EncodedBatch::Hierarchical(output) = batch else {
        panic!("分层编码器须返回两个分支");
    };

    assert_eq!(output.perm.indices(), &[1, 2, 0, 3]);
    let sorted_lengths = output.perm.apply_slice(&lengths);
    assert_eq!(sorted_lengths, vec![5, 5, 3, 1]);
    assert_eq!(output.perm.inverse().apply_slice(&sorted_lengths), lengths.to_vec());
    // 输出本身是原顺序
    assert_eq!(output.main.lengths, lengths.to_vec());
    Ok(())
}

/// 双向抽头层不降采样，长度乱序且互不相同
#[test]
fn test_sub_final_state_is_last_valid_output() -> Result<(), EncoderError> {
    const NUM_UNITS: usize = 3;
    let config = EncoderConfig::new(5, CellType::Lstm, NUM_UNITS, 2)
        .with_bidirectional(true)
        .with_subsample_list(&[false, true])
        .with_num_layers_sub(1)
        .with_seed(14);
    let encoder = build_encoder(EncoderType::parse("plstm_hierarchical")?, config)?;
    let lengths = [3, 6, 4];
    let batch = encoder.encode(&random_batch(&[6, 3, 5], 4), &lengths, true)?;

    let sub = batch.sub().expect("分层编码器须有子分支");
    assert_eq!(sub.outputs.shape(), &[6, 3, 2 * NUM_UNITS]);
    assert_eq!(sub.final_state.shape(), &[2, 3, NUM_UNITS]);
    assert_eq!(sub.lengths, lengths.to_vec());
    for (b, &length) in lengths.iter().enumerate() {
        let forward_last = sub.outputs.get_at(&[length - 1, b]).narrow(0, 0, NUM_UNITS);
        assert_close(&sub.final_state.get_at(&[0, b]), &forward_last);
        let backward_first = sub.outputs.get_at(&[0, b]).narrow(0, NUM_UNITS, NUM_UNITS);
        assert_close(&sub.final_state.get_at(&[1, b]), &backward_first);
    }
    // 主分支的最终状态来自最后一层
    assert_ne!(batch.main().final_state, sub.final_state);
    Ok(())
}
