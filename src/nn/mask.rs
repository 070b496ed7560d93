/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 将超出各序列有效长度的时间步置零
 */

use crate::tensor::Tensor;

/// 就地将时间优先序列[T, B, W]中`t >= lengths[b]`的位置置零。
/// 逐行独立处理，因此与批次顺序无关，重复执行结果不变。
pub fn mask_sequence(outputs: &mut Tensor, lengths: &[usize]) {
    let (t_max, batch_size) = (outputs.shape()[0], outputs.shape()[1]);
    assert_eq!(lengths.len(), batch_size, "长度向量的条数须等于批次大小");
    for (b, &length) in lengths.iter().enumerate() {
        for t in length.min(t_max)..t_max {
            outputs.fill_at(&[t, b], 0.);
        }
    }
}

/// 非就地版本
pub fn masked(outputs: &Tensor, lengths: &[usize]) -> Tensor {
    let mut outputs = outputs.clone();
    mask_sequence(&mut outputs, lengths);
    outputs
}
