/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : Rnn (循环神经网络) 单元 - 单个时间步
 *
 * 公式: h_t = tanh(x_t @ W_ih + h_{t-1} @ W_hh + b_h)
 *
 * 与 PyTorch nn.RNNCell 对齐:
 * - input: [batch, input_size]
 * - hidden: [batch, hidden_size]
 * - W_ih: [input_size, hidden_size]
 * - W_hh: [hidden_size, hidden_size]
 * - b_h: [1, hidden_size]
 */

use super::{CellState, RecurrentCell};
use crate::nn::Init;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// Rnn 单元：`h_t = tanh(x @ W_ih + h_{t-1} @ W_hh + b_h)`
#[derive(Debug, Clone)]
pub struct RnnCell {
    w_ih: Tensor, // [input_size, hidden_size]
    w_hh: Tensor, // [hidden_size, hidden_size]
    b_h: Tensor,  // [1, hidden_size]
    input_size: usize,
    hidden_size: usize,
}

impl RnnCell {
    pub fn new(input_size: usize, hidden_size: usize, init: &Init, rng: &mut StdRng) -> Self {
        Self {
            w_ih: init.generate_with_rng(&[input_size, hidden_size], rng),
            w_hh: init.generate_with_rng(&[hidden_size, hidden_size], rng),
            b_h: init.generate_with_rng(&[1, hidden_size], rng),
            input_size,
            hidden_size,
        }
    }

    /// 获取输入权重 `W_ih`
    pub const fn w_ih(&self) -> &Tensor {
        &self.w_ih
    }
    /// 获取隐藏权重 `W_hh`
    pub const fn w_hh(&self) -> &Tensor {
        &self.w_hh
    }
}

impl RecurrentCell for RnnCell {
    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn zero_state(&self, batch_size: usize) -> CellState {
        CellState::Hidden(Tensor::zeros(&[batch_size, self.hidden_size]))
    }

    fn step(&self, x: &Tensor, state: &CellState) -> CellState {
        let h = state.hidden();
        let pre = x.mat_mul(&self.w_ih) + h.mat_mul(&self.w_hh) + &self.b_h;
        CellState::Hidden(pre.tanh())
    }
}
