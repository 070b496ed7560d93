/*
 * @Author       : 老董
 * @Date         : 2026-01-21
 * @Description  : Gru (门控循环单元) 单元 - 单个时间步
 *
 * 公式:
 *   r_t = σ(x_t @ W_ir + h_{t-1} @ W_hr + b_r)     # 重置门
 *   z_t = σ(x_t @ W_iz + h_{t-1} @ W_hz + b_z)     # 更新门
 *   n_t = tanh(x_t @ W_in + r_t ⊙ (h_{t-1} @ W_hn) + b_n)  # 候选状态
 *   h_t = (1 - z_t) ⊙ n_t + z_t ⊙ h_{t-1}         # 隐藏状态
 */

use super::{CellState, RecurrentCell};
use crate::nn::Init;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// Gru 单元，比 Lstm 更简单（2 个门 vs 4 个门），且只有隐藏状态
#[derive(Debug, Clone)]
pub struct GruCell {
    // === 重置门参数 ===
    w_ir: Tensor, // [input_size, hidden_size]
    w_hr: Tensor, // [hidden_size, hidden_size]
    b_r: Tensor,  // [1, hidden_size]
    // === 更新门参数 ===
    w_iz: Tensor,
    w_hz: Tensor,
    b_z: Tensor,
    // === 候选状态参数 ===
    w_in: Tensor,
    w_hn: Tensor,
    b_n: Tensor,
    input_size: usize,
    hidden_size: usize,
}

impl GruCell {
    pub fn new(input_size: usize, hidden_size: usize, init: &Init, rng: &mut StdRng) -> Self {
        let mut input_weight = || init.generate_with_rng(&[input_size, hidden_size], rng);
        let (w_ir, w_iz, w_in) = (input_weight(), input_weight(), input_weight());
        let mut hidden_weight = || init.generate_with_rng(&[hidden_size, hidden_size], rng);
        let (w_hr, w_hz, w_hn) = (hidden_weight(), hidden_weight(), hidden_weight());
        let mut bias = || init.generate_with_rng(&[1, hidden_size], rng);
        let (b_r, b_z, b_n) = (bias(), bias(), bias());

        Self {
            w_ir,
            w_hr,
            b_r,
            w_iz,
            w_hz,
            b_z,
            w_in,
            w_hn,
            b_n,
            input_size,
            hidden_size,
        }
    }
}

impl RecurrentCell for GruCell {
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

        // === 重置门 ===
        let r_gate = (x.mat_mul(&self.w_ir) + h.mat_mul(&self.w_hr) + &self.b_r).sigmoid();
        // === 更新门 ===
        let z_gate = (x.mat_mul(&self.w_iz) + h.mat_mul(&self.w_hz) + &self.b_z).sigmoid();
        // === 候选状态 ===
        let r_h_hn = &r_gate * &h.mat_mul(&self.w_hn);
        let n_gate = (x.mat_mul(&self.w_in) + r_h_hn + &self.b_n).tanh();

        // h_t = (1 - z_t) ⊙ n_t + z_t ⊙ h
        // 重写为: h_t = n_t + z_t ⊙ (h - n_t) 以减少计算
        let h_minus_n = h - &n_gate;
        CellState::Hidden(&n_gate + &(&z_gate * &h_minus_n))
    }
}
