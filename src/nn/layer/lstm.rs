/*
 * @Author       : 老董
 * @Date         : 2025-12-30
 * @Description  : LSTM 单元 - 单个时间步
 *
 * 公式:
 *   i_t = σ(x_t @ W_ii + h_{t-1} @ W_hi + b_i)   # 输入门
 *   f_t = σ(x_t @ W_if + h_{t-1} @ W_hf + b_f)   # 遗忘门
 *   g_t = tanh(x_t @ W_ig + h_{t-1} @ W_hg + b_g) # 候选细胞
 *   o_t = σ(x_t @ W_io + h_{t-1} @ W_ho + b_o)   # 输出门
 *   c_t = f_t ⊙ c_{t-1} + i_t ⊙ g_t              # 细胞状态
 *   h_t = o_t ⊙ tanh(c_t)                        # 隐藏状态
 *
 * 权重布局（与 PyTorch 不同，我们使用更清晰的分离结构）:
 * - W_ii, W_if, W_ig, W_io: 各 [input_size, hidden_size]
 * - W_hi, W_hf, W_hg, W_ho: 各 [hidden_size, hidden_size]
 * - b_i, b_f, b_g, b_o: 各 [1, hidden_size]
 */

use super::{CellState, RecurrentCell};
use crate::nn::Init;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 单个门的参数
#[derive(Debug, Clone)]
struct Gate {
    w_i: Tensor,
    w_h: Tensor,
    b: Tensor,
}

impl Gate {
    fn new(input_size: usize, hidden_size: usize, init: &Init, rng: &mut StdRng) -> Self {
        Self {
            w_i: init.generate_with_rng(&[input_size, hidden_size], rng),
            w_h: init.generate_with_rng(&[hidden_size, hidden_size], rng),
            b: init.generate_with_rng(&[1, hidden_size], rng),
        }
    }

    fn pre_activation(&self, x: &Tensor, h: &Tensor) -> Tensor {
        x.mat_mul(&self.w_i) + h.mat_mul(&self.w_h) + &self.b
    }
}

#[derive(Debug, Clone)]
pub struct LstmCell {
    input_gate: Gate,
    forget_gate: Gate,
    cell_gate: Gate,
    output_gate: Gate,
    input_size: usize,
    hidden_size: usize,
}

impl LstmCell {
    pub fn new(input_size: usize, hidden_size: usize, init: &Init, rng: &mut StdRng) -> Self {
        Self {
            input_gate: Gate::new(input_size, hidden_size, init, rng),
            forget_gate: Gate::new(input_size, hidden_size, init, rng),
            cell_gate: Gate::new(input_size, hidden_size, init, rng),
            output_gate: Gate::new(input_size, hidden_size, init, rng),
            input_size,
            hidden_size,
        }
    }
}

impl RecurrentCell for LstmCell {
    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn zero_state(&self, batch_size: usize) -> CellState {
        CellState::HiddenCell {
            h: Tensor::zeros(&[batch_size, self.hidden_size]),
            c: Tensor::zeros(&[batch_size, self.hidden_size]),
        }
    }

    fn step(&self, x: &Tensor, state: &CellState) -> CellState {
        let h = state.hidden();
        let c = state
            .cell()
            .expect("LstmCell 的状态必须同时包含隐藏状态与细胞状态");

        let i_gate = self.input_gate.pre_activation(x, h).sigmoid();
        let f_gate = self.forget_gate.pre_activation(x, h).sigmoid();
        let g_gate = self.cell_gate.pre_activation(x, h).tanh();
        let o_gate = self.output_gate.pre_activation(x, h).sigmoid();

        let c_t = &f_gate * c + &i_gate * &g_gate;
        let h_t = &o_gate * &c_t.tanh();
        CellState::HiddenCell { h: h_t, c: c_t }
    }
}
