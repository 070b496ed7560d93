/*
 * @Author       : 老董
 * @Date         : 2026-01-21
 * @Description  : Rnn/Gru/Lstm 单元的单步前向测试
 *
 * 所有参数常数初始化为0.5，输入全为1：
 * 每个门的预激活 = 1×0.5×input_size + h@W_h + 0.5，便于手算。
 */

use crate::nn::Init;
use crate::nn::layer::{Cell, CellState, CellType, GruCell, LstmCell, RecurrentCell, RnnCell};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

const INPUT_SIZE: usize = 2;
const HIDDEN_SIZE: usize = 3;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn ones_input(batch_size: usize) -> Tensor {
    Tensor::ones(&[batch_size, INPUT_SIZE])
}

// ==================== Rnn ====================

#[test]
fn test_rnn_cell_shapes() {
    let cell = RnnCell::new(INPUT_SIZE, HIDDEN_SIZE, &Init::Uniform(0.1), &mut rng());
    assert_eq!(cell.input_size(), INPUT_SIZE);
    assert_eq!(cell.hidden_size(), HIDDEN_SIZE);
    assert_eq!(cell.w_ih().shape(), &[INPUT_SIZE, HIDDEN_SIZE]);
    assert_eq!(cell.w_hh().shape(), &[HIDDEN_SIZE, HIDDEN_SIZE]);
    assert!(
        cell.w_ih()
            .to_vec()
            .iter()
            .all(|&w| (-0.1..=0.1).contains(&w))
    );
}

#[test]
fn test_rnn_cell_two_steps() {
    let cell = RnnCell::new(INPUT_SIZE, HIDDEN_SIZE, &Init::Constant(0.5), &mut rng());
    let state = cell.zero_state(2);
    assert!(state.cell().is_none());

    // h1 = tanh(1 + 0 + 0.5)
    let state = cell.step(&ones_input(2), &state);
    assert_eq!(state.hidden().shape(), &[2, HIDDEN_SIZE]);
    for h in state.hidden().to_vec() {
        assert_abs_diff_eq!(h, 0.905_148_3, epsilon = 1e-6);
    }

    // h2 = tanh(1 + 3 × 0.5 × h1 + 0.5)
    let state = cell.step(&ones_input(2), &state);
    for h in state.hidden().to_vec() {
        assert_abs_diff_eq!(h, 0.993_432_3, epsilon = 1e-6);
    }
}

// ==================== Gru ====================

#[test]
fn test_gru_cell_step() {
    let cell = GruCell::new(INPUT_SIZE, HIDDEN_SIZE, &Init::Constant(0.5), &mut rng());
    let state = cell.step(&ones_input(1), &cell.zero_state(1));
    // h = (1 - σ(1.5)) × tanh(1.5)
    for h in state.hidden().to_vec() {
        assert_abs_diff_eq!(h, 0.165_122_1, epsilon = 1e-6);
    }
}

// ==================== Lstm ====================

#[test]
fn test_lstm_cell_step() {
    let cell = LstmCell::new(INPUT_SIZE, HIDDEN_SIZE, &Init::Constant(0.5), &mut rng());
    let state = cell.step(&ones_input(1), &cell.zero_state(1));
    // c = σ(1.5) × tanh(1.5)，h = σ(1.5) × tanh(c)
    let c = state.cell().expect("Lstm 状态须包含细胞状态");
    for value in c.to_vec() {
        assert_abs_diff_eq!(value, 0.740_026_1, epsilon = 1e-6);
    }
    for h in state.hidden().to_vec() {
        assert_abs_diff_eq!(h, 0.514_385_9, epsilon = 1e-6);
    }
}

// ==================== 枚举分发与状态 ====================

#[test]
fn test_cell_enum_dispatch() {
    for cell_type in [CellType::Rnn, CellType::Gru, CellType::Lstm] {
        let cell = Cell::new(cell_type, INPUT_SIZE, HIDDEN_SIZE, &Init::Uniform(0.1), &mut rng());
        assert_eq!(cell.input_size(), INPUT_SIZE);
        assert_eq!(cell.hidden_size(), HIDDEN_SIZE);
        let state = cell.step(&ones_input(4), &cell.zero_state(4));
        assert_eq!(state.rows(), 4);
        assert_eq!(state.cell().is_some(), cell_type == CellType::Lstm);
    }
}

#[test]
fn test_same_seed_same_parameters() {
    let a = RnnCell::new(INPUT_SIZE, HIDDEN_SIZE, &Init::Uniform(0.1), &mut rng());
    let b = RnnCell::new(INPUT_SIZE, HIDDEN_SIZE, &Init::Uniform(0.1), &mut rng());
    assert_eq!(a.w_ih(), b.w_ih());
    assert_eq!(a.w_hh(), b.w_hh());
}

#[test]
fn test_cell_state_rows() {
    let h = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[3, 2]);
    let c = &h * 10.;
    let mut state = CellState::HiddenCell { h, c };

    let head = state.narrow_rows(2);
    assert_eq!(head.rows(), 2);
    assert_eq!(head.hidden().to_vec(), vec![1., 2., 3., 4.]);

    let update = CellState::HiddenCell {
        h: Tensor::zeros(&[1, 2]),
        c: Tensor::ones(&[1, 2]),
    };
    state.assign_rows(&update);
    assert_eq!(state.hidden().to_vec(), vec![0., 0., 3., 4., 5., 6.]);
    assert_eq!(
        state.cell().map(Tensor::to_vec),
        Some(vec![1., 1., 30., 40., 50., 60.])
    );
}

#[test]
#[should_panic(expected = "单元状态的种类不一致")]
fn test_cell_state_kind_mismatch() {
    let mut state = CellState::Hidden(Tensor::zeros(&[2, 2]));
    state.assign_rows(&CellState::HiddenCell {
        h: Tensor::zeros(&[1, 2]),
        c: Tensor::zeros(&[1, 2]),
    });
}

#[test]
fn test_cell_type_from_str() {
    assert_eq!("gru".parse::<CellType>().ok(), Some(CellType::Gru));
    assert_eq!(CellType::Lstm.to_string(), "lstm");
    assert_eq!(CellType::default(), CellType::Lstm);
    assert!("GRU".parse::<CellType>().is_err());
}
