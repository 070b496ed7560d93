/*
 * @Author       : 老董
 * @Date         : 2026-01-21
 * @Description  : 循环层：把单步单元沿时间维展开，支持单/双向与变长批次
 *
 * 变长处理（类似 PyTorch 的 pack_padded_sequence）：
 * 批次已按有效长度降序排列，因此第t步仍处于活动状态的序列恰好是批次前`n_t`行，
 * `n_t = #{b : len_b > t}`。每一步只计算这些行，已结束序列的状态被冻结，
 * 最终状态自然就是各序列最后一个有效时间步的隐藏状态。
 *
 * 反向方向的第s步处理的是各序列自己的第`len_b - 1 - s`个时间步（而不是填充后的末尾），
 * 输出也写回到同一时间下标。
 */

use crate::errors::{EncoderError, EncoderResult};
use crate::nn::Init;
use crate::nn::layer::{Cell, CellState, CellType, Projection, RecurrentCell};
use crate::nn::sort::validate_lengths;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// 循环层的输出
#[derive(Debug, Clone)]
pub struct LayerOutput {
    /// 输出序列 [T, B, directions * hidden_size]（有投影时为 [T, B, num_proj]），
    /// 超出各序列有效长度的位置为零
    pub outputs: Tensor,
    /// 最终隐藏状态 [directions, B, hidden_size]
    pub final_state: Tensor,
    /// Lstm 的最终细胞状态 [directions, B, hidden_size]
    pub final_cell: Option<Tensor>,
}

/// 单层（可双向）循环层，即“循环单元适配器”
#[derive(Debug, Clone)]
pub struct RecurrentLayer {
    forward_cell: Cell,
    backward_cell: Option<Cell>,
    projection: Option<Projection>,
}

impl RecurrentLayer {
    /// 创建新的循环层
    ///
    /// # 参数
    /// - `num_proj`: 为0时不投影，否则将输出收窄为`num_proj`维
    pub fn new(
        cell_type: CellType,
        input_size: usize,
        hidden_size: usize,
        bidirectional: bool,
        num_proj: usize,
        init: &Init,
        rng: &mut StdRng,
    ) -> Self {
        let forward_cell = Cell::new(cell_type, input_size, hidden_size, init, rng);
        let backward_cell =
            bidirectional.then(|| Cell::new(cell_type, input_size, hidden_size, init, rng));
        let num_directions = if bidirectional { 2 } else { 1 };
        let projection = (num_proj > 0)
            .then(|| Projection::new(hidden_size * num_directions, num_proj, init, rng));
        Self {
            forward_cell,
            backward_cell,
            projection,
        }
    }

    pub const fn num_directions(&self) -> usize {
        if self.backward_cell.is_some() { 2 } else { 1 }
    }

    pub fn input_size(&self) -> usize {
        self.forward_cell.input_size()
    }

    pub fn hidden_size(&self) -> usize {
        self.forward_cell.hidden_size()
    }

    /// 输出序列的特征维度
    pub fn output_size(&self) -> usize {
        match &self.projection {
            Some(projection) => projection.out_features(),
            None => self.hidden_size() * self.num_directions(),
        }
    }

    /// 初始状态须每个方向一个，种类与单元一致（Lstm另带细胞状态），且各张量为[B, hidden_size]
    fn check_initial_state(&self, states: &[CellState], batch_size: usize) -> EncoderResult<()> {
        if states.len() != self.num_directions() {
            return Err(EncoderError::InputShapeMismatch {
                expected: vec![self.num_directions()],
                got: vec![states.len()],
                message: "初始状态的数量须与方向数一致".to_string(),
            });
        }
        let tensors_per_state = |state: &CellState| if state.cell().is_some() { 2 } else { 1 };
        let expected_tensors = tensors_per_state(&self.forward_cell.zero_state(0));
        let expected = [batch_size, self.hidden_size()];
        for state in states {
            if tensors_per_state(state) != expected_tensors {
                return Err(EncoderError::InputShapeMismatch {
                    expected: vec![expected_tensors],
                    got: vec![tensors_per_state(state)],
                    message: "初始状态的种类须与单元一致（Lstm需同时给出h与c）".to_string(),
                });
            }
            let mut tensors = std::iter::once(state.hidden()).chain(state.cell());
            if let Some(wrong) = tensors.find(|t| t.shape() != expected) {
                return Err(EncoderError::InputShapeMismatch {
                    expected: expected.to_vec(),
                    got: wrong.shape().to_vec(),
                    message: "初始状态须为[B, hidden_size]".to_string(),
                });
            }
        }
        Ok(())
    }

    /// 前向传播
    ///
    /// # 参数
    /// - `inputs`: [T, B, input_size]，时间优先
    /// - `lengths`: 各序列有效长度，须非递增且都在[1, T]内
    /// - `initial_state`: 每个方向一个初始状态（行数为B），缺省为全零
    ///
    /// 长度越界报`InvalidLength`，未按降序排列报`UnsortedLengths`
    pub fn forward(
        &self,
        inputs: &Tensor,
        lengths: &[usize],
        initial_state: Option<&[CellState]>,
    ) -> EncoderResult<LayerOutput> {
        let shape = inputs.shape();
        if shape.len() != 3 || shape[2] != self.input_size() || shape[1] != lengths.len() {
            return Err(EncoderError::InputShapeMismatch {
                expected: vec![shape.first().copied().unwrap_or(0), lengths.len(), self.input_size()],
                got: shape.to_vec(),
                message: "循环层的输入须为[T, B, input_size]".to_string(),
            });
        }
        let t_max = shape[0];
        validate_lengths(lengths, shape[1], t_max)?;
        if lengths.windows(2).any(|w| w[0] < w[1]) {
            return Err(EncoderError::UnsortedLengths(lengths.to_vec()));
        }
        if let Some(states) = initial_state {
            self.check_initial_state(states, lengths.len())?;
        }
        let initial = |direction: usize, cell: &Cell| match initial_state {
            Some(states) => states[direction].clone(),
            None => cell.zero_state(lengths.len()),
        };

        let (fw_outputs, fw_state) =
            run_forward(&self.forward_cell, inputs, lengths, initial(0, &self.forward_cell));
        let mut directions = vec![(fw_outputs, fw_state)];
        if let Some(backward_cell) = &self.backward_cell {
            directions.push(run_backward(
                backward_cell,
                inputs,
                lengths,
                initial(1, backward_cell),
            ));
        }

        let output_refs = directions.iter().map(|(o, _)| o).collect::<Vec<_>>();
        let mut outputs = Tensor::concat(&output_refs, 2);
        if let Some(projection) = &self.projection {
            outputs = projection.forward(&outputs);
        }

        let hidden_refs = directions.iter().map(|(_, s)| s.hidden()).collect::<Vec<_>>();
        let final_state = Tensor::stack(&hidden_refs);
        let cell_refs = directions
            .iter()
            .filter_map(|(_, s)| s.cell())
            .collect::<Vec<_>>();
        let final_cell = (!cell_refs.is_empty()).then(|| Tensor::stack(&cell_refs));

        Ok(LayerOutput {
            outputs,
            final_state,
            final_cell,
        })
    }
}

/// 排序后第`step`步仍处于活动状态的序列数
fn active_rows(lengths: &[usize], step: usize) -> usize {
    lengths.iter().take_while(|&&l| l > step).count()
}

fn run_forward(
    cell: &Cell,
    inputs: &Tensor,
    lengths: &[usize],
    mut state: CellState,
) -> (Tensor, CellState) {
    let (t_max, batch_size) = (inputs.shape()[0], inputs.shape()[1]);
    let mut outputs = Tensor::zeros(&[t_max, batch_size, cell.hidden_size()]);
    for t in 0..t_max {
        let active = active_rows(lengths, t);
        if active == 0 {
            break;
        }
        let x_t = inputs.select(0, t).narrow(0, 0, active);
        let next = cell.step(&x_t, &state.narrow_rows(active));
        for b in 0..active {
            outputs.assign_at(&[t, b], &next.hidden().select(0, b));
        }
        state.assign_rows(&next);
    }
    (outputs, state)
}

fn run_backward(
    cell: &Cell,
    inputs: &Tensor,
    lengths: &[usize],
    mut state: CellState,
) -> (Tensor, CellState) {
    let (t_max, batch_size) = (inputs.shape()[0], inputs.shape()[1]);
    let mut outputs = Tensor::zeros(&[t_max, batch_size, cell.hidden_size()]);
    for s in 0..t_max {
        let active = active_rows(lengths, s);
        if active == 0 {
            break;
        }
        // 第b行此步对应的真实时间下标
        let time_index = |b: usize| lengths[b] - 1 - s;
        let rows = (0..active)
            .map(|b| inputs.get_at(&[time_index(b), b]))
            .collect::<Vec<_>>();
        let x_s = Tensor::stack(&rows.iter().collect::<Vec<_>>());
        let next = cell.step(&x_s, &state.narrow_rows(active));
        for b in 0..active {
            outputs.assign_at(&[time_index(b), b], &next.hidden().select(0, b));
        }
        state.assign_rows(&next);
    }
    (outputs, state)
}
