/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Layer 模块 - 单步循环单元（Rnn/Gru/Lstm）以及输出投影
 *
 * 单元本身只负责一个时间步：(上一状态, 输入) -> 新状态，
 * 时间维的展开、双向与变长处理见`nn::recurrent`。
 */

mod gru;
mod linear;
mod lstm;
mod rnn;

pub use gru::GruCell;
pub use linear::Projection;
pub use lstm::LstmCell;
pub use rnn::RnnCell;

use crate::errors::EncoderError;
use crate::nn::Init;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓单元类型↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 循环单元的种类，对应配置项`rnn_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Rnn,
    Gru,
    #[default]
    Lstm,
}

impl CellType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Rnn => "rnn",
            Self::Gru => "gru",
            Self::Lstm => "lstm",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CellType {
    type Err = EncoderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rnn" => Ok(Self::Rnn),
            "gru" => Ok(Self::Gru),
            "lstm" => Ok(Self::Lstm),
            _ => Err(EncoderError::InvalidEncoderType(s.to_string())),
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑单元类型↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓单元状态↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 循环单元的状态，每个张量形状均为`[batch, hidden_size]`
#[derive(Debug, Clone, PartialEq)]
pub enum CellState {
    /// Rnn/Gru 只有隐藏状态
    Hidden(Tensor),
    /// Lstm 另有细胞状态
    HiddenCell { h: Tensor, c: Tensor },
}

impl CellState {
    pub const fn hidden(&self) -> &Tensor {
        match self {
            Self::Hidden(h) | Self::HiddenCell { h, .. } => h,
        }
    }

    pub const fn cell(&self) -> Option<&Tensor> {
        match self {
            Self::Hidden(_) => None,
            Self::HiddenCell { c, .. } => Some(c),
        }
    }

    /// 取前`rows`行（排序后处于活动状态的序列总是位于批次前部）
    pub fn narrow_rows(&self, rows: usize) -> Self {
        match self {
            Self::Hidden(h) => Self::Hidden(h.narrow(0, 0, rows)),
            Self::HiddenCell { h, c } => Self::HiddenCell {
                h: h.narrow(0, 0, rows),
                c: c.narrow(0, 0, rows),
            },
        }
    }

    /// 用`other`覆盖前`other.rows()`行，其余行（已结束的序列）保持不变
    pub fn assign_rows(&mut self, other: &Self) {
        match (self, other) {
            (Self::Hidden(h), Self::Hidden(new_h)) => h.assign_narrow(0, 0, new_h),
            (Self::HiddenCell { h, c }, Self::HiddenCell { h: new_h, c: new_c }) => {
                h.assign_narrow(0, 0, new_h);
                c.assign_narrow(0, 0, new_c);
            }
            _ => panic!("单元状态的种类不一致，无法写回"),
        }
    }

    pub fn rows(&self) -> usize {
        self.hidden().shape()[0]
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑单元状态↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓单元特性与枚举分发↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
#[enum_dispatch]
pub trait RecurrentCell {
    fn input_size(&self) -> usize;
    fn hidden_size(&self) -> usize;
    /// 全零初始状态
    fn zero_state(&self, batch_size: usize) -> CellState;
    /// 单个时间步：`x`形状为`[batch, input_size]`，`state`中各张量为`[batch, hidden_size]`
    fn step(&self, x: &Tensor, state: &CellState) -> CellState;
}

#[enum_dispatch(RecurrentCell)]
#[derive(Debug, Clone)]
pub enum Cell {
    RnnCell,
    GruCell,
    LstmCell,
}

impl Cell {
    /// 按单元种类创建对应的单元（不经任何字符串注册表）
    pub fn new(
        cell_type: CellType,
        input_size: usize,
        hidden_size: usize,
        init: &Init,
        rng: &mut StdRng,
    ) -> Self {
        match cell_type {
            CellType::Rnn => RnnCell::new(input_size, hidden_size, init, rng).into(),
            CellType::Gru => GruCell::new(input_size, hidden_size, init, rng).into(),
            CellType::Lstm => LstmCell::new(input_size, hidden_size, init, rng).into(),
        }
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑单元特性与枚举分发↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
