//! # Pyramid Encoder
//!
//! `pyramid_encoder`用纯rust实现了语音识别中常用的金字塔式（pyramid）循环编码器：
//! 多层（可双向的）Rnn/Gru/Lstm逐层堆叠，并可在指定层之后把时间分辨率减半，
//! 从而把很长的声学特征序列压缩成较短的高层表示；分层变体还会额外输出某一中间层的结果。
//!
//! 只负责前向推理，不涉及训练与梯度。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
