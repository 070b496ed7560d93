/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-05 10:12:40
 * @Description  : 负责循环编码器（neural network）的构建
 */

pub mod encoder;
mod init;
pub mod layer;
mod layout;
pub mod mask;
pub mod merge;
pub mod recurrent;
pub mod sort;
pub mod subsample;

pub use encoder::{
    EncodedBatch, Encoder, EncoderConfig, EncoderOutput, EncoderType, EncoderVariant,
    HierarchicalOutput, HierarchicalPyramidRnnEncoder, PyramidRnnEncoder, build_encoder,
    load_encoder,
};
pub use init::Init;
pub use layer::{Cell, CellState, CellType, RecurrentCell};
pub use layout::Layout;
pub use merge::MergeMode;
pub use recurrent::{LayerOutput, RecurrentLayer};
pub use sort::{Permutation, SortedBatch};
pub use subsample::SubsampleType;

#[cfg(test)]
mod tests;
