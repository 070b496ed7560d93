/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @Description  : 错误类型：张量层面的`TensorError`（多用于assert的panic消息），
 *                 以及编码器层面、可被调用方处理的`EncoderError`
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsitentShape,
    #[error("张量形状不兼容")]
    IncompatibleShape,
    #[error("交换张量时，输入的维度数至少需要2个")]
    PermuteNeedAtLeast2Dims,
    #[error("需要交换的维度必须是唯一且在[0, <张量维数>)范围内")]
    PermuteNeedUniqueAndInRange,
    #[error("维度{axis}超出范围：张量只有{dimension}维")]
    AxisOutOfRange { axis: usize, dimension: usize },
    #[error("索引{index}超出范围：该维度长度为{len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// 编码器的错误类型
///
/// 除`SubsampleUnderflow`与`InvalidLength`这类只有拿到真实长度后才能发现的错误外，
/// 其余均在构建编码器时就报出。
#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("不支持的编码器类型`{0}`")]
    InvalidEncoderType(String),

    #[error("层配置不一致：{0}")]
    LayerConfigMismatch(String),

    #[error("第{index}条序列的长度{length}非法：须在[1, {max_time}]范围内")]
    InvalidLength {
        index: usize,
        length: usize,
        max_time: usize,
    },

    #[error("第{layer}层（从0计）的降采样使第{index}条序列（长度{length}）的有效长度小于1")]
    SubsampleUnderflow {
        layer: usize,
        index: usize,
        length: usize,
    },

    #[error("循环层要求长度按非递增顺序排列，实际为{0:?}")]
    UnsortedLengths(Vec<usize>),

    #[error("不支持的降采样方式`{0}`，须为drop或concat")]
    UnsupportedSubsampleType(String),

    #[error("配置非法：{0}")]
    InvalidConfig(String),

    #[error("输入形状不符（{message}）：期望{expected:?}，实际{got:?}")]
    InputShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    #[error("JSON解析失败：{0}")]
    Json(#[from] serde_json::Error),

    #[error("IO错误：{0}")]
    Io(#[from] std::io::Error),
}

pub type EncoderResult<T> = Result<T, EncoderError>;
