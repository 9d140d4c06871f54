//! 运行时错误.

use crate::grid::ConnectivityError;
use std::collections::TryReserveError;
use std::fmt::{self, Formatter};

/// 分割运行 (及其参数准备) 过程中的错误.
///
/// 所有错误都在产生任何输出之前或代替输出返回, 不存在 "部分结果".
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// 图像与种子图形状不一致. 分别为 (图像形状, 种子图形状).
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// 缺少必要输入. 参数为输入名.
    MissingInput(&'static str),

    /// 方向参数 α 不在 `[-1, 1]` 内 (或为 NaN).
    AlphaOutOfRange(f64),

    /// 邻接关系配置非法.
    Connectivity(ConnectivityError),

    /// 代价函数给出了负数或非有限值. 这属于调用方违反契约, 不做静默修正.
    InvalidArcCost {
        /// 出发元素强度.
        from: f64,
        /// 目标元素强度.
        to: f64,
        /// 代价函数的返回值.
        cost: f64,
    },

    /// 工作数组分配失败.
    OutOfMemory(TryReserveError),

    /// 运行被取消 (通常是被更新的请求替代).
    Cancelled,

    /// 后台运行异常终止 (panic). 参数为 panic 信息.
    Aborted(String),
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch(image, seeds) => {
                write!(f, "图像与种子形状不一致: {image:?} 和 {seeds:?}")
            }
            Self::MissingInput(name) => write!(f, "缺少输入 `{name}`"),
            Self::AlphaOutOfRange(alpha) => write!(f, "α = {alpha} 不在 [-1, 1] 范围内"),
            Self::Connectivity(e) => write!(f, "邻接关系非法: {e}"),
            Self::InvalidArcCost { from, to, cost } => {
                write!(f, "代价函数在 {from} -> {to} 上返回了非法值 {cost}")
            }
            Self::OutOfMemory(e) => write!(f, "工作数组分配失败: {e}"),
            Self::Cancelled => f.write_str("分割已取消"),
            Self::Aborted(msg) => write!(f, "分割异常终止: {msg}"),
        }
    }
}

impl std::error::Error for SegmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connectivity(e) => Some(e),
            Self::OutOfMemory(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConnectivityError> for SegmentError {
    #[inline]
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

impl From<TryReserveError> for SegmentError {
    #[inline]
    fn from(e: TryReserveError) -> Self {
        Self::OutOfMemory(e)
    }
}
