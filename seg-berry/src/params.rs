//! 一次分割调用的参数.

use crate::consts::DEFAULT_ALPHA;
use crate::cost::OrientedCost;
use crate::error::SegmentError;
use crate::grid::ConnectivityKind;
use crate::label::OutputSpec;
use crate::preprocess::IntensityTransform;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 分割参数. 每次调用时作为不可变快照传入, 引擎不读取任何外部可变状态.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentParams {
    /// 方向参数, 必须位于 `[-1, 1]`. 负值偏向从亮向暗生长, 正值相反, 0 为中性.
    pub alpha: f64,

    /// 邻接方式.
    pub connectivity: ConnectivityKind,

    /// 输出约定.
    pub output: OutputSpec,

    /// 为 `Some` 时, 先对图像副本做强度变换再分割.
    pub transform: Option<IntensityTransform>,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            connectivity: ConnectivityKind::default(),
            output: OutputSpec::default(),
            transform: None,
        }
    }
}

impl SegmentParams {
    /// 检查参数, 并返回对应的代价模型.
    pub fn validate(&self) -> Result<OrientedCost, SegmentError> {
        OrientedCost::new(self.alpha)
    }
}
