//! 有向弧代价.
//!
//! 设 `d = to - from` 为相邻两元素的有符号强度差, 方向参数为 `α ∈ [-1, 1]`, 则
//!
//! ```text
//! c(from -> to) = |d| * (1 - α * sign(d))
//! ```
//!
//! - `α = 0` 时退化为对称的 `|d|`;
//! - `α < 0` 时, 从亮到暗 (`d < 0`) 的代价为 `|d| * (1 + α)`, 比反方向的
//!   `|d| * (1 - α)` 更便宜, 区域倾向于向更暗的地方生长; `α > 0` 时相反.
//!
//! 对任意 `α ∈ [-1, 1]`, 代价非负且关于 `d` 连续 (`d -> 0` 时趋于 0),
//! 并满足 `c_α(u -> v) = c_{-α}(v -> u)`.

use crate::consts::{ALPHA_RANGE, DEFAULT_ALPHA};
use crate::error::SegmentError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 相邻元素之间的弧代价模型.
///
/// 实现必须对所有有限输入返回有限的非负值, 否则传播引擎会以
/// [`SegmentError::InvalidArcCost`] 终止运行.
pub trait ArcCost {
    /// 从强度为 `from` 的元素走到强度为 `to` 的相邻元素的代价.
    fn arc_cost(&self, from: f64, to: f64) -> f64;
}

impl<F> ArcCost for F
where
    F: Fn(f64, f64) -> f64,
{
    #[inline]
    fn arc_cost(&self, from: f64, to: f64) -> f64 {
        self(from, to)
    }
}

/// 有向 (非对称) 强度差代价. 见模块文档.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientedCost {
    alpha: f64,
}

impl OrientedCost {
    /// 构建代价模型. `alpha` 不在 `[-1, 1]` 内 (包括 NaN) 时返回错误.
    pub fn new(alpha: f64) -> Result<Self, SegmentError> {
        if ALPHA_RANGE.contains(&alpha) {
            Ok(Self { alpha })
        } else {
            Err(SegmentError::AlphaOutOfRange(alpha))
        }
    }

    /// 对称代价 `|d|`.
    #[inline]
    pub const fn symmetric() -> Self {
        Self { alpha: 0.0 }
    }

    /// 方向参数.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// 方向相反的代价模型.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self { alpha: -self.alpha }
    }
}

impl Default for OrientedCost {
    #[inline]
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ArcCost for OrientedCost {
    #[inline]
    fn arc_cost(&self, from: f64, to: f64) -> f64 {
        let d = to - from;
        // d == 0 时 signum 可能为 ±1, 但 |d| 为 0, 结果仍为 0.
        d.abs() * (1.0 - self.alpha * d.signum())
    }
}
