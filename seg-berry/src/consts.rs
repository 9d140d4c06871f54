//! 通用常量.

use std::ops::RangeInclusive;

/// 无种子归属时使用的内部保留根索引 (对应输出中的背景).
pub const NO_ROOT: usize = usize::MAX;

/// 种子图中代表 "未标注" 的值.
pub const UNLABELED: u32 = 0;

/// 方向参数 α 的合法范围.
pub const ALPHA_RANGE: RangeInclusive<f64> = -1.0..=1.0;

/// 默认方向参数. 略微偏向从亮区域向暗区域生长.
pub const DEFAULT_ALPHA: f64 = -0.2;

/// 默认的输出背景值.
pub const DEFAULT_BACKGROUND: u32 = 0;

/// 交互式会话中默认代表 "用户画出的背景" 的种子标签.
pub const DEFAULT_BACKGROUND_SEED: u32 = 1;

/// 默认对比度窗口下限.
pub const DEFAULT_CONTRAST_LOW: f64 = 0.0;

/// 默认对比度窗口上限.
pub const DEFAULT_CONTRAST_HIGH: f64 = 1500.0;

/// 默认 gamma.
pub const DEFAULT_GAMMA: f64 = 1.0;

/// 传播引擎每确定多少个元素检查一次取消标志.
pub const CANCEL_CHECK_INTERVAL: usize = 4096;
