//! 可选的强度预处理: 先按对比度窗口截断, 再做 gamma 校正.
//!
//! 该变换与分割算法本身无关, 引擎只看到变换后的图像副本.

use crate::consts::{DEFAULT_CONTRAST_HIGH, DEFAULT_CONTRAST_LOW, DEFAULT_GAMMA};
use crate::mem::try_collect;
use crate::SegResult;
use ndarray::{ArrayD, ArrayViewD};

#[cfg(feature = "rayon")]
use crate::parallel;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 对比度窗口 + gamma, 即显示层当前状态的一份快照.
///
/// 该对象是只读的. 若要修改参数, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntensityTransform {
    low: f64,
    high: f64,
    gamma: f64,
}

impl IntensityTransform {
    /// 构建变换.
    ///
    /// 以下情况返回 `None`:
    ///
    /// 1. 任一参数非有限值;
    /// 2. `low > high`;
    /// 3. `gamma <= 0`;
    /// 4. `low < 0` 且 `gamma` 不是整数 (负数的分数次幂为 NaN).
    pub fn new(low: f64, high: f64, gamma: f64) -> Option<IntensityTransform> {
        let finite = low.is_finite() && high.is_finite() && gamma.is_finite();
        if !finite || low > high || gamma <= 0.0 || (low < 0.0 && gamma.fract() != 0.0) {
            return None;
        }
        Some(Self { low, high, gamma })
    }

    /// 显示层的默认状态: 窗口 `[0, 1500]`, gamma 为 1.
    #[inline]
    pub const fn from_display_default() -> IntensityTransform {
        Self {
            low: DEFAULT_CONTRAST_LOW,
            high: DEFAULT_CONTRAST_HIGH,
            gamma: DEFAULT_GAMMA,
        }
    }

    /// 窗下限.
    #[inline]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// 窗上限.
    #[inline]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// gamma.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// 变换单个强度值. NaN 保持为 NaN.
    #[inline]
    pub fn eval(&self, v: f64) -> f64 {
        let clipped = v.clamp(self.low, self.high);
        if self.gamma == 1.0 {
            clipped
        } else {
            clipped.powf(self.gamma)
        }
    }

    /// 变换整幅图像, 返回新数组. 副本分配失败时返回 [`crate::SegmentError::OutOfMemory`].
    pub fn apply(&self, image: ArrayViewD<'_, f64>) -> SegResult<ArrayD<f64>> {
        let data = try_collect(image.iter().copied())?;
        // 数据按 `image` 的逻辑顺序收集, 长度必然与形状一致.
        let mut out = ArrayD::from_shape_vec(image.raw_dim(), data)
            .expect("copied data must match the source shape");
        self.apply_inplace(&mut out);
        Ok(out)
    }

    #[cfg(not(feature = "rayon"))]
    fn apply_inplace(&self, image: &mut ArrayD<f64>) {
        image.mapv_inplace(|v| self.eval(v));
    }

    /// 借助 `rayon` 并行变换. 线程池不可用时退回串行.
    #[cfg(feature = "rayon")]
    fn apply_inplace(&self, image: &mut ArrayD<f64>) {
        match parallel::pool() {
            Some(pool) => pool.install(|| image.par_mapv_inplace(|v| self.eval(v))),
            None => image.mapv_inplace(|v| self.eval(v)),
        }
    }
}

impl Default for IntensityTransform {
    #[inline]
    fn default() -> Self {
        Self::from_display_default()
    }
}
