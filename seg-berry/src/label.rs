//! 输出组装: 根索引 -> 用户可见的标签值.

use crate::consts::{DEFAULT_BACKGROUND, NO_ROOT};
use crate::mem::try_collect;
use crate::SegResult;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use crate::parallel;
        use rayon::iter::{IntoParallelRefIterator, ParallelExtend, ParallelIterator};
    }
}

/// 输出标签图的约定.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputSpec {
    /// 没有任何种子能到达的元素 (内部保留的 "无种子" 伪标签) 的输出值.
    pub background: u32,

    /// 代表 "用户画出的背景" 的种子标签. 该标签赢得的元素同样输出为 `background`.
    /// 为 `None` 时所有种子标签原样输出.
    pub background_seed: Option<u32>,
}

impl Default for OutputSpec {
    #[inline]
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            background_seed: None,
        }
    }
}

impl OutputSpec {
    /// 以 `background` 为背景值, 不指定背景种子.
    #[inline]
    pub fn with_background(background: u32) -> Self {
        Self {
            background,
            background_seed: None,
        }
    }

    /// 将种子标签 `seed` 视为背景.
    #[inline]
    pub fn background_seed(mut self, seed: u32) -> Self {
        self.background_seed = Some(seed);
        self
    }

    /// 根据根索引求单个元素的输出值.
    #[inline]
    pub fn resolve(&self, root: usize, seeds: &[u32]) -> u32 {
        if root == NO_ROOT {
            return self.background;
        }
        match seeds[root] {
            label if Some(label) == self.background_seed => self.background,
            label => label,
        }
    }
}

/// 将根索引场组装为标签图 (扁平, 行优先).
///
/// `roots[i]` 要么是某个种子元素的扁平索引, 要么是 [`NO_ROOT`].
fn assemble_serial(roots: &[usize], seeds: &[u32], spec: &OutputSpec) -> SegResult<Vec<u32>> {
    try_collect(roots.iter().map(|&r| spec.resolve(r, seeds)))
}

#[cfg(not(feature = "rayon"))]
#[inline]
pub(crate) fn assemble(roots: &[usize], seeds: &[u32], spec: &OutputSpec) -> SegResult<Vec<u32>> {
    assemble_serial(roots, seeds, spec)
}

/// 借助 `rayon` 并行地组装标签图. 结果与串行版本完全一致;
/// 线程池不可用时退回串行.
#[cfg(feature = "rayon")]
pub(crate) fn assemble(roots: &[usize], seeds: &[u32], spec: &OutputSpec) -> SegResult<Vec<u32>> {
    let Some(pool) = parallel::pool() else {
        return assemble_serial(roots, seeds, spec);
    };
    let mut labels = Vec::new();
    labels.try_reserve_exact(roots.len())?;
    pool.install(|| labels.par_extend(roots.par_iter().map(|&r| spec.resolve(r, seeds))));
    Ok(labels)
}
