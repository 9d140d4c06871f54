use itertools::Itertools;
use std::collections::HashSet;
use std::fmt::{self, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 预定义的邻接方式.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConnectivityKind {
    /// 仅沿坐标轴的邻居. 二维为 4-邻域, 三维为 6-邻域 (钻石邻域).
    #[default]
    Axial,

    /// 全部 `3^N - 1` 个邻居. 二维为 8-邻域, 三维为 26-邻域.
    Full,
}

/// 构建 [`Connectivity`] 错误.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConnectivityError {
    /// 维度为 0.
    ZeroDim,

    /// 偏移集合为空.
    Empty,

    /// 偏移 (或图像形状) 的维度与期望不符.
    DimMismatch {
        /// 期望维度.
        expected: usize,
        /// 实际维度.
        found: usize,
    },

    /// 第 `0` 个偏移是零向量.
    ZeroOffset(usize),

    /// 重复的偏移.
    Duplicate(Vec<isize>),
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDim => f.write_str("维度不能为 0"),
            Self::Empty => f.write_str("偏移集合为空"),
            Self::DimMismatch { expected, found } => {
                write!(f, "期望 {expected} 维, 实际为 {found} 维")
            }
            Self::ZeroOffset(i) => write!(f, "第 {i} 个偏移是零向量"),
            Self::Duplicate(v) => write!(f, "偏移 {v:?} 重复出现"),
        }
    }
}

impl std::error::Error for ConnectivityError {}

/// 经过校验的邻接偏移集合.
///
/// 保证: 非空, 所有偏移长度等于 `ndim`, 不含零向量, 无重复.
/// 偏移的顺序就是邻居的枚举顺序, 它决定了等代价情况下的入队先后.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Connectivity {
    ndim: usize,
    offsets: Vec<Vec<isize>>,
}

impl Connectivity {
    /// 沿坐标轴的 `2 * ndim` 个邻居, 按轴顺序先负后正.
    pub fn axial(ndim: usize) -> Result<Self, ConnectivityError> {
        if ndim == 0 {
            return Err(ConnectivityError::ZeroDim);
        }
        let mut offsets = Vec::with_capacity(2 * ndim);
        for axis in 0..ndim {
            for step in [-1, 1] {
                let mut v = vec![0; ndim];
                v[axis] = step;
                offsets.push(v);
            }
        }
        Ok(Self { ndim, offsets })
    }

    /// `{-1, 0, 1}^ndim` 中除零向量外的全部偏移, 按字典序排列.
    pub fn full(ndim: usize) -> Result<Self, ConnectivityError> {
        if ndim == 0 {
            return Err(ConnectivityError::ZeroDim);
        }
        let offsets = (0..ndim)
            .map(|_| -1isize..=1)
            .multi_cartesian_product()
            .filter(|v| v.iter().any(|&d| d != 0))
            .collect();
        Ok(Self { ndim, offsets })
    }

    /// 按预定义方式构建.
    #[inline]
    pub fn from_kind(kind: ConnectivityKind, ndim: usize) -> Result<Self, ConnectivityError> {
        match kind {
            ConnectivityKind::Axial => Self::axial(ndim),
            ConnectivityKind::Full => Self::full(ndim),
        }
    }

    /// 使用自定义偏移构建. 偏移可以不对称 (此时图是有向的), 也可以跨越多个元素.
    pub fn from_offsets<I>(ndim: usize, offsets: I) -> Result<Self, ConnectivityError>
    where
        I: IntoIterator<Item = Vec<isize>>,
    {
        if ndim == 0 {
            return Err(ConnectivityError::ZeroDim);
        }
        let offsets: Vec<Vec<isize>> = offsets.into_iter().collect();
        if offsets.is_empty() {
            return Err(ConnectivityError::Empty);
        }
        let mut seen = HashSet::with_capacity(offsets.len());
        for (i, v) in offsets.iter().enumerate() {
            if v.len() != ndim {
                return Err(ConnectivityError::DimMismatch {
                    expected: ndim,
                    found: v.len(),
                });
            }
            if v.iter().all(|&d| d == 0) {
                return Err(ConnectivityError::ZeroOffset(i));
            }
            if !seen.insert(v.as_slice()) {
                return Err(ConnectivityError::Duplicate(v.clone()));
            }
        }
        Ok(Self { ndim, offsets })
    }

    /// 维度.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// 全部偏移.
    #[inline]
    pub fn offsets(&self) -> &[Vec<isize>] {
        &self.offsets
    }

    /// 偏移个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// 永远为 `false`, 构建时已拒绝空集合.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
