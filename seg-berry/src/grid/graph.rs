use super::{Connectivity, ConnectivityError};

/// 图像形状与邻接关系组成的隐式图.
///
/// 元素以行优先 (C 序) 的扁平索引标识. 邻居在需要时由坐标 + 偏移计算,
/// 越界的邻居被过滤掉.
#[derive(Clone, Debug)]
pub struct GridGraph {
    shape: Vec<usize>,
    strides: Vec<usize>,
    offsets: Vec<Vec<isize>>,
    /// 每个偏移对应的扁平索引增量.
    deltas: Vec<isize>,
    len: usize,
}

impl GridGraph {
    /// 构建隐式图. `shape` 的维度必须与 `conn` 一致.
    pub fn new(shape: &[usize], conn: &Connectivity) -> Result<Self, ConnectivityError> {
        if shape.len() != conn.ndim() {
            return Err(ConnectivityError::DimMismatch {
                expected: conn.ndim(),
                found: shape.len(),
            });
        }
        let mut strides = vec![1; shape.len()];
        for axis in (0..shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * shape[axis + 1];
        }
        let deltas = conn
            .offsets()
            .iter()
            .map(|off| {
                off.iter()
                    .zip(strides.iter())
                    .map(|(&d, &s)| d * s as isize)
                    .sum::<isize>()
            })
            .collect();
        Ok(Self {
            shape: shape.to_vec(),
            strides,
            offsets: conn.offsets().to_vec(),
            deltas,
            len: shape.iter().product(),
        })
    }

    /// 图像形状.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// 维度.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// 元素 (节点) 个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// 图像是否为空 (某一维长度为 0).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 坐标 -> 扁平索引. 越界或维度不符时返回 `None`.
    pub fn ravel(&self, coord: &[usize]) -> Option<usize> {
        if coord.len() != self.ndim() || coord.iter().zip(&self.shape).any(|(c, n)| c >= n) {
            return None;
        }
        Some(coord.iter().zip(&self.strides).map(|(c, s)| c * s).sum())
    }

    /// 扁平索引 -> 坐标, 写入 `coord`. 要求 `index < self.len()`
    /// 且 `coord.len() == self.ndim()`.
    #[inline]
    pub fn unravel(&self, mut index: usize, coord: &mut [usize]) {
        debug_assert!(index < self.len);
        for (c, s) in coord.iter_mut().zip(&self.strides) {
            *c = index / s;
            index %= s;
        }
    }

    /// 获取 `coord` 的全部界内邻居坐标, 按偏移顺序排列.
    ///
    /// `coord` 越界时返回空 `Vec`.
    pub fn neighbours(&self, coord: &[usize]) -> Vec<Vec<usize>> {
        if self.ravel(coord).is_none() {
            return vec![];
        }
        self.offsets
            .iter()
            .filter(|off| self.within(coord, off))
            .map(|off| {
                coord
                    .iter()
                    .zip(off.iter())
                    .map(|(&c, &d)| (c as isize + d) as usize)
                    .collect()
            })
            .collect()
    }

    /// 依次对扁平索引 `index` 的每个界内邻居 (扁平索引) 调用 `op`,
    /// 遇到第一个 `Err` 时停止并返回它.
    ///
    /// `buf` 是长度为 `self.ndim()` 的坐标暂存区, 避免每次调用都分配内存.
    pub(crate) fn try_for_each_neighbour<E, F>(
        &self,
        index: usize,
        buf: &mut [usize],
        mut op: F,
    ) -> Result<(), E>
    where
        F: FnMut(usize) -> Result<(), E>,
    {
        self.unravel(index, buf);
        for (off, &delta) in self.offsets.iter().zip(&self.deltas) {
            if self.within(buf, off) {
                op((index as isize + delta) as usize)?;
            }
        }
        Ok(())
    }

    /// `coord + off` 是否在界内.
    #[inline]
    fn within(&self, coord: &[usize], off: &[isize]) -> bool {
        coord
            .iter()
            .zip(off)
            .zip(&self.shape)
            .all(|((&c, &d), &n)| {
                let x = c as isize + d;
                x >= 0 && (x as usize) < n
            })
    }
}
