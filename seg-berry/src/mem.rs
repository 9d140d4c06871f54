//! 可失败的内存分配. 分配失败时返回 [`SegmentError::OutOfMemory`] 而不是中止进程.

use crate::error::SegmentError;
use crate::SegResult;

/// 以 `fill` 填充长度为 `len` 的数组.
pub(crate) fn try_filled<T: Clone>(len: usize, fill: T) -> SegResult<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, fill);
    Ok(buf)
}

/// 收集定长迭代器. 容量一次性预留, 之后不再分配.
pub(crate) fn try_collect<T, I>(it: I) -> SegResult<Vec<T>>
where
    I: ExactSizeIterator<Item = T>,
{
    let mut buf = Vec::new();
    buf.try_reserve_exact(it.len())?;
    buf.extend(it);
    Ok(buf)
}
