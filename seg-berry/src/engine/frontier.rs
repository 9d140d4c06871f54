use crate::error::SegmentError;
use crate::SegResult;
use binary_heap_plus::{BinaryHeap, MinComparator};
use ordered_float::OrderedFloat;
use std::mem;

/// 元素在传播过程中的状态.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ElemState {
    /// 尚未被任何传播前沿触及.
    Unvisited,

    /// 在前沿中, 持有暂定代价.
    InFrontier,

    /// 代价与归属已确定, 不再改变.
    Settled,
}

/// (代价, 入队序号, 扁平索引). 序号全局唯一, 因此比较不会落到索引上.
type Entry = (OrderedFloat<f64>, u64, usize);

/// 传播前沿: 按 (代价, 入队序号) 取最小的小顶堆.
///
/// 代价相同的元素按入队先后出队 (FIFO), 从而结果不依赖任何未指定的顺序.
/// 堆不支持 decrease-key; 代价被更新的元素会再次入队, 旧条目在出队时由调用方
/// 根据 [`ElemState::Settled`] 丢弃.
///
/// 堆的底层存储只通过 [`Frontier::try_reserve`] 增长, 分配失败时返回错误.
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry, MinComparator>,
    seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new_min(),
            seq: 0,
        }
    }

    /// 保证至少还能放下 `additional` 个条目而不再分配. 增长按倍数摊还.
    pub fn try_reserve(&mut self, additional: usize) -> SegResult<()> {
        if self.heap.capacity() - self.heap.len() >= additional {
            return Ok(());
        }
        let mut entries = mem::replace(&mut self.heap, BinaryHeap::new_min()).into_vec();
        let grown = entries.try_reserve(additional);
        // 条目顺序不变, 重建堆只是恢复比较器.
        self.heap = BinaryHeap::from_vec_cmp(entries, MinComparator);
        grown.map_err(SegmentError::from)
    }

    #[inline]
    pub fn push(&mut self, cost: f64, index: usize) -> SegResult<()> {
        self.try_reserve(1)?;
        self.heap.push((OrderedFloat(cost), self.seq, index));
        self.seq += 1;
        Ok(())
    }

    /// 弹出代价最小 (同代价时最早入队) 的 `(代价, 扁平索引)`.
    #[inline]
    pub fn pop(&mut self) -> Option<(f64, usize)> {
        self.heap.pop().map(|(cost, _, index)| (cost.into_inner(), index))
    }
}
