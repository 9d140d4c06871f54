use super::frontier::{ElemState, Frontier};
use crate::consts::{CANCEL_CHECK_INTERVAL, NO_ROOT, UNLABELED};
use crate::cost::ArcCost;
use crate::error::SegmentError;
use crate::grid::GridGraph;
use crate::mem::try_filled;
use crate::worker::CancelToken;

/// 一次传播运行结束后的全部场 (扁平, 行优先).
pub(crate) struct Fields {
    /// 最小累计代价. 未到达的元素为 `+inf`.
    pub cost: Vec<f64>,

    /// 所属种子元素的扁平索引, 或 [`NO_ROOT`].
    pub root: Vec<usize>,

    /// 最优路径上的前驱元素, 种子与未到达元素为 [`NO_ROOT`].
    pub pred: Vec<usize>,

    /// 被确定 (出队) 的元素个数.
    pub settled: usize,
}

/// 多源种子竞争的单次运行. 所有工作数组均由本结构独占, 运行结束即交出.
pub(crate) struct Propagation<'a, C> {
    graph: &'a GridGraph,
    intensity: &'a [f64],
    cost_fn: &'a C,
    cancel: Option<&'a CancelToken>,
}

impl<'a, C: ArcCost> Propagation<'a, C> {
    /// `intensity` 长度必须等于 `graph.len()`.
    pub fn new(
        graph: &'a GridGraph,
        intensity: &'a [f64],
        cost_fn: &'a C,
        cancel: Option<&'a CancelToken>,
    ) -> Self {
        debug_assert_eq!(graph.len(), intensity.len());
        Self {
            graph,
            intensity,
            cost_fn,
            cancel,
        }
    }

    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }

    /// 从 `seeds` 中所有非零元素同时出发, 运行至前沿为空.
    ///
    /// 1. 种子以代价 0 按行优先顺序入队, 它们先于任何邻居被确定;
    /// 2. 每次取出全局代价最小的元素并确定之, 再松弛其所有未确定邻居:
    ///    候选代价严格更小时才更新代价与归属, 因此同代价时先到者获胜;
    /// 3. 已确定元素的代价与归属不再改变.
    pub fn run(self, seeds: &[u32]) -> Result<Fields, SegmentError> {
        debug_assert_eq!(self.graph.len(), seeds.len());
        if self.is_cancelled() {
            return Err(SegmentError::Cancelled);
        }

        let len = self.graph.len();
        let mut cost = try_filled(len, f64::INFINITY)?;
        let mut root = try_filled(len, NO_ROOT)?;
        let mut pred = try_filled(len, NO_ROOT)?;
        let mut state = try_filled(len, ElemState::Unvisited)?;

        let seed_count = seeds.iter().filter(|&&s| s != UNLABELED).count();
        let mut frontier = Frontier::new();
        frontier.try_reserve(seed_count)?;
        for (index, _) in seeds.iter().enumerate().filter(|(_, &s)| s != UNLABELED) {
            cost[index] = 0.0;
            root[index] = index;
            state[index] = ElemState::InFrontier;
            frontier.push(0.0, index)?;
        }

        let mut buf = vec![0; self.graph.ndim()];
        let mut settled = 0usize;

        while let Some((current, u)) = frontier.pop() {
            if state[u] == ElemState::Settled {
                // 代价被更新后遗留的旧条目.
                continue;
            }
            debug_assert_eq!(current, cost[u]);
            state[u] = ElemState::Settled;
            settled += 1;
            if settled % CANCEL_CHECK_INTERVAL == 0 && self.is_cancelled() {
                return Err(SegmentError::Cancelled);
            }

            let owner = root[u];
            let from = self.intensity[u];
            self.graph.try_for_each_neighbour(u, &mut buf, |v| {
                if state[v] == ElemState::Settled {
                    return Ok(());
                }
                let to = self.intensity[v];
                let arc = self.cost_fn.arc_cost(from, to);
                if !arc.is_finite() || arc < 0.0 {
                    return Err(SegmentError::InvalidArcCost {
                        from,
                        to,
                        cost: arc,
                    });
                }
                let candidate = current + arc;
                // 未访问元素的代价为 +inf, 任何有限候选都会更新它.
                if candidate < cost[v] {
                    cost[v] = candidate;
                    root[v] = owner;
                    pred[v] = u;
                    state[v] = ElemState::InFrontier;
                    frontier.push(candidate, v)?;
                }
                Ok(())
            })?;
        }

        debug_assert!(state
            .iter()
            .all(|s| matches!(s, ElemState::Settled | ElemState::Unvisited)));
        Ok(Fields {
            cost,
            root,
            pred,
            settled,
        })
    }
}
