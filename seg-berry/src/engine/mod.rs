//! 有向种子竞争 (oriented seed competition) 分割引擎.
//!
//! 所有种子同时作为源点, 在隐式网格图上做多源最短路径传播 (Dijkstra 式松弛).
//! 每个元素最终归属于到达它累计代价最小的种子. 代价见 [`crate::cost`].
//!
//! 传播是单线程的: 全局按代价顺序出队是正确性的核心.

mod frontier;
mod propagate;

use self::propagate::{Fields, Propagation};
use crate::consts::NO_ROOT;
use crate::cost::ArcCost;
use crate::error::SegmentError;
use crate::grid::{Connectivity, GridGraph};
use crate::label::{self, OutputSpec};
use crate::mem::try_collect;
use crate::params::SegmentParams;
use crate::worker::CancelToken;
use crate::SegResult;
use ndarray::{ArrayD, ArrayViewD, IxDyn};
use std::time::Instant;

/// 一次分割的完整结果. 所有数组与输入图像同形状.
#[derive(Clone, Debug)]
pub struct Segmentation {
    costs: ArrayD<f64>,
    roots: ArrayD<usize>,
    preds: ArrayD<usize>,
    labels: ArrayD<u32>,
    settled: usize,
}

impl Segmentation {
    fn from_fields(shape: &[usize], fields: Fields, labels: Vec<u32>) -> Self {
        Self {
            costs: into_array(shape, fields.cost),
            roots: into_array(shape, fields.root),
            preds: into_array(shape, fields.pred),
            labels: into_array(shape, labels),
            settled: fields.settled,
        }
    }

    /// 输出标签图.
    #[inline]
    pub fn labels(&self) -> ArrayViewD<'_, u32> {
        self.labels.view()
    }

    /// 消费自我, 获得输出标签图.
    #[inline]
    pub fn into_labels(self) -> ArrayD<u32> {
        self.labels
    }

    /// 最小累计代价. 种子为 0, 未到达的元素为 `+inf`.
    #[inline]
    pub fn costs(&self) -> ArrayViewD<'_, f64> {
        self.costs.view()
    }

    /// 所属种子元素的扁平 (行优先) 索引. 未到达的元素为 [`NO_ROOT`].
    #[inline]
    pub fn roots(&self) -> ArrayViewD<'_, usize> {
        self.roots.view()
    }

    /// 最优路径前驱的扁平索引. 种子与未到达的元素为 [`NO_ROOT`].
    #[inline]
    pub fn preds(&self) -> ArrayViewD<'_, usize> {
        self.preds.view()
    }

    /// 被确定的元素个数.
    #[inline]
    pub fn settled(&self) -> usize {
        self.settled
    }

    /// 没有任何种子能到达的元素个数.
    #[inline]
    pub fn unreached(&self) -> usize {
        self.labels.len() - self.settled
    }

    /// 坐标 `coord` 处的累计代价. 越界时返回 `None`.
    #[inline]
    pub fn cost_at(&self, coord: &[usize]) -> Option<f64> {
        self.costs.get(coord).copied()
    }

    /// 坐标 `coord` 所属种子的坐标. 越界或未到达时返回 `None`.
    pub fn root_at(&self, coord: &[usize]) -> Option<Vec<usize>> {
        match self.roots.get(coord).copied() {
            None | Some(NO_ROOT) => None,
            Some(root) => Some(unravel(self.roots.shape(), root)),
        }
    }

    /// 从所属种子到 `coord` 的最优路径 (含两端), 按传播方向排列.
    /// 越界或未到达时返回空 `Vec`.
    pub fn path_to(&self, coord: &[usize]) -> Vec<Vec<usize>> {
        if self.root_at(coord).is_none() {
            return vec![];
        }
        let shape = self.preds.shape();
        let mut path = vec![coord.to_vec()];
        let mut cur = self.preds[coord];
        while cur != NO_ROOT {
            let c = unravel(shape, cur);
            cur = self.preds[c.as_slice()];
            path.push(c);
        }
        path.reverse();
        path
    }
}

/// 行优先扁平索引 -> 坐标.
fn unravel(shape: &[usize], mut index: usize) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    for (c, n) in coord.iter_mut().zip(shape).rev() {
        *c = index % n;
        index /= n;
    }
    coord
}

fn into_array<T>(shape: &[usize], data: Vec<T>) -> ArrayD<T> {
    // 长度由 `GridGraph::len` 保证与形状一致, 该操作不会生成 `Err`.
    ArrayD::from_shape_vec(IxDyn(shape), data).expect("field length must match the image shape")
}

/// 按行优先顺序拷贝出扁平数据. 分配失败时返回错误.
#[inline]
fn flatten<T: Copy>(a: &ArrayViewD<'_, T>) -> SegResult<Vec<T>> {
    try_collect(a.iter().copied())
}

#[inline]
fn check_shapes(image: &ArrayViewD<'_, f64>, seeds: &ArrayViewD<'_, u32>) -> SegResult<()> {
    if image.shape() == seeds.shape() {
        Ok(())
    } else {
        Err(SegmentError::ShapeMismatch(
            image.shape().to_vec(),
            seeds.shape().to_vec(),
        ))
    }
}

/// 使用给定参数分割 `image`.
///
/// `seeds` 中 0 表示未标注, 正整数为种子标签. 相同标签的多个连通分量作为同一区域竞争.
///
/// # 错误
///
/// - 形状不一致、α 越界、维度为 0 时, 在任何计算开始前返回错误;
/// - 工作数组分配失败时返回 [`SegmentError::OutOfMemory`].
pub fn segment(
    image: ArrayViewD<'_, f64>,
    seeds: ArrayViewD<'_, u32>,
    params: &SegmentParams,
) -> SegResult<Segmentation> {
    segment_params(image, seeds, params, None)
}

/// 同 [`segment`], 但在 `cancel` 被触发后尽快以 [`SegmentError::Cancelled`] 结束.
pub fn segment_cancellable(
    image: ArrayViewD<'_, f64>,
    seeds: ArrayViewD<'_, u32>,
    params: &SegmentParams,
    cancel: &CancelToken,
) -> SegResult<Segmentation> {
    segment_params(image, seeds, params, Some(cancel))
}

fn segment_params(
    image: ArrayViewD<'_, f64>,
    seeds: ArrayViewD<'_, u32>,
    params: &SegmentParams,
    cancel: Option<&CancelToken>,
) -> SegResult<Segmentation> {
    check_shapes(&image, &seeds)?;
    let cost = params.validate()?;
    let conn = Connectivity::from_kind(params.connectivity, image.ndim())?;
    match params.transform {
        Some(t) => {
            let transformed = t.apply(image)?;
            segment_with(transformed.view(), seeds, &conn, &cost, &params.output, cancel)
        }
        None => segment_with(image, seeds, &conn, &cost, &params.output, cancel),
    }
}

/// 底层入口: 使用自定义邻接关系与代价模型分割 `image`.
pub fn segment_with<C: ArcCost>(
    image: ArrayViewD<'_, f64>,
    seeds: ArrayViewD<'_, u32>,
    conn: &Connectivity,
    cost: &C,
    output: &OutputSpec,
    cancel: Option<&CancelToken>,
) -> SegResult<Segmentation> {
    check_shapes(&image, &seeds)?;
    let graph = GridGraph::new(image.shape(), conn)?;
    let intensity = flatten(&image)?;
    let seed_labels = flatten(&seeds)?;

    let start = Instant::now();
    let fields = Propagation::new(&graph, &intensity, cost, cancel).run(&seed_labels)?;
    let unreached = graph.len() - fields.settled;
    log::debug!(
        "Propagation over {:?} settled {} elements in {} us",
        graph.shape(),
        fields.settled,
        start.elapsed().as_micros()
    );
    if fields.settled != 0 && unreached != 0 {
        log::warn!(
            "{unreached} elements are unreachable from any seed, labelled as background {}",
            output.background
        );
    }

    let labels = label::assemble(&fields.root, &seed_labels, output)?;
    Ok(Segmentation::from_fields(graph.shape(), fields, labels))
}

#[cfg(test)]
mod tests {
    use super::{segment, segment_cancellable, segment_with, unravel, Segmentation};
    use crate::consts::{CANCEL_CHECK_INTERVAL, NO_ROOT};
    use crate::cost::{ArcCost, OrientedCost};
    use crate::error::SegmentError;
    use crate::grid::{Connectivity, ConnectivityKind, GridGraph};
    use crate::label::OutputSpec;
    use crate::params::SegmentParams;
    use crate::preprocess::IntensityTransform;
    use crate::worker::CancelToken;
    use ndarray::{ArrayD, IxDyn};
    use std::cell::Cell;
    use std::collections::HashSet;

    fn image(shape: &[usize], data: Vec<f64>) -> ArrayD<f64> {
        ArrayD::from_shape_vec(IxDyn(shape), data).unwrap()
    }

    fn seeds(shape: &[usize], data: Vec<u32>) -> ArrayD<u32> {
        ArrayD::from_shape_vec(IxDyn(shape), data).unwrap()
    }

    fn params(alpha: f64) -> SegmentParams {
        SegmentParams {
            alpha,
            ..Default::default()
        }
    }

    fn labels_of(s: &Segmentation) -> Vec<u32> {
        s.labels().iter().copied().collect()
    }

    /// 测试用的线性同余伪随机数, 保证可复现.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            self.0 >> 33
        }

        fn image(&mut self, shape: &[usize]) -> ArrayD<f64> {
            let len = shape.iter().product();
            image(shape, (0..len).map(|_| (self.next() % 256) as f64).collect())
        }

        /// 约 `1 / every` 的元素为种子, 标签在 `1..=labels` 中.
        fn seeds(&mut self, shape: &[usize], every: u64, labels: u64) -> ArrayD<u32> {
            let len = shape.iter().product();
            let data = (0..len)
                .map(|_| {
                    if self.next() % every == 0 {
                        (self.next() % labels + 1) as u32
                    } else {
                        0
                    }
                })
                .collect();
            seeds(shape, data)
        }
    }

    #[test]
    fn test_1d_plateau_example() {
        let im = image(&[5], vec![0.0, 10.0, 10.0, 0.0, 0.0]);
        let sd = seeds(&[5], vec![1, 0, 0, 0, 2]);
        let s = segment(im.view(), sd.view(), &params(0.0)).unwrap();
        assert_eq!(labels_of(&s), [1, 1, 2, 2, 2]);
        let costs: Vec<f64> = s.costs().iter().copied().collect();
        assert_eq!(costs, [0.0, 10.0, 10.0, 0.0, 0.0]);
        assert_eq!(s.settled(), 5);

        // 镜像输入得到镜像输出.
        let im = image(&[5], vec![0.0, 0.0, 10.0, 10.0, 0.0]);
        let sd = seeds(&[5], vec![2, 0, 0, 0, 1]);
        let s = segment(im.view(), sd.view(), &params(0.0)).unwrap();
        assert_eq!(labels_of(&s), [2, 2, 2, 1, 1]);
    }

    #[test]
    fn test_ties_go_to_first_arrival() {
        // 在全平坦图像上, 中间元素被两个种子以相同代价到达, 先入队的种子获胜.
        let im = image(&[5], vec![0.0; 5]);
        let sd = seeds(&[5], vec![1, 0, 0, 0, 2]);
        let s = segment(im.view(), sd.view(), &params(0.0)).unwrap();
        assert_eq!(labels_of(&s), [1, 1, 1, 2, 2]);

        let sd = seeds(&[5], vec![2, 0, 0, 0, 1]);
        let s = segment(im.view(), sd.view(), &params(0.0)).unwrap();
        assert_eq!(labels_of(&s), [2, 2, 2, 1, 1]);
    }

    #[test]
    fn test_deterministic() {
        let shape = [20, 30];
        let mut rng = Lcg(7);
        let im = rng.image(&shape);
        let mut sd = rng.seeds(&shape, 40, 4);
        sd[[0, 0].as_slice()] = 1;
        for kind in [ConnectivityKind::Axial, ConnectivityKind::Full] {
            let p = SegmentParams {
                alpha: -0.4,
                connectivity: kind,
                ..Default::default()
            };
            let a = segment(im.view(), sd.view(), &p).unwrap();
            let b = segment(im.view(), sd.view(), &p).unwrap();
            assert_eq!(a.labels(), b.labels());
            assert_eq!(a.roots(), b.roots());
            assert!(a
                .costs()
                .iter()
                .zip(b.costs().iter())
                .all(|(x, y)| x.to_bits() == y.to_bits()));
        }
    }

    #[test]
    fn test_labels_come_from_seeds_or_background() {
        let shape = [12, 17];
        let mut rng = Lcg(99);
        for round in 0..5 {
            let im = rng.image(&shape);
            let sd = rng.seeds(&shape, 25, 6);
            let present: HashSet<u32> = sd.iter().copied().filter(|&l| l != 0).collect();
            let p = SegmentParams {
                alpha: 0.3,
                output: OutputSpec::with_background(100 + round),
                ..Default::default()
            };
            let s = segment(im.view(), sd.view(), &p).unwrap();
            for &l in s.labels().iter() {
                assert!(present.contains(&l) || l == 100 + round);
            }
        }
    }

    #[test]
    fn test_optimality() {
        let shape = [15, 15];
        let mut rng = Lcg(2024);
        let im = rng.image(&shape);
        let mut sd = rng.seeds(&shape, 30, 3);
        sd[[7, 7].as_slice()] = 2;
        let conn = Connectivity::full(2).unwrap();
        let cost = OrientedCost::new(-0.3).unwrap();
        let s = segment_with(
            im.view(),
            sd.view(),
            &conn,
            &cost,
            &OutputSpec::default(),
            None,
        )
        .unwrap();
        assert_eq!(s.settled(), 225);

        let g = GridGraph::new(&shape, &conn).unwrap();
        for index in 0..g.len() {
            let u = unravel(&shape, index);
            let cu = s.cost_at(&u).unwrap();
            // 不存在可进一步松弛的边.
            for v in g.neighbours(&u) {
                let arc = cost.arc_cost(im[u.as_slice()], im[v.as_slice()]);
                assert!(s.cost_at(&v).unwrap() <= cu + arc + 1e-9);
            }
            // 代价恰好沿前驱累积, 归属沿前驱继承.
            let pred = s.preds()[u.as_slice()];
            if pred == NO_ROOT {
                assert_eq!(cu, 0.0);
                assert_eq!(sd[u.as_slice()], s.labels()[u.as_slice()]);
            } else {
                let p = unravel(&shape, pred);
                let arc = cost.arc_cost(im[p.as_slice()], im[u.as_slice()]);
                assert!((s.cost_at(&p).unwrap() + arc - cu).abs() < 1e-9);
                assert_eq!(s.roots()[p.as_slice()], s.roots()[u.as_slice()]);
            }
        }
    }

    #[test]
    fn test_seed_fixed_points() {
        // 相邻的不同标签种子, 以及共享同一标签的两个分量.
        let im = image(&[2, 4], vec![9.0, 0.0, 3.0, 7.0, 1.0, 8.0, 2.0, 5.0]);
        let sd = seeds(&[2, 4], vec![1, 2, 0, 1, 0, 0, 3, 0]);
        let s = segment(im.view(), sd.view(), &params(0.8)).unwrap();
        for (index, &l) in sd.iter().enumerate().filter(|(_, &l)| l != 0) {
            let coord = unravel(&[2, 4], index);
            assert_eq!(s.labels()[coord.as_slice()], l);
            assert_eq!(s.cost_at(&coord), Some(0.0));
            assert_eq!(s.root_at(&coord), Some(coord.clone()));
            assert_eq!(s.path_to(&coord), vec![coord]);
        }
    }

    #[test]
    fn test_no_seeds_all_background() {
        let shape = [4, 5, 3];
        let im = Lcg(3).image(&shape);
        let sd = ArrayD::<u32>::zeros(IxDyn(&shape));
        let p = SegmentParams {
            output: OutputSpec::with_background(5),
            ..Default::default()
        };
        let s = segment(im.view(), sd.view(), &p).unwrap();
        assert!(s.labels().iter().all(|&l| l == 5));
        assert!(s.costs().iter().all(|c| c.is_infinite()));
        assert_eq!(s.settled(), 0);
        assert_eq!(s.unreached(), 60);
    }

    #[test]
    fn test_unreachable_elements_are_background() {
        // 只向右的有向邻接: 种子左侧永远到达不了.
        let im = image(&[5], vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let sd = seeds(&[5], vec![0, 0, 3, 0, 0]);
        let conn = Connectivity::from_offsets(1, [vec![1]]).unwrap();
        let s = segment_with(
            im.view(),
            sd.view(),
            &conn,
            &OrientedCost::symmetric(),
            &OutputSpec::with_background(7),
            None,
        )
        .unwrap();
        assert_eq!(labels_of(&s), [7, 7, 3, 3, 3]);
        assert_eq!(s.unreached(), 2);
        assert_eq!(s.root_at(&[0]), None);
        assert_eq!(s.root_at(&[4]), Some(vec![2]));
        assert!(s.path_to(&[1]).is_empty());
        assert_eq!(s.path_to(&[4]), vec![vec![2], vec![3], vec![4]]);
        assert_eq!(s.cost_at(&[4]), Some(2.0));
        assert_eq!(s.cost_at(&[5]), None);
    }

    #[test]
    fn test_orientation_flip_changes_owner() {
        // 每行 [亮, 亮, 中, 暗, 暗], 左列种子 1, 右列种子 2.
        let row = [100.0, 100.0, 50.0, 0.0, 0.0];
        let im = image(&[3, 5], row.repeat(3));
        let sd = seeds(&[3, 5], [1, 0, 0, 0, 2].repeat(3));

        let darker = segment(im.view(), sd.view(), &params(-0.5)).unwrap();
        let brighter = segment(im.view(), sd.view(), &params(0.5)).unwrap();
        for h in 0..3 {
            // 亮 -> 暗更便宜: 亮侧种子越过边缘.
            assert_eq!(darker.labels()[[h, 2].as_slice()], 1);
            // 暗 -> 亮更便宜: 暗侧种子越过边缘.
            assert_eq!(brighter.labels()[[h, 2].as_slice()], 2);
            for s in [&darker, &brighter] {
                assert_eq!(s.labels()[[h, 1].as_slice()], 1);
                assert_eq!(s.labels()[[h, 3].as_slice()], 2);
            }
        }
        assert_eq!(darker.cost_at(&[0, 2]), Some(25.0));
        assert_eq!(brighter.cost_at(&[0, 2]), Some(25.0));
    }

    #[test]
    fn test_3d_full_connectivity() {
        let shape = [4, 4, 4];
        let im = Lcg(11).image(&shape);
        let mut sd = ArrayD::<u32>::zeros(IxDyn(&shape));
        sd[[0, 0, 0].as_slice()] = 1;
        sd[[3, 3, 3].as_slice()] = 2;
        let p = SegmentParams {
            connectivity: ConnectivityKind::Full,
            ..Default::default()
        };
        let s = segment(im.view(), sd.view(), &p).unwrap();
        assert_eq!(s.settled(), 64);
        assert!(s.labels().iter().all(|&l| l == 1 || l == 2));
        assert_eq!(s.labels()[[0, 0, 0].as_slice()], 1);
        assert_eq!(s.labels()[[3, 3, 3].as_slice()], 2);
    }

    #[test]
    fn test_background_seed_mapping() {
        let im = image(&[5], vec![0.0, 10.0, 10.0, 0.0, 0.0]);
        let sd = seeds(&[5], vec![1, 0, 0, 0, 2]);
        let p = SegmentParams {
            alpha: 0.0,
            output: OutputSpec::default().background_seed(1),
            ..Default::default()
        };
        let s = segment(im.view(), sd.view(), &p).unwrap();
        assert_eq!(labels_of(&s), [0, 0, 2, 2, 2]);
    }

    #[test]
    fn test_transform_is_applied() {
        let im = image(&[4], vec![0.0, 1000.0, 5000.0, 5000.0]);
        let sd = seeds(&[4], vec![1, 0, 0, 2]);
        let raw = segment(im.view(), sd.view(), &params(0.0)).unwrap();
        assert_eq!(labels_of(&raw), [1, 1, 2, 2]);

        let p = SegmentParams {
            alpha: 0.0,
            transform: Some(IntensityTransform::from_display_default()),
            ..Default::default()
        };
        let clipped = segment(im.view(), sd.view(), &p).unwrap();
        assert_eq!(labels_of(&clipped), [1, 2, 2, 2]);
        // 原图不被修改.
        assert_eq!(im[[2].as_slice()], 5000.0);
    }

    #[test]
    fn test_precondition_errors() {
        let im = ArrayD::<f64>::zeros(IxDyn(&[2, 3]));
        let sd = ArrayD::<u32>::zeros(IxDyn(&[3, 2]));
        assert_eq!(
            segment(im.view(), sd.view(), &params(0.0)).unwrap_err(),
            SegmentError::ShapeMismatch(vec![2, 3], vec![3, 2])
        );

        let sd = ArrayD::<u32>::zeros(IxDyn(&[2, 3]));
        assert_eq!(
            segment(im.view(), sd.view(), &params(2.0)).unwrap_err(),
            SegmentError::AlphaOutOfRange(2.0)
        );
    }

    #[test]
    fn test_invalid_arc_cost_reported() {
        let im = image(&[3], vec![2.0, 1.0, 0.0]);
        let sd = seeds(&[3], vec![1, 0, 0]);
        let conn = Connectivity::axial(1).unwrap();
        let signed = |a: f64, b: f64| b - a;
        let e = segment_with(
            im.view(),
            sd.view(),
            &conn,
            &signed,
            &OutputSpec::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(
            e,
            SegmentError::InvalidArcCost {
                from: 2.0,
                to: 1.0,
                cost: -1.0
            }
        );

        let nan = image(&[3], vec![2.0, f64::NAN, 0.0]);
        let e = segment(nan.view(), sd.view(), &params(0.0)).unwrap_err();
        assert!(matches!(e, SegmentError::InvalidArcCost { .. }));
    }

    #[test]
    fn test_cancelled_before_start() {
        let im = ArrayD::<f64>::zeros(IxDyn(&[8, 8]));
        let sd = seeds(&[8, 8], (0..64).map(|i| (i % 2) as u32).collect());
        let token = CancelToken::new();
        token.cancel();
        let e = segment_cancellable(im.view(), sd.view(), &params(0.0), &token).unwrap_err();
        assert_eq!(e, SegmentError::Cancelled);
    }

    #[test]
    fn test_cancelled_mid_run() {
        let im = ArrayD::from_shape_fn(IxDyn(&[80, 80]), |ix| {
            ((ix[0] * 31 + ix[1] * 17) % 13) as f64
        });
        let mut sd = ArrayD::<u32>::zeros(IxDyn(&[80, 80]));
        sd[[40, 40].as_slice()] = 1;
        let conn = Connectivity::axial(2).unwrap();
        let spec = OutputSpec::default();

        let token = CancelToken::new();
        let calls = Cell::new(0usize);
        let cancelling = |a: f64, b: f64| {
            calls.set(calls.get() + 1);
            if calls.get() == 10 {
                token.cancel();
            }
            (b - a).abs()
        };
        let e = segment_with(im.view(), sd.view(), &conn, &cancelling, &spec, Some(&token))
            .unwrap_err();
        assert_eq!(e, SegmentError::Cancelled);
        // 下一个检查点之前至多松弛 CANCEL_CHECK_INTERVAL 个元素的邻居.
        assert!(calls.get() > 10);
        assert!(calls.get() <= 4 * CANCEL_CHECK_INTERVAL);

        let plain = |a: f64, b: f64| (b - a).abs();
        let fresh = CancelToken::new();
        let s = segment_with(im.view(), sd.view(), &conn, &plain, &spec, Some(&fresh)).unwrap();
        assert!(s.settled() > CANCEL_CHECK_INTERVAL);
        assert_eq!(s.settled(), 6400);
    }

    #[test]
    fn test_path_follows_cheapest_route() {
        let im = image(&[5], vec![0.0, 10.0, 10.0, 0.0, 0.0]);
        let sd = seeds(&[5], vec![1, 0, 0, 0, 2]);
        let s = segment(im.view(), sd.view(), &params(0.0)).unwrap();
        let path = s.path_to(&[2]);
        assert_eq!(path, vec![vec![4], vec![3], vec![2]]);
        let costs: Vec<f64> = path.iter().map(|c| s.cost_at(c).unwrap()).collect();
        assert!(costs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_empty_image() {
        let im = ArrayD::<f64>::zeros(IxDyn(&[0, 3]));
        let sd = ArrayD::<u32>::zeros(IxDyn(&[0, 3]));
        let s = segment(im.view(), sd.view(), &params(0.0)).unwrap();
        assert_eq!(s.labels().shape(), &[0, 3]);
        assert_eq!(s.settled(), 0);
    }

    #[test]
    fn test_unravel() {
        assert_eq!(unravel(&[3, 4, 5], 33), vec![1, 2, 3]);
        assert_eq!(unravel(&[7], 6), vec![6]);
    }
}
