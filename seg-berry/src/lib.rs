#![warn(missing_docs)]

//! 核心库. 基于有向种子竞争 (oriented seed competition) 的交互式 N 维图像分割.
//!
//! 用户在图像上标记若干带标签的种子, 各种子按照 "有向" 路径代价同时向外扩张,
//! 每个元素最终归属于到达它代价最小的种子. 路径代价为沿途各弧代价之和;
//! 弧代价依赖于强度变化的方向, 因此由暗到亮与由亮到暗的代价不同.
//!
//! # 注意
//!
//! 1. 单次分割在调用线程上同步执行. 需要响应式交互时, 使用 [`worker::SegmentWorker`]
//!   在后台线程上运行, 新请求会取消旧请求.
//! 2. 结果是确定性的: 同样的输入总是得到同样的标签图, 代价相同时先入队者优先.
//!
//! # 开发计划
//!
//! ### 任意维度网格图与邻域定义 ✅
//!
//! 实现位于 `seg-berry/src/grid`.
//!
//! ### 有向弧代价 ✅
//!
//! 参数 `alpha ∈ [-1, 1]`, 取 `0` 时退化为对称代价.
//!
//! 实现位于 `seg-berry/src/cost.rs`.
//!
//! ### 多源最短路径森林传播 ✅
//!
//! 最小堆 + 惰性删除, 支持取消与可失败的内存分配.
//!
//! 实现位于 `seg-berry/src/engine`.
//!
//! ### 显示对比度 / gamma 预处理 ✅
//!
//! 实现位于 `seg-berry/src/preprocess.rs`.
//!
//! ### 后台运行与结果交接 ✅
//!
//! 实现位于 `seg-berry/src/worker.rs`.
//!
//! ### 文件读写 ✅
//!
//! nifti / npy / 常见光栅格式.
//!
//! 实现位于 `seg-berry/src/io`.
//!
//! ### 非网格图 (超像素邻接图等) ⌛️

pub mod consts;
pub mod cost;
pub mod engine;
mod error;
pub mod grid;
pub mod io;
pub mod label;
mod mem;
#[cfg(feature = "rayon")]
mod parallel;
pub mod params;
pub mod prelude;
pub mod preprocess;
pub mod worker;

pub use cost::{ArcCost, OrientedCost};
pub use engine::{segment, segment_cancellable, segment_with, Segmentation};
pub use error::SegmentError;
pub use params::SegmentParams;

/// 分割操作的返回类型.
pub type SegResult<T> = Result<T, SegmentError>;
