//! 隐式 N 维网格图. 节点是像素/体素, 边由相对偏移集合按需给出, 从不显式存储.

mod graph;
mod offsets;

pub use graph::GridGraph;
pub use offsets::{Connectivity, ConnectivityError, ConnectivityKind};
