//! 库私有的 `rayon` 线程池.
//!
//! 线程池在首次使用时创建. 创建失败 (例如虚拟内存受限时无法启动线程)
//! 不会 panic, 调用方退回串行实现.

use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::OnceLock;

static POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

/// 获取线程池. 无法创建时返回 `None`.
pub(crate) fn pool() -> Option<&'static ThreadPool> {
    POOL.get_or_init(|| {
        match ThreadPoolBuilder::new()
            .thread_name(|i| format!("seg-berry-{i}"))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("Cannot start thread pool, falling back to serial: {e}");
                None
            }
        }
    })
    .as_ref()
}
