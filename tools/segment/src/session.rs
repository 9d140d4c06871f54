//! 跨图像、跨会话保留的显示状态.

use anyhow::Context;
use seg_berry::consts::{DEFAULT_CONTRAST_HIGH, DEFAULT_CONTRAST_LOW, DEFAULT_GAMMA};
use seg_berry::preprocess::IntensityTransform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 对比度与 gamma. 从一张图像沿用到下一张, 并保存在标签目录下.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct ViewState {
    pub contrast_limits: (f64, f64),
    pub gamma: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            contrast_limits: (DEFAULT_CONTRAST_LOW, DEFAULT_CONTRAST_HIGH),
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl ViewState {
    const FILE_NAME: &'static str = "session.bin";

    fn file(dir: &Path) -> PathBuf {
        dir.join(Self::FILE_NAME)
    }

    /// 读取上次会话的状态. 文件不存在或损坏时返回 `None`.
    pub fn load(dir: &Path) -> Option<Self> {
        let bytes = fs::read(Self::file(dir)).ok()?;
        match bincode::deserialize(&bytes) {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!("Ignoring corrupted session file: {e}");
                None
            }
        }
    }

    /// 保存状态.
    pub fn store(&self, dir: &Path) -> anyhow::Result<()> {
        let path = Self::file(dir);
        let bytes = bincode::serialize(self)?;
        fs::write(&path, bytes).with_context(|| format!("写入 {} 失败", path.display()))
    }

    /// 以命令行给出的值覆盖.
    pub fn with_overrides(mut self, low: Option<f64>, high: Option<f64>, gamma: Option<f64>) -> Self {
        if let Some(low) = low {
            self.contrast_limits.0 = low;
        }
        if let Some(high) = high {
            self.contrast_limits.1 = high;
        }
        if let Some(gamma) = gamma {
            self.gamma = gamma;
        }
        self
    }

    /// 对应的强度变换. 参数非法时返回 `None`.
    #[inline]
    pub fn transform(&self) -> Option<IntensityTransform> {
        IntensityTransform::new(self.contrast_limits.0, self.contrast_limits.1, self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewState;
    use std::fs;

    #[test]
    fn test_store_and_load() {
        let dir = std::env::temp_dir().join(format!("segment-session-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(ViewState::load(&dir), None);
        let state = ViewState::default().with_overrides(Some(-100.0), None, Some(0.5));
        state.store(&dir).unwrap();
        assert_eq!(ViewState::load(&dir), Some(state));

        fs::write(dir.join("session.bin"), [1u8]).unwrap();
        assert_eq!(ViewState::load(&dir), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_transform() {
        let state = ViewState::default();
        assert_eq!(state.contrast_limits, (0.0, 1500.0));
        assert!(state.transform().is_some());
        let bad = state.with_overrides(Some(10.0), Some(5.0), None);
        assert!(bad.transform().is_none());
    }
}
