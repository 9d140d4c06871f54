//! 目录级图像加载器.

use super::{open_image, FileError, FileFormat};
use ndarray::ArrayD;
use std::fs;
use std::path::{Path, PathBuf};

/// 创建 `dir` 下所有可识别图像文件的加载器, 按文件名排序.
///
/// 不递归子目录. 无法识别格式的文件被忽略.
pub fn image_dir<P: AsRef<Path>>(dir: P) -> std::io::Result<ImageDir> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && FileFormat::of(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort_unstable();
    paths.reverse();
    Ok(ImageDir { paths_rev: paths })
}

/// 图像加载器. 迭代时才真正读取文件.
pub struct ImageDir {
    paths_rev: Vec<PathBuf>,
}

impl ImageDir {
    /// 尚未加载的文件路径, 按加载顺序的逆序排列.
    #[inline]
    pub fn pending(&self) -> &[PathBuf] {
        &self.paths_rev
    }
}

impl Iterator for ImageDir {
    type Item = (PathBuf, Result<ArrayD<f64>, FileError>);

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths_rev.pop()?;
        let data = open_image(&path);
        Some((path, data))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.paths_rev.len(), Some(self.paths_rev.len()))
    }
}

impl ExactSizeIterator for ImageDir {
    #[inline]
    fn len(&self) -> usize {
        self.paths_rev.len()
    }
}
