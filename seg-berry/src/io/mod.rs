//! 文件读写: 打开待分割图像, 读写种子图与标签图.
//!
//! 支持的图像格式:
//!
//! 1. `.nii` / `.nii.gz`: 按 nifti 读取. nifti 数据以 `[x, y, z]` 顺序存储,
//!   读入后转置为行优先的 `[z, y, x]`.
//! 2. `.npy`: 任意常见数值 dtype, 统一转换为 `f64`.
//! 3. 其余光栅格式 (`.tif`, `.png`, ...): 按 2D 灰度图读取.
//!   8/16 位灰度图保留原始数值, 其它像素格式转换为 16 位灰度.

mod loader;

pub use loader::{image_dir, ImageDir};

use image::{DynamicImage, ImageBuffer, Luma, Primitive};
use ndarray::{Array2, ArrayD};
use ndarray_npy::{read_npy, write_npy, ReadNpyError, WritableElement, WriteNpyError};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use num::ToPrimitive;
use std::fmt::{self, Formatter};
use std::path::{Path, PathBuf};

/// 可识别的光栅图像扩展名 (小写).
pub const RASTER_EXTENSIONS: [&str; 7] = ["tif", "tiff", "png", "jpg", "jpeg", "bmp", "pgm"];

/// 文件读写错误.
#[derive(Debug)]
pub enum FileError {
    /// 光栅图像解码失败.
    Image(image::ImageError),
    /// nifti 文件读取失败.
    Nifti(nifti::NiftiError),
    /// npy 文件读取失败.
    ReadNpy(ReadNpyError),
    /// npy 文件写入失败.
    WriteNpy(WriteNpyError),
    /// 其它 IO 错误.
    Io(std::io::Error),
    /// 无法识别的文件格式或 dtype.
    UnsupportedFormat(PathBuf),
    /// 种子图包含负数或非整数值.
    InvalidSeed(PathBuf),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Image(e) => write!(f, "图像解码失败: {e}"),
            FileError::Nifti(e) => write!(f, "nifti 读取失败: {e}"),
            FileError::ReadNpy(e) => write!(f, "npy 读取失败: {e}"),
            FileError::WriteNpy(e) => write!(f, "npy 写入失败: {e}"),
            FileError::Io(e) => write!(f, "IO 错误: {e}"),
            FileError::UnsupportedFormat(p) => write!(f, "不支持的文件格式: {}", p.display()),
            FileError::InvalidSeed(p) => {
                write!(f, "种子图含有负数或非整数值: {}", p.display())
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Image(e) => Some(e),
            FileError::Nifti(e) => Some(e),
            FileError::ReadNpy(e) => Some(e),
            FileError::WriteNpy(e) => Some(e),
            FileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for FileError {
    fn from(e: image::ImageError) -> Self {
        FileError::Image(e)
    }
}

impl From<nifti::NiftiError> for FileError {
    fn from(e: nifti::NiftiError) -> Self {
        FileError::Nifti(e)
    }
}

impl From<ReadNpyError> for FileError {
    fn from(e: ReadNpyError) -> Self {
        FileError::ReadNpy(e)
    }
}

impl From<WriteNpyError> for FileError {
    fn from(e: WriteNpyError) -> Self {
        FileError::WriteNpy(e)
    }
}

impl From<std::io::Error> for FileError {
    fn from(e: std::io::Error) -> Self {
        FileError::Io(e)
    }
}

/// 文件格式.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FileFormat {
    /// `.nii` 或 `.nii.gz`.
    Nifti,
    /// `.npy`.
    Npy,
    /// [`RASTER_EXTENSIONS`] 中的光栅格式.
    Raster,
}

impl FileFormat {
    /// 根据文件名判断格式 (大小写不敏感).
    pub fn of(path: &Path) -> Option<FileFormat> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".nii") || name.ends_with(".nii.gz") {
            return Some(FileFormat::Nifti);
        }
        let (_, ext) = name.rsplit_once('.')?;
        if ext == "npy" {
            Some(FileFormat::Npy)
        } else if RASTER_EXTENSIONS.contains(&ext) {
            Some(FileFormat::Raster)
        } else {
            None
        }
    }
}

/// 输入文件对应的输出路径 `dir/<文件名>.npy`.
///
/// 保留完整文件名 (含扩展名), 因此同一目录下主干相同的输入 (如 `a.png` 与
/// `a.npy`) 不会共用输出文件. 文件名不是合法 UTF-8 时返回 `None`.
pub fn output_path<P: AsRef<Path>>(dir: P, input: &Path) -> Option<PathBuf> {
    let name = input.file_name()?.to_str()?;
    Some(dir.as_ref().join(format!("{name}.npy")))
}

/// 分割数据的缺省位置: `{用户主目录}/dataset/<parts..>`. 无法确定用户主目录时返回 `None`.
pub fn home_dataset_dir_with<P, I>(parts: I) -> Option<PathBuf>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = P>,
{
    let mut dir = dirs::home_dir()?.join("dataset");
    dir.extend(parts);
    Some(dir)
}

/// 逐个尝试以给定元素类型读取 npy 文件, 第一个 dtype 吻合的类型胜出,
/// 然后以 `ToPrimitive::$conv` 逐元素转换. 任一元素转换失败时得到 `Ok(None)`.
macro_rules! read_npy_as {
    ($path: expr, $conv: ident, [$($t: ty),+ $(,)?]) => {{
        let path: &Path = $path;
        'decode: {
            $(
                match read_npy::<_, ArrayD<$t>>(path) {
                    Ok(a) => break 'decode Ok(convert(&a, |v| v.$conv())),
                    Err(ReadNpyError::WrongDescriptor(_)) => {}
                    Err(e) => break 'decode Err(FileError::from(e)),
                }
            )+
            Err(FileError::UnsupportedFormat(path.to_owned()))
        }
    }};
}

fn convert<T: Copy, U>(a: &ArrayD<T>, op: impl Fn(T) -> Option<U>) -> Option<ArrayD<U>> {
    let data = a.iter().map(|&v| op(v)).collect::<Option<Vec<U>>>()?;
    ArrayD::from_shape_vec(a.raw_dim(), data).ok()
}

/// 打开待分割图像.
pub fn open_image<P: AsRef<Path>>(path: P) -> Result<ArrayD<f64>, FileError> {
    let path = path.as_ref();
    match FileFormat::of(path) {
        Some(FileFormat::Nifti) => open_nifti(path),
        Some(FileFormat::Npy) => {
            read_npy_as!(path, to_f64, [f64, f32, u8, u16, u32, u64, i8, i16, i32, i64])?
                .ok_or_else(|| FileError::UnsupportedFormat(path.to_owned()))
        }
        Some(FileFormat::Raster) => open_raster(path),
        None => Err(FileError::UnsupportedFormat(path.to_owned())),
    }
}

/// 打开种子图. `0` 表示无种子.
///
/// npy 文件须为整数 dtype; 光栅或 nifti 文件的值须为非负整数.
pub fn open_seeds<P: AsRef<Path>>(path: P) -> Result<ArrayD<u32>, FileError> {
    let path = path.as_ref();
    let seeds = match FileFormat::of(path) {
        Some(FileFormat::Npy) => {
            read_npy_as!(path, to_u32, [u32, u8, u16, u64, i8, i16, i32, i64])?
        }
        Some(_) => {
            let data = open_image(path)?;
            convert(&data, |v| if v.fract() == 0.0 { v.to_u32() } else { None })
        }
        None => return Err(FileError::UnsupportedFormat(path.to_owned())),
    };
    seeds.ok_or_else(|| FileError::InvalidSeed(path.to_owned()))
}

/// 以 npy 格式保存数组.
pub fn save_npy<P: AsRef<Path>, T: WritableElement>(
    path: P,
    data: &ArrayD<T>,
) -> Result<(), FileError> {
    write_npy(path, data)?;
    Ok(())
}

fn open_nifti(path: &Path) -> Result<ArrayD<f64>, FileError> {
    let obj = ReaderOptions::new().read_file(path)?;
    let data = obj.into_volume().into_ndarray::<f64>()?.reversed_axes();
    Ok(data.as_standard_layout().into_owned())
}

fn open_raster(path: &Path) -> Result<ArrayD<f64>, FileError> {
    let data = match image::open(path)? {
        DynamicImage::ImageLuma8(buf) => gray_to_array(&buf),
        DynamicImage::ImageLuma16(buf) => gray_to_array(&buf),
        other => gray_to_array(&other.into_luma16()),
    };
    Ok(data.into_dyn())
}

fn gray_to_array<T: Primitive + Into<f64>>(buf: &ImageBuffer<Luma<T>, Vec<T>>) -> Array2<f64> {
    let (w, h) = buf.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(r, c)| {
        buf.get_pixel(c as u32, r as u32).0[0].into()
    })
}
