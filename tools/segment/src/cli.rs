//! 命令行参数.

use clap::{Parser, ValueEnum};
use seg_berry::consts::{DEFAULT_ALPHA, DEFAULT_BACKGROUND, DEFAULT_BACKGROUND_SEED};
use seg_berry::grid::ConnectivityKind;
use seg_berry::io::home_dataset_dir_with;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "segment", version)]
#[command(about = "Run oriented seed competition on every image of a directory")]
pub struct Cli {
    /// 输入图像目录. 缺省为 `$HOME/dataset/segm/images`.
    #[arg(short = 'i', long, env = "SEG_BERRY_IM_DIR")]
    pub im_dir: Option<PathBuf>,

    /// 种子图目录. 缺省为 `$HOME/dataset/segm/markers`.
    #[arg(short = 'm', long, env = "SEG_BERRY_MK_DIR")]
    pub mk_dir: Option<PathBuf>,

    /// 标签图目录. 缺省为 `$HOME/dataset/segm/labels`.
    #[arg(short = 'l', long, env = "SEG_BERRY_LB_DIR")]
    pub lb_dir: Option<PathBuf>,

    /// 方向参数, 取值范围 `[-1, 1]`.
    #[arg(long, default_value_t = DEFAULT_ALPHA, allow_negative_numbers = true)]
    pub alpha: f64,

    /// 视为背景的种子标签. `0` 表示不做映射.
    #[arg(long, default_value_t = DEFAULT_BACKGROUND_SEED)]
    pub background_seed: u32,

    /// 背景标签值.
    #[arg(long, default_value_t = DEFAULT_BACKGROUND)]
    pub background: u32,

    /// 邻域类型.
    #[arg(long, value_enum, default_value_t = Neighbourhood::Axial)]
    pub connectivity: Neighbourhood,

    /// 直接在原始强度上计算弧代价.
    #[arg(long)]
    pub no_transform: bool,

    /// 对比度下限. 缺省沿用上次会话的值.
    #[arg(long, allow_negative_numbers = true)]
    pub contrast_min: Option<f64>,

    /// 对比度上限. 缺省沿用上次会话的值.
    #[arg(long, allow_negative_numbers = true)]
    pub contrast_max: Option<f64>,

    /// gamma 值. 缺省沿用上次会话的值.
    #[arg(long)]
    pub gamma: Option<f64>,

    /// 日志详细程度, 可重复.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// 图像、种子、标签三个目录. 无法确定用户主目录时返回 `None`.
    pub fn dirs(&self) -> Option<(PathBuf, PathBuf, PathBuf)> {
        let or_home = |d: &Option<PathBuf>, leaf: &str| match d {
            Some(d) => Some(d.clone()),
            None => home_dataset_dir_with(["segm", leaf]),
        };
        Some((
            or_home(&self.im_dir, "images")?,
            or_home(&self.mk_dir, "markers")?,
            or_home(&self.lb_dir, "labels")?,
        ))
    }
}

/// `--connectivity` 的取值. 与 [`ConnectivityKind`] 一一对应;
/// 核心库不依赖 `clap`, 因此命令行一侧单独定义该类型.
#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Neighbourhood {
    /// 仅沿坐标轴的 `2n` 个邻居.
    Axial,
    /// 包含对角方向的 `3^n - 1` 个邻居.
    Full,
}

impl From<Neighbourhood> for ConnectivityKind {
    fn from(n: Neighbourhood) -> Self {
        match n {
            Neighbourhood::Axial => ConnectivityKind::Axial,
            Neighbourhood::Full => ConnectivityKind::Full,
        }
    }
}
