//! 程序运行函数.

use crate::cli::Cli;
use crate::session::ViewState;
use anyhow::Context;
use ndarray::ArrayD;
use seg_berry::consts::UNLABELED;
use seg_berry::io::{self, FileError};
use seg_berry::label::OutputSpec;
use seg_berry::worker::{LabelSink, SegmentRequest, SegmentWorker};
use seg_berry::SegmentParams;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SEP: &str = "--------------------------------------------------------";

/// 一次会话的统计.
#[derive(Debug, Default)]
pub struct Summary {
    images: usize,
    seeded: usize,
    failed: Vec<PathBuf>,
}

impl Summary {
    /// 打印统计结果.
    pub fn print(&self) {
        const S4: &str = "    ";

        println!("{SEP}");
        println!("Session summary:");
        println!("{S4}Images: {}", self.images);
        println!("{S4}Seeded: {}", self.seeded);
        println!("{S4}Failed: {}", self.failed.len());
        for p in self.failed.iter() {
            println!("{S4}{S4}{}", p.display());
        }
        println!("{SEP}");
    }
}

/// 由命令行参数构造分割参数. 强度变换取自显示状态.
fn params_of(cli: &Cli, view: &ViewState) -> anyhow::Result<SegmentParams> {
    let transform = if cli.no_transform {
        None
    } else {
        Some(view.transform().with_context(|| format!("非法的显示设置: {view:?}"))?)
    };
    let mut output = OutputSpec::with_background(cli.background);
    if cli.background_seed != UNLABELED {
        output = output.background_seed(cli.background_seed);
    }
    let params = SegmentParams {
        alpha: cli.alpha,
        connectivity: cli.connectivity.into(),
        output,
        transform,
    };
    params.validate()?;
    Ok(params)
}

/// 实际运行.
pub fn run(cli: &Cli) -> anyhow::Result<Summary> {
    let (im_dir, mk_dir, lb_dir) = cli.dirs().context("无法确定用户主目录")?;
    for d in [&mk_dir, &lb_dir] {
        fs::create_dir_all(d).with_context(|| format!("创建目录 {} 失败", d.display()))?;
    }

    let view = ViewState::load(&lb_dir).unwrap_or_default().with_overrides(
        cli.contrast_min,
        cli.contrast_max,
        cli.gamma,
    );
    let params = params_of(cli, &view)?;
    log::debug!("Parameters: {params:?}");

    let loader = io::image_dir(&im_dir)
        .with_context(|| format!("读取目录 {} 失败", im_dir.display()))?;
    log::info!("{} images under {}", loader.len(), im_dir.display());

    let mut worker = SegmentWorker::spawn(Arc::new(LabelSink::new()))?;
    let mut summary = Summary::default();
    for (path, image) in loader {
        summary.images += 1;
        let dirs = (mk_dir.as_path(), lb_dir.as_path());
        match segment_one(&mut worker, &path, image, dirs, params) {
            Ok(true) => summary.seeded += 1,
            Ok(false) => log::info!("{}: no seeds yet", path.display()),
            Err(e) => {
                log::error!("{}: {e:#}", path.display());
                summary.failed.push(path);
            }
        }
    }

    view.store(&lb_dir)?;
    Ok(summary)
}

/// 处理单张图像. 返回种子图中是否有种子.
fn segment_one(
    worker: &mut SegmentWorker,
    path: &Path,
    image: Result<ArrayD<f64>, FileError>,
    (mk_dir, lb_dir): (&Path, &Path),
    params: SegmentParams,
) -> anyhow::Result<bool> {
    let image = image.context("读取图像失败")?;
    let mk_path = io::output_path(mk_dir, path).context("文件名不是合法的 UTF-8")?;
    let lb_path = io::output_path(lb_dir, path).context("文件名不是合法的 UTF-8")?;

    let seeds = if mk_path.is_file() {
        io::open_seeds(&mk_path)
            .with_context(|| format!("读取种子图 {} 失败", mk_path.display()))?
    } else {
        ArrayD::zeros(image.raw_dim())
    };
    let seeded = seeds.iter().any(|&s| s != UNLABELED);

    let request = SegmentRequest::new(Arc::new(image), Arc::new(seeds), params)?;
    let labels = worker.run_blocking(request.clone())?;

    io::save_npy(&lb_path, &*labels)?;
    io::save_npy(&mk_path, &**request.seeds())?;
    Ok(seeded)
}
