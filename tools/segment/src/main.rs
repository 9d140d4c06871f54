//! 批量交互分割会话: 对目录下每张图像读取种子, 运行分割, 写回标签与种子.

mod cli;
mod runner;
mod session;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).init()?;

    let summary = runner::run(&cli)?;
    summary.print();
    Ok(())
}
