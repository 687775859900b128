use anyhow::{Context, Result};
use bibenrich_core::{run, EnrichOptions};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "bibenrich", version, about = "Add 'oldbibtex' strings to a JSON list by looking up keys in a .bib file")]
struct Cli {
    /// 输入 JSON（对象数组）
    json_in: PathBuf,

    /// .bib 文件
    bib_file: PathBuf,

    /// 输出 JSON（存在则覆盖）
    json_out: PathBuf,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    info!(input = ?cli.json_in, bibliography = ?cli.bib_file, output = ?cli.json_out, "starting enrichment");
    let opts = EnrichOptions::new(cli.json_in, cli.bib_file, cli.json_out);
    let stats = run(&opts).context("enrichment failed")?;

    // 汇总行写 stdout，日志走 stderr
    println!("{stats}");
    info!(total = stats.total, matched = stats.matched, missing = stats.missing, "enrichment finished");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
