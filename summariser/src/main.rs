use build_sweep_summariser::{summarise, SummariseOptions};
use clap::Parser;
use std::path::PathBuf;

/// Aggregate the run folders of an existing sweep and render its charts.
///
/// Works on partial sweeps too, only run folders with a time report are aggregated.
#[derive(Parser)]
#[command(about, long_about = None)]
struct SummariserCli {
    /// The sweep output folder, e.g. `../reports2021-09-03_12-08-25`.
    sweep_root: PathBuf,

    /// Skip rendering charts.
    #[arg(long, default_value = "false")]
    no_charts: bool,

    /// Where to write charts. Defaults to `charts` inside the sweep root.
    #[arg(long)]
    charts_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = SummariserCli::parse();
    log::debug!("Summarising {}", args.sweep_root.display());

    let output = summarise(
        &args.sweep_root,
        &SummariseOptions {
            no_charts: args.no_charts,
            charts_dir: args.charts_dir,
        },
    )?;

    log::info!(
        "Summarised {} runs into {}",
        output.table.rows().len(),
        output.table_path.display()
    );

    Ok(())
}
