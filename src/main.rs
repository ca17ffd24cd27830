mod app;
mod terminal;

use clap::Parser;
use std::process::ExitCode;
use treeglow::config::{CliOptions, TreeConfig};
use treeglow::settings::Settings;

#[derive(Parser)]
#[command(name = "treeglow")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal generative art: a growing tree with baubles, lights and presents", long_about = None)]
struct Cli {
    /// Decoration colours, comma-separated hex without '#' (e.g. ff0000,ffffff)
    #[arg(short, long)]
    palette: Option<String>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Animation step delay in seconds
    #[arg(short, long, default_value = "0.03")]
    time: f32,

    /// Print the tree to stdout after simulating --frames frames (no interactive display)
    #[arg(long)]
    print: bool,

    /// Frames simulated in print mode
    #[arg(short, long, default_value = "400")]
    frames: u32,

    /// Stop growing once the growth counter reaches this value
    #[arg(short = 'g', long)]
    growth_limit: Option<f64>,

    /// Bauble and light size multiplier
    #[arg(short, long)]
    decoration_scale: Option<f64>,

    /// Branch width multiplier
    #[arg(short, long)]
    line_scale: Option<f64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let options = CliOptions {
        print: cli.print,
        time_step: cli.time,
        frames: cli.frames,
        palette: cli.palette,
        seed: cli.seed,
        growth_limit: cli.growth_limit,
        decoration_scale: cli.decoration_scale,
        line_scale: cli.line_scale,
    };

    let result = TreeConfig::resolve(options, &Settings::load()).and_then(app::run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("treeglow: {err}");
            ExitCode::FAILURE
        }
    }
}
