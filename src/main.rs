use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use indicatif::{HumanDuration, ProgressBar};
use progress_speed::{
    progress::{speed_style, DEFAULT_TEMPLATE},
    NumberFormat, ProgressSnapshot, SpeedConfig, TimeUnit, UnitScale,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[derive(Parser)]
#[command(name = "progress-speed")]
#[command(about = "Dynamic speed units for terminal progress bars", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Args)]
struct FormatOptions {
    /// Time unit of the speed (seconds, minutes, hours, days)
    #[arg(short, long)]
    unit: Option<TimeUnit>,

    /// Magnitude ladder (binary, decimal, counts)
    #[arg(long)]
    scale: Option<UnitScale>,

    /// Render exactly this many fraction digits
    #[arg(short, long)]
    decimals: Option<usize>,

    /// JSON config file; flags override its values
    #[arg(long, env = "PROGRESS_SPEED_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Format the speed of a single progress snapshot
    Format {
        /// Current progress value
        #[arg(short, long, allow_hyphen_values = true)]
        current: i64,

        /// Progress value when counting started
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        start: i64,

        /// Elapsed time in whole seconds
        #[arg(short, long)]
        elapsed: u64,

        #[command(flatten)]
        options: FormatOptions,
    },

    /// Drive a progress bar showing the dynamic speed
    Simulate {
        /// Total amount of progress to simulate
        #[arg(short, long)]
        total: u64,

        /// Progress added per tick
        #[arg(long, default_value_t = 256 * 1024)]
        step: u64,

        /// Milliseconds between ticks
        #[arg(long, default_value_t = 100)]
        tick_ms: u64,

        #[command(flatten)]
        options: FormatOptions,
    },
}

fn load_config(options: &FormatOptions) -> anyhow::Result<SpeedConfig> {
    let mut config = match &options.config {
        Some(path) => SpeedConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SpeedConfig::default(),
    };

    if let Some(unit) = options.unit {
        config.time_unit = Some(unit);
    }
    if let Some(scale) = options.scale {
        config.scale = scale;
    }
    if let Some(decimals) = options.decimals {
        config.number_format = NumberFormat::fixed(decimals);
    }

    debug!("Resolved config: {:?}", config);
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Format {
            current,
            start,
            elapsed,
            options,
        } => {
            let formatter = load_config(&options)?.build()?;
            let speed = formatter.format(
                ProgressSnapshot::new(current, start),
                Duration::from_secs(elapsed),
            );
            println!("{speed}");
        }

        Commands::Simulate {
            total,
            step,
            tick_ms,
            options,
        } => {
            if step == 0 {
                bail!("--step must be greater than zero");
            }

            let formatter = load_config(&options)?.build()?;
            info!("Simulating {} units in steps of {}", total, step);

            let bar = ProgressBar::new(total);
            bar.set_style(speed_style(DEFAULT_TEMPLATE, formatter, 0)?);

            let started = Instant::now();
            let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));
            while bar.position() < total {
                ticker.tick().await;
                bar.inc(step.min(total - bar.position()));
            }
            bar.finish();

            info!(
                "Simulation finished in {}",
                HumanDuration(started.elapsed())
            );
        }
    }

    Ok(())
}
