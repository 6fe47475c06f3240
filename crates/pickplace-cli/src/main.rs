//! Pick-and-place demo binary.
//!
//! One long-running process: builds a tree, brings up the simulated
//! backend, prints the tree outline, then ticks at a fixed period until
//! interrupted (or for `--ticks` cycles in scripted runs).

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use pickplace_bt::BtPolicy;
use pickplace_core::{Runner, TickContext};
use pickplace_demo::tree::{demo_tree, staged_tree};
use pickplace_demo::{DemoConfig, SimWorld};
use pickplace_tools::{TraceEvent, TraceSink, TRACE_SINK};

#[derive(Parser)]
#[command(name = "pickplace")]
#[command(about = "Scan, grasp, and drop demo", version)]
struct Cli {
    /// Demo configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured tick period, in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Use the operator-paced staged tree instead of the reactive one
    #[arg(long)]
    staged: bool,

    /// Grant progression triggers automatically
    #[arg(long)]
    auto: bool,

    /// Stop after this many ticks (0 runs until interrupted)
    #[arg(long, default_value = "0")]
    ticks: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Streams goal lifecycle events into the process log.
struct LogSink;

impl TraceSink for LogSink {
    fn emit(&mut self, event: TraceEvent) {
        tracing::debug!(
            tick = event.tick,
            tag = %event.tag,
            action = event.action.as_deref(),
            goal = event.goal,
            "Goal event"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = DemoConfig::load_or_default(cli.config.as_deref())?;
    if let Some(period_ms) = cli.period_ms {
        config.tick_period_ms = period_ms;
    }

    run_demo(&config, cli.staged, cli.auto, cli.ticks).await
}

async fn run_demo(config: &DemoConfig, staged: bool, auto: bool, ticks: u64) -> Result<()> {
    let (root, outline) = if staged {
        staged_tree::<SimWorld>(config)
    } else {
        demo_tree::<SimWorld>(config)
    };

    let mut world = SimWorld::new(config);
    world.set_auto_proceed(auto);

    tracing::info!(
        timeout_ms = config.setup_timeout_ms,
        "Waiting for action servers"
    );
    world.wait_for_servers(config.setup_timeout())?;

    println!("{outline}");

    if !auto {
        tracing::info!("The simulated backend has no trigger input; pass --auto to progress");
    }

    let mut runner = Runner::new(Box::new(BtPolicy::new(root)));
    runner
        .blackboard
        .set(TRACE_SINK, Box::new(LogSink) as Box<dyn TraceSink>);
    let mut interval = tokio::time::interval(config.tick_period());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tracing::info!(period_ms = config.tick_period_ms, auto, "Demo loop started");

    let mut tick: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                world.step();
                let ctx = TickContext {
                    tick,
                    period_seconds: config.tick_period().as_secs_f32(),
                };
                runner.tick(&ctx, &mut world);
                tick += 1;

                if ticks > 0 && tick >= ticks {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("Interrupt received");
                break;
            }
        }
    }

    tracing::info!(ticks = tick, "Demo stopped");
    Ok(())
}
