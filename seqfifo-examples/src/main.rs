mod cycle;
mod traffic;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use seqfifo_std::{Arbitration, LfsrConfig, QueueConfig};

#[derive(Parser)]
#[command(name = "seqfifo-examples")]
#[command(about = "Drives sequence generators and the queue controller cycle by cycle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the state sequence of one generator
    Cycle {
        #[command(flatten)]
        lfsr: LfsrArgs,

        /// Maximum number of states to print
        #[arg(short, long, default_value_t = 32)]
        limit: usize,
    },

    /// Runs random traffic through the queue controller and checks FIFO order
    Traffic {
        #[command(flatten)]
        lfsr: LfsrArgs,

        /// Grant reads by fixed priority instead of round-robin
        #[arg(long)]
        fixed_priority: bool,

        /// Number of ticks to run
        #[arg(short, long, default_value_t = 10_000)]
        ticks: u64,

        /// Seed for traffic and memory backpressure
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Percentage of ticks in which a memory port is not ready
        #[arg(long, default_value_t = 0)]
        stall_percent: u32,
    },
}

#[derive(Args)]
struct LfsrArgs {
    /// Register width in bits (2..=32)
    #[arg(short, long, default_value_t = 4)]
    width: u32,

    /// Leave the all-ones lock-up state out of the cycle
    #[arg(long)]
    exclude_lockup: bool,

    /// Source state of the skip edge
    #[arg(long, requires = "skip_to", value_parser = parse_state)]
    skip_from: Option<u32>,

    /// Target state of the skip edge
    #[arg(long, requires = "skip_from", value_parser = parse_state)]
    skip_to: Option<u32>,

    /// Register value after reset
    #[arg(short, long, default_value = "0", value_parser = parse_state)]
    reset_state: u32,
}

impl LfsrArgs {
    fn config(&self) -> LfsrConfig {
        let config = LfsrConfig::new(self.width).include_lockup(!self.exclude_lockup).reset_state(self.reset_state);
        match (self.skip_from, self.skip_to) {
            (Some(from), Some(to)) => config.skip(from, to),
            _ => config,
        }
    }
}

/// Parses a state given in decimal, or in hex with a `0x` prefix.
fn parse_state(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|error| format!("invalid state '{}': {}", value, error))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Cycle { lfsr, limit } => {
            let config = lfsr.config();
            let states = cycle::run(config, limit).with_context(|| format!("invalid generator configuration {:?}", config))?;
            println!("{}", states);
        }
        Commands::Traffic { lfsr, fixed_priority, ticks, seed, stall_percent } => {
            let arbitration = if fixed_priority { Arbitration::FixedPriority } else { Arbitration::RoundRobin };
            let config = QueueConfig::new(lfsr.config()).arbitration(arbitration);
            let summary = traffic::run(config, ticks, seed, stall_percent)?;
            info!("traffic finished after {} ticks", ticks);
            println!("{}", summary);
        }
    }

    Ok(())
}
