use std::collections::VecDeque;
use std::fmt;

use anyhow::{bail, ensure, Context, Result};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use seqfifo::{bits_to_u32, u32_to_bits, Handshake};
use seqfifo_std::{Backpressure, QueueConfig, Testbench};

/// Number of read requesters.
const READERS: usize = 3;

/// Transaction counts of one run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub writes: u64,
    pub reads: u64,
    pub retries: u64,
    pub stalls: u64,
    pub max_occupancy: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "writes {} reads {} retries {} stalls {} max occupancy {}",
            self.writes, self.reads, self.retries, self.stalls, self.max_occupancy
        )
    }
}

impl Summary {
    fn count(&mut self, handshake: Handshake) {
        match handshake {
            Handshake::Retry => self.retries += 1,
            Handshake::Stall => self.stalls += 1,
            Handshake::Idle | Handshake::Acknowledge => {}
        }
    }
}

/// Runs random traffic for `ticks` ticks and checks that every word comes back once, in order, to the requester
/// that was granted.
pub fn run(config: QueueConfig, ticks: u64, seed: u64, stall_percent: u32) -> Result<Summary> {
    let backpressure = Backpressure::Random { seed: seed.wrapping_add(1), stall_percent };
    let mut testbench = Testbench::<u32, READERS>::new(config, backpressure)
        .with_context(|| format!("invalid queue configuration {:?}", config))?;
    let queue = testbench.queue().fsm();
    let capacity = queue.capacity();
    info!("queue capacity {} ({:?} arbitration)", capacity, queue.arbitration());

    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut model = VecDeque::new();
    let mut pending = None;
    let mut next_word = 0u32;
    let mut summary = Summary::default();

    for tick in 0..ticks {
        let write = rng.gen_bool(0.5).then_some(next_word);
        let read = u32_to_bits::<READERS>(rng.gen_range(0..1 << READERS));
        let output = testbench.tick(write, read);

        if output.read_data.into_option() != pending.take() {
            bail!("tick {}: read data {:?} does not match the expected response", tick, output.read_data);
        }

        summary.count(output.write);
        read.iter().zip(output.read.iter()).filter(|(request, _)| **request).for_each(|(_, handshake)| {
            summary.count(*handshake);
        });

        let granted = output.read.iter().position(|handshake| handshake.acknowledge());
        ensure!(
            output.read.iter().filter(|handshake| handshake.acknowledge()).count() <= 1,
            "tick {}: more than one read granted",
            tick
        );
        if let Some(requester) = granted {
            let word = model.pop_front().with_context(|| format!("tick {}: read granted on an empty queue", tick))?;
            pending = Some((requester, word));
            summary.reads += 1;
        }
        if output.write.acknowledge() {
            model.push_back(next_word);
            next_word = next_word.wrapping_add(1);
            summary.writes += 1;
        }
        ensure!((model.len() as u64) <= capacity, "tick {}: occupancy exceeds capacity", tick);
        summary.max_occupancy = summary.max_occupancy.max(model.len());
        debug!("tick {}: requests {:#05b} occupancy {}", tick, bits_to_u32(&read), model.len());
    }

    ensure!(testbench.memory().dropped() == 0, "commands were presented to a port that was not ready");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use seqfifo_std::{Arbitration, LfsrConfig};

    use super::*;

    #[test]
    fn random_traffic_passes() {
        for arbitration in [Arbitration::RoundRobin, Arbitration::FixedPriority] {
            let config = QueueConfig::new(LfsrConfig::new(3)).arbitration(arbitration);
            let summary = run(config, 2_000, 3, 25).unwrap();
            assert!(summary.writes > 0);
            assert!(summary.reads > 0);
            assert!(summary.max_occupancy <= 7);
        }
    }

    #[test]
    fn reports_configuration_error() {
        let error = run(QueueConfig::new(LfsrConfig::new(1)), 10, 0, 0).unwrap_err();
        assert!(error.to_string().starts_with("invalid queue configuration"));
    }
}
