//! Behavioural two-port memory.

use std::collections::HashMap;

use log::warn;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use seqfifo::*;

use crate::fifo::MemReadPort;

/// Readiness of the memory ports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backpressure {
    /// Both ports are always ready.
    #[default]
    None,
    /// Each port is independently not ready with probability `stall_percent / 100` in every tick.
    Random {
        /// Seed.
        seed: u64,
        /// Percentage of not-ready ticks, `0..=100`.
        stall_percent: u32,
    },
}

/// Memory with a synchronous write port and a synchronous read port.
///
/// Words are stored sparsely, so the full 32-bit address space is usable. An unwritten word reads as
/// `V::default()`. The read port registers the addressed word at the tick edge and presents it during the next
/// tick, with no buffering beyond that register.
#[derive(Debug)]
pub struct SimMemory<V> {
    words: HashMap<u32, V>,
    read_data: V,
    read_ready: bool,
    write_ready: bool,
    rng: Option<(Xoshiro256StarStar, u32)>,
    dropped: u64,
}

impl<V: Copy + Default> SimMemory<V> {
    /// Creates an empty memory.
    pub fn new(backpressure: Backpressure) -> Self {
        let rng = match backpressure {
            Backpressure::None => None,
            Backpressure::Random { seed, stall_percent } => {
                Some((Xoshiro256StarStar::seed_from_u64(seed), stall_percent.min(100)))
            }
        };
        let mut memory = Self {
            words: HashMap::new(),
            read_data: V::default(),
            read_ready: true,
            write_ready: true,
            rng,
            dropped: 0,
        };
        memory.roll_ready();
        memory
    }

    /// Port signals driven towards the controller in the current tick.
    pub fn ports(&self) -> (MemReadPort<V>, Ready) {
        (MemReadPort { ready: self.read_ready, data: self.read_data }, Ready::new(self.write_ready))
    }

    /// Applies the commands issued in the current tick at the tick edge.
    ///
    /// A command presented to a port that is not ready is dropped and counted.
    pub fn apply(&mut self, read_cmd: Valid<u32>, write_cmd: Valid<(u32, V)>) {
        if let Some(addr) = read_cmd.into_option() {
            if self.read_ready {
                self.read_data = self.peek(addr);
            } else {
                warn!("read {:#x} presented while the read port is not ready", addr);
                self.dropped += 1;
            }
        }
        if let Some((addr, data)) = write_cmd.into_option() {
            if self.write_ready {
                self.words.insert(addr, data);
            } else {
                warn!("write {:#x} presented while the write port is not ready", addr);
                self.dropped += 1;
            }
        }
        self.roll_ready();
    }

    /// Returns the stored word without going through the read port.
    pub fn peek(&self, addr: u32) -> V { self.words.get(&addr).copied().unwrap_or_default() }

    /// Returns the number of commands dropped because their port was not ready.
    pub fn dropped(&self) -> u64 { self.dropped }

    fn roll_ready(&mut self) {
        if let Some((rng, stall_percent)) = self.rng.as_mut() {
            self.read_ready = rng.gen_range(0..100) >= *stall_percent;
            self.write_ready = rng.gen_range(0..100) >= *stall_percent;
        }
    }
}
