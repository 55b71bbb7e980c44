//! Queue controller wired to a behavioural memory.

use std::fmt;

use log::trace;
use seqfifo::*;

use crate::fifo::{QueueConfig, QueueController, QueueInput, QueueOutput, QueueState, Tracker};
use crate::memory::{Backpressure, SimMemory};

/// Drives a [`QueueController`] and a [`SimMemory`] one tick at a time.
#[derive(Debug)]
pub struct Testbench<V: Copy + Default + fmt::Debug, const N: usize> {
    queue: Machine<QueueController<V, N>>,
    memory: SimMemory<V>,
    ticks: u64,
}

impl<V: Copy + Default + fmt::Debug, const N: usize> Testbench<V, N> {
    /// Creates a testbench. The controller starts in its reset state.
    pub fn new(config: QueueConfig, backpressure: Backpressure) -> Result<Self, ConfigError> {
        Ok(Self { queue: Machine::new(QueueController::new(config)?), memory: SimMemory::new(backpressure), ticks: 0 })
    }

    /// Returns the controller.
    pub fn queue(&self) -> &Machine<QueueController<V, N>> { &self.queue }

    /// Returns the memory.
    pub fn memory(&self) -> &SimMemory<V> { &self.memory }

    /// Returns the committed controller state.
    pub fn state(&self) -> &QueueState { self.queue.state() }

    /// Returns the status of the committed state.
    pub fn status(&self) -> Tracker { self.queue.fsm().status(self.queue.state()) }

    /// Returns the number of ticks run so far.
    pub fn ticks(&self) -> u64 { self.ticks }

    /// Runs one tick with the given requests. The memory port signals are filled in by the testbench.
    pub fn tick(&mut self, write: Option<V>, read: [bool; N]) -> QueueOutput<V, N> {
        self.tick_with(QueueInput { write: write.into(), read, ..QueueInput::default() })
    }

    /// Runs one tick with explicit controller inputs, overriding the memory port signals.
    pub fn tick_with(&mut self, mut input: QueueInput<V, N>) -> QueueOutput<V, N> {
        let (mem_read, mem_write) = self.memory.ports();
        input.mem_read = mem_read;
        input.mem_write = mem_write;

        let output = self.queue.tick(&input);
        self.memory.apply(output.mem_read_cmd, output.mem_write_cmd);
        self.ticks += 1;
        trace!("tick {}: {:?}", self.ticks, self.queue.state());
        output
    }

    /// Runs one tick with the asynchronous reset asserted.
    pub fn reset_async(&mut self) -> QueueOutput<V, N> {
        self.tick_with(QueueInput { async_reset: true, ..QueueInput::default() })
    }

    /// Runs one tick with the synchronous reset asserted.
    pub fn reset_sync(&mut self) -> QueueOutput<V, N> {
        self.tick_with(QueueInput { sync_reset: true, ..QueueInput::default() })
    }

    /// Presents one write request for one tick.
    pub fn push(&mut self, data: V) -> Handshake { self.tick(Some(data), [false; N]).write }

    /// Presents one read request from `requester` for one tick. If it is acknowledged, runs one more idle tick
    /// and returns the word delivered; otherwise returns the refusal.
    ///
    /// A `requester` outside `0..N` presents nothing and returns `Err(Handshake::Idle)` without ticking.
    pub fn pop(&mut self, requester: usize) -> Result<V, Handshake> {
        let mut read = [false; N];
        *read.get_mut(requester).ok_or(Handshake::Idle)? = true;
        let handshake = self.tick(None, read).read[requester];
        if !handshake.acknowledge() {
            return Err(handshake);
        }
        let output = self.tick(None, [false; N]);
        output.read_data.map(|(_, word)| word).into_option().ok_or(Handshake::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lfsr::LfsrConfig;

    #[test]
    fn push_then_pop() {
        let mut testbench = Testbench::<u16, 1>::new(QueueConfig::new(LfsrConfig::new(4)), Backpressure::None).unwrap();
        assert_eq!(testbench.push(0xabc), Handshake::Acknowledge);
        assert_eq!(testbench.push(0xdef), Handshake::Acknowledge);
        assert_eq!(testbench.pop(0), Ok(0xabc));
        assert_eq!(testbench.pop(0), Ok(0xdef));
        assert_eq!(testbench.pop(0), Err(Handshake::Retry));
        assert_eq!(testbench.ticks(), 7);
        assert_eq!(testbench.memory().dropped(), 0);
    }

    #[test]
    fn pop_from_unknown_requester() {
        let mut testbench = Testbench::<u8, 2>::new(QueueConfig::new(LfsrConfig::new(3)), Backpressure::None).unwrap();
        assert_eq!(testbench.push(5), Handshake::Acknowledge);
        assert_eq!(testbench.pop(2), Err(Handshake::Idle));
        assert_eq!(testbench.ticks(), 1);
        assert_eq!(testbench.pop(1), Ok(5));
    }

    #[test]
    fn reset_between_transactions() {
        let mut testbench = Testbench::<u8, 1>::new(QueueConfig::new(LfsrConfig::new(3)), Backpressure::None).unwrap();
        testbench.push(1);
        testbench.reset_sync();
        assert!(testbench.status().empty);
        testbench.push(2);
        testbench.reset_async();
        assert!(testbench.status().empty);
        assert_eq!(testbench.pop(0), Err(Handshake::Retry));
    }
}
