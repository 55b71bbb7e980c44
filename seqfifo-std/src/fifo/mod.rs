//! FIFO controller addressing an external two-port memory with a pair of sequence generators.
//!
//! The write cursor and the read cursor are two generators of the same configuration. A slot is addressed by the
//! cursor's register value, so the memory needs `2^width` words. One state of the cycle is always held back:
//! equal cursors mean empty, and a write cursor whose successor is the read cursor means full. The usable capacity
//! is therefore `period - 1`.
//!
//! The memory has a synchronous write port and a synchronous read port with one tick of latency. A read granted in
//! tick `t` drives the read command in tick `t` and the word is forwarded on `read_data` in tick `t + 1`.

pub mod tracker;

use std::fmt;
use std::marker::PhantomData;

use log::{debug, trace};
use seqfifo::*;

pub use self::tracker::Tracker;
use crate::arbiter::{Arbiter, Arbitration};
use crate::lfsr::{Lfsr, LfsrConfig, LfsrControl};

/// Memory read port as seen by the controller in one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemReadPort<V> {
    /// The port accepts an address this tick.
    pub ready: bool,
    /// Word read by the command issued in the previous tick.
    pub data: V,
}

/// Construction-time configuration of a queue controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueConfig {
    /// Configuration shared by both cursors.
    pub lfsr: LfsrConfig,
    /// Policy among read requesters.
    pub arbitration: Arbitration,
}

impl QueueConfig {
    /// Creates a configuration with round-robin read arbitration.
    pub fn new(lfsr: LfsrConfig) -> Self { Self { lfsr, arbitration: Arbitration::default() } }

    /// Sets the read arbitration policy.
    pub fn arbitration(self, arbitration: Arbitration) -> Self { Self { arbitration, ..self } }
}

/// Ingress signals of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueInput<V, const N: usize> {
    /// Immediate reset.
    pub async_reset: bool,
    /// Reset at the tick boundary.
    pub sync_reset: bool,
    /// Write request and its data word.
    pub write: Valid<V>,
    /// Read requests, one per requester.
    pub read: [bool; N],
    /// Memory read port.
    pub mem_read: MemReadPort<V>,
    /// Memory write port.
    pub mem_write: Ready,
}

impl<V: Default, const N: usize> Default for QueueInput<V, N> {
    /// No request, no reset, both memory ports ready.
    fn default() -> Self {
        Self {
            async_reset: false,
            sync_reset: false,
            write: Valid::invalid(),
            read: [false; N],
            mem_read: MemReadPort { ready: true, data: V::default() },
            mem_write: Ready::new(true),
        }
    }
}

/// Egress signals of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOutput<V, const N: usize> {
    /// Response to the write request.
    pub write: Handshake,
    /// Responses to the read requests.
    pub read: [Handshake; N],
    /// Word returned for the read granted in the previous tick, tagged with the requester index.
    pub read_data: Valid<(usize, V)>,
    /// Memory read command (address).
    pub mem_read_cmd: Valid<u32>,
    /// Memory write command (address, data).
    pub mem_write_cmd: Valid<(u32, V)>,
    /// Status evaluated at the start of the tick.
    pub status: Tracker,
}

/// Registered state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueState {
    /// Write cursor.
    pub wptr: u32,
    /// Read cursor.
    pub rptr: u32,
    /// Read arbiter priority pointer.
    pub arbiter: usize,
    /// Requester whose word arrives from the memory this tick.
    pub response: Option<usize>,
}

/// Queue controller with one writer and `N` readers.
#[derive(Debug, Clone)]
pub struct QueueController<V, const N: usize> {
    write: Lfsr,
    read: Lfsr,
    arbiter: Arbiter<N>,
    _marker: PhantomData<V>,
}

impl<V, const N: usize> QueueController<V, N> {
    /// Creates a controller. Both cursors share `config.lfsr`.
    pub fn new(config: QueueConfig) -> Result<Self, ConfigError> {
        if N == 0 {
            return Err(ConfigError::NoRequesters);
        }
        Ok(Self {
            write: Lfsr::new(config.lfsr)?,
            read: Lfsr::new(config.lfsr)?,
            arbiter: Arbiter::new(config.arbitration),
            _marker: PhantomData,
        })
    }

    /// Returns the cursor generator description.
    pub fn lfsr(&self) -> &Lfsr { &self.write }

    /// Returns the read arbitration policy.
    pub fn arbitration(&self) -> Arbitration { self.arbiter.arbitration() }

    /// Returns the number of entries the queue holds when full.
    ///
    /// This walks the cursor cycle once.
    pub fn capacity(&self) -> u64 { self.write.period() - 1 }

    /// Returns the status of `state`.
    pub fn status(&self, state: &QueueState) -> Tracker {
        Tracker::new(state.wptr, self.write.successor(state.wptr), state.rptr)
    }
}

impl<V: Copy + Default + fmt::Debug, const N: usize> Fsm for QueueController<V, N> {
    type Input = QueueInput<V, N>;
    type Output = QueueOutput<V, N>;
    type State = QueueState;

    fn init(&self) -> QueueState {
        QueueState { wptr: self.write.init(), rptr: self.read.init(), arbiter: self.arbiter.init(), response: None }
    }

    fn step(&self, input: &QueueInput<V, N>, state: &QueueState) -> (QueueOutput<V, N>, QueueState) {
        let state = if input.async_reset { self.init() } else { *state };
        let reset = input.async_reset || input.sync_reset;
        let status = self.status(&state);

        let read_data = match state.response {
            Some(index) => Valid::valid((index, input.mem_read.data)),
            None => Valid::invalid(),
        };

        let write = if !input.write.valid {
            Handshake::Idle
        } else if reset {
            Handshake::Stall
        } else if status.full {
            Handshake::Retry
        } else if !input.mem_write.ready {
            Handshake::Stall
        } else {
            Handshake::Acknowledge
        };

        let (grant, arbiter_next) = if !reset && !status.empty && input.mem_read.ready {
            self.arbiter.step(&input.read, &state.arbiter)
        } else {
            (None, state.arbiter)
        };
        let refusal = if !reset && status.empty { Handshake::Retry } else { Handshake::Stall };
        let read = std::array::from_fn(|index| match (input.read[index], grant) {
            (false, _) => Handshake::Idle,
            (true, Some(granted)) if granted == index => Handshake::Acknowledge,
            (true, _) => refusal,
        });

        let mem_write_cmd = Valid::new(write.acknowledge(), (state.wptr, input.write.inner));
        let mem_read_cmd = Valid::new(grant.is_some(), state.rptr);

        if reset {
            debug!("queue reset (async: {})", input.async_reset);
        } else {
            if write.retry() {
                debug!("write retried: full at wptr {:#x}", state.wptr);
            }
            if let Some(granted) = grant {
                trace!("read {:#x} for requester {}", state.rptr, granted);
            }
            if mem_write_cmd.valid {
                trace!("write {:#x} <- {:?}", state.wptr, input.write.inner);
            }
        }

        let control = |advance| LfsrControl { async_reset: input.async_reset, sync_reset: input.sync_reset, advance };
        let (_, wptr) = self.write.step(&control(write.acknowledge()), &state.wptr);
        let (_, rptr) = self.read.step(&control(grant.is_some()), &state.rptr);
        let (arbiter, response) = if reset { (self.arbiter.init(), None) } else { (arbiter_next, grant) };

        let output = QueueOutput { write, read, read_data, mem_read_cmd, mem_write_cmd, status };
        (output, QueueState { wptr, rptr, arbiter, response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Controller = QueueController<u32, 2>;

    fn controller(width: u32) -> Machine<Controller> {
        Machine::new(Controller::new(QueueConfig::new(LfsrConfig::new(width))).unwrap())
    }

    fn write(data: u32) -> QueueInput<u32, 2> { QueueInput { write: Valid::valid(data), ..QueueInput::default() } }

    fn read(requests: [bool; 2]) -> QueueInput<u32, 2> { QueueInput { read: requests, ..QueueInput::default() } }

    #[test]
    fn rejects_zero_requesters() {
        let error = QueueController::<u32, 0>::new(QueueConfig::new(LfsrConfig::new(3))).unwrap_err();
        assert_eq!(error, ConfigError::NoRequesters);
    }

    #[test]
    fn starts_empty() {
        let queue = controller(3);
        let status = queue.fsm().status(queue.state());
        assert!(status.empty);
        assert!(!status.full);
        assert_eq!(queue.fsm().capacity(), 7);
    }

    #[test]
    fn write_issues_memory_command_at_cursor() {
        let mut queue = controller(3);
        let output = queue.tick(&write(42));
        assert_eq!(output.write, Handshake::Acknowledge);
        assert_eq!(output.mem_write_cmd, Valid::valid((0, 42)));
        assert!(!output.mem_read_cmd.valid);
        assert_eq!(queue.state().wptr, 1);
        assert_eq!(queue.state().rptr, 0);
    }

    #[test]
    fn write_stall_holds_cursor() {
        let mut queue = controller(3);
        let stalled = QueueInput { mem_write: Ready::new(false), ..write(5) };
        let output = queue.tick(&stalled);
        assert_eq!(output.write, Handshake::Stall);
        assert!(!output.mem_write_cmd.valid);
        assert_eq!(queue.state().wptr, 0);

        // Re-asserted: the same command is offered again.
        let output = queue.tick(&write(5));
        assert_eq!(output.write, Handshake::Acknowledge);
        assert_eq!(output.mem_write_cmd, Valid::valid((0, 5)));
    }

    #[test]
    fn read_on_empty_retries() {
        let mut queue = controller(3);
        let output = queue.tick(&read([true, true]));
        assert_eq!(output.read, [Handshake::Retry, Handshake::Retry]);
        assert!(!output.mem_read_cmd.valid);
        assert_eq!(queue.state().rptr, 0);
    }

    #[test]
    fn one_grant_per_tick() {
        let mut queue = controller(3);
        queue.tick(&write(1));
        queue.tick(&write(2));

        let output = queue.tick(&read([true, true]));
        assert_eq!(output.read, [Handshake::Acknowledge, Handshake::Stall]);
        assert_eq!(output.mem_read_cmd, Valid::valid(0));

        let output = queue.tick(&QueueInput { mem_read: MemReadPort { ready: true, data: 1 }, ..read([true, true]) });
        assert_eq!(output.read_data, Valid::valid((0, 1)));
        assert_eq!(output.read, [Handshake::Stall, Handshake::Acknowledge]);
        assert_eq!(output.mem_read_cmd, Valid::valid(1));
    }

    #[test]
    fn read_stall_holds_cursor() {
        let mut queue = controller(3);
        queue.tick(&write(1));
        let stalled = QueueInput { mem_read: MemReadPort { ready: false, data: 0 }, ..read([false, true]) };
        let output = queue.tick(&stalled);
        assert_eq!(output.read, [Handshake::Idle, Handshake::Stall]);
        assert!(!output.mem_read_cmd.valid);
        assert_eq!(queue.state().rptr, 0);
    }

    #[test]
    fn reset_beats_requests() {
        let mut queue = controller(3);
        queue.tick(&write(1));
        queue.tick(&write(2));

        let output = queue.tick(&QueueInput { sync_reset: true, ..write(3) });
        assert_eq!(output.write, Handshake::Stall);
        assert!(!output.status.empty);
        assert!(!output.mem_write_cmd.valid);
        assert_eq!(*queue.state(), queue.fsm().init());

        queue.tick(&write(4));
        let output = queue.tick(&QueueInput { async_reset: true, read: [true, false], ..QueueInput::default() });
        assert_eq!(output.read, [Handshake::Stall, Handshake::Idle]);
        assert!(output.status.empty);
        assert!(!output.mem_read_cmd.valid);
        assert_eq!(*queue.state(), queue.fsm().init());
    }
}
