//! Sequence generator: a configurable XNOR Fibonacci LFSR.
//!
//! The register shifts towards the MSB and a feedback bit enters at bit 0. The feedback bit is the XNOR reduction of
//! the tapped bits, with the tap mask taken from a per-width table of maximal-length polynomials. The plain rule
//! visits every state except all-ones, which it locks up on.
//!
//! Two configuration knobs shape the cycle:
//!
//! - `include_lockup`: when set, the feedback bit is inverted whenever the low `width - 1` bits are all ones. This
//!   splices the all-ones state in between `0b011..1` and `0b11..10`, giving a period of `2^width`. When clear, the
//!   all-ones state stays out of the cycle and the period is `2^width - 1`.
//! - `skip`: a single redirected edge. The tick out of `skip.from` lands on `skip.to` instead of the state the
//!   feedback rule would produce, dropping the run of states in between from the cycle.

mod taps;

use log::debug;
use seqfifo::*;

/// A redirected transition of the cycle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkipEdge {
    /// Source state.
    pub from: u32,
    /// Target state.
    pub to: u32,
}

impl SkipEdge {
    /// Creates a skip edge. Equal endpoints mean "no skip" and return `None`.
    pub fn new(from: u32, to: u32) -> Option<Self> { (from != to).then_some(Self { from, to }) }
}

/// Construction-time configuration of a sequence generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LfsrConfig {
    /// Register width in bits, `MIN_WIDTH..=MAX_WIDTH`.
    pub width: u32,
    /// Whether the all-ones state is part of the cycle.
    pub include_lockup: bool,
    /// Redirected transition, if any.
    pub skip: Option<SkipEdge>,
    /// Register value after reset.
    pub reset_state: u32,
}

impl LfsrConfig {
    /// Full-period configuration of the given width: lock-up state included, no skip, reset to zero.
    pub fn new(width: u32) -> Self { Self { width, include_lockup: true, skip: None, reset_state: 0 } }

    /// Sets whether the all-ones state is part of the cycle.
    pub fn include_lockup(self, include_lockup: bool) -> Self { Self { include_lockup, ..self } }

    /// Redirects the transition out of `from` to `to`. Equal values clear the skip.
    pub fn skip(self, from: u32, to: u32) -> Self { Self { skip: SkipEdge::new(from, to), ..self } }

    /// Sets the reset state.
    pub fn reset_state(self, reset_state: u32) -> Self { Self { reset_state, ..self } }
}

/// Validated generator description. It is the combinational part of [`SequenceGenerator`].
#[derive(Debug, Clone)]
pub struct Lfsr {
    config: LfsrConfig,
    taps: u32,
    mask: u32,
}

impl Lfsr {
    /// Validates `config`.
    ///
    /// With a skip configured this walks the shortened cycle once to check that the reset state lies on it.
    pub fn new(config: LfsrConfig) -> Result<Self, ConfigError> {
        let width = config.width;
        let taps = taps::taps(width).ok_or(ConfigError::WidthOutOfRange { width })?;
        let lfsr = Self { config, taps, mask: mask(width) };

        lfsr.check_state("reset state", config.reset_state)?;
        if let Some(skip) = config.skip {
            lfsr.check_state("skip source", skip.from)?;
            lfsr.check_state("skip target", skip.to)?;
            if !lfsr.is_on_skip_cycle(skip, config.reset_state) {
                return Err(ConfigError::UnreachableReset {
                    reset_state: config.reset_state,
                    from: skip.from,
                    to: skip.to,
                });
            }
            debug!("lfsr width {}: skip edge {:#x} -> {:#x}", width, skip.from, skip.to);
        }

        Ok(lfsr)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LfsrConfig { &self.config }

    /// Returns the register width.
    pub fn width(&self) -> u32 { self.config.width }

    /// Returns the feedback tap mask.
    pub fn taps(&self) -> u32 { self.taps }

    /// Returns the all-ones state the plain feedback rule locks up on.
    pub fn lockup_state(&self) -> u32 { self.mask }

    /// Returns the state following `state`.
    pub fn successor(&self, state: u32) -> u32 {
        match self.config.skip {
            Some(skip) if skip.from == state => skip.to,
            _ => self.feedback_successor(state),
        }
    }

    /// Returns the number of ticks it takes to return to the reset state.
    pub fn period(&self) -> u64 {
        let reset_state = self.config.reset_state;
        let mut state = self.successor(reset_state);
        let mut period = 1;
        while state != reset_state {
            state = self.successor(state);
            period += 1;
        }
        period
    }

    fn feedback_successor(&self, state: u32) -> u32 {
        let mut feedback = xnor_reduce(state & self.taps);
        let low = self.mask >> 1;
        if self.config.include_lockup && state & low == low {
            feedback = !feedback;
        }
        ((state << 1) | u32::from(feedback)) & self.mask
    }

    fn check_state(&self, field: &'static str, value: u32) -> Result<(), ConfigError> {
        if !is_representable(value, self.config.width) {
            return Err(ConfigError::NotRepresentable { field, value, width: self.config.width });
        }
        if !self.config.include_lockup && value == self.lockup_state() {
            return Err(ConfigError::LockupState { field, value });
        }
        Ok(())
    }

    /// Whether `state` survives the skip, i.e. lies on the plain path from `skip.to` to `skip.from`.
    fn is_on_skip_cycle(&self, skip: SkipEdge, state: u32) -> bool {
        let mut current = skip.to;
        loop {
            if current == state {
                return true;
            }
            if current == skip.from {
                return false;
            }
            current = self.feedback_successor(current);
        }
    }
}

/// Per-tick control inputs of a sequence generator.
///
/// Priority: `async_reset` > `sync_reset` > `advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LfsrControl {
    /// Forces the reset state immediately, including for this tick's output.
    pub async_reset: bool,
    /// Forces the reset state at the tick boundary.
    pub sync_reset: bool,
    /// Moves to the successor at the tick boundary.
    pub advance: bool,
}

impl LfsrControl {
    /// Advance request.
    pub fn advance() -> Self { Self { advance: true, ..Self::default() } }
}

impl Fsm for Lfsr {
    type Input = LfsrControl;
    type Output = u32;
    type State = u32;

    fn init(&self) -> u32 { self.config.reset_state }

    fn step(&self, input: &LfsrControl, state: &u32) -> (u32, u32) {
        let state = if input.async_reset { self.init() } else { *state };
        let state_next = if input.async_reset || input.sync_reset {
            self.init()
        } else if input.advance {
            self.successor(state)
        } else {
            state
        };
        (state, state_next)
    }
}

/// A sequence generator register.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    machine: Machine<Lfsr>,
}

impl SequenceGenerator {
    /// Creates a generator holding its reset state.
    pub fn new(config: LfsrConfig) -> Result<Self, ConfigError> { Ok(Self { machine: Machine::new(Lfsr::new(config)?) }) }

    /// Returns the generator description.
    pub fn lfsr(&self) -> &Lfsr { self.machine.fsm() }

    /// Returns the committed register value.
    pub fn state(&self) -> u32 { *self.machine.state() }

    /// Returns the value the next advance would commit, without committing it.
    pub fn preview(&self) -> u32 { self.lfsr().successor(self.state()) }

    /// Commits one advance and returns the new register value.
    pub fn advance(&mut self) -> u32 {
        self.machine.tick(&LfsrControl::advance());
        self.state()
    }

    /// Asynchronous reset: forces the reset state immediately.
    pub fn reset(&mut self) { self.machine.reset(); }

    /// Evaluates one tick with explicit control and commits it. Returns the register value seen during the tick.
    pub fn tick(&mut self, control: LfsrControl) -> u32 { self.machine.tick(&control) }

    /// Returns the cycle length from the reset state.
    pub fn period(&self) -> u64 { self.lfsr().period() }
}
