//! Finite state machine (Mealy machine).

use std::fmt;

/// A clocked component described as a Mealy machine.
///
/// `step` is the combinational half: from the current-tick input and the committed state it computes (1) the
/// current-tick output and (2) the next-tick state. It must be pure; the state is only updated when a
/// [`Machine`] commits it at the tick boundary.
pub trait Fsm {
    /// Ingress signals sampled in one tick.
    type Input;

    /// Egress signals driven in one tick.
    type Output;

    /// Registered state.
    type State: Clone + fmt::Debug;

    /// State after reset.
    fn init(&self) -> Self::State;

    /// Computes the current-tick output and the next-tick state.
    fn step(&self, input: &Self::Input, state: &Self::State) -> (Self::Output, Self::State);
}

/// Runs an [`Fsm`] against its own state register.
///
/// Evaluation is two-phase: [`Machine::eval`] previews the output and next state without touching the register,
/// and [`Machine::commit`] makes a previewed state current. [`Machine::tick`] does both.
#[derive(Debug, Clone)]
pub struct Machine<F: Fsm> {
    fsm: F,
    state: F::State,
}

impl<F: Fsm> Machine<F> {
    /// Creates a machine whose register holds the reset state.
    pub fn new(fsm: F) -> Self {
        let state = fsm.init();
        Self { fsm, state }
    }

    /// Returns the fsm description.
    pub fn fsm(&self) -> &F { &self.fsm }

    /// Returns the committed state.
    pub fn state(&self) -> &F::State { &self.state }

    /// Computes the output and next state of the current tick without committing.
    pub fn eval(&self, input: &F::Input) -> (F::Output, F::State) { self.fsm.step(input, &self.state) }

    /// Commits `state` as the register value for the next tick.
    pub fn commit(&mut self, state: F::State) { self.state = state; }

    /// Evaluates one tick and commits its next state.
    pub fn tick(&mut self, input: &F::Input) -> F::Output {
        let (output, state) = self.eval(input);
        self.commit(state);
        output
    }

    /// Forces the register to the reset state immediately, independent of the tick boundary.
    pub fn reset(&mut self) { self.state = self.fsm.init(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Modulo-`n` up counter.
    #[derive(Debug)]
    struct Counter {
        n: u32,
    }

    impl Fsm for Counter {
        type Input = bool;
        type Output = u32;
        type State = u32;

        fn init(&self) -> u32 { 0 }

        fn step(&self, up: &bool, count: &u32) -> (u32, u32) {
            let count_next = if *up { (count + 1) % self.n } else { *count };
            (*count, count_next)
        }
    }

    #[test]
    fn eval_does_not_commit() {
        let machine = Machine::new(Counter { n: 3 });
        let (output, next) = machine.eval(&true);
        assert_eq!(output, 0);
        assert_eq!(next, 1);
        assert_eq!(*machine.state(), 0);
    }

    #[test]
    fn tick_commits_and_wraps() {
        let mut machine = Machine::new(Counter { n: 3 });
        let outputs = (0..5).map(|_| machine.tick(&true)).collect::<Vec<_>>();
        assert_eq!(outputs, vec![0, 1, 2, 0, 1]);
        assert_eq!(*machine.state(), 2);
        assert_eq!(machine.tick(&false), 2);
        assert_eq!(*machine.state(), 2);
    }

    #[test]
    fn reset_is_immediate() {
        let mut machine = Machine::new(Counter { n: 4 });
        machine.tick(&true);
        machine.tick(&true);
        machine.reset();
        assert_eq!(*machine.state(), 0);
    }
}
