//! Request arbiter.

use itertools::Itertools;
use seqfifo::*;

/// Arbitration policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Arbitration {
    /// The lowest-indexed requester wins.
    FixedPriority,
    /// The first requester at or after the priority pointer wins; the pointer then moves past the winner.
    #[default]
    RoundRobin,
}

/// Grants at most one of `N` requesters per tick.
///
/// The output is a single index, so two grants in the same tick cannot be expressed. The state is the round-robin
/// priority pointer; it is unused under [`Arbitration::FixedPriority`].
#[derive(Debug, Clone, Copy)]
pub struct Arbiter<const N: usize> {
    arbitration: Arbitration,
}

impl<const N: usize> Arbiter<N> {
    /// Creates a new arbiter.
    pub fn new(arbitration: Arbitration) -> Self { Self { arbitration } }

    /// Returns the policy.
    pub fn arbitration(&self) -> Arbitration { self.arbitration }

    /// Returns the winner among `requests` for the given priority pointer.
    pub fn grant(&self, requests: &[bool; N], pointer: usize) -> Option<usize> {
        let mut requesting = requests.iter().positions(|request| *request);
        match self.arbitration {
            Arbitration::FixedPriority => requesting.next(),
            Arbitration::RoundRobin => {
                let requesting = requesting.collect_vec();
                requesting.iter().find(|index| **index >= pointer).or_else(|| requesting.first()).copied()
            }
        }
    }
}

impl<const N: usize> Fsm for Arbiter<N> {
    type Input = [bool; N];
    type Output = Option<usize>;
    type State = usize;

    fn init(&self) -> usize { 0 }

    fn step(&self, requests: &[bool; N], pointer: &usize) -> (Option<usize>, usize) {
        let grant = self.grant(requests, *pointer);
        let pointer_next = match (self.arbitration, grant) {
            (Arbitration::RoundRobin, Some(index)) => (index + 1) % N,
            _ => *pointer,
        };
        (grant, pointer_next)
    }
}
