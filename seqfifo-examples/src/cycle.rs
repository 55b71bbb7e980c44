use std::fmt;

use itertools::Itertools;
use seqfifo::ConfigError;
use seqfifo_std::{LfsrConfig, SequenceGenerator};

/// Prefix of a generator's cycle.
#[derive(Debug)]
pub struct Cycle {
    width: u32,
    taps: u32,
    states: Vec<u32>,
    period: u64,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = ((self.width + 3) / 4) as usize;
        let states = self.states.iter().map(|state| format!("{:0digits$x}", state, digits = digits)).join(" ");
        let ellipsis = if (self.states.len() as u64) < self.period { " ..." } else { "" };
        writeln!(f, "width {} taps {:#x} period {}", self.width, self.taps, self.period)?;
        write!(f, "{}{}", states, ellipsis)
    }
}

pub fn run(config: LfsrConfig, limit: usize) -> Result<Cycle, ConfigError> {
    let mut generator = SequenceGenerator::new(config)?;
    let period = generator.period();
    let mut states = vec![generator.state()];
    while (states.len() as u64) < period && states.len() < limit {
        states.push(generator.advance());
    }
    Ok(Cycle { width: config.width, taps: generator.lfsr().taps(), states, period })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_whole_short_cycle() {
        let cycle = run(LfsrConfig::new(3), 32).unwrap();
        assert_eq!(cycle.to_string(), "width 3 taps 0x6 period 8\n0 1 3 7 6 5 2 4");
    }

    #[test]
    fn truncates_long_cycle() {
        let cycle = run(LfsrConfig::new(8).include_lockup(false), 4).unwrap();
        assert_eq!(cycle.to_string(), "width 8 taps 0xb8 period 255\n00 01 03 07 ...");
    }
}
