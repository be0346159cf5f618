//! Deposited energy accumulated per event and per run

// foiltools modules
use foiltools_format::NumFormat;

// external crates
use serde::{Deserialize, Serialize};

/// Statistics of the total deposit per event over a run
///
/// ```rust
/// # use foiltools_recorder::RunTally;
/// let mut run = RunTally::default();
/// run.add(1.0);
/// run.add(3.0);
///
/// assert_eq!(run.events, 2);
/// assert_eq!(run.mean(), 2.0);
/// assert_eq!(run.rms(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTally {
    /// Number of events folded in
    pub events: u64,
    /// Sum of event deposits (keV)
    pub sum: f64,
    /// Sum of squared event deposits (keV^2)
    pub sum2: f64,
}

impl RunTally {
    /// Fold in the total deposit of one event
    pub fn add(&mut self, edep: f64) {
        self.events += 1;
        self.sum += edep;
        self.sum2 += edep * edep;
    }

    /// Mean deposit per event, zero for an empty run
    pub fn mean(&self) -> f64 {
        match self.events {
            0 => 0.0,
            n => self.sum / n as f64,
        }
    }

    /// Spread of the deposit per event about the mean
    pub fn rms(&self) -> f64 {
        match self.events {
            0 => 0.0,
            n => {
                let mean = self.mean();
                // rounding can take this fractionally negative
                (self.sum2 / n as f64 - mean * mean).max(0.0).sqrt()
            }
        }
    }
}

impl std::fmt::Display for RunTally {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} events, edep per event {} keV, rms {} keV",
            self.events,
            self.mean().sci(5, 2),
            self.rms().sci(5, 2)
        )
    }
}

/// Deposit of the event in progress
///
/// Starting an event closes any event still open, so events never need to be
/// ended explicitly except at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct EventTally {
    event: Option<i32>,
    edep: f64,
    run: RunTally,
}

impl EventTally {
    /// Open a new event, folding any open event into the run
    pub fn begin_event(&mut self, event_id: i32) {
        self.end_event();
        self.event = Some(event_id);
        self.edep = 0.0;
    }

    /// Add a deposit to the open event
    pub fn add_edep(&mut self, edep: f64) {
        self.edep += edep;
    }

    /// Close the open event and return its total deposit
    pub fn end_event(&mut self) -> Option<f64> {
        let _ = self.event.take()?;
        self.run.add(self.edep);
        Some(std::mem::take(&mut self.edep))
    }

    /// Identifier of the open event
    pub fn current_event(&self) -> Option<i32> {
        self.event
    }

    /// Deposit so far in the open event
    pub fn current_edep(&self) -> f64 {
        self.edep
    }

    /// Statistics of every closed event
    pub fn run(&self) -> &RunTally {
        &self.run
    }

    /// Close the open event and hand back the run, starting a fresh one
    pub fn finish_run(&mut self) -> RunTally {
        self.end_event();
        std::mem::take(&mut self.run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_fold_into_the_run() {
        let mut tally = EventTally::default();
        assert_eq!(tally.end_event(), None);

        tally.begin_event(0);
        tally.add_edep(1.5);
        tally.add_edep(0.5);
        assert_eq!(tally.current_edep(), 2.0);

        // starting the next event closes the first
        tally.begin_event(1);
        assert_eq!(tally.run().events, 1);
        tally.add_edep(4.0);
        assert_eq!(tally.end_event(), Some(4.0));
        assert_eq!(tally.current_event(), None);

        let run = tally.finish_run();
        assert_eq!(run.events, 2);
        assert_eq!(run.sum, 6.0);
        assert_eq!(run.sum2, 20.0);
        assert_eq!(tally.run().events, 0);
    }

    #[test]
    fn empty_run() {
        let run = RunTally::default();
        assert_eq!(run.mean(), 0.0);
        assert_eq!(run.rms(), 0.0);
    }

    #[test]
    fn constant_deposits_have_no_spread() {
        let mut run = RunTally::default();
        for _ in 0..10 {
            run.add(0.1);
        }
        assert!((run.mean() - 0.1).abs() < 1e-12);
        assert!(run.rms() < 1e-6);
    }
}
