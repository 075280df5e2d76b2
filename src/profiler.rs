//! Repeated-trajectory timing harness.
//!
//! Runs a scheduler to completion many times and records the final
//! simulation time of each trajectory. A pure consumer of the
//! scheduler's driving interface (`reset`, `process_next_reaction`,
//! `done`, `time`) — it never touches the queue or the surface
//! directly.

use std::io::Write;

use tracing::{debug, info};

use crate::error::{KineticaError, KineticaResult};
use crate::scheduler::ReactionScheduler;
use crate::surface::GlobalState;

/// Timing harness over a borrowed scheduler.
pub struct TimeProfiler<'a> {
    scheduler: &'a mut ReactionScheduler,
}

impl<'a> TimeProfiler<'a> {
    /// Wrap a scheduler for profiling.
    pub fn new(scheduler: &'a mut ReactionScheduler) -> Self {
        TimeProfiler { scheduler }
    }

    /// Run `num_runs` trajectories and return the final simulation time
    /// of each.
    ///
    /// Each trajectory starts from `initial_state` (or the scheduler's
    /// construction snapshot when `None`) and runs until the scheduler
    /// is done or `stop` returns true. The generator is not reseeded
    /// between runs, so trajectories are independent draws.
    pub fn trial_times<F>(
        &mut self,
        initial_state: Option<&GlobalState>,
        num_runs: usize,
        mut stop: F,
    ) -> KineticaResult<Vec<f64>>
    where
        F: FnMut(&ReactionScheduler) -> bool,
    {
        let mut times = Vec::with_capacity(num_runs);
        for run in 0..num_runs {
            self.scheduler.reset(initial_state)?;
            while !(self.scheduler.done() || stop(self.scheduler)) {
                self.scheduler.process_next_reaction();
            }
            let final_time = self.scheduler.time().value();
            debug!(run, final_time, "trajectory finished");
            times.push(final_time);
        }
        Ok(times)
    }

    /// Sweep labelled initial states, running `num_runs` trajectories
    /// per point, and write one CSV row per point with the mean
    /// completion time.
    ///
    /// Output format (readable by gnuplot and spreadsheet tools):
    ///
    /// ```text
    /// r,run_times
    /// <label>,<mean time>
    /// ```
    pub fn run_sweep<W, F>(
        &mut self,
        points: &[(String, GlobalState)],
        num_runs: usize,
        mut stop: F,
        out: &mut W,
    ) -> KineticaResult<()>
    where
        W: Write,
        F: FnMut(&ReactionScheduler) -> bool,
    {
        let write_err = |e: std::io::Error| KineticaError::OutputError(e.to_string());

        writeln!(out, "r,run_times").map_err(write_err)?;
        for (label, state) in points {
            info!(point = %label, num_runs, "running sweep point");
            let times = self.trial_times(Some(state), num_runs, &mut stop)?;
            let mean = times.iter().sum::<f64>() / times.len().max(1) as f64;
            info!(point = %label, mean, "sweep point finished");
            writeln!(out, "{},{}", label, mean).map_err(write_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::surface::Surface;

    fn decay_scheduler() -> ReactionScheduler {
        let surface = Surface::square_grid(2, 2, "A");
        let rules = vec![Rule::unimolecular("A", "B", 1.0).unwrap()];
        ReactionScheduler::new(surface, rules, 42, 1e6)
    }

    #[test]
    fn test_trial_times_runs_to_completion() {
        let mut scheduler = decay_scheduler();
        let mut profiler = TimeProfiler::new(&mut scheduler);

        let times = profiler.trial_times(None, 3, |_| false).unwrap();
        assert_eq!(times.len(), 3);
        for &t in &times {
            assert!(t > 0.0, "trajectory should advance the clock");
        }
        // Independent trajectories: not all identical.
        assert!(times.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_stop_criterion_halts_early() {
        let mut scheduler = decay_scheduler();
        let mut profiler = TimeProfiler::new(&mut scheduler);

        // Stop every trajectory before any reaction fires.
        let times = profiler.trial_times(None, 2, |_| true).unwrap();
        assert_eq!(times, vec![0.0, 0.0]);
    }

    #[test]
    fn test_run_sweep_writes_csv() {
        let mut scheduler = decay_scheduler();
        let initial = scheduler.surface().global_state();
        let mut profiler = TimeProfiler::new(&mut scheduler);

        let points = vec![
            ("p1".to_owned(), initial.clone()),
            ("p2".to_owned(), initial),
        ];
        let mut out = Vec::new();
        profiler.run_sweep(&points, 2, |_| false, &mut out).unwrap();

        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "r,run_times");
        assert!(lines[1].starts_with("p1,"));
        assert!(lines[2].starts_with("p2,"));
        // Mean times parse back as positive floats.
        for line in &lines[1..] {
            let mean: f64 = line.split(',').nth(1).unwrap().parse().unwrap();
            assert!(mean > 0.0);
        }
    }
}
