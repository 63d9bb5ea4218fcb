//! Test suite runner
//!
//! A [`Suite`] is an ordered list of named checks run against one library
//! handle. Each check folds to a single pass/fail bit; the suite passes when
//! every executed check passed.

use crate::checks;
use crate::error::Result;
use crate::library::SymbolSource;
use tracing::{debug, warn};

/// Signature of a check
pub type CheckFn<L> = fn(&L) -> Result<()>;

/// A named check
pub struct Check<L> {
    pub name: &'static str,
    pub run: CheckFn<L>,
}

/// How the suite reacts to a failing check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPolicy {
    /// Stop at the first failure
    #[default]
    ShortCircuit,
    /// Run every check and AND the results
    RunToCompletion,
}

/// Outcome of one suite run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SuiteReport {
    /// Executed checks in order, with their outcome
    pub outcomes: Vec<(&'static str, bool)>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|(_, passed)| *passed)
    }

    pub fn failed(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|(_, passed)| !passed)
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn executed(&self) -> usize {
        self.outcomes.len()
    }
}

pub struct Suite<L> {
    checks: Vec<Check<L>>,
    policy: RunPolicy,
}

impl<L> Suite<L> {
    pub fn new() -> Self {
        Suite {
            checks: Vec::new(),
            policy: RunPolicy::default(),
        }
    }

    /// Append a check; checks run in the order they are added
    pub fn check(mut self, name: &'static str, run: CheckFn<L>) -> Self {
        self.checks.push(Check { name, run });
        self
    }

    pub fn policy(mut self, policy: RunPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|check| check.name).collect()
    }

    pub fn run(&self, library: &L) -> SuiteReport {
        let mut report = SuiteReport::default();
        for check in &self.checks {
            debug!(check = check.name, "running check");
            let passed = match (check.run)(library) {
                Ok(()) => true,
                Err(err) => {
                    warn!(check = check.name, error = %err, "check failed");
                    false
                }
            };
            report.outcomes.push((check.name, passed));

            if !passed && self.policy == RunPolicy::ShortCircuit {
                break;
            }
        }
        report
    }
}

impl<L> Default for Suite<L> {
    fn default() -> Self {
        Suite::new()
    }
}

impl<L: SymbolSource> Suite<L> {
    /// The six zlib conformance checks in their fixed order
    pub fn standard() -> Self {
        Suite::new()
            .check("adler32", checks::adler32_streaming::<L>)
            .check("adler32_z", checks::adler32_z_streaming::<L>)
            .check("adler32_combine", checks::adler32_combine::<L>)
            .check("compress", checks::compress_round_trip::<L>)
            .check("compress2", checks::compress2_round_trip::<L>)
            .check("compressBound", checks::compress_bound::<L>)
    }
}
