// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval polling with an attempt budget and latched conditions.

use crate::error::{OcsdkError, Result};
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// What a single poll tick observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Everything awaited holds; stop polling
    Done,
    /// Not there yet
    Pending,
    /// Not there yet, and a new step was initiated that earns extra attempts
    Granted(u32),
}

/// One re-evaluation of live cluster state per call
pub trait Probe {
    fn tick(&mut self) -> impl Future<Output = Result<Tick>>;
}

/// Drives a [`Probe`] at a fixed interval until it is done or the budget is spent.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick `probe` every interval, starting one interval from now.
    ///
    /// Returns the number of attempts used. Each tick is evaluated before the
    /// budget is checked, so a budget of `n` allows exactly `n` ticks (and a
    /// budget of zero still allows one). An error from the probe ends polling
    /// immediately.
    pub async fn drive<P: Probe>(&self, probe: &mut P, budget: u32) -> Result<u32> {
        let mut budget = budget;
        let mut attempt: u32 = 0;

        loop {
            sleep(self.interval).await;
            attempt += 1;

            match probe.tick().await? {
                Tick::Done => {
                    debug!(attempt, "Poll conditions satisfied");
                    return Ok(attempt);
                }
                Tick::Pending => {}
                Tick::Granted(extra) => {
                    budget = budget.saturating_add(extra);
                    debug!(attempt, budget, "Poll budget extended");
                }
            }

            if attempt >= budget {
                return Err(OcsdkError::PollTimeout { attempts: attempt });
            }
        }
    }

    /// Poll a single predicate until it holds or `budget` attempts are used
    pub async fn until<F, Fut>(&self, budget: u32, check: F) -> Result<u32>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        self.drive(&mut PredicateProbe(check), budget).await
    }
}

struct PredicateProbe<F>(F);

impl<F, Fut> Probe for PredicateProbe<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    async fn tick(&mut self) -> Result<Tick> {
        Ok(if (self.0)().await? {
            Tick::Done
        } else {
            Tick::Pending
        })
    }
}

/// How the unsatisfied conditions of a [`ConditionSet`] are checked per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// In order, stopping at the first unsatisfied condition
    Ordered,
    /// Every unsatisfied condition, independently
    Independent,
}

/// A list of conditions that latch once satisfied.
///
/// A latched condition is never checked again, even if the underlying
/// resource later changes.
#[derive(Debug, Clone)]
pub struct ConditionSet<K> {
    conditions: Vec<(K, bool)>,
    evaluation: Evaluation,
}

impl<K: Copy + PartialEq + Debug> ConditionSet<K> {
    pub fn ordered(conditions: impl IntoIterator<Item = K>) -> Self {
        Self::new(conditions, Evaluation::Ordered)
    }

    pub fn independent(conditions: impl IntoIterator<Item = K>) -> Self {
        Self::new(conditions, Evaluation::Independent)
    }

    fn new(conditions: impl IntoIterator<Item = K>, evaluation: Evaluation) -> Self {
        Self {
            conditions: conditions.into_iter().map(|c| (c, false)).collect(),
            evaluation,
        }
    }

    pub fn is_latched(&self, condition: K) -> bool {
        self.conditions
            .iter()
            .any(|(c, latched)| *c == condition && *latched)
    }

    pub fn all_latched(&self) -> bool {
        self.conditions.iter().all(|(_, latched)| *latched)
    }

    /// Conditions still waited on, in declaration order
    pub fn pending(&self) -> Vec<K> {
        self.conditions
            .iter()
            .filter(|(_, latched)| !latched)
            .map(|(c, _)| *c)
            .collect()
    }

    /// Check the unsatisfied conditions with `probe`; true once all are latched
    pub async fn evaluate<F, Fut>(&mut self, mut probe: F) -> Result<bool>
    where
        F: FnMut(K) -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let evaluation = self.evaluation;

        for (condition, latched) in self.conditions.iter_mut() {
            if *latched {
                continue;
            }
            if probe(*condition).await? {
                debug!(?condition, "Condition satisfied");
                *latched = true;
            } else if evaluation == Evaluation::Ordered {
                return Ok(false);
            }
        }

        Ok(self.all_latched())
    }
}
