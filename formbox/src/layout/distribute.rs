//! Distributing surplus or deficit space across the children of a box.
//!
//! A box whose actual extent differs from the sum of its children's
//! preferred extents hands the difference (`target - pref`) to the children
//! that can still absorb it: those with `max > pref` when growing, `pref >
//! min` when shrinking. Children are clamped at their bound and drop out once
//! saturated; whatever nobody could take is reported as `unabsorbed`.
//!
//! Two policies are available:
//!
//! - [`DistributionPolicy::EqualStep`] hands out equal steps round by round.
//!   Each round the step is `round(remaining / candidates)`, at least one
//!   pixel, given to the candidates in list order and never more than what is
//!   still unallocated. The deltas therefore sum to exactly the requested
//!   amount whenever there is enough room.
//! - [`DistributionPolicy::Proportional`] splits the amount in one shot by
//!   weight (preferred extent when growing, shrink room when shrinking). The
//!   truncation remainder goes to the last candidate. Candidates that would
//!   overshoot are clamped and the rest is split again among the others.

use serde::{Deserialize, Serialize};

use super::resolve::SizeTriple;

/// How surplus or deficit space is shared out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionPolicy {
    #[default]
    EqualStep,
    Proportional,
}

/// Outcome of one distribution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Distribution {
    /// One delta per input triple, in input order.
    pub deltas: Vec<i32>,
    /// The part of the requested change no candidate could take.
    pub unabsorbed: i32,
}

impl Distribution {
    fn unchanged(len: usize) -> Self {
        Self {
            deltas: vec![0; len],
            unabsorbed: 0,
        }
    }

    /// Sum of all deltas.
    pub fn total(&self) -> i32 {
        self.deltas.iter().fold(0i32, |acc, d| acc.saturating_add(*d))
    }

    /// Whether the whole requested change was absorbed.
    pub fn is_exact(&self) -> bool {
        self.unabsorbed == 0
    }

    /// Preferred extent plus delta for each triple.
    pub fn extents(&self, triples: &[SizeTriple]) -> Vec<i32> {
        triples
            .iter()
            .zip(&self.deltas)
            .map(|(t, d)| t.pref.saturating_add(*d))
            .collect()
    }
}

/// Spread `target - pref` over `triples`.
///
/// `pref` is the preferred extent of the whole container, gaps and insets
/// included, so the difference is exactly what the children must absorb.
pub fn distribute(
    triples: &[SizeTriple],
    target: i32,
    pref: i32,
    policy: DistributionPolicy,
) -> Distribution {
    let var = target.saturating_sub(pref);
    if var == 0 {
        return Distribution::unchanged(triples.len());
    }
    let growing = var > 0;
    let candidates: Vec<usize> = triples
        .iter()
        .enumerate()
        .filter(|(_, t)| if growing { t.max > t.pref } else { t.pref > t.min })
        .map(|(i, _)| i)
        .collect();

    let result = match policy {
        DistributionPolicy::EqualStep => equal_step(triples, candidates, var),
        DistributionPolicy::Proportional => proportional(triples, candidates, var),
    };
    tracing::debug!(
        ?policy,
        var,
        deltas = ?result.deltas,
        unabsorbed = result.unabsorbed,
        "distributed"
    );
    result
}

/// Move `current` towards the candidate's bound by at most `amount`.
///
/// Returns the applied change and whether the bound was reached.
#[inline]
fn advance(triple: &SizeTriple, current: i32, amount: i32, growing: bool) -> (i32, bool) {
    let next = current.saturating_add(amount);
    if growing && next >= triple.max {
        (triple.max - current, true)
    } else if !growing && next <= triple.min {
        (triple.min - current, true)
    } else {
        (amount, false)
    }
}

fn equal_step(triples: &[SizeTriple], mut candidates: Vec<usize>, var: i32) -> Distribution {
    let growing = var > 0;
    let mut deltas = vec![0; triples.len()];
    let mut remaining = var;

    while remaining != 0 && !candidates.is_empty() && remaining.signum() == var.signum() {
        let count = candidates.len() as f64;
        let mut step = (f64::from(remaining) / count).round() as i32;
        if step == 0 {
            step = remaining.signum();
        }
        candidates.retain(|&i| {
            if remaining == 0 {
                return true;
            }
            let take = if growing {
                step.min(remaining)
            } else {
                step.max(remaining)
            };
            let current = triples[i].pref + deltas[i];
            let (applied, saturated) = advance(&triples[i], current, take, growing);
            deltas[i] += applied;
            remaining -= applied;
            !saturated
        });
    }

    Distribution {
        deltas,
        unabsorbed: remaining,
    }
}

fn proportional(triples: &[SizeTriple], mut candidates: Vec<usize>, var: i32) -> Distribution {
    let growing = var > 0;
    let mut deltas = vec![0; triples.len()];
    let mut remaining = var;

    while remaining != 0 && !candidates.is_empty() {
        let weights: Vec<i64> = candidates
            .iter()
            .map(|&i| {
                let t = &triples[i];
                i64::from(if growing { t.pref } else { t.shrink_room() }).max(0)
            })
            .collect();
        let mut weight_sum: i64 = weights.iter().sum();
        let weights = if weight_sum > 0 {
            weights
        } else {
            weight_sum = candidates.len() as i64;
            vec![1; candidates.len()]
        };

        let mut shares: Vec<i32> = weights
            .iter()
            .map(|w| (i64::from(remaining) * w / weight_sum) as i32)
            .collect();
        let handed_out: i32 = shares.iter().sum();
        if let Some(last) = shares.last_mut() {
            *last += remaining - handed_out;
        }

        let mut clamped = false;
        let mut kept = Vec::with_capacity(candidates.len());
        for (&i, &share) in candidates.iter().zip(&shares) {
            let current = triples[i].pref + deltas[i];
            let (applied, saturated) = advance(&triples[i], current, share, growing);
            if saturated {
                deltas[i] += applied;
                remaining -= applied;
                clamped = true;
            } else {
                kept.push(i);
            }
        }

        if !clamped {
            for (&i, &share) in candidates.iter().zip(&shares) {
                deltas[i] += share;
                remaining -= share;
            }
            break;
        }
        candidates = kept;
    }

    Distribution {
        deltas,
        unabsorbed: remaining,
    }
}
