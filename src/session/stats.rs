//! Derived session statistics
//!
//! Nothing here is stored; every figure is recomputed from the attempt log
//! after the latest append.

use rustc_hash::FxHashMap;

use super::store::Attempt;
use crate::generator::Mode;

/// Accuracy is computed over this many most-recent attempts
pub const ACCURACY_WINDOW: usize = 100;
/// Latency is averaged over the correct attempts among this many most-recent
pub const LATENCY_WINDOW: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Rounded percentage in `[0, 100]`, 0 when the log is empty
    pub accuracy_percent: u32,
    /// Rounded mean latency of recent correct attempts, 0 when none
    pub avg_latency_ms: u64,
}

pub fn stats(rows: &[Attempt]) -> SessionStats {
    SessionStats {
        accuracy_percent: accuracy(rows),
        avg_latency_ms: avg_latency(rows),
    }
}

pub fn accuracy(rows: &[Attempt]) -> u32 {
    let window = tail(rows, ACCURACY_WINDOW);
    if window.is_empty() {
        return 0;
    }
    let ok = window.iter().filter(|r| r.correct).count();
    ((100 * ok) as f64 / window.len() as f64).round() as u32
}

pub fn avg_latency(rows: &[Attempt]) -> u64 {
    // The window is cut before filtering to correct answers, so the mean can
    // cover fewer than LATENCY_WINDOW samples.
    let times: Vec<u64> = tail(rows, LATENCY_WINDOW)
        .iter()
        .filter(|r| r.correct)
        .map(|r| r.ms)
        .collect();
    if times.is_empty() {
        return 0;
    }
    (times.iter().sum::<u64>() as f64 / times.len() as f64).round() as u64
}

/// Per-technique (attempted, correct) counts for the end-of-session summary
pub fn mode_breakdown(rows: &[Attempt]) -> FxHashMap<Mode, (u32, u32)> {
    let mut counts: FxHashMap<Mode, (u32, u32)> = FxHashMap::default();
    for row in rows {
        let entry = counts.entry(row.mode).or_insert((0, 0));
        entry.0 += 1;
        if row.correct {
            entry.1 += 1;
        }
    }
    counts
}

fn tail(rows: &[Attempt], n: usize) -> &[Attempt] {
    &rows[rows.len().saturating_sub(n)..]
}
