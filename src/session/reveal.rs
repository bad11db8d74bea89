//! Timed reveal for the flash-series drill
//!
//! Explicit idle → revealing → done state machine driven by a polled
//! deadline, so at most one pending tick exists per question and
//! cancellation is a plain state reset. Each tick appends the next operand
//! to the shown text in generation order; after the last operand the text
//! is forced to the full join, guarding against any accumulation drift.

use std::time::{Duration, Instant};

use crate::generator::{Mode, Question};

/// Reveal speed bounds in milliseconds
pub const MIN_REVEAL_MS: u64 = 250;
pub const MAX_REVEAL_MS: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RevealState {
    Idle,
    Revealing(usize),
    Done,
}

/// Drives the incremental display of one flash question
pub struct RevealScheduler {
    state: RevealState,
    operands: Vec<String>,
    shown: String,
    interval: Duration,
    deadline: Option<Instant>,
}

#[allow(dead_code)]
impl RevealScheduler {
    pub fn new(speed_ms: u64) -> Self {
        RevealScheduler {
            state: RevealState::Idle,
            operands: Vec::new(),
            shown: String::new(),
            interval: Duration::from_millis(speed_ms.clamp(MIN_REVEAL_MS, MAX_REVEAL_MS)),
            deadline: None,
        }
    }

    /// Arm for a new question. Any pending tick is cancelled first; a
    /// non-flash question just leaves the scheduler idle.
    pub fn begin(&mut self, question: &Question, now: Instant) {
        self.cancel();
        if question.mode != Mode::FlashSeries {
            return;
        }
        self.operands = question
            .text
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if self.operands.is_empty() {
            return;
        }
        self.state = RevealState::Revealing(0);
        self.deadline = Some(now + self.interval);
    }

    /// Change the reveal speed. Cancels any in-flight sequence; the caller
    /// re-arms with `begin` for the next question.
    pub fn set_speed(&mut self, speed_ms: u64) {
        self.interval = Duration::from_millis(speed_ms.clamp(MIN_REVEAL_MS, MAX_REVEAL_MS));
        self.cancel();
    }

    /// Cancel the sequence and clear the shown text. A cancelled scheduler
    /// performs no further mutation until re-armed.
    pub fn cancel(&mut self) {
        self.state = RevealState::Idle;
        self.operands.clear();
        self.shown.clear();
        self.deadline = None;
    }

    /// Advance if the deadline has passed. Returns true when the shown text
    /// changed, so the caller knows to redraw.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => self.tick(deadline),
            _ => false,
        }
    }

    fn tick(&mut self, fired_at: Instant) -> bool {
        let idx = match self.state {
            RevealState::Revealing(idx) if idx < self.operands.len() => idx,
            _ => {
                self.deadline = None;
                return false;
            }
        };

        if !self.shown.is_empty() {
            self.shown.push_str("  ");
        }
        self.shown.push_str(&self.operands[idx]);

        let next = idx + 1;
        if next == self.operands.len() {
            self.shown = self.operands.join("  ");
            self.state = RevealState::Done;
            self.deadline = None;
        } else {
            self.state = RevealState::Revealing(next);
            self.deadline = Some(fired_at + self.interval);
        }
        true
    }

    /// Partial text revealed so far
    pub fn shown(&self) -> &str {
        &self.shown
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, RevealState::Revealing(_))
    }

    pub fn is_done(&self) -> bool {
        self.state == RevealState::Done
    }

    pub fn speed_ms(&self) -> u64 {
        self.interval.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::question::flash_series;
    use crate::generator::SeededRandom;

    fn flash_question() -> Question {
        let mut rng = SeededRandom::new(13);
        flash_series(5, 2, &mut rng)
    }

    /// Drive the scheduler to completion, collecting every shown state
    fn run_to_done(scheduler: &mut RevealScheduler, start: Instant) -> Vec<String> {
        let mut states = Vec::new();
        let mut now = start;
        for _ in 0..100 {
            now += Duration::from_millis(scheduler.speed_ms());
            if scheduler.poll(now) {
                states.push(scheduler.shown().to_string());
            }
            if scheduler.is_done() {
                break;
            }
        }
        states
    }

    #[test]
    fn test_reveals_each_operand_once_in_order() {
        let q = flash_question();
        let mut scheduler = RevealScheduler::new(700);
        let start = Instant::now();
        scheduler.begin(&q, start);
        assert!(scheduler.is_active());
        assert_eq!(scheduler.shown(), "");

        let states = run_to_done(&mut scheduler, start);
        assert_eq!(states.len(), 5);
        // Each state grows by exactly one operand, in generation order
        let operands: Vec<&str> = q.text.split_whitespace().collect();
        for (i, state) in states.iter().enumerate() {
            assert_eq!(state, &operands[..=i].join("  "));
        }
        assert!(scheduler.is_done());
        assert_eq!(scheduler.shown(), q.text);
    }

    #[test]
    fn test_poll_before_deadline_is_a_no_op() {
        let q = flash_question();
        let mut scheduler = RevealScheduler::new(700);
        let start = Instant::now();
        scheduler.begin(&q, start);
        assert!(!scheduler.poll(start + Duration::from_millis(100)));
        assert_eq!(scheduler.shown(), "");
    }

    #[test]
    fn test_done_scheduler_stops_mutating() {
        let q = flash_question();
        let mut scheduler = RevealScheduler::new(700);
        let start = Instant::now();
        scheduler.begin(&q, start);
        run_to_done(&mut scheduler, start);

        let full = scheduler.shown().to_string();
        assert!(!scheduler.poll(start + Duration::from_secs(60)));
        assert_eq!(scheduler.shown(), full);
    }

    #[test]
    fn test_new_question_cancels_pending_sequence() {
        let q1 = flash_question();
        let mut rng = SeededRandom::new(17);
        let q2 = flash_series(4, 2, &mut rng);

        let mut scheduler = RevealScheduler::new(700);
        let start = Instant::now();
        scheduler.begin(&q1, start);
        scheduler.poll(start + Duration::from_millis(700));
        assert!(!scheduler.shown().is_empty());

        // Re-arming resets the display and the index
        let restart = start + Duration::from_millis(900);
        scheduler.begin(&q2, restart);
        assert_eq!(scheduler.shown(), "");
        let states = run_to_done(&mut scheduler, restart);
        assert_eq!(states.len(), 4);
        assert_eq!(scheduler.shown(), q2.text);
    }

    #[test]
    fn test_set_speed_cancels_and_clamps() {
        let q = flash_question();
        let mut scheduler = RevealScheduler::new(700);
        let start = Instant::now();
        scheduler.begin(&q, start);
        scheduler.poll(start + Duration::from_millis(700));

        scheduler.set_speed(10);
        assert_eq!(scheduler.speed_ms(), MIN_REVEAL_MS);
        assert!(!scheduler.is_active());
        assert_eq!(scheduler.shown(), "");

        scheduler.set_speed(9999);
        assert_eq!(scheduler.speed_ms(), MAX_REVEAL_MS);
    }

    #[test]
    fn test_non_flash_question_stays_idle() {
        let mut rng = SeededRandom::new(19);
        let q = crate::generator::question::times_eleven(2, &mut rng);
        let mut scheduler = RevealScheduler::new(700);
        scheduler.begin(&q, Instant::now());
        assert!(!scheduler.is_active());
        assert!(!scheduler.is_done());
        assert_eq!(scheduler.shown(), "");
    }

    #[test]
    fn test_early_scoring_does_not_stop_the_sequence() {
        use crate::generator::{GenParams, Mode};
        use crate::session::store::MemoryStorage;
        use crate::session::{AttemptLog, Session};

        let mut rng = SeededRandom::new(29);
        let mut session = Session::new(
            Mode::FlashSeries,
            GenParams::default(),
            AttemptLog::load(Box::new(MemoryStorage::new())),
        );
        session.start(&mut rng);

        let mut scheduler = RevealScheduler::new(700);
        let start = Instant::now();
        scheduler.begin(session.question().unwrap(), start);
        scheduler.poll(start + Duration::from_millis(700));
        assert!(scheduler.is_active());

        // Answering before the last flash scores the attempt but leaves the
        // scheduler free to run the remaining operands to completion
        session.set_input("0");
        assert!(session.submit().is_some());
        let states = run_to_done(&mut scheduler, start + Duration::from_millis(700));
        assert!(!states.is_empty());
        assert!(scheduler.is_done());
        assert_eq!(scheduler.shown(), session.question().unwrap().text);
    }

    #[test]
    fn test_cancel_clears_everything() {
        let q = flash_question();
        let mut scheduler = RevealScheduler::new(700);
        let start = Instant::now();
        scheduler.begin(&q, start);
        scheduler.poll(start + Duration::from_millis(700));

        scheduler.cancel();
        assert!(!scheduler.is_active());
        assert_eq!(scheduler.shown(), "");
        // No deadline left to fire
        assert!(!scheduler.poll(start + Duration::from_secs(10)));
    }
}
