//! Session state machine
//!
//! idle → running → scored, then back to running on `next()`. Scoring is
//! exact string comparison on trimmed input ("7" does not match "7.0");
//! latency runs from the moment the question was generated.

use std::time::{Instant, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::stats::{self, SessionStats};
use super::store::{Attempt, AttemptLog};
use crate::generator::{generate, GenParams, Mode, Question, RandomSource};

/// Outcome of the current question
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Idle,
    Correct,
    Wrong,
}

/// Transient per-session state. Owns the current question, the user's raw
/// input, and the attempt log.
pub struct Session {
    mode: Mode,
    params: GenParams,
    question: Option<Question>,
    answer_input: String,
    feedback: Feedback,
    hint_open: bool,
    running: bool,
    started_at: Option<Instant>,
    log: AttemptLog,
}

#[allow(dead_code)]
impl Session {
    pub fn new(mode: Mode, params: GenParams, log: AttemptLog) -> Self {
        Session {
            mode,
            params,
            question: None,
            answer_input: String::new(),
            feedback: Feedback::Idle,
            hint_open: false,
            running: false,
            started_at: None,
            log,
        }
    }

    /// Generate the next question, clear input and feedback, arm the timer
    pub fn start(&mut self, rng: &mut dyn RandomSource) {
        self.question = Some(generate(self.mode, &self.params, rng));
        self.answer_input.clear();
        self.feedback = Feedback::Idle;
        self.hint_open = false;
        self.running = true;
        self.started_at = Some(Instant::now());
    }

    /// Discard the current question and deal the next one
    pub fn next(&mut self, rng: &mut dyn RandomSource) {
        self.start(rng);
    }

    /// Score the current input. Valid only while running; out-of-order calls
    /// (no question, or already scored) are ignored and return `None`.
    pub fn submit(&mut self) -> Option<Feedback> {
        if !self.running {
            return None;
        }
        let (question, started) = match (&self.question, self.started_at) {
            (Some(q), Some(t)) => (q, t),
            _ => return None,
        };

        let ms = started.elapsed().as_millis() as u64;
        let correct = self.answer_input.trim() == question.answer;
        self.feedback = if correct {
            Feedback::Correct
        } else {
            Feedback::Wrong
        };
        self.running = false;

        let attempt = Attempt {
            id: Uuid::new_v4(),
            q: question.text.clone(),
            mode: question.mode,
            correct,
            ms,
            timestamp: epoch_ms(),
        };
        // Persisting the log is best effort; a failed write never blocks scoring.
        let _ = self.log.append(attempt);

        Some(self.feedback)
    }

    pub fn push_char(&mut self, c: char) {
        if self.running {
            self.answer_input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.running {
            self.answer_input.pop();
        }
    }

    pub fn set_input(&mut self, text: &str) {
        if self.running {
            self.answer_input = text.to_string();
        }
    }

    pub fn open_hint(&mut self) {
        if self.question.as_ref().is_some_and(|q| q.hint.is_some()) {
            self.hint_open = true;
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.answer_input
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn hint_open(&self) -> bool {
        self.hint_open
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Derived statistics over the attempt log
    pub fn stats(&self) -> SessionStats {
        stats::stats(self.log.rows())
    }

    pub fn attempts(&self) -> &[Attempt] {
        self.log.rows()
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SeededRandom;
    use crate::session::store::MemoryStorage;

    fn session(mode: Mode) -> Session {
        Session::new(
            mode,
            GenParams::default(),
            AttemptLog::load(Box::new(MemoryStorage::new())),
        )
    }

    #[test]
    fn test_starts_idle() {
        let s = session(Mode::Arithmetic);
        assert!(!s.is_running());
        assert!(s.question().is_none());
        assert_eq!(s.feedback(), Feedback::Idle);
    }

    #[test]
    fn test_submit_before_start_is_ignored() {
        let mut s = session(Mode::Arithmetic);
        assert_eq!(s.submit(), None);
        assert!(s.attempts().is_empty());
    }

    #[test]
    fn test_correct_submission() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::TimesEleven);
        s.start(&mut rng);
        assert!(s.is_running());

        let answer = s.question().unwrap().answer.clone();
        s.set_input(&answer);
        assert_eq!(s.submit(), Some(Feedback::Correct));
        assert!(!s.is_running());
        assert_eq!(s.attempts().len(), 1);
        assert!(s.attempts()[0].correct);
    }

    #[test]
    fn test_input_is_trimmed_before_comparison() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::TimesTwelve);
        s.start(&mut rng);
        let answer = s.question().unwrap().answer.clone();
        s.set_input(&format!("  {}  ", answer));
        assert_eq!(s.submit(), Some(Feedback::Correct));
    }

    #[test]
    fn test_no_numeric_coercion() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::Arithmetic);
        s.start(&mut rng);
        let answer = s.question().unwrap().answer.clone();
        // "7" and "7.0" are different strings, so this is wrong
        s.set_input(&format!("{}.0", answer));
        assert_eq!(s.submit(), Some(Feedback::Wrong));
        assert!(!s.attempts()[0].correct);
    }

    #[test]
    fn test_double_submit_is_ignored() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::Arithmetic);
        s.start(&mut rng);
        s.set_input("0");
        assert!(s.submit().is_some());
        assert_eq!(s.submit(), None);
        assert_eq!(s.attempts().len(), 1);
    }

    #[test]
    fn test_next_resets_input_and_feedback() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::SquareNear50);
        s.start(&mut rng);
        let first_id = s.question().unwrap().id;
        s.set_input("123");
        s.submit();

        s.next(&mut rng);
        assert!(s.is_running());
        assert_eq!(s.feedback(), Feedback::Idle);
        assert!(s.input().is_empty());
        assert!(!s.hint_open());
        assert_ne!(s.question().unwrap().id, first_id);
    }

    #[test]
    fn test_input_editing_only_while_running() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::Arithmetic);
        s.push_char('1');
        assert!(s.input().is_empty());

        s.start(&mut rng);
        s.push_char('4');
        s.push_char('2');
        s.pop_char();
        assert_eq!(s.input(), "4");

        s.submit();
        s.push_char('9');
        assert_eq!(s.input(), "4");
    }

    #[test]
    fn test_hint_opens_only_when_present() {
        let mut rng = SeededRandom::new(5);
        // Arithmetic questions carry no hint
        let mut s = session(Mode::Arithmetic);
        s.start(&mut rng);
        s.open_hint();
        assert!(!s.hint_open());

        let mut s = session(Mode::NearHundred);
        s.start(&mut rng);
        s.open_hint();
        assert!(s.hint_open());
    }

    #[test]
    fn test_attempt_latency_recorded() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::Arithmetic);
        s.start(&mut rng);
        std::thread::sleep(std::time::Duration::from_millis(5));
        s.set_input("0");
        s.submit();
        assert!(s.attempts()[0].ms >= 5);
        assert!(s.attempts()[0].timestamp > 0);
    }

    #[test]
    fn test_stats_reflect_log() {
        let mut rng = SeededRandom::new(5);
        let mut s = session(Mode::TimesEleven);
        for i in 0..4 {
            s.start(&mut rng);
            let answer = s.question().unwrap().answer.clone();
            if i % 2 == 0 {
                s.set_input(&answer);
            } else {
                s.set_input("wrong");
            }
            s.submit();
        }
        assert_eq!(s.stats().accuracy_percent, 50);
    }
}
