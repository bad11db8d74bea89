//! Terminal display and UI rendering
//!
//! Features:
//! - Question display, with partial text during a flash reveal
//! - Input echo colored by feedback state
//! - Accuracy / average-latency header
//! - Feedback banner and hint panel

use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

use crate::generator::Mode;
use crate::session::stats::SessionStats;
use crate::session::Feedback;

/// Terminal display manager
pub struct Display;

impl Display {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Display)
    }

    /// Clear screen
    pub fn clear(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        Ok(())
    }

    /// Title and lesson text for the active technique
    pub fn show_lesson(&self, mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Cyan),
            Print(format!("Math Trainer — {}", mode.title())),
            ResetColor,
            Print("\n"),
            SetForegroundColor(Color::DarkGrey),
            Print(mode.lesson()),
            ResetColor,
            Print("\n")
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Session header: accuracy and latency over the recent windows
    pub fn show_stats(&self, stats: SessionStats, total: usize) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 3),
            SetForegroundColor(Color::Magenta),
            Print("Session: "),
            ResetColor,
            Print("Accuracy: "),
            SetForegroundColor(if stats.accuracy_percent >= 90 {
                Color::Green
            } else if stats.accuracy_percent >= 70 {
                Color::Yellow
            } else {
                Color::Red
            }),
            Print(format!("{}%", stats.accuracy_percent)),
            ResetColor,
            Print(format!(
                "  |  Avg ms (last 50): {}  |  Attempts: {}\n",
                stats.avg_latency_ms, total
            ))
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Render the question line. During a flash reveal the partial text is
    /// shown instead; an armed-but-not-started reveal shows an ellipsis.
    pub fn show_question(&self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        let shown = if text.is_empty() { "…" } else { text };
        execute!(
            stdout,
            cursor::MoveTo(0, 5),
            SetForegroundColor(Color::Cyan),
            Print("Question: "),
            ResetColor,
            Print(shown),
            terminal::Clear(ClearType::UntilNewLine),
            Print("\n")
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Echo the user's input, colored by feedback once scored
    pub fn show_input(&self, input: &str, feedback: Feedback) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        let color = match feedback {
            Feedback::Idle => Color::White,
            Feedback::Correct => Color::Green,
            Feedback::Wrong => Color::Red,
        };
        execute!(
            stdout,
            cursor::MoveTo(0, 6),
            SetForegroundColor(Color::Yellow),
            Print("Your answer: "),
            SetForegroundColor(color),
            Print(input),
            ResetColor,
            Print("_"),
            terminal::Clear(ClearType::UntilNewLine),
            Print("\n")
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Feedback banner; a wrong answer reveals the correct one
    pub fn show_feedback(
        &self,
        feedback: Feedback,
        answer: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(stdout, cursor::MoveTo(0, 8))?;
        match feedback {
            Feedback::Correct => {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print("Correct!"),
                    ResetColor,
                    Print("  (Enter for next)\n")
                )?;
            }
            Feedback::Wrong => {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Red),
                    Print("Oops — correct answer is "),
                    Print(answer),
                    ResetColor,
                    Print(".  (Enter for next)\n")
                )?;
            }
            Feedback::Idle => {}
        }
        stdout.flush()?;
        Ok(())
    }

    /// Hint panel below the feedback banner
    pub fn show_hint(&self, hint: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 9),
            SetForegroundColor(Color::DarkYellow),
            Print("Hint: "),
            ResetColor,
            Print(hint),
            Print("\n")
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Show help text
    pub fn show_help(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, 11),
            SetForegroundColor(Color::DarkGrey),
            Print("ENTER submit/next  |  h hint  |  Esc or Ctrl+C exit\n"),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}
