//! Math Trainer - timed mental-math practice drills
//!
//! Single-session, self-contained CLI application. Seven techniques:
//! arithmetic, Trachtenberg ×11/×12, Vedic near-100 multiplication,
//! squares near 50/100, and flash-anzan summation.

mod cli;
mod generator;
mod session;

use clap::Parser;
use cli::display::Display;
use cli::input::InputHandler;
use generator::{GenParams, Mode, Op, RandomSource, SeededRandom, ThreadRandom};
use session::stats::mode_breakdown;
use session::{AttemptLog, JsonFileStorage, RevealScheduler, Session};
use std::error::Error;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "Math Trainer")]
#[command(about = "Timed mental-math drills: arithmetic, Trachtenberg, Vedic, flash anzan")]
struct Args {
    /// Technique: arithmetic, x11, x12, nearHundred, square50, square100, flashAnzan
    #[arg(short, long, default_value = "arithmetic")]
    mode: String,

    /// Operand digit count (1-5)
    #[arg(short, long, default_value = "2")]
    digits: u32,

    /// Operators for arithmetic mode, e.g. "+-x/"
    #[arg(short, long, default_value = "+-x/")]
    ops: String,

    /// Allow negative subtraction answers
    #[arg(long)]
    allow_negative: bool,

    /// Numbers per flash round (3-12)
    #[arg(long, default_value = "5")]
    count: u32,

    /// Flash reveal speed in milliseconds (250-1500)
    #[arg(long, default_value = "700")]
    speed: u64,

    /// RNG seed for a reproducible drill
    #[arg(long)]
    seed: Option<u64>,

    /// Attempt history file
    #[arg(long, default_value = "data/attempts.json")]
    store: String,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,
}

/// Parse the operator pool from the --ops flag. Unrecognized characters are
/// skipped; an empty result falls back to all four operators.
fn parse_ops(raw: &str) -> Vec<Op> {
    let mut ops = Vec::new();
    for c in raw.chars() {
        if let Some(op) = Op::parse(c) {
            if !ops.contains(&op) {
                ops.push(op);
            }
        }
    }
    if ops.is_empty() {
        ops = Op::ALL.to_vec();
    }
    ops
}

fn render(
    display: &Display,
    session: &Session,
    reveal: &RevealScheduler,
) -> Result<(), Box<dyn Error>> {
    display.clear()?;
    display.show_lesson(session.mode())?;
    display.show_stats(session.stats(), session.attempts().len())?;
    if let Some(q) = session.question() {
        let text = if q.mode == Mode::FlashSeries {
            reveal.shown()
        } else {
            q.text.as_str()
        };
        display.show_question(text)?;
        display.show_input(session.input(), session.feedback())?;
        display.show_feedback(session.feedback(), &q.answer)?;
        if session.hint_open() {
            if let Some(hint) = &q.hint {
                display.show_hint(hint)?;
            }
        }
    }
    display.show_help()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let Some(mode) = Mode::parse(&args.mode) else {
        return Err(format!(
            "Unknown mode: {} (expected arithmetic, x11, x12, nearHundred, square50, square100, flashAnzan)",
            args.mode
        )
        .into());
    };

    let params = GenParams {
        digits: args.digits,
        ops: parse_ops(&args.ops),
        allow_negative: args.allow_negative,
        flash_count: args.count,
    };

    let mut rng: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom::new()),
    };

    let log = AttemptLog::load(Box::new(JsonFileStorage::new(&args.store)));
    if args.debug {
        println!("✓ Attempt history loaded: {} rows from {}", log.len(), args.store);
    }

    let mut session = Session::new(mode, params, log);
    let mut reveal = RevealScheduler::new(args.speed);

    let display = Display::new()?;
    InputHandler::enable_raw_mode()?;
    let input = InputHandler::new();

    session.start(rng.as_mut());
    if let Some(q) = session.question() {
        reveal.begin(q, Instant::now());
    }
    let mut dirty = true;

    // Event loop
    'drill: loop {
        if reveal.poll(Instant::now()) {
            dirty = true;
        }
        if dirty {
            render(&display, &session, &reveal)?;
            dirty = false;
        }

        let Some(key) = input.read_key()? else {
            continue;
        };
        dirty = true;

        if InputHandler::is_exit(&key) {
            break 'drill;
        }

        if InputHandler::is_enter(&key) {
            if session.is_running() {
                // An early submit leaves the reveal flashing to completion,
                // so the full sequence ends up next to the revealed answer
                session.submit();
            } else {
                session.next(rng.as_mut());
                if let Some(q) = session.question() {
                    reveal.begin(q, Instant::now());
                }
            }
            continue;
        }

        if InputHandler::is_backspace(&key) {
            session.pop_char();
            continue;
        }

        if InputHandler::is_hint(&key) {
            session.open_hint();
            continue;
        }

        if let Some(c) = InputHandler::answer_char(&key) {
            session.push_char(c);
        }
    }

    // Cleanup; Display owns restoring the terminal
    display.shutdown()?;

    // Summary
    let stats = session.stats();
    println!("\n🎉 Session Complete!");
    println!(
        "📊 Accuracy (last 100): {}% | Avg ms (last 50): {} | Attempts: {}",
        stats.accuracy_percent,
        stats.avg_latency_ms,
        session.attempts().len()
    );

    let breakdown = mode_breakdown(session.attempts());
    for m in Mode::ALL {
        if let Some(&(attempted, correct)) = breakdown.get(&m) {
            println!("   {:<12} {}/{} correct", m.label(), correct, attempted);
        }
    }

    let recent = session.attempts();
    let start = recent.len().saturating_sub(10);
    if start < recent.len() {
        println!("\nRecent attempts:");
        for row in recent[start..].iter().rev() {
            println!(
                "   {:<24} {:<12} {:>6}ms  {}",
                row.q,
                row.mode.label(),
                row.ms,
                if row.correct { "✓" } else { "✗" }
            );
        }
    }

    println!("🧮 Thanks for practicing!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ops_aliases() {
        assert_eq!(parse_ops("+-x/"), vec![Op::Add, Op::Sub, Op::Mul, Op::Div]);
        assert_eq!(parse_ops("×÷"), vec![Op::Mul, Op::Div]);
        assert_eq!(parse_ops("*"), vec![Op::Mul]);
    }

    #[test]
    fn test_parse_ops_dedups_and_skips_junk() {
        assert_eq!(parse_ops("++ab+"), vec![Op::Add]);
    }

    #[test]
    fn test_parse_ops_empty_falls_back_to_all() {
        assert_eq!(parse_ops(""), Op::ALL.to_vec());
        assert_eq!(parse_ops("qq"), Op::ALL.to_vec());
    }
}
