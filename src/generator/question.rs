//! Question generation for the seven practice techniques
//!
//! Each generator is a pure function of (parameters, random source) and
//! produces an immutable `Question`. The `answer` field is always the exact
//! string form of the true arithmetic result for the operands embedded in
//! `text`, whatever the hint narrates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rng::RandomSource;

/// Operand digit counts supported by the drills.
pub const MIN_DIGITS: u32 = 1;
pub const MAX_DIGITS: u32 = 5;

/// Flash-series round length bounds.
pub const MIN_FLASH_COUNT: u32 = 3;
pub const MAX_FLASH_COUNT: u32 = 12;

/// Fixed spans used by the interactive flow for the square drills.
pub const SQUARE50_SPAN: i64 = 15;
pub const SQUARE100_SPAN: i64 = 20;

const X11_HINT: &str = "Rule: write ends, each middle digit = sum of neighbors. \
Example 452×11 → 4 | (4+5)=9 | (5+2)=7 | 2 → 4972.";
const X12_HINT: &str =
    "Rule: double each digit and add neighbor (carry as needed). Good warm-up for Trachtenberg.";
const FLASH_HINT: &str =
    "Flash Anzan: keep a running sum (chunk by complements to 10 if helpful).";

/// Practice technique tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "arithmetic")]
    Arithmetic,
    #[serde(rename = "x11")]
    TimesEleven,
    #[serde(rename = "x12")]
    TimesTwelve,
    #[serde(rename = "nearHundred")]
    NearHundred,
    #[serde(rename = "square50")]
    SquareNear50,
    #[serde(rename = "square100")]
    SquareNear100,
    #[serde(rename = "flashAnzan")]
    FlashSeries,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Arithmetic,
        Mode::TimesEleven,
        Mode::TimesTwelve,
        Mode::NearHundred,
        Mode::SquareNear50,
        Mode::SquareNear100,
        Mode::FlashSeries,
    ];

    /// Parse a mode name from the command line. Unknown names yield `None`
    /// and the session stays idle; inside the engine dispatch is exhaustive.
    pub fn parse(name: &str) -> Option<Mode> {
        match name {
            "arithmetic" => Some(Mode::Arithmetic),
            "x11" => Some(Mode::TimesEleven),
            "x12" => Some(Mode::TimesTwelve),
            "nearHundred" | "near100" => Some(Mode::NearHundred),
            "square50" => Some(Mode::SquareNear50),
            "square100" => Some(Mode::SquareNear100),
            "flashAnzan" | "flash" => Some(Mode::FlashSeries),
            _ => None,
        }
    }

    /// Canonical tag, as stored in the attempt log.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Arithmetic => "arithmetic",
            Mode::TimesEleven => "x11",
            Mode::TimesTwelve => "x12",
            Mode::NearHundred => "nearHundred",
            Mode::SquareNear50 => "square50",
            Mode::SquareNear100 => "square100",
            Mode::FlashSeries => "flashAnzan",
        }
    }

    /// Lesson title shown when a drill starts
    pub fn title(&self) -> &'static str {
        match self {
            Mode::Arithmetic => "Arithmetic (+ − × ÷)",
            Mode::TimesEleven => "Trachtenberg ×11",
            Mode::TimesTwelve => "Trachtenberg ×12",
            Mode::NearHundred => "Vedic: Near 100",
            Mode::SquareNear50 => "Square near 50",
            Mode::SquareNear100 => "Square near 100",
            Mode::FlashSeries => "Flash Anzan (sums)",
        }
    }

    /// One-paragraph lesson text for the technique
    pub fn lesson(&self) -> &'static str {
        match self {
            Mode::Arithmetic => {
                "Practice basic arithmetic operations. Use mental shortcuts for \
                 addition, subtraction, multiplication, and division."
            }
            Mode::TimesEleven => {
                "Multiply any number by 11 quickly: Add each digit to its neighbor \
                 and place the results in order."
            }
            Mode::TimesTwelve => "Multiply by 12: Double the number and add its neighbor.",
            Mode::NearHundred => {
                "Use Vedic techniques to multiply numbers close to 100. Subtract \
                 from 100, cross-subtract, and multiply the differences."
            }
            Mode::SquareNear50 => {
                "Square numbers near 50 using the formula: (50 + x)^2 = 2500 + 100x + x^2."
            }
            Mode::SquareNear100 => {
                "Square numbers near 100 using the formula: (100 + x)^2 = 10000 + 200x + x^2."
            }
            Mode::FlashSeries => "Practice rapid mental addition with a series of flashed numbers.",
        }
    }
}

/// Arithmetic operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    /// Glyph used in question text
    pub fn glyph(&self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '×',
            Op::Div => '÷',
        }
    }

    /// Parse an operator character from the `--ops` flag (ASCII aliases accepted)
    pub fn parse(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' | '−' => Some(Op::Sub),
            'x' | 'X' | '*' | '×' => Some(Op::Mul),
            '/' | '÷' => Some(Op::Div),
            _ => None,
        }
    }
}

/// One generated problem. Immutable after creation; discarded when the
/// session advances.
#[derive(Clone, Debug)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub answer: String,
    pub mode: Mode,
    pub hint: Option<String>,
}

impl Question {
    fn new(text: String, answer: String, mode: Mode, hint: Option<String>) -> Self {
        Question {
            id: Uuid::new_v4(),
            text,
            answer,
            mode,
            hint,
        }
    }
}

/// Shared generation parameters for a drill
#[derive(Clone, Debug)]
pub struct GenParams {
    /// Operand digit count (clamped to 1-5)
    pub digits: u32,
    /// Operator pool for arithmetic mode
    pub ops: Vec<Op>,
    /// Allow negative subtraction answers
    pub allow_negative: bool,
    /// Numbers per flash round (clamped to 3-12)
    pub flash_count: u32,
}

impl Default for GenParams {
    fn default() -> Self {
        GenParams {
            digits: 2,
            ops: Op::ALL.to_vec(),
            allow_negative: false,
            flash_count: 5,
        }
    }
}

/// Inclusive operand range for a digit count. One-digit operands start at 0.
fn operand_range(digits: u32) -> (i64, i64) {
    let digits = digits.clamp(MIN_DIGITS, MAX_DIGITS);
    let max = 10i64.pow(digits) - 1;
    let min = if digits == 1 {
        0
    } else {
        10i64.pow(digits - 1)
    };
    (min, max)
}

/// Near-100 span used by the interactive flow: the shared digits control is
/// clamped into a sane difficulty range rather than used as a magnitude.
pub fn near_hundred_span(digits: u32) -> i64 {
    10i64.pow(digits.clamp(MIN_DIGITS, MAX_DIGITS) - 1).clamp(2, 20)
}

/// Generate a question for `mode`. Dispatch is exhaustive over the seven
/// techniques, so adding one is a compile-time change.
pub fn generate(mode: Mode, params: &GenParams, rng: &mut dyn RandomSource) -> Question {
    match mode {
        Mode::Arithmetic => arithmetic(params.digits, &params.ops, params.allow_negative, rng),
        Mode::TimesEleven => times_eleven(params.digits, rng),
        Mode::TimesTwelve => times_twelve(params.digits, rng),
        Mode::NearHundred => near_hundred(near_hundred_span(params.digits), rng),
        Mode::SquareNear50 => square_near_50(SQUARE50_SPAN, rng),
        Mode::SquareNear100 => square_near_100(SQUARE100_SPAN, rng),
        Mode::FlashSeries => flash_series(params.flash_count, params.digits, rng),
    }
}

/// Plain arithmetic with one operator picked from the pool. Division draws
/// divisor and quotient and reconstructs the dividend, so the result is
/// always an exact integer.
pub fn arithmetic(digits: u32, ops: &[Op], allow_negative: bool, rng: &mut dyn RandomSource) -> Question {
    let op = if ops.is_empty() {
        Op::Add
    } else {
        ops[rng.index(ops.len())]
    };
    let (min, max) = operand_range(digits);
    let mut a = rng.int_in(min, max);
    let mut b = rng.int_in(min, max);

    match op {
        Op::Div => {
            b = rng.int_in(1, max);
            let q = rng.int_in(min, max);
            a = b * q;
        }
        Op::Sub if !allow_negative && b > a => std::mem::swap(&mut a, &mut b),
        _ => {}
    }

    let answer = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
    };

    Question::new(
        format!("{} {} {}", a, op.glyph(), b),
        answer.to_string(),
        Mode::Arithmetic,
        None,
    )
}

/// ×11 drill with the neighbor-sum shortcut as a fixed hint
pub fn times_eleven(digits: u32, rng: &mut dyn RandomSource) -> Question {
    let (min, max) = operand_range(digits);
    let a = rng.int_in(min, max);
    Question::new(
        format!("{} × 11", a),
        (a * 11).to_string(),
        Mode::TimesEleven,
        Some(X11_HINT.to_string()),
    )
}

/// ×12 drill with the double-and-add-neighbor shortcut as a fixed hint
pub fn times_twelve(digits: u32, rng: &mut dyn RandomSource) -> Question {
    let (min, max) = operand_range(digits);
    let a = rng.int_in(min, max);
    Question::new(
        format!("{} × 12", a),
        (a * 12).to_string(),
        Mode::TimesTwelve,
        Some(X12_HINT.to_string()),
    )
}

/// Vedic near-100 multiplication. The numeric answer is always the true
/// product; the hint narrates the Nikhilam digit concatenation, which only
/// matches the product while `right < 100`. The divergence beyond that is
/// kept as-is.
pub fn near_hundred(span: i64, rng: &mut dyn RandomSource) -> Question {
    let span = span.max(1);
    let d1 = rng.int_in(1, span);
    let d2 = rng.int_in(1, span);
    let a = 100 - d1;
    let b = 100 - d2;
    let left = 100 - (d1 + d2);
    let right = d1 * d2;
    let hint = format!(
        "Nikhilam: diffs are {d1} and {d2}. Left = {a}-{d2}={left}. \
         Right = {d1}×{d2}={right} → {left}{right:02}."
    );
    Question::new(
        format!("{} × {}", a, b),
        (a * b).to_string(),
        Mode::NearHundred,
        Some(hint),
    )
}

/// Square of `50 + x` with `x` in `[-span, span]`
pub fn square_near_50(span: i64, rng: &mut dyn RandomSource) -> Question {
    let span = span.max(1);
    let x = rng.int_in(-span, span);
    let n = 50 + x;
    Question::new(
        format!("{}²", n),
        (n * n).to_string(),
        Mode::SquareNear50,
        Some(format!("(50+x)^2 = 2500 + 100x + x^2. Here x={x}.")),
    )
}

/// Square of `100 - x` with `x` in `[1, span]`
pub fn square_near_100(span: i64, rng: &mut dyn RandomSource) -> Question {
    let span = span.max(1);
    let x = rng.int_in(1, span);
    let n = 100 - x;
    Question::new(
        format!("{}²", n),
        (n * n).to_string(),
        Mode::SquareNear100,
        Some(format!("(100-x)^2 = 10000 - 200x + x^2. Here x={x}.")),
    )
}

/// Flash-anzan summation round: `count` operands joined by double space,
/// answer is their sum.
pub fn flash_series(count: u32, digits: u32, rng: &mut dyn RandomSource) -> Question {
    let count = count.clamp(MIN_FLASH_COUNT, MAX_FLASH_COUNT);
    let (min, max) = operand_range(digits);
    let nums: Vec<i64> = (0..count).map(|_| rng.int_in(min, max)).collect();
    let text = nums
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("  ");
    let sum: i64 = nums.iter().sum();
    Question::new(text, sum.to_string(), Mode::FlashSeries, Some(FLASH_HINT.to_string()))
}
