//! Question Generation: techniques, parameters, and random sources
//!
//! # Components
//! - `question.rs`: Mode/Op tags, Question record, the seven generators
//! - `rng.rs`: injectable random-integer sources (thread-local and seeded)

pub mod question;
pub mod rng;

pub use question::{generate, GenParams, Mode, Op, Question};
pub use rng::{RandomSource, SeededRandom, ThreadRandom};
