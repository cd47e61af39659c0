//! # Lifecycle Module
//!
//! The phase progression engine: six ordered phases, the sequential unlock
//! rule and aggregate project progress.
//!
//! Editors never touch the board directly. They report a percentage upward
//! and the owning [`crate::ProjectSession`] forwards it here, so the board
//! has exactly one writer.

mod board;
mod phase;

pub use board::*;
pub use phase::*;
