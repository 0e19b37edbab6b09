//! Data sources.
//!
//! - `synth`: seeded synthetic sales series
//! - `seasonal`: calendar-driven seasonal components used by the synthesizer

pub mod seasonal;
pub mod synth;

pub use synth::generate;
