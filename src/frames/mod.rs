//! Frame concatenation and reduction
//!
//! A run is a fixed sequence of `Volume -> Volume` stages:
//! - `concat`: stack the frames of every input, in order
//! - `paired`: combine adjacent frame pairs (average, difference, normalised differences)
//! - `reduce`: collapse all frames into one (mean, std, max)
//!
//! `pipeline` sequences the stages for a validated configuration.

pub mod concat;
pub mod paired;
pub mod reduce;
pub mod pipeline;

pub use concat::{concatenate, probe_inputs, InputSummary};
pub use paired::reduce_paired;
pub use reduce::reduce_across_frames;
pub use pipeline::{run_concat, run_stages};
