//! Market Observation Frames
//!
//! Shared column-oriented table consumed by the ingestion, validation,
//! feature, and serving crates. A frame is an ordered set of named columns
//! (UTC timestamps, floats, or text) of equal length; every transformation
//! returns a new frame and leaves its input untouched.

mod error;
mod frame;
pub mod schema;

pub use error::FrameError;
pub use frame::{Column, ColumnKind, Frame};
pub use schema::{Source, UnknownSource};
