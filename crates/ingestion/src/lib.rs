//! Market Data Ingestion
//!
//! Cleans raw vendor exports into the fixed processed schema and moves
//! frames to and from CSV storage. Downstream stages only ever see frames
//! that came out of [`clean_frame`], so every coercion quirk of the vendor
//! formats is contained here.

mod config;
mod error;
mod etl;
mod io;

pub use config::CleanConfig;
pub use error::IngestError;
pub use etl::clean_frame;
pub use io::{latest_processed, processed_file_name, processed_files, read_csv, write_csv};
