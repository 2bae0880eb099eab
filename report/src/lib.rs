//! Output writers for a finished leaderboard run: CSV snapshots and the
//! README tables. Writers only read the records they are given.

pub mod csv_writer;
pub mod readme;

use thiserror::Error;

pub use csv_writer::{write_rows, write_snapshot_csv, write_tier_csvs};
pub use readme::{render_readme, write_readme};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ReportError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
