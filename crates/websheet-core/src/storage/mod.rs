//! File formats.

mod csv;
mod snapshot;

pub use self::csv::{parse_csv, write_csv};
pub use self::snapshot::{Snapshot, iso_timestamp};
