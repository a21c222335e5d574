//! Data model shared by the AWDRIP translation crates.
//!
//! Everything here is plain data: source records, the output-field template,
//! catalog entries and per-file tallies. Loading and behaviour live in the
//! ingest, catalog and emit crates.

pub mod catalog;
pub mod record;
pub mod tally;
pub mod template;

pub use catalog::{Destination, EXCLUDE_MARKER, SourceDirectory, WorkStatus};
pub use record::InputRecord;
pub use tally::FileTally;
pub use template::{FieldStrategy, FieldTemplate, OutputTemplate, ReservedField};

/// Column carrying the source-system identifier.
pub const SYSTEM_ID_COLUMN: &str = "SystemID";

/// Column carrying the policy number.
pub const POLICY_NUMBER_COLUMN: &str = "PolicyNumber";

/// Policy number value that marks a row as not exportable.
pub const POLICY_NOT_AVAILABLE: &str = "NA";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_serializes() {
        let tally = FileTally {
            total: 4,
            processed: 3,
            failed: 1,
        };
        let json = serde_json::to_string(&tally).expect("serialize tally");
        let round: FileTally = serde_json::from_str(&json).expect("deserialize tally");
        assert_eq!(round, tally);
        assert_eq!(round.ignored(), 1);
    }
}
