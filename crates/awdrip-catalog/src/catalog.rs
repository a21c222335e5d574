//! Translation catalog: destination and status lookups by source-system id.

use std::collections::HashMap;

use awdrip_model::{Destination, WorkStatus};

/// Immutable lookup tables keyed by source-system id.
///
/// Ids are matched exactly. When the status table lists an id more than once
/// the first row wins.
#[derive(Debug, Clone, Default)]
pub struct TranslationCatalog {
    destinations: HashMap<String, Destination>,
    statuses: HashMap<String, WorkStatus>,
}

impl TranslationCatalog {
    /// Build a catalog from destination entries and ordered status rows.
    ///
    /// Returns the catalog together with the ids whose status rows were
    /// shadowed by an earlier row.
    pub fn build<D, S>(destinations: D, status_rows: S) -> (Self, Vec<String>)
    where
        D: IntoIterator<Item = (String, Destination)>,
        S: IntoIterator<Item = (String, WorkStatus)>,
    {
        let destinations = destinations.into_iter().collect();
        let mut statuses = HashMap::new();
        let mut shadowed = Vec::new();
        for (id, status) in status_rows {
            if statuses.contains_key(&id) {
                if !shadowed.contains(&id) {
                    shadowed.push(id);
                }
                continue;
            }
            statuses.insert(id, status);
        }
        (
            Self {
                destinations,
                statuses,
            },
            shadowed,
        )
    }

    pub fn destination(&self, system_id: &str) -> Option<&Destination> {
        self.destinations.get(system_id)
    }

    pub fn status(&self, system_id: &str) -> Option<&WorkStatus> {
        self.statuses.get(system_id)
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    pub fn status_count(&self) -> usize {
        self.statuses.len()
    }

    /// Number of ids routed to a unit rather than excluded.
    pub fn exportable_count(&self) -> usize {
        self.destinations
            .values()
            .filter(|destination| !destination.is_excluded())
            .count()
    }
}
