use std::sync::Arc;

/// One data row of a source file, keyed by the file's header.
///
/// The header is shared between all records of a file; a record only owns its
/// cell values. Column order follows the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl InputRecord {
    /// Build a record from a shared header and the row's values.
    ///
    /// Values beyond the header width are dropped; callers reject rows with
    /// fewer values before constructing a record.
    pub fn new(headers: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.truncate(headers.len());
        Self { headers, values }
    }

    /// Value of the first column named `column`, matched exactly.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|name| name == column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// Trimmed value of `column`, or an empty string if the column is absent.
    pub fn trimmed(&self, column: &str) -> &str {
        self.get(column).map(str::trim).unwrap_or("")
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Iterate `(column, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
