//! Output-field template: the ordered list of fields written per document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Output field names with a dedicated resolution strategy.
///
/// Names are matched exactly and case-sensitively; every other name is a
/// direct column copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservedField {
    /// `UNIT`: destination unit from the translation catalog.
    Unit,
    /// `SOON`: literal value from the template.
    Soon,
    /// `WRKT`: work type from the status table.
    WorkType,
    /// `STAT`: status from the status table.
    Status,
}

impl ReservedField {
    pub const ALL: [Self; 4] = [Self::Unit, Self::Soon, Self::WorkType, Self::Status];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "UNIT" => Some(Self::Unit),
            "SOON" => Some(Self::Soon),
            "WRKT" => Some(Self::WorkType),
            "STAT" => Some(Self::Status),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Unit => "UNIT",
            Self::Soon => "SOON",
            Self::WorkType => "WRKT",
            Self::Status => "STAT",
        }
    }
}

/// How a field's value is produced for a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldStrategy {
    /// Copy the named source column.
    Copy { column: String },
    /// Catalog destination for the row's system id, falling back to a column.
    Unit { fallback_column: Option<String> },
    /// Fixed value from the template.
    Literal { value: String },
    /// Work type from the status table.
    WorkType,
    /// Status from the status table.
    Status,
}

impl FieldStrategy {
    /// Short label used in listings and logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Copy { .. } => "copy",
            Self::Unit { .. } => "unit",
            Self::Literal { .. } => "literal",
            Self::WorkType => "work-type",
            Self::Status => "status",
        }
    }

    /// Source column read by this strategy, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Copy { column } => Some(column),
            Self::Unit { fallback_column } => fallback_column.as_deref(),
            Self::Literal { .. } | Self::WorkType | Self::Status => None,
        }
    }
}

impl fmt::Display for FieldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTemplate {
    pub name: String,
    pub strategy: FieldStrategy,
}

impl FieldTemplate {
    pub fn new(name: impl Into<String>, strategy: FieldStrategy) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

/// Ordered output fields. Document field order follows this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTemplate {
    fields: Vec<FieldTemplate>,
}

impl OutputTemplate {
    pub fn new(fields: Vec<FieldTemplate>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldTemplate] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldTemplate> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Distinct source columns referenced by copy and unit fields.
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = Vec::new();
        for field in &self.fields {
            if let Some(column) = field.strategy.column()
                && !columns.contains(&column)
            {
                columns.push(column);
            }
        }
        columns
    }
}

impl<'a> IntoIterator for &'a OutputTemplate {
    type Item = &'a FieldTemplate;
    type IntoIter = std::slice::Iter<'a, FieldTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
