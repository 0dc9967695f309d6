use super::types::{ColumnKind, SortDirection};

/// One API-visible field of a listable table
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Name used in query strings and JSON output
    pub field: &'static str,
    /// Backing database column
    pub column: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(field: &'static str, column: &'static str, kind: ColumnKind) -> Self {
        Self { field, column, kind }
    }
}

/// Static description of a table the filter can list
#[derive(Debug)]
pub struct Collection {
    pub table: &'static str,
    pub columns: &'static [Column],
    /// Fields matched by the free-text `q` parameter
    pub search_fields: &'static [&'static str],
    pub default_sort: &'static [(&'static str, SortDirection)],
}

impl Collection {
    pub fn column(&self, field: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn id_column(&self) -> Option<&'static Column> {
        self.column("id")
    }
}
