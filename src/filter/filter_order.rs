use super::collection::Collection;
use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `field,-other` into order terms, `-` meaning descending
    pub fn parse(collection: &Collection, expr: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in expr.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (field, sort) = match trimmed.strip_prefix('-') {
                Some(rest) => (rest.trim(), SortDirection::Desc),
                None => (trimmed.trim_start_matches('+').trim(), SortDirection::Asc),
            };
            let column = collection
                .column(field)
                .ok_or_else(|| FilterError::InvalidColumn(field.to_string()))?;
            out.push(FilterOrderInfo {
                column: column.column,
                sort,
            });
        }
        Ok(out)
    }

    pub fn defaults(collection: &Collection) -> Vec<FilterOrderInfo> {
        collection
            .default_sort
            .iter()
            .filter_map(|(field, sort)| {
                collection.column(field).map(|c| FilterOrderInfo {
                    column: c.column,
                    sort: *sort,
                })
            })
            .collect()
    }

    /// Append `id ASC` unless the ordering already mentions the id column
    pub fn with_tie_breaker(collection: &Collection, mut infos: Vec<FilterOrderInfo>) -> Vec<FilterOrderInfo> {
        if let Some(id) = collection.id_column() {
            if !infos.iter().any(|i| i.column == id.column) {
                infos.push(FilterOrderInfo {
                    column: id.column,
                    sort: SortDirection::Asc,
                });
            }
        }
        infos
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}
