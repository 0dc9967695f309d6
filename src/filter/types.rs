use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::config::FilterConfig;

/// Query keys that drive the listing itself and are never treated as filters
pub const RESERVED_KEYS: [&str; 5] = ["page", "sort", "limit", "fields", "q"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    /// Maps the bracketed suffix of `field[op]` keys
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Bool,
    Uuid,
    Timestamp,
    Date,
}

impl ColumnKind {
    /// Parse a raw query-string value into a typed bind parameter
    pub fn parse(&self, raw: &str) -> Option<FilterValue> {
        let trimmed = raw.trim();
        match self {
            ColumnKind::Text => Some(FilterValue::Text(raw.to_string())),
            ColumnKind::Number => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FilterValue::Number),
            ColumnKind::Bool => trimmed.parse::<bool>().ok().map(FilterValue::Bool),
            ColumnKind::Uuid => Uuid::parse_str(trimmed).ok().map(FilterValue::Uuid),
            ColumnKind::Timestamp => DateTime::parse_from_rfc3339(trimmed)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                })
                .map(FilterValue::Timestamp),
            ColumnKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(FilterValue::Date),
        }
    }

    /// Rewrite a value rendered by Postgres `json_build_object` into the
    /// form serde produces for the matching model field
    pub fn normalize(&self, value: &mut Value) {
        match self {
            ColumnKind::Number => {
                if let Some(n) = value.as_f64() {
                    *value = Value::from(n);
                }
            }
            ColumnKind::Timestamp => {
                let parsed = value
                    .as_str()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .and_then(|dt| serde_json::to_value(dt.with_timezone(&Utc)).ok());
                if let Some(rendered) = parsed {
                    *value = rendered;
                }
            }
            ColumnKind::Text | ColumnKind::Bool | ColumnKind::Uuid | ColumnKind::Date => {}
        }
    }
}

/// A typed bind parameter produced by the filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterWhereInfo {
    Compare {
        column: &'static str,
        operator: FilterOp,
        value: FilterValue,
    },
    In {
        column: &'static str,
        values: Vec<FilterValue>,
    },
    /// Case-insensitive substring match across one or more columns, OR-combined
    Contains {
        columns: Vec<&'static str>,
        needle: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: &'static str,
    pub sort: SortDirection,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}

/// Pagination defaults applied when page/limit are absent or unusable
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl From<&FilterConfig> for FilterOptions {
    fn from(config: &FilterConfig) -> Self {
        let default_limit = config.default_limit.max(1);
        Self {
            default_limit,
            max_limit: config.max_limit.max(default_limit),
        }
    }
}
