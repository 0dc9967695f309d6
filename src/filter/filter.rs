use std::collections::HashMap;

use serde_json::Value;

use super::collection::{Collection, Column};
use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{
    FilterOp, FilterOptions, FilterOrderInfo, FilterValue, FilterWhereInfo, SqlResult, RESERVED_KEYS,
};

/// Composes search, field filters, sort, projection and pagination over one collection
#[derive(Debug, Clone)]
pub struct Filter {
    collection: &'static Collection,
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    select_columns: Vec<&'static Column>,
    page: i64,
    limit: i64,
    options: FilterOptions,
}

impl Filter {
    pub fn new(collection: &'static Collection, options: FilterOptions) -> Self {
        Self {
            collection,
            conditions: vec![],
            order_data: FilterOrder::defaults(collection),
            select_columns: collection.columns.iter().collect(),
            page: 1,
            limit: options.default_limit,
            options,
        }
    }

    /// Build a filter from raw query-string parameters
    pub fn from_query(
        collection: &'static Collection,
        params: &HashMap<String, String>,
        options: FilterOptions,
    ) -> Result<Self, FilterError> {
        let mut filter = Self::new(collection, options);

        if let Some(q) = params.get("q") {
            filter.search(q);
        }

        let mut keys: Vec<&String> = params
            .keys()
            .filter(|k| !RESERVED_KEYS.contains(&k.as_str()))
            .collect();
        keys.sort();
        for key in keys {
            let (field, operator) = parse_filter_key(key)?;
            filter.where_field(field, operator, &params[key])?;
        }

        if let Some(sort) = params.get("sort") {
            filter.sort(sort)?;
        }
        if let Some(fields) = params.get("fields") {
            filter.fields(fields)?;
        }
        filter.paginate(
            params.get("page").map(String::as_str),
            params.get("limit").map(String::as_str),
        );

        Ok(filter)
    }

    /// Case-insensitive substring match over the collection's search fields
    pub fn search(&mut self, q: &str) -> &mut Self {
        let needle = q.trim();
        if needle.is_empty() || self.collection.search_fields.is_empty() {
            return self;
        }
        let columns = self
            .collection
            .search_fields
            .iter()
            .filter_map(|f| self.collection.column(f).map(|c| c.column))
            .collect();
        self.conditions.push(FilterWhereInfo::Contains {
            columns,
            needle: needle.to_string(),
        });
        self
    }

    /// Compare a field against a raw value parsed by the column kind
    pub fn where_field(&mut self, field: &str, operator: FilterOp, raw: &str) -> Result<&mut Self, FilterError> {
        let column = self.resolve(field)?;
        let value = parse_value(column, raw)?;
        self.conditions.push(FilterWhereInfo::Compare {
            column: column.column,
            operator,
            value,
        });
        Ok(self)
    }

    /// Equality on an already-typed value, used to scope listings to an owner
    pub fn scope(&mut self, field: &str, value: FilterValue) -> Result<&mut Self, FilterError> {
        let column = self.resolve(field)?;
        self.conditions.push(FilterWhereInfo::Compare {
            column: column.column,
            operator: FilterOp::Eq,
            value,
        });
        Ok(self)
    }

    pub fn where_in<S: AsRef<str>>(&mut self, field: &str, raws: &[S]) -> Result<&mut Self, FilterError> {
        let column = self.resolve(field)?;
        let values = raws
            .iter()
            .map(|raw| parse_value(column, raw.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.conditions.push(FilterWhereInfo::In {
            column: column.column,
            values,
        });
        Ok(self)
    }

    pub fn contains(&mut self, field: &str, needle: &str) -> Result<&mut Self, FilterError> {
        let column = self.resolve(field)?;
        let needle = needle.trim();
        if !needle.is_empty() {
            self.conditions.push(FilterWhereInfo::Contains {
                columns: vec![column.column],
                needle: needle.to_string(),
            });
        }
        Ok(self)
    }

    pub fn sort(&mut self, expr: &str) -> Result<&mut Self, FilterError> {
        let parsed = FilterOrder::parse(self.collection, expr)?;
        if !parsed.is_empty() {
            self.order_data = parsed;
        }
        Ok(self)
    }

    /// `a,b` keeps only those fields, `-a,-b` drops them; `id` always stays
    pub fn fields(&mut self, expr: &str) -> Result<&mut Self, FilterError> {
        let entries: Vec<&str> = expr.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
        if entries.is_empty() {
            return Ok(self);
        }

        let excluded = entries.iter().filter(|e| e.starts_with('-')).count();
        if excluded != 0 && excluded != entries.len() {
            return Err(FilterError::InvalidProjection(expr.to_string()));
        }

        let mut named = Vec::with_capacity(entries.len());
        for entry in &entries {
            let field = entry.trim_start_matches('-');
            named.push(self.resolve(field)?.field);
        }

        let exclude = excluded != 0;
        self.select_columns = self
            .collection
            .columns
            .iter()
            .filter(|c| c.field == "id" || named.contains(&c.field) != exclude)
            .collect();
        Ok(self)
    }

    /// Unparseable or non-positive values fall back to the defaults
    pub fn paginate(&mut self, page: Option<&str>, limit: Option<&str>) -> &mut Self {
        self.page = positive(page).unwrap_or(1);
        self.limit = positive(limit)
            .unwrap_or(self.options.default_limit)
            .min(self.options.max_limit);
        self
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Align a listing row with how the collection's model serializes
    pub fn normalize_row(&self, row: &mut Value) {
        let Some(object) = row.as_object_mut() else { return };
        for column in &self.select_columns {
            if let Some(value) = object.get_mut(column.field) {
                column.kind.normalize(value);
            }
        }
    }

    /// Listing query; each row comes back as a single JSON object column named `data`
    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.conditions);
        let order = FilterOrder::with_tie_breaker(self.collection, self.order_data.clone());

        let query = [
            format!("SELECT {} AS data", self.build_select_clause()),
            format!("FROM \"{}\"", self.collection.table),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            FilterOrder::generate(&order),
            format!("LIMIT {} OFFSET {}", self.limit, self.offset()),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }

    /// Count under the same search and filters, ignoring sort and pagination
    pub fn to_count_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.conditions);
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.collection.table)
        } else {
            format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                self.collection.table, where_clause
            )
        };
        SqlResult { query, params }
    }

    fn resolve(&self, field: &str) -> Result<&'static Column, FilterError> {
        self.collection
            .column(field)
            .ok_or_else(|| FilterError::InvalidColumn(field.to_string()))
    }

    fn build_select_clause(&self) -> String {
        let pairs: Vec<String> = self
            .select_columns
            .iter()
            .map(|c| format!("'{}', \"{}\"", c.field, c.column))
            .collect();
        format!("json_build_object({})", pairs.join(", "))
    }
}

/// Split `rating[gte]` into field and operator; a bare key is equality
fn parse_filter_key(key: &str) -> Result<(&str, FilterOp), FilterError> {
    match key.split_once('[') {
        Some((field, rest)) => {
            let suffix = rest
                .strip_suffix(']')
                .ok_or_else(|| FilterError::UnsupportedOperator(key.to_string()))?;
            let operator = FilterOp::from_suffix(suffix)
                .ok_or_else(|| FilterError::UnsupportedOperator(suffix.to_string()))?;
            Ok((field, operator))
        }
        None => Ok((key, FilterOp::Eq)),
    }
}

fn parse_value(column: &Column, raw: &str) -> Result<FilterValue, FilterError> {
    column.kind.parse(raw).ok_or_else(|| FilterError::InvalidValue {
        field: column.field.to_string(),
        value: raw.to_string(),
    })
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|n| *n > 0)
}
