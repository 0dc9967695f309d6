use super::types::{FilterValue, FilterWhereInfo};

/// Renders where conditions into a SQL predicate with positional parameters
pub struct FilterWhere {
    param_values: Vec<FilterValue>,
}

impl FilterWhere {
    fn new() -> Self {
        Self {
            param_values: vec![],
        }
    }

    /// Returns an empty string when there are no conditions
    pub fn generate(conditions: &[FilterWhereInfo]) -> (String, Vec<FilterValue>) {
        let mut filter_where = Self::new();
        let sql = conditions
            .iter()
            .map(|condition| filter_where.build_sql_condition(condition))
            .collect::<Vec<_>>()
            .join(" AND ");
        (sql, filter_where.param_values)
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> String {
        match condition {
            FilterWhereInfo::Compare {
                column,
                operator,
                value,
            } => format!("\"{}\" {} {}", column, operator.to_sql(), self.param(value.clone())),
            FilterWhereInfo::In { column, values } => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                format!("\"{}\" IN ({})", column, params.join(", "))
            }
            FilterWhereInfo::Contains { columns, needle } => {
                let pattern = self.param(FilterValue::Text(format!("%{}%", escape_like(needle))));
                let parts: Vec<String> = columns
                    .iter()
                    .map(|column| format!("\"{}\" ILIKE {}", column, pattern))
                    .collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

/// Escape LIKE wildcards so user input only ever matches literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
