use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryScalar;
use sqlx::{PgPool, Postgres};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterValue, SqlResult};

/// One page of a filtered listing
#[derive(Debug, Clone)]
pub struct ListPage {
    pub rows: Vec<Value>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl ListPage {
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }
}

/// Executes a composed [`Filter`] against the pool
pub struct QueryBuilder {
    filter: Filter,
}

impl QueryBuilder {
    pub fn new(filter: Filter) -> Self {
        Self { filter }
    }

    pub async fn select_all(&self, pool: &PgPool) -> Result<Vec<Value>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        tracing::debug!("Listing query: {}", sql_result.query);

        let mut rows = bind_all(sqlx::query_scalar::<_, Value>(&sql_result.query), &sql_result)
            .fetch_all(pool)
            .await?;
        for row in rows.iter_mut() {
            self.filter.normalize_row(row);
        }
        Ok(rows)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_count_sql();
        let count = bind_all(sqlx::query_scalar::<_, i64>(&sql_result.query), &sql_result)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Rows for the requested page plus the total under the same conditions
    pub async fn list(&self, pool: &PgPool) -> Result<ListPage, DatabaseError> {
        let total = self.count(pool).await?;
        let rows = self.select_all(pool).await?;

        Ok(ListPage {
            rows,
            total,
            page: self.filter.page(),
            limit: self.filter.limit(),
        })
    }
}

fn bind_all<'q, O>(
    mut q: QueryScalar<'q, Postgres, O, PgArguments>,
    sql_result: &SqlResult,
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for p in sql_result.params.iter() {
        q = match p {
            FilterValue::Text(s) => q.bind(s.clone()),
            FilterValue::Number(n) => q.bind(*n),
            FilterValue::Bool(b) => q.bind(*b),
            FilterValue::Uuid(u) => q.bind(*u),
            FilterValue::Timestamp(t) => q.bind(*t),
            FilterValue::Date(d) => q.bind(*d),
        };
    }
    q
}
