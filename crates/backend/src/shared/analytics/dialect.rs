use sea_orm::{DatabaseBackend, Statement, Value};

/// The SQL flavours the aggregations are written for.
///
/// Aggregation SQL is hand written, so every function whose spelling differs
/// between MySQL and SQLite goes through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    MySql,
    Sqlite,
}

impl SqlDialect {
    pub fn from_backend(backend: DatabaseBackend) -> Option<Self> {
        match backend {
            DatabaseBackend::MySql => Some(SqlDialect::MySql),
            DatabaseBackend::Sqlite => Some(SqlDialect::Sqlite),
            DatabaseBackend::Postgres => None,
        }
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self {
            SqlDialect::MySql => DatabaseBackend::MySql,
            SqlDialect::Sqlite => DatabaseBackend::Sqlite,
        }
    }

    pub fn statement(&self, sql: impl Into<String>, params: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(self.backend(), sql, params)
    }

    /// Calendar day of a timestamp as `YYYY-MM-DD` text
    pub fn day(&self, expr: &str) -> String {
        match self {
            SqlDialect::MySql => format!("DATE_FORMAT({}, '%Y-%m-%d')", expr),
            SqlDialect::Sqlite => format!("strftime('%Y-%m-%d', {})", expr),
        }
    }

    /// Force byte-wise comparison. SQLite compares text with BINARY
    /// collation already; MySQL's default collations fold case.
    pub fn binary(&self, expr: &str) -> String {
        match self {
            SqlDialect::MySql => format!("CAST({} AS BINARY)", expr),
            SqlDialect::Sqlite => expr.to_string(),
        }
    }

    /// Length in characters, not bytes
    pub fn char_length(&self, expr: &str) -> String {
        match self {
            SqlDialect::MySql => format!("CHAR_LENGTH({})", expr),
            SqlDialect::Sqlite => format!("LENGTH({})", expr),
        }
    }

    /// Fractional minutes from `from` to `to`
    pub fn minutes_between(&self, from: &str, to: &str) -> String {
        match self {
            SqlDialect::MySql => format!("(TIMESTAMPDIFF(SECOND, {}, {}) / 60.0)", from, to),
            SqlDialect::Sqlite => format!("((julianday({}) - julianday({})) * 1440.0)", to, from),
        }
    }

    /// Any scalar as text. `CHAR` gives TEXT affinity on SQLite too.
    pub fn text(&self, expr: &str) -> String {
        format!("CAST({} AS CHAR)", expr)
    }
}

/// Single-quoted SQL literal with embedded quotes doubled
pub fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `('a', 'b', ...)` for an `IN` test
pub fn literal_list<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let items: Vec<String> = values.into_iter().map(sql_literal).collect();
    format!("({})", items.join(", "))
}
