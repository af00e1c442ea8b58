//! SQLite rendition of the commerce tables the dashboards read.
//!
//! Production runs against the shop's MySQL database, which owns its
//! schema. This copy exists for local runs and the integration tests.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement};

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS marketing_persons (
        id INTEGER PRIMARY KEY,
        name TEXT,
        referral_code TEXT,
        mobile TEXT,
        email TEXT,
        logo TEXT,
        status INTEGER,
        created_at TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        name TEXT,
        mobile TEXT,
        referral_code TEXT,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS delivery_boys (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        mobile TEXT,
        status INTEGER NOT NULL DEFAULT 1
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS packing_staff (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT,
        status INTEGER NOT NULL DEFAULT 1
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS csr_staff (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT,
        status INTEGER NOT NULL DEFAULT 1
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL,
        total REAL NOT NULL DEFAULT 0,
        delivery_charge REAL NOT NULL DEFAULT 0,
        active_status TEXT NOT NULL,
        delivery_boy_id INTEGER,
        packer_id INTEGER,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS order_statuses (
        id INTEGER PRIMARY KEY,
        order_id INTEGER NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY,
        order_id INTEGER NOT NULL,
        status TEXT NOT NULL,
        amount REAL NOT NULL DEFAULT 0,
        created_at TEXT
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS csr_interactions (
        id INTEGER PRIMARY KEY,
        csr_id INTEGER NOT NULL,
        interaction_type TEXT NOT NULL,
        outcome TEXT NOT NULL,
        order_value REAL,
        duration_seconds INTEGER,
        created_at TEXT NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_users_referral_code ON users (referral_code)",
    "CREATE INDEX IF NOT EXISTS idx_users_created_at ON users (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_order_statuses_order_id ON order_statuses (order_id)",
    "CREATE INDEX IF NOT EXISTS idx_csr_interactions_csr_id ON csr_interactions (csr_id)",
];

/// Create every table and index that does not exist yet
pub async fn bootstrap(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = conn.get_database_backend();
    for sql in TABLES {
        conn.execute(Statement::from_string(backend, sql.to_string()))
            .await?;
    }
    Ok(())
}
