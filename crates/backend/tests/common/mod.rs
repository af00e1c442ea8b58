#![allow(dead_code)]

use backend::shared::analytics::AnalyticsContext;
use backend::shared::data::schema;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement, Value,
};

/// Fresh in-memory store with the bootstrap schema.
///
/// A single pooled connection: every `sqlite::memory:` connection is its own
/// database.
pub async fn store() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    schema::bootstrap(&db).await.unwrap();
    db
}

pub async fn context() -> AnalyticsContext {
    AnalyticsContext::new(store().await)
}

async fn exec(db: &DatabaseConnection, sql: &str, values: Vec<Value>) {
    db.execute(Statement::from_sql_and_values(DbBackend::Sqlite, sql, values))
        .await
        .unwrap();
}

/// Breaks every query touching `table`
pub async fn drop_table(db: &DatabaseConnection, table: &str) {
    exec(db, &format!("DROP TABLE {}", table), vec![]).await;
}

fn text(value: Option<&str>) -> Value {
    Value::from(value.map(str::to_string))
}

pub async fn referrer(db: &DatabaseConnection, id: i64, name: &str, code: &str, status: i64) {
    exec(
        db,
        "INSERT INTO marketing_persons (id, name, referral_code, mobile, email, logo, status, created_at) \
         VALUES (?, ?, ?, ?, ?, NULL, ?, '2025-01-01 09:00:00')",
        vec![
            id.into(),
            name.into(),
            code.into(),
            format!("0800000{:04}", id).into(),
            format!("sr{}@shop.example", id).into(),
            status.into(),
        ],
    )
    .await;
}

/// Customer registration; `created_at` as `YYYY-MM-DD HH:MM:SS`
pub async fn user(db: &DatabaseConnection, id: i64, code: Option<&str>, created_at: &str) {
    exec(
        db,
        "INSERT INTO users (id, name, mobile, referral_code, created_at) VALUES (?, ?, ?, ?, ?)",
        vec![
            id.into(),
            format!("Customer {}", id).into(),
            format!("0700000{:04}", id).into(),
            text(code),
            created_at.into(),
        ],
    )
    .await;
}

pub struct OrderRow<'a> {
    pub id: i64,
    pub user_id: i64,
    pub total: f64,
    pub delivery_charge: f64,
    pub status: &'a str,
    pub created_at: &'a str,
    pub driver: Option<i64>,
    pub packer: Option<i64>,
}

impl<'a> OrderRow<'a> {
    pub fn new(id: i64, user_id: i64, total: f64, status: &'a str, created_at: &'a str) -> Self {
        Self {
            id,
            user_id,
            total,
            delivery_charge: 0.0,
            status,
            created_at,
            driver: None,
            packer: None,
        }
    }
}

pub async fn order(db: &DatabaseConnection, row: OrderRow<'_>) {
    exec(
        db,
        "INSERT INTO orders (id, user_id, total, delivery_charge, active_status, delivery_boy_id, packer_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        vec![
            row.id.into(),
            row.user_id.into(),
            row.total.into(),
            row.delivery_charge.into(),
            row.status.into(),
            Value::from(row.driver),
            Value::from(row.packer),
            row.created_at.into(),
        ],
    )
    .await;
}

pub async fn order_status(db: &DatabaseConnection, order_id: i64, status: &str, created_at: &str) {
    exec(
        db,
        "INSERT INTO order_statuses (order_id, status, created_at) VALUES (?, ?, ?)",
        vec![order_id.into(), status.into(), created_at.into()],
    )
    .await;
}

pub async fn transaction(db: &DatabaseConnection, order_id: i64, status: &str) {
    exec(
        db,
        "INSERT INTO transactions (order_id, status, amount) VALUES (?, ?, 0)",
        vec![order_id.into(), status.into()],
    )
    .await;
}

pub async fn driver(db: &DatabaseConnection, id: i64, name: &str) {
    exec(
        db,
        "INSERT INTO delivery_boys (id, name, mobile, status) VALUES (?, ?, NULL, 1)",
        vec![id.into(), name.into()],
    )
    .await;
}

pub async fn packer(db: &DatabaseConnection, id: i64, name: &str) {
    exec(
        db,
        "INSERT INTO packing_staff (id, name, email, status) VALUES (?, ?, NULL, 1)",
        vec![id.into(), name.into()],
    )
    .await;
}

pub async fn csr(db: &DatabaseConnection, id: i64, name: &str) {
    exec(
        db,
        "INSERT INTO csr_staff (id, name, email, status) VALUES (?, ?, NULL, 1)",
        vec![id.into(), name.into()],
    )
    .await;
}

pub async fn interaction(
    db: &DatabaseConnection,
    csr_id: i64,
    kind: &str,
    outcome: &str,
    order_value: Option<f64>,
    duration_seconds: i64,
    created_at: &str,
) {
    exec(
        db,
        "INSERT INTO csr_interactions (csr_id, interaction_type, outcome, order_value, duration_seconds, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
        vec![
            csr_id.into(),
            kind.into(),
            outcome.into(),
            Value::from(order_value),
            duration_seconds.into(),
            created_at.into(),
        ],
    )
    .await;
}

/// Referrer roster used by several tests:
/// two valid SRs, one test account, one inactive SR.
pub async fn seed_roster(db: &DatabaseConnection) {
    referrer(db, 1, "Amina Yusuf", "AMY7", 1).await;
    referrer(db, 2, "Bola Okafor", "BOK2", 1).await;
    referrer(db, 3, "sales test", "TST3", 1).await;
    referrer(db, 4, "Chidi Eze", "CHE4", 0).await;
}

pub async fn set_referrer_status(db: &DatabaseConnection, id: i64, status: i64) {
    exec(
        db,
        "UPDATE marketing_persons SET status = ? WHERE id = ?",
        vec![status.into(), id.into()],
    )
    .await;
}
