#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;

use dorzi::api::create_api_router;
use dorzi::config::AppConfig;
use dorzi::entities::setup_schema;
use dorzi::services::accounts::{self, RegisterCustomer, RegisterTailor, Registered};
use dorzi::services::catalog::{self, NewDress};

pub const PASSWORD: &str = "Muzion15x";
pub const SECRET: &str = "test-secret";

pub async fn setup_db() -> DatabaseConnection {
    let db = dorzi::connect("sqlite::memory:")
        .await
        .expect("Failed to open database");
    setup_schema(&db).await.expect("Failed to create schema");
    db
}

/// Monday, 1 January 2024, 10:00 UTC.
pub fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn customer_form(email: &str) -> RegisterCustomer {
    serde_json::from_value(serde_json::json!({
        "email": email,
        "password": PASSWORD,
        "confirm_password": PASSWORD,
        "full_name": "Rahim Uddin",
        "phone": "01700000000",
        "address": "House 4, Road 2, Dhanmondi"
    }))
    .expect("customer form")
}

pub fn tailor_form(email: &str, nid: &str, price: &str) -> RegisterTailor {
    serde_json::from_value(serde_json::json!({
        "email": email,
        "password": PASSWORD,
        "confirm_password": PASSWORD,
        "full_name": "Karim Tailor",
        "phone": "01800000000",
        "business_name": format!("{nid} Stitches"),
        "business_location": "Mirpur",
        "nid": nid,
        "price": price
    }))
    .expect("tailor form")
}

pub async fn customer(db: &DatabaseConnection, email: &str) -> Registered {
    accounts::register_customer(db, customer_form(email))
        .await
        .expect("Failed to register customer")
}

pub async fn tailor(db: &DatabaseConnection, email: &str, nid: &str, price: &str) -> Registered {
    accounts::register_tailor(db, tailor_form(email, nid, price))
        .await
        .expect("Failed to register tailor")
}

pub async fn dress(db: &DatabaseConnection, tailor_id: i32, price: &str) -> i32 {
    let form: NewDress = serde_json::from_value(serde_json::json!({
        "title": "Jamdani Saree",
        "availability": 4,
        "price": price,
        "category": "Saree",
        "gender": "female"
    }))
    .expect("dress form");
    catalog::create_dress(db, tailor_id, form, monday())
        .await
        .expect("Failed to create dress")
        .id
}

pub fn decimal(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::String(s) => s.parse().expect("decimal string"),
        other => other.to_string().parse().expect("decimal number"),
    }
}

pub struct TestApp {
    pub address: String,
    pub upload_dir: PathBuf,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

pub async fn spawn_app() -> TestApp {
    let upload_dir = std::env::temp_dir().join(format!("dorzi-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");

    let dir = upload_dir.to_string_lossy().to_string();
    let config = AppConfig::from_lookup(|name| match name {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "SECRET" => Some(SECRET.to_string()),
        "UPLOAD_DIR" => Some(dir.clone()),
        "FILE_SIZE_LIMIT" => Some("1024".to_string()),
        _ => None,
    })
    .expect("Failed to build config");

    let db = setup_db().await;
    let app = create_api_router(Arc::new(db), Arc::new(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server crashed");
    });

    TestApp {
        address,
        upload_dir,
        client: reqwest::Client::new(),
    }
}
