//! Rows returned by the listing queries. Field names follow the aliases the
//! select strategies give their projections.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::{FromJsonQueryResult, FromQueryResult};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub parent: Option<Uuid>,
    pub level: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize)]
pub struct ProductListRow {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub made_in: Option<String>,
    pub image: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<f64>,
    pub avg_rating: f64,
    pub reviews_count: i64,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub meta: Option<Json>,
    pub availability: bool,
    pub unit_price: f64,
    pub discount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct InventoryList(pub Vec<InventoryItem>);

#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize)]
pub struct ProductDetailRow {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub made_in: Option<String>,
    pub description: Option<String>,
    pub images: ImageList,
    pub inventories: InventoryList,
}

#[derive(Clone, Debug, PartialEq, FromQueryResult, Serialize)]
pub struct ReviewRow {
    pub id: Uuid,
    pub fullname: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}
