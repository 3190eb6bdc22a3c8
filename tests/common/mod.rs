#![allow(dead_code)]

use catalog_api::api::create_api_router;
use catalog_api::entities::{
    category, customer, product, product_image, product_inventory, product_review,
    setup_schema,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, Database, DatabaseConnection, EntityTrait};
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

static SCHEMA: OnceCell<()> = OnceCell::const_new();

/// Connection to the test database, or `None` when `TEST_DATABASE_URL` is not
/// set and the test should be skipped.
pub async fn test_db() -> Option<Arc<DatabaseConnection>> {
    dotenvy::dotenv().ok();
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL is not set, skipping");
        return None;
    };

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to the test database");
    SCHEMA
        .get_or_init(|| async {
            setup_schema(&db).await.expect("Failed to set up schema");
        })
        .await;

    Some(Arc::new(db))
}

/// Serves the API on an ephemeral port and returns its base url.
pub async fn spawn_app(db: Arc<DatabaseConnection>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, create_api_router(db))
            .await
            .expect("Test server failed");
    });

    format!("http://{addr}/api")
}

/// A -> B -> C -> D plus four products:
///
/// * `sesame` in C: two images, one discounted inventory, ratings 4 and 5.
/// * `poppy` in D: one inventory without discount, rating 3.
/// * `plain` in B: nothing attached.
/// * `hidden` in B: inactive.
pub struct Fixture {
    pub a: category::Model,
    pub b: category::Model,
    pub c: category::Model,
    pub d: category::Model,
    pub sesame: Uuid,
    pub poppy: Uuid,
    pub plain: Uuid,
    pub hidden: Uuid,
}

impl Fixture {
    pub fn categories(&self) -> [&category::Model; 4] {
        [&self.a, &self.b, &self.c, &self.d]
    }

    pub fn active_products(&self) -> [Uuid; 3] {
        [self.sesame, self.poppy, self.plain]
    }
}

pub async fn seed(db: &DatabaseConnection) -> Fixture {
    let a = insert_category(db, "Bakery", None).await;
    let b = insert_category(db, "Bread", Some(&a)).await;
    let c = insert_category(db, "Bagels", Some(&b)).await;
    let d = insert_category(db, "Seeded", Some(&c)).await;

    let sesame = insert_product(db, "Sesame bagel", &c, true).await;
    let poppy = insert_product(db, "Poppy bagel", &d, true).await;
    let plain = insert_product(db, "Plain bagel", &b, true).await;
    let hidden = insert_product(db, "Hidden bagel", &b, false).await;

    insert_image(db, sesame, "sesame_front.png").await;
    insert_image(db, sesame, "sesame_back.png").await;
    insert_inventory(db, sesame, 3, Decimal::new(10, 0), Some(5.0)).await;
    insert_inventory(db, poppy, 0, Decimal::new(20, 0), None).await;

    let customer = insert_customer(db, "Ann Baker").await;
    insert_review(db, sesame, customer, 4.0).await;
    insert_review(db, sesame, customer, 5.0).await;
    insert_review(db, poppy, customer, 3.0).await;

    Fixture {
        a,
        b,
        c,
        d,
        sesame,
        poppy,
        plain,
        hidden,
    }
}

pub async fn insert_category(
    db: &DatabaseConnection,
    name: &str,
    parent: Option<&category::Model>,
) -> category::Model {
    let node = category::ActiveModel::new_node(name, parent, false).expect("Invalid parent path");
    let id = node.id.clone().unwrap();
    category::Entity::insert(node)
        .exec(db)
        .await
        .expect("Failed to insert category");

    category::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("Failed to read category")
        .expect("Category vanished")
}

pub async fn insert_product(
    db: &DatabaseConnection,
    name: &str,
    category: &category::Model,
    is_active: bool,
) -> Uuid {
    let id = Uuid::new_v4();
    product::Entity::insert(product::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        description: Set(Some(format!("{name}, baked daily"))),
        is_active: Set(is_active),
        made_in: Set(Some("Tula".to_string())),
        created_at: Set(chrono::Utc::now().into()),
        category_id: Set(category.id),
    })
    .exec(db)
    .await
    .expect("Failed to insert product");
    id
}

pub async fn insert_image(db: &DatabaseConnection, product_id: Uuid, image: &str) {
    product_image::Entity::insert(product_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        image: Set(image.to_string()),
        product_id: Set(product_id),
    })
    .exec(db)
    .await
    .expect("Failed to insert image");
}

pub async fn insert_inventory(
    db: &DatabaseConnection,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    discount: Option<f64>,
) {
    product_inventory::Entity::insert(product_inventory::ActiveModel {
        id: Set(Uuid::new_v4()),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
        discount: Set(discount),
        meta: Set(Some(serde_json::json!({ "weight": "100g" }))),
        product_id: Set(product_id),
    })
    .exec(db)
    .await
    .expect("Failed to insert inventory");
}

pub async fn insert_customer(db: &DatabaseConnection, fullname: &str) -> Uuid {
    let id = Uuid::new_v4();
    customer::Entity::insert(customer::ActiveModel {
        id: Set(id),
        email: Set(format!("{}@example.com", id.simple())),
        fullname: Set(fullname.to_string()),
    })
    .exec(db)
    .await
    .expect("Failed to insert customer");
    id
}

pub async fn insert_review(db: &DatabaseConnection, product_id: Uuid, customer_id: Uuid, rating: f64) {
    product_review::Entity::insert(product_review::ActiveModel {
        id: Set(Uuid::new_v4()),
        comment: Set(Some(format!("{rating} stars"))),
        rating: Set(rating),
        created_at: Set(chrono::Utc::now().into()),
        product_id: Set(product_id),
        customer_id: Set(customer_id),
    })
    .exec(db)
    .await
    .expect("Failed to insert review");
}
