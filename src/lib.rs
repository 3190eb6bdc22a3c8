pub mod api;
pub mod config;
pub mod crud;
pub mod db;
pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod middleware;
pub mod schemas;
pub mod strategies;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::Config;

pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(config.db_echo);

    let db = Database::connect(options).await?;
    if config.setup_schema {
        entities::setup_schema(&db).await?;
    }
    Ok(db)
}
