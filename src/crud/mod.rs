//! Listing operations. Each one builds its statement through a
//! [`QueryContext`](crate::strategies::context::QueryContext), then pages and
//! runs it on whatever connection or transaction the caller holds.

pub mod category;
pub mod product;

use sea_orm::sea_query::SelectStatement;
use sea_orm::{ConnectionTrait, DbErr, FromQueryResult};

use crate::config::MAX_OFFSET;

pub use category::{category_list, CategoryFilters};
pub use product::{get_product_reviews, product_detail, products_list, ProductListFilters};

async fn fetch_all<T, C>(conn: &C, query: &SelectStatement) -> Result<Vec<T>, DbErr>
where
    T: FromQueryResult,
    C: ConnectionTrait,
{
    let statement = conn.get_database_backend().build(query);
    T::find_by_statement(statement).all(conn).await
}

async fn fetch_one<T, C>(conn: &C, query: &SelectStatement) -> Result<Option<T>, DbErr>
where
    T: FromQueryResult,
    C: ConnectionTrait,
{
    let statement = conn.get_database_backend().build(query);
    T::find_by_statement(statement).one(conn).await
}

fn paginate(mut query: SelectStatement, limit: u64, offset: u64) -> SelectStatement {
    query.limit(limit).offset(offset.min(MAX_OFFSET));
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Alias, PostgresQueryBuilder, Query};
    use sea_orm::{DatabaseBackend, Value};

    fn base() -> SelectStatement {
        Query::select()
            .column(Alias::new("id"))
            .from(Alias::new("product"))
            .to_owned()
    }

    #[test]
    fn paging_renders_limit_and_offset() {
        let sql = paginate(base(), 20, 40).to_string(PostgresQueryBuilder);
        assert!(sql.ends_with("LIMIT 20 OFFSET 40"));
    }

    #[test]
    fn offset_past_bigint_is_capped() {
        let query = paginate(base(), 20, u64::MAX);
        let sql = query.to_string(PostgresQueryBuilder);
        assert!(sql.ends_with(&format!("OFFSET {}", i64::MAX)));

        // the bound value must fit the bigint the driver sends
        let statement = DatabaseBackend::Postgres.build(&query);
        let values = statement.values.expect("Expected bound values").0;
        assert_eq!(values.last(), Some(&Value::BigUnsigned(Some(MAX_OFFSET))));
    }
}
