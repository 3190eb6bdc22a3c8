use sea_orm::ConnectionTrait;
use uuid::Uuid;

use super::{fetch_all, fetch_one, paginate};
use crate::config::{clamp_limit, MAX_PRODUCTS_PER_PAGE, MAX_REVIEWS_PER_PAGE};
use crate::error::CatalogError;
use crate::schemas::{ProductDetailRow, ProductListRow, ReviewRow};
use crate::strategies::context::QueryContext;
use crate::strategies::products::{ProductDetailSelect, ProductListSelect};
use crate::strategies::registry::{
    ProductDetailFilter, ProductFilter, ProductOrdering, ReviewFilter, ReviewOrdering,
    Unsupported,
};
use crate::strategies::reviews::ReviewListSelect;
use crate::strategies::{FilterValue, TableAlias};

const PRODUCT: TableAlias = TableAlias::new("p");
const REVIEW: TableAlias = TableAlias::new("pr");

#[derive(Clone, Debug, Default)]
pub struct ProductListFilters {
    pub activity: Option<bool>,
    pub category: Option<Uuid>,
    pub search: Option<String>,
    pub popular: Option<f64>,
    pub discount: Option<f64>,
}

impl ProductListFilters {
    fn into_values(self) -> [(ProductFilter, Option<FilterValue>); 5] {
        [
            (ProductFilter::Activity, self.activity.map(FilterValue::from)),
            (ProductFilter::Category, self.category.map(FilterValue::from)),
            (ProductFilter::Search, self.search.map(FilterValue::from)),
            (ProductFilter::Popular, self.popular.map(FilterValue::from)),
            (ProductFilter::Discount, self.discount.map(FilterValue::from)),
        ]
    }
}

/// One page of the product listing. `limit` above [`MAX_PRODUCTS_PER_PAGE`]
/// is clamped.
pub async fn products_list<C, S>(
    conn: &C,
    limit: u64,
    offset: u64,
    filters: ProductListFilters,
    ordering: &[S],
) -> Result<Vec<ProductListRow>, CatalogError>
where
    C: ConnectionTrait,
    S: AsRef<str>,
{
    let query =
        QueryContext::<ProductFilter, ProductOrdering>::new(&ProductListSelect::new(PRODUCT))
            .filtering(filters.into_values())?
            .ordering(ordering)?
            .into_query();
    let query = paginate(query, clamp_limit(limit, MAX_PRODUCTS_PER_PAGE), offset);

    Ok(fetch_all(conn, &query).await?)
}

pub async fn product_detail<C>(
    conn: &C,
    id: Uuid,
    activity: Option<bool>,
) -> Result<ProductDetailRow, CatalogError>
where
    C: ConnectionTrait,
{
    let query =
        QueryContext::<ProductDetailFilter, Unsupported>::new(&ProductDetailSelect::new(PRODUCT))
            .filtering([
                (ProductDetailFilter::Id, Some(FilterValue::Id(id))),
                (ProductDetailFilter::Activity, activity.map(FilterValue::from)),
            ])?
            .into_query();

    fetch_one(conn, &query)
        .await?
        .ok_or_else(|| CatalogError::NotFound(format!("Product {id}")))
}

pub async fn get_product_reviews<C, S>(
    conn: &C,
    product_id: Uuid,
    limit: u64,
    offset: u64,
    ordering: &[S],
) -> Result<Vec<ReviewRow>, CatalogError>
where
    C: ConnectionTrait,
    S: AsRef<str>,
{
    let query = QueryContext::<ReviewFilter, ReviewOrdering>::new(&ReviewListSelect::new(REVIEW))
        .filter(ReviewFilter::ProductId, Some(FilterValue::Id(product_id)))?
        .ordering(ordering)?
        .into_query();
    let query = paginate(query, clamp_limit(limit, MAX_REVIEWS_PER_PAGE), offset);

    Ok(fetch_all(conn, &query).await?)
}
