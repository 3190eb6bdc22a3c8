use sea_orm::ConnectionTrait;

use super::fetch_all;
use crate::error::CatalogError;
use crate::schemas::CategoryRow;
use crate::strategies::categories::CategorySelect;
use crate::strategies::context::QueryContext;
use crate::strategies::registry::{CategoryFilter, Unsupported};
use crate::strategies::{FilterValue, HierarchyFilter, TableAlias};

const CATEGORY: TableAlias = TableAlias::new("c");

#[derive(Clone, Debug, Default)]
pub struct CategoryFilters {
    pub deactivated: Option<bool>,
    pub hierarchy: Option<HierarchyFilter>,
    pub level: Option<i64>,
}

impl CategoryFilters {
    fn into_values(self) -> [(CategoryFilter, Option<FilterValue>); 3] {
        [
            (CategoryFilter::Deactivated, self.deactivated.map(FilterValue::from)),
            (CategoryFilter::Hierarchy, self.hierarchy.map(FilterValue::from)),
            (CategoryFilter::Level, self.level.map(FilterValue::from)),
        ]
    }
}

pub async fn category_list<C>(
    conn: &C,
    filters: CategoryFilters,
) -> Result<Vec<CategoryRow>, CatalogError>
where
    C: ConnectionTrait,
{
    let query = QueryContext::<CategoryFilter, Unsupported>::new(&CategorySelect::new(CATEGORY))
        .filtering(filters.into_values())?
        .into_query();

    Ok(fetch_all(conn, &query).await?)
}
