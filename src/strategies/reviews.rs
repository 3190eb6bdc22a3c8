use sea_orm::sea_query::{Alias, Expr, JoinType, Query, SelectStatement};

use super::{Filterable, FilterValue, Sealed, Selectable, TableAlias};
use crate::entities::{customer, product_review};
use crate::error::StrategyError;

/// ```sql
/// SELECT pr.id, customer.fullname AS fullname, pr.rating, pr.comment, pr.created_at
/// FROM product_reviews AS pr
/// JOIN customer ON customer.id = pr.customer_id
/// ```
pub struct ReviewListSelect {
    alias: TableAlias,
}

impl ReviewListSelect {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for ReviewListSelect {}

impl Selectable for ReviewListSelect {
    fn alias(&self) -> TableAlias {
        self.alias
    }

    fn select(&self) -> SelectStatement {
        let pr = self.alias;
        Query::select()
            .column((pr.iden(), product_review::Column::Id))
            .expr_as(
                Expr::col((customer::Entity, customer::Column::Fullname)),
                Alias::new("fullname"),
            )
            .column((pr.iden(), product_review::Column::Rating))
            .column((pr.iden(), product_review::Column::Comment))
            .column((pr.iden(), product_review::Column::CreatedAt))
            .from_as(product_review::Entity, pr.iden())
            .join(
                JoinType::InnerJoin,
                customer::Entity,
                Expr::col((customer::Entity, customer::Column::Id))
                    .equals((pr.iden(), product_review::Column::CustomerId)),
            )
            .to_owned()
    }
}

/// Reviews of one product.
pub struct ReviewProductFiltering {
    alias: TableAlias,
}

impl ReviewProductFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for ReviewProductFiltering {}

impl Filterable for ReviewProductFiltering {
    fn name(&self) -> &'static str {
        "product_id"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let product_id = match &value {
            FilterValue::Id(id) => *id,
            FilterValue::Text(raw) => raw
                .parse::<uuid::Uuid>()
                .map_err(|_| value.mismatch(self.name(), "id"))?,
            _ => return Err(value.mismatch(self.name(), "id")),
        };
        query.and_where(
            self.alias
                .col(product_review::Column::ProductId)
                .eq(product_id),
        );
        Ok(query)
    }
}
