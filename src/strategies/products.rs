use sea_orm::sea_query::{Alias, Expr, Func, JoinType, Query, SelectStatement, SimpleExpr};
use sea_orm::EntityName;

use super::{
    Capability, Filterable, FilterValue, Sealed, Selectable, SortDirection, Sortable, TableAlias,
};
use crate::entities::{category, product, product_image, product_inventory, product_review};
use crate::error::StrategyError;
use crate::hierarchy::{self, PathSegment};

fn join_images(query: &mut SelectStatement, p: TableAlias) {
    query.join(
        JoinType::LeftJoin,
        product_image::Entity,
        p.col(product::Column::Id)
            .equals((product_image::Entity, product_image::Column::ProductId)),
    );
}

fn join_inventories(query: &mut SelectStatement, p: TableAlias) {
    query.join(
        JoinType::LeftJoin,
        product_inventory::Entity,
        p.col(product::Column::Id).equals((
            product_inventory::Entity,
            product_inventory::Column::ProductId,
        )),
    );
}

fn join_reviews(query: &mut SelectStatement, p: TableAlias) {
    query.join(
        JoinType::LeftJoin,
        product_review::Entity,
        p.col(product::Column::Id)
            .equals((product_review::Entity, product_review::Column::ProductId)),
    );
}

fn avg_rating() -> Expr {
    Expr::expr(Func::avg(Expr::col((
        product_review::Entity,
        product_review::Column::Rating,
    ))))
}

/// Average rating with products lacking reviews counted as 0.0.
fn avg_rating_or_zero() -> SimpleExpr {
    Func::coalesce([SimpleExpr::from(avg_rating()), Expr::val(0.0).into()]).into()
}

fn total_discount() -> Expr {
    Expr::expr(Func::sum(Expr::col((
        product_inventory::Entity,
        product_inventory::Column::Discount,
    ))))
}

fn max_unit_price() -> Expr {
    Expr::expr(Func::max(Expr::col((
        product_inventory::Entity,
        product_inventory::Column::UnitPrice,
    ))))
}

/// Listing projection: one row per product with a representative image, the
/// highest price and discount, the review average (0.0 without reviews) and the
/// review count.
///
/// ```sql
/// SELECT p.id, p.name, p.category_id, p.made_in,
///        max(product_image.image) AS image,
///        max(product_inventory.unit_price) AS price,
///        max(product_inventory.discount) AS discount,
///        coalesce(avg(product_reviews.rating), 0.0) AS avg_rating,
///        count(DISTINCT product_reviews.id) AS reviews_count
/// FROM product AS p
/// LEFT JOIN product_image ... LEFT JOIN product_inventory ... LEFT JOIN product_reviews ...
/// GROUP BY p.id
/// ```
pub struct ProductListSelect {
    alias: TableAlias,
}

impl ProductListSelect {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for ProductListSelect {}

impl Selectable for ProductListSelect {
    fn alias(&self) -> TableAlias {
        self.alias
    }

    fn provides(&self) -> &'static [Capability] {
        &[
            Capability::ImagesJoined,
            Capability::InventoryJoined,
            Capability::ReviewsJoined,
            Capability::GroupedByKey,
        ]
    }

    fn select(&self) -> SelectStatement {
        let p = self.alias;
        let mut query = Query::select()
            .column((p.iden(), product::Column::Id))
            .column((p.iden(), product::Column::Name))
            .column((p.iden(), product::Column::CategoryId))
            .column((p.iden(), product::Column::MadeIn))
            .expr_as(
                Func::max(Expr::col((product_image::Entity, product_image::Column::Image))),
                Alias::new("image"),
            )
            .expr_as(max_unit_price(), Alias::new("price"))
            .expr_as(
                Func::max(Expr::col((
                    product_inventory::Entity,
                    product_inventory::Column::Discount,
                ))),
                Alias::new("discount"),
            )
            .expr_as(avg_rating_or_zero(), Alias::new("avg_rating"))
            // the image/inventory fan-out repeats review rows
            .expr_as(
                Expr::cust(format!(
                    r#"COUNT(DISTINCT "{}"."id")"#,
                    product_review::Entity.table_name()
                )),
                Alias::new("reviews_count"),
            )
            .from_as(product::Entity, p.iden())
            .to_owned();

        join_images(&mut query, p);
        join_inventories(&mut query, p);
        join_reviews(&mut query, p);
        query.group_by_col((p.iden(), product::Column::Id));
        query
    }
}

/// Detail projection: core fields plus de-duplicated image paths and inventory
/// records as JSON arrays. Products without images or inventory get `[]`.
pub struct ProductDetailSelect {
    alias: TableAlias,
}

impl ProductDetailSelect {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for ProductDetailSelect {}

impl Selectable for ProductDetailSelect {
    fn alias(&self) -> TableAlias {
        self.alias
    }

    fn provides(&self) -> &'static [Capability] {
        &[
            Capability::ImagesJoined,
            Capability::InventoryJoined,
            Capability::GroupedByKey,
        ]
    }

    fn select(&self) -> SelectStatement {
        let p = self.alias;
        let image = product_image::Entity.table_name();
        let inventory = product_inventory::Entity.table_name();

        let images = format!(
            r#"COALESCE(jsonb_agg(DISTINCT "{image}"."image") FILTER (WHERE "{image}"."id" IS NOT NULL), '[]'::jsonb)"#
        );
        let inventories = format!(
            r#"COALESCE(jsonb_agg(DISTINCT jsonb_build_object('id', "{inventory}"."id", 'meta', "{inventory}"."meta", 'availability', "{inventory}"."quantity" > 0, 'unit_price', "{inventory}"."unit_price", 'discount', "{inventory}"."discount")) FILTER (WHERE "{inventory}"."id" IS NOT NULL), '[]'::jsonb)"#
        );

        let mut query = Query::select()
            .column((p.iden(), product::Column::Id))
            .column((p.iden(), product::Column::Name))
            .column((p.iden(), product::Column::CategoryId))
            .column((p.iden(), product::Column::MadeIn))
            .column((p.iden(), product::Column::Description))
            .expr_as(Expr::cust(images), Alias::new("images"))
            .expr_as(Expr::cust(inventories), Alias::new("inventories"))
            .from_as(product::Entity, p.iden())
            .to_owned();

        join_images(&mut query, p);
        join_inventories(&mut query, p);
        query.group_by_col((p.iden(), product::Column::Id));
        query
    }
}

pub struct ProductActivityFiltering {
    alias: TableAlias,
}

impl ProductActivityFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for ProductActivityFiltering {}

impl Filterable for ProductActivityFiltering {
    fn name(&self) -> &'static str {
        "activity"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let FilterValue::Bool(active) = value else {
            return Err(value.mismatch(self.name(), "bool"));
        };
        query.and_where(self.alias.col(product::Column::IsActive).eq(active));
        Ok(query)
    }
}

/// Products filed under the given category or anywhere below it.
pub struct ProductCategoryFiltering {
    alias: TableAlias,
}

impl ProductCategoryFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for ProductCategoryFiltering {}

impl Filterable for ProductCategoryFiltering {
    fn name(&self) -> &'static str {
        "category"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let segment = match &value {
            FilterValue::Id(id) => PathSegment::from_id(*id),
            FilterValue::Text(raw) => match raw.parse::<uuid::Uuid>() {
                Ok(id) => PathSegment::from_id(id),
                Err(_) => return Err(value.mismatch(self.name(), "id")),
            },
            _ => return Err(value.mismatch(self.name(), "id")),
        };

        query
            .join(
                JoinType::InnerJoin,
                category::Entity,
                Expr::col((category::Entity, category::Column::Id))
                    .equals((self.alias.iden(), product::Column::CategoryId)),
            )
            .and_where(hierarchy::subtree_match(
                Expr::col((category::Entity, category::Column::Hierarchy)),
                &segment,
            ));
        Ok(query)
    }
}

/// `HAVING avg(rating) >= threshold`
pub struct ProductPopularFiltering;

impl ProductPopularFiltering {
    pub fn new(_alias: TableAlias) -> Self {
        Self
    }
}

impl Sealed for ProductPopularFiltering {}

impl Filterable for ProductPopularFiltering {
    fn name(&self) -> &'static str {
        "popular"
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::ReviewsJoined, Capability::GroupedByKey]
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let FilterValue::Float(min_avg_rating) = value else {
            return Err(value.mismatch(self.name(), "float"));
        };
        query.and_having(avg_rating().gte(min_avg_rating));
        Ok(query)
    }
}

/// `HAVING sum(discount) > threshold`; a zero threshold leaves the query as is.
pub struct ProductDiscountFiltering;

impl ProductDiscountFiltering {
    pub fn new(_alias: TableAlias) -> Self {
        Self
    }
}

impl Sealed for ProductDiscountFiltering {}

impl Filterable for ProductDiscountFiltering {
    fn name(&self) -> &'static str {
        "discount"
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::InventoryJoined, Capability::GroupedByKey]
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let FilterValue::Float(min_discount) = value else {
            return Err(value.mismatch(self.name(), "float"));
        };
        if min_discount == 0.0 {
            return Ok(query);
        }
        query.and_having(total_discount().gt(min_discount));
        Ok(query)
    }
}

pub struct ProductPopularOrdering;

impl ProductPopularOrdering {
    pub fn new(_alias: TableAlias) -> Self {
        Self
    }
}

impl Sealed for ProductPopularOrdering {}

impl Sortable for ProductPopularOrdering {
    fn name(&self) -> &'static str {
        "popular"
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::ReviewsJoined, Capability::GroupedByKey]
    }

    fn sort(&self, mut query: SelectStatement, direction: SortDirection) -> SelectStatement {
        // unreviewed products have no average; Postgres sorts them as largest
        query.order_by_expr(avg_rating().into(), direction.order());
        query
    }
}

pub struct ProductDiscountOrdering;

impl ProductDiscountOrdering {
    pub fn new(_alias: TableAlias) -> Self {
        Self
    }
}

impl Sealed for ProductDiscountOrdering {}

impl Sortable for ProductDiscountOrdering {
    fn name(&self) -> &'static str {
        "discount"
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::InventoryJoined, Capability::GroupedByKey]
    }

    fn sort(&self, mut query: SelectStatement, direction: SortDirection) -> SelectStatement {
        query.order_by_expr(total_discount().into(), direction.order());
        query
    }
}

pub struct ProductPriceOrdering;

impl ProductPriceOrdering {
    pub fn new(_alias: TableAlias) -> Self {
        Self
    }
}

impl Sealed for ProductPriceOrdering {}

impl Sortable for ProductPriceOrdering {
    fn name(&self) -> &'static str {
        "price"
    }

    fn requires(&self) -> &'static [Capability] {
        &[Capability::InventoryJoined, Capability::GroupedByKey]
    }

    fn sort(&self, mut query: SelectStatement, direction: SortDirection) -> SelectStatement {
        query.order_by_expr(max_unit_price().into(), direction.order());
        query
    }
}
