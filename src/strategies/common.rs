//! Strategies shared by every listing. They only touch conventionally named
//! columns (`id`, `name`, `created_at`) of the aliased table.

use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Alias, Expr, SelectStatement};

use super::{Filterable, FilterValue, Sealed, SortDirection, Sortable, TableAlias};
use crate::error::StrategyError;

fn column(alias: TableAlias, name: &'static str) -> Expr {
    alias.col(Alias::new(name))
}

/// Escapes `%`, `_` and `\` so a search term matches literally.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive substring match on `name`.
pub struct NameSearchFiltering {
    alias: TableAlias,
}

impl NameSearchFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for NameSearchFiltering {}

impl Filterable for NameSearchFiltering {
    fn name(&self) -> &'static str {
        "search"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let FilterValue::Text(term) = value else {
            return Err(value.mismatch(self.name(), "text"));
        };
        let pattern = format!("%{}%", escape_like_wildcards(&term));
        query.and_where(column(self.alias, "name").ilike(pattern));
        Ok(query)
    }
}

/// Equality on `id`. Accepts any value shape.
pub struct IdFiltering {
    alias: TableAlias,
}

impl IdFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for IdFiltering {}

impl Filterable for IdFiltering {
    fn name(&self) -> &'static str {
        "id"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        query.and_where(column(self.alias, "id").eq(value.to_sql_value()));
        Ok(query)
    }
}

pub struct IdOrdering {
    alias: TableAlias,
}

impl IdOrdering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for IdOrdering {}

impl Sortable for IdOrdering {
    fn name(&self) -> &'static str {
        "id"
    }

    fn sort(&self, mut query: SelectStatement, direction: SortDirection) -> SelectStatement {
        query.order_by((self.alias.iden(), Alias::new("id")), direction.order());
        query
    }
}

pub struct CreatedOrdering {
    alias: TableAlias,
}

impl CreatedOrdering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for CreatedOrdering {}

impl Sortable for CreatedOrdering {
    fn name(&self) -> &'static str {
        "created"
    }

    fn sort(&self, mut query: SelectStatement, direction: SortDirection) -> SelectStatement {
        query.order_by((self.alias.iden(), Alias::new("created_at")), direction.order());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{PostgresQueryBuilder, Query};
    use uuid::Uuid;

    const P: TableAlias = TableAlias::new("p");

    fn base() -> SelectStatement {
        Query::select()
            .column((P.iden(), Alias::new("id")))
            .from_as(Alias::new("product"), P.iden())
            .to_owned()
    }

    #[test]
    fn name_search_is_case_insensitive_substring() {
        let query = NameSearchFiltering::new(P)
            .filter(base(), "Bagel_50%".into())
            .unwrap();
        let sql = query.to_string(PostgresQueryBuilder);

        assert!(sql.contains("\"p\".\"name\" ILIKE"));
        assert!(sql.contains("Bagel\\\\_50\\\\%") || sql.contains("Bagel\\_50\\%"));
    }

    #[test]
    fn name_search_rejects_non_text() {
        let err = NameSearchFiltering::new(P)
            .filter(base(), FilterValue::Int(1))
            .unwrap_err();
        assert_eq!(
            err,
            StrategyError::TypeMismatch {
                strategy: "search",
                expected: "text",
                got: "int"
            }
        );
        assert!(NameSearchFiltering::new(P)
            .filter(base(), FilterValue::Bool(true))
            .is_err());
    }

    #[test]
    fn id_filter_accepts_any_value() {
        let id = Uuid::new_v4();
        for value in [FilterValue::Id(id), FilterValue::Int(1), "x".into()] {
            let sql = IdFiltering::new(P)
                .filter(base(), value)
                .unwrap()
                .to_string(PostgresQueryBuilder);
            assert!(sql.contains("WHERE \"p\".\"id\" = "));
        }
    }

    #[test]
    fn orderings_follow_direction() {
        let asc = IdOrdering::new(P)
            .sort(base(), SortDirection::Asc)
            .to_string(PostgresQueryBuilder);
        assert!(asc.ends_with("ORDER BY \"p\".\"id\" ASC"));

        let desc = CreatedOrdering::new(P)
            .sort(base(), SortDirection::Desc)
            .to_string(PostgresQueryBuilder);
        assert!(desc.ends_with("ORDER BY \"p\".\"created_at\" DESC"));
    }
}
