//! Composable listing queries.
//!
//! A listing is built from one [`Selectable`] (the base projection with whatever
//! joins and grouping it needs) followed by any number of [`Filterable`] and
//! [`Sortable`] strategies picked by name at request time. Every strategy is
//! bound to the aliased table of the listing and takes the query by value,
//! returning the narrowed/ordered statement.
//!
//! Some filters and orderings aggregate over a relation the base projection
//! already outer-joins and groups. They say so through [`Capability`] and the
//! [`context::QueryContext`] refuses to apply them on a base that lacks it.

pub mod categories;
pub mod common;
pub mod context;
pub mod products;
pub mod registry;
pub mod reviews;

use sea_orm::sea_query::{Alias, Expr, Iden, Order, SelectStatement, SimpleExpr, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::StrategyError;

/// Alias a listing gives its primary table, e.g. `product AS p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableAlias(&'static str);

impl TableAlias {
    pub const fn new(name: &'static str) -> TableAlias {
        TableAlias(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }

    pub fn iden(&self) -> Alias {
        Alias::new(self.0)
    }

    /// `"<alias>"."<column>"`
    pub fn col<C>(&self, column: C) -> Expr
    where
        C: Iden + 'static,
    {
        Expr::col((self.iden(), column))
    }
}

/// Join/grouping shape a base projection guarantees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    ImagesJoined,
    InventoryJoined,
    ReviewsJoined,
    GroupedByKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn order(self) -> Order {
        match self {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(StrategyError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// Target of the category hierarchy filter.
///
/// With `descendants` set the filter walks one direction of the tree from the
/// target (excluding it); without it the target and its whole subtree match.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyFilter {
    pub category_id: Uuid,
    pub descendants: Option<bool>,
}

/// Value handed to a [`Filterable`]. Each strategy checks it gets the variant it
/// understands.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Id(Uuid),
    Hierarchy(HierarchyFilter),
}

impl FilterValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Bool(_) => "bool",
            FilterValue::Int(_) => "int",
            FilterValue::Float(_) => "float",
            FilterValue::Text(_) => "text",
            FilterValue::Id(_) => "id",
            FilterValue::Hierarchy(_) => "hierarchy",
        }
    }

    pub(crate) fn mismatch(&self, strategy: &'static str, expected: &'static str) -> StrategyError {
        StrategyError::TypeMismatch {
            strategy,
            expected,
            got: self.kind(),
        }
    }

    /// Plain SQL value for equality comparisons. Hierarchy targets compare by id.
    pub fn to_sql_value(&self) -> SimpleExpr {
        let value: Value = match self {
            FilterValue::Bool(v) => (*v).into(),
            FilterValue::Int(v) => (*v).into(),
            FilterValue::Float(v) => (*v).into(),
            FilterValue::Text(v) => v.clone().into(),
            FilterValue::Id(v) => (*v).into(),
            FilterValue::Hierarchy(v) => v.category_id.into(),
        };
        Expr::val(value).into()
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Id(value)
    }
}

impl From<HierarchyFilter> for FilterValue {
    fn from(value: HierarchyFilter) -> Self {
        FilterValue::Hierarchy(value)
    }
}

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// Produces the base projection of a listing.
pub trait Selectable: Sealed + Send + Sync {
    fn alias(&self) -> TableAlias;

    fn select(&self) -> SelectStatement;

    fn provides(&self) -> &'static [Capability] {
        &[]
    }
}

/// Narrows a query with a typed value.
pub trait Filterable: Sealed + Send + Sync {
    fn name(&self) -> &'static str;

    /// Substituted when the caller supplies no value.
    fn default_value(&self) -> Option<FilterValue> {
        None
    }

    fn requires(&self) -> &'static [Capability] {
        &[]
    }

    fn filter(
        &self,
        query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError>;
}

/// Appends one ORDER BY term.
pub trait Sortable: Sealed + Send + Sync {
    fn name(&self) -> &'static str;

    fn requires(&self) -> &'static [Capability] {
        &[]
    }

    fn sort(&self, query: SelectStatement, direction: SortDirection) -> SelectStatement;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens() {
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!(
            "DESC".parse::<SortDirection>(),
            Err(StrategyError::InvalidDirection("DESC".into()))
        );
        assert!("".parse::<SortDirection>().is_err());
    }

    #[test]
    fn filter_value_kinds() {
        assert_eq!(FilterValue::from(true).kind(), "bool");
        assert_eq!(FilterValue::from(1.5).kind(), "float");
        assert_eq!(FilterValue::from("x").kind(), "text");
        assert_eq!(
            FilterValue::from(2_i64).mismatch("level", "int"),
            StrategyError::TypeMismatch {
                strategy: "level",
                expected: "int",
                got: "int"
            }
        );
    }
}
