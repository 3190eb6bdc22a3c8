use std::marker::PhantomData;
use std::str::FromStr;

use sea_orm::sea_query::SelectStatement;
use tracing::debug;

use super::registry::{FilterRegistry, OrderingRegistry};
use super::{Capability, FilterValue, Filterable, Selectable, SortDirection, Sortable, TableAlias};
use crate::error::StrategyError;

/// One entry of an ordering list: `name` sorts ascending, `-name` descending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderDirective<O> {
    pub key: O,
    pub direction: SortDirection,
}

impl<O: OrderingRegistry> FromStr for OrderDirective<O> {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, direction) = match s.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (s, SortDirection::Asc),
        };
        Ok(OrderDirective {
            key: name.parse()?,
            direction,
        })
    }
}

/// Accumulates one listing query: the base projection, then filters and
/// orderings in call order.
///
/// `F` and `O` are the registries of the listing. Each step consumes the
/// context and hands it back so a listing reads as one chain:
///
/// ```ignore
/// let query = QueryContext::<ProductFilter, ProductOrdering>::new(&ProductListSelect::new(P))
///     .filter(ProductFilter::Activity, Some(true.into()))?
///     .ordering(["popular", "-id"])?
///     .into_query();
/// ```
pub struct QueryContext<F, O> {
    query: SelectStatement,
    alias: TableAlias,
    provides: &'static [Capability],
    registries: PhantomData<fn() -> (F, O)>,
}

impl<F: FilterRegistry, O: OrderingRegistry> QueryContext<F, O> {
    pub fn new(select: &dyn Selectable) -> Self {
        Self {
            query: select.select(),
            alias: select.alias(),
            provides: select.provides(),
            registries: PhantomData,
        }
    }

    pub fn query(&self) -> &SelectStatement {
        &self.query
    }

    pub fn into_query(self) -> SelectStatement {
        self.query
    }

    pub fn filter(self, key: F, value: Option<FilterValue>) -> Result<Self, StrategyError> {
        let strategy = key.create(self.alias);
        self.apply_filter(strategy.as_ref(), value)
    }

    pub fn filtering<I>(self, filters: I) -> Result<Self, StrategyError>
    where
        I: IntoIterator<Item = (F, Option<FilterValue>)>,
    {
        filters
            .into_iter()
            .try_fold(self, |context, (key, value)| context.filter(key, value))
    }

    /// Same as [`QueryContext::filtering`] with keys given by name.
    pub fn filtering_by_name<'a, I>(self, filters: I) -> Result<Self, StrategyError>
    where
        I: IntoIterator<Item = (&'a str, Option<FilterValue>)>,
    {
        filters.into_iter().try_fold(self, |context, (name, value)| {
            let key = name.parse::<F>()?;
            context.filter(key, value)
        })
    }

    pub fn order(self, key: O, direction: SortDirection) -> Result<Self, StrategyError> {
        let strategy = key.create(self.alias);
        self.apply_ordering(strategy.as_ref(), direction)
    }

    /// Applies `["popular", "-id"]` style directives. Earlier entries are the
    /// primary sort keys.
    pub fn ordering<I, S>(self, directives: I) -> Result<Self, StrategyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        directives.into_iter().try_fold(self, |context, directive| {
            let OrderDirective { key, direction } = directive.as_ref().parse::<OrderDirective<O>>()?;
            context.order(key, direction)
        })
    }

    fn apply_filter(
        mut self,
        strategy: &dyn Filterable,
        value: Option<FilterValue>,
    ) -> Result<Self, StrategyError> {
        let Some(value) = value.or_else(|| strategy.default_value()) else {
            debug!(strategy = strategy.name(), "filter skipped, no value");
            return Ok(self);
        };
        self.ensure(strategy.name(), strategy.requires())?;

        debug!(strategy = strategy.name(), value = ?value, "applying filter");
        self.query = strategy.filter(self.query, value)?;
        Ok(self)
    }

    fn apply_ordering(
        mut self,
        strategy: &dyn Sortable,
        direction: SortDirection,
    ) -> Result<Self, StrategyError> {
        self.ensure(strategy.name(), strategy.requires())?;

        debug!(strategy = strategy.name(), %direction, "applying ordering");
        self.query = strategy.sort(self.query, direction);
        Ok(self)
    }

    fn ensure(&self, strategy: &'static str, requires: &[Capability]) -> Result<(), StrategyError> {
        match requires.iter().find(|needed| !self.provides.contains(*needed)) {
            Some(capability) => Err(StrategyError::MissingCapability {
                strategy,
                capability: *capability,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::categories::CategorySelect;
    use crate::strategies::common::IdFiltering;
    use crate::strategies::products::{ProductDetailSelect, ProductListSelect};
    use crate::strategies::registry::{
        CategoryFilter, ProductDetailFilter, ProductFilter, ProductOrdering, Unsupported,
    };
    use crate::strategies::Sealed;
    use sea_orm::sea_query::PostgresQueryBuilder;

    const P: TableAlias = TableAlias::new("p");
    const C: TableAlias = TableAlias::new("c");

    type Products = QueryContext<ProductFilter, ProductOrdering>;

    fn sql<F: FilterRegistry, O: OrderingRegistry>(context: &QueryContext<F, O>) -> String {
        context.query().to_string(PostgresQueryBuilder)
    }

    #[test]
    fn absent_value_leaves_query_untouched() {
        let base = Products::new(&ProductListSelect::new(P));
        let before = sql(&base);

        let after = base
            .filter(ProductFilter::Search, None)
            .unwrap()
            .filter(ProductFilter::Popular, None)
            .unwrap();
        assert_eq!(before, sql(&after));
    }

    #[test]
    fn filters_by_name() {
        let context = QueryContext::<CategoryFilter, Unsupported>::new(&CategorySelect::new(C))
            .filtering_by_name([
                ("deactivated", Some(false.into())),
                ("level", Some(FilterValue::Int(1))),
            ])
            .unwrap();
        let sql = sql(&context);

        assert!(sql.contains("\"c\".\"deactivated\" = FALSE"));
        assert!(sql.contains("nlevel(\"c\".\"hierarchy\") = 1"));
    }

    #[test]
    fn unknown_filter_name_is_rejected() {
        let err = Products::new(&ProductListSelect::new(P))
            .filtering_by_name([("colour", Some("red".into()))])
            .err();
        assert_eq!(err, Some(StrategyError::UnknownStrategy("colour".into())));
    }

    #[test]
    fn category_listing_has_no_orderings() {
        let err = QueryContext::<CategoryFilter, Unsupported>::new(&CategorySelect::new(C))
            .ordering(["id"])
            .err();
        assert_eq!(err, Some(StrategyError::UnknownStrategy("id".into())));
    }

    #[test]
    fn orderings_stack_in_call_order() {
        let context = Products::new(&ProductListSelect::new(P))
            .ordering(["popular", "-id"])
            .unwrap();
        let sql = sql(&context);

        assert!(sql.ends_with("ORDER BY AVG(\"product_reviews\".\"rating\") ASC, \"p\".\"id\" DESC"));
    }

    #[test]
    fn leading_dash_sorts_descending() {
        let context = Products::new(&ProductListSelect::new(P))
            .ordering(["-id"])
            .unwrap();
        assert!(sql(&context).ends_with("ORDER BY \"p\".\"id\" DESC"));

        assert_eq!(
            "--id".parse::<OrderDirective<ProductOrdering>>(),
            Err(StrategyError::UnknownStrategy("-id".into()))
        );
        assert_eq!(
            "new".parse::<OrderDirective<ProductOrdering>>(),
            Ok(OrderDirective {
                key: ProductOrdering::New,
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn unknown_ordering_is_rejected() {
        let err = Products::new(&ProductListSelect::new(P))
            .ordering(["id", "rating"])
            .err();
        assert_eq!(err, Some(StrategyError::UnknownStrategy("rating".into())));
    }

    #[test]
    fn aggregate_strategies_need_their_joins() {
        let err = QueryContext::<ProductFilter, ProductOrdering>::new(&ProductDetailSelect::new(P))
            .filter(ProductFilter::Popular, Some(4.0.into()))
            .err();
        assert_eq!(
            err,
            Some(StrategyError::MissingCapability {
                strategy: "popular",
                capability: Capability::ReviewsJoined,
            })
        );

        let err = QueryContext::<ProductDetailFilter, ProductOrdering>::new(&ProductDetailSelect::new(P))
            .order(ProductOrdering::Popular, SortDirection::Desc)
            .err();
        assert!(matches!(err, Some(StrategyError::MissingCapability { .. })));

        // inventory is joined on the detail projection
        assert!(QueryContext::<ProductDetailFilter, ProductOrdering>::new(&ProductDetailSelect::new(P))
            .order(ProductOrdering::Price, SortDirection::Asc)
            .is_ok());
    }

    #[test]
    fn type_mismatch_surfaces() {
        let err = Products::new(&ProductListSelect::new(P))
            .filter(ProductFilter::Activity, Some("yes".into()))
            .err();
        assert!(matches!(err, Some(StrategyError::TypeMismatch { strategy: "activity", .. })));
    }

    struct ActiveByDefault;

    impl Sealed for ActiveByDefault {}

    impl Filterable for ActiveByDefault {
        fn name(&self) -> &'static str {
            "active_by_default"
        }

        fn default_value(&self) -> Option<FilterValue> {
            Some(FilterValue::Int(7))
        }

        fn filter(
            &self,
            query: SelectStatement,
            value: FilterValue,
        ) -> Result<SelectStatement, StrategyError> {
            IdFiltering::new(P).filter(query, value)
        }
    }

    #[test]
    fn default_value_fills_in_missing_one() {
        let defaulted = Products::new(&ProductListSelect::new(P))
            .apply_filter(&ActiveByDefault, None)
            .unwrap();
        assert!(sql(&defaulted).contains("WHERE \"p\".\"id\" = 7"));

        let explicit = Products::new(&ProductListSelect::new(P))
            .apply_filter(&ActiveByDefault, Some(FilterValue::Int(3)))
            .unwrap();
        assert!(sql(&explicit).contains("WHERE \"p\".\"id\" = 3"));
    }
}
