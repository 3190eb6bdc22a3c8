//! Name-keyed strategy registries, one enum per listing endpoint.
//!
//! Parsing a key from a request string is the only place an unknown name can
//! appear; past that point every key maps to a constructor through an
//! exhaustive `match`.

use std::fmt;
use std::str::FromStr;

use super::categories::{
    CategoryDeactivatedFiltering, CategoryHierarchyFiltering, CategoryLevelFiltering,
};
use super::common::{CreatedOrdering, IdFiltering, IdOrdering, NameSearchFiltering};
use super::products::{
    ProductActivityFiltering, ProductCategoryFiltering, ProductDiscountFiltering,
    ProductDiscountOrdering, ProductPopularFiltering, ProductPopularOrdering,
    ProductPriceOrdering,
};
use super::reviews::ReviewProductFiltering;
use super::{Filterable, Sortable, TableAlias};
use crate::error::StrategyError;

pub trait FilterRegistry:
    Copy + fmt::Debug + FromStr<Err = StrategyError> + Send + Sync + 'static
{
    fn create(self, alias: TableAlias) -> Box<dyn Filterable>;
}

pub trait OrderingRegistry:
    Copy + fmt::Debug + FromStr<Err = StrategyError> + Send + Sync + 'static
{
    fn create(self, alias: TableAlias) -> Box<dyn Sortable>;
}

macro_rules! strategy_registry {
    (
        $(#[$meta:meta])*
        $name:ident: $registry:ident => $role:ident {
            $($variant:ident = $key:literal => $strategy:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl FromStr for $name {
            type Err = StrategyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    other => Err(StrategyError::UnknownStrategy(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }

        impl $registry for $name {
            fn create(self, alias: TableAlias) -> Box<dyn $role> {
                match self {
                    $($name::$variant => Box::new(<$strategy>::new(alias))),+
                }
            }
        }
    };
}

strategy_registry! {
    /// Filters of the category listing.
    CategoryFilter: FilterRegistry => Filterable {
        Deactivated = "deactivated" => CategoryDeactivatedFiltering,
        Hierarchy = "hierarchy" => CategoryHierarchyFiltering,
        Level = "level" => CategoryLevelFiltering,
    }
}

strategy_registry! {
    /// Filters of the product listing.
    ProductFilter: FilterRegistry => Filterable {
        Activity = "activity" => ProductActivityFiltering,
        Category = "category" => ProductCategoryFiltering,
        Search = "search" => NameSearchFiltering,
        Popular = "popular" => ProductPopularFiltering,
        Discount = "discount" => ProductDiscountFiltering,
    }
}

strategy_registry! {
    /// Orderings of the product listing.
    ProductOrdering: OrderingRegistry => Sortable {
        Id = "id" => IdOrdering,
        Popular = "popular" => ProductPopularOrdering,
        New = "new" => CreatedOrdering,
        Discount = "discount" => ProductDiscountOrdering,
        Price = "price" => ProductPriceOrdering,
    }
}

strategy_registry! {
    ProductDetailFilter: FilterRegistry => Filterable {
        Id = "id" => IdFiltering,
        Activity = "activity" => ProductActivityFiltering,
    }
}

strategy_registry! {
    ReviewFilter: FilterRegistry => Filterable {
        ProductId = "product_id" => ReviewProductFiltering,
    }
}

strategy_registry! {
    ReviewOrdering: OrderingRegistry => Sortable {
        Id = "id" => IdOrdering,
        CreatedAt = "created_at" => CreatedOrdering,
    }
}

/// Registry of a listing that offers no strategies of a role. Every name is
/// unknown to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unsupported {}

impl FromStr for Unsupported {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Err(StrategyError::UnknownStrategy(s.to_string()))
    }
}

impl FilterRegistry for Unsupported {
    fn create(self, _alias: TableAlias) -> Box<dyn Filterable> {
        match self {}
    }
}

impl OrderingRegistry for Unsupported {
    fn create(self, _alias: TableAlias) -> Box<dyn Sortable> {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIAS: TableAlias = TableAlias::new("t");

    #[test]
    fn keys_round_trip_through_names() {
        for key in ProductOrdering::ALL {
            assert_eq!(key.key().parse::<ProductOrdering>(), Ok(*key));
            assert!(!key.create(ALIAS).name().is_empty());
        }
        for key in CategoryFilter::ALL {
            assert_eq!(key.to_string().parse::<CategoryFilter>(), Ok(*key));
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "rating".parse::<ProductOrdering>(),
            Err(StrategyError::UnknownStrategy("rating".into()))
        );
        assert!("price".parse::<ReviewOrdering>().is_err());
        assert!("id".parse::<Unsupported>().is_err());
        assert!("search".parse::<ProductDetailFilter>().is_err());
    }

    #[test]
    fn registries_build_the_named_strategy() {
        assert_eq!(ProductFilter::Search.create(ALIAS).name(), "search");
        assert_eq!(ProductOrdering::New.create(ALIAS).name(), "created");
        assert_eq!(ReviewFilter::ProductId.create(ALIAS).name(), "product_id");
    }
}
