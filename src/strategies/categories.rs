use sea_orm::sea_query::{Alias, Expr, JoinType, Query, SelectStatement, SimpleExpr};

use super::{Filterable, FilterValue, HierarchyFilter, Sealed, Selectable, TableAlias};
use crate::entities::category;
use crate::error::StrategyError;
use crate::hierarchy::{self, PathSegment};

/// Alias of the parent row in the category self-join.
const PARENT: &str = "pc";

/// ```sql
/// SELECT c.id, c.name, pc.id AS parent, nlevel(c.hierarchy) AS level
/// FROM category AS c
/// LEFT JOIN category AS pc ON pc.hierarchy = subpath(c.hierarchy, 0, -1)
/// ```
pub struct CategorySelect {
    alias: TableAlias,
}

impl CategorySelect {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for CategorySelect {}

impl Selectable for CategorySelect {
    fn alias(&self) -> TableAlias {
        self.alias
    }

    fn select(&self) -> SelectStatement {
        let c = self.alias;
        let parent = Alias::new(PARENT);

        Query::select()
            .column((c.iden(), category::Column::Id))
            .column((c.iden(), category::Column::Name))
            .expr_as(
                Expr::col((parent.clone(), category::Column::Id)),
                Alias::new("parent"),
            )
            .expr_as(
                hierarchy::nlevel(c.col(category::Column::Hierarchy)),
                Alias::new("level"),
            )
            .from_as(category::Entity, c.iden())
            .join_as(
                JoinType::LeftJoin,
                category::Entity,
                parent.clone(),
                Expr::col((parent, category::Column::Hierarchy))
                    .eq(hierarchy::parent_path(c.col(category::Column::Hierarchy))),
            )
            .to_owned()
    }
}

pub struct CategoryDeactivatedFiltering {
    alias: TableAlias,
}

impl CategoryDeactivatedFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for CategoryDeactivatedFiltering {}

impl Filterable for CategoryDeactivatedFiltering {
    fn name(&self) -> &'static str {
        "deactivated"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let FilterValue::Bool(deactivated) = value else {
            return Err(value.mismatch(self.name(), "bool"));
        };
        query.and_where(self.alias.col(category::Column::Deactivated).eq(deactivated));
        Ok(query)
    }
}

/// Equality on tree depth.
pub struct CategoryLevelFiltering {
    alias: TableAlias,
}

impl CategoryLevelFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }
}

impl Sealed for CategoryLevelFiltering {}

impl Filterable for CategoryLevelFiltering {
    fn name(&self) -> &'static str {
        "level"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let FilterValue::Int(level) = value else {
            return Err(value.mismatch(self.name(), "int"));
        };
        query.and_where(
            Expr::expr(hierarchy::nlevel(self.alias.col(category::Column::Hierarchy))).eq(level),
        );
        Ok(query)
    }
}

/// Tree-relative filtering around a target category.
///
/// * `descendants: Some(true)`: strict descendants of the target.
/// * `descendants: Some(false)`: strict ancestors of the target.
/// * `descendants: None`: every path containing the target's label, i.e. the
///   target and its whole subtree. Ancestors never carry that label.
pub struct CategoryHierarchyFiltering {
    alias: TableAlias,
}

impl CategoryHierarchyFiltering {
    pub fn new(alias: TableAlias) -> Self {
        Self { alias }
    }

    fn target_path(target: &HierarchyFilter) -> SimpleExpr {
        SimpleExpr::SubQuery(
            None,
            Box::new(
                Query::select()
                    .column((category::Entity, category::Column::Hierarchy))
                    .from(category::Entity)
                    .and_where(
                        Expr::col((category::Entity, category::Column::Id)).eq(target.category_id),
                    )
                    .limit(1)
                    .to_owned()
                    .into_sub_query_statement(),
            ),
        )
    }
}

impl Sealed for CategoryHierarchyFiltering {}

impl Filterable for CategoryHierarchyFiltering {
    fn name(&self) -> &'static str {
        "hierarchy"
    }

    fn filter(
        &self,
        mut query: SelectStatement,
        value: FilterValue,
    ) -> Result<SelectStatement, StrategyError> {
        let FilterValue::Hierarchy(target) = value else {
            return Err(value.mismatch(self.name(), "hierarchy"));
        };
        let path = self.alias.col(category::Column::Hierarchy);

        match target.descendants {
            Some(descendants) => {
                let target_path = Self::target_path(&target);
                let relation = if descendants {
                    hierarchy::descendant_of(path, target_path)
                } else {
                    hierarchy::ancestor_of(path, target_path)
                };
                query
                    .and_where(relation)
                    .and_where(self.alias.col(category::Column::Id).ne(target.category_id));
            }
            None => {
                let segment = PathSegment::from_id(target.category_id);
                query.and_where(hierarchy::subtree_match(path, &segment));
            }
        }
        Ok(query)
    }
}
