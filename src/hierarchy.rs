//! Materialized category paths.
//!
//! A category's position in the tree is stored as a Postgres `ltree` value made
//! of one label per ancestor, ending with the node's own label. Labels are the
//! simple (dash-less) hex form of the node id. [`HierarchyPath`] is the in-memory
//! counterpart; the free functions at the bottom build the matching SQL
//! predicates so both sides agree on what "ancestor", "descendant" and
//! "subtree" mean.

use sea_orm::sea_query::{Alias, BinOper, Expr, Func, SimpleExpr};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::StrategyError;

const SEPARATOR: char = '.';

/// One label of a materialized path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegment(String);

impl PathSegment {
    pub fn from_id(id: Uuid) -> PathSegment {
        PathSegment(id.simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PathSegment {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(StrategyError::InvalidPath("empty label".into()));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StrategyError::InvalidPath(format!("bad label `{s}`")));
        }
        Ok(PathSegment(s.to_string()))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty list of labels from the root down to the node itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HierarchyPath(Vec<PathSegment>);

impl HierarchyPath {
    pub fn root(id: Uuid) -> HierarchyPath {
        HierarchyPath(vec![PathSegment::from_id(id)])
    }

    /// Path of a new node placed under `parent`, or a root when there is none.
    pub fn for_node(id: Uuid, parent: Option<&HierarchyPath>) -> HierarchyPath {
        match parent {
            Some(parent) => parent.child(id),
            None => HierarchyPath::root(id),
        }
    }

    pub fn child(&self, id: Uuid) -> HierarchyPath {
        let mut segments = self.0.clone();
        segments.push(PathSegment::from_id(id));
        HierarchyPath(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Tree depth; roots are level 1.
    pub fn level(&self) -> usize {
        self.0.len()
    }

    pub fn last(&self) -> &PathSegment {
        // never empty: every constructor pushes at least one segment
        &self.0[self.0.len() - 1]
    }

    /// The path with its last label removed, `None` for roots.
    pub fn parent(&self) -> Option<HierarchyPath> {
        if self.0.len() < 2 {
            return None;
        }
        Some(HierarchyPath(self.0[..self.0.len() - 1].to_vec()))
    }

    /// True when `self` is a prefix of `other`. Like ltree's `@>`, a path is its
    /// own ancestor.
    pub fn is_ancestor_of(&self, other: &HierarchyPath) -> bool {
        other.0.starts_with(&self.0)
    }

    pub fn is_descendant_of(&self, other: &HierarchyPath) -> bool {
        other.is_ancestor_of(self)
    }

    /// Equivalent of matching the path against `*.<segment>.*`.
    pub fn matches_subtree(&self, segment: &PathSegment) -> bool {
        self.0.contains(segment)
    }
}

impl FromStr for HierarchyPath {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = s
            .split(SEPARATOR)
            .map(PathSegment::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(HierarchyPath(segments))
    }
}

impl fmt::Display for HierarchyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

/// lquery pattern matching every path that contains `segment`.
pub fn subtree_pattern(segment: &PathSegment) -> String {
    format!("*.{segment}.*")
}

/// `nlevel(path)`
pub fn nlevel<T: Into<SimpleExpr>>(path: T) -> SimpleExpr {
    Func::cust(Alias::new("nlevel")).arg(path).into()
}

/// `subpath(path, 0, -1)`: the parent's path.
pub fn parent_path<T: Into<SimpleExpr>>(path: T) -> SimpleExpr {
    Func::cust(Alias::new("subpath"))
        .arg(path)
        .arg(Expr::val(0))
        .arg(Expr::val(-1))
        .into()
}

/// `path @> other`
pub fn ancestor_of<L, R>(path: L, other: R) -> SimpleExpr
where
    L: Into<SimpleExpr>,
    R: Into<SimpleExpr>,
{
    Expr::expr(path).binary(BinOper::Custom("@>"), other)
}

/// `path <@ other`
pub fn descendant_of<L, R>(path: L, other: R) -> SimpleExpr
where
    L: Into<SimpleExpr>,
    R: Into<SimpleExpr>,
{
    Expr::expr(path).binary(BinOper::Custom("<@"), other)
}

/// `path ~ CAST('*.<segment>.*' AS lquery)`
pub fn subtree_match<T: Into<SimpleExpr>>(path: T, segment: &PathSegment) -> SimpleExpr {
    Expr::expr(path).binary(
        BinOper::Custom("~"),
        Expr::val(subtree_pattern(segment)).cast_as(Alias::new("lquery")),
    )
}
