use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::Serialize;

use crate::error::StrategyError;
use crate::hierarchy::HierarchyPath;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(default = false)]
    pub deactivated: bool,
    // ltree in the database, text on the wire
    #[sea_orm(select_as = "text", save_as = "ltree")]
    pub hierarchy: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::entities::product::Entity")]
    Product,
}

impl Related<crate::entities::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn path(&self) -> Result<HierarchyPath, StrategyError> {
        self.hierarchy.parse()
    }
}

impl ActiveModel {
    /// A fresh node whose path is the parent's path plus its own id. The shape is
    /// fixed here; moving a node later does not rewrite its descendants.
    pub fn new_node(
        name: impl Into<String>,
        parent: Option<&Model>,
        deactivated: bool,
    ) -> Result<ActiveModel, StrategyError> {
        let id = Uuid::new_v4();
        let parent_path = parent.map(Model::path).transpose()?;
        let path = HierarchyPath::for_node(id, parent_path.as_ref());

        Ok(ActiveModel {
            id: Set(id),
            name: Set(name.into()),
            deactivated: Set(deactivated),
            hierarchy: Set(path.to_string()),
        })
    }
}
