use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub group_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::GroupId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Group,
}

impl Related<crate::entities::product::Entity> for Entity {
    fn to() -> RelationDef {
        crate::entities::product_tag::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::entities::product_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
