use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "favorite_dress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub customer_id: i32,
    pub pre_designed_id: i32,
    pub added_on: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::pre_designed::Entity",
        from = "Column::PreDesignedId",
        to = "super::pre_designed::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PreDesigned,
}

impl Related<super::pre_designed::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PreDesigned.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
