use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tailor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub business_name: String,
    #[sea_orm(column_type = "Text")]
    pub business_location: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub tailor_about: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub business_description: Option<String>,
    pub phone: Option<String>,
    pub expertise: Expertise,
    pub category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub services_offered: Option<String>,
    /// Base stitching charge every custom order starts from.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    #[sea_orm(unique)]
    pub nid: String,
    pub average_rating: f64,
    pub is_available: bool,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_earning: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::embroidery::Entity")]
    Embroidery,
    #[sea_orm(has_many = "super::fabric::Entity")]
    Fabric,
    #[sea_orm(has_many = "super::pre_designed::Entity")]
    PreDesigned,
    #[sea_orm(has_many = "super::custom_order::Entity")]
    CustomOrder,
    #[sea_orm(has_many = "super::dress_order::Entity")]
    DressOrder,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::embroidery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Embroidery.def()
    }
}

impl Related<super::fabric::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fabric.def()
    }
}

impl Related<super::pre_designed::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PreDesigned.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(
    enum_name = "expertise_enum",
    db_type = "String(StringLen::N(20))",
    rs_type = "String"
)]
pub enum Expertise {
    #[default]
    #[sea_orm(string_value = "Beginner")]
    Beginner,
    #[sea_orm(string_value = "Intermediate")]
    Intermediate,
    #[sea_orm(string_value = "Expert")]
    Expert,
}
