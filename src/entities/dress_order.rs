use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::order_status::OrderStatus;
use super::pre_designed::DressCategory;

/// Purchase of a pre-designed catalog dress.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "dress_order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The buying account, not the customer profile.
    #[sea_orm(indexed)]
    pub user_id: i32,
    #[sea_orm(indexed)]
    pub tailor_id: i32,
    pub product_id: i32,
    pub category: Option<DressCategory>,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    pub order_date: DateTimeUtc,
    pub delivery_date: Option<Date>,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub contact_number: String,
    pub size: Size,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_instructions: Option<String>,

    pub order_confirmed: Option<Date>,
    pub production: Option<Date>,
    pub quality_check: Option<Date>,
    pub deliver: Option<Date>,

    pub status: OrderStatus,
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
    #[sea_orm(
        belongs_to = "super::tailor::Entity",
        from = "Column::TailorId",
        to = "super::tailor::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Tailor,
    #[sea_orm(
        belongs_to = "super::pre_designed::Entity",
        from = "Column::ProductId",
        to = "super::pre_designed::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::tailor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tailor.def()
    }
}

impl Related<super::pre_designed::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(
    enum_name = "size_enum",
    db_type = "String(StringLen::N(4))",
    rs_type = "String"
)]
pub enum Size {
    #[default]
    #[sea_orm(string_value = "S")]
    S,
    #[sea_orm(string_value = "M")]
    M,
    #[sea_orm(string_value = "L")]
    L,
    #[sea_orm(string_value = "XL")]
    XL,
    #[sea_orm(string_value = "XXL")]
    XXL,
}
