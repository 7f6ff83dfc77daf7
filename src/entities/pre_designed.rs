use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A ready-made dress a tailor sells from the catalog.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "pre_designed")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub tailor_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Display only, never decremented by orders.
    pub availability: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub category: Option<DressCategory>,
    pub fabric_type: Option<String>,
    pub thread_type: Option<String>,
    pub color: Option<String>,
    pub estimated_hours: Option<i32>,
    pub gender: Option<Gender>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tailor::Entity",
        from = "Column::TailorId",
        to = "super::tailor::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Tailor,
    #[sea_orm(has_many = "super::image::Entity")]
    Image,
}

impl Related<super::tailor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tailor.def()
    }
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "dress_category_enum",
    db_type = "String(StringLen::N(50))",
    rs_type = "String"
)]
pub enum DressCategory {
    #[sea_orm(string_value = "Saree")]
    Saree,
    #[sea_orm(string_value = "Salwar Kameez")]
    #[serde(rename = "Salwar Kameez")]
    SalwarKameez,
    #[sea_orm(string_value = "Punjabi")]
    Punjabi,
    #[sea_orm(string_value = "Formal Wear")]
    #[serde(rename = "Formal Wear")]
    FormalWear,
    #[sea_orm(string_value = "Casual Wear")]
    #[serde(rename = "Casual Wear")]
    CasualWear,
    #[sea_orm(string_value = "Western Wear")]
    #[serde(rename = "Western Wear")]
    WesternWear,
}

impl DressCategory {
    pub fn label(&self) -> &'static str {
        match self {
            DressCategory::Saree => "Saree",
            DressCategory::SalwarKameez => "Salwar Kameez",
            DressCategory::Punjabi => "Punjabi",
            DressCategory::FormalWear => "Formal Wear",
            DressCategory::CasualWear => "Casual Wear",
            DressCategory::WesternWear => "Western Wear",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "gender_enum",
    db_type = "String(StringLen::N(10))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "other")]
    Other,
}
