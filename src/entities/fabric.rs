use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "fabric")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub tailor_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub fabric_type: FabricType,
    pub color: Option<String>,
    pub pattern: Pattern,
    pub texture: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((6, 2)))")]
    pub width: Decimal,
    /// Meters on hand.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub length_available: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price_per_meter: Decimal,
    #[sea_orm(default_value = true)]
    pub is_available: bool,
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
}

impl Related<super::tailor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tailor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(
    enum_name = "fabric_type_enum",
    db_type = "String(StringLen::N(20))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum FabricType {
    #[default]
    #[sea_orm(string_value = "cotton")]
    Cotton,
    #[sea_orm(string_value = "silk")]
    Silk,
    #[sea_orm(string_value = "linen")]
    Linen,
    #[sea_orm(string_value = "wool")]
    Wool,
    #[sea_orm(string_value = "polyester")]
    Polyester,
    #[sea_orm(string_value = "blend")]
    Blend,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(
    Clone, Copy, PartialEq, Eq, Debug, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(
    enum_name = "pattern_enum",
    db_type = "String(StringLen::N(20))",
    rs_type = "String"
)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    #[default]
    #[sea_orm(string_value = "plain")]
    Plain,
    #[sea_orm(string_value = "striped")]
    Striped,
    #[sea_orm(string_value = "checked")]
    Checked,
    #[sea_orm(string_value = "printed")]
    Printed,
    #[sea_orm(string_value = "embroidered")]
    Embroidered,
}
