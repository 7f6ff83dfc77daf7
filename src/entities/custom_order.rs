use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::order_status::OrderStatus;

/// A measurement based garment ordered straight from a tailor.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "custom_order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub customer_id: i32,
    #[sea_orm(indexed)]
    pub tailor_id: i32,
    pub embroidery_id: Option<i32>,
    pub category: Option<GarmentCategory>,
    pub order_date: DateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub contact_number: Option<String>,
    pub gender: Option<String>,
    pub occasion: Option<String>,
    pub garment_type: Option<String>,
    pub fabrics: Option<String>,
    pub color: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub inspiration: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub detailed_description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_requests: Option<String>,
    pub delivery_date: Option<Date>,
    /// Resolved once when the order is placed.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,

    pub chest: Option<String>,
    pub waist: Option<String>,
    pub hip: Option<String>,
    pub shoulder: Option<String>,
    pub sleeve: Option<String>,
    pub neck: Option<String>,
    pub length: Option<String>,
    pub inseam: Option<String>,

    pub measurements_confirmed: Option<Date>,
    pub fabric_selected: Option<Date>,
    pub cutting_started: Option<Date>,
    pub stitching_started: Option<Date>,
    pub deliver: Option<Date>,

    pub status: OrderStatus,
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
        belongs_to = "super::tailor::Entity",
        from = "Column::TailorId",
        to = "super::tailor::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Tailor,
    #[sea_orm(
        belongs_to = "super::embroidery::Entity",
        from = "Column::EmbroideryId",
        to = "super::embroidery::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Embroidery,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::tailor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tailor.def()
    }
}

impl Related<super::embroidery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Embroidery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    enum_name = "garment_category_enum",
    db_type = "String(StringLen::N(50))",
    rs_type = "String"
)]
#[serde(rename_all = "snake_case")]
pub enum GarmentCategory {
    #[sea_orm(string_value = "short_punjabi")]
    ShortPunjabi,
    #[sea_orm(string_value = "long_punjabi")]
    LongPunjabi,
    #[sea_orm(string_value = "designer_punjabi")]
    DesignerPunjabi,
    #[sea_orm(string_value = "embroidered_punjabi")]
    EmbroideredPunjabi,
    #[sea_orm(string_value = "kurta_punjabi")]
    KurtaPunjabi,
    #[sea_orm(string_value = "traditional_punjabi")]
    TraditionalPunjabi,
    #[sea_orm(string_value = "formal_shirt")]
    FormalShirt,
    #[sea_orm(string_value = "casual_shirt")]
    CasualShirt,
    #[sea_orm(string_value = "half_sleeve_shirt")]
    HalfSleeveShirt,
    #[sea_orm(string_value = "denim_shirt")]
    DenimShirt,
    #[sea_orm(string_value = "tshirt")]
    Tshirt,
    #[sea_orm(string_value = "sleeveless_shirt")]
    SleevelessShirt,
    #[sea_orm(string_value = "printed_shirt")]
    PrintedShirt,
    #[sea_orm(string_value = "kurta")]
    Kurta,
    #[sea_orm(string_value = "formal_pant")]
    FormalPant,
    #[sea_orm(string_value = "jeans")]
    Jeans,
    #[sea_orm(string_value = "cargo_pant")]
    CargoPant,
    #[sea_orm(string_value = "chinos")]
    Chinos,
    #[sea_orm(string_value = "trouser")]
    Trouser,
    #[sea_orm(string_value = "shorts")]
    Shorts,
    #[sea_orm(string_value = "leggings")]
    Leggings,
    #[sea_orm(string_value = "salwar_kameez")]
    SalwarKameez,
    #[sea_orm(string_value = "lehenga")]
    Lehenga,
    #[sea_orm(string_value = "blouse")]
    Blouse,
    #[sea_orm(string_value = "saree_fall_pleat")]
    SareeFallPleat,
    #[sea_orm(string_value = "gown")]
    Gown,
    #[sea_orm(string_value = "maxi_dress")]
    MaxiDress,
    #[sea_orm(string_value = "anarkali")]
    Anarkali,
    #[sea_orm(string_value = "skirt")]
    Skirt,
    #[sea_orm(string_value = "palazzo")]
    Palazzo,
    #[sea_orm(string_value = "tops")]
    Tops,
    #[sea_orm(string_value = "kameez")]
    Kameez,
    #[sea_orm(string_value = "saree_blouse")]
    SareeBlouse,
    #[sea_orm(string_value = "waistcoat")]
    Waistcoat,
    #[sea_orm(string_value = "jacket")]
    Jacket,
    #[sea_orm(string_value = "coat")]
    Coat,
    #[sea_orm(string_value = "sherwani")]
    Sherwani,
    #[sea_orm(string_value = "kids_dress")]
    KidsDress,
}

impl GarmentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            GarmentCategory::ShortPunjabi => "Short Punjabi",
            GarmentCategory::LongPunjabi => "Long Punjabi",
            GarmentCategory::DesignerPunjabi => "Designer Punjabi",
            GarmentCategory::EmbroideredPunjabi => "Embroidered Punjabi",
            GarmentCategory::KurtaPunjabi => "Kurta Punjabi",
            GarmentCategory::TraditionalPunjabi => "Traditional Punjabi",
            GarmentCategory::FormalShirt => "Formal Shirt",
            GarmentCategory::CasualShirt => "Casual Shirt",
            GarmentCategory::HalfSleeveShirt => "Half Sleeve Shirt",
            GarmentCategory::DenimShirt => "Denim Shirt",
            GarmentCategory::Tshirt => "T-Shirt",
            GarmentCategory::SleevelessShirt => "Sleeveless Shirt",
            GarmentCategory::PrintedShirt => "Printed Shirt",
            GarmentCategory::Kurta => "Kurta",
            GarmentCategory::FormalPant => "Formal Pant",
            GarmentCategory::Jeans => "Jeans",
            GarmentCategory::CargoPant => "Cargo Pant",
            GarmentCategory::Chinos => "Chinos",
            GarmentCategory::Trouser => "Trouser",
            GarmentCategory::Shorts => "Shorts",
            GarmentCategory::Leggings => "Leggings",
            GarmentCategory::SalwarKameez => "Salwar Kameez",
            GarmentCategory::Lehenga => "Lehenga",
            GarmentCategory::Blouse => "Blouse",
            GarmentCategory::SareeFallPleat => "Saree Fall & Pleat",
            GarmentCategory::Gown => "Gown",
            GarmentCategory::MaxiDress => "Maxi Dress",
            GarmentCategory::Anarkali => "Anarkali",
            GarmentCategory::Skirt => "Skirt",
            GarmentCategory::Palazzo => "Palazzo",
            GarmentCategory::Tops => "Tops",
            GarmentCategory::Kameez => "Kameez",
            GarmentCategory::SareeBlouse => "Saree Blouse",
            GarmentCategory::Waistcoat => "Waistcoat",
            GarmentCategory::Jacket => "Jacket",
            GarmentCategory::Coat => "Coat",
            GarmentCategory::Sherwani => "Sherwani",
            GarmentCategory::KidsDress => "Kids Dress",
        }
    }
}
