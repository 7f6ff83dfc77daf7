use sea_orm::entity::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Photo of a pre-designed dress. The file lives under the upload
/// directory as `{path_name}.{extension}`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub pre_designed_id: i32,
    pub file_name: String,
    #[sea_orm(unique)]
    pub path_name: String,
    pub extension: FileExtension,
}

impl Model {
    pub fn stored_name(&self) -> String {
        format!("{}.{}", self.path_name, self.extension)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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

#[derive(Clone, Copy, PartialEq, Debug, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(
    enum_name = "extension_enum",
    db_type = "String(StringLen::N(255))",
    rs_type = "String"
)]
pub enum FileExtension {
    #[sea_orm(string_value = "jpg")]
    #[serde(rename = "jpg")]
    JPG,
    #[sea_orm(string_value = "png")]
    #[serde(rename = "png")]
    PNG,
}

impl FileExtension {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/jpeg" => Some(FileExtension::JPG),
            "image/png" => Some(FileExtension::PNG),
            _ => None,
        }
    }
}

impl FromStr for FileExtension {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jpg" => Ok(FileExtension::JPG),
            "png" => Ok(FileExtension::PNG),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileExtension::JPG => f.write_str("jpg"),
            FileExtension::PNG => f.write_str("png"),
        }
    }
}
