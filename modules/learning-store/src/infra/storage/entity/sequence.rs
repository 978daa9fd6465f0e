use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub domain: Uuid,
    pub sequence_id: String,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub creator_id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub trigger: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub emails: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub entrants: Json,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
