use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub domain: Uuid,
    pub course_id: String,
    pub title: String,
    pub slug: String,
    pub kind: String,
    pub published: bool,
    pub cost: i64,
    pub creator_id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub lessons: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub groups: Json,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
