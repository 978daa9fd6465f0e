use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "communities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub domain: Uuid,
    pub community_id: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub categories: Json,
    pub default_payment_plan: Option<String>,
    pub deleted: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
