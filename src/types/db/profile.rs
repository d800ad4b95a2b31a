use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: String,
    pub kind: String,
    pub org_name: String,
    pub registration_no: Option<String>,
    pub address: Option<String>,

    // JSON array of strings
    pub focus_tags: Option<String>,

    pub verification_status: String,
    pub verified_by: Option<String>,
    pub verified_at: Option<i64>,
    pub review_notes: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
