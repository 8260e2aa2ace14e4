//! `SeaORM` Entity for swift_codes table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "swift_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub swift_code: String,
    pub bank_id: Uuid,
    pub address: String,
    pub is_headquarter: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::banks::Entity",
        from = "Column::BankId",
        to = "super::banks::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Banks,
}

impl Related<super::banks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Banks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
