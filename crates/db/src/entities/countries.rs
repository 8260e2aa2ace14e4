//! `SeaORM` Entity for countries table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "countries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub iso2_code: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::banks::Entity")]
    Banks,
}

impl Related<super::banks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Banks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
