//! `SeaORM` Entity for banks table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "banks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub country_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::countries::Entity",
        from = "Column::CountryId",
        to = "super::countries::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Countries,
    #[sea_orm(has_many = "super::swift_codes::Entity")]
    SwiftCodes,
}

impl Related<super::countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countries.def()
    }
}

impl Related<super::swift_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SwiftCodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
