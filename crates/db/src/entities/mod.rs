//! `SeaORM` entity definitions for the registry tables.

pub mod banks;
pub mod countries;
pub mod swift_codes;

pub mod prelude {
    //! Entity aliases.

    pub use super::banks::Entity as Banks;
    pub use super::countries::Entity as Countries;
    pub use super::swift_codes::Entity as SwiftCodes;
}
