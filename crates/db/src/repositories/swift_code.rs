//! SWIFT code repository: the transactional store behind the registry.
//!
//! Countries and banks are never written directly. They are created by an
//! insert that needs them and removed by the delete that leaves them empty.
//!
//! Both write paths lock parents in the same order (country, then bank, then
//! the code row) so concurrent inserts and deletes cannot deadlock.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use swiftreg_core::registry::{
    CountrySwiftCodes, DeleteOutcome, InsertOutcome, NewSwiftCode, RegistryStore, StoreError,
    SwiftCodeDetails, SwiftCodeView,
};
use swiftreg_core::validation::{branch_prefix, is_headquarter_code};

use crate::entities::{banks, countries, swift_codes};

/// Attempts at an insert whose freshly resolved parent is deleted underneath it.
const MAX_INSERT_ATTEMPTS: u32 = 3;

/// A code record joined with its bank and country.
#[derive(Debug, FromQueryResult)]
struct SwiftCodeRow {
    swift_code: String,
    address: String,
    is_headquarter: bool,
    bank_name: String,
    country_iso2: String,
    country_name: String,
}

impl SwiftCodeRow {
    fn into_view(self) -> SwiftCodeView {
        SwiftCodeView {
            address: self.address,
            bank_name: self.bank_name,
            country_iso2: self.country_iso2,
            country_name: self.country_name,
            is_headquarter: self.is_headquarter,
            swift_code: self.swift_code,
            branches: None,
        }
    }

    fn into_details(self) -> SwiftCodeDetails {
        SwiftCodeDetails {
            address: self.address,
            bank_name: self.bank_name,
            country_iso2: self.country_iso2,
            is_headquarter: self.is_headquarter,
            swift_code: self.swift_code,
        }
    }
}

/// SWIFT code repository implementation.
#[derive(Debug, Clone)]
pub struct SwiftCodeRepository {
    db: DatabaseConnection,
}

impl SwiftCodeRepository {
    /// Create a new SWIFT code repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Runs one insert attempt.
    ///
    /// Returns `None` if a parent row vanished between its upsert and the
    /// locking re-select; the transaction is rolled back and may be retried.
    async fn try_insert(&self, record: &NewSwiftCode) -> Result<Option<InsertOutcome>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(country_id) = ensure_country(&txn, record).await? else {
            txn.rollback().await?;
            return Ok(None);
        };
        let Some(bank_id) = ensure_bank(&txn, &record.bank_name, country_id).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let inserted = swift_codes::Entity::insert(swift_codes::ActiveModel {
            swift_code: Set(record.swift_code.clone()),
            bank_id: Set(bank_id),
            address: Set(record.address.clone()),
            is_headquarter: Set(record.is_headquarter),
        })
        .on_conflict(
            OnConflict::column(swift_codes::Column::SwiftCode)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        if inserted == 0 {
            // Drops any country or bank this attempt created.
            txn.rollback().await?;
            return Ok(Some(InsertOutcome::Conflict));
        }

        txn.commit().await?;
        Ok(Some(InsertOutcome::Created))
    }

    async fn insert_record(&self, record: &NewSwiftCode) -> Result<InsertOutcome, StoreError> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            if let Some(outcome) = self.try_insert(record).await.map_err(store_error)? {
                return Ok(outcome);
            }
            debug!(
                swift_code = %record.swift_code,
                attempt,
                "Parent row removed concurrently, retrying insert"
            );
        }

        Err(StoreError::new(format!(
            "gave up inserting {} after {MAX_INSERT_ATTEMPTS} attempts",
            record.swift_code
        )))
    }

    async fn find_record(&self, swift_code: &str) -> Result<Option<SwiftCodeView>, DbErr> {
        if !is_headquarter_code(swift_code) {
            let row = joined_records()
                .filter(swift_codes::Column::SwiftCode.eq(swift_code))
                .filter(swift_codes::Column::IsHeadquarter.eq(false))
                .into_model::<SwiftCodeRow>()
                .one(&self.db)
                .await?;

            return Ok(row.map(SwiftCodeRow::into_view));
        }

        // Headquarters and its branch family in one statement, so both come
        // from the same snapshot.
        let rows = joined_records()
            .filter(
                Condition::any()
                    .add(swift_codes::Column::SwiftCode.eq(swift_code))
                    .add(
                        Condition::all()
                            .add(swift_codes::Column::SwiftCode.starts_with(branch_prefix(swift_code)))
                            .add(swift_codes::Column::IsHeadquarter.eq(false)),
                    ),
            )
            .order_by_asc(swift_codes::Column::SwiftCode)
            .into_model::<SwiftCodeRow>()
            .all(&self.db)
            .await?;

        let (head, branches): (Vec<SwiftCodeRow>, Vec<SwiftCodeRow>) = rows
            .into_iter()
            .partition(|row| row.swift_code == swift_code);

        Ok(head.into_iter().next().map(|head| SwiftCodeView {
            branches: Some(
                branches
                    .into_iter()
                    .map(SwiftCodeRow::into_details)
                    .collect(),
            ),
            ..head.into_view()
        }))
    }

    async fn find_country(&self, country_iso2: &str) -> Result<Option<CountrySwiftCodes>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(country) = countries::Entity::find()
            .filter(countries::Column::Iso2Code.eq(country_iso2))
            .one(&txn)
            .await?
        else {
            txn.commit().await?;
            return Ok(None);
        };

        let rows = joined_records()
            .filter(banks::Column::CountryId.eq(country.id))
            .order_by_asc(swift_codes::Column::SwiftCode)
            .into_model::<SwiftCodeRow>()
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(Some(CountrySwiftCodes {
            country_iso2: country.iso2_code,
            country_name: country.name,
            swift_codes: rows.into_iter().map(SwiftCodeRow::into_details).collect(),
        }))
    }

    async fn delete_record(&self, swift_code: &str) -> Result<DeleteOutcome, DbErr> {
        let txn = self.db.begin().await?;

        let Some(record) = swift_codes::Entity::find_by_id(swift_code).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        };
        let Some(bank) = banks::Entity::find_by_id(record.bank_id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        };

        // Lock order matches insert: country, bank, then the code row.
        countries::Entity::find_by_id(bank.country_id)
            .lock_exclusive()
            .one(&txn)
            .await?;
        banks::Entity::find_by_id(bank.id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let deleted = swift_codes::Entity::delete_by_id(swift_code)
            .exec(&txn)
            .await?;
        if deleted.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        }

        let remaining_codes = swift_codes::Entity::find()
            .filter(swift_codes::Column::BankId.eq(bank.id))
            .count(&txn)
            .await?;
        if remaining_codes == 0 {
            banks::Entity::delete_by_id(bank.id).exec(&txn).await?;
            debug!(bank_id = %bank.id, "Removed bank with no remaining codes");

            let remaining_banks = banks::Entity::find()
                .filter(banks::Column::CountryId.eq(bank.country_id))
                .count(&txn)
                .await?;
            if remaining_banks == 0 {
                countries::Entity::delete_by_id(bank.country_id)
                    .exec(&txn)
                    .await?;
                debug!(country_id = %bank.country_id, "Removed country with no remaining banks");
            }
        }

        txn.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }
}

impl RegistryStore for SwiftCodeRepository {
    async fn insert(&self, record: NewSwiftCode) -> Result<InsertOutcome, StoreError> {
        self.insert_record(&record).await
    }

    async fn find_by_code(&self, swift_code: &str) -> Result<Option<SwiftCodeView>, StoreError> {
        self.find_record(swift_code).await.map_err(store_error)
    }

    async fn find_by_country(
        &self,
        country_iso2: &str,
    ) -> Result<Option<CountrySwiftCodes>, StoreError> {
        self.find_country(country_iso2).await.map_err(store_error)
    }

    async fn delete(&self, swift_code: &str) -> Result<DeleteOutcome, StoreError> {
        self.delete_record(swift_code).await.map_err(store_error)
    }
}

/// Code records with the bank and country columns the views need.
fn joined_records() -> Select<swift_codes::Entity> {
    swift_codes::Entity::find()
        .select_only()
        .column(swift_codes::Column::SwiftCode)
        .column(swift_codes::Column::Address)
        .column(swift_codes::Column::IsHeadquarter)
        .column_as(banks::Column::Name, "bank_name")
        .column_as(countries::Column::Iso2Code, "country_iso2")
        .column_as(countries::Column::Name, "country_name")
        .join(JoinType::InnerJoin, swift_codes::Relation::Banks.def())
        .join(JoinType::InnerJoin, banks::Relation::Countries.def())
}

/// Get-or-create the country row, keeping the stored name if it exists.
///
/// The row is re-read with a shared lock so a concurrent delete cannot
/// remove it before this transaction commits.
async fn ensure_country(
    txn: &DatabaseTransaction,
    record: &NewSwiftCode,
) -> Result<Option<Uuid>, DbErr> {
    countries::Entity::insert(countries::ActiveModel {
        id: Set(Uuid::now_v7()),
        iso2_code: Set(record.country_iso2.clone()),
        name: Set(record.country_name.clone()),
    })
    .on_conflict(
        OnConflict::column(countries::Column::Iso2Code)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await?;

    let country = countries::Entity::find()
        .filter(countries::Column::Iso2Code.eq(record.country_iso2.as_str()))
        .lock_shared()
        .one(txn)
        .await?;

    Ok(country.map(|c| c.id))
}

/// Get-or-create the bank row under `country_id`.
async fn ensure_bank(
    txn: &DatabaseTransaction,
    name: &str,
    country_id: Uuid,
) -> Result<Option<Uuid>, DbErr> {
    banks::Entity::insert(banks::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name.to_string()),
        country_id: Set(country_id),
    })
    .on_conflict(
        OnConflict::columns([banks::Column::Name, banks::Column::CountryId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await?;

    let bank = banks::Entity::find()
        .filter(banks::Column::Name.eq(name))
        .filter(banks::Column::CountryId.eq(country_id))
        .lock_shared()
        .one(txn)
        .await?;

    Ok(bank.map(|b| b.id))
}

fn store_error(err: DbErr) -> StoreError {
    StoreError::new(err.to_string())
}
