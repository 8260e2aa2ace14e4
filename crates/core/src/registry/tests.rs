//! Registry facade tests against an in-memory store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use swiftreg_shared::RateLimitConfig;

use super::service::prepare_insert;
use super::*;
use crate::rate_limit::RateLimiter;
use crate::validation::{branch_prefix, is_headquarter_code};

/// Store keeping records in a map and counting every call.
#[derive(Default)]
struct MemoryStore {
    records: Mutex<BTreeMap<String, NewSwiftCode>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn view(record: &NewSwiftCode) -> SwiftCodeView {
        SwiftCodeView {
            address: record.address.clone(),
            bank_name: record.bank_name.clone(),
            country_iso2: record.country_iso2.clone(),
            country_name: record.country_name.clone(),
            is_headquarter: record.is_headquarter,
            swift_code: record.swift_code.clone(),
            branches: None,
        }
    }
}

impl RegistryStore for MemoryStore {
    async fn insert(&self, record: NewSwiftCode) -> Result<InsertOutcome, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.swift_code) {
            return Ok(InsertOutcome::Conflict);
        }
        records.insert(record.swift_code.clone(), record);
        Ok(InsertOutcome::Created)
    }

    async fn find_by_code(&self, swift_code: &str) -> Result<Option<SwiftCodeView>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        let Some(record) = records.get(swift_code) else {
            return Ok(None);
        };

        if !is_headquarter_code(swift_code) {
            return Ok((!record.is_headquarter).then(|| Self::view(record)));
        }

        let branches = records
            .values()
            .filter(|r| {
                !r.is_headquarter
                    && r.swift_code != swift_code
                    && branch_prefix(&r.swift_code) == branch_prefix(swift_code)
            })
            .map(|r| Self::view(r).details())
            .collect();

        Ok(Some(SwiftCodeView {
            branches: Some(branches),
            ..Self::view(record)
        }))
    }

    async fn find_by_country(
        &self,
        country_iso2: &str,
    ) -> Result<Option<CountrySwiftCodes>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().unwrap();
        let in_country: Vec<&NewSwiftCode> = records
            .values()
            .filter(|r| r.country_iso2 == country_iso2)
            .collect();

        Ok(in_country.first().map(|first| CountrySwiftCodes {
            country_iso2: country_iso2.to_string(),
            country_name: first.country_name.clone(),
            swift_codes: in_country.iter().map(|r| Self::view(r).details()).collect(),
        }))
    }

    async fn delete(&self, swift_code: &str) -> Result<DeleteOutcome, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let removed = self.records.lock().unwrap().remove(swift_code);
        Ok(if removed.is_some() {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        })
    }
}

/// Store whose backend is always unreachable.
struct DownStore;

impl RegistryStore for DownStore {
    async fn insert(&self, _record: NewSwiftCode) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::new("connection refused"))
    }

    async fn find_by_code(&self, _swift_code: &str) -> Result<Option<SwiftCodeView>, StoreError> {
        Err(StoreError::new("connection refused"))
    }

    async fn find_by_country(
        &self,
        _country_iso2: &str,
    ) -> Result<Option<CountrySwiftCodes>, StoreError> {
        Err(StoreError::new("connection refused"))
    }

    async fn delete(&self, _swift_code: &str) -> Result<DeleteOutcome, StoreError> {
        Err(StoreError::new("connection refused"))
    }
}

const CLIENT: &str = "192.168.1.10";

fn generous_limits() -> RateLimiter {
    RateLimiter::new(RateLimitConfig {
        burst: 1000,
        refill_per_second: 1000,
        idle_eviction_secs: 600,
    })
}

fn service() -> (RegistryService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (
        RegistryService::new(Arc::clone(&store), generous_limits()),
        store,
    )
}

fn input(code: &str, is_headquarter: bool) -> SwiftCodeInput {
    SwiftCodeInput {
        swift_code: Some(code.to_string()),
        bank_name: Some("Test Bank".to_string()),
        country_iso2: Some("pl".to_string()),
        country_name: Some("Poland".to_string()),
        address: Some("Ul. Prosta 1, Warszawa".to_string()),
        is_headquarter: Some(is_headquarter),
    }
}

#[test]
fn test_prepare_insert_normalizes() {
    let mut raw = input("  abcdefghxxx ", true);
    raw.bank_name = Some(" Test Bank ".to_string());

    let record = prepare_insert(raw).unwrap();

    assert_eq!(
        record,
        NewSwiftCode {
            swift_code: "ABCDEFGHXXX".to_string(),
            bank_name: "TEST BANK".to_string(),
            country_iso2: "PL".to_string(),
            country_name: "POLAND".to_string(),
            address: "UL. PROSTA 1, WARSZAWA".to_string(),
            is_headquarter: true,
        }
    );
}

#[test]
fn test_prepare_insert_reports_all_missing_fields() {
    let raw = SwiftCodeInput {
        swift_code: Some("ABCDEFGHXXX".to_string()),
        address: Some("   ".to_string()),
        ..SwiftCodeInput::default()
    };

    let err = prepare_insert(raw).unwrap_err();

    match err {
        RegistryError::MissingFields(fields) => assert_eq!(
            fields,
            vec![
                "bankName",
                "countryISO2",
                "countryName",
                "address",
                "isHeadquarter"
            ]
        ),
        other => panic!("expected MissingFields, got {other:?}"),
    }
}

#[test]
fn test_prepare_insert_rejects_suffix_mismatch() {
    for (code, flag) in [("ABCDEFGHXXX", false), ("ABCDEFGH001", true)] {
        let err = prepare_insert(input(code, flag)).unwrap_err();
        assert!(
            matches!(&err, RegistryError::ValidationFailed(f) if f == &["isHeadquarter"]),
            "unexpected error for {code}: {err:?}"
        );
    }
}

#[test]
fn test_prepare_insert_content_rules() {
    let mut raw = input("ABCDEFGH001", false);
    raw.bank_name = Some("Bank & Co".to_string());
    raw.address = Some("Street #1".to_string());

    let err = prepare_insert(raw).unwrap_err();

    assert!(matches!(err, RegistryError::ValidationFailed(f) if f == ["bankName", "address"]));
}

#[test]
fn test_prepare_insert_format_errors() {
    let err = prepare_insert(input("ABCDEFGH01", false)).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InvalidFormat {
            field: "swiftCode",
            ..
        }
    ));

    let mut raw = input("ABCDEFGH001", false);
    raw.country_iso2 = Some("POL".to_string());
    let err = prepare_insert(raw).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InvalidFormat {
            field: "countryISO2",
            ..
        }
    ));
}

#[tokio::test]
async fn test_insert_then_lookup_returns_normalized_record() {
    let (service, _) = service();

    service
        .insert(CLIENT, input("abcdefgh001", false))
        .await
        .unwrap();

    let view = service
        .lookup_by_code(CLIENT, "ABCDEFGH001")
        .await
        .unwrap()
        .expect("record should exist");

    assert_eq!(view.swift_code, "ABCDEFGH001");
    assert_eq!(view.bank_name, "TEST BANK");
    assert_eq!(view.country_iso2, "PL");
    assert_eq!(view.country_name, "POLAND");
    assert!(!view.is_headquarter);
    assert!(view.branches.is_none());
}

#[tokio::test]
async fn test_second_insert_conflicts_and_keeps_first() {
    let (service, _) = service();
    service
        .insert(CLIENT, input("ABCDEFGH001", false))
        .await
        .unwrap();

    let mut second = input("ABCDEFGH001", false);
    second.address = Some("Other Street 2".to_string());
    let err = service.insert(CLIENT, second).await.unwrap_err();
    assert!(matches!(err, RegistryError::Conflict(code) if code == "ABCDEFGH001"));

    let view = service
        .lookup_by_code(CLIENT, "ABCDEFGH001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.address, "UL. PROSTA 1, WARSZAWA");
}

#[tokio::test]
async fn test_delete_then_lookup_not_found() {
    let (service, _) = service();
    service
        .insert(CLIENT, input("ABCDEFGH001", false))
        .await
        .unwrap();

    assert_eq!(
        service.delete(CLIENT, "abcdefgh001").await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(
        service.delete(CLIENT, "ABCDEFGH001").await.unwrap(),
        DeleteOutcome::NotFound
    );
    assert!(
        service
            .lookup_by_code(CLIENT, "ABCDEFGH001")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_malformed_input_never_reaches_store() {
    let (service, store) = service();

    assert!(matches!(
        service.lookup_by_code(CLIENT, "short").await,
        Err(RegistryError::InvalidFormat { .. })
    ));
    assert!(matches!(
        service.insert(CLIENT, input("ABCDEFGH01", false)).await,
        Err(RegistryError::InvalidFormat { .. })
    ));
    assert!(matches!(
        service.delete(CLIENT, "toolong-code").await,
        Err(RegistryError::InvalidFormat { .. })
    ));
    assert!(matches!(
        service.lookup_by_country(CLIENT, "P1").await,
        Err(RegistryError::InvalidFormat { .. })
    ));

    assert_eq!(store.calls(), 0);
    assert_eq!(service.limiter().tracked_clients(), 0);
}

#[tokio::test]
async fn test_unknown_country_is_empty_listing() {
    let (service, _) = service();

    let listing = service.lookup_by_country(CLIENT, "de").await.unwrap();

    assert_eq!(listing, CountrySwiftCodes::empty("DE"));
}

#[tokio::test]
async fn test_country_listing() {
    let (service, _) = service();
    service
        .insert(CLIENT, input("ABCDEFGHXXX", true))
        .await
        .unwrap();
    service
        .insert(CLIENT, input("ABCDEFGH001", false))
        .await
        .unwrap();

    let listing = service.lookup_by_country(CLIENT, "PL").await.unwrap();

    assert_eq!(listing.country_name, "POLAND");
    assert_eq!(listing.swift_codes.len(), 2);
}

#[tokio::test]
async fn test_headquarter_lookup_includes_branches() {
    let (service, _) = service();
    service
        .insert(CLIENT, input("AAAABBCCXXX", true))
        .await
        .unwrap();
    service
        .insert(CLIENT, input("AAAABBCC001", false))
        .await
        .unwrap();

    let hq = service
        .lookup_by_code(CLIENT, "AAAABBCCXXX")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        hq.branches,
        Some(vec![SwiftCodeDetails {
            address: "UL. PROSTA 1, WARSZAWA".to_string(),
            bank_name: "TEST BANK".to_string(),
            country_iso2: "PL".to_string(),
            is_headquarter: false,
            swift_code: "AAAABBCC001".to_string(),
        }])
    );
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_calls_skip_store() {
    let store = Arc::new(MemoryStore::default());
    let service = RegistryService::new(
        Arc::clone(&store),
        RateLimiter::new(RateLimitConfig::default()),
    );

    for _ in 0..5 {
        service.lookup_by_code(CLIENT, "ABCDEFGH001").await.unwrap();
    }
    let err = service
        .insert(CLIENT, input("ABCDEFGH001", false))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::RateLimited(client) if client == CLIENT));
    assert_eq!(store.calls(), 5);

    // Another client is unaffected.
    service.lookup_by_code("10.0.0.1", "ABCDEFGH001").await.unwrap();
    assert_eq!(store.calls(), 6);

    tokio::time::advance(std::time::Duration::from_secs(1)).await;
    service
        .insert(CLIENT, input("ABCDEFGH001", false))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_store_failure_surfaces_as_store_error() {
    let service = RegistryService::new(Arc::new(DownStore), generous_limits());

    let err = service
        .lookup_by_code(CLIENT, "ABCDEFGH001")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Store(_)));

    let err = service
        .insert(CLIENT, input("ABCDEFGH001", false))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "store error: connection refused");

    assert!(matches!(
        service.delete(CLIENT, "ABCDEFGH001").await,
        Err(RegistryError::Store(_))
    ));
    assert!(matches!(
        service.lookup_by_country(CLIENT, "PL").await,
        Err(RegistryError::Store(_))
    ));
}

#[test]
fn test_wire_names() {
    let parsed: SwiftCodeInput = serde_json::from_str(
        r#"{"swiftCode":"ABCDEFGHXXX","bankName":"B","countryISO2":"PL","countryName":"P","address":"A","isHeadquarter":true}"#,
    )
    .unwrap();
    assert_eq!(parsed.country_iso2.as_deref(), Some("PL"));
    assert_eq!(parsed.is_headquarter, Some(true));

    let unknown = serde_json::from_str::<SwiftCodeInput>(r#"{"swiftCode":"X","extra":1}"#);
    assert!(unknown.is_err());

    let view = SwiftCodeView {
        address: "A".into(),
        bank_name: "B".into(),
        country_iso2: "PL".into(),
        country_name: "POLAND".into(),
        is_headquarter: false,
        swift_code: "ABCDEFGH001".into(),
        branches: None,
    };
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["countryISO2"], "PL");
    assert_eq!(json["isHeadquarter"], false);
    assert!(json.get("branches").is_none());
}
