use super::Store;
use crate::import::import_file;
use chrono::{Duration, TimeZone, Utc};
use nostra_core::config::StoreConfig;
use nostra_core::contact::{Contact, ContactFilter, FilterColumn};
use nostra_core::error::NostraError;
use nostra_core::history::{SendOutcome, SendRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::io::Write;
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

fn contact(company: &str, city: &str, commune: &str, giro: &str, phone: &str) -> Contact {
    Contact {
        company_name: company.into(),
        city: city.into(),
        commune: commune.into(),
        business_type: giro.into(),
        phone: phone.into(),
        ..Default::default()
    }
}

fn sample() -> Vec<Contact> {
    vec![
        contact("Acme", "Temuco", "Temuco", "Ferretería", "912345678"),
        contact("Beta", "Santiago", "Ñuñoa", "Panadería", "56987654321"),
        contact("Gamma", "santiago", "Providencia", "Ferretería", "12345"),
        contact("Delta", "", "", "", "911111111"),
    ]
}

#[tokio::test]
async fn test_replace_contacts_is_wholesale() {
    let store = test_store().await;
    assert_eq!(store.replace_contacts(&sample()).await.unwrap(), 4);
    assert_eq!(store.contact_count().await.unwrap(), 4);

    let second = vec![contact("Omega", "Arica", "Arica", "Minería", "999999999")];
    store.replace_contacts(&second).await.unwrap();
    let all = store.all_contacts().await.unwrap();
    assert_eq!(all, second);
}

#[tokio::test]
async fn test_all_contacts_keeps_import_order() {
    let store = test_store().await;
    store.replace_contacts(&sample()).await.unwrap();
    let names: Vec<String> = store
        .all_contacts()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.company_name)
        .collect();
    assert_eq!(names, vec!["Acme", "Beta", "Gamma", "Delta"]);
}

#[tokio::test]
async fn test_filtered_contacts() {
    let store = test_store().await;
    store.replace_contacts(&sample()).await.unwrap();

    let by_city = ContactFilter {
        city: Some("Santiago".into()),
        ..Default::default()
    };
    let got = store.filtered_contacts(&by_city).await.unwrap();
    assert_eq!(got.len(), 2);
    assert_eq!(got[0].company_name, "Beta");
    assert_eq!(got[1].company_name, "Gamma");

    let by_commune = ContactFilter {
        commune: Some("ÑUÑOA".into()),
        ..Default::default()
    };
    let got = store.filtered_contacts(&by_commune).await.unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].company_name, "Beta");

    let combined = ContactFilter {
        city: Some("santiago".into()),
        business_type: Some("ferretería".into()),
        ..Default::default()
    };
    let got = store.filtered_contacts(&combined).await.unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].company_name, "Gamma");

    let none = store
        .filtered_contacts(&ContactFilter::default())
        .await
        .unwrap();
    assert_eq!(none.len(), 4);
}

#[tokio::test]
async fn test_distinct_values() {
    let store = test_store().await;
    store.replace_contacts(&sample()).await.unwrap();

    assert_eq!(
        store.distinct_values(FilterColumn::City).await.unwrap(),
        vec!["santiago", "temuco"]
    );
    assert_eq!(
        store
            .distinct_values(FilterColumn::BusinessType)
            .await
            .unwrap(),
        vec!["ferretería", "panadería"]
    );
    assert_eq!(
        store.distinct_values(FilterColumn::Commune).await.unwrap().len(),
        3
    );
}

#[tokio::test]
async fn test_record_and_successful_phones() {
    let store = test_store().await;
    store
        .record_send(&SendRecord::now("Acme", "+56912345678", "Temuco", SendOutcome::Success))
        .await
        .unwrap();
    store
        .record_send(&SendRecord::now("Acme", "+56912345678", "Temuco", SendOutcome::Success))
        .await
        .unwrap();
    store
        .record_send(&SendRecord::now("Beta", "+56987654321", "Santiago", SendOutcome::Error))
        .await
        .unwrap();
    store
        .record_send(&SendRecord::now("Gamma", "12345", "Santiago", SendOutcome::InvalidNumber))
        .await
        .unwrap();

    let sent = store.successful_phones().await.unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent.contains("+56912345678"));
}

#[tokio::test]
async fn test_recent_history_newest_first_with_limit() {
    let store = test_store().await;
    let base = Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap();
    for (i, name) in ["first", "second", "third"].iter().enumerate() {
        let mut rec = SendRecord::now(name, "+56911111111", "Arica", SendOutcome::Success);
        rec.timestamp = base + Duration::seconds(i as i64);
        store.record_send(&rec).await.unwrap();
    }

    let recent = store.recent_history(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].company_name, "third");
    assert_eq!(recent[1].company_name, "second");
    assert_eq!(recent[0].outcome, SendOutcome::Success);
    assert_eq!(recent[0].timestamp, base + Duration::seconds(2));
}

#[tokio::test]
async fn test_history_counts() {
    let store = test_store().await;
    for outcome in [
        SendOutcome::Success,
        SendOutcome::Success,
        SendOutcome::SkippedAlreadySent,
    ] {
        store
            .record_send(&SendRecord::now("x", "+56900000000", "", outcome))
            .await
            .unwrap();
    }
    let counts = store.history_counts().await.unwrap();
    assert_eq!(
        counts,
        vec![
            (SendOutcome::Success, 2),
            (SendOutcome::SkippedAlreadySent, 1)
        ]
    );
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(&store.pool).await.unwrap();
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(&store.pool)
        .await
        .unwrap();
    assert_eq!(n, 1);
}

#[tokio::test]
async fn test_on_disk_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested/nostra.db");
    let config = StoreConfig {
        db_path: db_path.to_string_lossy().to_string(),
        history_limit: 100,
    };
    let store = Store::new(&config).await.unwrap();
    store.replace_contacts(&sample()).await.unwrap();
    assert!(db_path.exists());
    assert!(store.db_size().await.unwrap() > 0);

    // Reopening sees the same data.
    let reopened = Store::new(&config).await.unwrap();
    assert_eq!(reopened.contact_count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_import_file_replaces_contacts() {
    let store = test_store().await;
    store.replace_contacts(&sample()).await.unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "Razón social,RUT,Giro,Dirección,Comuna,Ciudad,Nombre contacto,Teléfono\n\
         Acme,1-9,Ferretería,Calle 1,Temuco,Temuco,Ana,912345678\n"
    )
    .unwrap();

    let report = import_file(&store, file.path()).await.unwrap();
    assert_eq!(report.rows, 1);
    assert_eq!(store.contact_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_failed_import_keeps_existing_contacts() {
    let store = test_store().await;
    store.replace_contacts(&sample()).await.unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Razón social,RUT\nAcme,1\n").unwrap();

    let err = import_file(&store, file.path()).await.unwrap_err();
    assert!(matches!(err, NostraError::ImportColumnsMissing(ref cols) if cols.len() == 6));
    assert_eq!(store.contact_count().await.unwrap(), 4);

    let missing = import_file(&store, std::path::Path::new("/nonexistent/__nostra__.csv")).await;
    assert!(matches!(missing, Err(NostraError::Io(_))));
}

#[tokio::test]
async fn test_import_workbook_and_semicolon_csv() {
    let store = test_store().await;

    let xlsx = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/contacts.xlsx");
    let report = import_file(&store, &xlsx).await.unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.skipped_blank, 1);
    let communes = store
        .distinct_values(FilterColumn::Commune)
        .await
        .unwrap();
    assert_eq!(communes, vec!["temuco", "ñuñoa"]);

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(
        file,
        "Razón social;RUT;Giro;Dirección;Comuna;Ciudad;Nombre contacto;Teléfono\n\
         Acme;1-9;Ferretería;Calle 1;Temuco;Temuco;Ana;912345678\n"
    )
    .unwrap();
    let report = import_file(&store, file.path()).await.unwrap();
    assert_eq!(report.rows, 1);
    assert_eq!(store.contact_count().await.unwrap(), 1);
}
