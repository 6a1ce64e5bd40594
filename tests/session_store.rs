//! Sea-ORM session store behavior against an in-memory database.

mod common;

use std::collections::HashMap;

use guestbook::entity::session;
use guestbook::session_store::SeaOrmStore;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use time::{Duration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::{ExpiredDeletion, SessionStore};

use common::memory_db;

fn record_in(expiry: Duration) -> Record {
    Record {
        id: Id::default(),
        data: HashMap::from([("user".to_string(), json!("u1"))]),
        expiry_date: OffsetDateTime::now_utc() + expiry,
    }
}

#[tokio::test]
async fn create_then_load_round_trips() {
    let db = memory_db().await;
    let store = SeaOrmStore::new(db);

    let mut record = record_in(Duration::days(1));
    store.create(&mut record).await.unwrap();

    let loaded = store.load(&record.id).await.unwrap().expect("record present");
    assert_eq!(loaded.id, record.id);
    assert_eq!(loaded.data, record.data);
}

#[tokio::test]
async fn save_updates_an_existing_record() {
    let db = memory_db().await;
    let store = SeaOrmStore::new(db);

    let mut record = record_in(Duration::days(1));
    store.create(&mut record).await.unwrap();

    record
        .data
        .insert("country".to_string(), json!("NL"));
    store.save(&record).await.unwrap();

    let loaded = store.load(&record.id).await.unwrap().unwrap();
    assert_eq!(loaded.data.get("country"), Some(&json!("NL")));
}

#[tokio::test]
async fn save_inserts_when_the_record_is_missing() {
    let db = memory_db().await;
    let store = SeaOrmStore::new(db);

    let record = record_in(Duration::days(1));
    store.save(&record).await.unwrap();

    assert!(store.load(&record.id).await.unwrap().is_some());
}

#[tokio::test]
async fn expired_records_load_as_absent() {
    let db = memory_db().await;
    let store = SeaOrmStore::new(db);

    let mut record = record_in(Duration::days(1));
    store.create(&mut record).await.unwrap();

    record.expiry_date = OffsetDateTime::now_utc() - Duration::minutes(1);
    store.save(&record).await.unwrap();

    assert!(store.load(&record.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_the_record_and_tolerates_absence() {
    let db = memory_db().await;
    let store = SeaOrmStore::new(db);

    let mut record = record_in(Duration::days(1));
    store.create(&mut record).await.unwrap();

    store.delete(&record.id).await.unwrap();
    assert!(store.load(&record.id).await.unwrap().is_none());

    // Deleting again is not an error.
    store.delete(&record.id).await.unwrap();
}

#[tokio::test]
async fn delete_expired_purges_only_stale_rows() {
    let db = memory_db().await;
    let store = SeaOrmStore::new(db.clone());

    let mut live = record_in(Duration::days(1));
    store.create(&mut live).await.unwrap();

    let mut stale = record_in(Duration::days(1));
    store.create(&mut stale).await.unwrap();
    stale.expiry_date = OffsetDateTime::now_utc() - Duration::minutes(1);
    store.save(&stale).await.unwrap();

    store.delete_expired().await.unwrap();

    let remaining = session::Entity::find().count(&db).await.unwrap();
    assert_eq!(remaining, 1);
    assert!(store.load(&live.id).await.unwrap().is_some());
}
