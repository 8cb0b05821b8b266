use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, EngineError, ExpenseId, Receipt, UserId};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn insert_receipt(
    db: &DatabaseConnection,
    expense_id: ExpenseId,
    filename: &str,
    mime_type: &str,
    bytes: Vec<u8>,
) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO receipts (expense_id, filename, mime_type, bytes) VALUES (?, ?, ?, ?)",
        vec![
            expense_id.get().into(),
            filename.into(),
            mime_type.into(),
            bytes.into(),
        ],
    ))
    .await
    .unwrap();
}

/// Two users, each with one expense carrying a receipt.
async fn seeded() -> (Engine, DatabaseConnection, UserId, ExpenseId, UserId, ExpenseId) {
    let (engine, db) = engine_with_db().await;
    let alice = engine.create_user("alice", "password").await.unwrap();
    let bob = engine.create_user("bob", "password").await.unwrap();

    let alice_expense = engine
        .record_expense(alice, 1250, Some("groceries"), None, chrono::Utc::now())
        .await
        .unwrap();
    let bob_expense = engine
        .record_expense(bob, 4000, Some("fuel"), None, chrono::Utc::now())
        .await
        .unwrap();

    insert_receipt(
        &db,
        alice_expense,
        "market.pdf",
        "application/pdf",
        b"%PDF-1.7 alice".to_vec(),
    )
    .await;
    insert_receipt(
        &db,
        bob_expense,
        "station.png",
        "image/png",
        vec![0x89, b'P', b'N', b'G', 0x00, 0xff],
    )
    .await;

    (engine, db, alice, alice_expense, bob, bob_expense)
}

#[tokio::test]
async fn owner_gets_the_stored_document() {
    let (engine, _db, alice, alice_expense, _, _) = seeded().await;

    let receipt = engine
        .receipt_by_expense(alice, alice_expense)
        .await
        .unwrap()
        .expect("receipt missing");

    assert_eq!(
        receipt,
        Receipt {
            filename: "market.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.7 alice".to_vec(),
        }
    );
}

#[tokio::test]
async fn binary_payload_is_returned_untouched() {
    let (engine, _db, _, _, bob, bob_expense) = seeded().await;

    let receipt = engine
        .receipt_by_expense(bob, bob_expense)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.mime_type, "image/png");
    assert_eq!(receipt.bytes, vec![0x89, b'P', b'N', b'G', 0x00, 0xff]);
}

#[tokio::test]
async fn repeated_lookups_are_identical() {
    let (engine, _db, alice, alice_expense, _, _) = seeded().await;

    let first = engine.receipt_by_expense(alice, alice_expense).await.unwrap();
    let second = engine.receipt_by_expense(alice, alice_expense).await.unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn other_users_expense_looks_absent() {
    let (engine, _db, alice, _, _, bob_expense) = seeded().await;

    let receipt = engine.receipt_by_expense(alice, bob_expense).await.unwrap();
    assert_eq!(receipt, None);

    let missing = engine
        .receipt_by_expense(alice, ExpenseId::new(9_999).unwrap())
        .await
        .unwrap();
    assert_eq!(missing, receipt);
}

#[tokio::test]
async fn expense_without_receipt_is_absent() {
    let (engine, _db, alice, _, _, _) = seeded().await;
    let bare = engine
        .record_expense(alice, 300, None, Some("coffee"), chrono::Utc::now())
        .await
        .unwrap();

    assert_eq!(engine.receipt_by_expense(alice, bare).await.unwrap(), None);
}

#[tokio::test]
async fn raw_ids_are_parsed_at_the_boundary() {
    let (engine, _db, alice, alice_expense, _, _) = seeded().await;

    let receipt = engine
        .receipt_by_expense_raw(&alice.to_string(), &format!(" {alice_expense} "))
        .await
        .unwrap();
    assert_eq!(receipt.map(|r| r.filename), Some("market.pdf".to_string()));

    let err = engine
        .receipt_by_expense_raw("alice", &alice_expense.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidIdentifier(_)));
    assert!(!err.is_retryable());

    let err = engine
        .receipt_by_expense_raw(&alice.to_string(), "NaN")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn store_failure_is_not_reported_as_absence() {
    let (engine, db, alice, alice_expense, _, _) = seeded().await;
    db.execute_unprepared("DROP TABLE receipts").await.unwrap();

    let err = engine
        .receipt_by_expense(alice, alice_expense)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert!(err.is_retryable());
}
