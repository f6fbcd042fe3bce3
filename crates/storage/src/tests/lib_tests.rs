use super::*;

fn account() -> AccountAddress {
    AccountAddress::new("0x0127fd5f1fe78a71f8bcd1fec63e3fe2f0486b6ecd5c86a0466c3a21fa5cfcec")
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn missing_game_id_loads_as_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let loaded = storage.load_game_id(&account()).await.expect("load");
    assert_eq!(loaded, None);
}

#[tokio::test]
async fn saves_game_id_under_account_key() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .save_game_id(&account(), GameId(17))
        .await
        .expect("save");

    let raw = storage
        .get_value(&game_id_key(&account()))
        .await
        .expect("raw");
    assert_eq!(raw.as_deref(), Some("17"));
    assert_eq!(
        storage.load_game_id(&account()).await.expect("load"),
        Some(GameId(17))
    );
}

#[tokio::test]
async fn later_save_overwrites_previous_game_id() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.save_game_id(&account(), GameId(1)).await.expect("first");
    storage.save_game_id(&account(), GameId(2)).await.expect("second");
    assert_eq!(
        storage.load_game_id(&account()).await.expect("load"),
        Some(GameId(2))
    );
}

#[tokio::test]
async fn corrupt_value_is_reported() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .set_value(&game_id_key(&account()), "not-a-number")
        .await
        .expect("write");
    let err = storage
        .load_game_id(&account())
        .await
        .expect_err("corrupt value");
    assert!(err.to_string().contains("is not a game id"));
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("hexgrid_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("client.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage.save_game_id(&account(), GameId(9)).await.expect("save");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.load_game_id(&account()).await.expect("load"),
        Some(GameId(9))
    );
    drop(reopened);

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn memory_store_round_trips_per_account() {
    let store = MemoryGameIdStore::new();
    let other = AccountAddress::new("0xbeef");
    store.save_game_id(&account(), GameId(3)).await.expect("save");

    assert_eq!(store.load_game_id(&account()).await.expect("load"), Some(GameId(3)));
    assert_eq!(store.load_game_id(&other).await.expect("load"), None);
    assert_eq!(
        store.raw_value(&format!("untitled_game_id_{}", account())),
        Some("3".to_string())
    );
}
