//! Persistence tests for the on-disk storage adapters.
//!
//! Each test opens a medium in a temporary directory, writes through the
//! stores, drops everything, and reopens the same file as a page reload would.

use chatboard_core::ports::{KeyValueStorage, PortError, CHAT_MESSAGES_KEY, CURRENT_USER_KEY};
use chatboard_core::{Gender, RegistrationForm, SystemClock};
use chatboard_lib::adapters::{JsonFileStorage, SqliteStorage};
use chatboard_lib::state::AppState;
use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;

fn form() -> RegistrationForm {
    RegistrationForm {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        gender: Some(Gender::Female),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15),
        password: "hunter22".into(),
    }
}

async fn exercise_reload(
    first: Arc<dyn KeyValueStorage>,
    reopen: impl std::future::Future<Output = Arc<dyn KeyValueStorage>>,
) {
    let state = AppState::new(first, Arc::new(SystemClock));
    let jane = state.users.register(&form()).await.unwrap();
    state.messages.append(&jane, "First").await.unwrap();
    state.messages.append(&jane, "Second").await.unwrap();
    drop(state);

    let state = AppState::new(reopen.await, Arc::new(SystemClock));
    assert_eq!(state.users.current_session().await.unwrap(), Some(jane.clone()));
    assert_eq!(state.users.users().await.unwrap(), vec![jane.clone()]);

    let history = state.messages.load_all().await.unwrap();
    let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["First", "Second"]);
    assert!(history.iter().all(|m| m.author_id == jane.id));

    state.users.logout().await.unwrap();
    assert!(!state.gate.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn json_file_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile").join("chatboard.json");

    let first = Arc::new(JsonFileStorage::open(&path).await.unwrap());
    let reopen_path = path.clone();
    exercise_reload(first, async move {
        Arc::new(JsonFileStorage::open(&reopen_path).await.unwrap()) as Arc<dyn KeyValueStorage>
    })
    .await;

    // The file holds one entry per key, each value a JSON document of its own.
    let raw = std::fs::read_to_string(&path).unwrap();
    let items: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw).unwrap();
    let messages: serde_json::Value =
        serde_json::from_str(items[CHAT_MESSAGES_KEY].as_str().unwrap()).unwrap();
    assert_eq!(messages[0]["text"], "First");
    assert!(messages[0].get("userName").is_some());
    assert!(!items.contains_key(CURRENT_USER_KEY));
}

#[tokio::test]
async fn sqlite_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chatboard.db");

    let first = Arc::new(SqliteStorage::connect(&path).await.unwrap());
    let reopen_path = path.clone();
    exercise_reload(first, async move {
        Arc::new(SqliteStorage::connect(&reopen_path).await.unwrap()) as Arc<dyn KeyValueStorage>
    })
    .await;
}

#[tokio::test]
async fn json_file_key_operations() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::open(dir.path().join("kv.json")).await.unwrap();

    assert_eq!(storage.get_item("missing").await.unwrap(), None);
    storage.set_item("a", "1").await.unwrap();
    storage.set_item("a", "2").await.unwrap();
    storage.set_item("b", "3").await.unwrap();
    assert_eq!(storage.get_item("a").await.unwrap().as_deref(), Some("2"));

    storage.remove_item("a").await.unwrap();
    storage.remove_item("a").await.unwrap();
    assert_eq!(storage.get_item("a").await.unwrap(), None);

    storage.clear().await.unwrap();
    assert_eq!(storage.get_item("b").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_key_operations() {
    let dir = TempDir::new().unwrap();
    let storage = SqliteStorage::connect(dir.path().join("kv.db")).await.unwrap();

    storage.set_item("a", "1").await.unwrap();
    storage.set_item("a", "2").await.unwrap();
    assert_eq!(storage.get_item("a").await.unwrap().as_deref(), Some("2"));

    storage.remove_item("a").await.unwrap();
    assert_eq!(storage.get_item("a").await.unwrap(), None);

    storage.set_item("b", "3").await.unwrap();
    storage.clear().await.unwrap();
    assert_eq!(storage.get_item("b").await.unwrap(), None);
}

#[tokio::test]
async fn corrupted_json_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let storage = JsonFileStorage::open(&path).await.unwrap();
    let err = storage.get_item("users").await.unwrap_err();
    assert!(matches!(err, PortError::Corrupted { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn json_file_handles_sharing_a_path_keep_each_others_writes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shared.json");
    let a = Arc::new(JsonFileStorage::open(&path).await.unwrap());
    let b = Arc::new(JsonFileStorage::open(&path).await.unwrap());
    let bulk = "x".repeat(256 * 1024);

    for round in 0..20 {
        let users = format!("{round}{bulk}");
        let messages = format!("{bulk}{round}");
        let (left, right) = tokio::join!(
            tokio::spawn({
                let (a, users) = (a.clone(), users.clone());
                async move { a.set_item("users", &users).await }
            }),
            tokio::spawn({
                let (b, messages) = (b.clone(), messages.clone());
                async move { b.set_item(CHAT_MESSAGES_KEY, &messages).await }
            }),
        );
        left.unwrap().unwrap();
        right.unwrap().unwrap();

        assert_eq!(a.get_item("users").await.unwrap(), Some(users), "round {round}");
        assert_eq!(
            b.get_item(CHAT_MESSAGES_KEY).await.unwrap(),
            Some(messages),
            "round {round}"
        );

        a.clear().await.unwrap();
    }

    // Only the profile and its lock file remain; no temp files are left behind.
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["shared.json", "shared.json.lock"]);
}
