use super::{load_settings_from, prepare_database_url, Settings};

use std::{collections::HashMap, fs, path::Path};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn creates_parent_dir_for_relative_sqlite_url() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("test.db");

    prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(temp_root.path().join("data").exists());
}

#[test]
fn missing_config_file_yields_defaults() {
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_are_overridden_by_environment() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let path = temp_root.path().join("server.toml");
    fs::write(
        &path,
        "bind_addr = \"0.0.0.0:9000\"\ndatabase_url = \"sqlite://./file.db\"\nseed_on_start = true\n",
    )
    .expect("write config");

    let from_file = load_settings_from(&path, env_from(&[]));
    assert_eq!(from_file.server_bind, "0.0.0.0:9000");
    assert_eq!(from_file.database_url, "sqlite://./file.db");
    assert!(from_file.seed_on_start);

    let overridden = load_settings_from(
        &path,
        env_from(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("APP__SEED_ON_START", "off"),
            ("APP__MAX_BODY_BYTES", "1024"),
        ]),
    );
    assert_eq!(overridden.server_bind, "127.0.0.1:2");
    assert_eq!(overridden.database_url, "sqlite::memory:");
    assert!(!overridden.seed_on_start);
    assert_eq!(overridden.max_body_bytes, 1024);
}

#[test]
fn malformed_config_file_is_ignored() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let path = temp_root.path().join("server.toml");
    fs::write(&path, "bind_addr = [").expect("write config");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[tokio::test]
async fn prepared_database_url_creates_openable_sqlite_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("server.db");

    let prepared = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    let storage = storage::Storage::new(&prepared).await.expect("open sqlite");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );
}
