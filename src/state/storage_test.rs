use super::*;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("jobportal-storage-{}", uuid::Uuid::new_v4()))
        .join("auth-storage.json")
}

fn sample() -> PersistedSession {
    PersistedSession::new(PersistedState {
        token: Some("tok".to_owned()),
        refresh_token: Some("ref".to_owned()),
        is_logged_in: true,
        user: Some(PersistedUser {
            id: "1".to_owned(),
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            roles: vec![Role::JobSeeker],
        }),
        roles: vec![Role::JobSeeker],
    })
}

#[test]
fn memory_storage_starts_empty() {
    assert!(MemoryStorage::new().load().unwrap().is_none());
}

#[test]
fn memory_storage_keeps_last_save() {
    let storage = MemoryStorage::new();
    storage.save(&sample()).unwrap();
    assert_eq!(storage.load().unwrap(), Some(sample()));
}

#[test]
fn file_storage_missing_file_is_none() {
    let storage = FileStorage::new(temp_path());
    assert!(storage.load().unwrap().is_none());
}

#[test]
fn file_storage_creates_parent_and_reloads() {
    let path = temp_path();
    let storage = FileStorage::new(&path);
    storage.save(&sample()).unwrap();
    assert!(path.exists());
    assert_eq!(storage.load().unwrap(), Some(sample()));
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_storage_writes_camel_case_envelope() {
    let path = temp_path();
    FileStorage::new(&path).save(&sample()).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["version"], 0);
    assert_eq!(raw["state"]["refreshToken"], "ref");
    assert_eq!(raw["state"]["isLoggedIn"], true);
    assert_eq!(raw["state"]["user"]["roles"][0], "ROLE_JOB_SEEKER");
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_storage_rejects_garbage() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(FileStorage::new(&path).load(), Err(StorageError::Json(_))));
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_storage_blank_file_is_none() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "  \n").unwrap();
    assert!(FileStorage::new(&path).load().unwrap().is_none());
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
