use super::*;
use tempfile::TempDir;

#[test]
fn seed_writes_all_topic_files() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let provider = DataProvider::new(temp_dir.path().to_path_buf());

    provider.seed().expect("seed should succeed");

    for topic in TOPICS {
        assert!(
            temp_dir.path().join(format!("{}.json", topic)).exists(),
            "missing seeded file for topic '{}'",
            topic
        );
    }
}

#[test]
fn seed_does_not_overwrite_existing_files() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let provider = DataProvider::new(temp_dir.path().to_path_buf());

    let custom = r#"{"note": "operator-edited"}"#;
    std::fs::write(temp_dir.path().join("fees.json"), custom).expect("write should succeed");

    provider.seed().expect("seed should succeed");

    let record = provider
        .load_topic("fees")
        .expect("load should succeed")
        .expect("fees record should exist");
    assert_eq!(record["note"], "operator-edited");
}

#[test]
fn load_all_skips_missing_topics() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let provider = DataProvider::new(temp_dir.path().to_path_buf());

    std::fs::write(
        temp_dir.path().join("hostels.json"),
        serde_json::to_string(&builtin_record("hostels")).expect("serialize"),
    )
    .expect("write should succeed");

    let records = provider.load_all();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0, "hostels");
}

#[test]
fn load_missing_topic_is_none() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let provider = DataProvider::new(temp_dir.path().to_path_buf());

    assert!(
        provider
            .load_topic("courses")
            .expect("load should succeed")
            .is_none()
    );
}

#[test]
fn builtin_records_are_nonempty_for_known_topics() {
    for topic in TOPICS {
        let record = builtin_record(topic);
        let map = record.as_object().expect("record should be a mapping");
        assert!(!map.is_empty(), "built-in record '{}' is empty", topic);
    }

    assert!(
        builtin_record("unknown")
            .as_object()
            .expect("mapping")
            .is_empty()
    );
}
