//! 永続化テスト
//!
//! スナップショットの保存・読み込みと、破損時の初期状態フォールバックを検証

use tempfile::tempdir;
use waste_ledger::store::{self, FileStore, KeyValueStore, MemoryStore, Snapshot, STORAGE_KEY};
use waste_ledger_common::{Event, RecyclingState, RuleCatalog, ScanRecord, StaticCatalog};

fn record(category: &str, ts: i64) -> ScanRecord {
    let rule = StaticCatalog::builtin()
        .lookup(category)
        .cloned()
        .expect("ルールが見つからない");
    ScanRecord::new(category, format!("data:image/png;base64,{}", ts), rule, ts)
}

fn sample_state() -> RecyclingState {
    RecyclingState::new()
        .apply(Event::Append(record("PET Bottle", 1)))
        .apply(Event::Append(record("Battery", 2)))
        .apply(Event::Append(record("Apple Core", 3)))
        .apply(Event::UpdateWeight {
            id: "PET Bottle-1".to_string(),
            weight_kg: 0.25,
        })
        .apply(Event::RecordCorrect)
        .apply(Event::RecordIncorrect)
        .apply(Event::RecordCorrect)
        .apply(Event::SetActive(Some(record("Battery", 2))))
}

/// 保存先が空
#[test]
fn test_load_empty_dir() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path());

    assert_eq!(store::load(&store), RecyclingState::default());
}

/// 保存と読み込み
#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::new(dir.path());
    let state = sample_state();

    store::save(&mut store, &state).expect("保存失敗");
    assert!(store.path_for(STORAGE_KEY).exists());

    let loaded = store::load(&store);
    assert_eq!(loaded, state);
    assert_eq!(loaded.waste_diverted_kg(), 0.35);
    assert_eq!(loaded.items_sorted(), 3);
    assert_eq!(loaded.active_item().map(|r| r.id()), Some("Battery-2"));
}

/// 初期状態の往復
#[test]
fn test_default_state_roundtrip() {
    let mut store = MemoryStore::new();
    store::save(&mut store, &RecyclingState::default()).expect("保存失敗");
    assert_eq!(store::load(&store), RecyclingState::default());
}

/// 上書き保存
#[test]
fn test_save_overwrites_previous_snapshot() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut store = FileStore::new(dir.path());

    store::save(&mut store, &sample_state()).expect("保存失敗");
    let cleared = sample_state().apply(Event::Clear);
    store::save(&mut store, &cleared).expect("保存失敗");

    assert_eq!(store::load(&store), RecyclingState::default());
    // 一時ファイルは残らない
    let files: Vec<_> = std::fs::read_dir(dir.path())
        .expect("ディレクトリを読めない")
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(files.len(), 1);
}

/// 破損したJSON
#[test]
fn test_corrupted_document_falls_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path());
    std::fs::write(store.path_for(STORAGE_KEY), "{ invalid json }").unwrap();

    assert_eq!(store::load(&store), RecyclingState::default());
}

/// バージョン不一致
#[test]
fn test_version_mismatch_falls_back() {
    let mut store = MemoryStore::new();
    let mut document = serde_json::to_value(Snapshot::new(sample_state())).unwrap();
    document["version"] = serde_json::json!(Snapshot::CURRENT_VERSION + 1);
    store.set(STORAGE_KEY, &document.to_string()).unwrap();

    assert_eq!(store::load(&store), RecyclingState::default());
}

/// フィールドの型・欠落が不正な場合は部分的に採用しない
#[test]
fn test_shape_mismatch_falls_back() {
    let cases = [
        // カウンタが負数
        r#"{"version":1,"state":{"history":[],"itemsSorted":-1,"wasteDivertedKg":0,"feedback":{"correct":0,"incorrect":0},"activeItem":null}}"#,
        // feedback が欠落
        r#"{"version":1,"state":{"history":[],"itemsSorted":3,"wasteDivertedKg":0,"activeItem":null}}"#,
        // history が配列ではない
        r#"{"version":1,"state":{"history":{},"itemsSorted":0,"wasteDivertedKg":0,"feedback":{"correct":0,"incorrect":0},"activeItem":null}}"#,
        // 処分方法が不明
        r#"{"version":1,"state":{"history":[{"id":"X-1","category":"X","imageRef":"i","rule":{"action":"Burn","preparation":"","notes":"","source":""},"timestamp":1}],"itemsSorted":1,"wasteDivertedKg":0,"feedback":{"correct":0,"incorrect":0},"activeItem":null}}"#,
        // state ではなく配列
        r#"[1, 2, 3]"#,
    ];

    for case in cases {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, case).unwrap();
        assert_eq!(
            store::load(&store),
            RecyclingState::default(),
            "採用されてしまった: {}",
            case
        );
    }
}

/// 累計件数が履歴件数を下回る状態は採用しない
#[test]
fn test_items_sorted_below_history_len_falls_back() {
    let state = RecyclingState::new()
        .apply(Event::Append(record("PET Bottle", 1)))
        .apply(Event::Append(record("Glass Bottle", 2)));
    let mut document = serde_json::to_value(Snapshot::new(state)).unwrap();
    document["state"]["itemsSorted"] = serde_json::json!(1);

    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, &document.to_string()).unwrap();
    assert_eq!(store::load(&store), RecyclingState::default());
}

/// 上限を超える履歴は不正として扱う
#[test]
fn test_oversized_history_falls_back() {
    let records: Vec<_> = (0..51).map(|ts| record("PET Bottle", ts)).collect();
    let document = serde_json::json!({
        "version": 1,
        "state": {
            "history": records,
            "itemsSorted": 51,
            "wasteDivertedKg": 5.1,
            "feedback": { "correct": 0, "incorrect": 0 },
            "activeItem": null
        }
    });

    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, &document.to_string()).unwrap();
    assert_eq!(store::load(&store), RecyclingState::default());
}

/// 保存された派生値が履歴と食い違う場合は再計算される
#[test]
fn test_stale_derived_value_is_recomputed() {
    let state = RecyclingState::new().apply(Event::Append(record("PET Bottle", 1)));
    let mut document = serde_json::to_value(Snapshot::new(state)).unwrap();
    document["state"]["wasteDivertedKg"] = serde_json::json!(42.0);

    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, &document.to_string()).unwrap();

    let loaded = store::load(&store);
    assert_eq!(loaded.items_sorted(), 1);
    assert_eq!(loaded.waste_diverted_kg(), 0.10);
}
