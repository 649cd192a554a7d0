//! 状態スナップショットの永続化
//!
//! 状態全体を1つのキーにJSONで書き込む（書き込みは毎回全体を上書き）。
//! 読み込みに失敗した場合は空の初期状態に戻し、起動は止めない。

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use waste_ledger_common::RecyclingState;

/// スナップショットを書き込むキー
pub const STORAGE_KEY: &str = "recycling-wise-storage";

/// 文字列を格納するキーバリューストア
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// 保存ドキュメントの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// バージョン（互換性チェック用）
    pub version: u32,
    pub state: RecyclingState,
}

impl Snapshot {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(state: RecyclingState) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            state,
        }
    }
}

/// 状態全体を保存
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, state: &RecyclingState) -> Result<()> {
    let document = serde_json::to_string(&Snapshot::new(state.clone()))?;
    store.set(STORAGE_KEY, &document)?;
    debug!(bytes = document.len(), "snapshot saved");
    Ok(())
}

/// 保存済みの状態を読み込む。なし・破損・互換性なしは初期状態
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> RecyclingState {
    let document = match store.get(STORAGE_KEY) {
        Ok(Some(doc)) => doc,
        Ok(None) => return RecyclingState::default(),
        Err(e) => {
            warn!("スナップショットを読み込めません、初期状態で開始します: {}", e);
            return RecyclingState::default();
        }
    };

    let snapshot: Snapshot = match serde_json::from_str(&document) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("スナップショットが破損しています、初期状態で開始します: {}", e);
            return RecyclingState::default();
        }
    };

    if snapshot.version != Snapshot::CURRENT_VERSION {
        warn!(
            found = snapshot.version,
            expected = Snapshot::CURRENT_VERSION,
            "スナップショットのバージョン不一致、初期状態で開始します"
        );
        return RecyclingState::default();
    }

    let mut state = snapshot.state;
    if !state.is_consistent() {
        warn!(
            items_sorted = state.items_sorted(),
            history = state.history().len(),
            "累計件数が履歴件数より少ないため、初期状態で開始します"
        );
        return RecyclingState::default();
    }
    if state.rederive() {
        warn!("保存された転換量が履歴と一致しないため再計算しました");
    }
    state
}
