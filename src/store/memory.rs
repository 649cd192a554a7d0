use super::KeyValueStore;
use crate::error::{Result, WasteLedgerError};
use std::collections::HashMap;

/// プロセス内のストア（埋め込み・テスト用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以降の書き込みを失敗させる
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(WasteLedgerError::Persist(format!("書き込みが無効です: {}", key)));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
