//! スキャン履歴（新しい順・上限付き）

use crate::record::ScanRecord;
use serde::{Deserialize, Serialize};

/// 履歴の最大保持件数
pub const HISTORY_CAPACITY: usize = 50;

/// 新しい順に並んだスキャン記録の列
///
/// 常に `len() <= HISTORY_CAPACITY`。上限を超えた分は末尾（最古）から捨てる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScanRecord>", into = "Vec<ScanRecord>")]
pub struct Ledger {
    records: Vec<ScanRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 先頭に追加し、上限を超えた古い記録を返す
    pub fn push_front(&mut self, record: ScanRecord) -> Vec<ScanRecord> {
        self.records.insert(0, record);
        if self.records.len() > HISTORY_CAPACITY {
            self.records.split_off(HISTORY_CAPACITY)
        } else {
            Vec::new()
        }
    }

    /// 該当IDの重量だけを差し替える。見つからなければ何もしない
    pub fn update_weight(&mut self, id: &str, weight_kg: f64) -> bool {
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.set_weight_kg(weight_kg);
                true
            }
            None => false,
        }
    }

    pub fn find(&self, id: &str) -> Option<&ScanRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// 保存済みの記録列から復元。上限を超える列は受け付けない
impl TryFrom<Vec<ScanRecord>> for Ledger {
    type Error = String;

    fn try_from(records: Vec<ScanRecord>) -> std::result::Result<Self, Self::Error> {
        if records.len() > HISTORY_CAPACITY {
            return Err(format!(
                "history has {} entries (max {})",
                records.len(),
                HISTORY_CAPACITY
            ));
        }
        Ok(Self { records })
    }
}

impl From<Ledger> for Vec<ScanRecord> {
    fn from(ledger: Ledger) -> Self {
        ledger.records
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a ScanRecord;
    type IntoIter = std::slice::Iter<'a, ScanRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
