//! 状態の唯一の持ち主
//!
//! すべての変更は [`Session::dispatch`] を通る。遷移を適用した後に明示的に保存し、
//! 保存に失敗してもメモリ上の状態は有効なまま残る。
//!
//! 同じ保存先を複数プロセスで共有した場合は最後に書いた側が勝つ（排他制御なし）。

use crate::error::{Result, WasteLedgerError};
use crate::store::{self, KeyValueStore};
use waste_ledger_common::{Event, FeedbackCounts, Ledger, RecyclingState, ScanRecord};

pub struct Session<S: KeyValueStore> {
    state: RecyclingState,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// 保存済みの状態を読み込んで開始
    pub fn open(store: S) -> Self {
        let state = store::load(&store);
        Self { state, store }
    }

    /// 遷移を適用して保存する
    ///
    /// `Err` は保存失敗のみ。その場合も遷移は適用済み。
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        self.state.apply_in_place(event);
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        store::save(&mut self.store, &self.state).map_err(|e| match e {
            WasteLedgerError::Persist(_) => e,
            other => WasteLedgerError::Persist(other.to_string()),
        })
    }

    pub fn append(&mut self, record: ScanRecord) -> Result<()> {
        self.dispatch(Event::Append(record))
    }

    /// `weight_kg` は検証済みの正の値であること
    pub fn update_weight(&mut self, id: &str, weight_kg: f64) -> Result<()> {
        self.dispatch(Event::UpdateWeight {
            id: id.to_string(),
            weight_kg,
        })
    }

    pub fn record_correct(&mut self) -> Result<()> {
        self.dispatch(Event::RecordCorrect)
    }

    pub fn record_incorrect(&mut self) -> Result<()> {
        self.dispatch(Event::RecordIncorrect)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.dispatch(Event::Clear)
    }

    pub fn set_active(&mut self, record: Option<ScanRecord>) -> Result<()> {
        self.dispatch(Event::SetActive(record))
    }

    /// 新しい分類を始める前に表示中アイテムを外す
    pub fn begin_classification(&mut self) -> Result<()> {
        self.set_active(None)
    }

    /// 詳細表示を閉じる
    pub fn reset_view(&mut self) -> Result<()> {
        self.set_active(None)
    }

    /// 履歴の記録を表示中にする（選択時点のコピー）
    ///
    /// 履歴にないIDなら何もせず `Ok(None)`。
    pub fn select(&mut self, id: &str) -> Result<Option<ScanRecord>> {
        let Some(record) = self.state.find(id).cloned() else {
            return Ok(None);
        };
        self.set_active(Some(record.clone()))?;
        Ok(Some(record))
    }

    pub fn state(&self) -> &RecyclingState {
        &self.state
    }

    pub fn history(&self) -> &Ledger {
        self.state.history()
    }

    pub fn find(&self, id: &str) -> Option<&ScanRecord> {
        self.state.find(id)
    }

    pub fn items_sorted(&self) -> u64 {
        self.state.items_sorted()
    }

    pub fn waste_diverted_kg(&self) -> f64 {
        self.state.waste_diverted_kg()
    }

    pub fn feedback(&self) -> FeedbackCounts {
        self.state.feedback()
    }

    pub fn accuracy(&self) -> f64 {
        self.state.accuracy()
    }

    pub fn active_item(&self) -> Option<&ScanRecord> {
        self.state.active_item()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
