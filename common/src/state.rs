//! 記録エンジンの状態と遷移
//!
//! 状態は1つの値 [`RecyclingState`] にまとめ、[`Event`] を受けて次の状態を返す。
//! 永続化はここでは行わない（呼び出し側が遷移後に明示的に保存する）。

use crate::feedback::FeedbackCounts;
use crate::impact::compute_waste_diverted;
use crate::ledger::Ledger;
use crate::record::ScanRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 状態を変更する操作
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// 新しい分類結果を履歴に追加
    Append(ScanRecord),
    /// 重量（kg、検証済みの正の値）を設定
    UpdateWeight { id: String, weight_kg: f64 },
    RecordCorrect,
    RecordIncorrect,
    /// 履歴・カウンタ・フィードバック・表示中アイテムをまとめて初期化
    Clear,
    /// 詳細表示中のアイテムを差し替え
    SetActive(Option<ScanRecord>),
}

/// 永続化対象の全状態
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecyclingState {
    history: Ledger,
    /// 累計分類件数（履歴からの押し出しでは減らない）
    items_sorted: u64,
    /// 履歴から再計算される転換量（kg）
    waste_diverted_kg: f64,
    feedback: FeedbackCounts,
    active_item: Option<ScanRecord>,
}

impl RecyclingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 遷移関数: 現在の状態とイベントから次の状態を作る
    pub fn apply(&self, event: Event) -> Self {
        let mut next = self.clone();
        next.apply_in_place(event);
        next
    }

    /// `apply` のインプレース版
    pub fn apply_in_place(&mut self, event: Event) {
        match event {
            Event::Append(record) => self.append(record),
            Event::UpdateWeight { id, weight_kg } => self.update_weight(&id, weight_kg),
            Event::RecordCorrect => self.feedback.record_correct(),
            Event::RecordIncorrect => self.feedback.record_incorrect(),
            Event::Clear => self.clear(),
            Event::SetActive(record) => self.active_item = record,
        }
    }

    fn append(&mut self, record: ScanRecord) {
        debug!(id = record.id(), category = record.category(), "append to history");
        // 押し出しの前に加算する
        self.items_sorted += 1;
        let evicted = self.history.push_front(record);
        for old in &evicted {
            debug!(id = old.id(), "evicted from history");
        }
        self.recompute();
    }

    fn update_weight(&mut self, id: &str, weight_kg: f64) {
        debug_assert!(
            weight_kg.is_finite() && weight_kg > 0.0,
            "weight must be validated before update: {}",
            weight_kg
        );
        if self.history.update_weight(id, weight_kg) {
            debug!(id, weight_kg, "weight updated");
            self.recompute();
        } else {
            debug!(id, "weight update for unknown id ignored");
        }
    }

    fn clear(&mut self) {
        info!(
            entries = self.history.len(),
            items_sorted = self.items_sorted,
            "clearing history"
        );
        *self = Self::default();
    }

    fn recompute(&mut self) {
        self.waste_diverted_kg = compute_waste_diverted(&self.history);
    }

    /// 派生値を履歴から作り直す。食い違っていた場合は `true`
    pub fn rederive(&mut self) -> bool {
        let derived = compute_waste_diverted(&self.history);
        let changed = derived != self.waste_diverted_kg;
        self.waste_diverted_kg = derived;
        changed
    }

    /// 到達可能な状態か（累計件数は履歴件数を下回らない）
    pub fn is_consistent(&self) -> bool {
        self.items_sorted >= self.history.len() as u64
    }

    pub fn history(&self) -> &Ledger {
        &self.history
    }

    pub fn find(&self, id: &str) -> Option<&ScanRecord> {
        self.history.find(id)
    }

    pub fn items_sorted(&self) -> u64 {
        self.items_sorted
    }

    pub fn waste_diverted_kg(&self) -> f64 {
        self.waste_diverted_kg
    }

    pub fn feedback(&self) -> FeedbackCounts {
        self.feedback
    }

    pub fn accuracy(&self) -> f64 {
        self.feedback.accuracy()
    }

    pub fn active_item(&self) -> Option<&ScanRecord> {
        self.active_item.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::HISTORY_CAPACITY;
    use crate::rules::{DisposalAction, Rule, RuleCatalog, StaticCatalog};

    fn record(category: &str, ts: i64) -> ScanRecord {
        let rule = StaticCatalog::builtin().lookup(category).cloned().expect("ルールが見つからない");
        ScanRecord::new(category, format!("img-{}", ts), rule, ts)
    }

    #[test]
    fn test_initial_state() {
        let state = RecyclingState::new();
        assert!(state.history().is_empty());
        assert_eq!(state.items_sorted(), 0);
        assert_eq!(state.waste_diverted_kg(), 0.0);
        assert_eq!(state.accuracy(), 100.0);
        assert!(state.active_item().is_none());
    }

    #[test]
    fn test_apply_is_pure() {
        let state = RecyclingState::new();
        let next = state.apply(Event::Append(record("PET Bottle", 1)));

        assert_eq!(state.items_sorted(), 0);
        assert_eq!(next.items_sorted(), 1);
        assert_eq!(next.waste_diverted_kg(), 0.10);
    }

    #[test]
    fn test_append_51_evicts_first_and_counts_all() {
        let mut state = RecyclingState::new();
        for ts in 1..=51 {
            state.apply_in_place(Event::Append(record("PET Bottle", ts)));
            assert!(state.history().len() <= HISTORY_CAPACITY);
        }

        assert_eq!(state.history().len(), HISTORY_CAPACITY);
        assert_eq!(state.items_sorted(), 51);
        assert_eq!(state.history().as_slice()[0].id(), "PET Bottle-51");
        assert_eq!(state.history().as_slice()[49].id(), "PET Bottle-2");
        assert!(state.find("PET Bottle-1").is_none());
        // 転換量は残っている50件分のみ
        assert_eq!(state.waste_diverted_kg(), 5.0);
    }

    #[test]
    fn test_landfill_append_keeps_diverted() {
        let mut state = RecyclingState::new();
        state.apply_in_place(Event::Append(record("Apple Core", 1)));
        let before = state.waste_diverted_kg();

        state.apply_in_place(Event::Append(record("Battery", 2)));
        assert_eq!(state.waste_diverted_kg(), before);
        assert_eq!(state.items_sorted(), 2);
    }

    #[test]
    fn test_landfill_rule_append_keeps_diverted() {
        let landfill = Rule {
            action: DisposalAction::Landfill,
            preparation: "Bag it.".to_string(),
            notes: "Not recyclable.".to_string(),
            source: "https://example.org/landfill".to_string(),
        };

        let mut state = RecyclingState::new();
        state.apply_in_place(Event::Append(record("Glass Bottle", 1)));
        let diverted = state.waste_diverted_kg();
        let sorted = state.items_sorted();

        state.apply_in_place(Event::Append(ScanRecord::new("Chip Bag", "img", landfill, 2)));
        assert_eq!(state.waste_diverted_kg(), diverted);
        assert_eq!(state.items_sorted(), sorted + 1);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_update_weight_recomputes() {
        let mut state = RecyclingState::new();
        state.apply_in_place(Event::Append(record("PET Bottle", 1)));
        state.apply_in_place(Event::UpdateWeight {
            id: "PET Bottle-1".to_string(),
            weight_kg: 0.25,
        });

        assert_eq!(state.waste_diverted_kg(), 0.25);
        assert_eq!(state.find("PET Bottle-1").and_then(|r| r.weight_kg()), Some(0.25));
    }

    #[test]
    fn test_update_weight_stale_id_is_noop() {
        let mut state = RecyclingState::new();
        state.apply_in_place(Event::Append(record("PET Bottle", 1)));
        let before = state.clone();

        state.apply_in_place(Event::UpdateWeight {
            id: "PET Bottle-999".to_string(),
            weight_kg: 2.0,
        });
        assert_eq!(state, before);
    }

    #[test]
    fn test_feedback_events() {
        let state = RecyclingState::new()
            .apply(Event::RecordCorrect)
            .apply(Event::RecordIncorrect);

        assert_eq!(state.feedback(), FeedbackCounts { correct: 1, incorrect: 1 });
        assert_eq!(state.accuracy(), 50.0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut state = RecyclingState::new();
        let r = record("Glass Bottle", 1);
        state.apply_in_place(Event::Append(r.clone()));
        state.apply_in_place(Event::RecordCorrect);
        state.apply_in_place(Event::SetActive(Some(r)));

        state.apply_in_place(Event::Clear);
        assert_eq!(state, RecyclingState::default());
    }

    #[test]
    fn test_active_item_is_snapshot() {
        let mut state = RecyclingState::new();
        state.apply_in_place(Event::Append(record("PET Bottle", 1)));
        let selected = state.find("PET Bottle-1").cloned();
        state.apply_in_place(Event::SetActive(selected));

        state.apply_in_place(Event::UpdateWeight {
            id: "PET Bottle-1".to_string(),
            weight_kg: 0.3,
        });

        // 表示中アイテムは選択時点の値のまま
        assert_eq!(state.active_item().and_then(|r| r.weight_kg()), None);
        assert_eq!(state.find("PET Bottle-1").and_then(|r| r.weight_kg()), Some(0.3));
    }

    #[test]
    fn test_is_consistent() {
        let mut state = RecyclingState::new().apply(Event::Append(record("PET Bottle", 1)));
        assert!(state.is_consistent());
        assert!(state.apply(Event::Clear).is_consistent());

        state.items_sorted = 0;
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_rederive_fixes_stale_value() {
        let mut state = RecyclingState::new().apply(Event::Append(record("PET Bottle", 1)));
        assert!(!state.rederive());

        state.waste_diverted_kg = 9.99;
        assert!(state.rederive());
        assert_eq!(state.waste_diverted_kg(), 0.10);
    }

    #[test]
    fn test_serialize_keys() {
        let state = RecyclingState::new().apply(Event::Append(record("PET Bottle", 1)));
        let json = serde_json::to_value(&state).expect("シリアライズ失敗");

        assert!(json["history"].is_array());
        assert_eq!(json["itemsSorted"], 1);
        assert_eq!(json["wasteDivertedKg"], 0.1);
        assert_eq!(json["feedback"]["correct"], 0);
        assert!(json["activeItem"].is_null());
    }
}
