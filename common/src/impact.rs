//! 環境インパクト集計
//!
//! 転換量（kg）は履歴の現在内容から毎回再計算する派生値。
//! 差分更新はしない（容量50件なので全件走査で十分）。

use crate::record::ScanRecord;

/// 重量未入力時の1件あたりの推定重量（100g）
pub const DEFAULT_ITEM_WEIGHT_KG: f64 = 0.1;

/// 小数第2位に丸める（0.5は0から遠い方へ）
pub fn round_kg(kg: f64) -> f64 {
    (kg * 100.0).round() / 100.0
}

/// 記録1件分の転換量。リサイクル・堆肥化以外は0
pub fn diverted_kg(record: &ScanRecord) -> f64 {
    if record.rule().action.diverts_waste() {
        record.weight_kg().unwrap_or(DEFAULT_ITEM_WEIGHT_KG)
    } else {
        0.0
    }
}

/// 履歴全体の転換量（kg、小数第2位）
pub fn compute_waste_diverted<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a ScanRecord>,
{
    let total: f64 = records.into_iter().map(diverted_kg).sum();
    round_kg(total)
}
