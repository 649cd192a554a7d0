//! ダッシュボード用の集計
//!
//! 履歴の現在内容から月別件数・埋立件数を求める（UTC基準）。

use crate::record::ScanRecord;
use crate::rules::DisposalAction;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

/// 月別集計のデフォルト対象月数
pub const DEFAULT_MONTHS: u32 = 6;

/// 月別集計の最大月数（これを超える指定は切り詰める）
pub const MAX_MONTHS: u32 = 120;

/// 1か月分の件数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTally {
    /// `yyyy-MM`
    pub month_key: String,
    pub recycled: u32,
    pub composted: u32,
}

/// 埋立・特別回収に回った件数
pub fn landfill_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a ScanRecord>,
{
    records
        .into_iter()
        .filter(|r| !r.rule().action.diverts_waste())
        .count()
}

fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// `now` を含む直近 `months` か月の月別件数（古い月から順、0件の月も含む）
///
/// `months` は `MAX_MONTHS` で頭打ち。
pub fn monthly_breakdown<'a, I>(records: I, now: DateTime<Utc>, months: u32) -> Vec<MonthlyTally>
where
    I: IntoIterator<Item = &'a ScanRecord>,
{
    // 月を通し番号（year * 12 + month0）で扱う
    let current = now.year() * 12 + now.month0() as i32;
    let span = i32::try_from(months.min(MAX_MONTHS)).unwrap_or(0);
    let Some(first) = current.checked_sub(span).and_then(|m| m.checked_add(1)) else {
        return Vec::new();
    };

    let mut tallies: Vec<MonthlyTally> = (first..=current)
        .map(|index| MonthlyTally {
            month_key: month_key(index.div_euclid(12), index.rem_euclid(12) as u32 + 1),
            recycled: 0,
            composted: 0,
        })
        .collect();

    for record in records {
        let Some(taken) = DateTime::<Utc>::from_timestamp_millis(record.timestamp()) else {
            continue;
        };
        let index = taken.year() * 12 + taken.month0() as i32;
        if index < first || index > current {
            continue;
        }

        let tally = &mut tallies[(index - first) as usize];
        match record.rule().action {
            DisposalAction::Recycle => tally.recycled += 1,
            DisposalAction::Compost => tally.composted += 1,
            _ => {}
        }
    }

    tallies
}
