//! 分類フィードバックの集計と正答率

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// ユーザーによる正誤判定の累計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackCounts {
    pub correct: u64,
    pub incorrect: u64,
}

impl FeedbackCounts {
    pub fn record_correct(&mut self) {
        self.correct += 1;
    }

    pub fn record_incorrect(&mut self) {
        self.incorrect += 1;
    }

    pub fn total(&self) -> u64 {
        self.correct + self.incorrect
    }

    /// 正答率（%）。フィードバックが0件なら100
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 100.0;
        }
        (self.correct as f64 / total as f64) * 100.0
    }
}

/// グラム単位の入力文字列をkgに変換
///
/// 数値でない・有限でない・0以下の値は `InvalidWeight`。
pub fn parse_weight_grams(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let grams: f64 = trimmed
        .parse()
        .map_err(|_| Error::InvalidWeight(format!("数値ではありません: {:?}", trimmed)))?;

    if !grams.is_finite() || grams <= 0.0 {
        return Err(Error::InvalidWeight(format!("正の数を指定してください: {}", trimmed)));
    }

    Ok(grams / 1000.0)
}
