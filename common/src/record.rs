//! スキャン記録の型定義
//!
//! - Classification: 外部の画像分類サービスの応答
//! - ScanRecord: 履歴に積まれる1件分の分類結果（ルールは値として複製して保持）

use crate::rules::{resolve, Rule, RuleCatalog};
use serde::{Deserialize, Serialize};

/// 画像分類サービスの応答
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// 判定されたカテゴリ名
    pub item: String,

    /// 再利用・DIYのアイデア（履歴には保存しない）
    #[serde(default)]
    pub diy_ideas: Vec<String>,
}

/// 分類済みアイテム1件
///
/// 作成後に変更できるのは `weight_kg` のみ。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    id: String,
    category: String,
    image_ref: String,
    rule: Rule,
    /// 作成時刻（Unixミリ秒）
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight_kg: Option<f64>,
}

impl ScanRecord {
    /// 新規記録を作成。IDは `カテゴリ-タイムスタンプ`
    pub fn new(category: impl Into<String>, image_ref: impl Into<String>, rule: Rule, timestamp: i64) -> Self {
        let category = category.into();
        Self {
            id: format!("{}-{}", category, timestamp),
            category,
            image_ref: image_ref.into(),
            rule,
            timestamp,
            weight_kg: None,
        }
    }

    /// 分類結果から記録を作成
    ///
    /// カタログにないカテゴリは `None`（記録を作らない）。
    pub fn from_classification<C: RuleCatalog + ?Sized>(
        classification: &Classification,
        image_ref: impl Into<String>,
        catalog: &C,
        timestamp: i64,
    ) -> Option<Self> {
        let rule = resolve(catalog, &classification.item)?;
        Some(Self::new(classification.item.clone(), image_ref, rule, timestamp))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }

    pub(crate) fn set_weight_kg(&mut self, weight_kg: f64) {
        self.weight_kg = Some(weight_kg);
    }

    /// 重量を指定した複製（テスト・取込用）
    pub fn with_weight_kg(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }
}
