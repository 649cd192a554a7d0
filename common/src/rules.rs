//! 分別ルールカタログ
//!
//! カテゴリ名 → 処分ルールの静的な対応表。
//! カタログは外部から与えられる前提で、コアは参照のみ行う。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 処分方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisposalAction {
    Recycle,
    Landfill,
    Compost,
    #[serde(rename = "Special Drop-off")]
    SpecialDropOff,
}

impl DisposalAction {
    /// 埋立から転換された（リサイクル・堆肥化）とみなすか
    pub fn diverts_waste(&self) -> bool {
        matches!(self, DisposalAction::Recycle | DisposalAction::Compost)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisposalAction::Recycle => "Recycle",
            DisposalAction::Landfill => "Landfill",
            DisposalAction::Compost => "Compost",
            DisposalAction::SpecialDropOff => "Special Drop-off",
        }
    }
}

impl std::fmt::Display for DisposalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 1カテゴリ分の処分ルール
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub action: DisposalAction,
    pub preparation: String,
    pub notes: String,
    pub source: String,
}

/// ルール参照の窓口
pub trait RuleCatalog {
    fn lookup(&self, category: &str) -> Option<&Rule>;
}

/// カテゴリ名で引ける不変のルール表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    rules: BTreeMap<String, Rule>,
}

impl StaticCatalog {
    pub fn new(rules: BTreeMap<String, Rule>) -> Self {
        Self { rules }
    }

    /// 組み込みカタログ（SF Recycles準拠の5カテゴリ）
    pub fn builtin() -> Self {
        let entries = [
            (
                "PET Bottle",
                DisposalAction::Recycle,
                "Rinse the bottle and replace the cap. Labels can be left on.",
                "Only #1 and #2 plastics are widely accepted in curbside bins.",
                "https://sfrecycles.org/recycles/plastic-bottles-and-jugs",
            ),
            (
                "Glass Bottle",
                DisposalAction::Recycle,
                "Rinse the bottle. Metal caps can be recycled separately. Plastic caps go to landfill.",
                "Labels can be left on. Do not break the glass.",
                "https://sfrecycles.org/recycles/glass-bottles-and-jars/",
            ),
            (
                "Paper Cup",
                DisposalAction::Compost,
                "Empty any liquids. Plastic lids and straws go to landfill.",
                "Most paper cups have a plastic lining, making them non-recyclable. They can be composted.",
                "https://sfrecycles.org/recycles/coffee-cups",
            ),
            (
                "Battery",
                DisposalAction::SpecialDropOff,
                "Place clear tape over the terminals of each battery.",
                "Put batteries in a clear plastic bag and place it on top of your black landfill bin on collection day or find a designated drop-off location.",
                "https://sfrecycles.org/recycles/batteries",
            ),
            (
                "Apple Core",
                DisposalAction::Compost,
                "No preparation needed.",
                "All food scraps can be placed in the green compost bin.",
                "https://sfrecycles.org/recycles/food-scraps",
            ),
        ];

        let rules = entries
            .into_iter()
            .map(|(category, action, preparation, notes, source)| {
                (
                    category.to_string(),
                    Rule {
                        action,
                        preparation: preparation.to_string(),
                        notes: notes.to_string(),
                        source: source.to_string(),
                    },
                )
            })
            .collect();

        Self { rules }
    }

    /// JSON（`{ "カテゴリ": Rule, ... }`）から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: StaticCatalog = serde_json::from_str(json)?;
        if catalog.rules.is_empty() {
            return Err(Error::InvalidCatalog("ルールが1件もありません".into()));
        }
        if let Some(key) = catalog.rules.keys().find(|k| k.trim().is_empty()) {
            return Err(Error::InvalidCatalog(format!("空のカテゴリ名: {:?}", key)));
        }
        Ok(catalog)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleCatalog for StaticCatalog {
    fn lookup(&self, category: &str) -> Option<&Rule> {
        self.rules.get(category)
    }
}

/// カテゴリからルールを解決し、値としてコピーして返す
///
/// 見つからない場合は `None`。合成ルールは作らない。
pub fn resolve<C: RuleCatalog + ?Sized>(catalog: &C, category: &str) -> Option<Rule> {
    catalog.lookup(category).cloned()
}
