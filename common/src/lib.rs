//! Waste Ledger Common Library
//!
//! 分別スキャン履歴・インパクト集計・フィードバック集計の純粋ロジック（IOなし）

pub mod error;
pub mod feedback;
pub mod impact;
pub mod ledger;
pub mod record;
pub mod rules;
pub mod state;
pub mod stats;

pub use error::{Error, Result};
pub use feedback::{parse_weight_grams, FeedbackCounts};
pub use impact::{compute_waste_diverted, round_kg, DEFAULT_ITEM_WEIGHT_KG};
pub use ledger::{Ledger, HISTORY_CAPACITY};
pub use record::{Classification, ScanRecord};
pub use rules::{resolve, DisposalAction, Rule, RuleCatalog, StaticCatalog};
pub use state::{Event, RecyclingState};
pub use stats::{landfill_count, monthly_breakdown, MonthlyTally, DEFAULT_MONTHS, MAX_MONTHS};
