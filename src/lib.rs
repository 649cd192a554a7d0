//! 分別スキャン履歴の記録エンジン（CLI・永続化）
//!
//! 純粋な状態遷移は `waste-ledger-common`、ここでは保存先と入出力を扱う。

pub mod cli;
pub mod config;
pub mod error;
pub mod image_ref;
pub mod session;
pub mod store;

pub use session::Session;
pub use store::{FileStore, KeyValueStore, MemoryStore};
