use thiserror::Error;

#[derive(Error, Debug)]
pub enum WasteLedgerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("分別ルールが見つかりません: {0}。`waste-ledger rules` で対応カテゴリを確認してください")]
    UnknownCategory(String),

    #[error("重量が不正です: {0}")]
    InvalidWeight(String),

    #[error("履歴に見つかりません: {0}")]
    RecordNotFound(String),

    #[error("保存に失敗しました（メモリ上の状態は有効です）: {0}")]
    Persist(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] waste_ledger_common::Error),
}

pub type Result<T> = std::result::Result<T, WasteLedgerError>;
