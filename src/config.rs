use crate::error::{Result, WasteLedgerError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use waste_ledger_common::StaticCatalog;

const STORE_DIR_ENV: &str = "WASTE_LEDGER_STORE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 状態スナップショットの保存先ディレクトリ
    pub store_dir: Option<PathBuf>,
    /// 外部ルールカタログ（JSON）
    pub rules_path: Option<PathBuf>,
    /// `history` で一度に表示する件数
    pub history_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            rules_path: None,
            history_page_size: 20,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| WasteLedgerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("waste-ledger").join("config.json"))
    }

    /// 保存先ディレクトリ（環境変数 > 設定ファイル > データディレクトリ）
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(STORE_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        if let Some(dir) = &self.store_dir {
            return Ok(dir.clone());
        }

        let data = dirs::data_dir()
            .ok_or_else(|| WasteLedgerError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("waste-ledger"))
    }

    /// ルールカタログを読み込む。未設定なら組み込みカタログ
    pub fn load_catalog(&self) -> Result<StaticCatalog> {
        match &self.rules_path {
            Some(path) => {
                if !path.exists() {
                    return Err(WasteLedgerError::FileNotFound(path.display().to_string()));
                }
                let content = std::fs::read_to_string(path)?;
                Ok(StaticCatalog::from_json(&content)?)
            }
            None => Ok(StaticCatalog::builtin()),
        }
    }

    pub fn set_store_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.store_dir = Some(dir);
        self.save()
    }

    pub fn set_rules_path(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(WasteLedgerError::FileNotFound(path.display().to_string()));
        }
        // 保存前に中身を検証
        let content = std::fs::read_to_string(&path)?;
        StaticCatalog::from_json(&content)?;
        self.rules_path = Some(path);
        self.save()
    }
}
