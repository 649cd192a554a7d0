//! 画像ファイル → data URI 変換
//!
//! 記録には画像をそのまま `data:<mime>;base64,...` で保持する（デコードはしない）。

use crate::error::{Result, WasteLedgerError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
];

/// 拡張子からMIMEタイプを判定
pub fn mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 画像ファイルを data URI にエンコード
pub fn encode_data_uri(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(WasteLedgerError::FileNotFound(path.display().to_string()));
    }

    let mime = mime_type(path).ok_or_else(|| {
        WasteLedgerError::ImageLoad(format!("未対応の画像形式: {}", path.display()))
    })?;

    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Err(WasteLedgerError::ImageLoad(format!("空のファイル: {}", path.display())));
    }

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
