//! 外部コラボレーター（プロフィール・ルーム）のインメモリ実装
//!
//! 本来はアカウント管理サービスのデータベースが持つ情報です。
//! このサーバーでは起動時に JSON ファイルから読み込みます。

pub mod profile;
pub mod room_gate;

use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use profile::InMemoryProfileDirectory;
pub use room_gate::InMemoryRoomGate;

/// ディレクトリファイルの読み込みエラー
#[derive(Debug, Error)]
pub enum DirectoryLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, DirectoryLoadError> {
    let display = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| DirectoryLoadError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| DirectoryLoadError::Parse {
        path: display,
        source,
    })
}
