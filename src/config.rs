//! セッション設定
//!
//! JSON ファイルから読み込む。すべての項目に既定値があり、ファイルがなくても動作する。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::LogLevel;
use crate::search::SearchDirection;
use crate::session::StatusTemplates;

/// 既定の設定ファイル名
const CONFIG_FILE_NAME: &str = "isearch.json";

/// インクリメンタル検索の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// 最初のセッションの検索方向
    pub initial_direction: SearchDirection,
    /// 検索失敗・履歴枯渇時に警告を鳴らす
    pub alert_on_failure: bool,
    /// ステータス表示テンプレート
    pub status: StatusTemplates,
    /// ステータス表示の最大幅（端末の桁数）
    pub status_width: Option<usize>,
    pub log: LogConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_direction: SearchDirection::Forward,
            alert_on_failure: true,
            status: StatusTemplates::default(),
            status_width: None,
            log: LogConfig::default(),
        }
    }
}

/// ログ出力設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: LogLevel,
    /// 標準エラー出力へ書き出す
    pub stderr: bool,
    /// 追記先ファイル（`~` と環境変数を展開）
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warning,
            stderr: true,
            file: None,
        }
    }
}

impl LogConfig {
    /// 展開済みのログファイルパス
    pub fn resolved_file(&self) -> Result<Option<PathBuf>, ConfigError> {
        let Some(raw) = &self.file else {
            return Ok(None);
        };
        let expanded = shellexpand::full(raw).map_err(|err| ConfigError::Path {
            message: err.to_string(),
        })?;
        Ok(Some(PathBuf::from(expanded.into_owned())))
    }
}

impl SessionConfig {
    /// 既定の設定ファイルパス（`~/.altre/isearch.json`）
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".altre").join(CONFIG_FILE_NAME))
    }

    /// 指定パスから読み込む
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ConfigError::NotFound {
                path: display.clone(),
            },
            _ => ConfigError::Io {
                path: display.clone(),
                message: err.to_string(),
            },
        })?;
        Self::from_json(&content).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: display,
                message,
            },
            other => other,
        })
    }

    /// 既定パスから読み込む。ファイルがなければ既定値
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_or_default(path),
            None => Ok(Self::default()),
        }
    }

    /// 指定パスから読み込む。ファイルがなければ既定値
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound { path }) => {
                log::debug!("no isearch config at {}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// JSON 文字列から読み込む
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig =
            serde_json::from_str(content).map_err(|err| ConfigError::Parse {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 値の妥当性を検査
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status_width == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "status_width".to_string(),
                value: "0".to_string(),
            });
        }
        if self.status.found.is_empty() || self.status.not_found.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "status".to_string(),
                value: "empty template".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json(
            r#"{ "initial_direction": "backward", "status": { "reverse": "Back " } }"#,
        )
        .unwrap();
        assert_eq!(config.initial_direction, SearchDirection::Backward);
        assert!(config.alert_on_failure);
        assert_eq!(config.status.reverse, "Back ");
        assert_eq!(config.status.wrapped, "Wrapped ");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SessionConfig::from_json(r#"{ "colour": "red" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_width_is_invalid() {
        let err = SessionConfig::from_json(r#"{ "status_width": 0 }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "status_width".to_string(),
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn log_path_expands_environment() {
        std::env::set_var("ALTRE_ISEARCH_TEST_DIR", "/tmp/isearch");
        let log = LogConfig {
            file: Some("$ALTRE_ISEARCH_TEST_DIR/debug.log".to_string()),
            ..LogConfig::default()
        };
        assert_eq!(
            log.resolved_file().unwrap(),
            Some(PathBuf::from("/tmp/isearch/debug.log"))
        );
    }
}
