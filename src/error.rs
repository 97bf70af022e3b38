//! エラーハンドリング
//!
//! インクリメンタル検索セッション全体で使用されるエラー型を定義
//! 検索の不一致はエラーではなく、セッション状態として記録される

use thiserror::Error;

/// クレート全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsearchError {
    /// セッション操作エラー
    #[error("Session operation failed: {0}")]
    Session(#[from] SessionError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// ロガー初期化エラー
    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

/// セッション操作固有のエラー
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("No incremental search session is active")]
    NotActive,

    #[error("Search history is empty")]
    HistoryEmpty,

    #[error("Text surface has been disposed")]
    SurfaceDisposed,
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid configuration file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Path expansion failed: {message}")]
    Path { message: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

impl IsearchError {
    /// エラーの重大度を返す
    ///
    /// 履歴の枯渇や非アクティブ時の操作はユーザー入力の範囲内の事象として扱う
    pub fn level(&self) -> ErrorLevel {
        match self {
            IsearchError::Session(SessionError::HistoryEmpty)
            | IsearchError::Session(SessionError::NotActive) => ErrorLevel::Info,
            IsearchError::Session(SessionError::SurfaceDisposed) => ErrorLevel::Warning,
            IsearchError::Config(_) | IsearchError::Logging { .. } => ErrorLevel::Error,
        }
    }

    /// セッション内で回復可能か
    pub fn is_recoverable(&self) -> bool {
        self.level() < ErrorLevel::Error
    }
}

/// クレート全体で使用するResult型
pub type Result<T> = std::result::Result<T, IsearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_are_recoverable() {
        let underflow: IsearchError = SessionError::HistoryEmpty.into();
        assert_eq!(underflow.level(), ErrorLevel::Info);
        assert!(underflow.is_recoverable());

        let disposed: IsearchError = SessionError::SurfaceDisposed.into();
        assert_eq!(disposed.level(), ErrorLevel::Warning);
        assert!(disposed.is_recoverable());
    }

    #[test]
    fn config_errors_are_not_recoverable() {
        let err: IsearchError = ConfigError::InvalidValue {
            key: "status_width".to_string(),
            value: "0".to_string(),
        }
        .into();
        assert_eq!(err.level(), ErrorLevel::Error);
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid value for status_width: 0"
        );
    }
}
