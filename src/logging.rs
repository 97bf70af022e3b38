//! ロギングシステム
//!
//! `log` ファサードのバックエンド。stderr と任意のファイルへ1行ずつ出力する

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::{LevelFilter, Log, Metadata, Record};
use serde::{Deserialize, Serialize};

use crate::config::LogConfig;
use crate::error::{IsearchError, Result};

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Off,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Off => "OFF",
        }
    }

    /// `log` クレートのフィルターへ変換
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }

    fn from_level(level: log::Level) -> Self {
        match level {
            log::Level::Trace => LogLevel::Trace,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Info => LogLevel::Info,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Error => LogLevel::Error,
        }
    }
}

/// ロガー
#[derive(Debug, Clone)]
pub struct Logger {
    level: LogLevel,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    /// 設定から作成
    pub fn from_config(config: &LogConfig) -> Result<Self> {
        let mut logger = Self::new(config.level);
        logger.output_stderr = config.stderr;
        logger.output_file = config.resolved_file()?;
        Ok(logger)
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    fn should_log(&self, level: LogLevel) -> bool {
        self.level != LogLevel::Off && level >= self.level
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.should_log(LogLevel::from_level(metadata.level()))
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = LogLevel::from_level(record.level());
        self.write_line(&format!(
            "{}: [{}] {}",
            level.tag(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}

/// 設定に従ってグローバルロガーを登録
///
/// プロセス内で一度だけ呼べる。
pub fn init(config: &LogConfig) -> Result<()> {
    let logger = Logger::from_config(config)?;
    let filter = logger.level().to_level_filter();
    log::set_logger(Box::leak(Box::new(logger))).map_err(|err| IsearchError::Logging {
        message: err.to_string(),
    })?;
    log::set_max_level(filter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_respects_log_level() {
        let logger = Logger::for_development().without_stderr();
        assert!(logger.should_log(LogLevel::Debug));
        assert!(logger.should_log(LogLevel::Error));
        assert!(!logger.should_log(LogLevel::Trace));

        let info_logger = Logger::for_development()
            .with_level(LogLevel::Info)
            .without_stderr();
        assert!(!info_logger.should_log(LogLevel::Debug));
        assert!(info_logger.should_log(LogLevel::Warning));

        let off = Logger::new(LogLevel::Off);
        assert!(!off.should_log(LogLevel::Error));
    }

    #[test]
    fn init_registers_the_global_logger_once() {
        let config = LogConfig {
            level: LogLevel::Info,
            stderr: false,
            file: None,
        };

        init(&config).unwrap();
        assert_eq!(log::max_level(), LevelFilter::Info);

        let err = init(&config).unwrap_err();
        assert!(matches!(err, IsearchError::Logging { .. }));
    }

    #[test]
    fn writes_records_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("isearch.log");
        let logger = Logger::new(LogLevel::Info)
            .without_stderr()
            .with_file_output(&path);

        logger.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("altre_isearch::session")
                .args(format_args!("session started"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("filtered"))
                .build(),
        );

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "INFO: [altre_isearch::session] session started\n");
    }
}
