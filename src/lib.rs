//! altre-isearch - インクリメンタル検索セッション
//!
//! ホストのテキスト面に依存しない、Emacs 風インクリメンタル検索の状態機械

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// 検索層
pub mod search;
pub mod session;

// ホスト連携
pub mod host;

// 公開API
pub use config::{LogConfig, SessionConfig};
pub use error::{ConfigError, ErrorLevel, IsearchError, Result, SessionError};
pub use host::{
    FocusOwner, HostCapabilities, SearchHost, StatusLine, TextBuffer, TextSearchProvider,
    TextSurface,
};
pub use search::{SearchDirection, SearchStart, Selection};
pub use session::{EventDisposition, IncrementalSearch, KeyInput, SessionEvent};
