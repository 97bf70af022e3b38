//! 検索モジュール
//!
//! 検索方向・選択範囲などの共通型、マッチャー、セッション履歴を提供

pub mod matcher;
pub mod state;
pub mod types;

pub use matcher::{LiteralMatcher, RegexMatcher, StringMatcher};
pub use state::{SearchState, SessionHistory};
pub use types::{SearchDirection, SearchMatch, SearchStart, Selection};
