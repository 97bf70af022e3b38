//! ホスト側コラボレーター
//!
//! セッションはテキスト面・検索プロバイダー・ステータス行の3つを通じてだけ
//! ホストとやり取りする。

pub mod buffer;
#[cfg(feature = "terminal")]
pub mod terminal;

use crate::search::{SearchDirection, SearchStart, Selection};
use crate::session::FollowUp;

pub use buffer::{StatusRecord, TextBuffer};

/// フォーカスの所在
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusOwner {
    /// 検索対象のテキスト面
    #[default]
    Surface,
    /// セッション自身のポップアップ
    SessionPopup,
    /// 無関係なコントロール
    Elsewhere,
}

/// 構築時に渡すホストの任意機能
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// セッション開始時に `set_mark` を呼ぶ
    pub supports_mark: bool,
    /// 開始・終了をプロバイダーへ通知する
    pub session_hooks: bool,
    /// 範囲指定検索をサポートする（インクリメンタル検索では使用しない）
    pub supports_scoped_search: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            supports_mark: true,
            session_hooks: false,
            supports_scoped_search: false,
        }
    }
}

/// キャレットと選択範囲を持つテキスト面
pub trait TextSurface {
    /// 破棄済みか
    fn is_disposed(&self) -> bool {
        false
    }

    /// キャレット位置（文字インデックス）
    fn caret_offset(&self) -> usize;

    /// 現在の選択範囲（符号付き）
    fn selection(&self) -> Selection;

    /// 選択範囲を設定
    ///
    /// 選択変更の通知は1回の操作ごとに最終的な選択範囲1件へまとめて送ること。
    /// まとめない場合でも、後方マッチの反転前の形はセッションが自身の変更として無視する。
    fn set_selection(&mut self, selection: Selection);

    /// 「ここまで選択」操作のためのマークを記録
    fn set_mark(&mut self, offset: usize) {
        let _ = offset;
    }

    /// 可聴・可視の警告
    fn alert(&mut self);

    /// キー・マウス・フォーカス・テキスト変更のリスナーを登録
    fn attach_listeners(&mut self) {}

    /// `attach_listeners` で登録したリスナーを解除
    fn detach_listeners(&mut self) {}

    /// 現在フォーカスを持っているもの
    fn focus_owner(&self) -> FocusOwner {
        FocusOwner::Surface
    }

    /// 次のイベントループ反復で `task` を実行するよう予約
    fn defer(&mut self, task: FollowUp);
}

/// テキスト検索プロバイダー
pub trait TextSearchProvider {
    /// 検索してマッチを選択範囲に設定する。マッチ開始位置を返し、なければ `None`
    fn find_and_select(
        &mut self,
        start: SearchStart,
        pattern: &str,
        direction: SearchDirection,
        case_sensitive: bool,
    ) -> Option<usize>;

    /// 検索セッション開始の通知
    fn begin_find_session(&mut self) {}

    /// 検索セッション終了の通知
    fn end_find_session(&mut self) {}
}

/// ステータス行
///
/// メッセージとエラーメッセージは排他的に表示される。
pub trait StatusLine {
    fn set_message(&mut self, text: &str);

    fn set_error_message(&mut self, text: &str);
}

/// セッションが必要とするホスト機能一式
pub trait SearchHost: TextSurface + TextSearchProvider + StatusLine {}

impl<T: TextSurface + TextSearchProvider + StatusLine> SearchHost for T {}
