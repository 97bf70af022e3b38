//! メモリ上のテキストバッファによるホスト実装
//!
//! 組み込み先のエディタを持たない環境やテストで、セッションのコラボレーター一式として使う。

use std::collections::VecDeque;

use super::{FocusOwner, StatusLine, TextSearchProvider, TextSurface};
use crate::search::{LiteralMatcher, SearchDirection, SearchStart, Selection, StringMatcher};
use crate::session::{FollowUp, SessionEvent};

/// ステータス行に表示中の内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRecord {
    pub message: String,
    pub error_message: String,
}

impl StatusRecord {
    /// エラー表示中か
    pub fn is_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// 表示中の文字列
    pub fn text(&self) -> &str {
        if self.is_error() {
            &self.error_message
        } else {
            &self.message
        }
    }

    pub fn is_clear(&self) -> bool {
        self.message.is_empty() && self.error_message.is_empty()
    }
}

/// テキストバッファ
#[derive(Debug, Clone)]
pub struct TextBuffer<M: StringMatcher = LiteralMatcher> {
    text: String,
    char_len: usize,
    selection: Selection,
    mark: Option<usize>,
    matcher: M,
    status: StatusRecord,
    alerts: usize,
    listeners_attached: bool,
    find_session_active: bool,
    disposed: bool,
    focus: FocusOwner,
    pending: VecDeque<FollowUp>,
}

impl TextBuffer<LiteralMatcher> {
    /// 既定のリテラルマッチャーで作成
    pub fn new(text: &str) -> Self {
        Self::with_matcher(text, LiteralMatcher::new())
    }
}

impl<M: StringMatcher> TextBuffer<M> {
    /// マッチャーを差し替えて作成
    pub fn with_matcher(text: &str, matcher: M) -> Self {
        Self {
            text: text.to_string(),
            char_len: text.chars().count(),
            selection: Selection::caret_at(0),
            mark: None,
            matcher,
            status: StatusRecord::default(),
            alerts: 0,
            listeners_attached: false,
            find_session_active: false,
            disposed: false,
            focus: FocusOwner::Surface,
            pending: VecDeque::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 文字数
    pub fn len_chars(&self) -> usize {
        self.char_len
    }

    /// キャレットを移動し選択を解除
    pub fn set_caret(&mut self, offset: usize) {
        self.selection = Selection::caret_at(offset.min(self.char_len));
    }

    /// 選択中の文字列
    pub fn selected_text(&self) -> String {
        self.text
            .chars()
            .skip(self.selection.start())
            .take(self.selection.len())
            .collect()
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    pub fn status(&self) -> &StatusRecord {
        &self.status
    }

    /// これまでに鳴らした警告の回数
    pub fn alerts(&self) -> usize {
        self.alerts
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    pub fn find_session_active(&self) -> bool {
        self.find_session_active
    }

    /// バッファを破棄済みにする
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.listeners_attached = false;
    }

    pub fn set_focus_owner(&mut self, focus: FocusOwner) {
        self.focus = focus;
    }

    /// 予約済みの後続処理を取り出す
    pub fn take_follow_ups(&mut self) -> Vec<FollowUp> {
        self.pending.drain(..).collect()
    }

    /// 文字列を挿入し、リスナーへ配送すべきイベントを返す
    pub fn insert_str(&mut self, offset: usize, text: &str) -> SessionEvent {
        let offset = offset.min(self.char_len);
        let byte = self
            .text
            .char_indices()
            .nth(offset)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len());
        self.text.insert_str(byte, text);
        self.char_len += text.chars().count();
        SessionEvent::TextChanged
    }
}

impl<M: StringMatcher> TextSurface for TextBuffer<M> {
    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn caret_offset(&self) -> usize {
        self.selection.caret()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        // 両端をバッファ内に収める
        let anchor = selection.offset.min(self.char_len);
        let caret = (anchor as isize + selection.length).clamp(0, self.char_len as isize);
        self.selection = Selection::new(anchor, caret - anchor as isize);
    }

    fn set_mark(&mut self, offset: usize) {
        self.mark = Some(offset.min(self.char_len));
    }

    fn alert(&mut self) {
        self.alerts += 1;
    }

    fn attach_listeners(&mut self) {
        self.listeners_attached = true;
    }

    fn detach_listeners(&mut self) {
        self.listeners_attached = false;
    }

    fn focus_owner(&self) -> FocusOwner {
        self.focus
    }

    fn defer(&mut self, task: FollowUp) {
        self.pending.push_back(task);
    }
}

impl<M: StringMatcher> TextSearchProvider for TextBuffer<M> {
    fn find_and_select(
        &mut self,
        start: SearchStart,
        pattern: &str,
        direction: SearchDirection,
        case_sensitive: bool,
    ) -> Option<usize> {
        let found = self
            .matcher
            .find(&self.text, start, pattern, direction, case_sensitive)?;
        self.selection = found.selection();
        Some(found.start)
    }

    fn begin_find_session(&mut self) {
        self.find_session_active = true;
    }

    fn end_find_session(&mut self) {
        self.find_session_active = false;
    }
}

impl<M: StringMatcher> StatusLine for TextBuffer<M> {
    fn set_message(&mut self, text: &str) {
        if !text.is_empty() {
            self.status.error_message.clear();
        }
        self.status.message = text.to_string();
    }

    fn set_error_message(&mut self, text: &str) {
        if !text.is_empty() {
            self.status.message.clear();
        }
        self.status.error_message = text.to_string();
    }
}
