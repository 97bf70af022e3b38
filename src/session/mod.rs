//! インクリメンタル検索セッション
//!
//! キー入力で検索パターンを組み立て、検索プロバイダーにマッチングを委譲し、
//! 操作ごとの状態スナップショットを履歴に積んで任意の時点まで巻き戻せるようにする。

pub mod event;
pub mod status;

use std::fmt;

use log::{debug, trace, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::host::{FocusOwner, HostCapabilities, SearchHost};
use crate::search::{SearchDirection, SearchStart, SearchState, Selection, SessionHistory};

pub use event::{
    EventDisposition, FollowUp, KeyInput, Modifiers, MouseAction, NavigationKey, SessionEvent,
};
pub use status::{StatusFields, StatusFormatter, StatusTemplates};

/// インクリメンタル検索セッション
///
/// 1つのテキスト面につき1つだけ存在し、ホストのUIスレッド上で同期的に操作される。
pub struct IncrementalSearch {
    /// 現在の検索パターン
    pattern: String,
    /// 最初の大文字のパターン内位置（以降は大文字小文字を区別）
    case_sensitive_from: Option<usize>,
    /// 最初に折り返した時点の履歴深さ
    wrap_mark: Option<usize>,
    /// 次の検索を再開する位置
    last_match: SearchStart,
    /// 直前の検索が成功したか
    found: bool,
    direction: SearchDirection,
    /// リスナーがホストに登録済みか
    installed: bool,
    history: SessionHistory,
    /// 前回セッションのパターン
    previous_pattern: String,
    /// セッション開始ごとに増える世代番号
    generation: u64,
    /// セッション自身が最後に適用した選択範囲
    echo_selection: Option<Selection>,
    capabilities: HostCapabilities,
    formatter: StatusFormatter,
    tab: String,
    status_width: Option<usize>,
    alert_on_failure: bool,
}

impl IncrementalSearch {
    /// 既定設定で作成
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    /// 設定から作成
    pub fn with_config(config: &SessionConfig) -> Self {
        Self {
            pattern: String::new(),
            case_sensitive_from: None,
            wrap_mark: None,
            last_match: SearchStart::At(0),
            found: true,
            direction: config.initial_direction,
            installed: false,
            history: SessionHistory::new(),
            previous_pattern: String::new(),
            generation: 0,
            echo_selection: None,
            capabilities: HostCapabilities::default(),
            formatter: config.status.clone().into_formatter(),
            tab: config.status.tab.clone(),
            status_width: config.status_width,
            alert_on_failure: config.alert_on_failure,
        }
    }

    /// ホストの任意機能を設定
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// ステータス整形関数を差し替え
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&StatusFields<'_>) -> String + 'static,
    {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn previous_pattern(&self) -> &str {
        &self.previous_pattern
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// 直前の検索が成功したか
    pub fn is_found(&self) -> bool {
        self.found
    }

    /// セッションがアクティブ（リスナー登録済み）か
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive_from.is_some()
    }

    pub fn case_sensitive_from(&self) -> Option<usize> {
        self.case_sensitive_from
    }

    pub fn wrap_mark(&self) -> Option<usize> {
        self.wrap_mark
    }

    pub fn last_match(&self) -> SearchStart {
        self.last_match
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    /// ステータス表示に使うフィールド
    pub fn status_fields(&self) -> StatusFields<'_> {
        StatusFields {
            found: self.found,
            direction: self.direction,
            wrapped: self.wrap_mark.is_some(),
            pattern: &self.pattern,
        }
    }

    /// 現在のステータス表示文字列
    pub fn status_text(&self) -> String {
        let text = status::escape_tabs(&(self.formatter)(&self.status_fields()), &self.tab);
        match self.status_width {
            Some(width) => status::fit_to_width(&text, width),
            None => text,
        }
    }

    /// 次の検索方向を設定（セッション開始前に初期方向を選ぶ用途）
    pub fn set_direction(&mut self, direction: SearchDirection) {
        self.direction = direction;
    }

    /// セッションを開始
    ///
    /// 既にリスナーが登録済みなら、パターンを保ったまま前回の検索を繰り返す。
    pub fn begin_session<H: SearchHost>(&mut self, host: &mut H) -> Result<()> {
        if host.is_disposed() {
            warn!("begin_session on a disposed surface ignored");
            return Err(SessionError::SurfaceDisposed.into());
        }

        if self.installed {
            debug!("isearch already installed, repeating {:?}", self.direction);
            self.save_state(host);
            self.search_again(host, self.direction);
            self.refresh(host);
            return Ok(());
        }

        self.pattern.clear();
        self.history.clear();
        self.case_sensitive_from = None;
        self.wrap_mark = None;
        self.found = true;

        let caret = host.caret_offset();
        self.last_match = SearchStart::At(caret);
        host.set_selection(Selection::caret_at(caret));

        self.install(host);
        self.generation += 1;

        if self.capabilities.supports_mark {
            host.set_mark(caret);
        }

        self.refresh(host);

        if self.capabilities.session_hooks {
            host.begin_find_session();
        }

        debug!(
            "isearch session {} started at {} ({:?})",
            self.generation, caret, self.direction
        );
        Ok(())
    }

    /// セッションを終了
    ///
    /// パターンが空でなければ次回のために保存する。2回目以降の呼び出しは保存以外何もしない。
    pub fn end_session<H: SearchHost>(&mut self, host: &mut H) {
        if !self.pattern.is_empty() {
            self.previous_pattern = self.pattern.clone();
        }

        if !self.installed {
            return;
        }

        if host.is_disposed() {
            warn!("isearch session {} ended on a disposed surface", self.generation);
        } else {
            if self.capabilities.session_hooks {
                host.end_find_session();
            }
            host.set_message("");
            host.set_error_message("");
        }

        self.uninstall(host);
        self.history.clear();
        self.echo_selection = None;
        debug!(
            "isearch session {} ended with pattern {:?}",
            self.generation, self.pattern
        );
    }

    /// パターンに1文字追加して検索
    pub fn append_character<H: SearchHost>(&mut self, host: &mut H, ch: char) -> Result<bool> {
        self.ensure_ready(host)?;
        self.save_state(host);
        let found = self.add_char_search(host, ch);
        self.refresh(host);
        Ok(found)
    }

    /// 直前の状態変更を取り消す
    ///
    /// 文字の追加だけでなく方向の変更や繰り返し検索も1段ずつ巻き戻す。
    pub fn delete_character<H: SearchHost>(&mut self, host: &mut H) -> Result<()> {
        self.ensure_ready(host)?;
        let restored = self.restore_state(host);
        self.refresh(host);
        restored
    }

    /// 指定方向で検索を繰り返す
    pub fn repeat_search<H: SearchHost>(
        &mut self,
        host: &mut H,
        direction: SearchDirection,
    ) -> Result<bool> {
        self.ensure_ready(host)?;
        self.save_state(host);
        let found = self.search_again(host, direction);
        self.refresh(host);
        Ok(found)
    }

    /// 外部でテキストが変更された
    pub fn on_external_text_change<H: SearchHost>(&mut self, host: &mut H) {
        self.end_session(host);
    }

    /// キャレットを動かすキーが押された
    pub fn on_caret_navigation_key<H: SearchHost>(&mut self, host: &mut H) {
        self.end_session(host);
    }

    /// マウス操作があった
    pub fn on_mouse_event<H: SearchHost>(&mut self, host: &mut H) {
        self.end_session(host);
    }

    /// フォーカスを失った
    ///
    /// フォーカスがセッション自身のポップアップへ移っただけの場合もあるため、
    /// 判定は次のイベントループ反復まで遅らせる。
    pub fn on_focus_lost<H: SearchHost>(&mut self, host: &mut H) {
        if self.installed && !host.is_disposed() {
            host.defer(FollowUp::VerifyFocus {
                generation: self.generation,
            });
        }
    }

    pub fn on_focus_gained(&mut self) {
        trace!("focus gained during isearch session {}", self.generation);
    }

    /// ホストが予約された後続処理を実行する
    pub fn run_follow_up<H: SearchHost>(&mut self, host: &mut H, task: FollowUp) {
        match task {
            FollowUp::VerifyFocus { generation } => {
                if !self.installed || generation != self.generation {
                    return;
                }
                if host.is_disposed() || host.focus_owner() == FocusOwner::Elsewhere {
                    debug!("focus moved away from isearch session {}", generation);
                    self.end_session(host);
                }
            }
        }
    }

    /// ホストイベントを処理
    pub fn handle_event<H: SearchHost>(
        &mut self,
        host: &mut H,
        event: SessionEvent,
    ) -> EventDisposition {
        if !self.installed {
            return EventDisposition::PassThrough;
        }
        if host.is_disposed() {
            warn!("event {:?} on a disposed surface ignored", event);
            return EventDisposition::PassThrough;
        }

        match event {
            SessionEvent::Key(key) => return self.handle_key(host, key),
            SessionEvent::Mouse(_) => self.on_mouse_event(host),
            SessionEvent::FocusGained => self.on_focus_gained(),
            SessionEvent::FocusLost => self.on_focus_lost(host),
            SessionEvent::ViewportScrolled => {}
            SessionEvent::TextChanged => self.on_external_text_change(host),
            SessionEvent::SelectionChanged(selection) => {
                if !self.is_own_selection(selection) {
                    debug!("external selection change {:?}", selection);
                    self.end_session(host);
                }
            }
        }
        EventDisposition::PassThrough
    }

    fn handle_key<H: SearchHost>(&mut self, host: &mut H, key: KeyInput) -> EventDisposition {
        let disposition = match key.normalized() {
            KeyInput::Navigation(_) => {
                self.on_caret_navigation_key(host);
                return EventDisposition::PassThrough;
            }
            KeyInput::Enter | KeyInput::Escape => {
                self.end_session(host);
                return EventDisposition::Consumed;
            }
            // 矢印キーは方向を先に切り替えるので、失敗直後なら向きに関係なく折り返す
            KeyInput::ArrowDown => {
                self.save_state(host);
                self.direction = SearchDirection::Forward;
                self.search_again(host, self.direction);
                EventDisposition::Consumed
            }
            KeyInput::ArrowUp => {
                self.save_state(host);
                self.direction = SearchDirection::Backward;
                self.search_again(host, self.direction);
                EventDisposition::Consumed
            }
            KeyInput::Backspace | KeyInput::Delete => {
                if let Err(err) = self.restore_state(host) {
                    debug!("isearch undo: {}", err);
                }
                EventDisposition::Consumed
            }
            KeyInput::Char { ch, modifiers } if modifiers.is_plain_or_shift() => {
                self.save_state(host);
                self.add_char_search(host, ch);
                EventDisposition::Consumed
            }
            KeyInput::Char { .. } | KeyInput::Other => EventDisposition::PassThrough,
        };

        self.refresh(host);
        disposition
    }

    /// セッション自身が適用した選択範囲か
    ///
    /// 後方検索のマッチは正規化された形で一度設定されてから反転されるため、
    /// 反転前の形の通知も自身のものとして扱う。
    fn is_own_selection(&self, selection: Selection) -> bool {
        self.echo_selection
            .is_some_and(|echo| selection == echo || selection == echo.normalized())
    }

    fn ensure_ready<H: SearchHost>(&self, host: &H) -> Result<()> {
        if host.is_disposed() {
            warn!("isearch operation on a disposed surface ignored");
            return Err(SessionError::SurfaceDisposed.into());
        }
        if !self.installed {
            return Err(SessionError::NotActive.into());
        }
        Ok(())
    }

    fn pattern_len(&self) -> usize {
        self.pattern.chars().count()
    }

    fn save_state<H: SearchHost>(&mut self, host: &H) {
        self.history.push(SearchState {
            selection: host.selection(),
            pattern_len: self.pattern_len(),
            match_index: self.last_match,
            found: self.found,
            direction: self.direction,
        });
    }

    fn restore_state<H: SearchHost>(&mut self, host: &mut H) -> Result<()> {
        let Some(state) = self.history.pop() else {
            self.alert(host);
            return Err(SessionError::HistoryEmpty.into());
        };

        host.set_selection(state.selection);
        truncate_chars(&mut self.pattern, state.pattern_len);
        self.last_match = state.match_index;
        self.found = state.found;
        self.direction = state.direction;

        // 復元後のパターンに大文字が残らなければ解除する。長さがちょうど大文字の位置まで
        // 戻った場合も含めるので、その場合も大文字小文字を区別しない検索へ戻る
        if matches!(self.case_sensitive_from, Some(pos) if pos >= state.pattern_len) {
            self.case_sensitive_from = None;
        }
        if matches!(self.wrap_mark, Some(mark) if self.history.depth() < mark) {
            self.wrap_mark = None;
        }
        Ok(())
    }

    fn add_char_search<H: SearchHost>(&mut self, host: &mut H, ch: char) -> bool {
        if self.case_sensitive_from.is_none() && has_case_variant(ch) {
            self.case_sensitive_from = Some(self.pattern_len());
        }
        self.pattern.push(ch);

        trace!(
            "isearch {:?} from {:?} ({:?})",
            self.pattern,
            self.last_match,
            self.direction
        );
        let hit = host.find_and_select(
            self.last_match,
            &self.pattern,
            self.direction,
            self.is_case_sensitive(),
        );
        self.apply_result(host, hit, self.direction)
    }

    fn search_again<H: SearchHost>(&mut self, host: &mut H, direction: SearchDirection) -> bool {
        if self.pattern.is_empty() && !self.previous_pattern.is_empty() {
            self.pattern = self.previous_pattern.clone();
            self.case_sensitive_from = self.pattern.chars().position(has_case_variant);
        }

        if self.pattern.is_empty() {
            self.found = true;
            return true;
        }

        // 選択範囲のどちら側にキャレットがあるかが必要なので、キャレット位置から始める。
        // 文書先頭からの後方検索には対象がない
        let caret = host.caret_offset();
        let mut start = match direction {
            SearchDirection::Forward => Some(SearchStart::At(caret)),
            SearchDirection::Backward => caret.checked_sub(1).map(SearchStart::At),
        };

        // 同じ方向で失敗した直後の繰り返しは折り返し検索
        if !self.found && self.direction == direction {
            start = Some(SearchStart::Boundary);
            if self.wrap_mark.is_none() {
                self.wrap_mark = Some(self.history.depth());
            }
        }
        self.direction = direction;

        trace!("isearch repeat {:?} from {:?} ({:?})", self.pattern, start, direction);
        let hit = start.and_then(|start| {
            host.find_and_select(start, &self.pattern, direction, self.is_case_sensitive())
        });
        let found = self.apply_result(host, hit, direction);
        if let (true, Some(start)) = (found, start) {
            self.last_match = start;
        }
        found
    }

    fn apply_result<H: SearchHost>(
        &mut self,
        host: &mut H,
        hit: Option<usize>,
        direction: SearchDirection,
    ) -> bool {
        let found = hit.is_some();

        // 後方検索ではキャレットをマッチの先頭側に置く
        if found && !direction.is_forward() {
            let selection = host.selection();
            host.set_selection(selection.anchored_at_end());
        }

        if !found && self.found {
            self.alert(host);
        }

        self.found = found;
        found
    }

    fn alert<H: SearchHost>(&self, host: &mut H) {
        if self.alert_on_failure {
            host.alert();
        }
    }

    fn refresh<H: SearchHost>(&mut self, host: &mut H) {
        if !self.installed {
            return;
        }

        let text = self.status_text();
        if self.found {
            host.set_error_message("");
            host.set_message(&text);
        } else {
            host.set_message("");
            host.set_error_message(&text);
        }
        self.echo_selection = Some(host.selection());
    }

    fn install<H: SearchHost>(&mut self, host: &mut H) {
        if self.installed {
            return;
        }
        host.attach_listeners();
        self.installed = true;
    }

    fn uninstall<H: SearchHost>(&mut self, host: &mut H) {
        if !host.is_disposed() {
            host.detach_listeners();
        }
        self.installed = false;
    }
}

impl Default for IncrementalSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IncrementalSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalSearch")
            .field("pattern", &self.pattern)
            .field("case_sensitive_from", &self.case_sensitive_from)
            .field("wrap_mark", &self.wrap_mark)
            .field("last_match", &self.last_match)
            .field("found", &self.found)
            .field("direction", &self.direction)
            .field("installed", &self.installed)
            .field("history_depth", &self.history.depth())
            .field("previous_pattern", &self.previous_pattern)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// 小文字形が自身と異なる大文字か
fn has_case_variant(ch: char) -> bool {
    ch.is_uppercase() && !ch.to_lowercase().eq(std::iter::once(ch))
}

fn truncate_chars(text: &mut String, len: usize) {
    if let Some((idx, _)) = text.char_indices().nth(len) {
        text.truncate(idx);
    }
}
