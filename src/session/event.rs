//! セッションへ配送されるホストイベント
//!
//! ホストはネイティブのキー・マウス・フォーカスイベントをこれらの型へ変換して
//! [`IncrementalSearch::handle_event`](super::IncrementalSearch::handle_event) に渡す。

use crate::search::Selection;

/// 修飾キーの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// 修飾なし
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shiftのみ
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Controlのみ
    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// 検索文字として扱える修飾状態か（修飾なし、またはShiftのみ）
    pub fn is_plain_or_shift(self) -> bool {
        !self.control && !self.alt && !self.meta
    }
}

/// キャレットを動かすナビゲーションキー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// キー入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// 文字入力
    Char { ch: char, modifiers: Modifiers },
    /// セッションを終了させるナビゲーション
    Navigation(NavigationKey),
    /// 次のマッチ（前方）
    ArrowDown,
    /// 前のマッチ（後方）
    ArrowUp,
    Enter,
    Escape,
    Backspace,
    Delete,
    /// 上記以外（ファンクションキーなど）
    Other,
}

impl KeyInput {
    /// 修飾なしの文字入力
    pub fn char(ch: char) -> Self {
        KeyInput::Char {
            ch,
            modifiers: Modifiers::NONE,
        }
    }

    /// 制御文字として届いた CR / ESC / BS / DEL を対応するキーへ読み替える
    pub fn normalized(self) -> Self {
        match self {
            KeyInput::Char { ch: '\r', .. } => KeyInput::Enter,
            KeyInput::Char { ch: '\u{1b}', .. } => KeyInput::Escape,
            KeyInput::Char { ch: '\u{8}', .. } => KeyInput::Backspace,
            KeyInput::Char { ch: '\u{7f}', .. } => KeyInput::Delete,
            other => other,
        }
    }
}

/// マウス操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Press,
    Release,
    DoubleClick,
}

/// ホストからセッションへ配送されるイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyInput),
    Mouse(MouseAction),
    FocusGained,
    FocusLost,
    ViewportScrolled,
    TextChanged,
    /// 選択範囲が変更された（変更後の選択範囲）
    SelectionChanged(Selection),
}

/// イベントをホスト側へ流すかどうか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// セッションが処理したため、ホストは既定動作を行わない
    Consumed,
    /// ホストの既定動作をそのまま行う
    PassThrough,
}

impl EventDisposition {
    pub fn is_consumed(self) -> bool {
        matches!(self, EventDisposition::Consumed)
    }
}

/// ホストのイベントループ上で次の反復に実行する後続処理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// フォーカスが本当に無関係なコントロールへ移ったかを確認する
    VerifyFocus { generation: u64 },
}
