//! 検索関連の共通型

use serde::{Deserialize, Serialize};

/// 検索方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDirection {
    /// 前方検索
    #[default]
    Forward,
    /// 後方検索
    Backward,
}

impl SearchDirection {
    /// ブール値（true = 前方）から作成
    pub fn from_forward(forward: bool) -> Self {
        if forward {
            SearchDirection::Forward
        } else {
            SearchDirection::Backward
        }
    }

    /// 前方検索か判定
    pub fn is_forward(self) -> bool {
        matches!(self, SearchDirection::Forward)
    }
}

/// 選択範囲
///
/// `length` が負の場合は `offset` をアンカーとして手前側へ伸びる選択を表し、
/// キャレットは `offset + length` に位置する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// アンカー位置（文字インデックス）
    pub offset: usize,
    /// 符号付き長さ（文字数）
    pub length: isize,
}

impl Selection {
    /// 符号付きの選択範囲を作成
    pub fn new(offset: usize, length: isize) -> Self {
        Self { offset, length }
    }

    /// 長さ0のキャレット位置
    pub fn caret_at(offset: usize) -> Self {
        Self { offset, length: 0 }
    }

    /// キャレット位置
    pub fn caret(&self) -> usize {
        self.offset.saturating_add_signed(self.length)
    }

    /// 範囲の先頭
    pub fn start(&self) -> usize {
        self.offset.min(self.caret())
    }

    /// 範囲の末尾（排他的）
    pub fn end(&self) -> usize {
        self.offset.max(self.caret())
    }

    /// 範囲の長さ
    pub fn len(&self) -> usize {
        self.length.unsigned_abs()
    }

    /// 長さ0か判定
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// 先頭アンカー・正の長さへ正規化
    pub fn normalized(&self) -> Self {
        Self::new(self.start(), self.len() as isize)
    }

    /// 末尾をアンカーにし、キャレットを先頭に置いた表現へ反転
    pub fn anchored_at_end(&self) -> Self {
        Self::new(self.end(), -(self.len() as isize))
    }
}

/// 検索の開始位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStart {
    /// 指定オフセットから検索
    At(usize),
    /// 文書の端から検索（前方なら先頭、後方なら末尾）
    Boundary,
}

impl SearchStart {
    /// 方向に応じた具体的な開始位置を解決
    pub fn resolve(self, direction: SearchDirection, len: usize) -> usize {
        match (self, direction) {
            (SearchStart::At(offset), _) => offset.min(len),
            (SearchStart::Boundary, SearchDirection::Forward) => 0,
            (SearchStart::Boundary, SearchDirection::Backward) => len,
        }
    }
}

/// 1件の検索マッチ情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// マッチ開始位置（文字インデックス）
    pub start: usize,
    /// マッチ終了位置（文字インデックス、排他的）
    pub end: usize,
}

impl SearchMatch {
    /// マッチ長（文字数）
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// マッチが空か判定
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 前方向の選択範囲
    pub fn selection(&self) -> Selection {
        Selection::new(self.start, self.len() as isize)
    }
}
