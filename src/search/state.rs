//! インクリメンタル検索の状態スナップショットと履歴

use serde::Serialize;

use super::types::{SearchDirection, SearchStart, Selection};

/// ある時点の検索状態（不変スナップショット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchState {
    /// その時点の選択範囲
    pub selection: Selection,
    /// その時点の検索パターン長（文字数）
    pub pattern_len: usize,
    /// 次の検索を再開する位置
    pub match_index: SearchStart,
    /// 直前の検索が成功していたか
    pub found: bool,
    /// その時点の検索方向
    pub direction: SearchDirection,
}

/// 検索履歴
///
/// スナップショットの配列と有効深さで管理する。巻き戻したエントリは
/// 次の push で切り捨てられるまで内部の配列に残るが、`snapshots` や `peek` からは見えない。
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    snapshots: Vec<SearchState>,
    depth: usize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 有効なスナップショット数
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    pub fn push(&mut self, state: SearchState) {
        self.snapshots.truncate(self.depth);
        self.snapshots.push(state);
        self.depth = self.snapshots.len();
    }

    /// 最新のスナップショットを取り出す。空なら `None`
    pub fn pop(&mut self) -> Option<SearchState> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        self.snapshots.get(self.depth).copied()
    }

    /// 最新のスナップショットを参照
    pub fn peek(&self) -> Option<&SearchState> {
        self.depth.checked_sub(1).and_then(|idx| self.snapshots.get(idx))
    }

    /// 有効なスナップショットを古い順に返す
    pub fn snapshots(&self) -> &[SearchState] {
        &self.snapshots[..self.depth]
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.depth = 0;
    }
}
