//! 検索用マッチャー
//!
//! 開始位置と方向を受け取り、最も近いマッチを1件だけ返す

use regex::RegexBuilder;

use super::types::{SearchDirection, SearchMatch, SearchStart};

/// 文字列マッチング戦略
pub trait StringMatcher {
    /// `start` から `direction` 方向で最初に見つかるマッチを返す
    ///
    /// 前方検索では開始位置以降に始まる最初のマッチ、後方検索では開始位置以前に
    /// 始まる最後のマッチを返す。オフセットはすべて文字単位。
    fn find(
        &self,
        text: &str,
        start: SearchStart,
        pattern: &str,
        direction: SearchDirection,
        case_sensitive: bool,
    ) -> Option<SearchMatch>;
}

/// 単純なリテラルマッチャー
#[derive(Debug, Default, Clone)]
pub struct LiteralMatcher;

impl LiteralMatcher {
    /// インスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for LiteralMatcher {
    fn find(
        &self,
        text: &str,
        start: SearchStart,
        pattern: &str,
        direction: SearchDirection,
        case_sensitive: bool,
    ) -> Option<SearchMatch> {
        let chars: Vec<char> = text.chars().collect();
        let pattern_chars: Vec<char> = pattern.chars().collect();

        if pattern_chars.is_empty() || pattern_chars.len() > chars.len() {
            return None;
        }

        let last_start = chars.len() - pattern_chars.len();
        let matches_at = |pos: &usize| {
            pattern_chars
                .iter()
                .enumerate()
                .all(|(offset, pat_ch)| chars_equal(chars[pos + offset], *pat_ch, case_sensitive))
        };

        let from = start.resolve(direction, chars.len());
        let found = match direction {
            SearchDirection::Forward => (from..=last_start).find(matches_at),
            SearchDirection::Backward => (0..=from.min(last_start)).rev().find(matches_at),
        };

        found.map(|pos| SearchMatch {
            start: pos,
            end: pos + pattern_chars.len(),
        })
    }
}

/// `regex` クレートでリテラル検索するマッチャー
#[derive(Debug, Default, Clone)]
pub struct RegexMatcher;

impl RegexMatcher {
    /// インスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for RegexMatcher {
    fn find(
        &self,
        text: &str,
        start: SearchStart,
        pattern: &str,
        direction: SearchDirection,
        case_sensitive: bool,
    ) -> Option<SearchMatch> {
        if pattern.is_empty() {
            return None;
        }

        let regex = match RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(!case_sensitive)
            .build()
        {
            Ok(regex) => regex,
            Err(err) => {
                log::warn!("search pattern rejected by regex engine: {}", err);
                return None;
            }
        };

        let index = CharIndex::new(text);
        let from = start.resolve(direction, index.char_count());

        match direction {
            SearchDirection::Forward => regex
                .find_at(text, index.char_to_byte(from))
                .map(|m| index.to_match(m.start(), m.end())),
            SearchDirection::Backward => {
                // 重なり合うマッチも拾うため、1文字ずつ進めながら走査する
                let mut last = None;
                let mut byte = 0;
                while let Some(m) = regex.find_at(text, byte) {
                    let found = index.to_match(m.start(), m.end());
                    if found.start > from {
                        break;
                    }
                    last = Some(found);
                    byte = index.char_to_byte(found.start + 1);
                    if byte >= text.len() {
                        break;
                    }
                }
                last
            }
        }
    }
}

/// 文字インデックスとバイトオフセットの対応表
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.char_to_byte
            .get(char_offset)
            .copied()
            .unwrap_or(self.text_len)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        match self.char_to_byte.binary_search(&byte_offset) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    fn to_match(&self, start: usize, end: usize) -> SearchMatch {
        SearchMatch {
            start: self.byte_to_char(start),
            end: self.byte_to_char(end),
        }
    }
}

fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        return a == b;
    }

    // Unicodeケースフォールディング（簡易）
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
