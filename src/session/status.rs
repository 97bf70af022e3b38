//! ステータス行の表示文字列
//!
//! 表示文字列はセッションの4つのフィールドだけから導出される純粋関数。
//! 整形関数はセッション構築時に注入でき、プロセス全体の状態は持たない。

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::search::SearchDirection;

/// ステータス表示に使うセッションのフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFields<'a> {
    pub found: bool,
    pub direction: SearchDirection,
    pub wrapped: bool,
    pub pattern: &'a str,
}

/// 注入可能なステータス整形関数
pub type StatusFormatter = Box<dyn Fn(&StatusFields<'_>) -> String>;

/// ステータス表示のテンプレート
///
/// `{reverse}`, `{wrapped}`, `{pattern}` がプレースホルダー。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusTemplates {
    /// マッチ成功時
    pub found: String,
    /// マッチ失敗時
    pub not_found: String,
    /// 後方検索の表示
    pub reverse: String,
    /// 折り返し後の表示
    pub wrapped: String,
    /// タブ文字の表示
    pub tab: String,
}

impl Default for StatusTemplates {
    fn default() -> Self {
        Self {
            found: "{reverse}{wrapped}I-search: {pattern}".to_string(),
            not_found: "{reverse}{wrapped}Failing I-search: {pattern}".to_string(),
            reverse: "Reverse ".to_string(),
            wrapped: "Wrapped ".to_string(),
            tab: "<TAB>".to_string(),
        }
    }
}

impl StatusTemplates {
    /// フィールドからステータス文字列を生成
    pub fn render(&self, fields: &StatusFields<'_>) -> String {
        let template = if fields.found {
            &self.found
        } else {
            &self.not_found
        };
        let reverse = if fields.direction.is_forward() {
            ""
        } else {
            self.reverse.as_str()
        };
        let wrapped = if fields.wrapped {
            self.wrapped.as_str()
        } else {
            ""
        };

        expand(
            template,
            &[
                ("reverse", reverse),
                ("wrapped", wrapped),
                ("pattern", fields.pattern),
            ],
        )
    }

    /// テンプレートを整形関数へ変換
    pub fn into_formatter(self) -> StatusFormatter {
        Box::new(move |fields| self.render(fields))
    }
}

/// プレースホルダーを1パスで展開（値の中の `{...}` は再展開しない）
fn expand(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match replacement {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// タブ文字をステータス行向けの表示へ置換
pub fn escape_tabs(text: &str, tab: &str) -> String {
    text.replace('\t', tab)
}

/// 表示幅が `max_width` を超える場合は末尾を `…` にして切り詰める
pub fn fit_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}
