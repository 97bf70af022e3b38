//! インクリメンタル検索の巻き戻しに関するプロパティテスト
//!
//! どんな操作列でも、同じ回数だけ削除すれば各時点の状態へ正確に戻ることを確認する。

use altre_isearch::host::TextSurface;
use altre_isearch::{
    IncrementalSearch, IsearchError, SearchDirection, Selection, SessionError, TextBuffer,
};
use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};

#[derive(Debug, Clone)]
enum Operation {
    Append(char),
    RepeatForward,
    RepeatBackward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Observed {
    pattern: String,
    selection: Selection,
    found: bool,
    direction: SearchDirection,
    case_sensitive_from: Option<usize>,
    wrap_mark: Option<usize>,
}

fn observe(session: &IncrementalSearch, buffer: &TextBuffer) -> Observed {
    Observed {
        pattern: session.pattern().to_string(),
        selection: buffer.selection(),
        found: session.is_found(),
        direction: session.direction(),
        case_sensitive_from: session.case_sensitive_from(),
        wrap_mark: session.wrap_mark(),
    }
}

fn haystack() -> impl Strategy<Value = String> {
    "[abAB ]{0,24}"
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => prop::sample::select(vec!['a', 'b', 'A', 'B', ' ']).prop_map(Operation::Append),
        1 => Just(Operation::RepeatForward),
        1 => Just(Operation::RepeatBackward),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn deletes_unwind_every_operation(
        text in haystack(),
        caret_seed in 0usize..32,
        backward in any::<bool>(),
        ops in proptest::collection::vec(operation_strategy(), 0..16)
    ) {
        let mut buffer = TextBuffer::new(&text);
        buffer.set_caret(caret_seed % (buffer.len_chars() + 1));

        let mut session = IncrementalSearch::new();
        session.set_direction(SearchDirection::from_forward(!backward));
        session.begin_session(&mut buffer).unwrap();

        let mut checkpoints = Vec::new();
        for op in &ops {
            checkpoints.push(observe(&session, &buffer));
            match op {
                Operation::Append(ch) => {
                    session.append_character(&mut buffer, *ch).unwrap();
                }
                Operation::RepeatForward => {
                    session.repeat_search(&mut buffer, SearchDirection::Forward).unwrap();
                }
                Operation::RepeatBackward => {
                    session.repeat_search(&mut buffer, SearchDirection::Backward).unwrap();
                }
            }
        }
        prop_assert_eq!(session.history().depth(), ops.len());

        while let Some(expected) = checkpoints.pop() {
            session.delete_character(&mut buffer).unwrap();
            prop_assert_eq!(observe(&session, &buffer), expected);
        }

        prop_assert!(session.history().is_empty());
        let alerts = buffer.alerts();
        let err = session.delete_character(&mut buffer).unwrap_err();
        prop_assert_eq!(err, IsearchError::Session(SessionError::HistoryEmpty));
        prop_assert_eq!(buffer.alerts(), alerts + 1);
    }

    #[test]
    fn selection_stays_inside_the_text(
        text in haystack(),
        ops in proptest::collection::vec(operation_strategy(), 0..16)
    ) {
        let mut buffer = TextBuffer::new(&text);
        let mut session = IncrementalSearch::new();
        session.begin_session(&mut buffer).unwrap();

        for op in ops {
            match op {
                Operation::Append(ch) => {
                    session.append_character(&mut buffer, ch).unwrap();
                }
                Operation::RepeatForward => {
                    session.repeat_search(&mut buffer, SearchDirection::Forward).unwrap();
                }
                Operation::RepeatBackward => {
                    session.repeat_search(&mut buffer, SearchDirection::Backward).unwrap();
                }
            }
            let selection = buffer.selection();
            prop_assert!(selection.end() <= buffer.len_chars());
            if session.is_found() && !session.pattern().is_empty() {
                prop_assert_eq!(selection.len(), session.pattern().chars().count());
            }
        }
    }
}
