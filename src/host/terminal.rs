//! crossterm イベントの変換
//!
//! 端末フロントエンドが受け取った crossterm のイベントをセッションイベントへ変換する

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use log::debug;

use super::SearchHost;
use crate::search::SearchDirection;
use crate::session::{
    EventDisposition, IncrementalSearch, KeyInput, Modifiers, MouseAction, NavigationKey,
    SessionEvent,
};

/// crossterm のイベントをセッションイベントへ変換
pub fn translate_event(event: &Event) -> Option<SessionEvent> {
    match event {
        Event::Key(key) => translate_key(key).map(SessionEvent::Key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(SessionEvent::Mouse(MouseAction::Press)),
            MouseEventKind::Up(_) => Some(SessionEvent::Mouse(MouseAction::Release)),
            MouseEventKind::ScrollDown
            | MouseEventKind::ScrollUp
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => Some(SessionEvent::ViewportScrolled),
            MouseEventKind::Drag(_) | MouseEventKind::Moved => None,
        },
        Event::FocusGained => Some(SessionEvent::FocusGained),
        Event::FocusLost => Some(SessionEvent::FocusLost),
        Event::Resize(_, _) => Some(SessionEvent::ViewportScrolled),
        _ => None, // ペーストはホスト側でテキスト変更として通知される
    }
}

/// キーイベントを変換（キーリリースは無視）
pub fn translate_key(key: &KeyEvent) -> Option<KeyInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let input = match key.code {
        KeyCode::Char(ch) => KeyInput::Char {
            ch,
            modifiers: translate_modifiers(key.modifiers),
        },
        KeyCode::Tab => KeyInput::Char {
            ch: '\t',
            modifiers: translate_modifiers(key.modifiers),
        },
        KeyCode::Left => KeyInput::Navigation(NavigationKey::Left),
        KeyCode::Right => KeyInput::Navigation(NavigationKey::Right),
        KeyCode::Home => KeyInput::Navigation(NavigationKey::Home),
        KeyCode::End => KeyInput::Navigation(NavigationKey::End),
        KeyCode::PageUp => KeyInput::Navigation(NavigationKey::PageUp),
        KeyCode::PageDown => KeyInput::Navigation(NavigationKey::PageDown),
        KeyCode::Down => KeyInput::ArrowDown,
        KeyCode::Up => KeyInput::ArrowUp,
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Esc => KeyInput::Escape,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Delete => KeyInput::Delete,
        _ => KeyInput::Other,
    };
    Some(input)
}

fn translate_modifiers(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.contains(KeyModifiers::SHIFT),
        control: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        meta: modifiers.intersects(KeyModifiers::META | KeyModifiers::SUPER),
    }
}

/// 検索開始のキー操作か判定し、その方向を返す
///
/// C-s / C-j が前方、C-r / C-S-j が後方。
pub fn begin_gesture(key: &KeyEvent) -> Option<SearchDirection> {
    if key.kind == KeyEventKind::Release || !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('s') => Some(SearchDirection::Forward),
        KeyCode::Char('r') => Some(SearchDirection::Backward),
        KeyCode::Char('j') if !shift => Some(SearchDirection::Forward),
        KeyCode::Char('j') | KeyCode::Char('J') => Some(SearchDirection::Backward),
        _ => None,
    }
}

/// crossterm のイベントを1件セッションへ配送
///
/// 検索開始のキー操作はセッション開始（またはアクティブ時は繰り返し検索）として扱う。
pub fn dispatch<H: SearchHost>(
    session: &mut IncrementalSearch,
    host: &mut H,
    event: &Event,
) -> EventDisposition {
    if let Event::Key(key) = event {
        if let Some(direction) = begin_gesture(key) {
            let result = if session.is_installed() {
                session.repeat_search(host, direction).map(|_| ())
            } else {
                session.set_direction(direction);
                session.begin_session(host)
            };
            if let Err(err) = result {
                debug!("isearch gesture ignored: {}", err);
                return EventDisposition::PassThrough;
            }
            return EventDisposition::Consumed;
        }
    }

    match translate_event(event) {
        Some(session_event) => session.handle_event(host, session_event),
        None => EventDisposition::PassThrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{TextBuffer, TextSurface};
    use crate::search::Selection;
    use crossterm::event::{MouseButton, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn translates_keys() {
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(
            translate_key(&shifted),
            Some(KeyInput::Char {
                ch: 'A',
                modifiers: Modifiers::SHIFT
            })
        );
        assert_eq!(
            translate_key(&KeyEvent::new(KeyCode::Home, KeyModifiers::NONE)),
            Some(KeyInput::Navigation(NavigationKey::Home))
        );
        assert_eq!(
            translate_key(&KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)),
            Some(KeyInput::Other)
        );

        let mut release = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate_key(&release), None);
    }

    #[test]
    fn translates_mouse_and_focus() {
        let press = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            translate_event(&press),
            Some(SessionEvent::Mouse(MouseAction::Press))
        );
        assert_eq!(translate_event(&Event::FocusLost), Some(SessionEvent::FocusLost));
        assert_eq!(
            translate_event(&Event::Resize(80, 24)),
            Some(SessionEvent::ViewportScrolled)
        );
    }

    #[test]
    fn recognises_begin_gestures() {
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        let ctrl_shift_j = KeyEvent::new(
            KeyCode::Char('J'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        let plain_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);

        assert_eq!(begin_gesture(&ctrl_s), Some(SearchDirection::Forward));
        assert_eq!(begin_gesture(&ctrl_r), Some(SearchDirection::Backward));
        assert_eq!(begin_gesture(&ctrl_shift_j), Some(SearchDirection::Backward));
        assert_eq!(begin_gesture(&plain_s), None);
    }

    #[test]
    fn dispatch_drives_a_session() {
        let mut buffer = TextBuffer::new("alpha beta alpha");
        let mut session = IncrementalSearch::new();

        let started = dispatch(
            &mut session,
            &mut buffer,
            &key(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert!(started.is_consumed());
        assert!(session.is_installed());

        for ch in "alpha".chars() {
            dispatch(
                &mut session,
                &mut buffer,
                &key(KeyCode::Char(ch), KeyModifiers::NONE),
            );
        }
        assert_eq!(buffer.selection(), Selection::new(0, 5));

        dispatch(
            &mut session,
            &mut buffer,
            &key(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert_eq!(buffer.selection(), Selection::new(11, 5));

        let enter = dispatch(&mut session, &mut buffer, &key(KeyCode::Enter, KeyModifiers::NONE));
        assert!(enter.is_consumed());
        assert!(!session.is_installed());
        assert_eq!(session.previous_pattern(), "alpha");
    }
}
