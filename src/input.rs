use crate::grid::Direction;
use crate::session::Input;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translates a terminal event; `None` for anything the game has no use for.
pub fn translate(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) => translate_key(key),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(Input::Close),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(c) => Some(Input::Char(c)),
        KeyCode::Backspace => Some(Input::Backspace),
        KeyCode::Tab => Some(Input::Tab),
        KeyCode::Enter => Some(Input::Enter),
        KeyCode::Esc => Some(Input::Escape),
        KeyCode::Up => Some(Input::Arrow(Direction::North)),
        KeyCode::Down => Some(Input::Arrow(Direction::South)),
        KeyCode::Left => Some(Input::Arrow(Direction::West)),
        KeyCode::Right => Some(Input::Arrow(Direction::East)),
        _ => None,
    }
}
