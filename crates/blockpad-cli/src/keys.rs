use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Name of a key press in keymap notation (`Ctrl-Alt-Shift-Key`), or `None`
/// for keys the editor has no name for.
pub fn key_name(key: &KeyEvent) -> Option<String> {
    let base = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift-Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return None,
    };

    let mut name = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("Ctrl-");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("Alt-");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) && key.code != KeyCode::BackTab {
        name.push_str("Shift-");
    }
    name.push_str(&base);
    Some(name)
}

/// The text a key types, if it is a plain (unmodified or shifted) key.
pub fn typed_text(key: &KeyEvent) -> Option<String> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::Enter => Some("\n".to_string()),
        KeyCode::Tab => Some("    ".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(KeyCode::Char('a'), KeyModifiers::CONTROL, "Ctrl-a")]
    #[case(KeyCode::Char('D'), KeyModifiers::CONTROL | KeyModifiers::SHIFT, "Ctrl-Shift-d")]
    #[case(KeyCode::Up, KeyModifiers::ALT, "Alt-Up")]
    #[case(KeyCode::Down, KeyModifiers::CONTROL | KeyModifiers::ALT, "Ctrl-Alt-Down")]
    #[case(KeyCode::Enter, KeyModifiers::CONTROL | KeyModifiers::SHIFT, "Ctrl-Shift-Enter")]
    #[case(KeyCode::Right, KeyModifiers::NONE, "Right")]
    #[case(KeyCode::BackTab, KeyModifiers::SHIFT, "Shift-Tab")]
    #[case(KeyCode::F(5), KeyModifiers::NONE, "F5")]
    fn names(#[case] code: KeyCode, #[case] modifiers: KeyModifiers, #[case] expected: &str) {
        assert_eq!(
            key_name(&KeyEvent::new(code, modifiers)),
            Some(expected.to_string())
        );
    }

    #[test]
    fn unnamed_keys() {
        assert_eq!(
            key_name(&KeyEvent::new(KeyCode::CapsLock, KeyModifiers::NONE)),
            None
        );
    }

    #[rstest]
    #[case(KeyCode::Char('x'), KeyModifiers::NONE, Some("x"))]
    #[case(KeyCode::Char('X'), KeyModifiers::SHIFT, Some("X"))]
    #[case(KeyCode::Char('∞'), KeyModifiers::NONE, Some("∞"))]
    #[case(KeyCode::Enter, KeyModifiers::NONE, Some("\n"))]
    #[case(KeyCode::Char('x'), KeyModifiers::CONTROL, None)]
    #[case(KeyCode::Enter, KeyModifiers::ALT, None)]
    #[case(KeyCode::Left, KeyModifiers::NONE, None)]
    fn typed(#[case] code: KeyCode, #[case] modifiers: KeyModifiers, #[case] expected: Option<&str>) {
        assert_eq!(
            typed_text(&KeyEvent::new(code, modifiers)),
            expected.map(str::to_string)
        );
    }
}
