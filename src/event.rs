//! Keyboard surface: maps key events onto the five logical navigator actions.
//!
//! Which physical keys trigger an action is configuration; everything unbound is ignored.

use crate::config::KeybindingConfig;
use crate::error::{Result, TreeNavError};
use crate::navigator::{NavigatorEvent, NavigatorState};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    MoveNext,
    MovePrev,
    Expand,
    Collapse,
    Activate,
}

impl KeyAction {
    pub fn to_event(self) -> NavigatorEvent {
        match self {
            KeyAction::MoveNext => NavigatorEvent::MoveNext,
            KeyAction::MovePrev => NavigatorEvent::MovePrev,
            KeyAction::Expand => NavigatorEvent::Expand,
            KeyAction::Collapse => NavigatorEvent::Collapse,
            KeyAction::Activate => NavigatorEvent::Activate,
        }
    }
}

/// Parse a key name like `down`, `enter` or `j`
pub fn parse_key_name(name: &str) -> Option<KeyCode> {
    let code = match name.to_lowercase().as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "backspace" => KeyCode::Backspace,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Resolved keybindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    bindings: Vec<(KeyCode, KeyAction)>,
}

impl KeyMap {
    pub fn from_config(config: &KeybindingConfig) -> Result<Self> {
        let groups = [
            (&config.move_next, KeyAction::MoveNext),
            (&config.move_prev, KeyAction::MovePrev),
            (&config.expand, KeyAction::Expand),
            (&config.collapse, KeyAction::Collapse),
            (&config.activate, KeyAction::Activate),
        ];

        let mut bindings = Vec::new();
        for (names, action) in groups {
            for name in names {
                let code = parse_key_name(name)
                    .ok_or_else(|| TreeNavError::Config(format!("Unknown key name: {}", name)))?;
                bindings.push((code, action));
            }
        }

        Ok(Self { bindings })
    }

    /// Action bound to `key`. Keys held with Ctrl or Alt are never bound.
    pub fn action_for(&self, key: &KeyEvent) -> Option<KeyAction> {
        if key.kind == KeyEventKind::Release
            || key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        self.bindings
            .iter()
            .find(|(code, _)| *code == key.code)
            .map(|(_, action)| *action)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_config(&KeybindingConfig::default()).unwrap_or_else(|_| Self {
            bindings: Vec::new(),
        })
    }
}

/// Feed a terminal event to the navigator. Returns true if the navigator changed.
pub fn handle_event(event: &Event, keymap: &KeyMap, navigator: &mut NavigatorState) -> bool {
    let Event::Key(key) = event else {
        return false;
    };

    match keymap.action_for(key) {
        Some(action) => {
            log::debug!("Key {:?} -> {:?}", key.code, action);
            navigator.handle_event(action.to_event())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, PinnedStore};
    use crate::tree::RawNode;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn create_navigator() -> NavigatorState {
        let forest = vec![
            RawNode::folder("docs", "docs", vec![RawNode::file("a", "a.txt")]),
            RawNode::file("b", "b.txt"),
        ];
        NavigatorState::new(&forest, Box::new(PinnedStore::with_default_key(MemoryStore::new())))
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!(parse_key_name("Down"), Some(KeyCode::Down));
        assert_eq!(parse_key_name("j"), Some(KeyCode::Char('j')));
        assert_eq!(parse_key_name("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key_name("jj"), None);
        assert_eq!(parse_key_name(""), None);
    }

    #[test]
    fn test_default_keymap_matches_config() {
        let from_config = KeyMap::from_config(&KeybindingConfig::default()).unwrap();
        assert_eq!(from_config, KeyMap::default());
    }

    #[test]
    fn test_unknown_key_name_is_rejected() {
        let mut config = KeybindingConfig::default();
        config.activate = vec!["hyper".to_string()];
        assert!(KeyMap::from_config(&config).is_err());
    }

    #[test]
    fn test_keys_drive_navigator() {
        let keymap = KeyMap::default();
        let mut navigator = create_navigator();

        assert!(handle_event(&key(KeyCode::Right), &keymap, &mut navigator));
        assert!(navigator.is_expanded("docs"));

        assert!(handle_event(&key(KeyCode::Char('j')), &keymap, &mut navigator));
        assert_eq!(navigator.focused_id(), Some("a"));

        assert!(handle_event(&key(KeyCode::Enter), &keymap, &mut navigator));
        assert_eq!(navigator.selection(), Some("a"));

        assert!(handle_event(&key(KeyCode::Up), &keymap, &mut navigator));
        assert!(handle_event(&key(KeyCode::Char('h')), &keymap, &mut navigator));
        assert!(!navigator.is_expanded("docs"));
    }

    #[test]
    fn test_unbound_and_modified_keys_are_ignored() {
        let keymap = KeyMap::default();
        let mut navigator = create_navigator();

        assert!(!handle_event(&key(KeyCode::Char('x')), &keymap, &mut navigator));
        let ctrl_j = Event::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL));
        assert!(!handle_event(&ctrl_j, &keymap, &mut navigator));
        assert!(!handle_event(&Event::FocusGained, &keymap, &mut navigator));
        assert_eq!(navigator.focus_index(), Some(0));
    }
}
