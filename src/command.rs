use crate::error::{Result, TreeNavError};
use crate::event::{parse_key_name, KeyMap};
use crate::navigator::{NavigatorEvent, NavigatorState};
use crossterm::event::{Event, KeyEvent, KeyModifiers};

/// Script commands understood by `execute`
///
/// Scripts are plain text, one command per line:
/// - `down` / `up` / `right` / `left` / `enter` - the five keyboard actions
/// - `select:<id>`, `open:<id>` (select and reveal), `reveal:<id>`
/// - `toggle:<id>`, `pin:<id>`
/// - `search:<text>` sets the query (rest of the line, verbatim), `clear` empties it
/// - `key:<name>` sends a key through the configured keybindings
/// - `# comment` and blank lines are ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveNext,
    MovePrev,
    Expand,
    Collapse,
    Activate,
    Select(String),
    Open(String),
    Reveal(String),
    Toggle(String),
    Pin(String),
    Search(String),
    ClearSearch,
    Key(String),

    // Multi-step commands for testing
    Sequence(Vec<Command>),
}

impl Command {
    /// Parse a command from a string representation
    pub fn from_string(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "move_next" | "next" | "down" => return Ok(Command::MoveNext),
            "move_prev" | "prev" | "up" => return Ok(Command::MovePrev),
            "expand" | "right" => return Ok(Command::Expand),
            "collapse" | "left" => return Ok(Command::Collapse),
            "activate" | "enter" => return Ok(Command::Activate),
            "clear" | "clear_search" | "escape" => return Ok(Command::ClearSearch),
            _ => {}
        }

        // Search text is taken verbatim so leading/trailing spaces reach the filter
        if let Some((prefix, text)) = s.trim_start().split_once(':') {
            if prefix.eq_ignore_ascii_case("search") {
                return Ok(Command::Search(text.to_string()));
            }
        }

        let s = s.trim();
        if let Some((prefix, arg)) = s.split_once(':') {
            let arg = arg.trim();
            let with_id = |make: fn(String) -> Command| -> Result<Command> {
                if arg.is_empty() {
                    Err(TreeNavError::Command(format!("Missing id in command: {}", s)))
                } else {
                    Ok(make(arg.to_string()))
                }
            };

            match prefix.to_ascii_lowercase().as_str() {
                "select" => return with_id(Command::Select),
                "open" => return with_id(Command::Open),
                "reveal" => return with_id(Command::Reveal),
                "toggle" => return with_id(Command::Toggle),
                "pin" => return with_id(Command::Pin),
                "key" => {
                    if parse_key_name(arg).is_none() {
                        return Err(TreeNavError::Command(format!("Unknown key: {}", arg)));
                    }
                    return Ok(Command::Key(arg.to_string()));
                }
                _ => {}
            }
        }

        const SEQUENCE_PREFIX: &str = "sequence:[";
        let is_sequence = s
            .get(..SEQUENCE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SEQUENCE_PREFIX));
        if is_sequence && s.ends_with(']') {
            // Parse sequence: sequence:[cmd1,cmd2,cmd3]
            let inner = &s[SEQUENCE_PREFIX.len()..s.len() - 1];
            if inner.trim().is_empty() {
                return Ok(Command::Sequence(vec![]));
            }

            let commands = inner
                .split(',')
                .map(|cmd_str| {
                    Command::from_string(cmd_str).map_err(|e| {
                        TreeNavError::Command(format!(
                            "Invalid command in sequence '{}': {}",
                            cmd_str.trim(),
                            e
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Command::Sequence(commands));
        }

        Err(TreeNavError::Command(format!("Unknown command: {}", s)))
    }

    /// Convert command to string representation
    pub fn to_string(&self) -> String {
        match self {
            Command::MoveNext => "move_next".to_string(),
            Command::MovePrev => "move_prev".to_string(),
            Command::Expand => "expand".to_string(),
            Command::Collapse => "collapse".to_string(),
            Command::Activate => "activate".to_string(),
            Command::Select(id) => format!("select:{}", id),
            Command::Open(id) => format!("open:{}", id),
            Command::Reveal(id) => format!("reveal:{}", id),
            Command::Toggle(id) => format!("toggle:{}", id),
            Command::Pin(id) => format!("pin:{}", id),
            Command::Search(text) => format!("search:{}", text),
            Command::ClearSearch => "clear".to_string(),
            Command::Key(name) => format!("key:{}", name),
            Command::Sequence(commands) => {
                format!(
                    "sequence:[{}]",
                    commands
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                )
            }
        }
    }

    /// Apply to the navigator; returns whether anything changed
    pub fn apply(&self, navigator: &mut NavigatorState, keymap: &KeyMap) -> bool {
        let event = match self {
            Command::MoveNext => NavigatorEvent::MoveNext,
            Command::MovePrev => NavigatorEvent::MovePrev,
            Command::Expand => NavigatorEvent::Expand,
            Command::Collapse => NavigatorEvent::Collapse,
            Command::Activate => NavigatorEvent::Activate,
            Command::Select(id) => NavigatorEvent::Select(id.clone()),
            Command::Open(id) => NavigatorEvent::SelectAndReveal(id.clone()),
            Command::Reveal(id) => NavigatorEvent::Reveal(id.clone()),
            Command::Toggle(id) => NavigatorEvent::ToggleFolder(id.clone()),
            Command::Pin(id) => NavigatorEvent::TogglePin(id.clone()),
            Command::Search(text) => NavigatorEvent::SetQuery(text.clone()),
            Command::ClearSearch => NavigatorEvent::ClearQuery,
            Command::Key(name) => {
                let Some(code) = parse_key_name(name) else {
                    return false;
                };
                let key = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
                return crate::event::handle_event(&key, keymap, navigator);
            }
            Command::Sequence(commands) => {
                // Every command runs; no short-circuit on an unchanged step
                return commands
                    .iter()
                    .fold(false, |changed, c| c.apply(navigator, keymap) | changed);
            }
        };
        navigator.handle_event(event)
    }
}

/// Parse a script, skipping blank lines and `#` comments
pub fn parse_script(content: &str) -> Result<Vec<Command>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(line_num, line)| {
            Command::from_string(line).map_err(|e| {
                TreeNavError::Command(format!("line {}: {}", line_num + 1, e))
            })
        })
        .collect()
}
