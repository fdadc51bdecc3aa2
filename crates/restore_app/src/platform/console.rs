use restore_core::Msg;

/// One line typed at the panel prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Run,
    Scratch(bool),
    Hr(bool),
    Help,
    Quit,
}

pub const HELP: &str = "commands: open <path> | run | scratch on|off | hr on|off | help | quit";

/// Blank lines parse to `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "open" if rest.is_empty() => return Err("usage: open <path>".to_string()),
        "open" => Command::Open(rest.to_string()),
        "run" | "start" => Command::Run,
        "scratch" => Command::Scratch(parse_switch(word, rest)?),
        "hr" => Command::Hr(parse_switch(word, rest)?),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command `{other}`; {HELP}")),
    };
    Ok(Some(command))
}

fn parse_switch(word: &str, value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(format!("usage: {word} on|off")),
    }
}

impl Command {
    /// Message for the core, if this command maps to one.
    pub fn to_msg(&self) -> Option<Msg> {
        match self {
            Command::Open(path) => Some(Msg::InputSelected(Some(path.clone()))),
            Command::Run => Some(Msg::StartClicked),
            Command::Scratch(on) => Some(Msg::ScratchToggled(*on)),
            Command::Hr(on) => Some(Msg::HrToggled(*on)),
            Command::Help | Command::Quit => None,
        }
    }
}
