use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::types::BotCommand;

static COMMAND_PATTERN: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^/([A-Za-z0-9_]+)(?:@([A-Za-z0-9_]+))?(?:\s|$)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Start,
  Help,
  SayHi,
  Status,
  Weather,
  Unknown(String),
}

impl Command {
  /// Maps a command name (without the leading slash) to a command.
  pub fn from_name(name: &str) -> Self {
    match name.to_ascii_lowercase().as_str() {
      "start" => Self::Start,
      "help" => Self::Help,
      "sayhi" => Self::SayHi,
      "status" => Self::Status,
      "weather" => Self::Weather,
      _ => Self::Unknown(name.to_string()),
    }
  }

  /// Commands advertised in the Telegram command menu.
  pub fn menu() -> Vec<BotCommand> {
    vec![
      BotCommand::new("start", "Greet the bot"),
      BotCommand::new("help", "Show all available commands"),
      BotCommand::new("sayhi", "Say hi"),
      BotCommand::new("status", "Get bot status"),
      BotCommand::new("weather", "Get current weather for an address"),
    ]
  }
}

/// A text message after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
  Command(Command),
  Text(String),
}

impl Incoming {
  /// Classifies a message for the bot named `bot_username`. Commands that
  /// mention a different bot yield `None`.
  pub fn from_text(text: &str, bot_username: &str) -> Option<Self> {
    if !text.starts_with('/') {
      return Some(Self::Text(text.to_string()));
    }
    let Some(caps) = COMMAND_PATTERN.captures(text) else {
      return Some(Self::Command(Command::Unknown(String::new())));
    };
    if let Some(mention) = caps.get(2)
      && !mention.as_str().eq_ignore_ascii_case(bot_username)
    {
      return None;
    }
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    Some(Self::Command(Command::from_name(name)))
  }
}
