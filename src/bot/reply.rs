use teloxide::utils::html;

use crate::models::ResolvedLocation;
use crate::models::WeatherReport;
use crate::upstream::LookupError;
use crate::util::full_name;

pub const START_TEXT: &str = "Hello! Welcome to Astronomia Bot. Type /help to see all available commands.";
pub const HELP_TEXT: &str = "Type /sayhi to say hi.\nType /status to get bot status.\nType /weather to get current weather information.\nType /help to see all available commands.";
pub const STATUS_TEXT: &str = "I'm ok. Thanks for asking anyway. 🙂";
pub const WEATHER_PROMPT: &str = "What is the address you want to know the weather of?";
pub const UNKNOWN_COMMAND_TEXT: &str = "I don't know that command.";

/// Outbound text plus whether it should be sent with HTML parse mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
  pub text: String,
  pub html: bool,
}

impl Reply {
  pub fn plain(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      html: false,
    }
  }

  pub fn html(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      html: true,
    }
  }
}

/// Who a greeting is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatProfile {
  Group { title: String },
  Direct { first_name: String, last_name: Option<String> },
}

impl ChatProfile {
  /// Group profile, named after the sender when the chat has no title.
  pub fn group(title: Option<&str>, sender_first_name: &str, sender_last_name: Option<&str>) -> Self {
    let title = match title.map(str::trim).filter(|title| !title.is_empty()) {
      Some(title) => title.to_string(),
      None => full_name(sender_first_name, sender_last_name),
    };
    Self::Group { title }
  }
}

pub fn greeting(chat: &ChatProfile) -> String {
  match chat {
    ChatProfile::Group { title } => format!("Hi {title}! What a nice group chat, innit?"),
    ChatProfile::Direct { first_name, last_name } => {
      format!("Hi {}! Have a good day!", full_name(first_name, last_name.as_deref()))
    },
  }
}

pub fn weather_report(
  first_name: &str,
  last_name: Option<&str>,
  location: &ResolvedLocation,
  report: &WeatherReport,
) -> Reply {
  let mut text = format!(
    "Hi {}!\n\nWeather in <b>{}</b> is {}, with temperature of {:.2} degree Celsius.",
    html::escape(&full_name(first_name, last_name)),
    html::escape(&location.formatted_address),
    html::escape(&report.description),
    report.temperature_c,
  );
  if let Some(feels_like) = report.feels_like_c {
    text.push_str(&format!("\nFeels like {feels_like:.2} degree Celsius."));
  }
  if let Some(humidity) = report.humidity_pct {
    text.push_str(&format!("\nHumidity: {humidity}%."));
  }
  Reply::html(text)
}

pub fn apology(err: &LookupError) -> Reply {
  Reply::plain(format!(
    "Thousand apologies! It appears that {}. Please try another location!",
    err.user_message()
  ))
}
