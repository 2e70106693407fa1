use tracing::info;
use tracing::instrument;
use tracing::warn;

use crate::bot::commands::Command;
use crate::bot::context::AppContext;
use crate::bot::reply;
use crate::bot::reply::ChatProfile;
use crate::bot::reply::Reply;
use crate::bot::state::PendingKey;

/// Sender names used to address the weather report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderName {
  pub first_name: String,
  pub last_name: Option<String>,
}

/// Handles a command. Any command abandons a pending `/weather` request
/// before being handled; `/weather` then opens a new one.
#[instrument(skip(ctx, chat))]
pub fn route_command(ctx: &AppContext, key: PendingKey, command: &Command, chat: &ChatProfile) -> String {
  if ctx.pending().clear_pending(key) {
    info!("abandoned pending weather request");
  }

  match command {
    Command::Start => reply::START_TEXT.to_string(),
    Command::Help => reply::HELP_TEXT.to_string(),
    Command::SayHi => reply::greeting(chat),
    Command::Status => reply::STATUS_TEXT.to_string(),
    Command::Weather => {
      ctx.pending().set_pending(key);
      reply::WEATHER_PROMPT.to_string()
    },
    Command::Unknown(_) => reply::UNKNOWN_COMMAND_TEXT.to_string(),
  }
}

/// Handles free text. Returns `None` when the sender has no pending
/// `/weather` request; otherwise the request is consumed and a reply is
/// always produced, even when the lookup fails.
#[instrument(skip(ctx, sender))]
pub async fn route_text(ctx: &AppContext, key: PendingKey, sender: &SenderName, text: &str) -> Option<Reply> {
  if !ctx.pending().clear_pending(key) {
    return None;
  }

  let address = text.trim();
  let reply = match ctx.weather().lookup(address).await {
    Ok((location, report)) => {
      reply::weather_report(&sender.first_name, sender.last_name.as_deref(), &location, &report)
    },
    Err(err) => {
      warn!(error = %err, "weather lookup failed");
      reply::apology(&err)
    },
  };
  Some(reply)
}
