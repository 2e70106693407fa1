use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::Chat;
use teloxide::types::ChatId;
use teloxide::types::Me;
use teloxide::types::Message;
use teloxide::types::ParseMode;
use teloxide::types::User;
use tracing::debug;
use tracing::info;
use tracing::instrument;

use crate::bot::HandlerResult;
use crate::bot::commands::Command;
use crate::bot::commands::Incoming;
use crate::bot::context::AppContext;
use crate::bot::reply::ChatProfile;
use crate::bot::reply::Reply;
use crate::bot::router;
use crate::bot::router::SenderName;
use crate::bot::state::PendingKey;

type SharedContext = Arc<AppContext>;

pub fn build_schema() -> UpdateHandler<anyhow::Error> {
  Update::filter_message()
    .filter_map(|msg: Message, me: Me| {
      msg
        .text()
        .and_then(|text| Incoming::from_text(text, me.username()))
    })
    .branch(dptree::case![Incoming::Command(command)].endpoint(handle_command))
    .branch(dptree::case![Incoming::Text(text)].endpoint(handle_text))
}

#[instrument(skip(bot, ctx, msg))]
async fn handle_command(bot: Bot, ctx: SharedContext, msg: Message, command: Command) -> HandlerResult {
  let Some(user) = msg.from.as_ref() else {
    debug!(chat_id = %msg.chat.id, "command without sender ignored");
    return Ok(());
  };
  info!(
    user_id = user.id.0,
    chat_id = %msg.chat.id,
    username = user.username.as_deref().unwrap_or("-"),
    text = msg.text().unwrap_or_default(),
    "received command"
  );

  let key = PendingKey::new(user.id, msg.chat.id);
  let text = router::route_command(&ctx, key, &command, &chat_profile(&msg.chat, user));
  send_reply(&bot, msg.chat.id, Reply::plain(text)).await
}

#[instrument(skip(bot, ctx, msg, text))]
async fn handle_text(bot: Bot, ctx: SharedContext, msg: Message, text: String) -> HandlerResult {
  let Some(user) = msg.from.as_ref() else {
    return Ok(());
  };
  info!(
    user_id = user.id.0,
    chat_id = %msg.chat.id,
    username = user.username.as_deref().unwrap_or("-"),
    text = %text,
    "received text"
  );

  let key = PendingKey::new(user.id, msg.chat.id);
  let sender = SenderName {
    first_name: user.first_name.clone(),
    last_name: user.last_name.clone(),
  };
  match router::route_text(&ctx, key, &sender, &text).await {
    Some(reply) => send_reply(&bot, msg.chat.id, reply).await,
    None => {
      debug!(user_id = user.id.0, chat_id = %msg.chat.id, "no pending weather request, message dropped");
      Ok(())
    },
  }
}

async fn send_reply(bot: &Bot, chat: ChatId, reply: Reply) -> HandlerResult {
  let request = bot.send_message(chat, reply.text.clone());
  if reply.html {
    request.parse_mode(ParseMode::Html).await?;
  } else {
    request.await?;
  }
  info!(chat_id = %chat, text = %reply.text, "sent reply");
  Ok(())
}

fn chat_profile(chat: &Chat, sender: &User) -> ChatProfile {
  if chat.is_group() || chat.is_supergroup() {
    return ChatProfile::group(chat.title(), &sender.first_name, sender.last_name.as_deref());
  }
  match chat.first_name() {
    Some(first_name) => ChatProfile::Direct {
      first_name: first_name.to_string(),
      last_name: chat.last_name().map(str::to_string),
    },
    None => ChatProfile::Direct {
      first_name: sender.first_name.clone(),
      last_name: sender.last_name.clone(),
    },
  }
}
