use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::bot;
use crate::bot::AppContext;
use crate::bot::Command;
use crate::config::WebhookConfig;

pub struct App {
  bot: Bot,
  context: Arc<AppContext>,
  handler: UpdateHandler<anyhow::Error>,
  webhook: Option<WebhookConfig>,
}

impl App {
  pub fn new(bot: Bot, context: AppContext, webhook: Option<WebhookConfig>) -> Self {
    let handler = bot::build_schema();
    Self {
      bot,
      context: Arc::new(context),
      handler,
      webhook,
    }
  }

  pub async fn run(self) -> anyhow::Result<()> {
    let me = self.bot.get_me().await?;
    info!(username = me.username(), "bot authorized");

    if let Err(err) = self.bot.set_my_commands(Command::menu()).await {
      warn!(error = %err, "failed to register command menu");
    }

    let mut dispatcher = Dispatcher::builder(self.bot.clone(), self.handler)
      .dependencies(dptree::deps![self.context.clone(), me])
      .default_handler(|update| async move {
        debug!(update_id = ?update.id, "ignoring unsupported update");
      })
      .enable_ctrlc_handler()
      .build();

    match self.webhook {
      None => {
        info!("listening for updates with long polling");
        dispatcher.dispatch().await;
      },
      Some(webhook) => {
        info!(url = %webhook.url, addr = %webhook.addr, "listening for updates on webhook");
        let listener = webhooks::axum(self.bot.clone(), webhooks::Options::new(webhook.addr, webhook.url)).await?;
        dispatcher
          .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("an error from the webhook listener"),
          )
          .await;
      },
    }

    Ok(())
  }
}
