pub mod commands;
pub mod context;
pub mod handlers;
pub mod reply;
pub mod router;
pub mod state;

pub type HandlerResult = anyhow::Result<()>;

pub use commands::Command;
pub use context::AppContext;
pub use handlers::build_schema;
pub use state::InMemPendingStore;
