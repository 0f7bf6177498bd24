mod command_registry;
mod intent_parser;
mod router;
mod session;

pub use command_registry::CHAT_HELP_COMMANDS;
pub use intent_parser::{parse_intent, Intent};
pub use router::RequestRouter;
pub use session::{ChatSession, ContentKind, Message, Role, SubmitRejection};
