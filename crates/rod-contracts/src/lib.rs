pub mod chat;
pub mod events;
pub mod profile;
pub mod theme;
