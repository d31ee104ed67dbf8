pub mod client;
pub mod models;

pub use client::{ChatBackend, HttpChatBackend};
pub use models::{ChatReply, ChatRequest, Message, Role};
