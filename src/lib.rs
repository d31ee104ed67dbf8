//! Client core for VetChat: a phone-number session gate in front of a
//! chat conversation with the VetChat backend.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod phone;
pub mod session;
pub mod storage;

pub use api::{ChatBackend, ChatReply, ChatRequest, HttpChatBackend, Message, Role};
pub use config::{Config, IdentityMode};
pub use conversation::{Conversation, Exchange, Outcome, FALLBACK_REPLY};
pub use error::{ConfigError, SessionError, StoreError, TransportError, ValidationError};
pub use phone::PhoneNumber;
pub use session::{Session, SessionState};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore, PHONE_KEY};
