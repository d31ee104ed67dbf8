use async_trait::async_trait;
use vetchat::{
    ChatBackend, ChatReply, ChatRequest, Conversation, KeyValueStore, MemoryStore, Message,
    Session, SessionError, SqliteStore, TransportError, PHONE_KEY,
};

#[derive(Clone)]
struct Echo;

#[async_trait]
impl ChatBackend for Echo {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        Ok(ChatReply {
            reply: format!("{} from {}", request.message, request.phone.as_deref().unwrap_or("nobody")),
        })
    }
}

#[tokio::test]
async fn restored_session_chats_with_saved_identity() {
    let mut store = MemoryStore::new();
    store.set(PHONE_KEY, "(555) 123-4567").unwrap();

    let session = Session::restore(store);
    let phone = session.identity().cloned().expect("restored without prompting");
    let mut conv = Conversation::identified(Echo, phone);
    let _ = conv.send("hello").await;
    assert_eq!(
        conv.transcript().last(),
        Some(&Message::bot("hello from (555) 123-4567"))
    );
}

#[test]
fn fresh_start_login_flow() {
    let mut session = Session::restore(MemoryStore::new());
    assert!(!session.is_authenticated());

    session.update_draft("555-12");
    assert!(matches!(session.login_with_draft(), Err(SessionError::Validation(_))));
    assert!(!session.is_authenticated());

    let phone = session.login("555-123-4567").unwrap();
    assert_eq!(phone.as_str(), "(555) 123-4567");
    let store = session.into_store();
    assert_eq!(store.get(PHONE_KEY).unwrap().as_deref(), Some("(555) 123-4567"));
}

#[test]
fn sqlite_backed_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite");

    let mut first = Session::restore(SqliteStore::open(&path).unwrap());
    first.login("(212) 555 0199").unwrap();
    drop(first);

    let second = Session::restore(SqliteStore::open(&path).unwrap());
    assert_eq!(second.identity().unwrap().as_str(), "(212) 555-0199");
}

#[tokio::test]
async fn anonymous_conversation_needs_no_session() {
    let mut conv = Conversation::anonymous(Echo);
    let _ = conv.send("hi").await;
    assert_eq!(conv.transcript().last(), Some(&Message::bot("hi from nobody")));
    assert!(conv.identity().is_none());
}
