//! The chat transcript and the request/reply cycle.
//!
//! Sending happens in three steps so the UI can render in between:
//! [`Conversation::submit`] records the user message and marks the
//! conversation pending, [`Exchange::run`] talks to the backend (possibly on
//! another runtime), and [`Conversation::settle`] appends the bot reply.

use crate::api::client::ChatBackend;
use crate::api::models::{ChatRequest, Message};
use crate::phone::PhoneNumber;

/// Bot message shown whenever the backend cannot produce a reply.
pub const FALLBACK_REPLY: &str = "⚠️ Server error, try again later.";

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    Reply(String),
    Fallback,
}

impl Outcome {
    /// Text of the bot message this outcome produces.
    pub fn content(&self) -> &str {
        match self {
            Outcome::Reply(reply) => reply,
            Outcome::Fallback => FALLBACK_REPLY,
        }
    }
}

/// One request in flight. Owns everything it needs, so it can be moved onto
/// a worker runtime.
#[must_use = "an exchange does nothing until run"]
pub struct Exchange<B> {
    backend: B,
    request: ChatRequest,
}

impl<B: ChatBackend> Exchange<B> {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Perform the request. Failures are logged and turned into
    /// [`Outcome::Fallback`].
    pub async fn run(self) -> Outcome {
        match self.backend.chat(&self.request).await {
            Ok(reply) => Outcome::Reply(reply.reply),
            Err(e) => {
                log::error!("chat request failed: {e}");
                Outcome::Fallback
            }
        }
    }
}

pub struct Conversation<B> {
    backend: B,
    identity: Option<PhoneNumber>,
    messages: Vec<Message>,
    draft: String,
    in_flight: usize,
}

impl<B: ChatBackend + Clone> Conversation<B> {
    /// With an identity every request carries the phone number; without one
    /// the field is left out.
    pub fn new(backend: B, identity: Option<PhoneNumber>) -> Self {
        Self {
            backend,
            identity,
            messages: Vec::new(),
            draft: String::new(),
            in_flight: 0,
        }
    }

    pub fn anonymous(backend: B) -> Self {
        Self::new(backend, None)
    }

    pub fn identified(backend: B, identity: PhoneNumber) -> Self {
        Self::new(backend, Some(identity))
    }

    /// Queue `text` for sending.
    ///
    /// Blank text is ignored and yields `None`. Otherwise the user message is
    /// appended, the draft cleared and the conversation marked pending until
    /// the matching [`settle`](Self::settle).
    ///
    /// Every returned exchange must end in exactly one `settle` call, even if
    /// it is never run (settle it with [`Outcome::Fallback`]). Dropping it
    /// unsettled leaves the conversation pending and the user message without
    /// a reply.
    pub fn submit(&mut self, text: &str) -> Option<Exchange<B>> {
        if text.trim().is_empty() {
            return None;
        }
        self.messages.push(Message::user(text));
        self.draft.clear();
        self.in_flight += 1;
        Some(Exchange {
            backend: self.backend.clone(),
            request: ChatRequest {
                message: text.to_string(),
                phone: self.identity.as_ref().map(|p| p.as_str().to_string()),
            },
        })
    }

    /// Submit whatever is in the input draft.
    pub fn submit_draft(&mut self) -> Option<Exchange<B>> {
        let text = self.draft.clone();
        self.submit(&text)
    }

    /// Append the bot message for a finished exchange.
    pub fn settle(&mut self, outcome: Outcome) -> &Message {
        self.messages.push(Message::bot(outcome.content()));
        self.in_flight = self.in_flight.saturating_sub(1);
        &self.messages[self.messages.len() - 1]
    }

    /// Submit, run and settle in one go.
    pub async fn send(&mut self, text: &str) -> Option<Outcome> {
        let exchange = self.submit(text)?;
        let outcome = exchange.run().await;
        self.settle(outcome.clone());
        Some(outcome)
    }

    pub fn transcript(&self) -> &[Message] {
        &self.messages
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn identity(&self) -> Option<&PhoneNumber> {
        self.identity.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{ChatReply, Role};
    use crate::error::TransportError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeBackend {
        reply: Option<String>,
        seen: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl FakeBackend {
        fn replying(text: &str) -> Self {
            Self { reply: Some(text.to_string()), ..Self::default() }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn seen(&self) -> Vec<ChatRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Some(reply) => Ok(ChatReply { reply: reply.clone() }),
                None => Err(TransportError::Status(503)),
            }
        }
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("5551234567").unwrap()
    }

    #[tokio::test]
    async fn reply_is_appended_after_user_message() {
        let mut conv = Conversation::identified(FakeBackend::replying("hi there"), phone());
        let outcome = conv.send("hello").await;
        assert_eq!(outcome, Some(Outcome::Reply("hi there".into())));
        assert_eq!(
            conv.transcript(),
            &[Message::user("hello"), Message::bot("hi there")]
        );
        assert!(!conv.is_pending());
    }

    #[tokio::test]
    async fn failure_substitutes_fallback() {
        let mut conv = Conversation::anonymous(FakeBackend::failing());
        let outcome = conv.send("ping").await;
        assert_eq!(outcome, Some(Outcome::Fallback));
        let last = conv.transcript().last().unwrap();
        assert_eq!(last.role, Role::Bot);
        assert_eq!(last.content, FALLBACK_REPLY);
        assert!(!conv.is_pending());
    }

    #[tokio::test]
    async fn blank_text_is_a_no_op() {
        let backend = FakeBackend::replying("unused");
        let mut conv = Conversation::anonymous(backend.clone());
        conv.set_draft("   ");
        assert!(conv.send("").await.is_none());
        assert!(conv.send("   ").await.is_none());
        assert!(conv.submit_draft().is_none());
        assert!(conv.transcript().is_empty());
        assert!(!conv.is_pending());
        assert_eq!(conv.draft(), "   ");
        assert!(backend.seen().is_empty());
    }

    #[tokio::test]
    async fn pending_spans_submit_to_settle() {
        let mut conv = Conversation::anonymous(FakeBackend::replying("pong"));
        conv.set_draft("ping");
        let exchange = conv.submit_draft().unwrap();
        assert!(conv.is_pending());
        assert_eq!(conv.draft(), "");
        assert_eq!(conv.transcript(), &[Message::user("ping")]);

        let outcome = exchange.run().await;
        assert!(conv.is_pending());
        assert_eq!(conv.settle(outcome), &Message::bot("pong"));
        assert!(!conv.is_pending());
    }

    #[test]
    fn unsettled_exchange_keeps_conversation_pending() {
        let mut conv = Conversation::anonymous(FakeBackend::replying("unused"));
        drop(conv.submit("hi"));
        assert!(conv.is_pending());
        conv.settle(Outcome::Fallback);
        assert!(!conv.is_pending());
        assert_eq!(
            conv.transcript(),
            &[Message::user("hi"), Message::bot(FALLBACK_REPLY)]
        );
    }

    #[tokio::test]
    async fn overlapping_exchanges_each_get_a_reply() {
        let mut conv = Conversation::anonymous(FakeBackend::replying("ok"));
        let first = conv.submit("one").unwrap();
        let second = conv.submit("two").unwrap();
        assert_eq!(first.request().message, "one");
        assert_eq!(second.request().message, "two");

        let out = second.run().await;
        conv.settle(out);
        assert!(conv.is_pending());
        let out = first.run().await;
        conv.settle(out);
        assert!(!conv.is_pending());

        let roles: Vec<Role> = conv.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::User, Role::User, Role::Bot, Role::Bot]);
    }

    #[tokio::test]
    async fn phone_is_sent_only_when_identified() {
        let backend = FakeBackend::replying("ok");
        let mut anon = Conversation::anonymous(backend.clone());
        let mut known = Conversation::identified(backend.clone(), phone());
        let _ = anon.send("a").await;
        let _ = known.send("b").await;

        let seen = backend.seen();
        assert_eq!(seen[0], ChatRequest { message: "a".into(), phone: None });
        assert_eq!(
            seen[1],
            ChatRequest { message: "b".into(), phone: Some("(555) 123-4567".into()) }
        );
    }

    #[tokio::test]
    async fn snapshot_is_detached() {
        let mut conv = Conversation::anonymous(FakeBackend::replying("ok"));
        let _ = conv.send("hi").await;
        let mut copy = conv.snapshot();
        copy.clear();
        assert_eq!(conv.transcript().len(), 2);
    }

    #[tokio::test]
    async fn text_is_kept_verbatim() {
        let mut conv = Conversation::anonymous(FakeBackend::replying("ok"));
        let _ = conv.send("  padded  ").await;
        assert_eq!(conv.transcript()[0].content, "  padded  ");
    }
}
