//! Conversation orchestrator — the entry point for every inbound message.
//!
//! Persists the user message, runs the reply chain, persists the assistant
//! message, and queues sentiment work. Errors never cross this boundary:
//! the caller always gets a reply, degraded to a static one in the worst
//! case.

use helpdeck_core::{Error, Result};
use helpdeck_respond::respond;
use helpdeck_store::{Chatbot, NewConversation, Role, SqliteStore};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};
use uuid::Uuid;

use crate::types::*;

/// Longest conversation title derived from the opening message.
const TITLE_MAX_CHARS: usize = 50;

const UNAVAILABLE_REPLY: &str =
    "Sorry, this assistant isn't available right now. Please try again later.";
const EMPTY_INPUT_REPLY: &str = "Please type a message so I can help.";
const TROUBLE_REPLY: &str =
    "I'm having trouble processing your request right now. Please try again in a moment.";

/// Coordinates the persist/reply/persist/queue sequence for one message.
pub struct Orchestrator {
    sentiment_tx: UnboundedSender<SentimentJob>,
}

impl Orchestrator {
    pub fn new(sentiment_tx: UnboundedSender<SentimentJob>) -> Self {
        Self { sentiment_tx }
    }

    /// Handle one inbound message end to end. Never returns an error and
    /// never panics on store failure; the reply text degrades instead.
    pub fn handle_message(
        &self,
        store: &SqliteStore,
        chatbot_id: i64,
        conversation: ConversationRef,
        text: &str,
    ) -> MessageOutcome {
        match self.try_handle(store, chatbot_id, conversation, text) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Message handling failed for chatbot {}: {}", chatbot_id, e);
                MessageOutcome::canned(TROUBLE_REPLY, 0.0)
            }
        }
    }

    fn try_handle(
        &self,
        store: &SqliteStore,
        chatbot_id: i64,
        conversation: ConversationRef,
        text: &str,
    ) -> Result<MessageOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(MessageOutcome::canned(EMPTY_INPUT_REPLY, 0.0));
        }

        let bot = match store.get_chatbot(chatbot_id)? {
            Some(bot) if bot.active => bot,
            _ => return Ok(MessageOutcome::canned(UNAVAILABLE_REPLY, 0.0)),
        };

        let (conversation_id, session_id) =
            self.resolve_conversation(store, &bot, conversation, trimmed)?;

        // User insert happens-before assistant insert happens-before
        // sentiment scheduling, within one conversation.
        let user_message_id = store.add_message(conversation_id, Role::User, trimmed)?;

        let chain = respond(store, &bot, trimmed);

        let assistant_message_id =
            store.add_message(conversation_id, Role::Assistant, &chain.reply.text)?;

        self.schedule_sentiment(SentimentJob {
            conversation_id,
            message_id: user_message_id,
            text: trimmed.to_string(),
        });

        Ok(MessageOutcome {
            reply: chain.reply,
            tier: Some(chain.tier),
            conversation_id: Some(conversation_id),
            session_id,
            user_message_id: Some(user_message_id),
            assistant_message_id: Some(assistant_message_id),
        })
    }

    fn resolve_conversation(
        &self,
        store: &SqliteStore,
        bot: &Chatbot,
        conversation: ConversationRef,
        first_message: &str,
    ) -> Result<(i64, Option<String>)> {
        match conversation {
            ConversationRef::Id(id) => {
                let conv = store
                    .get_conversation(id)?
                    .ok_or_else(|| Error::NotFound(format!("conversation {}", id)))?;
                if conv.chatbot_id != bot.id {
                    return Err(Error::NotFound(format!(
                        "conversation {} for chatbot {}",
                        id, bot.id
                    )));
                }
                Ok((conv.id, conv.session_id))
            }
            ConversationRef::Session(session) => {
                let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
                if let Some(conv) = store.find_conversation_by_session(bot.id, &session_id)? {
                    return Ok((conv.id, Some(session_id)));
                }
                let conversation_id = store.add_conversation(NewConversation {
                    chatbot_id: bot.id,
                    user_id: None,
                    session_id: Some(session_id.clone()),
                    title: conversation_title(first_message),
                    source: Some("widget".to_string()),
                })?;
                debug!(
                    "Created conversation {} for session {}",
                    conversation_id, session_id
                );
                Ok((conversation_id, Some(session_id)))
            }
        }
    }

    /// Queue sentiment work. The reply path never waits on the queue and a
    /// closed queue only costs the record.
    fn schedule_sentiment(&self, job: SentimentJob) {
        if self.sentiment_tx.send(job).is_err() {
            debug!("Sentiment queue closed, record skipped");
        }
    }
}

/// Derive a conversation title from the opening message.
fn conversation_title(message: &str) -> String {
    let mut title: String = message.chars().take(TITLE_MAX_CHARS).collect();
    if message.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// Run one queued sentiment job: tag the message text and persist the
/// record. A message that is already tagged reports `DuplicateContent`.
pub fn record_sentiment(store: &SqliteStore, job: &SentimentJob) -> Result<i64> {
    let tag = helpdeck_brain::tag(&job.text);
    store.add_sentiment(
        job.conversation_id,
        job.message_id,
        tag.sentiment.as_str(),
        tag.score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdeck_respond::Tier;
    use helpdeck_store::{DocumentStatus, NewChatbot, NewDocument};
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    fn test_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn test_orchestrator() -> (Orchestrator, UnboundedReceiver<SentimentJob>) {
        let (tx, rx) = unbounded_channel();
        (Orchestrator::new(tx), rx)
    }

    fn add_bot(store: &SqliteStore) -> i64 {
        store
            .add_chatbot(NewChatbot {
                account_id: "acct_1".into(),
                name: "Ava".into(),
                description: None,
                instructions: "Be helpful and friendly".into(),
                widget: None,
            })
            .unwrap()
    }

    fn add_processed_doc(store: &SqliteStore, chatbot_id: i64, content: &str) -> i64 {
        let doc_id = store
            .add_document(NewDocument {
                chatbot_id,
                name: Some("Doc".into()),
                url: None,
                content: content.into(),
            })
            .unwrap();
        store
            .set_document_content(doc_id, content, DocumentStatus::Processed)
            .unwrap();
        doc_id
    }

    #[test]
    fn test_greeting_round_trip() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);

        let outcome =
            orch.handle_message(&store, bot_id, ConversationRef::Session(None), "hello");

        assert_eq!(outcome.tier, Some(Tier::Native));
        assert_eq!(outcome.reply.confidence, 0.9);
        assert!(outcome.reply.text.starts_with("Hello! I'm Ava."));
        assert!(outcome.session_id.is_some());

        let conversation_id = outcome.conversation_id.unwrap();
        let messages = store.list_messages(conversation_id).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, outcome.reply.text);
        assert!(outcome.user_message_id.unwrap() < outcome.assistant_message_id.unwrap());
    }

    #[test]
    fn test_question_round_trip_with_document() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);
        add_processed_doc(
            &store,
            bot_id,
            "Our refund policy is 30 days from the date of purchase.",
        );

        let outcome = orch.handle_message(
            &store,
            bot_id,
            ConversationRef::Session(None),
            "what is your refund policy?",
        );

        assert_eq!(outcome.tier, Some(Tier::Native));
        assert_eq!(outcome.reply.confidence, 0.8);
        assert!(outcome.reply.text.contains("30 days"));
    }

    #[test]
    fn test_session_reuses_conversation() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);

        let first = orch.handle_message(
            &store,
            bot_id,
            ConversationRef::Session(Some("sess_1".into())),
            "hello",
        );
        let second = orch.handle_message(
            &store,
            bot_id,
            ConversationRef::Session(Some("sess_1".into())),
            "what about pricing?",
        );

        assert_eq!(first.conversation_id, second.conversation_id);
        assert_eq!(second.session_id.as_deref(), Some("sess_1"));
        let messages = store.list_messages(first.conversation_id.unwrap()).unwrap();
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn test_conversation_by_id() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);
        let conversation_id = store
            .add_conversation(NewConversation {
                chatbot_id: bot_id,
                user_id: Some("user_1".into()),
                session_id: None,
                title: "Support chat".into(),
                source: Some("dashboard".into()),
            })
            .unwrap();

        let outcome = orch.handle_message(
            &store,
            bot_id,
            ConversationRef::Id(conversation_id),
            "hi there",
        );

        assert_eq!(outcome.conversation_id, Some(conversation_id));
        assert!(outcome.session_id.is_none());
        assert_eq!(store.list_messages(conversation_id).unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_conversation_degrades_to_static_reply() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);

        let outcome =
            orch.handle_message(&store, bot_id, ConversationRef::Id(9999), "hello");

        assert!(outcome.reply.text.contains("having trouble processing"));
        assert_eq!(outcome.reply.confidence, 0.0);
        assert!(outcome.tier.is_none());
        assert_eq!(store.count_messages().unwrap(), 0);
    }

    #[test]
    fn test_missing_chatbot_gets_apology() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();

        let outcome =
            orch.handle_message(&store, 42, ConversationRef::Session(None), "hello");

        assert!(outcome.reply.text.starts_with("Sorry, this assistant isn't available"));
        assert_eq!(outcome.reply.confidence, 0.0);
        assert!(outcome.conversation_id.is_none());
        assert_eq!(store.count_conversations().unwrap(), 0);
    }

    #[test]
    fn test_inactive_chatbot_gets_apology() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);
        store
            .update_chatbot(
                bot_id,
                helpdeck_store::ChatbotUpdate {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let outcome =
            orch.handle_message(&store, bot_id, ConversationRef::Session(None), "hello");

        assert!(outcome.reply.text.starts_with("Sorry, this assistant isn't available"));
        assert_eq!(store.count_messages().unwrap(), 0);
    }

    #[test]
    fn test_blank_input_prompts_without_persisting() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);

        for input in ["", "   ", "\n\t"] {
            let outcome =
                orch.handle_message(&store, bot_id, ConversationRef::Session(None), input);
            assert_eq!(outcome.reply.text, EMPTY_INPUT_REPLY);
            assert!(outcome.conversation_id.is_none());
        }
        assert_eq!(store.count_conversations().unwrap(), 0);
        assert_eq!(store.count_messages().unwrap(), 0);
    }

    #[test]
    fn test_sentiment_job_queued_and_recorded() {
        let (store, _dir) = test_store();
        let (orch, mut rx) = test_orchestrator();
        let bot_id = add_bot(&store);

        let outcome = orch.handle_message(
            &store,
            bot_id,
            ConversationRef::Session(None),
            "this is great, thanks!",
        );

        let job = rx.try_recv().unwrap();
        assert_eq!(job.message_id, outcome.user_message_id.unwrap());
        assert_eq!(job.conversation_id, outcome.conversation_id.unwrap());
        assert_eq!(job.text, "this is great, thanks!");

        record_sentiment(&store, &job).unwrap();
        let record = store
            .get_sentiment_for_message(job.message_id)
            .unwrap()
            .unwrap();
        assert_eq!(record.sentiment, "positive");
        assert_eq!(record.score, 0.7);
    }

    #[test]
    fn test_sentiment_recorded_at_most_once() {
        let (store, _dir) = test_store();
        let (orch, mut rx) = test_orchestrator();
        let bot_id = add_bot(&store);

        orch.handle_message(&store, bot_id, ConversationRef::Session(None), "terrible, broken");
        let job = rx.try_recv().unwrap();

        record_sentiment(&store, &job).unwrap();
        assert!(record_sentiment(&store, &job).is_err());
        assert_eq!(store.count_sentiments().unwrap(), 1);
    }

    #[test]
    fn test_closed_sentiment_queue_does_not_fail_reply() {
        let (store, _dir) = test_store();
        let (orch, rx) = test_orchestrator();
        drop(rx);
        let bot_id = add_bot(&store);

        let outcome =
            orch.handle_message(&store, bot_id, ConversationRef::Session(None), "hello");
        assert_eq!(outcome.tier, Some(Tier::Native));
        assert_eq!(store.count_messages().unwrap(), 2);
    }

    #[test]
    fn test_title_truncated_from_long_first_message() {
        let (store, _dir) = test_store();
        let (orch, _rx) = test_orchestrator();
        let bot_id = add_bot(&store);

        let long = "please tell me absolutely everything about the warranty on the deluxe model";
        let outcome =
            orch.handle_message(&store, bot_id, ConversationRef::Session(None), long);

        let conv = store
            .get_conversation(outcome.conversation_id.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(conv.title.chars().count(), TITLE_MAX_CHARS + 3);
        assert!(conv.title.ends_with("..."));
        assert!(long.starts_with(conv.title.trim_end_matches("...")));
        assert_eq!(conv.source.as_deref(), Some("widget"));
    }
}
