//! Three-tier reply chain: native retrieval, instruction templates, generic.
//!
//! A tier hands off to the next one only when it errors or produces empty
//! text. Low confidence never triggers a downgrade. The generic tier is
//! infallible, so the chain always yields a reply.

use helpdeck_brain::{classify, extract_keywords, Intent};
use helpdeck_store::Chatbot;
use serde::Serialize;
use tracing::warn;

use crate::compose::{compose, Reply};
use crate::retrieve::{search, DocumentSource, DEFAULT_LIMIT};
use helpdeck_core::Result;

/// Which tier of the chain produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Native,
    Template,
    Generic,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Template => "template",
            Self::Generic => "generic",
        }
    }
}

/// A reply together with the tier that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ChainOutcome {
    pub reply: Reply,
    pub tier: Tier,
}

/// Run the reply chain for one user message.
pub fn respond(source: &dyn DocumentSource, bot: &Chatbot, message: &str) -> ChainOutcome {
    let intent = classify(message);

    match native_reply(source, bot, intent, message) {
        Ok(reply) if !reply.text.trim().is_empty() => {
            return ChainOutcome {
                reply,
                tier: Tier::Native,
            };
        }
        Ok(_) => warn!("Native reply was empty. Falling back to template."),
        Err(e) => warn!("Native reply failed: {}. Falling back to template.", e),
    }

    let reply = template_reply(bot, intent, message);
    if !reply.text.trim().is_empty() {
        return ChainOutcome {
            reply,
            tier: Tier::Template,
        };
    }
    warn!("Template reply was empty. Falling back to generic.");

    ChainOutcome {
        reply: generic_reply(bot, message),
        tier: Tier::Generic,
    }
}

// ---------------------------------------------------------------
// Tier 1: retrieval-backed composition
// ---------------------------------------------------------------

fn native_reply(
    source: &dyn DocumentSource,
    bot: &Chatbot,
    intent: Intent,
    message: &str,
) -> Result<Reply> {
    let keywords = extract_keywords(message);
    let query = if keywords.is_empty() {
        message.trim().to_lowercase()
    } else {
        keywords.join(" ")
    };
    let documents = search(source, bot.id, &query, DEFAULT_LIMIT)?;
    Ok(compose(intent, bot, &documents, &keywords))
}

// ---------------------------------------------------------------
// Tier 2: instruction-driven templates
// ---------------------------------------------------------------

fn template_reply(bot: &Chatbot, intent: Intent, message: &str) -> Reply {
    let persona = persona_line(bot);
    let text = match intent {
        Intent::Greeting => format!(
            "Hello! I'm {}. {} How can I help you today?",
            bot.name, persona
        ),
        Intent::Question => match keyword_overlap(bot, message) {
            Some(kw) => format!(
                "Good question! That touches on \"{}\", which is right up my alley. {}",
                kw, persona
            ),
            None => format!("Let me help as best I can. A bit about what I do: {}", persona),
        },
        Intent::Help => format!(
            "I'm here to help! {} What do you need assistance with?",
            persona
        ),
        Intent::General => match keyword_overlap(bot, message) {
            Some(kw) => format!("\"{}\" is something I can speak to. {}", kw, persona),
            None => format!(
                "Thanks for reaching out! {} What would you like to know?",
                persona
            ),
        },
    };

    Reply {
        text,
        confidence: 0.4,
        sources: Vec::new(),
    }
}

/// The bot's instructions as a presentable sentence, or a stock line when
/// no instructions were configured.
fn persona_line(bot: &Chatbot) -> String {
    let trimmed = bot.instructions.trim();
    if trimmed.is_empty() {
        return "I'm here to help with your questions.".to_string();
    }
    let mut line = trimmed.to_string();
    if !line.ends_with(['.', '!', '?']) {
        line.push('.');
    }
    line
}

/// First message keyword that also appears in the bot's instructions.
fn keyword_overlap(bot: &Chatbot, message: &str) -> Option<String> {
    let instruction_keywords = extract_keywords(&bot.instructions);
    extract_keywords(message)
        .into_iter()
        .find(|kw| instruction_keywords.contains(kw))
}

// ---------------------------------------------------------------
// Tier 3: generic acknowledgement
// ---------------------------------------------------------------

fn generic_reply(bot: &Chatbot, message: &str) -> Reply {
    let domain = bot.instructions.to_lowercase();
    let quoted = excerpt(message, 140);

    let text = if domain.contains("customer service") || domain.contains("support") {
        format!(
            "Thanks for reaching out! You mentioned: \"{}\". I want to make sure you \
             get the right help, so could you share a few more details about your issue?",
            quoted
        )
    } else if domain.contains("sales") || domain.contains("product") {
        format!(
            "Thanks for your interest! Regarding \"{}\", I'd be happy to tell you more. \
             Which part matters most to you?",
            quoted
        )
    } else if domain.contains("technical") {
        format!(
            "Let's figure this out together. You asked: \"{}\". Could you describe \
             what you're seeing, step by step?",
            quoted
        )
    } else {
        format!(
            "Thanks for your message! You said: \"{}\". Could you tell me a little \
             more so I can point you in the right direction?",
            quoted
        )
    };

    Reply {
        text,
        confidence: 0.3,
        sources: Vec::new(),
    }
}

fn excerpt(message: &str, max_chars: usize) -> String {
    let trimmed = message.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
