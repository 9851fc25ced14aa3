//! The conversation service: one user turn in, one assistant reply out.
//!
//! Every invocation writes exactly two history rows — the user turn and the
//! assistant turn — even when the provider call fails and the canned
//! fallback is persisted instead.

use hearth_core::{intent::pricing_intent, message::Role, store::LeadStore};

use crate::completion::{CompletionClient, PromptMessage, PromptRole};

/// How many recent turns (including the one just appended) are replayed to
/// the provider.
const HISTORY_WINDOW: usize = 6;

/// Fixed instructions sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "\
You are a professional home insurance assistant. Help users with:
1. Insurance information and quotes
2. Coverage explanations
3. Risk assessment guidance
4. Premium estimations

Always be helpful, professional, and suggest speaking with licensed agents.
When users ask for quotes, collect: location, home value, and contact info.
Never give financial advice - recommend consulting professionals.";

/// Returned in place of a reply when the provider call fails.
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble \
processing your request. Please try again or use our quick quote form.";

/// Appended to replies to pricing-intent messages. Transport-only: the
/// persisted transcript never contains it.
pub const QUOTE_CTA: &str = "\n\n**Need actual quotes?** Provide your email \
for quotes from our partner carriers.";

/// Run one conversation turn for `session_id`.
///
/// Store failures abort the request; provider failures are absorbed into
/// [`FALLBACK_REPLY`].
pub async fn respond<S, C>(
  store:        &S,
  completion:   &C,
  session_id:   &str,
  user_message: &str,
) -> Result<String, S::Error>
where
  S: LeadStore,
  C: CompletionClient,
{
  store
    .append_message(session_id, Role::User, user_message)
    .await?;

  let history = store.recent_messages(session_id, HISTORY_WINDOW).await?;

  let mut messages = Vec::with_capacity(history.len() + 1);
  messages.push(PromptMessage {
    role:    PromptRole::System,
    content: SYSTEM_PROMPT.to_string(),
  });
  for turn in &history {
    messages.push(PromptMessage {
      role: match turn.role {
        Role::User => PromptRole::User,
        Role::Assistant => PromptRole::Assistant,
      },
      content: turn.text.clone(),
    });
  }

  let mut reply = match completion.complete(&messages).await {
    Ok(text) => text,
    Err(err) => {
      tracing::error!("completion failed: {err}");
      FALLBACK_REPLY.to_string()
    }
  };

  store
    .append_message(session_id, Role::Assistant, &reply)
    .await?;

  // The transcript is final at this point; the suffix only reaches the
  // transport layer.
  if pricing_intent(user_message) {
    reply.push_str(QUOTE_CTA);
  }

  Ok(reply)
}
