//! Pricing-intent detection over user chat text.

/// Keywords that signal the user is asking about price.
const PRICING_KEYWORDS: [&str; 5] =
  ["quote", "price", "how much", "cost", "rate"];

/// Case-insensitive substring match against the pricing keyword list.
pub fn pricing_intent(message: &str) -> bool {
  let lowered = message.to_lowercase();
  PRICING_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}
