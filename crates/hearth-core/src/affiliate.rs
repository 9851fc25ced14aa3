//! Affiliate partner URLs.
//!
//! Clicks are attributed through a fixed agent code baked into each partner's
//! base URL. Unknown partner slugs fall back to the default partner's bare
//! site.

/// Base URL used when a track request names an unknown partner.
pub const FALLBACK_URL: &str = "https://www.thezebra.com";

/// The partner carriers we hold affiliate agreements with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partner {
  TheZebra,
  PolicyGenius,
  Lemonade,
}

impl Partner {
  /// Resolve a URL path slug. Unknown slugs return `None`.
  pub fn from_slug(slug: &str) -> Option<Self> {
    match slug {
      "thezebra" => Some(Self::TheZebra),
      "policygenius" => Some(Self::PolicyGenius),
      "lemonade" => Some(Self::Lemonade),
      _ => None,
    }
  }

  /// The partner's landing URL, already carrying the agent code.
  pub fn base_url(&self) -> &'static str {
    match self {
      Self::TheZebra => "https://www.thezebra.com/?agent=INSURANCEBOT",
      Self::PolicyGenius => "https://www.policygenius.com/?ref=INSURANCEBOT",
      Self::Lemonade => "https://www.lemonade.com/landing/ref-INSURANCEBOT",
    }
  }
}

/// Append a query parameter, joining with `?` or `&` depending on whether
/// the URL already carries a query string.
fn push_param(url: &mut String, key: &str, value: &str) {
  url.push(if url.contains('?') { '&' } else { '?' });
  url.push_str(key);
  url.push('=');
  url.push_str(value);
}

/// The redirect target for a tracked click on `slug`, with optional
/// attribution parameters appended.
pub fn tracking_url(
  slug: &str,
  email: Option<&str>,
  source: Option<&str>,
) -> String {
  let mut url = match Partner::from_slug(slug) {
    Some(partner) => partner.base_url().to_string(),
    None => FALLBACK_URL.to_string(),
  };
  if let Some(email) = email {
    push_param(&mut url, "email", email);
  }
  if let Some(source) = source {
    push_param(&mut url, "source", source);
  }
  url
}

/// The signup link handed back after a lead is captured from the quote form.
pub fn signup_link(email: &str) -> String {
  let mut url = Partner::TheZebra.base_url().to_string();
  push_param(&mut url, "email", email);
  push_param(&mut url, "source", "chatbot");
  url
}
