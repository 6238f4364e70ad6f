//! Natural-language fallback routing for `message/send` when no DataPart
//! carries an explicit `skill`.
//!
//! This is a best-effort default, not a claim of completeness: the upstream
//! AdCP spec leaves the exact keyword set unspecified, and a real deployment
//! would swap this table for an intent classifier or an LLM-backed router.
//! Keeping it a flat constant table, rather than hiding it behind config,
//! makes that swap-point obvious at the call site.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ProductsDiscovery,
    Pricing,
    Targeting,
    MediaBuyCreation,
    CapabilitiesHelp,
}

pub const KEYWORDS: &[(&str, Intent)] = &[
    ("product", Intent::ProductsDiscovery),
    ("inventory", Intent::ProductsDiscovery),
    ("catalog", Intent::ProductsDiscovery),
    ("price", Intent::Pricing),
    ("pricing", Intent::Pricing),
    ("rate card", Intent::Pricing),
    ("target", Intent::Targeting),
    ("audience", Intent::Targeting),
    ("geo", Intent::Targeting),
    ("media buy", Intent::MediaBuyCreation),
    ("campaign", Intent::MediaBuyCreation),
    ("book", Intent::MediaBuyCreation),
    ("help", Intent::CapabilitiesHelp),
    ("what can you do", Intent::CapabilitiesHelp),
];

/// Matches the first keyword found in `text` (case-insensitive), in table
/// order. Falls back to [`Intent::CapabilitiesHelp`] when nothing matches,
/// since an unroutable message is best answered with what the agent can do.
pub fn route(text: &str) -> Intent {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::CapabilitiesHelp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_on_first_matching_keyword() {
        assert_eq!(route("show me your product catalog"), Intent::ProductsDiscovery);
        assert_eq!(route("what's your pricing for video?"), Intent::Pricing);
        assert_eq!(route("book a campaign for next month"), Intent::MediaBuyCreation);
    }

    #[test]
    fn unmatched_text_falls_back_to_help() {
        assert_eq!(route("good morning"), Intent::CapabilitiesHelp);
    }
}
