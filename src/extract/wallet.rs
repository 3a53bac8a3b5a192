//! Wallet / payment-method hints
//!
//! Known aliases are tried in table order (first hit wins), so the more
//! specific phrases ("cartao de refeicao") sit above the generic ones
//! ("cartao"). When nothing matches, "com o/a <name>" is captured verbatim
//! and left for the caller to resolve against the user's own wallets.

use regex::Regex;
use std::sync::LazyLock;

use crate::text::fold;
use crate::types::{WalletHint, WalletHintSource};

/// (hint, alias pattern) in priority order.
const WALLET_ALIASES: &[(&str, &str)] = &[
    ("revolut", r"revolut"),
    ("mbway", r"mb\s*way"),
    (
        "meal_card",
        r"cart[a-z]*\s+(?:de\s+)?refeicao|ticket\s+restaurant|edenred|coverflex|pluxee",
    ),
    ("debit_card", r"cartao\s+de\s+debito|debito"),
    ("credit_card", r"cartao\s+de\s+credito|credito"),
    ("multibanco", r"multibanco|atm"),
    ("cash", r"dinheiro|numerario|cash|notas|em\s+especie|trocos"),
    ("transfer", r"transferencia|iban|mb\s*net"),
    ("paypal", r"paypal"),
    ("wise", r"wise"),
    ("n26", r"n26"),
    ("card", r"cartao"),
];

static WALLET_TABLE: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    WALLET_ALIASES
        .iter()
        .map(|(hint, pattern)| (*hint, Regex::new(&format!(r"\b(?:{})\b", pattern)).unwrap()))
        .collect()
});

static COM_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bcom\s+(?:o|a)\s+([\p{L}\d][\p{L}\d'-]*(?:\s+[\p{L}\d][\p{L}\d'-]*)?)").unwrap()
});

/// Words that end a verbatim wallet name.
const NAME_BOUNDARY: &[&str] = &["hoje", "ontem", "no", "na", "em", "de", "e", "para", "por"];

/// Detect how the user paid.
pub fn extract_wallet(text: &str) -> Option<WalletHint> {
    let folded = fold(text);

    if let Some((hint, _)) = WALLET_TABLE.iter().find(|(_, re)| re.is_match(&folded)) {
        return Some(WalletHint {
            hint: (*hint).to_string(),
            source: WalletHintSource::Alias,
        });
    }

    let caps = COM_NAME_RE.captures(text)?;
    let name = caps
        .get(1)?
        .as_str()
        .split_whitespace()
        .take_while(|w| !NAME_BOUNDARY.contains(w) && !w.chars().any(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        return None;
    }

    Some(WalletHint {
        hint: name,
        source: WalletHintSource::Verbatim,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alias(text: &str) -> String {
        let hint = extract_wallet(text).unwrap();
        assert_eq!(hint.source, WalletHintSource::Alias);
        hint.hint
    }

    #[test]
    fn test_known_aliases() {
        assert_eq!(alias("paguei 5 eur com revolut"), "revolut");
        assert_eq!(alias("paguei por mb way"), "mbway");
        assert_eq!(alias("paguei com mbway"), "mbway");
        assert_eq!(alias("levantei no multibanco"), "multibanco");
        assert_eq!(alias("paguei em dinheiro"), "cash");
        assert_eq!(alias("fiz uma transferência"), "transfer");
        assert_eq!(alias("paguei com paypal"), "paypal");
    }

    #[test]
    fn test_specific_cards_before_generic() {
        assert_eq!(alias("almoco com o cartão refeição"), "meal_card");
        assert_eq!(alias("almoco com cartao de refeicao"), "meal_card");
        assert_eq!(alias("paguei com cartão de crédito"), "credit_card");
        assert_eq!(alias("paguei com cartao de debito"), "debit_card");
        assert_eq!(alias("paguei com o cartao"), "card");
    }

    #[test]
    fn test_verbatim_fallback() {
        let hint = extract_wallet("gastei 10 eur com a conta conjunta hoje").unwrap();
        assert_eq!(hint.source, WalletHintSource::Verbatim);
        assert_eq!(hint.hint, "conta conjunta");
    }

    #[test]
    fn test_no_wallet() {
        assert!(extract_wallet("gastei 10 eur no lidl").is_none());
        assert!(extract_wallet("").is_none());
    }

    #[test]
    fn test_word_boundaries() {
        // "wise" inside "otherwise" and "notas" inside "anotas" do not count
        assert!(extract_wallet("otherwise").is_none());
        assert!(extract_wallet("anotas isso").is_none());
    }
}
