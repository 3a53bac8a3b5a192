//! Crypto trade extraction
//!
//! All patterns run on folded text. A symbol is either a ticker ("btc") or
//! a coin name mapped through [`COIN_NAMES`] ("bitcoin" → BTC).

use regex::Regex;
use std::sync::LazyLock;

use crate::extract::amount::parse_amount;
use crate::types::CryptoAction;

/// Tickers recognized on their own.
pub const TICKERS: &[&str] = &[
    "btc", "eth", "sol", "ada", "xrp", "doge", "dot", "bnb", "avax", "matic", "ltc", "usdt",
    "usdc", "atom", "shib", "pepe", "trx", "xlm",
];

/// Coin name fragment → ticker.
pub const COIN_NAMES: &[(&str, &str)] = &[
    ("bitcoins?", "BTC"),
    ("ethereum|ether", "ETH"),
    ("solana", "SOL"),
    ("cardano", "ADA"),
    ("ripple", "XRP"),
    ("dogecoin", "DOGE"),
    ("polkadot", "DOT"),
    ("avalanche", "AVAX"),
    ("polygon", "MATIC"),
    ("litecoin", "LTC"),
    ("chainlink", "LINK"),
    ("tether", "USDT"),
];

const QTY: &str = r"(\d+(?:[.,]\d+)?)";

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b({})\b", TICKERS.join("|"))).unwrap());

static NAME_TABLE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    COIN_NAMES
        .iter()
        .map(|(pattern, symbol)| (Regex::new(&format!(r"\b(?:{})\b", pattern)).unwrap(), *symbol))
        .collect()
});

/// Alternation of every asset word, tickers and names alike.
static ASSET_ALTS: LazyLock<String> = LazyLock::new(|| {
    TICKERS
        .iter()
        .copied()
        .chain(COIN_NAMES.iter().map(|(pattern, _)| *pattern))
        .collect::<Vec<_>>()
        .join("|")
});

static QTY_ASSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b{}\s*(?:{})\b", QTY, *ASSET_ALTS)).unwrap());

static ASSET_QTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b(?:{})\s+{}\b", *ASSET_ALTS, QTY)).unwrap());

static VERB_QTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:comprar|comprei|compra|vender|vendi|vende|dca)\s+{}\b",
        QTY
    ))
    .unwrap()
});

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?:@|\ba\b|\bpor\b)\s*{}\s*(€|eur(?:os?)?\b|usdt?\b|dolares\b|\$)",
        QTY
    ))
    .unwrap()
});

static SELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:vend\w*|sell|sold)\b").unwrap());

static SWAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:troc\w*|swap|convert\w*)\b").unwrap());

static BUY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:compr\w*|buy|bought|dca|invest\w*|acumul\w*)\b").unwrap());

static EUR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"€|\beur(?:os?)?\b").unwrap());

static USD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$|\busdt?\b|\bdolares\b").unwrap());

/// Everything the crypto evaluator reads off a signal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CryptoExtraction {
    pub action: CryptoAction,
    /// An explicit trade verb was present (Hold is the default otherwise).
    pub action_verb: bool,
    pub symbol: Option<String>,
    pub amount: Option<f64>,
    pub price: Option<f64>,
    pub quote_currency: Option<String>,
}

/// Extract a crypto trade from folded text.
pub fn extract_crypto(folded: &str) -> CryptoExtraction {
    let action = extract_action(folded);
    let price = PRICE_RE.captures(folded);

    let quote_currency = price
        .as_ref()
        .and_then(|c| c.get(2))
        .map(|m| quote_from_marker(m.as_str()))
        .or_else(|| extract_quote_currency(folded))
        .map(str::to_string);

    CryptoExtraction {
        action: action.unwrap_or_default(),
        action_verb: action.is_some(),
        symbol: extract_symbol(folded),
        amount: extract_quantity(folded),
        price: price
            .and_then(|c| c.get(1))
            .and_then(|m| parse_amount(m.as_str())),
        quote_currency,
    }
}

/// Upper-case ticker of the first asset mentioned.
pub fn extract_symbol(folded: &str) -> Option<String> {
    if let Some(m) = TICKER_RE.find(folded) {
        return Some(m.as_str().to_uppercase());
    }

    NAME_TABLE
        .iter()
        .find(|(re, _)| re.is_match(folded))
        .map(|(_, symbol)| symbol.to_string())
}

/// True when a ticker or coin name appears in the text.
pub fn mentions_asset(folded: &str) -> bool {
    TICKER_RE.is_match(folded) || NAME_TABLE.iter().any(|(re, _)| re.is_match(folded))
}

/// Trade direction; sell and swap verbs outrank buy verbs.
pub fn extract_action(folded: &str) -> Option<CryptoAction> {
    if SELL_RE.is_match(folded) {
        Some(CryptoAction::Sell)
    } else if SWAP_RE.is_match(folded) {
        Some(CryptoAction::Swap)
    } else if BUY_RE.is_match(folded) {
        Some(CryptoAction::Buy)
    } else {
        None
    }
}

fn extract_quantity(folded: &str) -> Option<f64> {
    [&*QTY_ASSET_RE, &*ASSET_QTY_RE, &*VERB_QTY_RE]
        .into_iter()
        .find_map(|re| {
            re.captures(folded)
                .and_then(|c| c.get(1))
                .and_then(|m| parse_amount(m.as_str()))
        })
}

fn extract_quote_currency(folded: &str) -> Option<&'static str> {
    if EUR_RE.is_match(folded) {
        Some("EUR")
    } else if USD_RE.is_match(folded) {
        Some("USD")
    } else {
        None
    }
}

fn quote_from_marker(marker: &str) -> &'static str {
    if marker == "€" || marker.starts_with("eur") {
        "EUR"
    } else {
        "USD"
    }
}
