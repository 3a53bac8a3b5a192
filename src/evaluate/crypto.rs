//! Crypto evaluator (trade logging)
//!
//! | Component | Weight |
//! |---|---|
//! | keyword density | 0.34 |
//! | symbol | 0.26 |
//! | action verb | 0.20 |
//! | quantity | 0.12 |
//! | price | 0.08 |
//! | voice origin | +0.04 |
//!
//! Strict when the signal is about crypto (keyword or symbol) and says
//! what happened (action verb or symbol).

use std::sync::LazyLock;

use super::{clamp_unit, flag, ModuleEvaluator, PreparedSignal, Trail, KEYWORD_SATURATION};
use crate::extract::crypto::{extract_action, extract_crypto};
use crate::lexicon::{density, Lexicon};
use crate::types::{CryptoFields, ExtractedFields, ModuleEvaluation, ModuleId};

pub const W_KEYWORDS: f32 = 0.34;
pub const W_SYMBOL: f32 = 0.26;
pub const W_ACTION: f32 = 0.20;
pub const W_AMOUNT: f32 = 0.12;
pub const W_PRICE: f32 = 0.08;
pub const W_VOICE: f32 = 0.04;

pub static CRYPTO_KEYWORDS: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "crypto",
        &[
            "cripto(?:moedas?)?",
            "crypto",
            "moedas?",
            "tokens?",
            "exchange",
            "binance",
            "coinbase",
            "kraken",
            "staking",
            "portfolio",
            "portefolio",
            "hodl",
            "dca",
            "altcoins?",
        ],
    )
});

#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoEvaluator;

impl ModuleEvaluator for CryptoEvaluator {
    fn module(&self) -> ModuleId {
        ModuleId::Crypto
    }

    fn mentions_intent(&self, folded: &str) -> bool {
        CRYPTO_KEYWORDS.any(folded) || extract_action(folded).is_some()
    }

    fn evaluate(&self, signal: &PreparedSignal<'_>) -> ModuleEvaluation {
        let mut trail = Trail::new(ModuleId::Crypto);

        let keywords = CRYPTO_KEYWORDS.matches(&signal.folded);
        let trade = extract_crypto(&signal.folded);

        trail.note("keyword_hits", keywords.len());
        if let Some(symbol) = &trade.symbol {
            trail.note("symbol", symbol);
        }
        if trade.action_verb {
            trail.note("action", trade.action.as_str());
        }
        if let Some(amount) = trade.amount {
            trail.note("amount", amount);
        }
        if let Some(price) = trade.price {
            trail.note("price", price);
        }

        let has_symbol = trade.symbol.is_some();
        let keyword_score = W_KEYWORDS * density(keywords.len(), KEYWORD_SATURATION);
        let symbol_score = W_SYMBOL * flag(has_symbol);
        let action_score = W_ACTION * flag(trade.action_verb);
        let amount_score = W_AMOUNT * flag(trade.amount.is_some());
        let price_score = W_PRICE * flag(trade.price.is_some());
        let voice_score = W_VOICE * flag(signal.is_voice());

        trail.score("keyword_score", keyword_score);
        trail.score("symbol_score", symbol_score);
        trail.score("action_score", action_score);
        trail.score("amount_score", amount_score);
        trail.score("price_score", price_score);
        if signal.is_voice() {
            trail.score("voice_score", voice_score);
        }

        let confidence = clamp_unit(
            keyword_score + symbol_score + action_score + amount_score + price_score + voice_score,
        );
        let strict = (!keywords.is_empty() || has_symbol) && (trade.action_verb || has_symbol);
        trail.score("confidence", confidence);
        trail.note("strict", strict);

        ModuleEvaluation {
            module: ModuleId::Crypto,
            confidence,
            strict_parameters_met: strict,
            reason: trail.into_entries(),
            extracted: ExtractedFields::Crypto(CryptoFields {
                action: trade.action,
                symbol: trade.symbol,
                amount: trade.amount,
                price: trade.price,
                quote_currency: trade.quote_currency,
                keywords,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CryptoAction, DispatcherInput};

    fn evaluate(input: &DispatcherInput) -> ModuleEvaluation {
        CryptoEvaluator.evaluate(&PreparedSignal::new(input))
    }

    #[test]
    fn test_full_trade() {
        let eval = evaluate(&DispatcherInput::text("comprei 0,5 btc na binance a 60000 eur"));
        // .17 keyword + .26 symbol + .20 action + .12 amount + .08 price
        assert!((eval.confidence - 0.83).abs() < 1e-4);
        assert!(eval.strict_parameters_met);

        let fields = eval.extracted.as_crypto().unwrap();
        assert_eq!(fields.action, CryptoAction::Buy);
        assert_eq!(fields.symbol.as_deref(), Some("BTC"));
        assert_eq!(fields.amount, Some(0.5));
        assert_eq!(fields.price, Some(60000.0));
        assert_eq!(fields.quote_currency.as_deref(), Some("EUR"));
        assert_eq!(fields.keywords, vec!["binance"]);
    }

    #[test]
    fn test_symbol_alone_is_strict_hold() {
        let eval = evaluate(&DispatcherInput::text("eth"));
        assert!(eval.strict_parameters_met);
        assert_eq!(eval.extracted.as_crypto().unwrap().action, CryptoAction::Hold);
        assert!((eval.confidence - W_SYMBOL).abs() < 1e-4);
    }

    #[test]
    fn test_keyword_without_action_is_not_strict() {
        let eval = evaluate(&DispatcherInput::text("staking rende bem"));
        assert!(!eval.strict_parameters_met);
    }

    #[test]
    fn test_keyword_with_action_is_strict() {
        let eval = evaluate(&DispatcherInput::text("vendi tudo na exchange"));
        assert!(eval.strict_parameters_met);
        assert_eq!(eval.extracted.as_crypto().unwrap().action, CryptoAction::Sell);
    }

    #[test]
    fn test_nothing_crypto() {
        let eval = evaluate(&DispatcherInput::text("o gato dorme"));
        assert_eq!(eval.confidence, 0.0);
        assert!(!eval.strict_parameters_met);
    }
}
