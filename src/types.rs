//! Core types for signal dispatch
//!
//! Inputs arrive from upstream collaborators (normalizer, OCR), outputs are
//! consumed by the concrete modules or the conversational fallback. All of
//! them serialize with camelCase fields so they can be exchanged as JSON and
//! persisted verbatim by the audit log.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Input
// ============================================================================

/// Where a signal came from. Only affects small confidence boosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Voice,
    Text,
    Ocr,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Voice => "voice",
            SignalType::Text => "text",
            SignalType::Ocr => "ocr",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields read off a receipt by the OCR subsystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrTraceInput {
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// One unit of user input submitted for routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherInput {
    pub signal_type: SignalType,
    /// Lower-cased and trimmed by the upstream normalizer.
    pub normalized_text: String,
    #[serde(default)]
    pub ocr_trace: Option<OcrTraceInput>,
}

impl DispatcherInput {
    pub fn new(signal_type: SignalType, normalized_text: impl Into<String>) -> Self {
        Self {
            signal_type,
            normalized_text: normalized_text.into(),
            ocr_trace: None,
        }
    }

    pub fn text(normalized_text: impl Into<String>) -> Self {
        Self::new(SignalType::Text, normalized_text)
    }

    pub fn voice(normalized_text: impl Into<String>) -> Self {
        Self::new(SignalType::Voice, normalized_text)
    }

    pub fn with_ocr_trace(mut self, trace: OcrTraceInput) -> Self {
        self.ocr_trace = Some(trace);
        self
    }
}

// ============================================================================
// Decision
// ============================================================================

/// Downstream module a signal can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    Finance,
    Todo,
    Crypto,
    Links,
    /// Open-ended conversational assistant, the fallback for anything
    /// that is not an actionable command.
    DeepDive,
}

impl ModuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleId::Finance => "finance",
            ModuleId::Todo => "todo",
            ModuleId::Crypto => "crypto",
            ModuleId::Links => "links",
            ModuleId::DeepDive => "deep_dive",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Module used whenever the dispatcher declines to pick an evaluator.
pub const FALLBACK_MODULE: ModuleId = ModuleId::DeepDive;

/// How the chosen module should be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Act immediately on the module choice.
    TacticalReflex,
    /// Defer to the slower conversational handler.
    SemanticDeepDive,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::TacticalReflex => "tactical_reflex",
            Strategy::SemanticDeepDive => "semantic_deep_dive",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Extracted fields
// ============================================================================

/// Which merchant pipeline stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactBrand,
    GenericPlace,
    Fuzzy,
    Preposition,
    OcrTrace,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::ExactBrand => "exact_brand",
            MatchType::GenericPlace => "generic_place",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Preposition => "preposition",
            MatchType::OcrTrace => "ocr_trace",
        }
    }
}

/// A merchant found in the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantMatch {
    pub name: String,
    pub match_type: MatchType,
    /// "Did you mean" target when the match was fuzzy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_canonical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy_distance: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletHintSource {
    /// Matched a known payment-method alias.
    Alias,
    /// Captured from "com o/a <name>"; the caller resolves it against the
    /// user's own wallets.
    Verbatim,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletHint {
    pub hint: String,
    pub source: WalletHintSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CryptoAction {
    Buy,
    Sell,
    Swap,
    #[default]
    Hold,
}

impl CryptoAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CryptoAction::Buy => "buy",
            CryptoAction::Sell => "sell",
            CryptoAction::Swap => "swap",
            CryptoAction::Hold => "hold",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceFields {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub merchant: Option<String>,
    pub merchant_meta: Option<MerchantMatch>,
    /// Spending category of a recognized merchant or place.
    pub category: Option<String>,
    pub wallet: Option<WalletHint>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFields {
    pub title: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoFields {
    pub action: CryptoAction,
    pub symbol: Option<String>,
    pub amount: Option<f64>,
    pub price: Option<f64>,
    pub quote_currency: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinksFields {
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Fields extracted for exactly one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedFields {
    Finance(FinanceFields),
    Todo(TodoFields),
    Crypto(CryptoFields),
    Links(LinksFields),
    #[default]
    None,
}

impl ExtractedFields {
    pub fn module(&self) -> Option<ModuleId> {
        match self {
            ExtractedFields::Finance(_) => Some(ModuleId::Finance),
            ExtractedFields::Todo(_) => Some(ModuleId::Todo),
            ExtractedFields::Crypto(_) => Some(ModuleId::Crypto),
            ExtractedFields::Links(_) => Some(ModuleId::Links),
            ExtractedFields::None => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExtractedFields::None)
    }

    pub fn as_finance(&self) -> Option<&FinanceFields> {
        match self {
            ExtractedFields::Finance(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_todo(&self) -> Option<&TodoFields> {
        match self {
            ExtractedFields::Todo(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_crypto(&self) -> Option<&CryptoFields> {
        match self {
            ExtractedFields::Crypto(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_links(&self) -> Option<&LinksFields> {
        match self {
            ExtractedFields::Links(f) => Some(f),
            _ => None,
        }
    }
}

// ============================================================================
// Evaluation and result
// ============================================================================

/// Score produced by one module evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEvaluation {
    pub module: ModuleId,
    /// Always within `[0, 1]`.
    pub confidence: f32,
    pub strict_parameters_met: bool,
    /// Append-only audit trail of every scoring decision.
    pub reason: Vec<String>,
    pub extracted: ExtractedFields,
}

/// Public output of [`crate::IntentDispatcher::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherResult {
    pub module: ModuleId,
    pub strategy: Strategy,
    pub confidence: f32,
    pub reason: Vec<String>,
    pub strict_parameters_met: bool,
    pub extracted: ExtractedFields,
}

impl DispatcherResult {
    /// Result handed to the conversational fallback with nothing extracted.
    pub fn deflected(reason: Vec<String>) -> Self {
        Self {
            module: FALLBACK_MODULE,
            strategy: Strategy::SemanticDeepDive,
            confidence: 0.0,
            reason,
            strict_parameters_met: false,
            extracted: ExtractedFields::None,
        }
    }

    pub fn is_reflex(&self) -> bool {
        self.strategy == Strategy::TacticalReflex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_deserializes_camel_case() {
        let json = r#"{
            "signalType": "ocr",
            "normalizedText": "continente 12,50",
            "ocrTrace": { "merchant": "Continente", "confidence": 0.9 }
        }"#;
        let input: DispatcherInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.signal_type, SignalType::Ocr);
        let trace = input.ocr_trace.unwrap();
        assert_eq!(trace.merchant.as_deref(), Some("Continente"));
        assert_eq!(trace.amount, None);
    }

    #[test]
    fn test_extracted_fields_tagged() {
        let fields = ExtractedFields::Todo(TodoFields {
            title: Some("ligar ao seguro".to_string()),
            keywords: vec!["lembra-me".to_string()],
        });
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["kind"], "todo");
        assert_eq!(value["title"], "ligar ao seguro");
        assert_eq!(fields.module(), Some(ModuleId::Todo));

        let none = serde_json::to_value(ExtractedFields::None).unwrap();
        assert_eq!(none["kind"], "none");
    }

    #[test]
    fn test_deflected_result() {
        let result = DispatcherResult::deflected(vec!["gatekeeper".to_string()]);
        assert_eq!(result.module, FALLBACK_MODULE);
        assert_eq!(result.strategy, Strategy::SemanticDeepDive);
        assert_eq!(result.confidence, 0.0);
        assert!(result.extracted.is_empty());
        assert!(!result.is_reflex());
    }

    #[test]
    fn test_match_type_serializes_snake_case() {
        let value = serde_json::to_value(MatchType::ExactBrand).unwrap();
        assert_eq!(value, "exact_brand");
        assert_eq!(MatchType::OcrTrace.as_str(), "ocr_trace");
    }
}
