//! End-to-end dispatcher scenarios
//!
//! Each test drives the public API only: build a dispatcher, evaluate one
//! input, inspect the result.

use signal_dispatch::{
    DispatcherConfig, DispatcherInput, DispatcherResult, ExtractedFields, IntentDispatcher,
    MatchType, ModuleEvaluation, ModuleEvaluator, ModuleId, OcrTraceInput, PreparedSignal,
    SignalType, Strategy, ThresholdPolicy, FALLBACK_MODULE,
};

fn dispatch(text: &str) -> DispatcherResult {
    IntentDispatcher::default().evaluate(&DispatcherInput::text(text))
}

fn assert_deflected(result: &DispatcherResult) {
    assert_eq!(result.module, FALLBACK_MODULE);
    assert_eq!(result.strategy, Strategy::SemanticDeepDive);
    assert_eq!(result.confidence, 0.0);
    assert!(!result.strict_parameters_met);
    assert!(result.extracted.is_empty());
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_greeting_is_deflected() {
    let result = IntentDispatcher::default().evaluate(&DispatcherInput::voice("ola"));
    assert_deflected(&result);
    assert!(result.reason.contains(&"gatekeeper=conversational".to_string()));
    assert!(result
        .reason
        .contains(&"gatekeeper.signal=pattern:greeting".to_string()));
}

#[test]
fn test_expense_with_brand_is_reflex() {
    let result = dispatch("cria despesa de 36 eur no continente");
    assert_eq!(result.module, ModuleId::Finance);
    assert_eq!(result.strategy, Strategy::TacticalReflex);
    assert!(result.strict_parameters_met);

    let fields = result.extracted.as_finance().expect("finance fields");
    assert_eq!(fields.amount, Some(36.0));
    assert_eq!(fields.currency.as_deref(), Some("EUR"));
    assert_eq!(fields.merchant.as_deref(), Some("Continente"));
    assert_eq!(
        fields.merchant_meta.as_ref().map(|m| m.match_type),
        Some(MatchType::ExactBrand)
    );
}

#[test]
fn test_receipt_typo_is_fuzzy_merchant() {
    let result = dispatch("recibo pngo doce 23.4");
    assert_eq!(result.module, ModuleId::Finance);

    let meta = result
        .extracted
        .as_finance()
        .and_then(|f| f.merchant_meta.as_ref())
        .expect("merchant metadata");
    assert_eq!(meta.match_type, MatchType::Fuzzy);
    assert_eq!(meta.fuzzy_canonical.as_deref(), Some("Pingo Doce"));
    assert!(matches!(meta.fuzzy_distance, Some(1) | Some(2)));
}

#[test]
fn test_plain_short_sentence_is_deflected() {
    let result = dispatch("o gato dorme");
    assert_deflected(&result);
    assert!(result
        .reason
        .contains(&"gatekeeper.signal=short_message".to_string()));
}

#[test]
fn test_reminder_is_strict_todo() {
    let result = dispatch("lembra-me ligar ao seguro amanha");
    assert_eq!(result.module, ModuleId::Todo);
    assert!(result.strict_parameters_met);
    assert_eq!(
        result.extracted.as_todo().and_then(|t| t.title.as_deref()),
        Some("ligar ao seguro amanha")
    );
}

// ============================================================================
// Gates and thresholds
// ============================================================================

#[test]
fn test_low_confidence_fallback() {
    let result = dispatch("o gato preto dorme muito bem");
    assert_deflected(&result);
    assert!(result.reason.contains(&"gatekeeper=pass".to_string()));
    assert!(result.reason.contains(&"low_confidence_fallback".to_string()));
    assert!(result.reason.contains(&"rejected_module=todo".to_string()));
    assert!(result.reason.contains(&"rejected_confidence=0.10".to_string()));
}

#[test]
fn test_greeting_does_not_hide_a_command() {
    let result = dispatch("ola, paguei 5 eur no lidl");
    assert_eq!(result.module, ModuleId::Finance);
    assert!(result.reason.contains(&"gatekeeper=pass".to_string()));
}

#[test]
fn test_strict_below_threshold_is_deep_dive() {
    let result = dispatch("recibo pngo doce 23.4");
    assert!(result.strict_parameters_met);
    assert!(result.confidence < 0.75);
    assert_eq!(result.module, ModuleId::Finance);
    assert_eq!(result.strategy, Strategy::SemanticDeepDive);
}

#[test]
fn test_lower_threshold_turns_strict_match_into_reflex() {
    let dispatcher = IntentDispatcher::new(0.7);
    let result = dispatcher.evaluate(&DispatcherInput::text("recibo pngo doce 23.4"));
    assert_eq!(result.strategy, Strategy::TacticalReflex);
}

#[test]
fn test_threshold_clamped_into_range() {
    let dispatcher = IntentDispatcher::new(4.0);
    assert_eq!(dispatcher.reflex_threshold(), 1.0);

    // Full-score strict finance still reaches a threshold of exactly 1
    let result =
        dispatcher.evaluate(&DispatcherInput::text("cria despesa: paguei 36 eur no continente"));
    assert_eq!(result.strategy, Strategy::TacticalReflex);
    assert!(result.reason.contains(&"reflex_threshold=1.00".to_string()));
}

#[test]
fn test_config_reject_policy() {
    let config = DispatcherConfig {
        reflex_threshold: -1.0,
        threshold_policy: ThresholdPolicy::Reject,
    };
    assert!(IntentDispatcher::from_config(&config).is_err());

    let config = DispatcherConfig::load_from_str("reflex_threshold: 0.6").unwrap();
    let dispatcher = IntentDispatcher::from_config(&config).unwrap();
    assert_eq!(dispatcher.reflex_threshold(), 0.6);
}

#[test]
fn test_shipped_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/dispatcher.yaml");
    let config = DispatcherConfig::load_from_file(&path).unwrap();
    assert_eq!(config.reflex_threshold, 0.75);
    assert_eq!(config.threshold_policy, ThresholdPolicy::Clamp);
}

// ============================================================================
// OCR signals
// ============================================================================

#[test]
fn test_ocr_trace_fills_missing_fields() {
    let input = DispatcherInput::new(SignalType::Ocr, "talao").with_ocr_trace(OcrTraceInput {
        merchant: Some("Worten".to_string()),
        amount: Some(129.99),
        currency: Some("EUR".to_string()),
        confidence: Some(0.9),
    });
    let result = IntentDispatcher::default().evaluate(&input);

    assert_eq!(result.module, ModuleId::Finance);
    assert_eq!(result.strategy, Strategy::TacticalReflex);
    let fields = result.extracted.as_finance().unwrap();
    assert_eq!(fields.amount, Some(129.99));
    assert_eq!(fields.merchant.as_deref(), Some("Worten"));
    assert_eq!(
        fields.merchant_meta.as_ref().map(|m| m.match_type),
        Some(MatchType::OcrTrace)
    );
    assert_eq!(fields.category.as_deref(), Some("Tecnologia"));
}

// ============================================================================
// Other modules
// ============================================================================

#[test]
fn test_crypto_trade() {
    let result = dispatch("vendi 2 eth na binance a 3200 usd");
    assert_eq!(result.module, ModuleId::Crypto);
    assert_eq!(result.strategy, Strategy::TacticalReflex);
    let fields = result.extracted.as_crypto().unwrap();
    assert_eq!(fields.symbol.as_deref(), Some("ETH"));
    assert_eq!(fields.amount, Some(2.0));
    assert_eq!(fields.price, Some(3200.0));
    assert_eq!(fields.quote_currency.as_deref(), Some("USD"));
}

#[test]
fn test_link_save() {
    let result =
        dispatch("guarda este artigo sobre rust https://example.com/rust para ler depois");
    assert_eq!(result.module, ModuleId::Links);
    assert_eq!(result.strategy, Strategy::TacticalReflex);
    let fields = result.extracted.as_links().unwrap();
    assert_eq!(fields.url.as_deref(), Some("https://example.com/rust"));
}

#[test]
fn test_only_winner_fields_are_returned() {
    let result = dispatch("cria despesa de 36 eur no continente");
    assert!(matches!(result.extracted, ExtractedFields::Finance(_)));
    assert!(result.extracted.as_todo().is_none());
}

// ============================================================================
// Cross-module confusions
// ============================================================================

#[test]
fn test_euro_priced_crypto_buy_is_not_an_expense() {
    let result = dispatch("comprei 0,5 btc a 60000 eur");
    assert_eq!(result.module, ModuleId::Crypto);
    let fields = result.extracted.as_crypto().unwrap();
    assert_eq!(fields.symbol.as_deref(), Some("BTC"));
    assert_eq!(fields.price, Some(60000.0));
    assert_eq!(fields.quote_currency.as_deref(), Some("EUR"));

    let result = dispatch("comprei 100 eur de bitcoin");
    assert_eq!(result.module, ModuleId::Crypto);
}

#[test]
fn test_reminder_about_money_stays_todo() {
    let result = dispatch("lembra-me pagar 50 eur de renda amanha");
    assert_eq!(result.module, ModuleId::Todo);
    assert!(result.strict_parameters_met);
    assert_eq!(result.strategy, Strategy::TacticalReflex);
}

#[test]
fn test_possessive_object_is_not_a_merchant() {
    let result = dispatch("gastei 20 eur para a minha mae");
    assert_eq!(result.module, ModuleId::Finance);
    assert_eq!(result.strategy, Strategy::SemanticDeepDive);
    assert!(!result.strict_parameters_met);
    assert_eq!(result.extracted.as_finance().and_then(|f| f.merchant.as_deref()), None);
}

#[test]
fn test_bill_from_operator_named_nos() {
    let result = dispatch("paguei a fatura da nos 30 eur");
    assert_eq!(result.module, ModuleId::Finance);
    assert_eq!(result.strategy, Strategy::TacticalReflex);
    let fields = result.extracted.as_finance().unwrap();
    assert_eq!(fields.merchant.as_deref(), Some("NOS"));
    assert_eq!(fields.category.as_deref(), Some("Serviços"));
}

#[test]
fn test_glued_words_are_not_a_link() {
    let result = dispatch("ok.obrigado");
    assert_deflected(&result);
    assert!(result.reason.contains(&"gatekeeper=conversational".to_string()));
}

// ============================================================================
// Chooser tie-break through the public API
// ============================================================================

struct Fixed {
    module: ModuleId,
    confidence: f32,
    strict: bool,
}

impl ModuleEvaluator for Fixed {
    fn module(&self) -> ModuleId {
        self.module
    }

    fn evaluate(&self, _signal: &PreparedSignal<'_>) -> ModuleEvaluation {
        ModuleEvaluation {
            module: self.module,
            confidence: self.confidence,
            strict_parameters_met: self.strict,
            reason: vec![format!("{}.fixed", self.module)],
            extracted: ExtractedFields::None,
        }
    }

    fn mentions_intent(&self, _folded: &str) -> bool {
        true
    }
}

#[test]
fn test_tie_prefers_strict_evaluation() {
    let dispatcher = IntentDispatcher::with_evaluators(
        0.5,
        vec![
            Box::new(Fixed {
                module: ModuleId::Finance,
                confidence: 0.6,
                strict: false,
            }),
            Box::new(Fixed {
                module: ModuleId::Links,
                confidence: 0.6,
                strict: true,
            }),
        ],
    );
    let result = dispatcher.evaluate(&DispatcherInput::text("qualquer coisa"));
    assert_eq!(result.module, ModuleId::Links);
    assert_eq!(result.strategy, Strategy::TacticalReflex);
    assert!(result.reason.contains(&"links.fixed".to_string()));
}
