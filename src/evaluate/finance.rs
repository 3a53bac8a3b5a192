//! Finance evaluator (expense logging)
//!
//! | Component | Weight |
//! |---|---|
//! | keyword density | 0.42 |
//! | amount | 0.30 |
//! | merchant | 0.20 |
//! | OCR origin | +0.08 |
//! | OCR confidence | up to +0.12 |
//! | imperative verb with amount | +0.15 |
//!
//! Strict when a finance keyword, an amount and a merchant are all present.

use std::sync::LazyLock;

use super::{clamp_unit, flag, ModuleEvaluator, PreparedSignal, Trail, KEYWORD_SATURATION};
use crate::extract::amount::{extract_amount, EURO};
use crate::extract::{extract_merchant, extract_wallet};
use crate::lexicon::{density, Lexicon};
use crate::types::{ExtractedFields, FinanceFields, ModuleEvaluation, ModuleId, SignalType};

pub const W_KEYWORDS: f32 = 0.42;
pub const W_AMOUNT: f32 = 0.30;
pub const W_MERCHANT: f32 = 0.20;
pub const W_OCR_ORIGIN: f32 = 0.08;
pub const W_OCR_CONFIDENCE: f32 = 0.12;
pub const W_IMPERATIVE_AMOUNT: f32 = 0.15;

pub static FINANCE_KEYWORDS: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "finance",
        &[
            "despesas?",
            "gastos?",
            "gastei",
            "paguei",
            "pagar",
            "pago",
            "compras?",
            "comprei",
            "recibo",
            "fatura",
            "factura",
            "talao",
            "custou",
        ],
    )
});

/// Verbs that ask for an expense to be recorded. Reminder verbs stay out:
/// "lembra-me pagar 50 eur" is a todo.
pub static FINANCE_IMPERATIVES: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "finance_imperative",
        &[
            "criar?",
            "registar?",
            "adicionar?",
            "lancar?",
            "insere",
            "inserir",
            "meter?",
            "anotar?",
        ],
    )
});

#[derive(Debug, Clone, Copy, Default)]
pub struct FinanceEvaluator;

impl ModuleEvaluator for FinanceEvaluator {
    fn module(&self) -> ModuleId {
        ModuleId::Finance
    }

    fn mentions_intent(&self, folded: &str) -> bool {
        FINANCE_KEYWORDS.any(folded)
    }

    fn evaluate(&self, signal: &PreparedSignal<'_>) -> ModuleEvaluation {
        let mut trail = Trail::new(ModuleId::Finance);
        let ocr = signal.ocr_trace();

        let keywords = FINANCE_KEYWORDS.matches(&signal.folded);
        trail.note("keyword_hits", keywords.len());

        // Text amount first, the receipt total second
        let text_amount = extract_amount(&signal.text);
        let amount = text_amount.map(|a| a.value).or_else(|| {
            ocr.and_then(|t| t.amount)
                .filter(|v| v.is_finite() && *v > 0.0)
        });
        if let Some(value) = amount {
            trail.note("amount", value);
        }

        let currency = amount.map(|_| {
            text_amount
                .and_then(|a| a.currency)
                .map(str::to_string)
                .or_else(|| {
                    ocr.and_then(|t| t.currency.as_deref())
                        .map(|c| c.trim().to_uppercase())
                        .filter(|c| !c.is_empty())
                })
                .unwrap_or_else(|| EURO.to_string())
        });

        let finding = extract_merchant(&signal.text, ocr.and_then(|t| t.merchant.as_deref()));
        if let Some(f) = &finding {
            trail.note("merchant", &f.merchant.name);
            trail.note("merchant_stage", f.stage);
        }

        let wallet = extract_wallet(&signal.text);
        if let Some(w) = &wallet {
            trail.note("wallet", &w.hint);
        }

        let from_ocr = signal.signal_type() == SignalType::Ocr;
        let ocr_confidence = ocr
            .and_then(|t| t.confidence)
            .map(clamp_unit)
            .unwrap_or(0.0);
        let imperative = FINANCE_IMPERATIVES.any(&signal.folded);

        let keyword_score = W_KEYWORDS * density(keywords.len(), KEYWORD_SATURATION);
        let amount_score = W_AMOUNT * flag(amount.is_some());
        let merchant_score = W_MERCHANT * flag(finding.is_some());
        let origin_score = W_OCR_ORIGIN * flag(from_ocr);
        let ocr_confidence_score = W_OCR_CONFIDENCE * ocr_confidence;
        let imperative_score = W_IMPERATIVE_AMOUNT * flag(imperative && amount.is_some());

        trail.score("keyword_score", keyword_score);
        trail.score("amount_score", amount_score);
        trail.score("merchant_score", merchant_score);
        if from_ocr {
            trail.score("ocr_origin_score", origin_score);
        }
        if ocr_confidence > 0.0 {
            trail.score("ocr_confidence_score", ocr_confidence_score);
        }
        if imperative_score > 0.0 {
            trail.score("imperative_score", imperative_score);
        }

        let confidence = clamp_unit(
            keyword_score
                + amount_score
                + merchant_score
                + origin_score
                + ocr_confidence_score
                + imperative_score,
        );
        let strict = !keywords.is_empty() && amount.is_some() && finding.is_some();
        trail.score("confidence", confidence);
        trail.note("strict", strict);

        let (merchant, merchant_meta, category) = match finding {
            Some(f) => (Some(f.merchant.name.clone()), Some(f.merchant), f.category),
            None => (None, None, None),
        };

        ModuleEvaluation {
            module: ModuleId::Finance,
            confidence,
            strict_parameters_met: strict,
            reason: trail.into_entries(),
            extracted: ExtractedFields::Finance(FinanceFields {
                amount,
                currency,
                merchant,
                merchant_meta,
                category,
                wallet,
                keywords,
            }),
        }
    }
}
