//! signal-dispatch - deterministic intent dispatcher
//!
//! Routes a short signal (typed text, transcribed voice, OCR'd receipt) to
//! the dashboard module that should handle it, or deflects it to the
//! conversational assistant. No learned model: keyword lexicons, staged
//! entity extraction and fuzzy merchant matching.
//!
//! ## Pipeline
//! Input -> Gatekeeper -> Evaluators (finance, todo, crypto, links) -> Chooser
//! -> Minimum-confidence gate -> Strategy -> DispatcherResult
//!
//! ## Quick Start
//!
//! ```rust
//! use signal_dispatch::{DispatcherInput, IntentDispatcher, ModuleId, Strategy};
//!
//! let dispatcher = IntentDispatcher::new(0.75);
//! let result = dispatcher.evaluate(&DispatcherInput::text("cria despesa de 36 eur no continente"));
//! assert_eq!(result.module, ModuleId::Finance);
//! assert_eq!(result.strategy, Strategy::TacticalReflex);
//! ```

// Core error handling
pub mod error;

// Configuration
pub mod config;

// Shared data types
pub mod types;

// Text folding and keyword tables
pub mod lexicon;
pub mod text;

// Merchant dictionary and edit-distance lookup
pub mod fuzzy;

// Field extractors
pub mod extract;

// Module evaluators
pub mod evaluate;

// Routing decision
pub mod chooser;
pub mod dispatcher;
pub mod gatekeeper;
pub mod strategy;

pub use config::{DispatcherConfig, ThresholdPolicy, DEFAULT_REFLEX_THRESHOLD};
pub use dispatcher::IntentDispatcher;
pub use error::{DispatchError, Result};
pub use evaluate::{ModuleEvaluator, PreparedSignal};
pub use strategy::MIN_CONFIDENCE;
pub use types::{
    CryptoAction, CryptoFields, DispatcherInput, DispatcherResult, ExtractedFields,
    FinanceFields, LinksFields, MatchType, MerchantMatch, ModuleEvaluation, ModuleId,
    OcrTraceInput, SignalType, Strategy, TodoFields, WalletHint, WalletHintSource,
    FALLBACK_MODULE,
};
