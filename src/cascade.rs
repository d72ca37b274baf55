//! The extraction cascade: an ordered list of gated strategy stages.
//!
//! Each [`Stage`] pairs a strategy with a [`StageGate`] that decides, from the
//! attempts so far, whether the stage runs at all. The first output is kept
//! even when empty, so a document without text still reports the strategy
//! that read it. Later output replaces it only when its trimmed text is
//! strictly longer.
//!
//! Failing and unavailable stages never stop the cascade; they are recorded
//! as [`Attempt`]s so the caller can report them.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::CascadeConfig;
use crate::strategies::{ExtractionStrategy, StrategyCapabilities, StrategyOutput, StrategyRegistry};
use crate::utils::text::trimmed_len;

/// Predicate deciding whether a stage runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageGate {
    /// Always run
    Always,
    /// Run while the best text so far has fewer than this many characters
    BelowChars(usize),
    /// Run only if every earlier stage failed or could not run
    WhenNoneSucceeded,
}

impl StageGate {
    /// Whether the gate lets a stage run given the outcome so far
    pub fn admits(&self, outcome: &CascadeOutcome) -> bool {
        match self {
            StageGate::Always => true,
            StageGate::BelowChars(min) => outcome.best_len() < *min,
            StageGate::WhenNoneSucceeded => !outcome.any_produced(),
        }
    }
}

/// A strategy guarded by a gate
#[derive(Debug, Clone)]
pub struct Stage {
    pub strategy: Arc<dyn ExtractionStrategy>,
    pub gate: StageGate,
}

impl Stage {
    pub fn new(strategy: Arc<dyn ExtractionStrategy>, gate: StageGate) -> Self {
        Self { strategy, gate }
    }
}

/// What happened to one stage during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The gate was closed
    Skipped,
    /// The strategy's capability is missing
    Unavailable,
    /// The strategy returned an error
    Failed(String),
    /// The strategy produced text of `chars` trimmed characters
    Produced { chars: usize, accepted: bool },
}

/// Record of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub id: String,
    pub name: String,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    /// Whether the strategy's `extract` actually ran
    pub fn ran(&self) -> bool {
        matches!(
            self.outcome,
            AttemptOutcome::Failed(_) | AttemptOutcome::Produced { .. }
        )
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Skipped => write!(f, "{} skipped", self.name),
            AttemptOutcome::Unavailable => write!(f, "{} unavailable", self.name),
            AttemptOutcome::Failed(message) => write!(f, "{} error: {}", self.name, message),
            AttemptOutcome::Produced { chars, .. } => write!(f, "{} produced {} chars", self.name, chars),
        }
    }
}

/// Result of running a cascade
#[derive(Debug, Clone, Default)]
pub struct CascadeOutcome {
    /// Winning output, if any stage produced output
    pub best: Option<StrategyOutput>,
    /// One record per stage, in stage order
    pub attempts: Vec<Attempt>,
}

impl CascadeOutcome {
    /// Failed attempts
    pub fn failures(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::Failed(_)))
    }

    /// Failures rendered as `"<name> error: <message>"` joined by `"; "`
    pub fn error_notes(&self) -> String {
        self.failures()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Whether the stage with `id` ran
    pub fn attempted(&self, id: &str) -> bool {
        self.attempts.iter().any(|a| a.id == id && a.ran())
    }

    /// Whether any stage returned output, empty or not
    pub fn any_produced(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| matches!(a.outcome, AttemptOutcome::Produced { .. }))
    }

    /// Trimmed length of the best text so far
    pub fn best_len(&self) -> usize {
        self.best.as_ref().map_or(0, |b| trimmed_len(&b.text))
    }
}

/// Ordered collection of stages evaluated with the acceptance rule
#[derive(Debug, Clone)]
pub struct Cascade {
    stages: Vec<Stage>,
    capabilities: StrategyCapabilities,
}

impl Cascade {
    /// Create a cascade; stages whose capability is not in `capabilities` are skipped
    pub fn new(stages: Vec<Stage>, capabilities: StrategyCapabilities) -> Self {
        Self { stages, capabilities }
    }

    /// Quality-first cascade: OCR, then multilingual, then embedded text
    pub fn standalone(registry: &StrategyRegistry, config: &CascadeConfig) -> Self {
        Self::from_plan(
            registry,
            &[
                ("ocr", StageGate::Always),
                ("multilingual", StageGate::BelowChars(config.ocr_min_chars)),
                ("embedded_text", StageGate::BelowChars(config.fallback_min_chars)),
            ],
        )
    }

    /// Library-first cascade: embedded text, then the byte scan
    pub fn embedded(registry: &StrategyRegistry) -> Self {
        Self::from_plan(
            registry,
            &[
                ("embedded_text", StageGate::Always),
                ("byte_scan", StageGate::WhenNoneSucceeded),
            ],
        )
    }

    fn from_plan(registry: &StrategyRegistry, plan: &[(&str, StageGate)]) -> Self {
        let stages = plan
            .iter()
            .filter_map(|(id, gate)| match registry.get(id) {
                Some(strategy) => Some(Stage::new(Arc::clone(strategy), *gate)),
                None => {
                    tracing::debug!("Strategy '{}' not compiled in, leaving it out", id);
                    None
                }
            })
            .collect();

        Self::new(stages, registry.capabilities())
    }

    /// The stages in evaluation order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    fn usable(&self, strategy: &dyn ExtractionStrategy) -> bool {
        self.capabilities.contains(strategy.capability()) && strategy.is_available()
    }

    /// Whether at least one stage can run in this environment
    pub fn has_usable_stage(&self) -> bool {
        self.stages.iter().any(|stage| self.usable(stage.strategy.as_ref()))
    }

    /// Evaluate every stage in order
    pub fn run(&self, path: &Path, language: &str) -> CascadeOutcome {
        let mut outcome = CascadeOutcome::default();

        for stage in &self.stages {
            let strategy = stage.strategy.as_ref();
            let record = |result: AttemptOutcome| Attempt {
                id: strategy.id().to_string(),
                name: strategy.name().to_string(),
                outcome: result,
            };

            if !stage.gate.admits(&outcome) {
                tracing::debug!("{}: gate {:?} closed", strategy.name(), stage.gate);
                outcome.attempts.push(record(AttemptOutcome::Skipped));
                continue;
            }

            if !self.usable(strategy) {
                tracing::info!("{} not available, skipping", strategy.name());
                outcome.attempts.push(record(AttemptOutcome::Unavailable));
                continue;
            }

            tracing::info!("Attempting {} extraction...", strategy.name());
            match strategy.extract(path, language) {
                Ok(output) => {
                    let chars = trimmed_len(&output.text);
                    let accepted = outcome.best.is_none() || chars > outcome.best_len();

                    tracing::info!(
                        "{} produced {} characters{}",
                        strategy.name(),
                        chars,
                        if accepted { ", accepted" } else { "" }
                    );
                    if accepted {
                        outcome.best = Some(output);
                    }
                    outcome.attempts.push(record(AttemptOutcome::Produced { chars, accepted }));
                }
                Err(e) => {
                    tracing::warn!("{} failed: {}", strategy.name(), e);
                    outcome.attempts.push(record(AttemptOutcome::Failed(e.to_string())));
                }
            }
        }

        outcome
    }
}
