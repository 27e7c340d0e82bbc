//! Top-level mining entry point tying the pipeline together:
//! rule index -> property index -> coincidence filter -> worker pool ->
//! affected-rules aggregation.

use crate::aggregate::{affected_rules, AffectedRules};
use crate::coincidence::CoincidenceContext;
use crate::index::{PropertyIndex, RuleIndex};
use crate::props::PropSet;
use crate::scheduler::{default_workers, run_pool, PoolConfig, PoolError};
use crate::search::SearchContext;
use crate::symbol::SymbolStore;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::trace::info;

/// Configuration for one mining run.
#[derive(Debug, Clone)]
pub struct MineConfig {
    /// Smallest subset worth reporting.
    pub min_subset_size: usize,
    /// Rule entries per worker job.
    pub batch_size: usize,
    /// Worker thread count; None picks a count for this machine.
    pub workers: Option<usize>,
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            min_subset_size: 2,
            batch_size: 100,
            workers: None,
        }
    }
}

/// Errors that abort a mining run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineError {
    /// The input mapping named the same rule twice.
    DuplicateRule(String),
    /// A rule's filtered declaration set is too wide to enumerate.
    Scale { rule: String, width: usize },
    /// A worker terminated without reporting a result.
    WorkerPanic { worker: usize },
}

impl fmt::Display for MineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MineError::DuplicateRule(rule) => {
                write!(f, "duplicate rule in input: '{}'", rule)
            }
            MineError::Scale { rule, width } => write!(
                f,
                "rule '{}': {} non-trivial declarations exceed the 32-element enumeration ceiling",
                rule, width
            ),
            MineError::WorkerPanic { worker } => {
                write!(f, "worker {} terminated abnormally", worker)
            }
        }
    }
}

impl std::error::Error for MineError {}

/// Mine the rule corpus for declaration subsets shared by two or more rules.
///
/// `entries` is the external parser's output: selector text paired with the
/// rule's normalized declaration strings, in stable order. Returns the
/// affected-rules map; resolve it against the same `symbols` store for
/// rendering.
pub fn mine<S, D, I>(
    entries: I,
    symbols: &SymbolStore,
    config: &MineConfig,
) -> Result<AffectedRules, MineError>
where
    I: IntoIterator<Item = (S, Vec<D>)>,
    S: AsRef<str>,
    D: AsRef<str>,
{
    let rules = RuleIndex::from_entries(entries.into_iter().map(|(selector, decls)| {
        (
            symbols.intern_rule(selector.as_ref()),
            decls
                .iter()
                .map(|d| symbols.intern_prop(d.as_ref()))
                .collect::<PropSet>(),
        )
    }))
    .map_err(|dup| {
        MineError::DuplicateRule(
            symbols.resolve_rule(dup.0).unwrap_or("<unknown>").to_owned(),
        )
    })?;

    let props = PropertyIndex::build(&rules);
    let coincidence = CoincidenceContext::build(&rules, &props);

    #[cfg(feature = "tracing")]
    info!(
        rules = rules.len(),
        props = props.len(),
        non_trivial = coincidence.non_trivial().len(),
        "mining corpus"
    );

    let rules = Arc::new(rules);
    let ctx = Arc::new(SearchContext {
        rules: Arc::clone(&rules),
        non_trivial: coincidence.into_non_trivial(),
        min_subset_size: config.min_subset_size,
    });

    let pool_config = PoolConfig {
        workers: config.workers.unwrap_or_else(default_workers),
        batch_size: config.batch_size,
    };
    let run = run_pool(ctx, &pool_config).map_err(|e| match e {
        PoolError::Scale(scale) => MineError::Scale {
            rule: symbols
                .resolve_rule(scale.rule)
                .unwrap_or("<unknown>")
                .to_owned(),
            width: scale.width,
        },
        PoolError::WorkerPanic { worker } => MineError::WorkerPanic { worker },
    })?;

    #[cfg(feature = "tracing")]
    info!(
        surviving = run.sets.len(),
        jobs = run.stats.jobs_completed,
        "mine complete"
    );

    Ok(affected_rules(&run.sets, &rules))
}
