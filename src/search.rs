//! Match search: the inner loop that tests a rule's candidate subsets for
//! containment in other rules' declaration sets.
//!
//! This is the dominant cost center (rules^2 x 2^filtered-size) and the unit
//! of work distributed to the worker pool.

use crate::dedup::DedupSets;
use crate::index::RuleIndex;
use crate::powerset::SubsetIter;
use crate::props::PropSet;
use crate::set_ops::compare_sets;
use crate::symbol::{PropId, RuleId};
use hashbrown::HashSet;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::trace::trace;

/// A rule's filtered declaration set is too wide to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleError {
    pub rule: RuleId,
    pub width: usize,
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "filtered declaration set of {} elements exceeds the enumeration ceiling",
            self.width
        )
    }
}

impl std::error::Error for ScaleError {}

/// Immutable inputs shared by every worker: the full rule index for
/// cross-rule comparison, the pruning set, and the minimum subset size.
///
/// Built once by the dispatcher before any worker spawns; never mutated
/// afterwards.
pub struct SearchContext {
    pub rules: Arc<RuleIndex>,
    pub non_trivial: HashSet<PropId>,
    pub min_subset_size: usize,
}

/// Mine one batch of rules, inserting every qualifying subset into `out`.
///
/// For each rule, its declaration set is filtered to non-trivial members,
/// every subset of at least the minimum size is enumerated, and a subset
/// qualifies as soon as some *other* rule's set contains it.
pub fn search_batch(
    ctx: &SearchContext,
    batch: &[(RuleId, PropSet)],
    out: &mut DedupSets,
) -> Result<(), ScaleError> {
    for (rule, props) in batch {
        let filtered: Vec<PropId> = props
            .iter()
            .filter(|p| ctx.non_trivial.contains(p))
            .collect();

        let subsets = SubsetIter::new(&filtered, ctx.min_subset_size)
            .map_err(|e| ScaleError {
                rule: *rule,
                width: e.width,
            })?;

        #[cfg(feature = "tracing")]
        trace!(filtered = filtered.len(), "enumerating rule subsets");

        'subsets: for subset in subsets {
            for (other, other_props) in ctx.rules.iter() {
                if other == *rule {
                    continue;
                }
                if compare_sets(&subset, other_props).is_subset() {
                    out.add(subset);
                    continue 'subsets;
                }
            }
        }
    }
    Ok(())
}
