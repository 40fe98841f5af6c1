//! # Dependency Sorter
//!
//! Partitions initializers into ordered batches: every record in batch `k`
//! either declares no predecessor or declares an `after` name satisfied by
//! batches `0..k`. The algorithm works on whole groups keyed by `after`
//! value, not on individual edges, so records sharing an `after` value
//! become eligible together.
//!
//! Policy decisions:
//! - An `after` name that no record carries is treated as already satisfied;
//!   the group runs as if it had no dependency. A `debug!` line makes the
//!   unresolved reference visible without changing behavior.
//! - Duplicate names are allowed. A predecessor counts as satisfied as soon
//!   as *any* record with that name has been placed.
//! - If a full scan pass places nothing, the sorter is stalled. The first
//!   stall logs a warning; three consecutive stalls mean the remaining
//!   records form an unsatisfiable cycle and sorting fails.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::InitializerError;
use crate::initializer::{AppHandle, Initializer};

/// Consecutive stalled passes tolerated before reporting a cycle.
const MAX_STALLED_PASSES: u32 = 3;

/// Partition `initializers` into dependency-ordered batches.
///
/// The output is a partition: every input record appears in exactly one
/// batch. Batch 0 holds every record with `after == ""` (when any exist);
/// later batches hold groups whose predecessor became satisfied.
pub fn sort_initializers<A: AppHandle>(
    initializers: Vec<Initializer<A>>,
) -> Result<Vec<Vec<Initializer<A>>>, InitializerError> {
    let total = initializers.len();

    // Group records by `after` value in first-seen order, and collect every
    // declared name so unknown predecessors can be told apart from
    // not-yet-placed ones.
    let mut names: HashSet<String> = HashSet::new();
    let mut groups: Vec<(String, Vec<Initializer<A>>)> = Vec::new();
    for initializer in initializers {
        names.insert(initializer.name().to_string());
        match groups
            .iter()
            .position(|(after, _)| after.as_str() == initializer.after())
        {
            Some(index) => groups[index].1.push(initializer),
            None => groups.push((initializer.after().to_string(), vec![initializer])),
        }
    }

    let mut batches: Vec<Vec<Initializer<A>>> = Vec::new();
    let mut added: HashSet<String> = HashSet::new();
    let mut placed = 0usize;

    // Records with no declared predecessor always form the first batch.
    if let Some(index) = groups.iter().position(|(after, _)| after.is_empty()) {
        let (_, members) = groups.remove(index);
        place(members, &mut batches, &mut added, &mut placed);
    }

    let mut stalled_passes = 0u32;
    while placed != total {
        let before = batches.len();

        let mut index = 0;
        while index < groups.len() {
            let (after, _) = &groups[index];
            // Eligible when the predecessor has been placed, or when no
            // record carries that name at all (tolerant default).
            let known = names.contains(after.as_str());
            if known && !added.contains(after.as_str()) {
                index += 1;
                continue;
            }
            let (after, members) = groups.remove(index);
            if !known {
                debug!(after = %after, "scheduling group whose predecessor was never loaded");
            }
            place(members, &mut batches, &mut added, &mut placed);
        }

        if batches.len() == before {
            if stalled_passes == 0 {
                warn!("no initializers were added this pass");
            }
            stalled_passes += 1;
        } else {
            stalled_passes = 0;
        }

        if stalled_passes == MAX_STALLED_PASSES {
            let remaining = groups
                .iter()
                .flat_map(|(_, members)| members.iter())
                .map(|initializer| initializer.name().to_string())
                .collect();
            return Err(InitializerError::DependencyCycle { remaining });
        }
    }

    debug!(
        batches = batches.len(),
        initializers = total,
        "sorted initializers"
    );

    Ok(batches)
}

/// Append a group as the next batch and mark its member names as satisfied.
fn place<A: AppHandle>(
    members: Vec<Initializer<A>>,
    batches: &mut Vec<Vec<Initializer<A>>>,
    added: &mut HashSet<String>,
    placed: &mut usize,
) {
    *placed += members.len();
    for member in &members {
        added.insert(member.name().to_string());
    }
    batches.push(members);
}
