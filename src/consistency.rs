use std::collections::{HashSet, VecDeque};
use std::fmt::{Display, Formatter};
use log::{debug, trace};
use crate::{Crossword, Dictionary, Domains, VariableId, WordId};

/// An ordered pair of variables `(x, y)`; revising it makes `x` consistent with `y`.
pub type ArcPair = (VariableId, VariableId);

/// Returned by `ac3` when some variable's options run out, which means the puzzle has no
/// solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ac3Failure {
    pub variable: VariableId,
}

impl Display for Ac3Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "variable {} has no remaining options", self.variable)
    }
}

/// Counters for the work done while propagating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationCounts {
    pub revisions: u64,
    pub removals: u64,
}

/// Every ordered pair of crossing variables, in id order.
pub fn all_arcs(crossword: &Crossword) -> Vec<ArcPair> {
    (0..crossword.variables().len())
        .flat_map(|x| crossword.neighbors(x).map(move |y| (x, y)))
        .collect()
}

/// Make `x` arc consistent with `y` by removing every word from `x`'s domain that has no
/// counterpart in `y`'s domain with the same letter in the shared cell. Variables that don't cross
/// can't conflict, so revising them never removes anything. Returns whether anything was removed.
pub fn revise(
    crossword: &Crossword,
    dictionary: &Dictionary,
    domains: &mut Domains,
    x: VariableId,
    y: VariableId,
) -> bool {
    let Some((x_cell, y_cell)) = crossword.overlap(x, y) else {
        return false;
    };

    let x_length = crossword.variable(x).length;
    let y_length = crossword.variable(y).length;

    // The set of letters `y` can still put in the shared cell. Words of the wrong length can't
    // fill `y`, so they support nothing.
    let supported: HashSet<char> = domains.iter(y)
        .map(|word_id| dictionary.word(word_id))
        .filter(|word| word.len() == y_length)
        .filter_map(|word| word.glyphs.get(y_cell).copied())
        .collect();

    let unsupported: Vec<WordId> = domains.iter(x)
        .filter(|&word_id| {
            let word = dictionary.word(word_id);
            word.len() != x_length
                || word.glyphs.get(x_cell).map_or(true, |glyph| !supported.contains(glyph))
        })
        .collect();

    for &word_id in &unsupported {
        domains.remove(x, word_id);
    }

    if !unsupported.is_empty() {
        trace!("Revising ({}, {}) removed {} words", x, y, unsupported.len());
    }

    !unsupported.is_empty()
}

/// Data structure used in `ac3` to track which arcs we still need to revise. An arc that's already
/// waiting doesn't get queued a second time.
#[derive(Debug)]
struct ArcQueue {
    queue: VecDeque<ArcPair>,
    queued: HashSet<ArcPair>,
}

impl ArcQueue {
    fn with_initial_queue<Items>(items: Items) -> ArcQueue
        where
            Items: IntoIterator<Item=ArcPair>
    {
        let mut queue = ArcQueue { queue: VecDeque::new(), queued: HashSet::new() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<ArcPair> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: ArcPair) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Make every domain arc consistent, starting from the given arcs, or from every crossing in the
/// puzzle if `arcs` is `None`. Whenever revising `(x, y)` shrinks `x`'s domain, every other
/// neighbor `z` of `x` gets `(z, x)` re-queued since its support may have gone.
///
/// Fails as soon as any domain is emptied. Success only means every remaining word has support
/// across each of its crossings, not that a full solution exists.
pub fn ac3(
    crossword: &Crossword,
    dictionary: &Dictionary,
    domains: &mut Domains,
    arcs: Option<Vec<ArcPair>>,
) -> Result<PropagationCounts, Ac3Failure> {
    let mut queue = ArcQueue::with_initial_queue(arcs.unwrap_or_else(|| all_arcs(crossword)));
    let mut counts = PropagationCounts::default();

    while let Some((x, y)) = queue.pop_front() {
        counts.revisions += 1;

        let before = domains.len(x);
        if !revise(crossword, dictionary, domains, x, y) {
            continue;
        }
        counts.removals += (before - domains.len(x)) as u64;

        if domains.is_empty(x) {
            debug!("AC-3 emptied variable {} after {} revisions", x, counts.revisions);
            return Err(Ac3Failure { variable: x });
        }

        for z in crossword.neighbors(x) {
            if z != y {
                queue.enqueue((z, x));
            }
        }
    }

    debug!("AC-3 finished: {} revisions, {} removals", counts.revisions, counts.removals);

    Ok(counts)
}
