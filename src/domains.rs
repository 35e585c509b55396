use bit_set::BitSet;
use log::debug;
use crate::{Crossword, Dictionary, VariableId, WordId};

/// Iterator over the words in one domain, in `WordId` order. `bit_set::Iter` reports an upper
/// bound that can be smaller than what it actually yields, so this tracks the exact count itself.
pub struct DomainIter<'a> {
    words: bit_set::Iter<'a, u32>,
    remaining: usize,
}

impl<'a> Iterator for DomainIter<'a> {
    type Item = WordId;

    fn next(&mut self) -> Option<WordId> {
        let word_id = self.words.next()?;
        self.remaining -= 1;
        Some(word_id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for DomainIter<'a> {}

/// The candidate words for each variable, indexed by `VariableId`. Each domain is a set of
/// `WordId`s, so iteration is always in dictionary order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    domains: Vec<BitSet>,
}

impl Domains {
    /// Start every variable off with the full dictionary.
    pub fn new(crossword: &Crossword, dictionary: &Dictionary) -> Domains {
        let full: BitSet = (0..dictionary.len()).collect();

        Domains { domains: crossword.variables().iter().map(|_| full.clone()).collect() }
    }

    /// Remove any words that don't fit their variable's unary constraint, which for a crossword is
    /// just the length of the slot.
    pub fn enforce_node_consistency(&mut self, crossword: &Crossword, dictionary: &Dictionary) {
        for (variable_id, domain) in self.domains.iter_mut().enumerate() {
            let length = crossword.variable(variable_id).length;
            let wrong_length: Vec<WordId> =
                domain.iter().filter(|&word_id| dictionary.word(word_id).len() != length).collect();

            for word_id in wrong_length {
                domain.remove(word_id);
            }

            debug!("Variable {} has {} options of length {}", variable_id, domain.len(), length);
        }
    }

    pub fn get(&self, variable_id: VariableId) -> &BitSet {
        &self.domains[variable_id]
    }

    pub fn len(&self, variable_id: VariableId) -> usize {
        self.domains[variable_id].len()
    }

    pub fn is_empty(&self, variable_id: VariableId) -> bool {
        self.domains[variable_id].is_empty()
    }

    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.domains[variable_id].contains(word_id)
    }

    pub fn iter(&self, variable_id: VariableId) -> DomainIter<'_> {
        let domain = &self.domains[variable_id];
        DomainIter { words: domain.iter(), remaining: domain.len() }
    }

    /// Returns whether the word was present.
    pub fn remove(&mut self, variable_id: VariableId, word_id: WordId) -> bool {
        self.domains[variable_id].remove(word_id)
    }

    /// The first variable with nothing left to choose from, if any.
    pub fn first_empty(&self) -> Option<VariableId> {
        self.domains.iter().position(|domain| domain.is_empty())
    }
}
