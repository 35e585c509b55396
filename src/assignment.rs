use std::collections::{BTreeMap, HashSet};
use crate::{Crossword, Dictionary, VariableId, WordId};

/// A partial or complete choice of word for each variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    words: BTreeMap<VariableId, WordId>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment::default()
    }

    /// Returns the word previously assigned to this variable, if any.
    pub fn insert(&mut self, variable_id: VariableId, word_id: WordId) -> Option<WordId> {
        self.words.insert(variable_id, word_id)
    }

    pub fn remove(&mut self, variable_id: VariableId) -> Option<WordId> {
        self.words.remove(&variable_id)
    }

    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.words.get(&variable_id).copied()
    }

    pub fn contains(&self, variable_id: VariableId) -> bool {
        self.words.contains_key(&variable_id)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether every variable in the crossword has a word.
    pub fn is_complete(&self, crossword: &Crossword) -> bool {
        self.words.len() == crossword.variables().len()
    }

    /// The (variable, word) pairs in variable id order.
    pub fn iter(&self) -> impl Iterator<Item=(VariableId, WordId)> + '_ {
        self.words.iter().map(|(&variable_id, &word_id)| (variable_id, word_id))
    }
}

/// Check that an assignment could be part of a solution: no word is used twice, every word fits
/// its slot, and every pair of assigned crossing variables agrees on the shared letter.
pub fn is_consistent(assignment: &Assignment, crossword: &Crossword, dictionary: &Dictionary) -> bool {
    let mut seen: HashSet<WordId> = HashSet::with_capacity(assignment.len());
    if !assignment.iter().all(|(_, word_id)| seen.insert(word_id)) {
        return false;
    }

    if !assignment.iter().all(|(variable_id, word_id)| {
        dictionary.word(word_id).len() == crossword.variable(variable_id).length
    }) {
        return false;
    }

    // Each crossing shows up from both sides, so only check it from the lower id.
    assignment.iter().all(|(variable_id, word_id)| {
        let word = dictionary.word(word_id);

        crossword.crossings(variable_id).iter()
            .filter(|crossing| crossing.other_variable > variable_id)
            .all(|crossing| {
                match assignment.get(crossing.other_variable) {
                    Some(other_word_id) => {
                        word.glyphs[crossing.cell] == dictionary.word(other_word_id).glyphs[crossing.other_cell]
                    }
                    None => true,
                }
            })
    })
}
