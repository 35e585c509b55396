use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use std::fs;
use std::path::Path;
use log::info;
use smallvec::SmallVec;
use crate::{PuzzleError, WordId, MAX_SLOT_LENGTH};

/// A struct representing a word that can be chosen for a given variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let glyphs = string.chars().collect();
        Word { string, glyphs }
    }

    /// Length in characters, which is what slot lengths are measured in.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The full list of candidate words, uppercased, deduplicated and sorted. Since there are no
/// duplicates, two `WordId`s are equal exactly when their strings are.
#[derive(Clone)]
pub struct Dictionary {
    words: Vec<Word>,
}

impl Debug for Dictionary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

impl Dictionary {
    /// Build a dictionary from lines of a word list. Blank lines are skipped; a line with interior
    /// whitespace is rejected.
    pub fn from_words<I, S>(lines: I) -> Result<Dictionary, PuzzleError>
        where
            I: IntoIterator<Item=S>,
            S: AsRef<str>,
    {
        let mut unique: BTreeSet<String> = BTreeSet::new();

        for (line_idx, line) in lines.into_iter().enumerate() {
            let word = line.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            if word.chars().any(char::is_whitespace) {
                return Err(PuzzleError::MalformedWord { line: line_idx + 1, word: word.to_string() });
            }
            unique.insert(word.to_uppercase());
        }

        Ok(Dictionary { words: unique.into_iter().map(Word::new).collect() })
    }

    /// Read a word list with one word per line.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dictionary, PuzzleError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| PuzzleError::Io { path: path.to_path_buf(), source })?;

        let dictionary = Dictionary::from_words(contents.lines())?;
        info!("Loaded {} words from {}", dictionary.len(), path.display());

        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Look up the id of a word, ignoring case.
    pub fn find(&self, word: &str) -> Option<WordId> {
        let word = word.trim().to_uppercase();
        self.words.binary_search_by(|candidate| candidate.string.as_str().cmp(word.as_str())).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dictionary, PuzzleError};

    #[test]
    fn test_words_are_normalized_deduped_and_sorted() {
        let dictionary = Dictionary::from_words(["dog", " Cat ", "", "DOG", "tar\r"]).unwrap();

        let strings: Vec<_> = dictionary.words().iter().map(|w| w.string.as_str()).collect();
        assert_eq!(strings, vec!["CAT", "DOG", "TAR"]);
        assert_eq!(dictionary.find("dog"), Some(1));
        assert_eq!(dictionary.find("rat"), None);
    }

    #[test]
    fn test_word_length_counts_chars_not_bytes() {
        let dictionary = Dictionary::from_words(["éte"]).unwrap();

        assert_eq!(dictionary.word(0).len(), 3);
        assert_eq!(dictionary.word(0).string, "ÉTE");
    }

    #[test]
    fn test_interior_whitespace_is_malformed() {
        let result = Dictionary::from_words(["one", "", "ice cream"]);

        match result {
            Err(PuzzleError::MalformedWord { line, word }) => {
                assert_eq!(line, 3);
                assert_eq!(word, "ice cream");
            }
            other => panic!("expected a malformed word error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_word_list_is_valid() {
        let dictionary = Dictionary::from_words(Vec::<String>::new()).unwrap();

        assert!(dictionary.is_empty());
    }

    #[test]
    fn test_load_missing_file_reports_io_error() {
        let result = Dictionary::load("/definitely/not/a/real/word/list.txt");

        assert!(matches!(result, Err(PuzzleError::Io { .. })));
    }
}
