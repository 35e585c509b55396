use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Problems with the structure or word-list input. These are fatal at load time; an unsolvable
/// puzzle is not an error and is reported through `SolveFailure` instead.
#[derive(Debug)]
pub enum PuzzleError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    EmptyStructure,
    MalformedWord {
        /// 1-based line number in the word list.
        line: usize,
        word: String,
    },
}

impl Display for PuzzleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PuzzleError::Io { path, source } => {
                write!(f, "could not read {}: {}", path.display(), source)
            }
            PuzzleError::EmptyStructure => write!(f, "structure has no rows"),
            PuzzleError::MalformedWord { line, word } => {
                write!(f, "word list line {} is not a single word: {:?}", line, word)
            }
        }
    }
}

impl std::error::Error for PuzzleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PuzzleError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::path::PathBuf;
    use crate::PuzzleError;

    #[test]
    fn test_io_error_reports_path_and_source() {
        let err = PuzzleError::Io {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };

        assert!(err.to_string().contains("missing.txt"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_malformed_word_message() {
        let err = PuzzleError::MalformedWord { line: 3, word: "ICE CREAM".to_string() };

        assert_eq!(err.to_string(), "word list line 3 is not a single word: \"ICE CREAM\"");
        assert!(err.source().is_none());
    }
}
