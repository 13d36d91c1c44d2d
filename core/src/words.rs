//! Word tokenization for intra-line diffing.
//!
//! A word is a maximal run of characters of one class (whitespace,
//! alphanumeric-plus-underscore, or other). Words carry their original
//! column span so change spans can be reported in source coordinates even
//! when whitespace words were elided from the sequence.

use crate::config::CompareConfig;
use crate::document::DocumentView;
use crate::hashing::{hash_byte, HASH_SEED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Space,
    Alnum,
    Other,
}

fn char_class(byte: u8) -> CharClass {
    if byte == b' ' || byte == b'\t' {
        CharClass::Space
    } else if byte.is_ascii_alphanumeric() || byte == b'_' {
        CharClass::Alnum
    } else {
        CharClass::Other
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Word {
    pub class: CharClass,
    pub line: usize,
    /// Byte column of the word's first character within its line.
    pub col: usize,
    pub len: usize,
    pub hash: u64,
}

// The differ equates words by fingerprint alone.
impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

/// Tokenize `line_count` lines starting at document line `line_off` into
/// per-line word sequences. Whitespace words are dropped when
/// `ignore_whitespace` is set; columns always refer to the original text.
pub(crate) fn split_words(
    doc: &dyn DocumentView,
    line_off: usize,
    line_count: usize,
    config: &CompareConfig,
) -> Vec<Vec<Word>> {
    let mut words: Vec<Vec<Word>> = vec![Vec::new(); line_count];

    for (line, out) in words.iter_mut().enumerate() {
        let doc_line = line_off + line;
        let start = doc.line_start(doc_line);
        let end = doc.line_end(doc_line);
        if end <= start {
            continue;
        }

        let text = doc.text(start, end);
        let mut word: Option<Word> = None;

        for (col, &raw) in text.iter().enumerate() {
            let b = if config.ignore_case {
                raw.to_ascii_lowercase()
            } else {
                raw
            };
            let class = char_class(b);

            match word {
                Some(ref mut w) if w.class == class => {
                    w.len += 1;
                    w.hash = hash_byte(w.hash, b);
                }
                ref mut slot => {
                    if let Some(w) = slot.take() {
                        if !config.ignore_whitespace || w.class != CharClass::Space {
                            out.push(w);
                        }
                    }
                    *slot = Some(Word {
                        class,
                        line,
                        col,
                        len: 1,
                        hash: hash_byte(HASH_SEED, b),
                    });
                }
            }
        }

        if let Some(w) = word {
            if !config.ignore_whitespace || w.class != CharClass::Space {
                out.push(w);
            }
        }
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextBuffer;

    fn words_of(text: &str, config: &CompareConfig) -> Vec<Vec<Word>> {
        let buf = TextBuffer::from_str(text);
        split_words(&buf, 0, buf.line_count(), config)
    }

    #[test]
    fn splits_on_class_boundaries() {
        let config = CompareConfig::default();
        let words = words_of("foo_bar = 42;", &config);
        let line = &words[0];
        let spans: Vec<(usize, usize)> = line.iter().map(|w| (w.col, w.len)).collect();
        // foo_bar, ' ', '=', ' ', 42, ';'
        assert_eq!(spans, vec![(0, 7), (7, 1), (8, 1), (9, 1), (10, 2), (12, 1)]);
        assert_eq!(line[0].class, CharClass::Alnum);
        assert_eq!(line[1].class, CharClass::Space);
        assert_eq!(line[2].class, CharClass::Other);
    }

    #[test]
    fn ignore_whitespace_drops_space_words_but_keeps_columns() {
        let config = CompareConfig {
            ignore_whitespace: true,
            ..Default::default()
        };
        let words = words_of("a  b", &config);
        let line = &words[0];
        assert_eq!(line.len(), 2);
        assert_eq!(line[0].col, 0);
        assert_eq!(line[1].col, 3);
    }

    #[test]
    fn word_equality_is_by_hash() {
        let config = CompareConfig::default();
        let words = words_of("abc xyz abc", &config);
        let line = &words[0];
        assert_eq!(line[0], line[4]);
        assert_ne!(line[0], line[2]);
    }

    #[test]
    fn case_folding_unifies_word_hashes() {
        let config = CompareConfig {
            ignore_case: true,
            ..Default::default()
        };
        let words = words_of("Word word", &config);
        let line = &words[0];
        assert_eq!(line[0], line[2]);
    }

    #[test]
    fn empty_line_has_no_words() {
        let config = CompareConfig::default();
        let words = words_of("x\n\ny", &config);
        assert!(words[1].is_empty());
    }
}
