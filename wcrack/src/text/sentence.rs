use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::language::LanguageDetector;
use super::word::Words;

const TERMINATORS: &[char] = &['.', '!', '?', '…'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '»', '”', '’'];
const BULLETS: &[char] = &['•', '·', '-', '*', '–', '—', '▪'];

/// Tokens that end with a period without ending a sentence (compared
/// lowercase, without the trailing period).
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "fig", "approx",
    "inc", "ltd", "np", "tzn", "tj", "ul", "nr",
];

/// One sentence of recognized text.
///
/// `separator` is the whitespace that followed the sentence in the source, so
/// concatenating `text + separator` over every sentence reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub text: String,
    pub separator: String,
}

impl Sentence {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn words<'a>(&'a self, detector: &'a LanguageDetector) -> Words<'a> {
        Words::new(&self.text, detector)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lazy sentence iterator over borrowed text.
pub struct Sentences<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Sentences<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl Iterator for Sentences<'_> {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        let (sentence, next) = split_sentence(self.text, self.pos)?;
        self.pos = next;
        Some(sentence)
    }
}

/// Sentence iterator that owns its text and can cross task boundaries.
#[derive(Debug, Clone)]
pub struct IntoSentences {
    text: Arc<str>,
    pos: usize,
}

impl IntoSentences {
    pub(crate) fn new(text: Arc<str>) -> Self {
        Self { text, pos: 0 }
    }
}

impl Iterator for IntoSentences {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        let (sentence, next) = split_sentence(&self.text, self.pos)?;
        self.pos = next;
        Some(sentence)
    }
}

fn split_sentence(text: &str, pos: usize) -> Option<(Sentence, usize)> {
    if pos >= text.len() {
        return None;
    }
    // Blank text is one empty sentence whose separator is the whole input.
    if text[pos..].trim().is_empty() {
        let sentence = Sentence {
            text: String::new(),
            separator: text[pos..].to_string(),
        };
        return Some((sentence, text.len()));
    }
    let (body_end, next) = next_boundary(text, pos);
    let sentence = Sentence {
        text: text[pos..body_end].to_string(),
        separator: text[body_end..next].to_string(),
    };
    Some((sentence, next))
}

/// Finds the end of the sentence starting at `start`.
///
/// Returns `(body_end, next_start)`; the bytes between them are the
/// separator. Both offsets are absolute within `text`.
fn next_boundary(text: &str, start: usize) -> (usize, usize) {
    let rest = &text[start..];
    let mut chars = rest.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if TERMINATORS.contains(&c) {
            let mut end = i + c.len_utf8();
            let mut only_periods = c == '.';
            while let Some(&(j, d)) = chars.peek() {
                if TERMINATORS.contains(&d) {
                    only_periods &= d == '.';
                } else if !CLOSERS.contains(&d) {
                    break;
                }
                end = j + d.len_utf8();
                chars.next();
            }

            let tail = &rest[end..];
            let sep = whitespace_len(tail);
            if tail.is_empty() || sep == tail.len() {
                return (start + end, text.len());
            }
            // "3.14", "a.b"
            if sep == 0 {
                continue;
            }
            if only_periods && (is_abbreviation(&rest[..i]) || starts_lowercase(&tail[sep..])) {
                continue;
            }
            return (start + end, start + end + sep);
        }

        if c == '\n' {
            let body = rest[..i].trim_end();
            if body.trim_start().is_empty() {
                continue;
            }
            let sep = whitespace_len(&rest[i..]);
            let next = &rest[i + sep..];
            if next.is_empty() {
                return (start + body.len(), text.len());
            }
            let blank_line = rest[i..i + sep].matches('\n').count() >= 2;
            if blank_line || (!body.ends_with('-') && starts_new_line(next)) {
                return (start + body.len(), start + i + sep);
            }
        }
    }

    (start + rest.trim_end().len(), text.len())
}

fn whitespace_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

fn is_abbreviation(prefix: &str) -> bool {
    let Some(token) = prefix.split_whitespace().last() else {
        return false;
    };
    let token = token.trim_start_matches(|c: char| !c.is_alphanumeric());

    let mut chars = token.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        // Initials such as "J. Smith"; a lone "I" is a pronoun.
        return first.is_uppercase() && first != 'I';
    }

    let lower = token.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

fn starts_lowercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_lowercase)
}

fn starts_new_line(s: &str) -> bool {
    s.chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit() || BULLETS.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(input: &str) -> Vec<String> {
        Sentences::new(input).map(|s| s.text).collect()
    }

    fn rejoin(input: &str) -> String {
        Sentences::new(input)
            .map(|s| format!("{}{}", s.text, s.separator))
            .collect()
    }

    #[test]
    fn test_terminal_punctuation() {
        assert_eq!(
            texts("Hello world. How are you? Fine!"),
            vec!["Hello world.", "How are you?", "Fine!"]
        );
    }

    #[test]
    fn test_separator_is_preserved() {
        let sentences: Vec<_> = Sentences::new("One.  Two.\n").collect();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].separator, "  ");
        assert_eq!(sentences[1].separator, "\n");
    }

    #[test]
    fn test_concatenation_reproduces_source() {
        let input = "  Intro line\nNext Line. third? yes!\n\n- bullet one\n- bullet two\nwrap-\nped word... End";
        assert_eq!(rejoin(input), input);

        let input = "Dr. Who met Mr. X at 3.14 p.m. in St. Ives.\r\nThe end.";
        assert_eq!(rejoin(input), input);

        let input = "  \n ";
        assert_eq!(rejoin(input), input);
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        assert_eq!(
            texts("Dr. Smith arrived. He sat down."),
            vec!["Dr. Smith arrived.", "He sat down."]
        );
        assert_eq!(texts("See e.g. Figure 2."), vec!["See e.g. Figure 2."]);
        assert_eq!(texts("Ask J. Smith now."), vec!["Ask J. Smith now."]);
    }

    #[test]
    fn test_decimal_numbers_do_not_split() {
        assert_eq!(texts("Pi is 3.14 today. Yes."), vec!["Pi is 3.14 today.", "Yes."]);
    }

    #[test]
    fn test_lowercase_continuation_does_not_split() {
        assert_eq!(texts("the end. and more."), vec!["the end. and more."]);
    }

    #[test]
    fn test_closing_quote_belongs_to_sentence() {
        assert_eq!(
            texts("He said \"Stop.\" Then left."),
            vec!["He said \"Stop.\"", "Then left."]
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(texts("First line\nSecond line"), vec!["First line", "Second line"]);
        assert_eq!(texts("broken sen-\ntence here"), vec!["broken sen-\ntence here"]);
        assert_eq!(
            texts("first line\ncontinues here"),
            vec!["first line\ncontinues here"]
        );
        assert_eq!(texts("Para one\n\npara two"), vec!["Para one", "para two"]);
    }

    #[test]
    fn test_bullets_start_sentences() {
        assert_eq!(
            texts("Items:\n• one\n• two"),
            vec!["Items:", "• one", "• two"]
        );
    }

    #[test]
    fn test_leading_whitespace_kept_on_first_sentence() {
        let sentences: Vec<_> = Sentences::new("\n  Hello.").collect();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "\n  Hello.");
    }

    #[test]
    fn test_blank_text_is_one_empty_sentence() {
        assert!(texts("").is_empty());

        let sentences: Vec<_> = Sentences::new(" \n\t ").collect();
        assert_eq!(
            sentences,
            vec![Sentence {
                text: String::new(),
                separator: " \n\t ".to_string(),
            }]
        );
    }

    #[test]
    fn test_into_sentences_owned() {
        let owned: Vec<_> = IntoSentences::new(Arc::from("A b. C d.")).collect();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned[1].text, "C d.");
    }
}
