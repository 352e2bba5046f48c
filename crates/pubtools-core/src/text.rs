//! Tokenisation, sentence splitting and link extraction for publication text.
//!
//! Two token forms are produced from the same input: *processed* words
//! (lowercased, punctuation stripped) are what scores are keyed on, while
//! *extracted* words keep the original casing and inner punctuation so a
//! human-readable name can be recovered. Both are produced by the same
//! whitespace rules so that, for ordinary input, the i-th processed word
//! corresponds to the i-th extracted word.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// hyphen-minus or hyphen
const HYPHENATION_CODES: &str = r"\x{2D}\x{2010}";
const WHITESPACE_CODES: &str = r"\p{Z}\p{Cc}\p{Cf}";
const LINEBREAK_CODES: &str = r"\x{0A}\x{0B}\x{0C}\x{0D}\x{85}\x{2028}\x{2029}";
// en dash or em dash
const DIVIDER_DASH_CODES: &str = r"\x{2013}\x{2014}";
// except '
const APOSTROPHE_CODES: &str = r"\x{60}\x{B4}\x{2018}\x{2019}\x{2BC}\x{201B}\x{91}\x{92}";
// except "
const QUOTATION_CODES: &str =
    r"\x{AB}\x{BB}\x{201A}\x{201C}\x{201D}\x{201E}\x{201F}\x{2039}\x{203A}\x{2E42}";

/// Punctuation trimmed from the ends of words (besides `.` and `?`).
static SEPARATOR_CODES: Lazy<String> =
    Lazy::new(|| format!(r#",;:(\[{{<>}}\])'{APOSTROPHE_CODES}"{QUOTATION_CODES}"#));

static HYPHENATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "[{HYPHENATION_CODES}][{WHITESPACE_CODES}]*[{LINEBREAK_CODES}][{WHITESPACE_CODES}]*"
    ))
    .unwrap()
});
static WORD_DIVIDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{DIVIDER_DASH_CODES}/]|--|---")).unwrap());
static PERIOD_FIX_UPPERCASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.)(\.|\?)(\p{Lu})").unwrap());
static PERIOD_FIX_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\p{N}])(\.|\?)(\p{N})").unwrap());
static APOSTROPHE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{APOSTROPHE_CODES}]")).unwrap());
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[[\p{P}\p{S}]&&[^']]").unwrap());
static PUNCTUATION_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{P}\p{S}]+$").unwrap());
static SEPARATOR_TRIM: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^[.?{}]$", *SEPARATOR_CODES)).unwrap());
static POSSESSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("['{APOSTROPHE_CODES}]s$")).unwrap());
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{WHITESPACE_CODES}]+")).unwrap());
static POSSESSIVE_REMOVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"'s( |$)").unwrap());
static APOSTROPHE_REMOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"('+ '+)|((^| )'+)|('+( |$))").unwrap());
static INTERNAL_TRIM: Lazy<Regex> = Lazy::new(|| Regex::new(r"  +").unwrap());
static UPPERCASE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lu}$").unwrap());
static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\. |\? |\.$|\?$").unwrap());

const EMAIL: &str = r"[a-zA-Z0-9+._-]+@[a-zA-Z0-9.-]+\.[a-z]{2,}";

/// Everything of a link after its leading delimiter. A trailing `(?P<sp> )`
/// stands for "followed by a space" and is not part of the link.
static LINK_REST: Lazy<String> = Lazy::new(|| {
    let sep = &*SEPARATOR_CODES;
    format!(
        concat!(
            r"[{sep}]*[^ \p{{L}}\p{{N}}.?{sep}]*",
            r"(?:[a-zA-Z0-9][a-zA-Z0-9+._-]*@|[a-zA-Z][a-zA-Z0-9+.-]*://[ ]?)?",
            r"(?:(?:(?:[a-zA-Z0-9]|[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9])\.)+[a-z]{{2,}}|(?:[0-9]{{1,3}}\.){{3}}[0-9]{{1,3}})",
            r"(?::[1-9][0-9]{{0,4}})?",
            r"(?:[/?#][^ {div}]*",
            r"|[^ \p{{L}}\p{{N}}.?{sep}]*[{sep}]*(?:(?:[.?{sep}]|[{div}]|--)(?:{email})?|(?P<sp> )|$)",
            r"|\p{{Lu}}[^ {div}.]*)"
        ),
        sep = sep,
        div = DIVIDER_DASH_CODES,
        email = EMAIL,
    )
});
/// A link that may start right where it is (start of input, or after ` `, `.`, `?`).
static LINK_FREE_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?:|--|[{DIVIDER_DASH_CODES}]|[{}]){}",
        *SEPARATOR_CODES, *LINK_REST
    ))
    .unwrap()
});
/// A link that must be introduced by a dash or separator character.
static LINK_DELIMITED_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^(?:--|[{DIVIDER_DASH_CODES}]|[{}]){}",
        *SEPARATOR_CODES, *LINK_REST
    ))
    .unwrap()
});

static LINK_END_REMOVE_HACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(([)][.?]?|[(])\p{Lu}[\p{L}\p{N}'-]*|Supplementary|Contact:|Operating)$").unwrap()
});
static LINK_NEXT_REMOVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}[^.]*$").unwrap());
static EMAIL_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("^{EMAIL}$")).unwrap());
static LINK_EMAIL_REMOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(\)|Contact:|/\.){EMAIL}")).unwrap());
static LINK_END_REMOVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}/]*$").unwrap());
static LINK_START_REMOVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\p{L}\p{N}]*").unwrap());
static KNOWN_SCHEMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(http://|https://|ftp://)").unwrap());
static TILDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{223C}\x{2DC}]").unwrap());
static HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x{2010}").unwrap());

/// Text operations the candidate extraction relies on.
pub trait TextNormalizer {
    /// Lowercased words with punctuation removed.
    fn process(&self, input: &str) -> Vec<String>;

    /// Like [`process`](Self::process), keeping `extracted` index-aligned with
    /// the output when words are dropped.
    fn process_aligned(&self, input: &str, extracted: &mut Vec<String>) -> Vec<String>;

    /// Words in their original casing, trimmed of surrounding punctuation.
    fn extract(&self, input: &str) -> Vec<String>;

    fn sentences(&self, input: &str) -> Vec<String>;

    /// URLs, bare domains and emails mentioned in the text.
    fn links(&self, input: &str) -> Vec<String>;

    /// The text with links cut out.
    fn remove_links(&self, input: &str) -> String;
}

/// Rule-based [`TextNormalizer`]. Numbers are kept, there is no stopword
/// list and no stemming.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreProcessor;

impl PreProcessor {
    pub fn new() -> Self {
        Self
    }

    fn period_fix(input: &str) -> String {
        let fix = |caps: &Captures| format!("{}. {}", &caps[1], &caps[3]);
        let input = PERIOD_FIX_UPPERCASE.replace_all(input, fix);
        PERIOD_FIX_NUMBER.replace_all(&input, fix).into_owned()
    }

    /// Whitespace cleanup shared by every entry point.
    fn squash(input: &str) -> String {
        let input = WHITESPACE.replace_all(input, " ");
        INTERNAL_TRIM
            .replace_all(&input, " ")
            .trim_matches(|c: char| c <= ' ')
            .to_string()
    }

    /// Hyphenation and divider cleanup plus the period fix.
    fn prepare_words(input: &str) -> String {
        let input = HYPHENATION.replace_all(input, "");
        let input = WORD_DIVIDER.replace_all(&input, " ");
        Self::period_fix(&input)
    }

    fn prepare_links(input: &str) -> String {
        let input = HYPHENATION.replace_all(input, "");
        Self::squash(&input)
    }

    /// Start and end (byte offsets) of every link in already prepared input.
    fn link_spans(input: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut from = 0;
        while from < input.len() {
            let found = input[from..].char_indices().find_map(|(offset, _)| {
                let at = from + offset;
                let free = at == 0 || matches!(input[..at].chars().next_back(), Some(' ' | '.' | '?'));
                let re = if free { &*LINK_FREE_START } else { &*LINK_DELIMITED_START };
                re.captures(&input[at..]).map(|caps| {
                    let whole = caps.get(0).map_or(0, |m| m.end());
                    let end = if caps.name("sp").is_some() { whole - 1 } else { whole };
                    (at, at + end)
                })
            });
            match found {
                Some((start, end)) if end > start => {
                    spans.push((start, end));
                    from = end;
                }
                _ => break,
            }
        }
        spans
    }

    /// A "link" without a slash that is probably just two words glued by a
    /// period (`e.g. results.Methods`).
    fn not_link(link: &str, all_two_part: bool) -> bool {
        if link.contains('/') {
            return false;
        }
        let link = LINK_END_REMOVE.replace_all(link, "");
        let link = LINK_START_REMOVE.replace_all(&link, "");
        if let Some(period) = link.find('.') {
            if !link[..period].contains('@') {
                let domain = &link[period + 1..];
                if !domain.contains('.')
                    && ((domain.chars().count() > 3 && domain != "info") || all_two_part)
                {
                    return true;
                }
            }
        }
        false
    }
}

impl TextNormalizer for PreProcessor {
    fn process(&self, input: &str) -> Vec<String> {
        let mut ignored = Vec::new();
        self.process_aligned(input, &mut ignored)
    }

    fn process_aligned(&self, input: &str, extracted: &mut Vec<String>) -> Vec<String> {
        let input = Self::prepare_words(input);
        let input = APOSTROPHE.replace_all(&input, "'");
        let input = PUNCTUATION.replace_all(&input, "");
        let input = WHITESPACE.replace_all(&input, " ");
        let input = POSSESSIVE_REMOVE.replace_all(&input, " ");
        let input = APOSTROPHE_REMOVE.replace_all(&input, " ");
        let input = INTERNAL_TRIM.replace_all(&input, " ");
        let input = input.trim_matches(|c: char| c <= ' ').to_lowercase();

        if input.is_empty() {
            if extracted.len() == 1 {
                extracted.clear();
            }
            return Vec::new();
        }
        input.split(' ').map(str::to_string).collect()
    }

    fn extract(&self, input: &str) -> Vec<String> {
        let input = Self::squash(&Self::prepare_words(input));
        if input.is_empty() {
            return Vec::new();
        }
        input
            .split(' ')
            .filter(|w| !PUNCTUATION_ONLY.is_match(w))
            .map(|w| {
                let mut word = w;
                while let Some(c) = word.chars().next() {
                    if !SEPARATOR_TRIM.is_match(c.encode_utf8(&mut [0u8; 4])) {
                        break;
                    }
                    word = &word[c.len_utf8()..];
                }
                while let Some(c) = word.chars().next_back() {
                    if !SEPARATOR_TRIM.is_match(c.encode_utf8(&mut [0u8; 4])) {
                        break;
                    }
                    word = &word[..word.len() - c.len_utf8()];
                }
                POSSESSIVE.replacen(word, 1, "").into_owned()
            })
            .collect()
    }

    fn sentences(&self, input: &str) -> Vec<String> {
        let input = Self::squash(&Self::prepare_words(input));

        let mut output: Vec<String> = SENTENCE_SPLIT
            .split(&input)
            .map(|s| s.trim_matches(|c: char| c <= ' ').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if output.len() > 1 && !output[0].contains(' ') {
            let first = output.remove(0);
            output[0] = format!("{first} {}", output[0]);
        }
        let mut i = 1;
        while i < output.len() {
            let current = &output[i];
            let starts_upper = current
                .chars()
                .next()
                .is_some_and(|c| UPPERCASE_LETTER.is_match(c.encode_utf8(&mut [0u8; 4])));
            if !current.contains(' ') || !starts_upper {
                let current = output.remove(i);
                output[i - 1] = format!("{}. {current}", output[i - 1]);
            } else {
                i += 1;
            }
        }
        output
    }

    fn links(&self, input: &str) -> Vec<String> {
        let input = Self::prepare_links(input);

        let mut output = Vec::new();
        for (start, end) in Self::link_spans(&input) {
            let link = LINK_END_REMOVE_HACK.replace_all(&input[start..end], "");
            if Self::not_link(&link, false) {
                continue;
            }
            let mut link = link.into_owned();
            if !link.contains('/') {
                link = LINK_NEXT_REMOVE.replace_all(&link, "").into_owned();
            }
            let link = WHITESPACE.replace_all(&link, "");
            let link = LINK_EMAIL_REMOVE.replace_all(&link, "");
            let link = LINK_END_REMOVE.replace_all(&link, "");
            let link = LINK_START_REMOVE.replace_all(&link, "");
            let link = match KNOWN_SCHEMA.find(&link) {
                Some(schema) => &link[schema.start()..],
                None => &link[..],
            };
            if !link.is_empty() && !EMAIL_ONLY.is_match(link) {
                let link = TILDE.replace_all(link, "~");
                output.push(HYPHEN.replace_all(&link, "-").into_owned());
            }
        }
        output
    }

    fn remove_links(&self, input: &str) -> String {
        let input = Self::prepare_links(input);

        let ends_sentence = |at: usize| at > 0 && matches!(input.as_bytes()[at - 1], b'.' | b'?');

        let mut output = String::new();
        let mut from = 0;
        for (start, end) in Self::link_spans(&input) {
            if ends_sentence(from) {
                output.push_str(". ");
            }
            output.push_str(&input[from..start]);
            output.push(' ');

            let link = LINK_END_REMOVE_HACK.replace_all(&input[start..end], "");
            if Self::not_link(&link, true) {
                output.push_str(&link);
                output.push(' ');
            } else {
                if LINK_START_REMOVE.find(&link).is_some_and(|m| m.as_str().contains('(')) {
                    output.push('(');
                }
                if LINK_END_REMOVE.find(&link).is_some_and(|m| m.as_str().contains(')')) {
                    output.push(')');
                }
            }
            from = end;
        }
        if ends_sentence(from) {
            output.push_str(". ");
        }
        output.push_str(&input[from..]);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pp() -> PreProcessor {
        PreProcessor::new()
    }

    #[test]
    fn test_process_lowercases_and_strips() {
        assert_eq!(
            pp().process("FooBar: a tool's (fast) aligner!"),
            vec!["foobar", "a", "tool", "fast", "aligner"]
        );
        assert!(pp().process("  ... ").is_empty());
    }

    #[test]
    fn test_extract_keeps_case() {
        assert_eq!(
            pp().extract("FooBar: a tool's (fast) aligner!"),
            vec!["FooBar", "a", "tool", "fast", "aligner!"]
        );
    }

    #[test]
    fn test_process_and_extract_align() {
        let text = "The GATK (Genome Analysis Toolkit) is used - widely.";
        let mut extracted = pp().extract(text);
        let processed = pp().process_aligned(text, &mut extracted);
        assert_eq!(processed.len(), extracted.len());
    }

    #[test]
    fn test_hyphenation_and_dividers() {
        assert_eq!(pp().process("bio-\ninformatics"), vec!["bioinformatics"]);
        assert_eq!(pp().process("input/output"), vec!["input", "output"]);
        assert_eq!(pp().process("A\u{2013}B"), vec!["a", "b"]);
    }

    #[test]
    fn test_period_fix() {
        assert_eq!(pp().extract("done.Next"), vec!["done", "Next"]);
    }

    #[test]
    fn test_sentences() {
        let s = pp().sentences("We present FooBar. It aligns reads. e.g. fast. Available online.");
        assert_eq!(
            s,
            vec!["We present FooBar", "It aligns reads. e.g. fast", "Available online"]
        );
    }

    #[test]
    fn test_links_basic() {
        let links = pp().links("Available at https://github.com/foo/bar. Contact x@y.org");
        assert_eq!(links, vec!["https://github.com/foo/bar"]);
    }

    #[test]
    fn test_links_bare_domain() {
        let links = pp().links("See www.foobar.org for details");
        assert_eq!(links, vec!["www.foobar.org"]);
    }

    #[test]
    fn test_links_skip_two_words() {
        // a period between two words is not a link
        assert!(pp().links("the results.methods were").is_empty());
    }

    #[test]
    fn test_remove_links() {
        let text = pp().remove_links("FooBar is at http://foobar.org/ and works");
        assert!(!text.contains("foobar.org"));
        assert!(text.starts_with("FooBar is at"));
        assert!(text.ends_with("and works"));
    }
}
