//! Tool-title candidates from a publication title.
//!
//! Titles such as `FooBar: fast alignment of short reads` usually put the
//! tool name before a separator. Every separator match is tried and the
//! segment that yields the fewest words wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{TITLE_SEPARATOR, is_acronym, tool_title_prune, trim_ascii};
use crate::scoring::ScoringWeights;
use crate::text::TextNormalizer;

static TOOL_TITLE_INVALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(correction|erratum)( to)?$").unwrap());
static TOOL_TITLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),? (and|&) ").unwrap());
static TOOL_TITLE_SEPARATOR_ALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(,? (and|&) )|(, )").unwrap());
static ACRONYM_STOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(http:|https:|ftp:|;|, |: )").unwrap());

/// Word positions of parenthesised acronyms in `sentence`.
///
/// A positive entry is the index of a word that is abbreviated by the
/// parenthesised phrase after it (`BLAST (Basic Local Alignment Search
/// Tool)`). A negative entry is the negated index of a parenthesised word that
/// abbreviates the words before it (`Basic Local Alignment Search Tool
/// (BLAST)`). Indexes count extracted words.
pub fn acronyms<N: TextNormalizer + ?Sized>(sentence: &str, normalizer: &N) -> Vec<i32> {
    let mut acronyms = Vec::new();
    let mut previous_end = 0;
    let mut index: i32 = 0;

    loop {
        let Some(begin) = sentence[previous_end..].find(" (").map(|b| b + previous_end) else {
            break;
        };
        let Some(end) = sentence[begin + 2..].find(')').map(|e| e + begin + 2) else {
            break;
        };

        let before = trim_ascii(&sentence[previous_end..begin]);
        let mut before_extracted = normalizer.extract(before);
        normalizer.process_aligned(before, &mut before_extracted);

        let mut inside = trim_ascii(&sentence[begin..=end]);
        let mut inside_extracted = normalizer.extract(inside);
        normalizer.process_aligned(inside, &mut inside_extracted);

        if let Some(stop) = ACRONYM_STOP.find(inside) {
            inside = trim_ascii(&inside[..stop.start()]);
        }

        let before_len = before_extracted.len() as i32;
        if inside.contains(' ') && !before_extracted.is_empty() && !inside_extracted.is_empty() {
            if let Some(last) = before_extracted.last() {
                if is_acronym(last, inside, false) {
                    acronyms.push(index + before_len - 1);
                }
            }
        } else if !inside.contains(' ')
            && before_extracted.len() > 1
            && !inside_extracted.is_empty()
            && is_acronym(inside, before, false)
        {
            acronyms.push(-(index + before_len));
        }

        index += before_len + inside_extracted.len() as i32;
        match sentence[end + 1..].find(' ') {
            Some(space) => previous_end = end + 1 + space,
            None => break,
        }
    }

    acronyms
}

/// Word index of the first acronym in `sentence`, if any.
pub fn first_acronym_index<N: TextNormalizer + ?Sized>(sentence: &str, normalizer: &N) -> Option<usize> {
    acronyms(sentence, normalizer).first().map(|a| a.unsigned_abs() as usize)
}

/// One candidate segment of a title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolTitle {
    /// Extracted words before the acronym was taken out.
    pub extracted_original: String,
    /// Extracted words, acronym removed.
    pub title: String,
    /// `title` without leading and trailing generic words.
    pub pruned: String,
    pub words: usize,
}

/// The winning split of a title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleSplit {
    pub tool_titles: Vec<ToolTitle>,
    pub acronym: Option<String>,
    /// The title with the winning segment cut out, or the whole title when
    /// nothing was chosen.
    pub title_rest: String,
}

impl TitleSplit {
    fn words(&self) -> usize {
        self.tool_titles.iter().map(|t| t.words).sum()
    }
}

fn tool_title<N: TextNormalizer + ?Sized>(
    segment: &str,
    acronym_index: Option<usize>,
    normalizer: &N,
) -> (ToolTitle, Option<String>) {
    let mut extracted = normalizer.extract(segment);
    let extracted_original = extracted.join(" ");
    normalizer.process_aligned(segment, &mut extracted);
    let acronym = match acronym_index {
        Some(index) if index < extracted.len() => Some(extracted.remove(index)),
        _ => None,
    };
    let title = extracted.join(" ");
    let words = extracted.len();
    let pruned = tool_title_prune(&mut extracted);
    (
        ToolTitle {
            extracted_original,
            title,
            pruned,
            words,
        },
        acronym,
    )
}

/// Split `title` into tool-title candidates.
pub fn split_title<N: TextNormalizer + ?Sized>(title: &str, normalizer: &N, weights: &ScoringWeights) -> TitleSplit {
    let mut best = TitleSplit {
        title_rest: title.to_string(),
        ..TitleSplit::default()
    };

    let mut from = 0;
    while from < title.len() {
        let Some(separator) = TITLE_SEPARATOR.find_at(title, from) else {
            break;
        };
        let segment = trim_ascii(&title[from..separator.start()]);
        if TOOL_TITLE_INVALID.is_match(segment) {
            from = separator.end();
            continue;
        }

        let mut current = TitleSplit::default();
        let acronym_index = first_acronym_index(segment, normalizer);
        if !TOOL_TITLE_SEPARATOR.is_match(segment)
            || acronym_index.is_some()
            || segment.split(' ').count() > weights.separator_max_words
        {
            let (tool_title, acronym) = tool_title(segment, acronym_index, normalizer);
            current.tool_titles.push(tool_title);
            current.acronym = acronym;
        } else {
            let mut parts: Vec<&str> = TOOL_TITLE_SEPARATOR_ALL.split(segment).collect();
            while parts.last().is_some_and(|p| p.is_empty()) {
                parts.pop();
            }
            for part in parts {
                current.tool_titles.push(tool_title(part, None, normalizer).0);
            }
        }

        if current.words() < best.words() || best.tool_titles.is_empty() {
            current.title_rest = format!(
                "{} {}",
                trim_ascii(&title[..from]),
                trim_ascii(&title[separator.start()..])
            );
            best = current;
        }

        from = separator.end();
    }

    if from == 0 {
        let (standalone, _) = tool_title(title, None, normalizer);
        if standalone.pruned.chars().count() <= weights.standalone_max_chars {
            best.tool_titles.push(standalone);
            best.title_rest = String::new();
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::PreProcessor;

    fn split(title: &str) -> TitleSplit {
        split_title(title, &PreProcessor::new(), &ScoringWeights::default())
    }

    #[test]
    fn test_acronym_after_phrase() {
        let pp = PreProcessor::new();
        let found = acronyms("The Basic Local Alignment Search Tool (BLAST) is fast", &pp);
        assert_eq!(found, vec![-6]);
        assert_eq!(
            first_acronym_index("The Basic Local Alignment Search Tool (BLAST) is fast", &pp),
            Some(6)
        );
    }

    #[test]
    fn test_acronym_before_phrase() {
        let pp = PreProcessor::new();
        assert_eq!(acronyms("We use BLAST (Basic Local Alignment Search Tool) here", &pp), vec![2]);
    }

    #[test]
    fn test_no_acronym() {
        let pp = PreProcessor::new();
        assert!(acronyms("Results (see below) are shown", &pp).is_empty());
        assert!(acronyms("No parentheses at all", &pp).is_empty());
        assert_eq!(first_acronym_index("Unclosed (paren", &pp), None);
    }

    #[test]
    fn test_split_on_colon() {
        let split = split("FooBar: a tool for aligning reads");
        assert_eq!(split.tool_titles.len(), 1);
        assert_eq!(split.tool_titles[0].title, "FooBar");
        assert_eq!(split.tool_titles[0].pruned, "FooBar");
        assert_eq!(split.title_rest, " : a tool for aligning reads");
    }

    #[test]
    fn test_split_prunes_generic_words() {
        let split = split("FooBar web server: predicting structure");
        assert_eq!(split.tool_titles[0].title, "FooBar web server");
        assert_eq!(split.tool_titles[0].pruned, "FooBar");
    }

    #[test]
    fn test_split_on_and() {
        let split = split("FooDB and BarDB: two databases");
        let titles: Vec<&str> = split.tool_titles.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["FooDB", "BarDB"]);
    }

    #[test]
    fn test_split_fewest_words_wins() {
        let split = split("Aligning many short reads quickly - Quark - a new approach");
        assert_eq!(split.tool_titles[0].title, "Quark");
    }

    #[test]
    fn test_split_acronym_removed() {
        let split = split("Sequence Alignment Kit (SAK): fast alignment");
        assert_eq!(split.acronym.as_deref(), Some("SAK"));
        assert_eq!(split.tool_titles[0].title, "Sequence Alignment Kit");
        assert_eq!(split.tool_titles[0].extracted_original, "Sequence Alignment Kit SAK");
    }

    #[test]
    fn test_erratum_skipped() {
        let erratum = split("Erratum to: FooBar: a tool");
        assert_eq!(erratum.tool_titles[0].title, "FooBar");
    }

    #[test]
    fn test_standalone() {
        let standalone = split("QuickAlign");
        assert_eq!(standalone.tool_titles.len(), 1);
        assert_eq!(standalone.tool_titles[0].title, "QuickAlign");
        assert_eq!(standalone.title_rest, "");

        let plain = split("A long descriptive title with no separator at all");
        assert!(plain.tool_titles.is_empty());
        assert_eq!(plain.title_rest, "A long descriptive title with no separator at all");
    }
}
