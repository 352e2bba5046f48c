//! Registry descriptions assembled from publication titles, linked pages
//! and abstracts.
//!
//! A description opens with curator messages (`> NOT INCLUDED! | ...`),
//! followed by the best page-derived snippets ordered by priority, and falls
//! back to the first abstract sentences when pages give nothing new.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{TITLE_SEPARATOR, WEBPAGE_TITLE_SEPARATOR, WHITESPACE, char_len, fill_to_min, prune_to_max};
use crate::links::BiotoolsLink;
use crate::model::{RegistryEntry, Result2, Suggestion2};
use crate::page::{PageRecord, Pages};
use crate::score2::Score2Weights;
use crate::text::TextNormalizer;

const NAME_DIFFERENT_MESSAGE_LIMIT: usize = 5;

const SCHEMA_DESCRIPTION_MIN: usize = 10;
const SCHEMA_DESCRIPTION_MAX: usize = 1000;

const DESCRIPTION_MIN_LENGTH: usize = 32;
const DESCRIPTION_LONG_LENGTH: usize = 160;
const DESCRIPTION_MINMIN_LENGTH: usize = 24;
const DESCRIPTION_MESSAGE_MAX_LENGTH: usize = 500;

const NO_DESCRIPTION: &str = "NO DESCRIPTION FOUND FROM LINKS OR ABSTRACT!";
const BIOTOOLS_PREFIX: &str = "bio.tools/";

const DESCRIPTION_LINK_TYPES: &[&str] = &["Other", "Repository", "Registry"];
const DESCRIPTION_DOC_TYPES: &[&str] = &[
    "General",
    "Manual",
    "Installation instructions",
    "Tutorial",
    "Training material",
    "API documentation",
];
const DESCRIPTION_DOWNLOAD_TYPES: &[&str] = &["Source code", "Container file"];

static FIND_NAME_NOT_ALPHANUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]").unwrap());
static FIND_NAME_CAMEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\p{Ll})(\p{Lu})").unwrap());
static FIND_NAME_TO_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\p{L})(\p{N})").unwrap());
static FIND_NAME_FROM_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\p{N})(\p{L})").unwrap());
static FIND_NAME_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{N}").unwrap());

/// One candidate snippet. Lower priority sorts first.
#[derive(Debug, Clone)]
struct Snippet {
    text: String,
    /// The longest title-separated segment, when it differs from `text`.
    separated: Option<String>,
    priority: usize,
}

/// Which page table a link is looked up in.
#[derive(Debug, Clone, Copy)]
enum PageKind {
    /// Web page first, then doc.
    Any,
    Webpage,
    Doc,
}

/// The longest segment of `title` between separators.
pub fn description_from_title(title: &str, separator: &Regex) -> String {
    separator
        .split(title)
        .fold("", |best, segment| if char_len(segment) > char_len(best) { segment } else { best })
        .to_string()
}

/// A tool name compiled into a loose pattern: a separator may stand between
/// any two alphanumeric runs and at case or digit boundaries.
pub struct NamePattern(Option<Regex>);

impl NamePattern {
    pub fn new(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            return Self(None);
        }
        let pattern = FIND_NAME_NOT_ALPHANUM.replace_all(name, ".?");
        let pattern = FIND_NAME_CAMEL.replace_all(&pattern, "${1}.?${2}");
        let pattern = FIND_NAME_TO_NUMBER.replace_all(&pattern, "${1}.?${2}");
        let pattern = FIND_NAME_FROM_NUMBER.replace_all(&pattern, "${1}.?${2}");
        let pattern = FIND_NAME_NUMBER.replace_all(&pattern, ".?");
        Self(Regex::new(&format!("(?i){pattern}")).ok())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.as_ref().is_some_and(|re| re.is_match(text))
    }
}

fn clean_line(line: &str) -> String {
    WHITESPACE.replace_all(line, " ").trim().to_string()
}

/// Builds descriptions for Pass 2 results.
pub struct DescriptionBuilder<'a, N: TextNormalizer + ?Sized> {
    entries: &'a [RegistryEntry],
    normalizer: &'a N,
    pages: Pages<'a>,
    weights: &'a Score2Weights,
}

impl<'a, N: TextNormalizer + ?Sized> DescriptionBuilder<'a, N> {
    pub fn new(entries: &'a [RegistryEntry], normalizer: &'a N, pages: Pages<'a>, weights: &'a Score2Weights) -> Self {
        Self {
            entries,
            normalizer,
            pages,
            weights,
        }
    }

    fn add_snippet(&self, snippets: &mut Vec<Snippet>, text: &str, priority: usize, scraped: bool) -> bool {
        let text = text.trim();
        let text = text.strip_suffix('.').unwrap_or(text);
        if text.is_empty() {
            return false;
        }
        let separated = if self.normalizer.sentences(text).len() == 1 {
            Some(description_from_title(text, &WEBPAGE_TITLE_SEPARATOR)).filter(|s| s != text)
        } else {
            None
        };
        let same = |a: &str, b: &str| a.to_lowercase() == b.to_lowercase();
        let duplicate = snippets.iter().any(|s| {
            same(&s.text, text)
                || s.separated.as_deref().is_some_and(|sep| same(sep, text))
                || separated.as_deref().is_some_and(|new| {
                    same(&s.text, new) || s.separated.as_deref().is_some_and(|sep| same(sep, new))
                })
        });
        if duplicate {
            return false;
        }
        snippets.push(Snippet {
            text: text.to_string(),
            separated,
            priority: priority + if scraped { 0 } else { 2 },
        });
        true
    }

    fn live_page(&self, url: &str, kind: PageKind) -> Option<PageRecord> {
        let page = match kind {
            PageKind::Any => self.pages.any(url),
            PageKind::Webpage => self.pages.webpage(url),
            PageKind::Doc => self.pages.doc(url),
        };
        page.filter(|p| !p.broken && p.is_html())
    }

    fn from_page(&self, snippets: &mut Vec<Snippet>, url: &str, kind: PageKind, min_length: usize, name: &NamePattern) {
        let Some(page) = self.live_page(url, kind) else {
            return;
        };
        let scraped = page.scraped;

        let title = clean_line(&description_from_title(&page.title, &WEBPAGE_TITLE_SEPARATOR));
        if char_len(&title) >= min_length {
            self.add_snippet(snippets, &title, 1, scraped);
        }

        let mut name_found = false;
        let mut name_found_long = false;
        let mut sentences = 0;
        let mut sentences_min_length = 0;
        for line in page.content.split(['\n', '\r']) {
            let line = clean_line(line);
            if line.is_empty() || line.starts_with('<') {
                continue;
            }
            let line = line.replace('|', ":");
            let length = char_len(&line);
            sentences += 1;
            if sentences <= 2 {
                if length >= min_length {
                    self.add_snippet(snippets, &line, 2, scraped);
                    if name.is_match(&line) {
                        name_found = true;
                        // a truncated meta description can be the first line
                        if length >= DESCRIPTION_LONG_LENGTH && (sentences != 1 || !line.ends_with("...")) {
                            name_found_long = true;
                        }
                    }
                }
                continue;
            }
            if name_found_long {
                break;
            }
            if length < min_length {
                continue;
            }
            sentences_min_length += 1;
            if length >= DESCRIPTION_LONG_LENGTH && name.is_match(&line) {
                self.add_snippet(snippets, &line, 2 + sentences_min_length, scraped);
                name_found = true;
                name_found_long = true;
            } else if !name_found {
                if name.is_match(&line) {
                    self.add_snippet(snippets, &line, 2 + sentences_min_length, scraped);
                    name_found = true;
                } else if sentences_min_length <= 2 {
                    self.add_snippet(snippets, &line, 2 + sentences, scraped);
                }
            }
        }
    }

    /// Shorten snippets from the end until their joined length fits `max_length`.
    fn limit(&self, snippets: &mut Vec<Snippet>, max_length: usize) {
        if max_length < 1 {
            snippets.clear();
            return;
        }
        let joined_length = |snippets: &[Snippet]| {
            snippets.iter().map(|s| char_len(&s.text)).sum::<usize>() + snippets.len().saturating_sub(1) * 3
        };
        while joined_length(snippets) > max_length {
            let len = snippets.len();
            let shortened = (1..=len.min(3)).rev().map(|back| len - back).rev().find_map(|i| {
                let sentences = self.normalizer.sentences(&snippets[i].text);
                (sentences.len() > 1).then(|| (i, sentences[0].clone()))
            });
            match shortened {
                Some((i, first)) => snippets[i].text = first,
                None if len > 1 => {
                    snippets.pop();
                }
                None => {
                    let last = &mut snippets[len - 1];
                    last.text = prune_to_max(&last.text, max_length);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn from_links(
        &self,
        snippets: &mut Vec<Snippet>,
        homepage: &str,
        links: &[BiotoolsLink],
        documentations: &[BiotoolsLink],
        downloads: &[BiotoolsLink],
        min_length: usize,
        max_length: usize,
        name: &str,
    ) -> String {
        let name = &NamePattern::new(name);
        if !homepage.is_empty() {
            self.from_page(snippets, homepage, PageKind::Any, min_length, name);
        }
        for link in links.iter().filter(|l| DESCRIPTION_LINK_TYPES.contains(&l.link_type.as_str())) {
            self.from_page(snippets, &link.url, PageKind::Webpage, min_length, name);
        }
        for doc in documentations
            .iter()
            .filter(|l| DESCRIPTION_DOC_TYPES.contains(&l.link_type.as_str()))
        {
            self.from_page(snippets, &doc.url, PageKind::Doc, min_length, name);
        }
        for download in downloads
            .iter()
            .filter(|l| DESCRIPTION_DOWNLOAD_TYPES.contains(&l.link_type.as_str()))
        {
            self.from_page(snippets, &download.url, PageKind::Webpage, min_length, name);
        }
        snippets.sort_by_key(|s| s.priority);
        self.limit(snippets, max_length);
        snippets.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" | ")
    }

    fn entry(&self, index: usize) -> &'a RegistryEntry {
        &self.entries[index]
    }

    fn messages(&self, suggestion: Option<&Suggestion2>, result: &Result2) -> Vec<String> {
        let w = self.weights;
        let mut messages = Vec::new();
        match suggestion {
            Some(s) if !s.include(w.score_min, w.score2_min) => messages.push("NOT INCLUDED!".to_string()),
            None => messages.push("NOT INCLUDED!".to_string()),
            Some(s) if s.low_confidence(w.score_min, w.score2_min, w.low_confidence) => {
                messages.push("LOW CONFIDENCE!".to_string())
            }
            Some(_) => {}
        }
        if suggestion.is_some_and(|s| s.homepage_broken) {
            messages.push("HOMEPAGE BROKEN!".to_string());
        } else if suggestion.is_none_or(|s| s.homepage_missing) {
            messages.push("HOMEPAGE MISSING!".to_string());
        }

        let ids = |existing: &[usize], sep: &str| {
            existing
                .iter()
                .map(|&e| format!("{BIOTOOLS_PREFIX}{}", self.entry(e).biotools_id))
                .collect::<Vec<_>>()
                .join(sep)
        };
        let ids_named = |existing: &[usize]| {
            existing
                .iter()
                .map(|&e| self.entry(e))
                .map(|e| format!("{BIOTOOLS_PREFIX}{} ({})", e.biotools_id, e.name))
                .collect::<Vec<_>>()
                .join(", ")
        };

        if let Some(s) = suggestion {
            if !s.publication_and_name_existing.is_empty() {
                messages.push(format!("EXISTING AS {}", ids(&s.publication_and_name_existing, ", ")));
            }
            if !s.name_existing_some_publication_different.is_empty() {
                messages.push(format!(
                    "EXISTING AS (SOME PUB. MISSING) {}",
                    ids(&s.name_existing_some_publication_different, ", ")
                ));
            }
            if !s.some_publication_existing_name_different.is_empty() {
                let limited = &s.some_publication_existing_name_different
                    [..s.some_publication_existing_name_different.len().min(NAME_DIFFERENT_MESSAGE_LIMIT)];
                messages.push(format!(
                    "TOOL ({}) EXISTING UNDER DIFFERENT NAME AS {}",
                    s.extracted,
                    ids_named(limited)
                ));
            }
            if !s.name_existing_publication_different.is_empty() {
                messages.push(format!(
                    "NAME EQUAL TO (PUB. DIFFERENT) {}",
                    ids(&s.name_existing_publication_different, ", ")
                ));
            }
            if !result.name_match.is_empty() {
                messages.push(format!(
                    "NAME ({}) SIMILAR TO (PUB. DIFFERENT) {}",
                    s.extracted,
                    ids_named(&result.name_match)
                ));
            }
        }
        if !result.link_match.is_empty() {
            let common: Vec<String> = result
                .link_match
                .iter()
                .zip(&result.link_match_links)
                .map(|(&e, links)| {
                    let mut unique: Vec<&str> = Vec::new();
                    for link in links {
                        if !unique.contains(&link.as_str()) {
                            unique.push(link);
                        }
                    }
                    format!("{BIOTOOLS_PREFIX}{} ({})", self.entry(e).biotools_id, unique.join(" ; "))
                })
                .collect();
            messages.push(format!("COMMON LINK WITH (PUB. & NAME DIFFERENT) {}", common.join(", ")));
        }
        if result.suggestions.len() > 1 {
            let others: Vec<String> = result.suggestions[1..]
                .iter()
                .map(|s| {
                    let existing: Vec<usize> = s
                        .publication_and_name_existing
                        .iter()
                        .chain(&s.name_existing_some_publication_different)
                        .chain(&s.name_existing_publication_different)
                        .copied()
                        .collect();
                    if existing.is_empty() {
                        format!("'{}'", s.extracted)
                    } else {
                        format!("'{}' ({})", s.extracted, ids(&existing, "; "))
                    }
                })
                .collect();
            messages.push(format!("CORRECT NAME OF TOOL COULD ALSO BE {}", others.join(", ")));
        }
        messages
    }

    fn from_abstracts(&self, result: &Result2, used: usize) -> String {
        let mut descriptions: Vec<String> = Vec::new();
        let mut length = 0;
        for sentences in &result.abstract_sentences {
            if used + length >= SCHEMA_DESCRIPTION_MAX {
                break;
            }
            let Some(first) = sentences.first() else {
                continue;
            };
            let mut end = false;
            let mut description = prune_to_max(
                &clean_line(&first.replace('|', ":")),
                SCHEMA_DESCRIPTION_MAX.saturating_sub(used + length),
            );
            for sentence in &sentences[1..] {
                let sentence = clean_line(&sentence.replace('|', ":"));
                if used + length + char_len(&description) + 2 + char_len(&sentence) <= SCHEMA_DESCRIPTION_MAX {
                    description.push_str(". ");
                    description.push_str(&sentence);
                } else {
                    end = true;
                    break;
                }
            }
            length += char_len(&description) + 3;
            descriptions.push(description);
            if end {
                break;
            }
        }
        if descriptions.is_empty() {
            prune_to_max(NO_DESCRIPTION, SCHEMA_DESCRIPTION_MAX.saturating_sub(used))
        } else {
            descriptions.join(" | ")
        }
    }

    /// The registry description for `result`, whose top suggestion (if any)
    /// is `suggestion` with the given usable homepage and links.
    #[allow(clippy::too_many_arguments)]
    pub fn describe(
        &self,
        result: &Result2,
        suggestion: Option<&Suggestion2>,
        homepage: &str,
        links: &[BiotoolsLink],
        documentations: &[BiotoolsLink],
        downloads: &[BiotoolsLink],
        name: &str,
    ) -> String {
        let mut description = String::new();
        let mut room = true;
        for message in self.messages(suggestion, result) {
            let message = format!("> {message} | ");
            if room && char_len(&description) + char_len(&message) <= DESCRIPTION_MESSAGE_MAX_LENGTH {
                description.push_str(&message);
            } else {
                room = false;
                tracing::warn!(message = %message, name, "no room left for description message");
            }
        }

        let mut snippets = Vec::new();
        for title in &result.title {
            let title = clean_line(&description_from_title(title, &TITLE_SEPARATOR));
            if char_len(&title) >= DESCRIPTION_MINMIN_LENGTH {
                self.add_snippet(&mut snippets, &title, 0, true);
            }
        }
        let initial = snippets.len();
        let max_length = SCHEMA_DESCRIPTION_MAX.saturating_sub(char_len(&description));
        let mut from_links = self.from_links(
            &mut snippets,
            homepage,
            links,
            documentations,
            downloads,
            DESCRIPTION_MIN_LENGTH,
            max_length,
            name,
        );
        if snippets.len() <= initial {
            from_links = self.from_links(
                &mut snippets,
                homepage,
                links,
                documentations,
                downloads,
                DESCRIPTION_MINMIN_LENGTH,
                max_length,
                name,
            );
        }
        description.push_str(&from_links);

        if snippets.len() <= initial && char_len(&description) + 4 <= SCHEMA_DESCRIPTION_MAX {
            if !from_links.is_empty() {
                description.push_str(" | ");
            }
            let abstracts = self.from_abstracts(result, char_len(&description));
            description.push_str(&abstracts);
        }

        let original = description.clone();
        if char_len(&description) < SCHEMA_DESCRIPTION_MIN {
            description = fill_to_min(&description, SCHEMA_DESCRIPTION_MIN);
            tracing::warn!(from = %original, to = %description, name, "description filled to min");
        }
        if char_len(&description) > SCHEMA_DESCRIPTION_MAX {
            description = prune_to_max(&description, SCHEMA_DESCRIPTION_MAX);
            tracing::warn!(from = %original, to = %description, name, "description pruned to max");
        }
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PubIds, Result1, Suggestion1};
    use crate::page::MemoryPageStore;
    use crate::text::PreProcessor;

    fn result(title: &str, abstract_sentences: &[&str], score: Option<f64>) -> Result2 {
        Result2::from(Result1 {
            pub_ids: PubIds::new("1", "", ""),
            title: title.to_string(),
            abstract_sentences: abstract_sentences.iter().map(|s| s.to_string()).collect(),
            suggestions: score
                .map(|score| Suggestion1 {
                    score,
                    extracted: "FooBar".to_string(),
                    processed: "foobar".to_string(),
                    ..Default::default()
                })
                .into_iter()
                .collect(),
            ..Default::default()
        })
    }

    fn describe(store: &MemoryPageStore, entries: &[RegistryEntry], result: &Result2, homepage: &str) -> String {
        let normalizer = PreProcessor::new();
        let weights = Score2Weights::default();
        let builder = DescriptionBuilder::new(entries, &normalizer, Pages::new(store), &weights);
        builder.describe(result, result.suggestions.first(), homepage, &[], &[], &[], "FooBar")
    }

    #[test]
    fn test_description_from_title() {
        assert_eq!(
            description_from_title("FooBar: a fast tool for aligning sequences", &TITLE_SEPARATOR),
            "a fast tool for aligning sequences"
        );
        assert_eq!(description_from_title("no separator", &TITLE_SEPARATOR), "no separator");
    }

    #[test]
    fn test_name_pattern() {
        assert!(NamePattern::new("FooBar2").is_match("the foo-bar 2 tool"));
        let foobar = NamePattern::new("FooBar");
        assert!(foobar.is_match("Welcome to FOOBAR"));
        assert!(foobar.is_match("foo_bar is a tool"));
        assert!(!foobar.is_match("unrelated text"));
        assert!(!NamePattern::new("  ").is_match("anything"));
    }

    #[test]
    fn test_title_and_messages() {
        let store = MemoryPageStore::new();
        let entries = vec![RegistryEntry {
            biotools_id: "foobar".to_string(),
            name: "FooBar".to_string(),
            ..Default::default()
        }];
        let mut r = result("FooBar: a fast tool for aligning sequences", &[], Some(2000.0));
        r.suggestions[0].publication_and_name_existing = vec![0];
        assert_eq!(
            describe(&store, &entries, &r, ""),
            "> EXISTING AS bio.tools/foobar | a fast tool for aligning sequences | NO DESCRIPTION FOUND FROM LINKS OR ABSTRACT!"
        );
    }

    #[test]
    fn test_homepage_snippets() {
        let store = MemoryPageStore::new();
        store.insert_webpage(PageRecord {
            start_url: "https://foobar.org".to_string(),
            content_type: "text/html".to_string(),
            title: "FooBar - Sequence alignment made simple and fast".to_string(),
            content: "FooBar aligns millions of reads against large reference genomes quickly.\nShort line\n<div>"
                .to_string(),
            scraped: true,
            ..PageRecord::default()
        });
        let r = result("FooBar", &[], Some(2000.0));
        assert_eq!(
            describe(&store, &[], &r, "https://foobar.org"),
            "Sequence alignment made simple and fast | FooBar aligns millions of reads against large reference genomes quickly"
        );
    }

    #[test]
    fn test_broken_page_ignored() {
        let store = MemoryPageStore::new();
        store.insert_webpage(PageRecord {
            start_url: "https://foobar.org".to_string(),
            title: "FooBar - Sequence alignment made simple and fast".to_string(),
            broken: true,
            ..PageRecord::default()
        });
        let r = result("FooBar", &["FooBar aligns reads", "It is fast"], Some(2000.0));
        assert_eq!(
            describe(&store, &[], &r, "https://foobar.org"),
            "FooBar aligns reads. It is fast"
        );
    }

    #[test]
    fn test_abstract_fallback_without_suggestion() {
        let store = MemoryPageStore::new();
        let r = result("FooBar", &["FooBar aligns reads", "It is fast"], None);
        assert_eq!(
            describe(&store, &[], &r, ""),
            "> NOT INCLUDED! | > HOMEPAGE MISSING! | FooBar aligns reads. It is fast"
        );
    }

    #[test]
    fn test_filled_to_min() {
        let store = MemoryPageStore::new();
        let r = result("FooBar", &["Tiny"], Some(2000.0));
        assert_eq!(describe(&store, &[], &r, ""), "Tiny +++++");
    }
}
