//! Matching Pass 2 results against existing bio.tools entries.
//!
//! Every suggestion is sorted into at most one bucket per entry, by whether
//! its name equals the entry name and how many of the result's publications
//! the entry already lists. The top suggestion is additionally compared by
//! processed name, by shared links and by single name words, against entries
//! it is not already bucketed with.

use crate::common::{
    BIOTOOLS_EXTRACTED_VERSION_TRIM, BIOTOOLS_PROCESSED_VERSION_TRIM, LINK_COMPARE_REST, normalise_doi, trim_url,
};
use crate::model::{PubIds, RegistryEntry, Result2, Suggestion2, push_unique};
use crate::text::TextNormalizer;

/// A name word shared with more entries than this is too common to report.
const NAME_WORD_MATCH_LIMIT: usize = 5;

/// How the publications of one result relate to one entry.
#[derive(Debug, Clone, Default)]
struct PublicationMatch {
    /// At least one publication is listed by the entry.
    one: bool,
    /// Every publication is listed by the entry.
    all: bool,
    /// Publications the entry does not list, in result order.
    missing: Vec<PubIds>,
}

/// Whether `entry` lists the publication `ids`, by any one identifier.
pub fn entry_has_publication(entry: &RegistryEntry, ids: &PubIds) -> bool {
    entry.publication.iter().any(|p| {
        let pmid = p.pmid.as_deref().map(str::trim);
        let pmcid = p.pmcid.as_deref().map(str::trim);
        let doi = p.doi.as_deref().map(|d| normalise_doi(d.trim()));
        (!ids.pmid.is_empty() && pmid == Some(ids.pmid.as_str()))
            || (!ids.pmcid.is_empty() && pmcid == Some(ids.pmcid.as_str()))
            || (!ids.doi.is_empty() && doi.as_deref() == Some(ids.doi.as_str()))
    })
}

/// Whether `link` (in comparison form) is the registry link `query`, or
/// `query` followed by text glued onto it.
fn link_matches(link: &str, query: &str) -> bool {
    if link.eq_ignore_ascii_case(query) {
        return true;
    }
    if !link.starts_with(query) {
        return false;
    }
    let Some((last, _)) = query.char_indices().next_back() else {
        return false;
    };
    LINK_COMPARE_REST.is_match(&link[last..])
}

/// Registry entries with their names and links pre-normalized for matching.
pub struct RegistryMatcher<'a> {
    entries: &'a [RegistryEntry],
    names_extracted: Vec<Vec<String>>,
    names_processed: Vec<String>,
    links: Vec<Vec<String>>,
}

impl<'a> RegistryMatcher<'a> {
    pub fn new<N: TextNormalizer + ?Sized>(entries: &'a [RegistryEntry], normalizer: &N) -> Self {
        let mut names_extracted = Vec::with_capacity(entries.len());
        let mut names_processed = Vec::with_capacity(entries.len());
        let mut links = Vec::with_capacity(entries.len());

        for entry in entries {
            let mut extracted = normalizer.extract(&entry.name);
            let processed = normalizer.process_aligned(&entry.name, &mut extracted);
            names_extracted.push(
                BIOTOOLS_EXTRACTED_VERSION_TRIM
                    .replacen(&extracted.join(" "), 1, "")
                    .split(' ')
                    .map(str::to_string)
                    .collect(),
            );
            names_processed.push(
                BIOTOOLS_PROCESSED_VERSION_TRIM
                    .replacen(&processed.join(" "), 1, "")
                    .into_owned(),
            );
            links.push(
                std::iter::once(entry.homepage.as_str())
                    .chain(entry.link.iter().map(|l| l.url.as_str()))
                    .chain(entry.download.iter().map(|l| l.url.as_str()))
                    .chain(entry.documentation.iter().map(|l| l.url.as_str()))
                    .map(|l| trim_url(l.trim()))
                    .filter(|l| !l.is_empty())
                    .collect(),
            );
        }
        tracing::info!(entries = entries.len(), "processed registry names and links");

        Self {
            entries,
            names_extracted,
            names_processed,
            links,
        }
    }

    pub fn entries(&self) -> &'a [RegistryEntry] {
        self.entries
    }

    fn publication_matches(&self, result: &Result2) -> Vec<PublicationMatch> {
        self.entries
            .iter()
            .map(|entry| {
                let mut m = PublicationMatch {
                    all: true,
                    ..PublicationMatch::default()
                };
                for ids in &result.pub_ids {
                    if entry_has_publication(entry, ids) {
                        m.one = true;
                    } else {
                        m.all = false;
                        push_unique(&mut m.missing, ids.clone());
                    }
                }
                m
            })
            .collect()
    }

    fn bucket(&self, suggestion: &mut Suggestion2, matches: &[PublicationMatch]) {
        for (j, (entry, m)) in self.entries.iter().zip(matches).enumerate() {
            if suggestion.extracted == entry.name {
                if m.all {
                    suggestion.publication_and_name_existing.push(j);
                } else if m.one {
                    suggestion.name_existing_some_publication_different.push(j);
                    suggestion
                        .name_existing_some_publication_different_pub_ids
                        .push(m.missing.clone());
                } else {
                    suggestion.name_existing_publication_different.push(j);
                    suggestion
                        .name_existing_publication_different_pub_ids
                        .push(m.missing.clone());
                }
            } else if m.one {
                suggestion.some_publication_existing_name_different.push(j);
                suggestion
                    .some_publication_existing_name_different_pub_ids
                    .push(m.missing.clone());
            }
        }
    }

    /// Fill the existence buckets of every suggestion and the name, link
    /// and name-word matches of the top suggestion.
    pub fn match_result(&self, result: &mut Result2) {
        let matches = self.publication_matches(result);
        for suggestion in &mut result.suggestions {
            self.bucket(suggestion, &matches);
        }

        let Some(top) = result.suggestions.first() else {
            return;
        };
        let bucketed: Vec<usize> = top.existing().collect();

        let processed = BIOTOOLS_PROCESSED_VERSION_TRIM.replacen(&top.processed, 1, "");
        if !processed.is_empty() {
            for (j, name) in self.names_processed.iter().enumerate() {
                if *name == processed && !bucketed.contains(&j) {
                    result.name_match.push(j);
                }
            }
        }

        let mut matched_entries: Vec<(usize, Vec<String>)> = Vec::new();
        for link in top.links_abstract.iter().chain(&top.links_fulltext) {
            let link = trim_url(link);
            for (j, queries) in self.links.iter().enumerate() {
                if bucketed.contains(&j) {
                    continue;
                }
                let matched: Vec<String> = queries
                    .iter()
                    .filter(|q| link_matches(&link, q))
                    .cloned()
                    .collect();
                if matched.is_empty() {
                    continue;
                }
                match matched_entries.iter_mut().find(|(k, _)| *k == j) {
                    Some((_, links)) => links.extend(matched),
                    None => matched_entries.push((j, matched)),
                }
            }
        }
        for (j, links) in matched_entries {
            result.link_match.push(j);
            result.link_match_links.push(links);
        }

        let extracted = BIOTOOLS_EXTRACTED_VERSION_TRIM.replacen(&top.extracted, 1, "");
        if !extracted.is_empty() {
            for word in extracted.split(' ') {
                let part: Vec<usize> = self
                    .names_extracted
                    .iter()
                    .enumerate()
                    .filter(|(j, words)| {
                        words.iter().any(|w| w == word)
                            && !bucketed.contains(j)
                            && !result.name_match.contains(j)
                            && !result.link_match.contains(j)
                            && !result.name_word_match.contains(j)
                    })
                    .map(|(j, _)| j)
                    .collect();
                if (1..=NAME_WORD_MATCH_LIMIT).contains(&part.len()) {
                    result.name_word_match.extend(part);
                }
            }
        }
    }
}
