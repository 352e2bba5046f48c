//! Turns scored candidates into the ranked suggestions of a Pass 1 result.
//!
//! Names are sanitized to what the registry accepts, publication ids and
//! corresponding authors are validated, and links left unclaimed by the
//! scoring are handed to the suggestions whose name they contain.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::common::{BIOTOOLS_PROCESSED_VERSION_TRIM, BIOTOOLS_SCHEMA_URL, WHITESPACE, char_len, fill_to_min, prune_to_max};
use crate::links::fix_links;
use crate::model::{CorrespAuthor, PubIds, Publication, Result1, Suggestion1};
use crate::scoring::{Candidates, ScoringWeights};
use crate::text::TextNormalizer;

const NAME_MIN: usize = 1;
const NAME_MAX: usize = 100;
const CREDIT_NAME_MAX: usize = 100;

static NAME_VALID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ A-Za-z0-9+.,\-_:;()]*$").unwrap());
static NAME_INVALID_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^ A-Za-z0-9+.,\-_:;()]").unwrap());
const NAME_REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{2010}", "-"),
    ("&", " and "),
    ("@", "a"),
    ("α", "a"),
    ("β", "b"),
    ("μ", "u"),
    ("µ", "u"),
    ("²", "2"),
];
static NAME_APOSTROPHE_QUOTATION_SPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([\p{L}\p{N}])['"\x{60}\x{B4}\x{2018}\x{2019}\x{2BC}\x{201B}\x{91}\x{92}\x{AB}\x{BB}\x{201A}\x{201C}\x{201D}\x{201E}\x{201F}\x{2039}\x{203A}\x{2E42}]+([\p{L}\p{N}])"#,
    )
    .unwrap()
});

static PMID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9][0-9]{0,8}$").unwrap());
static PMCID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(PMC)[1-9][0-9]{0,8}$").unwrap());
static DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^10.[0-9]{4,9}[A-Za-z0-9:;)(_/.-]+$").unwrap());

static ORCID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://orcid.org/[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+([-+.'][A-Za-z0-9_]+)*@[A-Za-z0-9_]+([-.][A-Za-z0-9_]+)*\.[A-Za-z0-9_]+([-.][A-Za-z0-9_]+)*$",
    )
    .unwrap()
});

/// Ids of a publication with malformed ones blanked.
pub fn validate_pub_ids(pmid: &str, pmcid: &str, doi: &str) -> PubIds {
    let mut ids = PubIds::new(pmid, pmcid, doi);
    if !ids.pmid.is_empty() && !PMID.is_match(&ids.pmid) {
        tracing::warn!(pmid = %ids.pmid, pmcid = %ids.pmcid, doi = %ids.doi, "discarded invalid publication PMID");
        ids.pmid.clear();
    }
    if !ids.pmcid.is_empty() && !PMCID.is_match(&ids.pmcid) {
        tracing::warn!(pmcid = %ids.pmcid, pmid = %ids.pmid, doi = %ids.doi, "discarded invalid publication PMCID");
        ids.pmcid.clear();
    }
    if !ids.doi.is_empty() && !DOI.is_match(&ids.doi) {
        tracing::warn!(doi = %ids.doi, pmid = %ids.pmid, pmcid = %ids.pmcid, "discarded invalid publication DOI");
        ids.doi.clear();
    }
    ids
}

/// Clean corresponding authors to registry credit rules. Authors left with
/// no name, email or URI are dropped.
pub fn clean_credits(authors: &[CorrespAuthor], pub_ids: &PubIds) -> Vec<CorrespAuthor> {
    let mut cleaned = Vec::with_capacity(authors.len());
    for author in authors {
        let mut credit = author.clone();

        let name = WHITESPACE.replace_all(&author.name, " ").trim().to_string();
        credit.name = if char_len(&name) > CREDIT_NAME_MAX {
            let pruned = prune_to_max(&name, CREDIT_NAME_MAX);
            tracing::warn!(from = %author.name, to = %pruned, pub_ids = %pub_ids, "credit name pruned to max");
            pruned
        } else {
            name
        };

        if !credit.orcid.is_empty() && !ORCID.is_match(&credit.orcid) {
            tracing::warn!(orcid = %credit.orcid, pub_ids = %pub_ids, "discarded invalid credit orcidid");
            credit.orcid.clear();
        }

        if !credit.email.is_empty() && !EMAIL.is_match(&credit.email) {
            let email = credit.email.strip_suffix('.').unwrap_or(&credit.email);
            match email.split(' ').find(|part| EMAIL.is_match(part)) {
                Some(valid) => {
                    tracing::warn!(from = %author.email, to = valid, pub_ids = %pub_ids, "credit email changed");
                    credit.email = valid.to_string();
                }
                None => {
                    tracing::warn!(email = %author.email, pub_ids = %pub_ids, "discarded invalid credit email");
                    credit.email.clear();
                }
            }
        }

        if !credit.uri.is_empty() && !BIOTOOLS_SCHEMA_URL.is_match(&credit.uri) {
            tracing::warn!(url = %credit.uri, pub_ids = %pub_ids, "discarded invalid credit url");
            credit.uri.clear();
        }

        if credit.is_empty() {
            tracing::warn!(pub_ids = %pub_ids, "discarded empty credit");
        } else {
            cleaned.push(credit);
        }
    }
    cleaned
}

/// A candidate name rewritten to the characters the registry allows and cut
/// to its length limits.
pub fn sanitize_name(extracted: &str, pub_ids: &PubIds) -> String {
    let mut name = extracted.to_string();
    if !name.is_empty() && !NAME_VALID.is_match(&name) {
        for (from, to) in NAME_REPLACEMENTS {
            name = name.replace(from, to);
        }
        name = NAME_APOSTROPHE_QUOTATION_SPACE.replace_all(&name, "${1} ${2}").into_owned();
        name = name.nfkd().collect();
        name = WHITESPACE.replace_all(&name, " ").trim().to_string();
        name = NAME_INVALID_CHAR.replace_all(&name, "").into_owned();
        tracing::info!(from = extracted, to = %name, pub_ids = %pub_ids, "name changed");
    }
    if char_len(&name) < NAME_MIN {
        name = fill_to_min(&name, NAME_MIN);
        tracing::info!(from = extracted, to = %name, pub_ids = %pub_ids, "name filled to min");
    }
    if char_len(&name) > NAME_MAX {
        name = prune_to_max(&name, NAME_MAX);
        tracing::info!(from = extracted, to = %name, pub_ids = %pub_ids, "name pruned to max");
    }
    name
}

/// Tool-title information recorded with a result.
#[derive(Debug, Clone, Default)]
pub struct ResultContext<'a> {
    pub title: &'a str,
    pub tool_title_extracted_original: &'a str,
    pub tool_title: &'a str,
    pub tool_title_pruned: &'a str,
    pub tool_title_acronym: &'a str,
    /// The other segments of the same title.
    pub tool_title_others: Vec<String>,
    /// Processed forms of the other segments; these never become suggestions.
    pub tool_title_processed_others: Vec<String>,
}

/// Picks and finishes the suggestions of one result.
pub struct SuggestionRanker<'a, N: TextNormalizer + ?Sized> {
    normalizer: &'a N,
    weights: &'a ScoringWeights,
}

impl<'a, N: TextNormalizer + ?Sized> SuggestionRanker<'a, N> {
    pub fn new(normalizer: &'a N, weights: &'a ScoringWeights) -> Self {
        Self { normalizer, weights }
    }

    pub fn make_result(&self, publication: &Publication, candidates: Candidates, context: &ResultContext<'_>) -> Result1 {
        let pub_ids = validate_pub_ids(&publication.pmid, &publication.pmcid, &publication.doi);

        let mut result = Result1 {
            corresp_author: clean_credits(&publication.corresp_author, &pub_ids),
            pub_ids,
            title: context.title.to_string(),
            tool_title_others: context.tool_title_others.clone(),
            tool_title_extracted_original: context.tool_title_extracted_original.to_string(),
            tool_title: context.tool_title.to_string(),
            tool_title_pruned: context.tool_title_pruned.to_string(),
            tool_title_acronym: context.tool_title_acronym.to_string(),
            abstract_sentences: self.normalizer.sentences(&publication.abstract_text),
            oa: publication.oa,
            journal_title: publication.journal_title.clone(),
            pub_date: publication.pub_date,
            pub_date_human: publication.pub_date_human(),
            citations_count: publication.citations_count,
            citations_timestamp: publication.citations_timestamp,
            citations_timestamp_human: publication.citations_timestamp_human(),
            ..Result1::default()
        };

        result.suggestions = self.suggestions(&candidates, context, &result.pub_ids);

        let (leftover_abstract, leftover_fulltext) = self.claim_leftover_links(&mut result.suggestions, &candidates);
        result.leftover_links_abstract = leftover_abstract;
        result.leftover_links_fulltext = leftover_fulltext;

        for suggestion in &mut result.suggestions {
            fix_links(&mut suggestion.links_abstract);
            fix_links(&mut suggestion.links_fulltext);
        }

        result
    }

    fn suggestions(&self, candidates: &Candidates, context: &ResultContext<'_>, pub_ids: &PubIds) -> Vec<Suggestion1> {
        let mut suggestions: Vec<Suggestion1> = Vec::new();
        let mut top_score = 0.0;

        for (key, score) in candidates.scores.sorted() {
            if suggestions.len() >= self.weights.suggestion_limit {
                break;
            }
            if context.tool_title_processed_others.contains(&key) {
                continue;
            }
            if suggestions.is_empty() {
                top_score = score;
            } else if score * self.weights.top_score_limit < top_score {
                break;
            }

            let extracted_original = candidates
                .processed_to_extracted
                .get(&key)
                .cloned()
                .unwrap_or_else(|| key.clone());
            let extracted = sanitize_name(&extracted_original, pub_ids);

            let (processed, original) = if extracted == extracted_original {
                (key.clone(), String::new())
            } else {
                (self.normalizer.process(&extracted).join(" "), extracted_original)
            };

            suggestions.push(Suggestion1 {
                score,
                original,
                extracted,
                processed,
                links_abstract: candidates.links_abstract.get(&key).cloned().unwrap_or_default(),
                links_fulltext: candidates.links_fulltext.get(&key).cloned().unwrap_or_default(),
                from_abstract_link: candidates.from_abstract_links.contains(&key),
            });
        }

        suggestions
    }

    /// Give each suggestion the title and abstract links containing its
    /// name. Claimed links stop being leftovers.
    fn claim_leftover_links(&self, suggestions: &mut [Suggestion1], candidates: &Candidates) -> (Vec<String>, Vec<String>) {
        let mut leftover_abstract = candidates.title_abstract_links.clone();
        let compare: Vec<String> = leftover_abstract
            .iter()
            .map(|link| self.normalizer.process(link).join(""))
            .collect();
        let mut claimed = BTreeSet::new();

        for suggestion in suggestions.iter_mut() {
            let suggestion_compare = BIOTOOLS_PROCESSED_VERSION_TRIM
                .replacen(&suggestion.processed, 1, "")
                .replace(' ', "");
            if char_len(&suggestion_compare) < 2 {
                continue;
            }
            for (i, link_compare) in compare.iter().enumerate() {
                if link_compare.contains(&suggestion_compare) {
                    suggestion.links_abstract.push(leftover_abstract[i].clone());
                    claimed.insert(i);
                }
            }
        }

        for i in claimed.into_iter().rev() {
            leftover_abstract.remove(i);
        }

        (leftover_abstract, candidates.fulltext_links.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreMap;
    use crate::text::PreProcessor;

    fn ids() -> PubIds {
        PubIds::new("1", "", "")
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("FooBar", &ids()), "FooBar");
        assert_eq!(sanitize_name("α-Tool", &ids()), "a-Tool");
        assert_eq!(sanitize_name("R&D", &ids()), "R and D");
        assert_eq!(sanitize_name("Foo's", &ids()), "Foo s");
        assert_eq!(sanitize_name("café", &ids()), "cafe");
        assert_eq!(sanitize_name("", &ids()), "+");
        let long = "x".repeat(120);
        assert_eq!(char_len(&sanitize_name(&long, &ids())), 100);
    }

    #[test]
    fn test_validate_pub_ids() {
        let ids = validate_pub_ids("12345", "PMC678", "10.1093/bioinformatics/btx123");
        assert_eq!(ids, PubIds::new("12345", "PMC678", "10.1093/bioinformatics/btx123"));
        let ids = validate_pub_ids("012", "678", "doi:10.1/x");
        assert!(ids.is_empty());
    }

    #[test]
    fn test_clean_credits() {
        let authors = vec![
            CorrespAuthor {
                name: "  Jane\u{a0} Doe ".to_string(),
                orcid: "0000-0001-2345-6789".to_string(),
                email: "Contact jane@example.org.".to_string(),
                uri: "not a url".to_string(),
                ..CorrespAuthor::default()
            },
            CorrespAuthor {
                orcid: "https://orcid.org/0000-0001-2345-6789".to_string(),
                email: "broken@".to_string(),
                ..CorrespAuthor::default()
            },
        ];
        let cleaned = clean_credits(&authors, &ids());
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].name, "Jane Doe");
        assert_eq!(cleaned[0].orcid, "");
        assert_eq!(cleaned[0].email, "jane@example.org");
        assert_eq!(cleaned[0].uri, "");
    }

    fn candidates(scores: &[(&str, f64)]) -> Candidates {
        let mut map = ScoreMap::new();
        for (key, score) in scores {
            map.insert(key, *score);
        }
        Candidates {
            scores: map,
            ..Candidates::default()
        }
    }

    #[test]
    fn test_cutoff_and_limit() {
        let pp = PreProcessor::new();
        let weights = ScoringWeights::default();
        let ranker = SuggestionRanker::new(&pp, &weights);
        let candidates = candidates(&[
            ("a", 1000.0),
            ("b", 500.0),
            ("c", 100.0),
            ("d", 50.0),
            ("e", 42.0),
            ("f", 40.0),
            ("g", 1.0),
        ]);
        let result = ranker.make_result(&Publication::default(), candidates, &ResultContext::default());
        let names: Vec<&str> = result.suggestions.iter().map(|s| s.processed.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        for suggestion in &result.suggestions {
            assert!(suggestion.score * weights.top_score_limit >= result.suggestions[0].score);
        }

        let candidates = candidates_cut();
        let result = ranker.make_result(&Publication::default(), candidates, &ResultContext::default());
        assert_eq!(result.suggestions.len(), 1);
    }

    fn candidates_cut() -> Candidates {
        candidates(&[("a", 1000.0), ("b", 41.0)])
    }

    #[test]
    fn test_other_title_segments_skipped() {
        let pp = PreProcessor::new();
        let weights = ScoringWeights::default();
        let ranker = SuggestionRanker::new(&pp, &weights);
        let context = ResultContext {
            tool_title_processed_others: vec!["bardb".to_string()],
            ..ResultContext::default()
        };
        let result = ranker.make_result(
            &Publication::default(),
            candidates(&[("bardb", 100.0), ("foodb", 50.0)]),
            &context,
        );
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].processed, "foodb");
    }

    #[test]
    fn test_leftover_links_claimed() {
        let pp = PreProcessor::new();
        let weights = ScoringWeights::default();
        let ranker = SuggestionRanker::new(&pp, &weights);
        let mut candidates = candidates(&[("foobar", 100.0)]);
        candidates.title_abstract_links = vec![
            "http://example.org/foobar-2".to_string(),
            "http://example.org/other".to_string(),
        ];
        candidates.fulltext_links = vec!["http://example.org/fulltext".to_string()];
        let result = ranker.make_result(&Publication::default(), candidates, &ResultContext::default());
        assert_eq!(result.suggestions[0].links_abstract, vec!["http://example.org/foobar-2"]);
        assert_eq!(result.leftover_links_abstract, vec!["http://example.org/other"]);
        assert_eq!(result.leftover_links_fulltext, vec!["http://example.org/fulltext"]);
    }

    #[test]
    fn test_repeated_leftover_links_all_claimed() {
        let pp = PreProcessor::new();
        let weights = ScoringWeights::default();
        let ranker = SuggestionRanker::new(&pp, &weights);
        let mut candidates = candidates(&[("foobar", 100.0)]);
        candidates.title_abstract_links = vec![
            "http://example.org/foobar".to_string(),
            "http://example.org/foobar".to_string(),
        ];
        let result = ranker.make_result(&Publication::default(), candidates, &ResultContext::default());
        assert_eq!(
            result.suggestions[0].links_abstract,
            vec!["http://example.org/foobar", "http://example.org/foobar"]
        );
        assert!(result.leftover_links_abstract.is_empty());
    }
}
