//! Candidate name scoring for one publication.
//!
//! Every 1 to 5 word window of the title remainder and abstract becomes a
//! candidate. Rare words score high, keywords such as "called" or "software"
//! boost their neighbours, and candidates that a link in the text points to
//! are boosted the most.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{
    LINK_COMPARE_REST, LINK_COMPARE_START, QUERY_IDF_SCALING, TOOL_TITLE_TRIM, is_acronym, pattern_char,
};
use crate::config::Heuristics;
use crate::idf::Idf;
use crate::links::{LINK_TWO_PART, break_links, from_link};
use crate::text::TextNormalizer;
use crate::title::acronyms;

static GOOD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\p{Lu}|.[^\p{Ll}-]|.-[^\p{Ll}]|.[^-]*[^\p{L}-])[^-]*$").unwrap());
static GOOD_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*[^\p{Ll}]|.*[^\p{Ll}-].|\p{Lu}.*|..)$").unwrap());
static GOOD_START_MULTI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^ ]+( \p{Lu}[^ ]*)*( v| ver| version)?( \p{Lu}[^ ]*| ([vV](er(sion)?)?)?\p{N}+([.-]\p{N}+)*)$")
        .unwrap()
});
static TO_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^ ]*[^ \p{Ll}-][^ ]*( [^ ]*[^ \p{Ll}-][^ ]*)*$").unwrap());
static NOT_TO_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^ ]( [^ ])*$").unwrap());

/// Hand-tuned Pass 1 constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    /// Keyword tier multipliers, strongest first.
    pub tier1: f64,
    pub tier2: f64,
    pub tier3: f64,
    /// Ceiling on the total keyword boost one candidate can collect.
    pub before_after_limit: f64,
    pub tool_title_multiplier: f64,
    /// Longest candidate, in words.
    pub compound_words: usize,
    pub compound_divider: f64,
    pub link_multiplier_abstract: f64,
    pub suggestion_limit: usize,
    /// Suggestions scoring below `top / top_score_limit` are cut.
    pub top_score_limit: f64,
    pub standalone_max_chars: usize,
    pub separator_max_words: usize,
    pub path_idf_min: f64,
    pub path_idf_min_2: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            tier1: 6.0,
            tier2: 3.0,
            tier3: 1.5,
            before_after_limit: 72.0,
            tool_title_multiplier: 24.0,
            compound_words: 5,
            compound_divider: 2.0,
            link_multiplier_abstract: 24.0,
            suggestion_limit: 5,
            top_score_limit: 24.0,
            standalone_max_chars: 18,
            separator_max_words: 5,
            path_idf_min: 0.5,
            path_idf_min_2: 0.24,
        }
    }
}

impl ScoringWeights {
    pub fn link_multiplier_abstract_minimum(&self) -> f64 {
        self.link_multiplier_abstract / 2.0
    }

    pub fn link_multiplier_abstract_augmentation(&self) -> f64 {
        self.link_multiplier_abstract / 4.0
    }

    pub fn link_multiplier_abstract_new(&self) -> f64 {
        self.link_multiplier_abstract / 2.0
    }

    pub fn link_multiplier_fulltext(&self) -> f64 {
        self.link_multiplier_abstract / 2.0
    }
}

/// A string-keyed map that iterates in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.index.get(key).map(|&i| &mut self.entries[i].1)
    }

    /// Set the value of `key`, keeping its position if already present.
    pub fn insert(&mut self, key: &str, value: V) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
            }
        }
    }

    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Candidate scores keyed by processed name.
pub type ScoreMap = OrderedMap<f64>;

impl ScoreMap {
    pub fn score(&self, key: &str) -> f64 {
        self.get(key).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, key: &str, value: f64) {
        *self.get_or_insert_with(key, || 0.0) += value;
    }

    /// Multiply an existing score, or insert `factor` as the score.
    pub fn multiply_or_insert(&mut self, key: &str, factor: f64) {
        match self.get_mut(key) {
            Some(score) => *score *= factor,
            None => self.insert(key, factor),
        }
    }

    /// Multiply an existing score. Missing keys are left alone.
    pub fn scale(&mut self, key: &str, factor: f64) {
        if let Some(score) = self.get_mut(key) {
            *score *= factor;
        }
    }

    pub fn scale_all(&mut self, factor: f64) {
        self.entries.iter_mut().for_each(|(_, score)| *score *= factor);
    }

    /// Entries by descending score, ties in insertion order.
    pub fn sorted(&self) -> Vec<(String, f64)> {
        let mut sorted: Vec<(String, f64)> = self.entries.clone();
        sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }
}

/// Links matched to a candidate, keyed by processed name.
pub type LinkMap = OrderedMap<Vec<String>>;

fn push_link(links: &mut LinkMap, key: &str, link: &str) {
    links.get_or_insert_with(key, Vec::new).push(link.to_string());
}

/// The tool title a publication is scored against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolTitleInput<'a> {
    pub title: &'a str,
    pub pruned: &'a str,
    pub acronym: Option<&'a str>,
}

impl ToolTitleInput<'_> {
    fn usable_title(&self) -> Option<&str> {
        (!self.title.is_empty() && !self.pruned.is_empty()).then_some(self.title)
    }

    fn usable_acronym(&self) -> Option<&str> {
        self.acronym.filter(|a| !a.is_empty())
    }
}

/// Publication text going into scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringInput<'a> {
    pub title: &'a str,
    pub title_rest: &'a str,
    pub abstract_text: &'a str,
    pub fulltext: &'a str,
    pub tool_title: Option<ToolTitleInput<'a>>,
}

/// Everything scoring learned about one publication.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub scores: ScoreMap,
    /// Most frequent original-case form of each processed candidate.
    pub processed_to_extracted: HashMap<String, String>,
    pub links_abstract: LinkMap,
    pub links_fulltext: LinkMap,
    /// Candidates that only exist because an abstract link named them.
    pub from_abstract_links: Vec<String>,
    /// Title and abstract links, split and deduplicated against the full text.
    pub title_abstract_links: Vec<String>,
    pub fulltext_links: Vec<String>,
}

/// Text of a publication after tokenisation, shared by the scoring steps.
struct Tokens {
    sentences: Vec<String>,
    extracted: Vec<Vec<String>>,
    processed: Vec<Vec<String>>,
    title_without_links: String,
    abstract_without_links: String,
}

/// Scores name candidates of publications.
pub struct CandidateScorer<'a, N: TextNormalizer + ?Sized> {
    normalizer: &'a N,
    idf: &'a Idf,
    heuristics: &'a Heuristics,
}

impl<'a, N: TextNormalizer + ?Sized> CandidateScorer<'a, N> {
    pub fn new(normalizer: &'a N, idf: &'a Idf, heuristics: &'a Heuristics) -> Self {
        Self {
            normalizer,
            idf,
            heuristics,
        }
    }

    fn weights(&self) -> &ScoringWeights {
        self.heuristics.scoring()
    }

    pub fn score(&self, input: &ScoringInput<'_>) -> Candidates {
        let tokens = self.tokenize(input);
        let mut candidates = Candidates::default();

        self.window_scores(&tokens, &mut candidates);

        if let Some(tool_title) = &input.tool_title {
            if let Some(title) = tool_title.usable_title() {
                let existing = self.tool_title_score(title, &mut candidates, false);
                if !existing && tool_title.pruned != title {
                    self.tool_title_score(tool_title.pruned, &mut candidates, true);
                }
            }
            if let Some(acronym) = tool_title.usable_acronym() {
                self.tool_title_score(acronym, &mut candidates, false);
            }
        }

        self.keyword_scores(&tokens, &mut candidates.scores);
        self.link_scores(input, &tokens, &mut candidates);

        candidates
    }

    fn tokenize(&self, input: &ScoringInput<'_>) -> Tokens {
        let title_without_links = self.normalizer.remove_links(input.title);
        let abstract_without_links = self.normalizer.remove_links(input.abstract_text);
        let title_rest = self.normalizer.remove_links(input.title_rest);
        let title_rest = title_rest.trim();

        let text = if title_rest.is_empty() {
            abstract_without_links.clone()
        } else {
            format!("{title_rest}. {abstract_without_links}")
        };
        let sentences = self.normalizer.sentences(&text);

        let mut extracted = Vec::with_capacity(sentences.len());
        let mut processed = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            let mut sentence_extracted = self.normalizer.extract(sentence);
            let sentence_processed = self.normalizer.process_aligned(sentence, &mut sentence_extracted);
            extracted.push(sentence_extracted);
            processed.push(sentence_processed);
        }

        Tokens {
            sentences,
            extracted,
            processed,
            title_without_links,
            abstract_without_links,
        }
    }

    fn window_scores(&self, tokens: &Tokens, candidates: &mut Candidates) {
        let weights = self.weights();
        let scores = &mut candidates.scores;
        let mut extracted_begin: OrderedMap<Vec<String>> = OrderedMap::new();
        let mut extracted_within: OrderedMap<Vec<String>> = OrderedMap::new();

        for (i, (sentence_processed, sentence_extracted)) in
            tokens.processed.iter().zip(&tokens.extracted).enumerate()
        {
            let extracted_at =
                |l: usize| sentence_extracted.get(l).unwrap_or(&sentence_processed[l]).as_str();
            for j in 0..weights.compound_words {
                if sentence_processed.len() <= j {
                    break;
                }
                for k in 0..sentence_processed.len() - j {
                    let window = k..=k + j;
                    let word_processed = sentence_processed[window.clone()].join(" ");
                    let word_extracted = window.clone().map(extracted_at).collect::<Vec<_>>().join(" ");

                    let value = if j == 0 {
                        self.idf.get(&sentence_processed[k]).powi(QUERY_IDF_SCALING)
                    } else {
                        window.map(|l| scores.score(&sentence_processed[l])).product::<f64>()
                            / weights.compound_divider
                    };
                    scores.add(&word_processed, value);

                    if i == 0 || k == 0 {
                        let begins = extracted_begin.get_or_insert_with(&word_processed, Vec::new);
                        if !begins.contains(&word_extracted) {
                            begins.push(word_extracted);
                        }
                    } else {
                        extracted_within
                            .get_or_insert_with(&word_processed, Vec::new)
                            .push(word_extracted);
                    }
                }
            }
        }

        // within forms are counted first so they win ties
        let keys = extracted_within.keys().chain(extracted_begin.keys().filter(|k| !extracted_within.contains_key(k)));
        for key in keys {
            let mut counts: OrderedMap<usize> = OrderedMap::new();
            let forms = extracted_within
                .get(key)
                .into_iter()
                .flatten()
                .chain(extracted_begin.get(key).into_iter().flatten());
            for form in forms {
                *counts.get_or_insert_with(form, || 0) += 1;
            }
            let best = counts.iter().fold(None, |best: Option<(&str, usize)>, (form, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((form, count)),
            });
            if let Some((form, _)) = best {
                candidates.processed_to_extracted.insert(key.to_string(), form.to_string());
            }
        }
    }

    /// Boost a title segment. Returns whether it was already a candidate.
    fn tool_title_score(&self, tool_title: &str, candidates: &mut Candidates, pruned: bool) -> bool {
        if tool_title.is_empty() {
            return false;
        }
        let multiplier = self.weights().tool_title_multiplier;
        let processed = self.normalizer.process(tool_title);
        if processed.is_empty() {
            return false;
        }
        let key = processed.join(" ");

        if let Some(&existing) = candidates.scores.get(&key) {
            candidates.scores.insert(&key, (existing * multiplier).max(multiplier));
            true
        } else {
            if !pruned {
                candidates.scores.insert(&key, multiplier / processed.len() as f64);
                candidates.processed_to_extracted.insert(key, tool_title.to_string());
            }
            false
        }
    }

    fn keyword_boost(&self, key: &str, scores: &mut ScoreMap, added: &mut HashMap<String, f64>, tier: f64, twice: bool) {
        if !scores.contains_key(key) {
            return;
        }
        let limit = self.weights().before_after_limit;
        let so_far = added.get(key).copied().unwrap_or(1.0);
        let mut multiplier = if twice { tier * 2.0 } else { tier };
        if so_far * multiplier > limit {
            multiplier = limit / so_far;
        }
        added.insert(key.to_string(), so_far * multiplier);
        scores.scale(key, multiplier);
        tracing::trace!(key, multiplier, "keyword boost");
    }

    fn keyword_scores(&self, tokens: &Tokens, scores: &mut ScoreMap) {
        let compound_words = self.weights().compound_words;
        let mut added: HashMap<String, f64> = HashMap::new();

        for (sentence, words) in tokens.sentences.iter().zip(&tokens.processed) {
            let mut sentence_acronyms: Option<Vec<i32>> = None;
            let len = words.len();

            for (j, word) in words.iter().enumerate() {
                if let Some(tier) = self.heuristics.before_multiplier(word).filter(|_| j + 1 < len) {
                    let acronyms = sentence_acronyms.get_or_insert_with(|| acronyms(sentence, self.normalizer));
                    let is_acronym_at = |at: usize| acronyms.contains(&(at as i32)) || acronyms.contains(&-(at as i32));

                    let acronym = if is_acronym_at(j + 1) {
                        Some(j + 1)
                    } else if j + 2 < len && is_acronym_at(j + 2) {
                        Some(j + 2)
                    } else {
                        None
                    };
                    if let Some(at) = acronym {
                        self.keyword_boost(&words[at], scores, &mut added, tier, true);
                    } else {
                        let next = &words[j + 1];
                        self.keyword_boost(next, scores, &mut added, tier, false);
                        if j + 2 < len {
                            let later_acronym = (1..=compound_words)
                                .take_while(|k| j + 2 + k < len)
                                .find(|k| acronyms.contains(&-((j + 2 + k) as i32)));
                            match later_acronym {
                                Some(k) => self.keyword_boost(&words[j + 2 + k], scores, &mut added, tier, false),
                                None => {
                                    let next_next = &words[j + 2];
                                    self.keyword_boost(next_next, scores, &mut added, tier, false);
                                    let compound = format!("{next} {next_next}");
                                    self.keyword_boost(&compound, scores, &mut added, tier, false);
                                }
                            }
                        }
                    }
                }

                if let Some(tier) = self.heuristics.after_multiplier(word).filter(|_| j >= 1) {
                    let acronyms = sentence_acronyms.get_or_insert_with(|| acronyms(sentence, self.normalizer));
                    let is_acronym_at = |at: usize| acronyms.contains(&(at as i32)) || acronyms.contains(&-(at as i32));

                    let acronym = if is_acronym_at(j - 1) {
                        Some(j - 1)
                    } else if j >= 2 && is_acronym_at(j - 2) {
                        Some(j - 2)
                    } else {
                        None
                    };
                    if let Some(at) = acronym {
                        self.keyword_boost(&words[at], scores, &mut added, tier, true);
                    } else {
                        let previous = &words[j - 1];
                        self.keyword_boost(previous, scores, &mut added, tier, false);
                        if j >= 2 {
                            let earlier_acronym = (1..=compound_words)
                                .take_while(|&k| k + 2 <= j)
                                .find(|k| acronyms.contains(&-((j - 2 - k) as i32)));
                            match earlier_acronym {
                                Some(k) => self.keyword_boost(&words[j - 2 - k], scores, &mut added, tier, false),
                                None => {
                                    let previous_previous = &words[j - 2];
                                    self.keyword_boost(previous_previous, scores, &mut added, tier, false);
                                    let compound = format!("{previous_previous} {previous}");
                                    self.keyword_boost(&compound, scores, &mut added, tier, false);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn link_scores(&self, input: &ScoringInput<'_>, tokens: &Tokens, candidates: &mut Candidates) {
        let weights = self.weights();

        let mut title_abstract_links = self.normalizer.links(input.title);
        title_abstract_links.extend(self.normalizer.links(input.abstract_text));
        let mut fulltext_links = self.normalizer.links(input.fulltext);

        let all_links: Vec<String> = title_abstract_links
            .iter()
            .chain(&fulltext_links)
            .map(|l| LINK_COMPARE_START.replacen(l, 1, "").into_owned())
            .collect();
        break_links(&mut title_abstract_links, &all_links);
        break_links(&mut fulltext_links, &all_links);
        dedup_fulltext_links(&mut title_abstract_links, &mut fulltext_links);

        let keys: Vec<String> = candidates.scores.keys().map(str::to_string).collect();
        let mut links_abstract = self.match_links(&title_abstract_links, &keys, candidates, tokens, input);
        let mut links_fulltext = self.match_links(&fulltext_links, &keys, candidates, tokens, input);

        let scores = &mut candidates.scores;
        for (key, links) in links_abstract.iter() {
            let score = scores.score(key) * weights.link_multiplier_abstract * links.len() as f64;
            scores.insert(key, score.max(weights.link_multiplier_abstract_minimum()));
        }

        let mut generic_augmentation = links_abstract.is_empty();
        for link in &title_abstract_links {
            if LINK_TWO_PART.is_match(link) {
                continue;
            }
            let present = links_abstract.iter().any(|(key, links)| {
                links.contains(link) && !candidates.from_abstract_links.iter().any(|f| f == key)
            });
            if present {
                continue;
            }
            if generic_augmentation {
                scores.scale_all(weights.link_multiplier_abstract_augmentation());
                generic_augmentation = false;
            }
            let derived = from_link(link, self.normalizer, self.idf, self.heuristics);
            if derived.is_empty() {
                continue;
            }
            let mut extracted = self.normalizer.extract(&derived);
            let processed = self.normalizer.process_aligned(&derived, &mut extracted);
            let key = processed.join(" ");
            if key.is_empty() {
                continue;
            }
            if !scores.contains_key(&key) {
                candidates.from_abstract_links.push(key.clone());
                candidates.processed_to_extracted.insert(key.clone(), extracted.join(" "));
            }
            scores.multiply_or_insert(&key, weights.link_multiplier_abstract_new() / processed.len() as f64);
            push_link(&mut links_abstract, &key, link);
        }

        if !candidates.from_abstract_links.is_empty() {
            for link in &fulltext_links {
                let derived = from_link(link, self.normalizer, self.idf, self.heuristics);
                if derived.is_empty() {
                    continue;
                }
                let key = self.normalizer.process(&derived).join(" ");
                if !key.is_empty() && candidates.from_abstract_links.contains(&key) {
                    push_link(&mut links_fulltext, &key, link);
                }
            }
        }

        for (key, links) in links_fulltext.iter() {
            let multiplier = links.iter().filter(|l| !LINK_TWO_PART.is_match(l)).count().min(2);
            if multiplier > 0 {
                scores.scale(key, weights.link_multiplier_fulltext() * multiplier as f64);
            }
        }

        candidates.links_abstract = links_abstract;
        candidates.links_fulltext = links_fulltext;
        candidates.title_abstract_links = title_abstract_links;
        candidates.fulltext_links = fulltext_links;
    }

    /// Match each link against the candidates it could name.
    fn match_links(
        &self,
        part_links: &[String],
        keys: &[String],
        candidates: &Candidates,
        tokens: &Tokens,
        input: &ScoringInput<'_>,
    ) -> LinkMap {
        let mut links = LinkMap::new();

        for link in part_links {
            let from_link = from_link(link, self.normalizer, self.idf, self.heuristics);
            if from_link.is_empty() {
                continue;
            }
            let from_link_processed = self.normalizer.process(&from_link).join("");
            if from_link_processed.is_empty() {
                continue;
            }

            let mut matched_keys: Vec<String> = Vec::new();
            let link_two_part = LINK_TWO_PART.is_match(link);
            let link_processed = self.normalizer.process(link).join("");
            let mut longest_start = "";
            let mut longest_end = "";

            for key in keys {
                if link_two_part && link_processed == *key {
                    continue;
                }
                if format!("{from_link_processed}{from_link_processed}") == *key {
                    continue;
                }
                let key_compare = key.replace(' ', "");
                let key_extracted = candidates
                    .processed_to_extracted
                    .get(key)
                    .map_or(key.as_str(), String::as_str);

                let mut found = *key == from_link_processed || key_compare == from_link_processed;

                if !found && !key.contains(' ') && key_compare.starts_with(&from_link_processed) {
                    found = self.good_start(key, key_extracted, &from_link_processed, &tokens.processed);
                }

                if !found
                    && !key.contains(' ')
                    && key_compare.ends_with(&from_link_processed)
                    && !LINK_TWO_PART.is_match(key_extracted)
                {
                    found = good_end(key_extracted, &from_link_processed);
                }

                if !found
                    && key.contains(' ')
                    && key_compare.starts_with(&from_link_processed)
                    && GOOD_START_MULTI.is_match(key_extracted)
                {
                    found = initials_pattern(key_extracted).is_some_and(|re| {
                        re.is_match(&tokens.title_without_links) || re.is_match(&tokens.abstract_without_links)
                    });
                }

                let linkable = || TO_LINK.is_match(key_extracted) && !NOT_TO_LINK.is_match(key_extracted);
                if !found
                    && from_link_processed.starts_with(&key_compare)
                    && linkable()
                    && key.chars().count() > longest_start.chars().count()
                {
                    longest_start = key.as_str();
                }
                if !found
                    && from_link_processed.ends_with(&key_compare)
                    && linkable()
                    && key.chars().count() > longest_end.chars().count()
                {
                    longest_end = key.as_str();
                }

                if !found && is_acronym(&from_link_processed, key, true) {
                    found = true;
                }

                if found {
                    push_link(&mut links, key, link);
                    matched_keys.push(key.clone());
                }
            }

            if let Some(tool_title) = &input.tool_title {
                if let Some(title) = tool_title.usable_title() {
                    self.tool_title_match(title, &mut matched_keys, link_two_part, &link_processed, &from_link, link, &mut links);
                }
                if let Some(acronym) = tool_title.usable_acronym() {
                    self.tool_title_match(acronym, &mut matched_keys, link_two_part, &link_processed, &from_link, link, &mut links);
                }
            }

            if longest_start.chars().count() > 2 && !matched_keys.iter().any(|k| k.starts_with(longest_start)) {
                push_link(&mut links, longest_start, link);
                matched_keys.push(longest_start.to_string());
            }
            if longest_end.chars().count() > 2 && !matched_keys.iter().any(|k| k.ends_with(longest_end)) {
                push_link(&mut links, longest_end, link);
                matched_keys.push(longest_end.to_string());
            }
        }

        links
    }

    /// Whether a link name that is a prefix of `key` ends on a word boundary
    /// of its original-case form.
    fn good_start(&self, key: &str, key_extracted: &str, from_link_processed: &str, processed: &[Vec<String>]) -> bool {
        let lower: Vec<char> = key_extracted.to_lowercase().chars().collect();
        let original: Vec<char> = key_extracted.chars().collect();
        let mut index = 0;
        for c in from_link_processed.chars() {
            while index < lower.len() && lower[index] != c {
                index += 1;
            }
            if index < lower.len() {
                index += 1;
            } else {
                break;
            }
        }
        index = index.saturating_sub(1).min(original.len());

        let good_start: String = original[index..].iter().collect();
        let second = original.get(index + 1).copied();
        if GOOD_START.is_match(&good_start) && !(original.len() - index == 2 && second == Some('s')) {
            return true;
        }
        if original.len() - index >= 2 && second == Some('-') {
            let occurrences = processed.iter().flatten().filter(|w| *w == key).count();
            return occurrences > 1;
        }
        false
    }

    #[allow(clippy::too_many_arguments)]
    fn tool_title_match(
        &self,
        tool_title: &str,
        matched_keys: &mut Vec<String>,
        link_two_part: bool,
        link_processed: &str,
        from_link: &str,
        link: &str,
        links: &mut LinkMap,
    ) -> bool {
        if tool_title.is_empty() {
            return false;
        }
        let processed = self.normalizer.process(tool_title);
        let key = processed.join(" ");

        if processed.len() > self.weights().compound_words
            || matched_keys.contains(&key)
            || (link_two_part && link_processed == key)
        {
            return false;
        }

        let title_hyphen = self.normalizer.process(&tool_title.replace('-', " ")).join(" ");
        let link_hyphen = self.normalizer.process(&from_link.replace('-', " ")).join(" ");
        let title_trimmed = TOOL_TITLE_TRIM.replacen(&title_hyphen, 1, "").into_owned();
        let link_trimmed = TOOL_TITLE_TRIM.replacen(&link_hyphen, 1, "").into_owned();
        let title_compare = title_trimmed.replace(' ', "");
        let link_compare = link_trimmed.replace(' ', "");
        if title_compare.chars().count() < 2 || link_compare.chars().count() < 2 {
            return false;
        }

        let matches = title_compare.starts_with(&link_compare)
            || title_compare.ends_with(&link_compare)
            || link_compare.starts_with(&title_compare)
            || link_compare.ends_with(&title_compare)
            || spread_pattern(&link_compare, false).is_some_and(|re| re.is_match(&title_trimmed))
            || spread_pattern(&title_compare, false).is_some_and(|re| re.is_match(&link_trimmed))
            || spread_pattern(&link_compare, true).is_some_and(|re| re.is_match(&title_trimmed))
            || spread_pattern(&title_compare, true).is_some_and(|re| re.is_match(&link_trimmed));

        if matches {
            push_link(links, &key, link);
            matched_keys.push(key);
        }
        matches
    }
}

/// Whether a link name that is a suffix of `key_extracted` starts on a word
/// boundary of it.
fn good_end(key_extracted: &str, from_link_processed: &str) -> bool {
    let lower: Vec<char> = key_extracted.to_lowercase().chars().collect();
    let original: Vec<char> = key_extracted.chars().collect();
    let mut index = lower.len() as isize - 1;
    for c in from_link_processed.chars().rev() {
        while index >= 0 && lower[index as usize] != c {
            index -= 1;
        }
        if index >= 0 {
            index -= 1;
        } else {
            break;
        }
    }
    let len = lower.len() as isize;
    if index < len {
        index += 1;
    }
    if index < len {
        index += 1;
    }
    let end = (index.max(0) as usize).min(original.len());
    let good_end: String = original[..end].iter().collect();
    GOOD_END.is_match(&good_end)
}

/// Pattern of the first and last letter of each word, so `Foo Bar` is found
/// as `foo.bar`, `FooBar` or `F... B...` in running text.
fn initials_pattern(key_extracted: &str) -> Option<Regex> {
    let mut pattern = String::new();
    let words: Vec<&str> = key_extracted.split(' ').filter(|w| !w.is_empty()).collect();
    for (i, word) in words.iter().enumerate() {
        let mut chars = word.chars();
        let first = chars.next()?;
        pattern.push_str(&pattern_char(first));
        if let Some(last) = chars.next_back() {
            pattern.push_str("[^ ]*");
            pattern.push_str(&pattern_char(last));
        }
        if i + 1 < words.len() {
            pattern.push_str("([ ./]+)");
        }
    }
    Regex::new(&pattern).ok()
}

/// Pattern of the characters of `compare` in order, allowed to spread over
/// several words. `anchored` requires the whole subject to be covered.
fn spread_pattern(compare: &str, anchored: bool) -> Option<Regex> {
    let mut chars = compare.chars();
    let first = chars.next()?;
    let mut pattern = String::from(if anchored { "^" } else { "(^| )" });
    pattern.push_str(&pattern_char(first));
    for c in chars {
        pattern.push_str(if anchored { "([^ ]*|.* )" } else { "(.* )?" });
        pattern.push_str(&pattern_char(c));
    }
    if anchored {
        pattern.push_str("[^ ]*$");
    }
    Regex::new(&pattern).ok()
}

/// Drop full-text links that repeat a title or abstract link. When the two
/// differ only in scheme or trailing debris, the title or abstract link takes
/// the cleaner form.
fn dedup_fulltext_links(title_abstract_links: &mut [String], fulltext_links: &mut Vec<String>) {
    for i in 0..title_abstract_links.len() {
        let mut title_abstract_link = title_abstract_links[i].clone();
        let mut duplicate = None;

        for (f, fulltext_link) in fulltext_links.iter().enumerate() {
            if *fulltext_link == title_abstract_link {
                duplicate = Some(f);
                break;
            }

            let mut start = String::new();
            if let Some(m) = LINK_COMPARE_START.find(&title_abstract_link) {
                start = title_abstract_link[..m.end()].to_string();
                title_abstract_link = title_abstract_link[m.end()..].to_string();
            }
            let mut fulltext_link = fulltext_link.as_str();
            if let Some(m) = LINK_COMPARE_START.find(fulltext_link) {
                if m.end() > start.len() {
                    start = fulltext_link[..m.end()].to_string();
                }
                fulltext_link = &fulltext_link[m.end()..];
            }

            if fulltext_link == title_abstract_link {
                title_abstract_links[i] = format!("{start}{title_abstract_link}");
                duplicate = Some(f);
                break;
            }

            if let Some(last) = fulltext_link.chars().next_back() {
                if title_abstract_link.starts_with(fulltext_link) {
                    let rest = &title_abstract_link[fulltext_link.len() - last.len_utf8()..];
                    if LINK_COMPARE_REST.is_match(rest) {
                        title_abstract_links[i] = format!("{start}{fulltext_link}");
                        duplicate = Some(f);
                        break;
                    }
                }
            }
        }

        if let Some(f) = duplicate {
            fulltext_links.remove(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeuristicsBuilder;
    use crate::text::PreProcessor;

    fn idf() -> Idf {
        Idf::parse(
            "the\t1000\t0.1\nis\t1000\t0.1\na\t1000\t0.1\nfor\t1000\t0.1\nof\t1000\t0.1\nwe\t1000\t0.1\n\
             tool\t100\t0.3\nsoftware\t100\t0.3\nalignment\t50\t0.4\npresent\t500\t0.15\ncalled\t300\t0.2\n\
             reads\t80\t0.35\nshort\t200\t0.25\nfast\t150\t0.3\n",
        )
        .unwrap()
    }

    fn score(input: &ScoringInput<'_>) -> Candidates {
        let pp = PreProcessor::new();
        let idf = idf();
        let heuristics = Heuristics::default();
        CandidateScorer::new(&pp, &idf, &heuristics).score(input)
    }

    #[test]
    fn test_ordered_map_keeps_insertion_order() {
        let mut scores = ScoreMap::new();
        scores.add("b", 1.0);
        scores.add("a", 2.0);
        scores.add("b", 2.0);
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(scores.score("b"), 3.0);
        scores.multiply_or_insert("c", 4.0);
        scores.scale("missing", 10.0);
        assert!(!scores.contains_key("missing"));
        assert_eq!(
            scores.sorted(),
            vec![("c".to_string(), 4.0), ("b".to_string(), 3.0), ("a".to_string(), 2.0)]
        );
    }

    #[test]
    fn test_sorted_ties_keep_insertion_order() {
        let mut scores = ScoreMap::new();
        scores.insert("first", 1.0);
        scores.insert("second", 1.0);
        let sorted = scores.sorted();
        assert_eq!(sorted[0].0, "first");
        assert_eq!(sorted[1].0, "second");
    }

    #[test]
    fn test_unigram_and_compound_windows() {
        let candidates = score(&ScoringInput {
            abstract_text: "Short reads alignment.",
            ..Default::default()
        });
        let scores = &candidates.scores;
        assert!((scores.score("short") - 0.0625).abs() < 1e-12);
        assert!((scores.score("reads") - 0.1225).abs() < 1e-12);
        assert!((scores.score("short reads") - 0.0625 * 0.1225 / 2.0).abs() < 1e-12);
        assert!(scores.contains_key("short reads alignment"));
        assert_eq!(candidates.processed_to_extracted["short reads"], "Short reads");
    }

    #[test]
    fn test_unknown_words_score_highest() {
        let candidates = score(&ScoringInput {
            abstract_text: "We present Zyxel for short reads.",
            ..Default::default()
        });
        let sorted = candidates.scores.sorted();
        assert_eq!(sorted[0].0, "zyxel");
    }

    #[test]
    fn test_tool_title_boost() {
        let candidates = score(&ScoringInput {
            title: "FooBar: fast alignment",
            title_rest: " : fast alignment",
            abstract_text: "FooBar aligns short reads.",
            tool_title: Some(ToolTitleInput {
                title: "FooBar",
                pruned: "FooBar",
                acronym: None,
            }),
            ..Default::default()
        });
        // 1.0 from the window, then the title multiplier
        assert_eq!(candidates.scores.score("foobar"), 24.0);
        assert_eq!(candidates.scores.sorted()[0].0, "foobar");
    }

    #[test]
    fn test_new_tool_title_inserted() {
        let candidates = score(&ScoringInput {
            title: "Quick Align Kit: fast alignment",
            abstract_text: "Nothing relevant here.",
            tool_title: Some(ToolTitleInput {
                title: "Quick Align Kit",
                pruned: "Quick Align",
                acronym: Some("QAK"),
            }),
            ..Default::default()
        });
        assert_eq!(candidates.scores.score("quick align kit"), 8.0);
        assert!(!candidates.scores.contains_key("quick align"));
        assert_eq!(candidates.scores.score("qak"), 24.0);
        assert_eq!(candidates.processed_to_extracted["quick align kit"], "Quick Align Kit");
    }

    #[test]
    fn test_keyword_boost_is_capped() {
        let heuristics = HeuristicsBuilder::new()
            .set_before_tier(1, vec!["called".to_string()])
            .build();
        let pp = PreProcessor::new();
        let idf = idf();
        let scorer = CandidateScorer::new(&pp, &idf, &heuristics);
        let candidates = scorer.score(&ScoringInput {
            abstract_text: "A tool called Zyx. A tool called Zyx. A tool called Zyx. A tool called Zyx.",
            ..Default::default()
        });
        // four unigram hits, boosted 6 * 6 * 2 (capped at 72)
        assert!((candidates.scores.score("zyx") - 4.0 * 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_abstract_link_boost() {
        let candidates = score(&ScoringInput {
            abstract_text: "We present FooBar for short reads. Available at https://github.com/lab/FooBar.",
            ..Default::default()
        });
        let links = candidates.links_abstract.get("foobar").cloned().unwrap_or_default();
        assert_eq!(links, vec!["https://github.com/lab/FooBar"]);
        assert_eq!(candidates.scores.sorted()[0].0, "foobar");
        assert!(candidates.scores.score("foobar") >= 24.0);
    }

    #[test]
    fn test_link_only_candidate() {
        let candidates = score(&ScoringInput {
            abstract_text: "Short reads are aligned. See https://github.com/lab/Qwerty for code.",
            ..Default::default()
        });
        assert!(candidates.from_abstract_links.contains(&"qwerty".to_string()));
        assert_eq!(candidates.processed_to_extracted["qwerty"], "Qwerty");
        assert_eq!(
            candidates.links_abstract.get("qwerty").cloned().unwrap_or_default(),
            vec!["https://github.com/lab/Qwerty"]
        );
    }

    #[test]
    fn test_fulltext_duplicates_dropped() {
        let mut abstract_links = vec!["http://tool.org/x".to_string()];
        let mut fulltext = vec!["tool.org/x".to_string(), "http://other.org".to_string()];
        dedup_fulltext_links(&mut abstract_links, &mut fulltext);
        assert_eq!(abstract_links, vec!["http://tool.org/x"]);
        assert_eq!(fulltext, vec!["http://other.org"]);

        let mut abstract_links = vec!["http://tool.org/x".to_string()];
        let mut fulltext = vec!["http://tool.org/x".to_string()];
        dedup_fulltext_links(&mut abstract_links, &mut fulltext);
        assert!(fulltext.is_empty());
    }

    #[test]
    fn test_spread_and_initials_patterns() {
        let re = spread_pattern("fb", false).unwrap();
        assert!(re.is_match("foo bar"));
        let re = spread_pattern("fb", true).unwrap();
        assert!(re.is_match("foobar"));
        assert!(!re.is_match("xfoobar"));
        let re = initials_pattern("Foo Bar").unwrap();
        assert!(re.is_match("see Foo.Bar online"));
    }

    #[test]
    fn test_good_end() {
        assert!(good_end("GeneFoo", "foo"));
        assert!(!good_end("bigfoo", "foo"));
    }
}
