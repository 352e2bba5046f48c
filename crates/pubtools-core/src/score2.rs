//! Second-stage scoring of results whose top suggestion is uncertain.
//!
//! A suggestion below `score_min` collects evidence that Pass 1 could not
//! see: whether its links are alive, whether it agrees with the tool title,
//! how it is capitalized and how rare its words are. The sum becomes
//! `score2`, which then decides ordering among low-scoring suggestions.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{PATH_SPLIT, char_len, is_acronym, tool_title_prune, trim_ascii};
use crate::idf::Idf;
use crate::model::Result2;
use crate::page::Pages;
use crate::text::TextNormalizer;

static CASE_REMOVE_HYPHEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\p{Lu}.*)-(\p{Lu})(.*)$").unwrap());
static CASE_REMOVE_PLURAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*\p{Lu})s$").unwrap());
static CASE_LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Ll}+$").unwrap());
static CASE_FIRST_CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lu}\p{Ll}+$").unwrap());
static CASE_UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lu}+$").unwrap());
static CASE_MIXED_AS_REST: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.*\p{L}.*$").unwrap());

/// Hand-tuned Pass 2 constants.
#[derive(Debug, Clone, PartialEq)]
pub struct Score2Weights {
    /// Suggestions scoring at least this in Pass 1 are trusted as is.
    pub score_min: f64,
    /// Lower bound on `score2` for a suggestion to be included.
    pub score2_min: f64,
    /// Included suggestions up to this `score2` are flagged low confidence.
    pub low_confidence: f64,
    pub abstract_link: f64,
    pub fulltext_link: f64,
    pub from_abstract_link: f64,
    /// Link bonuses of suggestions other than the top one are divided by this.
    pub not_first_link_divider: f64,
    /// Tool-title bonus by match level, strongest first.
    pub tool_title: [f64; 5],
    pub tool_title_original_max_words_for_acronym: usize,
    pub case_lowercase: f64,
    pub case_first_capital: f64,
    pub case_uppercase: f64,
    pub case_mixed: f64,
    /// Subtracted from the case bonus for every word after the first.
    pub case_decrease: f64,
    pub score_min_for_mixed_idf: f64,
    pub score_min_for_uppercase_idf: f64,
    pub score_min_for_mixed_idf2: f64,
    pub idf_power: f64,
    pub idf_multiplier: f64,
}

impl Default for Score2Weights {
    fn default() -> Self {
        Self {
            score_min: 1000.0,
            score2_min: 1072.1,
            low_confidence: 1750.0,
            abstract_link: 1000.0,
            fulltext_link: 500.0,
            from_abstract_link: 400.0,
            not_first_link_divider: 2.0,
            tool_title: [900.0, 600.0, 400.0, 250.0, 150.0],
            tool_title_original_max_words_for_acronym: 6,
            case_lowercase: 100.0,
            case_first_capital: 200.0,
            case_uppercase: 300.0,
            case_mixed: 400.0,
            case_decrease: 100.0,
            score_min_for_mixed_idf: 3.5,
            score_min_for_uppercase_idf: 7.0,
            score_min_for_mixed_idf2: 12.1,
            idf_power: 5.0,
            idf_multiplier: 500.0,
        }
    }
}

pub struct Score2Refiner<'a, N: TextNormalizer + ?Sized> {
    normalizer: &'a N,
    idf: &'a Idf,
    weights: &'a Score2Weights,
}

impl<'a, N: TextNormalizer + ?Sized> Score2Refiner<'a, N> {
    pub fn new(normalizer: &'a N, idf: &'a Idf, weights: &'a Score2Weights) -> Self {
        Self {
            normalizer,
            idf,
            weights,
        }
    }

    /// Compute `score2` for every suggestion of `result` and re-sort them.
    /// Results whose top suggestion already reaches `score_min` are left as is.
    pub fn refine(&self, result: &mut Result2, pages: Pages<'_>) {
        let w = self.weights;
        let Some(top) = result.suggestions.first_mut() else {
            return;
        };
        if !top.needs_score2(w.score_min) {
            return;
        }
        top.score2 = top.score;
        let first_score = top.score;

        self.link_bonus(result, first_score, pages);
        self.tool_title_bonus(result);
        self.case_bonus(result);
        self.idf_bonus(result);
        self.idf_boost(result);

        result
            .suggestions
            .sort_by(|a, b| a.rank_cmp(b, w.score_min));

        if let Some(top) = result.suggestions.first() {
            tracing::debug!(
                name = %top.extracted,
                score = top.score,
                score2 = top.score2,
                "refined suggestions"
            );
        }
    }

    fn link_bonus(&self, result: &mut Result2, first_score: f64, pages: Pages<'_>) {
        let w = self.weights;
        for (i, suggestion) in result.suggestions.iter_mut().enumerate() {
            let first = i == 0 || suggestion.score == first_score;
            let divide = |part: f64| if first { part } else { part / w.not_first_link_divider };

            let part = if suggestion.links_abstract.iter().any(|url| !pages.is_broken(url)) {
                Some(divide(if suggestion.from_abstract_link {
                    w.from_abstract_link
                } else {
                    w.abstract_link
                }))
            } else if suggestion.links_fulltext.iter().any(|url| !pages.is_broken(url)) {
                Some(divide(w.fulltext_link))
            } else {
                None
            };

            if let Some(part) = part {
                if suggestion.score2 < 0.0 {
                    suggestion.score2 = suggestion.score;
                }
                suggestion.score2_parts[0] = part;
                suggestion.score2 += part;
            }
        }
    }

    /// How closely a suggestion agrees with the tool title of the
    /// publication, 1 being the closest and 0 no agreement.
    fn tool_title_match(&self, extracted: &str, context: &TitleContext) -> usize {
        let mut words: Vec<String> = extracted.split(' ').map(str::to_string).collect();
        let pruned = self.normalizer.process(&tool_title_prune(&mut words)).join(" ");
        let original_acronym = || {
            !context.extracted_original.is_empty()
                && context.extracted_original_words <= self.weights.tool_title_original_max_words_for_acronym
                && is_acronym(&pruned, &context.extracted_original, false)
        };

        let len = char_len(&pruned);
        if len > 2 {
            if context.pruned == pruned {
                context.pruned_words
            } else if context.acronym == pruned {
                1
            } else if (!context.pruned.is_empty() && is_acronym(&context.pruned, extracted, false))
                || (!context.acronym.is_empty() && is_acronym(&context.acronym, extracted, false))
                || original_acronym()
            {
                2
            } else if context.pruned.contains(&pruned) {
                context.pruned_words + 1
            } else {
                0
            }
        } else if len > 0 {
            if context.pruned == pruned || context.acronym == pruned {
                1
            } else if original_acronym() {
                2
            } else {
                0
            }
        } else {
            0
        }
    }

    fn tool_title_bonus(&self, result: &mut Result2) {
        let first = |v: &Vec<String>| v.first().cloned().unwrap_or_default();
        let pruned = self.normalizer.process(&first(&result.tool_title_pruned));
        let extracted_original = first(&result.tool_title_extracted_original);
        let context = TitleContext {
            pruned_words: pruned.len(),
            pruned: pruned.join(" "),
            acronym: self.normalizer.process(&first(&result.tool_title_acronym)).join(" "),
            extracted_original_words: extracted_original.split(' ').count(),
            extracted_original,
        };

        for suggestion in &mut result.suggestions {
            let level = self.tool_title_match(&suggestion.extracted, &context);
            if level > 0 && level < 6 {
                if suggestion.score2 < 0.0 {
                    suggestion.score2 = suggestion.score;
                }
                let part = self.weights.tool_title[level - 1];
                suggestion.score2_parts[1] = part;
                suggestion.score2 += part;
            }
        }
    }

    /// Capitalization bonus of a name: the weakest class among its words,
    /// less a penalty per extra word. Negative when nothing applies.
    fn case_score(&self, extracted: &str, from_abstract_link: bool) -> f64 {
        let w = self.weights;
        let name = if from_abstract_link {
            trim_ascii(&PATH_SPLIT.replace_all(extracted, " ")).to_string()
        } else {
            extracted.to_string()
        };
        let mut words: Vec<String> = name.split(' ').map(str::to_string).collect();
        let pruned = tool_title_prune(&mut words);
        let parts: Vec<&str> = pruned.split(' ').collect();

        let mut min = -1.0;
        for part in &parts {
            let mut part = match CASE_REMOVE_HYPHEN.captures(part) {
                Some(caps) => format!("{}{}{}", &caps[1], caps[2].to_lowercase(), &caps[3]),
                None => part.to_string(),
            };
            part = part.replace('-', "");
            if let Some(caps) = CASE_REMOVE_PLURAL.captures(&part) {
                part = caps[1].to_string();
            }
            let class = if CASE_LOWERCASE.is_match(&part) {
                w.case_lowercase
            } else if CASE_FIRST_CAPITAL.is_match(&part) {
                w.case_first_capital
            } else if CASE_UPPERCASE.is_match(&part) {
                w.case_uppercase
            } else if CASE_MIXED_AS_REST.is_match(&part) {
                w.case_mixed
            } else {
                continue;
            };
            if class < min || min < 0.0 {
                min = class;
            }
        }
        min - (parts.len() - 1) as f64 * w.case_decrease
    }

    fn case_bonus(&self, result: &mut Result2) {
        for suggestion in result.suggestions.iter_mut().filter(|s| s.score2 >= 0.0) {
            let part = self.case_score(&suggestion.extracted, suggestion.from_abstract_link);
            if part > 0.0 {
                suggestion.score2_parts[2] = part;
                suggestion.score2 += part;
            }
        }
    }

    fn idf_bonus(&self, result: &mut Result2) {
        let w = self.weights;
        for suggestion in result.suggestions.iter_mut().filter(|s| s.score2 >= 0.0) {
            let parts: Vec<&str> = suggestion.processed.split(' ').collect();
            let sum: f64 = parts
                .iter()
                .map(|p| self.idf.get_shifted(p, 0.0).powf(w.idf_power) * w.idf_multiplier)
                .sum();
            if sum > 0.0 {
                let part = sum / parts.len() as f64;
                suggestion.score2_parts[3] = part;
                suggestion.score2 += part;
            }
        }
    }

    /// Rare words count double for names whose capitalization is already
    /// unusual, provided Pass 1 saw them at all.
    fn idf_boost(&self, result: &mut Result2) {
        let w = self.weights;
        for suggestion in result.suggestions.iter_mut().filter(|s| s.score2 >= 0.0) {
            let case = suggestion.score2_parts[2];
            let mixed = case == w.case_mixed && suggestion.score >= w.score_min_for_mixed_idf;
            let uppercase = case == w.case_uppercase && suggestion.score >= w.score_min_for_uppercase_idf;
            if mixed || uppercase {
                let mut part = suggestion.score2_parts[3];
                if case == w.case_mixed && suggestion.score >= w.score_min_for_mixed_idf2 {
                    part += suggestion.score2_parts[3] / 2.0;
                }
                suggestion.score2_parts[2] += part;
                suggestion.score2 += part;
            }
        }
    }
}

struct TitleContext {
    pruned: String,
    pruned_words: usize,
    acronym: String,
    extracted_original: String,
    extracted_original_words: usize,
}
