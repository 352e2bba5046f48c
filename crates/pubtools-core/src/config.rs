use std::collections::HashSet;

use crate::config_file::{ConfigFile, ListSetting};
use crate::score2::Score2Weights;
use crate::scoring::ScoringWeights;

/// Controls how a word list is overridden from its defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

impl From<&ListSetting> for ListOverride<String> {
    fn from(setting: &ListSetting) -> Self {
        match (&setting.replace, &setting.extend) {
            (Some(replace), _) => ListOverride::Replace(replace.clone()),
            (None, Some(extend)) => ListOverride::Extend(extend.clone()),
            (None, None) => ListOverride::Default,
        }
    }
}

const BEFORE_TIER1: &str = include_str!("../resources/before_tier1.txt");
const BEFORE_TIER2: &str = include_str!("../resources/before_tier2.txt");
const BEFORE_TIER3: &str = include_str!("../resources/before_tier3.txt");
const AFTER_TIER1: &str = include_str!("../resources/after_tier1.txt");
const AFTER_TIER2: &str = include_str!("../resources/after_tier2.txt");
const AFTER_TIER3: &str = include_str!("../resources/after_tier3.txt");
const HOST_IGNORE: &str = include_str!("../resources/host_ignore.txt");
const LICENSES: &str = include_str!("../resources/license.txt");
const LANGUAGES: &str = include_str!("../resources/language.txt");
const LANGUAGE_KEYWORDS: &str = include_str!("../resources/language_keywords.txt");

/// One entry per non-blank line, `#` starts a comment line.
fn word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Injected word lists, dictionaries and tuned constants for both passes.
///
/// Use [`HeuristicsBuilder`] to override individual lists.
#[derive(Debug, Clone)]
pub struct Heuristics {
    // ── scoring.rs ──
    /// Keywords that precede a tool name ("called", "named", ...), strongest first.
    pub(crate) before_tiers: [HashSet<String>; 3],
    /// Keywords that follow a tool name ("software", "tool", ...), strongest first.
    pub(crate) after_tiers: [HashSet<String>; 3],
    pub(crate) scoring: ScoringWeights,

    // ── links.rs ──
    /// Hosts whose first label never names a tool (`github`, `sourceforge`, ...).
    pub(crate) host_ignore: HashSet<String>,

    // ── license.rs / language.rs ──
    pub(crate) licenses: Vec<String>,
    pub(crate) languages: Vec<String>,
    /// Words that must appear near languages whose name is also a common word.
    pub(crate) language_keywords: Vec<String>,

    // ── score2.rs ──
    pub(crate) score2: Score2Weights,
}

impl Default for Heuristics {
    fn default() -> Self {
        HeuristicsBuilder::new().build()
    }
}

impl Heuristics {
    /// Multiplier of the before-keyword tier `word` belongs to.
    pub fn before_multiplier(&self, word: &str) -> Option<f64> {
        tier_multiplier(&self.before_tiers, word, &self.scoring)
    }

    /// Multiplier of the after-keyword tier `word` belongs to.
    pub fn after_multiplier(&self, word: &str) -> Option<f64> {
        tier_multiplier(&self.after_tiers, word, &self.scoring)
    }

    pub fn is_host_ignored(&self, host: &str) -> bool {
        self.host_ignore.contains(host)
    }

    pub fn scoring(&self) -> &ScoringWeights {
        &self.scoring
    }

    pub fn score2(&self) -> &Score2Weights {
        &self.score2
    }

    pub fn licenses(&self) -> &[String] {
        &self.licenses
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn language_keywords(&self) -> &[String] {
        &self.language_keywords
    }
}

fn tier_multiplier(tiers: &[HashSet<String>; 3], word: &str, weights: &ScoringWeights) -> Option<f64> {
    if tiers[0].contains(word) {
        Some(weights.tier1)
    } else if tiers[1].contains(word) {
        Some(weights.tier2)
    } else if tiers[2].contains(word) {
        Some(weights.tier3)
    } else {
        None
    }
}

/// Builder for [`Heuristics`].
#[derive(Debug, Clone, Default)]
pub struct HeuristicsBuilder {
    before_tiers: [ListOverride<String>; 3],
    after_tiers: [ListOverride<String>; 3],
    host_ignore: ListOverride<String>,
    licenses: ListOverride<String>,
    languages: ListOverride<String>,
    language_keywords: ListOverride<String>,
    scoring: Option<ScoringWeights>,
    score2: Option<Score2Weights>,
}

impl HeuristicsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the `[words]` and `[scoring]` sections of a config file.
    pub fn from_config(config: &ConfigFile) -> Self {
        let mut builder = Self::new();
        if let Some(words) = &config.words {
            let list = |s: &Option<ListSetting>| s.as_ref().map(ListOverride::from).unwrap_or_default();
            builder.before_tiers = [
                list(&words.before_tier1),
                list(&words.before_tier2),
                list(&words.before_tier3),
            ];
            builder.after_tiers = [
                list(&words.after_tier1),
                list(&words.after_tier2),
                list(&words.after_tier3),
            ];
            builder.host_ignore = list(&words.host_ignore);
            builder.licenses = list(&words.licenses);
            builder.languages = list(&words.languages);
            builder.language_keywords = list(&words.language_keywords);
        }
        if let Some(scoring) = &config.scoring {
            let mut weights = ScoringWeights::default();
            if let Some(v) = scoring.suggestion_limit {
                weights.suggestion_limit = v;
            }
            if let Some(v) = scoring.top_score_limit {
                weights.top_score_limit = v;
            }
            if let Some(v) = scoring.tool_title_multiplier {
                weights.tool_title_multiplier = v;
            }
            if let Some(v) = scoring.link_multiplier_abstract {
                weights.link_multiplier_abstract = v;
            }
            builder.scoring = Some(weights);

            let mut score2 = Score2Weights::default();
            if let Some(v) = scoring.score_min {
                score2.score_min = v;
            }
            if let Some(v) = scoring.score2_min {
                score2.score2_min = v;
            }
            builder.score2 = Some(score2);
        }
        builder
    }

    // ── Keyword tiers ──

    /// Replace before-keyword tier `tier` (1 to 3).
    pub fn set_before_tier(mut self, tier: usize, words: Vec<String>) -> Self {
        if let Some(slot) = tier.checked_sub(1).and_then(|i| self.before_tiers.get_mut(i)) {
            *slot = ListOverride::Replace(words);
        }
        self
    }

    /// Replace after-keyword tier `tier` (1 to 3).
    pub fn set_after_tier(mut self, tier: usize, words: Vec<String>) -> Self {
        if let Some(slot) = tier.checked_sub(1).and_then(|i| self.after_tiers.get_mut(i)) {
            *slot = ListOverride::Replace(words);
        }
        self
    }

    // ── Host ignore ──

    pub fn set_host_ignore(mut self, hosts: Vec<String>) -> Self {
        self.host_ignore = ListOverride::Replace(hosts);
        self
    }

    pub fn add_host_ignore(mut self, host: String) -> Self {
        match &mut self.host_ignore {
            ListOverride::Extend(v) => v.push(host),
            _ => self.host_ignore = ListOverride::Extend(vec![host]),
        }
        self
    }

    // ── Dictionaries ──

    pub fn set_licenses(mut self, licenses: Vec<String>) -> Self {
        self.licenses = ListOverride::Replace(licenses);
        self
    }

    pub fn set_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = ListOverride::Replace(languages);
        self
    }

    pub fn add_language_keyword(mut self, keyword: String) -> Self {
        match &mut self.language_keywords {
            ListOverride::Extend(v) => v.push(keyword),
            _ => self.language_keywords = ListOverride::Extend(vec![keyword]),
        }
        self
    }

    // ── Weights ──

    pub fn scoring_weights(mut self, weights: ScoringWeights) -> Self {
        self.scoring = Some(weights);
        self
    }

    pub fn score2_weights(mut self, weights: Score2Weights) -> Self {
        self.score2 = Some(weights);
        self
    }

    pub fn build(self) -> Heuristics {
        let set = |o: &ListOverride<String>, defaults: &str| -> HashSet<String> {
            o.resolve(&word_list(defaults))
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect()
        };
        Heuristics {
            before_tiers: [
                set(&self.before_tiers[0], BEFORE_TIER1),
                set(&self.before_tiers[1], BEFORE_TIER2),
                set(&self.before_tiers[2], BEFORE_TIER3),
            ],
            after_tiers: [
                set(&self.after_tiers[0], AFTER_TIER1),
                set(&self.after_tiers[1], AFTER_TIER2),
                set(&self.after_tiers[2], AFTER_TIER3),
            ],
            scoring: self.scoring.unwrap_or_default(),
            host_ignore: set(&self.host_ignore, HOST_IGNORE),
            licenses: self.licenses.resolve(&word_list(LICENSES)),
            languages: self.languages.resolve(&word_list(LANGUAGES)),
            language_keywords: self.language_keywords.resolve(&word_list(LANGUAGE_KEYWORDS)),
            score2: self.score2.unwrap_or_default(),
        }
    }
}
