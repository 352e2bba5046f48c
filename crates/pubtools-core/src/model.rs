//! Records that flow through both passes: publications in, Pass 1 results
//! persisted in between, Pass 2 results and registry diffs out.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;
use crate::links::BiotoolsLink;

/// Publication identifiers. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PubIds {
    pub pmid: String,
    pub pmcid: String,
    pub doi: String,
}

impl PubIds {
    pub fn new(pmid: impl Into<String>, pmcid: impl Into<String>, doi: impl Into<String>) -> Self {
        Self {
            pmid: pmid.into(),
            pmcid: pmcid.into(),
            doi: doi.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pmid.is_empty() && self.pmcid.is_empty() && self.doi.is_empty()
    }

    /// A resolvable link to the publication, preferring PMID, then PMCID, then DOI.
    pub fn link(&self) -> Option<String> {
        if !self.pmid.is_empty() {
            Some(format!("https://www.ncbi.nlm.nih.gov/pubmed/?term={}", self.pmid))
        } else if !self.pmcid.is_empty() {
            Some(format!("https://www.ncbi.nlm.nih.gov/pmc/articles/{}/", self.pmcid))
        } else if !self.doi.is_empty() {
            Some(format!("https://doi.org/{}", self.doi))
        } else {
            None
        }
    }
}

impl fmt::Display for PubIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.pmid, self.pmcid, self.doi)
    }
}

/// A corresponding author of a publication, later proposed as a registry credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrespAuthor {
    pub name: String,
    pub orcid: String,
    pub email: String,
    pub phone: String,
    pub uri: String,
}

impl CorrespAuthor {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.uri.is_empty()
    }
}

impl fmt::Display for CorrespAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.name, &self.orcid, &self.email, &self.uri]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        f.write_str(&parts.join(", "))
    }
}

fn minus_one_i64() -> i64 {
    -1
}

fn minus_one_i32() -> i32 {
    -1
}

/// Render epoch milliseconds as an ISO-8601 UTC timestamp, or "" when unknown.
pub fn human_timestamp(millis: i64) -> String {
    if millis < 0 {
        return String::new();
    }
    DateTime::from_timestamp_millis(millis)
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// A pre-fetched publication, the input of Pass 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publication {
    pub pmid: String,
    pub pmcid: String,
    pub doi: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub fulltext: String,
    pub oa: bool,
    pub journal_title: String,
    /// Epoch milliseconds, -1 when unknown.
    #[serde(default = "minus_one_i64")]
    pub pub_date: i64,
    #[serde(default = "minus_one_i32")]
    pub citations_count: i32,
    #[serde(default = "minus_one_i64")]
    pub citations_timestamp: i64,
    pub corresp_author: Vec<CorrespAuthor>,
}

impl Publication {
    pub fn load_all(path: &Path) -> Result<Vec<Publication>, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn pub_date_human(&self) -> String {
        human_timestamp(self.pub_date)
    }

    pub fn citations_timestamp_human(&self) -> String {
        human_timestamp(self.citations_timestamp)
    }
}

fn score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// A Pass 1 name suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suggestion1 {
    pub score: f64,
    /// The name before sanitizing, empty when sanitizing changed nothing.
    pub original: String,
    pub extracted: String,
    pub processed: String,
    pub links_abstract: Vec<String>,
    pub links_fulltext: Vec<String>,
    /// The name was derived from an abstract link rather than found in text.
    pub from_abstract_link: bool,
}

impl Suggestion1 {
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        score_desc(self.score, other.score)
    }
}

/// One publication (or one tool title of it) after Pass 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Result1 {
    pub pub_ids: PubIds,
    pub suggestions: Vec<Suggestion1>,
    pub leftover_links_abstract: Vec<String>,
    pub leftover_links_fulltext: Vec<String>,
    pub title: String,
    pub tool_title_others: Vec<String>,
    pub tool_title_extracted_original: String,
    pub tool_title: String,
    pub tool_title_pruned: String,
    pub tool_title_acronym: String,
    pub abstract_sentences: Vec<String>,
    pub oa: bool,
    pub journal_title: String,
    pub pub_date: i64,
    pub pub_date_human: String,
    pub citations_count: i32,
    pub citations_timestamp: i64,
    pub citations_timestamp_human: String,
    pub corresp_author: Vec<CorrespAuthor>,
}

impl Result1 {
    /// Results with suggestions first, ordered by their top suggestion.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        match (self.suggestions.first(), other.suggestions.first()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.rank_cmp(b),
        }
    }

    pub fn load_all(path: &Path) -> Result<Vec<Result1>, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Push `item` unless an equal one is already present.
pub(crate) fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// A suggestion carried into Pass 2, with its refined score, registry
/// matches and resolved links.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion2 {
    pub score: f64,
    pub original: String,
    pub extracted: String,
    pub processed: String,
    pub links_abstract: Vec<String>,
    pub links_fulltext: Vec<String>,
    pub from_abstract_link: bool,
    /// -1 until computed.
    pub score2: f64,
    /// Link, tool title, capitalization and IDF contributions to `score2`.
    pub score2_parts: [f64; 4],
    pub publication_and_name_existing: Vec<usize>,
    pub name_existing_some_publication_different: Vec<usize>,
    pub name_existing_some_publication_different_pub_ids: Vec<Vec<PubIds>>,
    pub some_publication_existing_name_different: Vec<usize>,
    pub some_publication_existing_name_different_pub_ids: Vec<Vec<PubIds>>,
    pub name_existing_publication_different: Vec<usize>,
    pub name_existing_publication_different_pub_ids: Vec<Vec<PubIds>>,
    pub homepage: String,
    pub homepage_broken: bool,
    pub homepage_missing: bool,
    pub link_links: Vec<BiotoolsLink>,
    pub download_links: Vec<BiotoolsLink>,
    pub documentation_links: Vec<BiotoolsLink>,
    pub broken_links: Vec<BiotoolsLink>,
}

impl From<Suggestion1> for Suggestion2 {
    fn from(s: Suggestion1) -> Self {
        Self {
            score: s.score,
            original: s.original,
            extracted: s.extracted,
            processed: s.processed,
            links_abstract: s.links_abstract,
            links_fulltext: s.links_fulltext,
            from_abstract_link: s.from_abstract_link,
            score2: -1.0,
            score2_parts: [0.0; 4],
            publication_and_name_existing: Vec::new(),
            name_existing_some_publication_different: Vec::new(),
            name_existing_some_publication_different_pub_ids: Vec::new(),
            some_publication_existing_name_different: Vec::new(),
            some_publication_existing_name_different_pub_ids: Vec::new(),
            name_existing_publication_different: Vec::new(),
            name_existing_publication_different_pub_ids: Vec::new(),
            homepage: String::new(),
            homepage_broken: false,
            homepage_missing: false,
            link_links: Vec::new(),
            download_links: Vec::new(),
            documentation_links: Vec::new(),
            broken_links: Vec::new(),
        }
    }
}

impl Suggestion2 {
    /// Whether this suggestion is confident enough to be acted on.
    pub fn include(&self, score_min: f64, score2_min: f64) -> bool {
        self.score >= score_min || self.score2 >= score2_min
    }

    pub fn low_confidence(&self, score_min: f64, score2_min: f64, low_confidence: f64) -> bool {
        self.score < score_min && self.score2 >= score2_min && self.score2 <= low_confidence
    }

    pub fn needs_score2(&self, score_min: f64) -> bool {
        self.score < score_min
    }

    /// Ordering by score, or by score2 when both sides fall below `score_min`.
    pub fn rank_cmp(&self, other: &Self, score_min: f64) -> Ordering {
        if self.score < score_min && other.score < score_min {
            score_desc(self.score2, other.score2)
        } else {
            score_desc(self.score, other.score)
        }
    }

    /// Every registry index in any of the four buckets.
    pub fn existing(&self) -> impl Iterator<Item = usize> + '_ {
        self.publication_and_name_existing
            .iter()
            .chain(&self.name_existing_some_publication_different)
            .chain(&self.some_publication_existing_name_different)
            .chain(&self.name_existing_publication_different)
            .copied()
    }

    pub fn add_link_links(&mut self, links: Vec<BiotoolsLink>) {
        links.into_iter().for_each(|l| push_unique(&mut self.link_links, l));
    }

    pub fn add_download_links(&mut self, links: Vec<BiotoolsLink>) {
        links.into_iter().for_each(|l| push_unique(&mut self.download_links, l));
    }

    pub fn add_documentation_links(&mut self, links: Vec<BiotoolsLink>) {
        links.into_iter().for_each(|l| push_unique(&mut self.documentation_links, l));
    }

    pub fn remove_homepage_from_links(&mut self) {
        let homepage = crate::common::trim_url(&self.homepage);
        self.link_links.retain(|l| l.url_trimmed != homepage);
        self.download_links.retain(|l| l.url_trimmed != homepage);
        self.documentation_links.retain(|l| l.url_trimmed != homepage);
    }
}

/// One Pass 2 result. After merging it may span several publications, so
/// every per-publication field is a list with one element per publication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Result2 {
    pub pub_ids: Vec<PubIds>,
    pub same_suggestions: Vec<PubIds>,
    pub suggestions: Vec<Suggestion2>,
    pub leftover_links_abstract: Vec<Vec<String>>,
    pub leftover_links_fulltext: Vec<Vec<String>>,
    pub name_match: Vec<usize>,
    pub link_match: Vec<usize>,
    pub link_match_links: Vec<Vec<String>>,
    pub name_word_match: Vec<usize>,
    pub title: Vec<String>,
    pub tool_title_others: Vec<Vec<String>>,
    pub tool_title_extracted_original: Vec<String>,
    pub tool_title: Vec<String>,
    pub tool_title_pruned: Vec<String>,
    pub tool_title_acronym: Vec<String>,
    pub abstract_sentences: Vec<Vec<String>>,
    pub oa: Vec<bool>,
    pub journal_title: Vec<String>,
    pub pub_date: Vec<i64>,
    pub pub_date_human: Vec<String>,
    pub citations_count: Vec<i32>,
    pub citations_timestamp: Vec<i64>,
    pub citations_timestamp_human: Vec<String>,
    pub corresp_author: Vec<Vec<CorrespAuthor>>,
}

impl From<Result1> for Result2 {
    fn from(r: Result1) -> Self {
        Self {
            pub_ids: vec![r.pub_ids],
            suggestions: r.suggestions.into_iter().map(Suggestion2::from).collect(),
            leftover_links_abstract: vec![r.leftover_links_abstract],
            leftover_links_fulltext: vec![r.leftover_links_fulltext],
            title: vec![r.title],
            tool_title_others: vec![r.tool_title_others],
            tool_title_extracted_original: vec![r.tool_title_extracted_original],
            tool_title: vec![r.tool_title],
            tool_title_pruned: vec![r.tool_title_pruned],
            tool_title_acronym: vec![r.tool_title_acronym],
            abstract_sentences: vec![r.abstract_sentences],
            oa: vec![r.oa],
            journal_title: vec![r.journal_title],
            pub_date: vec![r.pub_date],
            pub_date_human: vec![r.pub_date_human],
            citations_count: vec![r.citations_count],
            citations_timestamp: vec![r.citations_timestamp],
            citations_timestamp_human: vec![r.citations_timestamp_human],
            corresp_author: vec![r.corresp_author],
            ..Default::default()
        }
    }
}

impl Result2 {
    pub fn rank_cmp(&self, other: &Self, score_min: f64) -> Ordering {
        match (self.suggestions.first(), other.suggestions.first()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.rank_cmp(b, score_min),
        }
    }

    /// Append every per-publication field of `other` after ours.
    pub fn append_publications(&mut self, other: &Result2) {
        self.pub_ids.extend(other.pub_ids.iter().cloned());
        self.leftover_links_abstract
            .extend(other.leftover_links_abstract.iter().cloned());
        self.leftover_links_fulltext
            .extend(other.leftover_links_fulltext.iter().cloned());
        self.title.extend(other.title.iter().cloned());
        self.tool_title_others.extend(other.tool_title_others.iter().cloned());
        self.tool_title_extracted_original
            .extend(other.tool_title_extracted_original.iter().cloned());
        self.tool_title.extend(other.tool_title.iter().cloned());
        self.tool_title_pruned.extend(other.tool_title_pruned.iter().cloned());
        self.tool_title_acronym.extend(other.tool_title_acronym.iter().cloned());
        self.abstract_sentences.extend(other.abstract_sentences.iter().cloned());
        self.oa.extend(other.oa.iter().copied());
        self.journal_title.extend(other.journal_title.iter().cloned());
        self.pub_date.extend(other.pub_date.iter().copied());
        self.pub_date_human.extend(other.pub_date_human.iter().cloned());
        self.citations_count.extend(other.citations_count.iter().copied());
        self.citations_timestamp.extend(other.citations_timestamp.iter().copied());
        self.citations_timestamp_human
            .extend(other.citations_timestamp_human.iter().cloned());
        self.corresp_author.extend(other.corresp_author.iter().cloned());
    }
}

/// A value together with where it was seen (URLs or publication ids).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub object: String,
    pub provenances: Vec<String>,
}

impl Provenance {
    pub fn new(object: impl Into<String>, provenance: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            provenances: vec![provenance.into()],
        }
    }

    pub fn with_provenances(object: impl Into<String>, provenances: &[String]) -> Self {
        let mut p = Self {
            object: object.into(),
            provenances: Vec::new(),
        };
        p.add_provenances(provenances);
        p
    }

    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }

    pub fn add_provenances(&mut self, provenances: &[String]) {
        for provenance in provenances {
            push_unique(&mut self.provenances, provenance.clone());
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "{} ({})", self.object, self.provenances.join(", "))
    }
}

/// Proposed changes to one existing registry entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diff {
    /// score2 when computed, otherwise score shifted above every score2.
    pub score_score2: f64,
    pub possibly_related: Vec<usize>,
    /// Index of the registry entry this diff targets.
    pub existing: usize,
    pub modify_publications: Vec<PubIds>,
    pub add_publications: Vec<PubIds>,
    pub modify_name: String,
    pub modify_homepage: String,
    pub add_links: Vec<BiotoolsLink>,
    pub add_downloads: Vec<BiotoolsLink>,
    pub add_documentations: Vec<BiotoolsLink>,
    pub modify_license: Provenance,
    pub add_languages: Vec<Provenance>,
    pub modify_credits: Vec<CorrespAuthor>,
    pub add_credits: Vec<CorrespAuthor>,
}

impl Diff {
    /// Whether there is anything to report.
    pub fn include(&self) -> bool {
        !self.possibly_related.is_empty()
            || !self.modify_publications.is_empty()
            || !self.add_publications.is_empty()
            || !self.modify_name.is_empty()
            || !self.modify_homepage.is_empty()
            || !self.add_links.is_empty()
            || !self.add_downloads.is_empty()
            || !self.add_documentations.is_empty()
            || !self.modify_license.is_empty()
            || !self.add_languages.is_empty()
            || !self.modify_credits.is_empty()
            || !self.add_credits.is_empty()
    }
}

/// bio.tools link and download `type` is a string in older exports and a
/// list in newer ones.
fn string_or_first<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => s,
        Some(OneOrMany::Many(v)) => v.into_iter().next().unwrap_or_default(),
        None => String::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryLink {
    pub url: String,
    #[serde(rename = "type", deserialize_with = "string_or_first")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryPublication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmcid: Option<String>,
}

impl RegistryPublication {
    pub fn pub_ids(&self) -> PubIds {
        let field = |f: &Option<String>| f.as_deref().unwrap_or("").trim().to_string();
        PubIds::new(field(&self.pmid), field(&self.pmcid), field(&self.doi))
    }
}

impl From<&PubIds> for RegistryPublication {
    fn from(ids: &PubIds) -> Self {
        let field = |f: &str| (!f.is_empty()).then(|| f.to_string());
        Self {
            doi: field(&ids.doi),
            pmid: field(&ids.pmid),
            pmcid: field(&ids.pmcid),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryCredit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcidid: Option<String>,
    #[serde(rename = "typeEntity", skip_serializing_if = "Option::is_none")]
    pub type_entity: Option<String>,
}

impl RegistryCredit {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or("")
    }

    pub fn orcidid(&self) -> &str {
        self.orcidid.as_deref().unwrap_or("")
    }
}

impl fmt::Display for RegistryCredit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [self.name(), self.orcidid(), self.email(), self.url()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// An existing bio.tools entry. Read-only; only diffed against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryEntry {
    #[serde(rename = "biotoolsID")]
    pub biotools_id: String,
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub homepage_status: i32,
    pub link: Vec<RegistryLink>,
    pub download: Vec<RegistryLink>,
    pub documentation: Vec<RegistryLink>,
    pub license: Option<String>,
    pub language: Vec<String>,
    pub publication: Vec<RegistryPublication>,
    pub credit: Vec<RegistryCredit>,
}

impl RegistryEntry {
    pub fn license(&self) -> &str {
        self.license.as_deref().unwrap_or("")
    }

    /// Load a registry export, either a bare JSON list or `{"list": [...]}`.
    pub fn load_all(path: &Path) -> Result<Vec<RegistryEntry>, CoreError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Export {
            Bare(Vec<RegistryEntry>),
            Wrapped { list: Vec<RegistryEntry> },
        }
        let content = std::fs::read_to_string(path)?;
        Ok(match serde_json::from_str(&content)? {
            Export::Bare(list) | Export::Wrapped { list } => list,
        })
    }
}

/// A registry entry synthesized for a suggestion with no existing match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTool {
    pub name: String,
    pub description: String,
    pub homepage: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub language: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub link: Vec<RegistryLink>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub download: Vec<RegistryLink>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub documentation: Vec<RegistryLink>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub publication: Vec<RegistryPublication>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub credit: Vec<RegistryCredit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(score: f64, score2: f64) -> Suggestion2 {
        let mut s = Suggestion2::from(Suggestion1 {
            score,
            extracted: "x".to_string(),
            ..Default::default()
        });
        s.score2 = score2;
        s
    }

    #[test]
    fn test_pub_ids_display_and_link() {
        let ids = PubIds::new("123", "", "10.1/x");
        assert_eq!(ids.to_string(), "[123, , 10.1/x]");
        assert_eq!(ids.link().unwrap(), "https://www.ncbi.nlm.nih.gov/pubmed/?term=123");
        assert_eq!(PubIds::new("", "", "10.1/x").link().unwrap(), "https://doi.org/10.1/x");
        assert!(PubIds::default().link().is_none());
    }

    #[test]
    fn test_suggestion2_ranking_switches_to_score2() {
        let low_a = suggestion(10.0, 1500.0);
        let low_b = suggestion(20.0, 1200.0);
        assert_eq!(low_a.rank_cmp(&low_b, 1000.0), Ordering::Less);
        let high = suggestion(2000.0, -1.0);
        assert_eq!(high.rank_cmp(&low_a, 1000.0), Ordering::Less);
    }

    #[test]
    fn test_include_and_low_confidence() {
        assert!(suggestion(1000.0, -1.0).include(1000.0, 1072.1));
        assert!(suggestion(5.0, 1072.1).include(1000.0, 1072.1));
        assert!(!suggestion(5.0, 1072.0).include(1000.0, 1072.1));
        assert!(suggestion(5.0, 1500.0).low_confidence(1000.0, 1072.1, 1750.0));
        assert!(!suggestion(5.0, 1800.0).low_confidence(1000.0, 1072.1, 1750.0));
    }

    #[test]
    fn test_results_without_suggestions_sort_last() {
        let empty = Result1::default();
        let full = Result1 {
            suggestions: vec![Suggestion1 {
                score: 1.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(empty.rank_cmp(&full), Ordering::Greater);
        assert_eq!(full.rank_cmp(&empty), Ordering::Less);
        assert_eq!(empty.rank_cmp(&empty), Ordering::Equal);
    }

    #[test]
    fn test_provenance_display() {
        let mut p = Provenance::new("GPL-3.0", "http://a");
        p.add_provenances(&["http://b".to_string(), "http://a".to_string()]);
        assert_eq!(p.to_string(), "GPL-3.0 (http://a, http://b)");
        assert_eq!(Provenance::default().to_string(), "");
    }

    #[test]
    fn test_registry_link_type_forms() {
        let old: RegistryLink = serde_json::from_str(r#"{"url":"http://a","type":"Repository"}"#).unwrap();
        let new: RegistryLink = serde_json::from_str(r#"{"url":"http://a","type":["Repository"]}"#).unwrap();
        assert_eq!(old, new);
    }

    #[test]
    fn test_human_timestamp() {
        assert_eq!(human_timestamp(0), "1970-01-01T00:00:00Z");
        assert_eq!(human_timestamp(-1), "");
    }
}
