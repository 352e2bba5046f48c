//! Programming language recognition in free text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::WHITESPACE;
use crate::license::{END_CHARS, SEPARATOR_CHARS, START_CHARS, eq_ignore_case, search_parts};

static CPP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?i)(^|[{START_CHARS}]|[{SEPARATOR_CHARS}])C [+][+]([{END_CHARS}]|[{SEPARATOR_CHARS}]|$)"
    ))
    .unwrap()
});
static SQL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?i)(^|[{START_CHARS}]|[{SEPARATOR_CHARS}])(MySQL|PostgreSQL|SQLite)([{END_CHARS}]|[{SEPARATOR_CHARS}]|$)"
    ))
    .unwrap()
});
static HYPHEN_CDR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i)-(C|D|R)([{END_CHARS}]|[{SEPARATOR_CHARS}]|$)")).unwrap());
static KEYWORD_REQUIRED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(C|D|R|Forth|PyMOL|Scheme|Shell)$").unwrap());
static R_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(bioconductor|bioconductor\.org|www\.bioconductor\.org|shiny|cran|cran\.r)$").unwrap()
});
static PYTHON_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(pypi|pypi\.org|pypi\.python\.org|ipython|numpy|scipy|django|python2|python3)$").unwrap()
});
static JAVA_ALIAS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(apps\.cytoscape\.org|biojava)$").unwrap());

/// Free text prepared for language matching.
#[derive(Debug, Clone)]
pub struct LanguageSearch {
    parts: Vec<String>,
}

impl LanguageSearch {
    pub fn new(text: &str) -> Self {
        let text = WHITESPACE.replace_all(text, " ");
        let text = CPP.replace_all(&text, "${1}C++${2}");
        let text = SQL.replace_all(&text, "${1}SQL${3}");
        let text = HYPHEN_CDR.replace_all(&text, "${1}${2}");
        Self {
            parts: search_parts(text.trim()).collect(),
        }
    }

    /// Names of the dictionary languages found in the text, ordered by
    /// where they first occur.
    ///
    /// Single-letter and ambiguous names (C, R, Shell, ...) need one of
    /// `keywords` nearby unless `definitely_language` is set.
    pub fn get_matches(&self, languages: &[Language], definitely_language: bool, keywords: &[String]) -> Vec<String> {
        let mut matches: Vec<(&str, usize)> = Vec::new();
        for language in languages {
            if let Some(index) = language.matches(self, definitely_language, keywords) {
                match matches.iter_mut().find(|(name, _)| *name == language.original) {
                    Some(existing) => existing.1 = index,
                    None => matches.push((&language.original, index)),
                }
            }
        }
        matches.sort_by_key(|&(_, index)| index);
        matches.into_iter().map(|(name, _)| name.to_string()).collect()
    }
}

/// A dictionary language name, possibly several words long.
#[derive(Debug, Clone, PartialEq)]
pub struct Language {
    original: String,
    parts: Vec<String>,
}

impl Language {
    pub fn new(language: &str) -> Self {
        Self {
            original: language.to_string(),
            parts: language.split(' ').map(str::to_string).collect(),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    fn matches(&self, search: &LanguageSearch, definitely_language: bool, keywords: &[String]) -> Option<usize> {
        let head = self.parts.first()?;
        if head == "Other" {
            return None;
        }
        let len = search.parts.len();
        for (i, part) in search.parts.iter().enumerate() {
            if eq_ignore_case(part, head) && (head != "Scheme" || part == head) {
                let rest = &self.parts[1..];
                let equal = rest
                    .iter()
                    .enumerate()
                    .all(|(j, p)| search.parts.get(i + 1 + j).is_some_and(|s| eq_ignore_case(s, p)));
                if equal {
                    let span = self.parts.len();
                    if definitely_language || !KEYWORD_REQUIRED.is_match(head) {
                        return Some(i);
                    }
                    let window = i.saturating_sub(4)..(i + span + 4).min(len);
                    let keyword_near = window
                        .filter(|k| !(i..i + span).contains(k))
                        .any(|k| keywords.iter().any(|kw| eq_ignore_case(kw, &search.parts[k])));
                    if keyword_near {
                        return Some(i);
                    }
                }
            }
            let alias = match head.as_str() {
                "R" => Some(&*R_ALIAS),
                "Python" => Some(&*PYTHON_ALIAS),
                "Java" => Some(&*JAVA_ALIAS),
                _ => None,
            };
            if alias.is_some_and(|re| re.is_match(part)) {
                return Some(i);
            }
        }
        None
    }
}

/// Parse every dictionary line into a [`Language`].
pub fn languages(dictionary: &[String]) -> Vec<Language> {
    dictionary.iter().map(|l| Language::new(l)).collect()
}
