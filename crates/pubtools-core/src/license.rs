//! SPDX-style license recognition in free text.
//!
//! A [`License`] is parsed from an SPDX identifier (`GPL-3.0`, `BSD-3-Clause`)
//! into its name parts and version. A [`LicenseSearch`] is the same treatment
//! applied to arbitrary text (a page's license field or an abstract sentence),
//! and [`LicenseSearch::best_match`] picks the dictionary entry that fits it
//! best.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::WHITESPACE;

const VERSION: &str = r"(\p{N}+)([^\p{N}]+(\p{N}+)([^\p{N}]+(\p{N}+))?)?";

static VERSION_SPDX: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("^{VERSION}")).unwrap());
static VERSION_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[vV(>=≥]*{VERSION}")).unwrap());
static LGPL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) *(Lesser|Library) (General Public Licen[sc]e|GPL)").unwrap());
static AGPL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) *Affero (General Public Licen[sc]e|GPL|Licen[sc]e)").unwrap());
static GPL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) *(General|GNU) Public Licen[sc]e").unwrap());
static LICENSE_BEGIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^Licen[sc]e: *").unwrap());
static GNU_BEGIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^GNU +").unwrap());

pub(crate) const SEPARATOR_CHARS: &str = r" _/\\\-";
pub(crate) const START_CHARS: &str = r#""'(\[>=≥"#;
pub(crate) const END_CHARS: &str = r#"\]),;:'"®™"#;

pub(crate) static SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{SEPARATOR_CHARS}]+")).unwrap());
pub(crate) static START: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^[{START_CHARS}]+")).unwrap());
pub(crate) static END: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("[{END_CHARS}]+$")).unwrap());

static ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\p{Lu}+)[^\p{N}]*$").unwrap());
static LICENSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Licen[sc]").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{N}").unwrap());

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Split search text on separators and trim quoting characters off each part.
pub(crate) fn search_parts(text: &str) -> impl Iterator<Item = String> + '_ {
    SEPARATOR.split(text).map(|part| {
        let part = START.replacen(part, 1, "");
        END.replacen(&part, 1, "").into_owned()
    })
}

/// A version number found in search text, and where.
#[derive(Debug, Clone, Copy)]
struct SearchVersion {
    part_index: usize,
    version: [i32; 3],
}

/// Free text prepared for license matching.
#[derive(Debug, Clone)]
pub struct LicenseSearch {
    parts: Vec<String>,
    versions: Vec<SearchVersion>,
}

impl LicenseSearch {
    pub fn new(text: &str) -> Self {
        let text = WHITESPACE.replace_all(text, " ");
        let text = LGPL.replace_all(&text, " LGPL");
        let text = AGPL.replace_all(&text, " AGPL");
        let text = GPL.replace_all(&text, " GPL");
        let text = LICENSE_BEGIN.replacen(text.trim(), 1, "");
        let text = GNU_BEGIN.replacen(&text, 1, "").into_owned();

        let mut search = Self {
            parts: Vec::new(),
            versions: Vec::new(),
        };
        for part in search_parts(&text) {
            if !search.push_version(&part) {
                search.parts.push(part);
            }
        }
        search
    }

    /// Record a version number found in `part`, splitting off any text
    /// before and after it. Returns false when `part` holds no usable version.
    fn push_version(&mut self, part: &str) -> bool {
        let Some(caps) = VERSION_SEARCH.captures(part) else {
            return false;
        };
        let number = |i: usize| -> Result<i32, std::num::ParseIntError> {
            caps.get(i).map_or(Ok(-1), |m| m.as_str().parse())
        };
        let version = match (number(1), number(3), number(5)) {
            (Ok(v1), Ok(v2), Ok(v3)) => [v1, v2, v3],
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                tracing::debug!("License part {} has unparsable version number: {}", part, e);
                return false;
            }
        };
        let Some(whole) = caps.get(0) else {
            return false;
        };
        if whole.start() > 0 {
            self.parts.push(part[..whole.start()].to_string());
        }
        self.versions.push(SearchVersion {
            part_index: self.parts.len(),
            version,
        });
        self.parts.push(part.to_string());
        if whole.end() < part.len() {
            self.parts.push(part[whole.end()..].to_string());
        }
        true
    }

    /// The dictionary license that fits this text best.
    ///
    /// `definitely_license` says the text is known to be a license statement
    /// (a page's license field), so acronyms are tried and no "license" word
    /// is needed nearby.
    pub fn best_match<'a>(&self, licenses: &'a [License], definitely_license: bool) -> Option<&'a License> {
        let mut best: Option<&License> = None;
        let mut best_match = Match::default();
        for license in licenses {
            let m = license.matches(self, definitely_license);
            if m.matches == 0 {
                continue;
            }
            let Some(current) = best.filter(|_| m.matches <= best_match.matches) else {
                best = Some(license);
                best_match = m;
                continue;
            };
            if m.matches < best_match.matches {
                continue;
            }
            if m.version_matches > best_match.version_matches || m.acronym_match && !best_match.acronym_match {
                best = Some(license);
                best_match = m;
            } else if m.version_matches == best_match.version_matches
                && license.preferred_over(current, best_match.version_matches)
            {
                best = Some(license);
                best_match = m;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Match {
    matches: usize,
    version_matches: usize,
    acronym_match: bool,
}

/// A dictionary license parsed from its SPDX identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct License {
    original: String,
    parts: Vec<String>,
    version: [i32; 3],
}

impl License {
    pub fn new(license: &str) -> Self {
        let mut parsed = Self {
            original: license.to_string(),
            parts: Vec::new(),
            version: [-1, -1, -1],
        };
        let mut pieces: Vec<&str> = license.split('-').collect();
        while pieces.len() > 1 && pieces.last().is_some_and(|p| p.is_empty()) {
            pieces.pop();
        }
        for part in pieces {
            if parsed.version[0] < 0 {
                parsed.parse_version(part);
                if parsed.version[0] < 0 {
                    parsed.parts.push(part.to_string());
                }
            } else {
                parsed.parts.push(part.to_string());
            }
        }
        parsed
    }

    fn parse_version(&mut self, part: &str) {
        let Some(caps) = VERSION_SPDX.captures(part) else {
            return;
        };
        let number = |i: usize| -> Result<i32, std::num::ParseIntError> {
            caps.get(i).map_or(Ok(-1), |m| m.as_str().parse())
        };
        match (number(1), number(3), number(5)) {
            (Ok(v1), Ok(v2), Ok(v3)) => {
                self.version = [v1, v2, v3];
                if let Some(whole) = caps.get(0) {
                    if whole.end() < part.len() {
                        self.parts.push(part[whole.end()..].to_string());
                    }
                }
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                tracing::debug!("License part {} has unparsable version number: {}", part, e);
                self.version = [-1, -1, -1];
            }
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Tie-break between two licenses with equally good matches.
    fn preferred_over(&self, current: &License, version_matches: usize) -> bool {
        let (v, b) = (self.version, current.version);
        let fewer_parts = self.parts.len() < current.parts.len();
        match version_matches {
            0 if self.parts.first().is_some_and(|p| p == "BSD") => {
                v[0] == 3 && b[0] != 3 || v[0] == 2 && b[0] != 2 && b[0] != 3
            }
            0 => {
                v[0] > b[0]
                    || v[0] == b[0] && v[1] > b[1]
                    || v[0] == b[0] && v[1] == b[1] && v[2] > b[2]
                    || v == b && fewer_parts
            }
            1 => v[1] < b[1] || v[1] == b[1] && v[2] < b[2] || v[1] == b[1] && v[2] == b[2] && fewer_parts,
            2 => v[2] < b[2] || v[2] == b[2] && fewer_parts,
            _ => false,
        }
    }

    fn matches(&self, search: &LicenseSearch, definitely_license: bool) -> Match {
        let mut result = Match::default();
        let Some(first_part) = self.parts.first() else {
            return result;
        };
        let len = search.parts.len();
        let mut s = 0usize;
        let mut matched = 0usize;
        while s < len {
            let mut matches = 0usize;
            let mut first_index: isize = -1;
            let mut last_index: isize = -1;

            if s == 0 && definitely_license {
                let mut acronym = String::new();
                loop {
                    if s >= len {
                        s = 0;
                        break;
                    }
                    let Some(caps) = ACRONYM.captures(&search.parts[s]) else {
                        s = 0;
                        break;
                    };
                    acronym.push_str(&caps[1]);
                    let acronym_len = acronym.chars().count();
                    if (3..=7).contains(&acronym_len) {
                        if &acronym == first_part {
                            first_index = 0;
                            last_index = s as isize;
                            matches += 1;
                            result.acronym_match = true;
                            s += 1;
                            break;
                        }
                    } else if acronym_len > 7 {
                        s = 0;
                        break;
                    }
                    s += 1;
                }
            }

            while s < len && matches + matched < self.parts.len() {
                if last_index > -1 && s as isize - last_index > 4 {
                    break;
                }
                if eq_ignore_case(&search.parts[s], &self.parts[matches + matched]) {
                    if first_index < 0 {
                        first_index = s as isize;
                    }
                    last_index = s as isize;
                    matches += 1;
                }
                s += 1;
            }

            if matches > result.matches {
                let is_license = if !definitely_license && !self.original.contains("GPL") {
                    let from = (first_index - 2).max(0) as usize;
                    let to = ((last_index + 4).max(-1) + 1) as usize;
                    search.parts[from.min(len)..to.min(len)]
                        .iter()
                        .any(|p| LICENSE.is_match(p))
                } else {
                    true
                };
                if is_license {
                    result.matches = matches;
                    result.version_matches = 0;
                    if self.version[0] > -1 {
                        let mut mismatch: Option<bool> = None;
                        for found in &search.versions {
                            let index = found.part_index as isize;
                            let mut version_matches = 0;
                            if index >= first_index - 2 && index <= last_index + 3 {
                                let [v1, v2, v3] = found.version;
                                if v1 >= 0 && v1 == self.version[0] {
                                    mismatch = Some(false);
                                    version_matches += 1;
                                    if v2 >= 0 && v2 == self.version[1] {
                                        version_matches += 1;
                                        if v3 >= 0 && v3 == self.version[2] {
                                            version_matches += 1;
                                        }
                                    }
                                } else if mismatch.is_none() && !NUMBER.is_match(first_part) {
                                    mismatch = Some(true);
                                }
                            }
                            result.version_matches = result.version_matches.max(version_matches);
                        }
                        if mismatch == Some(true) {
                            return Match::default();
                        }
                    }
                }
            }
            matched += matches;
            if matched >= self.parts.len() {
                break;
            }
        }
        result
    }
}

/// Parse every dictionary line into a [`License`].
pub fn licenses(dictionary: &[String]) -> Vec<License> {
    dictionary.iter().map(|l| License::new(l)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> Vec<License> {
        ["Apache-2.0", "GPL-2.0", "GPL-3.0", "LGPL-3.0", "MIT", "BSD-2-Clause", "BSD-3-Clause", "Artistic-2.0"]
            .iter()
            .map(|l| License::new(l))
            .collect()
    }

    fn best(text: &str, definitely: bool) -> Option<String> {
        let licenses = dictionary();
        LicenseSearch::new(text)
            .best_match(&licenses, definitely)
            .map(|l| l.original().to_string())
    }

    #[test]
    fn test_parse_spdx() {
        let l = License::new("BSD-3-Clause");
        assert_eq!(l.parts, vec!["BSD", "Clause"]);
        assert_eq!(l.version, [3, -1, -1]);
        let l = License::new("GPL-3.0");
        assert_eq!(l.parts, vec!["GPL"]);
        assert_eq!(l.version, [3, 0, -1]);
    }

    #[test]
    fn test_license_field_matches() {
        assert_eq!(best("GNU General Public License v3", true).as_deref(), Some("GPL-3.0"));
        assert_eq!(best("Apache License, Version 2.0", true).as_deref(), Some("Apache-2.0"));
        assert_eq!(best("MIT", true).as_deref(), Some("MIT"));
        assert_eq!(best("GNU Lesser General Public License 3", true).as_deref(), Some("LGPL-3.0"));
    }

    #[test]
    fn test_abstract_needs_license_word() {
        assert_eq!(
            best("The software is freely available under the MIT license", false).as_deref(),
            Some("MIT")
        );
        assert_eq!(best("We studied MIT students", false), None);
    }

    #[test]
    fn test_version_mismatch_rejects() {
        assert_eq!(best("Apache License 1.1", true), None);
    }

    #[test]
    fn test_bsd_prefers_three_clause() {
        assert_eq!(best("BSD license", true).as_deref(), Some("BSD-3-Clause"));
    }
}
