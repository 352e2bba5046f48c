//! License, language and credit evidence gathered for one Pass 2 result.
//!
//! Web pages report licenses and languages as free text, which is matched
//! against the dictionaries again before counting. Abstract sentences are
//! searched with the stricter rules that require a license or language
//! keyword nearby. The license proposed for a tool is the one seen most
//! often, the first to take the lead winning ties.

use crate::common::{credit_email_equal, credit_name_equal, credit_orcid_equal};
use crate::config::Heuristics;
use crate::language::{Language, LanguageSearch, languages};
use crate::license::{License, LicenseSearch, licenses};
use crate::links::BiotoolsLink;
use crate::model::{CorrespAuthor, Provenance, Result2};
use crate::page::{PageRecord, Pages};

/// Everything found about a result's license, languages and credits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    pub homepage_license: String,
    /// One entry per link, empty where the page reported nothing.
    pub link_licenses: Vec<Provenance>,
    pub download_licenses: Vec<Provenance>,
    pub documentation_licenses: Vec<Provenance>,
    /// Licenses found in abstracts, per publication.
    pub abstract_licenses: Vec<Vec<Provenance>>,
    pub best_license: Option<Provenance>,
    pub best_abstract_license: Option<Provenance>,
    pub homepage_language: String,
    pub link_languages: Vec<Provenance>,
    pub download_languages: Vec<Provenance>,
    pub documentation_languages: Vec<Provenance>,
    pub abstract_languages: Vec<Vec<Provenance>>,
    pub abstract_languages_unique: Vec<Provenance>,
    pub all_languages: Vec<Provenance>,
    pub credits: Vec<CorrespAuthor>,
}

/// Add `item` to `into`, merging provenances with an existing entry for the
/// same object.
fn merge_provenance(into: &mut Vec<Provenance>, item: Provenance) {
    match into.iter_mut().find(|p| p.object == item.object) {
        Some(existing) => existing.add_provenances(&item.provenances),
        None => into.push(item),
    }
}

/// The most frequent object, with the provenances of all its occurrences.
/// On equal counts the object that reached the count first wins.
pub fn majority<'a>(items: impl IntoIterator<Item = &'a Provenance>) -> Option<Provenance> {
    let mut counts: Vec<(Provenance, usize)> = Vec::new();
    let mut best: Option<usize> = None;
    let mut best_count = 0;
    for item in items {
        let index = match counts.iter().position(|(p, _)| p.object == item.object) {
            Some(i) => {
                counts[i].0.add_provenances(&item.provenances);
                counts[i].1 += 1;
                i
            }
            None => {
                counts.push((item.clone(), 1));
                counts.len() - 1
            }
        };
        if counts[index].1 > best_count {
            best = Some(index);
            best_count = counts[index].1;
        }
    }
    best.map(|i| counts.swap_remove(i).0)
}

/// Join the corresponding authors of all publications, merging authors that
/// share a name, ORCID or email and filling in fields the first occurrence
/// lacked. Phone numbers are not carried over.
pub fn merge_credits(authors: &[Vec<CorrespAuthor>]) -> Vec<CorrespAuthor> {
    let mut credits: Vec<CorrespAuthor> = Vec::new();
    for author in authors.iter().flatten() {
        let existing = credits.iter_mut().find(|c| {
            credit_name_equal(&author.name, &c.name)
                || credit_orcid_equal(&author.orcid, &c.orcid)
                || credit_email_equal(&author.email, &c.email)
        });
        match existing {
            Some(credit) => {
                let fill = |field: &mut String, value: &str| {
                    if field.is_empty() {
                        *field = value.to_string();
                    }
                };
                fill(&mut credit.name, &author.name);
                fill(&mut credit.orcid, &author.orcid);
                fill(&mut credit.email, &author.email);
                fill(&mut credit.uri, &author.uri);
            }
            None => credits.push(CorrespAuthor {
                name: author.name.clone(),
                orcid: author.orcid.clone(),
                email: author.email.clone(),
                phone: String::new(),
                uri: author.uri.clone(),
            }),
        }
    }
    credits
}

/// Citations per second since publication, scaled by 1e9; -1 when any of
/// the inputs is unknown.
pub fn citations_count_normalised(result: &Result2) -> Vec<f64> {
    (0..result.citations_count.len())
        .map(|i| {
            let count = result.citations_count[i];
            let timestamp = result.citations_timestamp.get(i).copied().unwrap_or(-1);
            let pub_date = result.pub_date.get(i).copied().unwrap_or(-1);
            if count > -1 && timestamp > -1 && pub_date > -1 {
                count as f64 / (timestamp - pub_date) as f64 * 1_000_000_000.0
            } else {
                -1.0
            }
        })
        .collect()
}

/// Collects [`Evidence`] with the license and language dictionaries of a
/// [`Heuristics`].
pub struct EvidenceCollector<'a> {
    licenses: Vec<License>,
    languages: Vec<Language>,
    keywords: &'a [String],
}

impl<'a> EvidenceCollector<'a> {
    pub fn new(heuristics: &'a Heuristics) -> Self {
        Self {
            licenses: licenses(heuristics.licenses()),
            languages: languages(heuristics.languages()),
            keywords: heuristics.language_keywords(),
        }
    }

    fn page_field(
        links: &[BiotoolsLink],
        pages: Pages<'_>,
        doc: bool,
        field: impl Fn(&PageRecord) -> &str,
    ) -> Vec<Provenance> {
        links
            .iter()
            .map(|l| match pages.for_kind(&l.url, doc) {
                Some(page) => Provenance::new(field(&page), l.url.as_str()),
                None => Provenance::default(),
            })
            .collect()
    }

    /// Gather evidence for `result`, whose top suggestion has `homepage`
    /// (empty when broken or missing) and the given link lists.
    pub fn collect(
        &self,
        result: &Result2,
        homepage: &str,
        links: &[BiotoolsLink],
        downloads: &[BiotoolsLink],
        documentations: &[BiotoolsLink],
        pages: Pages<'_>,
    ) -> Evidence {
        let mut evidence = Evidence::default();
        let homepage_page = if homepage.is_empty() { None } else { pages.any(homepage) };

        // licenses
        let mut webpage_licenses = Vec::new();
        if let Some(page) = homepage_page.as_ref().filter(|p| !p.license.is_empty()) {
            evidence.homepage_license = page.license.clone();
            webpage_licenses.push(Provenance::new(page.license.as_str(), homepage));
        }
        evidence.link_licenses = Self::page_field(links, pages, false, |p| &p.license);
        evidence.download_licenses = Self::page_field(downloads, pages, false, |p| &p.license);
        evidence.documentation_licenses = Self::page_field(documentations, pages, true, |p| &p.license);
        webpage_licenses.extend(
            evidence
                .link_licenses
                .iter()
                .chain(&evidence.download_licenses)
                .chain(&evidence.documentation_licenses)
                .filter(|p| !p.is_empty())
                .cloned(),
        );

        for (ids, sentences) in result.pub_ids.iter().zip(&result.abstract_sentences) {
            let provenance = ids.to_string();
            evidence.abstract_licenses.push(
                sentences
                    .iter()
                    .filter_map(|s| LicenseSearch::new(s).best_match(&self.licenses, false))
                    .map(|l| Provenance::new(l.original(), provenance.as_str()))
                    .collect(),
            );
        }

        let mut all_licenses: Vec<Provenance> = webpage_licenses
            .iter()
            .filter_map(|p| {
                LicenseSearch::new(&p.object)
                    .best_match(&self.licenses, true)
                    .map(|l| Provenance::with_provenances(l.original(), &p.provenances))
            })
            .collect();
        all_licenses.extend(evidence.abstract_licenses.iter().flatten().cloned());
        evidence.best_abstract_license = majority(evidence.abstract_licenses.iter().flatten());
        evidence.best_license = majority(&all_licenses);

        // languages
        let mut webpage_languages = Vec::new();
        if let Some(page) = homepage_page.as_ref().filter(|p| !p.language.is_empty()) {
            evidence.homepage_language = page.language.clone();
            webpage_languages.push(Provenance::new(page.language.as_str(), homepage));
        }
        evidence.link_languages = Self::page_field(links, pages, false, |p| &p.language);
        evidence.download_languages = Self::page_field(downloads, pages, false, |p| &p.language);
        evidence.documentation_languages = Self::page_field(documentations, pages, true, |p| &p.language);
        webpage_languages.extend(
            evidence
                .link_languages
                .iter()
                .chain(&evidence.download_languages)
                .chain(&evidence.documentation_languages)
                .filter(|p| !p.is_empty())
                .cloned(),
        );

        for (ids, sentences) in result.pub_ids.iter().zip(&result.abstract_sentences) {
            let provenance = ids.to_string();
            evidence.abstract_languages.push(
                sentences
                    .iter()
                    .flat_map(|s| LanguageSearch::new(s).get_matches(&self.languages, false, self.keywords))
                    .map(|l| Provenance::new(l, provenance.as_str()))
                    .collect(),
            );
        }
        for language in evidence.abstract_languages.iter().flatten() {
            merge_provenance(&mut evidence.abstract_languages_unique, language.clone());
        }

        for webpage in &webpage_languages {
            for language in LanguageSearch::new(&webpage.object).get_matches(&self.languages, true, self.keywords) {
                merge_provenance(
                    &mut evidence.all_languages,
                    Provenance::with_provenances(language, &webpage.provenances),
                );
            }
        }
        for language in evidence.abstract_languages.iter().flatten() {
            merge_provenance(&mut evidence.all_languages, language.clone());
        }

        evidence.credits = merge_credits(&result.corresp_author);
        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PubIds, Result1};
    use crate::page::MemoryPageStore;

    fn result(abstract_sentences: &[&str]) -> Result2 {
        Result2::from(Result1 {
            pub_ids: PubIds::new("1", "", ""),
            abstract_sentences: abstract_sentences.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_majority_first_leader_wins_ties() {
        let items = vec![
            Provenance::new("MIT", "a"),
            Provenance::new("GPL-3.0", "b"),
            Provenance::new("GPL-3.0", "c"),
            Provenance::new("MIT", "d"),
        ];
        let best = majority(&items).unwrap();
        assert_eq!(best.object, "GPL-3.0");
        assert_eq!(best.provenances, vec!["b", "c"]);

        let items = vec![Provenance::new("MIT", "a"), Provenance::new("GPL-3.0", "b")];
        assert_eq!(majority(&items).unwrap().object, "MIT");
        assert!(majority(&[]).is_none());
    }

    #[test]
    fn test_merge_credits() {
        let authors = vec![
            vec![CorrespAuthor {
                name: "Jane Doe".to_string(),
                phone: "123".to_string(),
                ..Default::default()
            }],
            vec![
                CorrespAuthor {
                    name: "J. Doe".to_string(),
                    email: "jane@example.org".to_string(),
                    ..Default::default()
                },
                CorrespAuthor {
                    name: "Other Person".to_string(),
                    orcid: "0000-0002-1825-0097".to_string(),
                    ..Default::default()
                },
            ],
        ];
        let credits = merge_credits(&authors);
        assert_eq!(credits.len(), 2);
        assert_eq!(credits[0].name, "Jane Doe");
        assert_eq!(credits[0].email, "jane@example.org");
        assert_eq!(credits[0].phone, "");
        assert_eq!(credits[1].orcid, "0000-0002-1825-0097");

        let authors = vec![
            vec![CorrespAuthor {
                email: "jane.doe@example.org".to_string(),
                ..Default::default()
            }],
            vec![CorrespAuthor {
                name: "Someone Else".to_string(),
                email: "JaneDoe@example.org".to_string(),
                ..Default::default()
            }],
        ];
        let credits = merge_credits(&authors);
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].name, "Someone Else");
    }

    #[test]
    fn test_citations_count_normalised() {
        let mut r = result(&[]);
        r.citations_count = vec![10];
        r.citations_timestamp = vec![2_000_000_000];
        r.pub_date = vec![1_000_000_000];
        assert_eq!(citations_count_normalised(&r), vec![10.0]);
        r.pub_date = vec![-1];
        assert_eq!(citations_count_normalised(&r), vec![-1.0]);
    }

    #[test]
    fn test_citations_counted_at_publication_time() {
        let mut r = result(&[]);
        r.citations_count = vec![0, 3];
        r.pub_date = vec![5_000, 5_000];
        r.citations_timestamp = vec![5_000, 5_000];
        let normalised = citations_count_normalised(&r);
        assert!(normalised[0].is_nan());
        assert!(normalised[1].is_infinite());
    }

    #[test]
    fn test_license_from_homepage_and_abstract() {
        let heuristics = Heuristics::default();
        let collector = EvidenceCollector::new(&heuristics);
        let store = MemoryPageStore::new();
        store.insert_webpage(PageRecord {
            start_url: "https://foobar.org".to_string(),
            license: "GNU General Public License v3".to_string(),
            language: "Python".to_string(),
            ..PageRecord::default()
        });
        let r = result(&["FooBar is released under the GPL-3.0 license and written in Java"]);
        let evidence = collector.collect(&r, "https://foobar.org", &[], &[], &[], Pages::new(&store));

        assert_eq!(evidence.homepage_license, "GNU General Public License v3");
        let best = evidence.best_license.unwrap();
        assert_eq!(best.object, "GPL-3.0");
        assert_eq!(best.provenances, vec!["https://foobar.org", "[1, , ]"]);
        assert_eq!(evidence.best_abstract_license.unwrap().object, "GPL-3.0");

        let languages: Vec<&str> = evidence.all_languages.iter().map(|p| p.object.as_str()).collect();
        assert_eq!(languages, vec!["Python", "Java"]);
        assert_eq!(evidence.abstract_languages_unique.len(), 1);
    }

    #[test]
    fn test_no_homepage_no_page_evidence() {
        let heuristics = Heuristics::default();
        let collector = EvidenceCollector::new(&heuristics);
        let store = MemoryPageStore::new();
        let links = vec![BiotoolsLink::link("https://github.com/lab/foobar", "Repository")];
        let evidence = collector.collect(&result(&[]), "", &links, &[], &[], Pages::new(&store));
        assert_eq!(evidence.homepage_license, "");
        assert_eq!(evidence.link_licenses, vec![Provenance::default()]);
        assert!(evidence.best_license.is_none());
        assert!(evidence.all_languages.is_empty());
    }
}
