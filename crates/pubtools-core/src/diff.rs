//! Proposed changes to existing bio.tools entries, and new entries for tools
//! the registry does not know yet.
//!
//! Links are compared in their trimmed form first and, when that fails, by
//! the final URL their page resolved to.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{
    TOOL_TITLE_TRIM, char_len, credit_email_equal, credit_name_equal, credit_orcid_equal, normalise_doi, trim_url,
};
use crate::evidence::Evidence;
use crate::links::{BiotoolsLink, ClassifiedLinks, classify};
use crate::model::{
    CorrespAuthor, Diff, NewTool, Provenance, PubIds, RegistryCredit, RegistryEntry, RegistryLink,
    RegistryPublication, Result2, Suggestion2, push_unique,
};
use crate::page::Pages;
use crate::score2::Score2Weights;
use crate::text::TextNormalizer;

static NOT_ALPHANUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]").unwrap());

/// Added to `score` when no score2 was computed, so that confident names
/// sort above every refined one.
const SCORE_SHIFT: f64 = 10000.0;

/// What the top suggestion of a result has to offer an entry.
#[derive(Debug, Clone, Copy)]
pub struct ToolProposal<'a> {
    pub name: &'a str,
    pub description: &'a str,
    /// Empty when the homepage is broken or missing.
    pub homepage: &'a str,
    pub links: &'a [BiotoolsLink],
    pub downloads: &'a [BiotoolsLink],
    pub documentations: &'a [BiotoolsLink],
    pub evidence: &'a Evidence,
}

/// Everything one diff is computed from.
struct DiffRequest<'a> {
    score_score2: f64,
    possibly_related: &'a [usize],
    existing: usize,
    publications: &'a [PubIds],
    add_publications: &'a [PubIds],
    modify_name: &'a str,
    homepage: &'a str,
    links: &'a [BiotoolsLink],
    downloads: &'a [BiotoolsLink],
    documentations: &'a [BiotoolsLink],
    license: Option<&'a Provenance>,
    languages: &'a [Provenance],
    credits: &'a [CorrespAuthor],
}

/// Insert `diff` right after the last diff for the same entry, so diffs for
/// one entry stay together. Diffs with nothing to report are appended.
pub fn add_diff(diffs: &mut Vec<Diff>, diff: Diff) {
    let position = diffs
        .iter()
        .rposition(|d| d.existing == diff.existing && diff.include() && d.include());
    match position {
        Some(i) => diffs.insert(i + 1, diff),
        None => diffs.push(diff),
    }
}

/// The entry homepage annotated with its status code and whether its page
/// is broken.
pub fn current_homepage(entry: &RegistryEntry, pages: Pages<'_>) -> String {
    let mut homepage = entry.homepage.clone();
    if entry.homepage_status != 0 {
        homepage.push_str(&format!(" (homepage_status: {})", entry.homepage_status));
    }
    if pages.webpage(&entry.homepage).is_some_and(|p| p.broken) {
        homepage.push_str(" (broken)");
    }
    homepage
}

/// Whether a publication matches `registry` by one identifier while
/// conflicting with it in another.
fn publication_conflicts(ids: &PubIds, registry: &RegistryPublication) -> bool {
    let pmid = registry.pmid.as_deref().map(str::trim);
    let pmcid = registry.pmcid.as_deref().map(str::trim);
    let doi = registry.doi.as_deref().map(|d| normalise_doi(d.trim()));
    let agrees = |ours: &str, theirs: Option<&str>| !ours.is_empty() && theirs == Some(ours);
    let conflicts = |ours: &str, theirs: Option<&str>| {
        !ours.is_empty() && theirs.is_some_and(|t| !t.is_empty() && t != ours)
    };
    (agrees(&ids.pmid, pmid) || agrees(&ids.pmcid, pmcid) || agrees(&ids.doi, doi.as_deref()))
        && (conflicts(&ids.pmid, pmid) || conflicts(&ids.pmcid, pmcid) || conflicts(&ids.doi, doi.as_deref()))
}

/// Builds [`Diff`]s and [`NewTool`]s against a registry snapshot.
pub struct DiffBuilder<'a, N: TextNormalizer + ?Sized> {
    entries: &'a [RegistryEntry],
    normalizer: &'a N,
    pages: Pages<'a>,
    weights: &'a Score2Weights,
}

impl<'a, N: TextNormalizer + ?Sized> DiffBuilder<'a, N> {
    pub fn new(entries: &'a [RegistryEntry], normalizer: &'a N, pages: Pages<'a>, weights: &'a Score2Weights) -> Self {
        Self {
            entries,
            normalizer,
            pages,
            weights,
        }
    }

    fn final_trimmed(&self, url: &str, doc: bool) -> Option<String> {
        self.pages
            .for_kind(url, doc)
            .map(|p| trim_url(&p.final_url))
            .filter(|f| !f.is_empty())
    }

    /// Whether a proposed link and a registry link lead to the same place.
    pub fn links_equal(&self, add: &str, add_trimmed: &str, registry: &str, add_doc: bool, registry_doc: bool) -> bool {
        let registry_trimmed = trim_url(registry);
        if add_trimmed == registry_trimmed {
            return true;
        }
        let add_final = self.final_trimmed(add, add_doc);
        let registry_final = self.final_trimmed(registry, registry_doc);
        match (add_final, registry_final) {
            (Some(a), Some(r)) => a == r,
            (a, r) => a.is_some_and(|a| a == registry_trimmed) || r.is_some_and(|r| r == add_trimmed),
        }
    }

    fn link_in(&self, link: &BiotoolsLink, list: &[BiotoolsLink], add_doc: bool, registry_doc: bool) -> bool {
        list.iter()
            .any(|l| self.links_equal(&l.url, &l.url_trimmed, &link.url, add_doc, registry_doc))
    }

    /// Add the first classified form of a homepage to the local link lists,
    /// unless an equal link is already there.
    fn add_homepage_to_links(&self, homepage: ClassifiedLinks, local: &mut ClassifiedLinks, registry_homepage: bool) {
        if let Some(first) = homepage.links.into_iter().next() {
            if !self.link_in(&first, &local.links, false, false) {
                push_unique(&mut local.links, first);
            }
        } else if let Some(first) = homepage.downloads.into_iter().next() {
            if !self.link_in(&first, &local.downloads, false, false) {
                push_unique(&mut local.downloads, first);
            }
        } else if let Some(first) = homepage.documentations.into_iter().next() {
            if !self.link_in(&first, &local.documentations, true, !registry_homepage) {
                push_unique(&mut local.documentations, first);
            }
        }
    }

    fn registry_has(&self, link: &BiotoolsLink, registry: &[RegistryLink], registry_doc: bool) -> bool {
        registry
            .iter()
            .any(|r| self.links_equal(&link.url, &link.url_trimmed, &r.url, registry_doc, registry_doc))
    }

    fn make_diff(&self, request: DiffRequest<'_>) -> Diff {
        let entry = &self.entries[request.existing];
        let mut diff = Diff {
            score_score2: request.score_score2,
            possibly_related: request.possibly_related.to_vec(),
            existing: request.existing,
            add_publications: request.add_publications.to_vec(),
            modify_name: request.modify_name.to_string(),
            ..Default::default()
        };

        for ids in request.publications {
            for registry in &entry.publication {
                if publication_conflicts(ids, registry) {
                    push_unique(&mut diff.modify_publications, ids.clone());
                }
            }
        }

        let mut local = ClassifiedLinks {
            links: request.links.to_vec(),
            downloads: request.downloads.to_vec(),
            documentations: request.documentations.to_vec(),
        };

        let homepage = request.homepage;
        if !homepage.is_empty() {
            let trimmed = trim_url(homepage);
            if !self.links_equal(homepage, &trimmed, &entry.homepage, false, false)
                && !self.links_equal(homepage, &trimmed, &entry.homepage, true, false)
            {
                let registry_page_dead = self.pages.webpage(&entry.homepage).is_none_or(|p| p.broken);
                let classified = classify(homepage);
                if entry.homepage_status != 0 && registry_page_dead {
                    diff.modify_homepage = homepage.to_string();
                } else if classified.links.first().is_some_and(|l| l.link_type == "Other") {
                    diff.modify_homepage = homepage.to_string();
                    self.add_homepage_to_links(classify(&entry.homepage), &mut local, true);
                } else {
                    self.add_homepage_to_links(classified, &mut local, false);
                }
            }
        }

        for link in local.links {
            let mut found = self.registry_has(&link, &entry.link, false);
            if !found && link.link_type == "Other" {
                found = (diff.modify_homepage.is_empty()
                    && self.links_equal(&link.url, &link.url_trimmed, &entry.homepage, false, false))
                    || self.registry_has(&link, &entry.download, false)
                    || entry
                        .documentation
                        .iter()
                        .any(|r| self.links_equal(&link.url, &link.url_trimmed, &r.url, false, true));
            }
            if !found {
                push_unique(&mut diff.add_links, link);
            }
        }
        for download in local.downloads {
            if !self.registry_has(&download, &entry.download, false) {
                push_unique(&mut diff.add_downloads, download);
            }
        }
        for documentation in local.documentations {
            if !self.registry_has(&documentation, &entry.documentation, true) {
                push_unique(&mut diff.add_documentations, documentation);
            }
        }

        if let Some(license) = request.license.filter(|l| !l.is_empty() && entry.license() != l.object) {
            diff.modify_license = license.clone();
        }

        diff.add_languages = request
            .languages
            .iter()
            .filter(|l| !l.is_empty() && !entry.language.contains(&l.object))
            .cloned()
            .collect();

        for credit in request.credits {
            let found = entry.credit.iter().any(|c| {
                (credit.name.is_empty() || credit.name == c.name())
                    && (credit.orcid.is_empty() || credit.orcid == c.orcidid())
                    && (credit.email.is_empty() || credit.email == c.email())
            });
            if found {
                continue;
            }
            let similar = entry.credit.iter().any(|c| {
                credit_name_equal(&credit.name, c.name())
                    || credit_orcid_equal(&credit.orcid, c.orcidid())
                    || credit_email_equal(&credit.email, c.email())
            });
            if similar {
                diff.modify_credits.push(credit.clone());
            } else {
                diff.add_credits.push(credit.clone());
            }
        }

        diff
    }

    /// First meaningful word of each other tool title of the result.
    fn tool_title_others(&self, result: &Result2) -> Vec<String> {
        let mut others = Vec::new();
        for other in result.tool_title_others.iter().flatten() {
            for part in NOT_ALPHANUM.split(other) {
                let processed = self.normalizer.process(part).join("");
                let part = TOOL_TITLE_TRIM.replacen(&processed, 1, "");
                if char_len(&part) > 1 {
                    others.push(part.into_owned());
                    break;
                }
            }
        }
        others
    }

    /// Positions in `bucket` whose entry is named after another tool title of
    /// the publication rather than after the suggestion.
    fn removed(&self, bucket: &[usize], others: &[String], suggestion_processed: &str) -> Vec<usize> {
        if others.is_empty() {
            return Vec::new();
        }
        bucket
            .iter()
            .enumerate()
            .filter(|&(_, &existing)| {
                let entry = &self.entries[existing];
                let id = self.normalizer.process(&entry.biotools_id).join("");
                let name = self.normalizer.process(&entry.name).join("");
                suggestion_processed != id
                    && suggestion_processed != name
                    && others.iter().any(|o| id.contains(o.as_str()) || name.contains(o.as_str()))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Add diffs for every entry `suggestion` matched, or a new tool when it
    /// matched none and is confident enough.
    pub fn add_tool(
        &self,
        suggestion: &Suggestion2,
        result: &Result2,
        proposal: ToolProposal<'_>,
        diffs: &mut Vec<Diff>,
    ) -> Option<NewTool> {
        let include = suggestion.include(self.weights.score_min, self.weights.score2_min);
        let score_score2 = if suggestion.score2 < 0.0 {
            suggestion.score + SCORE_SHIFT
        } else {
            suggestion.score2
        };

        let mut possibly_related = Vec::new();
        if include {
            suggestion
                .name_existing_publication_different
                .iter()
                .chain(&result.name_match)
                .chain(&result.link_match)
                .for_each(|&i| push_unique(&mut possibly_related, i));
        }

        let others = self.tool_title_others(result);
        let suggestion_processed = suggestion.processed.replace(' ', "");
        let buckets: [(&[usize], Option<&[Vec<PubIds>]>, &str); 3] = [
            (&suggestion.publication_and_name_existing, None, ""),
            (
                &suggestion.name_existing_some_publication_different,
                Some(&suggestion.name_existing_some_publication_different_pub_ids),
                "",
            ),
            (
                &suggestion.some_publication_existing_name_different,
                Some(&suggestion.some_publication_existing_name_different_pub_ids),
                proposal.name,
            ),
        ];

        let evidence = proposal.evidence;
        let mut found_diff = false;
        for (bucket, missing, modify_name) in buckets {
            let removed = self.removed(bucket, &others, &suggestion_processed);
            for (i, &existing) in bucket.iter().enumerate() {
                if removed.contains(&i) {
                    continue;
                }
                let add_publications = missing.and_then(|m| m.get(i)).map(Vec::as_slice).unwrap_or(&[]);
                let request = if include {
                    DiffRequest {
                        score_score2,
                        possibly_related: &possibly_related,
                        existing,
                        publications: &result.pub_ids,
                        add_publications,
                        modify_name,
                        homepage: proposal.homepage,
                        links: proposal.links,
                        downloads: proposal.downloads,
                        documentations: proposal.documentations,
                        license: evidence.best_license.as_ref(),
                        languages: &evidence.all_languages,
                        credits: &evidence.credits,
                    }
                } else {
                    DiffRequest {
                        score_score2,
                        possibly_related: &possibly_related,
                        existing,
                        publications: &result.pub_ids,
                        add_publications,
                        modify_name: "",
                        homepage: "",
                        links: &[],
                        downloads: &[],
                        documentations: &[],
                        license: evidence.best_abstract_license.as_ref(),
                        languages: &evidence.abstract_languages_unique,
                        credits: &evidence.credits,
                    }
                };
                add_diff(diffs, self.make_diff(request));
                found_diff = true;
            }
        }

        if found_diff || !include {
            return None;
        }
        tracing::debug!(name = proposal.name, "new tool");
        Some(new_tool(suggestion, result, proposal))
    }
}

fn registry_links(links: &[BiotoolsLink]) -> Vec<RegistryLink> {
    links
        .iter()
        .map(|l| RegistryLink {
            url: l.url.clone(),
            kind: l.link_type.clone(),
        })
        .collect()
}

fn new_tool(suggestion: &Suggestion2, result: &Result2, proposal: ToolProposal<'_>) -> NewTool {
    let evidence = proposal.evidence;
    let mut publication = Vec::new();
    result
        .pub_ids
        .iter()
        .filter(|ids| !ids.is_empty())
        .for_each(|ids| push_unique(&mut publication, RegistryPublication::from(ids)));
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    NewTool {
        name: proposal.name.to_string(),
        description: proposal.description.to_string(),
        homepage: suggestion.homepage.clone(),
        language: evidence.all_languages.iter().map(|l| l.object.clone()).collect(),
        license: evidence.best_license.as_ref().map(|l| l.object.clone()),
        link: registry_links(proposal.links),
        download: registry_links(proposal.downloads),
        documentation: registry_links(proposal.documentations),
        publication,
        credit: evidence
            .credits
            .iter()
            .map(|c| RegistryCredit {
                name: non_empty(&c.name),
                email: non_empty(&c.email),
                url: non_empty(&c.uri),
                orcidid: non_empty(&c.orcid),
                type_entity: Some("Person".to_string()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Result1, Suggestion1};
    use crate::page::{MemoryPageStore, PageRecord};
    use crate::text::PreProcessor;

    fn entry(id: &str, homepage: &str) -> RegistryEntry {
        RegistryEntry {
            biotools_id: id.to_lowercase(),
            name: id.to_string(),
            homepage: homepage.to_string(),
            publication: vec![RegistryPublication {
                pmid: Some("1".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn matched_result(bucket: usize, score: f64) -> Result2 {
        let mut result = Result2::from(Result1 {
            pub_ids: PubIds::new("1", "", "10.1/x"),
            suggestions: vec![Suggestion1 {
                score,
                extracted: "FooBar".to_string(),
                processed: "foobar".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        });
        result.suggestions[0].publication_and_name_existing = vec![bucket];
        result
    }

    #[test]
    fn test_add_diff_groups_by_entry() {
        let with = |existing: usize, name: &str| Diff {
            existing,
            modify_name: name.to_string(),
            ..Default::default()
        };
        let mut diffs = vec![with(0, "a"), with(1, "b")];
        add_diff(&mut diffs, with(0, "c"));
        add_diff(&mut diffs, with(2, "d"));
        add_diff(&mut diffs, Diff::default());
        let order: Vec<&str> = diffs.iter().map(|d| d.modify_name.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d", ""]);
    }

    #[test]
    fn test_links_equal_through_final_url() {
        let store = MemoryPageStore::new();
        store.insert_webpage(PageRecord {
            start_url: "http://foobar.org".to_string(),
            final_url: "https://www.foobar.org/home".to_string(),
            ..PageRecord::default()
        });
        let entries = Vec::new();
        let normalizer = PreProcessor::new();
        let weights = Score2Weights::default();
        let builder = DiffBuilder::new(&entries, &normalizer, Pages::new(&store), &weights);

        let trimmed = trim_url("http://foobar.org");
        assert!(builder.links_equal("https://foobar.org/", &trim_url("https://foobar.org/"), "http://foobar.org", false, false));
        assert!(builder.links_equal("http://foobar.org", &trimmed, "https://www.foobar.org/home", false, false));
        assert!(!builder.links_equal("http://foobar.org", &trimmed, "https://baz.org", false, false));
    }

    #[test]
    fn test_diff_against_existing_entry() {
        let store = MemoryPageStore::new();
        store.insert_webpage(PageRecord {
            start_url: "https://old.org".to_string(),
            ..PageRecord::default()
        });
        let mut existing = entry("FooBar", "https://old.org");
        existing.license = Some("MIT".to_string());
        existing.credit = vec![RegistryCredit {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        }];
        existing.publication[0].doi = Some("10.1/y".to_string());
        let entries = vec![existing];
        let normalizer = PreProcessor::new();
        let weights = Score2Weights::default();
        let builder = DiffBuilder::new(&entries, &normalizer, Pages::new(&store), &weights);

        let result = matched_result(0, 2000.0);
        let evidence = Evidence {
            best_license: Some(Provenance::new("GPL-3.0", "https://foobar.org")),
            all_languages: vec![Provenance::new("Python", "https://foobar.org")],
            credits: vec![
                CorrespAuthor {
                    name: "J. Doe".to_string(),
                    email: "jane@example.org".to_string(),
                    ..Default::default()
                },
                CorrespAuthor {
                    name: "Other Person".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let links = vec![BiotoolsLink::link("https://github.com/lab/foobar", "Repository")];
        let proposal = ToolProposal {
            name: "FooBar",
            description: "",
            homepage: "https://foobar.org",
            links: &links,
            downloads: &[],
            documentations: &[],
            evidence: &evidence,
        };
        let mut diffs = Vec::new();
        let tool = builder.add_tool(&result.suggestions[0], &result, proposal, &mut diffs);

        assert!(tool.is_none());
        assert_eq!(diffs.len(), 1);
        let diff = &diffs[0];
        assert_eq!(diff.score_score2, 12000.0);
        assert_eq!(diff.modify_publications, vec![PubIds::new("1", "", "10.1/x")]);
        assert_eq!(diff.modify_homepage, "https://foobar.org");
        let added: Vec<&str> = diff.add_links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(added, vec!["https://github.com/lab/foobar", "https://old.org"]);
        assert_eq!(diff.modify_license.object, "GPL-3.0");
        assert_eq!(diff.add_languages.len(), 1);
        assert_eq!(diff.modify_credits.len(), 1);
        assert_eq!(diff.add_credits.len(), 1);
        assert_eq!(diff.add_credits[0].name, "Other Person");
    }

    #[test]
    fn test_not_included_suggestion_only_diffs_abstract_evidence() {
        let store = MemoryPageStore::new();
        let entries = vec![entry("FooBar", "https://old.org")];
        let normalizer = PreProcessor::new();
        let weights = Score2Weights::default();
        let builder = DiffBuilder::new(&entries, &normalizer, Pages::new(&store), &weights);

        let result = matched_result(0, 10.0);
        let evidence = Evidence {
            best_license: Some(Provenance::new("GPL-3.0", "https://foobar.org")),
            best_abstract_license: Some(Provenance::new("MIT", "[1, , 10.1/x]")),
            ..Default::default()
        };
        let proposal = ToolProposal {
            name: "FooBar",
            description: "",
            homepage: "https://foobar.org",
            links: &[],
            downloads: &[],
            documentations: &[],
            evidence: &evidence,
        };
        let mut diffs = Vec::new();
        assert!(builder.add_tool(&result.suggestions[0], &result, proposal, &mut diffs).is_none());
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].modify_homepage, "");
        assert_eq!(diffs[0].modify_license.object, "MIT");
        assert_eq!(diffs[0].score_score2, 10010.0);
    }

    #[test]
    fn test_entry_named_after_other_tool_title_is_skipped() {
        let store = MemoryPageStore::new();
        let entries = vec![entry("BazQux", "https://bazqux.org")];
        let normalizer = PreProcessor::new();
        let weights = Score2Weights::default();
        let builder = DiffBuilder::new(&entries, &normalizer, Pages::new(&store), &weights);

        let mut result = matched_result(0, 2000.0);
        result.tool_title_others = vec![vec!["BazQux: a second tool".to_string()]];
        let evidence = Evidence::default();
        let proposal = ToolProposal {
            name: "FooBar",
            description: "A tool",
            homepage: "https://foobar.org",
            links: &[],
            downloads: &[],
            documentations: &[],
            evidence: &evidence,
        };
        let mut diffs = Vec::new();
        let tool = builder.add_tool(&result.suggestions[0], &result, proposal, &mut diffs);
        assert!(diffs.is_empty());
        assert!(tool.is_some());
    }

    #[test]
    fn test_new_tool() {
        let store = MemoryPageStore::new();
        let entries = Vec::new();
        let normalizer = PreProcessor::new();
        let weights = Score2Weights::default();
        let builder = DiffBuilder::new(&entries, &normalizer, Pages::new(&store), &weights);

        let mut result = matched_result(0, 2000.0);
        result.suggestions[0].publication_and_name_existing.clear();
        result.suggestions[0].homepage = "https://foobar.org".to_string();
        result.pub_ids.push(PubIds::new("1", "", "10.1/x"));
        result.pub_ids.push(PubIds::default());
        let evidence = Evidence {
            best_license: Some(Provenance::new("MIT", "https://foobar.org")),
            all_languages: vec![Provenance::new("R", "https://foobar.org")],
            credits: vec![CorrespAuthor {
                name: "Jane Doe".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let downloads = vec![BiotoolsLink::download("https://foobar.org/foobar.tar.gz", "Source package")];
        let proposal = ToolProposal {
            name: "FooBar",
            description: "FooBar aligns sequences.",
            homepage: "https://foobar.org",
            links: &[],
            downloads: &downloads,
            documentations: &[],
            evidence: &evidence,
        };
        let mut diffs = Vec::new();
        let tool = builder
            .add_tool(&result.suggestions[0], &result, proposal, &mut diffs)
            .unwrap();
        assert_eq!(tool.name, "FooBar");
        assert_eq!(tool.homepage, "https://foobar.org");
        assert_eq!(tool.license.as_deref(), Some("MIT"));
        assert_eq!(tool.language, vec!["R"]);
        assert_eq!(tool.download[0].kind, "Source package");
        assert_eq!(tool.publication.len(), 1);
        assert_eq!(tool.credit[0].type_entity.as_deref(), Some("Person"));
        assert!(tool.credit[0].email.is_none());
    }

    #[test]
    fn test_current_homepage() {
        let store = MemoryPageStore::new();
        store.insert_webpage(PageRecord {
            start_url: "https://old.org".to_string(),
            broken: true,
            ..PageRecord::default()
        });
        let mut e = entry("FooBar", "https://old.org");
        e.homepage_status = 1;
        assert_eq!(
            current_homepage(&e, Pages::new(&store)),
            "https://old.org (homepage_status: 1) (broken)"
        );
    }
}
