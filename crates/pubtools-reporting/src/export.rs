use std::borrow::Cow;
use std::fmt::Display;
use std::io;
use std::path::Path;

use pubtools_core::diff::current_homepage;
use pubtools_core::model::{RegistryEntry, RegistryLink};
use pubtools_core::pass2::Pass2Row;
use pubtools_core::{BiotoolsLink, Diff, Pages, Pass1Output, Pass2Output, PubIds, Suggestion2};

/// Separator between values of a multi-value field.
const OUTER: &str = " | ";
/// Separator inside one value of a multi-value field.
const INNER: &str = " ; ";

pub const RESULTS_COLUMNS: &[&str] = &[
    "pmid",
    "pmcid",
    "doi",
    "same_suggestions",
    "score",
    "score2",
    "score2_parts",
    "suggestion_original",
    "suggestion",
    "suggestion_processed",
    "publication_and_name_existing",
    "name_existing_some_publication_different",
    "some_publication_existing_name_different",
    "name_existing_publication_different",
    "name_match",
    "link_match",
    "name_word_match",
    "links_abstract",
    "links_fulltext",
    "from_abstract_link",
    "homepage",
    "homepage_biotools",
    "link",
    "link_biotools",
    "download",
    "download_biotools",
    "documentation",
    "documentation_biotools",
    "broken_links",
    "other_scores",
    "other_scores2",
    "other_scores2_parts",
    "other_suggestions_original",
    "other_suggestions",
    "other_suggestions_processed",
    "other_publication_and_name_existing",
    "other_name_existing_some_publication_different",
    "other_some_publication_existing_name_different",
    "other_name_existing_publication_different",
    "other_links_abstract",
    "other_links_fulltext",
    "leftover_links_abstract",
    "leftover_links_fulltext",
    "title",
    "tool_title_others",
    "tool_title_extracted_original",
    "tool_title",
    "tool_title_pruned",
    "tool_title_acronym",
    "description",
    "description_biotools",
    "license_homepage",
    "license_link",
    "license_download",
    "license_documentation",
    "license_abstract",
    "license",
    "license_biotools",
    "language_homepage",
    "language_link",
    "language_download",
    "language_documentation",
    "language_abstract",
    "language",
    "language_biotools",
    "oa",
    "journal_title",
    "pub_date",
    "citations_count",
    "citations_timestamp",
    "citations_count_normalised",
    "corresp_author_name",
    "credit_name_biotools",
    "corresp_author_orcid",
    "credit_orcidid_biotools",
    "corresp_author_email",
    "credit_email_biotools",
    "corresp_author_phone",
    "corresp_author_uri",
    "credit_url_biotools",
    "credit",
];

pub const DIFF_COLUMNS: &[&str] = &[
    "biotools_id",
    "score_score2",
    "current_publications",
    "modify_publications",
    "add_publications",
    "current_name",
    "modify_name",
    "possibly_related",
    "current_homepage",
    "modify_homepage",
    "current_links",
    "add_links",
    "current_downloads",
    "add_downloads",
    "current_documentations",
    "add_documentations",
    "current_license",
    "modify_license",
    "current_languages",
    "add_languages",
    "current_credits",
    "modify_credits",
    "add_credits",
];

/// Quote a field that starts with a double quote or contains a tab,
/// doubling the quotes inside it.
pub fn quote_field(value: &str) -> Cow<'_, str> {
    if value.starts_with('"') || value.contains('\t') {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn push_row(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push('\t');
        }
        out.push_str(&quote_field(field));
    }
    out.push('\n');
}

fn header(columns: &[&str]) -> String {
    let mut out = columns.join("\t");
    out.push('\n');
    out
}

fn join<I>(items: I, sep: &str) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    items.into_iter().map(|i| i.to_string()).collect::<Vec<_>>().join(sep)
}

/// A float rendered with at least one decimal place.
fn number(value: f64) -> String {
    format!("{value:?}")
}

fn score2_parts(parts: &[f64; 4], render: impl Fn(f64) -> String) -> String {
    format!("[{}]", join(parts.iter().map(|&p| render(p)), ", "))
}

fn links(links: &[BiotoolsLink], sep: &str) -> String {
    join(links.iter().map(|l| format!("{} ({})", l.url, l.link_type)), sep)
}

fn registry_links(links: &[RegistryLink], sep: &str) -> String {
    join(links.iter().map(|l| format!("{} ({})", l.url, l.kind)), sep)
}

/// One inner list per publication.
fn per_publication<T>(groups: &[Vec<T>], field: impl Fn(&T) -> &str) -> String {
    join(groups.iter().map(|g| join(g.iter().map(&field), INNER)), OUTER)
}

fn per_entry(entries: &[&RegistryEntry], field: impl Fn(&RegistryEntry) -> String) -> String {
    join(entries.iter().map(|e| field(*e)), OUTER)
}

/// Write `web.txt` and `doc.txt`, one link per line, for the page fetcher.
pub fn export_link_lists(output: &Pass1Output, dir: &Path) -> io::Result<()> {
    for (file, list) in [("web.txt", &output.web_links), ("doc.txt", &output.doc_links)] {
        let path = dir.join(file);
        let content: String = list.iter().map(|l| format!("{l}\n")).collect();
        std::fs::write(&path, content)?;
        tracing::info!(links = list.len(), path = %path.display(), "wrote link list");
    }
    Ok(())
}

/// The `results.csv` and `diff.csv` reports of one Pass 2 run.
pub struct Pass2Report<'a> {
    output: &'a Pass2Output,
    entries: &'a [RegistryEntry],
    pages: Pages<'a>,
}

impl<'a> Pass2Report<'a> {
    pub fn new(output: &'a Pass2Output, entries: &'a [RegistryEntry], pages: Pages<'a>) -> Self {
        Self { output, entries, pages }
    }

    fn named(&self, index: usize) -> String {
        let entry = &self.entries[index];
        format!("{} ({})", entry.biotools_id, entry.name)
    }

    fn bucket(&self, indices: &[usize], pub_ids: &[Vec<PubIds>], with_name: bool, sep: &str) -> String {
        join(
            indices.iter().enumerate().map(|(i, &index)| {
                let mut value = if with_name {
                    self.named(index)
                } else {
                    self.entries[index].biotools_id.clone()
                };
                if let Some(ids) = pub_ids.get(i).filter(|ids| !ids.is_empty()) {
                    value.push_str(&format!(" ({})", join(ids, INNER)));
                }
                value
            }),
            sep,
        )
    }

    fn buckets(&self, s: &Suggestion2, sep: &str) -> [String; 4] {
        [
            self.bucket(&s.publication_and_name_existing, &[], false, sep),
            self.bucket(
                &s.name_existing_some_publication_different,
                &s.name_existing_some_publication_different_pub_ids,
                false,
                sep,
            ),
            self.bucket(
                &s.some_publication_existing_name_different,
                &s.some_publication_existing_name_different_pub_ids,
                true,
                sep,
            ),
            self.bucket(
                &s.name_existing_publication_different,
                &s.name_existing_publication_different_pub_ids,
                false,
                sep,
            ),
        ]
    }

    fn result_fields(&self, row: &Pass2Row) -> Vec<String> {
        let result = &row.result;
        let evidence = &row.evidence;
        let suggestion = result.suggestions.first();
        let others = result.suggestions.get(1..).unwrap_or(&[]);
        let existing: Vec<&RegistryEntry> = suggestion
            .map(|s| s.existing().map(|e| &self.entries[e]).collect())
            .unwrap_or_default();
        let top = |render: &dyn Fn(&Suggestion2) -> String| suggestion.map(render).unwrap_or_default();

        let mut f = Vec::with_capacity(RESULTS_COLUMNS.len());

        f.push(join(result.pub_ids.iter().map(|p| &p.pmid), OUTER));
        f.push(join(result.pub_ids.iter().map(|p| &p.pmcid), OUTER));
        f.push(join(result.pub_ids.iter().map(|p| &p.doi), OUTER));
        f.push(join(&result.same_suggestions, OUTER));

        f.push(top(&|s| number(s.score)));
        f.push(top(&|s| if s.score2 > -1.0 { number(s.score2) } else { String::new() }));
        f.push(top(&|s| {
            if s.score2 > -1.0 {
                score2_parts(&s.score2_parts, number)
            } else {
                String::new()
            }
        }));
        f.push(top(&|s| s.original.clone()));
        f.push(row.name.clone());
        f.push(top(&|s| s.processed.clone()));

        f.extend(suggestion.map(|s| self.buckets(s, OUTER)).unwrap_or_default());

        f.push(join(result.name_match.iter().map(|&e| self.named(e)), OUTER));
        f.push(join(
            result
                .link_match
                .iter()
                .zip(&result.link_match_links)
                .map(|(&e, links)| format!("{} ({})", self.entries[e].biotools_id, links.join(INNER))),
            OUTER,
        ));
        f.push(join(result.name_word_match.iter().map(|&e| self.named(e)), OUTER));

        f.push(top(&|s| s.links_abstract.join(OUTER)));
        f.push(top(&|s| s.links_fulltext.join(OUTER)));
        f.push(join(result.suggestions.iter().map(|s| s.from_abstract_link), OUTER));

        f.push(top(&|s| {
            format!(
                "{}{}{}",
                s.homepage,
                if s.homepage_broken { " (broken)" } else { "" },
                if s.homepage_missing { " (missing)" } else { "" }
            )
        }));
        f.push(per_entry(&existing, |e| current_homepage(e, self.pages)));
        f.push(top(&|s| links(&s.link_links, OUTER)));
        f.push(per_entry(&existing, |e| registry_links(&e.link, INNER)));
        f.push(top(&|s| links(&s.download_links, OUTER)));
        f.push(per_entry(&existing, |e| registry_links(&e.download, INNER)));
        f.push(top(&|s| links(&s.documentation_links, OUTER)));
        f.push(per_entry(&existing, |e| registry_links(&e.documentation, INNER)));
        f.push(top(&|s| links(&s.broken_links, OUTER)));

        f.push(join(others.iter().map(|s| format!("{:.1}", s.score)), OUTER));
        f.push(join(
            others.iter().map(|s| {
                if s.score2 > -1.0 {
                    format!("{:.1}", s.score2)
                } else {
                    String::new()
                }
            }),
            OUTER,
        ));
        f.push(join(
            others.iter().map(|s| {
                if s.score2 > -1.0 {
                    score2_parts(&s.score2_parts, |p| format!("{p:.1}"))
                } else {
                    String::new()
                }
            }),
            OUTER,
        ));
        f.push(join(others.iter().map(|s| &s.original), OUTER));
        f.push(join(others.iter().map(|s| &s.extracted), OUTER));
        f.push(join(others.iter().map(|s| &s.processed), OUTER));

        let other_buckets: Vec<[String; 4]> = others.iter().map(|s| self.buckets(s, INNER)).collect();
        for k in 0..4 {
            f.push(join(other_buckets.iter().map(|b| &b[k]), OUTER));
        }

        let other_links = |links: fn(&Suggestion2) -> &Vec<String>| {
            if others.iter().all(|s| links(s).is_empty()) {
                String::new()
            } else {
                join(others.iter().map(|s| links(s).join(INNER)), OUTER)
            }
        };
        f.push(other_links(|s| &s.links_abstract));
        f.push(other_links(|s| &s.links_fulltext));
        f.push(per_publication(&result.leftover_links_abstract, String::as_str));
        f.push(per_publication(&result.leftover_links_fulltext, String::as_str));

        f.push(result.title.join(OUTER));
        f.push(per_publication(&result.tool_title_others, String::as_str));
        f.push(result.tool_title_extracted_original.join(OUTER));
        f.push(join(
            result
                .tool_title
                .iter()
                .zip(&result.tool_title_extracted_original)
                .map(|(t, o)| if t == o { "" } else { t.as_str() }),
            OUTER,
        ));
        f.push(join(
            result
                .tool_title_pruned
                .iter()
                .zip(&result.tool_title)
                .map(|(p, t)| if p == t { "" } else { p.as_str() }),
            OUTER,
        ));
        f.push(result.tool_title_acronym.join(OUTER));

        f.push(row.description.clone());
        f.push(per_entry(&existing, |e| {
            e.description
                .replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t")
        }));

        f.push(evidence.homepage_license.clone());
        f.push(join(&evidence.link_licenses, OUTER));
        f.push(join(&evidence.download_licenses, OUTER));
        f.push(join(&evidence.documentation_licenses, OUTER));
        f.push(join(evidence.abstract_licenses.iter().map(|l| join(l, INNER)), OUTER));
        f.push(evidence.best_license.as_ref().map(ToString::to_string).unwrap_or_default());
        f.push(per_entry(&existing, |e| e.license().to_string()));

        f.push(evidence.homepage_language.clone());
        f.push(join(&evidence.link_languages, OUTER));
        f.push(join(&evidence.download_languages, OUTER));
        f.push(join(&evidence.documentation_languages, OUTER));
        f.push(join(evidence.abstract_languages.iter().map(|l| join(l, INNER)), OUTER));
        f.push(join(&evidence.all_languages, INNER));
        f.push(per_entry(&existing, |e| e.language.join(INNER)));

        f.push(join(&result.oa, OUTER));
        f.push(result.journal_title.join(OUTER));
        f.push(join(
            result
                .pub_date_human
                .iter()
                .zip(&result.pub_date)
                .map(|(h, d)| format!("{h} ({d})")),
            OUTER,
        ));
        f.push(join(&result.citations_count, OUTER));
        f.push(join(
            result
                .citations_timestamp_human
                .iter()
                .zip(&result.citations_timestamp)
                .map(|(h, t)| format!("{h} ({t})")),
            OUTER,
        ));
        f.push(join(row.citations_count_normalised.iter().map(|&v| number(v)), OUTER));

        let credits = |field: fn(&pubtools_core::model::RegistryCredit) -> &str| {
            per_entry(&existing, |e| join(e.credit.iter().map(field), INNER))
        };
        f.push(per_publication(&result.corresp_author, |c| c.name.as_str()));
        f.push(credits(|c| c.name()));
        f.push(per_publication(&result.corresp_author, |c| c.orcid.as_str()));
        f.push(credits(|c| c.orcidid()));
        f.push(per_publication(&result.corresp_author, |c| c.email.as_str()));
        f.push(credits(|c| c.email()));
        f.push(per_publication(&result.corresp_author, |c| c.phone.as_str()));
        f.push(per_publication(&result.corresp_author, |c| c.uri.as_str()));
        f.push(credits(|c| c.url()));
        f.push(join(&evidence.credits, OUTER));

        f
    }

    fn diff_fields(&self, diff: &Diff) -> Vec<String> {
        let entry = &self.entries[diff.existing];
        let when = |condition: bool, value: &dyn Fn() -> String| if condition { value() } else { String::new() };

        let mut f = Vec::with_capacity(DIFF_COLUMNS.len());
        f.push(entry.biotools_id.clone());
        f.push(number(diff.score_score2));
        f.push(when(
            !diff.modify_publications.is_empty() || !diff.add_publications.is_empty() || !diff.modify_name.is_empty(),
            &|| join(entry.publication.iter().map(|p| p.pub_ids()), OUTER),
        ));
        f.push(join(&diff.modify_publications, OUTER));
        f.push(join(&diff.add_publications, OUTER));
        f.push(when(!diff.modify_name.is_empty(), &|| entry.name.clone()));
        f.push(diff.modify_name.clone());
        f.push(join(diff.possibly_related.iter().map(|&e| self.named(e)), OUTER));
        f.push(when(!diff.modify_homepage.is_empty(), &|| current_homepage(entry, self.pages)));
        f.push(diff.modify_homepage.clone());
        f.push(when(!diff.add_links.is_empty(), &|| registry_links(&entry.link, OUTER)));
        f.push(links(&diff.add_links, OUTER));
        f.push(when(!diff.add_downloads.is_empty(), &|| registry_links(&entry.download, OUTER)));
        f.push(links(&diff.add_downloads, OUTER));
        f.push(when(!diff.add_documentations.is_empty(), &|| {
            registry_links(&entry.documentation, OUTER)
        }));
        f.push(links(&diff.add_documentations, OUTER));
        f.push(when(!diff.modify_license.is_empty(), &|| entry.license().to_string()));
        f.push(diff.modify_license.to_string());
        f.push(when(!diff.add_languages.is_empty(), &|| entry.language.join(OUTER)));
        f.push(join(&diff.add_languages, OUTER));
        f.push(when(
            !diff.modify_credits.is_empty() || !diff.add_credits.is_empty(),
            &|| join(&entry.credit, OUTER),
        ));
        f.push(join(&diff.modify_credits, OUTER));
        f.push(join(&diff.add_credits, OUTER));
        f
    }

    /// Every result row under the `results.csv` header.
    pub fn results_tsv(&self) -> String {
        let mut out = header(RESULTS_COLUMNS);
        for row in &self.output.rows {
            push_row(&mut out, &self.result_fields(row));
        }
        out
    }

    /// Included diffs under the `diff.csv` header.
    pub fn diff_tsv(&self) -> String {
        let mut out = header(DIFF_COLUMNS);
        for diff in self.output.included_diffs() {
            push_row(&mut out, &self.diff_fields(diff));
        }
        out
    }

    /// Write `results.csv` and `diff.csv` into `dir`.
    pub fn write(&self, dir: &Path) -> io::Result<()> {
        let results = dir.join("results.csv");
        std::fs::write(&results, self.results_tsv())?;
        tracing::info!(rows = self.output.rows.len(), path = %results.display(), "wrote pass2 results");

        let diffs = dir.join("diff.csv");
        std::fs::write(&diffs, self.diff_tsv())?;
        tracing::info!(
            diffs = self.output.included_diffs().count(),
            path = %diffs.display(),
            "wrote registry diffs"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubtools_core::evidence::Evidence;
    use pubtools_core::{CorrespAuthor, MemoryPageStore, Provenance, Result1, Result2, Suggestion1};

    // ── helpers ──────────────────────────────────────────────────────

    fn entry() -> RegistryEntry {
        RegistryEntry {
            biotools_id: "foobar".to_string(),
            name: "FooBar".to_string(),
            description: "line1\nline2".to_string(),
            homepage: "https://foobar.org".to_string(),
            language: vec!["C".to_string()],
            ..Default::default()
        }
    }

    fn suggestion(name: &str, score: f64) -> Suggestion2 {
        Suggestion2::from(Suggestion1 {
            score,
            original: name.to_string(),
            extracted: name.to_string(),
            processed: name.to_lowercase(),
            ..Default::default()
        })
    }

    fn output() -> Pass2Output {
        let mut top = suggestion("FooBar", 1500.0);
        top.links_abstract = vec!["https://foobar.org".to_string()];
        top.publication_and_name_existing = vec![0];
        top.homepage = "https://foobar.org".to_string();
        top.link_links = vec![BiotoolsLink::link("https://github.com/lab/foobar", "Repository")];

        let mut result = Result2::from(Result1 {
            pub_ids: PubIds::new("1", "", "10.1/x"),
            title: "FooBar: fast reads".to_string(),
            ..Default::default()
        });
        result.suggestions = vec![top, suggestion("Baz", 100.0)];

        Pass2Output {
            rows: vec![Pass2Row {
                result,
                name: "FooBar".to_string(),
                homepage: "https://foobar.org".to_string(),
                description: "Aligns\treads".to_string(),
                evidence: Evidence {
                    best_license: Some(Provenance::new("MIT", "https://foobar.org")),
                    credits: vec![CorrespAuthor {
                        name: "Jane Doe".to_string(),
                        email: "jane@foobar.org".to_string(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                citations_count_normalised: vec![-1.0],
            }],
            diffs: vec![
                Diff {
                    existing: 0,
                    score_score2: 1500.0,
                    ..Default::default()
                },
                Diff {
                    existing: 0,
                    score_score2: 1500.0,
                    add_links: vec![BiotoolsLink::link("https://github.com/lab/foobar", "Repository")],
                    modify_license: Provenance::new("MIT", "https://foobar.org"),
                    ..Default::default()
                },
            ],
            new_tools: Vec::new(),
        }
    }

    // ── quoting ──────────────────────────────────────────────────────

    #[test]
    fn test_quote_field() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("mid\"dle"), "mid\"dle");
        assert_eq!(quote_field("a\tb"), "\"a\tb\"");
        assert_eq!(quote_field("\"quoted\" text"), "\"\"\"quoted\"\" text\"");
    }

    #[test]
    fn test_number_keeps_decimal() {
        assert_eq!(number(2000.0), "2000.0");
        assert_eq!(number(-1.0), "-1.0");
        assert_eq!(number(0.25), "0.25");
    }

    // ── results.csv ──────────────────────────────────────────────────

    #[test]
    fn test_result_fields() {
        let entries = vec![entry()];
        let store = MemoryPageStore::new();
        let output = output();
        let report = Pass2Report::new(&output, &entries, Pages::new(&store));

        let fields = report.result_fields(&output.rows[0]);
        assert_eq!(fields.len(), RESULTS_COLUMNS.len());
        let col = |name: &str| {
            let index = RESULTS_COLUMNS.iter().position(|c| *c == name).unwrap();
            fields[index].as_str()
        };

        assert_eq!(col("pmid"), "1");
        assert_eq!(col("doi"), "10.1/x");
        assert_eq!(col("score"), "1500.0");
        assert_eq!(col("score2"), "");
        assert_eq!(col("suggestion"), "FooBar");
        assert_eq!(col("publication_and_name_existing"), "foobar");
        assert_eq!(col("from_abstract_link"), "false | false");
        assert_eq!(col("homepage"), "https://foobar.org");
        assert_eq!(col("homepage_biotools"), "https://foobar.org");
        assert_eq!(col("link"), "https://github.com/lab/foobar (Repository)");
        assert_eq!(col("link_biotools"), "");
        assert_eq!(col("other_scores"), "100.0");
        assert_eq!(col("other_scores2"), "");
        assert_eq!(col("other_suggestions"), "Baz");
        assert_eq!(col("other_links_abstract"), "");
        assert_eq!(col("title"), "FooBar: fast reads");
        assert_eq!(col("description_biotools"), "line1\\nline2");
        assert_eq!(col("license"), "MIT (https://foobar.org)");
        assert_eq!(col("language_biotools"), "C");
        assert_eq!(col("citations_count_normalised"), "-1.0");
        assert_eq!(col("credit"), "Jane Doe, jane@foobar.org");
    }

    #[test]
    fn test_results_tsv_quotes_fields() {
        let entries = vec![entry()];
        let store = MemoryPageStore::new();
        let output = output();
        let tsv = Pass2Report::new(&output, &entries, Pages::new(&store)).results_tsv();

        let mut lines = tsv.lines();
        assert_eq!(lines.next().unwrap(), RESULTS_COLUMNS.join("\t"));
        assert!(tsv.contains("\t\"Aligns\treads\"\t"));
        assert!(tsv.ends_with('\n'));
    }

    // ── diff.csv ─────────────────────────────────────────────────────

    #[test]
    fn test_diff_tsv_only_included() {
        let entries = vec![entry()];
        let store = MemoryPageStore::new();
        let output = output();
        let tsv = Pass2Report::new(&output, &entries, Pages::new(&store)).diff_tsv();

        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines.len(), 2);
        let fields: Vec<&str> = lines[1].split('\t').collect();
        assert_eq!(fields.len(), DIFF_COLUMNS.len());
        assert_eq!(fields[0], "foobar");
        assert_eq!(fields[1], "1500.0");
        assert_eq!(fields[2], "");
        assert_eq!(fields[10], "");
        assert_eq!(fields[11], "https://github.com/lab/foobar (Repository)");
        assert_eq!(fields[16], "");
        assert_eq!(fields[17], "MIT (https://foobar.org)");
        assert_eq!(fields[22], "");
    }

    // ── files ────────────────────────────────────────────────────────

    #[test]
    fn test_write_reports() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![entry()];
        let store = MemoryPageStore::new();
        let output = output();
        Pass2Report::new(&output, &entries, Pages::new(&store))
            .write(dir.path())
            .unwrap();

        let results = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
        assert_eq!(results.lines().count(), 2);
        let diffs = std::fs::read_to_string(dir.path().join("diff.csv")).unwrap();
        assert!(diffs.starts_with("biotools_id\tscore_score2\t"));
    }

    #[test]
    fn test_export_link_lists() {
        let dir = tempfile::tempdir().unwrap();
        let output = Pass1Output {
            web_links: vec!["https://a.org".to_string(), "https://b.org".to_string()],
            ..Default::default()
        };
        export_link_lists(&output, dir.path()).unwrap();

        let web = std::fs::read_to_string(dir.path().join("web.txt")).unwrap();
        assert_eq!(web, "https://a.org\nhttps://b.org\n");
        let doc = std::fs::read_to_string(dir.path().join("doc.txt")).unwrap();
        assert!(doc.is_empty());
    }
}
