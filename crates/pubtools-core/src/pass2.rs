//! Pass 2: refine Pass 1 results against fetched pages and the registry.
//!
//! Results are re-scored, merged when they name the same tool, matched
//! against registry entries and given homepages, evidence and descriptions.
//! Every result yields a report row; matched entries get diffs and unmatched
//! confident names become new entries.

use std::path::Path;

use serde::Serialize;

use crate::CoreError;
use crate::ProgressEvent;
use crate::config::Heuristics;
use crate::description::DescriptionBuilder;
use crate::diff::{DiffBuilder, ToolProposal};
use crate::evidence::{Evidence, EvidenceCollector, citations_count_normalised};
use crate::homepage::divide_links;
use crate::idf::Idf;
use crate::merge::{fill_same_suggestions, merge_results, sort_results};
use crate::model::{Diff, NewTool, RegistryEntry, Result1, Result2};
use crate::page::Pages;
use crate::registry::RegistryMatcher;
use crate::score2::Score2Refiner;
use crate::text::TextNormalizer;

/// One Pass 2 result with everything derived for the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pass2Row {
    pub result: Result2,
    /// Name of the top suggestion, empty without suggestions.
    pub name: String,
    /// Homepage of the top suggestion, empty when broken or missing.
    pub homepage: String,
    pub description: String,
    pub evidence: Evidence,
    pub citations_count_normalised: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pass2Output {
    pub rows: Vec<Pass2Row>,
    /// Diffs in report order, including ones with nothing to report.
    pub diffs: Vec<Diff>,
    pub new_tools: Vec<NewTool>,
}

#[derive(Serialize)]
struct NewToolsFile<'a> {
    count: usize,
    list: &'a [NewTool],
}

impl Pass2Output {
    /// Diffs that propose at least one change.
    pub fn included_diffs(&self) -> impl Iterator<Item = &Diff> {
        self.diffs.iter().filter(|d| d.include())
    }

    /// Write the new entries as a bio.tools JSON export.
    pub fn save_new_tools(&self, path: &Path) -> Result<(), CoreError> {
        let file = NewToolsFile {
            count: self.new_tools.len(),
            list: &self.new_tools,
        };
        std::fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

pub struct Pass2<'a, N: TextNormalizer + ?Sized> {
    normalizer: &'a N,
    idf: &'a Idf,
    heuristics: &'a Heuristics,
    entries: &'a [RegistryEntry],
}

impl<'a, N: TextNormalizer + ?Sized> Pass2<'a, N> {
    pub fn new(normalizer: &'a N, idf: &'a Idf, heuristics: &'a Heuristics, entries: &'a [RegistryEntry]) -> Self {
        Self {
            normalizer,
            idf,
            heuristics,
            entries,
        }
    }

    /// Re-score, sort and merge Pass 1 results, then match them against the
    /// registry and resolve their links.
    pub fn prepare(&self, results1: Vec<Result1>, pages: Pages<'_>, progress: &impl Fn(ProgressEvent)) -> Vec<Result2> {
        let weights = self.heuristics.score2();
        let before = results1.len();
        tracing::info!(results = before, "making pass2 results");
        let mut results: Vec<Result2> = results1.into_iter().map(Result2::from).collect();

        let refiner = Score2Refiner::new(self.normalizer, self.idf, weights);
        let total = results.len();
        for (index, result) in results.iter_mut().enumerate() {
            progress(ProgressEvent::Result { index, total });
            refiner.refine(result, pages);
        }

        sort_results(&mut results, weights.score_min);
        let mut results = merge_results(results, weights);
        fill_same_suggestions(&mut results);

        let matcher = RegistryMatcher::new(self.entries, self.normalizer);
        for result in &mut results {
            matcher.match_result(result);
        }
        tracing::info!(results = results.len(), "found existing registry entries");

        for result in &mut results {
            let name = result
                .suggestions
                .first()
                .map(|s| s.extracted.clone())
                .unwrap_or_default();
            let pub_ids = result.pub_ids.clone();
            for suggestion in &mut result.suggestions {
                divide_links(suggestion, &pub_ids, pages, &name);
            }
        }
        tracing::info!(results = results.len(), "divided links");
        results
    }

    /// Run Pass 2 over `results1`.
    pub fn run(&self, results1: Vec<Result1>, pages: Pages<'_>, progress: impl Fn(ProgressEvent)) -> Pass2Output {
        let results = self.prepare(results1, pages, &progress);

        let weights = self.heuristics.score2();
        let collector = EvidenceCollector::new(self.heuristics);
        let describer = DescriptionBuilder::new(self.entries, self.normalizer, pages, weights);
        let differ = DiffBuilder::new(self.entries, self.normalizer, pages, weights);

        let mut output = Pass2Output::default();
        let total = results.len();
        for (index, result) in results.into_iter().enumerate() {
            progress(ProgressEvent::Diffing { index, total });
            let suggestion = result.suggestions.first();
            let name = suggestion.map(|s| s.extracted.clone()).unwrap_or_default();
            let homepage = suggestion
                .filter(|s| !s.homepage_broken && !s.homepage_missing)
                .map(|s| s.homepage.clone())
                .unwrap_or_default();
            let (links, downloads, documentations) = match suggestion {
                Some(s) => (
                    s.link_links.as_slice(),
                    s.download_links.as_slice(),
                    s.documentation_links.as_slice(),
                ),
                None => (&[][..], &[][..], &[][..]),
            };

            let description =
                describer.describe(&result, suggestion, &homepage, links, documentations, downloads, &name);
            let evidence = collector.collect(&result, &homepage, links, downloads, documentations, pages);

            if let Some(suggestion) = suggestion {
                let proposal = ToolProposal {
                    name: &name,
                    description: &description,
                    homepage: &homepage,
                    links,
                    downloads,
                    documentations,
                    evidence: &evidence,
                };
                if let Some(tool) = differ.add_tool(suggestion, &result, proposal, &mut output.diffs) {
                    output.new_tools.push(tool);
                }
            }

            output.rows.push(Pass2Row {
                citations_count_normalised: citations_count_normalised(&result),
                result,
                name,
                homepage,
                description,
                evidence,
            });
        }

        tracing::info!(
            rows = output.rows.len(),
            diffs = output.included_diffs().count(),
            new = output.new_tools.len(),
            "made pass2 output"
        );
        output
    }
}
