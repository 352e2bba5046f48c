//! Pass 1: tool-name suggestions for each publication.
//!
//! Every distinct tool title of a publication yields its own result, so a
//! title naming two tools (`FooDB and BarDB: ...`) is scored twice. The
//! links of all suggestions are gathered for fetching before Pass 2.

use std::path::Path;

use crate::CoreError;
use crate::ProgressEvent;
use crate::config::Heuristics;
use crate::idf::Idf;
use crate::links::{ClassifiedLinks, make_biotools_links};
use crate::model::{Publication, Result1};
use crate::ranker::{ResultContext, SuggestionRanker};
use crate::scoring::{CandidateScorer, ScoringInput, ToolTitleInput};
use crate::text::TextNormalizer;
use crate::title::split_title;

/// Results of Pass 1 plus the URLs Pass 2 needs fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pass1Output {
    pub results: Vec<Result1>,
    /// Link and download URLs, fetched as web pages.
    pub web_links: Vec<String>,
    /// Documentation URLs, fetched as docs.
    pub doc_links: Vec<String>,
}

impl Pass1Output {
    /// Write the results as pretty-printed JSON, readable by [`Result1::load_all`].
    pub fn save_results(&self, path: &Path) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(&self.results)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

pub struct Pass1<'a, N: TextNormalizer + ?Sized> {
    normalizer: &'a N,
    idf: &'a Idf,
    heuristics: &'a Heuristics,
}

impl<'a, N: TextNormalizer + ?Sized> Pass1<'a, N> {
    pub fn new(normalizer: &'a N, idf: &'a Idf, heuristics: &'a Heuristics) -> Self {
        Self {
            normalizer,
            idf,
            heuristics,
        }
    }

    /// Results for one publication, one per distinct tool title.
    pub fn publication_results(&self, publication: &Publication) -> Vec<Result1> {
        let weights = self.heuristics.scoring();
        let scorer = CandidateScorer::new(self.normalizer, self.idf, self.heuristics);
        let ranker = SuggestionRanker::new(self.normalizer, weights);

        let title = publication.title.as_str();
        let split = split_title(title, self.normalizer, weights);
        let acronym = split.acronym.as_deref();

        let score = |tool_title: Option<ToolTitleInput<'_>>, context: &ResultContext<'_>| {
            let input = ScoringInput {
                title,
                title_rest: &split.title_rest,
                abstract_text: &publication.abstract_text,
                fulltext: &publication.fulltext,
                tool_title,
            };
            ranker.make_result(publication, scorer.score(&input), context)
        };

        if split.tool_titles.is_empty() {
            let context = ResultContext {
                title,
                ..ResultContext::default()
            };
            return vec![score(None, &context)];
        }

        let processed: Vec<String> = split
            .tool_titles
            .iter()
            .map(|t| self.normalizer.process(&t.title).join(" "))
            .collect();

        let mut results = Vec::new();
        let mut done: Vec<&str> = Vec::new();
        for (i, tool_title) in split.tool_titles.iter().enumerate() {
            if done.contains(&processed[i].as_str()) {
                continue;
            }
            let others = split
                .tool_titles
                .iter()
                .filter(|t| t.title != tool_title.title)
                .map(|t| t.title.clone())
                .collect();
            let processed_others = processed.iter().filter(|p| **p != processed[i]).cloned().collect();
            let context = ResultContext {
                title,
                tool_title_extracted_original: &tool_title.extracted_original,
                tool_title: &tool_title.title,
                tool_title_pruned: &tool_title.pruned,
                tool_title_acronym: acronym.unwrap_or(""),
                tool_title_others: others,
                tool_title_processed_others: processed_others,
            };
            let input = ToolTitleInput {
                title: &tool_title.title,
                pruned: &tool_title.pruned,
                acronym,
            };
            results.push(score(Some(input), &context));
            done.push(&processed[i]);
        }
        results
    }

    /// Score all publications, sort the results and collect links to fetch.
    pub fn run(&self, publications: &[Publication], progress: impl Fn(ProgressEvent)) -> Pass1Output {
        let total = publications.len();
        let mut results = Vec::new();
        for (index, publication) in publications.iter().enumerate() {
            progress(ProgressEvent::Publication { index, total });
            results.extend(self.publication_results(publication));
        }
        tracing::info!(results = results.len(), publications = total, "made results");

        results.sort_by(Result1::rank_cmp);

        let mut web_links = Vec::new();
        let mut doc_links = Vec::new();
        for suggestion in results.iter().flat_map(|r| &r.suggestions) {
            let mut classified = ClassifiedLinks::default();
            make_biotools_links(&suggestion.links_abstract, &mut classified);
            make_biotools_links(&suggestion.links_fulltext, &mut classified);
            web_links.extend(classified.links.into_iter().map(|l| l.url));
            web_links.extend(classified.downloads.into_iter().map(|l| l.url));
            doc_links.extend(classified.documentations.into_iter().map(|l| l.url));
        }
        tracing::info!(web = web_links.len(), doc = doc_links.len(), "divided links to webpages and docs");

        Pass1Output {
            results,
            web_links,
            doc_links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::PreProcessor;

    fn publication(title: &str, abstract_text: &str) -> Publication {
        Publication {
            pmid: "12345".to_string(),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            ..Publication::default()
        }
    }

    #[test]
    fn test_tool_title_becomes_top_suggestion() {
        let pp = PreProcessor::new();
        let idf = Idf::default();
        let heuristics = Heuristics::default();
        let pass1 = Pass1::new(&pp, &idf, &heuristics);
        let results = pass1.publication_results(&publication(
            "FooBar: fast alignment of reads",
            "We present FooBar, a tool for aligning reads.",
        ));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tool_title, "FooBar");
        assert_eq!(results[0].suggestions[0].extracted, "FooBar");
        assert_eq!(results[0].pub_ids.pmid, "12345");
    }

    #[test]
    fn test_result_per_tool_title() {
        let pp = PreProcessor::new();
        let idf = Idf::default();
        let heuristics = Heuristics::default();
        let pass1 = Pass1::new(&pp, &idf, &heuristics);
        let results = pass1.publication_results(&publication(
            "FooDB and BarDB: two databases",
            "FooDB stores sequences. BarDB stores structures.",
        ));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].tool_title, "FooDB");
        assert_eq!(results[0].tool_title_others, vec!["BarDB"]);
        assert!(results[0].suggestions.iter().all(|s| s.processed != "bardb"));
        assert_eq!(results[1].tool_title, "BarDB");
    }

    #[test]
    fn test_no_tool_title_still_gives_result() {
        let pp = PreProcessor::new();
        let idf = Idf::default();
        let heuristics = Heuristics::default();
        let pass1 = Pass1::new(&pp, &idf, &heuristics);
        let results = pass1.publication_results(&publication(
            "A long descriptive title with no separator at all",
            "",
        ));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tool_title, "");
    }

    #[test]
    fn test_run_sorts_and_collects_links() {
        let pp = PreProcessor::new();
        let idf = Idf::default();
        let heuristics = Heuristics::default();
        let pass1 = Pass1::new(&pp, &idf, &heuristics);
        let publications = vec![
            publication("A long descriptive title with no separator at all", ""),
            publication(
                "FooBar: fast alignment of reads",
                "FooBar is available at https://github.com/lab/foobar and docs at https://foobar.org/manual.",
            ),
        ];
        let output = pass1.run(&publications, |_| {});
        assert_eq!(output.results.len(), 2);
        assert_eq!(output.results[0].tool_title, "FooBar");
        assert!(output.web_links.iter().any(|l| l.contains("github.com/lab/foobar")));
        assert!(output.doc_links.iter().any(|l| l.contains("foobar.org/manual")));
    }
}
