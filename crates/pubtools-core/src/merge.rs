//! Ordering of Pass 2 results and merging of results that name the same tool.
//!
//! Only included results are merged: once the first result whose top
//! suggestion is not included is reached, the rest are left alone.

use std::cmp::Ordering;

use crate::model::{Result2, Suggestion2, push_unique};
use crate::score2::Score2Weights;

/// Stable sort, results with suggestions first and best top suggestion first.
pub fn sort_results(results: &mut [Result2], score_min: f64) {
    results.sort_by(|a, b| a.rank_cmp(b, score_min));
}

/// Whether the top suggestion of `result` is included; `None` without suggestions.
fn top_included(result: &Result2, weights: &Score2Weights) -> Option<bool> {
    result
        .suggestions
        .first()
        .map(|s| s.include(weights.score_min, weights.score2_min))
}

fn absorb_links(into: &mut Suggestion2, from: Suggestion2) {
    from.links_abstract
        .into_iter()
        .for_each(|l| push_unique(&mut into.links_abstract, l));
    from.links_fulltext
        .into_iter()
        .for_each(|l| push_unique(&mut into.links_fulltext, l));
}

/// Merge `other` into `target`. Suggestions with the same name are joined,
/// the better ranked one keeping its place and taking the other's links.
fn merge_into(target: &mut Result2, mut other: Result2, score_min: f64) {
    target.append_publications(&other);

    let mut i = 0;
    while i < target.suggestions.len() {
        let same = other
            .suggestions
            .iter()
            .position(|s| s.extracted == target.suggestions[i].extracted);
        if let Some(j) = same {
            if target.suggestions[i].rank_cmp(&other.suggestions[j], score_min) == Ordering::Greater {
                let worse = target.suggestions.remove(i);
                absorb_links(&mut other.suggestions[j], worse);
                continue;
            }
            let worse = other.suggestions.remove(j);
            absorb_links(&mut target.suggestions[i], worse);
        }
        i += 1;
    }

    target.suggestions.append(&mut other.suggestions);
    target.suggestions.sort_by(|a, b| a.rank_cmp(b, score_min));
}

/// Merge included results whose top suggestions have the same name.
/// `results` must already be sorted with [`sort_results`].
pub fn merge_results(mut results: Vec<Result2>, weights: &Score2Weights) -> Vec<Result2> {
    let before = results.len();
    let mut removed = vec![false; results.len()];

    'outer: for i in 0..results.len().saturating_sub(1) {
        if removed[i] {
            continue;
        }
        match top_included(&results[i], weights) {
            None => continue,
            Some(false) => break 'outer,
            Some(true) => {}
        }
        for j in i + 1..results.len() {
            if removed[j] {
                continue;
            }
            match top_included(&results[j], weights) {
                None => continue,
                Some(false) => break,
                Some(true) => {}
            }
            let (head, tail) = results.split_at_mut(j);
            let (result_i, result_j) = (&mut head[i], &mut tail[0]);
            if result_i.suggestions[0].extracted == result_j.suggestions[0].extracted {
                merge_into(result_i, std::mem::take(result_j), weights.score_min);
                removed[j] = true;
            }
        }
    }

    let mut index = 0;
    results.retain(|_| {
        let keep = !removed[index];
        index += 1;
        keep
    });
    tracing::info!(pass1 = before, pass2 = results.len(), "merged results");
    results
}

/// Cross-reference results left unmerged whose top suggestions still share
/// a name, by recording each other's first publication.
pub fn fill_same_suggestions(results: &mut [Result2]) {
    for i in 0..results.len().saturating_sub(1) {
        for j in i + 1..results.len() {
            let (head, tail) = results.split_at_mut(j);
            let (result_i, result_j) = (&mut head[i], &mut tail[0]);
            let (Some(top_i), Some(top_j)) = (result_i.suggestions.first(), result_j.suggestions.first()) else {
                continue;
            };
            if top_i.extracted != top_j.extracted {
                continue;
            }
            if let Some(ids) = result_j.pub_ids.first() {
                result_i.same_suggestions.push(ids.clone());
            }
            if let Some(ids) = result_i.pub_ids.first() {
                result_j.same_suggestions.push(ids.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PubIds, Result1, Suggestion1};

    fn result(pmid: &str, suggestions: &[(&str, f64, &str)]) -> Result2 {
        Result2::from(Result1 {
            pub_ids: PubIds::new(pmid, "", ""),
            title: format!("title {pmid}"),
            suggestions: suggestions
                .iter()
                .map(|(name, score, link)| Suggestion1 {
                    score: *score,
                    extracted: name.to_string(),
                    processed: name.to_lowercase(),
                    links_abstract: [link].iter().filter(|l| !l.is_empty()).map(|l| l.to_string()).collect(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_merge_same_top_suggestion() {
        let weights = Score2Weights::default();
        let mut results = vec![
            result("1", &[("FooBar", 2000.0, "https://a.org"), ("Other", 30.0, "")]),
            result("2", &[("FooBar", 1500.0, "https://b.org"), ("Third", 20.0, "")]),
            result("3", &[("BazQux", 1200.0, "")]),
        ];
        sort_results(&mut results, weights.score_min);
        let merged = merge_results(results, &weights);

        assert_eq!(merged.len(), 2);
        let foobar = &merged[0];
        assert_eq!(foobar.pub_ids.len(), 2);
        assert_eq!(foobar.title, vec!["title 1", "title 2"]);
        assert_eq!(foobar.suggestions.len(), 3);
        assert_eq!(foobar.suggestions[0].extracted, "FooBar");
        assert_eq!(
            foobar.suggestions[0].links_abstract,
            vec!["https://a.org", "https://b.org"]
        );
        assert_eq!(merged[1].suggestions[0].extracted, "BazQux");
    }

    #[test]
    fn test_worse_suggestion_gives_up_its_place() {
        let weights = Score2Weights::default();
        let results = vec![
            result("1", &[("FooBar", 3000.0, ""), ("Shared", 1100.0, "https://x.org")]),
            result("2", &[("FooBar", 2000.0, ""), ("Shared", 1500.0, "https://y.org")]),
        ];
        let merged = merge_results(results, &weights);
        assert_eq!(merged.len(), 1);
        let shared: Vec<&Suggestion2> = merged[0]
            .suggestions
            .iter()
            .filter(|s| s.extracted == "Shared")
            .collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].score, 1500.0);
        assert_eq!(shared[0].links_abstract, vec!["https://y.org", "https://x.org"]);
    }

    #[test]
    fn test_not_included_results_stay_apart() {
        let weights = Score2Weights::default();
        let results = vec![
            result("1", &[("lowname", 10.0, "")]),
            result("2", &[("lowname", 5.0, "")]),
        ];
        let mut merged = merge_results(results, &weights);
        assert_eq!(merged.len(), 2);

        fill_same_suggestions(&mut merged);
        assert_eq!(merged[0].same_suggestions, vec![PubIds::new("2", "", "")]);
        assert_eq!(merged[1].same_suggestions, vec![PubIds::new("1", "", "")]);
    }

    #[test]
    fn test_results_without_suggestions_sorted_last() {
        let mut results = vec![result("1", &[]), result("2", &[("FooBar", 5.0, "")])];
        sort_results(&mut results, 1000.0);
        assert_eq!(results[0].pub_ids[0].pmid, "2");
        assert!(results[1].suggestions.is_empty());
    }
}
