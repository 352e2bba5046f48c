use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use pubtools_core::score2::Score2Weights;
use pubtools_core::{Pass1Output, Pass2Output};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn print_count(w: &mut dyn Write, label: &str, count: usize, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "  {:<28} {}", label, count.bold())
    } else {
        writeln!(w, "  {:<28} {}", label, count)
    }
}

fn print_heading(w: &mut dyn Write, heading: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", heading.bold().cyan())
    } else {
        writeln!(w, "{}", heading)
    }
}

/// Print what Pass 1 found.
pub fn print_pass1_summary(
    w: &mut dyn Write,
    output: &Pass1Output,
    score_min: f64,
    color: ColorMode,
) -> std::io::Result<()> {
    let with_suggestions = output.results.iter().filter(|r| !r.suggestions.is_empty()).count();
    let confident = output
        .results
        .iter()
        .filter(|r| r.suggestions.first().is_some_and(|s| s.score >= score_min))
        .count();

    print_heading(w, "Pass 1", color)?;
    print_count(w, "Results", output.results.len(), color)?;
    print_count(w, "With suggestions", with_suggestions, color)?;
    if color.enabled() {
        writeln!(w, "  {:<28} {}", "Confident", confident.green())?;
    } else {
        writeln!(w, "  {:<28} {}", "Confident", confident)?;
    }
    print_count(w, "Web pages to fetch", output.web_links.len(), color)?;
    print_count(w, "Docs to fetch", output.doc_links.len(), color)?;
    Ok(())
}

/// Print what Pass 2 matched, changed and created.
pub fn print_pass2_summary(
    w: &mut dyn Write,
    output: &Pass2Output,
    weights: &Score2Weights,
    color: ColorMode,
) -> std::io::Result<()> {
    let tops = output.rows.iter().filter_map(|r| r.result.suggestions.first());
    let included = tops
        .clone()
        .filter(|s| s.include(weights.score_min, weights.score2_min))
        .count();
    let existing = tops.clone().filter(|s| !s.publication_and_name_existing.is_empty()).count();
    let broken = tops.filter(|s| s.homepage_broken).count();
    let diffs = output.included_diffs().count();

    print_heading(w, "Pass 2", color)?;
    print_count(w, "Results", output.rows.len(), color)?;
    print_count(w, "Included", included, color)?;
    print_count(w, "Already in bio.tools", existing, color)?;
    if color.enabled() {
        writeln!(w, "  {:<28} {}", "Entries to update", diffs.yellow())?;
        writeln!(w, "  {:<28} {}", "New entries", output.new_tools.len().green())?;
    } else {
        writeln!(w, "  {:<28} {}", "Entries to update", diffs)?;
        writeln!(w, "  {:<28} {}", "New entries", output.new_tools.len())?;
    }
    if broken > 0 {
        if color.enabled() {
            writeln!(w, "  {}", format!("({} homepages broken)", broken).dimmed())?;
        } else {
            writeln!(w, "  ({} homepages broken)", broken)?;
        }
    }
    Ok(())
}

/// List the files written into `dir`.
pub fn print_written(w: &mut dyn Write, dir: &Path, files: &[&str], color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    for file in files {
        let path = dir.join(file);
        if color.enabled() {
            writeln!(w, "Wrote {}", path.display().dimmed())?;
        } else {
            writeln!(w, "Wrote {}", path.display())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubtools_core::pass2::Pass2Row;
    use pubtools_core::{Diff, PubIds, Result1, Result2, Suggestion1};

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn result1(pmid: &str, score: Option<f64>) -> Result1 {
        Result1 {
            pub_ids: PubIds::new(pmid, "", ""),
            suggestions: score
                .map(|score| Suggestion1 {
                    score,
                    extracted: "ToolX".to_string(),
                    ..Default::default()
                })
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pass1_summary_counts() {
        let output = Pass1Output {
            results: vec![result1("1", Some(1500.0)), result1("2", Some(20.0)), result1("3", None)],
            web_links: vec!["https://toolx.org".to_string()],
            doc_links: Vec::new(),
        };
        let text = render(|w| print_pass1_summary(w, &output, 1000.0, ColorMode(false)));
        assert!(text.starts_with("Pass 1\n"));
        assert!(text.contains("Results                      3\n"));
        assert!(text.contains("With suggestions             2\n"));
        assert!(text.contains("Confident                    1\n"));
        assert!(text.contains("Web pages to fetch           1\n"));
    }

    #[test]
    fn test_pass2_summary_counts() {
        let mut matched = Result2::from(result1("1", Some(1500.0)));
        matched.suggestions[0].publication_and_name_existing = vec![0];
        let mut broken = Result2::from(result1("2", Some(1200.0)));
        broken.suggestions[0].homepage_broken = true;

        let output = Pass2Output {
            rows: vec![
                Pass2Row {
                    result: matched,
                    ..Default::default()
                },
                Pass2Row {
                    result: broken,
                    ..Default::default()
                },
            ],
            diffs: vec![
                Diff::default(),
                Diff {
                    modify_name: "ToolX".to_string(),
                    ..Default::default()
                },
            ],
            new_tools: Vec::new(),
        };
        let text = render(|w| print_pass2_summary(w, &output, &Score2Weights::default(), ColorMode(false)));
        assert!(text.contains("Included                     2\n"));
        assert!(text.contains("Already in bio.tools         1\n"));
        assert!(text.contains("Entries to update            1\n"));
        assert!(text.contains("New entries                  0\n"));
        assert!(text.contains("(1 homepages broken)"));
    }

    #[test]
    fn test_print_written() {
        let text = render(|w| print_written(w, Path::new("out"), &["results.csv"], ColorMode(false)));
        assert_eq!(text, format!("\nWrote {}\n", Path::new("out").join("results.csv").display()));
    }
}
