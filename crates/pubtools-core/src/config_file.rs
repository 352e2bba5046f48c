use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub paths: Option<PathsConfig>,
    pub scoring: Option<ScoringConfig>,
    pub words: Option<WordListsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub publications: Option<String>,
    pub idf: Option<String>,
    pub registry: Option<String>,
    pub pages: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub suggestion_limit: Option<usize>,
    pub top_score_limit: Option<f64>,
    pub tool_title_multiplier: Option<f64>,
    pub link_multiplier_abstract: Option<f64>,
    pub score_min: Option<f64>,
    pub score2_min: Option<f64>,
}

/// A word list setting: `replace` swaps out the built-in list, `extend`
/// appends to it. `replace` wins when both are given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListSetting {
    pub replace: Option<Vec<String>>,
    pub extend: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordListsConfig {
    pub before_tier1: Option<ListSetting>,
    pub before_tier2: Option<ListSetting>,
    pub before_tier3: Option<ListSetting>,
    pub after_tier1: Option<ListSetting>,
    pub after_tier2: Option<ListSetting>,
    pub after_tier3: Option<ListSetting>,
    pub host_ignore: Option<ListSetting>,
    pub licenses: Option<ListSetting>,
    pub languages: Option<ListSetting>,
    pub language_keywords: Option<ListSetting>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Platform config directory path: `<config_dir>/pubtools/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pubtools").join("config.toml"))
}

/// Load config by cascading CWD `.pubtools.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pubtools.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring unparsable config {}: {}", path.display(), e);
            None
        }
    }
}

/// Load a config the user explicitly asked for; unlike [`load_from_path`]
/// a missing or broken file is an error.
pub fn load_required(path: &Path) -> Result<ConfigFile, CoreError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn pick<S, T: Clone>(base: &Option<S>, overlay: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bp, op) = (&base.paths, &overlay.paths);
    let (bs, os) = (&base.scoring, &overlay.scoring);
    let (bw, ow) = (&base.words, &overlay.words);
    let (bl, ol) = (&base.logging, &overlay.logging);
    ConfigFile {
        paths: Some(PathsConfig {
            publications: pick(bp, op, |p| p.publications.clone()),
            idf: pick(bp, op, |p| p.idf.clone()),
            registry: pick(bp, op, |p| p.registry.clone()),
            pages: pick(bp, op, |p| p.pages.clone()),
            output_dir: pick(bp, op, |p| p.output_dir.clone()),
        }),
        scoring: Some(ScoringConfig {
            suggestion_limit: pick(bs, os, |s| s.suggestion_limit),
            top_score_limit: pick(bs, os, |s| s.top_score_limit),
            tool_title_multiplier: pick(bs, os, |s| s.tool_title_multiplier),
            link_multiplier_abstract: pick(bs, os, |s| s.link_multiplier_abstract),
            score_min: pick(bs, os, |s| s.score_min),
            score2_min: pick(bs, os, |s| s.score2_min),
        }),
        words: Some(WordListsConfig {
            before_tier1: pick(bw, ow, |w| w.before_tier1.clone()),
            before_tier2: pick(bw, ow, |w| w.before_tier2.clone()),
            before_tier3: pick(bw, ow, |w| w.before_tier3.clone()),
            after_tier1: pick(bw, ow, |w| w.after_tier1.clone()),
            after_tier2: pick(bw, ow, |w| w.after_tier2.clone()),
            after_tier3: pick(bw, ow, |w| w.after_tier3.clone()),
            host_ignore: pick(bw, ow, |w| w.host_ignore.clone()),
            licenses: pick(bw, ow, |w| w.licenses.clone()),
            languages: pick(bw, ow, |w| w.languages.clone()),
            language_keywords: pick(bw, ow, |w| w.language_keywords.clone()),
        }),
        logging: Some(LoggingConfig {
            level: pick(bl, ol, |l| l.level.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip_toml() {
        let config = ConfigFile {
            paths: Some(PathsConfig {
                idf: Some("/tmp/tool.idf".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.paths.unwrap().idf.unwrap(), "/tmp/tool.idf");
    }

    #[test]
    fn word_lists_parse() {
        let toml_str = "[words.host_ignore]\nextend = [\"example\"]\n\n[words.before_tier1]\nreplace = [\"called\"]\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let words = parsed.words.unwrap();
        assert_eq!(words.host_ignore.unwrap().extend.unwrap(), vec!["example"]);
        assert_eq!(words.before_tier1.unwrap().replace.unwrap(), vec!["called"]);
        assert!(words.after_tier1.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            scoring: Some(ScoringConfig {
                suggestion_limit: Some(3),
                top_score_limit: Some(10.0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            scoring: Some(ScoringConfig {
                suggestion_limit: Some(7),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay).scoring.unwrap();
        assert_eq!(merged.suggestion_limit, Some(7));
        assert_eq!(merged.top_score_limit, Some(10.0));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            logging: Some(LoggingConfig {
                level: Some("debug".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.logging.unwrap().level.unwrap(), "debug");
    }

    #[test]
    fn load_required_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[paths\n").unwrap();
        assert!(matches!(load_required(&path), Err(CoreError::Toml(_))));
        assert!(load_from_path(&path).is_none());
        assert!(matches!(
            load_required(&dir.path().join("missing.toml")),
            Err(CoreError::Io(_))
        ));
    }
}
