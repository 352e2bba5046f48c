use thiserror::Error;

pub mod common;
pub mod config;
pub mod config_file;
pub mod description;
pub mod diff;
pub mod evidence;
pub mod homepage;
pub mod idf;
pub mod language;
pub mod license;
pub mod links;
pub mod merge;
pub mod model;
pub mod page;
pub mod pass1;
pub mod pass2;
pub mod ranker;
pub mod registry;
pub mod score2;
pub mod scoring;
pub mod text;
pub mod title;

// Re-export for convenience
pub use config::{Heuristics, HeuristicsBuilder, ListOverride};
pub use idf::Idf;
pub use links::{BiotoolsLink, LinkKind};
pub use model::{
    CorrespAuthor, Diff, Provenance, PubIds, Publication, RegistryEntry, Result1, Result2,
    Suggestion1, Suggestion2,
};
pub use page::{MemoryPageStore, PageError, PageRecord, PageStore, Pages};
pub use pass1::{Pass1, Pass1Output};
pub use pass2::{Pass2, Pass2Output};
pub use text::{PreProcessor, TextNormalizer};

/// Progress events emitted while a pass runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Pass 1 is scoring publication `index` of `total`.
    Publication { index: usize, total: usize },
    /// Pass 2 is refining and matching result `index` of `total`.
    Result { index: usize, total: usize },
    /// Pass 2 is writing out result `index` of `total`.
    Diffing { index: usize, total: usize },
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}
