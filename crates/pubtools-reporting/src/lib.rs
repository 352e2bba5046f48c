//! Reports written after each pass: the link lists of Pass 1 and the
//! tab-separated result and diff tables of Pass 2.

mod export;

pub use export::{DIFF_COLUMNS, Pass2Report, RESULTS_COLUMNS, export_link_lists, quote_field};
