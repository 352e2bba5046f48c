//! Sorting a suggestion's links into bio.tools lists and picking its homepage.
//!
//! Links whose page was never fetched or came back broken are set aside as
//! broken. The homepage is taken from the remaining abstract links first,
//! then full-text links, then any link at all (marking the homepage broken),
//! and as a last resort the publication itself (marking it missing).

use crate::common::{BIOTOOLS_SCHEMA_URL, BIOTOOLS_SCHEMA_URLFTP, prepend_http};
use crate::links::{BiotoolsLink, ClassifiedLinks, DOWNLOAD_EXT, make_biotools_links};
use crate::model::{PubIds, Suggestion2, push_unique};
use crate::page::{PageRecord, Pages};

const HOMEPAGE_DOC_TYPES: &[&str] = &[
    "Manual",
    "Installation instructions",
    "Tutorial",
    "Training material",
    "API documentation",
];

/// Registry placeholder homepage for tools with no usable link.
pub const FALLBACK_HOMEPAGE: &str = "https://bio.tools";

/// Move links without a live page into `broken` and drop links that are not
/// valid registry URLs.
pub fn remove_broken(links: &mut Vec<BiotoolsLink>, broken: &mut Vec<BiotoolsLink>, pages: Pages<'_>, doc: bool, name: &str) {
    links.retain(|link| {
        let live = pages.for_kind(&link.url, doc).is_some_and(|p| !p.broken);
        if !live {
            push_unique(broken, link.clone());
            return false;
        }
        if !BIOTOOLS_SCHEMA_URLFTP.is_match(&link.url) {
            tracing::warn!(url = %link.url, name, "discarded invalid link url");
            return false;
        }
        true
    });
}

fn take_first(links: &mut Vec<BiotoolsLink>, accept: impl Fn(&BiotoolsLink) -> bool) -> Option<String> {
    let index = links
        .iter()
        .position(|l| accept(l) && BIOTOOLS_SCHEMA_URL.is_match(&l.url))?;
    Some(links.remove(index).url)
}

fn plausible_homepage(link: &str) -> bool {
    !DOWNLOAD_EXT.is_match(link) && BIOTOOLS_SCHEMA_URL.is_match(link)
}

/// Pick a homepage among classified links, removing it from its list.
/// Falls back to the first raw link with a live page.
pub fn choose_homepage(raw: &[String], classified: &mut ClassifiedLinks, pages: Pages<'_>) -> Option<String> {
    take_first(&mut classified.links, |l| l.link_type == "Other")
        .or_else(|| take_first(&mut classified.links, |l| l.link_type == "Repository"))
        .or_else(|| take_first(&mut classified.documentations, |l| l.link_type == "General"))
        .or_else(|| {
            take_first(&mut classified.documentations, |l| {
                HOMEPAGE_DOC_TYPES.contains(&l.link_type.as_str())
            })
        })
        .or_else(|| {
            raw.iter().map(|l| prepend_http(l)).find(|link| {
                let live = |page: Option<PageRecord>| page.is_some_and(|p| !p.broken);
                (live(pages.webpage(link)) || live(pages.doc(link))) && plausible_homepage(link)
            })
        })
}

fn classified(links: &[String], suggestion: &mut Suggestion2, pages: Pages<'_>, name: &str) -> ClassifiedLinks {
    let mut classified = ClassifiedLinks::default();
    make_biotools_links(links, &mut classified);
    remove_broken(&mut classified.links, &mut suggestion.broken_links, pages, false, name);
    remove_broken(&mut classified.downloads, &mut suggestion.broken_links, pages, false, name);
    remove_broken(&mut classified.documentations, &mut suggestion.broken_links, pages, true, name);
    classified
}

/// Fill the homepage and the link, download and documentation lists of
/// `suggestion`. `name` is only used in log messages.
pub fn divide_links(suggestion: &mut Suggestion2, pub_ids: &[PubIds], pages: Pages<'_>, name: &str) {
    let links_abstract = suggestion.links_abstract.clone();
    let links_fulltext = suggestion.links_fulltext.clone();

    let mut from_abstract = classified(&links_abstract, suggestion, pages, name);
    let mut homepage = choose_homepage(&links_abstract, &mut from_abstract, pages);
    let mut from_fulltext = classified(&links_fulltext, suggestion, pages, name);
    if homepage.is_none() {
        homepage = choose_homepage(&links_fulltext, &mut from_fulltext, pages);
    }

    if homepage.is_none() {
        homepage = links_abstract
            .iter()
            .chain(&links_fulltext)
            .map(|l| prepend_http(l))
            .find(|l| plausible_homepage(l));
        suggestion.homepage_broken = homepage.is_some();
    }

    match homepage {
        Some(homepage) => suggestion.homepage = homepage,
        None => {
            suggestion.homepage = pub_ids
                .iter()
                .find_map(PubIds::link)
                .unwrap_or_else(|| FALLBACK_HOMEPAGE.to_string());
            suggestion.homepage_missing = true;
        }
    }

    suggestion.add_link_links(from_abstract.links);
    suggestion.add_link_links(from_fulltext.links);
    suggestion.add_download_links(from_abstract.downloads);
    suggestion.add_download_links(from_fulltext.downloads);
    suggestion.add_documentation_links(from_abstract.documentations);
    suggestion.add_documentation_links(from_fulltext.documentations);
    suggestion.remove_homepage_from_links();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Suggestion1;
    use crate::page::MemoryPageStore;

    fn store() -> MemoryPageStore {
        let store = MemoryPageStore::new();
        for url in ["https://foobar.org", "https://github.com/lab/foobar"] {
            store.insert_webpage(PageRecord {
                start_url: url.to_string(),
                ..PageRecord::default()
            });
        }
        store.insert_webpage(PageRecord {
            start_url: "https://dead.org".to_string(),
            broken: true,
            ..PageRecord::default()
        });
        store.insert_doc(PageRecord {
            start_url: "https://foobar.org/manual".to_string(),
            ..PageRecord::default()
        });
        store
    }

    fn suggestion(links_abstract: &[&str], links_fulltext: &[&str]) -> Suggestion2 {
        Suggestion2::from(Suggestion1 {
            extracted: "FooBar".to_string(),
            links_abstract: links_abstract.iter().map(|l| l.to_string()).collect(),
            links_fulltext: links_fulltext.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_other_link_becomes_homepage() {
        let store = store();
        let mut s = suggestion(
            &[
                "https://github.com/lab/foobar",
                "https://foobar.org",
                "https://foobar.org/manual",
                "https://dead.org",
            ],
            &[],
        );
        divide_links(&mut s, &[], Pages::new(&store), "FooBar");
        assert_eq!(s.homepage, "https://foobar.org");
        assert!(!s.homepage_broken && !s.homepage_missing);
        assert_eq!(s.link_links.len(), 1);
        assert_eq!(s.link_links[0].link_type, "Repository");
        assert_eq!(s.documentation_links.len(), 1);
        assert_eq!(s.documentation_links[0].link_type, "Manual");
        assert_eq!(s.broken_links.len(), 1);
        assert_eq!(s.broken_links[0].url, "https://dead.org");
    }

    #[test]
    fn test_abstract_links_win_over_fulltext() {
        let store = store();
        let mut s = suggestion(&["https://foobar.org/manual"], &["https://github.com/lab/foobar"]);
        divide_links(&mut s, &[], Pages::new(&store), "FooBar");
        assert_eq!(s.homepage, "https://foobar.org/manual");
        assert_eq!(s.link_links[0].link_type, "Repository");
        assert!(s.documentation_links.is_empty());
    }

    #[test]
    fn test_broken_homepage() {
        let store = store();
        let mut s = suggestion(&["https://dead.org"], &[]);
        divide_links(&mut s, &[], Pages::new(&store), "FooBar");
        assert_eq!(s.homepage, "https://dead.org");
        assert!(s.homepage_broken);
        assert!(!s.homepage_missing);
    }

    #[test]
    fn test_missing_homepage() {
        let store = store();
        let mut s = suggestion(&[], &[]);
        divide_links(&mut s, &[PubIds::new("", "PMC1", "")], Pages::new(&store), "FooBar");
        assert_eq!(s.homepage, "https://www.ncbi.nlm.nih.gov/pmc/articles/PMC1/");
        assert!(s.homepage_missing);

        let mut s = suggestion(&[], &[]);
        divide_links(&mut s, &[], Pages::new(&store), "FooBar");
        assert_eq!(s.homepage, FALLBACK_HOMEPAGE);
    }
}
