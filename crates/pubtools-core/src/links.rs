//! Link handling: splitting glued-together links, deriving a candidate name
//! from a URL, repairing links with trailing sentence debris, and sorting
//! links into bio.tools link, download and documentation types.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::{
    KNOWN_SCHEMA_START, LINK_COMPARE_SCHEMA, LINK_COMPARE_START, PATH_SPLIT, SCHEMA_START, prepend_http,
    trim_url,
};
use crate::config::Heuristics;
use crate::idf::Idf;
use crate::text::TextNormalizer;

static LINK_WWW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^.]*www[^.]*\.").unwrap());
static LINK_END_REMOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.?]\p{Lu}|--)[\p{L}\p{N}'-]*$").unwrap());
static LINK_EMAIL_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[a-zA-Z0-9.-]+\.[a-z]{2,}$").unwrap());
static LINK_EMAIL_REMOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[^/]+@[a-zA-Z0-9.-]+\.[a-z]{2,}$").unwrap());

static PATH_QUERY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\?.*=").unwrap());
static PATH_PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\.[^\p{N}][^.]*$)|(\.$)").unwrap());
static PATH_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[vV-]?\p{N}+(\.\p{N}+)?$").unwrap());
static PATH_ONE_UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^..*\p{Lu}.*$").unwrap());
static PATH_UNI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^uni([\p{L}\p{N}]?-.*|[\p{L}\p{N}]{0,2})$").unwrap());

/// Hosts whose paths never name a tool.
const IGNORED_HOSTS: &[&str] = &[
    "dx.doi.org",
    "doi.org",
    "goo.gl",
    "youtube.com",
    "proteomecentral.proteomexchange.org",
];

pub(crate) static LINK_TWO_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^./]+\.[^./]+$").unwrap());

static FIX_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([.]?["(\[{<>}\])]+[.]?|\.\p{Lu}|--)[\p{L}\p{N}'-]+$"#).unwrap());
static FIX_LINK_KEEP1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.[\p{Ll}\p{N}]+)\p{Lu}[\p{L}\p{N}'-]*$").unwrap());
static FIX_LINK_KEEP2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(/)\.[\p{L}\p{N}'-]*$").unwrap());
static FIX_LINK_EMAIL: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"[.]?[^/.]+@[^/]+\.[^/]+$").unwrap(),
        Regex::new(r"[.]?[^/.]+\.[^/.]+@[^/]+\.[^/]+$").unwrap(),
        Regex::new(r"[.]?[^/.]+\.[^/.]+\.[^/.]+@[^/]+\.[^/]+$").unwrap(),
    ]
});

const HOST_START: &str = r"(?i)^(https?://)?(www\.)?";
const HOST_END: &str = r"([^\p{L}]|$)";
const WORD_START: &str = r"(^|[^\p{L}-])";
const WORD_END: &str = r"([^\p{L}-]|$)";

fn host_pattern(hosts: &str) -> Regex {
    Regex::new(&format!("{HOST_START}({hosts}){HOST_END}")).unwrap()
}

fn word_pattern(words: &str) -> Regex {
    Regex::new(&format!("(?i){WORD_START}({words})s?{WORD_END}")).unwrap()
}

/// Matches a word either standing alone at its end or at its start.
fn either_pattern(prefix: &str, either: &str) -> Regex {
    Regex::new(&format!(
        "(?i){prefix}(({either})s?{WORD_END})|({WORD_START}({either}))"
    ))
    .unwrap()
}

fn extension_pattern(extensions: &str) -> Regex {
    Regex::new(&format!(r"(?i)\.({extensions}){WORD_END}")).unwrap()
}

static LINK_HELPDESK: Lazy<Regex> = Lazy::new(|| word_pattern(r"contact|contactus|help[-_]?desk"));
static LINK_ISSUES: Lazy<Regex> = Lazy::new(|| {
    host_pattern(
        r"github\.com/+[^/]+/+[^/]+/+issues|sourceforge\.net/+p/+[^/]+/+tickets|code\.google\.com/+(archive/+)?p/+[^/]+/+issues|bitbucket\.org/+[^/]+/+[^/]+/+issues",
    )
});
static LINK_LIST_ADDR: Lazy<Regex> = Lazy::new(|| {
    host_pattern(
        r"groups\.google\.com|gitter\.im|sourceforge\.net/+p/+[^/]+/+discussion|sourceforge\.net/+projects/+[^/]+/+lists",
    )
});
static LINK_LIST_BOTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?i){WORD_START}(mailman|listinfo|mailing[-_]?lists?){WORD_END}")).unwrap()
});
static LINK_REGISTRY: Lazy<Regex> = Lazy::new(|| host_pattern(r"mybiosoftware\.com|biocatalogue\.org"));
static LINK_REPOSITORY: Lazy<Regex> = Lazy::new(|| {
    host_pattern(
        r"bioconductor\.org|github\.com|sourceforge\.net|code\.google\.com|cran\.r-project\.org|bitbucket\.org|gitlab\.com|pypi\.(python\.)?org|apps\.cytoscape\.org",
    )
});
static LINK_SOCIAL: Lazy<Regex> = Lazy::new(|| host_pattern(r"twitter\.com|facebook\.com"));

static DOWNLOAD_SRC_CODE: Lazy<Regex> = Lazy::new(|| {
    host_pattern(
        r"git\.bioconductor\.org|github\.com/+[^/]+/+[^/]+/+tree|sourceforge\.net/+projects/+[^/]+/+files|code\.google\.com/+(archive/+)?p/+[^/]+/+source|bitbucket\.org/+[^/]+/+[^/]+/+src",
    )
});
static DOWNLOAD_SRC_PKG: Lazy<Regex> = Lazy::new(|| {
    host_pattern(
        r"github\.com/+[^/]+/+[^/]+/+releases|sourceforge\.net/+projects/+[^/]+/+files/+.+/+download|code\.google\.com/+(archive/+)?p/+[^/]+/+downloads|bitbucket\.org/+[^/]+/+[^/]+/+downloads|apps\.cytoscape\.org/+download",
    )
});
/// Links to archives and executables.
pub static DOWNLOAD_EXT: Lazy<Regex> = Lazy::new(|| extension_pattern("gz|zip|bz2|tar|tgz|7z|rar|xz|jar|exe"));
static DOWNLOAD_FTP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^ftp://").unwrap());
static DOWNLOAD_API: Lazy<Regex> = Lazy::new(|| extension_pattern("wsdl"));
static DOWNLOAD_CONTAINER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("(?i){WORD_START}(docker){WORD_END}")).unwrap());
static DOWNLOAD_CWL: Lazy<Regex> = Lazy::new(|| extension_pattern("cwl"));
static DOWNLOAD_PAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[^\p{Ll}])(?i:download(s|ing)?)([^\p{Ll}]|$)").unwrap());

static DOC_API: Lazy<Regex> = Lazy::new(|| word_pattern("api|apidoc"));
static DOC_CITE: Lazy<Regex> = Lazy::new(|| {
    either_pattern(&format!("({WORD_START}(references|cite|citation)s?{WORD_END})|"), "citing")
});
static DOC_GENERAL: Lazy<Regex> =
    Lazy::new(|| either_pattern("", "faq|about|read[-_]?me|information|overview|description|features"));
static DOC_INSTALL: Lazy<Regex> = Lazy::new(|| either_pattern("", "install|installation|installing"));
static DOC_TERMS: Lazy<Regex> = Lazy::new(|| {
    either_pattern(
        &format!("({WORD_START}(terms|conditions|legal|license|copyright|copying)s?{WORD_END})|"),
        "terms[-_]?of[-_]?use|conditions[-_]?of[-_]?use",
    )
});
static DOC_TRAINING: Lazy<Regex> = Lazy::new(|| either_pattern("", "training|exercise"));
static DOC_TUTORIAL: Lazy<Regex> = Lazy::new(|| {
    either_pattern(
        &format!("({WORD_START}(demo|tour)s?{WORD_END})|"),
        "tutorial|example|(guided|quick)[-_]?tour|getting[-_]?started",
    )
});
const DOC_EITHER: &str = "vignette|manual|documentation|how[-_]?to|introduction|instruction|users?[-_]?guide|beginners?[-_]?guide|start[-_]?guide|quick[-_]?(start|guide)";
static DOC_MANUAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?i)({WORD_START}(usage|guide|how|use)s?{WORD_END})|((help|doc|intro|{DOC_EITHER})s?{WORD_END})|({WORD_START}({DOC_EITHER}))"
    ))
    .unwrap()
});
static DOC_WIKI: Lazy<Regex> = Lazy::new(|| {
    host_pattern(
        r"github\.com/+[^/]+/+[^/]+/+wiki|sourceforge\.net/+p/+[^/]+/wiki|sourceforge\.net/+p/+[^/]+/+home|code\.google\.com/+(archive/+)?p/+[^/]+/+wikis?|bitbucket\.org/+[^/]+/+[^/]+/+wiki",
    )
});
static DOC_EXT: Lazy<Regex> = Lazy::new(|| extension_pattern("pdf|ps|doc|docx|ppt|pptx"));

/// Which bio.tools list a link belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Link,
    Download,
    Documentation,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Link => write!(f, "link"),
            LinkKind::Download => write!(f, "download"),
            LinkKind::Documentation => write!(f, "documentation"),
        }
    }
}

/// A classified link. Two links are equal when their comparison forms and
/// types are equal, whatever their scheme or trailing slash.
#[derive(Debug, Clone, Eq)]
pub struct BiotoolsLink {
    pub url: String,
    pub url_trimmed: String,
    pub kind: LinkKind,
    /// bio.tools type label, e.g. "Repository" or "Source code".
    pub link_type: String,
}

impl BiotoolsLink {
    pub fn new(url: &str, kind: LinkKind, link_type: &str) -> Self {
        let url = prepend_http(url);
        Self {
            url_trimmed: trim_url(&url),
            url,
            kind,
            link_type: link_type.to_string(),
        }
    }

    pub fn link(url: &str, link_type: &str) -> Self {
        Self::new(url, LinkKind::Link, link_type)
    }

    pub fn download(url: &str, link_type: &str) -> Self {
        Self::new(url, LinkKind::Download, link_type)
    }

    pub fn documentation(url: &str, link_type: &str) -> Self {
        Self::new(url, LinkKind::Documentation, link_type)
    }
}

impl PartialEq for BiotoolsLink {
    fn eq(&self, other: &Self) -> bool {
        self.url_trimmed == other.url_trimmed && self.kind == other.kind && self.link_type == other.link_type
    }
}

impl std::hash::Hash for BiotoolsLink {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.url_trimmed.hash(state);
        self.kind.hash(state);
        self.link_type.hash(state);
    }
}

impl fmt::Display for BiotoolsLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.link_type)
    }
}

/// Links sorted by [`make_biotools_links`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedLinks {
    pub links: Vec<BiotoolsLink>,
    pub downloads: Vec<BiotoolsLink>,
    pub documentations: Vec<BiotoolsLink>,
}

impl ClassifiedLinks {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.downloads.is_empty() && self.documentations.is_empty()
    }

    /// The first link of any kind, preferring links, then downloads.
    pub fn first(&self) -> Option<&BiotoolsLink> {
        self.links
            .first()
            .or_else(|| self.downloads.first())
            .or_else(|| self.documentations.first())
    }
}

/// Documentation type of a link, judged from its words.
pub fn documentation_link(link: &str) -> Option<BiotoolsLink> {
    let link_type = if DOC_API.is_match(link) {
        "API documentation"
    } else if DOC_TRAINING.is_match(link) {
        "Training material"
    } else if DOC_TUTORIAL.is_match(link) {
        "Tutorial"
    } else if DOC_INSTALL.is_match(link) {
        "Installation instructions"
    } else if DOC_MANUAL.is_match(link) {
        "Manual"
    } else if DOC_GENERAL.is_match(link) {
        "General"
    } else if DOC_CITE.is_match(link) {
        "Citation instructions"
    } else if DOC_TERMS.is_match(link) {
        "Terms of use"
    } else if DOC_WIKI.is_match(link) {
        "Manual"
    } else {
        return None;
    };
    Some(BiotoolsLink::documentation(link, link_type))
}

/// Classify each link into `into`, first matching rule wins.
pub fn make_biotools_links(links: &[String], into: &mut ClassifiedLinks) {
    for link in links {
        let link = link.as_str();
        if LINK_REGISTRY.is_match(link) {
            into.links.push(BiotoolsLink::link(link, "Registry"));
        } else if DOC_EXT.is_match(link) {
            into.documentations.push(
                documentation_link(link).unwrap_or_else(|| BiotoolsLink::documentation(link, "Manual")),
            );
        } else if DOWNLOAD_EXT.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "Binary package"));
        } else if DOWNLOAD_API.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "API specification"));
        } else if DOWNLOAD_CWL.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "CWL file"));
        } else if DOWNLOAD_CONTAINER.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "Container file"));
        } else if DOWNLOAD_FTP.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "Binaries"));
        } else if DOWNLOAD_SRC_PKG.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "Source package"));
        } else if DOWNLOAD_SRC_CODE.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "Source code"));
        } else if let Some(doc) = documentation_link(link) {
            into.documentations.push(doc);
        } else if LINK_ISSUES.is_match(link) {
            into.links.push(BiotoolsLink::link(link, "Issue tracker"));
        } else if LINK_LIST_ADDR.is_match(link) {
            into.links.push(BiotoolsLink::link(link, "Mailing list"));
        } else if LINK_REPOSITORY.is_match(link) {
            into.links.push(BiotoolsLink::link(link, "Repository"));
        } else if LINK_LIST_BOTH.is_match(link) {
            into.links.push(BiotoolsLink::link(link, "Mailing list"));
        } else if LINK_HELPDESK.is_match(link) {
            into.links.push(BiotoolsLink::link(link, "Helpdesk"));
        } else if LINK_SOCIAL.is_match(link) {
            into.links.push(BiotoolsLink::link(link, "Social media"));
        } else if DOWNLOAD_PAGE.is_match(link) {
            into.downloads.push(BiotoolsLink::download(link, "Downloads page"));
        } else {
            into.links.push(BiotoolsLink::link(link, "Other"));
        }
    }
}

/// Classify a single link.
pub fn classify(link: &str) -> ClassifiedLinks {
    let mut classified = ClassifiedLinks::default();
    make_biotools_links(&[link.to_string()], &mut classified);
    classified
}

/// Split links that have another link glued to their end.
///
/// `all_links` holds every link of the publication in comparison form; a
/// link that starts with a known link followed by a scheme is cut there and
/// the remainder inserted after it.
pub fn break_links(links: &mut Vec<String>, all_links: &[String]) {
    let mut i = 0;
    while i < links.len() {
        let original = links[i].clone();
        let start_end = LINK_COMPARE_START.find(&original).map_or(0, |m| m.end());
        let (start, link) = original.split_at(start_end);

        let mut link_max = 0;
        let mut schema_span = (0, 0);
        for other in all_links {
            if link != other && link.starts_with(other.as_str()) && other.len() > link_max {
                if let Some(m) = LINK_COMPARE_SCHEMA.find(&link[other.len()..]) {
                    link_max = other.len();
                    schema_span = (m.start(), m.end());
                }
            }
        }
        if link_max > 0 {
            links[i] = format!("{start}{}", &link[..link_max]);
            if link_max + schema_span.1 < link.len() {
                links.insert(i + 1, link[link_max + schema_span.0..].to_string());
            }
        } else if let Some(m) = LINK_COMPARE_SCHEMA.find(link) {
            links[i] = format!("{start}{}", &link[..m.start()]);
            if m.end() < link.len() {
                links.insert(i + 1, link[m.start()..].to_string());
            }
        }
        i += 1;
    }
}

/// Derive a candidate tool name from a link.
///
/// Path segments are tried from the end: a segment with an inner uppercase
/// letter or a rare enough word wins outright. Short links fall back to the
/// first host label, and otherwise the rarest segment is kept if it is rare
/// enough. Returns "" when nothing usable is found.
pub fn from_link<N: TextNormalizer + ?Sized>(link: &str, normalizer: &N, idf: &Idf, heuristics: &Heuristics) -> String {
    let weights = heuristics.scoring();
    let mut link = match link.find("://") {
        Some(schema) => &link[schema + 3..],
        None => link,
    }
    .to_string();
    link = LINK_WWW.replacen(&link, 1, "").into_owned();
    link = LINK_END_REMOVE.replacen(&link, 1, "").into_owned();

    let first_slash = link.find('/');

    if let Some(email) = LINK_EMAIL_END.find(&link) {
        if first_slash.is_some() {
            match LINK_EMAIL_REMOVE.find(&link) {
                Some(m) => link.truncate(m.start()),
                None => return String::new(),
            }
        } else {
            link.truncate(email.start());
        }
    }

    let host = match first_slash {
        Some(slash) if slash <= link.len() => &link[..slash],
        _ => link.as_str(),
    };
    if IGNORED_HOSTS.contains(&host) {
        return String::new();
    }

    let mut path_count = 0;
    let mut best_path: Option<String> = None;
    let mut best_path_score = 0.0;

    while let Some(slash) = link.rfind('/') {
        let mut path = link[slash + 1..].to_string();
        link.truncate(slash);

        if path.is_empty() {
            continue;
        }
        path_count += 1;

        if path.starts_with('~') || path.starts_with('∼') || path.starts_with('%') {
            continue;
        }

        if path_count == 1 {
            if let Some(equals) = path.rfind('=') {
                if let Some(query) = path.find('?') {
                    link = format!("{link}/{}", &path[..query]);
                }
                path = path[equals + 1..].to_string();
                if let Some(fragment) = path.find('#') {
                    path = path[fragment + 1..].to_string();
                }
            } else if let Some(fragment) = path.find('#') {
                link = format!("{link}/{}", &path[..fragment]);
                path = path[fragment + 1..].to_string();
            }
        } else if PATH_QUERY.is_match(&path) || path.starts_with('#') {
            continue;
        }

        path = PATH_PERIOD.replacen(&path, 1, "").into_owned();
        if let Some(stripped) = path.strip_suffix(".tar") {
            path = stripped.to_string();
        }
        if PATH_SPLIT.find_iter(&path).nth(1).is_some() {
            path = PATH_SPLIT.replace_all(&path, " ").trim().to_string();
        }

        if path.is_empty() || PATH_NUMBER.is_match(&path) {
            continue;
        }

        let score = idf.get(&normalizer.process(&path).join(""));
        if score > best_path_score {
            best_path = Some(path.clone());
            best_path_score = score;
        }

        if PATH_ONE_UPPERCASE.is_match(&path) || score > weights.path_idf_min {
            return path;
        }
    }

    if path_count < 3 {
        if let Some(period) = link.find('.') {
            let rest = &link[period + 1..];
            let label = &link[..period];
            if label.chars().count() > 1
                && !label.starts_with("bioinf")
                && !label.ends_with("lab")
                && !PATH_UNI.is_match(label)
                && !PATH_NUMBER.is_match(label)
                && rest != "edu"
                && !rest.starts_with("edu.")
                && !rest.starts_with("ac.")
                && !heuristics.is_host_ignored(label)
            {
                return label.to_string();
            }
        }
    }

    match best_path {
        Some(path) if best_path_score > weights.path_idf_min_2 => path,
        _ => String::new(),
    }
}

/// Add repaired variants of links that carry sentence debris, an email or an
/// unknown scheme. The original link is kept, the repaired one is inserted
/// right after it.
pub fn fix_links(links: &mut Vec<String>) {
    let mut i = 0;
    while i < links.len() {
        let link = links[i].clone();
        if let Some(m) = FIX_LINK.find(&link) {
            links.insert(i + 1, link[..m.start()].to_string());
            i += 2;
            continue;
        }
        if let Some(caps) = FIX_LINK_KEEP1.captures(&link) {
            let start = caps.get(0).map_or(0, |m| m.start());
            links.insert(i + 1, format!("{}{}", &link[..start], &caps[1]));
            i += 2;
            continue;
        }
        if let Some(caps) = FIX_LINK_KEEP2.captures(&link) {
            let start = caps.get(0).map_or(0, |m| m.start());
            links.insert(i + 1, format!("{}{}", &link[..start], &caps[1]));
            i += 2;
            continue;
        }
        for email in FIX_LINK_EMAIL.iter() {
            if let Some(m) = email.find(&link) {
                i += 1;
                links.insert(i, link[..m.start()].to_string());
            }
        }
        i += 1;
    }

    let mut i = 0;
    while i < links.len() {
        let link = &links[i];
        if let Some(m) = SCHEMA_START.find(link) {
            if !KNOWN_SCHEMA_START.is_match(link) {
                let fixed = format!("http://{}", &link[m.end()..]);
                i += 1;
                links.insert(i, fixed);
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::PreProcessor;

    fn idf() -> Idf {
        Idf::parse("software\t100\t0.2\nfoo\t5\t0.3\nimage\t50\t0.25\n").unwrap()
    }

    fn name(link: &str) -> String {
        from_link(link, &PreProcessor::new(), &idf(), &Heuristics::default())
    }

    #[test]
    fn test_from_link_uppercase_segment() {
        assert_eq!(name("https://github.com/someone/FooBar"), "FooBar");
        assert_eq!(name("https://github.com/someone/FooBar/"), "FooBar");
    }

    #[test]
    fn test_from_link_host_label() {
        assert_eq!(name("http://www.mytool.org"), "mytool");
        assert_eq!(name("http://mytool.university.edu"), "mytool");
        assert_eq!(name("http://bioinfo.example.org"), "");
    }

    #[test]
    fn test_from_link_ignored_hosts() {
        assert_eq!(name("https://doi.org/10.1093/foo"), "");
        assert_eq!(name("https://github.com"), "");
    }

    #[test]
    fn test_from_link_never_keeps_scheme() {
        for link in ["http://example.org/path/tool.html", "ftp://ftp.tool.org/pub/tool-1.0.tar.gz"] {
            let derived = name(link);
            assert!(!derived.contains("://"), "{derived}");
            assert_eq!(name(&format!("http://example.net/a/{derived}")), derived);
        }
    }

    #[test]
    fn test_break_links() {
        let mut links = vec!["http://foo.org/toolhttp://bar.org".to_string()];
        break_links(&mut links, &["foo.org/tool".to_string(), "bar.org".to_string()]);
        assert_eq!(links, vec!["http://foo.org/tool", "http://bar.org"]);
    }

    #[test]
    fn test_fix_links() {
        let mut links = vec!["http://foo.org/tool.Available".to_string()];
        fix_links(&mut links);
        assert_eq!(links, vec!["http://foo.org/tool.Available", "http://foo.org/tool"]);

        let mut links = vec!["hxxp://foo.org".to_string()];
        fix_links(&mut links);
        assert_eq!(links, vec!["hxxp://foo.org", "http://foo.org"]);
    }

    #[test]
    fn test_classification() {
        let first = |l: &str| classify(l).first().map(|b| (b.kind, b.link_type.clone()));
        assert_eq!(
            first("https://github.com/a/b"),
            Some((LinkKind::Link, "Repository".to_string()))
        );
        assert_eq!(
            first("https://github.com/a/b/releases"),
            Some((LinkKind::Download, "Source package".to_string()))
        );
        assert_eq!(
            first("http://tool.org/manual.pdf"),
            Some((LinkKind::Documentation, "Manual".to_string()))
        );
        assert_eq!(
            first("http://tool.org/tool-1.0.tar.gz"),
            Some((LinkKind::Download, "Binary package".to_string()))
        );
        assert_eq!(
            first("http://tool.org/tutorial"),
            Some((LinkKind::Documentation, "Tutorial".to_string()))
        );
        assert_eq!(first("http://tool.org"), Some((LinkKind::Link, "Other".to_string())));
        assert_eq!(
            first("http://tool.org/downloads"),
            Some((LinkKind::Download, "Downloads page".to_string()))
        );
    }

    #[test]
    fn test_link_equality_ignores_scheme() {
        let a = BiotoolsLink::link("http://www.tool.org/", "Other");
        let b = BiotoolsLink::link("https://tool.org", "Other");
        assert_eq!(a, b);
        assert_ne!(a, BiotoolsLink::link("https://tool.org", "Repository"));
        assert_eq!(a.url, "http://www.tool.org/");
    }
}
