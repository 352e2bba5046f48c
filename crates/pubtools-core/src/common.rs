//! Patterns and string helpers shared by both passes.
//!
//! Most of this module deals with three things: comparing URLs loosely
//! (scheme, `www.` and trailing slashes ignored), trimming generic words and
//! version suffixes off tool titles, and deciding whether a short string is an
//! acronym of a longer phrase.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

pub static SCHEMA_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").unwrap());
pub static KNOWN_SCHEMA_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(http|https|ftp)://").unwrap());

pub static LINK_COMPARE_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^((http|https|ftp)://)?(www\.)?").unwrap());
static LINK_COMPARE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"/+$").unwrap());
static LINK_COMPARE_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/+index\.[\p{L}\p{N}]+$").unwrap());
/// What may follow a shorter link inside a longer one for the two to still be
/// the same link (a glued-on sentence, bracket or email).
pub static LINK_COMPARE_REST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(\p{Ll}\p{Lu}|./*[.]?["(\[{<>}\])]+[.]?|.\.\p{Lu}[\p{L}\p{N}'-]|//*\.|./+\.|./*--|./*[^/]+@[^/]+\.[^/]+)[\p{L}\p{N}'-]*$"#,
    )
    .unwrap()
});
pub static LINK_COMPARE_SCHEMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(http|https|ftp)://").unwrap());

pub static PATH_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]").unwrap());

static USE_IN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\p{N}]$").unwrap());

const TOOL_TITLE_GENERAL: &str = "database|data|web|server|webserver|web-server|package|toolkit|toolbox|suite|toolsuite|tools|tool|kit|framework|workbench|pipeline|software|program|platform|project|resource|r";
static TOOL_TITLE_PRUNE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(update|v|ver|version|(v|ver|version)?\p{{N}}+([.-]\p{{N}}+)*|{TOOL_TITLE_GENERAL})$"
    ))
    .unwrap()
});
pub static TOOL_TITLE_TRIM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"( ?(db|v|ver|version|update))*( ?\p{N}{0,4})?( ?(db|v|ver|version|update))*$")
        .unwrap()
});

pub static BIOTOOLS_EXTRACTED_VERSION_TRIM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?([vV](er(sion)?)?)? ?\p{N}+([.-]\p{N}+)*$").unwrap());
pub static BIOTOOLS_PROCESSED_VERSION_TRIM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?([v](er(sion)?)?)? ?\p{N}+$").unwrap());

pub static TITLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(: | - |--a |--an |--|-a |-an |:a |:an |, a |, an |\n|\r|\|)").unwrap()
});
pub static WEBPAGE_TITLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\||---|--| - |::|: | // | / | @ | < | > |«|»|·|•|\n|\r|, a |, an )")
        .unwrap()
});

/// Exponent applied to unigram IDF when scoring candidates.
pub const QUERY_IDF_SCALING: i32 = 2;

pub static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Z}\p{Cc}\p{Cf}]+").unwrap());

pub static BIOTOOLS_SCHEMA_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());
pub static BIOTOOLS_SCHEMA_URLFTP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?|s?ftp)://[^\s/$.?#].[^\s]*$").unwrap());

static PUNCTUATION_NUMBERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{P}\p{S}\p{N}]+").unwrap());
static NAME_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \-\x{2010}]+").unwrap());

static DOI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^((https?://)?(dx\.)?doi\.org/|doi: *)").unwrap());

/// True for a single letter or number character.
pub fn is_letter_or_number(c: char) -> bool {
    let mut buf = [0u8; 4];
    USE_IN_PATTERN.is_match(c.encode_utf8(&mut buf))
}

/// A character as it goes into a hand-built pattern: letters and numbers
/// literally, anything else as a wildcard.
pub fn pattern_char(c: char) -> String {
    if is_letter_or_number(c) {
        regex::escape(c.encode_utf8(&mut [0u8; 4]))
    } else {
        ".".to_string()
    }
}

/// Java-style `String.trim()`: strips ASCII control characters and spaces only.
pub fn trim_ascii(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}

pub fn prepend_http(url: &str) -> String {
    if SCHEMA_START.is_match(url) {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Comparison form of a URL: no scheme, no `www.`, no trailing slash or
/// `index.*`, host uppercased.
pub fn trim_url(url: &str) -> String {
    let url = LINK_COMPARE_START.replacen(url, 1, "");
    let url = LINK_COMPARE_END.replacen(&url, 1, "");
    let url = LINK_COMPARE_INDEX.replacen(&url, 1, "");
    match url.find('/') {
        None => url.to_uppercase(),
        Some(slash) => format!("{}{}", url[..slash].to_uppercase(), &url[slash..]),
    }
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut to at most `max_length` characters, marking the cut with ` ...`.
pub fn prune_to_max(s: &str, max_length: usize) -> String {
    if char_len(s) <= max_length {
        s.to_string()
    } else if max_length < 1 {
        String::new()
    } else if max_length < 5 {
        s.chars().take(max_length).collect()
    } else {
        let mut pruned: String = s.chars().take(max_length - 4).collect();
        pruned.push_str(" ...");
        pruned
    }
}

/// Pad with `+` up to `min_length` characters.
pub fn fill_to_min(s: &str, min_length: usize) -> String {
    let len = char_len(s);
    if len >= min_length {
        s.to_string()
    } else if len + 1 == min_length {
        format!("{s}+")
    } else {
        format!("{s} {}", "+".repeat(min_length - len - 1))
    }
}

/// Pattern fragment for one acronym character. A letter may also be reached
/// by skipping over a run of letters that ends right before its uppercase
/// form (`BLAST` in `BasicLocalAlignment...`).
fn acronym_char(c: char) -> String {
    let escaped = regex::escape(c.encode_utf8(&mut [0u8; 4]));
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if u.is_uppercase() => format!(
            r"(?:\p{{L}}+(?-i:{})|{escaped})",
            regex::escape(u.encode_utf8(&mut [0u8; 4]))
        ),
        _ => escaped,
    }
}

/// Whether `acronym` abbreviates `phrase`.
///
/// With `all_words` every word of the phrase must take part and the match is
/// anchored at both ends, otherwise any run of words may. A match confined to
/// a single word does not count: its last character is dropped and the search
/// repeated.
pub fn is_acronym(acronym: &str, phrase: &str, all_words: bool) -> bool {
    let acronym = trim_ascii(acronym);
    let mut phrase = trim_ascii(phrase).replace('-', " ");

    let mut pattern = String::from("(?i)");
    pattern.push_str(if all_words { "^" } else { "(^| )" });
    let mut valid = false;
    if phrase.contains(' ') && !acronym.contains(' ') {
        for c in acronym.chars().filter(|c| is_letter_or_number(*c)) {
            if valid {
                pattern.push_str(if all_words { "[^ ]* *" } else { "([^ ]*|.* )" });
            }
            valid = true;
            pattern.push_str(r"[^ \p{L}\p{N}]*");
            pattern.push_str(&acronym_char(c));
        }
    }
    if all_words {
        pattern.push_str("[^ ]*$");
    }
    if !valid {
        return false;
    }
    let Ok(re) = Regex::new(&pattern) else {
        return false;
    };

    loop {
        let Some(m) = re.find(&phrase) else {
            return false;
        };
        if trim_ascii(m.as_str()).contains(' ') {
            return true;
        }
        let end = m.end();
        let Some((last, _)) = phrase[..end].char_indices().next_back() else {
            return false;
        };
        phrase = if &phrase[last..end] == " " {
            let Some((before, _)) = phrase[..last].char_indices().next_back() else {
                return false;
            };
            format!("{}{}", &phrase[..before], &phrase[last..])
        } else {
            format!("{}{}", &phrase[..last], &phrase[end..])
        };
    }
}

/// Drop leading and trailing generic words ("tool", "v2", "database", ...)
/// from an extracted title and join what is left.
pub fn tool_title_prune(words: &mut Vec<String>) -> String {
    while words.first().is_some_and(|w| TOOL_TITLE_PRUNE.is_match(w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| TOOL_TITLE_PRUNE.is_match(w)) {
        words.pop();
    }
    words.join(" ")
}

fn normalise_credit_name(name: &str) -> Vec<String> {
    let name = name.replace('.', ". ");
    let name = WHITESPACE.replace_all(&name, " ");
    NAME_SEPARATOR
        .split(trim_ascii(&name))
        .map(|part| PUNCTUATION_NUMBERS.replace_all(part, "").into_owned())
        .filter(|part| {
            char_len(part) > 1
                && !part.eq_ignore_ascii_case("dr")
                && !part.eq_ignore_ascii_case("prof")
        })
        .map(|part| part.to_lowercase().nfkd().collect())
        .collect()
}

/// Person names are equal when first and last name parts agree, or when a
/// single-part name equals the other's last (first) part.
pub fn credit_name_equal(name1: &str, name2: &str) -> bool {
    if name1.is_empty() || name2.is_empty() {
        return false;
    }
    let n1 = normalise_credit_name(name1);
    let n2 = normalise_credit_name(name2);
    let (Some(first1), Some(last1)) = (n1.first(), n1.last()) else {
        return false;
    };
    let (Some(first2), Some(last2)) = (n2.first(), n2.last()) else {
        return false;
    };
    if n1.len() >= 2 && n2.len() >= 2 {
        first1 == first2 && last1 == last2
    } else if n1.len() < 2 {
        first1 == last2
    } else {
        first2 == last1
    }
}

pub fn credit_orcid_equal(orcid1: &str, orcid2: &str) -> bool {
    if orcid1.is_empty() || orcid2.is_empty() {
        return false;
    }
    trim_url(orcid1) == trim_url(orcid2)
}

/// Emails are equal ignoring case and periods in the user part.
pub fn credit_email_equal(email1: &str, email2: &str) -> bool {
    if email1.is_empty() || email2.is_empty() {
        return false;
    }
    let (Some((user1, domain1)), Some((user2, domain2))) =
        (email1.split_once('@'), email2.split_once('@'))
    else {
        return false;
    };
    if user1.is_empty() || domain1.is_empty() || user2.is_empty() || domain2.is_empty() {
        return false;
    }
    user1.replace('.', "").to_lowercase() == user2.replace('.', "").to_lowercase()
        && domain1.to_lowercase() == domain2.to_lowercase()
}

/// DOI without resolver prefix, lowercased.
pub fn normalise_doi(doi: &str) -> String {
    DOI_PREFIX.replacen(doi.trim(), 1, "").to_lowercase()
}
