//! Link extraction
//!
//! Bare domains ("exemplo.pt/artigo") are accepted when their top-level
//! domain is a common one, and get an `https://` prefix; every candidate
//! must then survive `url::Url::parse` with an http(s) scheme and a host.
//! E-mail addresses are never links, and neither are words glued by a
//! missing space ("ok.obrigado").

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::text::{collapse_whitespace, fold, truncate_chars};

/// Longest title handed to the links module.
pub const MAX_TITLE_CHARS: usize = 180;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://)?(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}(?::\d{1,5})?(?:/\S*)?",
    )
    .unwrap()
});

/// Top-level domains accepted on a bare domain. Links with a scheme may use any.
const BARE_DOMAIN_TLDS: &[&str] = &[
    "pt", "com", "org", "net", "io", "dev", "app", "eu", "es", "br", "uk", "de", "fr", "it",
    "nl", "be", "ch", "us", "ca", "co", "me", "info", "gov", "edu", "ai", "tv", "ly", "gl",
    "blog", "news", "xyz",
];

/// Words that describe the act of saving, not the thing saved.
const TITLE_FILLER: &[&str] = &[
    "guarda", "guardar", "salva", "salvar", "save", "link", "links", "url", "pagina", "site",
    "bookmark", "favoritos", "marcador", "este", "esta", "esse", "essa", "isto", "isso", "ler",
    "ver", "depois", "mais", "tarde", "aqui",
];

/// Connectors trimmed from the ends of a title.
const EDGE_CONNECTORS: &[&str] = &[
    "o", "a", "os", "as", "um", "uma", "de", "do", "da", "para", "em", "no", "na", "e", "-", ":",
];

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

/// A validated link and where it sits in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    pub url: String,
    pub start: usize,
    pub end: usize,
}

/// First valid http(s) link in the text.
pub fn extract_url(text: &str) -> Option<LinkMatch> {
    URL_RE.find_iter(text).find_map(|m| {
        if text[..m.start()].ends_with('@') {
            return None;
        }

        let raw = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        let bare = !has_scheme(raw);
        let candidate = if bare {
            format!("https://{}", raw)
        } else {
            raw.to_string()
        };

        let url = validate(&candidate)?;
        if bare && !has_common_tld(&url) {
            return None;
        }
        Some(LinkMatch {
            url: candidate,
            start: m.start(),
            end: m.start() + raw.len(),
        })
    })
}

/// True when the text holds a valid link.
pub fn has_url(text: &str) -> bool {
    extract_url(text).is_some()
}

/// Title for a saved link: the text minus the URL and save-verb filler.
pub fn extract_link_title(text: &str, link: Option<&LinkMatch>) -> Option<String> {
    let rest = match link {
        Some(l) => format!("{} {}", &text[..l.start], &text[l.end..]),
        None => text.to_string(),
    };

    let mut words: Vec<&str> = rest
        .split_whitespace()
        .filter(|w| !TITLE_FILLER.contains(&fold(w).as_str()))
        .collect();

    while words.first().is_some_and(|w| EDGE_CONNECTORS.contains(w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| EDGE_CONNECTORS.contains(w)) {
        words.pop();
    }

    let title = collapse_whitespace(&words.join(" "));
    if title.is_empty() {
        return None;
    }
    Some(truncate_chars(&title, MAX_TITLE_CHARS))
}

fn has_scheme(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn has_common_tld(url: &Url) -> bool {
    url.host_str()
        .and_then(|host| host.rsplit('.').next())
        .is_some_and(|tld| BARE_DOMAIN_TLDS.contains(&tld))
}

fn validate(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if url.host_str().map_or(true, str::is_empty) {
        return None;
    }
    Some(url)
}
