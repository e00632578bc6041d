//! Heuristic sentence segmentation
//!
//! Dots that do not end a sentence (honorifics, company suffixes, acronyms,
//! decimals, domains, initials, ellipses) are masked with `<prd>` before the
//! text is split on `.`, `?` and `!`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const STARTERS: &str = r"(Mr|Mrs|Ms|Dr|Prof|Capt|Cpt|Lt|He\s|She\s|It\s|They\s|Their\s|Our\s|We\s|But\s|However\s|That\s|This\s|Wherever)";

static PREFIXES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(Mr|St|Mrs|Ms|Dr)[.]").unwrap());

static WEBSITES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.](com|net|org|io|gov|edu|me)").unwrap());

static DECIMALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9])[.]([0-9])").unwrap());

static MULTIPLE_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());

static SPACED_INITIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s([A-Za-z])[.] ").unwrap());

static ACRONYM_BEFORE_STARTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"([A-Z][.][A-Z][.](?:[A-Z][.])?) {}", STARTERS)).unwrap()
});

static THREE_LETTER_ACRONYM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z])[.]([A-Za-z])[.]([A-Za-z])[.]").unwrap());

static TWO_LETTER_ACRONYM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z])[.]([A-Za-z])[.]").unwrap());

static SUFFIX_BEFORE_STARTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r" (Inc|Ltd|Jr|Sr|Co)[.] {}", STARTERS)).unwrap());

static SUFFIXES: Lazy<Regex> = Lazy::new(|| Regex::new(r" (Inc|Ltd|Jr|Sr|Co)[.]").unwrap());

static INITIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r" ([A-Za-z])[.]").unwrap());

/// Force compilation of the segmentation patterns
pub(crate) fn warm_up() {
    Lazy::force(&PREFIXES);
    Lazy::force(&WEBSITES);
    Lazy::force(&DECIMALS);
    Lazy::force(&MULTIPLE_DOTS);
    Lazy::force(&SPACED_INITIAL);
    Lazy::force(&ACRONYM_BEFORE_STARTER);
    Lazy::force(&THREE_LETTER_ACRONYM);
    Lazy::force(&TWO_LETTER_ACRONYM);
    Lazy::force(&SUFFIX_BEFORE_STARTER);
    Lazy::force(&SUFFIXES);
    Lazy::force(&INITIAL);
}

/// Split text into trimmed sentences
pub fn extract_sentences(text: &str) -> Vec<String> {
    let mut text = format!(" {}  ", text).replace('\n', " ");

    text = PREFIXES.replace_all(&text, "${1}<prd>").into_owned();
    text = WEBSITES.replace_all(&text, "<prd>${1}").into_owned();
    text = DECIMALS.replace_all(&text, "${1}<prd>${2}").into_owned();
    text = MULTIPLE_DOTS
        .replace_all(&text, |caps: &Captures| {
            format!("{}<stop>", "<prd>".repeat(caps[0].len()))
        })
        .into_owned();

    if text.contains("Ph.D") {
        text = text.replace("Ph.D.", "Ph<prd>D<prd>");
    }

    text = SPACED_INITIAL.replace_all(&text, " ${1}<prd> ").into_owned();
    text = ACRONYM_BEFORE_STARTER
        .replace_all(&text, "${1}<stop> ${2}")
        .into_owned();
    text = THREE_LETTER_ACRONYM
        .replace_all(&text, "${1}<prd>${2}<prd>${3}<prd>")
        .into_owned();
    text = TWO_LETTER_ACRONYM
        .replace_all(&text, "${1}<prd>${2}<prd>")
        .into_owned();
    text = SUFFIX_BEFORE_STARTER
        .replace_all(&text, " ${1}<stop> ${2}")
        .into_owned();
    text = SUFFIXES.replace_all(&text, " ${1}<prd>").into_owned();
    text = INITIAL.replace_all(&text, " ${1}<prd>").into_owned();

    // Terminal punctuation inside closing quotes belongs to the enclosing sentence
    text = text
        .replace(".\u{201d}", "\u{201d}.")
        .replace(".\"", "\".")
        .replace("!\"", "\"!")
        .replace("?\"", "\"?");

    text = text
        .replace('.', ".<stop>")
        .replace('?', "?<stop>")
        .replace('!', "!<stop>")
        .replace("<prd>", ".");

    let mut sentences: Vec<String> = text
        .split("<stop>")
        .map(|s| s.trim().to_string())
        .collect();

    if sentences.last().is_some_and(|s| s.is_empty()) {
        sentences.pop();
    }

    sentences
}
