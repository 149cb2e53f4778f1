//! Heuristics for initials and academic titles in author names

use once_cell::sync::Lazy;
use regex::Regex;

static INITIALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((Dr\.?) ?)?([A-Za-z])(\.| )+([A-Za-z]\.? +)*([A-Za-z]\.? *)$")
        .expect("Invalid initials regex")
});

static INITIAL_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Dr\.? ?|[A-Za-z]\.? *").expect("Invalid initial part regex"));

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+\.? *").expect("Invalid word regex"));

/// Long forms first, so `Professor` is not read as `Prof` + `essor`. A title
/// must end in a dot or at a word boundary (`Drechsler` has no title). An
/// optional lowercase sub-title with a dot follows (`Dr. med.`).
static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[Dd]o[kc]tor|[Pp]rofess?or|[Pp]rof|[Dd]r)(?:\.|\b)(?: [a-z][a-z]+\.)?",
    )
    .expect("Invalid title regex")
});

static LONGFORMS: Lazy<[(Regex, &'static str); 2]> = Lazy::new(|| {
    [
        (
            Regex::new(r"^[Dd]o[kc]tor").expect("Invalid longform regex"),
            "Dr.",
        ),
        (
            Regex::new(r"^[Pp]rofess?or").expect("Invalid longform regex"),
            "Prof.",
        ),
    ]
});

/// Whether a name consists of initials only, optionally after `Dr`.
///
/// `"M. v. B."`, `"M   B"` and `"Dr. M. B."` are initials; `"P. L. Flouquet"`
/// and a lone `"T."` are not.
#[must_use]
pub fn are_initials(name: &str) -> bool {
    INITIALS.is_match(name)
}

/// Normalize initials to `"X. Y."` form.
#[must_use]
pub fn fix_initials(name: &str) -> String {
    INITIAL_PART
        .find_iter(name)
        .map(|m| {
            let part = m.as_str().trim();
            if part.contains('.') {
                part.to_string()
            } else {
                format!("{part}.")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Initials of every word: `"Schmidt-Rottluff"` yields `"S. R."`.
#[must_use]
pub fn get_initials(name: &str) -> String {
    WORD.find_iter(name)
        .filter_map(|m| m.as_str().trim().chars().next())
        .map(|c| format!("{c}."))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a leading academic title off a name.
///
/// The title is normalized (long forms shortened, dots added, capitalized);
/// the rest is trimmed. Without a title the name is returned unchanged.
#[must_use]
pub fn get_title_and_rest(name: &str) -> (String, String) {
    let Some(found) = TITLE.find(name) else {
        return (String::new(), name.to_string());
    };

    let mut title = found.as_str().to_string();
    for (longform, short) in LONGFORMS.iter() {
        if let Some(m) = longform.find(&title) {
            title.replace_range(m.range(), short);
            break;
        }
    }

    let dotted = title
        .split(' ')
        .map(|part| {
            if part.contains('.') {
                part.to_string()
            } else {
                format!("{part}.")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    (capitalize(&dotted), name[found.end()..].trim().to_string())
}

/// First character uppercase, the rest lowercase.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
