//! Business-name normalization shared by the on-page name check and the
//! listing lookup retries.

/// Trailing tokens dropped when building the suffix-free variant.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "llc",
    "pllc",
    "llp",
    "lp",
    "corp",
    "corporation",
    "co",
    "company",
    "ltd",
    "limited",
];

/// Removes punctuation: apostrophes vanish (`Joe's` → `Joes`), every other
/// non-alphanumeric character becomes a space, and runs of whitespace
/// collapse to one space.
#[must_use]
pub fn strip_punctuation(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !matches!(c, '\'' | '\u{2019}' | '`') {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drops trailing legal-entity suffixes, always keeping at least one word.
#[must_use]
pub fn remove_legal_suffixes(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();
    while words.len() > 1
        && words
            .last()
            .is_some_and(|w| LEGAL_SUFFIXES.contains(&w.to_lowercase().as_str()))
    {
        words.pop();
    }
    words.join(" ")
}

/// Case- and punctuation-insensitive form used for substring matching.
#[must_use]
pub fn match_key(text: &str) -> String {
    strip_punctuation(text).to_lowercase()
}

/// Query forms to try, in order: the name as given, punctuation stripped,
/// then legal suffixes removed. Duplicates (ignoring case) and blanks are
/// skipped, so at most three forms come back.
#[must_use]
pub fn name_variants(name: &str) -> Vec<String> {
    let original = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = strip_punctuation(&original);
    let without_suffix = remove_legal_suffixes(&stripped);

    let mut variants: Vec<String> = Vec::with_capacity(3);
    for candidate in [original, stripped, without_suffix] {
        if !candidate.is_empty()
            && !variants
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&candidate))
        {
            variants.push(candidate);
        }
    }
    variants
}
