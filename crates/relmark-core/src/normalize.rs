//! # PTB Token Normalization
//!
//! Penn Treebank tokenizers replace brackets with placeholders such as
//! `-LRB-`. Subword vocabularies know the literal characters, so they are
//! mapped back before encoding.

/// Placeholder/literal pairs, matched case-insensitively.
const PTB_BRACKETS: &[(&str, &str)] = &[
    ("-lrb-", "("),
    ("-rrb-", ")"),
    ("-lsb-", "["),
    ("-rsb-", "]"),
    ("-lcb-", "{"),
    ("-rcb-", "}"),
];

/// Map a PTB bracket placeholder to its literal punctuation.
///
/// Any other token is returned unchanged.
///
/// # Examples
/// ```
/// use relmark_core::normalize::normalize_token;
///
/// assert_eq!(normalize_token("-LRB-"), "(");
/// assert_eq!(normalize_token("Gates"), "Gates");
/// ```
pub fn normalize_token(token: &str) -> &str {
    PTB_BRACKETS
        .iter()
        .find(|(placeholder, _)| token.eq_ignore_ascii_case(placeholder))
        .map_or(token, |(_, literal)| *literal)
}

/// Normalize every token of a sentence.
pub fn normalize_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| normalize_token(t.as_ref()).to_string())
        .collect()
}
