//! Source-line tokenizer.

/// Splits a line into tokens on spaces, commas and periods.
///
/// The period delimiter turns the `.int` directive into `["int", "<n>"]`
/// and a condition suffix such as `b.eq` into `["b", "eq"]`. Bracket and
/// write-back markers stay attached to their tokens; the parser strips
/// them.
pub(crate) fn tokenize(line: &str) -> Vec<String> {
    line.split(&[' ', ',', '.'][..])
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
