//! Turning raw text lines into symbol sequences.

/// Runs of `[A-Za-z0-9_]`; anything else separates words.
pub fn words(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
}

/// A line with a comma is read word by word, otherwise every character is
/// one symbol.
pub fn tokenize(line: &str) -> Vec<String> {
    if line.contains(',') {
        words(line).map(str::to_string).collect()
    } else {
        line.chars().map(|c| c.to_string()).collect()
    }
}

/// Trimmed input lines, without `//` and `#` comment lines.
pub fn input_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !(line.starts_with("//") || line.starts_with('#')))
}
