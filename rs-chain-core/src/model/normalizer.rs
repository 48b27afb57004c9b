/// Turns raw text into an ordered sequence of lowercase words.
///
/// Every character that is neither an ASCII letter nor ASCII whitespace is
/// dropped, the rest is lowercased and split on runs of whitespace. Digits,
/// punctuation and non-ASCII characters glued to a word vanish without
/// splitting it: `"don't"` becomes `"dont"`, `"a\u{a0}b"` becomes `"ab"`.
pub fn normalize(text: &str) -> Vec<String> {
	let cleaned: String = text
		.chars()
		.filter(|&c| c.is_ascii_alphabetic() || is_space(c))
		.map(|c| c.to_ascii_lowercase())
		.collect();

	cleaned.split(is_space).filter(|word| !word.is_empty()).map(str::to_owned).collect()
}

/// Space, tab, line feed, vertical tab, form feed, carriage return.
fn is_space(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}
