// Text helpers used by the stub templates
//
// All functions are pure; the templates receive them as helpers so identifier
// and docstring formatting stays identical across artifacts.

/// Convert a display name to snake_case.
///
/// Every upper-case ASCII letter after the first character gets an underscore
/// in front of it. Runs of capitals are split per letter, so `HTTPSConnection`
/// becomes `h_t_t_p_s_connection`.
pub fn to_snake_case(s: &str) -> String {
	let mut result = String::with_capacity(s.len() + 4);
	for (i, c) in s.chars().enumerate() {
		if c.is_ascii_uppercase() {
			if i > 0 {
				result.push('_');
			}
			result.push(c.to_ascii_lowercase());
		} else {
			result.push(c);
		}
	}
	result
}

/// Make a display name usable as a variable name.
///
/// A leading decimal digit gets an `_` prefix and every `.` becomes `_`.
/// Everything else passes through untouched.
pub fn sanitise_variable_name(s: &str) -> String {
	let mut result = String::with_capacity(s.len() + 1);
	if s.starts_with(|c: char| c.is_ascii_digit()) {
		result.push('_');
	}
	for c in s.chars() {
		result.push(if c == '.' { '_' } else { c });
	}
	result
}

/// Greedily pack whitespace-separated words into lines of at most `limit`
/// characters. A word longer than `limit` sits alone on its own line.
pub fn wrap_text(limit: usize, text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	let mut line_len = 0;

	for word in text.split_whitespace() {
		let word_len = word.chars().count();
		if line_len > 0 {
			if line_len + 1 + word_len > limit {
				result.push('\n');
				line_len = 0;
			} else {
				result.push(' ');
				line_len += 1;
			}
		}
		result.push_str(word);
		line_len += word_len;
	}

	result
}

/// Prefix the first line and every line after an embedded newline with
/// `spaces` spaces.
pub fn indent(spaces: usize, text: &str) -> String {
	let prefix = " ".repeat(spaces);
	let mut result = String::with_capacity(text.len() + spaces);
	result.push_str(&prefix);
	result.push_str(&text.replace('\n', &format!("\n{prefix}")));
	result
}
