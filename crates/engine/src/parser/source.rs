//! Trailing `path/to/file.ext:LINE` origin tokens.

/// Split a trailing source token off `text`.
///
/// The token is the last whitespace-separated word, optionally wrapped in
/// `(...)` or `[...]`, shaped like `dir/file.ext:123`: the extension starts
/// with a letter and the line number is all digits. A token is only taken
/// when some message text precedes it.
pub fn split_trailing_source(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    let Some((head, word)) = trimmed.rsplit_once(char::is_whitespace) else {
        return (trimmed, None);
    };
    let token = unwrap_pair(word, '(', ')')
        .or_else(|| unwrap_pair(word, '[', ']'))
        .unwrap_or(word);

    if !is_source_token(token) {
        return (trimmed, None);
    }

    let message = head.trim_end();
    if message.is_empty() {
        return (trimmed, None);
    }
    (message, Some(token))
}

fn unwrap_pair(word: &str, open: char, close: char) -> Option<&str> {
    word.strip_prefix(open)?.strip_suffix(close)
}

fn is_source_token(token: &str) -> bool {
    let Some((path, line)) = token.rsplit_once(':') else {
        return false;
    };
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if path.is_empty()
        || !path
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'/' | b'\\'))
    {
        return false;
    }

    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let Some((stem, ext)) = file.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty()
        && ext.starts_with(|c: char| c.is_ascii_alphabetic())
        && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}
