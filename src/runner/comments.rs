//! Comment stripping for test files.
//!
//! Test files are JSON with `//` line comments and `/* */` block comments.
//! Comments inside string literals are left alone. Newlines are kept, even
//! inside block comments, so parse errors still report the right line.

/// Removes comments from `text`.
///
/// # Examples
///
/// ```
/// use apitest::runner::strip_comments;
///
/// let text = "{\n  // the endpoint\n  \"endpoint\": \"http://host/a\" /* inline */\n}";
/// assert_eq!(strip_comments(text), "{\n  \n  \"endpoint\": \"http://host/a\" \n}");
/// ```
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // Line comment; keep the newline
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}
