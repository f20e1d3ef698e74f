//! Helpers for text arriving through bracketed paste.
//!
//! Terminals deliver dropped files as a paste of their paths, so the same
//! text is either inserted into the prompt or parsed back into paths when
//! the uploader has focus.

use std::path::PathBuf;

/// Sanitize pasted text to prevent TUI corruption
///
/// - Converts tabs to 4 spaces
/// - Converts carriage returns to newlines
/// - Filters out control characters except newlines
pub fn sanitize_pasted_text(text: &str) -> String {
    let without_crlf = text.replace("\r\n", "\n");
    let without_cr = without_crlf.replace('\r', "\n");
    let expanded_tabs = without_cr.replace('\t', "    ");
    expanded_tabs
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .collect()
}

/// Parses the paths a terminal pastes when files are dropped onto it.
///
/// Handles one path per line, several shell-quoted or backslash-escaped
/// paths on a single line, and `file://` URIs. A line that names an
/// existing path verbatim is taken as-is so unescaped spaces survive.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let verbatim = strip_file_scheme(line);
        if std::path::Path::new(&verbatim).exists() {
            paths.push(PathBuf::from(verbatim));
            continue;
        }
        paths.extend(
            split_shell_words(line)
                .into_iter()
                .map(|word| PathBuf::from(strip_file_scheme(&word))),
        );
    }
    paths
}

fn strip_file_scheme(word: &str) -> String {
    match word.strip_prefix("file://") {
        Some(rest) => percent_decode(rest),
        None => word.to_string(),
    }
}

fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn split_shell_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_paste_text_removes_control_characters() {
        let input = "Hello\tworld\r\nThis is\x07fine";
        assert_eq!(sanitize_pasted_text(input), "Hello    world\nThis isfine");
    }

    #[test]
    fn plain_and_quoted_paths() {
        assert_eq!(
            parse_dropped_paths("/tmp/cat.png"),
            vec![PathBuf::from("/tmp/cat.png")]
        );
        assert_eq!(
            parse_dropped_paths("'/tmp/my cat.png' \"/tmp/dog.jpg\""),
            vec![
                PathBuf::from("/tmp/my cat.png"),
                PathBuf::from("/tmp/dog.jpg")
            ]
        );
    }

    #[test]
    fn backslash_escaped_spaces() {
        assert_eq!(
            parse_dropped_paths("/tmp/my\\ cat.png"),
            vec![PathBuf::from("/tmp/my cat.png")]
        );
    }

    #[test]
    fn file_uris_are_decoded() {
        assert_eq!(
            parse_dropped_paths("file:///tmp/my%20cat.png\nfile:///tmp/b.jpg"),
            vec![PathBuf::from("/tmp/my cat.png"), PathBuf::from("/tmp/b.jpg")]
        );
    }

    #[test]
    fn existing_path_with_spaces_is_kept_whole() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holiday photo.png");
        std::fs::write(&path, b"png").unwrap();

        let pasted = format!("  {}  \n", path.display());
        assert_eq!(parse_dropped_paths(&pasted), vec![path]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(parse_dropped_paths(" \n\n").is_empty());
    }
}
