use std::path::{Path, PathBuf};

/// Parse text pasted by a terminal when files are dragged onto it.
///
/// Terminals differ: some paste one path per line, some separate paths with
/// spaces and shell-quote them, some paste `file://` URIs. A line that names
/// an existing path as a whole is taken verbatim, so unquoted paths with
/// spaces survive.
pub fn parse_drop(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if Path::new(line).exists() {
            paths.push(PathBuf::from(line));
            continue;
        }
        paths.extend(split_words(line).into_iter().map(|w| to_path(&w)));
    }

    paths
}

/// Shell-like word splitting: whitespace separates words except inside
/// quotes or after a backslash.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    word.push(next);
                }
                in_word = true;
            }
            '\'' => {
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    word.push(q);
                }
                in_word = true;
            }
            '"' => {
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => {
                            if let Some(next) = chars.next() {
                                word.push(next);
                            }
                        }
                        _ => word.push(q),
                    }
                }
                in_word = true;
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            _ => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(word);
    }
    words
}

fn to_path(word: &str) -> PathBuf {
    let Some(rest) = word.strip_prefix("file://") else {
        return PathBuf::from(word);
    };

    // `file://host/path`: only the local host forms are meaningful here.
    let path = match rest.find('/') {
        Some(0) => rest,
        Some(i) => &rest[i..],
        None => rest,
    };
    PathBuf::from(percent_decode(path))
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
            if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() {
                out.push(hex_value(hi) << 4 | hex_value(lo));
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
