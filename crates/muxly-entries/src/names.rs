//! Label sanitisation helpers.
//!
//! tmux rejects `.` and `:` in session names, and a leading dot would make
//! a label look like a hidden file. Labels are rewritten here so that what
//! the picker shows is exactly the session name tmux will hold.

use std::path::Path;

use muxly_core::path::clean;

/// Rewrite a directory name into a valid session name.
///
/// Leading dots are stripped, interior dots become `_` and colons become `-`.
/// Returns the sanitised name and the number of leading dots removed.
pub fn sanitize_session_name(name: &str) -> (String, usize) {
    let stripped = name.trim_start_matches('.');
    let dots = name.len() - stripped.len();
    (stripped.replace('.', "_").replace(':', "-"), dots)
}

/// Marker appended to labels of dot-directories.
pub fn dotdir_suffix(dots: usize) -> String {
    match dots {
        0 => String::new(),
        1 => " [dotdir]".to_string(),
        n => format!(" [dotdir x{n}]"),
    }
}

/// Sanitise only the final `/`-separated component of a path.
pub fn sanitize_path_for_display(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((head, last)) => format!("{head}/{}", sanitize_session_name(last).0),
        None => sanitize_session_name(path).0,
    }
}

/// The last `depth` components of a path, joined with `/`.
///
/// Asking for more components than exist returns all of them, without the
/// leading separator.
pub fn path_suffix(path: &str, depth: usize) -> String {
    let cleaned = clean(Path::new(path));
    let cleaned = cleaned.to_string_lossy();
    let components: Vec<&str> = cleaned.split('/').filter(|c| !c.is_empty()).collect();
    let start = components.len().saturating_sub(depth);
    components[start..].join("/")
}

/// Prepend an alias, if one is set.
pub fn apply_prefix(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Final component of a path as text, or the whole path if it has none.
pub(crate) fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_session_name() {
        let cases = [
            ("muxly", "muxly", 0),
            (".config", "config", 1),
            ("..double", "double", 2),
            ("...triple", "triple", 3),
            (".", "", 1),
            ("..", "", 2),
            ("", "", 0),
            ("normal.name", "normal_name", 0),
            ("no.leading.dots", "no_leading_dots", 0),
            ("has:colon", "has-colon", 0),
            ("multi:col:ons", "multi-col-ons", 0),
            (".dot:colon", "dot-colon", 1),
            (".mid.dot", "mid_dot", 1),
            ("all.chars:here", "all_chars-here", 0),
        ];

        for (input, name, dots) in cases {
            assert_eq!(
                sanitize_session_name(input),
                (name.to_string(), dots),
                "sanitize_session_name({input:?})"
            );
        }
    }

    #[test]
    fn test_dotdir_suffix() {
        assert_eq!(dotdir_suffix(0), "");
        assert_eq!(dotdir_suffix(1), " [dotdir]");
        assert_eq!(dotdir_suffix(2), " [dotdir x2]");
        assert_eq!(dotdir_suffix(3), " [dotdir x3]");
        assert_eq!(dotdir_suffix(10), " [dotdir x10]");
    }

    #[test]
    fn test_sanitize_path_for_display() {
        let cases = [
            ("", ""),
            ("muxly", "muxly"),
            ("Dev/muxly", "Dev/muxly"),
            ("Dev/.config", "Dev/config"),
            (".config/nvim", ".config/nvim"),
            (".config/.local", ".config/local"),
            ("/absolute/..hidden", "/absolute/hidden"),
            ("Dev/my.project", "Dev/my_project"),
            ("Dev/has:colon", "Dev/has-colon"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                sanitize_path_for_display(input),
                expected,
                "sanitize_path_for_display({input:?})"
            );
        }
    }

    #[test]
    fn test_path_suffix() {
        assert_eq!(path_suffix("/home/user/Dev/muxly", 1), "muxly");
        assert_eq!(path_suffix("/home/user/Dev/muxly", 2), "Dev/muxly");
        assert_eq!(path_suffix("/home/user/Dev/muxly", 3), "user/Dev/muxly");
        assert_eq!(path_suffix("/home/user/Dev/muxly", 10), "home/user/Dev/muxly");
        assert_eq!(path_suffix("/muxly", 1), "muxly");
        assert_eq!(path_suffix("/muxly", 5), "muxly");
        assert_eq!(path_suffix("muxly", 1), "muxly");
        assert_eq!(path_suffix("", 1), ".");
    }

    #[test]
    fn test_apply_prefix() {
        assert_eq!(apply_prefix("", "muxly"), "muxly");
        assert_eq!(apply_prefix("cfg", "muxly"), "cfg/muxly");
        assert_eq!(apply_prefix("my-alias", "project"), "my-alias/project");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename(Path::new("/home/user/.config")), ".config");
        assert_eq!(basename(Path::new("/")), "/");
    }
}
