//! Path expression resolution.
//!
//! Configuration paths are written the way a user types them in a shell:
//! absolute (`/srv/code`), home-relative (`~`, `~/Dev`) or through an
//! environment variable (`$WORK/repos`, `${XDG_DATA_HOME}/notes`). Every
//! such expression is resolved to a cleaned absolute path. Bare relative
//! forms are rejected since they would depend on wherever muxly happened
//! to be launched from.

use std::env;
use std::path::{Component, Path, PathBuf};

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::PathError;

lazy_static! {
    static ref ENV_VAR: Regex =
        Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
            .expect("env var pattern is valid");
}

/// Resolve a path expression into a cleaned absolute path.
///
/// # Examples
///
/// ```
/// use muxly_core::path::resolve_path;
/// use std::path::PathBuf;
///
/// assert_eq!(resolve_path("/srv//code/./app/").unwrap(), PathBuf::from("/srv/code/app"));
/// assert!(resolve_path("./app").is_err());
/// ```
pub fn resolve_path(expr: &str) -> Result<PathBuf, PathError> {
    resolve_with(expr, dirs::home_dir, |name| env::var(name).ok())
}

/// Resolution with injectable home directory and environment lookups.
pub(crate) fn resolve_with<H, V>(expr: &str, home: H, var: V) -> Result<PathBuf, PathError>
where
    H: Fn() -> Option<PathBuf>,
    V: Fn(&str) -> Option<String>,
{
    let expr = expr.trim();

    if matches!(expr, "." | "..") || expr.starts_with("./") || expr.starts_with("../") {
        return Err(PathError::Relative(expr.to_string()));
    }

    let expanded = expand_vars(expr, &var)?;

    let path = if expanded == "~" {
        home().ok_or(PathError::NoHomeDir)?
    } else if let Some(rest) = expanded.strip_prefix("~/") {
        home().ok_or(PathError::NoHomeDir)?.join(rest)
    } else {
        PathBuf::from(&expanded)
    };

    if !path.is_absolute() {
        return Err(PathError::Unsupported(expr.to_string()));
    }

    Ok(clean(&path))
}

fn expand_vars<V>(expr: &str, var: &V) -> Result<String, PathError>
where
    V: Fn(&str) -> Option<String>,
{
    let mut missing = None;
    let expanded = ENV_VAR.replace_all(expr, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        match var(name) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(PathError::UndefinedVariable(name)),
        None => Ok(expanded.into_owned()),
    }
}

/// Lexically clean a path: drop `.` components, pop on `..`, and remove
/// redundant and trailing separators. The filesystem is never consulted.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Whether an ignore entry names a location (`~/Dev/old`, `/tmp/x`,
/// `$WORK/archive`) rather than a bare directory name (`target`).
pub fn is_path_like(entry: &str) -> bool {
    entry.contains('/') || entry.starts_with('~') || entry.starts_with('$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Option<PathBuf> {
        Some(PathBuf::from("/home/user"))
    }

    fn no_home() -> Option<PathBuf> {
        None
    }

    fn env(name: &str) -> Option<String> {
        match name {
            "WORK" => Some("/srv/work".to_string()),
            "REL" => Some("projects".to_string()),
            "HOME" => Some("/home/user".to_string()),
            _ => None,
        }
    }

    fn resolve(expr: &str) -> Result<PathBuf, PathError> {
        resolve_with(expr, home, env)
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(resolve("/srv/code").unwrap(), PathBuf::from("/srv/code"));
    }

    #[test]
    fn test_absolute_path_is_cleaned() {
        assert_eq!(
            resolve("/srv//code/./app/../lib/").unwrap(),
            PathBuf::from("/srv/code/lib")
        );
    }

    #[test]
    fn test_home_alone() {
        assert_eq!(resolve("~").unwrap(), PathBuf::from("/home/user"));
    }

    #[test]
    fn test_home_relative() {
        assert_eq!(resolve("~/Dev").unwrap(), PathBuf::from("/home/user/Dev"));
        assert_eq!(resolve("~/").unwrap(), PathBuf::from("/home/user"));
    }

    #[test]
    fn test_home_unknown() {
        assert_eq!(
            resolve_with("~/Dev", no_home, env),
            Err(PathError::NoHomeDir)
        );
    }

    #[test]
    fn test_env_var_forms() {
        assert_eq!(
            resolve("$WORK/repos").unwrap(),
            PathBuf::from("/srv/work/repos")
        );
        assert_eq!(
            resolve("${WORK}/repos").unwrap(),
            PathBuf::from("/srv/work/repos")
        );
        assert_eq!(resolve("$HOME/Dev").unwrap(), PathBuf::from("/home/user/Dev"));
    }

    #[test]
    fn test_env_var_undefined() {
        assert_eq!(
            resolve("$NOPE/repos"),
            Err(PathError::UndefinedVariable("NOPE".to_string()))
        );
    }

    #[test]
    fn test_env_var_expanding_to_relative() {
        assert_eq!(
            resolve("$REL/x"),
            Err(PathError::Unsupported("$REL/x".to_string()))
        );
    }

    #[test]
    fn test_relative_forms_rejected() {
        for expr in [".", "..", "./app", "../app"] {
            assert_eq!(
                resolve(expr),
                Err(PathError::Relative(expr.to_string())),
                "{expr} should be rejected as relative"
            );
        }
    }

    #[test]
    fn test_bare_name_unsupported() {
        assert_eq!(
            resolve("projects"),
            Err(PathError::Unsupported("projects".to_string()))
        );
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("/a/b/../c/./d/")), PathBuf::from("/a/c/d"));
        assert_eq!(clean(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(clean(Path::new("")), PathBuf::from("."));
    }

    #[test]
    fn test_is_path_like() {
        assert!(is_path_like("~/Dev/_archive"));
        assert!(is_path_like("/tmp/scratch"));
        assert!(is_path_like("$WORK/old"));
        assert!(is_path_like("~"));
        assert!(!is_path_like("target"));
        assert!(!is_path_like(".venv"));
    }
}
