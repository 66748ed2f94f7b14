//! Glob-style include/exclude matching for asset paths.
//!
//! Patterns follow a small, gitignore-like dialect:
//!
//! - `*` matches any run of characters except `/`, `?` matches one such character
//! - `**` matches any run including `/`; a leading `**/` also matches at the root
//! - a wildcard pattern without `/` (e.g. `*.png`) matches the file name at any depth
//! - a pattern containing `/` is anchored at the asset root
//! - `dir/` matches the directory and everything under it
//! - `dir/*` matches direct children only, `dir/**` matches every descendant
//! - a literal pattern without wildcards matches exactly that relative path
//!
//! Matching is case-insensitive and works on forward-slash normalized paths, so
//! `Textures\Wood.PNG` and `textures/wood.png` are treated the same.

use regex::Regex;
use thiserror::Error;

/// Errors raised while compiling patterns
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A single compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    original: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob pattern into a path predicate
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&translate(pattern)).map_err(|source| {
            PatternError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        Ok(Self {
            original: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written in the configuration
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Check whether `path` matches this pattern
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(&normalize_path(path))
    }
}

/// A compiled list of patterns, matching when any member matches
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<GlobPattern>,
}

impl PatternSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| GlobPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when any pattern matches `path`
    pub fn matches(&self, path: &str) -> bool {
        let normalized = normalize_path(path);
        self.patterns.iter().any(|p| p.regex.is_match(&normalized))
    }

    /// Include semantics: an empty set includes everything
    pub fn includes(&self, path: &str) -> bool {
        self.is_empty() || self.matches(path)
    }

    /// Exclude semantics: an empty set excludes nothing
    pub fn excludes(&self, path: &str) -> bool {
        !self.is_empty() && self.matches(path)
    }
}

/// Check whether `path` passes an include filter.
///
/// An empty pattern list means "no filter" and includes every path.
pub fn is_included<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    if patterns.is_empty() {
        return true;
    }
    compiled_matches(path, patterns)
}

/// Check whether `path` is rejected by an exclude filter.
///
/// An empty pattern list excludes nothing.
pub fn is_excluded<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    compiled_matches(path, patterns)
}

fn compiled_matches<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|pattern| match GlobPattern::new(pattern.as_ref()) {
        Ok(glob) => glob.matches(path),
        Err(e) => {
            tracing::warn!("Ignoring pattern: {}", e);
            false
        }
    })
}

/// Normalize a relative path to the form patterns are matched against
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");

    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.to_string();
    }
    let trimmed = normalized.trim_start_matches('/').trim_end_matches('/');
    trimmed.to_string()
}

/// Translate a glob pattern to an anchored, case-insensitive regex
fn translate(pattern: &str) -> String {
    let normalized = {
        let mut p = pattern.trim().replace('\\', "/");
        while let Some(rest) = p.strip_prefix("./") {
            p = rest.to_string();
        }
        p.trim_start_matches('/').to_string()
    };

    let directory_pattern = normalized.ends_with('/');
    let body = normalized.trim_end_matches('/');
    let has_wildcard = body.contains(['*', '?']);

    let mut regex = String::from("(?i)^");

    if !has_wildcard {
        regex.push_str(&regex::escape(body));
        if directory_pattern {
            regex.push_str("(?:/.*)?");
        }
        regex.push('$');
        return regex;
    }

    // Unanchored file-name patterns match at any depth
    if !body.contains('/') {
        regex.push_str("(?:.*/)?");
    }

    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_end = i + 2 == chars.len();
                let after_slash = i == 0 || chars[i - 1] == '/';
                if chars.get(i + 2) == Some(&'/') && after_slash {
                    // `**/` spans zero or more whole directories
                    regex.push_str("(?:.*/)?");
                    i += 3;
                } else if at_end && i > 0 && chars[i - 1] == '/' {
                    // `dir/**` requires at least one descendant segment
                    regex.push_str(".+");
                    i += 2;
                } else {
                    regex.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                regex.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                regex.push_str("[^/]");
                i += 1;
            }
            c => {
                regex.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    if directory_pattern {
        regex.push_str("(?:/.*)?");
    }
    regex.push('$');
    regex
}
