//! Address pattern segments: node-name validation, brace expansion and
//! glob matching.
//!
//! Matching works one path segment at a time. A segment is first
//! brace-expanded (`{add,sub}` → `add`, `sub`), then every expansion is
//! glob-matched against node names with shell semantics:
//!
//! - `*`      any run of characters
//! - `?`      any single character
//! - `[abc]`  one of the listed characters (ranges allowed)
//! - `[!abc]` any character not listed
//!
//! Path-traversing wildcards (`//`) are not supported.

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{OscError, Result};

/// Whether `c` may appear in a node name.
///
/// Printable ASCII, minus space and the characters that have a meaning
/// in address patterns: `# * , / ? [ ] { }`.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '#' | '*' | ',' | '/' | '?' | '[' | ']' | '{' | '}')
}

/// Whether `name` is a valid (non-empty) node name.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_name_char)
}

/// Split an address or pattern into its segments.
///
/// The address must start with `/` and contain no empty segments.
pub fn split_address(address: &str) -> Result<Vec<&str>> {
    let rest = address.strip_prefix('/').ok_or_else(|| {
        OscError::Address(format!("address must start with '/': {:?}", address))
    })?;

    let parts: Vec<&str> = rest.split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(OscError::Address(format!(
            "empty path segment in {:?}",
            address
        )));
    }

    Ok(parts)
}

/// Expand `{a,b,c}` groups in a segment into one pattern per alternative.
///
/// Groups are expanded left to right, first `{` with the first `}` after
/// it. Alternatives are trimmed and dropped unless they are valid node
/// names. A `{` without a closing `}` is a [`OscError::Pattern`].
pub fn expand_braces(segment: &str) -> Result<Vec<String>> {
    let mut expansions = vec![segment.to_string()];

    loop {
        let mut next = Vec::new();

        for sn in &expansions {
            let Some(start) = sn.find('{') else {
                return Ok(expansions);
            };
            let end = sn[start + 1..]
                .find('}')
                .map(|i| start + 1 + i)
                .ok_or_else(|| {
                    OscError::Pattern(format!("unmatched '{{' in {:?}", segment))
                })?;

            let prefix = &sn[..start];
            let suffix = &sn[end + 1..];
            next.extend(
                sn[start + 1..end]
                    .split(',')
                    .map(str::trim)
                    .filter(|item| is_valid_name(item))
                    .map(|item| format!("{}{}{}", prefix, item, suffix)),
            );
        }

        if next.is_empty() {
            return Ok(next);
        }
        expansions = next;
    }
}

/// A compiled matcher for one pattern segment.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    kind: MatcherKind,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Literal(String),
    Globs(Vec<GlobMatcher>),
}

impl SegmentMatcher {
    /// Compile a segment.
    ///
    /// - `glob`: enable wildcard matching; otherwise the segment is
    ///   compared literally.
    /// - `braces`: enable brace expansion before glob matching. An
    ///   unmatched `{` falls back to matching the literal segment.
    pub fn compile(segment: &str, glob: bool, braces: bool) -> Self {
        if !glob {
            return SegmentMatcher {
                kind: MatcherKind::Literal(segment.to_string()),
            };
        }

        let patterns = if braces {
            expand_braces(segment).unwrap_or_else(|_| vec![segment.to_string()])
        } else {
            vec![segment.to_string()]
        };

        let globs = patterns
            .iter()
            // Node names never contain braces, so a leftover brace can't match.
            .filter(|p| !p.contains(|c: char| c == '{' || c == '}'))
            .filter_map(|p| {
                GlobBuilder::new(p)
                    .literal_separator(true)
                    .backslash_escape(false)
                    .build()
                    .ok()
            })
            .map(|g| g.compile_matcher())
            .collect();

        SegmentMatcher {
            kind: MatcherKind::Globs(globs),
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match &self.kind {
            MatcherKind::Literal(literal) => literal == name,
            MatcherKind::Globs(globs) => globs.iter().any(|g| g.is_match(name)),
        }
    }

    /// The exact name this segment can match, if it has no wildcards.
    pub fn as_literal(&self) -> Option<&str> {
        match &self.kind {
            MatcherKind::Literal(literal) => Some(literal),
            MatcherKind::Globs(_) => None,
        }
    }
}
