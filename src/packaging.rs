//! Packaging Rules
//!
//! Packaging rules exclude resources from the final application archive when
//! the Android Gradle plugin merges the resources of all dependencies. Each
//! rule is a glob pattern matched against archive paths, anchored at the
//! archive root (e.g., `/META-INF/LICENSE`).
//!
//! Descriptors may use brace alternatives like `/META-INF/{AL2.0,LGPL2.1}`.
//! These are expanded into one rule per alternative, since the glob matcher
//! only knows about `*`, `**`, `?` and character classes.

/// Packaging Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("empty packaging pattern")]
    Empty,
    #[error("unbalanced or excessive braces in packaging pattern {0:?}")]
    Braces(String),
    #[error("invalid packaging pattern {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

// `*` and `?` never cross path separators, only `**` does.
const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

// Upper bound on the patterns a single brace expression expands to.
const EXPANSION_LIMIT: usize = 256;

/// Packaging Rule
///
/// A single normalized exclusion pattern. Rules compare, order and hash by
/// their normalized text, so two rules spelled identically are the same rule.
#[derive(Clone, Debug)]
pub struct PackagingRule {
    text: String,
    pattern: glob::Pattern,
}

impl PackagingRule {
    /// Create rule from a single pattern
    ///
    /// Anchor the pattern at the archive root and compile it. Brace
    /// alternatives are refused, use [`PackagingRule::expand()`] for those.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        if pattern.is_empty() {
            return Err(Error::Empty);
        }
        if pattern.contains(['{', '}']) {
            return Err(Error::Braces(pattern.to_string()));
        }

        let text = if pattern.starts_with('/') {
            pattern.to_string()
        } else {
            format!("/{}", pattern)
        };

        let compiled = glob::Pattern::new(&text).map_err(
            |v| Error::Glob { pattern: pattern.to_string(), source: v }
        )?;

        Ok(Self {
            text: text,
            pattern: compiled,
        })
    }

    /// Create rules from a pattern with brace alternatives
    ///
    /// Expand all brace alternatives of the pattern, possibly nested, and
    /// create one rule for each resulting pattern.
    pub fn expand(pattern: &str) -> Result<Vec<Self>, Error> {
        if pattern.is_empty() {
            return Err(Error::Empty);
        }

        expand_braces(pattern)?
            .iter()
            .map(|v| Self::new(v))
            .collect()
    }

    /// Return the normalized pattern text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Check whether the pattern contains no glob metacharacters
    pub fn is_literal(&self) -> bool {
        !self.text.contains(['*', '?', '['])
    }

    /// Check whether an archive path is excluded by this rule
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }

    /// Check whether this rule makes another rule redundant
    ///
    /// Only literal rules can be proven redundant: a literal rule is covered
    /// if this rule matches its path. Rules never cover themselves.
    pub fn covers(&self, other: &Self) -> bool {
        self.text != other.text
            && other.is_literal()
            && self.matches(&other.text)
    }
}

impl PartialEq for PackagingRule {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for PackagingRule {
}

impl PartialOrd for PackagingRule {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackagingRule {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl std::hash::Hash for PackagingRule {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.text.hash(state)
    }
}

impl std::fmt::Display for PackagingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl serde::Serialize for PackagingRule {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

// Expand brace alternatives
//
// Split the first top-level brace group at its top-level commas and recurse
// on each alternative spliced into the surrounding text. Nested groups are
// handled by the recursion. Expansions beyond `EXPANSION_LIMIT` are refused.
fn expand_braces(s: &str) -> Result<Vec<String>, Error> {
    let open = match s.find('{') {
        Some(v) => v,
        None => {
            if s.contains('}') {
                return Err(Error::Braces(s.to_string()));
            }
            return Ok(vec![s.to_string()]);
        },
    };

    if s[..open].contains('}') {
        return Err(Error::Braces(s.to_string()));
    }

    let mut depth = 0usize;
    let mut start = open + 1;
    let mut close = None;
    let mut alternatives = Vec::new();

    for (i, c) in s.char_indices().skip_while(|(i, _)| *i < open) {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    alternatives.push(&s[start..i]);
                    close = Some(i);
                    break;
                }
            },
            ',' if depth == 1 => {
                alternatives.push(&s[start..i]);
                start = i + 1;
            },
            _ => {},
        }
    }

    let close = close.ok_or_else(|| Error::Braces(s.to_string()))?;
    let (prefix, suffix) = (&s[..open], &s[close + 1..]);

    let mut r = Vec::new();
    for alternative in alternatives {
        r.extend(expand_braces(&format!("{}{}{}", prefix, alternative, suffix))?);
        if r.len() > EXPANSION_LIMIT {
            return Err(Error::Braces(s.to_string()));
        }
    }
    Ok(r)
}

/// Merge packaging rules
///
/// Collect the given rules into a set, dropping exact duplicates as well as
/// literal rules that are covered by another rule of the set. The operation
/// has no side-effects and the result is independent of the input order.
pub fn merge_packaging_rules<I>(rules: I) -> std::collections::BTreeSet<PackagingRule>
where
    I: IntoIterator<Item = PackagingRule>,
{
    let unique: std::collections::BTreeSet<PackagingRule> = rules.into_iter().collect();

    unique.iter()
        .filter(|v| !unique.iter().any(|o| o.covers(v)))
        .cloned()
        .collect()
}
