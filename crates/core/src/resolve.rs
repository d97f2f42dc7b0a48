//! Prefix resolution for flat key namespaces
//!
//! A user-supplied key prefix like `project5` is ambiguous in a flat bucket:
//! it is a literal byte-prefix of both `project5/README.md` and
//! `project5-docs/x`. Resolution maps the prefix to the set of keys the user
//! meant by extending it to the nearest complete path segment.

use crate::traits::ObjectInfo;

/// An ordered set of object keys matched by a prefix query
pub type ResolvedKeySet = Vec<ObjectInfo>;

/// Extend `prefix` with the remainder of `key` up to the next segment boundary.
///
/// A segment boundary is a `/` or the end of the key. Example: prefix
/// `docs/cod` against key `docs/coding/work/main.rs` extends to `docs/coding`.
/// An empty prefix extends to the empty string, matching every key.
pub fn segment_extension(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        return String::new();
    }
    let base = prefix.trim_end_matches('/');
    let rest = match key.strip_prefix(base) {
        Some(r) => r,
        None => return String::new(),
    };
    let next = rest.split('/').next().unwrap_or("");
    format!("{base}{next}")
}

/// The part of `key` below its resolved segment boundary, used to build
/// destination paths and keys.
pub fn relative_suffix<'a>(prefix: &str, key: &'a str) -> &'a str {
    let boundary = segment_extension(prefix, key);
    if boundary.is_empty() {
        return key;
    }
    key.strip_prefix(&format!("{boundary}/")).unwrap_or(key)
}

/// Resolve a key prefix against the keys listed under its literal byte-prefix.
///
/// Exact mode takes precedence: a prefix that literally equals a listed key
/// matches that key alone, regardless of longer keys sharing the prefix.
///
/// With `autocomplete`, a prefix that already sits on a segment boundary
/// matches only the keys below that boundary (so `project5` does not drag in
/// `project5-docs/...`); a genuinely partial prefix matches every candidate
/// segment extension. Without `autocomplete`, only a prefix that is itself a
/// complete segment path matches anything.
///
/// Order of the input listing is preserved. An empty result is not an error.
pub fn resolve(prefix: &str, keys: ResolvedKeySet, autocomplete: bool) -> ResolvedKeySet {
    if let Some(exact) = keys.iter().find(|k| k.key == prefix) {
        return vec![exact.clone()];
    }

    let base = prefix.trim_end_matches('/');
    let on_boundary = |info: &ObjectInfo| segment_extension(prefix, &info.key) == base;

    if !autocomplete || keys.iter().any(|k| on_boundary(k)) {
        keys.into_iter().filter(|k| on_boundary(k)).collect()
    } else {
        // Partial prefix: every segment extension is a candidate, keep all.
        keys.into_iter()
            .filter(|k| k.key.starts_with(base))
            .collect()
    }
}
