/// Output location of a bucket relative to the shard root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    /// Lowercased first character.
    pub directory: String,
    /// Lowercased first two characters, without extension.
    pub stem: String,
}

/// Map a non-empty, trimmed line to its bucket.
///
/// Works on chars, not bytes, so multi-byte prefixes stay intact. A
/// single-character line uses its character twice: `"a"` -> `a/aa`.
pub fn classify(line: &str) -> BucketKey {
    let mut chars = line.chars();
    let first = chars.next().unwrap_or_default();
    let second = chars.next().unwrap_or(first);

    let directory: String = first.to_lowercase().collect();
    let mut stem = directory.clone();
    stem.extend(second.to_lowercase());

    BucketKey { directory, stem }
}
