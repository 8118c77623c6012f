//! The expression-level cache: skips re-styling a top-level expression whose
//! exact source text, style-guide identity, and relevant options were
//! already seen and recorded as already-styled.
//!
//! Storage is pluggable via [`CacheStore`]; this module owns the hashing and
//! the group/drop decision, not the on-disk representation.

use crate::options::Options;
use crate::rules::StyleGuide;
use std::collections::HashMap;

/// Where cache hits/misses are recorded. A concrete on-disk implementation
/// lives in the sibling cache-storage crate; tests and one-off callers can
/// use [`NullCache`].
pub trait CacheStore: Send + Sync {
    fn contains(&self, hash: &str) -> bool;
    fn insert(&mut self, hash: &str);
}

/// Always misses and never records anything. The default when no cache
/// directory is configured.
#[derive(Debug, Default)]
pub struct NullCache;

impl CacheStore for NullCache {
    fn contains(&self, _hash: &str) -> bool {
        false
    }
    fn insert(&mut self, _hash: &str) {}
}

/// The hash key for one top-level expression's exact source text, given the
/// options and style guide in effect. Two calls with identical `text`,
/// `guide`, and the options fields that affect output produce the same key;
/// anything that does not affect rendered output is deliberately excluded so
/// unrelated option changes don't invalidate the whole cache.
pub fn cache_key(text: &str, options: &Options, guide: &StyleGuide) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(guide.identity().as_bytes());
    hasher.update(b"\0");
    hasher.update(options.cache_key_fields().as_bytes());
    hasher.update(b"\0");
    hasher.update(format!("indent_by={}", guide.reindention.indent_by).as_bytes());
    hasher.update(b"\0");
    hasher.update(text.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// One top-level expression as seen by the cache pre-filter: its exact
/// source text (for hashing), its block (for the exception rule below), and
/// its position among siblings.
pub struct Candidate<'a> {
    pub pos_id: u64,
    pub block: u32,
    pub text: &'a str,
}

/// Outcome of checking one candidate against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Already styled before; safe to emit verbatim.
    Hit,
    /// Not seen before, or a peer in the same block was a miss; must go
    /// through the full pipeline.
    Miss,
}

/// Classify each candidate, then apply the exception: if any candidate in a
/// block is not itself a cache hit, every candidate in that block is
/// downgraded to `Miss` — because styling one expression on a shared source
/// line can change the whitespace around its neighbors, a hit sharing a
/// block with a miss can no longer be trusted to serialize verbatim.
pub fn classify(candidates: &[Candidate], store: &dyn CacheStore, options: &Options, guide: &StyleGuide) -> Vec<Verdict> {
    let raw: Vec<bool> = candidates
        .iter()
        .map(|c| store.contains(&cache_key(c.text, options, guide)))
        .collect();

    let mut block_all_hit: HashMap<u32, bool> = HashMap::new();
    for (candidate, &hit) in candidates.iter().zip(raw.iter()) {
        let entry = block_all_hit.entry(candidate.block).or_insert(true);
        *entry = *entry && hit;
    }

    candidates
        .iter()
        .zip(raw.iter())
        .map(|(candidate, &hit)| {
            if hit && block_all_hit[&candidate.block] {
                Verdict::Hit
            } else {
                Verdict::Miss
            }
        })
        .collect()
}
