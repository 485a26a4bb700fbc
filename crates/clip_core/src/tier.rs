const DEFAULT_PREFERRED_TIERS: &[usize] = &[2];

/// Ordered preference over the positions of a CDN candidate-URL list.
///
/// The upstream API returns `url_list` entries in a fixed order where the
/// third entry, when present, is the least-processed variant. The positions
/// are a policy rather than a hardcoded index so the rule can be swapped
/// when the response shape changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierPolicy {
    preferred: Vec<usize>,
}

impl TierPolicy {
    pub fn new(preferred: Vec<usize>) -> Self {
        Self { preferred }
    }

    /// Pick the first preferred position that exists in `candidates`,
    /// falling back to the first element.
    ///
    /// Returns `None` only for an empty candidate list.
    pub fn select<'a>(&self, candidates: &'a [String]) -> Option<&'a str> {
        self.preferred
            .iter()
            .find_map(|&index| candidates.get(index))
            .or_else(|| candidates.first())
            .map(String::as_str)
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PREFERRED_TIERS.to_vec())
    }
}

/// Request the unmarked CDN variant by rewriting the watermark path marker.
pub fn strip_watermark(url: &str) -> String {
    url.replace("playwm", "play")
}
