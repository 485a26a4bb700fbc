use url::Url;

const DEFAULT_DETAIL_PAGE_BASE: &str = "https://www.douyin.com/video";

/// Template for the canonical detail page of a single video.
///
/// The upstream site serves every video at `<base>/<video_id>`; the base is
/// configuration because the domain can change without notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPageTemplate {
    base: String,
}

impl DetailPageTemplate {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Canonical detail-page URL for a video identifier.
    pub fn url_for(&self, video_id: &str) -> String {
        format!("{}/{}", self.base, video_id)
    }
}

impl Default for DetailPageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_DETAIL_PAGE_BASE)
    }
}

/// Extract a video identifier from a redirected share-link URL.
///
/// Precedence: a non-empty `vid` query parameter wins; otherwise the path
/// segment immediately following a literal `video` component is used.
/// Returns `None` when the URL carries neither (or does not parse).
pub fn extract_video_id(redirected_url: &str) -> Option<String> {
    let parsed = Url::parse(redirected_url).ok()?;

    if let Some((_, value)) = parsed.query_pairs().find(|(key, _)| key == "vid") {
        if !value.is_empty() {
            return Some(value.into_owned());
        }
    }

    let mut segments = parsed.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "video" {
            return segments.find(|s| !s.is_empty()).map(ToOwned::to_owned);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_template_joins_base_and_id() {
        let template = DetailPageTemplate::new("https://example.com/video/");
        assert_eq!(template.url_for("123"), "https://example.com/video/123");
    }

    #[test]
    fn default_template_points_at_upstream_site() {
        let template = DetailPageTemplate::default();
        assert_eq!(
            template.url_for("7001"),
            "https://www.douyin.com/video/7001"
        );
    }
}
