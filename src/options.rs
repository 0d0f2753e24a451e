//! Configuration options for page analysis and extraction.
//!
//! The `Options` struct carries the size thresholds that drive strategy
//! selection and the few presentation constants the extracted content uses.

use std::time::Duration;

/// Configuration options for a pipeline run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_pricing_cms::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     large_file_threshold_mb: 8.0,
///     url: Some("https://www.azure.cn/pricing/details/storage/".into()),
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Files larger than this skip DOM classification and use the
    /// large-file strategy.
    ///
    /// Default: `5.0`
    pub large_file_threshold_mb: f64,

    /// Large files above this size are processed in `chunked` mode.
    ///
    /// Default: `10.0`
    pub chunked_threshold_mb: f64,

    /// Large files above this size are processed in `streaming` mode.
    ///
    /// Default: `20.0`
    pub streaming_threshold_mb: f64,

    /// Upper bound for the large-file memory limit (`min(2 × size, cap)`).
    ///
    /// Default: `200.0`
    pub memory_limit_cap_mb: f64,

    /// Files above this size get the small size bonus in the complexity score.
    ///
    /// Default: `1.0`
    pub size_bonus_threshold_mb: f64,

    /// Source URL of the page, used for slug derivation.
    ///
    /// When `None`, the coordinator derives a URL from the file name.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Placeholder prefixed to relative banner image sources.
    ///
    /// Default: `"{img_hostname}"`
    pub image_host_placeholder: String,

    /// Language reported when the page body carries no language class.
    ///
    /// Default: `"zh-cn"`
    pub default_language: String,

    /// Time-to-live of cached product configurations.
    ///
    /// Default: 30 minutes
    pub product_cache_ttl: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            large_file_threshold_mb: 5.0,
            chunked_threshold_mb: 10.0,
            streaming_threshold_mb: 20.0,
            memory_limit_cap_mb: 200.0,
            size_bonus_threshold_mb: 1.0,
            url: None,
            image_host_placeholder: "{img_hostname}".to_string(),
            default_language: "zh-cn".to_string(),
            product_cache_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl Options {
    /// Returns `true` when a file of `size_mb` takes the large-file path.
    #[inline]
    #[must_use]
    pub fn is_large_file(&self, size_mb: f64) -> bool {
        size_mb > self.large_file_threshold_mb
    }
}
