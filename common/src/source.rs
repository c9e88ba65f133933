//! # Source Model
//!
//! Describes where candidates come from and the seam the fetcher
//! implementation plugs into. The pipeline only ever sees the
//! [`SourceReader`] trait; transport details (HTTP client, headers,
//! timeouts) live behind it.

use async_trait::async_trait;

/// How a source's payload should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// HTML or plain text; scanned for address-shaped tokens.
    FreeText,
    /// JSON records carrying explicit address/hostname fields.
    StructuredRecords,
}

/// One configured upstream source.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub url: String,
    /// Short provenance tag recorded on every candidate the source
    /// contributes.
    pub tag: String,
    pub kind: ContentKind,
}

impl SourceDescriptor {
    pub fn new(url: &str, tag: &str, kind: ContentKind) -> Self {
        Self {
            url: url.to_string(),
            tag: tag.to_string(),
            kind,
        }
    }
}

/// Fetches one source's raw payload.
///
/// A failed fetch means "zero candidates from this source"; the caller
/// logs it and moves on. Implementations enforce their own per-request
/// timeout.
#[async_trait]
pub trait SourceReader: Send + Sync {
    async fn fetch(&self, source: &SourceDescriptor) -> anyhow::Result<String>;
}

/// The built-in source list.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new("https://cf.vvhan.com/", "vvhan", ContentKind::FreeText),
        SourceDescriptor::new("https://ip.164746.xyz", "164746", ContentKind::FreeText),
        SourceDescriptor::new("http://ip.flares.cloud/", "flares", ContentKind::FreeText),
        SourceDescriptor::new(
            "https://vps789.com/cfip/?remarks=ip",
            "vps789",
            ContentKind::FreeText,
        ),
        SourceDescriptor::new(
            "https://ipdb.030101.xyz/bestcfv4/",
            "ipdb",
            ContentKind::FreeText,
        ),
        SourceDescriptor::new("https://www.wetest.vip/", "wetest", ContentKind::FreeText),
        SourceDescriptor::new(
            "https://addressesapi.090227.xyz/ct",
            "090227-ct",
            ContentKind::FreeText,
        ),
        SourceDescriptor::new(
            "https://addressesapi.090227.xyz/cm",
            "090227-cm",
            ContentKind::FreeText,
        ),
        SourceDescriptor::new(
            "https://addressesapi.090227.xyz/cu",
            "090227-cu",
            ContentKind::FreeText,
        ),
        SourceDescriptor::new(
            "https://stock.hostmonit.com/CloudFlareYes",
            "hostmonit",
            ContentKind::StructuredRecords,
        ),
    ]
}
