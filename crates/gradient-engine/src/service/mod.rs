//! Render-and-serve pipeline.
//!
//! `spec → key → cache lookup → (miss) geometry → raster → encode → store`.
//! The protocol layer on top only maps [`GradientImage`] onto a response and
//! uses [`GradientService::is_not_modified`] for conditional requests.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::{CacheKey, CacheStore, EntryStore, FsStore, StorageError};
use crate::config::EngineConfig;
use crate::encode::{EncodeError, ImageSink, PngSink};
use crate::geometry::GeometryResolver;
use crate::paint::GradientSpec;
use crate::params::GradientParams;
use crate::render::GradientRasterizer;

/// A rendered (or cached) gradient image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientImage {
    pub key: CacheKey,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub last_modified: SystemTime,
    /// `true` when served from the cache without rendering.
    pub cache_hit: bool,
}

/// Failure serving a gradient. Never answered with a blank image.
#[derive(Debug)]
pub enum ServiceError {
    Storage(StorageError),
    Encode(EncodeError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "gradient storage failed: {e}"),
            Self::Encode(e) => write!(f, "gradient encoding failed: {e}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<EncodeError> for ServiceError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

/// Gradient renderer with a cache in front.
pub struct GradientService<S, K> {
    config: EngineConfig,
    cache: CacheStore<S>,
    resolver: GeometryResolver,
    rasterizer: GradientRasterizer,
    sink: K,
}

impl GradientService<FsStore, PngSink> {
    /// PNG output cached in `config.cache_dir`.
    pub fn open(config: EngineConfig) -> Result<Self, StorageError> {
        let sink = PngSink::default();
        let store = FsStore::open(&config.cache_dir, sink.extension())?;
        log::info!(
            "gradient cache at {} (budget {} bytes)",
            store.dir().display(),
            config.cache_budget_bytes
        );
        Ok(Self::new(config, store, sink))
    }
}

impl<S: EntryStore, K: ImageSink> GradientService<S, K> {
    pub fn new(config: EngineConfig, store: S, sink: K) -> Self {
        Self {
            cache: CacheStore::new(store, config.cache_budget_bytes),
            resolver: GeometryResolver::new(&config),
            rasterizer: GradientRasterizer::new(&config),
            config,
            sink,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &CacheStore<S> {
        &self.cache
    }

    /// Normalizes raw parameters, then [`fetch`](Self::fetch)es.
    pub fn fetch_params(&self, params: &GradientParams) -> Result<GradientImage, ServiceError> {
        let spec = params.normalize(&self.config);
        self.fetch(&spec)
    }

    /// Serves `spec` from the cache, rendering and storing it on a miss.
    pub fn fetch(&self, spec: &GradientSpec) -> Result<GradientImage, ServiceError> {
        let key = CacheKey::for_spec(spec);

        if let Some(hit) = self.cache.lookup(key.as_str())? {
            return Ok(GradientImage {
                key,
                bytes: hit.bytes,
                content_type: self.sink.content_type(),
                last_modified: hit.modified,
                cache_hit: true,
            });
        }

        let bytes = self.render(spec)?;
        let stored = self.cache.store(key.as_str(), bytes)?;
        log::debug!("rendered {key} ({} bytes)", stored.bytes.len());

        Ok(GradientImage {
            key,
            bytes: stored.bytes,
            content_type: self.sink.content_type(),
            last_modified: stored.modified,
            cache_hit: false,
        })
    }

    /// Renders and encodes without consulting or filling the cache.
    pub fn render(&self, spec: &GradientSpec) -> Result<Vec<u8>, EncodeError> {
        let geometry = self.resolver.resolve_spec(spec);
        let pixmap = self.rasterizer.render(&geometry, spec);
        self.sink.encode(&pixmap)
    }

    /// Modification time of the cached image for `spec`, if cached.
    pub fn last_modified(&self, spec: &GradientSpec) -> Result<Option<SystemTime>, StorageError> {
        self.cache.last_modified(CacheKey::for_spec(spec).as_str())
    }

    /// Whether a client holding a copy from `since` can be told "not
    /// modified" without sending bytes.
    ///
    /// Compared at whole seconds, the resolution of HTTP dates. An uncached
    /// spec is always considered modified.
    pub fn is_not_modified(&self, spec: &GradientSpec, since: SystemTime) -> Result<bool, StorageError> {
        Ok(self
            .last_modified(spec)?
            .is_some_and(|modified| unix_secs(modified) <= unix_secs(since)))
    }
}

fn unix_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
