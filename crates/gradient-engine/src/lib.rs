//! Gradient engine crate.
//!
//! Renders linear two-color gradients into PNG images and keeps the results
//! in a size-bounded, recency-ordered cache. Request handling (HTTP parsing,
//! response headers) lives outside this crate; callers hand in raw or typed
//! parameters and get back encoded bytes plus a modification time.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`paint`] | `Color` (7-bit alpha ARGB), `parse_color`, `GradientSpec` |
//! | [`params`] | lenient normalization of raw request parameters |
//! | [`geometry`] | angle → canvas size, offset and direction vector |
//! | [`render`] | `GradientRasterizer`, error-diffusion rounding, `Pixmap` |
//! | [`encode`] | `ImageSink`, `PngSink` |
//! | [`cache`] | `EntryStore` backends and the evicting `CacheStore` |
//! | [`service`] | `GradientService`, the render-and-serve pipeline |

pub mod logging;
pub mod config;
pub mod coords;

pub mod paint;
pub mod params;
pub mod geometry;
pub mod render;
pub mod encode;
pub mod cache;
pub mod service;

pub use config::EngineConfig;
pub use paint::{Color, GradientSpec, parse_color};
pub use params::GradientParams;
pub use service::{GradientImage, GradientService, ServiceError};
