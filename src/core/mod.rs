//! Core processing building blocks: frame and raster containers, the
//! per-stage transforms, rate limiting and the size gate. These are the
//! primitives consumed by the high-level `api` session.
pub mod image;
pub mod params;
pub mod processing;
