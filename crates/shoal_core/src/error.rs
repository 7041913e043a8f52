//! Error types for shoal_core.
//!
//! None of these reach a user: callers degrade (placeholder mesh, rigid
//! orientation, disabled wiggle) and log the error for diagnostics.

use glam::Vec3;
use thiserror::Error;

/// Reasons the auto-rigger refuses a mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    /// The source mesh has no vertices
    #[error("mesh has no geometry")]
    EmptyGeometry,

    /// The mesh collapses to (nearly) a point along its longest axis
    #[error("mesh span along forward axis is degenerate: {span}")]
    DegenerateSpan { span: f32 },

    /// Some vertex lies at infinity or NaN, so the mesh has no usable frame
    #[error("mesh bounds are not finite: size {size}")]
    NonFiniteBounds { size: Vec3 },
}

/// Failures reported by an asset loader.
#[derive(Error, Debug)]
pub enum AssetError {
    /// No asset registered for the species
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Asset exists but could not be used
    #[error("Invalid asset: {0}")]
    Invalid(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<AssetError>,
    },
}

/// Result type alias for asset loading.
pub type AssetResult<T> = std::result::Result<T, AssetError>;

impl AssetError {
    /// Creates a new not found error.
    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    /// Creates a new invalid asset error.
    #[must_use]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::Invalid(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
