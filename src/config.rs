//! Import configuration

use crate::error::{Error, Result};
use crate::model::Origin;

/// Default render-space scale: survey metres to centimetre render units
pub const DEFAULT_SCALE: f64 = 100.0;

/// Default vertical bias added to scaled elevations
pub const DEFAULT_VERTICAL_BIAS: f64 = 0.0;

/// Where the per-file offset origin comes from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OriginSource {
    /// Lower corner of the document's `gml:Envelope`
    #[default]
    Envelope,
    /// A fixed anchor shared by every file, e.g. for a known survey zone
    Fixed(Origin),
}

/// How the assembled output is split into mesh records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One mesh record per building, named by the building identifier
    #[default]
    PerBuilding,
    /// One mesh record for every building of every file in the import
    Combined,
}

/// How the texture projection axis is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UvProjection {
    /// Dominant axis of each vertex position, chosen independently per vertex
    ///
    /// Matches meshes produced by earlier importers; a face whose vertices
    /// straddle two dominant axes receives mixed projections.
    #[default]
    PerVertex,
    /// Dominant axis of the face normal, shared by every vertex of the face
    PerFace,
}

/// How the per-face tangent is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TangentMode {
    /// Tangent of the last fan triangle, applied to every vertex
    #[default]
    LastTriangle,
    /// Normalized sum of all fan triangle tangents
    Averaged,
}

/// Configuration for importing CityGML files
///
/// The default configuration reproduces the established output: envelope
/// origin, scale 100, no vertical bias, one record per building, per-vertex
/// UV axes and last-triangle tangents.
///
/// # Example
///
/// ```
/// use citygml_mesh::{ImportConfig, OutputMode, UvProjection};
///
/// let config = ImportConfig::new()
///     .with_scale(1.0)
///     .with_vertical_bias(50.0)
///     .with_output_mode(OutputMode::Combined)
///     .with_uv_projection(UvProjection::PerFace);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    origin: OriginSource,
    scale: f64,
    vertical_bias: f64,
    output_mode: OutputMode,
    uv_projection: UvProjection,
    tangent_mode: TangentMode,
}

impl ImportConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            origin: OriginSource::Envelope,
            scale: DEFAULT_SCALE,
            vertical_bias: DEFAULT_VERTICAL_BIAS,
            output_mode: OutputMode::PerBuilding,
            uv_projection: UvProjection::PerVertex,
            tangent_mode: TangentMode::LastTriangle,
        }
    }

    /// Set the origin source
    pub fn with_origin(mut self, origin: OriginSource) -> Self {
        self.origin = origin;
        self
    }

    /// Set the uniform render-space scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the vertical bias added after scaling
    pub fn with_vertical_bias(mut self, bias: f64) -> Self {
        self.vertical_bias = bias;
        self
    }

    /// Set the output mode
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Set the UV projection rule
    pub fn with_uv_projection(mut self, projection: UvProjection) -> Self {
        self.uv_projection = projection;
        self
    }

    /// Set the tangent derivation rule
    pub fn with_tangent_mode(mut self, mode: TangentMode) -> Self {
        self.tangent_mode = mode;
        self
    }

    /// Origin source
    pub fn origin(&self) -> OriginSource {
        self.origin
    }

    /// Render-space scale factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Vertical bias
    pub fn vertical_bias(&self) -> f64 {
        self.vertical_bias
    }

    /// Output mode
    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// UV projection rule
    pub fn uv_projection(&self) -> UvProjection {
        self.uv_projection
    }

    /// Tangent derivation rule
    pub fn tangent_mode(&self) -> TangentMode {
        self.tangent_mode
    }

    /// Check that the numeric settings cannot collapse or corrupt geometry
    pub fn validate(&self) -> Result<()> {
        validate_scale(self.scale)?;
        if !self.vertical_bias.is_finite() {
            return Err(Error::invalid_config(
                "vertical_bias",
                self.vertical_bias,
                "must be finite",
            ));
        }
        if let OriginSource::Fixed(origin) = self.origin {
            if !origin.easting.is_finite() || !origin.northing.is_finite() {
                return Err(Error::InvalidConfig(format!(
                    "fixed origin ({}, {}) must be finite",
                    origin.easting, origin.northing
                )));
            }
        }
        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_scale(scale: f64) -> Result<()> {
    if !scale.is_finite() {
        return Err(Error::invalid_config("scale", scale, "must be finite"));
    }
    if scale <= 0.0 {
        return Err(Error::invalid_config(
            "scale",
            scale,
            "must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::default();
        assert_eq!(config.origin(), OriginSource::Envelope);
        assert_eq!(config.scale(), DEFAULT_SCALE);
        assert_eq!(config.vertical_bias(), DEFAULT_VERTICAL_BIAS);
        assert_eq!(config.output_mode(), OutputMode::PerBuilding);
        assert_eq!(config.uv_projection(), UvProjection::PerVertex);
        assert_eq!(config.tangent_mode(), TangentMode::LastTriangle);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_sets_every_field() {
        let origin = Origin::new(360_000.0, 5_700_000.0);
        let config = ImportConfig::new()
            .with_origin(OriginSource::Fixed(origin))
            .with_scale(2.5)
            .with_vertical_bias(-10.0)
            .with_output_mode(OutputMode::Combined)
            .with_uv_projection(UvProjection::PerFace)
            .with_tangent_mode(TangentMode::Averaged);

        assert_eq!(config.origin(), OriginSource::Fixed(origin));
        assert_eq!(config.scale(), 2.5);
        assert_eq!(config.vertical_bias(), -10.0);
        assert_eq!(config.output_mode(), OutputMode::Combined);
        assert_eq!(config.uv_projection(), UvProjection::PerFace);
        assert_eq!(config.tangent_mode(), TangentMode::Averaged);
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = ImportConfig::new().with_scale(0.0).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_negative_and_nan_scale_rejected() {
        assert!(ImportConfig::new().with_scale(-1.0).validate().is_err());
        assert!(ImportConfig::new().with_scale(f64::NAN).validate().is_err());
        assert!(
            ImportConfig::new()
                .with_scale(f64::INFINITY)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_non_finite_bias_and_origin_rejected() {
        assert!(
            ImportConfig::new()
                .with_vertical_bias(f64::NAN)
                .validate()
                .is_err()
        );
        let origin = OriginSource::Fixed(Origin::new(f64::INFINITY, 0.0));
        assert!(ImportConfig::new().with_origin(origin).validate().is_err());
    }
}
