//! Survey-to-render coordinate transform

use crate::config::{ImportConfig, validate_scale};
use crate::error::{Error, Result};
use crate::model::{Origin, Vertex};

/// Maps projected survey coordinates into local render space
///
/// Survey east/north does not line up with the render space's forward/right
/// axes, so the horizontal axes are swapped:
///
/// ```text
/// x = (northing - origin.northing) * scale
/// y = (easting  - origin.easting)  * scale
/// z =  elevation * scale + vertical_bias
/// ```
///
/// Construction rejects a zero, negative or non-finite scale, so [`apply`]
/// itself has no failure cases.
///
/// [`apply`]: CoordinateTransform::apply
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    origin: Origin,
    scale: f64,
    vertical_bias: f64,
}

impl CoordinateTransform {
    /// Create a transform
    ///
    /// # Example
    ///
    /// ```
    /// use citygml_mesh::{CoordinateTransform, Origin};
    ///
    /// let transform = CoordinateTransform::new(Origin::new(1000.0, 2000.0), 100.0, 0.0)?;
    /// let v = transform.apply(1001.0, 2003.0, 4.0);
    /// assert_eq!((v.x, v.y, v.z), (300.0, 100.0, 400.0));
    /// # Ok::<(), citygml_mesh::Error>(())
    /// ```
    pub fn new(origin: Origin, scale: f64, vertical_bias: f64) -> Result<Self> {
        validate_scale(scale)?;
        if !vertical_bias.is_finite() {
            return Err(Error::invalid_config(
                "vertical_bias",
                vertical_bias,
                "must be finite",
            ));
        }
        Ok(Self {
            origin,
            scale,
            vertical_bias,
        })
    }

    /// Create a transform from the configured scale and bias around `origin`
    pub fn from_config(config: &ImportConfig, origin: Origin) -> Result<Self> {
        Self::new(origin, config.scale(), config.vertical_bias())
    }

    /// Transform one survey triple
    #[inline]
    pub fn apply(&self, easting: f64, northing: f64, elevation: f64) -> Vertex {
        Vertex::new(
            (northing - self.origin.northing) * self.scale,
            (easting - self.origin.easting) * self.scale,
            elevation * self.scale + self.vertical_bias,
        )
    }

    /// Origin subtracted from every coordinate
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Uniform scale factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Vertical bias added after scaling
    pub fn vertical_bias(&self) -> f64 {
        self.vertical_bias
    }
}
