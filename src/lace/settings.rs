//! Per-invocation lace configuration.

use crate::error::{LaceError, Result};

use super::knot::KnotFragment;
use super::strategy::LacingMethod;

/// Options for lace generation.
///
/// # Example
///
/// ```
/// use lacework::lace::{LaceSettings, LacingMethod};
///
/// let settings = LaceSettings::default()
///     .with_method(LacingMethod::BowTie)
///     .with_bevel_depth(0.02)
///     .with_simple_curve(false);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LaceSettings {
    /// Which weave to generate.
    pub method: LacingMethod,

    /// Which side of the patch the lace starts from. Only `offset % 4` matters.
    pub offset: usize,

    /// Bevel depth (thickness radius) of the lace curve. Also used to push
    /// crossing strands apart.
    pub bevel_depth: f64,

    /// Length of the handles at SIDE points, i.e. how deep the lace dips
    /// through an eyelet.
    pub side_handle_length: f64,

    /// Ratio of a MIDDLE handle length to the distance to its neighbours.
    pub center_handle_length_ratio: f64,

    /// Use the minimum number of control points per row and diagonal.
    pub simple_curve: bool,

    /// Push the top and bottom centre points outward by `side_handle_length`
    /// so the lace does not sink into the surface.
    pub center_offset: bool,

    /// Emit a hole-cutting curve for every SIDE point.
    pub hole_curve: bool,

    /// Optional knot spliced into the top row.
    pub knot: Option<KnotSettings>,
}

impl Default for LaceSettings {
    fn default() -> Self {
        Self {
            method: LacingMethod::Display,
            offset: 0,
            bevel_depth: 0.01,
            side_handle_length: 0.1,
            center_handle_length_ratio: 0.5,
            simple_curve: true,
            center_offset: true,
            hole_curve: true,
            knot: None,
        }
    }
}

impl LaceSettings {
    /// Set the lacing method.
    pub fn with_method(mut self, method: LacingMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the direction offset.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Set the bevel depth.
    pub fn with_bevel_depth(mut self, depth: f64) -> Self {
        self.bevel_depth = depth;
        self
    }

    /// Set the SIDE handle length.
    pub fn with_side_handle_length(mut self, length: f64) -> Self {
        self.side_handle_length = length;
        self
    }

    /// Set the MIDDLE handle length ratio.
    pub fn with_center_handle_length_ratio(mut self, ratio: f64) -> Self {
        self.center_handle_length_ratio = ratio;
        self
    }

    /// Toggle simple curves.
    pub fn with_simple_curve(mut self, simple: bool) -> Self {
        self.simple_curve = simple;
        self
    }

    /// Toggle the top/bottom centre offset.
    pub fn with_center_offset(mut self, enabled: bool) -> Self {
        self.center_offset = enabled;
        self
    }

    /// Toggle hole curve generation.
    pub fn with_hole_curve(mut self, enabled: bool) -> Self {
        self.hole_curve = enabled;
        self
    }

    /// Splice a knot into the top row.
    pub fn with_knot(mut self, knot: KnotSettings) -> Self {
        self.knot = Some(knot);
        self
    }

    /// Check that all lengths are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("bevel_depth", self.bevel_depth),
            ("side_handle_length", self.side_handle_length),
            ("center_handle_length_ratio", self.center_handle_length_ratio),
        ];

        for (name, value) in lengths {
            if !value.is_finite() {
                return Err(LaceError::invalid_param(name, value, "must be finite"));
            }
            if value < 0.0 {
                return Err(LaceError::invalid_param(name, value, "must be non-negative"));
            }
        }

        Ok(())
    }
}

/// Which knot fragment to splice in, and how to orient it.
#[derive(Debug, Clone)]
pub struct KnotSettings {
    /// The knot curve asset.
    pub fragment: KnotFragment,

    /// Index of the spline joined to the left strand.
    pub spline_left: usize,

    /// Index of the spline joined to the right strand.
    pub spline_right: usize,

    /// Reverse the left spline before splicing.
    pub reverse_left: bool,

    /// Reverse the right spline before splicing.
    pub reverse_right: bool,

    /// Mirror the knot front to back.
    pub invert: bool,
}

impl KnotSettings {
    /// Use splines 0 and 1 of `fragment`, unreversed.
    pub fn new(fragment: KnotFragment) -> Self {
        Self {
            fragment,
            spline_left: 0,
            spline_right: 1,
            reverse_left: false,
            reverse_right: false,
            invert: false,
        }
    }

    /// Select the left and right spline indices.
    pub fn with_splines(mut self, left: usize, right: usize) -> Self {
        self.spline_left = left;
        self.spline_right = right;
        self
    }

    /// Set the per-spline reversal flags.
    pub fn with_reversed(mut self, left: bool, right: bool) -> Self {
        self.reverse_left = left;
        self.reverse_right = right;
        self
    }

    /// Mirror the knot front to back.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = LaceSettings::default();
        assert_eq!(settings.method, LacingMethod::Display);
        assert_eq!(settings.offset, 0);
        assert!((settings.bevel_depth - 0.01).abs() < 1e-12);
        assert!((settings.side_handle_length - 0.1).abs() < 1e-12);
        assert!((settings.center_handle_length_ratio - 0.5).abs() < 1e-12);
        assert!(settings.simple_curve);
        assert!(settings.center_offset);
        assert!(settings.hole_curve);
        assert!(settings.knot.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative() {
        let settings = LaceSettings::default().with_side_handle_length(-0.5);
        assert!(matches!(
            settings.validate(),
            Err(LaceError::InvalidParameter {
                name: "side_handle_length",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let settings = LaceSettings::default().with_bevel_depth(f64::NAN);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_is_allowed() {
        let settings = LaceSettings::default()
            .with_bevel_depth(0.0)
            .with_center_handle_length_ratio(0.0);
        assert!(settings.validate().is_ok());
    }
}
