//! Graph generation configuration.

use crate::error::{TspError, TspResult};

/// Default multiple of the square side used as the self-arc cost.
pub const DEFAULT_SENTINEL_FACTOR: f64 = 999.0;

/// Where points are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SamplingRegion {
    /// Both coordinates uniform over `[0, side]`.
    #[default]
    Positive,
    /// Both coordinates uniform over `[-side, side]`.
    Centered,
}

impl SamplingRegion {
    /// Width of the sampled square, in multiples of the configured side.
    pub fn span(self) -> f64 {
        match self {
            SamplingRegion::Positive => 1.0,
            SamplingRegion::Centered => 2.0,
        }
    }

    /// Upper bound on any pairwise distance, in multiples of the side.
    pub fn diagonal(self) -> f64 {
        self.span() * std::f64::consts::SQRT_2
    }
}

/// Configuration for [`GraphGenerator`](super::GraphGenerator).
///
/// # Examples
///
/// ```
/// use u_tsp::graph::{GraphConfig, SamplingRegion};
///
/// let config = GraphConfig::default()
///     .with_nodes(12)
///     .with_square_side(50.0)
///     .with_region(SamplingRegion::Centered)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.n_nodes, 12);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Number of nodes. Node ids are `0..n_nodes`.
    pub n_nodes: usize,

    /// Side length of the sampling square.
    pub square_side: f64,

    /// Sampling region for coordinates.
    pub region: SamplingRegion,

    /// Random seed. `None` draws a fresh seed per call.
    pub seed: Option<u64>,

    /// Self-arc cost is `sentinel_factor * square_side`.
    ///
    /// Must exceed the region diagonal so a self-arc is never cheaper
    /// than any real arc.
    pub sentinel_factor: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            n_nodes: 40,
            square_side: 100.0,
            region: SamplingRegion::default(),
            seed: None,
            sentinel_factor: DEFAULT_SENTINEL_FACTOR,
        }
    }
}

impl GraphConfig {
    pub fn with_nodes(mut self, n: usize) -> Self {
        self.n_nodes = n;
        self
    }

    pub fn with_square_side(mut self, side: f64) -> Self {
        self.square_side = side;
        self
    }

    pub fn with_region(mut self, region: SamplingRegion) -> Self {
        self.region = region;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sentinel_factor(mut self, factor: f64) -> Self {
        self.sentinel_factor = factor;
        self
    }

    /// Cost assigned to every `(i, i)` entry.
    pub fn sentinel(&self) -> f64 {
        self.sentinel_factor * self.square_side
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        if self.n_nodes == 0 {
            return Err(TspError::InvalidConfig("n_nodes must be positive".into()));
        }
        if !self.square_side.is_finite() || self.square_side <= 0.0 {
            return Err(TspError::InvalidConfig(format!(
                "square_side must be positive and finite, got {}",
                self.square_side
            )));
        }
        let diagonal = self.region.diagonal();
        if !self.sentinel_factor.is_finite() || self.sentinel_factor <= diagonal {
            return Err(TspError::InvalidConfig(format!(
                "sentinel_factor must exceed {diagonal:.4}, got {}",
                self.sentinel_factor
            )));
        }
        if !self.sentinel().is_finite() {
            return Err(TspError::InvalidConfig(format!(
                "sentinel {} x {} overflows",
                self.sentinel_factor, self.square_side
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.n_nodes, 40);
        assert!((config.square_side - 100.0).abs() < 1e-12);
        assert_eq!(config.region, SamplingRegion::Positive);
        assert!(config.seed.is_none());
        assert!((config.sentinel() - 99_900.0).abs() < 1e-9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_nodes() {
        let config = GraphConfig::default().with_nodes(0);
        assert!(matches!(config.validate(), Err(TspError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_bad_side() {
        assert!(GraphConfig::default().with_square_side(0.0).validate().is_err());
        assert!(GraphConfig::default().with_square_side(-3.0).validate().is_err());
        assert!(GraphConfig::default()
            .with_square_side(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_sentinel_vs_region() {
        // 2.0 beats sqrt(2) but not 2 * sqrt(2)
        let config = GraphConfig::default().with_sentinel_factor(2.0);
        assert!(config.validate().is_ok());
        assert!(config
            .with_region(SamplingRegion::Centered)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_sentinel_overflow() {
        let config = GraphConfig::default().with_square_side(1e306);
        assert!(config.sentinel().is_infinite());
        assert!(matches!(config.validate(), Err(TspError::InvalidConfig(_))));

        let config = GraphConfig::default()
            .with_square_side(1e300)
            .with_sentinel_factor(1e10);
        assert!(matches!(config.validate(), Err(TspError::InvalidConfig(_))));

        // largest default-factor side that still fits
        let config = GraphConfig::default().with_square_side(1e300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_region_diagonal() {
        assert!((SamplingRegion::Positive.diagonal() - 2f64.sqrt()).abs() < 1e-12);
        assert!((SamplingRegion::Centered.diagonal() - 2.0 * 2f64.sqrt()).abs() < 1e-12);
    }
}
