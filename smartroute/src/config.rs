//! Options passed through to the wire builders.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pdk::GLayer;

/// Default distance, in database units, that a C route extends past its ports.
pub const DEFAULT_C_EXTENSION: i64 = 500;

/// Default upper bound on the width of a gate-to-gate strap.
pub const DEFAULT_GATE_ROUTE_MAX_WIDTH: i64 = 1000;

/// Knobs shared by the wire builders.
///
/// Unset widths and layers are taken from the ports being routed.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct RouteOptions {
    /// Width of the wire leaving the first port.
    #[builder(setter(strip_option))]
    pub width: Option<i64>,
    /// Width of the wire leaving the second port.
    #[builder(setter(strip_option))]
    pub width2: Option<i64>,
    /// Routing layer at the first port.
    #[builder(setter(strip_option))]
    pub glayer1: Option<GLayer>,
    /// Routing layer at the second port.
    #[builder(setter(strip_option))]
    pub glayer2: Option<GLayer>,
    /// Routing layer of the bar joining the two legs of a C route.
    #[builder(setter(strip_option))]
    pub cglayer: Option<GLayer>,
    /// How far a C route extends past the outermost port.
    pub extension: i64,
    /// Whether each end via of a C route is pulled inward along the bar.
    pub viaoffset: (bool, bool),
    /// Gate straps between interdigitized devices never exceed this width.
    pub gate_route_max_width: i64,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            width: None,
            width2: None,
            glayer1: None,
            glayer2: None,
            cglayer: None,
            extension: DEFAULT_C_EXTENSION,
            viaoffset: (true, true),
            gate_route_max_width: DEFAULT_GATE_ROUTE_MAX_WIDTH,
        }
    }
}

impl RouteOptions {
    /// Returns a new [`RouteOptionsBuilder`].
    #[inline]
    pub fn builder() -> RouteOptionsBuilder {
        RouteOptionsBuilder::default()
    }

    /// Parses options from TOML. Missing keys keep their defaults.
    ///
    /// ```
    /// # use smartroute::config::RouteOptions;
    /// let opts = RouteOptions::from_toml_str("width = 300\nglayer2 = \"met2\"").unwrap();
    /// assert_eq!(opts.width, Some(300));
    /// assert_eq!(opts.extension, smartroute::config::DEFAULT_C_EXTENSION);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
