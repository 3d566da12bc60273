//! Error types and error handling utilities.

use arcstr::ArcStr;
use layir::{GdsLayer, LayirError};

use crate::pdk::GLayer;

/// A result type returning routing errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type for routing functions.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The ports cannot be routed because of their orientation.
    #[error("invalid port geometry: {0}")]
    Geometry(#[from] GeometryError),
    /// The port pair does not match any case of a specialized router.
    ///
    /// Routing through [`smart_route`](crate::route::smart_route) never
    /// surfaces this error; it falls back to general routing instead.
    #[error("unsupported port pair for specialized routing: {0}")]
    UnsupportedTopology(ArcStr),
    /// The requested routing strategy has no implementation.
    #[error("routing strategy not implemented: {0}")]
    NotImplemented(&'static str),
    /// A cell carries a topology tag this crate does not know.
    #[error("unrecognized topology tag `{0}`")]
    UnrecognizedTopology(ArcStr),
    /// An error in the layout model, such as a missing port.
    #[error(transparent)]
    Layout(#[from] LayirError),
    /// A GDS layer that no routing layer maps to.
    #[error("GDS layer {0} is not mapped to a routing layer")]
    UnmappedLayer(GdsLayer),
    /// A routing layer that the PDK does not define.
    #[error("routing layer `{0}` is not defined by the PDK")]
    UnmappedGLayer(GLayer),
    /// The PDK has no via between two adjacent routing layers.
    #[error("no via rule between `{0}` and `{1}`")]
    MissingViaRule(GLayer, GLayer),
    /// A configuration file could not be parsed.
    #[error("error parsing configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// A port orientation problem.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A port does not face one of the four compass directions.
    #[error("port `{port}` is not Manhattan (orientation {orientation} degrees)")]
    NonManhattan {
        /// The offending port.
        port: ArcStr,
        /// Its orientation, in degrees.
        orientation: f64,
    },
    /// Two ports were expected to face along the same axis.
    #[error("ports `{0}` and `{1}` are not parallel")]
    NotParallel(ArcStr, ArcStr),
    /// Two ports were expected to face along different axes.
    #[error("ports `{0}` and `{1}` are not perpendicular")]
    NotPerpendicular(ArcStr, ArcStr),
}
