//! Pairwise interconnect routing for analog layout generators.
//!
//! [`smart_route`] connects two ports. If the enclosing cell was generated
//! with a known [`Topology`], a specialized router that understands the
//! terminal naming convention of that generator is tried first; otherwise,
//! or if the specialized router does not handle the pair, the ports are
//! joined by a straight, C, or L route depending on their relative
//! orientation.
//!
//! Routers never modify the cells they are given. Wiring that must be added
//! to the enclosing cell is described by a [`RouteOutput`] and applied with
//! [`RouteOutput::apply`].

use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

use arcstr::ArcStr;
use layir::{Cell, Instance, Port};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod config;
pub mod error;
pub mod interdigitized;
pub mod names;
pub mod pdk;
pub mod predicates;
pub mod route;
pub mod wires;

#[cfg(test)]
mod tests;

pub use route::{smart_route, smart_route_in};

/// The metadata key under which generators record their topology.
pub const ROUTE_GENID: &str = "route_genid";

/// A layout topology with a specialized router.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Two interleaved transistors.
    TwoTransistorInterdigitized,
    /// Two pairs of interleaved transistors.
    FourTransistorInterdigitized,
    /// An ABBA common-centroid arrangement.
    CommonCentroid,
}

impl Topology {
    /// The tag stored in cell metadata.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Topology::TwoTransistorInterdigitized => "two_transistor_interdigitized",
            Topology::FourTransistorInterdigitized => "four_transistor_interdigitized",
            Topology::CommonCentroid => "common_centroid",
        }
    }

    /// Reads the topology tag of `cell`.
    ///
    /// Returns `Ok(None)` if the cell carries no tag, and
    /// [`Error::UnrecognizedTopology`] if the tag is not known.
    pub fn of(cell: &Cell) -> Result<Option<Self>> {
        cell.info(ROUTE_GENID).map(|tag| tag.parse()).transpose()
    }

    /// Records this topology in the metadata of `cell`.
    pub fn tag(&self, cell: &mut Cell) {
        cell.set_info(ROUTE_GENID, self.as_str());
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "two_transistor_interdigitized" => Ok(Topology::TwoTransistorInterdigitized),
            "four_transistor_interdigitized" => Ok(Topology::FourTransistorInterdigitized),
            "common_centroid" => Ok(Topology::CommonCentroid),
            _ => Err(Error::UnrecognizedTopology(s.into())),
        }
    }
}

/// A public port of the enclosing cell to be moved.
#[derive(Debug, Clone, PartialEq)]
pub struct PortReplacement {
    /// The port to replace.
    pub name: ArcStr,
    /// Its new location, already named `name`.
    pub port: Port,
}

/// Edits to the enclosing cell that accompany a route.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Compensation {
    /// Wiring to embed in the enclosing cell.
    pub wires: Vec<Cell>,
    /// Public ports that move to the ends of `wires`.
    pub replacements: Vec<PortReplacement>,
}

impl Compensation {
    /// Returns `true` if applying this compensation would change nothing.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty() && self.replacements.is_empty()
    }
}

/// The result of routing a port pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutput {
    /// The wiring joining the two ports.
    pub route: Cell,
    /// Edits the enclosing cell needs for the route to be valid.
    pub compensation: Compensation,
}

impl RouteOutput {
    /// A route with no compensation.
    pub fn new(route: Cell) -> Self {
        Self {
            route,
            compensation: Compensation::default(),
        }
    }

    /// Embeds the compensation wiring in `top` and moves its ports,
    /// returning the route cell for the caller to place.
    ///
    /// Wires are embedded as instances named `compensation_<n>`, skipping
    /// any name `top` already uses. Replaced ports keep their position in
    /// the port order of `top`; ports `top` did not have are appended.
    pub fn apply(self, top: &mut Cell) -> Result<Cell> {
        let Compensation {
            wires,
            replacements,
        } = self.compensation;
        let mut taken: HashSet<ArcStr> = top.instances().map(|i| i.name().clone()).collect();
        let mut next = 0;
        for wire in wires {
            let name = loop {
                let name = arcstr::format!("compensation_{}", next);
                next += 1;
                if !taken.contains(&name) {
                    break name;
                }
            };
            taken.insert(name.clone());
            top.add_instance(Instance::new(name, wire));
        }
        for PortReplacement { name, port } in replacements {
            if top.try_port(&name).is_some() {
                top.replace_port(&name, &port)?;
            } else {
                top.add_port(port.with_name(name));
            }
        }
        Ok(self.route)
    }
}

/// The outcome of a specialized router.
#[derive(Debug, Clone, PartialEq)]
pub enum Specialized {
    /// The router handled the pair.
    Routed(RouteOutput),
    /// The pair is outside what the router knows how to wire.
    Unsupported(ArcStr),
}

impl Specialized {
    /// Converts [`Specialized::Unsupported`] into [`Error::UnsupportedTopology`].
    pub fn into_result(self) -> Result<RouteOutput> {
        match self {
            Specialized::Routed(output) => Ok(output),
            Specialized::Unsupported(reason) => Err(Error::UnsupportedTopology(reason)),
        }
    }
}
