//! Routing strategy selection.

use layir::{Cell, Port};
use tracing::{debug, warn};

use crate::config::RouteOptions;
use crate::error::{Error, Result};
use crate::interdigitized::{
    route_four_transistor_interdigitized, route_two_transistor_interdigitized,
};
use crate::pdk::MappedPdk;
use crate::predicates::{assert_manhattan, ports_inline, ports_parallel};
use crate::wires::WireBuilder;
use crate::{RouteOutput, Specialized, Topology};

/// The shape of a general point-to-point route.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RouteKind {
    /// Parallel ports on a common line.
    Straight,
    /// Parallel ports offset from each other.
    C,
    /// Perpendicular ports.
    L,
}

impl RouteKind {
    /// Picks a route shape for two Manhattan ports.
    pub fn classify(p1: &Port, p2: &Port) -> Self {
        if ports_parallel(p1, p2) {
            if ports_inline(p1, p2) {
                RouteKind::Straight
            } else {
                RouteKind::C
            }
        } else {
            RouteKind::L
        }
    }
}

/// Routes between `edge1` and `edge2`.
///
/// If `target` names the topology of the enclosing cell, the specialized
/// router for that topology runs first. A pair it does not support is
/// logged and routed by shape instead; any other error it returns is
/// propagated.
///
/// General routes come back without compensation.
pub fn smart_route<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    edge1: &Port,
    edge2: &Port,
    target: Option<(Topology, &Cell)>,
    opts: &RouteOptions,
) -> Result<RouteOutput> {
    assert_manhattan([edge1, edge2])?;

    if let Some((topology, top)) = target {
        debug!("trying {} routing for {} and {}", topology, edge1.name(), edge2.name());
        match route_specialized(pdk, wires, edge1, edge2, topology, top, opts)? {
            Specialized::Routed(output) => return Ok(output),
            Specialized::Unsupported(reason) => {
                warn!(
                    "attempted a specialized {} route, but failed ({}); \
                     falling back to general routing",
                    topology,
                    reason
                );
            }
        }
    }

    let kind = RouteKind::classify(edge1, edge2);
    debug!("{:?} route between {} and {}", kind, edge1.name(), edge2.name());
    let route = match kind {
        RouteKind::Straight => wires.straight_route(pdk, edge1, edge2, opts)?,
        RouteKind::C => wires.c_route(pdk, edge1, edge2, opts)?,
        RouteKind::L => wires.l_route(pdk, edge1, edge2, opts)?,
    };
    Ok(RouteOutput::new(route))
}

/// Routes between `edge1` and `edge2`, reading the topology from `ref_cell`.
///
/// Specialized routing needs both the reference cell carrying the topology
/// tag and the enclosing cell whose ports are looked up. If either is
/// missing, or the tag is not recognized, the ports are routed by shape.
pub fn smart_route_in<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    edge1: &Port,
    edge2: &Port,
    ref_cell: Option<&Cell>,
    top: Option<&Cell>,
    opts: &RouteOptions,
) -> Result<RouteOutput> {
    let target = match (ref_cell, top) {
        (Some(ref_cell), Some(top)) => match Topology::of(ref_cell) {
            Ok(topology) => topology.map(|topology| (topology, top)),
            Err(Error::UnrecognizedTopology(tag)) => {
                warn!("cell {} has unrecognized topology `{}`", ref_cell.name(), tag);
                None
            }
            Err(e) => return Err(e),
        },
        _ => None,
    };
    smart_route(pdk, wires, edge1, edge2, target, opts)
}

/// Dispatches to the specialized router for `topology`.
pub fn route_specialized<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    edge1: &Port,
    edge2: &Port,
    topology: Topology,
    top: &Cell,
    opts: &RouteOptions,
) -> Result<Specialized> {
    match topology {
        Topology::TwoTransistorInterdigitized => {
            route_two_transistor_interdigitized(pdk, wires, edge1, edge2, top, opts)
        }
        Topology::FourTransistorInterdigitized => {
            route_four_transistor_interdigitized(pdk, wires, edge1, edge2, top, opts)
        }
        Topology::CommonCentroid => route_common_centroid(pdk, wires, edge1, edge2, top, opts),
    }
}

/// Routes two terminals of a common-centroid array.
///
/// No wiring pattern exists for this arrangement yet, so this always fails
/// with [`Error::NotImplemented`].
pub fn route_common_centroid<W: WireBuilder + ?Sized>(
    _pdk: &MappedPdk,
    _wires: &W,
    _edge1: &Port,
    _edge2: &Port,
    _top: &Cell,
    _opts: &RouteOptions,
) -> Result<Specialized> {
    Err(Error::NotImplemented("common centroid routing"))
}
