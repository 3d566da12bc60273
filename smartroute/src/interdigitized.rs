//! Routers for interdigitized transistor arrays.
//!
//! Interdigitized generators expose every terminal of each device on all
//! four edges, once as a `_private` port on the raw terminal and once as a
//! public port. These routers pick the shortest wiring for a terminal pair
//! by knowing where each terminal sits in the array.

use arcstr::ArcStr;
use geometry::align::{HAlign, VAlign};
use geometry::side::Side;
use layir::{Cell, Port};
use tracing::debug;

use crate::config::RouteOptions;
use crate::error::Result;
use crate::names::{Group, PortName, Role};
use crate::pdk::{GLayer, MappedPdk};
use crate::wires::{align_to_port, WireBuilder};
use crate::{Compensation, PortReplacement, RouteOutput, Specialized};

/// A parsed terminal with a known device group and role.
#[derive(Debug, Clone, Copy)]
struct Terminal<'a> {
    group: Group,
    role: Role,
    port: &'a Port,
}

impl<'a> Terminal<'a> {
    fn parse(port: &'a Port) -> Option<Self> {
        let name = PortName::parse(port.name());
        Some(Self {
            group: name.group?,
            role: name.role?,
            port,
        })
    }

    fn key(&self) -> (Group, Role) {
        (self.group, self.role)
    }
}

/// The `_private` sibling of `port` on edge `side` of `top`.
fn exchange<'a>(top: &'a Cell, port: &Port, side: Side) -> Result<&'a Port> {
    let name = PortName::parse(port.name()).with_side(side).private();
    Ok(top.get_port(&name.to_string())?)
}

/// Routes two terminals of a two-device interdigitized array.
///
/// Returns [`Specialized::Unsupported`] if either port lacks a device group
/// or role. Sibling ports are looked up on `top`, which is never modified;
/// any terminal rewiring the route needs comes back in the output's
/// [`Compensation`].
pub fn route_two_transistor_interdigitized<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    edge1: &Port,
    edge2: &Port,
    top: &Cell,
    opts: &RouteOptions,
) -> Result<Specialized> {
    let (Some(t1), Some(t2)) = (Terminal::parse(edge1), Terminal::parse(edge2)) else {
        return Ok(Specialized::Unsupported(arcstr::format!(
            "`{}` and `{}` do not both name a device terminal",
            edge1.name(),
            edge2.name()
        )));
    };

    if t1.key() == t2.key() {
        debug!("{} and {} are the same terminal", edge1.name(), edge2.name());
        return Ok(Specialized::Routed(RouteOutput::new(Cell::new("empty_route"))));
    }

    let glayer2 = pdk.layer_to_glayer(edge2.layer())?;
    let (lo, hi) = if t1.key() <= t2.key() { (t1, t2) } else { (t2, t1) };

    use Group::*;
    use Role::*;
    let output = match (lo.key(), hi.key()) {
        ((A, Source), (B, Source)) => via(pdk, wires, top, hi.port, Side::Left, glayer2)?,
        ((A, Gate), (B, Gate)) => {
            let p1 = exchange(top, lo.port, Side::Bot)?;
            let p2 = exchange(top, hi.port, Side::Bot)?;
            let width = edge1
                .width()
                .min(edge2.width())
                .min(opts.gate_route_max_width);
            debug!("strapping gates {} and {} at width {}", p1.name(), p2.name(), width);
            let strap = RouteOptions {
                width: Some(width),
                ..RouteOptions::default()
            };
            RouteOutput::new(wires.straight_route(pdk, p1, p2, &strap)?)
        }
        ((A, Drain), (B, Drain)) => via(pdk, wires, top, lo.port, Side::Right, glayer2)?,
        ((A, Source), (A, Drain)) => via(pdk, wires, top, hi.port, Side::Left, glayer2)?,
        ((B, Source), (B, Drain)) => via(pdk, wires, top, lo.port, Side::Right, glayer2)?,
        ((A, Source | Drain), (A, Gate)) => c_route(pdk, wires, top, lo, hi, Side::Left, opts)?,
        ((B, Source | Drain), (B, Gate)) => c_route(pdk, wires, top, lo, hi, Side::Right, opts)?,
        ((A, Gate), (B, Source | Drain)) => c_route(pdk, wires, top, hi, lo, Side::Left, opts)?,
        ((A, Source | Drain), (B, Gate)) => c_route(pdk, wires, top, lo, hi, Side::Right, opts)?,
        ((A, Source), (B, Drain)) => via(pdk, wires, top, hi.port, Side::Left, glayer2)?,
        ((A, Drain), (B, Source)) => via(pdk, wires, top, lo.port, Side::Right, glayer2)?,
        (a, b) => {
            return Ok(Specialized::Unsupported(arcstr::format!(
                "no interdigitized route from {:?} to {:?}",
                a,
                b
            )))
        }
    };
    Ok(Specialized::Routed(output))
}

/// A via stack from met1 to `glayer2`, placed beside the `side` sibling of `anchor`.
///
/// West anchors get the stack to their right; east anchors to their left.
fn via<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    top: &Cell,
    anchor: &Port,
    side: Side,
    glayer2: GLayer,
) -> Result<RouteOutput> {
    let target = exchange(top, anchor, side)?;
    let h = match side {
        Side::Left => HAlign::Right,
        _ => HAlign::Left,
    };
    debug!("via stack met1 to {} at {}", glayer2, target.name());
    let stack = wires.via_stack(pdk, GLayer::Met1, glayer2)?;
    Ok(RouteOutput::new(align_to_port(stack, target, h, VAlign::Center)))
}

/// A C route on `side` from a source or drain terminal to a gate terminal.
fn c_route<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    top: &Cell,
    sd: Terminal<'_>,
    gate: Terminal<'_>,
    side: Side,
    opts: &RouteOptions,
) -> Result<RouteOutput> {
    let p1 = exchange(top, sd.port, side)?;
    let p2 = exchange(top, gate.port, side)?;
    let c_opts = RouteOptions {
        width2: Some(gate.port.width()),
        viaoffset: (sd.role != Role::Drain, true),
        extension: opts.extension,
        ..RouteOptions::default()
    };
    debug!("C route on {} between {} and {}", side, p1.name(), p2.name());
    let route = wires.c_route(pdk, p1, p2, &c_opts)?;
    let extend_to = route.get_port("con_N")?.clone();
    let compensation = compensate_for_croutes(pdk, wires, top, sd.port, side, &extend_to)?;
    Ok(RouteOutput {
        route,
        compensation,
    })
}

/// Extends every terminal on edge `side` out to a C route.
///
/// A C route on one edge of the array cuts across the private ports of
/// every other terminal on that edge. For each group and role, a straight
/// wire runs from the `_private` port out to `extend_to`, and the public
/// port moves to the end of that wire.
pub fn compensate_for_croutes<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    top: &Cell,
    sample: &Port,
    side: Side,
    extend_to: &Port,
) -> Result<Compensation> {
    let base = PortName::parse(sample.name()).base;
    let mut compensation = Compensation::default();
    for group in Group::ALL {
        for role in Role::ALL {
            let public = PortName {
                base: base.clone(),
                group: Some(group),
                role: Some(role),
                side: Some(side),
                private: false,
            };
            let private = top.get_port(&public.private().to_string())?;
            let opts = RouteOptions {
                glayer2: Some(pdk.layer_to_glayer(private.layer())?),
                ..RouteOptions::default()
            };
            let wire = wires.straight_route(pdk, private, extend_to, &opts)?;
            let exposed = wire.get_port(&format!("route_{}", side.compass()))?;
            let name = ArcStr::from(public.to_string());
            debug!("compensating {} toward {}", name, extend_to.name());
            compensation.replacements.push(PortReplacement {
                port: exposed.with_name(name.clone()),
                name,
            });
            compensation.wires.push(wire);
        }
    }
    Ok(compensation)
}

/// Routes two terminals of a four-device interdigitized array.
///
/// Both ports must be public device terminals whose pin families end in
/// the same token, such as `top_m1_A_drain_W` and `bot_m1_B_gate_E`.
/// Accepted pairs are routed as in [`route_two_transistor_interdigitized`].
pub fn route_four_transistor_interdigitized<W: WireBuilder + ?Sized>(
    pdk: &MappedPdk,
    wires: &W,
    edge1: &Port,
    edge2: &Port,
    top: &Cell,
    opts: &RouteOptions,
) -> Result<Specialized> {
    let n1 = PortName::parse(edge1.name());
    let n2 = PortName::parse(edge2.name());
    let is_terminal = |n: &PortName| n.role.is_some() && !n.private;
    if !is_terminal(&n1) || !is_terminal(&n2) {
        return Ok(Specialized::Unsupported(arcstr::format!(
            "`{}` and `{}` are not both public device terminals",
            edge1.name(),
            edge2.name()
        )));
    }
    let suffix = |n: &PortName| n.base.rsplit('_').next().unwrap_or("").to_string();
    if suffix(&n1) != suffix(&n2) {
        return Ok(Specialized::Unsupported(arcstr::format!(
            "`{}` and `{}` belong to different device pairs",
            edge1.name(),
            edge2.name()
        )));
    }
    route_two_transistor_interdigitized(pdk, wires, edge1, edge2, top, opts)
}
