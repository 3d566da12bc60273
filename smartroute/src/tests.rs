use std::cell::RefCell;

use arcstr::ArcStr;
use geometry::prelude::*;
use layir::{Cell, GdsLayer, LayirError, Port};
use test_log::test;

use crate::config::RouteOptions;
use crate::error::{Error, GeometryError, Result};
use crate::interdigitized::{
    route_four_transistor_interdigitized, route_two_transistor_interdigitized,
};
use crate::names::{Group, PortName, Role};
use crate::pdk::{GLayer, MappedPdk};
use crate::route::{route_common_centroid, RouteKind};
use crate::wires::{BasicWires, WireBuilder};
use crate::{smart_route, smart_route_in, RouteOutput, Specialized, Topology};

const MET1: GdsLayer = GdsLayer(68, 20);
const MET2: GdsLayer = GdsLayer(69, 20);

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Straight(ArcStr, ArcStr, RouteOptions),
    L(ArcStr, ArcStr),
    C(ArcStr, ArcStr, RouteOptions),
    Via(GLayer, GLayer),
}

/// Records each builder call, then draws the wire with [`BasicWires`].
#[derive(Debug, Default)]
struct Recorder {
    calls: RefCell<Vec<Call>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl WireBuilder for Recorder {
    fn straight_route(
        &self,
        pdk: &MappedPdk,
        p1: &Port,
        p2: &Port,
        opts: &RouteOptions,
    ) -> Result<Cell> {
        self.calls.borrow_mut().push(Call::Straight(
            p1.name().clone(),
            p2.name().clone(),
            opts.clone(),
        ));
        BasicWires.straight_route(pdk, p1, p2, opts)
    }

    fn l_route(
        &self,
        pdk: &MappedPdk,
        p1: &Port,
        p2: &Port,
        opts: &RouteOptions,
    ) -> Result<Cell> {
        self.calls
            .borrow_mut()
            .push(Call::L(p1.name().clone(), p2.name().clone()));
        BasicWires.l_route(pdk, p1, p2, opts)
    }

    fn c_route(
        &self,
        pdk: &MappedPdk,
        p1: &Port,
        p2: &Port,
        opts: &RouteOptions,
    ) -> Result<Cell> {
        self.calls.borrow_mut().push(Call::C(
            p1.name().clone(),
            p2.name().clone(),
            opts.clone(),
        ));
        BasicWires.c_route(pdk, p1, p2, opts)
    }

    fn via_stack(&self, pdk: &MappedPdk, g1: GLayer, g2: GLayer) -> Result<Cell> {
        self.calls.borrow_mut().push(Call::Via(g1, g2));
        BasicWires.via_stack(pdk, g1, g2)
    }
}

fn slot(group: Group, role: Role) -> i64 {
    group as i64 * 3 + role as i64
}

/// An interdigitized pair with every terminal on every edge.
///
/// Terminals are stacked 1 um apart on the west and east edges and
/// 600 nm apart on the north and south edges.
fn interdigitized(base: &str) -> Cell {
    let mut cell = Cell::new("interdigitized");
    for group in Group::ALL {
        for role in Role::ALL {
            let i = slot(group, role);
            for side in Side::ALL {
                let center = match side {
                    Side::Left => Point::new(0, 500 + 1000 * i),
                    Side::Right => Point::new(4000, 500 + 1000 * i),
                    Side::Top => Point::new(500 + 600 * i, 6000),
                    Side::Bot => Point::new(500 + 600 * i, 0),
                };
                let name = PortName {
                    base: base.to_string(),
                    group: Some(group),
                    role: Some(role),
                    side: Some(side),
                    private: false,
                };
                cell.add_port(Port::facing(
                    name.private().to_string(),
                    center,
                    200,
                    side,
                    MET1,
                ));
                cell.add_port(Port::facing(name.to_string(), center, 200, side, MET1));
            }
        }
    }
    Topology::TwoTransistorInterdigitized.tag(&mut cell);
    cell
}

fn route_pair(
    top: &Cell,
    topology: Topology,
    edge1: &Port,
    edge2: &Port,
) -> (Result<RouteOutput>, Vec<Call>) {
    let pdk = MappedPdk::sky130();
    let wires = Recorder::default();
    let output = smart_route(
        &pdk,
        &wires,
        edge1,
        edge2,
        Some((topology, top)),
        &RouteOptions::default(),
    );
    (output, wires.calls())
}

fn route_named(top: &Cell, a: &str, b: &str) -> (RouteOutput, Vec<Call>) {
    let (output, calls) = route_pair(
        top,
        Topology::TwoTransistorInterdigitized,
        top.port(a),
        top.port(b),
    );
    (output.unwrap(), calls)
}

#[test]
fn same_terminal_routes_nothing() {
    let top = interdigitized("");
    for (a, b) in [("A_source_W", "A_source_E"), ("A_gate_W", "A_gate_E")] {
        let (output, calls) = route_named(&top, a, b);
        assert!(output.route.is_empty(), "{a} to {b}");
        assert!(output.compensation.is_empty(), "{a} to {b}");
        assert!(calls.is_empty(), "{a} to {b}");
    }
}

#[test]
fn sources_share_a_via_beside_b() {
    let top = interdigitized("");
    let (output, calls) = route_named(&top, "A_source_W", "B_source_W");
    assert_eq!(calls, [Call::Via(GLayer::Met1, GLayer::Met1)]);
    assert!(output.compensation.is_empty());

    let bbox = output.route.bbox().unwrap();
    let anchor = top.port("B_source_W_private").center();
    assert_eq!(bbox.left(), anchor.x);
    assert_eq!(bbox.center().y, anchor.y);
}

#[test]
fn via_stack_climbs_to_second_port_layer() {
    let top = interdigitized("");
    let edge1 = top.port("A_drain_N");
    let b = top.port("B_drain_N");
    let edge2 = Port::new(b.name().clone(), b.center(), b.width(), b.orientation(), MET2);
    let (output, calls) = route_pair(&top, Topology::TwoTransistorInterdigitized, edge1, &edge2);
    output.unwrap();
    assert_eq!(calls, [Call::Via(GLayer::Met1, GLayer::Met2)]);
}

#[test]
fn via_cases_align_to_private_siblings() {
    let top = interdigitized("");
    for (a, b, anchor, side) in [
        ("A_source_W", "B_source_N", "B_source_W_private", Side::Left),
        ("B_drain_S", "A_drain_N", "A_drain_E_private", Side::Right),
        ("A_source_E", "A_drain_E", "A_drain_W_private", Side::Left),
        ("B_drain_W", "B_source_W", "B_source_E_private", Side::Right),
        ("B_drain_N", "A_source_N", "B_drain_W_private", Side::Left),
        ("B_source_S", "A_drain_S", "A_drain_E_private", Side::Right),
    ] {
        let (output, calls) = route_named(&top, a, b);
        assert_eq!(calls, [Call::Via(GLayer::Met1, GLayer::Met1)], "{a} to {b}");
        let bbox = output.route.bbox().unwrap();
        let anchor = top.port(anchor).center();
        match side {
            Side::Left => assert_eq!(bbox.left(), anchor.x, "{a} to {b}"),
            _ => assert_eq!(bbox.right(), anchor.x, "{a} to {b}"),
        }
        assert_eq!(bbox.center().y, anchor.y, "{a} to {b}");
    }
}

#[test]
fn gates_are_strapped_at_lesser_width() {
    let top = interdigitized("");
    let edge1 = top.port("A_gate_S").with_width(300);
    let edge2 = top.port("B_gate_S").with_width(250);
    let (output, calls) = route_pair(&top, Topology::TwoTransistorInterdigitized, &edge2, &edge1);
    assert!(output.unwrap().compensation.is_empty());
    assert_eq!(
        calls,
        [Call::Straight(
            "A_gate_S_private".into(),
            "B_gate_S_private".into(),
            RouteOptions {
                width: Some(250),
                ..RouteOptions::default()
            }
        )]
    );
}

#[test]
fn wide_gate_straps_are_clamped() {
    let top = interdigitized("");
    let edge1 = top.port("A_gate_N").with_width(3000);
    let edge2 = top.port("B_gate_N").with_width(2000);
    let (_, calls) = route_pair(&top, Topology::TwoTransistorInterdigitized, &edge1, &edge2);
    let Call::Straight(_, _, opts) = &calls[0] else {
        panic!("expected a straight route, got {:?}", calls);
    };
    assert_eq!(opts.width, Some(1000));
}

#[test]
fn gate_to_own_drain_c_routes_west_and_compensates() {
    let top = interdigitized("");
    let (output, calls) = route_named(&top, "A_gate_W", "A_drain_W");

    assert_eq!(
        calls[0],
        Call::C(
            "A_drain_W_private".into(),
            "A_gate_W_private".into(),
            RouteOptions {
                width2: Some(200),
                viaoffset: (false, true),
                ..RouteOptions::default()
            }
        )
    );
    assert_eq!(calls.len(), 7);
    for call in &calls[1..] {
        let Call::Straight(from, to, opts) = call else {
            panic!("expected a compensation wire, got {:?}", call);
        };
        assert!(from.ends_with("_W_private"));
        assert_eq!(to, "con_N");
        assert_eq!(opts.glayer2, Some(GLayer::Met1));
    }

    let con_n = output.route.port("con_N").center();
    assert_eq!(con_n.x, -500);

    let compensation = &output.compensation;
    assert_eq!(compensation.wires.len(), 6);
    let names: Vec<_> = compensation
        .replacements
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "A_source_W",
            "A_drain_W",
            "A_gate_W",
            "B_source_W",
            "B_drain_W",
            "B_gate_W"
        ]
    );
    for replacement in &compensation.replacements {
        assert_eq!(replacement.port.name(), &replacement.name);
        assert_eq!(replacement.port.side(), Some(Side::Left));
        assert_eq!(replacement.port.center().x, con_n.x);
        assert_eq!(
            replacement.port.center().y,
            top.port(&replacement.name).center().y
        );
    }
}

#[test]
fn source_to_other_gate_c_routes_toward_gate_owner() {
    let top = interdigitized("");

    let (output, calls) = route_named(&top, "A_gate_W", "B_source_E");
    assert_eq!(
        calls[0],
        Call::C(
            "B_source_W_private".into(),
            "A_gate_W_private".into(),
            RouteOptions {
                width2: Some(200),
                viaoffset: (true, true),
                ..RouteOptions::default()
            }
        )
    );
    assert!(output
        .compensation
        .replacements
        .iter()
        .all(|r| r.name.ends_with("_W")));

    let (output, calls) = route_named(&top, "B_gate_N", "A_drain_S");
    assert_eq!(
        calls[0],
        Call::C(
            "A_drain_E_private".into(),
            "B_gate_E_private".into(),
            RouteOptions {
                width2: Some(200),
                viaoffset: (false, true),
                ..RouteOptions::default()
            }
        )
    );
    let con_n = output.route.port("con_N").center();
    assert_eq!(con_n.x, 4500);
    for replacement in &output.compensation.replacements {
        assert!(replacement.name.ends_with("_E"));
        assert_eq!(replacement.port.center().x, 4500);
    }
}

#[test]
fn gate_c_routes_pick_side_and_via_offset() {
    let top = interdigitized("");
    for (a, b, sd, gate, viaoffset) in [
        ("A_source_N", "A_gate_S", "A_source_W_private", "A_gate_W_private", (true, true)),
        ("B_gate_W", "B_drain_W", "B_drain_E_private", "B_gate_E_private", (false, true)),
        ("B_source_E", "B_gate_E", "B_source_E_private", "B_gate_E_private", (true, true)),
        ("A_gate_N", "B_drain_S", "B_drain_W_private", "A_gate_W_private", (false, true)),
        ("A_source_W", "B_gate_W", "A_source_E_private", "B_gate_E_private", (true, true)),
    ] {
        let (output, calls) = route_named(&top, a, b);
        let Call::C(p1, p2, opts) = &calls[0] else {
            panic!("expected a C route for {a} to {b}, got {:?}", calls);
        };
        assert_eq!((p1.as_str(), p2.as_str()), (sd, gate), "{a} to {b}");
        assert_eq!(opts.viaoffset, viaoffset, "{a} to {b}");
        assert_eq!(output.compensation.replacements.len(), 6, "{a} to {b}");
    }
}

#[test]
fn applying_compensation_moves_public_ports_in_place() {
    let mut top = interdigitized("");
    let (output, _) = route_named(&top, "A_gate_W", "A_source_W");
    let order: Vec<ArcStr> = top.ports().map(|(name, _)| name.clone()).collect();
    let expected_route = output.route.clone();

    let route = output.apply(&mut top).unwrap();
    assert_eq!(route, expected_route);
    assert_eq!(top.instances().count(), 6);

    let moved = top.port("A_source_W");
    assert_eq!(moved.name(), "A_source_W");
    assert_eq!(moved.center(), Point::new(-500, 500));
    let private = top.port("A_source_W_private");
    assert_eq!(private.center(), Point::new(0, 500));

    let after: Vec<ArcStr> = top.ports().map(|(name, _)| name.clone()).collect();
    assert_eq!(after, order);
}

#[test]
fn repeated_compensation_gets_fresh_instance_names() {
    let mut top = interdigitized("");
    let (west, _) = route_named(&top, "A_gate_W", "A_drain_W");
    west.apply(&mut top).unwrap();
    let (east, _) = route_named(&top, "B_gate_E", "B_source_E");
    east.apply(&mut top).unwrap();

    let names: Vec<&str> = top.instances().map(|i| i.name().as_str()).collect();
    assert_eq!(names.len(), 12);
    let unique: std::collections::HashSet<&str> = names.iter().copied().collect();
    assert_eq!(unique.len(), 12);
    assert_eq!(names[6], "compensation_6");
    assert_eq!(top.port("A_source_W").center().x, -500);
    assert_eq!(top.port("B_source_E").center().x, 4500);
}

#[test]
fn missing_sibling_is_an_error() {
    let mut top = Cell::new("bare");
    top.add_port(Port::facing("A_gate_S", Point::new(0, 0), 200, Side::Bot, MET1));
    top.add_port(Port::facing("B_gate_S", Point::new(600, 0), 200, Side::Bot, MET1));
    let (output, calls) = route_pair(
        &top,
        Topology::TwoTransistorInterdigitized,
        top.port("A_gate_S"),
        top.port("B_gate_S"),
    );
    assert!(matches!(
        output,
        Err(Error::Layout(LayirError::MissingPort { ref port, .. })) if port == "A_gate_S_private"
    ));
    assert!(calls.is_empty());
}

#[test]
fn unsupported_pairs_fall_back_to_shape() {
    let top = interdigitized("");
    let vdd = Port::facing("vdd_W", Point::new(0, 0), 200, Side::Left, MET1);
    let out = Port::facing("out_W", Point::new(0, 800), 200, Side::Left, MET1);

    let pdk = MappedPdk::sky130();
    let direct = route_two_transistor_interdigitized(
        &pdk,
        &BasicWires,
        &vdd,
        &out,
        &top,
        &RouteOptions::default(),
    )
    .unwrap();
    assert!(matches!(
        direct.into_result(),
        Err(Error::UnsupportedTopology(_))
    ));

    let (output, calls) = route_pair(&top, Topology::TwoTransistorInterdigitized, &vdd, &out);
    assert!(output.unwrap().compensation.is_empty());
    assert_eq!(
        calls,
        [Call::C(
            "vdd_W".into(),
            "out_W".into(),
            RouteOptions::default()
        )]
    );
}

#[test]
fn ungrouped_gates_are_unsupported() {
    let top = interdigitized("");
    let g1 = Port::facing("gate_W", Point::new(0, 0), 200, Side::Left, MET1);
    let g2 = Port::facing("gate_E", Point::new(900, 0), 200, Side::Right, MET1);
    let pdk = MappedPdk::sky130();
    let result = route_two_transistor_interdigitized(
        &pdk,
        &BasicWires,
        &g1,
        &g2,
        &top,
        &RouteOptions::default(),
    )
    .unwrap();
    assert!(matches!(result, Specialized::Unsupported(_)));

    let (_, calls) = route_pair(&top, Topology::TwoTransistorInterdigitized, &g1, &g2);
    assert!(matches!(calls.as_slice(), [Call::Straight(..)]));
}

#[test]
fn non_manhattan_ports_are_rejected_before_routing() {
    let top = interdigitized("");
    let skew = Port::new("A_source_W", Point::zero(), 200, 45., MET1);
    let (output, calls) = route_pair(
        &top,
        Topology::TwoTransistorInterdigitized,
        &skew,
        top.port("B_source_W"),
    );
    match output {
        Err(Error::Geometry(GeometryError::NonManhattan { port, orientation })) => {
            assert_eq!(port, "A_source_W");
            approx::assert_relative_eq!(orientation, 45.);
        }
        other => panic!("expected a geometry error, got {:?}", other),
    }
    assert!(calls.is_empty());
}

#[test]
fn common_centroid_is_not_implemented() {
    let top = interdigitized("");
    let (output, calls) = route_pair(
        &top,
        Topology::CommonCentroid,
        top.port("A_source_W"),
        top.port("B_source_W"),
    );
    assert!(matches!(output, Err(Error::NotImplemented(_))));
    assert!(calls.is_empty());

    let pdk = MappedPdk::sky130();
    assert!(matches!(
        route_common_centroid(
            &pdk,
            &BasicWires,
            top.port("A_gate_N"),
            top.port("B_gate_N"),
            &top,
            &RouteOptions::default()
        ),
        Err(Error::NotImplemented(_))
    ));
}

#[test]
fn four_device_pairs_share_a_family_suffix() {
    let top = interdigitized("pair_m1");
    let (output, calls) = route_pair(
        &top,
        Topology::FourTransistorInterdigitized,
        top.port("pair_m1_A_gate_W"),
        top.port("pair_m1_A_drain_W"),
    );
    assert_eq!(output.unwrap().compensation.replacements.len(), 6);
    assert!(matches!(&calls[0], Call::C(p1, _, _) if p1 == "pair_m1_A_drain_W_private"));

    let pdk = MappedPdk::sky130();
    let opts = RouteOptions::default();
    let route = |a: &Port, b: &Port| {
        route_four_transistor_interdigitized(&pdk, &BasicWires, a, b, &top, &opts).unwrap()
    };
    let p = |name: &str| Port::facing(name, Point::zero(), 200, Side::Left, MET1);

    assert!(matches!(
        route(&p("left_m1_A_drain_W"), &p("right_m2_B_drain_W")),
        Specialized::Unsupported(_)
    ));
    assert!(matches!(
        route(&p("pair_m1_A_drain_W_private"), &p("pair_m1_B_drain_W")),
        Specialized::Unsupported(_)
    ));
    assert!(matches!(
        route(&p("pair_m1_vdd_W"), &p("pair_m1_B_drain_W")),
        Specialized::Unsupported(_)
    ));
}

#[test]
fn general_routes_follow_port_geometry() {
    let w = Port::facing("a_W", Point::new(0, 0), 200, Side::Left, MET1);
    let e_inline = Port::facing("b_E", Point::new(-2000, 0), 200, Side::Right, MET1);
    let w_offset = Port::facing("c_W", Point::new(-300, 900), 200, Side::Left, MET1);
    let n = Port::facing("d_N", Point::new(-1000, 700), 200, Side::Top, MET1);

    assert_eq!(RouteKind::classify(&w, &e_inline), RouteKind::Straight);
    assert_eq!(RouteKind::classify(&w, &w_offset), RouteKind::C);
    assert_eq!(RouteKind::classify(&w, &n), RouteKind::L);

    let pdk = MappedPdk::sky130();
    let wires = Recorder::default();
    let opts = RouteOptions::default();
    for other in [&e_inline, &w_offset, &n] {
        let output = smart_route(&pdk, &wires, &w, other, None, &opts).unwrap();
        assert!(output.compensation.is_empty());
    }
    assert_eq!(
        wires.calls(),
        [
            Call::Straight("a_W".into(), "b_E".into(), opts.clone()),
            Call::C("a_W".into(), "c_W".into(), opts.clone()),
            Call::L("a_W".into(), "d_N".into()),
        ]
    );
}

#[test]
fn topology_tags() {
    let mut cell = Cell::new("untagged");
    assert_eq!(Topology::of(&cell).unwrap(), None);
    for topology in [
        Topology::TwoTransistorInterdigitized,
        Topology::FourTransistorInterdigitized,
        Topology::CommonCentroid,
    ] {
        topology.tag(&mut cell);
        assert_eq!(Topology::of(&cell).unwrap(), Some(topology));
        assert_eq!(topology.to_string().parse::<Topology>().unwrap(), topology);
    }
    cell.set_info(crate::ROUTE_GENID, "abba");
    assert!(matches!(
        Topology::of(&cell),
        Err(Error::UnrecognizedTopology(tag)) if tag == "abba"
    ));
}

#[test]
fn smart_route_in_reads_reference_tag() {
    let top = interdigitized("");
    let pdk = MappedPdk::sky130();
    let opts = RouteOptions::default();
    let a = top.port("A_gate_W");
    let b = top.port("A_drain_W");

    let wires = Recorder::default();
    let output = smart_route_in(&pdk, &wires, a, b, Some(&top), Some(&top), &opts).unwrap();
    assert_eq!(output.compensation.wires.len(), 6);

    // Without an enclosing cell the tag is ignored.
    let wires = Recorder::default();
    let output = smart_route_in(&pdk, &wires, a, b, Some(&top), None, &opts).unwrap();
    assert!(output.compensation.is_empty());
    assert_eq!(
        wires.calls(),
        [Call::C("A_gate_W".into(), "A_drain_W".into(), opts.clone())]
    );

    let mut unknown = Cell::new("reference");
    unknown.set_info(crate::ROUTE_GENID, "abba");
    let wires = Recorder::default();
    let output = smart_route_in(&pdk, &wires, a, b, Some(&unknown), Some(&top), &opts).unwrap();
    assert!(output.compensation.is_empty());
    assert_eq!(wires.calls().len(), 1);
}
