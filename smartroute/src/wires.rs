//! Point-to-point wire builders.
//!
//! The routers only ever talk to [`WireBuilder`]. [`BasicWires`] draws each
//! route as a handful of rectangles, which is enough to generate
//! connected, inspectable geometry without a full layout framework.

use arcstr::ArcStr;
use geometry::align::{HAlign, VAlign};
use geometry::prelude::*;
use layir::{Cell, GdsLayer, Instance, Port, Shape};

use crate::config::RouteOptions;
use crate::error::{GeometryError, Result};
use crate::pdk::{GLayer, MappedPdk};
use crate::predicates::side_of;

/// Builds the wiring sub-cells that routers place.
pub trait WireBuilder {
    /// Extends a wire from `p1` along its facing axis until it reaches `p2`.
    ///
    /// Exposes `route_N`, `route_E`, `route_S`, and `route_W`.
    fn straight_route(
        &self,
        pdk: &MappedPdk,
        p1: &Port,
        p2: &Port,
        opts: &RouteOptions,
    ) -> Result<Cell>;

    /// Joins two perpendicular ports with one bend.
    ///
    /// Exposes `route_N`, `route_E`, `route_S`, and `route_W` around the bend.
    fn l_route(&self, pdk: &MappedPdk, p1: &Port, p2: &Port, opts: &RouteOptions)
        -> Result<Cell>;

    /// Joins two parallel ports with two legs and a connecting bar.
    ///
    /// Exposes `con_N`, `con_E`, `con_S`, and `con_W` around the bar.
    fn c_route(&self, pdk: &MappedPdk, p1: &Port, p2: &Port, opts: &RouteOptions)
        -> Result<Cell>;

    /// A stack of vias connecting `g1` to `g2`, centered on the origin.
    ///
    /// Exposes `bottom_met_*` and `top_met_*` ports on each side.
    fn via_stack(&self, pdk: &MappedPdk, g1: GLayer, g2: GLayer) -> Result<Cell>;
}

/// Places `cell` relative to the center of `port`.
///
/// Cells without geometry are positioned as if they were a single point at
/// the origin.
pub fn align_to_port(mut cell: Cell, port: &Port, h: HAlign, v: VAlign) -> Cell {
    let extent = cell.bbox().unwrap_or_default();
    cell.align_to_point(extent, port.center(), h, v);
    cell
}

/// Adds one port per side of `rect`, named `{prefix}_N` and so on.
fn add_side_ports(cell: &mut Cell, prefix: &str, rect: Rect, layer: GdsLayer) {
    for side in Side::ALL {
        cell.add_port(Port::facing(
            format!("{}_{}", prefix, side.compass()),
            rect.side_center(side),
            rect.length(side.edge_dir()),
            side,
            layer,
        ));
    }
}

/// Rectangle-only implementations of the wire builders.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicWires;

impl BasicWires {
    fn glayer_or(pdk: &MappedPdk, glayer: Option<GLayer>, port: &Port) -> Result<GLayer> {
        match glayer {
            Some(glayer) => Ok(glayer),
            None => pdk.layer_to_glayer(port.layer()),
        }
    }

    /// Adds a via stack between `a` and `b` centered on `at`, if they differ.
    fn add_via(
        &self,
        cell: &mut Cell,
        pdk: &MappedPdk,
        a: GLayer,
        b: GLayer,
        at: Point,
        name: &str,
    ) -> Result<()> {
        if a == b {
            return Ok(());
        }
        let via = self.via_stack(pdk, a, b)?.translate(at);
        cell.add_instance(Instance::new(name, via));
        Ok(())
    }

    fn via_landing(pdk: &MappedPdk, a: GLayer, b: GLayer) -> Result<i64> {
        let layers = GLayer::span(a, b);
        let mut landing = 0;
        for glayer in &layers[..layers.len() - 1] {
            landing = landing.max(pdk.via_rule(*glayer)?.landing());
        }
        Ok(landing)
    }
}

impl WireBuilder for BasicWires {
    fn straight_route(
        &self,
        pdk: &MappedPdk,
        p1: &Port,
        p2: &Port,
        opts: &RouteOptions,
    ) -> Result<Cell> {
        let side = side_of(p1)?;
        let glayer1 = Self::glayer_or(pdk, opts.glayer1, p1)?;
        let glayer2 = Self::glayer_or(pdk, opts.glayer2, p2)?;
        let width = opts.width.unwrap_or(p1.width());

        let along = side.coord_dir();
        let start = p1.center().coord(along);
        let stop = p2.center().coord(along);
        let track = p1.center().coord(along.other());
        let rect = Rect::from_dir_spans(
            along,
            Span::new(start, stop),
            Span::from_center_span(track, width),
        );

        let layer = pdk.layer(glayer1)?;
        let mut cell = Cell::new("straight_route");
        cell.add_element(Shape::new(layer, rect));
        self.add_via(
            &mut cell,
            pdk,
            glayer1,
            glayer2,
            Point::from_dir_coords(along, stop, track),
            "end_via",
        )?;
        add_side_ports(&mut cell, "route", rect, layer);
        Ok(cell)
    }

    fn l_route(
        &self,
        pdk: &MappedPdk,
        p1: &Port,
        p2: &Port,
        opts: &RouteOptions,
    ) -> Result<Cell> {
        let s1 = side_of(p1)?;
        let s2 = side_of(p2)?;
        if s1.coord_dir() == s2.coord_dir() {
            return Err(
                GeometryError::NotPerpendicular(p1.name().clone(), p2.name().clone()).into(),
            );
        }
        let glayer1 = Self::glayer_or(pdk, opts.glayer1, p1)?;
        let glayer2 = Self::glayer_or(pdk, opts.glayer2, p2)?;
        let w1 = opts.width.unwrap_or(p1.width());
        let w2 = opts.width2.unwrap_or(p2.width());

        let d1 = s1.coord_dir();
        let d2 = s2.coord_dir();
        let corner = Point::from_dir_coords(d1, p2.center().coord(d1), p1.center().coord(d2));

        // Each leg overshoots the corner by half the other leg's width so the bend is filled.
        let leg1 = Rect::from_dir_spans(
            d1,
            Span::new(p1.center().coord(d1), corner.coord(d1)).expand_all(w2 / 2),
            Span::from_center_span(corner.coord(d2), w1),
        );
        let leg2 = Rect::from_dir_spans(
            d2,
            Span::new(p2.center().coord(d2), corner.coord(d2)).expand_all(w1 / 2),
            Span::from_center_span(corner.coord(d1), w2),
        );

        let mut cell = Cell::new("L_route");
        cell.add_element(Shape::new(pdk.layer(glayer1)?, leg1));
        cell.add_element(Shape::new(pdk.layer(glayer2)?, leg2));
        self.add_via(&mut cell, pdk, glayer1, glayer2, corner, "corner_via")?;

        let bend = Rect::from_dir_spans(
            d1,
            Span::from_center_span(corner.coord(d1), w2),
            Span::from_center_span(corner.coord(d2), w1),
        );
        add_side_ports(&mut cell, "route", bend, pdk.layer(glayer2)?);
        Ok(cell)
    }

    fn c_route(
        &self,
        pdk: &MappedPdk,
        p1: &Port,
        p2: &Port,
        opts: &RouteOptions,
    ) -> Result<Cell> {
        let s1 = side_of(p1)?;
        let s2 = side_of(p2)?;
        if s1.coord_dir() != s2.coord_dir() {
            return Err(GeometryError::NotParallel(p1.name().clone(), p2.name().clone()).into());
        }
        let glayer1 = Self::glayer_or(pdk, opts.glayer1, p1)?;
        let glayer2 = Self::glayer_or(pdk, opts.glayer2, p2)?;
        let cglayer = match opts.cglayer {
            Some(cglayer) => cglayer,
            None => glayer1.max(glayer2).above().unwrap_or(glayer1.max(glayer2)),
        };
        let w1 = opts.width.unwrap_or(p1.width());
        let w2 = opts.width2.unwrap_or(p2.width());
        let bar_width = w1.max(w2);

        let out = s1.coord_dir();
        let across = out.other();
        let (c1, c2) = (p1.center().coord(out), p2.center().coord(out));
        let bar_coord = if s1.sign() > 0 {
            c1.max(c2) + opts.extension
        } else {
            c1.min(c2) - opts.extension
        };
        let (t1, t2) = (p1.center().coord(across), p2.center().coord(across));

        let bar = Rect::from_dir_spans(
            across,
            Span::new(t1, t2).expand_all(bar_width / 2),
            Span::from_center_span(bar_coord, bar_width),
        );

        let mut cell = Cell::new("C_route");
        let bar_layer = pdk.layer(cglayer)?;
        cell.add_element(Shape::new(bar_layer, bar));

        let legs = [
            (c1, t1, w1, glayer1, opts.viaoffset.0, t2),
            (c2, t2, w2, glayer2, opts.viaoffset.1, t1),
        ];
        for (i, (c, t, w, glayer, offset, other)) in legs.into_iter().enumerate() {
            let leg = Rect::from_dir_spans(
                out,
                Span::new(c, bar_coord).expand_all(bar_width / 2),
                Span::from_center_span(t, w),
            );
            cell.add_element(Shape::new(pdk.layer(glayer)?, leg));
            if glayer == cglayer {
                continue;
            }
            let mut via_at = Point::from_dir_coords(out, bar_coord, t);
            if offset && other != t {
                let nudge = Self::via_landing(pdk, glayer, cglayer)? / 2;
                let toward = if other > t { nudge } else { -nudge };
                via_at = via_at.with_coord(across, t + toward);
            }
            self.add_via(&mut cell, pdk, glayer, cglayer, via_at, &format!("via{}", i + 1))?;
        }

        add_side_ports(&mut cell, "con", bar, bar_layer);
        Ok(cell)
    }

    fn via_stack(&self, pdk: &MappedPdk, g1: GLayer, g2: GLayer) -> Result<Cell> {
        let layers = GLayer::span(g1, g2);
        let bottom = layers[0];
        let top = layers[layers.len() - 1];

        let mut size = pdk.rule(bottom)?.min_width.max(pdk.rule(top)?.min_width);
        size = size.max(Self::via_landing(pdk, bottom, top)?);
        let pad = Rect::from_spans(
            Span::from_center_span(0, size),
            Span::from_center_span(0, size),
        );

        let mut cell = Cell::new(ArcStr::from(format!("via_stack_{}_{}", bottom, top)));
        for glayer in layers {
            cell.add_element(Shape::new(pdk.layer(*glayer)?, pad));
        }
        for glayer in &layers[..layers.len() - 1] {
            let rule = pdk.via_rule(*glayer)?;
            let cut = Rect::from_spans(
                Span::from_center_span(0, rule.size),
                Span::from_center_span(0, rule.size),
            );
            cell.add_element(Shape::new(rule.cut, cut));
        }
        add_side_ports(&mut cell, "bottom_met", pad, pdk.layer(bottom)?);
        add_side_ports(&mut cell, "top_met", pad, pdk.layer(top)?);
        Ok(cell)
    }
}
