//! A small layout intermediate representation.
//!
//! Cells hold rectangles on GDS layers, embedded child cells, an ordered
//! map of named, oriented ports, and free-form string metadata.


use arcstr::ArcStr;
use geometry::bbox::{union_all, Bbox};
use geometry::prelude::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A GDS layer specification: `(layer, datatype)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct GdsLayer(pub u16, pub u16);

impl std::fmt::Display for GdsLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, self.1)
    }
}

/// The [`LayirError`] result type.
pub type LayirResult<T> = Result<T, LayirError>;

/// An error manipulating a layout cell.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayirError {
    /// The named port does not exist on the cell.
    #[error("cell `{cell}` has no port named `{port}`")]
    MissingPort {
        /// The cell that was searched.
        cell: ArcStr,
        /// The port that was requested.
        port: ArcStr,
    },
}

/// A location at which a cell should be connected.
///
/// Ports are edges: a segment of length `width` centered on `center`,
/// facing outward at `orientation` degrees (0 is east, 90 is north).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    name: ArcStr,
    center: Point,
    width: i64,
    orientation: f64,
    layer: GdsLayer,
}

impl Port {
    /// Creates a new port.
    pub fn new(
        name: impl Into<ArcStr>,
        center: Point,
        width: i64,
        orientation: f64,
        layer: GdsLayer,
    ) -> Self {
        Self {
            name: name.into(),
            center,
            width,
            orientation,
            layer,
        }
    }

    /// Creates a port facing the given side.
    #[inline]
    pub fn facing(
        name: impl Into<ArcStr>,
        center: Point,
        width: i64,
        side: Side,
        layer: GdsLayer,
    ) -> Self {
        Self::new(name, center, width, side.angle(), layer)
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.width
    }

    /// The outward-facing angle of the port, in degrees.
    #[inline]
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    #[inline]
    pub fn layer(&self) -> GdsLayer {
        self.layer
    }

    /// The side this port faces, or `None` if its orientation is not Manhattan.
    #[inline]
    pub fn side(&self) -> Option<Side> {
        Side::from_angle(self.orientation)
    }

    /// Returns a copy of this port with a different name.
    pub fn with_name(&self, name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this port with a different width.
    pub fn with_width(&self, width: i64) -> Self {
        Self {
            width,
            ..self.clone()
        }
    }
}

impl Bbox for Port {
    /// The zero-thickness segment spanned by the port.
    ///
    /// Non-Manhattan ports are reported as their center point.
    fn bbox(&self) -> Option<Rect> {
        let Some(side) = self.side() else {
            return Some(Rect::from_point(self.center));
        };
        let along = side.edge_dir();
        Some(Rect::from_dir_spans(
            along,
            Span::from_center_span(self.center.coord(along), self.width),
            Span::from_point(self.center.coord(side.coord_dir())),
        ))
    }
}

impl TranslateMut for Port {
    fn translate_mut(&mut self, p: Point) {
        self.center.translate_mut(p);
    }
}

/// A rectangle drawn on a layer.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    layer: GdsLayer,
    rect: Rect,
}

impl Shape {
    #[inline]
    pub fn new(layer: GdsLayer, rect: Rect) -> Self {
        Self { layer, rect }
    }

    #[inline]
    pub fn layer(&self) -> GdsLayer {
        self.layer
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl Bbox for Shape {
    fn bbox(&self) -> Option<Rect> {
        Some(self.rect)
    }
}

impl TranslateMut for Shape {
    fn translate_mut(&mut self, p: Point) {
        self.rect.translate_mut(p);
    }
}

/// A named, already-placed copy of a child cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    name: ArcStr,
    cell: Cell,
}

impl Instance {
    pub fn new(name: impl Into<ArcStr>, cell: Cell) -> Self {
        Self {
            name: name.into(),
            cell,
        }
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn cell(&self) -> &Cell {
        &self.cell
    }
}

impl Bbox for Instance {
    fn bbox(&self) -> Option<Rect> {
        self.cell.bbox()
    }
}

impl TranslateMut for Instance {
    fn translate_mut(&mut self, p: Point) {
        self.cell.translate_mut(p);
    }
}

/// A layout cell.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    name: ArcStr,
    elements: Vec<Shape>,
    instances: Vec<Instance>,
    ports: IndexMap<ArcStr, Port>,
    info: IndexMap<ArcStr, ArcStr>,
}

impl Cell {
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The name of the cell.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Returns `true` if the cell has no shapes, instances, or ports.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.instances.is_empty() && self.ports.is_empty()
    }

    /// Iterate over the ports of this cell, in insertion order.
    #[inline]
    pub fn ports(&self) -> impl Iterator<Item = (&ArcStr, &Port)> {
        self.ports.iter()
    }

    /// Adds a port keyed by its own name, replacing any port of the same name.
    pub fn add_port(&mut self, port: Port) {
        self.ports.insert(port.name.clone(), port);
    }

    /// Get a port of this cell by name.
    ///
    /// # Panics
    ///
    /// Panics if the provided port does not exist.
    #[inline]
    pub fn port(&self, name: &str) -> &Port {
        match self.try_port(name) {
            Some(port) => port,
            None => {
                tracing::error!("no port named `{}` on cell `{}`", name, self.name);
                panic!("no port named `{}` on cell `{}`", name, self.name);
            }
        }
    }

    /// Get a port of this cell by name.
    #[inline]
    pub fn try_port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    /// Get a port of this cell by name, or a [`LayirError::MissingPort`].
    pub fn get_port(&self, name: &str) -> LayirResult<&Port> {
        self.try_port(name).ok_or_else(|| LayirError::MissingPort {
            cell: self.name.clone(),
            port: name.into(),
        })
    }

    /// Replaces the port stored under `name` with `port`, renamed to `name`.
    ///
    /// The replacement keeps the original port's position in the port order.
    /// Returns the port that was replaced.
    pub fn replace_port(&mut self, name: &str, port: &Port) -> LayirResult<Port> {
        let slot = self
            .ports
            .get_mut(name)
            .ok_or_else(|| LayirError::MissingPort {
                cell: self.name.clone(),
                port: name.into(),
            })?;
        let renamed = port.with_name(slot.name.clone());
        Ok(std::mem::replace(slot, renamed))
    }

    /// Add the given instance to the cell.
    #[inline]
    pub fn add_instance(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    /// Iterate over the instances of this cell.
    #[inline]
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    pub fn add_element(&mut self, element: Shape) {
        self.elements.push(element)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Shape> {
        self.elements.iter()
    }

    /// Reads a metadata entry.
    #[inline]
    pub fn info(&self, key: &str) -> Option<&ArcStr> {
        self.info.get(key)
    }

    /// Sets a metadata entry, returning the previous value.
    pub fn set_info(&mut self, key: impl Into<ArcStr>, value: impl Into<ArcStr>) -> Option<ArcStr> {
        self.info.insert(key.into(), value.into())
    }
}

impl Bbox for Cell {
    fn bbox(&self) -> Option<Rect> {
        union_all(
            self.elements
                .iter()
                .map(Bbox::bbox)
                .chain(self.instances.iter().map(Bbox::bbox)),
        )
    }
}

impl TranslateMut for Cell {
    fn translate_mut(&mut self, p: Point) {
        self.elements.translate_mut(p);
        self.instances.translate_mut(p);
        for port in self.ports.values_mut() {
            port.translate_mut(p);
        }
    }
}
