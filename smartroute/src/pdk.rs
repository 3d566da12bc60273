//! Mapping between abstract routing layers and fabrication layers.

use std::fmt::Display;

use indexmap::IndexMap;
use layir::GdsLayer;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An abstract routing layer, ordered from the bottom of the stack up.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GLayer {
    Poly,
    Met1,
    Met2,
    Met3,
    Met4,
    Met5,
}

impl GLayer {
    /// Every routing layer, bottom first.
    pub const ALL: [GLayer; 6] = [
        GLayer::Poly,
        GLayer::Met1,
        GLayer::Met2,
        GLayer::Met3,
        GLayer::Met4,
        GLayer::Met5,
    ];

    /// The position of this layer in the stack, starting at 0 for poly.
    pub const fn level(&self) -> usize {
        *self as usize
    }

    /// The layer directly above this one, if any.
    pub fn above(&self) -> Option<GLayer> {
        Self::ALL.get(self.level() + 1).copied()
    }

    /// All layers from `a` to `b` inclusive, bottom first, regardless of argument order.
    pub fn span(a: GLayer, b: GLayer) -> &'static [GLayer] {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        &Self::ALL[lo.level()..=hi.level()]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            GLayer::Poly => "poly",
            GLayer::Met1 => "met1",
            GLayer::Met2 => "met2",
            GLayer::Met3 => "met3",
            GLayer::Met4 => "met4",
            GLayer::Met5 => "met5",
        }
    }
}

impl Display for GLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The drawing layer and minimum width of one routing layer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct LayerRule {
    pub glayer: GLayer,
    pub gds: GdsLayer,
    pub min_width: i64,
}

/// A cut connecting `below` to the layer directly above it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ViaRule {
    pub below: GLayer,
    pub cut: GdsLayer,
    /// Side length of the square cut.
    pub size: i64,
    /// Metal enclosure required around the cut on both layers.
    pub enclosure: i64,
}

impl ViaRule {
    /// The side length of the metal landing needed around this cut.
    pub const fn landing(&self) -> i64 {
        self.size + 2 * self.enclosure
    }
}

#[derive(Deserialize, Serialize)]
struct PdkFile {
    name: String,
    layers: Vec<LayerRule>,
    #[serde(default)]
    vias: Vec<ViaRule>,
}

/// A PDK reduced to what routing needs: a layer map and via rules.
///
/// Distances are in database units (1 nm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PdkFile", into = "PdkFile")]
pub struct MappedPdk {
    name: String,
    layers: IndexMap<GLayer, LayerRule>,
    vias: IndexMap<GLayer, ViaRule>,
}

impl From<PdkFile> for MappedPdk {
    fn from(value: PdkFile) -> Self {
        Self {
            name: value.name,
            layers: value.layers.into_iter().map(|l| (l.glayer, l)).collect(),
            vias: value.vias.into_iter().map(|v| (v.below, v)).collect(),
        }
    }
}

impl From<MappedPdk> for PdkFile {
    fn from(value: MappedPdk) -> Self {
        Self {
            name: value.name,
            layers: value.layers.into_values().collect(),
            vias: value.vias.into_values().collect(),
        }
    }
}

impl MappedPdk {
    /// Parses a PDK description from TOML.
    ///
    /// ```
    /// # use smartroute::pdk::{GLayer, MappedPdk};
    /// let pdk = MappedPdk::from_toml_str(r#"
    ///     name = "toy"
    ///     [[layers]]
    ///     glayer = "met1"
    ///     gds = [68, 20]
    ///     min_width = 140
    /// "#).unwrap();
    /// assert_eq!(pdk.layer(GLayer::Met1).unwrap(), layir::GdsLayer(68, 20));
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The SkyWater 130 nm layer map.
    pub fn sky130() -> Self {
        let layer = |glayer, gds, min_width| LayerRule {
            glayer,
            gds,
            min_width,
        };
        let via = |below, cut, size, enclosure| ViaRule {
            below,
            cut,
            size,
            enclosure,
        };
        PdkFile {
            name: "sky130".into(),
            layers: vec![
                layer(GLayer::Poly, GdsLayer(66, 20), 150),
                layer(GLayer::Met1, GdsLayer(68, 20), 140),
                layer(GLayer::Met2, GdsLayer(69, 20), 140),
                layer(GLayer::Met3, GdsLayer(70, 20), 300),
                layer(GLayer::Met4, GdsLayer(71, 20), 300),
                layer(GLayer::Met5, GdsLayer(72, 20), 1600),
            ],
            vias: vec![
                via(GLayer::Poly, GdsLayer(67, 44), 170, 80),
                via(GLayer::Met1, GdsLayer(68, 44), 150, 85),
                via(GLayer::Met2, GdsLayer(69, 44), 200, 65),
                via(GLayer::Met3, GdsLayer(70, 44), 200, 65),
                via(GLayer::Met4, GdsLayer(71, 44), 800, 310),
            ],
        }
        .into()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The drawing layer for `glayer`.
    pub fn layer(&self, glayer: GLayer) -> Result<GdsLayer> {
        Ok(self.rule(glayer)?.gds)
    }

    pub fn rule(&self, glayer: GLayer) -> Result<&LayerRule> {
        self.layers
            .get(&glayer)
            .ok_or(Error::UnmappedGLayer(glayer))
    }

    /// The routing layer drawn on `layer`.
    pub fn layer_to_glayer(&self, layer: GdsLayer) -> Result<GLayer> {
        self.layers
            .values()
            .find(|rule| rule.gds == layer)
            .map(|rule| rule.glayer)
            .ok_or(Error::UnmappedLayer(layer))
    }

    /// The cut between `below` and the layer directly above it.
    pub fn via_rule(&self, below: GLayer) -> Result<&ViaRule> {
        self.vias.get(&below).ok_or_else(|| {
            Error::MissingViaRule(below, below.above().unwrap_or(below))
        })
    }
}
