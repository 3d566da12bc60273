//! The port naming convention of interdigitized device layouts.
//!
//! Layout generators encode a port's pin family, device group, electrical
//! role, and facing edge in its name:
//!
//! ```text
//! [base_][A|B_][source|drain|gate_](N|E|S|W)[_private]
//! ```
//!
//! The `_private` variant of a port is the raw device terminal; the public
//! port of the same name without the marker is what parents connect to.
//!
//! Tags are peeled off the end of a name, so a base must not itself end in
//! a tag token (`A`, `B`, a role, a single compass letter, or `private`).
//! In `cm_B_A_gate_W` the base is `cm_B`, but decoding `cm_B` alone
//! yields the base `cm`.

use std::fmt::Display;

use geometry::side::Side;
use serde::{Deserialize, Serialize};

const PRIVATE: &str = "private";

/// Which of two interleaved devices a port belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Group {
    A,
    B,
}

impl Group {
    pub const ALL: [Group; 2] = [Group::A, Group::B];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Group::A => "A",
            Group::B => "B",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "A" => Some(Group::A),
            "B" => Some(Group::B),
            _ => None,
        }
    }
}

/// The transistor terminal a port exposes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Source,
    Drain,
    Gate,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Source, Role::Drain, Role::Gate];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Source => "source",
            Role::Drain => "drain",
            Role::Gate => "gate",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "source" => Some(Role::Source),
            "drain" => Some(Role::Drain),
            "gate" => Some(Role::Gate),
            _ => None,
        }
    }
}

fn side_from_token(token: &str) -> Option<Side> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Side::from_compass(c),
        _ => None,
    }
}

/// A decoded port name.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PortName {
    pub base: String,
    pub group: Option<Group>,
    pub role: Option<Role>,
    pub side: Option<Side>,
    pub private: bool,
}

impl PortName {
    /// Decodes a port name by peeling tags off its end.
    ///
    /// Each tag is optional and recognized only in its own position; any
    /// name parses, with unrecognized tokens left in the base.
    ///
    /// ```
    /// # use smartroute::names::*;
    /// # use geometry::side::Side;
    /// let name = PortName::parse("diffpair_A_drain_W_private");
    /// assert_eq!(name.base, "diffpair");
    /// assert_eq!(name.group, Some(Group::A));
    /// assert_eq!(name.role, Some(Role::Drain));
    /// assert_eq!(name.side, Some(Side::Left));
    /// assert!(name.private);
    /// ```
    pub fn parse(name: &str) -> Self {
        let tokens: Vec<&str> = name.split('_').collect();
        let mut rest = tokens.as_slice();

        let private = matches!(rest.last(), Some(&PRIVATE));
        if private {
            rest = &rest[..rest.len() - 1];
        }
        let side = rest.last().and_then(|t| side_from_token(t));
        if side.is_some() {
            rest = &rest[..rest.len() - 1];
        }
        let role = rest.last().and_then(|t| Role::from_token(t));
        if role.is_some() {
            rest = &rest[..rest.len() - 1];
        }
        let group = rest.last().and_then(|t| Group::from_token(t));
        if group.is_some() {
            rest = &rest[..rest.len() - 1];
        }

        Self {
            base: rest.join("_"),
            group,
            role,
            side,
            private,
        }
    }

    /// The same port family member on another edge.
    pub fn with_side(&self, side: Side) -> Self {
        Self {
            side: Some(side),
            ..self.clone()
        }
    }

    /// The `_private` counterpart of this name.
    pub fn private(&self) -> Self {
        Self {
            private: true,
            ..self.clone()
        }
    }

    /// The public counterpart of this name.
    pub fn public(&self) -> Self {
        Self {
            private: false,
            ..self.clone()
        }
    }
}

impl Display for PortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        let mut token = |f: &mut std::fmt::Formatter<'_>, s: &str| -> std::fmt::Result {
            if s.is_empty() {
                return Ok(());
            }
            if !first {
                f.write_str("_")?;
            }
            first = false;
            f.write_str(s)
        };
        token(f, self.base.as_str())?;
        if let Some(group) = self.group {
            token(f, group.as_str())?;
        }
        if let Some(role) = self.role {
            token(f, role.as_str())?;
        }
        if let Some(side) = self.side {
            let mut buf = [0u8; 4];
            token(f, side.compass().encode_utf8(&mut buf))?;
        }
        if self.private {
            token(f, PRIVATE)?;
        }
        Ok(())
    }
}

/// Finds the device group and role tokens anywhere in `name`.
///
/// Names without them are legal; the missing parts come back as `None`.
///
/// ```
/// # use smartroute::names::*;
/// assert_eq!(parse_role("m1_B_gate_S"), (Some(Group::B), Some(Role::Gate)));
/// assert_eq!(parse_role("vdd_N"), (None, None));
/// ```
pub fn parse_role(name: &str) -> (Option<Group>, Option<Role>) {
    let mut group = None;
    let mut role = None;
    for token in name.split('_') {
        if let Some(g) = Group::from_token(token) {
            group = Some(g);
        }
        if let Some(r) = Role::from_token(token) {
            role = Some(r);
        }
    }
    (group, role)
}

/// The pin family shared by every edge, role, and group variant of `name`.
///
/// ```
/// # use smartroute::names::base_identifier;
/// assert_eq!(base_identifier("mirror_B_source_E"), "mirror");
/// assert_eq!(base_identifier("mirror"), "mirror");
/// ```
pub fn base_identifier(name: &str) -> String {
    PortName::parse(name).base
}

/// Composes the public name of a port family member.
///
/// ```
/// # use smartroute::names::*;
/// # use geometry::side::Side;
/// assert_eq!(sibling_name("mirror", Group::A, Role::Gate, Side::Bot), "mirror_A_gate_S");
/// assert_eq!(sibling_name("", Group::B, Role::Drain, Side::Top), "B_drain_N");
/// ```
pub fn sibling_name(base: &str, group: Group, role: Role, edge: Side) -> String {
    PortName {
        base: base.to_string(),
        group: Some(group),
        role: Some(role),
        side: Some(edge),
        private: false,
    }
    .to_string()
}
