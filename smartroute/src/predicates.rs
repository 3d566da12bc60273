//! Orientation checks on port pairs.

use geometry::dir::Dir;
use geometry::side::Side;
use layir::Port;

use crate::error::GeometryError;

/// Fails if any port does not face one of the four compass directions.
pub fn assert_manhattan<'a>(
    ports: impl IntoIterator<Item = &'a Port>,
) -> Result<(), GeometryError> {
    for port in ports {
        if port.side().is_none() {
            return Err(GeometryError::NonManhattan {
                port: port.name().clone(),
                orientation: port.orientation(),
            });
        }
    }
    Ok(())
}

/// The side `port` faces, or a [`GeometryError::NonManhattan`].
pub(crate) fn side_of(port: &Port) -> Result<Side, GeometryError> {
    port.side().ok_or_else(|| GeometryError::NonManhattan {
        port: port.name().clone(),
        orientation: port.orientation(),
    })
}

/// The axis along which a Manhattan port faces.
fn facing_dir(port: &Port) -> Option<Dir> {
    port.side().map(|side| side.coord_dir())
}

/// Returns `true` if both ports face along the same axis.
///
/// East and west are parallel, as are north and south.
pub fn ports_parallel(p1: &Port, p2: &Port) -> bool {
    match (facing_dir(p1), facing_dir(p2)) {
        (Some(d1), Some(d2)) => d1 == d2,
        _ => false,
    }
}

/// Returns `true` if the ports are parallel and a single straight wire
/// along their facing axis joins them.
pub fn ports_inline(p1: &Port, p2: &Port) -> bool {
    if !ports_parallel(p1, p2) {
        return false;
    }
    let Some(dir) = facing_dir(p1) else {
        return false;
    };
    let across = dir.other();
    p1.center().coord(across) == p2.center().coord(across)
}
