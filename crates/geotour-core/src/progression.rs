//! Pure trigger evaluation.
//!
//! Given the catalog, a session cursor, and a GPS fix, decide what the fix
//! means for the session. Only the stop under the cursor is considered:
//! standing inside a later stop's geofence does nothing until every earlier
//! stop has triggered. No I/O happens here; persisting the result is the
//! engine's job.

use geotour_types::{Coordinates, Stop};

use crate::geo;

/// Outcome of comparing one GPS fix against a session's current target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation<'a> {
    /// The cursor is at or past the end of the catalog.
    Complete,
    /// The fix lies within the target's trigger radius.
    Inside {
        /// The target stop.
        stop: &'a Stop,
        /// Distance from the fix to the stop center, in meters.
        distance_m: f64,
    },
    /// The fix lies outside the target's trigger radius.
    Outside {
        /// The target stop.
        stop: &'a Stop,
        /// Distance from the fix to the stop center, in meters.
        distance_m: f64,
    },
}

/// Evaluate `fix` against the stop at `cursor` in `catalog`.
///
/// The boundary is inclusive: a fix exactly `radius_meters` away triggers.
pub fn evaluate(catalog: &[Stop], cursor: u32, fix: Coordinates) -> Evaluation<'_> {
    let index = usize::try_from(cursor).unwrap_or(usize::MAX);
    let Some(stop) = catalog.get(index) else {
        return Evaluation::Complete;
    };

    let distance_m = geo::distance_between(fix, stop.location());
    if distance_m <= stop.radius_meters {
        Evaluation::Inside { stop, distance_m }
    } else {
        Evaluation::Outside { stop, distance_m }
    }
}

/// Round a distance to whole meters for display, half away from zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_distance(distance_m: f64) -> u32 {
    // `as` saturates: NaN maps to 0, anything beyond u32::MAX to u32::MAX.
    distance_m.round() as u32
}
