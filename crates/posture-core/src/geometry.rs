//! Planar angle computation.

use crate::error::{PostureError, PostureResult};
use crate::Point;

/// Rays shorter than this are treated as zero-length.
const MIN_RAY_LENGTH: f64 = 1e-9;

/// Interior angle at vertex `b` between rays `b→a` and `b→c`, in degrees.
///
/// The cosine is clamped to `[-1, 1]` before `acos` so floating-point drift on
/// collinear inputs cannot produce NaN. Clamping does not help when one of the
/// rays has no length (the ratio is 0/0), so that case and any non-finite
/// input return [`PostureError::DegenerateAngle`] instead of a number.
pub fn angle_at_vertex(a: Point, b: Point, c: Point) -> PostureResult<f64> {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Err(degenerate(b));
    }

    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let norm_ba = bax.hypot(bay);
    let norm_bc = bcx.hypot(bcy);
    if norm_ba < MIN_RAY_LENGTH || norm_bc < MIN_RAY_LENGTH {
        return Err(degenerate(b));
    }

    let cosine = ((bax * bcx + bay * bcy) / (norm_ba * norm_bc)).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

/// Round to one decimal place, the precision angles are reported with.
///
/// Rounds the exact binary value of `value`, so `0.15` (stored just below
/// 0.15) becomes `0.1`. Only exact ties such as `0.25` go to the even digit.
/// `value * 10.0` alone would round twice and push both of those up.
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let mut lower = (value * 10.0).floor();
    // The product can round up onto an integer the exact value is below.
    if value.mul_add(10.0, -lower) < 0.0 {
        lower -= 1.0;
    }

    // Sign of the exact `20 * value - (2 * lower + 1)`: which side of the
    // midpoint between `lower` and `lower + 1` the value sits on.
    let offset = value.mul_add(20.0, -(2.0 * lower + 1.0));
    let tenths = if offset < 0.0 {
        lower
    } else if offset > 0.0 || lower.rem_euclid(2.0) == 1.0 {
        lower + 1.0
    } else {
        lower
    };
    tenths / 10.0
}

fn degenerate(vertex: Point) -> PostureError {
    PostureError::DegenerateAngle {
        vertex: format!("({:.4}, {:.4})", vertex.x, vertex.y),
    }
}
