//! Stroke recording and arc-length resampling for bulk lens placement.

use crumple_engine::coords::Vec2;

/// Polyline recorded while a stroke gesture is held, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Vec2>,
}

impl Stroke {
    pub fn begin(start: Vec2) -> Self {
        Self { points: vec![start] }
    }

    /// Appends `p` when it is more than `min_step` away from the last point.
    pub fn push(&mut self, p: Vec2, min_step: f32) -> bool {
        let far_enough = self
            .points
            .last()
            .is_none_or(|last| (p - *last).length_squared() > min_step * min_step);
        if far_enough {
            self.points.push(p);
        }
        far_enough
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Resamples a polyline at fixed arc-length `spacing`.
///
/// The first point is always kept; the final point is appended unless it
/// coincides with the last sample.
pub fn resample_by_spacing(points: &[Vec2], spacing: f32) -> Vec<Vec2> {
    if points.len() <= 1 || !(spacing > 0.0) {
        return points.to_vec();
    }

    let mut out = vec![points[0]];
    // Arc length travelled since the last emitted sample; always < spacing.
    let mut carried = 0.0_f32;

    for seg in points.windows(2) {
        let (mut a, b) = (seg[0], seg[1]);
        let mut len = a.distance(b);
        while carried + len >= spacing {
            let sample = a.lerp(b, (spacing - carried) / len);
            if sample == a {
                // Step below f32 resolution; skip the rest of this segment.
                len = 0.0;
                carried = 0.0;
                break;
            }
            out.push(sample);
            a = sample;
            len = a.distance(b);
            carried = 0.0;
        }
        carried += len;
    }

    if let (Some(&end), Some(&last)) = (points.last(), out.last()) {
        if (end - last).length_squared() > f32::EPSILON {
            out.push(end);
        }
    }
    out
}
