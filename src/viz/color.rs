use palette::{LinSrgb, Mix, Srgb};

/// Colour of a marker or bar, 8-bit sRGB.
pub type Rgb8 = Srgb<u8>;

/// Colour used for values that cannot be placed on the ramp (NaN).
pub const MISSING_COLOR: Rgb8 = Srgb::new(160, 160, 160);

// ---------------------------------------------------------------------------
// Viridis ramp: value in [0, 1] → colour
// ---------------------------------------------------------------------------

/// Anchor points of matplotlib's viridis map, evenly spaced over [0, 1].
const VIRIDIS_ANCHORS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// Map `t` in `[0, 1]` onto the viridis ramp.
///
/// Values outside the range are clamped; NaN maps to [`MISSING_COLOR`].
pub fn viridis(t: f64) -> Rgb8 {
    if t.is_nan() {
        return MISSING_COLOR;
    }
    let segments = (VIRIDIS_ANCHORS.len() - 1) as f64;
    let pos = t.clamp(0.0, 1.0) * segments;
    let lo = (pos.floor() as usize).min(VIRIDIS_ANCHORS.len() - 2);
    let factor = (pos - lo as f64) as f32;
    if factor <= 0.0 {
        return anchor_srgb(lo);
    }
    if factor >= 1.0 {
        return anchor_srgb(lo + 1);
    }

    let a = anchor(lo);
    let b = anchor(lo + 1);
    let mixed: LinSrgb = a.mix(b, factor);
    Srgb::<f32>::from_linear(mixed).into_format::<u8>()
}

fn anchor_srgb(i: usize) -> Rgb8 {
    let (r, g, b) = VIRIDIS_ANCHORS[i];
    Srgb::new(r, g, b)
}

fn anchor(i: usize) -> LinSrgb {
    anchor_srgb(i).into_format::<f32>().into_linear()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_hits_its_endpoints() {
        assert_eq!(viridis(0.0), Srgb::new(68, 1, 84));
        assert_eq!(viridis(1.0), Srgb::new(253, 231, 37));
        assert_eq!(viridis(7.5), viridis(1.0));
        assert_eq!(viridis(-1.0), viridis(0.0));
        assert_eq!(viridis(f64::NAN), MISSING_COLOR);
    }
}
