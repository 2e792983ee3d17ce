//! Final image dimensions.
//!
//! Priority: both explicit dimensions, then metadata (scaling a single
//! explicit dimension by the aspect ratio, or capping oversized images),
//! then [`DEFAULT_SIZE`].

/// Size of an image with neither explicit nor probed dimensions.
pub const DEFAULT_SIZE: (u32, u32) = (400, 300);
/// Size of the placeholder emitted for images that could not be loaded.
pub const PLACEHOLDER_SIZE: (u32, u32) = (100, 100);
/// Largest dimension an image keeps when sized from metadata alone.
pub const MAX_SIZE: u32 = 600;

/// Resolves the `(width, height)` of an image.
///
/// `explicit` holds the node's own dimensions, `meta` the probed ones. Both
/// results are always positive.
pub fn resolve_size(
    explicit: (Option<u32>, Option<u32>),
    meta: (Option<u32>, Option<u32>),
) -> (u32, u32) {
    let meta = match meta {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    };

    match (explicit, meta) {
        ((Some(width), Some(height)), _) => (width, height),
        ((Some(width), None), Some((mw, mh))) => (width, scale(width, mh, mw)),
        ((None, Some(height)), Some((mw, mh))) => (scale(height, mw, mh), height),
        ((None, None), Some((mw, mh))) if mw > MAX_SIZE || mh > MAX_SIZE => {
            let ratio = f64::min(MAX_SIZE as f64 / mw as f64, MAX_SIZE as f64 / mh as f64);
            (round(mw as f64 * ratio), round(mh as f64 * ratio))
        }
        ((None, None), Some(size)) => size,
        _ => DEFAULT_SIZE,
    }
}

/// `value * num / den`, rounded.
fn scale(value: u32, num: u32, den: u32) -> u32 {
    round(value as f64 * num as f64 / den as f64)
}

/// Rounds half up, never below 1.
fn round(value: f64) -> u32 {
    (value + 0.5).floor().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_pair_wins() {
        assert_eq!(resolve_size((Some(10), Some(700)), (Some(1000), Some(50))), (10, 700));
        assert_eq!(resolve_size((Some(10), Some(20)), (None, None)), (10, 20));
    }

    #[test]
    fn single_explicit_keeps_ratio() {
        // 4:3 metadata
        assert_eq!(resolve_size((Some(200), None), (Some(800), Some(600))), (200, 150));
        assert_eq!(resolve_size((None, Some(150)), (Some(800), Some(600))), (200, 150));
        // half rounds up
        assert_eq!(resolve_size((Some(3), None), (Some(2), Some(1))), (3, 2));
        assert_eq!(resolve_size((None, Some(1)), (Some(3), Some(2))), (2, 1));
    }

    #[test]
    fn single_explicit_without_metadata() {
        assert_eq!(resolve_size((Some(200), None), (None, Some(10))), DEFAULT_SIZE);
        assert_eq!(resolve_size((None, Some(200)), (None, None)), DEFAULT_SIZE);
    }

    #[test]
    fn metadata_is_capped() {
        assert_eq!(resolve_size((None, None), (Some(320), Some(240))), (320, 240));
        assert_eq!(resolve_size((None, None), (Some(600), Some(600))), (600, 600));
        assert_eq!(resolve_size((None, None), (Some(1200), Some(800))), (600, 400));
        assert_eq!(resolve_size((None, None), (Some(500), Some(1000))), (300, 600));
        assert_eq!(resolve_size((None, None), (Some(6000), Some(1))), (600, 1));
    }

    #[test]
    fn capping_preserves_ratio() {
        for (mw, mh) in [(601, 599), (1920, 1080), (1000, 3), (777, 4096), (12345, 6789)] {
            let (w, h) = resolve_size((None, None), (Some(mw), Some(mh)));
            assert!(w.max(h) <= MAX_SIZE, "{mw}x{mh} -> {w}x{h}");
            let expected = w as f64 * mh as f64 / mw as f64;
            assert!((h as f64 - expected).abs() <= 1.0, "{mw}x{mh} -> {w}x{h}");
        }
    }

    #[test]
    fn nothing_known() {
        assert_eq!(resolve_size((None, None), (None, None)), DEFAULT_SIZE);
        assert_eq!(resolve_size((None, None), (Some(0), Some(10))), DEFAULT_SIZE);
    }
}
