use crate::error::{Result, TimelineError};

use super::time::{TimePoint, MILLIS_PER_DAY, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

const ZOOM_STEP: f64 = 1.2;
const MIN_WINDOW_MS: i64 = MILLIS_PER_MINUTE;
const MAX_WINDOW_MS: i64 = 3650 * MILLIS_PER_DAY;

/// The visible time window and the pixel width it is drawn into.
///
/// Converts between the time axis and horizontal pixel offsets measured from
/// the left edge of the time area. Nothing is clamped: offsets outside
/// `[0, width]` extrapolate linearly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport<T> {
    /// The leftmost visible time.
    pub start: T,
    /// The rightmost visible time.
    pub end: T,
    /// Width of the time area in pixels.
    pub width: f32,
}

impl<T: TimePoint> TimelineViewport<T> {
    pub fn new(start: T, end: T, width: f32) -> Result<Self> {
        if end <= start {
            return Err(TimelineError::EmptyWindow {
                start_ms: start.to_millis(),
                end_ms: end.to_millis(),
            });
        }
        Ok(Self { start, end, width })
    }

    pub fn duration_millis(&self) -> i64 {
        self.end.to_millis() - self.start.to_millis()
    }

    /// Linear scale factor of the window.
    pub fn pixels_per_milli(&self) -> f64 {
        self.width as f64 / self.duration_millis() as f64
    }

    /// Time under a pixel offset, optionally snapped to `snap_seconds`.
    pub fn time_at_pixel(&self, x: f32, snap_seconds: i64) -> T {
        let offset = x as f64 * self.duration_millis() as f64 / self.width as f64;
        let time = self.start.offset_millis(offset.round() as i64);
        if snap_seconds > 0 {
            snap(time, snap_seconds)
        } else {
            time
        }
    }

    /// Pixel offset of a time, unclamped.
    pub fn pixel_at_time(&self, time: T) -> f32 {
        let offset = (time.to_millis() - self.start.to_millis()) as f64;
        (offset * self.pixels_per_milli()) as f32
    }

    /// Width in pixels of one snap unit.
    pub fn snap_unit_pixels(&self, snap_seconds: i64) -> f32 {
        (self.pixels_per_milli() * (snap_seconds * MILLIS_PER_SECOND) as f64) as f32
    }

    /// The pixel delta nearest to `dx` that spans a whole number of snap units.
    ///
    /// Drag feedback uses this so it visually snaps without converting through
    /// time on every frame.
    pub fn snapped_pixel_delta(&self, dx: f32, snap_seconds: i64) -> f32 {
        let per_snap = self.snap_unit_pixels(snap_seconds);
        if per_snap <= 0.0 || !per_snap.is_finite() {
            return dx;
        }
        (dx / per_snap).round() * per_snap
    }

    /// Zoom in around the window centre.
    pub fn zoom_in(&mut self) {
        self.rescale(1.0 / ZOOM_STEP);
    }

    /// Zoom out around the window centre.
    pub fn zoom_out(&mut self) {
        self.rescale(ZOOM_STEP);
    }

    /// Shift the window by a signed number of milliseconds.
    pub fn scroll_by(&mut self, delta_ms: i64) {
        self.start = self.start.offset_millis(delta_ms);
        self.end = self.end.offset_millis(delta_ms);
    }

    /// Shift the window so content moves by `dx` pixels.
    pub fn scroll_pixels(&mut self, dx: f32) {
        let delta = (-dx as f64 / self.pixels_per_milli()).round() as i64;
        self.scroll_by(delta);
    }

    fn rescale(&mut self, factor: f64) {
        let duration = self.duration_millis();
        let target = ((duration as f64 * factor).round() as i64).clamp(MIN_WINDOW_MS, MAX_WINDOW_MS);
        if target == duration {
            return;
        }
        let centre = self.start.to_millis() + duration / 2;
        self.start = T::from_millis(centre - target / 2);
        self.end = T::from_millis(centre - target / 2 + target);
    }
}

/// Round `time` to the nearest multiple of `snap_seconds` (half-up on whole
/// milliseconds). A zero unit drops the sub-second fraction instead.
pub fn snap<T: TimePoint>(time: T, snap_seconds: i64) -> T {
    let ms = time.to_millis();
    if snap_seconds <= 0 {
        return T::from_millis(ms - ms.rem_euclid(MILLIS_PER_SECOND));
    }
    let unit = snap_seconds.saturating_mul(MILLIS_PER_SECOND);
    T::from_millis(ms.saturating_add(unit / 2).div_euclid(unit) * unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time::MILLIS_PER_HOUR;
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn week() -> TimelineViewport<DateTime<Utc>> {
        TimelineViewport::new(
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2000, 1, 8, 0, 0, 0).unwrap(),
            2000.0,
        )
        .unwrap()
    }

    #[test]
    fn week_window_maps_edges_exactly() {
        let vp = week();
        assert_eq!(vp.time_at_pixel(0.0, 0), vp.start);
        assert_eq!(vp.time_at_pixel(2000.0, 0), vp.end);
        assert_abs_diff_eq!(vp.pixel_at_time(vp.end), 2000.0, epsilon = 1e-3);
    }

    #[test]
    fn extrapolates_outside_the_window() {
        let vp = TimelineViewport::new(0_i64, 1000, 100.0).unwrap();
        assert_eq!(vp.time_at_pixel(-10.0, 0), -100);
        assert_eq!(vp.time_at_pixel(150.0, 0), 1500);
        assert_abs_diff_eq!(vp.pixel_at_time(2000), 200.0);
    }

    #[test]
    fn empty_window_is_rejected() {
        assert!(TimelineViewport::new(5_i64, 5, 100.0).is_err());
        assert!(TimelineViewport::new(6_i64, 5, 100.0).is_err());
    }

    #[test]
    fn snapping_rounds_half_up() {
        let unit = 15 * 60;
        assert_eq!(snap(7 * MILLIS_PER_MINUTE, unit), 0);
        assert_eq!(snap(7 * MILLIS_PER_MINUTE + 30_000, unit), 15 * MILLIS_PER_MINUTE);
        assert_eq!(snap(-8 * MILLIS_PER_MINUTE, unit), -15 * MILLIS_PER_MINUTE);
    }

    #[test]
    fn zero_snap_truncates_to_whole_seconds() {
        assert_eq!(snap(12_999_i64, 0), 12_000);
        assert_eq!(snap(-1_i64, 0), -1_000);
    }

    #[test]
    fn time_at_pixel_applies_snap() {
        let vp = TimelineViewport::new(0_i64, 10 * MILLIS_PER_HOUR, 1000.0).unwrap();
        // 1 px is 36 s: 12 px = 7m12s snaps down, 13 px = 7m48s snaps up
        assert_eq!(vp.time_at_pixel(12.0, 15 * 60), 0);
        assert_eq!(vp.time_at_pixel(13.0, 15 * 60), 15 * MILLIS_PER_MINUTE);
    }

    #[test]
    fn snapped_delta_spans_whole_units() {
        let vp = TimelineViewport::new(0_i64, 10 * MILLIS_PER_HOUR, 1000.0).unwrap();
        // one hour is 100 px
        assert_abs_diff_eq!(vp.snap_unit_pixels(3600), 100.0, epsilon = 1e-4);
        assert_abs_diff_eq!(vp.snapped_pixel_delta(149.0, 3600), 100.0, epsilon = 1e-4);
        assert_abs_diff_eq!(vp.snapped_pixel_delta(-151.0, 3600), -200.0, epsilon = 1e-4);
        assert_abs_diff_eq!(vp.snapped_pixel_delta(42.5, 0), 42.5);
    }

    #[test]
    fn zoom_keeps_the_centre() {
        let mut vp = TimelineViewport::new(0_i64, 12 * MILLIS_PER_HOUR, 800.0).unwrap();
        vp.zoom_in();
        assert_eq!((vp.start + vp.end) / 2, 6 * MILLIS_PER_HOUR);
        assert_eq!(vp.duration_millis(), 10 * MILLIS_PER_HOUR);
        vp.zoom_out();
        assert_eq!(vp.duration_millis(), 12 * MILLIS_PER_HOUR);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut vp = TimelineViewport::new(0_i64, MILLIS_PER_MINUTE, 800.0).unwrap();
        vp.zoom_in();
        assert_eq!(vp.duration_millis(), MILLIS_PER_MINUTE);
    }

    #[test]
    fn scroll_pixels_moves_against_drag() {
        let mut vp = TimelineViewport::new(0_i64, 1000, 100.0).unwrap();
        vp.scroll_pixels(10.0);
        assert_eq!((vp.start, vp.end), (-100, 900));
    }

    proptest! {
        #[test]
        fn pixel_round_trip(x in 0.0f32..2000.0) {
            let vp = week();
            let back = vp.pixel_at_time(vp.time_at_pixel(x, 0));
            prop_assert!((back - x).abs() < 1e-2);
        }

        #[test]
        fn snap_is_idempotent(t in -1_000_000_000_000i64..1_000_000_000_000, unit in 1i64..100_000) {
            let once = snap(t, unit);
            prop_assert_eq!(snap(once, unit), once);
        }
    }
}
