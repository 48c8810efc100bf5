// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! PanZoomJob: a bounded, frame-counted interpolation of scroll offset and
//! scale. One step per rendered frame; the last step applies whatever
//! distance is still outstanding and lands on the target scale exactly,
//! so per-frame float rounding never accumulates into the end state.

use crate::util::PointF32;

/// At most one job is in flight per controller; the controller decides
/// whether a second move request is rejected or replaces the running job.
pub struct PanZoomJob {
    frames_remaining: u32,
    total: PointF32,
    applied: PointF32,
    per_frame: PointF32,
    target_scale: f32,
    per_frame_scale: f32,
}

/// What one step asks the controller to do.
pub(crate) struct JobStep {
    pub dx: f32,
    pub dy: f32,
    pub scale: f32,
    pub done: bool,
}

impl PanZoomJob {
    /// Returns None when any parameter is non-finite, the scale is not
    /// positive, or the duration is zero frames.
    pub fn new(
        offset: PointF32,
        current_scale: f32,
        target_scale: f32,
        duration: u32,
    ) -> Option<Self> {
        if !offset.is_finite() || !target_scale.is_finite() || target_scale <= 0.0 || duration == 0
        {
            return None;
        }
        let d = duration as f32;
        Some(Self {
            frames_remaining: duration,
            total: offset,
            applied: PointF32::default(),
            per_frame: PointF32::new(offset.x / d, offset.y / d),
            target_scale,
            per_frame_scale: (current_scale - target_scale) / d,
        })
    }

    pub fn frames_remaining(&self) -> u32 {
        self.frames_remaining
    }

    pub fn target_scale(&self) -> f32 {
        self.target_scale
    }

    /// Advance one frame. The final step snaps to the exact remainder.
    pub(crate) fn step(&mut self, current_scale: f32) -> JobStep {
        self.frames_remaining -= 1;
        let done = self.frames_remaining == 0;
        let (dx, dy, scale) = if done {
            (
                self.total.x - self.applied.x,
                self.total.y - self.applied.y,
                self.target_scale,
            )
        } else {
            (
                self.per_frame.x,
                self.per_frame.y,
                current_scale - self.per_frame_scale,
            )
        };
        self.applied.x += dx;
        self.applied.y += dy;
        JobStep { dx, dy, scale, done }
    }
}
