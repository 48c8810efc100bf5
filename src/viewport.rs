// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! ViewportController owns the map camera: scale and coefficient, scroll
//! offset with clamp or wrap semantics per axis, timed pan/zoom jobs and
//! the follow-the-target mode.
//!
//! The host calls update once per frame, after movement and input
//! processing and before the renderer reads display_offset and scale.
//! All numeric setters treat malformed input (NaN, infinite, non-positive
//! scale) as a silent no-op: commands come from data-driven event scripts
//! and must never take down the frame loop.

use crate::{
    config::ViewportParams,
    context::MapContext,
    entity::EntityId,
    util::PointF32,
    GAME_FRAME,
};
use log::{info, warn};

mod job;
pub use job::PanZoomJob;

/// subscriber name this controller installs on its target's move event
const MOVE_SUBSCRIBER: &str = "viewport.camera";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

pub struct ViewportController {
    scale: f32,
    coefficient: f32,
    bound: bool,
    follow: bool,
    locked: bool,
    replace_in_flight: bool,
    target: Option<EntityId>,
    display: PointF32,
    parallax: PointF32,
    job: Option<PanZoomJob>,
}

impl ViewportController {
    pub fn new(params: &ViewportParams) -> Self {
        let scale = if params.initial_scale.is_finite() && params.initial_scale > 0.0 {
            params.initial_scale
        } else {
            1.0
        };
        Self {
            scale,
            coefficient: 1.0 / scale,
            bound: true,
            follow: true,
            locked: false,
            replace_in_flight: params.replace_in_flight,
            target: None,
            display: PointF32::default(),
            parallax: PointF32::default(),
            job: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    pub fn display_offset(&self) -> PointF32 {
        self.display
    }

    pub fn parallax_offset(&self) -> PointF32 {
        self.parallax
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_follow(&self) -> bool {
        self.follow
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn has_active_job(&self) -> bool {
        self.job.is_some()
    }

    pub fn job_frames_remaining(&self) -> u32 {
        self.job.as_ref().map_or(0, |j| j.frames_remaining())
    }

    /// Set the zoom scale. Invalid input keeps the previous state.
    /// In follow mode the tracked entity is re-centered right away so a
    /// zoom never leaves it off-screen.
    pub fn set_scale(&mut self, ctx: &MapContext, scale: f32) {
        if !scale.is_finite() || scale <= 0.0 {
            warn!("set_scale: ignoring invalid scale {}", scale);
            return;
        }
        self.apply_scale(scale);
        if self.follow && self.target.is_some() {
            self.recenter(ctx);
        }
    }

    fn apply_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.coefficient = 1.0 / scale;
    }

    /// How many tile units are visible horizontally at the current scale.
    pub fn screen_tile_extent_x(&self, ctx: &MapContext) -> f32 {
        ctx.map.screen_width as f32 / ctx.map.tile_width as f32 * self.coefficient
    }

    /// How many tile units are visible vertically at the current scale.
    pub fn screen_tile_extent_y(&self, ctx: &MapContext) -> f32 {
        ctx.map.screen_height as f32 / ctx.map.tile_height as f32 * self.coefficient
    }

    /// Tile-unit x of the screen center, the follow-mode anchor point.
    pub fn center_x(&self, ctx: &MapContext) -> f32 {
        (self.screen_tile_extent_x(ctx) - 1.0) / 2.0
    }

    pub fn center_y(&self, ctx: &MapContext) -> f32 {
        (self.screen_tile_extent_y(ctx) - 1.0) / 2.0
    }

    /// The host scene may position the camera before the first frame.
    pub fn set_display_offset(&mut self, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.display = PointF32::new(x, y);
    }

    /// Scroll along one axis by a signed tile-unit distance.
    ///
    /// A looping axis wraps modulo the map extent and drags a looping
    /// parallax along by the raw distance. A non-looping axis clamps to
    /// the map edges while bound, scrolls freely while unbound, and in
    /// both cases moves the parallax by the applied delta. A map smaller
    /// than the viewport does not scroll at all.
    pub fn scroll(&mut self, ctx: &MapContext, axis: Axis, distance: f32) {
        if !distance.is_finite() {
            warn!("scroll: ignoring invalid distance {}", distance);
            return;
        }
        match axis {
            Axis::Horizontal => {
                let screen = self.screen_tile_extent_x(ctx);
                Self::scroll_axis(
                    &mut self.display.x,
                    &mut self.parallax.x,
                    distance,
                    ctx.map.width as f32,
                    screen,
                    ctx.map.loop_horizontal,
                    ctx.map.parallax_loop_x,
                    self.bound,
                );
            }
            Axis::Vertical => {
                let screen = self.screen_tile_extent_y(ctx);
                Self::scroll_axis(
                    &mut self.display.y,
                    &mut self.parallax.y,
                    distance,
                    ctx.map.height as f32,
                    screen,
                    ctx.map.loop_vertical,
                    ctx.map.parallax_loop_y,
                    self.bound,
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn scroll_axis(
        display: &mut f32,
        parallax: &mut f32,
        distance: f32,
        extent: f32,
        screen: f32,
        looped: bool,
        parallax_loop: bool,
        bound: bool,
    ) {
        if looped {
            *display = (*display + distance).rem_euclid(extent);
            if parallax_loop {
                *parallax += distance;
            }
        } else if extent >= screen {
            let last = *display;
            *display = if bound {
                (*display + distance).clamp(0.0, extent - screen)
            } else {
                *display + distance
            };
            *parallax += *display - last;
        }
    }

    /// Start a pan/zoom job: scroll by offset and reach target_scale after
    /// exactly duration frames. Returns false without touching any state
    /// when a job is already running (unless the replace policy is on), or
    /// when a parameter is non-finite or the duration is zero.
    pub fn begin_pan_zoom(&mut self, offset: PointF32, target_scale: f32, duration: u32) -> bool {
        if self.job.is_some() && !self.replace_in_flight {
            return false;
        }
        match PanZoomJob::new(offset, self.scale, target_scale, duration) {
            Some(job) => {
                if self.job.is_some() {
                    info!("pan/zoom job replaced in flight");
                }
                self.job = Some(job);
                true
            }
            None => false,
        }
    }

    /// Same, with the duration given in seconds and converted via GAME_FRAME.
    pub fn begin_pan_zoom_secs(&mut self, offset: PointF32, target_scale: f32, secs: f32) -> bool {
        if !secs.is_finite() || secs <= 0.0 {
            return false;
        }
        let mut frames = (secs * GAME_FRAME as f32) as u32;
        if frames == 0 {
            frames = 1;
        }
        self.begin_pan_zoom(offset, target_scale, frames)
    }

    /// Advance the active pan/zoom job by one frame; no-op when idle.
    /// Must run once per rendered frame, after movement processing and
    /// before the renderer reads the offsets.
    pub fn tick(&mut self, ctx: &MapContext) {
        let Some(job) = self.job.as_mut() else {
            return;
        };
        let step = job.step(self.scale);
        self.scroll(ctx, Axis::Horizontal, step.dx);
        self.scroll(ctx, Axis::Vertical, step.dy);
        self.apply_scale(step.scale);
        if step.done {
            self.job = None;
        }
    }

    /// Per-frame entry point: consume the target's movement event, then
    /// step the pan/zoom job.
    pub fn update(&mut self, ctx: &mut MapContext) {
        self.handle_move(ctx);
        self.tick(ctx);
    }

    fn handle_move(&mut self, ctx: &mut MapContext) {
        if !(self.locked && self.follow) {
            return;
        }
        let Some(id) = self.target else {
            return;
        };
        let moved = ctx
            .entities
            .get_mut(id)
            .map(|e| e.on_move.check(MOVE_SUBSCRIBER))
            .unwrap_or(false);
        if moved {
            self.recenter(ctx);
        }
    }

    /// Scroll so the tracked entity sits at the screen center. Goes through
    /// scroll, so bound and loop semantics still hold; while bound, the
    /// camera stops at the edges instead of centering.
    pub fn recenter(&mut self, ctx: &MapContext) {
        let Some(id) = self.target else {
            return;
        };
        let Some(e) = ctx.entities.get(id) else {
            return;
        };
        let pos = e.pos;
        let dx = self.scrolled_x(ctx, pos.x) - self.center_x(ctx);
        let dy = self.scrolled_y(ctx, pos.y) - self.center_y(ctx);
        self.scroll(ctx, Axis::Horizontal, dx);
        self.scroll(ctx, Axis::Vertical, dy);
    }

    /// Screen-relative tile x of a map position, adjusted across the seam
    /// of a looping map so the nearest image of the entity is used.
    fn scrolled_x(&self, ctx: &MapContext, x: f32) -> f32 {
        let s = x - self.display.x;
        if ctx.map.loop_horizontal {
            let half = (ctx.map.width as f32 - self.screen_tile_extent_x(ctx)) / 2.0;
            if s < -half {
                return s + ctx.map.width as f32;
            }
        }
        s
    }

    fn scrolled_y(&self, ctx: &MapContext, y: f32) -> f32 {
        let s = y - self.display.y;
        if ctx.map.loop_vertical {
            let half = (ctx.map.height as f32 - self.screen_tile_extent_y(ctx)) / 2.0;
            if s < -half {
                return s + ctx.map.height as f32;
            }
        }
        s
    }

    /// Install the follow hook on an entity's move event. Re-targeting
    /// while locked removes the previous subscription first, so no hook is
    /// left dangling on the old entity.
    pub fn lock_to(&mut self, ctx: &mut MapContext, id: EntityId) {
        if !ctx.entities.contains(id) {
            warn!("lock_to: unknown entity {}", id);
            return;
        }
        if self.locked {
            self.unlock(ctx);
        }
        if let Some(e) = ctx.entities.get_mut(id) {
            e.on_move.register(MOVE_SUBSCRIBER);
            info!("camera locked to {:?} {}", e.kind, id);
        }
        self.target = Some(id);
        self.locked = true;
        self.recenter(ctx);
    }

    /// Remove the follow hook; the target is remembered for a later lock.
    pub fn unlock(&mut self, ctx: &mut MapContext) {
        if let Some(id) = self.target {
            if let Some(e) = ctx.entities.get_mut(id) {
                e.on_move.unregister(MOVE_SUBSCRIBER);
            }
        }
        self.locked = false;
    }

    /// Change the remembered target. While locked this re-locks so the
    /// hook moves with the target.
    pub fn set_target(&mut self, ctx: &mut MapContext, id: EntityId) {
        if self.target == Some(id) {
            return;
        }
        if self.locked {
            self.lock_to(ctx, id);
        } else if ctx.entities.contains(id) {
            self.target = Some(id);
        } else {
            warn!("set_target: unknown entity {}", id);
        }
    }

    pub fn set_bound(&mut self, bound: bool) {
        self.bound = bound;
    }

    pub fn set_follow(&mut self, follow: bool) {
        self.follow = follow;
    }

    /// Scene-exit teardown: cancel the job, drop the follow hook and
    /// restore the neutral scale (battle scenes suppress map zoom).
    pub fn reset(&mut self, ctx: &mut MapContext) {
        self.unlock(ctx);
        self.target = None;
        self.job = None;
        self.apply_scale(1.0);
    }

    /// Screen-pixel x to a map tile column under the current scale,
    /// wrapping on a looping map.
    pub fn canvas_to_map_x(&self, ctx: &MapContext, px: f32) -> i32 {
        let tile_w = ctx.map.tile_width as f32 * self.scale;
        let origin = self.display.x * tile_w;
        let map_x = ((origin + px) / tile_w).floor() as i32;
        if ctx.map.loop_horizontal {
            map_x.rem_euclid(ctx.map.width as i32)
        } else {
            map_x
        }
    }

    pub fn canvas_to_map_y(&self, ctx: &MapContext, px: f32) -> i32 {
        let tile_h = ctx.map.tile_height as f32 * self.scale;
        let origin = self.display.y * tile_h;
        let map_y = ((origin + px) / tile_h).floor() as i32;
        if ctx.map.loop_vertical {
            map_y.rem_euclid(ctx.map.height as i32)
        } else {
            map_y
        }
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(&ViewportParams::default())
    }
}
