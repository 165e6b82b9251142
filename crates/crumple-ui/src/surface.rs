//! A single warped surface.
//!
//! A [`Surface`] exclusively owns its lens field, base scale, mode and router
//! state. Router commands are applied here; forwarded input events are
//! returned to the caller for delivery.

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;

use crumple_engine::config::{EngineConfig, BASE_SCALE_FLOOR};
use crumple_engine::coords::{Rect, Viewport};
use crumple_engine::error::{CaptureError, ConfigError};
use crumple_engine::host::{ForwardedEvent, SourceHandle};
use crumple_engine::input::PointerEvent;
use crumple_engine::lens::{Lens, LensField};
use crumple_engine::raster::{FrameParams, Rasterizer};
use crumple_engine::warp::Warp;

use crate::capture::{CaptureOutcome, CaptureSlot, CaptureTicket};
use crate::event::RouterCommand;
use crate::router::{Mode, RouteCtx, Router, RouterState};

/// Identifies a surface on a [`crate::board::Board`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SurfaceId(pub u32);

/// Snapshot for a status indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStatus {
    pub mode: Mode,
    pub lens_count: usize,
    pub reveal: bool,
    pub has_frame: bool,
    pub frame_size: Option<(u32, u32)>,
}

impl std::fmt::Display for SurfaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mode: {}   Lenses: {}", self.mode.label(), self.lens_count)?;
        if self.reveal {
            write!(f, "   Reveal")?;
        }
        match self.frame_size {
            Some((w, h)) => write!(f, "   Source: {w}x{h}"),
            None => write!(f, "   Source: none"),
        }
    }
}

pub struct Surface {
    id: SurfaceId,
    config: EngineConfig,
    viewport: Viewport,
    field: LensField,
    base_scale: f32,
    reveal: bool,
    softness: f32,
    router_state: RouterState,
    capture: CaptureSlot,
    /// Last successfully received raster.
    frame: Option<Arc<RgbaImage>>,
    /// Source pixels per source DIP.
    source_scale: f32,
}

impl Surface {
    pub fn new(id: SurfaceId, config: EngineConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        check_viewport(viewport)?;
        let field = LensField::new(config.lens_capacity)?;
        Ok(Self {
            id,
            viewport,
            field,
            base_scale: clamp_base_scale(config.base_scale),
            reveal: false,
            softness: config.reveal_softness,
            router_state: RouterState::default(),
            capture: CaptureSlot::new(config.capture_interval()),
            frame: None,
            source_scale: 1.0,
            config,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn field(&self) -> &LensField {
        &self.field
    }

    #[inline]
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.router_state.mode()
    }

    #[inline]
    pub fn router_state(&self) -> &RouterState {
        &self.router_state
    }

    #[inline]
    pub fn reveal(&self) -> bool {
        self.reveal
    }

    #[inline]
    pub fn softness(&self) -> f32 {
        self.softness
    }

    #[inline]
    pub fn source(&self) -> Option<SourceHandle> {
        self.capture.source()
    }

    #[inline]
    pub fn frame(&self) -> Option<&Arc<RgbaImage>> {
        self.frame.as_ref()
    }

    #[inline]
    pub fn capture(&self) -> &CaptureSlot {
        &self.capture
    }

    /// Packs the current lens field for rendering and interaction.
    pub fn warp(&self) -> Warp {
        Warp::from_field(&self.field, self.base_scale)
    }

    pub fn frame_params(&self) -> FrameParams {
        let params = FrameParams::new(self.warp());
        if self.reveal { params.with_reveal(self.softness) } else { params }
    }

    /// Source DIP box forwarded coordinates are scaled into.
    ///
    /// Falls back to the surface's own logical size until a frame arrives.
    pub fn source_box(&self) -> Rect {
        match &self.frame {
            Some(frame) => Rect::from_size(
                frame.width() as f32 / self.source_scale,
                frame.height() as f32 / self.source_scale,
            ),
            None => {
                let size = self.viewport.logical_size();
                Rect::from_size(size.x, size.y)
            }
        }
    }

    pub fn status(&self) -> SurfaceStatus {
        SurfaceStatus {
            mode: self.mode(),
            lens_count: self.field.len(),
            reveal: self.reveal,
            has_frame: self.frame.is_some(),
            frame_size: self.frame.as_ref().map(|f| f.dimensions()),
        }
    }

    // ── gestures ──────────────────────────────────────────────────────────

    /// Runs one gesture event through the router and applies its commands.
    ///
    /// Returns the input events to forward to the source, in order.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Vec<ForwardedEvent> {
        let warp = self.warp();
        let ctx = RouteCtx {
            field: &self.field,
            warp: &warp,
            viewport: self.viewport,
            source_box: self.source_box(),
            config: &self.config,
        };
        let state = std::mem::take(&mut self.router_state);
        let transition = Router::handle(state, &ctx, event);
        self.router_state = transition.state;

        let mut forwarded = Vec::new();
        for command in transition.commands {
            if let Some(event) = self.apply(command) {
                forwarded.push(event);
            }
        }
        forwarded
    }

    fn apply(&mut self, command: RouterCommand) -> Option<ForwardedEvent> {
        match command {
            RouterCommand::AddLens(lens) => {
                self.field.push(lens);
            }
            RouterCommand::AddLenses(lenses) => {
                for lens in lenses {
                    self.field.push(lens);
                }
            }
            RouterCommand::MoveLens { index, center } => {
                if let Some(lens) = self.field.get_mut(index) {
                    lens.center = center;
                }
            }
            RouterCommand::RemoveLens(index) => {
                self.field.remove(index);
            }
            RouterCommand::SetSigma { index, sigma } => {
                if let Some(lens) = self.field.get_mut(index) {
                    lens.sigma = sigma;
                }
            }
            RouterCommand::SetStrength { index, strength } => {
                if let Some(lens) = self.field.get_mut(index) {
                    lens.strength = strength;
                }
            }
            RouterCommand::Forward(event) => return Some(event),
        }
        None
    }

    /// Places a lens directly, bypassing the router. Sigma and strength are
    /// clamped to the configured bounds.
    ///
    /// An eviction shifts every index, so a drag in progress is abandoned.
    pub fn add_lens(&mut self, mut lens: Lens) -> Option<Lens> {
        lens.sigma = self.config.clamp_sigma(lens.sigma, self.viewport);
        lens.strength = self.config.clamp_strength(lens.strength);
        let evicted = self.field.push(lens);
        if evicted.is_some() {
            self.router_state = RouterState::idle(self.mode());
        }
        evicted
    }

    // ── toolbar ───────────────────────────────────────────────────────────

    /// Switches mode. Never produces input events; any gesture in progress
    /// is abandoned.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode() != mode {
            log::debug!("{:?}: mode {} -> {}", self.id, self.mode().label(), mode.label());
        }
        self.router_state = RouterState::idle(mode);
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode().toggled());
    }

    pub fn set_base_scale(&mut self, base_scale: f32) {
        self.base_scale = clamp_base_scale(base_scale);
    }

    pub fn set_reveal(&mut self, reveal: bool) {
        self.reveal = reveal;
    }

    pub fn set_softness(&mut self, softness: f32) {
        if softness.is_finite() && softness > 0.0 {
            self.softness = softness;
        }
    }

    pub fn clear_lenses(&mut self) {
        self.field.clear();
        // Indices held by a drag are gone.
        self.router_state = RouterState::idle(self.mode());
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<(), ConfigError> {
        check_viewport(viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    // ── sources ───────────────────────────────────────────────────────────

    /// Binds a live source. The current frame is dropped and any capture in
    /// flight for the previous source will be discarded.
    pub fn set_source(&mut self, source: Option<SourceHandle>, source_scale: f32) {
        log::info!("{:?}: source -> {source:?}", self.id);
        self.capture.set_source(source);
        self.frame = None;
        self.source_scale = sanitize_scale(source_scale);
    }

    /// Shows a still image, detaching any live source.
    pub fn set_image(&mut self, image: RgbaImage, source_scale: f32) {
        self.capture.set_source(None);
        self.frame = Some(Arc::new(image));
        self.source_scale = sanitize_scale(source_scale);
    }

    /// Notes that the live source's content changed.
    pub fn invalidate_source(&mut self) {
        self.capture.invalidate_content();
    }

    pub fn begin_capture(&mut self, now: Instant) -> Option<CaptureTicket> {
        self.capture.request(now)
    }

    pub fn begin_pending_capture(&mut self, now: Instant) -> Option<CaptureTicket> {
        self.capture.request_pending(now)
    }

    /// Settles a capture. Returns whether the displayed frame changed.
    pub fn finish_capture(
        &mut self,
        ticket: CaptureTicket,
        result: Result<RgbaImage, CaptureError>,
    ) -> bool {
        match self.capture.complete(ticket, result) {
            CaptureOutcome::Applied(image) => {
                self.frame = Some(Arc::new(image));
                true
            }
            CaptureOutcome::Discarded | CaptureOutcome::Failed(_) => false,
        }
    }

    // ── rendering ─────────────────────────────────────────────────────────

    /// Rasterizes the current frame at the surface's physical size.
    ///
    /// Without a frame the result is opaque black.
    pub fn render(&self, rasterizer: &Rasterizer) -> Result<RgbaImage, ConfigError> {
        let (width, height) = self.viewport.physical_size();
        match &self.frame {
            Some(source) => rasterizer.render(source, &self.frame_params(), width, height),
            None => Ok(RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]))),
        }
    }
}

fn clamp_base_scale(base_scale: f32) -> f32 {
    if base_scale.is_finite() { base_scale.clamp(BASE_SCALE_FLOOR, 1.0) } else { 1.0 }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
}

fn check_viewport(viewport: Viewport) -> Result<(), ConfigError> {
    if viewport.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
            scale_factor: viewport.scale_factor,
        })
    }
}
