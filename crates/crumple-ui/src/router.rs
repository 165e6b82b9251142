//! Interaction router: per-surface gesture state machine.
//!
//! [`Router::handle`] is a pure function of `(state, context, event)`. It
//! returns the next state plus the commands the surface must apply; lens edits
//! and forwarded input events are both expressed as [`RouterCommand`]s.
//!
//! Edit-mode bindings (presses act the same for every mouse button):
//! - press on empty space: place a lens
//! - press on a lens: drag it
//! - `shift` + press on a lens: delete it
//! - `alt` + drag: stroke, placing lenses along the path on release
//! - wheel on a lens: sigma; `alt` + wheel: strength

use crumple_engine::config::EngineConfig;
use crumple_engine::coords::space::logical_to_edit;
use crumple_engine::coords::{Rect, Vec2, Viewport};
use crumple_engine::host::{ForwardedEvent, PointerKind};
use crumple_engine::input::{MouseButton, PointerEvent};
use crumple_engine::lens::{Lens, LensField};
use crumple_engine::warp::{screen_to_source, Warp};

use crate::event::RouterCommand;
use crate::stroke::{resample_by_spacing, Stroke};

/// Top-level surface mode.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Edit,
    Interact,
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Edit => Mode::Interact,
            Mode::Interact => Mode::Edit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Edit => "EDIT",
            Mode::Interact => "INTERACT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState {
    #[default]
    Idle,
    Dragging(usize),
    Stroking(Stroke),
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum InteractState {
    #[default]
    Idle,
    Forwarding { button: MouseButton },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouterState {
    Edit(EditState),
    Interact(InteractState),
}

impl RouterState {
    /// Idle state of `mode`.
    pub fn idle(mode: Mode) -> Self {
        match mode {
            Mode::Edit => RouterState::Edit(EditState::Idle),
            Mode::Interact => RouterState::Interact(InteractState::Idle),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            RouterState::Edit(_) => Mode::Edit,
            RouterState::Interact(_) => Mode::Interact,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            RouterState::Edit(EditState::Idle) | RouterState::Interact(InteractState::Idle)
        )
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::idle(Mode::default())
    }
}

/// Read-only view of the surface a gesture lands on.
#[derive(Debug, Clone, Copy)]
pub struct RouteCtx<'a> {
    pub field: &'a LensField,
    pub warp: &'a Warp,
    pub viewport: Viewport,
    /// Source DIP box forwarded coordinates are scaled into.
    pub source_box: Rect,
    pub config: &'a EngineConfig,
}

/// Outcome of one router step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: RouterState,
    pub commands: Vec<RouterCommand>,
}

impl Transition {
    fn stay(state: RouterState) -> Self {
        Self { state, commands: Vec::new() }
    }

    fn with(state: RouterState, command: RouterCommand) -> Self {
        Self { state, commands: vec![command] }
    }
}

pub struct Router;

impl Router {
    pub fn handle(state: RouterState, ctx: &RouteCtx<'_>, event: &PointerEvent) -> Transition {
        match state {
            RouterState::Edit(s) => Self::handle_edit(s, ctx, event),
            RouterState::Interact(s) => Self::handle_interact(s, ctx, event),
        }
    }

    // ── edit mode ─────────────────────────────────────────────────────────

    fn handle_edit(state: EditState, ctx: &RouteCtx<'_>, event: &PointerEvent) -> Transition {
        let cfg = ctx.config;
        let pick_radius = cfg.pick_radius(ctx.viewport);

        match (state, *event) {
            (EditState::Idle, PointerEvent::Down { pos, modifiers, .. }) => {
                let at = logical_to_edit(pos, ctx.viewport);
                if modifiers.alt {
                    return Transition::stay(RouterState::Edit(EditState::Stroking(Stroke::begin(pos))));
                }
                let picked = ctx.field.pick(at, pick_radius);
                match (picked, modifiers.shift) {
                    (Some(i), true) => Transition::with(RouterState::Edit(EditState::Idle), RouterCommand::RemoveLens(i)),
                    (None, true) => Transition::stay(RouterState::Edit(EditState::Idle)),
                    (Some(i), false) => Transition::stay(RouterState::Edit(EditState::Dragging(i))),
                    (None, false) => {
                        let sigma = cfg.clamp_sigma(ctx.viewport.normalize_len(cfg.default_sigma_px), ctx.viewport);
                        let lens = Lens::new(at, sigma, cfg.clamp_strength(cfg.default_strength));
                        Transition::with(RouterState::Edit(EditState::Idle), RouterCommand::AddLens(lens))
                    }
                }
            }

            (EditState::Dragging(index), PointerEvent::Move { pos, .. }) => Transition::with(
                RouterState::Edit(EditState::Dragging(index)),
                RouterCommand::MoveLens { index, center: logical_to_edit(pos, ctx.viewport) },
            ),

            (EditState::Stroking(mut stroke), PointerEvent::Move { pos, .. }) => {
                stroke.push(pos, cfg.stroke_min_step_px);
                Transition::stay(RouterState::Edit(EditState::Stroking(stroke)))
            }

            (EditState::Dragging(_), PointerEvent::Up { .. }) => {
                Transition::stay(RouterState::Edit(EditState::Idle))
            }

            (EditState::Stroking(stroke), PointerEvent::Up { .. }) => {
                let lenses = Self::stroke_lenses(&stroke, ctx);
                if lenses.is_empty() {
                    Transition::stay(RouterState::Edit(EditState::Idle))
                } else {
                    Transition::with(RouterState::Edit(EditState::Idle), RouterCommand::AddLenses(lenses))
                }
            }

            (state, PointerEvent::Wheel { pos, delta, modifiers }) => {
                let at = logical_to_edit(pos, ctx.viewport);
                let Some(index) = ctx.field.pick(at, pick_radius) else {
                    return Transition::stay(RouterState::Edit(state));
                };
                let Some(lens) = ctx.field.get(index) else {
                    return Transition::stay(RouterState::Edit(state));
                };
                let step = -delta.to_pixels().y * cfg.wheel_step;
                let command = if modifiers.alt {
                    RouterCommand::SetStrength { index, strength: cfg.clamp_strength(lens.strength + step) }
                } else {
                    RouterCommand::SetSigma { index, sigma: cfg.clamp_sigma(lens.sigma + step, ctx.viewport) }
                };
                Transition::with(RouterState::Edit(state), command)
            }

            (state, _) => Transition::stay(RouterState::Edit(state)),
        }
    }

    fn stroke_lenses(stroke: &Stroke, ctx: &RouteCtx<'_>) -> Vec<Lens> {
        if stroke.len() < 2 {
            return Vec::new();
        }
        let cfg = ctx.config;
        let spacing = cfg.stroke_radius_px * cfg.stroke_spacing;
        let sigma = cfg.clamp_sigma(ctx.viewport.normalize_len(cfg.stroke_radius_px), ctx.viewport);
        let strength = cfg.clamp_strength(cfg.default_strength);
        resample_by_spacing(stroke.points(), spacing)
            .into_iter()
            .map(|p| Lens::new(logical_to_edit(p, ctx.viewport), sigma, strength))
            .collect()
    }

    // ── interact mode ─────────────────────────────────────────────────────

    fn handle_interact(state: InteractState, ctx: &RouteCtx<'_>, event: &PointerEvent) -> Transition {
        let to_source = |pos: Vec2| screen_to_source(pos, ctx.viewport, ctx.warp, ctx.source_box);

        match (state, *event) {
            (_, PointerEvent::Down { pos, button, click_count, .. }) => {
                let p = to_source(pos);
                Transition::with(
                    RouterState::Interact(InteractState::Forwarding { button }),
                    RouterCommand::Forward(ForwardedEvent::Pointer {
                        kind: PointerKind::Down,
                        x: p.x,
                        y: p.y,
                        button,
                        click_count: click_count.max(1),
                    }),
                )
            }

            (InteractState::Forwarding { button }, PointerEvent::Move { pos, .. }) => {
                let p = to_source(pos);
                Transition::with(
                    RouterState::Interact(InteractState::Forwarding { button }),
                    RouterCommand::Forward(ForwardedEvent::Pointer {
                        kind: PointerKind::Move,
                        x: p.x,
                        y: p.y,
                        button,
                        click_count: 1,
                    }),
                )
            }

            (InteractState::Forwarding { .. }, PointerEvent::Up { pos, button, .. }) => {
                let p = to_source(pos);
                Transition::with(
                    RouterState::Interact(InteractState::Idle),
                    RouterCommand::Forward(ForwardedEvent::Pointer {
                        kind: PointerKind::Up,
                        x: p.x,
                        y: p.y,
                        button,
                        click_count: 1,
                    }),
                )
            }

            (state, PointerEvent::Wheel { pos, delta, .. }) => {
                let p = to_source(pos);
                let d = delta.to_pixels();
                Transition::with(
                    RouterState::Interact(state),
                    RouterCommand::Forward(ForwardedEvent::Wheel { x: p.x, y: p.y, delta_x: d.x, delta_y: d.y }),
                )
            }

            (state, _) => Transition::stay(RouterState::Interact(state)),
        }
    }
}
