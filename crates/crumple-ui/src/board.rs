//! Multi-surface board with explicit command dispatch.
//!
//! Every [`Command`] names the surface it targets. The focused surface is a
//! routing convenience for toolbar actions only; surfaces never read it.

use std::collections::BTreeMap;

use thiserror::Error;

use crumple_engine::config::EngineConfig;
use crumple_engine::coords::Viewport;
use crumple_engine::error::ConfigError;
use crumple_engine::host::{ForwardedEvent, SourceHandle};
use crumple_engine::input::PointerEvent;

use crate::router::Mode;
use crate::surface::{Surface, SurfaceId};

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("no surface with id {0:?}")]
    UnknownSurface(SurfaceId),

    #[error("no surface is focused")]
    NoFocus,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Toolbar action without a target; see [`Board::dispatch_focused`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    SetMode(Mode),
    ToggleMode,
    SetBaseScale(f32),
    SetReveal(bool),
    SetSoftness(f32),
    ClearLenses,
}

impl ToolbarAction {
    pub fn target(self, id: SurfaceId) -> Command {
        match self {
            ToolbarAction::SetMode(mode) => Command::SetMode(id, mode),
            ToolbarAction::ToggleMode => Command::ToggleMode(id),
            ToolbarAction::SetBaseScale(v) => Command::SetBaseScale(id, v),
            ToolbarAction::SetReveal(on) => Command::SetReveal(id, on),
            ToolbarAction::SetSoftness(v) => Command::SetSoftness(id, v),
            ToolbarAction::ClearLenses => Command::ClearLenses(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetMode(SurfaceId, Mode),
    ToggleMode(SurfaceId),
    SetBaseScale(SurfaceId, f32),
    SetReveal(SurfaceId, bool),
    SetSoftness(SurfaceId, f32),
    /// Live source and its pixels-per-DIP scale.
    SetSource(SurfaceId, Option<SourceHandle>, f32),
    ClearLenses(SurfaceId),
    Resize(SurfaceId, Viewport),
    Pointer(SurfaceId, PointerEvent),
}

impl Command {
    pub fn target(&self) -> SurfaceId {
        match *self {
            Command::SetMode(id, _)
            | Command::ToggleMode(id)
            | Command::SetBaseScale(id, _)
            | Command::SetReveal(id, _)
            | Command::SetSoftness(id, _)
            | Command::SetSource(id, _, _)
            | Command::ClearLenses(id)
            | Command::Resize(id, _)
            | Command::Pointer(id, _) => id,
        }
    }
}

/// Input produced by a dispatched command, ready for delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatched {
    pub source: Option<SourceHandle>,
    pub forwarded: Vec<ForwardedEvent>,
}

pub struct Board {
    config: EngineConfig,
    surfaces: BTreeMap<SurfaceId, Surface>,
    next_id: u32,
    focused: Option<SurfaceId>,
}

impl Board {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, surfaces: BTreeMap::new(), next_id: 1, focused: None })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Adds a surface with its own lens field. The first surface is focused.
    pub fn add_surface(&mut self, viewport: Viewport) -> Result<SurfaceId, ConfigError> {
        let id = SurfaceId(self.next_id);
        let surface = Surface::new(id, self.config.clone(), viewport)?;
        self.next_id += 1;
        self.surfaces.insert(id, surface);
        if self.focused.is_none() {
            self.focused = Some(id);
        }
        log::debug!("added surface {id:?}");
        Ok(id)
    }

    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<Surface> {
        let removed = self.surfaces.remove(&id);
        if self.focused == Some(id) {
            self.focused = self.surfaces.keys().next().copied();
        }
        removed
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(&id)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> + '_ {
        self.surfaces.values()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    // ── focus ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn focused(&self) -> Option<SurfaceId> {
        self.focused
    }

    pub fn focus(&mut self, id: SurfaceId) -> Result<(), BoardError> {
        if !self.surfaces.contains_key(&id) {
            return Err(BoardError::UnknownSurface(id));
        }
        self.focused = Some(id);
        Ok(())
    }

    /// Moves focus to the next (or previous, if `reverse`) surface in id order.
    pub fn advance_focus(&mut self, reverse: bool) {
        let ids: Vec<SurfaceId> = self.surfaces.keys().copied().collect();
        if ids.is_empty() {
            return;
        }
        let n = ids.len();
        self.focused = Some(match self.focused.and_then(|f| ids.iter().position(|&x| x == f)) {
            None => ids[if reverse { n - 1 } else { 0 }],
            Some(i) if reverse => ids[(i + n - 1) % n],
            Some(i) => ids[(i + 1) % n],
        });
    }

    // ── dispatch ──────────────────────────────────────────────────────────

    /// Applies `command` to the surface it names.
    ///
    /// A pointer-down also focuses its surface.
    pub fn dispatch(&mut self, command: Command) -> Result<Dispatched, BoardError> {
        let id = command.target();
        let surface = self.surfaces.get_mut(&id).ok_or(BoardError::UnknownSurface(id))?;
        let mut out = Dispatched { source: surface.source(), forwarded: Vec::new() };

        match command {
            Command::SetMode(_, mode) => surface.set_mode(mode),
            Command::ToggleMode(_) => surface.toggle_mode(),
            Command::SetBaseScale(_, v) => surface.set_base_scale(v),
            Command::SetReveal(_, on) => surface.set_reveal(on),
            Command::SetSoftness(_, v) => surface.set_softness(v),
            Command::SetSource(_, source, scale) => {
                surface.set_source(source, scale);
                out.source = source;
            }
            Command::ClearLenses(_) => surface.clear_lenses(),
            Command::Resize(_, viewport) => surface.resize(viewport)?,
            Command::Pointer(_, event) => {
                out.forwarded = surface.handle_pointer(&event);
                if matches!(event, PointerEvent::Down { .. }) {
                    self.focused = Some(id);
                }
            }
        }
        Ok(out)
    }

    /// Applies a toolbar action to the focused surface.
    pub fn dispatch_focused(&mut self, action: ToolbarAction) -> Result<Dispatched, BoardError> {
        let id = self.focused.ok_or(BoardError::NoFocus)?;
        self.dispatch(action.target(id))
    }
}
