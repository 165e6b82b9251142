//! Crumple UI: per-surface interaction on top of `crumple-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use crumple_ui::prelude::*;
//!
//! let mut board = Board::new(EngineConfig::default())?;
//! let id = board.add_surface(Viewport::new(800.0, 600.0))?;
//!
//! // Place a lens, switch to interaction, click through the warp.
//! board.dispatch(Command::Pointer(id, PointerEvent::down(400.0, 300.0)))?;
//! board.dispatch_focused(ToolbarAction::ToggleMode)?;
//! let out = board.dispatch(Command::Pointer(id, PointerEvent::down(420.0, 300.0)))?;
//! forwarder.submit(id, out);
//! ```
//!
//! Gestures go through the pure [`router::Router`]; the resulting commands
//! are applied by [`surface::Surface`]. Live sources are driven by
//! [`live::spawn_capture_loop`] and forwarded input by [`live::Forwarder`].

pub mod board;
pub mod capture;
pub mod event;
pub mod live;
pub mod router;
pub mod stroke;
pub mod surface;

pub use board::{Board, Command};
pub use surface::{Surface, SurfaceId};

/// Common imports for hosts.
pub mod prelude {
    pub use crate::board::{Board, BoardError, Command, Dispatched, ToolbarAction};
    pub use crate::capture::{CaptureOutcome, CaptureSlot, CaptureTicket};
    pub use crate::event::RouterCommand;
    pub use crate::live::{spawn_capture_loop, CaptureLoop, ForwardReport, Forwarder, SharedSurface};
    pub use crate::router::{Mode, Router, RouterState};
    pub use crate::surface::{Surface, SurfaceId, SurfaceStatus};

    // Engine primitives hosts need.
    pub use crumple_engine::config::EngineConfig;
    pub use crumple_engine::coords::{Rect, Vec2, Viewport};
    pub use crumple_engine::host::{DeliveryOutcome, ForwardedEvent, FrameSource, InputSink, SourceHandle};
    pub use crumple_engine::input::{Modifiers, MouseButton, MouseWheelDelta, PointerEvent};
    pub use crumple_engine::raster::Rasterizer;
}
