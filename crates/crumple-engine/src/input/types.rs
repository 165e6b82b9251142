use crate::coords::Vec2;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ..Modifiers::NONE };
    pub const ALT: Modifiers = Modifiers { alt: true, ..Modifiers::NONE };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
/// Positive `y` scrolls down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Pixels per line used by [`to_pixels`](Self::to_pixels).
    pub const LINE_HEIGHT: f32 = 40.0;

    pub fn to_pixels(self) -> Vec2 {
        match self {
            MouseWheelDelta::Line { x, y } => Vec2::new(x, y) * Self::LINE_HEIGHT,
            MouseWheelDelta::Pixel { x, y } => Vec2::new(x, y),
        }
    }
}

/// Gesture sample on a surface, positions in logical surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Down {
        pos: Vec2,
        button: MouseButton,
        modifiers: Modifiers,
        click_count: u32,
    },
    Move {
        pos: Vec2,
        modifiers: Modifiers,
    },
    Up {
        pos: Vec2,
        button: MouseButton,
        modifiers: Modifiers,
    },
    Wheel {
        pos: Vec2,
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    /// Primary-button single press without modifiers.
    pub fn down(x: f32, y: f32) -> Self {
        PointerEvent::Down {
            pos: Vec2::new(x, y),
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            click_count: 1,
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        PointerEvent::Move { pos: Vec2::new(x, y), modifiers: Modifiers::NONE }
    }

    pub fn up(x: f32, y: f32) -> Self {
        PointerEvent::Up { pos: Vec2::new(x, y), button: MouseButton::Left, modifiers: Modifiers::NONE }
    }

    pub fn wheel(x: f32, y: f32, delta_y: f32) -> Self {
        PointerEvent::Wheel {
            pos: Vec2::new(x, y),
            delta: MouseWheelDelta::Pixel { x: 0.0, y: delta_y },
            modifiers: Modifiers::NONE,
        }
    }

    /// Returns the same event with `modifiers` replaced.
    pub fn with_modifiers(self, m: Modifiers) -> Self {
        match self {
            PointerEvent::Down { pos, button, click_count, .. } => {
                PointerEvent::Down { pos, button, modifiers: m, click_count }
            }
            PointerEvent::Move { pos, .. } => PointerEvent::Move { pos, modifiers: m },
            PointerEvent::Up { pos, button, .. } => PointerEvent::Up { pos, button, modifiers: m },
            PointerEvent::Wheel { pos, delta, .. } => PointerEvent::Wheel { pos, delta, modifiers: m },
        }
    }

    pub fn pos(&self) -> Vec2 {
        match *self {
            PointerEvent::Down { pos, .. }
            | PointerEvent::Move { pos, .. }
            | PointerEvent::Up { pos, .. }
            | PointerEvent::Wheel { pos, .. } => pos,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match *self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Up { modifiers, .. }
            | PointerEvent::Wheel { modifiers, .. } => modifiers,
        }
    }
}
