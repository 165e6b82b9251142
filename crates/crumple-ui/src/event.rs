use crumple_engine::coords::Vec2;
use crumple_engine::host::ForwardedEvent;
use crumple_engine::lens::Lens;

/// Side effect requested by the interaction router.
///
/// The router never mutates a surface; the surface applies these in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterCommand {
    AddLens(Lens),
    /// Bulk placement from a stroke, inserted in path order.
    AddLenses(Vec<Lens>),
    MoveLens { index: usize, center: Vec2 },
    RemoveLens(usize),
    SetSigma { index: usize, sigma: f32 },
    SetStrength { index: usize, strength: f32 },
    /// Input event for the surface's source, in source DIP coordinates.
    Forward(ForwardedEvent),
}

impl RouterCommand {
    #[inline]
    pub fn is_forward(&self) -> bool {
        matches!(self, RouterCommand::Forward(_))
    }
}
