use std::collections::VecDeque;

use crate::coords::Vec2;
use crate::error::ConfigError;

use super::Lens;

/// Ordered lens collection with FIFO eviction.
///
/// Order is significant: the warp applies lenses in index order, each acting
/// on the coordinate produced by the previous one.
///
/// Invariant: `len() <= capacity()`. Inserting into a full field evicts index
/// 0 (the oldest lens), never the newest.
#[derive(Debug, Clone, PartialEq)]
pub struct LensField {
    lenses: VecDeque<Lens>,
    capacity: usize,
}

impl LensField {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self { lenses: VecDeque::with_capacity(capacity), capacity })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lenses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lenses.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Lens> {
        self.lenses.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Lens> {
        self.lenses.get_mut(index)
    }

    /// Lenses in application order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Lens> + '_ {
        self.lenses.iter()
    }

    /// Appends a lens, returning the evicted oldest lens when the field was full.
    pub fn push(&mut self, lens: Lens) -> Option<Lens> {
        let evicted = if self.lenses.len() == self.capacity {
            self.lenses.pop_front()
        } else {
            None
        };
        self.lenses.push_back(lens);
        if evicted.is_some() {
            log::debug!("lens field full ({}), evicted oldest lens", self.capacity);
        }
        evicted
    }

    /// Removes the lens at `index`, preserving the order of the rest.
    pub fn remove(&mut self, index: usize) -> Option<Lens> {
        self.lenses.remove(index)
    }

    pub fn clear(&mut self) {
        self.lenses.clear();
    }

    /// Finds the lens whose center is closest to `point` (edit space) and
    /// strictly within `radius`. Ties go to the earlier lens.
    pub fn pick(&self, point: Vec2, radius: f32) -> Option<usize> {
        let threshold = radius * radius;
        let mut best: Option<(usize, f32)> = None;
        for (i, lens) in self.lenses.iter().enumerate() {
            let d2 = (lens.center - point).length_squared();
            if d2 < threshold && best.is_none_or(|(_, bd)| d2 < bd) {
                best = Some((i, d2));
            }
        }
        best.map(|(i, _)| i)
    }
}
