//! Index-stable storage for one constraint family.
//!
//! Removal tombstones a slot in O(1) and leaves every other slot index valid,
//! so a pass can hold indices of candidate pairs while it deletes members of
//! other pairs. `compact` squeezes tombstones out between passes.

use super::types::Constraint;

/// Which family a constraint lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    /// `b > 0`: `y <= (c − a·x)/b`.
    Upper,
    /// `b < 0`: `y >= (c − a·x)/b`.
    Lower,
}

/// Where the retained x-range lies relative to a pair's crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Toward {
    Left,
    Right,
}

impl Side {
    /// For a non-parallel pair whose crossing lies outside the retained range,
    /// true when the member with the larger slope is the redundant one.
    ///
    /// Right of the crossing the larger-slope line is above the other: a lower
    /// family keeps it, an upper family drops it. Left of it the roles swap.
    #[inline]
    pub(crate) fn drops_larger_slope(self, toward: Toward) -> bool {
        (self == Side::Upper) == (toward == Toward::Right)
    }

    /// For a parallel pair, true when `p` is redundant next to `q`.
    #[inline]
    pub(crate) fn parallel_drops_first(self, p: &Constraint, q: &Constraint) -> bool {
        match self {
            Side::Upper => p.y_intercept() > q.y_intercept(),
            Side::Lower => p.y_intercept() < q.y_intercept(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Family {
    side: Side,
    slots: Vec<Option<Constraint>>,
    live: usize,
}

impl Family {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            slots: Vec::new(),
            live: 0,
        }
    }

    #[inline]
    pub(crate) fn side(&self) -> Side {
        self.side
    }

    pub(crate) fn push(&mut self, h: Constraint) {
        self.slots.push(Some(h));
        self.live += 1;
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Constraint in slot `i`; the slot must be live.
    #[inline]
    pub(crate) fn get(&self, i: usize) -> &Constraint {
        self.slots[i]
            .as_ref()
            .unwrap_or_else(|| panic!("slot {i} of {:?} family was removed", self.side))
    }

    pub(crate) fn remove(&mut self, i: usize) {
        if self.slots[i].take().is_some() {
            self.live -= 1;
        }
    }

    /// Drop the member with the larger (`larger == true`) or smaller slope of pair `(i, j)`.
    pub(crate) fn remove_by_slope(&mut self, i: usize, j: usize, larger: bool) {
        let first_larger = self.get(i).slope() > self.get(j).slope();
        if first_larger == larger {
            self.remove(i);
        } else {
            self.remove(j);
        }
    }

    /// Live slots paired up in order; an odd one out is left unpaired.
    pub(crate) fn pairs(&self) -> Vec<(usize, usize)> {
        let live: Vec<usize> = self.live_slots().collect();
        live.chunks_exact(2).map(|p| (p[0], p[1])).collect()
    }

    pub(crate) fn live_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Constraint> + '_ {
        self.slots.iter().flatten()
    }

    pub(crate) fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        debug_assert_eq!(self.slots.len(), self.live);
    }
}
