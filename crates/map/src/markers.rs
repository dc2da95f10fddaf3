use serde::Serialize;

use crate::{Bounds, LatLng};

/// A marker the page wants on the map: its list number and position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub number: usize,
    pub position: LatLng,
}

impl MarkerSpec {
    pub fn new(number: usize, position: LatLng) -> Self {
        Self { number, position }
    }

    pub fn label(&self) -> String {
        self.number.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerOp {
    Detach { slot: usize },
    Attach { slot: usize, spec: MarkerSpec },
}

/// Explicit detach/attach operations turning the rendered marker set into the desired one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPlan {
    pub ops: Vec<MarkerOp>,
    pub bounds: Bounds,
}

impl MarkerPlan {
    /// Every rendered slot is detached before anything is attached, so no marker of a
    /// previous sync can survive. Specs with an unusable position are left out.
    pub fn rebuild(rendered: usize, desired: &[MarkerSpec]) -> Self {
        let mut ops: Vec<MarkerOp> = (0..rendered).map(|slot| MarkerOp::Detach { slot }).collect();
        let mut bounds = Bounds::new();

        for spec in desired {
            if !spec.position.is_valid() {
                tracing::debug!(number = spec.number, "Skipping marker without a usable position");
                continue;
            }

            let slot = ops
                .iter()
                .filter(|op| matches!(op, MarkerOp::Attach { .. }))
                .count();

            bounds.extend(spec.position);
            ops.push(MarkerOp::Attach {
                slot,
                spec: spec.clone(),
            });
        }

        Self { ops, bounds }
    }

    pub fn detached(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, MarkerOp::Detach { .. }))
            .count()
    }

    pub fn attached(&self) -> usize {
        self.ops.len() - self.detached()
    }
}

/// Owned overlay handles, indexed by slot.
#[derive(Debug)]
pub struct MarkerArena<O> {
    slots: Vec<Option<(MarkerSpec, O)>>,
}

impl<O> Default for MarkerArena<O> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<O> MarkerArena<O> {
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    pub fn specs(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.slots.iter().flatten().map(|(spec, _)| spec)
    }

    pub fn take(&mut self, slot: usize) -> Option<O> {
        self.slots
            .get_mut(slot)
            .and_then(Option::take)
            .map(|(_, overlay)| overlay)
    }

    pub fn place(&mut self, slot: usize, spec: MarkerSpec, overlay: O) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
        self.slots[slot] = Some((spec, overlay));
    }

    /// Drops empty slots once every overlay has been handed back.
    pub fn compact(&mut self) {
        if self.is_empty() {
            self.slots.clear();
        }
    }

    pub fn drain(&mut self) -> Vec<O> {
        self.slots
            .drain(..)
            .flatten()
            .map(|(_, overlay)| overlay)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(number: usize, lat: f64, lng: f64) -> MarkerSpec {
        MarkerSpec::new(number, LatLng::new(lat, lng))
    }

    #[test]
    fn test_rebuild_detaches_before_attach() {
        let plan = MarkerPlan::rebuild(2, &[spec(1, 37.5, 127.0), spec(2, 37.6, 127.1)]);

        assert_eq!(plan.detached(), 2);
        assert_eq!(plan.attached(), 2);
        let first_attach = plan
            .ops
            .iter()
            .position(|op| matches!(op, MarkerOp::Attach { .. }))
            .unwrap();
        assert!(
            plan.ops[first_attach..]
                .iter()
                .all(|op| matches!(op, MarkerOp::Attach { .. }))
        );
    }

    #[test]
    fn test_rebuild_skips_unusable_positions() {
        let plan = MarkerPlan::rebuild(
            0,
            &[spec(1, 37.5, 127.0), spec(2, f64::NAN, 127.0), spec(3, 37.7, 127.2)],
        );

        let attached = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                MarkerOp::Attach { slot, spec } => Some((*slot, spec.number)),
                _ => None,
            })
            .collect::<Vec<_>>();

        assert_eq!(attached, vec![(0, 1), (1, 3)]);
        assert_eq!(plan.bounds.north_east(), Some(LatLng::new(37.7, 127.2)));
    }

    #[test]
    fn test_arena_take_and_compact() {
        let mut arena = MarkerArena::default();
        arena.place(0, spec(1, 37.5, 127.0), "a");
        arena.place(1, spec(2, 37.6, 127.0), "b");
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.take(0), Some("a"));
        assert_eq!(arena.take(0), None);
        arena.compact();
        assert_eq!(arena.slots(), 2);

        assert_eq!(arena.take(1), Some("b"));
        arena.compact();
        assert_eq!(arena.slots(), 0);
    }
}
