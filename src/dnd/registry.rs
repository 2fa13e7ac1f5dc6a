//! Zone lookup for the touch path.
//!
//! Touch events carry no target element, so the controller asks the host
//! which zone lies under a point ([`HitTest`]) and resolves that id to a
//! typed [`DropZone`] through a [`ZoneRegistry`].

use std::collections::HashMap;

use super::types::{DropZone, Point};

/// Zone (and optional insertion index) found under a point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitTarget {
    pub zone_id: String,
    pub index: Option<usize>,
}

impl HitTarget {
    pub fn new(zone_id: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            zone_id: zone_id.into(),
            index,
        }
    }
}

/// Host-provided hit testing against the rendered tree
pub trait HitTest {
    fn zone_at(&self, point: Point) -> Option<HitTarget>;
}

impl<F> HitTest for F
where
    F: Fn(Point) -> Option<HitTarget>,
{
    fn zone_at(&self, point: Point) -> Option<HitTarget> {
        self(point)
    }
}

/// Drop zones keyed by id
pub struct ZoneRegistry<'a, T> {
    zones: HashMap<String, DropZone<'a, T>>,
}

impl<T> Default for ZoneRegistry<'_, T> {
    fn default() -> Self {
        Self {
            zones: HashMap::new(),
        }
    }
}

impl<T> std::fmt::Debug for ZoneRegistry<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneRegistry")
            .field("zones", &self.zones.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, T> ZoneRegistry<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone, returning the one it replaced
    pub fn register(&mut self, zone: DropZone<'a, T>) -> Option<DropZone<'a, T>> {
        self.zones.insert(zone.id.clone(), zone)
    }

    pub fn unregister(&mut self, zone_id: &str) -> Option<DropZone<'a, T>> {
        self.zones.remove(zone_id)
    }

    pub fn get(&self, zone_id: &str) -> Option<&DropZone<'a, T>> {
        self.zones.get(zone_id)
    }

    pub fn get_mut(&mut self, zone_id: &str) -> Option<&mut DropZone<'a, T>> {
        self.zones.get_mut(zone_id)
    }

    pub fn contains(&self, zone_id: &str) -> bool {
        self.zones.contains_key(zone_id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
