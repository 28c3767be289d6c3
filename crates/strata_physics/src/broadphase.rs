//! Per-grid broadphase proxy store
//!
//! Each grid owns one [`BroadPhase`]. Proxies are stored in a flat slab with
//! a free list; ids are reused after removal, so a [`ProxyId`] is only
//! meaningful against the broadphase that issued it.

use strata_math::{Aabb, Vec2};

use crate::ids::{EntityUid, FixtureId};
use crate::layers::CollisionLayer;

/// Handle to a proxy within one broadphase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProxyId(pub u32);

impl ProxyId {
    /// Sentinel for "no proxy". Never a valid slab index.
    pub const FREE: Self = Self(u32::MAX);
}

/// What a proxy points back at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyData {
    /// Owning entity
    pub entity: EntityUid,
    /// Fixture within the owning body
    pub fixture: FixtureId,
    /// Which child of the fixture's shape this proxy covers
    pub child_index: usize,
    /// Fixture collision layer at registration time
    pub layer: CollisionLayer,
}

#[derive(Debug)]
struct ProxyEntry {
    /// Fattened bounds in grid-local space
    aabb: Aabb,
    data: ProxyData,
}

/// A flat broadphase over grid-local AABBs
#[derive(Debug, Default)]
pub struct BroadPhase {
    slots: Vec<Option<ProxyEntry>>,
    free: Vec<u32>,
    margin: f32,
    count: usize,
}

impl BroadPhase {
    /// Create a broadphase that fattens proxies by `margin`
    pub fn new(margin: f32) -> Self {
        Self {
            margin,
            ..Default::default()
        }
    }

    /// Number of live proxies
    pub fn proxy_count(&self) -> usize {
        self.count
    }

    /// Register a proxy for `aabb`, returning its id
    pub fn add_proxy(&mut self, aabb: Aabb, data: ProxyData) -> ProxyId {
        let entry = ProxyEntry {
            aabb: aabb.expand(self.margin),
            data,
        };
        self.count += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(entry);
            ProxyId(index)
        } else {
            self.slots.push(Some(entry));
            ProxyId(self.slots.len() as u32 - 1)
        }
    }

    /// Resubmit a proxy with new bounds. Cheap when the move stays inside
    /// the fattened bounds.
    pub fn move_proxy(&mut self, id: ProxyId, aabb: Aabb) -> bool {
        let margin = self.margin;
        match self.entry_mut(id) {
            Some(entry) => {
                if !entry.aabb.contains_aabb(&aabb) {
                    entry.aabb = aabb.expand(margin);
                }
                true
            }
            None => false,
        }
    }

    /// Remove a proxy, releasing its id for reuse
    pub fn destroy_proxy(&mut self, id: ProxyId) -> Option<ProxyData> {
        if id == ProxyId::FREE {
            return None;
        }
        let slot = self.slots.get_mut(id.0 as usize)?;
        let entry = slot.take()?;
        self.free.push(id.0);
        self.count -= 1;
        Some(entry.data)
    }

    fn entry_mut(&mut self, id: ProxyId) -> Option<&mut ProxyEntry> {
        if id == ProxyId::FREE {
            return None;
        }
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Look up a live proxy
    pub fn get(&self, id: ProxyId) -> Option<&ProxyData> {
        self.slots
            .get(id.0 as usize)?
            .as_ref()
            .map(|entry| &entry.data)
    }

    /// All proxies whose fattened bounds intersect `aabb`
    pub fn query_aabb<'a>(
        &'a self,
        aabb: &'a Aabb,
    ) -> impl Iterator<Item = (ProxyId, &'a ProxyData)> + 'a {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            let entry = slot.as_ref()?;
            if entry.aabb.intersects(aabb) {
                Some((ProxyId(i as u32), &entry.data))
            } else {
                None
            }
        })
    }

    /// All proxies whose fattened bounds a ray enters within
    /// `max_distance`, with the entry distance. `origin` and `direction`
    /// are in this broadphase's grid-local frame; `direction` must be
    /// normalized for the distance to be in world units. Unordered.
    pub fn query_ray(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
    ) -> impl Iterator<Item = (ProxyId, &ProxyData, f32)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            let entry = slot.as_ref()?;
            let distance = entry.aabb.intersects_ray(origin, direction)?;
            if distance <= max_distance {
                Some((ProxyId(i as u32), &entry.data, distance))
            } else {
                None
            }
        })
    }
}
