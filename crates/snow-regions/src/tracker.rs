//! Region registry and point resolution
//!
//! Boxes are cached snapshots in viewport pixels. They are only as fresh as the
//! last [`RegionTracker::refresh_all`] (or registration); the tracker never
//! watches geometry itself.

use serde::{Deserialize, Serialize};
use snow_surface::{Point, Rect};

/// Fraction of a region's height that counts as its top landing zone
pub const TOP_ZONE_RATIO: f32 = 0.3;

/// Which part of a region particles may land on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccumulationArea {
    /// Only the top 30% of the box
    #[default]
    #[serde(alias = "top")]
    TopOnly,
    /// The entire box
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionOptions {
    /// Higher wins when regions overlap
    pub priority: i32,
    pub area: AccumulationArea,
}

impl RegionOptions {
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_area(mut self, area: AccumulationArea) -> Self {
        self.area = area;
        self
    }
}

/// Live geometry of a region, queried on demand
pub trait BoundsSource {
    fn bounds(&self) -> Rect;
}

impl<F: Fn() -> Rect> BoundsSource for F {
    fn bounds(&self) -> Rect {
        self()
    }
}

impl BoundsSource for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

struct Region {
    id: String,
    source: Box<dyn BoundsSource>,
    options: RegionOptions,
    rect: Rect,
}

impl Region {
    /// The part of the cached box particles may land on
    fn landing_zone(&self) -> Rect {
        match self.options.area {
            AccumulationArea::TopOnly => self.rect.top_band(TOP_ZONE_RATIO),
            AccumulationArea::All => self.rect,
        }
    }
}

/// Registered regions in registration order
#[derive(Default)]
pub struct RegionTracker {
    regions: Vec<Region>,
}

impl RegionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` and snapshot its box.
    ///
    /// Re-registering an id replaces its source and options but keeps its
    /// original registration slot for tie-breaks.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        source: impl BoundsSource + 'static,
        options: RegionOptions,
    ) {
        let id = id.into();
        let rect = source.bounds();
        let region = Region {
            id,
            source: Box::new(source),
            options,
            rect,
        };

        match self.regions.iter_mut().find(|r| r.id == region.id) {
            Some(existing) => {
                log::debug!("Region '{}' re-registered", region.id);
                *existing = region;
            }
            None => {
                log::debug!("Region '{}' registered at {:?}", region.id, region.rect);
                self.regions.push(region);
            }
        }
    }

    /// Forget `id`; unknown ids are ignored
    pub fn unregister(&mut self, id: &str) {
        self.regions.retain(|r| r.id != id);
    }

    /// Re-snapshot every region's box
    pub fn refresh_all(&mut self) {
        for region in &mut self.regions {
            region.rect = region.source.bounds();
        }
    }

    /// The region whose landing zone contains `(x, y)`.
    ///
    /// Among several matches the strictly highest priority wins, so the
    /// first registered region wins a tie.
    pub fn resolve_hit(&self, x: f32, y: f32) -> Option<&str> {
        let point = Point::new(x, y);
        let mut best: Option<&Region> = None;

        for region in &self.regions {
            if !region.landing_zone().contains(point) {
                continue;
            }
            if best.is_none_or(|b| region.options.priority > b.options.priority) {
                best = Some(region);
            }
        }

        best.map(|r| r.id.as_str())
    }

    /// Clamp `(x, y)` into the landing zone of `id`.
    ///
    /// Unknown ids return the point unchanged.
    pub fn landing_point(&self, id: &str, x: f32, y: f32) -> Point {
        let point = Point::new(x, y);
        match self.find(id) {
            Some(region) => region.landing_zone().clamp(point),
            None => point,
        }
    }

    /// Last cached box of `id`
    pub fn box_of(&self, id: &str) -> Option<Rect> {
        self.find(id).map(|r| r.rect)
    }

    pub fn options(&self, id: &str) -> Option<RegionOptions> {
        self.find(id).map(|r| r.options)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Region ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn find(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}
