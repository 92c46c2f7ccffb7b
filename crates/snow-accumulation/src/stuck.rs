//! Stuck particle records and their per-region collection

use snow_physics::{Millis, Particle, ParticleId};
use std::collections::BTreeMap;

/// A particle that landed on a region.
///
/// `particle.position` is in region-local coordinates (relative to the
/// region box's top-left corner at the time of the hit).
#[derive(Debug, Clone, PartialEq)]
pub struct StuckParticle {
    pub particle: Particle,
    pub stuck: bool,
    pub stuck_time: Millis,
    /// `stuck_time + fade_delay`
    pub fade_start: Millis,
    pub region_id: String,
}

impl StuckParticle {
    pub fn new(particle: Particle, region_id: impl Into<String>, now: Millis, fade_delay: Millis) -> Self {
        Self {
            particle,
            stuck: true,
            stuck_time: now,
            fade_start: now.saturating_add(fade_delay),
            region_id: region_id.into(),
        }
    }

    pub fn id(&self) -> ParticleId {
        self.particle.id
    }

    /// Fraction of the fade window elapsed at `now`; negative before the fade starts
    pub fn fade_progress(&self, now: Millis, fade_duration: Millis) -> f64 {
        let elapsed = now as f64 - self.fade_start as f64;
        if fade_duration == 0 {
            return if elapsed > 0.0 { f64::INFINITY } else { 0.0 };
        }
        elapsed / fade_duration as f64
    }

    /// Whether the fade window is over at `now`
    pub fn is_expired(&self, now: Millis, fade_duration: Millis) -> bool {
        now > self.fade_start && self.fade_progress(now, fade_duration) >= 1.0
    }
}

/// Stuck particles grouped by region id.
///
/// Regions never map to an empty list: removing the last particle drops the key.
#[derive(Debug, Clone, Default)]
pub struct StuckParticles {
    by_region: BTreeMap<String, Vec<StuckParticle>>,
}

impl StuckParticles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `stuck` to its region, then evict the oldest entries until the
    /// region holds at most `cap` particles. Returns what was evicted.
    pub fn add(&mut self, stuck: StuckParticle, cap: usize) -> Vec<StuckParticle> {
        let region = stuck.region_id.clone();
        let list = self.by_region.entry(region.clone()).or_default();
        list.push(stuck);

        let mut evicted = Vec::new();
        while list.len() > cap {
            let Some(oldest) = list
                .iter()
                .enumerate()
                .min_by_key(|(_, s)| s.stuck_time)
                .map(|(i, _)| i)
            else {
                break;
            };
            evicted.push(list.remove(oldest));
        }

        if list.is_empty() {
            self.by_region.remove(&region);
        }
        evicted
    }

    /// Remove one particle; unknown region or id is a no-op
    pub fn remove(&mut self, region: &str, id: ParticleId) -> Option<StuckParticle> {
        let list = self.by_region.get_mut(region)?;
        let index = list.iter().position(|s| s.id() == id)?;
        let removed = list.remove(index);
        if list.is_empty() {
            self.by_region.remove(region);
        }
        Some(removed)
    }

    /// Drop a region's list; returns how many particles it held
    pub fn clear_region(&mut self, region: &str) -> usize {
        self.by_region.remove(region).map_or(0, |list| list.len())
    }

    /// Drop every region; returns the ids of the regions that were cleared
    pub fn clear_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.by_region).into_keys().collect()
    }

    /// Remove every particle whose fade window has ended at `now`.
    ///
    /// Returns `(region, particle)` pairs in region order.
    pub fn sweep_faded(&mut self, now: Millis, fade_duration: Millis) -> Vec<(String, ParticleId)> {
        let expired: Vec<(String, ParticleId)> = self
            .by_region
            .iter()
            .flat_map(|(region, list)| {
                list.iter()
                    .filter(|s| s.is_expired(now, fade_duration))
                    .map(move |s| (region.clone(), s.id()))
            })
            .collect();

        for (region, id) in &expired {
            self.remove(region, *id);
        }
        expired
    }

    pub fn get(&self, region: &str) -> &[StuckParticle] {
        self.by_region.get(region).map_or(&[], |list| list.as_slice())
    }

    pub fn count(&self, region: &str) -> usize {
        self.get(region).len()
    }

    pub fn total(&self) -> usize {
        self.by_region.values().map(Vec::len).sum()
    }

    /// Region ids that currently hold particles
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.by_region.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn stuck(id: u64, region: &str, now: Millis) -> StuckParticle {
        let particle = Particle::new(ParticleId(id), Vec2::new(10.0, 5.0));
        StuckParticle::new(particle, region, now, 5000)
    }

    #[test]
    fn test_fade_start_is_stuck_time_plus_delay() {
        let s = stuck(1, "card", 1000);
        assert_eq!(s.stuck_time, 1000);
        assert_eq!(s.fade_start, 6000);
        assert!(s.stuck);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut all = StuckParticles::new();
        for (id, t) in [(1, 300), (2, 100), (3, 200)] {
            assert!(all.add(stuck(id, "card", t), 3).is_empty());
        }

        let evicted = all.add(stuck(4, "card", 400), 3);
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id(), ParticleId(2));
        assert_eq!(all.count("card"), 3);
    }

    #[test]
    fn test_zero_cap_keeps_nothing() {
        let mut all = StuckParticles::new();
        let evicted = all.add(stuck(1, "card", 0), 0);
        assert_eq!(evicted.len(), 1);
        assert!(all.is_empty());
    }

    #[test]
    fn test_remove_last_drops_region_key() {
        let mut all = StuckParticles::new();
        all.add(stuck(1, "card", 0), 10);
        assert!(all.remove("card", ParticleId(9)).is_none());
        assert!(all.remove("other", ParticleId(1)).is_none());

        assert!(all.remove("card", ParticleId(1)).is_some());
        assert_eq!(all.regions().count(), 0);
    }

    #[test]
    fn test_clear_region_and_all() {
        let mut all = StuckParticles::new();
        for (i, region) in ["a", "b", "c"].iter().enumerate() {
            all.add(stuck(i as u64, region, 0), 10);
        }
        assert_eq!(all.clear_region("a"), 1);
        assert_eq!(all.clear_region("a"), 0);

        let cleared = all.clear_all();
        assert_eq!(cleared, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(all.total(), 0);
        assert!(all.is_empty());
    }

    #[test]
    fn test_sweep_respects_fade_window() {
        let mut all = StuckParticles::new();
        let s = stuck(1, "card", 0);
        let t0 = s.fade_start;
        all.add(s, 10);

        assert!(all.sweep_faded(t0 + 2000 - 1, 2000).is_empty());
        assert_eq!(all.count("card"), 1);

        let swept = all.sweep_faded(t0 + 2000 + 1, 2000);
        assert_eq!(swept, vec![("card".to_string(), ParticleId(1))]);
        assert_eq!(all.count("card"), 0);
    }

    #[test]
    fn test_zero_duration_expires_right_after_fade_start() {
        let s = stuck(1, "card", 0);
        assert!(!s.is_expired(s.fade_start, 0));
        assert!(s.is_expired(s.fade_start + 1, 0));
    }

    proptest! {
        #[test]
        fn prop_cap_keeps_newest(times in prop::collection::vec(0u64..10_000, 1..40), cap in 1usize..10) {
            let mut all = StuckParticles::new();
            for (i, t) in times.iter().enumerate() {
                all.add(stuck(i as u64, "card", *t), cap);
                prop_assert!(all.count("card") <= cap);
            }
            prop_assert_eq!(all.count("card"), times.len().min(cap));
        }
    }
}
