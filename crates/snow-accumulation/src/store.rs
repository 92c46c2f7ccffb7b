//! Observable snowfall state
//!
//! [`SnowStore`] holds the configuration, the enabled flag, named presets and
//! the stuck particles. It is passed around explicitly (typically as
//! `Rc<RefCell<SnowStore>>`) rather than living in a global. Observers get a
//! [`StoreEvent`] after every change together with the updated store, and
//! read state through that argument instead of borrowing the `RefCell`.

use crate::stuck::{StuckParticle, StuckParticles};
use serde::{Deserialize, Serialize};
use snow_physics::{Millis, ParticleId};
use snow_simulation::{default_presets, SnowConfig, SnowConfigPatch, SnowPreset};

/// What changed in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ConfigChanged { revision: u64 },
    EnabledChanged(bool),
    /// `count` is the region's stuck count after the change
    StuckChanged { region: String, count: usize },
    PresetsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent, &SnowStore)>;

/// The persisted subset of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Settings {
    config: SnowConfig,
    is_enabled: bool,
    presets: Vec<SnowPreset>,
    active_preset: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config: SnowConfig::default(),
            is_enabled: true,
            presets: default_presets(),
            active_preset: None,
        }
    }
}

pub struct SnowStore {
    config: SnowConfig,
    config_revision: u64,
    enabled: bool,
    presets: Vec<SnowPreset>,
    active_preset: Option<String>,
    stuck: StuckParticles,

    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Default for SnowStore {
    fn default() -> Self {
        Self::new(SnowConfig::default())
    }
}

impl SnowStore {
    pub fn new(config: SnowConfig) -> Self {
        Self {
            config,
            config_revision: 0,
            enabled: true,
            presets: default_presets(),
            active_preset: None,
            stuck: StuckParticles::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    // Observers

    /// Call `observer` with each event and the store as it is after the change
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&StoreEvent, &SnowStore) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sub, _)| *sub != id);
    }

    fn notify(&mut self, event: StoreEvent) {
        let mut observers = std::mem::take(&mut self.observers);
        for (_, observer) in &mut observers {
            observer(&event, self);
        }
        self.observers = observers;
    }

    fn config_changed(&mut self) {
        self.config_revision += 1;
        self.notify(StoreEvent::ConfigChanged {
            revision: self.config_revision,
        });
    }

    fn stuck_changed(&mut self, region: String) {
        let count = self.stuck.count(&region);
        self.notify(StoreEvent::StuckChanged { region, count });
    }

    // Enabled flag

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.set_enabled(!self.enabled);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        log::info!("Snow {}", if enabled { "enabled" } else { "disabled" });
        self.notify(StoreEvent::EnabledChanged(enabled));
    }

    // Configuration

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    /// Bumped on every configuration change
    pub fn config_revision(&self) -> u64 {
        self.config_revision
    }

    /// Merge `patch` into the config; the result no longer matches a preset
    pub fn update_config(&mut self, patch: &SnowConfigPatch) {
        self.config.merge(patch);
        self.active_preset = None;
        self.config_changed();
    }

    pub fn reset_config(&mut self) {
        self.config = SnowConfig::default();
        self.active_preset = None;
        self.config_changed();
    }

    // Presets

    pub fn presets(&self) -> &[SnowPreset] {
        &self.presets
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    /// Add a preset, replacing one with the same name
    pub fn add_preset(&mut self, preset: SnowPreset) {
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
        self.notify(StoreEvent::PresetsChanged);
    }

    pub fn remove_preset(&mut self, name: &str) {
        let before = self.presets.len();
        self.presets.retain(|p| p.name != name);
        if self.presets.len() != before {
            self.notify(StoreEvent::PresetsChanged);
        }
    }

    /// Replace the config with the defaults merged with preset `name`.
    ///
    /// Returns `false` for an unknown name, leaving the config untouched.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        let Some(preset) = self.presets.iter().find(|p| p.name == name) else {
            log::warn!("Unknown preset '{}'", name);
            return false;
        };

        self.config = SnowConfig::default().merged(&preset.config);
        self.active_preset = Some(preset.name.clone());
        log::info!("Applied preset '{}'", name);
        self.config_changed();
        true
    }

    // Stuck particles

    /// Store `stuck` under its region, evicting the oldest entries beyond `max_stuck`
    pub fn add_stuck(&mut self, stuck: StuckParticle) {
        let region = stuck.region_id.clone();
        let evicted = self.stuck.add(stuck, self.config.max_stuck);
        if !evicted.is_empty() {
            log::debug!("Region '{}' full, evicted {} stuck particle(s)", region, evicted.len());
        }
        self.stuck_changed(region);
    }

    pub fn remove_stuck(&mut self, region: &str, id: ParticleId) {
        if self.stuck.remove(region, id).is_some() {
            self.stuck_changed(region.to_string());
        }
    }

    pub fn clear_region(&mut self, region: &str) {
        if self.stuck.clear_region(region) > 0 {
            self.stuck_changed(region.to_string());
        }
    }

    pub fn clear_all(&mut self) {
        for region in self.stuck.clear_all() {
            self.stuck_changed(region);
        }
    }

    /// Remove every stuck particle whose fade window ended at `now`.
    ///
    /// Returns how many were removed.
    pub fn sweep_faded(&mut self, now: Millis) -> usize {
        let expired = self.stuck.sweep_faded(now, self.config.fade_duration_ms);
        if expired.is_empty() {
            return 0;
        }

        log::debug!("Faded out {} stuck particle(s)", expired.len());
        let mut regions: Vec<String> = expired.iter().map(|(r, _)| r.clone()).collect();
        regions.dedup();
        for region in regions {
            self.stuck_changed(region);
        }
        expired.len()
    }

    pub fn stuck(&self, region: &str) -> &[StuckParticle] {
        self.stuck.get(region)
    }

    pub fn stuck_particles(&self) -> &StuckParticles {
        &self.stuck
    }

    pub fn element_snow_count(&self, region: &str) -> usize {
        self.stuck.count(region)
    }

    pub fn total_snow_count(&self) -> usize {
        self.stuck.total()
    }

    // Settings

    /// Serialize config, enabled flag and presets; stuck particles are not persisted
    pub fn save_settings(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Settings {
            config: self.config.clone(),
            is_enabled: self.enabled,
            presets: self.presets.clone(),
            active_preset: self.active_preset.clone(),
        })
    }

    /// Restore settings written by [`SnowStore::save_settings`]
    pub fn load_settings(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;

        self.config = settings.config;
        self.presets = settings.presets;
        self.active_preset = settings.active_preset;
        self.config_changed();
        self.notify(StoreEvent::PresetsChanged);
        self.set_enabled(settings.is_enabled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use snow_physics::Particle;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn stuck(id: u64, region: &str, now: Millis) -> StuckParticle {
        StuckParticle::new(Particle::new(ParticleId(id), Vec2::ZERO), region, now, 5000)
    }

    fn recorded(store: &mut SnowStore) -> Rc<RefCell<Vec<StoreEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        store.subscribe(move |e, _| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn test_defaults() {
        let store = SnowStore::default();
        assert!(store.is_enabled());
        assert_eq!(store.config().intensity, 100);
        assert_eq!(store.presets().len(), 3);
        assert_eq!(store.active_preset(), None);
    }

    #[test]
    fn test_apply_preset_merges_onto_defaults() {
        let mut store = SnowStore::default();
        store.update_config(&SnowConfigPatch::default().with_max_stuck(5));

        assert!(store.apply_preset("Blizzard"));
        assert_eq!(store.config().intensity, 300);
        assert_eq!(store.config().size.max, 8.0);
        assert_eq!(store.config().max_stuck, 50);
        assert_eq!(store.active_preset(), Some("Blizzard"));

        store.update_config(&SnowConfigPatch::default().with_intensity(10));
        assert_eq!(store.active_preset(), None);

        let revision = store.config_revision();
        assert!(!store.apply_preset("Nope"));
        assert_eq!(store.config_revision(), revision);
    }

    #[test]
    fn test_observers_see_changes_until_unsubscribed() {
        let mut store = SnowStore::default();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let id = store.subscribe(move |e, _| sink.borrow_mut().push(e.clone()));

        store.toggle();
        store.add_stuck(stuck(1, "card", 0));
        store.unsubscribe(id);
        store.toggle();

        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::EnabledChanged(false),
                StoreEvent::StuckChanged {
                    region: "card".into(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_observers_read_updated_state() {
        let store = Rc::new(RefCell::new(SnowStore::default()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.borrow_mut().subscribe(move |event, state| {
            if let StoreEvent::StuckChanged { .. } = event {
                sink.borrow_mut().push(state.total_snow_count());
            }
        });

        store.borrow_mut().add_stuck(stuck(1, "a", 0));
        store.borrow_mut().add_stuck(stuck(2, "b", 0));
        store.borrow_mut().clear_region("a");

        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
        assert_eq!(store.borrow().total_snow_count(), 1);
    }

    #[test]
    fn test_config_event_carries_revision() {
        let mut store = SnowStore::default();
        let intensities = Rc::new(RefCell::new(Vec::new()));
        let sink = intensities.clone();
        store.subscribe(move |event, state| {
            if let StoreEvent::ConfigChanged { revision } = event {
                assert_eq!(*revision, state.config_revision());
                sink.borrow_mut().push(state.config().intensity);
            }
        });

        store.update_config(&SnowConfigPatch::default().with_intensity(42));
        store.apply_preset("Blizzard");

        assert_eq!(*intensities.borrow(), vec![42, 300]);
    }

    #[test]
    fn test_add_stuck_uses_configured_cap() {
        let mut store = SnowStore::default();
        store.update_config(&SnowConfigPatch::default().with_max_stuck(2));
        for i in 0..3 {
            store.add_stuck(stuck(i, "card", i * 10));
        }
        assert_eq!(store.element_snow_count("card"), 2);
        assert!(store.stuck("card").iter().all(|s| s.id() != ParticleId(0)));
    }

    #[test]
    fn test_sweep_notifies_once_per_region() {
        let mut store = SnowStore::default();
        store.add_stuck(stuck(1, "a", 0));
        store.add_stuck(stuck(2, "a", 0));
        store.add_stuck(stuck(3, "b", 0));
        let events = recorded(&mut store);

        assert_eq!(store.sweep_faded(6000), 0);
        assert_eq!(store.sweep_faded(7001), 3);
        assert_eq!(store.total_snow_count(), 0);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_settings_round_trip_skips_stuck() {
        let mut store = SnowStore::default();
        store.apply_preset("Magic");
        store.set_enabled(false);
        store.add_stuck(stuck(1, "card", 0));
        let json = store.save_settings().unwrap();
        assert!(json.contains("\"activePreset\": \"Magic\""));

        let mut restored = SnowStore::default();
        restored.load_settings(&json).unwrap();
        assert_eq!(restored.config(), store.config());
        assert!(!restored.is_enabled());
        assert_eq!(restored.active_preset(), Some("Magic"));
        assert_eq!(restored.total_snow_count(), 0);
    }

    #[test]
    fn test_partial_settings_merge_onto_defaults() {
        let mut store = SnowStore::default();
        store.set_enabled(false);
        store
            .load_settings(r#"{"config": {"intensity": 12}}"#)
            .unwrap();

        assert_eq!(store.config().intensity, 12);
        assert_eq!(store.config().fade_duration_ms, 2000);
        assert!(store.is_enabled());
        assert_eq!(store.presets().len(), 3);
    }

    #[test]
    fn test_bad_settings_leave_store_untouched() {
        let mut store = SnowStore::default();
        assert!(store.load_settings("{\"config\": 3}").is_err());
        assert_eq!(store.config(), &SnowConfig::default());
    }
}
