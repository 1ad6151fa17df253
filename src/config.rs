//! Radar settings.
//!
//! `RadarConfig` starts from the defaults in [`crate::constants`] and is
//! adjusted through by-value setters, e.g.
//! `RadarConfig::default().visible_range(8).store_path("spots.txt")`.

use crate::constants::*;
use crate::store::LoadPolicy;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Distance from the agent to the furthest tile of the window.
    pub visible_range: u32,
    /// Tile span of one bank. Read through [`RadarConfig::bank_span`].
    #[serde(deserialize_with = "at_least_one")]
    pub bank_size: i32,
    /// Gathering distance used by the reachability scan.
    pub scan_radius: u32,
    pub tick_interval_ms: u64,
    /// Movement is checked once every this many ticks.
    pub update_every_ticks: u32,
    pub save_key: String,
    pub store_path: PathBuf,
    pub number_of_maps: u8,
    pub load_policy: LoadPolicy,
}

impl Default for RadarConfig {
    fn default() -> Self {
        RadarConfig {
            visible_range: VISIBLE_RANGE,
            bank_size: BANK_SIZE,
            scan_radius: SCAN_RADIUS,
            tick_interval_ms: TICK_INTERVAL_MS,
            update_every_ticks: UPDATE_EVERY_TICKS,
            save_key: SAVE_KEY.to_string(),
            store_path: PathBuf::from(STORE_PATH),
            number_of_maps: NUMBER_OF_MAPS,
            load_policy: LoadPolicy::default(),
        }
    }
}

impl RadarConfig {
    pub fn visible_range(mut self, range: u32) -> Self {
        self.visible_range = range;
        self
    }

    /// Bank sizes below one tile are clamped to one.
    pub fn bank_size(mut self, size: i32) -> Self {
        self.bank_size = size.max(1);
        self
    }

    pub fn scan_radius(mut self, radius: u32) -> Self {
        self.scan_radius = radius;
        self
    }

    pub fn tick_interval_ms(mut self, interval: u64) -> Self {
        self.tick_interval_ms = interval;
        self
    }

    pub fn update_every_ticks(mut self, ticks: u32) -> Self {
        self.update_every_ticks = ticks.max(1);
        self
    }

    pub fn save_key(mut self, key: impl Into<String>) -> Self {
        self.save_key = key.into();
        self
    }

    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn number_of_maps(mut self, maps: u8) -> Self {
        self.number_of_maps = maps;
        self
    }

    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    /// Side of the square window: the agent tile plus `visible_range` on
    /// each side.
    pub fn window_side(&self) -> usize {
        self.visible_range as usize * 2 + 1
    }

    /// Bank size actually used for tiling. Zero or negative sizes set on the
    /// field directly count as one.
    pub fn bank_span(&self) -> i32 {
        self.bank_size.max(1)
    }

    /// Row and column index of the agent tile.
    pub fn center_index(&self) -> usize {
        self.visible_range as usize
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn at_least_one<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(i32::deserialize(deserializer)?.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_geometry() {
        let config = RadarConfig::default();
        assert_eq!(config.window_side(), 33);
        assert_eq!(config.center_index(), 16);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_builder_overrides() {
        let config = RadarConfig::default()
            .visible_range(2)
            .bank_size(0)
            .update_every_ticks(0)
            .save_key("K")
            .load_policy(LoadPolicy::Strict);
        assert_eq!(config.window_side(), 5);
        assert_eq!(config.bank_size, 1);
        assert_eq!(config.update_every_ticks, 1);
        assert_eq!(config.save_key, "K");
        assert_eq!(config.load_policy, LoadPolicy::Strict);
    }

    #[test]
    fn test_bank_span_ignores_invalid_sizes() {
        let mut config = RadarConfig::default();
        assert_eq!(config.bank_span(), 8);
        config.bank_size = 0;
        assert_eq!(config.bank_span(), 1);
        config.bank_size = -4;
        assert_eq!(config.bank_span(), 1);
    }

    #[test]
    fn test_deserialized_bank_size_is_clamped() {
        use serde::de::value::{Error, I32Deserializer};
        use serde::de::IntoDeserializer;

        let zero: I32Deserializer<Error> = 0.into_deserializer();
        assert_eq!(at_least_one(zero).unwrap(), 1);
        let negative: I32Deserializer<Error> = (-3).into_deserializer();
        assert_eq!(at_least_one(negative).unwrap(), 1);
        let valid: I32Deserializer<Error> = 16.into_deserializer();
        assert_eq!(at_least_one(valid).unwrap(), 16);
    }
}
