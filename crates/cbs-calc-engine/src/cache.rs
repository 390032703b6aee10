//! ---
//! cbs_section: "08-calculation-engine"
//! cbs_subsection: "module"
//! cbs_type: "source"
//! cbs_scope: "code"
//! cbs_description: "Breaker sizing pipeline and standard tables."
//! cbs_version: "v0.1.0"
//! cbs_owner: "tbd"
//! ---
//! Caller-owned, bounded LRU cache of calculation results.

use cbs_common::EngineConfig;
use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{errors::Result, model::BreakerCalculationInput, results::CalculationResults};

/// SHA-256 of the canonical JSON form of `input` and the engine settings it ran under.
pub fn cache_key(input: &BreakerCalculationInput, config: &EngineConfig) -> Result<String> {
    #[derive(Serialize)]
    struct Keyed<'a> {
        input: &'a BreakerCalculationInput,
        engine: &'a EngineConfig,
    }

    let serialised = serde_json::to_vec(&Keyed { input, engine: config })?;
    let mut hasher = Sha256::new();
    hasher.update(&serialised);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Least recently used entries are evicted once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct CalculationCache {
    capacity: usize,
    entries: IndexMap<String, CalculationResults>,
}

impl CalculationCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    pub fn key_for(&self, input: &BreakerCalculationInput, config: &EngineConfig) -> Result<String> {
        cache_key(input, config)
    }

    /// Fetch an entry and mark it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&CalculationResults> {
        let value = self.entries.shift_remove(key)?;
        let (index, _) = self.entries.insert_full(key.to_owned(), value);
        self.entries.get_index(index).map(|(_, results)| results)
    }

    pub fn insert(&mut self, key: String, results: CalculationResults) {
        self.entries.shift_remove(&key);
        while self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, results);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{CircuitConfiguration, LoadMode, Phase, Standard, UnitSystem},
        orchestrator::BreakerCalculator,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn input(load_amps: Decimal) -> BreakerCalculationInput {
        BreakerCalculationInput::new(CircuitConfiguration {
            standard: Standard::Iec,
            voltage: dec!(400),
            phase: Phase::Three,
            load_mode: LoadMode::Amps,
            load_value: load_amps,
            power_factor: dec!(0.85),
            unit_system: UnitSystem::Metric,
        })
    }

    #[test]
    fn key_is_stable_and_input_sensitive() {
        let config = EngineConfig::default();
        let first = cache_key(&input(dec!(20)), &config).unwrap();
        assert_eq!(first, cache_key(&input(dec!(20)), &config).unwrap());
        assert_eq!(first.len(), 64);
        assert_ne!(first, cache_key(&input(dec!(21)), &config).unwrap());

        let other_config = EngineConfig {
            default_breaking_capacity_ka: dec!(36),
            ..EngineConfig::default()
        };
        assert_ne!(first, cache_key(&input(dec!(20)), &other_config).unwrap());
    }

    #[test]
    fn evicts_least_recently_used() {
        let calculator = BreakerCalculator::default();
        let mut cache = CalculationCache::new(2);
        let config = calculator.config().clone();

        let keys: Vec<String> = [dec!(10), dec!(20), dec!(30)]
            .iter()
            .map(|amps| cache_key(&input(*amps), &config).unwrap())
            .collect();
        let results = calculator.calculate(&input(dec!(10))).unwrap();

        cache.insert(keys[0].clone(), results.clone());
        cache.insert(keys[1].clone(), results.clone());
        assert!(cache.get(&keys[0]).is_some());
        cache.insert(keys[2].clone(), results);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&keys[0]));
        assert!(!cache.contains(&keys[1]));
        assert!(cache.contains(&keys[2]));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn calculator_reuses_cached_results() {
        let calculator = BreakerCalculator::default();
        let mut cache = CalculationCache::from_config(calculator.config());
        let first = calculator.calculate_cached(&mut cache, &input(dec!(16))).unwrap();
        let second = calculator.calculate_cached(&mut cache, &input(dec!(16))).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let calculator = BreakerCalculator::default();
        let mut cache = CalculationCache::new(4);
        assert!(calculator.calculate_cached(&mut cache, &input(dec!(5000))).is_err());
        assert!(cache.is_empty());
    }
}
