//! Algorithm registry
//!
//! Maps string keys to (descriptor, factory) pairs. The routing layer
//! resolves the `algorithm` request parameter through this map, renders
//! schemas from the descriptors, and builds a kernel per request from
//! the caller-supplied parameter document.
//!
//! The registry is constructed once at startup and never mutated;
//! `register` consumes and returns the registry so extensions chain off
//! the default set without interfering with it.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use tilemath_core::{AlgorithmMetadata, Error, Result, TileAlgorithm};

use crate::change::{PercentChange, PercentChangeParams, RapidChange, RapidChangeParams};
use crate::flood::{FloodDetection, FloodDetectionParams};

/// Builds a kernel from a JSON parameter document
pub type AlgorithmFactory = fn(Value) -> Result<Box<dyn TileAlgorithm>>;

/// One registered algorithm: its static descriptor plus a factory
pub struct AlgorithmEntry {
    metadata: AlgorithmMetadata,
    factory: AlgorithmFactory,
}

impl AlgorithmEntry {
    pub fn new(metadata: AlgorithmMetadata, factory: AlgorithmFactory) -> Self {
        Self { metadata, factory }
    }

    /// Static descriptor, readable without constructing the kernel
    pub fn metadata(&self) -> &AlgorithmMetadata {
        &self.metadata
    }

    /// Build the kernel, validating the parameter document
    pub fn create(&self, params: Value) -> Result<Box<dyn TileAlgorithm>> {
        (self.factory)(params)
    }
}

/// Immutable string-keyed map of algorithm variants
pub struct Registry {
    entries: BTreeMap<&'static str, AlgorithmEntry>,
}

impl Registry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The built-in algorithm set: `rca`, `rca_percentage`,
    /// `flood_detection`
    pub fn with_defaults() -> Self {
        Self::empty()
            .register(
                "rca",
                AlgorithmEntry::new(RapidChange::descriptor(), |params| {
                    let params: RapidChangeParams = parse_params(params)?;
                    Ok(Box::new(RapidChange::new(params)?))
                }),
            )
            .register(
                "rca_percentage",
                AlgorithmEntry::new(PercentChange::descriptor(), |params| {
                    let params: PercentChangeParams = parse_params(params)?;
                    Ok(Box::new(PercentChange::new(params)?))
                }),
            )
            .register(
                "flood_detection",
                AlgorithmEntry::new(FloodDetection::descriptor(), |params| {
                    let params: FloodDetectionParams = parse_params(params)?;
                    Ok(Box::new(FloodDetection::new(params)?))
                }),
            )
    }

    /// Add an entry, consuming and returning the registry. A repeated
    /// key shadows the earlier entry.
    pub fn register(mut self, key: &'static str, entry: AlgorithmEntry) -> Self {
        debug!(key, title = entry.metadata.title, "registering algorithm");
        self.entries.insert(key, entry);
        self
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Result<&AlgorithmEntry> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::UnknownAlgorithm(key.to_string()))
    }

    /// Descriptor for a registered key
    pub fn metadata(&self, key: &str) -> Result<&AlgorithmMetadata> {
        Ok(self.get(key)?.metadata())
    }

    /// Build a kernel for a registered key from a JSON parameter
    /// document
    pub fn create(&self, key: &str, params: Value) -> Result<Box<dyn TileAlgorithm>> {
        self.get(key)?.create(params)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::ParameterParse(e.to_string()))
}
