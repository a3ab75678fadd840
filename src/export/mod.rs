//! Shareable links to external fitting tools.
//!
//! A loadout is turned into a journal `Loadout` event, gzip-compressed, URL-safe base64 encoded
//! (padding kept, `=` escaped as `%3D`) and dropped into the service's import URL.

pub mod loadout_event;

use std::collections::BTreeMap;
use std::io::Write;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;

use crate::error::{ConfigError, Error, Result};
use crate::optimizer::Loadout;

pub use loadout_event::loadout_event;

/// A fitting tool that can import an encoded loadout event.
pub trait ExportService: Send + Sync {
    /// Registry key, lowercase.
    fn name(&self) -> &str;

    fn link(&self, payload: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Coriolis;

impl ExportService for Coriolis {
    fn name(&self) -> &str {
        "coriolis"
    }

    fn link(&self, payload: &str) -> String {
        format!("https://coriolis.io/import?data={payload}")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Edsy;

impl ExportService for Edsy {
    fn name(&self) -> &str {
        "edsy"
    }

    fn link(&self, payload: &str) -> String {
        format!("https://edsy.org/#/I={payload}")
    }
}

/// Gzip + URL-safe base64 of the event JSON, with `=` escaped for use in a query string.
pub fn encode_event(event: &Value) -> Result<String> {
    let json = serde_json::to_vec(event).map_err(|err| Error::Export(err.to_string()))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|err| Error::Export(err.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|err| Error::Export(err.to_string()))?;
    Ok(URL_SAFE.encode(compressed).replace('=', "%3D"))
}

pub struct ExportRegistry {
    services: BTreeMap<String, Box<dyn ExportService>>,
}

impl Default for ExportRegistry {
    /// Coriolis and EDSY.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Coriolis);
        registry.register(Edsy);
        registry
    }
}

impl std::fmt::Debug for ExportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportRegistry")
            .field("services", &self.names())
            .finish()
    }
}

impl ExportRegistry {
    pub fn empty() -> Self {
        Self {
            services: BTreeMap::new(),
        }
    }

    /// Add or replace a service under its name.
    pub fn register(&mut self, service: impl ExportService + 'static) {
        self.services
            .insert(service.name().to_ascii_lowercase(), Box::new(service));
    }

    pub fn names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    pub fn produce_link(&self, loadout: &Loadout, service: &str) -> Result<String> {
        let exporter = self
            .services
            .get(&service.to_ascii_lowercase())
            .ok_or_else(|| ConfigError::UnknownExportService(service.to_string()))?;
        let payload = encode_event(&loadout_event(loadout)?)?;
        Ok(exporter.link(&payload))
    }
}
