//! Merging translation names and tile names into one identifier map.
//!
//! Translations are ingested before tiles and the first writer of a key wins,
//! so a block reachable through both naming schemes keeps the properties of
//! its translation entry.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::tables::{PropertyRecord, PropertyTable, ResolvedTranslation, TileNameTable};

/// Merge settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Namespace prepended as `<namespace>:<name>`.
    pub namespace: String,
    /// Tile names with any of these prefixes are internal and never exported.
    pub reserved_prefixes: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            namespace: "minecraft".into(),
            reserved_prefixes: vec!["MW_".into(), "MWO_".into()],
        }
    }
}

impl MergeConfig {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reserved_prefixes.push(prefix.into());
        self
    }

    pub fn namespaced(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, name)
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Final identifier to properties map, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FinalMap {
    entries: BTreeMap<String, PropertyRecord>,
}

impl FinalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, key: String, record: PropertyRecord) -> bool {
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyRecord> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON with four-space indentation and sorted keys.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| Error::Json(e.to_string()))?;
        writer.flush().map_err(|e| Error::Io(e.to_string()))
    }

    /// [`FinalMap::write_json`] into memory.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_json(&mut out)?;
        Ok(out)
    }
}

/// Per-pass merge counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub inserted: usize,
    /// Entries whose id has no property record.
    pub missing_properties: usize,
    /// Keys that an earlier writer already claimed.
    pub already_present: usize,
    /// Tile names dropped for a reserved prefix.
    pub reserved: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub translations: PassStats,
    pub tiles: PassStats,
}

/// Builds a [`FinalMap`] from the intermediate tables.
pub struct MergeEngine<'a> {
    config: &'a MergeConfig,
    properties: &'a PropertyTable,
    map: FinalMap,
    stats: MergeStats,
}

impl<'a> MergeEngine<'a> {
    pub fn new(config: &'a MergeConfig, properties: &'a PropertyTable) -> Self {
        Self {
            config,
            properties,
            map: FinalMap::new(),
            stats: MergeStats::default(),
        }
    }

    /// Pass 1: `<namespace>:<canonical name>` for every translation whose id
    /// has properties.
    pub fn add_translations(&mut self, translations: &[ResolvedTranslation]) {
        let mut stats = PassStats::default();
        for translation in translations {
            let Some(record) = self.properties.get(translation.id) else {
                stats.missing_properties += 1;
                continue;
            };
            let key = self.config.namespaced(&translation.name);
            if self.map.insert_if_absent(key, *record) {
                stats.inserted += 1;
            } else {
                stats.already_present += 1;
            }
        }
        debug!(?stats, "merged translations");
        self.stats.translations = stats;
    }

    /// Pass 2: both `<namespace>:<file>` and bare `<file>` for every
    /// non-reserved tile name whose id has properties.
    pub fn add_tiles(&mut self, tiles: &TileNameTable) {
        let mut stats = PassStats::default();
        for (name, id) in tiles.iter() {
            if self.config.is_reserved(name) {
                stats.reserved += 1;
                continue;
            }
            let Some(record) = self.properties.get(id) else {
                stats.missing_properties += 1;
                continue;
            };
            for key in [self.config.namespaced(name), name.to_string()] {
                if self.map.insert_if_absent(key, *record) {
                    stats.inserted += 1;
                } else {
                    stats.already_present += 1;
                }
            }
        }
        debug!(?stats, "merged tile names");
        self.stats.tiles = stats;
    }

    pub fn finish(self) -> (FinalMap, MergeStats) {
        (self.map, self.stats)
    }
}

/// Run both passes in their fixed order.
pub fn merge(
    config: &MergeConfig,
    properties: &PropertyTable,
    translations: &[ResolvedTranslation],
    tiles: &TileNameTable,
) -> (FinalMap, MergeStats) {
    let mut engine = MergeEngine::new(config, properties);
    engine.add_translations(translations);
    engine.add_tiles(tiles);
    engine.finish()
}
