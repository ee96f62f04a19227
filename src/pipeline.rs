use source_scan::count_id_markers;
use tracing::info;

use crate::config::SourceTexts;
use crate::error::{Error, Result};
use crate::merge::{merge, FinalMap, MergeConfig, MergeStats};
use crate::tables::{
    parse_constants, parse_properties, parse_tile_tables, parse_translation_rows,
    resolve_translations, BlockKind,
};

/// Diagnostic counts for one run. Not part of the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// `/* id */` annotations seen in the block definitions source.
    pub verification_markers: usize,
    pub constants: usize,
    pub property_records: usize,
    pub translation_rows: usize,
    pub resolved_translations: usize,
    pub tile_rows: usize,
    pub tile_names: usize,
    pub alias_rows: usize,
    pub resolved_aliases: usize,
    pub final_entries: usize,
}

impl PipelineReport {
    pub fn log(&self) {
        info!(
            "verification: found {} '/* id */' markers in block definitions",
            self.verification_markers
        );
        info!("parsed {} block constants", self.constants);
        info!("parsed {} block property records", self.property_records);
        info!(
            "parsed {} translation rows ({} with a known id)",
            self.translation_rows, self.resolved_translations
        );
        info!("parsed {} tile rows ({} file names)", self.tile_rows, self.tile_names);
        info!(
            "parsed {} tile alias rows ({} resolved)",
            self.alias_rows, self.resolved_aliases
        );
        info!("built {} unique block mappings", self.final_entries);
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub map: FinalMap,
    pub report: PipelineReport,
    pub merge_stats: MergeStats,
}

impl PipelineOutput {
    pub fn log(&self) {
        self.report.log();
        let tiles = &self.merge_stats.tiles;
        info!(
            "skipped {} reserved tile names and {} names without properties",
            tiles.reserved,
            tiles.missing_properties + self.merge_stats.translations.missing_properties
        );
    }
}

/// The full extraction run: four parsers feeding the merge engine.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: MergeConfig,
}

impl Pipeline {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Parse every source and merge the results.
    ///
    /// All required blocks are looked up before failing, so the error names
    /// every one that is missing.
    pub fn run(&self, sources: &SourceTexts) -> Result<PipelineOutput> {
        let verification_markers = count_id_markers(&sources.block_info_source);
        let constants = parse_constants(&sources.block_info_header);

        let mut missing = Vec::new();
        let properties = required(parse_properties(&sources.block_info_source), &mut missing)?;
        let translation_rows =
            required(parse_translation_rows(&sources.translations), &mut missing)?;
        let tiles = required(parse_tile_tables(&sources.tiles), &mut missing)?;

        let (Some(properties), Some(translation_rows), Some(tiles)) =
            (properties, translation_rows, tiles)
        else {
            return Err(Error::MissingRequiredBlocks { blocks: missing });
        };

        let translations = resolve_translations(&translation_rows, &constants);
        let (map, merge_stats) = merge(&self.config, &properties, &translations, &tiles.names);

        let report = PipelineReport {
            verification_markers,
            constants: constants.len(),
            property_records: properties.len(),
            translation_rows: translation_rows.len(),
            resolved_translations: translations.len(),
            tile_rows: tiles.tile_rows,
            tile_names: tiles.names.len(),
            alias_rows: tiles.aliases.len(),
            resolved_aliases: tiles.resolved_aliases,
            final_entries: map.len(),
        };

        Ok(PipelineOutput {
            map,
            report,
            merge_stats,
        })
    }
}

/// Record a missing block instead of failing right away.
fn required<T>(result: Result<T>, missing: &mut Vec<BlockKind>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::MissingBlock(kind)) => {
            missing.push(kind);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_INFO_H: &str = r#"
        enum block_types {
            BLOCK_AIR = 0,
            BLOCK_STONE = 1,
            BLOCK_GRASS_BLOCK = 2,
            BLOCK_GLASS = 20,
        };
    "#;

    const BLOCK_INFO_CPP: &str = r#"
        BlockDefinition gBlockDefinitions[NUM_BLOCKS_DEFINED] = {
            // name, read_color, read_alpha, color, alpha, ..., flags
            { /* 0 */ "Air", 0x000000, 0.000f, 0x000000, 0.000f, 0xff00ff, 0.0f, 0, 0, BLF_NONE },
            { /* 1 */ "Stone", 0x7f7f7f, 1.000f, 0x7f7f7f, 1.000f, 0xff00ff, 1.0f, 1, 0, BLF_WHOLE|BLF_CUTOUTS },
            { /* 2 */ "Grass Block", 0x5f9f35, 1.000f, 0x5f9f35, 1.000f, 0xff00ff, 1.0f, 3, 0, BLF_WHOLE },
            { /* 20 */ "Glass", 0xc0f6fe, 0.500f, 0xc0f6fe, 0.500f, 0xff00ff, 0.5f, 49, 0, BLF_WHOLE|BLF_TRANSPARENT },
            { /* 21 */ "Broken", 0xzz, 1.0f, BLF_WHOLE },
        };
    "#;

    const NBT_CPP: &str = r#"
        BlockTranslator BlockTranslations[] = {
            { 0, BLOCK_AIR, 0, "air", NO_PROP },
            { 0, BLOCK_STONE, 0, "stone", NO_PROP },
            { 0, BLOCK_GRASS_BLOCK, 0, "grass_block", SNOWY_PROP },
            { 0, 20, 0, "glass", NO_PROP },
            { 0, BLOCK_UNKNOWN, 0, "mystery", NO_PROP },
            { 0, 99, 0, "no_properties", NO_PROP },
        };
    "#;

    const TILES_H: &str = r#"
        static struct { int a; } gTilesTable[TOTAL_TILES] = {
            { 0, 0, 2, SWATCH_REPEAT_ALL, L"grass_block_top", L"grass_top", 0 },
            { 1, 0, 1, SWATCH_REPEAT_ALL, L"stone", L"", 0 },
            { 2, 0, 20, SWATCH_REPEAT_ALL, L"glass", L"", 0 },
            { 3, 0, 1, 0, L"MW_stone_overlay", L"", 0 },
        };
        static struct { const wchar_t *a; const wchar_t *b; } gTilesAlternates[] = {
            { L"rock", L"stone" },
            { L"MWO_rock", L"stone" },
        };
    "#;

    fn sources() -> SourceTexts {
        SourceTexts {
            block_info_header: BLOCK_INFO_H.into(),
            block_info_source: BLOCK_INFO_CPP.into(),
            translations: NBT_CPP.into(),
            tiles: TILES_H.into(),
        }
    }

    #[test]
    fn test_full_run() {
        let output = Pipeline::default().run(&sources()).unwrap();
        let map = &output.map;

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(
            keys,
            vec![
                "glass",
                "grass_block_top",
                "grass_top",
                "minecraft:air",
                "minecraft:glass",
                "minecraft:grass_block",
                "minecraft:grass_block_top",
                "minecraft:grass_top",
                "minecraft:rock",
                "minecraft:stone",
                "rock",
                "stone",
            ]
        );
        assert_eq!(map.get("rock"), map.get("minecraft:stone"));
        assert_eq!(map.get("minecraft:glass").unwrap().alpha, 0.5);
        assert!(!map.get("minecraft:air").unwrap().is_full_block);

        let report = output.report;
        assert_eq!(report.verification_markers, 5);
        assert_eq!(report.constants, 4);
        assert_eq!(report.property_records, 4);
        assert_eq!(report.translation_rows, 6);
        assert_eq!(report.resolved_translations, 5);
        assert_eq!(report.tile_rows, 4);
        assert_eq!(report.alias_rows, 2);
        assert_eq!(report.resolved_aliases, 2);
        assert_eq!(report.final_entries, 12);

        let stats = output.merge_stats;
        assert_eq!(stats.translations.inserted, 4);
        assert_eq!(stats.translations.missing_properties, 1);
        assert_eq!(stats.tiles.reserved, 2);
    }

    #[test]
    fn test_end_to_end_single_block() {
        let sources = SourceTexts {
            block_info_header: "enum block_types { BLOCK_STONE = 1 };".into(),
            block_info_source: r#"BlockDefinition gBlockDefinitions[1] = {
                { /*1*/ "Stone", 0x7f7f7f, 1.0f, 0, BLF_WHOLE }
            };"#
            .into(),
            translations: r#"BlockTranslator BlockTranslations[] = {
                { 0, BLOCK_STONE, x, "stone" }
            };"#
            .into(),
            tiles: "gTilesTable[1] = { };".into(),
        };
        let output = Pipeline::default().run(&sources).unwrap();
        let json = String::from_utf8(output.map.to_json().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "minecraft:stone": { "color": "#7f7f7f", "alpha": 1.0, "is_full_block": true }
            })
        );
    }

    #[test]
    fn test_configured_namespace() {
        let config = MergeConfig::default().namespace("mc");
        let output = Pipeline::new(config).run(&sources()).unwrap();
        assert!(output.map.contains_key("mc:stone"));
        assert!(output.map.contains_key("stone"));
        assert!(!output.map.contains_key("minecraft:stone"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let pipeline = Pipeline::default();
        let first = pipeline.run(&sources()).unwrap().map.to_json().unwrap();
        let second = pipeline.run(&sources()).unwrap().map.to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reports_every_missing_block() {
        let sources = SourceTexts {
            block_info_header: String::new(),
            block_info_source: "/* 1 */".into(),
            translations: NBT_CPP.into(),
            tiles: "gTilesAlternates[] = { };".into(),
        };
        let err = Pipeline::default().run(&sources).unwrap_err();
        match err {
            Error::MissingRequiredBlocks { blocks } => {
                assert_eq!(blocks, vec![BlockKind::BlockDefinitions, BlockKind::TilesTable]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_constants_drop_symbolic_rows() {
        let mut sources = sources();
        sources.block_info_header.clear();
        let output = Pipeline::default().run(&sources).unwrap();

        assert!(!output.map.contains_key("minecraft:grass_block"));
        assert!(output.map.contains_key("minecraft:glass"));
        assert!(output.map.contains_key("minecraft:stone"));
        assert_eq!(output.report.resolved_translations, 2);
    }
}
