use indexmap::IndexMap;
use source_scan::{split_fields, tokenize, Token};
use tracing::{debug, warn};

use super::{literal_id, string_field, BlockId, BlockKind};
use crate::error::Result;

/// Texture file names mapped to block ids, in first-registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileNameTable {
    names: IndexMap<String, BlockId>,
}

impl TileNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` for `id`. Re-registering a name keeps its original
    /// position and replaces the id.
    pub fn insert(&mut self, name: impl Into<String>, id: BlockId) {
        self.names.insert(name.into(), id);
    }

    pub fn get(&self, name: &str) -> Option<BlockId> {
        self.names.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, BlockId)> {
        self.names.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Give every alias the id of its standard name. Aliases are applied in
    /// order, so an alias may name an earlier alias as its standard. Aliases
    /// whose standard name is unknown are dropped.
    ///
    /// Returns the number of aliases that resolved.
    pub fn apply_aliases(&mut self, aliases: &AliasTable) -> usize {
        let mut resolved = 0;
        for (alias, standard) in aliases.iter() {
            match self.get(standard) {
                Some(id) => {
                    self.insert(alias, id);
                    resolved += 1;
                }
                None => debug!(alias, standard, "dropping alias for unknown tile name"),
            }
        }
        resolved
    }
}

/// `(alias, standard)` file name pairs from `gTilesAlternates`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    pairs: Vec<(String, String)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, alias: impl Into<String>, standard: impl Into<String>) {
        self.pairs.push((alias.into(), standard.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(a, s)| (a.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Both tables read from tiles.h, with aliases already applied to `names`.
#[derive(Debug, Clone, Default)]
pub struct TileTables {
    pub names: TileNameTable,
    pub aliases: AliasTable,
    /// Tile rows that matched the expected shape.
    pub tile_rows: usize,
    /// Aliases whose standard name was found.
    pub resolved_aliases: usize,
}

/// Parse `gTilesTable` and `gTilesAlternates` from the same source and
/// expand aliases.
///
/// The tile table is required. A missing alias table only logs a warning.
pub fn parse_tile_tables(source: &str) -> Result<TileTables> {
    let tokens = tokenize(source);
    let (mut names, tile_rows) = tile_names_from(&tokens)?;

    let aliases = match aliases_from(&tokens) {
        Ok(aliases) => aliases,
        Err(e) => {
            warn!("{e}, continuing without tile aliases");
            AliasTable::new()
        }
    };
    let resolved_aliases = names.apply_aliases(&aliases);

    Ok(TileTables {
        names,
        aliases,
        tile_rows,
        resolved_aliases,
    })
}

/// Parse `gTilesTable` alone.
pub fn parse_tile_names(source: &str) -> Result<TileNameTable> {
    tile_names_from(&tokenize(source)).map(|(names, _)| names)
}

/// Parse `gTilesAlternates` alone.
pub fn parse_aliases(source: &str) -> Result<AliasTable> {
    aliases_from(&tokenize(source))
}

fn tile_names_from(tokens: &[Token]) -> Result<(TileNameTable, usize)> {
    let block = BlockKind::TilesTable.locate(tokens)?;

    let mut names = TileNameTable::new();
    let mut rows = 0;
    for (id, primary, alternate) in block.rows().into_iter().filter_map(recognize_tile_row) {
        rows += 1;
        for name in [primary, alternate] {
            let name = name.trim();
            if !name.is_empty() {
                names.insert(name, id);
            }
        }
    }

    debug!(rows, names = names.len(), "parsed tile table");
    Ok((names, rows))
}

fn aliases_from(tokens: &[Token]) -> Result<AliasTable> {
    let block = BlockKind::TilesAlternates.locate(tokens)?;

    let mut aliases = AliasTable::new();
    for (alias, standard) in block.rows().into_iter().filter_map(recognize_alias_row) {
        aliases.push(alias.trim(), standard.trim());
    }

    debug!(aliases = aliases.len(), "parsed tile aliases");
    Ok(aliases)
}

/// Row shape: `<int>, <int>, <id>, <ignored>, "primary", "alternate", ...`
fn recognize_tile_row(row: &[Token]) -> Option<(BlockId, &str, &str)> {
    let fields = split_fields(row);
    if fields.len() < 6 || fields[3].is_empty() {
        return None;
    }
    literal_id(fields[0])?;
    literal_id(fields[1])?;
    let id = literal_id(fields[2])?;
    let primary = string_field(fields[4])?;
    let alternate = string_field(fields[5])?;
    Some((id, primary, alternate))
}

/// Row shape: `"alias", "standard"`
fn recognize_alias_row(row: &[Token]) -> Option<(&str, &str)> {
    match split_fields(row).as_slice() {
        [alias, standard] => Some((string_field(*alias)?, string_field(*standard)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const TILES_H: &str = r#"
        static struct {
            int txrX; int txrY; int typeForMtl;
            unsigned int flags;
            const wchar_t *filename; const wchar_t *altFilename;
        } gTilesTable[TOTAL_TILES] = {
            {  0,  0,   1, SWATCH_REPEAT_ALL, L"stone", L"", 0 },
            {  1,  0,   2, SWATCH_REPEAT_ALL, L"grass_block_top", L"grass_top", 0 },
            {  2,  0,   9, 0, L"MW_water_overlay", L"", 0 },
            {  3,  0, BLOCK_X, 0, L"symbolic_id", L"", 0 },
            {  4,  0,   3, 0, L"  dirt  ", L" ", 0 },
        };

        static struct {
            const wchar_t *alternateFilename;
            const wchar_t *filename;
        } gTilesAlternates[] = {
            { L"rock", L"stone" },
            { L"smooth_rock", L"rock" },
            { L"ghost", L"not_a_tile" },
            { L"broken" },
        };
    "#;

    #[test]
    fn test_parse_tile_names() {
        let names = parse_tile_names(TILES_H).unwrap();

        let entries: Vec<_> = names.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("stone", 1),
                ("grass_block_top", 2),
                ("grass_top", 2),
                ("MW_water_overlay", 9),
                ("dirt", 3),
            ]
        );
    }

    #[test]
    fn test_comments_inside_rows() {
        let source = r#"
            gTilesTable[TOTAL_TILES] = {
                { 0, 0, 1 /* stone */, SWATCH_REPEAT_ALL, /* top */ L"stone", L"" /* none */, 0 },
                { 1, 0, 2, /* flags */ 0, L"dirt", L"", 0 },
            };
            gTilesAlternates[] = {
                { L"rock" /* old name */, L"stone" },
            };
        "#;
        let tables = parse_tile_tables(source).unwrap();

        assert_eq!(tables.tile_rows, 2);
        assert_eq!(tables.names.get("stone"), Some(1));
        assert_eq!(tables.names.get("dirt"), Some(2));
        assert_eq!(tables.names.get("rock"), Some(1));
    }

    #[test]
    fn test_parse_aliases() {
        let aliases = parse_aliases(TILES_H).unwrap();
        let pairs: Vec<_> = aliases.iter().collect();
        assert_eq!(
            pairs,
            vec![("rock", "stone"), ("smooth_rock", "rock"), ("ghost", "not_a_tile")]
        );
    }

    #[test]
    fn test_alias_expansion() {
        let tables = parse_tile_tables(TILES_H).unwrap();

        assert_eq!(tables.tile_rows, 4);
        assert_eq!(tables.aliases.len(), 3);
        assert_eq!(tables.resolved_aliases, 2);
        assert_eq!(tables.names.get("rock"), Some(1));
        assert_eq!(tables.names.get("smooth_rock"), Some(1));
        assert_eq!(tables.names.get("stone"), Some(1));
        assert_eq!(tables.names.get("ghost"), None);
    }

    #[test]
    fn test_reregistered_name_keeps_position() {
        let mut names = TileNameTable::new();
        names.insert("a", 1);
        names.insert("b", 2);
        names.insert("a", 3);
        let entries: Vec<_> = names.iter().collect();
        assert_eq!(entries, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_missing_alias_table_is_not_fatal() {
        let source = r#"gTilesTable[] = { { 0, 0, 1, 0, L"stone", L"", 0 } };"#;
        let tables = parse_tile_tables(source).unwrap();
        assert!(tables.aliases.is_empty());
        assert_eq!(tables.names.get("stone"), Some(1));
    }

    #[test]
    fn test_missing_tile_table_is_error() {
        let source = r#"gTilesAlternates[] = { { L"rock", L"stone" } };"#;
        let err = parse_tile_tables(source).unwrap_err();
        assert!(matches!(err, Error::MissingBlock(BlockKind::TilesTable)));
    }
}
