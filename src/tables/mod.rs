//! Intermediate tables extracted from the Mineways sources.
//!
//! Each submodule owns one table type and the parser that builds it from
//! source text. Parsers are pure functions; nothing here keeps global state.

pub mod constants;
pub mod properties;
pub mod tiles;
pub mod translations;

use std::fmt;

use source_scan::{locate, Block, BlockHeader, Token};

use crate::error::{Error, Result};

pub use constants::{parse_constants, ConstantTable};
pub use properties::{parse_properties, Color, PropertyRecord, PropertyTable};
pub use tiles::{
    parse_aliases, parse_tile_names, parse_tile_tables, AliasTable, TileNameTable, TileTables,
};
pub use translations::{
    parse_translation_rows, resolve_translations, IdRef, ResolvedTranslation, TranslationRow,
};

/// Numeric block id as used by the Mineways tables.
pub type BlockId = u32;

/// The delimited source blocks the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `enum block_types { ... }` in blockInfo.h
    BlockTypes,
    /// `BlockDefinition gBlockDefinitions[] = { ... }` in blockInfo.cpp
    BlockDefinitions,
    /// `BlockTranslator BlockTranslations[] = { ... }` in nbt.cpp
    Translations,
    /// `gTilesTable[] = { ... }` in tiles.h
    TilesTable,
    /// `gTilesAlternates[] = { ... }` in tiles.h
    TilesAlternates,
}

impl BlockKind {
    pub fn header(self) -> BlockHeader<'static> {
        match self {
            BlockKind::BlockTypes => BlockHeader::Enum { name: "block_types" },
            BlockKind::BlockDefinitions => BlockHeader::Array {
                element_type: Some("BlockDefinition"),
                name: "gBlockDefinitions",
            },
            BlockKind::Translations => BlockHeader::Array {
                element_type: Some("BlockTranslator"),
                name: "BlockTranslations",
            },
            BlockKind::TilesTable => BlockHeader::Array {
                element_type: None,
                name: "gTilesTable",
            },
            BlockKind::TilesAlternates => BlockHeader::Array {
                element_type: None,
                name: "gTilesAlternates",
            },
        }
    }

    /// A missing required block aborts the run.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            BlockKind::BlockDefinitions | BlockKind::Translations | BlockKind::TilesTable
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::BlockTypes => "block_types",
            BlockKind::BlockDefinitions => "gBlockDefinitions",
            BlockKind::Translations => "BlockTranslations",
            BlockKind::TilesTable => "gTilesTable",
            BlockKind::TilesAlternates => "gTilesAlternates",
        }
    }

    pub(crate) fn locate(self, tokens: &[Token]) -> Result<Block<'_>> {
        locate(tokens, &self.header()).ok_or(Error::MissingBlock(self))
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Id written as a literal in a single-token field, if it fits a [`BlockId`].
pub(crate) fn literal_id(field: &[Token]) -> Option<BlockId> {
    match field {
        [token] => BlockId::try_from(token.as_integer()?).ok(),
        _ => None,
    }
}

/// Contents of a field consisting of exactly one string literal.
pub(crate) fn string_field(field: &[Token]) -> Option<&str> {
    match field {
        [token] => token.as_str_literal(),
        _ => None,
    }
}
