//! Block Mappings
//!
//! Extracts block colors, opacity and solidity from the data tables in the
//! Mineways C++ sources and merges them into one map keyed by Minecraft
//! block and texture names.

pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod tables;
pub use source_scan as scan;

pub use config::{SourcePaths, SourceTexts};
pub use error::{Error, Result};
pub use merge::{merge, FinalMap, MergeConfig, MergeEngine, MergeStats, PassStats};
pub use pipeline::{Pipeline, PipelineOutput, PipelineReport};
pub use tables::{
    AliasTable, BlockId, BlockKind, Color, ConstantTable, PropertyRecord, PropertyTable,
    ResolvedTranslation, TileNameTable, TranslationRow,
};
