use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};
use source_scan::{split_fields, tokenize, Token};
use tracing::debug;

use super::{BlockId, BlockKind};
use crate::error::Result;

/// Prefix shared by all block flag names.
pub const FLAG_PREFIX: &str = "BLF_";

/// Flag marking a block that fills its whole cell.
pub const WHOLE_FLAG: &str = "BLF_WHOLE";

/// 24-bit RGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const MAX: u32 = 0xff_ffff;

    /// `None` if the value does not fit in 24 bits.
    pub fn from_rgb(rgb: u32) -> Option<Self> {
        (rgb <= Self::MAX).then_some(Self(rgb))
    }

    pub fn rgb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Visual properties of one block id.
///
/// Fields are declared in key order so serialized objects come out sorted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub alpha: f64,
    pub color: Color,
    pub is_full_block: bool,
}

/// Property records keyed by block id.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    records: HashMap<BlockId, PropertyRecord>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A later record for the same id replaces the earlier one.
    pub fn insert(&mut self, id: BlockId, record: PropertyRecord) {
        self.records.insert(id, record);
    }

    pub fn get(&self, id: BlockId) -> Option<&PropertyRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse the `gBlockDefinitions` array.
///
/// Rows that do not have the expected shape are skipped. Only a missing
/// array is an error.
pub fn parse_properties(source: &str) -> Result<PropertyTable> {
    let tokens = tokenize(source);
    let block = BlockKind::BlockDefinitions.locate(&tokens)?;

    let mut table = PropertyTable::new();
    let mut matched = 0usize;
    for row in block.rows() {
        match recognize_row(row) {
            Some((id, record)) => {
                matched += 1;
                table.insert(id, record);
            }
            None => debug!("skipping block definition row that does not match"),
        }
    }

    debug!(rows = matched, ids = table.len(), "parsed block definitions");
    Ok(table)
}

/// Row shape:
/// `/* id */ <anything>, 0xRRGGBB, <alpha>f, <ignored fields...>, BLF_A | BLF_B`
///
/// The color is the first hex field directly followed by an `f`-suffixed
/// float field; the flags are the whole last field.
fn recognize_row(row: &[Token]) -> Option<(BlockId, PropertyRecord)> {
    let id = match row.first()? {
        Token::IdMarker(id) => BlockId::try_from(*id).ok()?,
        _ => return None,
    };

    let fields = split_fields(row);
    let (flags, head) = fields.split_last()?;
    let (color, alpha) = head.windows(2).skip(1).find_map(|pair| match pair {
        [[Token::Hex(rgb)], [Token::FloatF(alpha)]] => Some((*rgb, *alpha)),
        _ => None,
    })?;
    let color = Color::from_rgb(u32::try_from(color).ok()?)?;
    let is_full_block = flag_names(flags)?.contains(&WHOLE_FLAG);

    Some((
        id,
        PropertyRecord {
            color,
            alpha,
            is_full_block,
        },
    ))
}

/// Flag names of a field like `BLF_A | BLF_B`, or `None` if the field holds
/// anything else.
fn flag_names(field: &[Token]) -> Option<Vec<&str>> {
    let mut names = Vec::new();
    for token in field {
        match token {
            Token::Pipe => {}
            Token::Ident(name) if name.starts_with(FLAG_PREFIX) => names.push(name.as_str()),
            _ => return None,
        }
    }
    (!names.is_empty()).then_some(names)
}
