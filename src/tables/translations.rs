use source_scan::{split_fields, tokenize, Token};
use tracing::debug;

use super::{literal_id, string_field, BlockId, BlockKind, ConstantTable};
use crate::error::Result;

/// Block id as written in a translation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdRef {
    Literal(BlockId),
    Symbol(String),
}

impl IdRef {
    pub fn resolve(&self, constants: &ConstantTable) -> Option<BlockId> {
        match self {
            IdRef::Literal(id) => Some(*id),
            IdRef::Symbol(name) => constants.get(name),
        }
    }
}

/// One row of `BlockTranslations` before symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRow {
    pub id: IdRef,
    pub name: String,
}

/// A translation whose id is known to be numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTranslation {
    pub id: BlockId,
    pub name: String,
}

/// Parse the `BlockTranslations` array into unresolved rows, in source order.
pub fn parse_translation_rows(source: &str) -> Result<Vec<TranslationRow>> {
    let tokens = tokenize(source);
    let block = BlockKind::Translations.locate(&tokens)?;

    let rows: Vec<_> = block.rows().into_iter().filter_map(recognize_row).collect();
    debug!(rows = rows.len(), "parsed block translations");
    Ok(rows)
}

/// Resolve symbolic ids against `constants`, dropping rows that name an
/// unknown symbol. Duplicates are kept.
pub fn resolve_translations(
    rows: &[TranslationRow],
    constants: &ConstantTable,
) -> Vec<ResolvedTranslation> {
    rows.iter()
        .filter_map(|row| match row.id.resolve(constants) {
            Some(id) => Some(ResolvedTranslation {
                id,
                name: row.name.clone(),
            }),
            None => {
                debug!(name = %row.name, id = ?row.id, "dropping translation with unresolved id");
                None
            }
        })
        .collect()
}

/// Row shape: `<int>, <id or SYMBOL>, <ignored>..., "name", ...`
///
/// The name is the first field after the id that is exactly one string
/// literal, with at least one field in between.
fn recognize_row(row: &[Token]) -> Option<TranslationRow> {
    let fields = split_fields(row);
    literal_id(fields.first()?)?;

    let id = match fields.get(1)? {
        [Token::Ident(name)] => IdRef::Symbol(name.clone()),
        field => IdRef::Literal(literal_id(field)?),
    };
    let name = fields.iter().skip(3).find_map(|f| string_field(f))?;

    Some(TranslationRow {
        id,
        name: name.trim().to_string(),
    })
}
