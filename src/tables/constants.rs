use std::collections::HashMap;

use source_scan::{tokenize, Token, TokenCursor};
use tracing::{debug, warn};

use super::{BlockId, BlockKind};

/// Symbolic block constants from `enum block_types`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable {
    values: HashMap<String, BlockId>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later definitions of the same name replace earlier ones.
    pub fn insert(&mut self, name: impl Into<String>, value: BlockId) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<BlockId> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse every `NAME = <integer>` element of the `block_types` enum.
///
/// Elements without an explicit literal value are skipped. A source without
/// the enum yields an empty table; references to its names then simply fail
/// to resolve later on.
pub fn parse_constants(source: &str) -> ConstantTable {
    let tokens = tokenize(source);
    let mut table = ConstantTable::new();

    let block = match BlockKind::BlockTypes.locate(&tokens) {
        Ok(block) => block,
        Err(e) => {
            warn!("{e}, symbolic block ids will not resolve");
            return table;
        }
    };

    for element in block.elements() {
        if let Some((name, value)) = assignment(element) {
            table.insert(name, value);
        }
    }

    debug!(constants = table.len(), "parsed block constants");
    table
}

/// First `name = integer` run inside an enum element.
fn assignment(element: &[Token]) -> Option<(&str, BlockId)> {
    (0..element.len()).find_map(|start| {
        let mut cursor = TokenCursor::at(element, start);
        let name = cursor.ident()?;
        cursor.eat(&Token::Eq)?;
        let value = BlockId::try_from(cursor.integer()?).ok()?;
        Some((name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_constants() {
        let source = r#"
            #define SOMETHING 4
            enum block_types {
                BLOCK_AIR = 0,
                BLOCK_STONE = 1,
                BLOCK_GRASS_BLOCK = 0x02,
                BLOCK_IMPLICIT,
                BLOCK_DERIVED = BLOCK_STONE + 1,
                BLOCK_LAST = 250
            };
        "#;
        let table = parse_constants(source);

        assert_eq!(table.len(), 4);
        assert_eq!(table.get("BLOCK_AIR"), Some(0));
        assert_eq!(table.get("BLOCK_STONE"), Some(1));
        assert_eq!(table.get("BLOCK_GRASS_BLOCK"), Some(2));
        assert_eq!(table.get("BLOCK_LAST"), Some(250));
        assert_eq!(table.get("BLOCK_IMPLICIT"), None);
        assert_eq!(table.get("BLOCK_DERIVED"), None);
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let table = parse_constants("enum block_types { BLOCK_X = 3, BLOCK_X = 7 };");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("BLOCK_X"), Some(7));
    }

    #[test]
    fn test_missing_enum_is_empty() {
        let table = parse_constants("enum other_types { BLOCK_X = 3 };");
        assert!(table.is_empty());
    }
}
