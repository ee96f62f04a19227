use crate::cursor::TokenCursor;
use crate::lexer::Token;

/// How a delimited block is introduced in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHeader<'h> {
    /// `enum <name> {`
    Enum { name: &'h str },
    /// `[<element_type>] <name>[ ... ] = {`
    Array {
        element_type: Option<&'h str>,
        name: &'h str,
    },
}

impl BlockHeader<'_> {
    /// If the header starts at `start`, return the index of its opening brace.
    fn match_at(&self, tokens: &[Token], start: usize) -> Option<usize> {
        let mut cursor = TokenCursor::at(tokens, start);
        match *self {
            BlockHeader::Enum { name } => {
                cursor.keyword("enum")?;
                cursor.keyword(name)?;
            }
            BlockHeader::Array { element_type, name } => {
                if let Some(ty) = element_type {
                    cursor.keyword(ty)?;
                }
                cursor.keyword(name)?;
                cursor.eat(&Token::LBracket)?;
                cursor.skip_past(&Token::RBracket)?;
                cursor.eat(&Token::Eq)?;
            }
        }
        let open = cursor.position();
        cursor.eat(&Token::LBrace)?;
        Some(open)
    }
}

/// Body of a located block: the tokens strictly inside its outer braces.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    body: &'a [Token],
}

impl<'a> Block<'a> {
    pub fn tokens(&self) -> &'a [Token] {
        self.body
    }

    /// Brace-delimited row literals at the top level of the body, without
    /// their own braces. Tokens between rows are ignored.
    pub fn rows(&self) -> Vec<&'a [Token]> {
        let mut rows = Vec::new();
        let mut i = 0;
        while i < self.body.len() {
            if self.body[i] == Token::LBrace {
                let Some(close) = matching_brace(self.body, i) else {
                    break;
                };
                rows.push(&self.body[i + 1..close]);
                i = close + 1;
            } else {
                i += 1;
            }
        }
        rows
    }

    /// Comma separated elements at the top level of the body.
    pub fn elements(&self) -> Vec<&'a [Token]> {
        split_fields(self.body)
    }
}

/// Find the first block introduced by `header`.
///
/// Returns `None` when no header matches or when the block is never closed.
pub fn locate<'a>(tokens: &'a [Token], header: &BlockHeader<'_>) -> Option<Block<'a>> {
    (0..tokens.len()).find_map(|start| {
        let open = header.match_at(tokens, start)?;
        let close = matching_brace(tokens, open)?;
        Some(Block {
            body: &tokens[open + 1..close],
        })
    })
}

/// Split at commas that are not nested in braces, brackets or parentheses.
///
/// A trailing comma does not produce an empty last field, but an empty field
/// between two commas is kept.
pub fn split_fields(tokens: &[Token]) -> Vec<&[Token]> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LBrace | Token::LBracket | Token::LParen => depth += 1,
            Token::RBrace | Token::RBracket | Token::RParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                fields.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < tokens.len() {
        fields.push(&tokens[start..]);
    }
    fields
}

fn matching_brace(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LBrace => depth += 1,
            Token::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
