use crate::lexer::Token;

/// Forward-only reader over a token slice.
///
/// Every accessor returns `Option` so recognizers can bail out of a
/// non-matching shape with `?`.
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn at(tokens: &'a [Token], pos: usize) -> Self {
        Self { tokens, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Consume the next token if it equals `expected`.
    pub fn eat(&mut self, expected: &Token) -> Option<()> {
        if self.peek()? == expected {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    /// Consume an identifier with exactly this spelling.
    pub fn keyword(&mut self, name: &str) -> Option<()> {
        if self.peek()?.is_ident(name) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    pub fn ident(&mut self) -> Option<&'a str> {
        let name = self.peek()?.as_ident()?;
        self.pos += 1;
        Some(name)
    }

    /// Decimal or hexadecimal integer literal.
    pub fn integer(&mut self) -> Option<u64> {
        let value = self.peek()?.as_integer()?;
        self.pos += 1;
        Some(value)
    }

    /// Advance past the first token equal to `stop`.
    /// The cursor is left untouched when `stop` never occurs.
    pub fn skip_past(&mut self, stop: &Token) -> Option<()> {
        let offset = self.rest().iter().position(|t| t == stop)?;
        self.pos += offset + 1;
        Some(())
    }

    /// Tokens not yet consumed.
    pub fn rest(&self) -> &'a [Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_cursor_reads_in_order() {
        let tokens = tokenize("BLOCK_STONE = 0x10 ,");
        let mut cursor = TokenCursor::new(&tokens);

        assert_eq!(cursor.ident(), Some("BLOCK_STONE"));
        assert_eq!(cursor.eat(&Token::Eq), Some(()));
        assert_eq!(cursor.integer(), Some(16));
        assert_eq!(cursor.remaining(), 1);
        assert!(cursor.integer().is_none());
        assert_eq!(cursor.next(), Some(&Token::Comma));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_skip_past() {
        let tokens = tokenize("[ 256 + 1 ] = {");
        let mut cursor = TokenCursor::new(&tokens);

        cursor.skip_past(&Token::RBracket).unwrap();
        assert_eq!(cursor.rest(), &[Token::Eq, Token::LBrace]);

        let before = cursor.position();
        assert!(cursor.skip_past(&Token::RBracket).is_none());
        assert_eq!(cursor.position(), before);
    }
}
