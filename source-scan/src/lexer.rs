use logos::{Filter, Lexer, Logos};

/// A lexical element of C/C++ source.
///
/// Only the shapes needed to read static data tables are distinguished.
/// Anything else collapses into [`Token::Punct`] so lexing never fails.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip(r"#[^\n]*", allow_greedy = true))]
#[logos(skip r"'([^'\\\n]|\\.)*'")]
pub enum Token {
    /// Block comment holding only a decimal number, e.g. `/* 12 */`.
    /// Every other block comment is skipped.
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", block_comment)]
    IdMarker(u64),

    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]*", hex)]
    Hex(u64),

    #[regex(r"[0-9]+[uUlL]*", int)]
    Int(u64),

    /// Float literal carrying the `f` suffix, e.g. `1.0f`
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?[fF]", float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fF]", float)]
    #[regex(r"[0-9]+([eE][+-]?[0-9]+)?[fF]", float)]
    FloatF(f64),

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", float)]
    Float(f64),

    /// String literal contents between the quotes, not unescaped.
    /// Wide literals (`L"..."`) are accepted.
    #[regex(r#"L?"([^"\\\n]|\\.)*""#, string)]
    Str(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("=")]
    Eq,
    #[token("|")]
    Pipe,

    /// Excludes `/`, `.` and `#`, which start longer tokens or skipped text.
    /// A lone `/` or `.` reaches [`tokenize`] as a lexer error instead.
    #[regex(r#"[^ \t\r\n\f0-9A-Za-z_{}\[\]();,=|"'/.#]"#, |lex| lex.slice().chars().next())]
    Punct(char),
}

impl Token {
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Token::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str_literal(&self) -> Option<&str> {
        match self {
            Token::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Value of a decimal or hexadecimal integer literal.
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Token::Int(v) | Token::Hex(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_ident(&self, name: &str) -> bool {
        self.as_ident() == Some(name)
    }
}

fn block_comment(lex: &mut Lexer<Token>) -> Filter<u64> {
    let slice = lex.slice();
    let body = slice[2..slice.len() - 2].trim();
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Filter::Skip;
    }
    match body.parse() {
        Ok(id) => Filter::Emit(id),
        Err(_) => Filter::Skip,
    }
}

fn hex(lex: &mut Lexer<Token>) -> Option<u64> {
    let digits = lex.slice()[2..].trim_end_matches(['u', 'U', 'l', 'L']);
    u64::from_str_radix(digits, 16).ok()
}

fn int(lex: &mut Lexer<Token>) -> Option<u64> {
    lex.slice().trim_end_matches(['u', 'U', 'l', 'L']).parse().ok()
}

fn float(lex: &mut Lexer<Token>) -> Option<f64> {
    lex.slice().trim_end_matches(['f', 'F']).parse().ok()
}

fn string(lex: &mut Lexer<Token>) -> String {
    let s = lex.slice().strip_prefix('L').unwrap_or(lex.slice());
    s[1..s.len() - 1].to_string()
}

/// Tokenize C/C++ source text.
///
/// Input the lexer cannot classify (a lone `/`, an unterminated string, an out
/// of range literal) is kept as a single [`Token::Punct`] for its first
/// character.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(token),
            Err(()) => {
                if let Some(c) = lexer.slice().chars().next() {
                    tokens.push(Token::Punct(c));
                }
            }
        }
    }
    tokens
}

/// Count `/* <id> */` annotations in `source`.
///
/// Only markers that lex as tokens are counted. Ones inside `//` comments or
/// string literals are not.
pub fn count_id_markers(source: &str) -> usize {
    Token::lexer(source)
        .filter(|t| matches!(t, Ok(Token::IdMarker(_))))
        .count()
}
