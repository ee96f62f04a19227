//! Token-level scanning of C/C++ data tables.
//!
//! Turns source text into tokens, finds a named enum or array initializer
//! inside it, and splits the initializer body into rows and fields so that
//! callers can recognize individual records without a full C grammar.

pub mod block;
pub mod cursor;
pub mod lexer;

pub use block::{locate, split_fields, Block, BlockHeader};
pub use cursor::TokenCursor;
pub use lexer::{count_id_markers, tokenize, Token};
