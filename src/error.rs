use crate::tables::BlockKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not find {0} block")]
    MissingBlock(BlockKind),

    #[error("missing required blocks: {}", join_kinds(.blocks))]
    MissingRequiredBlocks { blocks: Vec<BlockKind> },

    #[error("io error: {0}")]
    Io(String),

    #[error("json error: {0}")]
    Json(String),
}

fn join_kinds(blocks: &[BlockKind]) -> String {
    blocks
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
