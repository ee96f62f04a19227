use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};

pub const BLOCK_INFO_HEADER: &str = "blockInfo.h";
pub const BLOCK_INFO_SOURCE: &str = "blockInfo.cpp";
pub const TRANSLATIONS_SOURCE: &str = "nbt.cpp";
pub const TILES_HEADER: &str = "tiles.h";

/// Locations of the four Mineways source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    /// `enum block_types`
    pub block_info_header: PathBuf,
    /// `gBlockDefinitions`
    pub block_info_source: PathBuf,
    /// `BlockTranslations`
    pub translations: PathBuf,
    /// `gTilesTable` and `gTilesAlternates`
    pub tiles: PathBuf,
}

impl SourcePaths {
    /// Conventional file names inside a Mineways source directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            block_info_header: dir.join(BLOCK_INFO_HEADER),
            block_info_source: dir.join(BLOCK_INFO_SOURCE),
            translations: dir.join(TRANSLATIONS_SOURCE),
            tiles: dir.join(TILES_HEADER),
        }
    }

    /// Read all four files to completion.
    ///
    /// The header holding the constants is optional: if it cannot be read the
    /// run continues with no symbolic constants. The other files are required.
    pub fn read(&self) -> Result<SourceTexts> {
        let block_info_header = match open(&self.block_info_header) {
            Ok(file) => read_text(file)?,
            Err(e) => {
                warn!("{e}, continuing without block constants");
                String::new()
            }
        };

        Ok(SourceTexts {
            block_info_header,
            block_info_source: read_text(open(&self.block_info_source)?)?,
            translations: read_text(open(&self.translations)?)?,
            tiles: read_text(open(&self.tiles)?)?,
        })
    }
}

/// Full text of every input, read before any parsing starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTexts {
    pub block_info_header: String,
    pub block_info_source: String,
    pub translations: String,
    pub tiles: String,
}

impl SourceTexts {
    pub fn from_readers(
        block_info_header: impl Read,
        block_info_source: impl Read,
        translations: impl Read,
        tiles: impl Read,
    ) -> Result<Self> {
        Ok(Self {
            block_info_header: read_text(block_info_header)?,
            block_info_source: read_text(block_info_source)?,
            translations: read_text(translations)?,
            tiles: read_text(tiles)?,
        })
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))
}

/// Invalid UTF-8 is replaced rather than rejected.
fn read_text(mut reader: impl Read) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::Io(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
