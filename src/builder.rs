use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use crate::{
    errors::{ExtractError, ExtractResult},
    fingerprint::Fingerprint,
    parsers::prelude::*,
    registry::{FileFormat, detect_extractor},
    types::Transaction,
};

/// One-shot front door: give it content or a path, optionally pin the
/// format, then call one of the terminal methods.
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    content: Option<String>,
    filename: Option<String>,
    filepath: Option<PathBuf>,
    format: Option<FileFormat>,
}

impl ExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    /// Name recorded in `Transaction::file`. Defaults to the file path.
    pub fn filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    /// File to read when no content was given.
    pub fn filepath(mut self, filepath: impl Into<PathBuf>) -> Self {
        self.filepath = Some(filepath.into());
        self
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// The pinned format if it accepts the input, otherwise the first
    /// registered format that does.
    pub fn detect(self) -> ExtractResult<FileFormat> {
        let (format, _) = self.resolve()?;
        Ok(format)
    }

    pub fn fingerprint(self) -> ExtractResult<Option<Fingerprint>> {
        let (_, mut extractor) = self.resolve()?;
        extractor.fingerprint()
    }

    pub fn extract(self) -> ExtractResult<Vec<Transaction>> {
        let (_, mut extractor) = self.resolve()?;
        extractor.extract()?.collect()
    }

    fn resolve(self) -> ExtractResult<(FileFormat, Box<dyn Extractor>)> {
        let pinned = self.format;
        let mut input = self.into_input()?;
        let format = match pinned {
            Some(format) if format.extractor(input.by_ref()).detect() => format,
            Some(_) => return Err(ExtractError::UnsupportedFormat),
            None => detect_extractor(&mut input).ok_or(ExtractError::UnsupportedFormat)?,
        };
        Ok((format, format.extractor(input)))
    }

    fn into_input(self) -> ExtractResult<InputFile<Cursor<Vec<u8>>>> {
        let name = self
            .filename
            .or_else(|| self.filepath.as_ref().map(|path| path.to_string_lossy().into_owned()));

        let content = match (self.content, self.filepath) {
            (Some(content), _) => content.into_bytes(),
            (None, Some(path)) => fs::read(path)?,
            (None, None) => return Err(ExtractError::MissingInput),
        };

        Ok(InputFile::from_content(content, name.as_deref()))
    }
}
