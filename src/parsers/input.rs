//! Seekable input handle and the row plumbing every CSV format shares.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::Path;

use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::{debug, trace};

use super::primitives::DateLayout;
use super::traits::Transactions;
use crate::errors::{ExtractError, ExtractResult, ParseError};
use crate::types::{ExtraValue, Transaction};

/// A re-readable text source plus the name it was opened under.
///
/// Every pass over the content starts by rewinding, so the cursor position
/// left behind by a previous call never leaks into the next one.
#[derive(Debug)]
pub struct InputFile<R> {
    reader: R,
    name: Option<String>,
}

impl<R: Read + Seek> InputFile<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, name: None }
    }

    pub fn named(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: Some(name.into()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        self.reader.rewind()
    }

    /// Borrows the underlying reader, keeping the name.
    pub fn by_ref(&mut self) -> InputFile<&mut R> {
        InputFile {
            reader: &mut self.reader,
            name: self.name.clone(),
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn csv_reader(reader: &mut R) -> io::Result<Reader<&mut R>> {
        reader.rewind()?;
        Ok(ReaderBuilder::new().has_headers(true).from_reader(reader))
    }

    /// Runs `check` against the header row. Any failure counts as no match.
    pub(crate) fn probe_header(&mut self, check: impl FnOnce(&StringRecord) -> bool) -> bool {
        let matched = match Self::csv_reader(&mut self.reader) {
            Ok(mut reader) => match reader.headers() {
                Ok(headers) => check(headers),
                Err(err) => {
                    debug!(file = ?self.name, error = %err, "unreadable header, not a match");
                    false
                }
            },
            Err(err) => {
                debug!(file = ?self.name, error = %err, "failed to rewind input");
                false
            }
        };
        if let Err(err) = self.reader.rewind() {
            debug!(file = ?self.name, error = %err, "failed to rewind input after probe");
        }
        matched
    }

    pub(crate) fn matches_header(&mut self, expected: &[&str]) -> bool {
        self.probe_header(|headers| headers.iter().eq(expected.iter().copied()))
    }

    pub(crate) fn count_rows(&mut self) -> ExtractResult<usize> {
        let mut reader = Self::csv_reader(&mut self.reader)?;
        let mut count = 0;
        for record in reader.byte_records() {
            record.map_err(|source| ExtractError::Record {
                lineno: count + 1,
                source,
            })?;
            count += 1;
        }
        Ok(count)
    }

    /// Header and first data row, or `None` for a header-only input.
    pub(crate) fn first_record(&mut self) -> ExtractResult<Option<(StringRecord, StringRecord)>> {
        let mut reader = Self::csv_reader(&mut self.reader)?;
        let headers = reader.headers().map_err(ExtractError::Header)?.clone();
        match reader.records().next() {
            Some(record) => {
                let record = record.map_err(|source| ExtractError::Record { lineno: 1, source })?;
                Ok(Some((headers, record)))
            }
            None => Ok(None),
        }
    }

    /// Header, last data row and its line number.
    pub(crate) fn last_record(
        &mut self,
    ) -> ExtractResult<Option<(StringRecord, StringRecord, usize)>> {
        let mut reader = Self::csv_reader(&mut self.reader)?;
        let headers = reader.headers().map_err(ExtractError::Header)?.clone();
        let mut last = None;
        for (index, record) in reader.records().enumerate() {
            let lineno = index + 1;
            let record = record.map_err(|source| ExtractError::Record { lineno, source })?;
            last = Some((record, lineno));
        }
        Ok(last.map(|(record, lineno)| (headers, record, lineno)))
    }

    /// Streams one transaction per data row.
    ///
    /// The first pass counts rows so every record can carry its
    /// `reversed_lineno`; the second pass converts rows lazily. The stream
    /// ends after the first error.
    pub(crate) fn transactions<'a, F>(
        &'a mut self,
        extractor: &'static str,
        mut convert: F,
    ) -> ExtractResult<Transactions<'a>>
    where
        F: FnMut(Row<'_>, Transaction) -> ExtractResult<Transaction> + 'a,
    {
        let row_count = self.count_rows()?;
        let file = self.name.clone();
        debug!(extractor, ?file, row_count, "extracting transactions");

        let mut reader = Self::csv_reader(&mut self.reader)?;
        let headers = reader.headers().map_err(ExtractError::Header)?.clone();
        check_unique_headers(&headers)?;

        let rows = reader
            .into_records()
            .enumerate()
            .scan(false, move |failed, (index, record)| {
                if *failed {
                    return None;
                }
                let lineno = index + 1;
                let result = record
                    .map_err(|source| ExtractError::Record { lineno, source })
                    .and_then(|record| {
                        let base = Transaction {
                            file: file.clone(),
                            ..Transaction::new(extractor, lineno, reversed_lineno(lineno, row_count))
                        };
                        convert(Row::new(&headers, &record, lineno), base)
                    });
                if let Err(err) = &result {
                    debug!(extractor, lineno, error = %err, "extraction stopped");
                    *failed = true;
                }
                Some(result)
            });

        Ok(Box::new(rows))
    }
}

impl InputFile<File> {
    /// Opens `path`, recording it as the input's name.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Ok(Self::named(File::open(path)?, path.to_string_lossy()))
    }
}

impl InputFile<Cursor<Vec<u8>>> {
    /// Wraps in-memory content; `name` is copied into `Transaction::file`.
    pub fn from_content(content: impl Into<Vec<u8>>, name: Option<&str>) -> Self {
        Self {
            reader: Cursor::new(content.into()),
            name: name.map(str::to_string),
        }
    }
}

/// Every column lands in exactly one field or `extra` key, so a header name
/// may appear only once.
fn check_unique_headers(headers: &StringRecord) -> ExtractResult<()> {
    let mut seen = HashSet::new();
    match headers.iter().find(|header| !seen.insert(*header)) {
        Some(column) => Err(ExtractError::DuplicateColumn {
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn reversed_lineno(lineno: usize, row_count: usize) -> i64 {
    lineno as i64 - 1 - row_count as i64
}

/// One data row, with bookkeeping of which columns a format has consumed.
///
/// Whatever is left unconsumed ends up in [`Transaction::extra`].
pub(crate) struct Row<'r> {
    headers: &'r StringRecord,
    record: &'r StringRecord,
    lineno: usize,
    consumed: Vec<bool>,
}

impl<'r> Row<'r> {
    pub(crate) fn new(headers: &'r StringRecord, record: &'r StringRecord, lineno: usize) -> Self {
        Self {
            headers,
            record,
            lineno,
            consumed: vec![false; headers.len()],
        }
    }

    fn cell(&self, column: &str) -> ExtractResult<(usize, &'r str)> {
        let record: &'r StringRecord = self.record;
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|index| record.get(index).map(|value| (index, value)))
            .ok_or_else(|| ExtractError::MissingColumn {
                lineno: self.lineno,
                column: column.to_string(),
            })
    }

    /// Reads a cell without consuming it.
    pub(crate) fn peek(&self, column: &str) -> ExtractResult<&'r str> {
        self.cell(column).map(|(_, value)| value)
    }

    /// Header names in source order.
    pub(crate) fn columns(&self) -> csv::StringRecordIter<'r> {
        let headers: &'r StringRecord = self.headers;
        headers.iter()
    }

    /// Consumes a cell and returns its literal text.
    pub(crate) fn raw(&mut self, column: &str) -> ExtractResult<&'r str> {
        let (index, value) = self.cell(column)?;
        self.consumed[index] = true;
        Ok(value)
    }

    /// Consumes a cell; blank text becomes `None`, anything else is kept
    /// exactly as written, padding included.
    pub(crate) fn text(&mut self, column: &str) -> ExtractResult<Option<String>> {
        let value = self.raw(column)?;
        Ok(non_blank(value).map(|_| value.to_string()))
    }

    /// Consumes and parses a cell that must hold a value.
    pub(crate) fn parse<T>(
        &mut self,
        column: &str,
        parser: impl FnOnce(&str) -> Result<T, ParseError>,
    ) -> ExtractResult<T> {
        let value = self.raw(column)?;
        parser(value).map_err(|source| self.invalid(column, source))
    }

    /// Consumes and parses a cell; blank text becomes `None`.
    pub(crate) fn parse_optional<T>(
        &mut self,
        column: &str,
        parser: impl FnOnce(&str) -> Result<T, ParseError>,
    ) -> ExtractResult<Option<T>> {
        match non_blank(self.raw(column)?) {
            Some(value) => parser(value)
                .map(Some)
                .map_err(|source| self.invalid(column, source)),
            None => Ok(None),
        }
    }

    /// Date from the first of `columns` holding a non-blank value, without
    /// consuming anything.
    pub(crate) fn first_date(
        &self,
        columns: &[&str],
        layout: DateLayout,
    ) -> ExtractResult<Option<NaiveDate>> {
        for &column in columns {
            if let Some(value) = non_blank(self.peek(column)?) {
                return layout
                    .parse(value)
                    .map(Some)
                    .map_err(|source| self.invalid(column, source));
            }
        }
        Ok(None)
    }

    pub(crate) fn invalid(&self, column: &str, source: ParseError) -> ExtractError {
        ExtractError::InvalidField {
            lineno: self.lineno,
            column: column.to_string(),
            source,
        }
    }

    /// Moves every unconsumed column into `txn.extra`.
    pub(crate) fn finish(self, mut txn: Transaction) -> Transaction {
        let leftover: Vec<(String, ExtraValue)> = self
            .headers
            .iter()
            .zip(self.record.iter())
            .zip(&self.consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|((header, value), _)| (header.to_string(), ExtraValue::from(value)))
            .collect();

        if !leftover.is_empty() {
            trace!(lineno = self.lineno, columns = leftover.len(), "unmapped columns kept as extra");
            txn.extra
                .get_or_insert_with(BTreeMap::new)
                .extend(leftover);
        }
        txn
    }
}

pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
