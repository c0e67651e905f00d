/*!
Row tokenizer for UPE export files.

UPE files are written by spreadsheet-style CSV exporters: comma separated,
`"` quoting with `""` escapes, and quoted fields may span lines. Rows are
produced lazily from any reader; blank lines produce no row.
*/

use crate::error::{Result, UpbError};
use csv::{ByteRecordsIntoIter, ReaderBuilder};
use std::io::Read;
use std::str::FromStr;

/// One tokenized row with the line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number of the row's first character
    pub line: u64,
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// The record-type tag (column 0), trimmed
    pub fn tag(&self) -> &str {
        self.field(0).trim()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Text of a column; absent columns read as empty
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    /// Parse a numeric column
    pub fn number<T: FromStr>(&self, index: usize, name: &str) -> Result<T> {
        let raw = self.field(index).trim();
        raw.parse().map_err(|_| {
            UpbError::format(format!(
                "{} at column {} is not a valid number: {:?}",
                name, index, raw
            ))
        })
    }

    /// Parse a 0/1 column
    pub fn flag(&self, index: usize, name: &str) -> Result<bool> {
        Ok(self.number::<u8>(index, name)? != 0)
    }
}

/// Lazy row iterator over a UPE byte stream.
///
/// Stops after the first read error; the error itself is yielded once.
pub struct RowTokenizer<R: Read> {
    records: ByteRecordsIntoIter<R>,
    failed: bool,
}

impl<R: Read> RowTokenizer<R> {
    pub fn new(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            records: reader.into_byte_records(),
            failed: false,
        }
    }
}

impl<'a> RowTokenizer<&'a [u8]> {
    /// Tokenize an in-memory export
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<R: Read> Iterator for RowTokenizer<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.records.next()? {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let fields = record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect();
                Some(Ok(Row::new(line, fields)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err.into()))
            }
        }
    }
}
