//! Lazy, single-pass iteration over an open cursor.

use std::iter::FusedIterator;

use crate::codec::Codec;
use crate::columns::Fields;
use crate::connection::Cursor;
use crate::error::TableMapError;
use crate::types::SqlValue;

/// How each fetched row is turned into an element.
pub trait RowDecoder {
    type Item;

    /// # Errors
    /// Returns `TableMapError` when the row does not have the expected shape.
    fn decode(&self, row: Vec<SqlValue>) -> Result<Self::Item, TableMapError>;
}

#[derive(Debug, Clone, Copy)]
pub struct KeyDecoder(pub(crate) Codec);

#[derive(Debug, Clone, Copy)]
pub struct ValueDecoder(pub(crate) Codec);

#[derive(Debug, Clone, Copy)]
pub struct ItemDecoder(pub(crate) Codec);

impl RowDecoder for KeyDecoder {
    type Item = Fields;

    fn decode(&self, row: Vec<SqlValue>) -> Result<Fields, TableMapError> {
        self.0.decode_key(row)
    }
}

impl RowDecoder for ValueDecoder {
    type Item = Fields;

    fn decode(&self, row: Vec<SqlValue>) -> Result<Fields, TableMapError> {
        self.0.decode_value(row)
    }
}

impl RowDecoder for ItemDecoder {
    type Item = (Fields, Fields);

    fn decode(&self, row: Vec<SqlValue>) -> Result<(Fields, Fields), TableMapError> {
        self.0.decode_item(row)
    }
}

enum SequenceState<Cu> {
    Open(Cu),
    Exhausted,
}

/// Forward-only sequence over the rows of one executed statement.
///
/// Each call to `next` fetches exactly one row. Once the cursor reports the end
/// of the result, or a fetch fails, the cursor is released and the sequence
/// stays exhausted; scanning again needs a new sequence from the table.
pub struct RowSequence<Cu, D> {
    state: SequenceState<Cu>,
    decoder: D,
}

impl<Cu: Cursor, D: RowDecoder> RowSequence<Cu, D> {
    /// Wrap a cursor whose statement has already been executed.
    pub fn new(cursor: Cu, decoder: D) -> Self {
        Self {
            state: SequenceState::Open(cursor),
            decoder,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, SequenceState::Exhausted)
    }
}

impl<Cu: Cursor, D: RowDecoder> Iterator for RowSequence<Cu, D> {
    type Item = Result<D::Item, TableMapError>;

    fn next(&mut self) -> Option<Self::Item> {
        let SequenceState::Open(cursor) = &mut self.state else {
            return None;
        };
        match cursor.fetch_one() {
            Ok(Some(row)) => Some(self.decoder.decode(row)),
            Ok(None) => {
                self.state = SequenceState::Exhausted;
                None
            }
            Err(err) => {
                self.state = SequenceState::Exhausted;
                Some(Err(err))
            }
        }
    }
}

impl<Cu: Cursor, D: RowDecoder> FusedIterator for RowSequence<Cu, D> {}
