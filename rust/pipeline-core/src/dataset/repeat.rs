// rust/pipeline-core/src/dataset/repeat.rs

use super::cursor::Cursor;
use super::element::Value;
use super::plan::Plan;
use crate::error::Result;

/// Concatenates fresh passes over its input.
///
/// Every epoch opens a new input cursor, so all files are reopened from the
/// first filename. An unbounded repeat over an input that produced nothing
/// in a whole epoch ends instead of spinning.
pub(crate) struct RepeatCursor {
    input: Plan,
    remaining: Option<u64>,
    current: Option<Box<dyn Cursor>>,
    epoch: u64,
    active_epoch: bool,
}

impl RepeatCursor {
    pub(crate) fn new(input: Plan, count: Option<u64>) -> Self {
        Self {
            input,
            remaining: count,
            current: None,
            epoch: 0,
            active_epoch: false,
        }
    }

    fn start_epoch(&mut self) -> Result<Option<Box<dyn Cursor>>> {
        match self.remaining.as_mut() {
            Some(0) => return Ok(None),
            Some(remaining) => *remaining -= 1,
            None => {}
        }
        self.epoch += 1;
        self.active_epoch = false;
        tracing::debug!("Starting epoch {}", self.epoch);
        self.input.open().map(Some)
    }
}

impl Cursor for RepeatCursor {
    fn next_element(&mut self) -> Result<Option<Value>> {
        loop {
            let mut cursor = match self.current.take() {
                Some(cursor) => cursor,
                None => match self.start_epoch()? {
                    Some(cursor) => cursor,
                    None => return Ok(None),
                },
            };

            match cursor.next_element() {
                Ok(Some(value)) => {
                    self.active_epoch = true;
                    self.current = Some(cursor);
                    return Ok(Some(value));
                }
                Ok(None) => {
                    tracing::debug!("Finished epoch {}", self.epoch);
                    if self.remaining.is_none() && !self.active_epoch {
                        tracing::debug!("Epoch {} was empty, ending repeat", self.epoch);
                        self.remaining = Some(0);
                    }
                }
                Err(e) => {
                    self.active_epoch = true;
                    self.current = Some(cursor);
                    return Err(e);
                }
            }
        }
    }
}
