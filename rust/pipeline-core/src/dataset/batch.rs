// rust/pipeline-core/src/dataset/batch.rs

use super::cursor::Cursor;
use super::element::Value;
use crate::error::Result;

/// Upper bound on the up-front reservation for one batch.
const MAX_RESERVED_ITEMS: usize = 1024;

/// Groups consecutive input elements into batches of `batch_size`.
///
/// The last batch may be shorter; an empty batch is never produced.
pub(crate) struct BatchCursor {
    input: Box<dyn Cursor>,
    batch_size: usize,
    input_exhausted: bool,
}

impl BatchCursor {
    pub(crate) fn new(input: Box<dyn Cursor>, batch_size: usize) -> Self {
        Self {
            input,
            batch_size,
            input_exhausted: false,
        }
    }
}

impl Cursor for BatchCursor {
    fn next_element(&mut self) -> Result<Option<Value>> {
        if self.input_exhausted {
            return Ok(None);
        }

        let mut items = Vec::with_capacity(self.batch_size.min(MAX_RESERVED_ITEMS));
        while items.len() < self.batch_size {
            match self.input.next_element()? {
                Some(value) => items.push(value),
                None => {
                    self.input_exhausted = true;
                    break;
                }
            }
        }

        if items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Value::Batch(items)))
        }
    }
}
