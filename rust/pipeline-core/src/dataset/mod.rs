// rust/pipeline-core/src/dataset/mod.rs

//! Composable dataset descriptions and the cursors that run them.
//!
//! A [`Dataset`] is a pure description: a [`ReaderDataset`] source over a
//! list of files, optionally wrapped in `repeat`, `batch` and `prefetch`
//! stages. Parameters are [`Param`]s, so filenames, epoch counts and batch
//! sizes can be left as placeholders and supplied in a [`Feed`] when the
//! pipeline is built. Building resolves the description into a fresh
//! [`Cursor`] that yields [`Value`]s.
//!
//! # Example
//!
//! ```no_run
//! use pipeline_core::dataset::{Cursor, Feed, ReaderDataset};
//!
//! let dataset = ReaderDataset::framed(vec!["train-0.rec", "train-1.rec"])
//!     .compression_type("GZIP")
//!     .repeat(10)
//!     .batch(64);
//!
//! let mut cursor = dataset.build(&Feed::new()).unwrap();
//! while let Some(batch) = cursor.next_element().unwrap() {
//!     // Process batch
//! #   let _ = batch;
//! }
//! ```

mod batch;
mod builder;
mod cursor;
mod element;
mod params;
mod plan;
mod prefetch;
mod repeat;

pub use builder::{Dataset, ReaderDataset};
pub use cursor::Cursor;
pub use element::{DType, ElementSpec, PartialShape, Value};
pub use params::{Feed, FromParamValue, Param, ParamValue};
