// rust/pipeline-core/src/dataset/element.rs

//! Element values and their type signature.

use std::fmt;

use bytes::Bytes;

/// One element produced by a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single record.
    Bytes(Bytes),
    /// An ordered group of elements of the same shape.
    Batch(Vec<Value>),
}

impl Value {
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Batch(_) => None,
        }
    }

    pub fn as_batch(&self) -> Option<&[Value]> {
        match self {
            Self::Bytes(_) => None,
            Self::Batch(items) => Some(items),
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Batch(_) => None,
        }
    }

    /// Flattens a batch of records into their byte strings.
    pub fn into_records(self) -> Option<Vec<Bytes>> {
        match self {
            Self::Bytes(_) => None,
            Self::Batch(items) => items.into_iter().map(Value::into_bytes).collect(),
        }
    }

    /// Concrete shape of this value: `[]` for a record, `[n, ..]` for a batch.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Bytes(_) => vec![],
            Self::Batch(items) => {
                let mut shape = vec![items.len()];
                if let Some(first) = items.first() {
                    shape.extend(first.shape());
                }
                shape
            }
        }
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

/// Element data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Variable-length byte string.
    String,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
        }
    }
}

/// A shape that may be only partially known.
///
/// `rank == None` means nothing is known; a `None` dimension is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialShape {
    dims: Option<Vec<Option<usize>>>,
}

impl PartialShape {
    pub fn unknown() -> Self {
        Self { dims: None }
    }

    pub fn scalar() -> Self {
        Self { dims: Some(vec![]) }
    }

    pub fn from_dims(dims: Vec<Option<usize>>) -> Self {
        Self { dims: Some(dims) }
    }

    pub fn rank(&self) -> Option<usize> {
        self.dims.as_ref().map(Vec::len)
    }

    pub fn dims(&self) -> Option<&[Option<usize>]> {
        self.dims.as_deref()
    }

    /// Prepends a dimension. An unknown shape stays unknown.
    pub fn prepend(&self, dim: Option<usize>) -> Self {
        match &self.dims {
            None => Self::unknown(),
            Some(dims) => {
                let mut out = Vec::with_capacity(dims.len() + 1);
                out.push(dim);
                out.extend_from_slice(dims);
                Self::from_dims(out)
            }
        }
    }

    /// Whether some concrete shape could satisfy both `self` and `other`.
    pub fn is_compatible_with(&self, other: &PartialShape) -> bool {
        match (&self.dims, &other.dims) {
            (None, _) | (_, None) => true,
            (Some(a), Some(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| match (x, y) {
                        (Some(x), Some(y)) => x == y,
                        _ => true,
                    })
            }
        }
    }
}

impl fmt::Display for PartialShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dims {
            None => f.write_str("<unknown>"),
            Some(dims) => {
                f.write_str("[")?;
                for (i, dim) in dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match dim {
                        Some(d) => write!(f, "{d}")?,
                        None => f.write_str("?")?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}

/// Output signature of a dataset or iterator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementSpec {
    pub dtype: DType,
    pub shape: PartialShape,
}

impl ElementSpec {
    pub fn new(dtype: DType, shape: PartialShape) -> Self {
        Self { dtype, shape }
    }

    /// A type with no shape information; matches any shape.
    pub fn of_type(dtype: DType) -> Self {
        Self::new(dtype, PartialShape::unknown())
    }

    /// A scalar byte-string record.
    pub fn record() -> Self {
        Self::new(DType::String, PartialShape::scalar())
    }

    pub fn is_compatible_with(&self, other: &ElementSpec) -> bool {
        self.dtype == other.dtype && self.shape.is_compatible_with(&other.shape)
    }
}

impl fmt::Display for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.dtype, self.shape)
    }
}
