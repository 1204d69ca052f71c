use std::fmt;

use crate::buffer::Zone;
use crate::vertex::VertexFlags;

use super::{BatchId, RendererId, ShapeDims, SurfaceId};

/// Failure raised by a backend implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    UnknownBatch(BatchId),
    UnknownRenderer(RendererId),
    UnknownSurface(SurfaceId),
    /// The handle does not refer to a live shape (deleted, cleared, or forged).
    StaleShape { batch: BatchId, index_zone: Zone },
    /// Local vertex index past the end of the shape.
    VertexOutOfRange { local: u32, count: u32 },
    /// Prototype index referring past the shape's vertices.
    IndexOutOfRange { index: u32, vertex_count: u32 },
    /// The backend cannot express this layout (e.g. no matching GPU format).
    UnsupportedLayout { flags: VertexFlags, reason: &'static str },
    /// Renderer and batch disagree on layout or draw uniforms.
    IncompatibleRenderer { batch: BatchId, renderer: RendererId },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::UnknownBatch(id) => write!(f, "unknown {id}"),
            BackendError::UnknownRenderer(id) => write!(f, "unknown {id}"),
            BackendError::UnknownSurface(id) => write!(f, "unknown {id}"),
            BackendError::StaleShape { batch, index_zone } => {
                write!(f, "no live shape at index zone {index_zone} in {batch}")
            }
            BackendError::VertexOutOfRange { local, count } => {
                write!(f, "vertex {local} out of range for shape with {count} vertices")
            }
            BackendError::IndexOutOfRange { index, vertex_count } => {
                write!(f, "index {index} out of range for shape with {vertex_count} vertices")
            }
            BackendError::UnsupportedLayout { flags, reason } => {
                write!(f, "unsupported vertex layout {:#06x}: {reason}", flags.bits())
            }
            BackendError::IncompatibleRenderer { batch, renderer } => {
                write!(f, "{renderer} cannot draw {batch}: layout or draw uniforms differ")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Error returned by every graphics operation.
///
/// Each variant carries the name of the operation that failed.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicsError {
    /// Shape handle counts do not match the shape kind being updated.
    DimensionMismatch { op: &'static str, expected: ShapeDims, actual: ShapeDims },
    /// No free zone large enough, and the batch cannot grow further.
    AllocationExhausted { op: &'static str, batch: BatchId, requested: ShapeDims },
    /// Shape parameters cannot produce valid topology.
    InvalidShape { op: &'static str, reason: String },
    Backend { op: &'static str, source: BackendError },
    /// Every failure collected while writing one shape.
    Composite { op: &'static str, errors: Vec<GraphicsError> },
}

impl GraphicsError {
    #[inline]
    pub fn backend(op: &'static str, source: BackendError) -> Self {
        GraphicsError::Backend { op, source }
    }

    #[inline]
    pub fn invalid_shape(op: &'static str, reason: impl Into<String>) -> Self {
        GraphicsError::InvalidShape { op, reason: reason.into() }
    }

    /// Name of the failing operation.
    pub fn op(&self) -> &'static str {
        match self {
            GraphicsError::DimensionMismatch { op, .. }
            | GraphicsError::AllocationExhausted { op, .. }
            | GraphicsError::InvalidShape { op, .. }
            | GraphicsError::Backend { op, .. }
            | GraphicsError::Composite { op, .. } => *op,
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::DimensionMismatch { op, expected, actual } => {
                write!(f, "{op}: shape handle has {actual}, expected {expected}")
            }
            GraphicsError::AllocationExhausted { op, batch, requested } => {
                write!(f, "{op}: {batch} has no room for {requested}")
            }
            GraphicsError::InvalidShape { op, reason } => write!(f, "{op}: {reason}"),
            GraphicsError::Backend { op, source } => write!(f, "{op}: {source}"),
            GraphicsError::Composite { op, errors } => {
                write!(f, "{op}: {} failure(s)", errors.len())?;
                for e in errors {
                    write!(f, "; {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::Backend { source, .. } => Some(source),
            GraphicsError::Composite { errors, .. } => {
                errors.first().map(|e| e as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Collects failures from a sequence of writes instead of stopping at the
/// first one.
#[derive(Debug)]
pub struct ErrorList {
    op: &'static str,
    errors: Vec<GraphicsError>,
}

impl ErrorList {
    #[inline]
    pub fn new(op: &'static str) -> Self {
        Self { op, errors: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, result: Result<(), GraphicsError>) {
        if let Err(e) = result {
            self.errors.push(e);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when nothing failed, otherwise one `Composite` holding every failure.
    pub fn finish(self) -> Result<(), GraphicsError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(GraphicsError::Composite { op: self.op, errors: self.errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_operation() {
        let e = GraphicsError::DimensionMismatch {
            op: "update_quad",
            expected: ShapeDims::new(4, 6),
            actual: ShapeDims::new(3, 3),
        };
        assert_eq!(
            e.to_string(),
            "update_quad: shape handle has 3 vertices / 3 indices, expected 4 vertices / 6 indices"
        );
        assert_eq!(e.op(), "update_quad");
    }

    #[test]
    fn error_list_empty_is_ok() {
        let mut list = ErrorList::new("update_line");
        list.push(Ok(()));
        assert!(list.finish().is_ok());
    }

    #[test]
    fn error_list_keeps_every_failure() {
        let mut list = ErrorList::new("update_line");
        let stale = BackendError::UnknownBatch(BatchId(3));
        list.push(Err(GraphicsError::backend("update_vertex", stale.clone())));
        list.push(Ok(()));
        list.push(Err(GraphicsError::backend("update_vertex", stale)));

        let err = list.finish().unwrap_err();
        let GraphicsError::Composite { op, errors } = &err else { panic!("expected composite") };
        assert_eq!(*op, "update_line");
        assert_eq!(errors.len(), 2);
        assert!(err.to_string().starts_with("update_line: 2 failure(s)"));
    }
}
