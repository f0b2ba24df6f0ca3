//! Error types for selectkit-core.

use crate::dom::NodeId;
use thiserror::Error;

/// Errors from element tree operations.
///
/// Callers performing best-effort work (focus re-targeting after a paint)
/// are expected to log and ignore these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node id does not exist (never created or already removed).
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// The node exists but is not connected to the document.
    #[error("node {0:?} is not attached to the document")]
    Detached(NodeId),

    /// The node has no tab index and cannot take focus.
    #[error("node {0:?} is not focusable")]
    NotFocusable(NodeId),

    /// Appending would make a node its own ancestor.
    #[error("cannot append {child:?} under its descendant {parent:?}")]
    HierarchyRequest {
        /// Intended parent
        parent: NodeId,
        /// Node being appended
        child: NodeId,
    },

    /// The document node cannot be removed or reparented.
    #[error("the document node cannot be moved or removed")]
    DocumentNode,
}
