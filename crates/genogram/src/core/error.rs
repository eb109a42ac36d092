//! Core error types for family-tree processing
//!
//! This module defines common error types used throughout the tree-building pipeline.

use thiserror::Error;

/// Core error types for family-tree processing
///
/// Relational oddities in the input (dangling ids, self-references,
/// conflicting spouse claims, cycles) are cleaned or demoted silently; these
/// variants cover internal invariant failures only.
#[derive(Error, Debug)]
pub enum GenogramError {
    #[error("Graph error: {message}")]
    GraphError { message: String },

    #[error("Projection error: {message}")]
    ProjectionError { message: String },

    #[error("Layout error: {message}")]
    LayoutError { message: String },
}

impl GenogramError {
    /// Create a new graph error
    pub fn graph_error(message: String) -> Self {
        Self::GraphError { message }
    }

    /// Create a new projection error
    pub fn projection_error(message: String) -> Self {
        Self::ProjectionError { message }
    }

    /// Create a new layout error
    pub fn layout_error(message: String) -> Self {
        Self::LayoutError { message }
    }
}
