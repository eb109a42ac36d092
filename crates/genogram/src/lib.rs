//! # Genogram
//!
//! A genealogy graph projection and family-tree layout engine.
//!
//! Raw person records carry overlapping relation claims (parents, children,
//! spouses) that rarely form a clean tree. The pipeline turns them into
//! drawable coordinates in three stages:
//!
//! 1. [`graph::PersonGraph`] cleans the claims into a symmetric relational
//!    graph,
//! 2. [`hierarchy::project`] flattens the graph into one strict tree of
//!    family units with auxiliary references for the parent claims that
//!    cannot be tree edges,
//! 3. [`layout::TreeLayout`] assigns generation-layered coordinates and
//!    concrete auxiliary connector endpoints.
//!
//! # Quick Start
//!
//! ```rust
//! use genogram::prelude::*;
//!
//! let people = vec![
//!     Person::new(1, "Ana", "García").with_gender(Gender::Female).with_spouse(2),
//!     Person::new(2, "Luis", "García").with_gender(Gender::Male),
//!     Person::new(3, "Marta", "García").with_parents(&[1, 2]),
//! ];
//!
//! let layout = layout_family(&people)?;
//! assert_eq!(layout.root.id, NodeId::Couple(PersonId(1), PersonId(2)));
//! assert_eq!(layout.root.children.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The pipeline is stateless and deterministic: the same records always
//! produce the same coordinates.

pub mod core;
pub mod graph;
pub mod hierarchy;
pub mod layout;

use anyhow::Result;
use tracing::debug;

use crate::core::types::Person;
use crate::graph::PersonGraph;
use crate::layout::{FamilyTreeLayout, TreeLayout};

/// Run the full pipeline over raw person records
///
/// Recomputes from scratch on every call; there is no incremental state.
pub fn layout_family(people: &[Person]) -> Result<FamilyTreeLayout> {
    debug!(record_count = people.len(), "laying out family tree");
    let graph = PersonGraph::from_people(people);
    let tree = hierarchy::project(&graph)?;
    TreeLayout::new().layout(&tree)
}

/// Commonly used types, re-exported for convenient glob imports
pub mod prelude {
    pub use crate::core::error::GenogramError;
    pub use crate::core::types::{Gender, Person, PersonId};
    pub use crate::graph::PersonGraph;
    pub use crate::hierarchy::{project, DrawableNode, ExtraParentRef, FamilyUnit, NodeId};
    pub use crate::layout::{
        AuxiliaryEdge, FamilyTreeLayout, LayoutConfig, PositionedNode, TreeLayout,
    };
    pub use crate::layout_family;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_pipeline_smoke() {
        let people = vec![
            Person::new(1, "Ana", "García").with_spouse(2),
            Person::new(2, "Luis", "García"),
            Person::new(3, "Marta", "García").with_parents(&[1, 2]),
        ];
        let layout = layout_family(&people).unwrap();
        assert_eq!(layout.root.id, NodeId::Couple(PersonId(1), PersonId(2)));
        assert_eq!(layout.root.children.len(), 1);
        assert!(layout.auxiliary_edges.is_empty());
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let people = vec![
            Person::new(5, "Eva", "Ruiz").with_children(&[6, 7]),
            Person::new(6, "A", "Ruiz"),
            Person::new(7, "B", "Ruiz"),
        ];
        let a = layout_family(&people).unwrap();
        let b = layout_family(&people).unwrap();
        assert_eq!(a.root, b.root);
        assert_eq!(a.auxiliary_edges, b.auxiliary_edges);
        assert_eq!(a.width, b.width);
        assert_eq!(a.height, b.height);
    }
}
