//! Coordinate assignment for the projected family tree
//!
//! [`TreeLayout`] walks a [`DrawableNode`] tree and assigns every unit a
//! center position: generations stack downward at a fixed vertical gap,
//! siblings pack left-to-right inside their subtree extent, and couple
//! members sit symmetrically around their node center. Auxiliary parent
//! references become concrete connector endpoints once every center is known.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, span, trace, warn, Level};
use unicode_width::UnicodeWidthStr;

use crate::core::error::GenogramError;
use crate::core::types::PersonId;
use crate::hierarchy::{DrawableNode, FamilyUnit, NodeId};

/// Label drawn on the synthetic root node
const FAMILY_LABEL: &str = "Familia";

/// Spacing and sizing constants for tree layout
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Vertical distance between generation centers
    pub generation_gap: f32,
    /// Horizontal gap between sibling subtrees
    pub sibling_gap: f32,
    /// Horizontal gap between unrelated top-level subtrees
    pub branch_gap: f32,
    /// Distance between the two member centers of a couple node
    pub couple_gap: f32,
    /// Radius of a person circle
    pub node_radius: f32,
    /// Horizontal pixels per label character column
    pub char_width: f32,
    /// Canvas padding on every side
    pub padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            generation_gap: 120.0,
            sibling_gap: 40.0,
            branch_gap: 80.0,
            couple_gap: 60.0,
            node_radius: 30.0,
            char_width: 8.0,
            padding: 40.0,
        }
    }
}

/// A laid-out node with final canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: NodeId,
    pub unit: FamilyUnit,
    /// Center x of the node
    pub x: f32,
    /// Center y of the node
    pub y: f32,
    /// Horizontal footprint of the node itself, extents excluded
    pub width: f32,
    /// For couple nodes, the x offsets of the left and right member centers
    pub member_offsets: Option<(f32, f32)>,
    pub children: Vec<PositionedNode>,
}

/// A rendered connector for a demoted parent claim
#[derive(Debug, Clone, PartialEq)]
pub struct AuxiliaryEdge {
    pub parent_id: PersonId,
    pub child_id: PersonId,
    /// Center of the extra parent (their node or couple-half center)
    pub from: (f32, f32),
    /// Center of the claimed member
    pub to: (f32, f32),
}

/// Complete layout result for one family tree
#[derive(Debug, Clone)]
pub struct FamilyTreeLayout {
    pub root: PositionedNode,
    pub auxiliary_edges: Vec<AuxiliaryEdge>,
    pub width: f32,
    pub height: f32,
}

/// Arena entry during coordinate assignment
struct LayoutSlot<'a> {
    node: &'a DrawableNode,
    children: Vec<usize>,
    depth: usize,
    width: f32,
    extent: f32,
    x: f32,
    y: f32,
}

/// Extent-based layered tree layout
///
/// # Example
///
/// ```rust
/// use genogram::layout::TreeLayout;
/// use genogram::hierarchy::project;
/// use genogram::graph::PersonGraph;
/// use genogram::core::types::Person;
///
/// let graph = PersonGraph::from_people(&[Person::new(1, "Ana", "García")]);
/// let tree = project(&graph)?;
/// let layout = TreeLayout::new().layout(&tree)?;
/// assert!(layout.width > 0.0);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct TreeLayout {
    config: LayoutConfig,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeLayout {
    /// Create a layout engine with default spacing
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    /// Create a layout engine with custom spacing
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Assign coordinates to every node of the tree
    pub fn layout(&self, root: &DrawableNode) -> Result<FamilyTreeLayout> {
        let layout_span = span!(Level::INFO, "layout_family_tree", nodes = root.count());
        let _enter = layout_span.enter();

        let mut slots = self.flatten(root);
        self.measure_extents(&mut slots);
        self.assign_positions(&mut slots);
        trace!(slots = slots.len(), "positions assigned");

        let positions = self.member_positions(&slots);
        let auxiliary_edges = self.resolve_auxiliary_edges(&slots, &positions);
        debug!(auxiliary_edges = auxiliary_edges.len(), "auxiliary connectors resolved");

        let (width, height) = self.canvas_bounds(&slots);
        let root = self.build_positioned(&slots)?;
        Ok(FamilyTreeLayout {
            root,
            auxiliary_edges,
            width,
            height,
        })
    }

    /// Breadth-first flatten into the layout arena.
    fn flatten<'a>(&self, root: &'a DrawableNode) -> Vec<LayoutSlot<'a>> {
        let mut slots: Vec<LayoutSlot<'a>> = vec![LayoutSlot {
            node: root,
            children: Vec::new(),
            depth: 0,
            width: self.node_width(root),
            extent: 0.0,
            x: 0.0,
            y: 0.0,
        }];
        let mut cursor = 0;
        while cursor < slots.len() {
            let (parent_node, parent_depth) = (slots[cursor].node, slots[cursor].depth);
            for child in &parent_node.children {
                let idx = slots.len();
                slots[cursor].children.push(idx);
                slots.push(LayoutSlot {
                    node: child,
                    children: Vec::new(),
                    depth: parent_depth + 1,
                    width: self.node_width(child),
                    extent: 0.0,
                    x: 0.0,
                    y: 0.0,
                });
            }
            cursor += 1;
        }
        slots
    }

    /// Horizontal footprint of a single node, label-aware.
    fn node_width(&self, node: &DrawableNode) -> f32 {
        let diameter = self.config.node_radius * 2.0;
        match &node.unit {
            FamilyUnit::Family => self.label_width(FAMILY_LABEL).max(diameter),
            FamilyUnit::Person(p) => self.label_width(&p.full_name()).max(diameter),
            FamilyUnit::Couple { left, right } => {
                let widest = self
                    .label_width(&left.full_name())
                    .max(self.label_width(&right.full_name()))
                    .max(diameter);
                self.config.couple_gap + widest
            }
        }
    }

    fn label_width(&self, label: &str) -> f32 {
        UnicodeWidthStr::width(label) as f32 * self.config.char_width
    }

    /// Subtree extent pass. BFS order puts children after parents, so a
    /// single reverse sweep sees every child before its parent.
    fn measure_extents(&self, slots: &mut [LayoutSlot<'_>]) {
        for idx in (0..slots.len()).rev() {
            let gap = self.child_gap(slots[idx].node.id);
            let mut packed = 0.0;
            for (i, &child) in slots[idx].children.iter().enumerate() {
                if i > 0 {
                    packed += gap;
                }
                packed += slots[child].extent;
            }
            slots[idx].extent = slots[idx].width.max(packed);
        }
    }

    /// Gap between adjacent child subtrees of the given node.
    fn child_gap(&self, parent: NodeId) -> f32 {
        if parent == NodeId::Family {
            self.config.branch_gap
        } else {
            self.config.sibling_gap
        }
    }

    /// Forward pass: each node at the center of its extent span, children
    /// packed left-to-right and centered under the parent.
    fn assign_positions(&self, slots: &mut [LayoutSlot<'_>]) {
        if slots.is_empty() {
            return;
        }
        slots[0].x = self.config.padding + slots[0].extent / 2.0;
        slots[0].y = self.config.padding;
        for idx in 0..slots.len() {
            let gap = self.child_gap(slots[idx].node.id);
            let children = slots[idx].children.clone();
            let total: f32 = children.iter().map(|&c| slots[c].extent).sum::<f32>()
                + gap * children.len().saturating_sub(1) as f32;
            let mut cursor = slots[idx].x - total / 2.0;
            let child_y = self.config.padding + (slots[idx].depth + 1) as f32 * self.config.generation_gap;
            for &child in &children {
                slots[child].x = cursor + slots[child].extent / 2.0;
                slots[child].y = child_y;
                cursor += slots[child].extent + gap;
            }
        }
    }

    /// Final center position of every person, couple halves offset from the
    /// node center. Duplicate placements are pulled onto the first one.
    fn member_positions(&self, slots: &[LayoutSlot<'_>]) -> HashMap<PersonId, (f32, f32)> {
        let half = self.config.couple_gap / 2.0;
        let mut positions: HashMap<PersonId, (f32, f32)> = HashMap::new();
        for slot in slots {
            let centers: Vec<(PersonId, (f32, f32))> = match &slot.node.unit {
                FamilyUnit::Family => Vec::new(),
                FamilyUnit::Person(p) => vec![(p.id, (slot.x, slot.y))],
                FamilyUnit::Couple { left, right } => vec![
                    (left.id, (slot.x - half, slot.y)),
                    (right.id, (slot.x + half, slot.y)),
                ],
            };
            for (id, pos) in centers {
                if positions.contains_key(&id) {
                    warn!(person = %id, "person placed in more than one node, keeping first placement");
                    continue;
                }
                positions.insert(id, pos);
            }
        }
        positions
    }

    /// Concrete connector endpoints for every demoted parent claim.
    fn resolve_auxiliary_edges(
        &self,
        slots: &[LayoutSlot<'_>],
        positions: &HashMap<PersonId, (f32, f32)>,
    ) -> Vec<AuxiliaryEdge> {
        let mut edges = Vec::new();
        for slot in slots {
            for extra in &slot.node.extra_parents {
                match (positions.get(&extra.parent_id), positions.get(&extra.child_id)) {
                    (Some(&from), Some(&to)) => edges.push(AuxiliaryEdge {
                        parent_id: extra.parent_id,
                        child_id: extra.child_id,
                        from,
                        to,
                    }),
                    _ => {
                        debug!(
                            parent = %extra.parent_id,
                            child = %extra.child_id,
                            "skipping auxiliary edge with unresolved endpoint"
                        );
                    }
                }
            }
        }
        edges
    }

    /// Canvas size covering every node plus padding.
    fn canvas_bounds(&self, slots: &[LayoutSlot<'_>]) -> (f32, f32) {
        let mut max_x: f32 = 0.0;
        let mut max_y: f32 = 0.0;
        for slot in slots {
            max_x = max_x.max(slot.x + slot.width / 2.0);
            max_y = max_y.max(slot.y + self.config.node_radius);
        }
        (max_x + self.config.padding, max_y + self.config.padding)
    }

    /// Rebuild the nested tree from the arena, children before parents.
    fn build_positioned(&self, slots: &[LayoutSlot<'_>]) -> Result<PositionedNode> {
        let half = self.config.couple_gap / 2.0;
        let mut built: HashMap<usize, PositionedNode> = HashMap::new();
        for idx in (0..slots.len()).rev() {
            let slot = &slots[idx];
            let children = slot
                .children
                .iter()
                .map(|c| {
                    built.remove(c).ok_or_else(|| {
                        GenogramError::layout_error(format!("unbuilt child slot {}", c))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let member_offsets = match &slot.node.unit {
                FamilyUnit::Couple { .. } => Some((-half, half)),
                _ => None,
            };
            built.insert(
                idx,
                PositionedNode {
                    id: slot.node.id,
                    unit: slot.node.unit.clone(),
                    x: slot.x,
                    y: slot.y,
                    width: slot.width,
                    member_offsets,
                    children,
                },
            );
        }
        built
            .remove(&0)
            .ok_or_else(|| GenogramError::layout_error("empty layout arena".to_string()).into())
    }
}
