//! Projection of the relational graph into a drawable hierarchy
//!
//! A family graph is not a tree: people have two parents, couples share
//! children, and bad data can even contain cycles. [`project`] flattens the
//! graph into a single strict tree by grouping spouses into couple units,
//! electing one primary parent unit per child, and demoting every other
//! parent claim to an auxiliary reference that the layout stage renders as an
//! extra connector. When the graph splits into several top-level subtrees a
//! synthetic family node roots them; a lone subtree is returned directly,
//! and an empty graph yields the bare family sentinel.
//!
//! The projection never mutates the graph; placement state lives in a
//! private arena of unit slots.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use crate::core::error::GenogramError;
use crate::core::types::{Person, PersonId};
use crate::graph::PersonGraph;

/// Identifier of a node in the projected hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// An individual person
    Person(PersonId),
    /// A couple, identified by the sorted member pair
    Couple(PersonId, PersonId),
    /// The synthetic super-root
    Family,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Person(id) => write!(f, "{}", id),
            NodeId::Couple(a, b) => write!(f, "couple_{}_{}", a, b),
            NodeId::Family => write!(f, "family"),
        }
    }
}

/// The payload of a hierarchy node
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyUnit {
    /// Synthetic root holding the top-level subtrees
    Family,
    /// A single person
    Person(Person),
    /// A matched couple drawn as one node with two member circles
    Couple { left: Person, right: Person },
}

impl FamilyUnit {
    /// Ids of the people contained in this unit
    pub fn member_ids(&self) -> Vec<PersonId> {
        match self {
            FamilyUnit::Family => Vec::new(),
            FamilyUnit::Person(p) => vec![p.id],
            FamilyUnit::Couple { left, right } => vec![left.id, right.id],
        }
    }

}

/// A parent claim that could not become the primary tree edge
///
/// `child_id` names the claimed member, so a connector to a couple node can
/// attach to the correct half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraParentRef {
    pub parent_id: PersonId,
    pub child_id: PersonId,
}

/// A node of the projected tree
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableNode {
    pub id: NodeId,
    pub unit: FamilyUnit,
    pub children: Vec<DrawableNode>,
    /// Parent claims on members of this node beyond the primary tree edge
    pub extra_parents: Vec<ExtraParentRef>,
}

impl DrawableNode {
    /// Total node count of this subtree, root included
    pub fn count(&self) -> usize {
        // explicit stack, input depth is unbounded
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Placement state for one unit during attribution
struct UnitSlot {
    unit: FamilyUnit,
    id: NodeId,
    parent: Option<usize>,
    children: Vec<usize>,
    extra_parents: Vec<ExtraParentRef>,
}

/// Project a person graph into a single drawable tree
///
/// A single root unit becomes the hierarchy directly. Several root units are
/// gathered under the synthetic family node, which also stands in for an
/// empty graph. Every person appears in exactly one unit, and every unit
/// except the root has exactly one primary parent.
pub fn project(graph: &PersonGraph) -> Result<DrawableNode> {
    let project_span = span!(Level::INFO, "project_hierarchy", people = graph.len());
    let _enter = project_span.enter();

    let (mut slots, unit_of) = form_units(graph);
    trace!(units = slots.len(), "units formed");

    attribute_children(graph, &mut slots, &unit_of);

    let roots: Vec<usize> = (0..slots.len())
        .filter(|&i| slots[i].parent.is_none())
        .collect();
    debug!(roots = roots.len(), "root units reconciled");

    let root_idx = if roots.len() == 1 {
        roots[0]
    } else {
        let family_idx = slots.len();
        slots.push(UnitSlot {
            unit: FamilyUnit::Family,
            id: NodeId::Family,
            parent: None,
            children: roots,
            extra_parents: Vec::new(),
        });
        family_idx
    };

    assemble(slots, root_idx)
}

/// Group people into couple and individual units, in input order.
///
/// A person with a matched, not-yet-consumed spouse forms a couple unit with
/// them; member order puts the male member left when exactly one member is
/// male, otherwise the smaller id.
fn form_units(graph: &PersonGraph) -> (Vec<UnitSlot>, HashMap<PersonId, usize>) {
    let mut slots: Vec<UnitSlot> = Vec::new();
    let mut unit_of: HashMap<PersonId, usize> = HashMap::new();

    for person in graph.people() {
        if unit_of.contains_key(&person.id) {
            continue;
        }
        let idx = slots.len();
        let slot = match graph.spouse_of(person.id).and_then(|s| graph.person(s)) {
            Some(spouse) if !unit_of.contains_key(&spouse.id) => {
                unit_of.insert(person.id, idx);
                unit_of.insert(spouse.id, idx);
                let (left, right) = order_couple(person.clone(), spouse.clone());
                let (a, b) = (left.id.min(right.id), left.id.max(right.id));
                UnitSlot {
                    unit: FamilyUnit::Couple { left, right },
                    id: NodeId::Couple(a, b),
                    parent: None,
                    children: Vec::new(),
                    extra_parents: Vec::new(),
                }
            }
            _ => {
                unit_of.insert(person.id, idx);
                UnitSlot {
                    unit: FamilyUnit::Person(person.clone()),
                    id: NodeId::Person(person.id),
                    parent: None,
                    children: Vec::new(),
                    extra_parents: Vec::new(),
                }
            }
        };
        slots.push(slot);
    }
    (slots, unit_of)
}

fn order_couple(a: Person, b: Person) -> (Person, Person) {
    match (a.gender.is_male(), b.gender.is_male()) {
        (true, false) => (a, b),
        (false, true) => (b, a),
        _ => {
            if a.id <= b.id {
                (a, b)
            } else {
                (b, a)
            }
        }
    }
}

/// Elect one primary parent unit per child unit; demote the rest.
fn attribute_children(
    graph: &PersonGraph,
    slots: &mut [UnitSlot],
    unit_of: &HashMap<PersonId, usize>,
) {
    for person in graph.people() {
        let child_id = person.id;
        let parents = graph.parents_of(child_id);
        if parents.is_empty() {
            continue;
        }
        let child_idx = unit_of[&child_id];

        // couple parents preferred, then ascending id within each group
        let mut candidates = parents;
        candidates.sort();
        candidates.sort_by_key(|p| match slots[unit_of[p]].unit {
            FamilyUnit::Couple { .. } => 0u8,
            _ => 1u8,
        });

        let mut placed = slots[child_idx].parent;
        for parent_id in candidates {
            let parent_idx = unit_of[&parent_id];
            if parent_idx == child_idx {
                // spouses claiming each other as children
                debug!(parent = %parent_id, child = %child_id, "dropping intra-unit parent claim");
                continue;
            }
            if placed == Some(parent_idx) {
                // other member of the primary parent couple, already the tree edge
                continue;
            }
            if placed.is_none() && !creates_cycle(slots, parent_idx, child_idx) {
                slots[child_idx].parent = Some(parent_idx);
                slots[parent_idx].children.push(child_idx);
                placed = Some(parent_idx);
                trace!(parent = %slots[parent_idx].id, child = %slots[child_idx].id, "primary parent placed");
                continue;
            }
            // surplus or cycle-rejected claim becomes an auxiliary reference
            let extra = ExtraParentRef { parent_id, child_id };
            if !slots[child_idx].extra_parents.contains(&extra) {
                debug!(parent = %parent_id, child = %child_id, "demoting parent claim to auxiliary");
                slots[child_idx].extra_parents.push(extra);
            }
        }
    }
}

/// Whether making `parent_idx` the parent of `child_idx` would close a loop.
///
/// Walks the placed-parent chain iteratively; the hop bound guards against
/// arena corruption, not expected data.
fn creates_cycle(slots: &[UnitSlot], parent_idx: usize, child_idx: usize) -> bool {
    let mut current = parent_idx;
    let mut hops = 0;
    loop {
        if current == child_idx {
            return true;
        }
        match slots[current].parent {
            Some(next) => current = next,
            None => return false,
        }
        hops += 1;
        if hops > slots.len() {
            return true;
        }
    }
}

/// Turn the slot arena into a nested tree, bottom-up with an explicit stack.
fn assemble(slots: Vec<UnitSlot>, root_idx: usize) -> Result<DrawableNode> {
    let mut visit = Vec::with_capacity(slots.len());
    let mut stack = vec![root_idx];
    while let Some(idx) = stack.pop() {
        visit.push(idx);
        stack.extend(slots[idx].children.iter().copied());
    }

    let mut built: HashMap<usize, DrawableNode> = HashMap::new();
    for &idx in visit.iter().rev() {
        let slot = &slots[idx];
        let children = slot
            .children
            .iter()
            .map(|c| {
                built.remove(c).ok_or_else(|| {
                    GenogramError::projection_error(format!("unassembled child unit {}", c))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        built.insert(
            idx,
            DrawableNode {
                id: slot.id,
                unit: slot.unit.clone(),
                children,
                extra_parents: slot.extra_parents.clone(),
            },
        );
    }

    built
        .remove(&root_idx)
        .ok_or_else(|| GenogramError::projection_error("root unit never assembled".to_string()).into())
}
