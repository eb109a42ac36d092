//! Cleaned relational view over raw person records
//!
//! [`PersonGraph`] normalizes the relation claims scattered across person
//! records into a consistent, bidirectional adjacency: parent/child links are
//! honored from either side, duplicate and dangling ids are dropped, and the
//! spouse relation is reduced to a perfect matching. Construction is total;
//! malformed references never produce an error.

use std::collections::{HashMap, HashSet};

use tracing::{debug, span, trace, Level};

use crate::core::types::{Person, PersonId};

/// A cleaned, symmetric relational graph of person records
///
/// # Example
///
/// ```rust
/// use genogram::graph::PersonGraph;
/// use genogram::core::types::Person;
///
/// let people = vec![
///     Person::new(1, "Ana", "García").with_children(&[3]),
///     Person::new(2, "Luis", "García"),
///     Person::new(3, "Marta", "García").with_parents(&[1, 2]),
/// ];
/// let graph = PersonGraph::from_people(&people);
///
/// // child claims are honored in both directions
/// assert_eq!(graph.children_of(2.into()), vec![3.into()]);
/// assert_eq!(graph.parents_of(3.into()).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PersonGraph {
    records: HashMap<PersonId, Person>,
    /// Ids in first-seen input order, for deterministic iteration
    order: Vec<PersonId>,
    parents: HashMap<PersonId, Vec<PersonId>>,
    children: HashMap<PersonId, Vec<PersonId>>,
    spouses: HashMap<PersonId, PersonId>,
}

impl PersonGraph {
    /// Build a cleaned graph from raw records
    ///
    /// Duplicate ids keep the last record but the first position in
    /// iteration order. Self-references, dangling ids, and duplicate list
    /// entries are dropped. Conflicting spouse claims resolve
    /// first-claim-wins in input order.
    pub fn from_people(people: &[Person]) -> Self {
        let build_span = span!(Level::INFO, "build_person_graph", record_count = people.len());
        let _enter = build_span.enter();

        let mut records: HashMap<PersonId, Person> = HashMap::new();
        let mut order: Vec<PersonId> = Vec::new();
        for person in people {
            if records.insert(person.id, person.clone()).is_some() {
                debug!(id = %person.id, "duplicate id, keeping later record");
            } else {
                order.push(person.id);
            }
        }

        let mut graph = Self {
            records,
            order,
            parents: HashMap::new(),
            children: HashMap::new(),
            spouses: HashMap::new(),
        };
        graph.link_generations();
        graph.match_spouses();

        trace!(
            people = graph.order.len(),
            couples = graph.spouses.len() / 2,
            "graph built"
        );
        graph
    }

    /// Union declared parent and child claims into symmetric adjacency.
    fn link_generations(&mut self) {
        let mut edges: Vec<(PersonId, PersonId)> = Vec::new();
        let mut seen: HashSet<(PersonId, PersonId)> = HashSet::new();

        for &id in &self.order {
            let person = &self.records[&id];
            for &parent in &person.parent_ids {
                if parent != id && self.records.contains_key(&parent) && seen.insert((parent, id)) {
                    edges.push((parent, id));
                }
            }
            for &child in &person.child_ids {
                if child != id && self.records.contains_key(&child) && seen.insert((id, child)) {
                    edges.push((id, child));
                }
            }
        }

        for (parent, child) in edges {
            self.children.entry(parent).or_default().push(child);
            self.parents.entry(child).or_default().push(parent);
        }
    }

    /// Reduce spouse claims to a perfect matching, first claim wins.
    fn match_spouses(&mut self) {
        for &id in &self.order {
            let Some(claimed) = self.records[&id].spouse_id else {
                continue;
            };
            if claimed == id || !self.records.contains_key(&claimed) {
                debug!(id = %id, spouse = %claimed, "dropping invalid spouse claim");
                continue;
            }
            if self.spouses.contains_key(&id) || self.spouses.contains_key(&claimed) {
                if self.spouses.get(&id) != Some(&claimed) {
                    debug!(id = %id, spouse = %claimed, "dropping conflicting spouse claim");
                }
                continue;
            }
            self.spouses.insert(id, claimed);
            self.spouses.insert(claimed, id);
        }
    }

    /// Look up a record by id
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.records.get(&id)
    }

    /// All records in first-seen input order
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.order.iter().map(|id| &self.records[id])
    }

    /// Cleaned parents of a person
    pub fn parents_of(&self, id: PersonId) -> Vec<PersonId> {
        self.parents.get(&id).cloned().unwrap_or_default()
    }

    /// Cleaned children of a person
    pub fn children_of(&self, id: PersonId) -> Vec<PersonId> {
        self.children.get(&id).cloned().unwrap_or_default()
    }

    /// Matched spouse, if any
    pub fn spouse_of(&self, id: PersonId) -> Option<PersonId> {
        self.spouses.get(&id).copied()
    }

    /// Whether an id names a record in the graph
    pub fn contains(&self, id: PersonId) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of distinct people
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the graph holds no people
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
