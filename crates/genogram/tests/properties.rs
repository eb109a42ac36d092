//! Property-based checks over arbitrary relation claims

use std::collections::HashSet;

use proptest::prelude::*;

use genogram::prelude::*;

/// Arbitrary person records over a small id space, with ids that may repeat
/// and relation claims that may dangle, self-reference, or form cycles.
fn arb_people() -> impl Strategy<Value = Vec<Person>> {
    let record = (
        1u64..=12,
        prop::collection::vec(1u64..=12, 0..3),
        prop::collection::vec(1u64..=12, 0..3),
        prop::option::of(1u64..=12),
        prop::sample::select(vec![Gender::Male, Gender::Female, Gender::Unknown]),
    );
    prop::collection::vec(record, 0..12).prop_map(|rows| {
        rows.into_iter()
            .map(|(id, parents, children, spouse, gender)| {
                let mut person = Person::new(id, format!("P{}", id), "")
                    .with_gender(gender)
                    .with_parents(&parents)
                    .with_children(&children);
                if let Some(s) = spouse {
                    person = person.with_spouse(s);
                }
                person
            })
            .collect()
    })
}

fn collect_members(root: &PositionedNode) -> Vec<PersonId> {
    let mut members = Vec::new();
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        members.extend(n.unit.member_ids());
        stack.extend(n.children.iter());
    }
    members
}

proptest! {
    /// Every distinct person appears in exactly one node.
    #[test]
    fn prop_no_person_duplicated(people in arb_people()) {
        let layout = layout_family(&people).unwrap();
        let members = collect_members(&layout.root);
        let distinct: HashSet<PersonId> = members.iter().copied().collect();
        prop_assert_eq!(members.len(), distinct.len());

        let input_ids: HashSet<PersonId> = people.iter().map(|p| p.id).collect();
        prop_assert_eq!(distinct, input_ids);
    }

    /// The pipeline terminates and yields a finite canvas on any input,
    /// cycles included.
    #[test]
    fn prop_terminates_on_any_input(people in arb_people()) {
        let layout = layout_family(&people).unwrap();
        prop_assert!(layout.width.is_finite());
        prop_assert!(layout.height.is_finite());
    }

    /// Re-running the pipeline reproduces bit-identical coordinates.
    #[test]
    fn prop_idempotent(people in arb_people()) {
        let first = layout_family(&people).unwrap();
        let second = layout_family(&people).unwrap();
        prop_assert_eq!(first.root, second.root);
        prop_assert_eq!(first.auxiliary_edges, second.auxiliary_edges);
        prop_assert_eq!(first.width, second.width);
        prop_assert_eq!(first.height, second.height);
    }

    /// Every primary child sits exactly one generation below its parent.
    #[test]
    fn prop_generational_ordering(people in arb_people()) {
        let gap = LayoutConfig::default().generation_gap;
        let layout = layout_family(&people).unwrap();
        let mut stack = vec![&layout.root];
        while let Some(node) = stack.pop() {
            for child in &node.children {
                prop_assert_eq!(child.y - node.y, gap);
                stack.push(child);
            }
        }
    }

    /// Auxiliary edges always reference people that exist in the tree.
    #[test]
    fn prop_auxiliary_edges_are_resolvable(people in arb_people()) {
        let layout = layout_family(&people).unwrap();
        let members: HashSet<PersonId> = collect_members(&layout.root).into_iter().collect();
        for edge in &layout.auxiliary_edges {
            prop_assert!(members.contains(&edge.parent_id));
            prop_assert!(members.contains(&edge.child_id));
        }
    }
}
