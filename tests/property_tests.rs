use proptest::prelude::*;
use std::collections::HashSet;
use tree_navigator::navigator::{NavigatorEvent, NavigatorState};
use tree_navigator::persistence::{MemoryStore, PinnedStore};
use tree_navigator::projection::project;
use tree_navigator::search::filter_tree;
use tree_navigator::tree::{FlatIndex, NodeKind, RawNode};

#[derive(Debug, Clone)]
enum Shape {
    File,
    Folder(Vec<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![Just(Shape::File), Just(Shape::Folder(vec![]))];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            Just(Shape::File),
            prop::collection::vec(inner, 0..5).prop_map(Shape::Folder),
        ]
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<RawNode>> {
    prop::collection::vec(shape_strategy(), 0..5).prop_map(|shapes| {
        let mut counter = 0;
        build_forest(&shapes, &mut counter)
    })
}

// Ids are n0, n1, ... in pre-order; names cycle through a few words so searches hit
fn build_forest(shapes: &[Shape], counter: &mut usize) -> Vec<RawNode> {
    const WORDS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];
    shapes
        .iter()
        .map(|shape| {
            let n = *counter;
            *counter += 1;
            let id = format!("n{}", n);
            let name = format!("{}-{}", WORDS[n % WORDS.len()], n);
            match shape {
                Shape::File => RawNode::file(id, name),
                Shape::Folder(children) => RawNode::folder(id, name, build_forest(children, counter)),
            }
        })
        .collect()
}

fn count_nodes(forest: &[RawNode]) -> usize {
    forest.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}

fn reference_walk(
    nodes: &[RawNode],
    expanded: &HashSet<String>,
    allowed: Option<&HashSet<String>>,
    out: &mut Vec<String>,
) {
    for node in nodes {
        if allowed.is_some_and(|a| !a.contains(&node.id)) {
            continue;
        }
        out.push(node.id.clone());
        if node.kind == NodeKind::Folder && expanded.contains(&node.id) {
            reference_walk(&node.children, expanded, allowed, out);
        }
    }
}

fn expansion_from_flags(total: usize, flags: &[bool]) -> HashSet<String> {
    (0..total)
        .filter(|i| flags[i % flags.len()])
        .map(|i| format!("n{}", i))
        .collect()
}

fn navigator_for(forest: &[RawNode]) -> NavigatorState {
    NavigatorState::new(forest, Box::new(PinnedStore::with_default_key(MemoryStore::new())))
}

proptest! {
    #[test]
    fn projection_matches_reference_traversal(
        forest in forest_strategy(),
        flags in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let index = FlatIndex::from_forest(&forest);
        let expanded = expansion_from_flags(count_nodes(&forest), &flags);

        let mut expected = Vec::new();
        reference_walk(&forest, &expanded, None, &mut expected);

        prop_assert_eq!(project(&index, index.root_ids(), &expanded, None), expected);
    }

    #[test]
    fn restricted_projection_matches_reference(
        forest in forest_strategy(),
        flags in prop::collection::vec(any::<bool>(), 1..64),
        query in prop::sample::select(vec!["alpha", "ta", "GAMMA", "-1", "zzz"]),
    ) {
        let index = FlatIndex::from_forest(&forest);
        let expanded = expansion_from_flags(count_nodes(&forest), &flags);
        let result = filter_tree(&index, query);

        let mut expected = Vec::new();
        reference_walk(&forest, &expanded, Some(&result.visible), &mut expected);

        prop_assert_eq!(
            project(&index, index.root_ids(), &expanded, Some(&result.visible)),
            expected
        );
        prop_assert!(result.matches.is_subset(&result.visible));
    }

    #[test]
    fn keyboard_order_equals_render_order(
        forest in forest_strategy(),
        flags in prop::collection::vec(any::<bool>(), 1..64),
    ) {
        let mut navigator = navigator_for(&forest);
        for id in expansion_from_flags(count_nodes(&forest), &flags) {
            navigator.toggle_folder(&id);
        }

        let rendered: Vec<String> = navigator.snapshot().items.iter().map(|i| i.id.clone()).collect();
        let mut walked = Vec::new();
        for _ in 0..navigator.projection().len() {
            walked.extend(navigator.focused_id().map(str::to_string));
            navigator.move_next();
        }

        prop_assert_eq!(&rendered, navigator.projection());
        prop_assert_eq!(walked, rendered);
    }

    #[test]
    fn focus_never_points_past_projection(
        forest in forest_strategy(),
        ops in prop::collection::vec((0u8..9, 0usize..64), 0..40),
    ) {
        let total = count_nodes(&forest);
        let mut navigator = navigator_for(&forest);

        for (op, target) in ops {
            let id = format!("n{}", if total == 0 { 0 } else { target % total });
            let event = match op {
                0 => NavigatorEvent::MoveNext,
                1 => NavigatorEvent::MovePrev,
                2 => NavigatorEvent::Expand,
                3 => NavigatorEvent::Collapse,
                4 => NavigatorEvent::Activate,
                5 => NavigatorEvent::ToggleFolder(id),
                6 => NavigatorEvent::SelectAndReveal(id),
                7 => NavigatorEvent::SetQuery(["alpha", "", "ta", "zzz"][target % 4].to_string()),
                _ => NavigatorEvent::Reveal(id),
            };
            navigator.handle_event(event);

            let len = navigator.projection().len();
            match navigator.focus_index() {
                Some(index) => {
                    prop_assert!(index < len);
                }
                None => {
                    prop_assert_eq!(len, 0);
                }
            }
            prop_assert_eq!(navigator.snapshot().focus_index, navigator.focus_index());
        }
    }

    #[test]
    fn search_round_trip_restores_manual_expansion(
        forest in forest_strategy(),
        flags in prop::collection::vec(any::<bool>(), 1..64),
        query in prop::sample::select(vec!["alpha", "beta", "zzz", "a"]),
    ) {
        let mut navigator = navigator_for(&forest);
        for id in expansion_from_flags(count_nodes(&forest), &flags) {
            navigator.toggle_folder(&id);
        }
        let before = navigator.manual_expanded().clone();
        let projection_before = navigator.projection().to_vec();

        navigator.set_query(query);
        navigator.set_query("");

        prop_assert_eq!(navigator.manual_expanded(), &before);
        prop_assert_eq!(navigator.projection(), projection_before.as_slice());
    }
}
