use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nodeflow_core::{ElementKind, IndexPath, Size, SizeRange, TraitCollection};
use nodeflow_foundation::{
    DataController, DataControllerConfig, EditError, MeasurementState, NodeBlock, NodeSlot,
};
use nodeflow_testing::{BatchRecorder, CountingItemSource, FixedSizeProvider, TestNode};

fn range() -> SizeRange {
    SizeRange::new(Size::new(100.0, 0.0), Size::new(100.0, 400.0))
}

fn controller(config: DataControllerConfig) -> (DataController<TestNode>, CountingItemSource) {
    let source = CountingItemSource::new(vec![3, 2]);
    let controller = DataController::new(config, FixedSizeProvider::new(range()), source.clone());
    (controller, source)
}

fn with_sections(controller: &mut DataController<TestNode>, kind: &ElementKind, count: usize) {
    let indices: Vec<usize> = (0..count).collect();
    controller
        .insert_sections(kind, vec![Vec::new(); count], &indices, |_, _| {})
        .unwrap();
}

fn blocks(paths: &[IndexPath]) -> Vec<NodeBlock<TestNode>> {
    paths.iter().map(|&path| TestNode::block(path)).collect()
}

fn paths(pairs: &[(usize, usize)]) -> Vec<IndexPath> {
    pairs.iter().copied().map(IndexPath::from).collect()
}

fn stored_items(controller: &DataController<TestNode>, kind: &ElementKind) -> Vec<Vec<usize>> {
    controller
        .completed_nodes_of_kind(kind)
        .unwrap()
        .iter()
        .map(|section| {
            section
                .iter()
                .map(|slot| slot.node().map_or(usize::MAX, |node| node.index_path.item))
                .collect()
        })
        .collect()
}

#[test]
fn item_counts_recompute_once_per_invalidation() {
    let (mut controller, source) = controller(DataControllerConfig::inline(4));

    assert_eq!(controller.item_counts_from_data_source(), &[3, 2]);
    assert_eq!(controller.item_counts_from_data_source(), &[3, 2]);
    assert_eq!(source.queries(), 1);

    source.set_counts(vec![5]);
    assert_eq!(controller.item_counts_from_data_source(), &[3, 2]);

    controller.invalidate_data_source_item_counts();
    assert_eq!(controller.item_counts_from_data_source(), &[5]);
    assert_eq!(controller.item_counts_from_data_source(), &[5]);
    assert_eq!(source.queries(), 2);
    assert_eq!(controller.item_count_cache().recomputations(), 2);
}

#[test]
fn constrained_size_delegates_to_provider() {
    let provider = FixedSizeProvider::new(range());
    let mut controller: DataController<TestNode> = DataController::new(
        DataControllerConfig::inline(1),
        provider.clone(),
        CountingItemSource::default(),
    );
    let cell = ElementKind::cell();
    with_sections(&mut controller, &cell, 1);

    assert_eq!(
        controller.constrained_size_for_node_of_kind(&cell, IndexPath::new(0, 7)),
        range()
    );
    let index_paths = paths(&[(0, 0), (0, 1)]);
    controller
        .insert_nodes(&cell, index_paths.clone(), blocks(&index_paths), |_, _| {})
        .unwrap();
    assert_eq!(provider.lookups(), 3);
}

#[test]
fn insert_then_delete_restores_both_stores() {
    let (mut controller, _) = controller(DataControllerConfig::new(2).with_batch_size(2));
    let cell = ElementKind::cell();
    with_sections(&mut controller, &cell, 2);

    let initial = paths(&[(0, 0), (0, 1), (0, 2), (1, 0)]);
    controller
        .insert_nodes(&cell, initial.clone(), blocks(&initial), |_, _| {})
        .unwrap();
    let before_editing = controller.index_paths_for_editing_nodes_of_kind(&cell);
    let before_items = stored_items(&controller, &cell);

    let inserted = paths(&[(0, 1), (0, 3), (1, 0), (1, 2)]);
    controller
        .insert_nodes(&cell, inserted.clone(), blocks(&inserted), |_, _| {})
        .unwrap();
    assert_eq!(controller.index_paths_for_editing_nodes_of_kind(&cell).len(), 8);

    controller
        .delete_nodes_of_kind(&cell, &inserted, |removed, removed_paths| {
            assert_eq!(removed.len(), 4);
            assert_eq!(removed_paths, inserted.as_slice());
        })
        .unwrap();

    assert_eq!(controller.index_paths_for_editing_nodes_of_kind(&cell), before_editing);
    assert_eq!(stored_items(&controller, &cell), before_items);
}

#[test]
fn insert_completion_sees_committed_stores() {
    let (mut controller, _) = controller(DataControllerConfig::new(2).with_batch_size(2));
    let cell = ElementKind::cell();
    with_sections(&mut controller, &cell, 1);

    let index_paths = paths(&[(0, 2), (0, 0), (0, 1)]);
    let mut recorder = BatchRecorder::new();
    controller
        .insert_nodes(&cell, index_paths.clone(), blocks(&index_paths), |nodes, paths| {
            recorder.record(nodes, paths)
        })
        .unwrap();

    let batches = recorder.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].index_paths, paths(&[(0, 0), (0, 1), (0, 2)]));
    assert_eq!(stored_items(&controller, &cell), vec![vec![0, 1, 2]]);
    let node = controller
        .node_at_index_path(&cell, IndexPath::new(0, 1))
        .unwrap();
    assert_eq!(node.index_path, IndexPath::new(0, 1));
    assert_eq!(node.size.width, 100.0);
}

#[test]
fn rejected_edits_change_nothing_and_skip_completion() {
    let (mut controller, _) = controller(DataControllerConfig::inline(4));
    let cell = ElementKind::cell();
    with_sections(&mut controller, &cell, 1);
    let seed = paths(&[(0, 0), (0, 1)]);
    controller
        .insert_nodes(&cell, seed.clone(), blocks(&seed), |_, _| {})
        .unwrap();
    let before = stored_items(&controller, &cell);

    let calls = Arc::new(AtomicUsize::new(0));
    let out_of_range = paths(&[(0, 0), (0, 9)]);
    let counting = out_of_range
        .iter()
        .map(|&path| TestNode::counting_block(path, &calls))
        .collect();
    let mut completed = false;
    let result = controller.insert_nodes(&cell, out_of_range, counting, |_, _| completed = true);
    assert!(matches!(result, Err(EditError::ItemOutOfBounds { .. })));
    assert!(!completed);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let result = controller.delete_nodes_of_kind(&cell, &paths(&[(0, 1), (0, 1)]), |_, _| {
        completed = true
    });
    assert_eq!(
        result,
        Err(EditError::DuplicatePosition {
            kind: cell.clone(),
            index_path: IndexPath::new(0, 1),
        })
    );

    let result = controller.delete_nodes_of_kind(&cell, &paths(&[(0, 0), (3, 0)]), |_, _| {
        completed = true
    });
    assert!(matches!(result, Err(EditError::SectionOutOfBounds { section: 3, .. })));

    let result = controller.delete_sections_of_kind(&ElementKind::new("header"), &[0], |_| {
        completed = true
    });
    assert!(matches!(result, Err(EditError::UnknownKind { .. })));

    let result = controller.insert_nodes(&cell, paths(&[(0, 0)]), Vec::new(), |_, _| {
        completed = true
    });
    assert_eq!(
        result,
        Err(EditError::LengthMismatch {
            positions: 1,
            values: 0
        })
    );

    assert!(!completed);
    assert_eq!(stored_items(&controller, &cell), before);
}

#[test]
fn panicking_measurement_leaves_placeholder() {
    let (mut controller, _) = controller(DataControllerConfig::new(1).with_batch_size(2));
    let cell = ElementKind::cell();
    with_sections(&mut controller, &cell, 1);

    let index_paths = paths(&[(0, 0), (0, 1), (0, 2)]);
    let node_blocks: Vec<NodeBlock<TestNode>> = vec![
        TestNode::block(index_paths[0]),
        Box::new(|_: SizeRange, _: &TraitCollection| -> TestNode { panic!("broken row") }),
        TestNode::block(index_paths[2]),
    ];
    let mut measured = Vec::new();
    controller
        .insert_nodes(&cell, index_paths, node_blocks, |_, paths| {
            measured.extend_from_slice(paths)
        })
        .unwrap();

    assert_eq!(measured, paths(&[(0, 0), (0, 2)]));
    let section = &controller.completed_nodes_of_kind(&cell).unwrap()[0];
    assert_eq!(section.len(), 3);
    assert!(matches!(
        section[1],
        NodeSlot::Placeholder { constrained_size } if constrained_size == range()
    ));
    let placeholders: Vec<bool> = section.iter().map(NodeSlot::is_placeholder).collect();
    assert_eq!(placeholders, vec![false, true, false]);
    assert_eq!(controller.editing_nodes_of_kind(&cell).unwrap()[0].len(), 3);
    assert!(controller.node_at_index_path(&cell, IndexPath::new(0, 1)).is_none());
}

#[test]
fn sections_of_other_kinds_are_independent() {
    let (mut controller, _) = controller(DataControllerConfig::inline(8));
    let cell = ElementKind::cell();
    let header = ElementKind::new("header");
    with_sections(&mut controller, &cell, 2);

    let header_paths = paths(&[(0, 0)]);
    assert!(matches!(
        controller.insert_nodes(&header, header_paths.clone(), blocks(&header_paths), |_, _| {}),
        Err(EditError::UnknownKind { .. })
    ));

    let mut inserted = None;
    controller
        .insert_sections(&header, vec![Vec::new(), Vec::new()], &[1, 0], |sections, indices| {
            inserted = Some((sections.len(), indices.to_vec()))
        })
        .unwrap();
    assert_eq!(inserted, Some((2, vec![0, 1])));
    controller
        .insert_nodes(&header, header_paths.clone(), blocks(&header_paths), |_, _| {})
        .unwrap();

    controller
        .delete_sections_of_kind(&cell, &[0, 1], |indices| assert_eq!(indices, &[0, 1]))
        .unwrap();
    assert_eq!(controller.number_of_sections(&cell), 0);
    assert_eq!(controller.number_of_sections(&header), 2);
    assert_eq!(
        controller.index_paths_for_editing_nodes_of_kind(&header),
        header_paths
    );
}

#[test]
fn contexts_inherit_environment_traits() {
    let (mut controller, _) = controller(DataControllerConfig::inline(2));
    let cell = ElementKind::cell();
    with_sections(&mut controller, &cell, 1);
    let traits = TraitCollection::default().with_display_scale(2.0);
    controller.set_environment_traits(traits.clone());

    let path = IndexPath::new(0, 0);
    let context = controller.node_context(&cell, path, TestNode::block(path));
    assert_eq!(context.environment_traits(), &traits);
    assert_eq!(context.constrained_size(), range());

    let index_paths = paths(&[(0, 0)]);
    controller
        .insert_nodes(&cell, index_paths.clone(), blocks(&index_paths), |nodes, _| {
            assert_eq!(nodes[0].traits, traits)
        })
        .unwrap();
}

#[test]
fn controller_batches_contexts_by_config() {
    let (controller, _) = controller(DataControllerConfig::new(2).with_batch_size(2));
    let cell = ElementKind::cell();
    let contexts: Vec<_> = (0..3)
        .map(|item| {
            let path = IndexPath::new(0, item);
            controller.node_context(&cell, path, TestNode::block(path))
        })
        .collect();
    contexts[1].cancel_measurement();

    let mut recorder = BatchRecorder::new();
    controller.batch_layout_nodes_from_contexts(&contexts, |nodes, paths| {
        recorder.record(nodes, paths)
    });

    let counts: Vec<usize> = recorder.batches().iter().map(|batch| batch.node_count).collect();
    assert_eq!(counts, vec![1, 1]);
    assert_eq!(recorder.index_paths(), paths(&[(0, 0), (0, 2)]));
    assert_eq!(contexts[1].measurement_state(), MeasurementState::Cancelled);
}

#[test]
fn store_update_logging_does_not_change_results() {
    let (mut controller, _) =
        controller(DataControllerConfig::inline(3).with_store_update_logging(true));
    let cell = ElementKind::cell();
    with_sections(&mut controller, &cell, 1);
    let index_paths = paths(&[(0, 0), (0, 1)]);
    controller
        .insert_nodes(&cell, index_paths.clone(), blocks(&index_paths), |_, _| {})
        .unwrap();
    assert_eq!(stored_items(&controller, &cell), vec![vec![0, 1]]);
}

#[test]
fn controllers_can_share_a_measurement_pool() {
    let (mut first, _) = controller(DataControllerConfig::new(2));
    assert!(first.controlling_thread().is_current());
    assert_eq!(first.pool().worker_count(), 2);

    let mut second: DataController<TestNode> = DataController::with_pool(
        DataControllerConfig::new(2).with_batch_size(3),
        first.pool().clone(),
        FixedSizeProvider::new(range()),
        CountingItemSource::default(),
    );
    assert_eq!(
        second.controlling_thread().thread_id(),
        first.controlling_thread().thread_id()
    );

    let cell = ElementKind::cell();
    with_sections(&mut first, &cell, 1);
    with_sections(&mut second, &cell, 1);
    let index_paths = paths(&[(0, 0), (0, 1), (0, 2), (0, 3)]);
    second
        .insert_nodes(&cell, index_paths.clone(), blocks(&index_paths), |_, _| {})
        .unwrap();
    drop(first);

    let more = paths(&[(0, 4)]);
    second
        .insert_nodes(&cell, more.clone(), blocks(&more), |nodes, _| {
            assert_eq!(nodes.len(), 1)
        })
        .unwrap();
    assert_eq!(stored_items(&second, &cell), vec![vec![0, 1, 2, 3, 4]]);
    assert_eq!(second.pool().worker_count(), 2);
}
