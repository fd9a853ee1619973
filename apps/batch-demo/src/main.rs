//! Lays out a synthetic two-section list through a `DataController`, then
//! removes a few rows and a section, logging each step.
//!
//! Run with `RUST_LOG=debug` to see every batch.

use anyhow::Context;
use nodeflow_core::{ElementKind, IndexPath, Size, SizeRange, TraitCollection};
use nodeflow_foundation::{DataController, DataControllerConfig, NodeBlock};

const SECTION_COUNTS: [usize; 2] = [24, 9];
const ROW_WIDTH: f32 = 360.0;

#[derive(Debug)]
struct Row {
    index_path: IndexPath,
    size: Size,
}

fn row_block(index_path: IndexPath) -> NodeBlock<Row> {
    Box::new(move |range: SizeRange, traits: &TraitCollection| {
        // Every fifth row wraps onto a second line.
        let lines = if index_path.item % 5 == 4 { 2.0 } else { 1.0 };
        let height = (18.0 * lines + 8.0) * traits.display_scale;
        Row {
            index_path,
            size: range.clamp(Size::new(range.max.width, height)),
        }
    })
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();

    let cell = ElementKind::cell();
    let config = DataControllerConfig::default().with_store_update_logging(true);
    let mut controller: DataController<Row> = DataController::new(
        config,
        |_: &ElementKind, _: IndexPath| {
            SizeRange::new(Size::new(ROW_WIDTH, 0.0), Size::new(ROW_WIDTH, 200.0))
        },
        || SECTION_COUNTS.to_vec(),
    );
    controller.set_environment_traits(TraitCollection::default().with_display_scale(2.0));

    let counts = controller.item_counts_from_data_source().to_vec();
    controller
        .insert_sections(
            &cell,
            vec![Vec::new(); counts.len()],
            &(0..counts.len()).collect::<Vec<_>>(),
            |_, indices| log::info!("sections ready: {indices:?}"),
        )
        .context("inserting sections")?;

    let index_paths: Vec<IndexPath> = counts
        .iter()
        .enumerate()
        .flat_map(|(section, &count)| (0..count).map(move |item| IndexPath::new(section, item)))
        .collect();
    let node_blocks = index_paths.iter().copied().map(row_block).collect();
    controller
        .insert_nodes(&cell, index_paths, node_blocks, |nodes, paths| {
            let height: f32 = nodes.iter().map(|row| row.size.height).sum();
            log::info!("measured {} rows, total height {height}", paths.len());
        })
        .context("inserting rows")?;

    controller
        .delete_nodes_of_kind(
            &cell,
            &[IndexPath::new(0, 0), IndexPath::new(0, 4), IndexPath::new(1, 8)],
            |removed, paths| log::info!("removed {} rows at {paths:?}", removed.len()),
        )
        .context("deleting rows")?;
    controller
        .delete_sections_of_kind(&cell, &[1], |indices| {
            log::info!("removed sections {indices:?}")
        })
        .context("deleting section")?;

    let remaining = controller.index_paths_for_editing_nodes_of_kind(&cell);
    if let Some(last) = remaining.last() {
        let row = controller
            .node_at_index_path(&cell, *last)
            .context("last row was not measured")?;
        log::info!("last row {} is {:?}", row.index_path, row.size);
    }
    println!(
        "{} rows in {} sections",
        remaining.len(),
        controller.number_of_sections(&cell)
    );
    Ok(())
}
