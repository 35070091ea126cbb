//! Checkpoint -> milestone taxonomy reconstruction from a sparse table.
//!
//! Source tables write the group label only on the first row of each group.
//! The builder recovers the grouping in two passes:
//! 1. boundaries: forward-fill the group label, dropping rows that precede
//!    the first labelled row, then stable-sort by the explicit ordering
//!    column when one exists;
//! 2. ranks: assign each group its first-appearance rank and collect its
//!    distinct items in source order.

use std::cmp::Ordering;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::columns::{CanonicalField, ColumnMapping};
use crate::constants::taxonomy::PLACEHOLDER_ITEM;
use crate::data::{Taxonomy, TaxonomyGroup};
use crate::errors::PipelineError;
use crate::normalize::{normalize_text, normalize_text_str};
use crate::source::{CellValue, RawTable};
use crate::types::{GroupName, ItemName};

/// One taxonomy source row after column resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaxonomyRow {
    /// Explicit ordering key (`Step No`), when the source has one.
    pub order: Option<f64>,
    /// Group label; blank on continuation rows.
    pub group: Option<GroupName>,
    /// Item label; blank rows contribute nothing.
    pub item: Option<ItemName>,
}

impl TaxonomyRow {
    /// Convenience constructor; blank strings are treated as absent.
    pub fn new(order: Option<f64>, group: &str, item: &str) -> Self {
        Self {
            order,
            group: normalize_text_str(group),
            item: normalize_text_str(item),
        }
    }

    fn is_blank(&self) -> bool {
        self.order.is_none() && self.group.is_none() && self.item.is_none()
    }
}

/// Build the ordered partition from rows in source order.
pub fn build_taxonomy<I>(rows: I) -> Taxonomy
where
    I: IntoIterator<Item = TaxonomyRow>,
{
    // Pass 1: group boundaries.
    let mut current: Option<GroupName> = None;
    let mut filled: Vec<(Option<f64>, GroupName, Option<ItemName>)> = Vec::new();
    for row in rows.into_iter().filter(|row| !row.is_blank()) {
        if let Some(group) = row.group {
            current = Some(group);
        }
        let Some(group) = current.clone() else {
            continue;
        };
        filled.push((row.order, group, row.item));
    }
    filled.sort_by(|left, right| compare_order(left.0, right.0));

    // Pass 2: first-appearance ranks.
    let mut grouped: IndexMap<GroupName, IndexSet<ItemName>> = IndexMap::new();
    for (_, group, item) in filled {
        let items = grouped.entry(group).or_default();
        if let Some(item) = item {
            items.insert(item);
        }
    }

    let groups = grouped
        .into_iter()
        .enumerate()
        .map(|(order, (name, items))| {
            let mut items: Vec<ItemName> = items.into_iter().collect();
            if items.is_empty() {
                items.push(PLACEHOLDER_ITEM.to_string());
            }
            TaxonomyGroup { order, name, items }
        })
        .collect();
    Taxonomy::from_groups(groups)
}

/// Resolve taxonomy columns on `table` and build the partition.
///
/// The group column is required; a missing item column leaves every group
/// with the placeholder item, and a missing ordering column keeps row order.
pub fn taxonomy_from_table(
    table: &RawTable,
    mapping: &ColumnMapping,
    path: &Path,
) -> Result<Taxonomy, PipelineError> {
    let resolved = mapping.resolve(table);
    let group_idx = resolved.index(CanonicalField::TaxonomyGroup).ok_or_else(|| {
        PipelineError::ColumnMissing {
            path: path.to_path_buf(),
            field: CanonicalField::TaxonomyGroup.as_str(),
        }
    })?;
    let order_idx = resolved.index(CanonicalField::TaxonomyOrder);
    let item_idx = resolved.index(CanonicalField::TaxonomyItem);

    let rows = table
        .rows()
        .iter()
        .filter(|record| !record.is_blank())
        .map(|record| TaxonomyRow {
            order: parse_order(record.get_opt(order_idx)),
            group: normalize_text(record.get(group_idx)),
            item: normalize_text(record.get_opt(item_idx)),
        });
    let taxonomy = build_taxonomy(rows);
    debug!(
        "[re_milestones:taxonomy] built {} groups / {} nodes from {} (ordered_by_column={})",
        taxonomy.len(),
        taxonomy.nodes().count(),
        path.display(),
        order_idx.is_some()
    );
    Ok(taxonomy)
}

fn parse_order(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Number(value) => *value,
        CellValue::Text(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Ascending by key; rows without a key sort after every keyed row.
fn compare_order(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
