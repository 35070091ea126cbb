#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Synthetic checkpoint/milestone assignment.
pub mod assignment;
/// Keyword-rule technology and ownership classification.
pub mod classify;
/// Command-line runner used by the `re_milestones` binary.
pub mod cli;
/// Header candidate lists and column resolution.
pub mod columns;
/// Pipeline configuration.
pub mod config;
/// Centralized constants used across resolution, classification, and export.
pub mod constants;
/// Canonical project, taxonomy, and assigned-table types.
pub mod data;
/// Assigned-table export.
pub mod export;
/// Project loading and the modification-time table cache.
pub mod ingestion;
/// Cell value normalization.
pub mod normalize;
/// End-to-end pipeline runner and notices.
pub mod pipeline;
/// Raw table readers (workbooks and delimited text).
pub mod source;
/// Snapshot aggregates and filters.
pub mod summary;
/// Taxonomy reconstruction from sparse sheets.
pub mod taxonomy;
/// Shared type aliases.
pub mod types;
/// Text normalization helpers.
pub mod utils;

mod errors;

pub use assignment::AssignmentEngine;
pub use classify::{classify_owner, classify_technology_type};
pub use columns::{CanonicalField, ColumnMapping, ResolvedColumns, resolve_column};
pub use config::PipelineConfig;
pub use data::{
    AssignedProject, AssignedTable, CanonicalProject, OwnerClass, Provenance, Taxonomy,
    TaxonomyGroup, TaxonomyNode, TechnologyType,
};
pub use errors::PipelineError;
pub use export::{ExportFormat, export_to_path, write_csv, write_json_lines, write_rows};
pub use ingestion::{TableCache, load_projects};
pub use normalize::{normalize_text, parse_capacity, parse_date, parse_serial};
pub use pipeline::{InputRole, Pipeline, PipelineNotice, PipelineOutcome};
pub use source::{CellValue, RawRecord, RawTable, TableSource};
pub use summary::{ProjectFilter, SnapshotSummary};
pub use taxonomy::{TaxonomyRow, build_taxonomy, taxonomy_from_table};
pub use types::{GroupName, HeaderName, ItemName, LogMessage, SheetName, StateName};
