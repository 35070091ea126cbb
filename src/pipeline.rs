//! End-to-end run: resolve inputs, load both tables, assign.
//!
//! `Pipeline::run` never fails. Every input problem becomes a
//! `PipelineNotice` in the outcome and the affected stage yields an empty
//! result.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::data::{AssignedTable, CanonicalProject, Taxonomy};
use crate::errors::PipelineError;
use crate::ingestion::{TableCache, load_projects};
use crate::source::first_existing;
use crate::taxonomy::taxonomy_from_table;
use crate::types::LogMessage;

/// Which input a notice refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRole {
    /// The project sheet.
    Projects,
    /// The checkpoint/milestone sheet.
    Taxonomy,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InputRole::Projects => "projects",
            InputRole::Taxonomy => "taxonomy",
        })
    }
}

/// Non-fatal problem encountered during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineNotice {
    /// No candidate input file exists.
    InputMissing {
        /// Input that was looked for.
        role: InputRole,
        /// Every candidate path, in the order tried.
        tried: Vec<PathBuf>,
    },
    /// The file exists but lacks the expected sheet or columns.
    SchemaMissing {
        /// Input with the unexpected layout.
        role: InputRole,
        /// File that was read.
        path: PathBuf,
        /// What was missing.
        detail: LogMessage,
    },
    /// The file exists but could not be parsed.
    Unreadable {
        /// Input that failed.
        role: InputRole,
        /// File that was read.
        path: PathBuf,
        /// Underlying error message.
        detail: LogMessage,
    },
    /// The taxonomy loaded but has no groups, so nothing can be assigned.
    EmptyTaxonomy {
        /// Taxonomy file that was read.
        path: PathBuf,
    },
}

impl PipelineNotice {
    fn from_error(role: InputRole, path: &Path, err: PipelineError) -> Self {
        match err {
            PipelineError::InputMissing { path } => PipelineNotice::InputMissing {
                role,
                tried: vec![path],
            },
            PipelineError::SheetMissing { .. } | PipelineError::ColumnMissing { .. } => {
                PipelineNotice::SchemaMissing {
                    role,
                    path: path.to_path_buf(),
                    detail: err.to_string(),
                }
            }
            other => PipelineNotice::Unreadable {
                role,
                path: path.to_path_buf(),
                detail: other.to_string(),
            },
        }
    }

    /// Input the notice refers to.
    pub fn role(&self) -> InputRole {
        match self {
            PipelineNotice::InputMissing { role, .. }
            | PipelineNotice::SchemaMissing { role, .. }
            | PipelineNotice::Unreadable { role, .. } => *role,
            PipelineNotice::EmptyTaxonomy { .. } => InputRole::Taxonomy,
        }
    }
}

impl fmt::Display for PipelineNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineNotice::InputMissing { role, tried } => {
                let tried: Vec<String> = tried
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect();
                write!(f, "{role} input not found (tried: {})", tried.join(", "))
            }
            PipelineNotice::SchemaMissing { role, detail, .. } => {
                write!(f, "{role} input has an unexpected layout: {detail}")
            }
            PipelineNotice::Unreadable { role, path, detail } => {
                write!(f, "{role} input '{}' is unreadable: {detail}", path.display())
            }
            PipelineNotice::EmptyTaxonomy { path } => write!(
                f,
                "taxonomy '{}' has no checkpoints; no assignments were made",
                path.display()
            ),
        }
    }
}

/// Everything one run produced.
#[derive(Clone, Debug)]
pub struct PipelineOutcome {
    /// Built taxonomy; empty when it could not be loaded.
    pub taxonomy: Taxonomy,
    /// Normalized projects in source order.
    pub projects: Vec<CanonicalProject>,
    /// Projects joined with synthetic checkpoints.
    pub assigned: AssignedTable,
    /// Problems met along the way.
    pub notices: Vec<PipelineNotice>,
}

/// Stateful runner; reuses parsed tables across runs until the underlying
/// files change.
#[derive(Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    cache: TableCache,
}

impl Pipeline {
    /// Runner with a fresh cache.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cache: TableCache::new(),
        }
    }

    /// Share a cache with other pipelines.
    pub fn with_cache(mut self, cache: TableCache) -> Self {
        self.cache = cache;
        self
    }

    /// Configuration used by every run.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parsed-table cache shared across runs.
    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    /// Run every stage. Never fails; see `PipelineOutcome::notices`.
    pub fn run(&self) -> PipelineOutcome {
        let started = Instant::now();
        let mut notices = Vec::new();

        let taxonomy = self.load_taxonomy(&mut notices);
        let projects = self.load_projects(&mut notices);
        let assigned = self.config.assignment_engine().assign(&projects, &taxonomy);

        for notice in &notices {
            warn!("[re_milestones:pipeline] {notice}");
        }
        info!(
            "[re_milestones:pipeline] run complete: groups={} projects={} assigned={} notices={} elapsed_ms={}",
            taxonomy.len(),
            projects.len(),
            assigned.len(),
            notices.len(),
            started.elapsed().as_millis()
        );
        PipelineOutcome {
            taxonomy,
            projects,
            assigned,
            notices,
        }
    }

    fn load_taxonomy(&self, notices: &mut Vec<PipelineNotice>) -> Taxonomy {
        let path = &self.config.taxonomy_path;
        let loaded = self
            .cache
            .load(path, self.config.taxonomy_sheet.as_deref())
            .and_then(|table| taxonomy_from_table(&table, &self.config.taxonomy_columns, path));
        match loaded {
            Ok(taxonomy) => {
                if taxonomy.is_empty() {
                    notices.push(PipelineNotice::EmptyTaxonomy { path: path.clone() });
                }
                taxonomy
            }
            Err(err) => {
                notices.push(PipelineNotice::from_error(InputRole::Taxonomy, path, err));
                Taxonomy::default()
            }
        }
    }

    fn load_projects(&self, notices: &mut Vec<PipelineNotice>) -> Vec<CanonicalProject> {
        let Some(path) = first_existing(&self.config.project_paths) else {
            notices.push(PipelineNotice::InputMissing {
                role: InputRole::Projects,
                tried: self.config.project_paths.clone(),
            });
            return Vec::new();
        };
        let loaded = self
            .cache
            .load(&path, self.config.project_sheet.as_deref())
            .and_then(|table| load_projects(&table, &self.config.project_columns, &path));
        match loaded {
            Ok(projects) => projects,
            Err(err) => {
                notices.push(PipelineNotice::from_error(InputRole::Projects, &path, err));
                Vec::new()
            }
        }
    }
}
