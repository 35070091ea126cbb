use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use indexmap::IndexMap;
use tracing::debug;

use crate::classify::{classify_owner, classify_technology_type};
use crate::columns::{CanonicalField, ColumnMapping, ResolvedColumns};
use crate::data::CanonicalProject;
use crate::errors::PipelineError;
use crate::normalize::{normalize_text, parse_capacity, parse_date, parse_serial};
use crate::source::{RawRecord, RawTable, open_table_source};
use crate::types::SheetName;

/// Marker that flags spreadsheet summary rows in the name or state column.
const TOTAL_MARKER: &str = "total";

/// Normalize and classify every data row of a project table.
///
/// Summary rows (name or state containing `total`) and rows with no name,
/// state or capacity are dropped. Fails only when none of those three
/// columns resolve; any other missing column leaves its field absent.
pub fn load_projects(
    table: &RawTable,
    mapping: &ColumnMapping,
    path: &Path,
) -> Result<Vec<CanonicalProject>, PipelineError> {
    let resolved = mapping.resolve(table);
    let identifying = [
        CanonicalField::ProjectName,
        CanonicalField::State,
        CanonicalField::Capacity,
    ];
    if !identifying.iter().any(|field| resolved.contains(*field)) {
        return Err(PipelineError::ColumnMissing {
            path: path.to_path_buf(),
            field: CanonicalField::ProjectName.as_str(),
        });
    }

    let mut projects = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for record in table.rows() {
        match project_from_record(record, &resolved) {
            Some(project) => projects.push(project),
            None => skipped += 1,
        }
    }
    debug!(
        "[re_milestones:ingest] loaded {} projects from {} (skipped={})",
        projects.len(),
        path.display(),
        skipped
    );
    Ok(projects)
}

fn project_from_record(record: &RawRecord, columns: &ResolvedColumns) -> Option<CanonicalProject> {
    let cell = move |field: CanonicalField| record.get_opt(columns.index(field));

    let project_name = normalize_text(cell(CanonicalField::ProjectName));
    let state = normalize_text(cell(CanonicalField::State));
    let capacity_mw = parse_capacity(cell(CanonicalField::Capacity));

    let is_total = [&project_name, &state].into_iter().flatten().any(|text| {
        text.to_lowercase().contains(TOTAL_MARKER)
    });
    if is_total || (project_name.is_none() && state.is_none() && capacity_mw.is_none()) {
        return None;
    }

    let developer = normalize_text(cell(CanonicalField::Developer));
    let project_type = normalize_text(cell(CanonicalField::ProjectType));
    Some(CanonicalProject {
        serial: parse_serial(cell(CanonicalField::Serial)),
        technology_type: classify_technology_type(project_type.as_deref()),
        owner_class: classify_owner(developer.as_deref()),
        commissioning_date: parse_date(cell(CanonicalField::CommissioningDate)),
        project_name,
        state,
        developer,
        capacity_mw,
    })
}

/// Thread-safe memo of parsed tables keyed by (path, sheet) and the file's
/// modification time. A changed modification time replaces the entry.
#[derive(Clone, Default)]
pub struct TableCache {
    inner: Arc<RwLock<TableCacheInner>>,
}

#[derive(Default)]
struct TableCacheInner {
    tables: IndexMap<(PathBuf, Option<SheetName>), CachedTable>,
    loads: u64,
    hits: u64,
}

struct CachedTable {
    modified: SystemTime,
    table: Arc<RawTable>,
}

impl TableCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table at `path`, reading it only when it is not cached or
    /// its modification time differs from the cached one.
    pub fn load(&self, path: &Path, sheet: Option<&str>) -> Result<Arc<RawTable>, PipelineError> {
        let modified = modification_time(path)?;
        let key = (path.to_path_buf(), sheet.map(str::to_string));
        {
            let mut inner = self.inner.write().expect("table cache poisoned");
            if let Some(table) = inner
                .tables
                .get(&key)
                .filter(|entry| entry.modified == modified)
                .map(|entry| Arc::clone(&entry.table))
            {
                inner.hits = inner.hits.saturating_add(1);
                debug!("[re_milestones:cache] hit {}", path.display());
                return Ok(table);
            }
        }

        let table = Arc::new(open_table_source(path, sheet).read_table()?);
        let mut inner = self.inner.write().expect("table cache poisoned");
        inner.loads = inner.loads.saturating_add(1);
        inner.tables.insert(
            key,
            CachedTable {
                modified,
                table: Arc::clone(&table),
            },
        );
        debug!(
            "[re_milestones:cache] loaded {} (rows={})",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Number of reads that went to disk.
    pub fn load_count(&self) -> u64 {
        self.inner.read().expect("table cache poisoned").loads
    }

    /// Number of reads served from memory.
    pub fn hit_count(&self) -> u64 {
        self.inner.read().expect("table cache poisoned").hits
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.inner.write().expect("table cache poisoned").tables.clear();
    }
}

fn modification_time(path: &Path) -> Result<SystemTime, PipelineError> {
    let metadata = std::fs::metadata(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => PipelineError::InputMissing {
            path: path.to_path_buf(),
        },
        _ => PipelineError::Io(err),
    })?;
    Ok(metadata.modified()?)
}
