use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::assignment::AssignmentEngine;
use crate::columns::ColumnMapping;
use crate::constants::assignment::{DEFAULT_SEED, DEFAULT_WINDOW_DAYS};
use crate::constants::inputs::{
    PROJECT_FILE_CANDIDATES, PROJECT_SHEET, TAXONOMY_FILE, TAXONOMY_SHEET,
};
use crate::types::SheetName;

/// Inputs, column mappings and assignment parameters for one pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Project input candidates; the first existing file is read.
    pub project_paths: Vec<PathBuf>,
    /// Project sheet name (workbooks only). `None` reads the first sheet.
    pub project_sheet: Option<SheetName>,
    /// Taxonomy input file.
    pub taxonomy_path: PathBuf,
    /// Taxonomy sheet name (workbooks only). `None` reads the first sheet.
    pub taxonomy_sheet: Option<SheetName>,
    /// Header candidates for project fields.
    pub project_columns: ColumnMapping,
    /// Header candidates for taxonomy fields.
    pub taxonomy_columns: ColumnMapping,
    /// Seed for the synthetic assignment generator.
    pub seed: u64,
    /// Width in days of the synthetic date window.
    pub window_days: u32,
    /// Last day of the synthetic date window. `None` means today (local time).
    pub anchor_date: Option<NaiveDate>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_paths: PROJECT_FILE_CANDIDATES.iter().map(PathBuf::from).collect(),
            project_sheet: Some(PROJECT_SHEET.to_string()),
            taxonomy_path: PathBuf::from(TAXONOMY_FILE),
            taxonomy_sheet: Some(TAXONOMY_SHEET.to_string()),
            project_columns: ColumnMapping::projects(),
            taxonomy_columns: ColumnMapping::taxonomy(),
            seed: DEFAULT_SEED,
            window_days: DEFAULT_WINDOW_DAYS,
            anchor_date: None,
        }
    }
}

impl PipelineConfig {
    /// Replace the project candidates with a single path.
    pub fn with_project_path(self, path: impl Into<PathBuf>) -> Self {
        self.with_project_paths([path])
    }

    /// Replace the project candidates, tried in order.
    pub fn with_project_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.project_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Workbook sheet holding project rows; `None` reads the first sheet.
    pub fn with_project_sheet(mut self, sheet: Option<SheetName>) -> Self {
        self.project_sheet = sheet;
        self
    }

    /// Taxonomy input path.
    pub fn with_taxonomy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.taxonomy_path = path.into();
        self
    }

    /// Workbook sheet holding the taxonomy; `None` reads the first sheet.
    pub fn with_taxonomy_sheet(mut self, sheet: Option<SheetName>) -> Self {
        self.taxonomy_sheet = sheet;
        self
    }

    /// Header candidates for project fields.
    pub fn with_project_columns(mut self, columns: ColumnMapping) -> Self {
        self.project_columns = columns;
        self
    }

    /// Header candidates for taxonomy fields.
    pub fn with_taxonomy_columns(mut self, columns: ColumnMapping) -> Self {
        self.taxonomy_columns = columns;
        self
    }

    /// Seed for synthetic assignment.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Width of the synthetic date window.
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    /// Pin the end of the synthetic date window (reproducible runs).
    pub fn with_anchor_date(mut self, anchor_date: NaiveDate) -> Self {
        self.anchor_date = Some(anchor_date);
        self
    }

    /// Assignment engine for these parameters, anchored to today when no
    /// anchor date is pinned.
    pub fn assignment_engine(&self) -> AssignmentEngine {
        let anchor = self
            .anchor_date
            .unwrap_or_else(|| Local::now().date_naive());
        AssignmentEngine::new(self.seed, self.window_days, anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_inputs() {
        let config = PipelineConfig::default();
        assert_eq!(config.project_paths.len(), PROJECT_FILE_CANDIDATES.len());
        assert_eq!(config.project_sheet.as_deref(), Some("Under Construction Projects"));
        assert_eq!(config.taxonomy_sheet.as_deref(), Some("Sheet1"));
        assert_eq!(config.seed, 42);
        assert_eq!(config.window_days, 730);
        assert_eq!(config.anchor_date, None);
    }

    #[test]
    fn builders_override_fields() {
        let anchor = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let config = PipelineConfig::default()
            .with_project_path("projects.csv")
            .with_taxonomy_path("milestones.csv")
            .with_project_sheet(None)
            .with_seed(7)
            .with_window_days(30)
            .with_anchor_date(anchor);
        assert_eq!(config.project_paths, vec![PathBuf::from("projects.csv")]);
        assert_eq!(config.project_sheet, None);

        let engine = config.assignment_engine();
        assert_eq!(engine.seed(), 7);
        assert_eq!(engine.window_days(), 30);
        assert_eq!(engine.anchor_date(), anchor);
    }
}
