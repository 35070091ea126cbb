//! Assigned-table export (CSV without an index column, or JSON lines).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use crate::data::AssignedProject;
use crate::errors::PipelineError;

/// Output encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    /// Comma-separated with a header row.
    Csv,
    /// One JSON object per line.
    JsonLines,
}

/// One exported row; field names are the consumer-facing column headers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Project_Name")]
    /// Project name.
    pub project_name: Option<&'a str>,
    #[serde(rename = "Developer")]
    /// Developer name.
    pub developer: Option<&'a str>,
    #[serde(rename = "Owner_Class")]
    /// Owner class label.
    pub owner_class: &'static str,
    #[serde(rename = "Project_Type")]
    /// Technology label.
    pub project_type: &'static str,
    #[serde(rename = "Capacity_MW")]
    /// Capacity in MW.
    pub capacity_mw: Option<f64>,
    #[serde(rename = "State")]
    /// State or union territory.
    pub state: Option<&'a str>,
    #[serde(rename = "Checkpoint")]
    /// Synthetic checkpoint.
    pub checkpoint: &'a str,
    #[serde(rename = "Milestone")]
    /// Synthetic milestone.
    pub milestone: &'a str,
    /// Synthetic assignment date.
    #[serde(rename = "Milestone_Start_Date")]
    pub milestone_start_date: NaiveDate,
    /// Commissioning date from the source row.
    #[serde(rename = "Date")]
    pub date: Option<NaiveDate>,
}

impl<'a> From<&'a AssignedProject> for ExportRow<'a> {
    fn from(row: &'a AssignedProject) -> Self {
        let project = &row.project;
        Self {
            project_name: project.project_name.as_deref(),
            developer: project.developer.as_deref(),
            owner_class: project.owner_class.as_str(),
            project_type: project.technology_type.as_str(),
            capacity_mw: project.capacity_mw,
            state: project.state.as_deref(),
            checkpoint: &row.group_name,
            milestone: &row.item_name,
            milestone_start_date: row.assigned_date,
            date: project.commissioning_date,
        }
    }
}

/// Write rows as CSV with a header line. An empty input still writes the
/// header.
pub fn write_csv<'a, I, W>(rows: I, writer: W) -> Result<usize, PipelineError>
where
    I: IntoIterator<Item = &'a AssignedProject>,
    W: Write,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(crate::constants::export::COLUMNS)?;
    let mut written = 0;
    for row in rows {
        csv_writer.serialize(ExportRow::from(row))?;
        written += 1;
    }
    csv_writer.flush()?;
    Ok(written)
}

/// Write rows as newline-delimited JSON objects.
pub fn write_json_lines<'a, I, W>(rows: I, mut writer: W) -> Result<usize, PipelineError>
where
    I: IntoIterator<Item = &'a AssignedProject>,
    W: Write,
{
    let mut written = 0;
    for row in rows {
        serde_json::to_writer(&mut writer, &ExportRow::from(row))?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Write rows in `format` to `writer`.
pub fn write_rows<'a, I, W>(rows: I, format: ExportFormat, writer: W) -> Result<usize, PipelineError>
where
    I: IntoIterator<Item = &'a AssignedProject>,
    W: Write,
{
    match format {
        ExportFormat::Csv => write_csv(rows, writer),
        ExportFormat::JsonLines => write_json_lines(rows, writer),
    }
}

/// Write rows to `path` (created or truncated), or stdout when `path` is `-`.
pub fn export_to_path<'a, I>(rows: I, format: ExportFormat, path: &Path) -> Result<usize, PipelineError>
where
    I: IntoIterator<Item = &'a AssignedProject>,
{
    let written = if path == Path::new("-") {
        write_rows(rows, format, io::stdout().lock())?
    } else {
        write_rows(rows, format, BufWriter::new(File::create(path)?))?
    };
    info!(
        "[re_milestones:export] wrote {} rows as {:?} to {}",
        written,
        format,
        path.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CanonicalProject, OwnerClass, TechnologyType};

    fn row() -> AssignedProject {
        AssignedProject {
            project: CanonicalProject {
                serial: Some(1),
                project_name: Some("Alpha, Solar Park".to_string()),
                state: Some("Rajasthan".to_string()),
                developer: Some("NTPC REL".to_string()),
                technology_type: TechnologyType::HydroPsp,
                owner_class: OwnerClass::Cpsu,
                capacity_mw: Some(1234.5),
                commissioning_date: None,
            },
            group_name: "Allocation".to_string(),
            item_name: "LOI".to_string(),
            assigned_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        }
    }

    #[test]
    fn csv_has_fixed_header_and_no_index() {
        let rows = vec![row()];
        let mut buffer = Vec::new();
        assert_eq!(write_csv(&rows, &mut buffer).unwrap(), 1);
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Project_Name,Developer,Owner_Class,Project_Type,Capacity_MW,State,Checkpoint,Milestone,Milestone_Start_Date,Date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"Alpha, Solar Park\",NTPC REL,CPSU,Hydro/PSP,1234.5,Rajasthan,Allocation,LOI,2024-02-29,"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_for_empty_table_is_header_only() {
        let mut buffer = Vec::new();
        assert_eq!(write_csv(&Vec::<AssignedProject>::new(), &mut buffer).unwrap(), 0);
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 1);
    }

    #[test]
    fn json_lines_use_export_column_names() {
        let rows = vec![row(), row()];
        let mut buffer = Vec::new();
        assert_eq!(
            write_rows(&rows, ExportFormat::JsonLines, &mut buffer).unwrap(),
            2
        );
        let text = String::from_utf8(buffer).unwrap();
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["Owner_Class"], "CPSU");
        assert_eq!(first["Milestone_Start_Date"], "2024-02-29");
        assert!(first["Date"].is_null());
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn export_to_path_creates_the_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("out.csv");
        let rows = vec![row()];
        assert_eq!(export_to_path(&rows, ExportFormat::Csv, &path).unwrap(), 1);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("Project_Name,"));
    }
}
