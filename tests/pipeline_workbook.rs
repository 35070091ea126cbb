use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

use re_milestones::config::PipelineConfig;
use re_milestones::data::{OwnerClass, TechnologyType};
use re_milestones::pipeline::{InputRole, Pipeline, PipelineNotice};
use re_milestones::source::{CellValue, TableSource, WorkbookSource};

fn write_project_workbook(path: &Path, sheet_name: &str) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd-mm-yyyy");

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "Quarterly report").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();
    let headers = [
        "S. No",
        "Project Name",
        "Developer",
        "Project\nType",
        "Capacity\n(MW)",
        "State",
        "Expected COD",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    sheet.write_number(1, 0, 1.0).unwrap();
    sheet.write_string(1, 1, "Alpha Solar Park").unwrap();
    sheet.write_string(1, 2, "NTPC Renewable Energy Ltd").unwrap();
    sheet.write_string(1, 3, "Solar").unwrap();
    sheet.write_number(1, 4, 250.0).unwrap();
    sheet.write_string(1, 5, "Rajasthan").unwrap();
    let cod = ExcelDateTime::from_ymd(2025, 6, 30).unwrap();
    sheet.write_datetime_with_format(1, 6, &cod, &date_format).unwrap();

    sheet.write_number(2, 0, 2.0).unwrap();
    sheet.write_string(2, 1, "Beta Battery").unwrap();
    sheet.write_string(2, 2, "Acme Power Pvt Ltd").unwrap();
    sheet.write_string(2, 3, "BESS").unwrap();
    sheet.write_string(2, 4, "1,000 MW").unwrap();
    sheet.write_string(2, 5, "Gujarat").unwrap();
    sheet.write_string(2, 6, "March 2026").unwrap();

    sheet.write_string(3, 1, "Total").unwrap();
    sheet.write_number(3, 4, 1250.0).unwrap();

    workbook.save(path).unwrap();
}

fn write_taxonomy_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").unwrap();
    let rows: [(f64, &str, &str); 4] = [
        (1.0, "Allocation", "LOI"),
        (2.0, "", "LOA"),
        (3.0, "Connectivity", "Applied"),
        (4.0, "", "Granted"),
    ];
    sheet.write_string(0, 0, "Step No").unwrap();
    sheet.write_string(0, 1, "Checkpoints").unwrap();
    sheet.write_string(0, 2, "Milestones").unwrap();
    for (idx, (step, group, item)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_number(row, 0, *step).unwrap();
        if !group.is_empty() {
            sheet.write_string(row, 1, *group).unwrap();
        }
        sheet.write_string(row, 2, *item).unwrap();
    }
    workbook.save(path).unwrap();
}

fn fixtures(project_sheet: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let projects = temp.path().join("projects.xlsx");
    let taxonomy = temp.path().join("milestones.xlsx");
    write_project_workbook(&projects, project_sheet);
    write_taxonomy_workbook(&taxonomy);
    (temp, projects, taxonomy)
}

fn config(projects: &Path, taxonomy: &Path) -> PipelineConfig {
    PipelineConfig::default()
        .with_project_path(projects)
        .with_taxonomy_path(taxonomy)
        .with_anchor_date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
}

#[test]
fn workbook_headers_are_cleaned_and_cells_typed() {
    let (_temp, projects, _) = fixtures("Under Construction Projects");
    let table = WorkbookSource::new(&projects)
        .with_sheet("under construction projects")
        .read_table()
        .unwrap();

    assert_eq!(table.headers()[3], "Project Type");
    assert_eq!(table.headers()[4], "Capacity (MW)");
    assert_eq!(table.rows()[0].get(4), &CellValue::Number(250.0));
    assert_eq!(table.len(), 3);
}

#[test]
fn configured_sheet_is_selected_case_insensitively() {
    let (_temp, projects, taxonomy) = fixtures(" under construction PROJECTS ");
    let outcome = Pipeline::new(config(&projects, &taxonomy)).run();

    assert!(outcome.notices.is_empty(), "{:?}", outcome.notices);
    assert_eq!(outcome.projects.len(), 2);

    let alpha = &outcome.projects[0];
    assert_eq!(alpha.serial, Some(1));
    assert_eq!(alpha.capacity_mw, Some(250.0));
    assert_eq!(alpha.owner_class, OwnerClass::Cpsu);
    assert_eq!(alpha.technology_type, TechnologyType::Solar);
    assert_eq!(alpha.commissioning_date, NaiveDate::from_ymd_opt(2025, 6, 30));

    let beta = &outcome.projects[1];
    assert_eq!(beta.capacity_mw, Some(1000.0));
    assert_eq!(beta.technology_type, TechnologyType::Storage);
    assert_eq!(beta.owner_class, OwnerClass::Private);
    assert_eq!(beta.commissioning_date, NaiveDate::from_ymd_opt(2026, 3, 1));

    assert_eq!(
        outcome.taxonomy.group_names(),
        vec!["Allocation", "Connectivity"]
    );
    assert_eq!(outcome.assigned.len(), 2);
}

#[test]
fn missing_sheet_is_a_schema_notice() {
    let (_temp, projects, taxonomy) = fixtures("Projects");
    let outcome = Pipeline::new(config(&projects, &taxonomy)).run();

    assert!(outcome.projects.is_empty());
    assert_eq!(outcome.taxonomy.len(), 2);
    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(outcome.notices[0].role(), InputRole::Projects);
    assert!(matches!(
        &outcome.notices[0],
        PipelineNotice::SchemaMissing { detail, .. } if detail.contains("Under Construction Projects")
    ));
}

#[test]
fn corrupt_workbook_is_an_unreadable_notice() {
    let (temp, projects, _) = fixtures("Under Construction Projects");
    let taxonomy = temp.path().join("broken.xlsx");
    std::fs::write(&taxonomy, b"PK not really a zip").unwrap();

    let outcome = Pipeline::new(config(&projects, &taxonomy)).run();
    assert_eq!(outcome.projects.len(), 2);
    assert!(outcome.assigned.is_empty());
    assert!(matches!(
        &outcome.notices[..],
        [PipelineNotice::Unreadable {
            role: InputRole::Taxonomy,
            ..
        }]
    ));
}
