use crate::data::TechnologyType;
use crate::types::HeaderCandidate;

/// Header candidates, in priority order, for each canonical field.
pub mod columns {
    use super::HeaderCandidate;

    /// Original row ordinal.
    pub const SERIAL: &[HeaderCandidate] =
        &["S. No", "S No", "Sr. No", "Sl No", "Serial", "Sl. No."];
    /// Project display name.
    pub const PROJECT_NAME: &[HeaderCandidate] = &["Project Name", "Project", "Name"];
    /// State or union territory.
    pub const STATE: &[HeaderCandidate] = &["State", "State/UT", "Location State"];
    /// Developer / implementing agency.
    pub const DEVELOPER: &[HeaderCandidate] = &[
        "Developer",
        "Implementing Agency",
        "Agency",
        "Owner",
        "Developer Name",
    ];
    /// Free-text technology description fed to the technology classifier.
    pub const PROJECT_TYPE: &[HeaderCandidate] = &["Project Type", "Type", "Technology", "Mode"];
    /// Capacity in megawatts.
    pub const CAPACITY: &[HeaderCandidate] =
        &["Capacity (MW)", "Capacity MW", "Capacity in MW", "Capacity"];
    /// Commissioning (or expected commissioning) date.
    pub const COMMISSIONING_DATE: &[HeaderCandidate] = &[
        "COD",
        "Expected COD",
        "Date of Commissioning",
        "Start Date",
        "Date",
    ];

    /// Explicit taxonomy ordering column.
    pub const TAXONOMY_ORDER: &[HeaderCandidate] = &["Step No", "Step_No", "Step"];
    /// Sparse taxonomy group (checkpoint) column.
    pub const TAXONOMY_GROUP: &[HeaderCandidate] = &["Checkpoints", "Checkpoint"];
    /// Taxonomy item (milestone) column.
    pub const TAXONOMY_ITEM: &[HeaderCandidate] = &["Milestones", "Milestone"];
}

/// Keyword rule sets used by the entity classifier.
pub mod classify {
    use super::TechnologyType;

    /// Technology keyword groups in evaluation priority; first hit wins.
    pub const TECHNOLOGY_RULES: &[(TechnologyType, &[&str])] = &[
        (TechnologyType::Hybrid, &["hybrid", "mix"]),
        (TechnologyType::Wind, &["wind"]),
        (TechnologyType::Solar, &["solar", "pv"]),
        (TechnologyType::HydroPsp, &["hydro", "hydel", "psp", "pumped"]),
        (TechnologyType::Storage, &["battery", "storage", "bess"]),
    ];

    /// State-owned enterprise name fragments (acronyms and full names).
    pub const CPSU_ROSTER: &[&str] = &[
        "ntpc",
        "nhpc",
        "seci",
        "nlc",
        "sgel",
        "sjvn",
        "gail",
        "iocl",
        "ongc",
        "bhel",
        "pfc",
        "rec",
        "railway",
        "indian oil",
        "powergrid",
        "pgcil",
        "sail",
        "coal india",
        "cil",
    ];
}

/// Taxonomy materialization constants.
pub mod taxonomy {
    /// Item substituted into a group that has no milestones.
    pub const PLACEHOLDER_ITEM: &str = "General";
}

/// Synthetic assignment defaults.
pub mod assignment {
    /// Fixed seed that makes every run reproducible.
    pub const DEFAULT_SEED: u64 = 42;
    /// Width of the synthetic date window ending at the anchor date.
    pub const DEFAULT_WINDOW_DAYS: u32 = 730;
}

/// Default input locations and sheet names.
pub mod inputs {
    /// Project workbook file names tried in order.
    pub const PROJECT_FILE_CANDIDATES: &[&str] = &[
        "Quarterly_Report_on_Under_Construction_Renewable_Energy_Projects_as_on_June_2025.xlsx",
        "Quarterly_Report_on_Under_Construction_Renewable_Energy_Projects_as_on_June_2025..xlsx",
    ];
    /// Sheet holding the raw project rows.
    pub const PROJECT_SHEET: &str = "Under Construction Projects";
    /// Taxonomy workbook file name.
    pub const TAXONOMY_FILE: &str = "Milestones in RE projects.xlsx";
    /// Sheet holding the sparse checkpoint/milestone table.
    pub const TAXONOMY_SHEET: &str = "Sheet1";
    /// Env var overriding the project input path.
    pub const PROJECTS_ENV: &str = "RE_MILESTONES_PROJECTS";
    /// Env var overriding the taxonomy input path.
    pub const TAXONOMY_ENV: &str = "RE_MILESTONES_TAXONOMY";
    /// File extensions read with the delimited reader instead of the workbook reader.
    pub const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];
}

/// Export layout constants.
pub mod export {
    /// Column order of the exported assigned-project table.
    pub const COLUMNS: [&str; 10] = [
        "Project_Name",
        "Developer",
        "Owner_Class",
        "Project_Type",
        "Capacity_MW",
        "State",
        "Checkpoint",
        "Milestone",
        "Milestone_Start_Date",
        "Date",
    ];
    /// Default number of developers listed in the snapshot summary.
    pub const TOP_DEVELOPERS: usize = 15;
}
