use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use crate::types::{GroupName, ItemName, StateName};

/// Technology category derived from a project's free-text type description.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TechnologyType {
    /// Solar PV, including floating and rooftop.
    Solar,
    /// Onshore or offshore wind.
    Wind,
    /// Combined technologies such as solar-wind.
    Hybrid,
    /// Hydro and pumped storage.
    #[serde(rename = "Hydro/PSP")]
    HydroPsp,
    /// Battery energy storage.
    Storage,
    /// Anything unrecognized or missing.
    #[default]
    Other,
}

impl TechnologyType {
    /// Every category in reporting order.
    pub const ALL: [TechnologyType; 6] = [
        TechnologyType::Solar,
        TechnologyType::Wind,
        TechnologyType::Hybrid,
        TechnologyType::HydroPsp,
        TechnologyType::Storage,
        TechnologyType::Other,
    ];

    /// Display label used in exports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TechnologyType::Solar => "Solar",
            TechnologyType::Wind => "Wind",
            TechnologyType::Hybrid => "Hybrid",
            TechnologyType::HydroPsp => "Hydro/PSP",
            TechnologyType::Storage => "Storage",
            TechnologyType::Other => "Other",
        }
    }
}

impl fmt::Display for TechnologyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechnologyType {
    type Err = String;

    /// Case-insensitive match on the display label; `hydro` and `psp` also
    /// select `Hydro/PSP`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        if wanted == "hydro" || wanted == "psp" {
            return Ok(TechnologyType::HydroPsp);
        }
        TechnologyType::ALL
            .into_iter()
            .find(|technology| technology.as_str().to_lowercase() == wanted)
            .ok_or_else(|| {
                let labels: Vec<&str> = TechnologyType::ALL.iter().map(|t| t.as_str()).collect();
                format!("unknown technology '{value}' (expected one of: {})", labels.join(", "))
            })
    }
}

/// Ownership class derived from the developer name.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum OwnerClass {
    /// Central Public Sector Undertaking.
    #[serde(rename = "CPSU")]
    Cpsu,
    /// Any developer outside the CPSU roster.
    #[default]
    Private,
}

impl OwnerClass {
    /// Display label used in exports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OwnerClass::Cpsu => "CPSU",
            OwnerClass::Private => "Private",
        }
    }
}

impl fmt::Display for OwnerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized project entity produced from one source row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProject {
    /// Original row ordinal, when the source carries one.
    pub serial: Option<i64>,
    /// Project name.
    pub project_name: Option<String>,
    /// State or union territory.
    pub state: Option<StateName>,
    /// Developer name.
    pub developer: Option<String>,
    /// Classified technology.
    pub technology_type: TechnologyType,
    /// Classified ownership.
    pub owner_class: OwnerClass,
    /// Non-negative capacity in megawatts; absent is distinct from zero.
    pub capacity_mw: Option<f64>,
    /// Expected or actual commissioning date.
    pub commissioning_date: Option<NaiveDate>,
}

/// One (group, item) pair of the materialized taxonomy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyNode {
    /// Zero-based rank of the group in first-seen order.
    pub group_order: usize,
    /// Checkpoint name.
    pub group_name: GroupName,
    /// Milestone name.
    pub item_name: ItemName,
}

/// A checkpoint and its ordered, de-duplicated milestones (never empty).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyGroup {
    /// Zero-based rank in first-seen order.
    pub order: usize,
    /// Checkpoint name.
    pub name: GroupName,
    /// Milestones in source order.
    pub items: Vec<ItemName>,
}

/// Ordered checkpoint -> milestone partition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    groups: Vec<TaxonomyGroup>,
}

impl Taxonomy {
    pub(crate) fn from_groups(groups: Vec<TaxonomyGroup>) -> Self {
        Self { groups }
    }

    /// Groups in ascending `order`.
    pub fn groups(&self) -> &[TaxonomyGroup] {
        &self.groups
    }

    /// Group names in order.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|group| group.name.as_str()).collect()
    }

    /// Items for `group`, or `None` if the group is unknown.
    pub fn items_for(&self, group: &str) -> Option<&[ItemName]> {
        self.groups
            .iter()
            .find(|candidate| candidate.name == group)
            .map(|candidate| candidate.items.as_slice())
    }

    /// Flattened nodes in group order then item order.
    pub fn nodes(&self) -> impl Iterator<Item = TaxonomyNode> + '_ {
        self.groups.iter().flat_map(|group| {
            group.items.iter().map(move |item| TaxonomyNode {
                group_order: group.order,
                group_name: group.name.clone(),
                item_name: item.clone(),
            })
        })
    }

    /// True when there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// A project joined with a synthetic checkpoint/milestone and date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignedProject {
    /// Source project, unchanged.
    pub project: CanonicalProject,
    /// Drawn checkpoint.
    pub group_name: GroupName,
    /// Drawn milestone within the checkpoint.
    pub item_name: ItemName,
    /// Drawn date inside the assignment window.
    pub assigned_date: NaiveDate,
}

/// Where the group/item linkage of an assigned table came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// Seeded random draws standing in for a real linkage. Demo data only.
    SyntheticDemo {
        /// Seed the draws were made with.
        seed: u64,
    },
}

impl Provenance {
    /// True when rows must not be read as real project progress.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Provenance::SyntheticDemo { .. })
    }
}

/// Final joined table handed to presentation consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignedTable {
    /// How the group/item columns were produced.
    pub provenance: Provenance,
    /// One row per input project, in input order.
    pub rows: Vec<AssignedProject>,
}

impl AssignedTable {
    /// Empty table carrying the provenance of the run that produced it.
    pub fn empty(provenance: Provenance) -> Self {
        Self {
            provenance,
            rows: Vec::new(),
        }
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
