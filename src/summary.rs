//! Snapshot aggregates and drill-down filters over project tables.

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

use crate::data::{AssignedProject, CanonicalProject, OwnerClass, Taxonomy, TechnologyType};

/// Project count and summed capacity for one category value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryShare<K> {
    /// Category value.
    pub key: K,
    /// Projects in the category.
    pub projects: usize,
    /// Sum of present capacities; absent capacity contributes 0.
    pub capacity_mw: f64,
}

/// Project count for one commissioning month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// First day of the month.
    pub month: NaiveDate,
    /// Projects commissioning in the month.
    pub projects: usize,
}

/// Project count for one checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckpointCount {
    /// Checkpoint name.
    pub checkpoint: String,
    /// Projects assigned to the checkpoint.
    pub projects: usize,
}

/// Headline figures for a set of projects.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnapshotSummary {
    /// Number of projects.
    pub total_projects: usize,
    /// Sum of present capacities.
    pub total_capacity_mw: f64,
    /// Mean capacity with absent values counted as 0; 0 for no projects.
    pub average_capacity_mw: f64,
    /// Every technology category in reporting order, including zero counts.
    pub by_technology: Vec<CategoryShare<TechnologyType>>,
    /// CPSU first, then private.
    pub by_owner: Vec<CategoryShare<OwnerClass>>,
    /// Capacity-descending; projects without a state are not listed.
    pub by_state: Vec<CategoryShare<String>>,
    /// Capacity-descending, truncated to the requested count.
    pub top_developers: Vec<CategoryShare<String>>,
    /// Ascending by month; projects without a date are not listed.
    pub per_month: Vec<MonthCount>,
    /// Taxonomy order; empty when summarizing unassigned projects.
    pub per_checkpoint: Vec<CheckpointCount>,
}

impl SnapshotSummary {
    /// Summarize plain projects.
    pub fn from_projects<'a, I>(projects: I, top_developers: usize) -> Self
    where
        I: IntoIterator<Item = &'a CanonicalProject>,
    {
        let mut total_projects = 0usize;
        let mut total_capacity_mw = 0.0;
        let mut technology: IndexMap<TechnologyType, CategoryShare<TechnologyType>> =
            TechnologyType::ALL
                .into_iter()
                .map(|key| (key, share(key)))
                .collect();
        let mut owner: IndexMap<OwnerClass, CategoryShare<OwnerClass>> = IndexMap::new();
        let mut state: IndexMap<String, CategoryShare<String>> = IndexMap::new();
        let mut developer: IndexMap<String, CategoryShare<String>> = IndexMap::new();
        let mut month: IndexMap<NaiveDate, usize> = IndexMap::new();

        for project in projects {
            let capacity = project.capacity_mw.unwrap_or(0.0);
            total_projects += 1;
            total_capacity_mw += capacity;

            add(
                technology
                    .entry(project.technology_type)
                    .or_insert_with(|| share(project.technology_type)),
                capacity,
            );
            add(
                owner
                    .entry(project.owner_class)
                    .or_insert_with(|| share(project.owner_class)),
                capacity,
            );
            if let Some(name) = &project.state {
                add(
                    state.entry(name.clone()).or_insert_with(|| share(name.clone())),
                    capacity,
                );
            }
            if let Some(name) = &project.developer {
                add(
                    developer
                        .entry(name.clone())
                        .or_insert_with(|| share(name.clone())),
                    capacity,
                );
            }
            if let Some(first) = project.commissioning_date.and_then(|date| date.with_day(1)) {
                *month.entry(first).or_default() += 1;
            }
        }

        let mut by_owner: Vec<_> = owner.into_values().collect();
        by_owner.sort_by_key(|entry| entry.key);
        let by_state = by_capacity(state.into_values().collect());
        let mut top = by_capacity(developer.into_values().collect());
        top.truncate(top_developers);
        let mut per_month: Vec<MonthCount> = month
            .into_iter()
            .map(|(month, projects)| MonthCount { month, projects })
            .collect();
        per_month.sort_by_key(|entry| entry.month);

        Self {
            total_projects,
            total_capacity_mw,
            average_capacity_mw: if total_projects == 0 {
                0.0
            } else {
                total_capacity_mw / total_projects as f64
            },
            by_technology: technology.into_values().collect(),
            by_owner,
            by_state,
            top_developers: top,
            per_month,
            per_checkpoint: Vec::new(),
        }
    }

    /// Summarize assigned rows, adding per-checkpoint counts in taxonomy order.
    pub fn from_assigned<'a, I>(rows: I, taxonomy: &Taxonomy, top_developers: usize) -> Self
    where
        I: IntoIterator<Item = &'a AssignedProject>,
    {
        let rows: Vec<&AssignedProject> = rows.into_iter().collect();
        let mut summary =
            Self::from_projects(rows.iter().map(|row| &row.project), top_developers);
        summary.per_checkpoint = taxonomy
            .groups()
            .iter()
            .map(|group| CheckpointCount {
                checkpoint: group.name.clone(),
                projects: rows
                    .iter()
                    .filter(|row| row.group_name == group.name)
                    .count(),
            })
            .collect();
        summary
    }
}

fn share<K>(key: K) -> CategoryShare<K> {
    CategoryShare {
        key,
        projects: 0,
        capacity_mw: 0.0,
    }
}

fn add<K>(entry: &mut CategoryShare<K>, capacity: f64) {
    entry.projects += 1;
    entry.capacity_mw += capacity;
}

/// Sort capacity-descending; ties keep first-seen order.
fn by_capacity<K>(mut entries: Vec<CategoryShare<K>>) -> Vec<CategoryShare<K>> {
    entries.sort_by(|a, b| {
        b.capacity_mw
            .partial_cmp(&a.capacity_mw)
            .unwrap_or(Ordering::Equal)
    });
    entries
}

/// Drill-down selection over an assigned table. Unset criteria match all rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Keep only this technology.
    pub technology: Option<TechnologyType>,
    /// Keep only this checkpoint.
    pub group: Option<String>,
    /// Keep only this milestone.
    pub item: Option<String>,
}

impl ProjectFilter {
    /// Restrict to one technology.
    pub fn with_technology(mut self, technology: TechnologyType) -> Self {
        self.technology = Some(technology);
        self
    }

    /// Restrict to one checkpoint.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Restrict to one milestone.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.technology.is_none() && self.group.is_none() && self.item.is_none()
    }

    /// True when `row` meets every set criterion.
    pub fn matches(&self, row: &AssignedProject) -> bool {
        self.technology
            .is_none_or(|technology| row.project.technology_type == technology)
            && self
                .group
                .as_ref()
                .is_none_or(|group| &row.group_name == group)
            && self.item.as_ref().is_none_or(|item| &row.item_name == item)
    }

    /// Matching rows in their original order.
    pub fn apply<'a>(&self, rows: &'a [AssignedProject]) -> Vec<&'a AssignedProject> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{TaxonomyRow, build_taxonomy};

    fn project(
        developer: &str,
        state: Option<&str>,
        technology: TechnologyType,
        owner: OwnerClass,
        capacity: Option<f64>,
        date: Option<(i32, u32, u32)>,
    ) -> CanonicalProject {
        CanonicalProject {
            developer: Some(developer.to_string()),
            state: state.map(str::to_string),
            technology_type: technology,
            owner_class: owner,
            capacity_mw: capacity,
            commissioning_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..CanonicalProject::default()
        }
    }

    fn projects() -> Vec<CanonicalProject> {
        vec![
            project(
                "NTPC",
                Some("Rajasthan"),
                TechnologyType::Solar,
                OwnerClass::Cpsu,
                Some(300.0),
                Some((2025, 6, 30)),
            ),
            project(
                "Acme",
                Some("Gujarat"),
                TechnologyType::Wind,
                OwnerClass::Private,
                Some(500.0),
                Some((2025, 6, 2)),
            ),
            project(
                "Acme",
                None,
                TechnologyType::Solar,
                OwnerClass::Private,
                None,
                Some((2024, 1, 15)),
            ),
            project(
                "Bolt",
                Some("Rajasthan"),
                TechnologyType::Hybrid,
                OwnerClass::Private,
                Some(100.0),
                None,
            ),
        ]
    }

    #[test]
    fn totals_count_absent_capacity_as_zero() {
        let summary = SnapshotSummary::from_projects(&projects(), 15);
        assert_eq!(summary.total_projects, 4);
        assert!((summary.total_capacity_mw - 900.0).abs() < 1e-9);
        assert!((summary.average_capacity_mw - 225.0).abs() < 1e-9);
    }

    #[test]
    fn categories_are_grouped_and_ordered() {
        let summary = SnapshotSummary::from_projects(&projects(), 1);

        assert_eq!(summary.by_technology.len(), TechnologyType::ALL.len());
        assert_eq!(summary.by_technology[0].key, TechnologyType::Solar);
        assert_eq!(summary.by_technology[0].projects, 2);
        assert_eq!(summary.by_technology[5].projects, 0);

        assert_eq!(summary.by_owner[0].key, OwnerClass::Cpsu);
        assert_eq!(summary.by_owner[1].projects, 3);

        let states: Vec<&str> = summary.by_state.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(states, vec!["Gujarat", "Rajasthan"]);
        assert_eq!(summary.by_state[1].projects, 2);

        assert_eq!(summary.top_developers.len(), 1);
        assert_eq!(summary.top_developers[0].key, "Acme");
        assert_eq!(summary.top_developers[0].projects, 2);

        let months: Vec<(NaiveDate, usize)> = summary
            .per_month
            .iter()
            .map(|entry| (entry.month, entry.projects))
            .collect();
        assert_eq!(
            months,
            vec![
                (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1),
                (NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 2),
            ]
        );
        assert!(summary.per_checkpoint.is_empty());
    }

    #[test]
    fn empty_input_has_zero_average() {
        let summary = SnapshotSummary::from_projects(&Vec::<CanonicalProject>::new(), 15);
        assert_eq!(summary.total_projects, 0);
        assert_eq!(summary.average_capacity_mw, 0.0);
        assert!(summary.by_owner.is_empty());
    }

    fn assigned() -> (Taxonomy, Vec<AssignedProject>) {
        let taxonomy = build_taxonomy([
            TaxonomyRow::new(Some(1.0), "Allocation", "LOI"),
            TaxonomyRow::new(Some(2.0), "", "LOA"),
            TaxonomyRow::new(Some(3.0), "Connectivity", "Applied"),
        ]);
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let rows = projects()
            .into_iter()
            .zip([
                ("Connectivity", "Applied"),
                ("Allocation", "LOA"),
                ("Connectivity", "Applied"),
                ("Allocation", "LOI"),
            ])
            .map(|(project, (group, item))| AssignedProject {
                project,
                group_name: group.to_string(),
                item_name: item.to_string(),
                assigned_date: date,
            })
            .collect();
        (taxonomy, rows)
    }

    #[test]
    fn checkpoint_counts_follow_taxonomy_order() {
        let (taxonomy, rows) = assigned();
        let summary = SnapshotSummary::from_assigned(&rows, &taxonomy, 15);
        assert_eq!(
            summary.per_checkpoint,
            vec![
                CheckpointCount {
                    checkpoint: "Allocation".to_string(),
                    projects: 2
                },
                CheckpointCount {
                    checkpoint: "Connectivity".to_string(),
                    projects: 2
                },
            ]
        );
    }

    #[test]
    fn filters_combine_criteria() {
        let (_, rows) = assigned();
        assert_eq!(ProjectFilter::default().apply(&rows).len(), 4);
        assert!(ProjectFilter::default().is_empty());

        let solar = ProjectFilter::default().with_technology(TechnologyType::Solar);
        assert_eq!(solar.apply(&rows).len(), 2);

        let drill = solar.clone().with_group("Connectivity").with_item("Applied");
        assert_eq!(drill.apply(&rows).len(), 2);
        assert_eq!(
            ProjectFilter::default()
                .with_group("Allocation")
                .with_item("Applied")
                .apply(&rows)
                .len(),
            0
        );
    }
}
