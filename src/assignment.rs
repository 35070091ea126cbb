//! Seeded synthetic checkpoint/milestone assignment.
//!
//! There is no real linkage between projects and taxonomy nodes in the
//! source data, so the engine fabricates one for demos. Every table it
//! produces is tagged `Provenance::SyntheticDemo`.

use chrono::{Duration, Local, NaiveDate};
use rand::prelude::*;
use rand::seq::IndexedRandom;
use tracing::warn;

use crate::constants::assignment::{DEFAULT_SEED, DEFAULT_WINDOW_DAYS};
use crate::constants::taxonomy::PLACEHOLDER_ITEM;
use crate::data::{AssignedProject, AssignedTable, CanonicalProject, Provenance, Taxonomy};

/// SplitMix64 generator; stable across platforms and `rand` releases.
#[derive(Clone, Debug)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64_internal().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Draws one (group, item, date) triple per project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentEngine {
    seed: u64,
    window_days: u32,
    anchor_date: NaiveDate,
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, DEFAULT_WINDOW_DAYS, Local::now().date_naive())
    }
}

impl AssignmentEngine {
    /// Engine drawing dates from `[anchor_date - window_days, anchor_date]`.
    pub fn new(seed: u64, window_days: u32, anchor_date: NaiveDate) -> Self {
        Self {
            seed,
            window_days,
            anchor_date,
        }
    }

    /// Seed recorded in the table provenance.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Width of the date window in days.
    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Last day a synthetic date can fall on.
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    /// First day a synthetic date can fall on.
    pub fn window_start(&self) -> NaiveDate {
        self.anchor_date - Duration::days(i64::from(self.window_days))
    }

    /// Assign every project in input order.
    ///
    /// The generator is reseeded on each call, so the same engine, taxonomy
    /// and project sequence always produce the same table. Draws ignore
    /// project content. An empty taxonomy yields an empty table.
    pub fn assign(&self, projects: &[CanonicalProject], taxonomy: &Taxonomy) -> AssignedTable {
        let provenance = Provenance::SyntheticDemo { seed: self.seed };
        if taxonomy.is_empty() || projects.is_empty() {
            return AssignedTable::empty(provenance);
        }
        warn!(
            "[re_milestones:assign] synthetic demo data: checkpoint/milestone/date columns are seeded random draws (seed={}, window={}..={})",
            self.seed,
            self.window_start(),
            self.anchor_date
        );

        let mut rng = DeterministicRng::new(self.seed);
        let span = i64::from(self.window_days);
        let groups = taxonomy.groups();
        let mut rows = Vec::with_capacity(projects.len());
        for project in projects {
            let group = &groups[rng.random_range(0..groups.len())];
            let item = group
                .items
                .choose(&mut rng)
                .map(String::as_str)
                .unwrap_or(PLACEHOLDER_ITEM);
            let offset = rng.random_range(0..=span);
            rows.push(AssignedProject {
                project: project.clone(),
                group_name: group.name.clone(),
                item_name: item.to_string(),
                assigned_date: self.anchor_date - Duration::days(offset),
            });
        }
        AssignedTable { provenance, rows }
    }
}
