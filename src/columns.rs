//! Column resolution: map arbitrary source headers onto canonical fields.

use std::collections::HashMap;

use crate::constants::columns;
use crate::source::RawTable;
use crate::types::HeaderName;

/// Pipeline-internal field names, independent of any source header spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    /// Row ordinal (`S. No`).
    Serial,
    /// Project name.
    ProjectName,
    /// State or union territory.
    State,
    /// Developer name, also used for owner classification.
    Developer,
    /// Free-text technology description.
    ProjectType,
    /// Capacity in MW.
    Capacity,
    /// Expected or actual commissioning date.
    CommissioningDate,
    /// Taxonomy step number.
    TaxonomyOrder,
    /// Checkpoint column of the taxonomy sheet.
    TaxonomyGroup,
    /// Milestone column of the taxonomy sheet.
    TaxonomyItem,
}

impl CanonicalField {
    /// Stable snake_case name used in errors and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Serial => "serial",
            CanonicalField::ProjectName => "project_name",
            CanonicalField::State => "state",
            CanonicalField::Developer => "developer",
            CanonicalField::ProjectType => "project_type",
            CanonicalField::Capacity => "capacity_mw",
            CanonicalField::CommissioningDate => "commissioning_date",
            CanonicalField::TaxonomyOrder => "step_no",
            CanonicalField::TaxonomyGroup => "checkpoint",
            CanonicalField::TaxonomyItem => "milestone",
        }
    }

    /// Built-in header candidates in priority order.
    pub fn default_candidates(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Serial => columns::SERIAL,
            CanonicalField::ProjectName => columns::PROJECT_NAME,
            CanonicalField::State => columns::STATE,
            CanonicalField::Developer => columns::DEVELOPER,
            CanonicalField::ProjectType => columns::PROJECT_TYPE,
            CanonicalField::Capacity => columns::CAPACITY,
            CanonicalField::CommissioningDate => columns::COMMISSIONING_DATE,
            CanonicalField::TaxonomyOrder => columns::TAXONOMY_ORDER,
            CanonicalField::TaxonomyGroup => columns::TAXONOMY_GROUP,
            CanonicalField::TaxonomyItem => columns::TAXONOMY_ITEM,
        }
    }
}

/// Resolve one canonical field to at most one actual header.
///
/// Exact (trimmed, case-insensitive) matches are tried for every candidate
/// first; only when none hits does substring containment run, candidates in
/// order and headers in original order. Blank candidates never match.
/// Returns `None` when the column is unavailable.
pub fn resolve_column<'a, S: AsRef<str>>(
    headers: &'a [HeaderName],
    candidates: &[S],
) -> Option<&'a str> {
    let mut exact: HashMap<String, &'a str> = HashMap::with_capacity(headers.len());
    for header in headers {
        exact
            .entry(header.trim().to_lowercase())
            .or_insert(header.as_str());
    }

    let keys: Vec<String> = candidates
        .iter()
        .map(|candidate| candidate.as_ref().trim().to_lowercase())
        .filter(|key| !key.is_empty())
        .collect();

    if let Some(hit) = keys.iter().find_map(|key| exact.get(key).copied()) {
        return Some(hit);
    }
    keys.iter().find_map(|key| {
        headers
            .iter()
            .find(|header| header.to_lowercase().contains(key.as_str()))
            .map(String::as_str)
    })
}

/// Candidate lists for every field of a project table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMapping {
    candidates: HashMap<CanonicalField, Vec<String>>,
}

impl ColumnMapping {
    /// Mapping over `fields` using their built-in candidates.
    pub fn for_fields(fields: &[CanonicalField]) -> Self {
        let candidates = fields
            .iter()
            .map(|field| {
                (
                    *field,
                    field
                        .default_candidates()
                        .iter()
                        .map(|candidate| candidate.to_string())
                        .collect(),
                )
            })
            .collect();
        Self { candidates }
    }

    /// Default mapping for project tables.
    pub fn projects() -> Self {
        Self::for_fields(&[
            CanonicalField::Serial,
            CanonicalField::ProjectName,
            CanonicalField::State,
            CanonicalField::Developer,
            CanonicalField::ProjectType,
            CanonicalField::Capacity,
            CanonicalField::CommissioningDate,
        ])
    }

    /// Default mapping for sparse taxonomy tables.
    pub fn taxonomy() -> Self {
        Self::for_fields(&[
            CanonicalField::TaxonomyOrder,
            CanonicalField::TaxonomyGroup,
            CanonicalField::TaxonomyItem,
        ])
    }

    /// Replace the candidates for `field` (highest priority first).
    pub fn with_candidates<I, S>(mut self, field: CanonicalField, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates
            .insert(field, candidates.into_iter().map(Into::into).collect());
        self
    }

    /// Candidates configured for `field`; empty when unmapped.
    pub fn candidates(&self, field: CanonicalField) -> &[String] {
        self.candidates
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve every mapped field against `table`'s headers.
    pub fn resolve(&self, table: &RawTable) -> ResolvedColumns {
        let indices = self
            .candidates
            .iter()
            .filter_map(|(field, candidates)| {
                resolve_column(table.headers(), candidates)
                    .and_then(|header| table.column_index(header))
                    .map(|idx| (*field, idx))
            })
            .collect();
        ResolvedColumns { indices }
    }
}

/// Column positions for the canonical fields that resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    indices: HashMap<CanonicalField, usize>,
}

impl ResolvedColumns {
    /// Position of `field`, or `None` when the column is unavailable.
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    /// True when `field` resolved to a column.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.indices.contains_key(&field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<HeaderName> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn exact_match_wins_over_substring() {
        let headers = headers(&["Capacity (MW)", "Capacity MW"]);
        assert_eq!(
            resolve_column(&headers, &["Capacity (MW)", "Capacity"]),
            Some("Capacity (MW)")
        );
    }

    #[test]
    fn exact_match_on_later_candidate_beats_substring_on_earlier() {
        let headers = headers(&["Name of Project", "Project"]);
        assert_eq!(resolve_column(&headers, &["Project Name", "Project"]), Some("Project"));
    }

    #[test]
    fn exact_match_ignores_case_and_padding() {
        let headers = headers(&["  state/ut ", "Developer"]);
        assert_eq!(resolve_column(&headers, &["State/UT"]), Some("  state/ut "));
    }

    #[test]
    fn substring_fallback_uses_candidate_then_header_order() {
        let headers = headers(&["Installed Capacity in MW", "Name of the Developer"]);
        assert_eq!(
            resolve_column(&headers, &["Capacity (MW)", "Capacity"]),
            Some("Installed Capacity in MW")
        );
        assert_eq!(
            resolve_column(&headers, &["Developer", "Agency"]),
            Some("Name of the Developer")
        );
    }

    #[test]
    fn unmatched_and_blank_candidates_resolve_to_none() {
        let headers = headers(&["Capacity (MW)"]);
        assert_eq!(resolve_column(&headers, &["State", "State/UT"]), None);
        assert_eq!(resolve_column(&headers, &["", "  "]), None);
        assert_eq!(resolve_column::<&str>(&[], &["State"]), None);
    }

    #[test]
    fn duplicate_headers_resolve_to_first_occurrence() {
        let headers = headers(&["State", "state"]);
        assert_eq!(resolve_column(&headers, &["STATE"]), Some("State"));
    }

    #[test]
    fn mapping_resolves_positions_and_supports_overrides() {
        let table = RawTable::new(
            ["S. No", "Name of Project", "Capacity\n(MW)", "Plant Location"],
            Vec::new(),
        );
        let mapping = ColumnMapping::projects()
            .with_candidates(CanonicalField::State, ["Plant Location"]);
        let resolved = mapping.resolve(&table);

        assert_eq!(resolved.index(CanonicalField::Serial), Some(0));
        assert_eq!(resolved.index(CanonicalField::ProjectName), Some(1));
        assert_eq!(resolved.index(CanonicalField::Capacity), Some(2));
        assert_eq!(resolved.index(CanonicalField::State), Some(3));
        assert!(!resolved.contains(CanonicalField::Developer));
        assert_eq!(
            mapping.candidates(CanonicalField::State),
            &["Plant Location".to_string()]
        );
    }
}
