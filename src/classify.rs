//! Rule-based entity classification from free text.

use crate::constants::classify::{CPSU_ROSTER, TECHNOLOGY_RULES};
use crate::data::{OwnerClass, TechnologyType};
use crate::utils::normalize_key;

/// Classify a technology description.
///
/// Rule groups are evaluated in priority order (hybrid, wind, solar,
/// hydro/PSP, storage); the first group with a keyword contained in the
/// normalized text wins. Absent or unmatched text is `Other`.
pub fn classify_technology_type(text: Option<&str>) -> TechnologyType {
    let Some(key) = text.map(normalize_key).filter(|key| !key.is_empty()) else {
        return TechnologyType::default();
    };
    TECHNOLOGY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| key.contains(keyword)))
        .map(|(technology, _)| *technology)
        .unwrap_or_default()
}

/// Classify a developer name as state-owned (`CPSU`) or `Private`.
///
/// Roster fragments are matched as substrings of the normalized name.
pub fn classify_owner(developer: Option<&str>) -> OwnerClass {
    let Some(key) = developer.map(normalize_key).filter(|key| !key.is_empty()) else {
        return OwnerClass::default();
    };
    if CPSU_ROSTER.iter().any(|fragment| key.contains(fragment)) {
        OwnerClass::Cpsu
    } else {
        OwnerClass::Private
    }
}
