//! The Essential Eight control catalog
//!
//! Fixed, government-defined data: eight control categories and four
//! maturity level definitions. Hard-coded because they don't change.

use serde::Serialize;

use crate::types::ControlId;

/// A catalog control: stable identifier plus human-readable name.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogEntry {
    pub id: ControlId,
    pub name: &'static str,
}

/// One maturity level definition with its severity color.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MaturityLevelDef {
    pub level: u8,
    pub name: &'static str,
    pub color: &'static str,
}

/// The eight controls, in declared (catalog) order.
pub const ESSENTIAL_EIGHT: [CatalogEntry; 8] = [
    CatalogEntry { id: ControlId::AppControl, name: "Application Control" },
    CatalogEntry { id: ControlId::PatchApps, name: "Patch Applications" },
    CatalogEntry {
        id: ControlId::ConfigureOffice,
        name: "Configure Microsoft Office Macro Settings",
    },
    CatalogEntry { id: ControlId::UserHardening, name: "User Application Hardening" },
    CatalogEntry { id: ControlId::RestrictAdmin, name: "Restrict Administrative Privileges" },
    CatalogEntry { id: ControlId::PatchOs, name: "Patch Operating Systems" },
    CatalogEntry { id: ControlId::Mfa, name: "Multi-factor Authentication" },
    CatalogEntry { id: ControlId::Backups, name: "Regular Backups" },
];

/// The four maturity levels, ordered by level ascending.
pub const MATURITY_LEVELS: [MaturityLevelDef; 4] = [
    MaturityLevelDef { level: 0, name: "Not Implemented", color: "red" },
    MaturityLevelDef { level: 1, name: "Partially Implemented", color: "orange" },
    MaturityLevelDef { level: 2, name: "Largely Implemented", color: "yellow" },
    MaturityLevelDef { level: 3, name: "Fully Implemented", color: "green" },
];

/// The fixed control listing, stable order as declared.
pub const fn essential_eight() -> &'static [CatalogEntry; 8] {
    &ESSENTIAL_EIGHT
}

/// The maturity level listing, ordered by level ascending.
pub const fn maturity_levels() -> &'static [MaturityLevelDef; 4] {
    &MATURITY_LEVELS
}

/// Display name for a catalog control.
pub fn control_name(id: ControlId) -> &'static str {
    // The catalog covers every ControlId variant, so the lookup cannot miss.
    ESSENTIAL_EIGHT
        .iter()
        .find(|entry| entry.id == id)
        .map_or("Unknown", |entry| entry.name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_has_eight_unique_controls() {
        let ids: HashSet<&str> = ESSENTIAL_EIGHT.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn maturity_levels_ascend_from_zero_to_three() {
        let levels: Vec<u8> = MATURITY_LEVELS.iter().map(|def| def.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn every_control_has_a_name() {
        for entry in essential_eight() {
            assert_eq!(control_name(entry.id), entry.name);
            assert!(!entry.name.is_empty());
        }
    }
}
