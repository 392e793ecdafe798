//! Domain primitives for the asset register.
//!
//! Newtype identifiers keep surrogate keys of different tables from being
//! mixed up, and the closed vocabularies (roles, maintenance states,
//! categories) live here as typed values instead of loose strings.

use crate::constants::assets::{CATEGORIES, REPAIRED_MARKER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Surrogate key of an asset row.
///
/// Distinct from the business key (`asset_id` column), which is the
/// human-assigned asset number.
///
/// # Examples
///
/// ```rust
/// use assetdesk::domain::AssetId;
///
/// let id = AssetId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(i32);

impl AssetId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for AssetId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<AssetId> for i32 {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

/// Surrogate key of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: '{value}'")]
pub struct ParseDomainError {
    kind: &'static str,
    value: String,
}

impl FromStr for Role {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(ParseDomainError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// Maintenance state of an asset.
///
/// Stored as a stable code; the localized labels used by legacy
/// spreadsheets are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Normal,
    UnderRepair,
    Decommissioned,
}

impl MaintenanceStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::UnderRepair => "under_repair",
            Self::Decommissioned => "decommissioned",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Normal => "正常",
            Self::UnderRepair => "维修中",
            Self::Decommissioned => "已报废",
        }
    }

    /// Status implied by the outcome text of the latest repair.
    ///
    /// Any result mentioning the repaired marker puts the asset back into
    /// service; everything else (including an empty result) leaves it under
    /// repair.
    #[must_use]
    pub fn from_repair_result(result: &str) -> Self {
        if result.contains(REPAIRED_MARKER) {
            Self::Normal
        } else {
            Self::UnderRepair
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaintenanceStatus {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "normal" | "正常" => Ok(Self::Normal),
            "under_repair" | "under-repair" | "维修中" => Ok(Self::UnderRepair),
            "decommissioned" | "已报废" => Ok(Self::Decommissioned),
            _ => Err(ParseDomainError {
                kind: "maintenance status",
                value: s.to_string(),
            }),
        }
    }
}

#[must_use]
pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_conversions() {
        let id = AssetId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(AssetId::from(7), id);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" User ".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn status_accepts_codes_and_labels() {
        assert_eq!(
            "under_repair".parse::<MaintenanceStatus>().unwrap(),
            MaintenanceStatus::UnderRepair
        );
        assert_eq!(
            "已报废".parse::<MaintenanceStatus>().unwrap(),
            MaintenanceStatus::Decommissioned
        );
        assert!("broken".parse::<MaintenanceStatus>().is_err());
    }

    #[test]
    fn status_derivation_from_repair_result() {
        assert_eq!(
            MaintenanceStatus::from_repair_result("已修复"),
            MaintenanceStatus::Normal
        );
        assert_eq!(
            MaintenanceStatus::from_repair_result("主板已修复，待观察"),
            MaintenanceStatus::Normal
        );
        assert_eq!(
            MaintenanceStatus::from_repair_result("送修中"),
            MaintenanceStatus::UnderRepair
        );
        assert_eq!(
            MaintenanceStatus::from_repair_result(""),
            MaintenanceStatus::UnderRepair
        );
    }

    #[test]
    fn category_table_is_closed() {
        assert!(is_known_category("笔记本电脑"));
        assert!(is_known_category("转接线"));
        assert!(!is_known_category("Laptop"));
    }

    #[test]
    fn parse_error_display() {
        let err = "x".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown role: 'x'");
    }
}
