//! Substring filters for asset listings.

use crate::domain::MaintenanceStatus;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Column (or composed column expression) a filter term applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    AssetNumber,
    Name,
    Category,
    BrandSpec,
    Location,
    Notes,
    MaintenanceStatus,
    /// Free-text search over business key, name, brand/spec and location.
    Keyword,
}

impl FilterField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AssetNumber => "asset_id",
            Self::Name => "name",
            Self::Category => "category",
            Self::BrandSpec => "brand_spec",
            Self::Location => "location",
            Self::Notes => "notes",
            Self::MaintenanceStatus => "maintenance_status",
            Self::Keyword => "keyword",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "asset_id" | "asset_number" => Ok(Self::AssetNumber),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "brand_spec" => Ok(Self::BrandSpec),
            "location" => Ok(Self::Location),
            "notes" => Ok(Self::Notes),
            "maintenance_status" | "status" => Ok(Self::MaintenanceStatus),
            "keyword" | "q" | "search" => Ok(Self::Keyword),
            other => Err(format!("Unknown filter field: {other}")),
        }
    }
}

/// A set of ANDed substring conditions. Blank values are dropped on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFilter {
    terms: BTreeMap<FilterField, String>,
}

impl AssetFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the term for `field`.
    ///
    /// Status terms written as a known label are normalised to the stored
    /// code so `维修中` matches rows stored as `under_repair`.
    #[must_use]
    pub fn with(mut self, field: FilterField, value: impl AsRef<str>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FilterField, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.terms.remove(&field);
            return;
        }

        let value = if field == FilterField::MaintenanceStatus {
            value
                .parse::<MaintenanceStatus>()
                .map_or_else(|_| value.to_string(), |s| s.as_str().to_string())
        } else {
            value.to_string()
        };

        self.terms.insert(field, value);
    }

    #[must_use]
    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.terms.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.terms.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Parses `field=value` pairs, as given on the command line.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut filter = Self::new();
        for pair in pairs {
            let (field, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Expected field=value, got '{pair}'"))?;
            filter.set(field.parse()?, value);
        }
        Ok(filter)
    }
}
