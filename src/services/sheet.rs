//! Flat tabular layout of the asset register.
//!
//! One row per asset: the scalar fields, then `user_name{i}`,
//! `start_date{i}`, `end_date{i}` per assignment and `repair_date{i}`,
//! `fault_cause{i}`, `repair_result{i}` per repair, for `i = 1..`.
//! Headers written by older spreadsheet exports (`资产编号`, `使用人1`, ...)
//! are mapped onto the same names on the way in.

use crate::constants::assets::DEFAULT_QUANTITY;
use crate::models::{AssetDetails, NewAsset, NewAssignment, NewRepair};
use std::collections::HashMap;

pub const ASSET_NUMBER: &str = "asset_id";
pub const NAME: &str = "name";
pub const QUANTITY: &str = "quantity";
pub const CATEGORY: &str = "category";
pub const BRAND_SPEC: &str = "brand_spec";
pub const PURCHASE_DATE: &str = "purchase_date";
pub const IMAGE_PATH: &str = "image_path";
pub const LOCATION: &str = "location";
pub const MAINTENANCE_STATUS: &str = "maintenance_status";
pub const NOTES: &str = "notes";

pub const USER_NAME: &str = "user_name";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const REPAIR_DATE: &str = "repair_date";
pub const FAULT_CAUSE: &str = "fault_cause";
pub const REPAIR_RESULT: &str = "repair_result";

/// Scalar columns in export order.
pub const SCALAR_COLUMNS: [&str; 10] = [
    ASSET_NUMBER,
    NAME,
    QUANTITY,
    CATEGORY,
    BRAND_SPEC,
    PURCHASE_DATE,
    IMAGE_PATH,
    LOCATION,
    MAINTENANCE_STATUS,
    NOTES,
];

/// An import is refused up front unless all of these are present.
pub const REQUIRED_COLUMNS: [&str; 3] = [ASSET_NUMBER, NAME, CATEGORY];

const SCALAR_ALIASES: &[(&str, &str)] = &[
    ("asset_number", ASSET_NUMBER),
    ("资产编号", ASSET_NUMBER),
    ("设备名称", NAME),
    ("数量", QUANTITY),
    ("类目", CATEGORY),
    ("品牌规格", BRAND_SPEC),
    ("入库时间", PURCHASE_DATE),
    ("图片路径", IMAGE_PATH),
    ("设备位置", LOCATION),
    ("维修状态", MAINTENANCE_STATUS),
    ("备注", NOTES),
];

const INDEXED_ALIASES: &[(&str, &str)] = &[
    ("使用人", USER_NAME),
    ("使用开始时间", START_DATE),
    ("使用结束时间", END_DATE),
    ("维修时间", REPAIR_DATE),
    ("故障原因", FAULT_CAUSE),
    ("维修结果", REPAIR_RESULT),
];

/// Maps a raw header cell to its canonical column name.
///
/// Unknown headers are returned trimmed and lowercased so they still
/// take part in lookups without matching anything.
#[must_use]
pub fn canonical_header(raw: &str) -> String {
    let header = raw.trim_start_matches('\u{feff}').trim();

    if let Some((_, canonical)) = SCALAR_ALIASES.iter().find(|(alias, _)| *alias == header) {
        return (*canonical).to_string();
    }

    let digits_at = header
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map_or(header.len(), |(i, _)| i);
    let (prefix, index) = header.split_at(digits_at);

    if !index.is_empty() {
        if let Some((_, canonical)) = INDEXED_ALIASES.iter().find(|(alias, _)| *alias == prefix) {
            return format!("{canonical}{index}");
        }
    }

    header.to_ascii_lowercase()
}

/// Header row for an export whose widest asset has `assignments`
/// assignments and `repairs` repairs.
#[must_use]
pub fn export_header(assignments: usize, repairs: usize) -> Vec<String> {
    let mut header: Vec<String> = SCALAR_COLUMNS.iter().map(ToString::to_string).collect();
    for i in 1..=assignments {
        header.extend([
            format!("{USER_NAME}{i}"),
            format!("{START_DATE}{i}"),
            format!("{END_DATE}{i}"),
        ]);
    }
    for i in 1..=repairs {
        header.extend([
            format!("{REPAIR_DATE}{i}"),
            format!("{FAULT_CAUSE}{i}"),
            format!("{REPAIR_RESULT}{i}"),
        ]);
    }
    header
}

/// One export row, padded with blank cells up to the header width.
///
/// Repairs are written in the order given; callers pass them oldest first
/// so that importing the file re-derives the same status.
#[must_use]
pub fn export_row(details: &AssetDetails, assignments: usize, repairs: usize) -> Vec<String> {
    let asset = &details.asset;
    let mut row = vec![
        asset.asset_number.clone(),
        asset.name.clone(),
        asset.quantity.to_string(),
        asset.category.clone(),
        asset.brand_spec.clone(),
        asset.purchase_date.clone().unwrap_or_default(),
        asset.image_path.clone(),
        asset.location.clone(),
        asset.maintenance_status.as_str().to_string(),
        asset.notes.clone(),
    ];

    for i in 0..assignments {
        match details.assignments.get(i) {
            Some(a) => row.extend([
                a.user_name.clone(),
                a.start_date.clone(),
                a.end_date.clone().unwrap_or_default(),
            ]),
            None => row.extend([String::new(), String::new(), String::new()]),
        }
    }
    for i in 0..repairs {
        match details.repairs.get(i) {
            Some(r) => row.extend([
                r.repair_date.clone(),
                r.fault_cause.clone(),
                r.repair_result.clone(),
            ]),
            None => row.extend([String::new(), String::new(), String::new()]),
        }
    }
    row
}

/// A data row keyed by canonical column name.
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
    cells: HashMap<String, String>,
}

impl SheetRow {
    /// Pairs `headers` with `values`. Missing trailing cells read as blank;
    /// extra cells are dropped.
    pub fn new<'a, I>(headers: &[String], values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cells = headers
            .iter()
            .zip(values)
            .map(|(h, v)| (h.clone(), v.trim().to_string()))
            .collect();
        Self { cells }
    }

    /// The trimmed cell, or `None` when absent or blank.
    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn text_or_blank(&self, column: &str) -> String {
        self.text(column).unwrap_or_default().to_string()
    }

    /// Builds the asset described by the scalar columns.
    ///
    /// The maintenance status is applied only when the cell holds a known
    /// status; anything else leaves the default.
    pub fn to_new_asset(&self) -> Result<NewAsset, String> {
        let mut asset = NewAsset::new(
            self.text_or_blank(ASSET_NUMBER),
            self.text_or_blank(NAME),
            self.text_or_blank(CATEGORY),
        );
        asset.quantity = parse_quantity(self.text(QUANTITY))?;
        asset.brand_spec = self.text_or_blank(BRAND_SPEC);
        asset.purchase_date = self.text(PURCHASE_DATE).map(ToString::to_string);
        asset.image_path = self.text_or_blank(IMAGE_PATH);
        asset.location = self.text_or_blank(LOCATION);
        asset.notes = self.text_or_blank(NOTES);
        if let Some(status) = self.text(MAINTENANCE_STATUS).and_then(|s| s.parse().ok()) {
            asset.maintenance_status = status;
        }
        Ok(asset)
    }

    /// Assignments `1..` up to the first index without a holder name.
    /// A blank start date becomes `today`.
    #[must_use]
    pub fn assignments(&self, today: &str) -> Vec<NewAssignment> {
        (1..)
            .map_while(|i| {
                let user_name = self.text(&format!("{USER_NAME}{i}"))?;
                Some(NewAssignment {
                    user_name: user_name.to_string(),
                    start_date: self
                        .text(&format!("{START_DATE}{i}"))
                        .unwrap_or(today)
                        .to_string(),
                    end_date: self
                        .text(&format!("{END_DATE}{i}"))
                        .map(ToString::to_string),
                })
            })
            .collect()
    }

    /// Repairs `1..` up to the first index without a repair date.
    #[must_use]
    pub fn repairs(&self) -> Vec<NewRepair> {
        (1..)
            .map_while(|i| {
                let repair_date = self.text(&format!("{REPAIR_DATE}{i}"))?;
                Some(NewRepair::new(
                    repair_date,
                    self.text_or_blank(&format!("{FAULT_CAUSE}{i}")),
                    self.text_or_blank(&format!("{REPAIR_RESULT}{i}")),
                ))
            })
            .collect()
    }
}

/// Parses a quantity cell. Blank means the default; spreadsheet floats
/// such as `2.0` are accepted when integral.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_quantity(cell: Option<&str>) -> Result<i32, String> {
    let Some(cell) = cell else {
        return Ok(DEFAULT_QUANTITY);
    };

    let quantity = cell
        .parse::<i32>()
        .ok()
        .or_else(|| {
            cell.parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
                .map(|f| f as i32)
        })
        .ok_or_else(|| format!("invalid quantity '{cell}'"))?;

    if quantity < 1 {
        return Err(format!("quantity must be at least 1, got {quantity}"));
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetId, MaintenanceStatus};
    use crate::models::{Asset, Assignment, RepairRecord};

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| canonical_header(h)).collect()
    }

    #[test]
    fn localized_headers_are_canonicalised() {
        assert_eq!(canonical_header("资产编号"), "asset_id");
        assert_eq!(canonical_header(" 类目 "), "category");
        assert_eq!(canonical_header("\u{feff}asset_id"), "asset_id");
        assert_eq!(canonical_header("使用人2"), "user_name2");
        assert_eq!(canonical_header("使用开始时间10"), "start_date10");
        assert_eq!(canonical_header("维修结果1"), "repair_result1");
        assert_eq!(canonical_header("Name"), "name");
        assert_eq!(canonical_header("user_name3"), "user_name3");
        // An indexed alias without its index is not a column we know.
        assert_eq!(canonical_header("使用人"), "使用人");
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity(None), Ok(1));
        assert_eq!(parse_quantity(Some("3")), Ok(3));
        assert_eq!(parse_quantity(Some("2.0")), Ok(2));
        assert!(parse_quantity(Some("2.5")).is_err());
        assert!(parse_quantity(Some("0")).is_err());
        assert!(parse_quantity(Some("many")).is_err());
    }

    #[test]
    fn row_defaults_blank_cells() {
        let h = headers(&["资产编号", "设备名称", "类目", "数量", "入库时间"]);
        let row = SheetRow::new(&h, ["A1", "Mouse", "鼠标", "", " "]);
        let asset = row.to_new_asset().unwrap();

        assert_eq!(asset.asset_number, "A1");
        assert_eq!(asset.quantity, 1);
        assert!(asset.purchase_date.is_none());
        assert_eq!(asset.location, "");
        assert_eq!(asset.maintenance_status, MaintenanceStatus::Normal);
    }

    #[test]
    fn status_cell_sets_initial_status_when_known() {
        let h = headers(&["asset_id", "name", "category", "maintenance_status"]);

        let row = SheetRow::new(&h, ["A1", "Mouse", "鼠标", "已报废"]);
        assert_eq!(
            row.to_new_asset().unwrap().maintenance_status,
            MaintenanceStatus::Decommissioned
        );

        let row = SheetRow::new(&h, ["A1", "Mouse", "鼠标", "lost"]);
        assert_eq!(
            row.to_new_asset().unwrap().maintenance_status,
            MaintenanceStatus::Normal
        );
    }

    #[test]
    fn indexed_groups_stop_at_first_gap() {
        let h = headers(&[
            "asset_id",
            "user_name1",
            "start_date1",
            "end_date1",
            "user_name2",
            "start_date2",
            "user_name3",
            "repair_date1",
            "repair_result1",
        ]);
        let row = SheetRow::new(
            &h,
            [
                "A1",
                "alice",
                "2024-01-01",
                "2024-02-01",
                "",
                "2024-03-01",
                "carol",
                "2024-05-05",
                "已修复",
            ],
        );

        let assignments = row.assignments("2026-01-01");
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].user_name, "alice");
        assert_eq!(assignments[0].end_date.as_deref(), Some("2024-02-01"));

        let repairs = row.repairs();
        assert_eq!(repairs.len(), 1);
        assert_eq!(repairs[0].fault_cause, "");
        assert_eq!(repairs[0].repair_result, "已修复");
    }

    #[test]
    fn blank_start_date_defaults_to_today() {
        let h = headers(&["使用人1", "使用开始时间1"]);
        let row = SheetRow::new(&h, ["bob", ""]);
        let assignments = row.assignments("2026-10-16");
        assert_eq!(assignments[0].start_date, "2026-10-16");
        assert!(assignments[0].end_date.is_none());
    }

    #[test]
    fn export_rows_are_padded_to_header_width() {
        let details = AssetDetails {
            asset: Asset {
                id: AssetId::new(1),
                asset_number: "A1".to_string(),
                name: "Laptop".to_string(),
                quantity: 1,
                category: "笔记本电脑".to_string(),
                brand_spec: String::new(),
                purchase_date: None,
                image_path: String::new(),
                location: "HQ".to_string(),
                notes: String::new(),
                maintenance_status: MaintenanceStatus::UnderRepair,
                created_by: None,
                created_at: String::new(),
                updated_at: String::new(),
            },
            assignments: vec![Assignment {
                id: 1,
                asset_id: AssetId::new(1),
                user_name: "alice".to_string(),
                start_date: "2024-01-01".to_string(),
                end_date: None,
            }],
            repairs: vec![RepairRecord {
                id: 1,
                asset_id: AssetId::new(1),
                repair_date: "2024-02-01".to_string(),
                fault_cause: "screen".to_string(),
                repair_result: "pending".to_string(),
                created_by: None,
                created_at: String::new(),
            }],
        };

        let header = export_header(2, 1);
        let row = export_row(&details, 2, 1);

        assert_eq!(header.len(), 10 + 6 + 3);
        assert_eq!(row.len(), header.len());
        assert_eq!(header[10], "user_name1");
        assert_eq!(header[16], "repair_date1");
        assert_eq!(row[8], "under_repair");
        assert_eq!(row[12], "");
        assert_eq!(row[13], "");
        assert_eq!(row[18], "pending");
    }
}
