//! Import/export tests against real CSV files.

use assetdesk::config::Config;
use assetdesk::domain::{MaintenanceStatus, UserId};
use assetdesk::models::{
    AssetFilter, AssetPatch, FilterField, NewAsset, NewAssignment, NewRepair,
};
use assetdesk::services::{RowOutcome, TransferError};
use assetdesk::state::AppState;
use std::path::PathBuf;

const ADMIN: UserId = UserId::new(1);

async fn test_state() -> AppState {
    let db_path = std::env::temp_dir().join(format!(
        "assetdesk-transfer-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    AppState::new(config)
        .await
        .expect("failed to create app state")
}

fn temp_csv(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "assetdesk-{label}-{}.csv",
        uuid::Uuid::new_v4()
    ))
}

/// Two assets with history, one without.
async fn populate(state: &AppState) {
    let mut laptop = NewAsset::new("A100", "Laptop", "笔记本电脑");
    laptop.brand_spec = "ThinkPad X1".to_string();
    laptop.purchase_date = Some("2023-09-01".to_string());
    laptop.location = "HQ".to_string();
    let laptop = state.assets.create(laptop, ADMIN).await.unwrap();

    state
        .assets
        .add_assignment(laptop, NewAssignment::open("alice", "2024-01-01"))
        .await
        .unwrap();
    let bob = state
        .assets
        .add_assignment(laptop, NewAssignment::open("bob", "2024-02-01"))
        .await
        .unwrap();
    state.assets.close_assignment(bob.id, "2024-03-01").await.unwrap();

    // Recorded out of date order; the later recording decides the status.
    state
        .assets
        .record_repair(laptop, NewRepair::new("2024-06-01", "keyboard", "已修复"), ADMIN)
        .await
        .unwrap();
    state
        .assets
        .record_repair(laptop, NewRepair::new("2024-05-01", "battery", "waiting for parts"), ADMIN)
        .await
        .unwrap();

    let mouse = state
        .assets
        .create(NewAsset::new("B200", "Mouse", "鼠标"), ADMIN)
        .await
        .unwrap();
    state
        .assets
        .add_assignment(mouse, NewAssignment::open("carol", "2024-04-01"))
        .await
        .unwrap();

    let mut cable = NewAsset::new("C300", "HDMI cable", "转接线");
    cable.quantity = 5;
    cable.maintenance_status = MaintenanceStatus::Decommissioned;
    state.assets.create(cable, ADMIN).await.unwrap();
}

#[tokio::test]
async fn export_writes_wide_rows() {
    let state = test_state().await;
    populate(&state).await;
    let path = temp_csv("export");

    let summary = state
        .transfer
        .export_assets(&path, &AssetFilter::new())
        .await
        .unwrap();
    assert_eq!(summary.assets, 3);
    assert_eq!(summary.columns, 10 + 2 * 3 + 2 * 3);

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header[0], "asset_id");
    assert!(header.contains(&"user_name2".to_string()));
    assert!(header.contains(&"repair_result2".to_string()));
    assert!(!header.contains(&"user_name3".to_string()));

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "A100");
    assert_eq!(&rows[2][2], "5");
    assert_eq!(&rows[2][8], "decommissioned");

    let col = |name: &str| header.iter().position(|h| h == name).unwrap();
    assert_eq!(&rows[0][col("end_date2")], "2024-03-01");
    assert_eq!(&rows[0][col("repair_date1")], "2024-06-01");
    assert_eq!(&rows[1][col("user_name2")], "");
}

#[tokio::test]
async fn export_honours_filters() {
    let state = test_state().await;
    populate(&state).await;
    let path = temp_csv("filtered");

    let filter = AssetFilter::new().with(FilterField::Keyword, "thinkpad");
    let summary = state.transfer.export_assets(&path, &filter).await.unwrap();
    assert_eq!(summary.assets, 1);
}

#[tokio::test]
async fn reimport_into_same_store_rejects_every_row() {
    let state = test_state().await;
    populate(&state).await;
    let path = temp_csv("roundtrip");

    state
        .transfer
        .export_assets(&path, &AssetFilter::new())
        .await
        .unwrap();
    let summary = state.transfer.import_assets(&path, ADMIN).await.unwrap();

    assert_eq!(summary.succeeded(), 0);
    assert_eq!(summary.failed(), 3);
    let errors: Vec<_> = summary.errors().collect();
    assert_eq!(errors[0], "Row 1: asset_id A100 already exists");

    let outcome = state.transfer.import_file(&path, ADMIN).await;
    assert!(outcome.success);
    assert!(outcome.message.starts_with("Import finished. Succeeded: 0, failed: 3."));
}

#[tokio::test]
async fn import_into_empty_store_reconstructs_history() {
    let source = test_state().await;
    populate(&source).await;
    let path = temp_csv("migrate");
    source
        .transfer
        .export_assets(&path, &AssetFilter::new())
        .await
        .unwrap();

    let target = test_state().await;
    let summary = target.transfer.import_assets(&path, ADMIN).await.unwrap();
    assert_eq!(summary.succeeded(), 3);
    assert!(matches!(
        &summary.rows[0].outcome,
        RowOutcome::Created { asset_number, assignments: 2, repairs: 2, warnings, .. }
            if asset_number == "A100" && warnings.is_empty()
    ));

    for number in ["A100", "B200", "C300"] {
        let before = source.assets.find_by_number(number).await.unwrap().unwrap();
        let after = target.assets.find_by_number(number).await.unwrap().unwrap();

        assert_eq!(after.asset.name, before.asset.name);
        assert_eq!(after.asset.quantity, before.asset.quantity);
        assert_eq!(after.asset.purchase_date, before.asset.purchase_date);
        assert_eq!(after.asset.maintenance_status, before.asset.maintenance_status);
        assert_eq!(after.assignments.len(), before.assignments.len());
        assert_eq!(after.repairs.len(), before.repairs.len());
        for (a, b) in after.assignments.iter().zip(&before.assignments) {
            assert_eq!(a.user_name, b.user_name);
            assert_eq!(a.end_date, b.end_date);
        }
    }
}

#[tokio::test]
async fn localized_headers_and_row_isolation() {
    let state = test_state().await;
    let path = temp_csv("localized");
    std::fs::write(
        &path,
        "资产编号,设备名称,类目,数量,设备位置,使用人1,使用开始时间1,维修时间1,故障原因1,维修结果1\n\
         P1,Projector,投影,,Room 1,dave,,2024-01-10,lamp,送修\n\
         P2,Chair,Furniture,1,,,,,,\n\
         P1,Projector again,投影,1,,,,,,\n\
         ,Nameless,投影,1,,,,,,\n\
         P3,Speaker,音响,2.0,,,,,,\n\
         P4,Speaker,音响,zero,,,,,,\n",
    )
    .unwrap();

    let summary = state.transfer.import_assets(&path, ADMIN).await.unwrap();
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 4);

    let errors: Vec<_> = summary.errors().collect();
    assert!(errors[0].starts_with("Row 2: "));
    assert!(errors[0].contains("Furniture"));
    assert_eq!(errors[1], "Row 3: asset_id P1 already exists");
    assert!(errors[2].starts_with("Row 4: "));
    assert!(errors[3].starts_with("Row 6: "));

    let p1 = state.assets.find_by_number("P1").await.unwrap().unwrap();
    assert_eq!(p1.asset.quantity, 1);
    assert_eq!(p1.asset.location, "Room 1");
    assert_eq!(p1.asset.maintenance_status, MaintenanceStatus::UnderRepair);
    assert_eq!(p1.assignments.len(), 1);
    assert!(p1.assignments[0].is_active());
    assert!(!p1.assignments[0].start_date.is_empty());

    let p3 = state.assets.find_by_number("P3").await.unwrap().unwrap();
    assert_eq!(p3.asset.quantity, 2);
}

#[tokio::test]
async fn missing_required_column_aborts_before_any_row() {
    let state = test_state().await;
    let path = temp_csv("no-category");
    std::fs::write(&path, "asset_id,name\nA1,Mouse\n").unwrap();

    let err = state.transfer.import_assets(&path, ADMIN).await.unwrap_err();
    assert!(matches!(err, TransferError::MissingColumn(ref c) if c == "category"));
    assert!(state.assets.list(&AssetFilter::new()).await.unwrap().is_empty());

    let outcome = state.transfer.import_file(&path, ADMIN).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("category"));
}

#[tokio::test]
async fn missing_file_is_reported() {
    let state = test_state().await;
    let path = temp_csv("does-not-exist");

    assert!(matches!(
        state.transfer.import_assets(&path, ADMIN).await,
        Err(TransferError::FileNotFound(_))
    ));

    let outcome = state.transfer.import_file(&path, ADMIN).await;
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Import failed: File not found"));
}

#[tokio::test]
async fn reported_errors_are_capped() {
    let state = test_state().await;
    let path = temp_csv("many-errors");

    let mut content = String::from("asset_id,name,category\n");
    for i in 0..15 {
        content.push_str(&format!("X{i},Thing,Unknown\n"));
    }
    std::fs::write(&path, content).unwrap();

    let outcome = state.transfer.import_file(&path, ADMIN).await;
    assert!(outcome.success);
    assert!(outcome.message.contains("failed: 15."));
    assert_eq!(outcome.message.lines().count(), 1 + 10);
}

#[tokio::test]
async fn undecodable_row_is_rejected_alone() {
    let state = test_state().await;
    let path = temp_csv("gbk-row");

    let mut content = "asset_id,name,category\nG1,Mouse,鼠标\nG2,".as_bytes().to_vec();
    // A GBK-encoded name.
    content.extend_from_slice(&[0xCA, 0xF3, 0xB1, 0xEA]);
    content.extend_from_slice(",鼠标\nG3,Mouse3,鼠标\n".as_bytes());
    std::fs::write(&path, content).unwrap();

    let summary = state.transfer.import_assets(&path, ADMIN).await.unwrap();
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);

    let errors: Vec<_> = summary.errors().collect();
    assert!(errors[0].starts_with("Row 2: "));
    assert!(state.assets.find_by_number("G1").await.unwrap().is_some());
    assert!(state.assets.find_by_number("G2").await.unwrap().is_none());
    assert!(state.assets.find_by_number("G3").await.unwrap().is_some());
}

#[tokio::test]
async fn decommissioned_status_survives_reimport() {
    let source = test_state().await;
    let id = source
        .assets
        .create(NewAsset::new("D1", "Old monitor", "电脑显示屏"), ADMIN)
        .await
        .unwrap();
    source
        .assets
        .record_repair(id, NewRepair::new("2024-01-10", "backlight", "已修复"), ADMIN)
        .await
        .unwrap();
    source
        .assets
        .update(
            id,
            AssetPatch {
                maintenance_status: Some(MaintenanceStatus::Decommissioned),
                ..AssetPatch::default()
            },
        )
        .await
        .unwrap();

    let path = temp_csv("decommissioned");
    source
        .transfer
        .export_assets(&path, &AssetFilter::new())
        .await
        .unwrap();

    let target = test_state().await;
    let summary = target.transfer.import_assets(&path, ADMIN).await.unwrap();
    assert_eq!(summary.succeeded(), 1);

    let imported = target.assets.find_by_number("D1").await.unwrap().unwrap();
    assert_eq!(imported.repairs.len(), 1);
    assert_eq!(
        imported.asset.maintenance_status,
        MaintenanceStatus::Decommissioned
    );
}

#[tokio::test]
async fn header_and_alias_for_same_column_are_refused() {
    let state = test_state().await;
    let path = temp_csv("repeated-column");
    std::fs::write(
        &path,
        "asset_id,资产编号,name,category\nA1,B1,Mouse,鼠标\n",
    )
    .unwrap();

    let err = state.transfer.import_assets(&path, ADMIN).await.unwrap_err();
    assert!(matches!(err, TransferError::DuplicateColumn(ref c) if c == "asset_id"));
    assert!(state.assets.list(&AssetFilter::new()).await.unwrap().is_empty());
}
