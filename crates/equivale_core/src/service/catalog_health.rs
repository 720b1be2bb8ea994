//! Start-up probe over every catalog partition.
//!
//! Reads each partition once and reports whether it is reachable. Never
//! fails as a whole: one broken table does not hide the state of the others.

use crate::model::catalog::{Catalog, FoodGroup};
use crate::repo::food_repo::FoodStore;
use log::{error, info};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PartitionStatus {
    Ok { rows: u64 },
    Unavailable { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionHealth {
    pub group: FoodGroup,
    #[serde(flatten)]
    pub status: PartitionStatus,
}

impl PartitionHealth {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, PartitionStatus::Ok { .. })
    }
}

/// Probes every partition in catalog order.
pub fn check_catalog<S: FoodStore>(store: &S, catalog: &Catalog) -> Vec<PartitionHealth> {
    catalog
        .groups()
        .iter()
        .map(|group| {
            let status = match store.count(*group) {
                Ok(rows) => {
                    info!(
                        "event=catalog_check module=service status=ok group={} rows={}",
                        group, rows
                    );
                    PartitionStatus::Ok { rows }
                }
                Err(err) => {
                    error!(
                        "event=catalog_check module=service status=error group={} error={}",
                        group, err
                    );
                    PartitionStatus::Unavailable {
                        message: err.to_string(),
                    }
                }
            };
            PartitionHealth {
                group: *group,
                status,
            }
        })
        .collect()
}
