use serde::Serialize;

use super::entities::Permission;

#[derive(Debug, Serialize)]
pub struct PermissionInfo {
    pub code: Permission,
    pub description: &'static str,
}

impl PermissionInfo {
    pub fn catalogue() -> Vec<PermissionInfo> {
        Permission::ALL
            .iter()
            .map(|p| PermissionInfo {
                code: *p,
                description: p.description(),
            })
            .collect()
    }
}
