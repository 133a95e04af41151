use serde::{Deserialize, Serialize};

/// 权限目录（固定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "user.manage")]
    UserManage,
    #[serde(rename = "role.manage")]
    RoleManage,
    #[serde(rename = "framework.view")]
    FrameworkView,
    #[serde(rename = "framework.manage")]
    FrameworkManage,
    #[serde(rename = "rubric.manage")]
    RubricManage,
    #[serde(rename = "observation.create")]
    ObservationCreate,
    #[serde(rename = "observation.view")]
    ObservationView,
    #[serde(rename = "evaluation.manage")]
    EvaluationManage,
    #[serde(rename = "survey.manage")]
    SurveyManage,
    #[serde(rename = "report.view")]
    ReportView,
}

impl Permission {
    pub const ALL: [Permission; 10] = [
        Permission::UserManage,
        Permission::RoleManage,
        Permission::FrameworkView,
        Permission::FrameworkManage,
        Permission::RubricManage,
        Permission::ObservationCreate,
        Permission::ObservationView,
        Permission::EvaluationManage,
        Permission::SurveyManage,
        Permission::ReportView,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UserManage => "user.manage",
            Permission::RoleManage => "role.manage",
            Permission::FrameworkView => "framework.view",
            Permission::FrameworkManage => "framework.manage",
            Permission::RubricManage => "rubric.manage",
            Permission::ObservationCreate => "observation.create",
            Permission::ObservationView => "observation.view",
            Permission::EvaluationManage => "evaluation.manage",
            Permission::SurveyManage => "survey.manage",
            Permission::ReportView => "report.view",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Permission::UserManage => "管理用户账号",
            Permission::RoleManage => "管理角色、院系与角色分配",
            Permission::FrameworkView => "查看培养方案及学生",
            Permission::FrameworkManage => "维护培养方案、课程、学习成果与映射",
            Permission::RubricManage => "维护评分量表",
            Permission::ObservationCreate => "录入观察评分",
            Permission::ObservationView => "查看观察记录",
            Permission::EvaluationManage => "管理 360° 评价活动",
            Permission::SurveyManage => "管理问卷",
            Permission::ReportView => "查看达成度与覆盖率报表",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid permission: {s}"))
    }
}

/// 用户持有的一条权限，`department_id` 为空表示全局生效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub permission: Permission,
    pub department_id: Option<i64>,
}

/// 用户的有效权限集合
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    pub is_admin: bool,
    pub grants: Vec<PermissionGrant>,
}

impl PermissionSet {
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            grants: Vec::new(),
        }
    }

    /// 任意范围持有该权限
    pub fn has_any_scope(&self, permission: Permission) -> bool {
        self.is_admin || self.grants.iter().any(|g| g.permission == permission)
    }

    /// 在指定院系范围内持有该权限（全局授权同样满足）
    pub fn allows(&self, permission: Permission, department_id: Option<i64>) -> bool {
        if self.is_admin {
            return true;
        }
        self.grants.iter().any(|g| {
            g.permission == permission
                && match g.department_id {
                    None => true,
                    Some(scope) => department_id == Some(scope),
                }
        })
    }
}

// 院系
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 角色
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<Permission>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 用户角色分配
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
    pub role_code: String,
    pub department_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(permission: Permission, department_id: Option<i64>) -> PermissionGrant {
        PermissionGrant {
            permission,
            department_id,
        }
    }

    #[test]
    fn permission_codes_parse_back() {
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
            assert_eq!(
                serde_json::to_value(p).unwrap(),
                serde_json::Value::String(p.as_str().to_string())
            );
        }
        assert!("framework.delete".parse::<Permission>().is_err());
    }

    #[test]
    fn global_grant_covers_every_department() {
        let set = PermissionSet {
            is_admin: false,
            grants: vec![grant(Permission::FrameworkManage, None)],
        };
        assert!(set.allows(Permission::FrameworkManage, Some(7)));
        assert!(set.allows(Permission::FrameworkManage, None));
        assert!(!set.allows(Permission::RubricManage, None));
    }

    #[test]
    fn scoped_grant_only_covers_its_department() {
        let set = PermissionSet {
            is_admin: false,
            grants: vec![grant(Permission::FrameworkManage, Some(3))],
        };
        assert!(set.has_any_scope(Permission::FrameworkManage));
        assert!(set.allows(Permission::FrameworkManage, Some(3)));
        assert!(!set.allows(Permission::FrameworkManage, Some(4)));
        assert!(!set.allows(Permission::FrameworkManage, None));
    }

    #[test]
    fn admin_passes_every_check() {
        let set = PermissionSet::admin();
        for p in Permission::ALL {
            assert!(set.allows(p, Some(99)));
        }
    }
}
