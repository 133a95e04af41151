use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::departments::{
    ActiveModel as DepartmentActiveModel, Column as DepartmentColumn, Entity as Departments,
};
use crate::entity::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Column as RolePermissionColumn,
    Entity as RolePermissions,
};
use crate::entity::roles::{ActiveModel as RoleActiveModel, Column as RoleColumn, Entity as Roles};
use crate::entity::user_roles::{
    ActiveModel as UserRoleActiveModel, Column as UserRoleColumn, Entity as UserRoles,
};
use crate::errors::{AqmsError, Result};
use crate::models::access::{
    entities::{Department, Permission, PermissionGrant, Role, UserRoleAssignment},
    requests::{
        CreateDepartmentRequest, CreateRoleRequest, UpdateDepartmentRequest, UpdateRoleRequest,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 列出院系
    pub async fn list_departments_impl(&self) -> Result<Vec<Department>> {
        let rows = Departments::find()
            .order_by_asc(DepartmentColumn::Code)
            .all(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询院系列表失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_department()).collect())
    }

    pub async fn get_department_by_id_impl(&self, id: i64) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询院系失败: {e}")))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn create_department_impl(&self, req: CreateDepartmentRequest) -> Result<Department> {
        let now = chrono::Utc::now().timestamp();

        let model = DepartmentActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("创建院系失败: {e}")))?;

        Ok(result.into_department())
    }

    pub async fn update_department_impl(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        if self.get_department_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = DepartmentActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("更新院系失败: {e}")))?;

        Ok(Some(result.into_department()))
    }

    pub async fn delete_department_impl(&self, id: i64) -> Result<bool> {
        let result = Departments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("删除院系失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 读取角色的权限列表
    async fn role_permissions_of<C: ConnectionTrait>(
        conn: &C,
        role_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Permission>>> {
        let rows = RolePermissions::find()
            .filter(RolePermissionColumn::RoleId.is_in(role_ids.to_vec()))
            .order_by_asc(RolePermissionColumn::Id)
            .all(conn)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色权限失败: {e}")))?;

        let mut map: HashMap<i64, Vec<Permission>> = HashMap::new();
        for row in rows {
            // 目录之外的历史权限直接忽略
            if let Ok(p) = row.permission.parse::<Permission>() {
                map.entry(row.role_id).or_default().push(p);
            }
        }
        Ok(map)
    }

    /// 覆盖写入角色权限
    async fn replace_role_permissions<C: ConnectionTrait>(
        conn: &C,
        role_id: i64,
        permissions: &[Permission],
    ) -> Result<()> {
        RolePermissions::delete_many()
            .filter(RolePermissionColumn::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| AqmsError::database_operation(format!("清理角色权限失败: {e}")))?;

        let mut seen = Vec::new();
        for permission in permissions {
            if seen.contains(permission) {
                continue;
            }
            seen.push(*permission);

            RolePermissionActiveModel {
                role_id: Set(role_id),
                permission: Set(permission.to_string()),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| AqmsError::database_operation(format!("写入角色权限失败: {e}")))?;
        }
        Ok(())
    }

    pub async fn list_roles_impl(&self) -> Result<Vec<Role>> {
        let roles = Roles::find()
            .order_by_asc(RoleColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色列表失败: {e}")))?;

        let ids: Vec<i64> = roles.iter().map(|r| r.id).collect();
        let mut permissions = Self::role_permissions_of(&self.db, &ids).await?;

        Ok(roles
            .into_iter()
            .map(|r| {
                let perms = permissions.remove(&r.id).unwrap_or_default();
                r.into_role(perms)
            })
            .collect())
    }

    pub async fn get_role_by_id_impl(&self, id: i64) -> Result<Option<Role>> {
        let role = Roles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色失败: {e}")))?;

        match role {
            Some(role) => {
                let mut permissions = Self::role_permissions_of(&self.db, &[role.id]).await?;
                let perms = permissions.remove(&role.id).unwrap_or_default();
                Ok(Some(role.into_role(perms)))
            }
            None => Ok(None),
        }
    }

    pub async fn get_role_by_code_impl(&self, code: &str) -> Result<Option<Role>> {
        let role = Roles::find()
            .filter(RoleColumn::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色失败: {e}")))?;

        match role {
            Some(role) => self.get_role_by_id_impl(role.id).await,
            None => Ok(None),
        }
    }

    /// 创建角色及其权限
    pub async fn create_role_impl(&self, req: CreateRoleRequest) -> Result<Role> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AqmsError::database_operation(format!("开启事务失败: {e}")))?;

        let role = RoleActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AqmsError::database_operation(format!("创建角色失败: {e}")))?;

        Self::replace_role_permissions(&txn, role.id, &req.permissions).await?;

        txn.commit()
            .await
            .map_err(|e| AqmsError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_role_by_id_impl(role.id)
            .await?
            .ok_or_else(|| AqmsError::database_operation("角色创建后无法读取"))
    }

    pub async fn update_role_impl(
        &self,
        id: i64,
        update: UpdateRoleRequest,
    ) -> Result<Option<Role>> {
        if Roles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AqmsError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = RoleActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        model
            .update(&txn)
            .await
            .map_err(|e| AqmsError::database_operation(format!("更新角色失败: {e}")))?;

        if let Some(permissions) = update.permissions {
            Self::replace_role_permissions(&txn, id, &permissions).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AqmsError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_role_by_id_impl(id).await
    }

    pub async fn delete_role_impl(&self, id: i64) -> Result<bool> {
        let result = Roles::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("删除角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 为用户分配角色
    pub async fn assign_role_impl(
        &self,
        user_id: i64,
        role_id: i64,
        department_id: Option<i64>,
    ) -> Result<UserRoleAssignment> {
        let role = Roles::find_by_id(role_id)
            .one(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色失败: {e}")))?
            .ok_or_else(|| AqmsError::not_found(format!("角色 {role_id} 不存在")))?;

        // 同一范围内重复分配视为冲突
        let mut existing = UserRoles::find()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .filter(UserRoleColumn::RoleId.eq(role_id));
        existing = match department_id {
            Some(dept) => existing.filter(UserRoleColumn::DepartmentId.eq(dept)),
            None => existing.filter(UserRoleColumn::DepartmentId.is_null()),
        };
        let duplicated = existing
            .one(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色分配失败: {e}")))?;
        if duplicated.is_some() {
            return Err(AqmsError::conflict("该用户已在此范围内拥有该角色"));
        }

        let result = UserRoleActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            department_id: Set(department_id),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AqmsError::database_operation(format!("分配角色失败: {e}")))?;

        Ok(result.into_assignment(role.code))
    }

    pub async fn revoke_role_impl(&self, user_id: i64, assignment_id: i64) -> Result<bool> {
        let result = UserRoles::delete_many()
            .filter(UserRoleColumn::Id.eq(assignment_id))
            .filter(UserRoleColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("撤销角色失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_user_role_assignments_impl(
        &self,
        user_id: i64,
    ) -> Result<Vec<UserRoleAssignment>> {
        let rows = UserRoles::find()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .find_also_related(Roles)
            .order_by_asc(UserRoleColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色分配失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(assignment, role)| {
                let code = role.map(|r| r.code).unwrap_or_default();
                assignment.into_assignment(code)
            })
            .collect())
    }

    pub async fn list_role_user_ids_impl(&self, role_id: i64) -> Result<Vec<i64>> {
        let rows = UserRoles::find()
            .filter(UserRoleColumn::RoleId.eq(role_id))
            .all(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色分配失败: {e}")))?;

        let mut ids: Vec<i64> = rows.into_iter().map(|r| r.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    /// 汇总用户的有效权限
    pub async fn list_user_permissions_impl(&self, user_id: i64) -> Result<Vec<PermissionGrant>> {
        let assignments = UserRoles::find()
            .filter(UserRoleColumn::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| AqmsError::database_operation(format!("查询角色分配失败: {e}")))?;

        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let role_ids: Vec<i64> = assignments.iter().map(|a| a.role_id).collect();
        let permissions = Self::role_permissions_of(&self.db, &role_ids).await?;

        let mut grants: Vec<PermissionGrant> = Vec::new();
        for assignment in assignments {
            for permission in permissions.get(&assignment.role_id).into_iter().flatten() {
                let grant = PermissionGrant {
                    permission: *permission,
                    department_id: assignment.department_id,
                };
                if !grants.contains(&grant) {
                    grants.push(grant);
                }
            }
        }
        Ok(grants)
    }
}
