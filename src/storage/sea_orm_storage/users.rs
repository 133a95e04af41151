use super::{SeaOrmStorage, db_err, page_and_size};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

/// 邮箱统一按小写存储与比较
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 关键字同时匹配用户名、邮箱与显示名
fn search_condition(keyword: &str) -> Condition {
    let escaped = escape_like_pattern(keyword);
    Condition::any()
        .add(Column::Username.contains(&escaped))
        .add(Column::Email.contains(&escaped))
        .add(Column::DisplayName.contains(&escaped))
}

fn list_condition(query: &UserListQuery) -> Condition {
    let keyword = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    Condition::all()
        .add_option(keyword.map(search_condition))
        .add_option(
            query
                .account_type
                .map(|t| Column::AccountType.eq(t.to_string())),
        )
        .add_option(query.status.as_ref().map(|s| Column::Status.eq(s.to_string())))
}

impl SeaOrmStorage {
    async fn find_user_where(&self, condition: Condition) -> Result<Option<User>> {
        let row = Users::find()
            .filter(condition)
            .one(&self.db)
            .await
            .map_err(db_err("查询用户"))?;
        Ok(row.map(|m| m.into_user()))
    }

    /// 创建用户，新账号默认启用
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let inserted = ActiveModel {
            username: Set(req.username),
            email: Set(normalize_email(&req.email)),
            password_hash: Set(req.password),
            account_type: Set(req.account_type.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建用户"))?;

        Ok(inserted.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        self.find_user_where(Condition::all().add(Column::Id.eq(id)))
            .await
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user_where(Condition::all().add(Column::Username.eq(username)))
            .await
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user_where(Condition::all().add(Column::Email.eq(normalize_email(email))))
            .await
    }

    /// 登录标识：用户名精确匹配，邮箱忽略大小写
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let identifier = identifier.trim();
        self.find_user_where(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(normalize_email(identifier))),
        )
        .await
    }

    /// 分页列出用户，新建的在前
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = page_and_size(query.page, query.size);

        let paginator = Users::find()
            .filter(list_condition(&query))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(db_err("查询用户总数"))?;
        let pages = paginator.num_pages().await.map_err(db_err("查询用户页数"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询用户列表"))?;

        Ok(UserListResponse {
            items: rows.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(Column::LastLogin, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err("更新最后登录时间"))?;

        Ok(result.rows_affected > 0)
    }

    /// 只写入请求中出现的字段；用户不存在时返回 None
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let Some(current) = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询用户"))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = current.into();
        if let Some(email) = update.email {
            model.email = Set(normalize_email(&email));
        }
        if let Some(password_hash) = update.password {
            model.password_hash = Set(password_hash);
        }
        if let Some(account_type) = update.account_type {
            model.account_type = Set(account_type.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model.update(&self.db).await.map_err(db_err("更新用户"))?;
        Ok(Some(updated.into_user()))
    }

    /// 学生档案与角色分配随外键级联删除
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除用户"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(db_err("统计用户数量"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::AccountType;

    async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:").await.unwrap()
    }

    fn new_user(username: &str, email: &str, account_type: AccountType) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            account_type,
            display_name: None,
        }
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Lan.Vu@Example.EDU "), "lan.vu@example.edu");
    }

    #[actix_web::test]
    async fn login_identifier_matches_email_case_insensitively() {
        let storage = storage().await;
        let created = storage
            .create_user_impl(new_user("lanvu", "Lan.Vu@Example.edu", AccountType::Staff))
            .await
            .unwrap();
        assert_eq!(created.email, "lan.vu@example.edu");

        let by_email = storage
            .get_user_by_username_or_email_impl("LAN.VU@example.edu")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));
        assert!(
            storage
                .get_user_by_username_or_email_impl("LANVU")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn list_filters_combine() {
        let storage = storage().await;
        for (name, account_type) in [
            ("staff01", AccountType::Staff),
            ("staff02", AccountType::Staff),
            ("stud01", AccountType::Student),
        ] {
            storage
                .create_user_impl(new_user(name, &format!("{name}@example.edu"), account_type))
                .await
                .unwrap();
        }

        let page = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("01".to_string()),
                account_type: Some(AccountType::Staff),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].username, "staff01");
        assert_eq!(page.pagination.total, 1);
    }
}
