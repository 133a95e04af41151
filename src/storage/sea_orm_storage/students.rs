use std::collections::HashMap;

use super::{SeaOrmStorage, db_err, page_and_size};
use crate::entity::prelude::*;
use crate::entity::{students, users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    students::{
        entities::Student,
        requests::{NewStudent, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::entities::{AccountType, UserStatus},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建学生及其登录账号
    pub async fn create_student_impl(&self, student: NewStudent) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务"))?;

        let user = UserActiveModel {
            username: Set(student.username),
            email: Set(student.email),
            password_hash: Set(student.password_hash),
            account_type: Set(AccountType::Student.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(Some(student.full_name.clone())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建学生账号"))?;

        let created = StudentActiveModel {
            user_id: Set(user.id),
            framework_id: Set(student.framework_id),
            student_code: Set(student.student_code),
            full_name: Set(student.full_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err("创建学生"))?;

        txn.commit().await.map_err(db_err("提交事务"))?;

        Ok(created.into_student(Some(user)))
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生"))?;

        Ok(result.map(|(student, user)| student.into_student(user)))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(students::Column::UserId.eq(user_id))
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生"))?;

        Ok(result.map(|(student, user)| student.into_student(user)))
    }

    pub async fn get_student_by_code_impl(&self, student_code: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(students::Column::StudentCode.eq(student_code))
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生"))?;

        Ok(result.map(|(student, user)| student.into_student(user)))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = page_and_size(query.page, query.size);

        let mut select = Students::find();

        if let Some(framework_id) = query.framework_id {
            select = select.filter(students::Column::FrameworkId.eq(framework_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(students::Column::StudentCode.contains(&escaped))
                    .add(students::Column::FullName.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(students::Column::StudentCode)
            .paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(db_err("查询学生总数"))?;
        let pages = paginator.num_pages().await.map_err(db_err("查询学生页数"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询学生列表"))?;

        // 批量取回对应账号
        let user_ids: Vec<i64> = rows.iter().map(|s| s.user_id).collect();
        let mut accounts: HashMap<i64, users::Model> = Users::find()
            .filter(users::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(db_err("查询学生账号"))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(StudentListResponse {
            items: rows
                .into_iter()
                .map(|s| {
                    let user = accounts.remove(&s.user_id);
                    s.into_student(user)
                })
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新学生，邮箱与姓名同步到账号
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(existing) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生"))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务"))?;

        let mut model = StudentActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(framework_id) = update.framework_id {
            model.framework_id = Set(framework_id);
        }
        if let Some(student_code) = update.student_code {
            model.student_code = Set(student_code);
        }
        if let Some(ref full_name) = update.full_name {
            model.full_name = Set(full_name.clone());
        }
        model.update(&txn).await.map_err(db_err("更新学生"))?;

        if update.email.is_some() || update.full_name.is_some() {
            let mut account = UserActiveModel {
                id: Set(existing.user_id),
                updated_at: Set(now),
                ..Default::default()
            };
            if let Some(email) = update.email {
                account.email = Set(email);
            }
            if let Some(full_name) = update.full_name {
                account.display_name = Set(Some(full_name));
            }
            account
                .update(&txn)
                .await
                .map_err(db_err("更新学生账号"))?;
        }

        txn.commit().await.map_err(db_err("提交事务"))?;

        self.get_student_by_id_impl(id).await
    }

    /// 删除学生及其账号
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let Some(existing) = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询学生"))?
        else {
            return Ok(false);
        };

        let txn = self.db.begin().await.map_err(db_err("开启事务"))?;
        Students::delete_by_id(existing.id)
            .exec(&txn)
            .await
            .map_err(db_err("删除学生"))?;
        Users::delete_by_id(existing.user_id)
            .exec(&txn)
            .await
            .map_err(db_err("删除学生账号"))?;
        txn.commit().await.map_err(db_err("提交事务"))?;

        Ok(true)
    }

    pub async fn count_students_impl(&self, framework_id: i64) -> Result<u64> {
        Students::find()
            .filter(students::Column::FrameworkId.eq(framework_id))
            .count(&self.db)
            .await
            .map_err(db_err("统计学生数量"))
    }
}
