//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub framework_id: i64,
    #[sea_orm(unique)]
    pub student_code: String,
    pub full_name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::frameworks::Entity",
        from = "Column::FrameworkId",
        to = "super::frameworks::Column::Id",
        on_delete = "Cascade"
    )]
    Frameworks,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::frameworks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frameworks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 合并学生与其登录账号
    pub fn into_student(
        self,
        user: Option<super::users::Model>,
    ) -> crate::models::students::entities::Student {
        use crate::models::students::entities::Student;
        use crate::models::users::entities::UserStatus;
        use chrono::{DateTime, Utc};

        let (username, email, status) = match user {
            Some(u) => (
                u.username,
                u.email,
                u.status.parse::<UserStatus>().unwrap_or(UserStatus::Inactive),
            ),
            None => (String::new(), String::new(), UserStatus::Inactive),
        };

        Student {
            id: self.id,
            user_id: self.user_id,
            framework_id: self.framework_id,
            student_code: self.student_code,
            full_name: self.full_name,
            username,
            email,
            status,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
