//! 评分量表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rubrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub framework_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    /// JSON 格式的量表定义
    #[sea_orm(column_type = "Text")]
    pub definition: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::frameworks::Entity",
        from = "Column::FrameworkId",
        to = "super::frameworks::Column::Id",
        on_delete = "Cascade"
    )]
    Frameworks,
    #[sea_orm(has_many = "super::observations::Entity")]
    Observations,
}

impl Related<super::frameworks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frameworks.def()
    }
}

impl Related<super::observations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Observations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_rubric(self) -> crate::errors::Result<crate::models::rubrics::entities::Rubric> {
        use crate::errors::AqmsError;
        use crate::models::rubrics::entities::{Rubric, RubricDefinition};
        use chrono::{DateTime, Utc};

        let definition: RubricDefinition = serde_json::from_str(&self.definition).map_err(|e| {
            AqmsError::serialization(format!("量表 {} 定义解析失败: {e}", self.id))
        })?;

        Ok(Rubric {
            id: self.id,
            framework_id: self.framework_id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            definition,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
