//! 观察记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "observations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub rubric_id: i64,
    pub observer_id: Option<i64>,
    pub course_id: Option<i64>,
    pub source: String,
    pub total_score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
    pub observed_at: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Students,
    #[sea_orm(
        belongs_to = "super::rubrics::Entity",
        from = "Column::RubricId",
        to = "super::rubrics::Column::Id",
        on_delete = "Restrict"
    )]
    Rubrics,
    #[sea_orm(has_many = "super::observation_items::Entity")]
    ObservationItems,
    #[sea_orm(has_many = "super::clo_results::Entity")]
    CloResults,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::rubrics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rubrics.def()
    }
}

impl Related<super::observation_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ObservationItems.def()
    }
}

impl Related<super::clo_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CloResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_observation(self) -> crate::models::observations::entities::Observation {
        use crate::models::observations::entities::{Observation, ObservationSource};
        use chrono::{DateTime, Utc};

        Observation {
            id: self.id,
            student_id: self.student_id,
            rubric_id: self.rubric_id,
            observer_id: self.observer_id,
            course_id: self.course_id,
            source: self
                .source
                .parse::<ObservationSource>()
                .unwrap_or(ObservationSource::Direct),
            total_score: self.total_score,
            max_score: self.max_score,
            comment: self.comment,
            observed_at: DateTime::<Utc>::from_timestamp(self.observed_at, 0).unwrap_or_default(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
