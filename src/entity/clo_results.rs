//! 学生 CLO 达成结果实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clo_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub clo_id: i64,
    pub observation_id: i64,
    pub score_percent: f64,
    pub status: String,
    pub recorded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::observations::Entity",
        from = "Column::ObservationId",
        to = "super::observations::Column::Id",
        on_delete = "Cascade"
    )]
    Observations,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Students,
}

impl Related<super::observations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Observations.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    fn parsed_status(&self) -> crate::models::observations::entities::CloResultStatus {
        use crate::models::observations::entities::CloResultStatus;
        self.status
            .parse::<CloResultStatus>()
            .unwrap_or(CloResultStatus::NotAchieved)
    }

    pub fn into_clo_result(self) -> crate::models::observations::entities::CloResult {
        use chrono::{DateTime, Utc};

        crate::models::observations::entities::CloResult {
            status: self.parsed_status(),
            id: self.id,
            student_id: self.student_id,
            clo_id: self.clo_id,
            observation_id: self.observation_id,
            score_percent: self.score_percent,
            recorded_at: DateTime::<Utc>::from_timestamp(self.recorded_at, 0).unwrap_or_default(),
        }
    }

    pub fn into_latest(self) -> crate::models::attainment::entities::LatestCloResult {
        use chrono::{DateTime, Utc};

        crate::models::attainment::entities::LatestCloResult {
            status: self.parsed_status(),
            student_id: self.student_id,
            clo_id: self.clo_id,
            score_percent: self.score_percent,
            recorded_at: DateTime::<Utc>::from_timestamp(self.recorded_at, 0).unwrap_or_default(),
        }
    }
}
