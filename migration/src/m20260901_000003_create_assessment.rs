use sea_orm_migration::prelude::*;

use crate::m20260901_000001_create_accounts::Users;
use crate::m20260901_000002_create_curriculum::{Clos, Courses, Frameworks, Students};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 评分量表（JSON 定义行列）
        manager
            .create_table(
                Table::create()
                    .table(Rubrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rubrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rubrics::FrameworkId).big_integer().not_null())
                    .col(ColumnDef::new(Rubrics::CourseId).big_integer().null())
                    .col(ColumnDef::new(Rubrics::Title).string().not_null())
                    .col(ColumnDef::new(Rubrics::Description).text().null())
                    .col(ColumnDef::new(Rubrics::Definition).text().not_null())
                    .col(ColumnDef::new(Rubrics::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Rubrics::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Rubrics::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rubrics::Table, Rubrics::FrameworkId)
                            .to(Frameworks::Table, Frameworks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rubrics::Table, Rubrics::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rubrics::Table, Rubrics::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 观察记录
        manager
            .create_table(
                Table::create()
                    .table(Observations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Observations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Observations::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Observations::RubricId).big_integer().not_null())
                    .col(ColumnDef::new(Observations::ObserverId).big_integer().null())
                    .col(ColumnDef::new(Observations::CourseId).big_integer().null())
                    .col(ColumnDef::new(Observations::Source).string().not_null())
                    .col(ColumnDef::new(Observations::TotalScore).double().not_null())
                    .col(ColumnDef::new(Observations::MaxScore).double().not_null())
                    .col(ColumnDef::new(Observations::Comment).text().null())
                    .col(
                        ColumnDef::new(Observations::ObservedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Observations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Observations::Table, Observations::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Observations::Table, Observations::RubricId)
                            .to(Rubrics::Table, Rubrics::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Observations::Table, Observations::ObserverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 观察项得分
        manager
            .create_table(
                Table::create()
                    .table(ObservationItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ObservationItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ObservationItems::ObservationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ObservationItems::RowKey).string().not_null())
                    .col(ColumnDef::new(ObservationItems::CloId).big_integer().null())
                    .col(ColumnDef::new(ObservationItems::Score).double().not_null())
                    .col(ColumnDef::new(ObservationItems::MaxScore).double().not_null())
                    .col(ColumnDef::new(ObservationItems::Weight).double().not_null())
                    .col(ColumnDef::new(ObservationItems::Comment).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ObservationItems::Table, ObservationItems::ObservationId)
                            .to(Observations::Table, Observations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生 CLO 达成记录
        manager
            .create_table(
                Table::create()
                    .table(CloResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CloResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CloResults::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(CloResults::CloId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CloResults::ObservationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CloResults::ScorePercent).double().not_null())
                    .col(ColumnDef::new(CloResults::Status).string().not_null())
                    .col(ColumnDef::new(CloResults::RecordedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CloResults::Table, CloResults::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CloResults::Table, CloResults::CloId)
                            .to(Clos::Table, Clos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CloResults::Table, CloResults::ObservationId)
                            .to(Observations::Table, Observations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 360° 评价活动
        manager
            .create_table(
                Table::create()
                    .table(EvaluationCampaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationCampaigns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCampaigns::FrameworkId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCampaigns::RubricId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationCampaigns::Title).string().not_null())
                    .col(ColumnDef::new(EvaluationCampaigns::Description).text().null())
                    .col(
                        ColumnDef::new(EvaluationCampaigns::StartAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCampaigns::EndAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationCampaigns::Status).string().not_null())
                    .col(
                        ColumnDef::new(EvaluationCampaigns::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCampaigns::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationCampaigns::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationCampaigns::Table, EvaluationCampaigns::FrameworkId)
                            .to(Frameworks::Table, Frameworks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationCampaigns::Table, EvaluationCampaigns::RubricId)
                            .to(Rubrics::Table, Rubrics::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 360° 评价请求
        manager
            .create_table(
                Table::create()
                    .table(EvaluationRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::CampaignId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::EvaluatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::EvaluateeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::GroupRole)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(EvaluationRequests::ObservationId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationRequests::Table, EvaluationRequests::CampaignId)
                            .to(EvaluationCampaigns::Table, EvaluationCampaigns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationRequests::Table, EvaluationRequests::EvaluatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationRequests::Table, EvaluationRequests::EvaluateeId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationRequests::Table, EvaluationRequests::ObservationId)
                            .to(Observations::Table, Observations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_observations_student_id")
                    .table(Observations::Table)
                    .col(Observations::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clo_results_observation_clo")
                    .table(CloResults::Table)
                    .col(CloResults::ObservationId)
                    .col(CloResults::CloId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_clo_results_student_clo")
                    .table(CloResults::Table)
                    .col(CloResults::StudentId)
                    .col(CloResults::CloId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluation_requests_unique")
                    .table(EvaluationRequests::Table)
                    .col(EvaluationRequests::CampaignId)
                    .col(EvaluationRequests::EvaluatorId)
                    .col(EvaluationRequests::EvaluateeId)
                    .col(EvaluationRequests::GroupRole)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluation_requests_evaluator")
                    .table(EvaluationRequests::Table)
                    .col(EvaluationRequests::EvaluatorId)
                    .col(EvaluationRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EvaluationRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationCampaigns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CloResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ObservationItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Observations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rubrics::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Rubrics {
    #[sea_orm(iden = "rubrics")]
    Table,
    Id,
    FrameworkId,
    CourseId,
    Title,
    Description,
    Definition,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Observations {
    #[sea_orm(iden = "observations")]
    Table,
    Id,
    StudentId,
    RubricId,
    ObserverId,
    CourseId,
    Source,
    TotalScore,
    MaxScore,
    Comment,
    ObservedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ObservationItems {
    #[sea_orm(iden = "observation_items")]
    Table,
    Id,
    ObservationId,
    RowKey,
    CloId,
    Score,
    MaxScore,
    Weight,
    Comment,
}

#[derive(DeriveIden)]
enum CloResults {
    #[sea_orm(iden = "clo_results")]
    Table,
    Id,
    StudentId,
    CloId,
    ObservationId,
    ScorePercent,
    Status,
    RecordedAt,
}

#[derive(DeriveIden)]
enum EvaluationCampaigns {
    #[sea_orm(iden = "evaluation_campaigns")]
    Table,
    Id,
    FrameworkId,
    RubricId,
    Title,
    Description,
    StartAt,
    EndAt,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EvaluationRequests {
    #[sea_orm(iden = "evaluation_requests")]
    Table,
    Id,
    CampaignId,
    EvaluatorId,
    EvaluateeId,
    GroupRole,
    Status,
    ObservationId,
    SubmittedAt,
    CreatedAt,
}
