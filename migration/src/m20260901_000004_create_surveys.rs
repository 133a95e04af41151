use sea_orm_migration::prelude::*;

use crate::m20260901_000001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 问卷
        manager
            .create_table(
                Table::create()
                    .table(Surveys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Surveys::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Surveys::Title).string().not_null())
                    .col(ColumnDef::new(Surveys::Description).text().null())
                    .col(
                        ColumnDef::new(Surveys::Anonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Surveys::Status).string().not_null())
                    .col(ColumnDef::new(Surveys::ClosesAt).big_integer().null())
                    .col(ColumnDef::new(Surveys::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Surveys::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Surveys::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Surveys::Table, Surveys::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 问卷题目
        manager
            .create_table(
                Table::create()
                    .table(SurveyQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyQuestions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyQuestions::SurveyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SurveyQuestions::Position).integer().not_null())
                    .col(ColumnDef::new(SurveyQuestions::Kind).string().not_null())
                    .col(ColumnDef::new(SurveyQuestions::Prompt).text().not_null())
                    .col(ColumnDef::new(SurveyQuestions::Options).text().null())
                    .col(ColumnDef::new(SurveyQuestions::Scale).integer().null())
                    .col(
                        ColumnDef::new(SurveyQuestions::Required)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SurveyQuestions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyQuestions::Table, SurveyQuestions::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 问卷邀请（按令牌访问）
        manager
            .create_table(
                Table::create()
                    .table(SurveyAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::SurveyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::Token)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SurveyAssignments::InviteeEmail).string().null())
                    .col(
                        ColumnDef::new(SurveyAssignments::InviteeUserId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(SurveyAssignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(SurveyAssignments::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SurveyAssignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyAssignments::Table, SurveyAssignments::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyAssignments::Table, SurveyAssignments::InviteeUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 问卷答案
        manager
            .create_table(
                Table::create()
                    .table(SurveyResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyResponses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyResponses::SurveyId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyResponses::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyResponses::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SurveyResponses::Answer).text().not_null())
                    .col(
                        ColumnDef::new(SurveyResponses::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyResponses::Table, SurveyResponses::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyResponses::Table, SurveyResponses::AssignmentId)
                            .to(SurveyAssignments::Table, SurveyAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveyResponses::Table, SurveyResponses::QuestionId)
                            .to(SurveyQuestions::Table, SurveyQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_survey_responses_survey_id")
                    .table(SurveyResponses::Table)
                    .col(SurveyResponses::SurveyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SurveyResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveyAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveyQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Surveys::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Surveys {
    #[sea_orm(iden = "surveys")]
    Table,
    Id,
    Title,
    Description,
    Anonymous,
    Status,
    ClosesAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SurveyQuestions {
    #[sea_orm(iden = "survey_questions")]
    Table,
    Id,
    SurveyId,
    Position,
    Kind,
    Prompt,
    Options,
    Scale,
    Required,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SurveyAssignments {
    #[sea_orm(iden = "survey_assignments")]
    Table,
    Id,
    SurveyId,
    Token,
    InviteeEmail,
    InviteeUserId,
    Status,
    CompletedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SurveyResponses {
    #[sea_orm(iden = "survey_responses")]
    Table,
    Id,
    SurveyId,
    AssignmentId,
    QuestionId,
    Answer,
    CreatedAt,
}
