use super::{SeaOrmStorage, db_err, page_and_size};
use crate::entity::prelude::*;
use crate::entity::{survey_assignments, survey_questions, survey_responses, surveys};
use crate::errors::{AqmsError, Result};
use crate::models::{
    PaginationInfo,
    surveys::{
        entities::{
            AnswerValue, AssignmentStatus, QuestionKind, Survey, SurveyAssignment, SurveyQuestion,
            SurveyResponseRecord, SurveyStatus,
        },
        requests::{
            CreateQuestionRequest, CreateSurveyRequest, NewSurveyAssignment, SurveyListQuery,
            UpdateQuestionRequest, UpdateSurveyRequest,
        },
        responses::SurveyListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建问卷（初始为草稿）
    pub async fn create_survey_impl(
        &self,
        req: CreateSurveyRequest,
        created_by: i64,
    ) -> Result<Survey> {
        let now = chrono::Utc::now().timestamp();

        let result = SurveyActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            anonymous: Set(req.anonymous),
            status: Set(SurveyStatus::Draft.to_string()),
            closes_at: Set(req.closes_at.map(|at| at.timestamp())),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建问卷"))?;

        Ok(result.into_survey())
    }

    pub async fn get_survey_by_id_impl(&self, id: i64) -> Result<Option<Survey>> {
        let result = Surveys::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询问卷"))?;

        Ok(result.map(|m| m.into_survey()))
    }

    pub async fn list_surveys_with_pagination_impl(
        &self,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        let (page, size) = page_and_size(query.page, query.size);

        let mut select = Surveys::find();
        if let Some(status) = query.status {
            select = select.filter(surveys::Column::Status.eq(status.as_str()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(surveys::Column::Title.contains(&escaped));
        }

        let paginator = select
            .order_by_desc(surveys::Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(db_err("查询问卷总数"))?;
        let pages = paginator.num_pages().await.map_err(db_err("查询问卷页数"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询问卷列表"))?;

        Ok(SurveyListResponse {
            items: rows.into_iter().map(|m| m.into_survey()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_survey_impl(
        &self,
        id: i64,
        update: UpdateSurveyRequest,
    ) -> Result<Option<Survey>> {
        if self.get_survey_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = SurveyActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(anonymous) = update.anonymous {
            model.anonymous = Set(anonymous);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(closes_at) = update.closes_at {
            model.closes_at = Set(Some(closes_at.timestamp()));
        }

        let result = model.update(&self.db).await.map_err(db_err("更新问卷"))?;

        Ok(Some(result.into_survey()))
    }

    /// 删除问卷（题目、邀请与答案随外键级联删除）
    pub async fn delete_survey_impl(&self, id: i64) -> Result<bool> {
        let result = Surveys::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除问卷"))?;

        Ok(result.rows_affected > 0)
    }

    /// 创建题目，未指定位置时追加到末尾
    pub async fn create_question_impl(
        &self,
        survey_id: i64,
        req: CreateQuestionRequest,
    ) -> Result<SurveyQuestion> {
        let position = match req.position {
            Some(position) => position,
            None => {
                let last: Option<Option<i32>> = SurveyQuestions::find()
                    .select_only()
                    .column_as(survey_questions::Column::Position.max(), "max_position")
                    .filter(survey_questions::Column::SurveyId.eq(survey_id))
                    .into_tuple()
                    .one(&self.db)
                    .await
                    .map_err(db_err("查询题目位置"))?;
                last.flatten().map_or(1, |p| p + 1)
            }
        };

        let options = if req.options.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&req.options)?)
        };

        let result = SurveyQuestionActiveModel {
            survey_id: Set(survey_id),
            position: Set(position),
            kind: Set(req.kind.to_string()),
            prompt: Set(req.prompt),
            options: Set(options),
            scale: Set(req.scale),
            required: Set(req.required),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建题目"))?;

        Ok(result.into_question())
    }

    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<SurveyQuestion>> {
        let result = SurveyQuestions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询题目"))?;

        Ok(result.map(|m| m.into_question()))
    }

    pub async fn list_questions_impl(&self, survey_id: i64) -> Result<Vec<SurveyQuestion>> {
        let rows = SurveyQuestions::find()
            .filter(survey_questions::Column::SurveyId.eq(survey_id))
            .order_by_asc(survey_questions::Column::Position)
            .order_by_asc(survey_questions::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询题目列表"))?;

        Ok(rows.into_iter().map(|m| m.into_question()).collect())
    }

    pub async fn update_question_impl(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<SurveyQuestion>> {
        if self.get_question_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = SurveyQuestionActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(kind) = update.kind {
            model.kind = Set(kind.to_string());
            // 换题型时清掉新题型不用的字段
            if kind != QuestionKind::Rating {
                model.scale = Set(None);
            }
            if matches!(kind, QuestionKind::Rating | QuestionKind::Text) {
                model.options = Set(None);
            }
        }
        if let Some(prompt) = update.prompt {
            model.prompt = Set(prompt);
        }
        if let Some(options) = update.options {
            model.options = Set(if options.is_empty() {
                None
            } else {
                Some(serde_json::to_string(&options)?)
            });
        }
        if let Some(scale) = update.scale {
            model.scale = Set(Some(scale));
        }
        if let Some(required) = update.required {
            model.required = Set(required);
        }
        if let Some(position) = update.position {
            model.position = Set(position);
        }

        let result = model.update(&self.db).await.map_err(db_err("更新题目"))?;

        Ok(Some(result.into_question()))
    }

    pub async fn delete_question_impl(&self, id: i64) -> Result<bool> {
        let result = SurveyQuestions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除题目"))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量创建邀请
    pub async fn create_survey_assignments_impl(
        &self,
        survey_id: i64,
        assignments: Vec<NewSurveyAssignment>,
    ) -> Result<Vec<SurveyAssignment>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务"))?;

        let mut created = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let saved = SurveyAssignmentActiveModel {
                survey_id: Set(survey_id),
                token: Set(assignment.token),
                invitee_email: Set(assignment.invitee_email),
                invitee_user_id: Set(assignment.invitee_user_id),
                status: Set(AssignmentStatus::Pending.to_string()),
                completed_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err("创建问卷邀请"))?;
            created.push(saved.into_assignment());
        }

        txn.commit().await.map_err(db_err("提交事务"))?;

        Ok(created)
    }

    pub async fn list_survey_assignments_impl(
        &self,
        survey_id: i64,
    ) -> Result<Vec<SurveyAssignment>> {
        let rows = SurveyAssignments::find()
            .filter(survey_assignments::Column::SurveyId.eq(survey_id))
            .order_by_asc(survey_assignments::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err("查询问卷邀请"))?;

        Ok(rows.into_iter().map(|m| m.into_assignment()).collect())
    }

    pub async fn get_survey_assignment_by_token_impl(
        &self,
        token: &str,
    ) -> Result<Option<SurveyAssignment>> {
        let result = SurveyAssignments::find()
            .filter(survey_assignments::Column::Token.eq(token))
            .one(&self.db)
            .await
            .map_err(db_err("查询问卷邀请"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn revoke_survey_assignment_impl(
        &self,
        survey_id: i64,
        assignment_id: i64,
    ) -> Result<bool> {
        let result = SurveyAssignments::update_many()
            .col_expr(
                survey_assignments::Column::Status,
                Expr::value(AssignmentStatus::Revoked.as_str()),
            )
            .filter(survey_assignments::Column::Id.eq(assignment_id))
            .filter(survey_assignments::Column::SurveyId.eq(survey_id))
            .filter(survey_assignments::Column::Status.eq(AssignmentStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err("撤销问卷邀请"))?;

        Ok(result.rows_affected > 0)
    }

    /// 保存答案并把邀请置为 completed
    ///
    /// 邀请已不是 pending 时事务回滚，同一令牌只能作答一次。
    pub async fn submit_survey_responses_impl(
        &self,
        assignment: &SurveyAssignment,
        answers: Vec<(i64, AnswerValue)>,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_err("开启事务"))?;

        let claimed = SurveyAssignments::update_many()
            .col_expr(
                survey_assignments::Column::Status,
                Expr::value(AssignmentStatus::Completed.as_str()),
            )
            .col_expr(survey_assignments::Column::CompletedAt, Expr::value(now))
            .filter(survey_assignments::Column::Id.eq(assignment.id))
            .filter(survey_assignments::Column::Status.eq(AssignmentStatus::Pending.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err("更新问卷邀请状态"))?;

        if claimed.rows_affected == 0 {
            txn.rollback().await.map_err(db_err("回滚事务"))?;
            return Err(AqmsError::validation("该问卷邀请已作答或已撤销"));
        }

        for (question_id, value) in answers {
            SurveyResponseActiveModel {
                survey_id: Set(assignment.survey_id),
                assignment_id: Set(assignment.id),
                question_id: Set(question_id),
                answer: Set(serde_json::to_string(&value)?),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err("保存问卷答案"))?;
        }

        txn.commit().await.map_err(db_err("提交事务"))?;

        Ok(())
    }

    pub async fn list_survey_responses_impl(
        &self,
        survey_id: i64,
    ) -> Result<Vec<SurveyResponseRecord>> {
        let rows = SurveyResponses::find()
            .filter(survey_responses::Column::SurveyId.eq(survey_id))
            .order_by_asc(survey_responses::Column::AssignmentId)
            .order_by_asc(survey_responses::Column::QuestionId)
            .all(&self.db)
            .await
            .map_err(db_err("查询问卷答案"))?;

        Ok(rows.into_iter().map(|m| m.into_record()).collect())
    }
}
