//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod access;
mod attainment;
mod evaluations;
mod frameworks;
mod observations;
mod rubrics;
mod students;
mod surveys;
mod users;

use crate::config::AppConfig;
use crate::errors::{AqmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按配置文件中的数据库地址创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url).await
    }

    /// 连接指定数据库并执行迁移
    pub async fn connect(url: &str) -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AqmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AqmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        // 内存库每个连接都是独立的数据库，只能使用单连接且不能回收
        let in_memory = url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.database.pool_size)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| AqmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AqmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AqmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 数据库连通性检查
    pub async fn ping_impl(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| AqmsError::database_connection(format!("数据库连接检查失败: {e}")))
    }
}

/// 数据库错误统一包装为 "{操作}失败: {原因}"
pub(crate) fn db_err(action: &str) -> impl FnOnce(sea_orm::DbErr) -> AqmsError + '_ {
    move |e| AqmsError::database_operation(format!("{action}失败: {e}"))
}

/// 秒级时间戳转换为 UTC 时间
pub(crate) fn ts(value: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(value, 0).unwrap_or_default()
}

/// 分页参数归一化：页码从 1 开始，每页 1~100 条
pub(crate) fn page_and_size(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    (
        page.unwrap_or(1).max(1) as u64,
        size.unwrap_or(10).clamp(1, 100) as u64,
    )
}

// Storage trait 实现
use crate::models::{
    access::entities::{Department, PermissionGrant, Role, UserRoleAssignment},
    access::requests::{
        CreateDepartmentRequest, CreateRoleRequest, UpdateDepartmentRequest, UpdateRoleRequest,
    },
    attainment::entities::LatestCloResult,
    evaluations::{
        entities::{
            EvaluationCampaign, EvaluationInboxItem, EvaluationRequest, GroupRole, RequestStatus,
        },
        requests::{
            CampaignListQuery, CreateCampaignRequest, NewEvaluationRequest, RequestListQuery,
            UpdateCampaignRequest,
        },
        responses::CampaignListResponse,
    },
    frameworks::{
        entities::{Course, Framework, LinkKind, Outcome, OutcomeKind, OutcomeLink},
        requests::{
            CreateCourseRequest, CreateFrameworkRequest, CreateOutcomeRequest,
            FrameworkListQuery, UpdateCourseRequest, UpdateFrameworkRequest, UpdateOutcomeRequest,
        },
        responses::FrameworkListResponse,
    },
    observations::{
        entities::{CloResult, NewObservation, ObservationDetail, ObservationItem},
        requests::ObservationListQuery,
        responses::ObservationListResponse,
    },
    rubrics::{
        entities::Rubric,
        requests::{CreateRubricRequest, RubricListQuery, UpdateRubricRequest},
        responses::RubricListResponse,
    },
    students::{
        entities::Student,
        requests::{NewStudent, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    surveys::{
        entities::{AnswerValue, Survey, SurveyAssignment, SurveyQuestion, SurveyResponseRecord},
        requests::{
            CreateQuestionRequest, CreateSurveyRequest, NewSurveyAssignment, SurveyListQuery,
            UpdateQuestionRequest, UpdateSurveyRequest,
        },
        responses::SurveyListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 院系与角色模块
    async fn list_departments(&self) -> Result<Vec<Department>> {
        self.list_departments_impl().await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department> {
        self.create_department_impl(req).await
    }

    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(id, update).await
    }

    async fn delete_department(&self, id: i64) -> Result<bool> {
        self.delete_department_impl(id).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.list_roles_impl().await
    }

    async fn get_role_by_id(&self, id: i64) -> Result<Option<Role>> {
        self.get_role_by_id_impl(id).await
    }

    async fn get_role_by_code(&self, code: &str) -> Result<Option<Role>> {
        self.get_role_by_code_impl(code).await
    }

    async fn create_role(&self, req: CreateRoleRequest) -> Result<Role> {
        self.create_role_impl(req).await
    }

    async fn update_role(&self, id: i64, update: UpdateRoleRequest) -> Result<Option<Role>> {
        self.update_role_impl(id, update).await
    }

    async fn delete_role(&self, id: i64) -> Result<bool> {
        self.delete_role_impl(id).await
    }

    async fn assign_role(
        &self,
        user_id: i64,
        role_id: i64,
        department_id: Option<i64>,
    ) -> Result<UserRoleAssignment> {
        self.assign_role_impl(user_id, role_id, department_id).await
    }

    async fn revoke_role(&self, user_id: i64, assignment_id: i64) -> Result<bool> {
        self.revoke_role_impl(user_id, assignment_id).await
    }

    async fn list_user_role_assignments(&self, user_id: i64) -> Result<Vec<UserRoleAssignment>> {
        self.list_user_role_assignments_impl(user_id).await
    }

    async fn list_role_user_ids(&self, role_id: i64) -> Result<Vec<i64>> {
        self.list_role_user_ids_impl(role_id).await
    }

    async fn list_user_permissions(&self, user_id: i64) -> Result<Vec<PermissionGrant>> {
        self.list_user_permissions_impl(user_id).await
    }

    // 培养方案模块
    async fn create_framework(&self, req: CreateFrameworkRequest) -> Result<Framework> {
        self.create_framework_impl(req).await
    }

    async fn get_framework_by_id(&self, id: i64) -> Result<Option<Framework>> {
        self.get_framework_by_id_impl(id).await
    }

    async fn get_framework_by_code(&self, code: &str) -> Result<Option<Framework>> {
        self.get_framework_by_code_impl(code).await
    }

    async fn list_frameworks_with_pagination(
        &self,
        query: FrameworkListQuery,
    ) -> Result<FrameworkListResponse> {
        self.list_frameworks_with_pagination_impl(query).await
    }

    async fn update_framework(
        &self,
        id: i64,
        update: UpdateFrameworkRequest,
    ) -> Result<Option<Framework>> {
        self.update_framework_impl(id, update).await
    }

    async fn delete_framework(&self, id: i64) -> Result<bool> {
        self.delete_framework_impl(id).await
    }

    async fn create_course(&self, framework_id: i64, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(framework_id, req).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, framework_id: i64, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(framework_id, code).await
    }

    async fn list_courses(&self, framework_id: i64) -> Result<Vec<Course>> {
        self.list_courses_impl(framework_id).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn create_outcome(
        &self,
        kind: OutcomeKind,
        framework_id: i64,
        req: CreateOutcomeRequest,
    ) -> Result<Outcome> {
        self.create_outcome_impl(kind, framework_id, req).await
    }

    async fn get_outcome(&self, kind: OutcomeKind, id: i64) -> Result<Option<Outcome>> {
        self.get_outcome_impl(kind, id).await
    }

    async fn get_outcome_by_code(
        &self,
        kind: OutcomeKind,
        framework_id: i64,
        code: &str,
    ) -> Result<Option<Outcome>> {
        self.get_outcome_by_code_impl(kind, framework_id, code).await
    }

    async fn list_outcomes(&self, kind: OutcomeKind, framework_id: i64) -> Result<Vec<Outcome>> {
        self.list_outcomes_impl(kind, framework_id).await
    }

    async fn update_outcome(
        &self,
        kind: OutcomeKind,
        id: i64,
        update: UpdateOutcomeRequest,
    ) -> Result<Option<Outcome>> {
        self.update_outcome_impl(kind, id, update).await
    }

    async fn delete_outcome(&self, kind: OutcomeKind, id: i64) -> Result<bool> {
        self.delete_outcome_impl(kind, id).await
    }

    async fn create_link(
        &self,
        kind: LinkKind,
        source_id: i64,
        target_id: i64,
        level: i32,
    ) -> Result<OutcomeLink> {
        self.create_link_impl(kind, source_id, target_id, level).await
    }

    async fn get_link(&self, kind: LinkKind, id: i64) -> Result<Option<OutcomeLink>> {
        self.get_link_impl(kind, id).await
    }

    async fn find_link(
        &self,
        kind: LinkKind,
        source_id: i64,
        target_id: i64,
    ) -> Result<Option<OutcomeLink>> {
        self.find_link_impl(kind, source_id, target_id).await
    }

    async fn list_links(&self, kind: LinkKind, framework_id: i64) -> Result<Vec<OutcomeLink>> {
        self.list_links_impl(kind, framework_id).await
    }

    async fn update_link_level(
        &self,
        kind: LinkKind,
        id: i64,
        level: i32,
    ) -> Result<Option<OutcomeLink>> {
        self.update_link_level_impl(kind, id, level).await
    }

    async fn delete_link(&self, kind: LinkKind, id: i64) -> Result<bool> {
        self.delete_link_impl(kind, id).await
    }

    // 学生模块
    async fn create_student(&self, student: NewStudent) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>> {
        self.get_student_by_code_impl(student_code).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn count_students(&self, framework_id: i64) -> Result<u64> {
        self.count_students_impl(framework_id).await
    }

    // 评分量表模块
    async fn create_rubric(&self, req: CreateRubricRequest, created_by: i64) -> Result<Rubric> {
        self.create_rubric_impl(req, created_by).await
    }

    async fn get_rubric_by_id(&self, id: i64) -> Result<Option<Rubric>> {
        self.get_rubric_by_id_impl(id).await
    }

    async fn list_rubrics_with_pagination(
        &self,
        query: RubricListQuery,
    ) -> Result<RubricListResponse> {
        self.list_rubrics_with_pagination_impl(query).await
    }

    async fn update_rubric(&self, id: i64, update: UpdateRubricRequest) -> Result<Option<Rubric>> {
        self.update_rubric_impl(id, update).await
    }

    async fn delete_rubric(&self, id: i64) -> Result<bool> {
        self.delete_rubric_impl(id).await
    }

    async fn count_rubric_references(&self, rubric_id: i64) -> Result<u64> {
        self.count_rubric_references_impl(rubric_id).await
    }

    async fn find_rubrics_referencing_clos(
        &self,
        framework_id: i64,
        clo_ids: &[i64],
    ) -> Result<Vec<Rubric>> {
        self.find_rubrics_referencing_clos_impl(framework_id, clo_ids)
            .await
    }

    // 观察记录模块
    async fn create_observation(&self, observation: NewObservation) -> Result<ObservationDetail> {
        self.create_observation_impl(observation).await
    }

    async fn get_observation_detail(&self, id: i64) -> Result<Option<ObservationDetail>> {
        self.get_observation_detail_impl(id).await
    }

    async fn list_observations_with_pagination(
        &self,
        query: ObservationListQuery,
    ) -> Result<ObservationListResponse> {
        self.list_observations_with_pagination_impl(query).await
    }

    async fn delete_observation(&self, id: i64) -> Result<bool> {
        self.delete_observation_impl(id).await
    }

    async fn list_observation_items(
        &self,
        observation_ids: &[i64],
    ) -> Result<Vec<ObservationItem>> {
        self.list_observation_items_impl(observation_ids).await
    }

    // 达成度模块
    async fn list_latest_clo_results(&self, framework_id: i64) -> Result<Vec<LatestCloResult>> {
        self.list_latest_clo_results_impl(framework_id).await
    }

    async fn list_student_clo_results(&self, student_id: i64) -> Result<Vec<CloResult>> {
        self.list_student_clo_results_impl(student_id).await
    }

    // 360° 评价模块
    async fn create_campaign(
        &self,
        req: CreateCampaignRequest,
        created_by: i64,
    ) -> Result<EvaluationCampaign> {
        self.create_campaign_impl(req, created_by).await
    }

    async fn get_campaign_by_id(&self, id: i64) -> Result<Option<EvaluationCampaign>> {
        self.get_campaign_by_id_impl(id).await
    }

    async fn list_campaigns_with_pagination(
        &self,
        query: CampaignListQuery,
    ) -> Result<CampaignListResponse> {
        self.list_campaigns_with_pagination_impl(query).await
    }

    async fn update_campaign(
        &self,
        id: i64,
        update: UpdateCampaignRequest,
    ) -> Result<Option<EvaluationCampaign>> {
        self.update_campaign_impl(id, update).await
    }

    async fn delete_campaign(&self, id: i64) -> Result<bool> {
        self.delete_campaign_impl(id).await
    }

    async fn create_evaluation_request(
        &self,
        request: NewEvaluationRequest,
    ) -> Result<EvaluationRequest> {
        self.create_evaluation_request_impl(request).await
    }

    async fn evaluation_request_exists(
        &self,
        campaign_id: i64,
        evaluator_id: i64,
        evaluatee_id: i64,
        group_role: GroupRole,
    ) -> Result<bool> {
        self.evaluation_request_exists_impl(campaign_id, evaluator_id, evaluatee_id, group_role)
            .await
    }

    async fn get_evaluation_request_by_id(&self, id: i64) -> Result<Option<EvaluationRequest>> {
        self.get_evaluation_request_by_id_impl(id).await
    }

    async fn list_campaign_requests(
        &self,
        campaign_id: i64,
        query: RequestListQuery,
    ) -> Result<Vec<EvaluationRequest>> {
        self.list_campaign_requests_impl(campaign_id, query).await
    }

    async fn list_evaluator_inbox(
        &self,
        evaluator_id: i64,
        status: Option<RequestStatus>,
    ) -> Result<Vec<EvaluationInboxItem>> {
        self.list_evaluator_inbox_impl(evaluator_id, status).await
    }

    async fn submit_evaluation(
        &self,
        request_id: i64,
        observation: NewObservation,
    ) -> Result<(EvaluationRequest, ObservationDetail)> {
        self.submit_evaluation_impl(request_id, observation).await
    }

    // 问卷模块
    async fn create_survey(&self, req: CreateSurveyRequest, created_by: i64) -> Result<Survey> {
        self.create_survey_impl(req, created_by).await
    }

    async fn get_survey_by_id(&self, id: i64) -> Result<Option<Survey>> {
        self.get_survey_by_id_impl(id).await
    }

    async fn list_surveys_with_pagination(
        &self,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        self.list_surveys_with_pagination_impl(query).await
    }

    async fn update_survey(&self, id: i64, update: UpdateSurveyRequest) -> Result<Option<Survey>> {
        self.update_survey_impl(id, update).await
    }

    async fn delete_survey(&self, id: i64) -> Result<bool> {
        self.delete_survey_impl(id).await
    }

    async fn create_question(
        &self,
        survey_id: i64,
        req: CreateQuestionRequest,
    ) -> Result<SurveyQuestion> {
        self.create_question_impl(survey_id, req).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<SurveyQuestion>> {
        self.get_question_by_id_impl(id).await
    }

    async fn list_questions(&self, survey_id: i64) -> Result<Vec<SurveyQuestion>> {
        self.list_questions_impl(survey_id).await
    }

    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<SurveyQuestion>> {
        self.update_question_impl(id, update).await
    }

    async fn delete_question(&self, id: i64) -> Result<bool> {
        self.delete_question_impl(id).await
    }

    async fn create_survey_assignments(
        &self,
        survey_id: i64,
        assignments: Vec<NewSurveyAssignment>,
    ) -> Result<Vec<SurveyAssignment>> {
        self.create_survey_assignments_impl(survey_id, assignments).await
    }

    async fn list_survey_assignments(&self, survey_id: i64) -> Result<Vec<SurveyAssignment>> {
        self.list_survey_assignments_impl(survey_id).await
    }

    async fn get_survey_assignment_by_token(
        &self,
        token: &str,
    ) -> Result<Option<SurveyAssignment>> {
        self.get_survey_assignment_by_token_impl(token).await
    }

    async fn revoke_survey_assignment(&self, survey_id: i64, assignment_id: i64) -> Result<bool> {
        self.revoke_survey_assignment_impl(survey_id, assignment_id).await
    }

    async fn submit_survey_responses(
        &self,
        assignment: &SurveyAssignment,
        answers: Vec<(i64, AnswerValue)>,
    ) -> Result<()> {
        self.submit_survey_responses_impl(assignment, answers).await
    }

    async fn list_survey_responses(&self, survey_id: i64) -> Result<Vec<SurveyResponseRecord>> {
        self.list_survey_responses_impl(survey_id).await
    }

    // 系统模块
    async fn ping(&self) -> Result<()> {
        self.ping_impl().await
    }
}
