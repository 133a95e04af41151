use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为哈希后的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 院系与角色
    async fn list_departments(&self) -> Result<Vec<Department>>;
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department>;
    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    async fn delete_department(&self, id: i64) -> Result<bool>;

    async fn list_roles(&self) -> Result<Vec<Role>>;
    async fn get_role_by_id(&self, id: i64) -> Result<Option<Role>>;
    async fn get_role_by_code(&self, code: &str) -> Result<Option<Role>>;
    async fn create_role(&self, req: CreateRoleRequest) -> Result<Role>;
    // permissions 为 Some 时整体替换
    async fn update_role(&self, id: i64, update: UpdateRoleRequest) -> Result<Option<Role>>;
    async fn delete_role(&self, id: i64) -> Result<bool>;

    // 为用户分配角色，可按院系限定
    async fn assign_role(
        &self,
        user_id: i64,
        role_id: i64,
        department_id: Option<i64>,
    ) -> Result<UserRoleAssignment>;
    // 撤销分配
    async fn revoke_role(&self, user_id: i64, assignment_id: i64) -> Result<bool>;
    async fn list_user_role_assignments(&self, user_id: i64) -> Result<Vec<UserRoleAssignment>>;
    // 列出持有某角色的用户 ID（用于失效权限缓存）
    async fn list_role_user_ids(&self, role_id: i64) -> Result<Vec<i64>>;
    // 汇总用户经由角色获得的权限
    async fn list_user_permissions(&self, user_id: i64) -> Result<Vec<PermissionGrant>>;

    /// 培养方案
    async fn create_framework(&self, req: CreateFrameworkRequest) -> Result<Framework>;
    async fn get_framework_by_id(&self, id: i64) -> Result<Option<Framework>>;
    async fn get_framework_by_code(&self, code: &str) -> Result<Option<Framework>>;
    async fn list_frameworks_with_pagination(
        &self,
        query: FrameworkListQuery,
    ) -> Result<FrameworkListResponse>;
    async fn update_framework(
        &self,
        id: i64,
        update: UpdateFrameworkRequest,
    ) -> Result<Option<Framework>>;
    async fn delete_framework(&self, id: i64) -> Result<bool>;

    /// 课程
    async fn create_course(&self, framework_id: i64, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, framework_id: i64, code: &str) -> Result<Option<Course>>;
    async fn list_courses(&self, framework_id: i64) -> Result<Vec<Course>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 学习成果（PLO / PI / CLO）
    async fn create_outcome(
        &self,
        kind: OutcomeKind,
        framework_id: i64,
        req: CreateOutcomeRequest,
    ) -> Result<Outcome>;
    async fn get_outcome(&self, kind: OutcomeKind, id: i64) -> Result<Option<Outcome>>;
    async fn get_outcome_by_code(
        &self,
        kind: OutcomeKind,
        framework_id: i64,
        code: &str,
    ) -> Result<Option<Outcome>>;
    async fn list_outcomes(&self, kind: OutcomeKind, framework_id: i64) -> Result<Vec<Outcome>>;
    async fn update_outcome(
        &self,
        kind: OutcomeKind,
        id: i64,
        update: UpdateOutcomeRequest,
    ) -> Result<Option<Outcome>>;
    async fn delete_outcome(&self, kind: OutcomeKind, id: i64) -> Result<bool>;

    /// 成果映射
    async fn create_link(
        &self,
        kind: LinkKind,
        source_id: i64,
        target_id: i64,
        level: i32,
    ) -> Result<OutcomeLink>;
    async fn get_link(&self, kind: LinkKind, id: i64) -> Result<Option<OutcomeLink>>;
    async fn find_link(
        &self,
        kind: LinkKind,
        source_id: i64,
        target_id: i64,
    ) -> Result<Option<OutcomeLink>>;
    async fn list_links(&self, kind: LinkKind, framework_id: i64) -> Result<Vec<OutcomeLink>>;
    async fn update_link_level(
        &self,
        kind: LinkKind,
        id: i64,
        level: i32,
    ) -> Result<Option<OutcomeLink>>;
    async fn delete_link(&self, kind: LinkKind, id: i64) -> Result<bool>;

    /// 学生
    // 同时创建学生账号
    async fn create_student(&self, student: NewStudent) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_code(&self, student_code: &str) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    // 删除学生及其账号
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn count_students(&self, framework_id: i64) -> Result<u64>;

    /// 评分量表
    async fn create_rubric(&self, req: CreateRubricRequest, created_by: i64) -> Result<Rubric>;
    async fn get_rubric_by_id(&self, id: i64) -> Result<Option<Rubric>>;
    async fn list_rubrics_with_pagination(
        &self,
        query: RubricListQuery,
    ) -> Result<RubricListResponse>;
    async fn update_rubric(&self, id: i64, update: UpdateRubricRequest) -> Result<Option<Rubric>>;
    async fn delete_rubric(&self, id: i64) -> Result<bool>;
    // 引用该量表的观察记录与评价活动数
    async fn count_rubric_references(&self, rubric_id: i64) -> Result<u64>;
    // 定义行引用了这些 CLO 的量表
    async fn find_rubrics_referencing_clos(
        &self,
        framework_id: i64,
        clo_ids: &[i64],
    ) -> Result<Vec<Rubric>>;

    /// 观察记录
    // 在一个事务内写入观察、评分项与 CLO 结果
    async fn create_observation(&self, observation: NewObservation) -> Result<ObservationDetail>;
    async fn get_observation_detail(&self, id: i64) -> Result<Option<ObservationDetail>>;
    async fn list_observations_with_pagination(
        &self,
        query: ObservationListQuery,
    ) -> Result<ObservationListResponse>;
    async fn delete_observation(&self, id: i64) -> Result<bool>;
    async fn list_observation_items(&self, observation_ids: &[i64])
    -> Result<Vec<ObservationItem>>;

    /// 达成度
    // 方案内每个 (学生, CLO) 的最新结果
    async fn list_latest_clo_results(&self, framework_id: i64) -> Result<Vec<LatestCloResult>>;
    async fn list_student_clo_results(&self, student_id: i64) -> Result<Vec<CloResult>>;

    /// 360° 评价
    async fn create_campaign(
        &self,
        req: CreateCampaignRequest,
        created_by: i64,
    ) -> Result<EvaluationCampaign>;
    async fn get_campaign_by_id(&self, id: i64) -> Result<Option<EvaluationCampaign>>;
    async fn list_campaigns_with_pagination(
        &self,
        query: CampaignListQuery,
    ) -> Result<CampaignListResponse>;
    async fn update_campaign(
        &self,
        id: i64,
        update: UpdateCampaignRequest,
    ) -> Result<Option<EvaluationCampaign>>;
    async fn delete_campaign(&self, id: i64) -> Result<bool>;

    async fn create_evaluation_request(
        &self,
        request: NewEvaluationRequest,
    ) -> Result<EvaluationRequest>;
    async fn evaluation_request_exists(
        &self,
        campaign_id: i64,
        evaluator_id: i64,
        evaluatee_id: i64,
        group_role: GroupRole,
    ) -> Result<bool>;
    async fn get_evaluation_request_by_id(&self, id: i64) -> Result<Option<EvaluationRequest>>;
    async fn list_campaign_requests(
        &self,
        campaign_id: i64,
        query: RequestListQuery,
    ) -> Result<Vec<EvaluationRequest>>;
    async fn list_evaluator_inbox(
        &self,
        evaluator_id: i64,
        status: Option<RequestStatus>,
    ) -> Result<Vec<EvaluationInboxItem>>;
    // 事务内写入观察记录并把请求从 pending 置为 submitted
    async fn submit_evaluation(
        &self,
        request_id: i64,
        observation: NewObservation,
    ) -> Result<(EvaluationRequest, ObservationDetail)>;

    /// 问卷
    async fn create_survey(&self, req: CreateSurveyRequest, created_by: i64) -> Result<Survey>;
    async fn get_survey_by_id(&self, id: i64) -> Result<Option<Survey>>;
    async fn list_surveys_with_pagination(
        &self,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse>;
    async fn update_survey(&self, id: i64, update: UpdateSurveyRequest) -> Result<Option<Survey>>;
    async fn delete_survey(&self, id: i64) -> Result<bool>;

    async fn create_question(
        &self,
        survey_id: i64,
        req: CreateQuestionRequest,
    ) -> Result<SurveyQuestion>;
    async fn get_question_by_id(&self, id: i64) -> Result<Option<SurveyQuestion>>;
    async fn list_questions(&self, survey_id: i64) -> Result<Vec<SurveyQuestion>>;
    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<SurveyQuestion>>;
    async fn delete_question(&self, id: i64) -> Result<bool>;

    async fn create_survey_assignments(
        &self,
        survey_id: i64,
        assignments: Vec<NewSurveyAssignment>,
    ) -> Result<Vec<SurveyAssignment>>;
    async fn list_survey_assignments(&self, survey_id: i64) -> Result<Vec<SurveyAssignment>>;
    async fn get_survey_assignment_by_token(&self, token: &str)
    -> Result<Option<SurveyAssignment>>;
    // 仅 pending 状态可撤销
    async fn revoke_survey_assignment(&self, survey_id: i64, assignment_id: i64) -> Result<bool>;
    // 事务内保存答案并把邀请置为 completed
    async fn submit_survey_responses(
        &self,
        assignment: &SurveyAssignment,
        answers: Vec<(i64, AnswerValue)>,
    ) -> Result<()>;
    async fn list_survey_responses(&self, survey_id: i64) -> Result<Vec<SurveyResponseRecord>>;

    /// 系统
    async fn ping(&self) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
