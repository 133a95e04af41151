pub mod access;
pub mod attainment;
pub mod auth;
pub mod common;
pub mod evaluations;
pub mod frameworks;
pub mod observations;
pub mod rubrics;
pub mod students;
pub mod surveys;
pub mod system;
pub mod users;

pub use common::*;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 按领域分段：认证 1xxx，用户与权限 2xxx，培养方案 3xxx，
/// 量表与观察 4xxx，360° 评价 5xxx，问卷 6xxx，导入 7xxx。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    Conflict = 409,
    ContentRejected = 422,
    RateLimitExceeded = 429,
    InternalServerError = 500,

    // 认证
    AuthFailed = 1000,
    AccountDisabled = 1001,
    PasswordPolicyViolation = 1002,
    CurrentPasswordIncorrect = 1003,

    // 用户与权限
    UserNotFound = 2000,
    UserAlreadyExists = 2001,
    UserCreationFailed = 2002,
    UserUpdateFailed = 2003,
    UserDeleteFailed = 2004,
    UserNameInvalid = 2005,
    UserEmailInvalid = 2006,
    RoleNotFound = 2010,
    RoleAlreadyExists = 2011,
    DepartmentNotFound = 2020,
    DepartmentAlreadyExists = 2021,
    RoleAssignmentNotFound = 2030,

    // 培养方案
    FrameworkNotFound = 3000,
    FrameworkAlreadyExists = 3001,
    CourseNotFound = 3010,
    CourseAlreadyExists = 3011,
    OutcomeNotFound = 3020,
    OutcomeAlreadyExists = 3021,
    OutcomeInUse = 3022,
    LinkInvalid = 3030,
    LinkAlreadyExists = 3031,
    LinkNotFound = 3032,
    StudentNotFound = 3040,
    StudentAlreadyExists = 3041,

    // 量表与观察
    RubricNotFound = 4000,
    RubricInvalid = 4001,
    RubricInUse = 4002,
    ObservationNotFound = 4010,
    ScoresInvalid = 4011,
    ObservationLocked = 4012,

    // 360° 评价
    CampaignNotFound = 5000,
    CampaignInvalid = 5001,
    CampaignNotOpen = 5002,
    EvaluationRequestNotFound = 5010,
    EvaluationRequestInvalid = 5011,
    EvaluationAlreadySubmitted = 5012,
    EvaluationNotEvaluator = 5013,

    // 问卷
    SurveyNotFound = 6000,
    SurveyInvalid = 6001,
    SurveyNotEditable = 6002,
    SurveyNotAvailable = 6003,
    SurveyAssignmentNotFound = 6010,
    SurveyAlreadyResponded = 6011,
    SurveyAnswerInvalid = 6012,

    // 导入
    ImportFileMissing = 7000,
    ImportFileFormatInvalid = 7001,
    ImportFileDataInvalid = 7002,
    ImportFileTooLarge = 7003,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_keep_their_domain_prefix() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AuthFailed as i32 / 1000, 1);
        assert_eq!(ErrorCode::RoleNotFound as i32 / 1000, 2);
        assert_eq!(ErrorCode::LinkInvalid as i32 / 1000, 3);
        assert_eq!(ErrorCode::RubricInUse as i32 / 1000, 4);
        assert_eq!(ErrorCode::EvaluationAlreadySubmitted as i32 / 1000, 5);
        assert_eq!(ErrorCode::SurveyAlreadyResponded as i32 / 1000, 6);
        assert_eq!(ErrorCode::ImportFileDataInvalid as i32 / 1000, 7);
    }
}
