use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::StudentService;
use crate::errors::Result;
use crate::models::access::entities::Permission;
use crate::models::students::requests::{CreateStudentRequest, NewStudent};
use crate::models::students::responses::StudentCreatedResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::password::hash_password_blocking;
use crate::utils::random_code::generate_password;
use crate::utils::validate::{
    validate_code, validate_email, validate_password, validate_required_text, validate_username,
};

/// 学生资料校验失败
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StudentRejection {
    Invalid {
        field: &'static str,
        code: ErrorCode,
        message: String,
    },
    Taken {
        field: &'static str,
        message: String,
    },
}

impl StudentRejection {
    fn invalid(field: &'static str, code: ErrorCode, message: impl Into<String>) -> Self {
        StudentRejection::Invalid {
            field,
            code,
            message: message.into(),
        }
    }

    pub(crate) fn field(&self) -> &'static str {
        match self {
            StudentRejection::Invalid { field, .. } | StudentRejection::Taken { field, .. } => field,
        }
    }

    pub(crate) fn message(&self) -> &str {
        match self {
            StudentRejection::Invalid { message, .. } | StudentRejection::Taken { message, .. } => {
                message
            }
        }
    }

    fn response(&self) -> HttpResponse {
        match self {
            StudentRejection::Invalid { code, message, .. } => {
                HttpResponse::BadRequest().json(ApiResponse::error_empty(*code, message.clone()))
            }
            StudentRejection::Taken { message, .. } => HttpResponse::Conflict().json(
                ApiResponse::error_empty(ErrorCode::StudentAlreadyExists, message.clone()),
            ),
        }
    }
}

/// 规范化后的学生资料；未给出密码时生成初始密码
#[derive(Debug)]
pub(crate) struct PreparedStudent {
    pub student: NewStudent,
    pub generated_password: Option<String>,
}

/// 校验并补全学生资料，密码尚未哈希
pub(crate) fn normalize_student(
    framework_id: i64,
    req: CreateStudentRequest,
) -> std::result::Result<PreparedStudent, StudentRejection> {
    let student_code = req.student_code.trim().to_string();
    let full_name = req.full_name.trim().to_string();
    let email = req.email.trim().to_lowercase();
    let username = req
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| student_code.clone());

    validate_code(&student_code)
        .map_err(|msg| StudentRejection::invalid("student_code", ErrorCode::BadRequest, msg))?;
    validate_required_text(&full_name, 200)
        .map_err(|msg| StudentRejection::invalid("full_name", ErrorCode::BadRequest, msg))?;
    validate_email(&email)
        .map_err(|msg| StudentRejection::invalid("email", ErrorCode::UserEmailInvalid, msg))?;
    validate_username(&username)
        .map_err(|msg| StudentRejection::invalid("username", ErrorCode::UserNameInvalid, msg))?;

    let (password, generated_password) = match req.password.filter(|p| !p.is_empty()) {
        Some(password) => {
            let policy = validate_password(&password);
            if !policy.is_valid {
                return Err(StudentRejection::invalid(
                    "password",
                    ErrorCode::PasswordPolicyViolation,
                    policy.error_message(),
                ));
            }
            (password, None)
        }
        None => {
            let generated = generate_password();
            (generated.clone(), Some(generated))
        }
    };

    Ok(PreparedStudent {
        student: NewStudent {
            framework_id,
            student_code,
            full_name,
            email,
            username,
            password_hash: password,
        },
        generated_password,
    })
}

/// 学号、用户名、邮箱均不可重复
pub(crate) async fn check_student_unique(
    storage: &Arc<dyn Storage>,
    student: &NewStudent,
) -> Result<Option<StudentRejection>> {
    if storage
        .get_student_by_code(&student.student_code)
        .await?
        .is_some()
    {
        return Ok(Some(StudentRejection::Taken {
            field: "student_code",
            message: format!("学号 {} 已存在", student.student_code),
        }));
    }
    if storage
        .get_user_by_username(&student.username)
        .await?
        .is_some()
    {
        return Ok(Some(StudentRejection::Taken {
            field: "username",
            message: format!("用户名 {} 已被占用", student.username),
        }));
    }
    if storage.get_user_by_email(&student.email).await?.is_some() {
        return Ok(Some(StudentRejection::Taken {
            field: "email",
            message: format!("邮箱 {} 已被占用", student.email),
        }));
    }
    Ok(None)
}

pub async fn create_student(
    service: &StudentService,
    framework_id: i64,
    req: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let framework = crate::services::load_framework(&storage, framework_id).await?;
    crate::services::ensure_framework_permission(request, Permission::FrameworkManage, &framework)
        .await?;

    let PreparedStudent {
        mut student,
        generated_password,
    } = match normalize_student(framework_id, req) {
        Ok(prepared) => prepared,
        Err(rejection) => return Ok(rejection.response()),
    };

    if let Some(rejection) = check_student_unique(&storage, &student).await? {
        return Ok(rejection.response());
    }

    student.password_hash = hash_password_blocking(student.password_hash).await?;

    match storage.create_student(student).await {
        Ok(student) => {
            info!(
                "Student {} created in framework {}",
                student.student_code, framework.code
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentCreatedResponse {
                    student,
                    generated_password,
                },
                "Student created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create student: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to create student: {e}"),
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: Option<&str>) -> CreateStudentRequest {
        CreateStudentRequest {
            student_code: " S2024001 ".into(),
            full_name: "An Nguyen".into(),
            email: "An@Example.com".into(),
            username: None,
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn username_defaults_to_student_code_and_password_is_generated() {
        let prepared = normalize_student(7, request(None)).unwrap();
        assert_eq!(prepared.student.username, "S2024001");
        assert_eq!(prepared.student.email, "an@example.com");
        assert_eq!(prepared.student.framework_id, 7);
        let generated = prepared.generated_password.unwrap();
        assert_eq!(prepared.student.password_hash, generated);
    }

    #[test]
    fn weak_password_is_rejected() {
        let rejection = normalize_student(1, request(Some("short"))).unwrap_err();
        assert_eq!(rejection.field(), "password");
        assert!(matches!(
            rejection,
            StudentRejection::Invalid {
                code: ErrorCode::PasswordPolicyViolation,
                ..
            }
        ));
    }
}
