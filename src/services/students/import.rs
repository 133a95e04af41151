//! 学生 CSV 导入

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::StudentService;
use super::create::{PreparedStudent, StudentRejection, check_student_unique, normalize_student};
use crate::config::AppConfig;
use crate::models::access::entities::Permission;
use crate::models::common::{ImportResponse, ImportRowError};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::students::responses::{GeneratedCredential, StudentImportResponse};
use crate::models::ApiResponse;
use crate::services::import_error_response;
use crate::utils::csv_import::{CsvRow, CsvTable, read_file_from_multipart};
use crate::utils::password::hash_password_blocking;

const REQUIRED_COLUMNS: &[&str] = &["student_code", "full_name", "email"];

fn row_request(table: &CsvTable, row: &CsvRow) -> CreateStudentRequest {
    let text = |col: &str| table.get(row, col).unwrap_or_default().to_string();
    CreateStudentRequest {
        student_code: text("student_code"),
        full_name: text("full_name"),
        email: text("email"),
        username: table.get(row, "username").map(str::to_string),
        password: table.get(row, "password").map(str::to_string),
    }
}

fn row_error(row: &CsvRow, rejection: &StudentRejection) -> ImportRowError {
    ImportRowError::new(row.row_num, rejection.field(), rejection.message())
}

pub async fn import_students(
    service: &StudentService,
    framework_id: i64,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let framework = crate::services::load_framework(&storage, framework_id).await?;
    crate::services::ensure_framework_permission(request, Permission::FrameworkManage, &framework)
        .await?;
    let config = &AppConfig::get().import;

    let file_bytes = match read_file_from_multipart(&mut payload, config.max_file_size).await {
        Ok(bytes) => bytes,
        Err(e) => return Ok(import_error_response(&e)),
    };
    let table = match CsvTable::parse(&file_bytes, REQUIRED_COLUMNS, config.max_rows) {
        Ok(table) => table,
        Err(e) => return Ok(import_error_response(&e)),
    };

    let mut summary = ImportResponse {
        total: table.rows.len(),
        ..Default::default()
    };
    let mut credentials = Vec::new();

    for row in &table.rows {
        let PreparedStudent {
            mut student,
            generated_password,
        } = match normalize_student(framework_id, row_request(&table, row)) {
            Ok(prepared) => prepared,
            Err(rejection) => {
                summary.failed += 1;
                summary.errors.push(row_error(row, &rejection));
                continue;
            }
        };

        // 已存在的学号跳过，其余冲突记为失败
        if let Some(rejection) = check_student_unique(&storage, &student).await? {
            if rejection.field() == "student_code" {
                summary.skipped += 1;
            } else {
                summary.failed += 1;
            }
            summary.errors.push(row_error(row, &rejection));
            continue;
        }

        student.password_hash = hash_password_blocking(student.password_hash).await?;

        match storage.create_student(student).await {
            Ok(created) => {
                summary.success += 1;
                if let Some(password) = generated_password {
                    credentials.push(GeneratedCredential {
                        row: row.row_num,
                        student_code: created.student_code,
                        username: created.username,
                        password,
                    });
                }
            }
            Err(e) => {
                warn!("Student import row {} failed: {}", row.row_num, e);
                summary.failed += 1;
                summary
                    .errors
                    .push(ImportRowError::new(row.row_num, "student_code", e.to_string()));
            }
        }
    }

    info!(
        "Student import into framework {}: {} created, {} skipped, {} failed",
        framework.code, summary.success, summary.skipped, summary.failed
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentImportResponse {
            summary,
            credentials,
        },
        "Student import finished",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_columns_map_to_none_when_blank() {
        let data = b"student_code,full_name,email,username,password\nS1,An,an@example.com,,\n";
        let table = CsvTable::parse(data, REQUIRED_COLUMNS, 10).unwrap();
        let req = row_request(&table, &table.rows[0]);
        assert_eq!(req.student_code, "S1");
        assert!(req.username.is_none());
        assert!(req.password.is_none());
    }
}
