//! 学习成果 CSV 导入

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::FrameworkService;
use super::links::level_error;
use super::outcomes::MAX_DESCRIPTION_CHARS;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::access::entities::Permission;
use crate::models::common::{ImportResponse, ImportRowError};
use crate::models::frameworks::entities::{LinkKind, Outcome, OutcomeKind};
use crate::models::frameworks::requests::{CreateCourseRequest, CreateOutcomeRequest};
use crate::models::ApiResponse;
use crate::storage::Storage;
use crate::utils::csv_import::{CsvRow, CsvTable, read_file_from_multipart};
use crate::utils::validate::{validate_code, validate_required_text};

/// 各类成果导入的必需列
fn required_columns(kind: OutcomeKind) -> &'static [&'static str] {
    match kind {
        OutcomeKind::Plo => &["code", "description"],
        OutcomeKind::Pi => &["code", "description"],
        OutcomeKind::Clo => &["course_code", "code", "description"],
    }
}

// (上位种类, 代码列, 强度列, 映射种类)
type ParentColumn = (OutcomeKind, &'static str, &'static str, LinkKind);

/// 可选的上位映射列
fn parent_columns(kind: OutcomeKind) -> &'static [ParentColumn] {
    match kind {
        OutcomeKind::Plo => &[],
        OutcomeKind::Pi => &[(OutcomeKind::Plo, "plo_code", "plo_level", LinkKind::PloPi)],
        OutcomeKind::Clo => &[
            (OutcomeKind::Pi, "pi_code", "pi_level", LinkKind::PiClo),
            (OutcomeKind::Plo, "plo_code", "plo_level", LinkKind::PloClo),
        ],
    }
}

enum RowOutcome {
    Created,
    Skipped(ImportRowError),
}

/// 解析 (代码, 强度) 列对；给出代码时强度必填
fn parse_parent(
    table: &CsvTable,
    row: &CsvRow,
    code_col: &str,
    level_col: &str,
) -> std::result::Result<Option<(String, i32)>, ImportRowError> {
    let Some(code) = table.get(row, code_col) else {
        return Ok(None);
    };
    let level = table
        .get(row, level_col)
        .ok_or_else(|| {
            ImportRowError::new(
                row.row_num,
                level_col,
                format!("填写 {code_col} 时必须填写 {level_col}"),
            )
        })?
        .parse::<i32>()
        .map_err(|_| ImportRowError::new(row.row_num, level_col, "映射强度必须是整数"))?;
    if let Some(rejection) = level_error(level) {
        return Err(ImportRowError::new(row.row_num, level_col, rejection.message()));
    }
    Ok(Some((code.to_string(), level)))
}

/// 处理一行；存储错误向上返回，行内问题记为行错误
async fn import_row(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    kind: OutcomeKind,
    table: &CsvTable,
    row: &CsvRow,
) -> Result<std::result::Result<RowOutcome, ImportRowError>> {
    let row_num = row.row_num;

    let code = table.get(row, "code").unwrap_or_default().to_string();
    if let Err(msg) = validate_code(&code) {
        return Ok(Err(ImportRowError::new(row_num, "code", msg)));
    }
    let description = table.get(row, "description").unwrap_or_default().to_string();
    if let Err(msg) = validate_required_text(&description, MAX_DESCRIPTION_CHARS) {
        return Ok(Err(ImportRowError::new(row_num, "description", msg)));
    }

    if storage
        .get_outcome_by_code(kind, framework_id, &code)
        .await?
        .is_some()
    {
        return Ok(Ok(RowOutcome::Skipped(ImportRowError::new(
            row_num,
            "code",
            format!("{} 代码 {code} 已存在，已跳过", kind.label()),
        ))));
    }

    // 先解析上位映射，任一无效则整行不写入
    let mut parents: Vec<(Outcome, i32, LinkKind)> = Vec::new();
    for (parent_kind, code_col, level_col, link_kind) in parent_columns(kind) {
        let parsed = match parse_parent(table, row, code_col, level_col) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(Err(e)),
        };
        let Some((parent_code, level)) = parsed else {
            continue;
        };
        match storage
            .get_outcome_by_code(*parent_kind, framework_id, &parent_code)
            .await?
        {
            Some(parent) => parents.push((parent, level, *link_kind)),
            None => {
                return Ok(Err(ImportRowError::new(
                    row_num,
                    code_col,
                    format!("{} {parent_code} 不存在", parent_kind.label()),
                )));
            }
        }
    }

    let course_id = if kind == OutcomeKind::Clo {
        let course_code = table.get(row, "course_code").unwrap_or_default();
        match storage.get_course_by_code(framework_id, course_code).await? {
            Some(course) => Some(course.id),
            None => {
                let Some(course_name) = table.get(row, "course_name") else {
                    return Ok(Err(ImportRowError::new(
                        row_num,
                        "course_code",
                        format!("课程 {course_code} 不存在且未提供 course_name"),
                    )));
                };
                if let Err(msg) = validate_code(course_code) {
                    return Ok(Err(ImportRowError::new(row_num, "course_code", msg)));
                }
                let course = storage
                    .create_course(
                        framework_id,
                        CreateCourseRequest {
                            code: course_code.to_string(),
                            name: course_name.to_string(),
                            credits: 0,
                            semester: None,
                        },
                    )
                    .await?;
                info!("Course {} created during CLO import", course.code);
                Some(course.id)
            }
        }
    } else {
        None
    };

    let outcome = storage
        .create_outcome(
            kind,
            framework_id,
            CreateOutcomeRequest {
                code,
                description,
                course_id,
            },
        )
        .await?;

    for (parent, level, link_kind) in parents {
        storage
            .create_link(link_kind, parent.id, outcome.id, level)
            .await?;
    }

    Ok(Ok(RowOutcome::Created))
}

pub async fn import_outcomes(
    service: &FrameworkService,
    framework_id: i64,
    kind: OutcomeKind,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, framework) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;
    let config = &AppConfig::get().import;

    let file_bytes = match read_file_from_multipart(&mut payload, config.max_file_size).await {
        Ok(bytes) => bytes,
        Err(e) => return Ok(crate::services::import_error_response(&e)),
    };
    let table = match CsvTable::parse(&file_bytes, required_columns(kind), config.max_rows) {
        Ok(table) => table,
        Err(e) => return Ok(crate::services::import_error_response(&e)),
    };

    let mut report = ImportResponse {
        total: table.rows.len(),
        ..Default::default()
    };

    for row in &table.rows {
        match import_row(&storage, framework_id, kind, &table, row).await? {
            Ok(RowOutcome::Created) => report.success += 1,
            Ok(RowOutcome::Skipped(notice)) => {
                report.skipped += 1;
                report.errors.push(notice);
            }
            Err(e) => {
                report.failed += 1;
                report.errors.push(e);
            }
        }
    }

    info!(
        "{} import into framework {}: {} created, {} skipped, {} failed",
        kind.label(),
        framework.code,
        report.success,
        report.skipped,
        report.failed
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        report,
        format!("{} import finished", kind.label()),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_level_is_required_with_code() {
        let data = b"code,description,plo_code,plo_level\nPI1,a,PLO1,\nPI2,b,PLO1,9\nPI3,c,PLO1,2\nPI4,d,,\n";
        let table = CsvTable::parse(data, &["code"], 10).unwrap();

        let missing = parse_parent(&table, &table.rows[0], "plo_code", "plo_level").unwrap_err();
        assert_eq!(missing.field, "plo_level");
        assert_eq!(missing.row, 2);

        let out_of_range =
            parse_parent(&table, &table.rows[1], "plo_code", "plo_level").unwrap_err();
        assert!(out_of_range.message.contains("1 到 4"));

        assert_eq!(
            parse_parent(&table, &table.rows[2], "plo_code", "plo_level").unwrap(),
            Some(("PLO1".to_string(), 2))
        );
        assert_eq!(
            parse_parent(&table, &table.rows[3], "plo_code", "plo_level").unwrap(),
            None
        );
    }

    #[test]
    fn clo_import_needs_course_code() {
        assert!(required_columns(OutcomeKind::Clo).contains(&"course_code"));
        assert_eq!(parent_columns(OutcomeKind::Clo).len(), 2);
        assert!(parent_columns(OutcomeKind::Plo).is_empty());
    }
}
