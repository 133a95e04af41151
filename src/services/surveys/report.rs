use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SurveyService;
use super::results::{export_header, export_rows, response_rate, summarize_questions};
use crate::models::ApiResponse;
use crate::models::surveys::responses::SurveyResultsResponse;
use crate::services::{csv_attachment, write_csv};

pub async fn results(
    service: &SurveyService,
    survey_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;

    let questions = storage.list_questions(survey.id).await?;
    let assignments = storage.list_survey_assignments(survey.id).await?;
    let responses = storage.list_survey_responses(survey.id).await?;

    let (invited, responded, rate) = response_rate(&assignments);
    let questions = summarize_questions(&questions, &responses);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SurveyResultsResponse {
            survey,
            invited,
            responded,
            response_rate: rate,
            questions,
        },
        "Survey results retrieved successfully",
    )))
}

pub async fn export_responses(
    service: &SurveyService,
    survey_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, survey) = service.load_survey(request, survey_id).await?;

    let questions = storage.list_questions(survey.id).await?;
    let assignments = storage.list_survey_assignments(survey.id).await?;
    let responses = storage.list_survey_responses(survey.id).await?;

    let header = export_header(&questions, survey.anonymous);
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let rows = export_rows(&questions, &assignments, &responses, survey.anonymous);
    let data = write_csv(&header, rows)?;

    Ok(csv_attachment(
        &format!("survey_{}_responses.csv", survey.id),
        data,
    ))
}
