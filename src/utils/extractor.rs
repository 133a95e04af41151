//! 路径参数提取器
//!
//! 从 match_info 中取出路径参数并校验，失败时直接返回 400 的统一响应。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(name: &str, message: String) -> actix_web::Error {
    InternalError::from_response(
        format!("invalid path parameter {name}"),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path_param(name, format!("缺少路径参数: {name}")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path_param(
            name,
            format!("路径参数 {name} 必须是正整数: {raw}"),
        )),
    }
}

macro_rules! safe_id_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

safe_id_extractor!(
    /// 通用 `{id}` 参数
    SafeIDI64,
    "id"
);
safe_id_extractor!(SafeFrameworkIdI64, "framework_id");
safe_id_extractor!(SafeCampaignIdI64, "campaign_id");
safe_id_extractor!(SafeSurveyIdI64, "survey_id");
safe_id_extractor!(SafeUserIdI64, "user_id");

/// 问卷邀请令牌（32 位十六进制）
#[derive(Debug, Clone)]
pub struct SafeSurveyToken(pub String);

impl FromRequest for SafeSurveyToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req.match_info().get("token").unwrap_or_default();
        if token.len() == 32 && token.chars().all(|c| c.is_ascii_hexdigit()) {
            ready(Ok(SafeSurveyToken(token.to_ascii_lowercase())))
        } else {
            ready(Err(bad_path_param("token", "无效的问卷令牌".to_string())))
        }
    }
}

/// `{kind}` 路径段，按目标类型的 `FromStr` 解析（如 `plos`、`plo-pi`）
#[derive(Debug, Clone, Copy)]
pub struct SafeKind<T>(pub T);

impl<T> FromRequest for SafeKind<T>
where
    T: std::str::FromStr<Err = String>,
{
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("kind").unwrap_or_default();
        ready(
            raw.parse::<T>()
                .map(SafeKind)
                .map_err(|msg| bad_path_param("kind", msg)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn positive_ids_are_extracted() {
        let req = TestRequest::default()
            .param("id", "42")
            .to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn non_numeric_or_negative_ids_are_rejected() {
        let req = TestRequest::default()
            .param("framework_id", "abc")
            .to_http_request();
        assert!(SafeFrameworkIdI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("id", "-3").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn kind_segments_are_parsed() {
        use crate::models::frameworks::entities::{LinkKind, OutcomeKind};

        let req = TestRequest::default().param("kind", "clos").to_http_request();
        let kind = SafeKind::<OutcomeKind>::extract(&req).await.unwrap();
        assert_eq!(kind.0, OutcomeKind::Clo);

        let req = TestRequest::default().param("kind", "plo-clo").to_http_request();
        let kind = SafeKind::<LinkKind>::extract(&req).await.unwrap();
        assert_eq!(kind.0, LinkKind::PloClo);

        let req = TestRequest::default().param("kind", "courses").to_http_request();
        assert!(SafeKind::<OutcomeKind>::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn survey_tokens_must_be_simple_uuids() {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let req = TestRequest::default()
            .param("token", token.clone())
            .to_http_request();
        assert_eq!(SafeSurveyToken::extract(&req).await.unwrap().0, token);

        let req = TestRequest::default()
            .param("token", "../etc/passwd")
            .to_http_request();
        assert!(SafeSurveyToken::extract(&req).await.is_err());
    }
}
