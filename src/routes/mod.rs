pub mod access;

pub mod auth;

pub mod evaluations;

pub mod frameworks;

pub mod me;

pub mod observations;

pub mod rubrics;

pub mod students;

pub mod surveys;

pub mod system;

pub mod users;

pub use access::configure_access_routes;
pub use auth::configure_auth_routes;
pub use evaluations::configure_evaluation_routes;
pub use frameworks::configure_framework_routes;
pub use me::configure_me_routes;
pub use observations::configure_observation_routes;
pub use rubrics::configure_rubric_routes;
pub use students::configure_student_routes;
pub use surveys::{configure_public_survey_routes, configure_survey_routes};
pub use system::configure_system_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 挂载全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_access_routes)
        .configure(configure_framework_routes)
        .configure(configure_student_routes)
        .configure(configure_me_routes)
        .configure(configure_rubric_routes)
        .configure(configure_observation_routes)
        .configure(configure_evaluation_routes)
        .configure(configure_survey_routes)
        .configure(configure_public_survey_routes)
        .configure(configure_system_routes);
}
