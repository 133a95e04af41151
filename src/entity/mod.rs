//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod clo_results;
pub mod clos;
pub mod courses;
pub mod departments;
pub mod evaluation_campaigns;
pub mod evaluation_requests;
pub mod frameworks;
pub mod observation_items;
pub mod observations;
pub mod pi_clo_links;
pub mod pis;
pub mod plo_clo_links;
pub mod plo_pi_links;
pub mod plos;
pub mod role_permissions;
pub mod roles;
pub mod rubrics;
pub mod students;
pub mod survey_assignments;
pub mod survey_questions;
pub mod survey_responses;
pub mod surveys;
pub mod user_roles;
pub mod users;
