//! 预导入模块，方便使用

pub use super::clo_results::{
    ActiveModel as CloResultActiveModel, Entity as CloResults, Model as CloResultModel,
};
pub use super::clos::{ActiveModel as CloActiveModel, Entity as Clos, Model as CloModel};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::departments::{
    ActiveModel as DepartmentActiveModel, Entity as Departments, Model as DepartmentModel,
};
pub use super::evaluation_campaigns::{
    ActiveModel as CampaignActiveModel, Entity as EvaluationCampaigns, Model as CampaignModel,
};
pub use super::evaluation_requests::{
    ActiveModel as EvaluationRequestActiveModel, Entity as EvaluationRequests,
    Model as EvaluationRequestModel,
};
pub use super::frameworks::{
    ActiveModel as FrameworkActiveModel, Entity as Frameworks, Model as FrameworkModel,
};
pub use super::observation_items::{
    ActiveModel as ObservationItemActiveModel, Entity as ObservationItems,
    Model as ObservationItemModel,
};
pub use super::observations::{
    ActiveModel as ObservationActiveModel, Entity as Observations, Model as ObservationModel,
};
pub use super::pi_clo_links::{
    ActiveModel as PiCloLinkActiveModel, Entity as PiCloLinks, Model as PiCloLinkModel,
};
pub use super::pis::{ActiveModel as PiActiveModel, Entity as Pis, Model as PiModel};
pub use super::plo_clo_links::{
    ActiveModel as PloCloLinkActiveModel, Entity as PloCloLinks, Model as PloCloLinkModel,
};
pub use super::plo_pi_links::{
    ActiveModel as PloPiLinkActiveModel, Entity as PloPiLinks, Model as PloPiLinkModel,
};
pub use super::plos::{ActiveModel as PloActiveModel, Entity as Plos, Model as PloModel};
pub use super::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Entity as RolePermissions,
    Model as RolePermissionModel,
};
pub use super::roles::{ActiveModel as RoleActiveModel, Entity as Roles, Model as RoleModel};
pub use super::rubrics::{ActiveModel as RubricActiveModel, Entity as Rubrics, Model as RubricModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::survey_assignments::{
    ActiveModel as SurveyAssignmentActiveModel, Entity as SurveyAssignments,
    Model as SurveyAssignmentModel,
};
pub use super::survey_questions::{
    ActiveModel as SurveyQuestionActiveModel, Entity as SurveyQuestions,
    Model as SurveyQuestionModel,
};
pub use super::survey_responses::{
    ActiveModel as SurveyResponseActiveModel, Entity as SurveyResponses,
    Model as SurveyResponseModel,
};
pub use super::surveys::{ActiveModel as SurveyActiveModel, Entity as Surveys, Model as SurveyModel};
pub use super::user_roles::{
    ActiveModel as UserRoleActiveModel, Entity as UserRoles, Model as UserRoleModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
