use super::{SeaOrmStorage, db_err, page_and_size};
use crate::entity::prelude::*;
use crate::entity::{clos, courses, frameworks, pi_clo_links, pis, plo_clo_links, plo_pi_links, plos};
use crate::errors::{AqmsError, Result};
use crate::models::{
    PaginationInfo,
    frameworks::{
        entities::{Course, Framework, LinkKind, Outcome, OutcomeKind, OutcomeLink},
        requests::{
            CreateCourseRequest, CreateFrameworkRequest, CreateOutcomeRequest,
            FrameworkListQuery, UpdateCourseRequest, UpdateFrameworkRequest, UpdateOutcomeRequest,
        },
        responses::FrameworkListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建培养方案
    pub async fn create_framework_impl(&self, req: CreateFrameworkRequest) -> Result<Framework> {
        let now = chrono::Utc::now().timestamp();

        let model = FrameworkActiveModel {
            department_id: Set(req.department_id),
            code: Set(req.code),
            name: Set(req.name),
            major: Set(req.major),
            cohort: Set(req.cohort),
            academic_year: Set(req.academic_year),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("创建培养方案"))?;

        Ok(result.into_framework())
    }

    pub async fn get_framework_by_id_impl(&self, id: i64) -> Result<Option<Framework>> {
        let result = Frameworks::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询培养方案"))?;

        Ok(result.map(|m| m.into_framework()))
    }

    pub async fn get_framework_by_code_impl(&self, code: &str) -> Result<Option<Framework>> {
        let result = Frameworks::find()
            .filter(frameworks::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err("查询培养方案"))?;

        Ok(result.map(|m| m.into_framework()))
    }

    /// 分页列出培养方案
    pub async fn list_frameworks_with_pagination_impl(
        &self,
        query: FrameworkListQuery,
    ) -> Result<FrameworkListResponse> {
        let (page, size) = page_and_size(query.page, query.size);

        let mut select = Frameworks::find();

        if let Some(department_id) = query.department_id {
            select = select.filter(frameworks::Column::DepartmentId.eq(department_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(frameworks::Column::Code.contains(&escaped))
                    .add(frameworks::Column::Name.contains(&escaped))
                    .add(frameworks::Column::Major.contains(&escaped))
                    .add(frameworks::Column::Cohort.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_desc(frameworks::Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_err("查询培养方案总数"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_err("查询培养方案页数"))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_err("查询培养方案列表"))?;

        Ok(FrameworkListResponse {
            items: rows.into_iter().map(|m| m.into_framework()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_framework_impl(
        &self,
        id: i64,
        update: UpdateFrameworkRequest,
    ) -> Result<Option<Framework>> {
        if self.get_framework_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = FrameworkActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(major) = update.major {
            model.major = Set(major);
        }
        if let Some(cohort) = update.cohort {
            model.cohort = Set(cohort);
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(department_id) = update.department_id {
            model.department_id = Set(Some(department_id));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(db_err("更新培养方案"))?;

        Ok(Some(result.into_framework()))
    }

    /// 删除培养方案（课程、成果、映射、学生随外键级联删除）
    pub async fn delete_framework_impl(&self, id: i64) -> Result<bool> {
        let result = Frameworks::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除培养方案"))?;

        Ok(result.rows_affected > 0)
    }

    // 课程

    pub async fn create_course_impl(
        &self,
        framework_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let result = CourseActiveModel {
            framework_id: Set(framework_id),
            code: Set(req.code),
            name: Set(req.name),
            credits: Set(req.credits),
            semester: Set(req.semester),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err("创建课程"))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err("查询课程"))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_code_impl(
        &self,
        framework_id: i64,
        code: &str,
    ) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(courses::Column::FrameworkId.eq(framework_id))
            .filter(courses::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err("查询课程"))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_impl(&self, framework_id: i64) -> Result<Vec<Course>> {
        let rows = Courses::find()
            .filter(courses::Column::FrameworkId.eq(framework_id))
            .order_by_asc(courses::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err("查询课程列表"))?;

        Ok(rows.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = CourseActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(semester) = update.semester {
            model.semester = Set(Some(semester));
        }

        let result = model.update(&self.db).await.map_err(db_err("更新课程"))?;
        Ok(Some(result.into_course()))
    }

    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err("删除课程"))?;

        Ok(result.rows_affected > 0)
    }

    // 学习成果

    pub async fn create_outcome_impl(
        &self,
        kind: OutcomeKind,
        framework_id: i64,
        req: CreateOutcomeRequest,
    ) -> Result<Outcome> {
        let now = chrono::Utc::now().timestamp();

        let outcome = match kind {
            OutcomeKind::Plo => PloActiveModel {
                framework_id: Set(framework_id),
                code: Set(req.code),
                description: Set(req.description),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(db_err("创建 PLO"))?
            .into_outcome(),
            OutcomeKind::Pi => PiActiveModel {
                framework_id: Set(framework_id),
                code: Set(req.code),
                description: Set(req.description),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(db_err("创建 PI"))?
            .into_outcome(),
            OutcomeKind::Clo => {
                let course_id = req
                    .course_id
                    .ok_or_else(|| AqmsError::validation("CLO 必须指定所属课程"))?;
                CloActiveModel {
                    framework_id: Set(framework_id),
                    course_id: Set(course_id),
                    code: Set(req.code),
                    description: Set(req.description),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(db_err("创建 CLO"))?
                .into_outcome()
            }
        };

        Ok(outcome)
    }

    pub async fn get_outcome_impl(&self, kind: OutcomeKind, id: i64) -> Result<Option<Outcome>> {
        let outcome = match kind {
            OutcomeKind::Plo => Plos::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询 PLO"))?
                .map(|m| m.into_outcome()),
            OutcomeKind::Pi => Pis::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询 PI"))?
                .map(|m| m.into_outcome()),
            OutcomeKind::Clo => Clos::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询 CLO"))?
                .map(|m| m.into_outcome()),
        };

        Ok(outcome)
    }

    pub async fn get_outcome_by_code_impl(
        &self,
        kind: OutcomeKind,
        framework_id: i64,
        code: &str,
    ) -> Result<Option<Outcome>> {
        let outcome = match kind {
            OutcomeKind::Plo => Plos::find()
                .filter(plos::Column::FrameworkId.eq(framework_id))
                .filter(plos::Column::Code.eq(code))
                .one(&self.db)
                .await
                .map_err(db_err("查询 PLO"))?
                .map(|m| m.into_outcome()),
            OutcomeKind::Pi => Pis::find()
                .filter(pis::Column::FrameworkId.eq(framework_id))
                .filter(pis::Column::Code.eq(code))
                .one(&self.db)
                .await
                .map_err(db_err("查询 PI"))?
                .map(|m| m.into_outcome()),
            OutcomeKind::Clo => Clos::find()
                .filter(clos::Column::FrameworkId.eq(framework_id))
                .filter(clos::Column::Code.eq(code))
                .one(&self.db)
                .await
                .map_err(db_err("查询 CLO"))?
                .map(|m| m.into_outcome()),
        };

        Ok(outcome)
    }

    pub async fn list_outcomes_impl(
        &self,
        kind: OutcomeKind,
        framework_id: i64,
    ) -> Result<Vec<Outcome>> {
        let outcomes = match kind {
            OutcomeKind::Plo => Plos::find()
                .filter(plos::Column::FrameworkId.eq(framework_id))
                .order_by_asc(plos::Column::Code)
                .all(&self.db)
                .await
                .map_err(db_err("查询 PLO 列表"))?
                .into_iter()
                .map(|m| m.into_outcome())
                .collect(),
            OutcomeKind::Pi => Pis::find()
                .filter(pis::Column::FrameworkId.eq(framework_id))
                .order_by_asc(pis::Column::Code)
                .all(&self.db)
                .await
                .map_err(db_err("查询 PI 列表"))?
                .into_iter()
                .map(|m| m.into_outcome())
                .collect(),
            OutcomeKind::Clo => Clos::find()
                .filter(clos::Column::FrameworkId.eq(framework_id))
                .order_by_asc(clos::Column::CourseId)
                .order_by_asc(clos::Column::Code)
                .all(&self.db)
                .await
                .map_err(db_err("查询 CLO 列表"))?
                .into_iter()
                .map(|m| m.into_outcome())
                .collect(),
        };

        Ok(outcomes)
    }

    pub async fn update_outcome_impl(
        &self,
        kind: OutcomeKind,
        id: i64,
        update: UpdateOutcomeRequest,
    ) -> Result<Option<Outcome>> {
        if self.get_outcome_impl(kind, id).await?.is_none() {
            return Ok(None);
        }
        let now = chrono::Utc::now().timestamp();

        let outcome = match kind {
            OutcomeKind::Plo => {
                let mut model = PloActiveModel {
                    id: Set(id),
                    updated_at: Set(now),
                    ..Default::default()
                };
                if let Some(code) = update.code {
                    model.code = Set(code);
                }
                if let Some(description) = update.description {
                    model.description = Set(description);
                }
                model
                    .update(&self.db)
                    .await
                    .map_err(db_err("更新 PLO"))?
                    .into_outcome()
            }
            OutcomeKind::Pi => {
                let mut model = PiActiveModel {
                    id: Set(id),
                    updated_at: Set(now),
                    ..Default::default()
                };
                if let Some(code) = update.code {
                    model.code = Set(code);
                }
                if let Some(description) = update.description {
                    model.description = Set(description);
                }
                model
                    .update(&self.db)
                    .await
                    .map_err(db_err("更新 PI"))?
                    .into_outcome()
            }
            OutcomeKind::Clo => {
                let mut model = CloActiveModel {
                    id: Set(id),
                    updated_at: Set(now),
                    ..Default::default()
                };
                if let Some(code) = update.code {
                    model.code = Set(code);
                }
                if let Some(description) = update.description {
                    model.description = Set(description);
                }
                if let Some(course_id) = update.course_id {
                    model.course_id = Set(course_id);
                }
                model
                    .update(&self.db)
                    .await
                    .map_err(db_err("更新 CLO"))?
                    .into_outcome()
            }
        };

        Ok(Some(outcome))
    }

    /// 删除成果（相关映射随外键级联删除）
    pub async fn delete_outcome_impl(&self, kind: OutcomeKind, id: i64) -> Result<bool> {
        let result = match kind {
            OutcomeKind::Plo => Plos::delete_by_id(id).exec(&self.db).await,
            OutcomeKind::Pi => Pis::delete_by_id(id).exec(&self.db).await,
            OutcomeKind::Clo => Clos::delete_by_id(id).exec(&self.db).await,
        }
        .map_err(db_err("删除学习成果"))?;

        Ok(result.rows_affected > 0)
    }

    // 成果映射

    pub async fn create_link_impl(
        &self,
        kind: LinkKind,
        source_id: i64,
        target_id: i64,
        level: i32,
    ) -> Result<OutcomeLink> {
        let now = chrono::Utc::now().timestamp();

        let link = match kind {
            LinkKind::PloPi => PloPiLinkActiveModel {
                plo_id: Set(source_id),
                pi_id: Set(target_id),
                level: Set(level),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(db_err("创建 PLO-PI 映射"))?
            .into_link(),
            LinkKind::PloClo => PloCloLinkActiveModel {
                plo_id: Set(source_id),
                clo_id: Set(target_id),
                level: Set(level),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(db_err("创建 PLO-CLO 映射"))?
            .into_link(),
            LinkKind::PiClo => PiCloLinkActiveModel {
                pi_id: Set(source_id),
                clo_id: Set(target_id),
                level: Set(level),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(db_err("创建 PI-CLO 映射"))?
            .into_link(),
        };

        Ok(link)
    }

    pub async fn get_link_impl(&self, kind: LinkKind, id: i64) -> Result<Option<OutcomeLink>> {
        let link = match kind {
            LinkKind::PloPi => PloPiLinks::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询映射"))?
                .map(|m| m.into_link()),
            LinkKind::PloClo => PloCloLinks::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询映射"))?
                .map(|m| m.into_link()),
            LinkKind::PiClo => PiCloLinks::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(db_err("查询映射"))?
                .map(|m| m.into_link()),
        };

        Ok(link)
    }

    pub async fn find_link_impl(
        &self,
        kind: LinkKind,
        source_id: i64,
        target_id: i64,
    ) -> Result<Option<OutcomeLink>> {
        let link = match kind {
            LinkKind::PloPi => PloPiLinks::find()
                .filter(plo_pi_links::Column::PloId.eq(source_id))
                .filter(plo_pi_links::Column::PiId.eq(target_id))
                .one(&self.db)
                .await
                .map_err(db_err("查询映射"))?
                .map(|m| m.into_link()),
            LinkKind::PloClo => PloCloLinks::find()
                .filter(plo_clo_links::Column::PloId.eq(source_id))
                .filter(plo_clo_links::Column::CloId.eq(target_id))
                .one(&self.db)
                .await
                .map_err(db_err("查询映射"))?
                .map(|m| m.into_link()),
            LinkKind::PiClo => PiCloLinks::find()
                .filter(pi_clo_links::Column::PiId.eq(source_id))
                .filter(pi_clo_links::Column::CloId.eq(target_id))
                .one(&self.db)
                .await
                .map_err(db_err("查询映射"))?
                .map(|m| m.into_link()),
        };

        Ok(link)
    }

    /// 列出方案内某类映射（按源端成果归属过滤）
    pub async fn list_links_impl(
        &self,
        kind: LinkKind,
        framework_id: i64,
    ) -> Result<Vec<OutcomeLink>> {
        let (source_kind, _) = kind.ends();
        let source_ids: Vec<i64> = self
            .list_outcomes_impl(source_kind, framework_id)
            .await?
            .into_iter()
            .map(|o| o.id)
            .collect();

        if source_ids.is_empty() {
            return Ok(Vec::new());
        }

        let links = match kind {
            LinkKind::PloPi => PloPiLinks::find()
                .filter(plo_pi_links::Column::PloId.is_in(source_ids))
                .order_by_asc(plo_pi_links::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err("查询映射列表"))?
                .into_iter()
                .map(|m| m.into_link())
                .collect(),
            LinkKind::PloClo => PloCloLinks::find()
                .filter(plo_clo_links::Column::PloId.is_in(source_ids))
                .order_by_asc(plo_clo_links::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err("查询映射列表"))?
                .into_iter()
                .map(|m| m.into_link())
                .collect(),
            LinkKind::PiClo => PiCloLinks::find()
                .filter(pi_clo_links::Column::PiId.is_in(source_ids))
                .order_by_asc(pi_clo_links::Column::Id)
                .all(&self.db)
                .await
                .map_err(db_err("查询映射列表"))?
                .into_iter()
                .map(|m| m.into_link())
                .collect(),
        };

        Ok(links)
    }

    pub async fn update_link_level_impl(
        &self,
        kind: LinkKind,
        id: i64,
        level: i32,
    ) -> Result<Option<OutcomeLink>> {
        if self.get_link_impl(kind, id).await?.is_none() {
            return Ok(None);
        }

        let link = match kind {
            LinkKind::PloPi => PloPiLinkActiveModel {
                id: Set(id),
                level: Set(level),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map_err(db_err("更新映射"))?
            .into_link(),
            LinkKind::PloClo => PloCloLinkActiveModel {
                id: Set(id),
                level: Set(level),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map_err(db_err("更新映射"))?
            .into_link(),
            LinkKind::PiClo => PiCloLinkActiveModel {
                id: Set(id),
                level: Set(level),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map_err(db_err("更新映射"))?
            .into_link(),
        };

        Ok(Some(link))
    }

    pub async fn delete_link_impl(&self, kind: LinkKind, id: i64) -> Result<bool> {
        let result = match kind {
            LinkKind::PloPi => PloPiLinks::delete_by_id(id).exec(&self.db).await,
            LinkKind::PloClo => PloCloLinks::delete_by_id(id).exec(&self.db).await,
            LinkKind::PiClo => PiCloLinks::delete_by_id(id).exec(&self.db).await,
        }
        .map_err(db_err("删除映射"))?;

        Ok(result.rows_affected > 0)
    }
}
