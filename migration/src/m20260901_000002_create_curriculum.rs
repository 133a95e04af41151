use sea_orm_migration::prelude::*;

use crate::m20260901_000001_create_accounts::{Departments, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn cascade<T, C, U, D>(from_table: T, from_col: C, to_table: U, to_col: D) -> ForeignKeyCreateStatement
where
    T: IntoIden,
    C: IntoIden,
    U: IntoIden,
    D: IntoIden,
{
    ForeignKey::create()
        .from(from_table, from_col)
        .to(to_table, to_col)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 培养方案（专业 + 年级 + 学年）
        manager
            .create_table(
                Table::create()
                    .table(Frameworks::Table)
                    .if_not_exists()
                    .col(&mut pk(Frameworks::Id))
                    .col(ColumnDef::new(Frameworks::DepartmentId).big_integer().null())
                    .col(
                        ColumnDef::new(Frameworks::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Frameworks::Name).string().not_null())
                    .col(ColumnDef::new(Frameworks::Major).string().not_null())
                    .col(ColumnDef::new(Frameworks::Cohort).string().not_null())
                    .col(ColumnDef::new(Frameworks::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Frameworks::Description).text().null())
                    .col(ColumnDef::new(Frameworks::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Frameworks::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Frameworks::Table, Frameworks::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(&mut pk(Courses::Id))
                    .col(ColumnDef::new(Courses::FrameworkId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Code).string().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(
                        ColumnDef::new(Courses::Credits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Courses::Semester).integer().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut cascade(
                        Courses::Table,
                        Courses::FrameworkId,
                        Frameworks::Table,
                        Frameworks::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // PLO / PI 结构相同
        manager
            .create_table(
                Table::create()
                    .table(Plos::Table)
                    .if_not_exists()
                    .col(&mut pk(Plos::Id))
                    .col(ColumnDef::new(Plos::FrameworkId).big_integer().not_null())
                    .col(ColumnDef::new(Plos::Code).string().not_null())
                    .col(ColumnDef::new(Plos::Description).text().not_null())
                    .col(ColumnDef::new(Plos::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Plos::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut cascade(
                        Plos::Table,
                        Plos::FrameworkId,
                        Frameworks::Table,
                        Frameworks::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pis::Table)
                    .if_not_exists()
                    .col(&mut pk(Pis::Id))
                    .col(ColumnDef::new(Pis::FrameworkId).big_integer().not_null())
                    .col(ColumnDef::new(Pis::Code).string().not_null())
                    .col(ColumnDef::new(Pis::Description).text().not_null())
                    .col(ColumnDef::new(Pis::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Pis::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut cascade(
                        Pis::Table,
                        Pis::FrameworkId,
                        Frameworks::Table,
                        Frameworks::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clos::Table)
                    .if_not_exists()
                    .col(&mut pk(Clos::Id))
                    .col(ColumnDef::new(Clos::FrameworkId).big_integer().not_null())
                    .col(ColumnDef::new(Clos::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Clos::Code).string().not_null())
                    .col(ColumnDef::new(Clos::Description).text().not_null())
                    .col(ColumnDef::new(Clos::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Clos::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut cascade(
                        Clos::Table,
                        Clos::FrameworkId,
                        Frameworks::Table,
                        Frameworks::Id,
                    ))
                    .foreign_key(&mut cascade(
                        Clos::Table,
                        Clos::CourseId,
                        Courses::Table,
                        Courses::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 映射表，level 取值 1-4
        manager
            .create_table(
                Table::create()
                    .table(PloPiLinks::Table)
                    .if_not_exists()
                    .col(&mut pk(PloPiLinks::Id))
                    .col(ColumnDef::new(PloPiLinks::PloId).big_integer().not_null())
                    .col(ColumnDef::new(PloPiLinks::PiId).big_integer().not_null())
                    .col(ColumnDef::new(PloPiLinks::Level).integer().not_null())
                    .col(ColumnDef::new(PloPiLinks::CreatedAt).big_integer().not_null())
                    .foreign_key(&mut cascade(
                        PloPiLinks::Table,
                        PloPiLinks::PloId,
                        Plos::Table,
                        Plos::Id,
                    ))
                    .foreign_key(&mut cascade(
                        PloPiLinks::Table,
                        PloPiLinks::PiId,
                        Pis::Table,
                        Pis::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PloCloLinks::Table)
                    .if_not_exists()
                    .col(&mut pk(PloCloLinks::Id))
                    .col(ColumnDef::new(PloCloLinks::PloId).big_integer().not_null())
                    .col(ColumnDef::new(PloCloLinks::CloId).big_integer().not_null())
                    .col(ColumnDef::new(PloCloLinks::Level).integer().not_null())
                    .col(
                        ColumnDef::new(PloCloLinks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(&mut cascade(
                        PloCloLinks::Table,
                        PloCloLinks::PloId,
                        Plos::Table,
                        Plos::Id,
                    ))
                    .foreign_key(&mut cascade(
                        PloCloLinks::Table,
                        PloCloLinks::CloId,
                        Clos::Table,
                        Clos::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PiCloLinks::Table)
                    .if_not_exists()
                    .col(&mut pk(PiCloLinks::Id))
                    .col(ColumnDef::new(PiCloLinks::PiId).big_integer().not_null())
                    .col(ColumnDef::new(PiCloLinks::CloId).big_integer().not_null())
                    .col(ColumnDef::new(PiCloLinks::Level).integer().not_null())
                    .col(ColumnDef::new(PiCloLinks::CreatedAt).big_integer().not_null())
                    .foreign_key(&mut cascade(
                        PiCloLinks::Table,
                        PiCloLinks::PiId,
                        Pis::Table,
                        Pis::Id,
                    ))
                    .foreign_key(&mut cascade(
                        PiCloLinks::Table,
                        PiCloLinks::CloId,
                        Clos::Table,
                        Clos::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 学生（一个学生只属于一个培养方案）
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(&mut pk(Students::Id))
                    .col(
                        ColumnDef::new(Students::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FrameworkId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Students::StudentCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FullName).string().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(&mut cascade(
                        Students::Table,
                        Students::UserId,
                        Users::Table,
                        Users::Id,
                    ))
                    .foreign_key(&mut cascade(
                        Students::Table,
                        Students::FrameworkId,
                        Frameworks::Table,
                        Frameworks::Id,
                    ))
                    .to_owned(),
            )
            .await?;

        // 唯一索引
        let unique_indexes = [
            (
                "idx_courses_framework_code",
                Index::create()
                    .table(Courses::Table)
                    .col(Courses::FrameworkId)
                    .col(Courses::Code)
                    .to_owned(),
            ),
            (
                "idx_plos_framework_code",
                Index::create()
                    .table(Plos::Table)
                    .col(Plos::FrameworkId)
                    .col(Plos::Code)
                    .to_owned(),
            ),
            (
                "idx_pis_framework_code",
                Index::create()
                    .table(Pis::Table)
                    .col(Pis::FrameworkId)
                    .col(Pis::Code)
                    .to_owned(),
            ),
            (
                "idx_clos_course_code",
                Index::create()
                    .table(Clos::Table)
                    .col(Clos::CourseId)
                    .col(Clos::Code)
                    .to_owned(),
            ),
            (
                "idx_plo_pi_links_pair",
                Index::create()
                    .table(PloPiLinks::Table)
                    .col(PloPiLinks::PloId)
                    .col(PloPiLinks::PiId)
                    .to_owned(),
            ),
            (
                "idx_plo_clo_links_pair",
                Index::create()
                    .table(PloCloLinks::Table)
                    .col(PloCloLinks::PloId)
                    .col(PloCloLinks::CloId)
                    .to_owned(),
            ),
            (
                "idx_pi_clo_links_pair",
                Index::create()
                    .table(PiCloLinks::Table)
                    .col(PiCloLinks::PiId)
                    .col(PiCloLinks::CloId)
                    .to_owned(),
            ),
        ];

        for (name, mut index) in unique_indexes {
            manager
                .create_index(index.if_not_exists().name(name).unique().to_owned())
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_framework_id")
                    .table(Students::Table)
                    .col(Students::FrameworkId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PiCloLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PloCloLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PloPiLinks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pis::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Frameworks::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Frameworks {
    #[sea_orm(iden = "frameworks")]
    Table,
    Id,
    DepartmentId,
    Code,
    Name,
    Major,
    Cohort,
    AcademicYear,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    FrameworkId,
    Code,
    Name,
    Credits,
    Semester,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Plos {
    #[sea_orm(iden = "plos")]
    Table,
    Id,
    FrameworkId,
    Code,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Pis {
    #[sea_orm(iden = "pis")]
    Table,
    Id,
    FrameworkId,
    Code,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Clos {
    #[sea_orm(iden = "clos")]
    Table,
    Id,
    FrameworkId,
    CourseId,
    Code,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PloPiLinks {
    #[sea_orm(iden = "plo_pi_links")]
    Table,
    Id,
    PloId,
    PiId,
    Level,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PloCloLinks {
    #[sea_orm(iden = "plo_clo_links")]
    Table,
    Id,
    PloId,
    CloId,
    Level,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PiCloLinks {
    #[sea_orm(iden = "pi_clo_links")]
    Table,
    Id,
    PiId,
    CloId,
    Level,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    UserId,
    FrameworkId,
    StudentCode,
    FullName,
    CreatedAt,
    UpdatedAt,
}
