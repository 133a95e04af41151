pub use sea_orm_migration::prelude::*;

mod m20260901_000001_create_accounts;
mod m20260901_000002_create_curriculum;
mod m20260901_000003_create_assessment;
mod m20260901_000004_create_surveys;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_accounts::Migration),
            Box::new(m20260901_000002_create_curriculum::Migration),
            Box::new(m20260901_000003_create_assessment::Migration),
            Box::new(m20260901_000004_create_surveys::Migration),
        ]
    }
}
