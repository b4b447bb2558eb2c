pub use sea_orm_migration::prelude::*;

mod m20260301_000001_profile;
mod m20260301_000002_category;
mod m20260301_000003_listing;
mod m20260301_000004_subscription;
mod m20260301_000005_stripe_event;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_profile::Migration),
            Box::new(m20260301_000002_category::Migration),
            Box::new(m20260301_000003_listing::Migration),
            Box::new(m20260301_000004_subscription::Migration),
            Box::new(m20260301_000005_stripe_event::Migration),
        ]
    }
}
