//! `SeaORM` entities for the Linkdex database schema.

pub mod prelude;

pub mod category;
pub mod listing;
pub mod profile;
pub mod sea_orm_active_enums;
pub mod stripe_event;
pub mod subscription;
