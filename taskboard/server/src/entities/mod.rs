//! `SeaORM` entities for the tasks schema.

pub mod sea_orm_active_enums;
pub mod task;
