//! Engine logic: pure normalization/validation/layout plus the store-backed
//! verification, history, calendar, and news services.

pub mod calendar;
pub mod dates;
pub mod news;
pub mod text;
pub mod validation;
pub mod verification;
