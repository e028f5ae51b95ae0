pub mod fixture;
pub mod member;
pub mod prediction;
pub mod result;
pub mod season;
pub mod standings;
pub mod week;
