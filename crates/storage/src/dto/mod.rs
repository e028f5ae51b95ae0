pub mod fixture;
pub mod member;
pub mod score;
pub mod standings;
pub mod week;
