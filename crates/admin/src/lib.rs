pub mod error;
pub mod legacy;

pub use error::{AdminError, Result};
pub use legacy::{ImportPlan, LegacyData};
