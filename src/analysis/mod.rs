//! The analysis core: domain models, detection policies, the unit
//! pipeline and the synthesis services that turn findings into a BOM.

pub mod domain;
pub mod policies;
pub mod services;
pub mod units;
