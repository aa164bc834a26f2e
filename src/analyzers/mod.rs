//! Player aggregation and tier qualification.
//!
//! This module validates a player table, computes per-metric averages two
//! independent ways, splits players into the Perfect and Average tiers, ranks
//! each tier by rating and uploads results to S3.

pub mod aggregate;
pub mod analyzer;
pub mod qualify;
pub mod rank;
pub mod types;
pub mod utility;
pub mod validate;
pub mod writetos3;
