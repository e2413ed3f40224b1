//! Mortgage schedules and combining them across mortgages

mod data;
pub mod align;

pub use data::{MortgageSchedule, Segment, IMPOSSIBLE_LABEL, with_thousands};
pub use align::{align_segments, combine, combine_all};
