//! Per-item classification: category, quality, tags and summary.
//!
//! Quality is held on a single 0-100 scale. The classification call reports
//! 0-10 and is converted by [`from_ten_point`] when the reply is parsed.

mod model;
mod store;

pub use model::{
    Classification, ClassificationPayload, Complexity, clamp_percent, from_ten_point,
};
pub use store::{ClassificationClient, ClassificationStore};
