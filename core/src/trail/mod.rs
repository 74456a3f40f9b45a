pub mod store;

pub use store::{TrailPoint, TrailStore};
