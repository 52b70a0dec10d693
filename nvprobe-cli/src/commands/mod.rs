//! CLI command implementations

mod check;
mod config;
mod count;
mod dataset;
mod list;

pub use check::{check, CheckArgs};
pub use config::{config, ConfigArgs};
pub use count::count;
pub use dataset::dataset;
pub use list::{list, ListArgs};
