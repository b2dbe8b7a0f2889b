mod climate;
pub mod db;
mod report;
pub mod routes;
mod startup;
mod templates;
mod utils;

pub use climate::*;
pub use db::*;
pub use report::*;
pub use routes::{climate::*, home::*};
pub use startup::*;
pub use utils::*;
