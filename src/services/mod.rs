pub mod data_persistance;
pub mod debug_dump;
pub mod droid;
#[cfg(test)]
pub mod fake_session;
pub mod listing_walker;
pub mod pacer;
pub mod session;

pub use data_persistance::*;
pub use debug_dump::*;
pub use droid::*;
pub use listing_walker::*;
pub use pacer::*;
pub use session::*;
