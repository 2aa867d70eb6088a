pub mod preview_processing;
pub mod reviews_processing;
pub mod schedule_processing;

pub use self::preview_processing::*;
pub use self::reviews_processing::*;
pub use self::schedule_processing::*;
