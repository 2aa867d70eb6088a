pub mod schedule;
pub mod spreadsheet_id;

pub use self::schedule::*;
pub use self::spreadsheet_id::*;
