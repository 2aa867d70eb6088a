pub mod errors;
pub mod review_fetcher;
pub mod review_job;
pub mod sheet_writer;

pub use self::errors::*;
pub use self::review_fetcher::*;
pub use self::review_job::*;
pub use self::sheet_writer::*;
