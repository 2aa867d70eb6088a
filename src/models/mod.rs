pub mod credentials;
pub mod job_status;
pub mod review;

pub use self::credentials::*;
pub use self::job_status::*;
pub use self::review::*;
