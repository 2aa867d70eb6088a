pub mod google_auth;
pub mod play_store;
pub mod sheets;

pub use self::google_auth::*;
pub use self::play_store::*;
pub use self::sheets::*;
