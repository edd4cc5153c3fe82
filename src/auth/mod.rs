pub mod cookies;
pub mod session;
pub mod supabase;

pub use cookies::{CookieJar, CookieOptions};
pub use session::{CookieNames, SessionClient};
pub use supabase::{AuthError, AuthProvider, AuthSession, SupabaseAuthClient};
