mod current;
mod require_role;

pub use self::current::CurrentPrincipal;
pub use self::require_role::IsAdmin;
