/*!
 * Principal extractors
 *
 * Responsibility:
 * - Hand the Principal attached by the pre-auth gate to handlers
 * - Method-level role checks (RequireRole / IsAdmin) run here, before the handler body
 */
mod principal;

pub use principal::IsAdmin;
