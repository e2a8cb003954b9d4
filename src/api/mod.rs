/*
 * Responsibility
 * - actuator: operational endpoints (always reachable, no auth)
 * - v1: versioned application endpoints
 */
pub mod actuator;
pub mod v1;
