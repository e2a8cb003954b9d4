/*
 * Responsibility
 * - Public surface of the middleware stack
 * - http: transport concerns (request id, access log, limits)
 * - auth: header trust gate + path policy
 */
pub mod auth;
pub mod http;
