/*
 * Responsibility
 * - middleware の公開インターフェース
 * - gate (ページ認証), http (request-id / trace / limit / timeout), security_headers
 */
pub mod gate;
pub mod http;
pub mod security_headers;
