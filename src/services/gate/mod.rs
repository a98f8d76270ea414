/*
 * Responsibility
 * - ページリクエストの認証 / ロール判定 (edge gate)
 * - path 分類 → token 探索 → 検証 → 判定 → loop guard の順で 1 リクエスト 1 回だけ評価する
 * - HTTP レスポンスへの変換は middleware 側 (ここは axum::http の型しか知らない)
 */
pub mod decision;
pub mod factory;
pub mod gateway;
pub mod identity;
pub mod locator;
pub mod loop_guard;
pub mod paths;
pub mod role;
pub mod verifier;

pub use decision::{Decision, RedirectReason, RejectReason};
pub use factory::build_gateway;
pub use gateway::{GateRequest, Gateway, Verdict};
pub use identity::{Identity, TrustLevel};
pub use paths::{GateRoutes, PathClass};
pub use role::Role;
pub use verifier::TokenVerifier;
