/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: Gateway (path rules + verifier。起動後は read-only)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::gate::Gateway;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<Gateway>,
}

impl AppState {
    pub fn new(gate: Arc<Gateway>) -> Self {
        Self { gate }
    }
}
