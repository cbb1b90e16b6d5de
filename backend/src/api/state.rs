//! Shared handler state assembled at startup.

use std::sync::Arc;

use crate::domain::ports::TokenCodec;
use crate::domain::{ExchangeLedger, SessionGuard, UserDirectory};

/// Services and adapters every handler can reach through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub directory: UserDirectory,
    pub ledger: ExchangeLedger,
    pub guard: SessionGuard,
    pub tokens: Arc<dyn TokenCodec>,
}
