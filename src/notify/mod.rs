// ==========================================
// Resto Supply - supplier notification boundary
// ==========================================
// The actual WhatsApp/email transports live in the surrounding
// application; this crate only defines the capability and a logging
// stand-in. Delivery failure is always non-fatal to callers.
// ==========================================

use async_trait::async_trait;
use tracing::info;

/// Outbound notification capability: `notify(destination, payload)`.
///
/// Implementations are injected at the composition root; engines never
/// construct a transport themselves.
#[async_trait]
pub trait SupplierNotifier: Send + Sync {
    async fn notify(&self, destination: &str, payload: &str) -> anyhow::Result<()>;
}

/// Default stand-in: logs the outbound message and reports success.
pub struct LoggingNotifier;

#[async_trait]
impl SupplierNotifier for LoggingNotifier {
    async fn notify(&self, destination: &str, payload: &str) -> anyhow::Result<()> {
        info!(destination, payload_len = payload.len(), "supplier notification (log only)");
        Ok(())
    }
}
