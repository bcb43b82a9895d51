//! Proxy checker control

use crate::error::Result;
use crate::protocol::{Payload, ProxyCheckerState};
use crate::transport::Transport;
use super::client::Client;

impl<T: Transport> Client<T> {
    /// Turns the named proxy checker on or off
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aparser_sdk::scheduler::Client;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new("http://127.0.0.1", "secret")?;
    /// client.set_proxy_checker_state("default", false).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set_proxy_checker_state(&self, checker: impl Into<String>, enabled: bool) -> Result<()> {
        let state = ProxyCheckerState {
            checker: checker.into(),
            enabled,
        };
        log::info!("Setting proxy checker '{}' to {}", state.checker, u8::from(enabled));

        self.send(Payload::ChangeProxyCheckerState(state)).await?;
        Ok(())
    }
}
