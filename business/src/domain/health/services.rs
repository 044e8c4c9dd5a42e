use async_trait::async_trait;

/// Port for checking that the remote database answers requests.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Returns `Err` with a short reason when the database cannot be reached.
    async fn ping(&self) -> Result<(), String>;
}
