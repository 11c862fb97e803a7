mod challenge;
mod websupport;

pub use challenge::{ChallengeRequest, SecretRef, SolverConfig};
pub use websupport::WebsupportSolver;

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Solver: Send + Sync {
    /// Name the solver is referenced by on the issuer.
    fn name(&self) -> &str;

    /// Publish the challenge TXT record. Must tolerate repeated calls with
    /// the same challenge: a provider rejection of the create is absorbed
    /// only when a record with this name and key is already published.
    async fn present(&self, ch: &ChallengeRequest) -> Result<()>;

    /// Remove only the TXT record carrying this challenge's key.
    async fn clean_up(&self, ch: &ChallengeRequest) -> Result<()>;
}
