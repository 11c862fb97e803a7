use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use super::challenge::{ChallengeRequest, SolverConfig};
use super::Solver;
use crate::config::{ApiSettings, Settings};
use crate::dns::{split_domain, Credentials, DnsError, DnsRecord, Lookup, WebsupportClient};
use crate::secrets::CredentialStore;

/// DNS-01 solver publishing challenge TXT records through Websupport.
///
/// Holds no per-challenge state: every call builds its own client from the
/// challenge's solver config, so concurrent challenges never share credentials.
pub struct WebsupportSolver {
    name: String,
    api: ApiSettings,
    store: CredentialStore,
}

impl WebsupportSolver {
    pub fn new(name: &str, api: ApiSettings, store: CredentialStore) -> Self {
        Self {
            name: name.to_string(),
            api,
            store,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.solver.name,
            settings.api.clone(),
            CredentialStore::new(settings.solver.credentials_path.clone()),
        )
    }

    fn credentials(&self, config: &SolverConfig) -> Result<Credentials> {
        let secret_name = &config.api_key_secret_ref.name;
        if !secret_name.is_empty() {
            return self
                .store
                .get(secret_name)
                .with_context(|| format!("failed to load secret {}", secret_name));
        }

        if config.api_key.is_empty() || config.api_secret.is_empty() {
            return Err(anyhow!(
                "no Websupport credentials configured: set ApiKey/ApiSecret or apiKeySecretRef"
            ));
        }

        Ok(Credentials {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    pub fn client(&self, config: &SolverConfig) -> Result<WebsupportClient> {
        let credentials = self.credentials(config)?;
        let client =
            WebsupportClient::with_endpoint(credentials, &self.api.base_url, self.api.timeout())?;
        Ok(client)
    }
}

#[async_trait]
impl Solver for WebsupportSolver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn present(&self, ch: &ChallengeRequest) -> Result<()> {
        let client = self.client(&ch.config)?;
        let domain = split_domain(&ch.resolved_fqdn)?;

        info!(
            "Attempting to create record '{}' in zone {} for {}",
            domain.name, domain.zone, ch.resolved_fqdn
        );

        let record = DnsRecord::txt(&domain.name, &ch.key, self.api.ttl);
        let rejection = match client.create_record(&domain.zone, &record).await {
            Ok(()) => return Ok(()),
            Err(DnsError::Provider(rejection)) => rejection,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to present {}", ch.resolved_fqdn));
            }
        };

        // Websupport rejects duplicates with the same error shape as any other
        // validation failure; only a record already carrying this key counts
        // as success.
        let pattern = DnsRecord::txt(&domain.name, &ch.key, 0);
        match client
            .lookup(&domain.zone, &pattern)
            .await
            .with_context(|| format!("failed to present {}", ch.resolved_fqdn))?
        {
            Lookup::Found(existing) => {
                warn!(
                    "Record '{}' in zone {} already present (id {}), provider said: {}",
                    domain.name, domain.zone, existing.id, rejection
                );
                Ok(())
            }
            Lookup::NotFound(_) => Err(DnsError::Provider(rejection))
                .with_context(|| format!("failed to present {}", ch.resolved_fqdn)),
        }
    }

    async fn clean_up(&self, ch: &ChallengeRequest) -> Result<()> {
        let client = self.client(&ch.config)?;
        let domain = split_domain(&ch.resolved_fqdn)?;

        info!(
            "Attempting to delete record '{}' in zone {} for {}",
            domain.name, domain.zone, ch.resolved_fqdn
        );

        // Scoped by content: other challenges for the same name keep their records.
        let pattern = DnsRecord::txt(&domain.name, &ch.key, 0);
        let removed = client
            .delete_record(&domain.zone, &pattern)
            .await
            .with_context(|| format!("failed to clean up {}", ch.resolved_fqdn))?;

        info!("Deleted record id {} from zone {}", removed.id, domain.zone);
        Ok(())
    }
}
