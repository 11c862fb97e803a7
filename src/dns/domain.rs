use super::error::DnsError;

/// A challenge FQDN split into the Websupport zone and the record name
/// relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeDomain {
    pub zone: String,
    pub name: String,
}

/// Splits `fqdn` into zone (last two labels) and record name (the rest).
///
/// Known limitation: the zone is assumed to be exactly two labels, which is
/// wrong for multi-label public suffixes such as `co.uk` and for delegated
/// subzones. `a.example.co.uk` yields zone `co.uk`, name `a.example`.
pub fn split_domain(fqdn: &str) -> Result<ChallengeDomain, DnsError> {
    let trimmed = fqdn.strip_suffix('.').unwrap_or(fqdn);
    let labels: Vec<&str> = trimmed.split('.').collect();

    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(DnsError::Config(format!(
            "cannot derive zone from domain '{}'",
            fqdn
        )));
    }

    let split = labels.len() - 2;
    Ok(ChallengeDomain {
        zone: labels[split..].join("."),
        name: labels[..split].join("."),
    })
}
