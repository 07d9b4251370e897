//! Descriptor reachability probes.
//!
//! After an NFT target is created (or listed), the three descriptor
//! objects should be reachable at `{base}.iset` / `.fset` / `.fset3`.
//! The verifier issues a HEAD request per suffix, sequentially, and
//! reports each outcome individually; one failing suffix never
//! prevents checking the others, and probe failures never propagate
//! into the caller's control flow.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::repository::DESCRIPTOR_SUFFIXES;

/// Outcome of a single descriptor probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The object answered 2xx.
    Found,
    /// The host answered with a non-success status.
    Status(u16),
    /// The host could not be reached at all.
    Unreachable(String),
}

/// One probed URL and what happened.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub url: String,
    pub outcome: ProbeOutcome,
}

impl ProbeReport {
    pub fn is_found(&self) -> bool {
        self.outcome == ProbeOutcome::Found
    }
}

/// Issues HEAD probes against descriptor URLs.
#[derive(Debug, Clone, Default)]
pub struct DescriptorVerifier {
    http: reqwest::Client,
}

impl DescriptorVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Probe all three suffixes of `base_url` and return the reports.
    pub async fn verify(&self, base_url: &str) -> Vec<ProbeReport> {
        let mut reports = Vec::with_capacity(DESCRIPTOR_SUFFIXES.len());
        for suffix in DESCRIPTOR_SUFFIXES {
            reports.push(probe(&self.http, format!("{base_url}{suffix}")).await);
        }
        reports
    }

    /// Probe in a spawned task, delivering one [`ProbeReport`] per
    /// suffix through `reports`.
    ///
    /// The task stops between probes when `cancel` fires, so a closing
    /// session does not leak in-flight verification. Send failures
    /// (receiver dropped) also end the task.
    pub fn spawn(
        &self,
        base_url: String,
        reports: mpsc::Sender<ProbeReport>,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<()> {
        let http = self.http.clone();
        tokio::spawn(async move {
            for suffix in DESCRIPTOR_SUFFIXES {
                let url = format!("{base_url}{suffix}");
                let report = tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!(base = %base_url, "Descriptor verification cancelled");
                        return;
                    }
                    report = probe(&http, url) => report,
                };
                if reports.send(report).await.is_err() {
                    return;
                }
            }
        })
    }
}

async fn probe(http: &reqwest::Client, url: String) -> ProbeReport {
    match http.head(&url).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::info!(url = %url, "Descriptor reachable");
            ProbeReport {
                url,
                outcome: ProbeOutcome::Found,
            }
        }
        Ok(response) => {
            let status = response.status().as_u16();
            tracing::warn!(url = %url, status, "Descriptor probe got error status");
            ProbeReport {
                url,
                outcome: ProbeOutcome::Status(status),
            }
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Descriptor probe failed to reach host");
            ProbeReport {
                url,
                outcome: ProbeOutcome::Unreachable(e.to_string()),
            }
        }
    }
}
