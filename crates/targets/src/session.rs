//! Per-user session orchestration: auth flows, the cached target
//! list, and the informational descriptor-verification pass.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tracemark_core::classify::AssetFile;
use tracemark_core::error::CoreError;
use tracemark_core::target::{Target, TargetChanges, TargetKind};
use tracemark_core::types::TargetId;
use tracemark_remote::auth::AuthProvider;
use tracemark_remote::object_store::ObjectStore;
use tracemark_remote::record_store::RecordStore;
use tracemark_remote::session::{Session, SessionCache};

use crate::repository::{DeleteOutcome, TargetRepository};
use crate::verifier::{DescriptorVerifier, ProbeReport};

// ---------------------------------------------------------------------------
// Auth flows
// ---------------------------------------------------------------------------

/// Authenticate and persist the session to the cache.
pub async fn login(
    provider: &dyn AuthProvider,
    cache: &SessionCache,
    email: &str,
    password: &str,
) -> Result<Session, CoreError> {
    let session = provider.login(email, password).await?;
    cache.store(&session)?;
    Ok(session)
}

/// Create an account, sign it in, and persist the session.
pub async fn register(
    provider: &dyn AuthProvider,
    cache: &SessionCache,
    email: &str,
    password: &str,
) -> Result<Session, CoreError> {
    let session = provider.register(email, password).await?;
    cache.store(&session)?;
    Ok(session)
}

/// Sign out: best-effort server-side revoke, then clear the cache.
/// Logging out while already logged out is fine.
pub async fn logout(provider: &dyn AuthProvider, cache: &SessionCache) -> Result<(), CoreError> {
    if let Some(session) = cache.load() {
        provider.logout(&session).await?;
    }
    cache.clear()
}

// ---------------------------------------------------------------------------
// Target session
// ---------------------------------------------------------------------------

/// One user's view of their targets.
///
/// Owns the repository, the cached list, and the cancellation token
/// governing any spawned verification probes. Mutations go through
/// `&mut self` and refresh the cached list afterward; there is no
/// other path to the list.
#[derive(Debug)]
pub struct TargetSession<O, R> {
    session: Session,
    repo: TargetRepository<O, R>,
    verifier: DescriptorVerifier,
    targets: Vec<Target>,
    verify_cancel: CancellationToken,
}

impl<O: ObjectStore, R: RecordStore> TargetSession<O, R> {
    /// Open a session from the cache. Fails with
    /// [`CoreError::NotLoggedIn`] when no session is cached — the
    /// caller sends the user to the login flow.
    pub fn open(cache: &SessionCache, repo: TargetRepository<O, R>) -> Result<Self, CoreError> {
        let session = cache.load().ok_or(CoreError::NotLoggedIn)?;
        Ok(Self {
            session,
            repo,
            verifier: DescriptorVerifier::new(),
            targets: Vec::new(),
            verify_cancel: CancellationToken::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The list as of the last refresh.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Re-fetch the owner's targets from the record store.
    pub async fn refresh(&mut self) -> Result<&[Target], CoreError> {
        self.targets = self.repo.list(&self.session.uid).await?;
        Ok(&self.targets)
    }

    /// Spawn an informational verification probe for every
    /// feature-tracked target in the current list.
    ///
    /// Reports arrive on `reports`; all probes share this session's
    /// cancellation token and stop when the session closes. Purely
    /// observational — nothing here affects the list.
    pub fn spawn_descriptor_verification(&self, reports: mpsc::Sender<ProbeReport>) {
        for target in &self.targets {
            if target.kind != TargetKind::FeatureTracked {
                continue;
            }
            let Some(base_url) = target.feature_base_url.clone().filter(|u| !u.is_empty()) else {
                continue;
            };
            // Fire-and-forget: the handle is not retained, the token
            // is the teardown path.
            let _ = self
                .verifier
                .spawn(base_url, reports.clone(), self.verify_cancel.child_token());
        }
    }

    /// Classify and upload a file selection, then refresh.
    pub async fn upload(&mut self, files: Vec<AssetFile>) -> Result<Target, CoreError> {
        let created = self.repo.upload(files, &self.session.uid).await?;
        self.refresh().await?;
        Ok(created)
    }

    /// Edit a target (the UI restricts this to name/kind), then
    /// refresh.
    pub async fn edit(
        &mut self,
        id: &TargetId,
        changes: &TargetChanges,
    ) -> Result<Target, CoreError> {
        let updated = self.repo.update(id, changes).await?;
        self.refresh().await?;
        Ok(updated)
    }

    /// Delete a target, then refresh.
    pub async fn delete(&mut self, id: &TargetId) -> Result<DeleteOutcome, CoreError> {
        let outcome = self.repo.delete(id).await?;
        self.refresh().await?;
        Ok(outcome)
    }

    /// Close the session, cancelling any in-flight verification
    /// probes.
    pub fn close(self) {
        self.verify_cancel.cancel();
    }
}
