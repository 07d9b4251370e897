//! In-memory fakes for the remote boundaries, shared by the
//! integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tracemark_core::error::CoreError;
use tracemark_core::naming::{decode_path_component, encode_path_component};
use tracemark_core::target::{NewTarget, Target, TargetChanges};
use tracemark_core::types::{TargetId, UserId};
use tracemark_remote::auth::AuthProvider;
use tracemark_remote::object_store::ObjectStore;
use tracemark_remote::record_store::RecordStore;
use tracemark_remote::session::Session;
use tracemark_remote::StoreError;
use tracemark_targets::TargetRepository;

// Loopback host with a closed port: probe tests get an immediate
// connection error instead of a DNS lookup.
pub const FAKE_PUBLIC_PREFIX: &str = "http://127.0.0.1:9/storage/v1/object/public/ar-assets/";

// ---------------------------------------------------------------------------
// Object store fake
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ObjectState {
    objects: HashMap<String, Vec<u8>>,
    fail_puts: HashSet<String>,
    fail_removes: HashSet<String>,
    put_calls: usize,
    remove_calls: usize,
}

/// In-memory object store mirroring the remote's URL scheme.
#[derive(Debug, Clone, Default)]
pub struct FakeObjectStore {
    state: Arc<Mutex<ObjectState>>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.state.lock().unwrap().objects.contains_key(path)
    }

    pub fn object_count(&self) -> usize {
        self.state.lock().unwrap().objects.len()
    }

    pub fn stored_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.state.lock().unwrap().objects.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn put_calls(&self) -> usize {
        self.state.lock().unwrap().put_calls
    }

    pub fn remove_calls(&self) -> usize {
        self.state.lock().unwrap().remove_calls
    }

    /// Make the next put of `path` fail with a 500.
    pub fn fail_put_on(&self, path: &str) {
        self.state.lock().unwrap().fail_puts.insert(path.to_string());
    }

    /// Make any removal batch containing `path` fail with a 500.
    pub fn fail_remove_on(&self, path: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_removes
            .insert(path.to_string());
    }

    /// Simulate an object disappearing outside this client.
    pub fn delete_out_of_band(&self, path: &str) {
        self.state.lock().unwrap().objects.remove(path);
    }

    fn api_error() -> StoreError {
        StoreError::Api {
            status: 500,
            body: "injected failure".into(),
        }
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.put_calls += 1;
        if state.fail_puts.contains(path) {
            return Err(Self::api_error());
        }
        if !overwrite && state.objects.contains_key(path) {
            return Err(StoreError::Api {
                status: 409,
                body: "object exists".into(),
            });
        }
        state.objects.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{FAKE_PUBLIC_PREFIX}{}", encode_path_component(path))
    }

    fn object_path(&self, public_url: &str) -> Option<String> {
        let clean = public_url.split('?').next().unwrap_or(public_url);
        let encoded = clean.strip_prefix(FAKE_PUBLIC_PREFIX)?;
        (!encoded.is_empty()).then(|| decode_path_component(encoded))
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.remove_calls += 1;
        if paths.iter().any(|p| state.fail_removes.contains(p)) {
            return Err(Self::api_error());
        }
        // Removing a missing object is not an error, matching the
        // remote store.
        for path in paths {
            state.objects.remove(path);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Record store fake
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RecordState {
    rows: Vec<Target>,
    fail_delete: bool,
    insert_calls: usize,
}

/// In-memory `targets` table.
#[derive(Debug, Clone, Default)]
pub struct FakeRecordStore {
    state: Arc<Mutex<RecordState>>,
}

impl FakeRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }

    /// Make record deletes fail with a 500.
    pub fn fail_deletes(&self) {
        self.state.lock().unwrap().fail_delete = true;
    }
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn insert(&self, target: &NewTarget) -> Result<Target, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        let row = Target {
            id: uuid::Uuid::new_v4().to_string(),
            display_name: target.display_name.clone(),
            kind: target.kind,
            owner_id: target.owner_id.clone(),
            feature_base_url: target.feature_base_url.clone(),
            pattern_url: target.pattern_url.clone(),
            primary_content_url: target.primary_content_url.clone(),
            scale: None,
            position: None,
            rotation: None,
            width: target.width.clone(),
            height: target.height.clone(),
            marker_preset: None,
        };
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: &TargetId,
        changes: &TargetChanges,
    ) -> Result<Option<Target>, StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(row) = state.rows.iter_mut().find(|r| &r.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.display_name {
            row.display_name = name.clone();
        }
        if let Some(kind) = changes.kind {
            row.kind = kind;
        }
        if let Some(width) = &changes.width {
            row.width = Some(width.clone());
        }
        if let Some(height) = &changes.height {
            row.height = Some(height.clone());
        }
        if let Some(scale) = &changes.scale {
            row.scale = Some(scale.clone());
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &TargetId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete {
            return Err(StoreError::Api {
                status: 500,
                body: "injected delete failure".into(),
            });
        }
        state.rows.retain(|r| &r.id != id);
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Target>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .iter()
            .filter(|r| &r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &TargetId) -> Result<Option<Target>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.rows.iter().find(|r| &r.id == id).cloned())
    }
}

// ---------------------------------------------------------------------------
// Auth fake
// ---------------------------------------------------------------------------

/// Auth provider that accepts any non-empty password and derives the
/// uid from the email.
#[derive(Clone, Default)]
pub struct FakeAuth {
    logout_calls: Arc<Mutex<usize>>,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logout_calls(&self) -> usize {
        *self.logout_calls.lock().unwrap()
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn login(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        if password.is_empty() {
            return Err(CoreError::AuthError {
                message: "Incorrect email or password".into(),
            });
        }
        Ok(Session {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            access_token: Some("fake-token".into()),
        })
    }

    async fn register(&self, email: &str, password: &str) -> Result<Session, CoreError> {
        self.login(email, password).await
    }

    async fn logout(&self, _session: &Session) -> Result<(), CoreError> {
        *self.logout_calls.lock().unwrap() += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Repository over fresh fakes; the fakes stay inspectable because
/// they share state with the clones handed to the repository.
pub fn fake_repository() -> (FakeObjectStore, FakeRecordStore, TargetRepository<FakeObjectStore, FakeRecordStore>) {
    let objects = FakeObjectStore::new();
    let records = FakeRecordStore::new();
    let repo = TargetRepository::new(objects.clone(), records.clone());
    (objects, records, repo)
}
