//! The target repository adapter: classified uploads in, remote
//! object writes plus one record write out; deletions as best-effort
//! object cleanup followed by a guaranteed record delete.

use tracemark_core::classify::{classify, AssetFile, ClassifierOptions, UploadIntent};
use tracemark_core::error::CoreError;
use tracemark_core::naming::{
    descriptor_base_path, descriptor_object_path, timestamped_object_path,
};
use tracemark_core::target::{NewTarget, Target, TargetChanges, TargetKind};
use tracemark_core::types::{TargetId, UserId};
use tracemark_remote::object_store::ObjectStore;
use tracemark_remote::record_store::RecordStore;

use crate::config::MarkerDimensions;

/// URL/file suffixes of one NFT descriptor set, in upload order.
pub const DESCRIPTOR_SUFFIXES: [&str; 3] = [".iset", ".fset", ".fset3"];

/// Result of a [`TargetRepository::delete`].
///
/// Object cleanup is best-effort: a failed or impossible object
/// removal never blocks the record delete, but is reported here so
/// callers can surface orphaned objects instead of silently dropping
/// the information.
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    /// Object paths (or foreign URLs) whose removal failed.
    pub objects_failed: Vec<String>,
}

impl DeleteOutcome {
    /// True when every associated object was removed.
    pub fn fully_clean(&self) -> bool {
        self.objects_failed.is_empty()
    }
}

/// Translates upload intents into remote writes against the object
/// and record stores.
///
/// All multi-object operations run sequentially, one awaited call at
/// a time; there is no rollback and no idempotency token, matching
/// the remote store's lack of transactions.
#[derive(Debug)]
pub struct TargetRepository<O, R> {
    objects: O,
    records: R,
    classifier: ClassifierOptions,
    dimensions: MarkerDimensions,
}

impl<O: ObjectStore, R: RecordStore> TargetRepository<O, R> {
    pub fn new(objects: O, records: R) -> Self {
        Self {
            objects,
            records,
            classifier: ClassifierOptions::default(),
            dimensions: MarkerDimensions::default(),
        }
    }

    /// Override the dimensions recorded for new NFT targets.
    pub fn with_dimensions(mut self, dimensions: MarkerDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Override classifier behavior (e.g. strict stem checking).
    pub fn with_classifier_options(mut self, options: ClassifierOptions) -> Self {
        self.classifier = options;
        self
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Classify a selection and run the matching create workflow.
    pub async fn upload(
        &self,
        files: Vec<AssetFile>,
        owner_id: &UserId,
    ) -> Result<Target, CoreError> {
        match classify(files, self.classifier)? {
            UploadIntent::FeatureTracked {
                descriptors,
                display_image,
            } => {
                self.create_from_feature_tracked(descriptors, owner_id, display_image)
                    .await
            }
            UploadIntent::PatternMarker { file } => self.create_from_pattern(file, owner_id).await,
            UploadIntent::ImageMarker { file } => self.create_from_image(file, owner_id).await,
        }
    }

    /// Upload a three-file descriptor set and write one NFT record.
    ///
    /// Descriptors are stored deterministically at
    /// `{owner}/{stem}.{ext}` with overwrite, so re-uploading the same
    /// logical target replaces the previous set. Any failed descriptor
    /// upload aborts with [`CoreError::PartialUploadFailure`];
    /// already-uploaded descriptors stay behind.
    pub async fn create_from_feature_tracked(
        &self,
        descriptors: Vec<AssetFile>,
        owner_id: &UserId,
        display_image: Option<AssetFile>,
    ) -> Result<Target, CoreError> {
        let stem = descriptors
            .first()
            .and_then(|f| f.descriptor_stem())
            .ok_or_else(|| CoreError::Internal("descriptor set without a stem".into()))?
            .to_string();

        for file in &descriptors {
            let ext = file
                .extension()
                .ok_or_else(|| CoreError::Internal(format!("no extension on '{}'", file.name)))?;
            let path = descriptor_object_path(owner_id, &stem, &ext);
            self.objects
                .put(&path, &file.bytes, content_type_of(file), true)
                .await
                .map_err(|e| CoreError::PartialUploadFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
        }

        // The record stores the extension-less base; the AR engine
        // appends .iset/.fset/.fset3 itself.
        let feature_base_url = self
            .objects
            .public_url(&descriptor_base_path(owner_id, &stem));

        let primary_content_url = match display_image {
            Some(image) => Some(self.put_timestamped(&image, owner_id).await?),
            None => None,
        };

        let mut record = NewTarget::new(&stem, TargetKind::FeatureTracked, owner_id.clone());
        record.feature_base_url = Some(feature_base_url);
        record.primary_content_url = primary_content_url;
        record.width = Some(self.dimensions.width.to_string());
        record.height = Some(self.dimensions.height.to_string());

        let target = self.records.insert(&record).await?;
        tracing::info!(id = %target.id, name = %stem, "Created feature-tracked target");
        Ok(target)
    }

    /// Upload one `.patt` file and write a pattern-marker record.
    pub async fn create_from_pattern(
        &self,
        file: AssetFile,
        owner_id: &UserId,
    ) -> Result<Target, CoreError> {
        let pattern_url = self.put_timestamped(&file, owner_id).await?;
        let mut record = NewTarget::new(&file.name, TargetKind::PatternMarker, owner_id.clone());
        record.pattern_url = Some(pattern_url);

        let target = self.records.insert(&record).await?;
        tracing::info!(id = %target.id, name = %file.name, "Created pattern-marker target");
        Ok(target)
    }

    /// Upload one image and write an image-marker record.
    pub async fn create_from_image(
        &self,
        file: AssetFile,
        owner_id: &UserId,
    ) -> Result<Target, CoreError> {
        let content_url = self.put_timestamped(&file, owner_id).await?;
        let mut record = NewTarget::new(&file.name, TargetKind::ImageMarker, owner_id.clone());
        record.primary_content_url = Some(content_url);

        let target = self.records.insert(&record).await?;
        tracing::info!(id = %target.id, name = %file.name, "Created image-marker target");
        Ok(target)
    }

    // -----------------------------------------------------------------------
    // Read / update
    // -----------------------------------------------------------------------

    /// All targets owned by `owner_id`, in store order.
    pub async fn list(&self, owner_id: &UserId) -> Result<Vec<Target>, CoreError> {
        Ok(self.records.list_by_owner(owner_id).await?)
    }

    /// Apply a partial update to one record.
    pub async fn update(
        &self,
        id: &TargetId,
        changes: &TargetChanges,
    ) -> Result<Target, CoreError> {
        self.records
            .update(id, changes)
            .await?
            .ok_or_else(|| CoreError::RecordNotFound { id: id.clone() })
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Delete a target: best-effort cleanup of every associated
    /// object, then the record delete.
    ///
    /// Object-removal failures are logged, collected into the
    /// [`DeleteOutcome`], and never block the record delete. A missing
    /// record fails with [`CoreError::RecordNotFound`]; a failed final
    /// record delete with [`CoreError::RecordDeleteFailed`].
    pub async fn delete(&self, id: &TargetId) -> Result<DeleteOutcome, CoreError> {
        let target = self
            .records
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::RecordNotFound { id: id.clone() })?;

        let mut outcome = DeleteOutcome::default();

        if let Some(url) = non_empty(target.primary_content_url.as_deref()) {
            self.remove_by_url(url, &mut outcome).await;
        }
        if let Some(base_url) = non_empty(target.feature_base_url.as_deref()) {
            self.remove_descriptors(base_url, &mut outcome).await;
        }
        if let Some(url) = non_empty(target.pattern_url.as_deref()) {
            self.remove_by_url(url, &mut outcome).await;
        }

        self.records
            .delete(id)
            .await
            .map_err(|e| CoreError::RecordDeleteFailed {
                id: id.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            id = %id,
            orphaned = outcome.objects_failed.len(),
            "Deleted target record"
        );
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Upload with a collision-safe timestamped name; returns the
    /// public URL.
    async fn put_timestamped(&self, file: &AssetFile, owner_id: &UserId) -> Result<String, CoreError> {
        let path = timestamped_object_path(
            owner_id,
            &file.name,
            chrono::Utc::now().timestamp_millis(),
        );
        self.objects
            .put(&path, &file.bytes, content_type_of(file), true)
            .await?;
        Ok(self.objects.public_url(&path))
    }

    /// Best-effort removal of a single object addressed by public URL.
    async fn remove_by_url(&self, url: &str, outcome: &mut DeleteOutcome) {
        let Some(path) = self.objects.object_path(url) else {
            tracing::warn!(url, "Cannot derive object path from URL, skipping cleanup");
            outcome.objects_failed.push(url.to_string());
            return;
        };
        if let Err(e) = self.objects.remove(std::slice::from_ref(&path)).await {
            tracing::warn!(path = %path, error = %e, "Object cleanup failed");
            outcome.objects_failed.push(path);
        }
    }

    /// Best-effort removal of the three descriptor objects behind a
    /// feature base URL.
    async fn remove_descriptors(&self, base_url: &str, outcome: &mut DeleteOutcome) {
        let Some(base_path) = self.objects.object_path(base_url) else {
            tracing::warn!(url = base_url, "Cannot derive descriptor base path, skipping cleanup");
            outcome.objects_failed.push(base_url.to_string());
            return;
        };
        let paths: Vec<String> = DESCRIPTOR_SUFFIXES
            .iter()
            .map(|suffix| format!("{base_path}{suffix}"))
            .collect();
        if let Err(e) = self.objects.remove(&paths).await {
            tracing::warn!(base = %base_path, error = %e, "Descriptor cleanup failed");
            outcome.objects_failed.extend(paths);
        }
    }
}

/// Upload content type, falling back to the extension-derived guess.
fn content_type_of(file: &AssetFile) -> &str {
    if file.media_type.is_empty() {
        AssetFile::media_type_for_name(&file.name)
    } else {
        &file.media_type
    }
}

/// Treat the legacy empty-string column value as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
