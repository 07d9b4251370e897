//! Asset classification: turn a user file selection into exactly one
//! upload intent, or reject it.
//!
//! Classification is pure and runs entirely over in-memory file
//! metadata, so an invalid selection is rejected before any network
//! call is made.

use crate::error::CoreError;

/// Upload file extensions the workflow accepts, lowercase, no dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &["iset", "fset", "fset3", "patt", "jpg", "jpeg", "png"];

/// The three extensions that together form one NFT descriptor set.
pub const DESCRIPTOR_EXTENSIONS: &[&str] = &["iset", "fset", "fset3"];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One user-selected file, metadata plus contents.
#[derive(Debug, Clone)]
pub struct AssetFile {
    /// Original filename, e.g. `mona.fset3`.
    pub name: String,
    /// Media type, e.g. `image/png`; empty when unknown.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl AssetFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Lowercased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Filename with a recognized descriptor extension stripped;
    /// `None` for non-descriptor files.
    pub fn descriptor_stem(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        DESCRIPTOR_EXTENSIONS
            .contains(&ext.to_ascii_lowercase().as_str())
            .then_some(stem)
    }

    /// True when the media type marks this as a displayable image.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// Media type guessed from the filename extension, for callers
    /// (like the CLI) that read raw bytes from disk.
    pub fn media_type_for_name(name: &str) -> &'static str {
        match name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()) {
            Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
            Some(ext) if ext == "png" => "image/png",
            _ => "application/octet-stream",
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The single upload workflow a selection maps to.
#[derive(Debug)]
pub enum UploadIntent {
    /// Three descriptor files forming one logical NFT target, plus an
    /// optional display image selected alongside them.
    FeatureTracked {
        /// The `.iset`/`.fset`/`.fset3` files in selection order.
        descriptors: Vec<AssetFile>,
        display_image: Option<AssetFile>,
    },
    PatternMarker { file: AssetFile },
    ImageMarker { file: AssetFile },
}

impl UploadIntent {
    /// Logical name of the target this intent will create.
    ///
    /// For descriptor sets this is the stem of the first file in
    /// selection order; otherwise the original filename.
    pub fn logical_name(&self) -> &str {
        match self {
            Self::FeatureTracked { descriptors, .. } => descriptors[0]
                .descriptor_stem()
                .unwrap_or(&descriptors[0].name),
            Self::PatternMarker { file } | Self::ImageMarker { file } => &file.name,
        }
    }
}

/// Knobs for [`classify`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierOptions {
    /// Reject descriptor sets whose three filename stems differ.
    ///
    /// Off by default: historically mismatched stems were grouped
    /// silently, and the first file's stem named the target. Turning
    /// this on makes that grouping an explicit
    /// [`CoreError::DescriptorStemMismatch`].
    pub require_matching_stems: bool,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a selection into exactly one [`UploadIntent`].
///
/// Every file must carry an allowed extension
/// ([`CoreError::InvalidFileType`] otherwise). Intents are tried in
/// priority order, first match wins:
///
/// 1. exactly three files whose extensions are exactly
///    `{.iset,.fset,.fset3}` → `FeatureTracked` (an image in the same
///    selection becomes its display asset);
/// 2. a `.patt` file → `PatternMarker`;
/// 3. a file with an `image/*` media type → `ImageMarker`;
/// 4. otherwise [`CoreError::NoRecognizedAssetCombination`].
pub fn classify(files: Vec<AssetFile>, options: ClassifierOptions) -> Result<UploadIntent, CoreError> {
    let invalid: Vec<String> = files
        .iter()
        .filter(|f| {
            !f.extension()
                .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(false)
        })
        .map(|f| f.name.clone())
        .collect();
    if !invalid.is_empty() {
        return Err(CoreError::InvalidFileType { names: invalid });
    }

    let mut descriptors = Vec::new();
    let mut pattern = None;
    let mut image = None;
    for file in files {
        if file.descriptor_stem().is_some() {
            descriptors.push(file);
        } else if pattern.is_none() && file.extension().as_deref() == Some("patt") {
            pattern = Some(file);
        } else if image.is_none() && file.is_image() {
            image = Some(file);
        }
    }

    if is_complete_descriptor_set(&descriptors) {
        if options.require_matching_stems {
            check_matching_stems(&descriptors)?;
        }
        return Ok(UploadIntent::FeatureTracked {
            descriptors,
            display_image: image,
        });
    }
    if let Some(file) = pattern {
        return Ok(UploadIntent::PatternMarker { file });
    }
    if let Some(file) = image {
        return Ok(UploadIntent::ImageMarker { file });
    }
    Err(CoreError::NoRecognizedAssetCombination)
}

/// Exactly three files covering `.iset`, `.fset`, and `.fset3` once
/// each.
fn is_complete_descriptor_set(descriptors: &[AssetFile]) -> bool {
    descriptors.len() == 3
        && DESCRIPTOR_EXTENSIONS.iter().all(|wanted| {
            descriptors
                .iter()
                .any(|f| f.extension().as_deref() == Some(*wanted))
        })
}

fn check_matching_stems(descriptors: &[AssetFile]) -> Result<(), CoreError> {
    let expected = descriptors[0].descriptor_stem().unwrap_or_default();
    for file in &descriptors[1..] {
        let found = file.descriptor_stem().unwrap_or_default();
        if found != expected {
            return Err(CoreError::DescriptorStemMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn file(name: &str, media_type: &str) -> AssetFile {
        AssetFile::new(name, media_type, vec![1, 2, 3])
    }

    fn descriptor_set(stem: &str) -> Vec<AssetFile> {
        vec![
            file(&format!("{stem}.iset"), ""),
            file(&format!("{stem}.fset"), ""),
            file(&format!("{stem}.fset3"), ""),
        ]
    }

    #[test]
    fn rejects_unknown_extension_listing_names() {
        let err = classify(
            vec![file("readme.txt", "text/plain"), file("ok.png", "image/png")],
            ClassifierOptions::default(),
        )
        .unwrap_err();
        assert_matches!(err, CoreError::InvalidFileType { names } if names == vec!["readme.txt"]);
    }

    #[test]
    fn rejects_extensionless_file() {
        let err = classify(vec![file("Makefile", "")], ClassifierOptions::default()).unwrap_err();
        assert_matches!(err, CoreError::InvalidFileType { .. });
    }

    #[test]
    fn complete_descriptor_set_is_feature_tracked() {
        let intent = classify(descriptor_set("mona"), ClassifierOptions::default()).unwrap();
        assert_matches!(intent, UploadIntent::FeatureTracked { ref descriptors, display_image: None }
            if descriptors.len() == 3);
        assert_eq!(intent.logical_name(), "mona");
    }

    #[test]
    fn extensions_are_case_insensitive() {
        let files = vec![
            file("Mona.ISET", ""),
            file("Mona.FSet", ""),
            file("Mona.fset3", ""),
        ];
        let intent = classify(files, ClassifierOptions::default()).unwrap();
        assert_matches!(intent, UploadIntent::FeatureTracked { .. });
    }

    #[test]
    fn mismatched_stems_group_silently_by_default() {
        let files = vec![
            file("alpha.iset", ""),
            file("beta.fset", ""),
            file("gamma.fset3", ""),
        ];
        let intent = classify(files, ClassifierOptions::default()).unwrap();
        // Name comes from the first file in selection order.
        assert_eq!(intent.logical_name(), "alpha");
    }

    #[test]
    fn mismatched_stems_rejected_when_strict() {
        let files = vec![
            file("alpha.iset", ""),
            file("beta.fset", ""),
            file("alpha.fset3", ""),
        ];
        let err = classify(
            files,
            ClassifierOptions {
                require_matching_stems: true,
            },
        )
        .unwrap_err();
        assert_matches!(err, CoreError::DescriptorStemMismatch { expected, found }
            if expected == "alpha" && found == "beta");
    }

    #[test]
    fn image_alongside_descriptors_becomes_display_asset() {
        let mut files = descriptor_set("mona");
        files.push(file("mona.jpg", "image/jpeg"));
        let intent = classify(files, ClassifierOptions::default()).unwrap();
        assert_matches!(intent, UploadIntent::FeatureTracked { display_image: Some(img), .. }
            if img.name == "mona.jpg");
    }

    #[test]
    fn duplicate_descriptor_extensions_are_not_a_set() {
        let files = vec![
            file("a.iset", ""),
            file("b.iset", ""),
            file("c.fset", ""),
        ];
        let err = classify(files, ClassifierOptions::default()).unwrap_err();
        assert_matches!(err, CoreError::NoRecognizedAssetCombination);
    }

    #[test]
    fn incomplete_descriptor_set_falls_through_to_image() {
        let files = vec![
            file("a.iset", ""),
            file("a.fset", ""),
            file("photo.jpg", "image/jpeg"),
        ];
        let intent = classify(files, ClassifierOptions::default()).unwrap();
        assert_matches!(intent, UploadIntent::ImageMarker { file } if file.name == "photo.jpg");
    }

    #[test]
    fn pattern_beats_image() {
        let files = vec![file("logo.patt", ""), file("logo.png", "image/png")];
        let intent = classify(files, ClassifierOptions::default()).unwrap();
        assert_matches!(intent, UploadIntent::PatternMarker { file } if file.name == "logo.patt");
    }

    #[test]
    fn lone_image_is_image_marker() {
        let intent = classify(
            vec![file("photo.jpg", "image/jpeg")],
            ClassifierOptions::default(),
        )
        .unwrap();
        assert_matches!(intent, UploadIntent::ImageMarker { .. });
    }

    #[test]
    fn valid_extensions_with_no_intent_are_rejected() {
        // A lone descriptor file passes extension validation but maps
        // to nothing.
        let err = classify(vec![file("a.fset", "")], ClassifierOptions::default()).unwrap_err();
        assert_matches!(err, CoreError::NoRecognizedAssetCombination);
    }
}
