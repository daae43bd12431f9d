//! Model loading for the dashboard.
//!
//! The classifier is read once at startup and then shared read-only between
//! request handlers through an [`Arc`].

use crate::error::{ServingError, ServingResult};
use parking_lot::RwLock;
use placement_core::model::{load_classifier, Classifier};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// A loaded model ready for serving.
pub struct LoadedModel {
    /// Path where the model was loaded from
    pub path: PathBuf,

    /// Timestamp when the model was loaded
    pub loaded_at: Instant,

    /// The classifier itself
    pub classifier: Box<dyn Classifier>,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("path", &self.path)
            .field("loaded_at", &self.loaded_at)
            .field("kind", &self.classifier.kind())
            .field("n_trees", &self.classifier.n_trees())
            .finish()
    }
}

impl LoadedModel {
    /// Wrap an already built classifier.
    pub fn new(path: impl Into<PathBuf>, classifier: Box<dyn Classifier>) -> Self {
        Self {
            path: path.into(),
            loaded_at: Instant::now(),
            classifier,
        }
    }

    /// Borrow the classifier.
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

/// Holds the dashboard's classifier.
///
/// # Example
///
/// ```no_run
/// use placement_serving::model_loader::ModelLoader;
///
/// let loader = ModelLoader::new();
/// loader.load("placement_model.json").unwrap();
/// let model = loader.current_model().unwrap();
/// println!("Serving a {} model", model.classifier().kind());
/// ```
#[derive(Debug, Default)]
pub struct ModelLoader {
    current_model: RwLock<Option<Arc<LoadedModel>>>,
}

impl ModelLoader {
    /// Create a loader with no model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate the classifier at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ServingError::ModelLoadError`] when the file is missing,
    /// cannot be decoded, or describes an invalid model.
    pub fn load(&self, path: impl AsRef<Path>) -> ServingResult<Arc<LoadedModel>> {
        let path = path.as_ref();
        info!("Loading model from: {:?}", path);

        let classifier = load_classifier(path).map_err(|e| {
            error!("Failed to load model from {:?}: {}", path, e);
            ServingError::model_load(format!("{}: {}", path.display(), e))
        })?;

        let model = Arc::new(LoadedModel::new(path, classifier));
        info!(
            "Loaded {} model with {} trees over {} features",
            model.classifier.kind(),
            model.classifier.n_trees(),
            model.classifier.n_features()
        );
        *self.current_model.write() = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Install an already built model.
    pub fn install(&self, model: LoadedModel) -> Arc<LoadedModel> {
        let model = Arc::new(model);
        *self.current_model.write() = Some(Arc::clone(&model));
        model
    }

    /// The loaded model.
    pub fn current_model(&self) -> ServingResult<Arc<LoadedModel>> {
        self.current_model
            .read()
            .clone()
            .ok_or(ServingError::ModelNotLoaded)
    }

    /// Whether a model has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.current_model.read().is_some()
    }
}
