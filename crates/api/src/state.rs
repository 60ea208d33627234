use std::sync::Arc;

use recipebox_core::aggregator::RatingAggregator;
use recipebox_core::catalog::RecipeCatalog;
use recipebox_core::library::ImageLibrary;
use recipebox_core::store::{ImageStore, RatingStore, RecipeStore, UserDirectory};

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: every field is an `Arc` or wraps `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub catalog: RecipeCatalog,
    pub ratings: RatingAggregator,
    pub images: ImageLibrary,
    /// Probed by `/health`.
    pub probe: Arc<dyn RecipeStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the services over one backend implementing every store trait.
    pub fn new<S>(store: Arc<S>, config: ServerConfig) -> Self
    where
        S: RecipeStore + RatingStore + UserDirectory + ImageStore + 'static,
    {
        let recipes: Arc<dyn RecipeStore> = store.clone();
        let ratings: Arc<dyn RatingStore> = store.clone();
        let users: Arc<dyn UserDirectory> = store.clone();
        let images: Arc<dyn ImageStore> = store;

        Self {
            catalog: RecipeCatalog::new(recipes.clone(), ratings.clone(), users.clone()),
            ratings: RatingAggregator::new(recipes.clone(), ratings, users),
            images: ImageLibrary::new(images, config.public_base_url.clone()),
            probe: recipes,
            config: Arc::new(config),
        }
    }
}
