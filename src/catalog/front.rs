//! Front app resource set
//!
//! Mounts photo, listing, author, publishable and article. No resource
//! declares a filter whitelist, so every filter parameter is rejected, and
//! none names an access policy, so all carry the engine's restricted
//! default. The photo resource drops `slug` from its payload, including
//! inside embedded photos.

use std::sync::Arc;

use anyhow::Result;

use crate::db::repositories::{
    SqlxAuthorRepository, SqlxListingRepository, SqlxPhotoRepository, SqlxPublishableRepository,
};
use crate::db::DbPool;
use crate::resource::ResourceRegistry;

use super::sources::{ArticleSource, AuthorSource, ListingSource, PhotoSource, PublishableSource};

/// Build the front app's registry, in declaration order.
pub fn build_registry(pool: &DbPool) -> Result<ResourceRegistry> {
    let photo = Arc::new(super::photo_descriptor().exclude("slug").without_filters());
    let listing = Arc::new(super::listing_descriptor().without_filters());
    let author = Arc::new(super::author_descriptor().without_filters());
    // embedded only; the front app mounts no category resource
    let category = Arc::new(super::category_descriptor().without_filters());

    let publishable = super::publishable_descriptor(
        photo.clone(),
        category.clone(),
        author.clone(),
        listing.clone(),
    )
    .without_filters();
    let article = super::article_descriptor(&publishable).without_filters();

    let photo_repo = SqlxPhotoRepository::boxed(pool.clone());
    let listing_repo = SqlxListingRepository::boxed(pool.clone());
    let author_repo = SqlxAuthorRepository::boxed(pool.clone());
    let publishable_repo = SqlxPublishableRepository::boxed(pool.clone());

    let mut registry = ResourceRegistry::new();
    registry.register(
        Arc::unwrap_or_clone(photo),
        Arc::new(PhotoSource::new(photo_repo)),
    )?;
    registry.register(
        Arc::unwrap_or_clone(listing),
        Arc::new(ListingSource::new(listing_repo)),
    )?;
    registry.register(
        Arc::unwrap_or_clone(author),
        Arc::new(AuthorSource::new(author_repo)),
    )?;
    registry.register(
        publishable,
        Arc::new(PublishableSource::new(publishable_repo.clone())),
    )?;
    registry.register(article, Arc::new(ArticleSource::new(publishable_repo)))?;

    Ok(registry)
}
