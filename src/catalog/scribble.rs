//! Scribble app resource set
//!
//! Mounts category, user, photo, listing, author, publishable and article.
//! Every resource declares an explicit open access policy and a full
//! equality-filter whitelist; publishable and article additionally carry the
//! derived `url` field, the domain-qualified canonical URL of the content.

use std::sync::Arc;

use anyhow::Result;

use crate::db::repositories::{
    SqlxAuthorRepository, SqlxCategoryRepository, SqlxListingRepository, SqlxPhotoRepository,
    SqlxPublishableRepository, SqlxUserRepository,
};
use crate::db::DbPool;
use crate::resource::{AccessPolicy, ResourceRegistry};

use super::sources::{
    ArticleSource, AuthorSource, CategorySource, ListingSource, PhotoSource, PublishableSource,
    UserSource,
};

/// Build the scribble app's registry, in declaration order.
pub fn build_registry(pool: &DbPool, domain: &str) -> Result<ResourceRegistry> {
    let category = Arc::new(super::category_descriptor().access(AccessPolicy::Open));
    let user = super::user_descriptor().access(AccessPolicy::Open);
    let photo = Arc::new(super::photo_descriptor().access(AccessPolicy::Open));
    let listing = Arc::new(super::listing_descriptor().access(AccessPolicy::Open));
    let author = Arc::new(super::author_descriptor().access(AccessPolicy::Open));

    let url_domain = domain.to_string();
    let publishable = super::publishable_descriptor(
        photo.clone(),
        category.clone(),
        author.clone(),
        listing.clone(),
    )
    .access(AccessPolicy::Open)
    .computed("url", move |raw| super::domain_url(&url_domain, raw));
    let article = super::article_descriptor(&publishable);

    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let photo_repo = SqlxPhotoRepository::boxed(pool.clone());
    let listing_repo = SqlxListingRepository::boxed(pool.clone());
    let author_repo = SqlxAuthorRepository::boxed(pool.clone());
    let publishable_repo = SqlxPublishableRepository::boxed(pool.clone());

    let mut registry = ResourceRegistry::new();
    registry.register(
        Arc::unwrap_or_clone(category),
        Arc::new(CategorySource::new(category_repo)),
    )?;
    registry.register(user, Arc::new(UserSource::new(user_repo)))?;
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
