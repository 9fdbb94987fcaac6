// src/services/listings.rs
//! Listing reads and admin writes on top of the backend.
use crate::app::App;
use crate::backend::{DocumentList, Query, Upload, ATTR_CREATED_AT};
use crate::domain::listing::{Listing, ListingDraft, ListingStatus};
use crate::domain::search::SearchFilters;
use crate::errors::ServerError;
use crate::requests::FilePart;
use log::{info, warn};

pub const FEATURED_LIMIT: u64 = 6;
/// Largest page the hosted API returns.
pub const ADMIN_LIMIT: u64 = 100;

pub const CARD_PREVIEW: (u32, u32) = (400, 300);
pub const DETAIL_PREVIEW: (u32, u32) = (800, 600);

#[derive(Debug)]
pub struct SearchPage {
    pub listings: Vec<Listing>,
    pub total: u64,
    pub pages: u64,
}

/// Decode documents, skipping (and logging) any that do not fit the schema.
fn decode(list: DocumentList) -> Vec<Listing> {
    list.documents
        .into_iter()
        .filter_map(|doc| match Listing::from_document(doc) {
            Ok(l) => Some(l),
            Err(e) => {
                warn!("skipping listing: {e}");
                None
            }
        })
        .collect()
}

pub fn featured(app: &App) -> Result<Vec<Listing>, ServerError> {
    let list = app.backend.list_documents(
        app.collection(),
        &[
            Query::equal("status", ListingStatus::Disponivel.as_str()),
            Query::order_desc(ATTR_CREATED_AT),
            Query::Limit(FEATURED_LIMIT),
        ],
    )?;
    Ok(decode(list))
}

pub fn search(app: &App, filters: &SearchFilters) -> Result<SearchPage, ServerError> {
    let list = app
        .backend
        .list_documents(app.collection(), &filters.to_queries())?;
    let total = list.total;
    Ok(SearchPage {
        listings: decode(list),
        total,
        pages: SearchFilters::total_pages(total),
    })
}

pub fn get(app: &App, id: &str) -> Result<Listing, ServerError> {
    let doc = app.backend.get_document(app.collection(), id)?;
    Ok(Listing::from_document(doc)?)
}

/// Every listing regardless of status, newest first.
pub fn admin_list(app: &App) -> Result<(Vec<Listing>, u64), ServerError> {
    let list = app.backend.list_documents(
        app.collection(),
        &[Query::order_desc(ATTR_CREATED_AT), Query::Limit(ADMIN_LIMIT)],
    )?;
    let total = list.total;
    Ok((decode(list), total))
}

pub fn photo_url(app: &App, photo_id: &str, size: (u32, u32)) -> String {
    app.backend
        .file_preview_url(app.bucket(), photo_id, size.0, size.1)
}

pub fn photo_urls(app: &App, listing: &Listing, size: (u32, u32)) -> Vec<String> {
    listing
        .photo_ids
        .iter()
        .map(|id| photo_url(app, id, size))
        .collect()
}

fn is_image(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}

/// Best-effort removal; a leftover file only costs storage.
fn discard_files(app: &App, secret: &str, ids: &[String]) {
    for id in ids {
        if let Err(e) = app.backend.delete_file(secret, app.bucket(), id) {
            warn!("could not delete photo {id}: {e}");
        }
    }
}

/// Upload all photos or none of them.
fn upload_photos(app: &App, secret: &str, photos: &[FilePart]) -> Result<Vec<String>, ServerError> {
    if let Some(bad) = photos.iter().find(|p| !is_image(&p.content_type)) {
        return Err(ServerError::BadRequest(format!(
            "{} não é uma imagem ({})",
            bad.file_name, bad.content_type
        )));
    }

    let mut ids = Vec::with_capacity(photos.len());
    for photo in photos {
        let upload = Upload {
            name: photo.file_name.clone(),
            mime_type: photo.content_type.clone(),
            bytes: photo.bytes.clone(),
        };
        match app.backend.create_file(secret, app.bucket(), upload) {
            Ok(stored) => ids.push(stored.id),
            Err(e) => {
                discard_files(app, secret, &ids);
                return Err(e.into());
            }
        }
    }
    Ok(ids)
}

/// Upload the photos, then create the document that references them.
pub fn create(
    app: &App,
    secret: &str,
    draft: ListingDraft,
    photos: &[FilePart],
) -> Result<Listing, ServerError> {
    let photo_ids = upload_photos(app, secret, photos)?;
    let data = draft.into_data(photo_ids.clone());

    let doc = match app.backend.create_document(secret, app.collection(), &data) {
        Ok(doc) => doc,
        Err(e) => {
            discard_files(app, secret, &photo_ids);
            return Err(e.into());
        }
    };

    info!("created listing {} with {} photos", doc.id, photo_ids.len());
    Ok(Listing::from_document(doc)?)
}

/// Rewrite a listing: `existing - removed + new` photos. Removed files are
/// deleted only after the document no longer references them.
pub fn update(
    app: &App,
    secret: &str,
    id: &str,
    draft: ListingDraft,
    new_photos: &[FilePart],
    removed: &[&str],
) -> Result<Listing, ServerError> {
    let current = get(app, id)?;

    let (kept, dropped): (Vec<String>, Vec<String>) = current
        .photo_ids
        .into_iter()
        .partition(|p| !removed.contains(&p.as_str()));

    let added = upload_photos(app, secret, new_photos)?;
    let mut photo_ids = kept;
    photo_ids.extend(added.iter().cloned());

    let doc = match app
        .backend
        .update_document(secret, app.collection(), id, &draft.into_data(photo_ids))
    {
        Ok(doc) => doc,
        Err(e) => {
            discard_files(app, secret, &added);
            return Err(e.into());
        }
    };

    discard_files(app, secret, &dropped);
    info!(
        "updated listing {id}: {} photos added, {} removed",
        added.len(),
        dropped.len()
    );
    Ok(Listing::from_document(doc)?)
}

/// Delete the document first, then its photos.
pub fn delete(app: &App, secret: &str, id: &str) -> Result<(), ServerError> {
    let listing = get(app, id)?;
    app.backend.delete_document(secret, app.collection(), id)?;
    discard_files(app, secret, &listing.photo_ids);
    info!("deleted listing {id}");
    Ok(())
}
