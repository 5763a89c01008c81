use crate::api::ApiError;
use crate::api::images::interfaces::{
    EditImageRequest, EditImageResponse, ImageCreateResponse, LegacyImageListResponse,
    ListImagesParams, ReorderResponse, UploadImageParams, UploadedFile,
};
use crate::api::search::interfaces::ImageListResponse;
use crate::api::search::service::matches_keyword;
use crate::auth::{Action, AuthUser, authorize};
use crate::database::image::{Image, Privacy};
use crate::database::{AlbumStore, CommentStore, DocumentStore, ImageStore, Write, to_fields};
use crate::media::{MediaStore, UploadNaming, UploadRequest, UploadedMedia, extract_exif};
use chrono::{SubsecRound, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

const DEFAULT_ALBUM_FOLDER: &str = "default";

/// Uploads the bytes to the CDN and builds the image record around the result.
async fn upload_to_cdn(
    media: &dyn MediaStore,
    uploader: &AuthUser,
    file: UploadedFile,
    folder: String,
    naming: UploadNaming,
) -> Result<Image, ApiError> {
    let exif = extract_exif(&file.bytes);
    let filename = file.filename.clone();
    let content_type = file.content_type.clone();
    let uploaded: UploadedMedia = media
        .upload(UploadRequest {
            bytes: file.bytes,
            filename: file.filename,
            folder,
            naming,
        })
        .await?;

    // Stored timestamps keep microseconds.
    let uploaded_at = Utc::now().trunc_subsecs(6);
    Ok(Image {
        id: Uuid::new_v4().to_string(),
        public_id: Some(uploaded.public_id),
        filename: Some(filename),
        url: Some(uploaded.secure_url),
        mime_type: content_type.or(uploaded.resource_type),
        format: uploaded.format,
        width: uploaded.width,
        height: uploaded.height,
        size_bytes: uploaded.bytes,
        title: None,
        caption: None,
        alt_text: None,
        license: None,
        privacy: Privacy::Public,
        uploaded_by: Some(uploader.uid.clone()),
        uploaded_at,
        album_id: None,
        tags: vec![],
        exif,
        likes: vec![],
        order: uploaded_at.timestamp(),
    })
}

/// Legacy upload: stored under the album folder (or `default`), replacing same-named files.
#[instrument(skip(store, media, file), fields(filename = %file.filename))]
pub async fn upload_legacy_image(
    store: &dyn DocumentStore,
    media: &dyn MediaStore,
    user: &AuthUser,
    file: UploadedFile,
    album: Option<String>,
) -> Result<ImageCreateResponse, ApiError> {
    authorize(Some(user), &Action::UploadImage)?;
    let folder = album
        .filter(|album| !album.is_empty())
        .unwrap_or_else(|| DEFAULT_ALBUM_FOLDER.to_owned());

    let image = upload_to_cdn(media, user, file, folder, UploadNaming::Overwrite).await?;
    ImageStore::create(store, &image).await?;
    info!("Stored image {}", image.id);

    Ok(ImageCreateResponse {
        id: image.id,
        filename: image.filename.unwrap_or_default(),
        storage_path: image.url.unwrap_or_default(),
        mime_type: image.mime_type,
        width: image.width,
        height: image.height,
        size_bytes: image.size_bytes,
        title: image.title,
        caption: image.caption,
        alt_text: image.alt_text,
        uploaded_at: image.uploaded_at,
    })
}

/// Upload into the uploader's own folder with a unique CDN name.
#[instrument(skip(store, media, file), fields(filename = %file.filename))]
pub async fn upload_image(
    store: &dyn DocumentStore,
    media: &dyn MediaStore,
    upload_root: &str,
    user: &AuthUser,
    file: UploadedFile,
    params: UploadImageParams,
) -> Result<Image, ApiError> {
    authorize(Some(user), &Action::UploadImage)?;
    let folder = format!("{upload_root}/{}", user.uid);

    let mut image = upload_to_cdn(media, user, file, folder, UploadNaming::Unique).await?;
    image.title = params.title;
    image.privacy = params.privacy.unwrap_or_default();
    image.album_id = params.album_id.filter(|album_id| !album_id.is_empty());
    ImageStore::create(store, &image).await?;
    info!("Stored image {}", image.id);

    Ok(image)
}

/// Public images, plus the requester's own non-public ones.
fn visible_to(image: &Image, requester: Option<&AuthUser>) -> bool {
    image.privacy == Privacy::Public || requester.is_some_and(|user| image.is_uploaded_by(&user.uid))
}

/// Filtered listing by gallery order, then `skip`/`limit` over the filtered set.
#[instrument(skip(store, requester))]
pub async fn list_images(
    store: &dyn DocumentStore,
    requester: Option<&AuthUser>,
    params: &ListImagesParams,
    default_limit: usize,
) -> Result<ImageListResponse, ApiError> {
    let keyword = params
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);
    let album_id = params.album_id.as_deref().filter(|id| !id.is_empty());

    let mut images = ImageStore::list_all(store).await?;
    images.sort_by_key(|image| image.order);
    let images: Vec<Image> = images
        .into_iter()
        .filter(|image| visible_to(image, requester))
        .filter(|image| album_id.is_none_or(|id| image.album_id.as_deref() == Some(id)))
        .filter(|image| {
            keyword
                .as_deref()
                .is_none_or(|keyword| matches_keyword(image, keyword))
        })
        .skip(params.skip)
        .take(params.limit.unwrap_or(default_limit))
        .collect();

    Ok(images.into())
}

/// Every visible image by ascending ordering index.
#[instrument(skip(store, requester))]
pub async fn list_legacy_images(
    store: &dyn DocumentStore,
    requester: Option<&AuthUser>,
) -> Result<LegacyImageListResponse, ApiError> {
    let images = ImageStore::list_ordered(store)
        .await?
        .into_iter()
        .filter(|image| visible_to(image, requester))
        .collect();
    Ok(LegacyImageListResponse { images })
}

async fn find_image(store: &dyn DocumentStore, image_id: &str) -> Result<Image, ApiError> {
    ImageStore::find_by_id(store, image_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Image {image_id} not found")))
}

#[instrument(skip(store, requester))]
pub async fn get_image(
    store: &dyn DocumentStore,
    requester: Option<&AuthUser>,
    image_id: &str,
) -> Result<Image, ApiError> {
    let image = find_image(store, image_id).await?;
    authorize(
        requester,
        &Action::ViewImage {
            privacy: image.privacy,
            uploader: image.uploaded_by.as_deref(),
        },
    )?;
    Ok(image)
}

/// Merge-writes the provided fields. An empty edit writes nothing.
#[instrument(skip(store, user, request))]
pub async fn edit_image(
    store: &dyn DocumentStore,
    user: &AuthUser,
    image_id: &str,
    request: &EditImageRequest,
) -> Result<EditImageResponse, ApiError> {
    let image = find_image(store, image_id).await?;
    authorize(
        Some(user),
        &Action::ModifyImage {
            uploader: image.uploaded_by.as_deref(),
        },
    )?;

    let updated = to_fields(request)?;
    if !updated.is_empty() {
        ImageStore::merge_fields(store, image_id, updated.clone()).await?;
    }
    Ok(EditImageResponse { ok: true, updated })
}

/// Who may delete an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    /// Editors and admins only, whoever uploaded it.
    Privileged,
    /// The uploader, editors and admins.
    OwnerOrPrivileged,
}

/// Deletes the image record, its comments and its album entry. The CDN copy is removed on a best-effort basis.
#[instrument(skip(store, media, user))]
pub async fn delete_image(
    store: &dyn DocumentStore,
    media: &dyn MediaStore,
    user: &AuthUser,
    image_id: &str,
    scope: DeleteScope,
) -> Result<(), ApiError> {
    if scope == DeleteScope::Privileged {
        authorize(Some(user), &Action::DeleteAnyImage)?;
    }
    let image = find_image(store, image_id).await?;
    if scope == DeleteScope::OwnerOrPrivileged {
        authorize(
            Some(user),
            &Action::ModifyImage {
                uploader: image.uploaded_by.as_deref(),
            },
        )?;
    }

    if let Some(public_id) = &image.public_id {
        if let Err(e) = media.destroy(public_id).await {
            warn!("Could not delete {public_id} from the media CDN, removing metadata anyway: {e}");
        }
    }

    let mut writes = CommentStore::delete_all_writes(store, image_id).await?;
    if let Some(album_id) = &image.album_id {
        if AlbumStore::find_by_id(store, album_id).await?.is_some() {
            writes.push(AlbumStore::remove_image_write(album_id, image_id));
        }
    }
    writes.push(Write::Delete {
        path: ImageStore::path(image_id),
    });
    store.commit(writes).await?;
    info!("Deleted image {image_id}");
    Ok(())
}

#[instrument(skip(store, user))]
pub async fn reorder_images(
    store: &dyn DocumentStore,
    user: &AuthUser,
    order: Vec<String>,
) -> Result<ReorderResponse, ApiError> {
    authorize(Some(user), &Action::ReorderImages)?;
    ImageStore::reorder(store, &order).await?;
    Ok(ReorderResponse {
        status: "ok".to_owned(),
        order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::album::Album;
    use crate::database::app_user::UserRole;
    use crate::database::comment::Comment;
    use crate::database::{DocumentStore, MemoryDocumentStore};
    use crate::media::MediaError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use color_eyre::Result;
    use std::sync::Mutex;

    /// Records calls; optionally fails every destroy.
    #[derive(Default)]
    struct FakeMedia {
        fail_destroy: bool,
        uploads: Mutex<Vec<(String, UploadNaming)>>,
        destroyed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MediaStore for FakeMedia {
        async fn upload(&self, request: UploadRequest) -> Result<UploadedMedia, MediaError> {
            self.uploads
                .lock()
                .expect("lock")
                .push((request.folder.clone(), request.naming));
            Ok(UploadedMedia {
                public_id: format!("{}/{}", request.folder, request.filename),
                secure_url: format!("https://cdn.test/{}", request.filename),
                width: Some(640),
                height: Some(480),
                bytes: Some(request.bytes.len() as u64),
                format: Some("jpg".into()),
                resource_type: Some("image".into()),
            })
        }

        async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
            self.destroyed.lock().expect("lock").push(public_id.to_owned());
            if self.fail_destroy {
                return Err(MediaError::Upstream {
                    status: 500,
                    message: "CDN down".into(),
                });
            }
            Ok(())
        }
    }

    fn user(uid: &str, role: UserRole) -> AuthUser {
        AuthUser {
            uid: uid.to_owned(),
            email: Some(format!("{uid}@example.com")),
            role,
        }
    }

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            bytes: Bytes::from_static(b"not really a jpeg"),
            filename: name.to_owned(),
            content_type: Some("image/jpeg".into()),
        }
    }

    async fn upload_as(
        store: &MemoryDocumentStore,
        media: &FakeMedia,
        uploader: &AuthUser,
        privacy: Privacy,
    ) -> Result<Image> {
        Ok(upload_image(
            store,
            media,
            "root",
            uploader,
            file("photo.jpg"),
            UploadImageParams {
                title: Some("A photo".into()),
                album_id: None,
                privacy: Some(privacy),
            },
        )
        .await?)
    }

    #[tokio::test]
    async fn structured_upload_records_uploader_and_folder() -> Result<()> {
        // ARRANGE
        let store = MemoryDocumentStore::new();
        let media = FakeMedia::default();
        let editor = user("ed", UserRole::Editor);

        // ACT
        let image = upload_as(&store, &media, &editor, Privacy::Private).await?;

        // ASSERT
        let stored = ImageStore::find_by_id(&store, &image.id).await?;
        assert_eq!(stored.as_ref(), Some(&image));
        assert_eq!(image.uploaded_by.as_deref(), Some("ed"));
        assert_eq!(image.privacy, Privacy::Private);
        assert_eq!(image.mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(image.order, image.uploaded_at.timestamp());
        assert_eq!(
            media.uploads.lock().expect("lock").as_slice(),
            &[("root/ed".to_owned(), UploadNaming::Unique)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn legacy_upload_uses_album_folder_and_requires_privilege() -> Result<()> {
        let store = MemoryDocumentStore::new();
        let media = FakeMedia::default();

        let created = upload_legacy_image(
            &store,
            &media,
            &user("ad", UserRole::Admin),
            file("beach.jpg"),
            Some("holiday".into()),
        )
        .await?;
        let denied = upload_legacy_image(
            &store,
            &media,
            &user("vi", UserRole::Visitor),
            file("beach.jpg"),
            None,
        )
        .await;

        assert_eq!(created.filename, "beach.jpg");
        assert_eq!(created.storage_path, "https://cdn.test/beach.jpg");
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));
        assert_eq!(
            media.uploads.lock().expect("lock").as_slice(),
            &[("holiday".to_owned(), UploadNaming::Overwrite)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn private_image_is_only_visible_to_owner_and_privileged() -> Result<()> {
        // ARRANGE
        let store = MemoryDocumentStore::new();
        let media = FakeMedia::default();
        let owner = user("owner", UserRole::Editor);
        let image = upload_as(&store, &media, &owner, Privacy::Private).await?;
        let owner_as_visitor = user("owner", UserRole::Visitor);

        // ACT
        let anonymous = get_image(&store, None, &image.id).await;
        let stranger = get_image(&store, Some(&user("x", UserRole::Visitor)), &image.id).await;
        let by_owner = get_image(&store, Some(&owner_as_visitor), &image.id).await?;
        let by_admin = get_image(&store, Some(&user("a", UserRole::Admin)), &image.id).await?;

        // ASSERT
        assert!(matches!(anonymous, Err(ApiError::Forbidden(_))));
        assert!(matches!(stranger, Err(ApiError::Forbidden(_))));
        assert_eq!(by_owner, image);
        assert_eq!(by_admin, image);
        assert!(matches!(
            get_image(&store, None, "missing").await,
            Err(ApiError::NotFound(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_metadata_and_comments_even_if_cdn_fails() -> Result<()> {
        // ARRANGE
        let store = MemoryDocumentStore::new();
        let media = FakeMedia {
            fail_destroy: true,
            ..FakeMedia::default()
        };
        let editor = user("ed", UserRole::Editor);
        let image = upload_as(&store, &media, &editor, Privacy::Public).await?;
        CommentStore::create(
            &store,
            &Comment {
                id: "c1".into(),
                image_id: image.id.clone(),
                author_uid: Some("someone".into()),
                user_email: None,
                content: "nice".into(),
                created_at: Utc::now(),
            },
        )
        .await?;

        // ACT
        delete_image(&store, &media, &editor, &image.id, DeleteScope::Privileged).await?;

        // ASSERT
        assert_eq!(ImageStore::find_by_id(&store, &image.id).await?, None);
        assert!(
            store
                .list(&CommentStore::collection(&image.id), &Default::default())
                .await?
                .is_empty()
        );
        assert_eq!(media.destroyed.lock().expect("lock").len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn delete_drops_image_from_its_album() -> Result<()> {
        // ARRANGE
        let store = MemoryDocumentStore::new();
        let media = FakeMedia::default();
        let editor = user("ed", UserRole::Editor);
        let kept = upload_as(&store, &media, &editor, Privacy::Public).await?;
        let removed = upload_as(&store, &media, &editor, Privacy::Public).await?;
        AlbumStore::create(
            &store,
            &Album {
                id: "trip".into(),
                title: "Trip".into(),
                description: String::new(),
                created_by: "ed".into(),
                created_at: Utc::now(),
                image_ids: vec![],
            },
        )
        .await?;
        AlbumStore::add_image(&store, "trip", &kept.id).await?;
        AlbumStore::add_image(&store, "trip", &removed.id).await?;

        // ACT
        delete_image(&store, &media, &editor, &removed.id, DeleteScope::Privileged).await?;

        // ASSERT
        let album = AlbumStore::find_by_id(&store, "trip").await?;
        assert_eq!(album.map(|a| a.image_ids), Some(vec![kept.id]));
        Ok(())
    }

    #[tokio::test]
    async fn delete_scopes_differ_for_owners() -> Result<()> {
        let store = MemoryDocumentStore::new();
        let media = FakeMedia::default();
        let image = upload_as(&store, &media, &user("ed", UserRole::Editor), Privacy::Public).await?;
        let owner_now_visitor = user("ed", UserRole::Visitor);

        let legacy = delete_image(
            &store,
            &media,
            &owner_now_visitor,
            &image.id,
            DeleteScope::Privileged,
        )
        .await;
        assert!(matches!(legacy, Err(ApiError::Forbidden(_))));

        delete_image(
            &store,
            &media,
            &owner_now_visitor,
            &image.id,
            DeleteScope::OwnerOrPrivileged,
        )
        .await?;
        assert_eq!(ImageStore::find_by_id(&store, &image.id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn listing_hides_others_private_images_and_paginates() -> Result<()> {
        // ARRANGE
        let store = MemoryDocumentStore::new();
        let media = FakeMedia::default();
        let alice = user("alice", UserRole::Editor);
        let bob = user("bob", UserRole::Editor);
        let mut ids = vec![];
        for (owner, privacy, order) in [
            (&alice, Privacy::Public, 3),
            (&alice, Privacy::Private, 1),
            (&bob, Privacy::Private, 2),
            (&bob, Privacy::Public, 0),
        ] {
            let image = upload_as(&store, &media, owner, privacy).await?;
            let mut fields = crate::database::Fields::new();
            fields.insert("order".into(), order.into());
            ImageStore::merge_fields(&store, &image.id, fields).await?;
            ids.push(image.id);
        }
        let params = ListImagesParams::default();

        // ACT
        let anonymous = list_images(&store, None, &params, 50).await?;
        let as_alice = list_images(&store, Some(&alice), &params, 50).await?;
        let paged = list_images(
            &store,
            Some(&alice),
            &ListImagesParams {
                skip: 1,
                limit: Some(1),
                ..ListImagesParams::default()
            },
            50,
        )
        .await?;

        // ASSERT
        let listed = |r: &ImageListResponse| r.images.iter().map(|i| i.id.clone()).collect::<Vec<_>>();
        assert_eq!(listed(&anonymous), vec![ids[3].clone(), ids[0].clone()]);
        assert_eq!(
            listed(&as_alice),
            vec![ids[3].clone(), ids[1].clone(), ids[0].clone()]
        );
        assert_eq!(listed(&paged), vec![ids[1].clone()]);
        assert_eq!(paged.count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn edit_writes_only_given_fields() -> Result<()> {
        // ARRANGE
        let store = MemoryDocumentStore::new();
        let media = FakeMedia::default();
        let owner = user("owner", UserRole::Editor);
        let image = upload_as(&store, &media, &owner, Privacy::Public).await?;
        let request = EditImageRequest {
            caption: Some("At dusk".into()),
            tags: Some(vec!["sky".into()]),
            ..EditImageRequest::default()
        };

        // ACT
        let response = edit_image(&store, &owner, &image.id, &request).await?;
        let empty = edit_image(&store, &owner, &image.id, &EditImageRequest::default()).await?;
        let stranger = edit_image(
            &store,
            &user("x", UserRole::Visitor),
            &image.id,
            &request,
        )
        .await;

        // ASSERT
        let keys: Vec<&String> = response.updated.keys().collect();
        assert_eq!(keys, vec!["caption", "tags"]);
        assert!(empty.updated.is_empty());
        assert!(matches!(stranger, Err(ApiError::Forbidden(_))));
        let stored = ImageStore::find_by_id(&store, &image.id)
            .await?
            .expect("image exists");
        assert_eq!(stored.caption.as_deref(), Some("At dusk"));
        assert_eq!(stored.title.as_deref(), Some("A photo"));
        assert_eq!(stored.tags, vec!["sky"]);
        Ok(())
    }

    #[tokio::test]
    async fn reorder_requires_privilege() -> Result<()> {
        let store = MemoryDocumentStore::new();

        let denied = reorder_images(&store, &user("v", UserRole::Visitor), vec![]).await;
        let allowed = reorder_images(&store, &user("e", UserRole::Editor), vec![]).await?;

        assert!(matches!(denied, Err(ApiError::Forbidden(_))));
        assert_eq!(allowed.status, "ok");
        Ok(())
    }
}
