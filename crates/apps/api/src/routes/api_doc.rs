use crate::routes::{albums, comments, images, photos, root, search, users};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::health_check,
        // Legacy handlers
        images::handlers::upload_legacy_handler,
        images::handlers::upload_legacy_compat_handler,
        images::handlers::list_legacy_images_handler,
        images::handlers::delete_legacy_image_handler,
        images::handlers::reorder_images_handler,
        images::handlers::toggle_like_handler,
        images::handlers::add_legacy_comment_handler,
        images::handlers::list_legacy_comments_handler,
        // Photos handlers
        photos::handlers::upload_photo_handler,
        photos::handlers::list_photos_handler,
        photos::handlers::get_photo_handler,
        photos::handlers::edit_photo_handler,
        photos::handlers::delete_photo_handler,
        // Album handlers
        albums::handlers::create_album_handler,
        albums::handlers::list_albums_handler,
        albums::handlers::get_album_handler,
        albums::handlers::add_image_to_album_handler,
        // Comment handlers
        comments::handlers::add_comment_handler,
        comments::handlers::list_comments_handler,
        comments::handlers::delete_comment_handler,
        search::handlers::search_handler,
        // User handlers
        users::handlers::get_me_handler,
        users::handlers::set_role_handler,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Sunian Photos", description = "Sunian Photos' API"),
        (name = "Photos", description = "Uploading, browsing and editing images"),
        (name = "Legacy", description = "Routes kept for the first frontend, under /api"),
        (name = "Albums", description = "Photo albums"),
        (name = "Comments", description = "Comments on images"),
        (name = "Search", description = "Filtering images"),
        (name = "Users", description = "Profiles and role assignment"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
