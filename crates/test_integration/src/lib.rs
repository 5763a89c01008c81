#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

#[cfg(test)]
pub mod runner;
#[cfg(test)]
pub mod test_constants;
#[cfg(test)]
pub mod test_helpers;
#[cfg(test)]
pub mod tests;

#[cfg(test)]
mod test_runner {
    use crate::runner::context::test_context::TestContext;
    use crate::runner::orchestration_utils::setup_tracing_and_panic_handling;
    use crate::tests::test_albums::test_album_lifecycle;
    use crate::tests::test_auth::{
        test_get_me, test_invalid_token_on_optional_route, test_missing_token_is_unauthorized,
        test_role_assignment,
    };
    use crate::tests::test_comments::{test_comment_lifecycle, test_legacy_comments};
    use crate::tests::test_legacy::{
        test_legacy_delete_requires_privilege, test_legacy_upload_and_reorder,
        test_like_toggle_twice,
    };
    use crate::tests::test_photos::{
        test_delete_survives_cdn_failure, test_edit_photo, test_private_photo_visibility,
        test_upload_without_file, test_visitor_cannot_upload,
    };
    use crate::tests::test_root::{test_health_endpoint, test_openapi_document};
    use crate::tests::test_search::{test_malformed_json_is_bad_request, test_search_sunset};
    use crate::{execute_suite, run_test};
    use color_eyre::Result;
    use colored::*;
    use std::time::Instant;

    #[tokio::test]
    async fn integration_suite() -> Result<()> {
        setup_tracing_and_panic_handling();
        let context = TestContext::new().await?;

        execute_suite!(
            &context,
            [
                // -- Root --
                test_health_endpoint,
                test_openapi_document,
                // -- Auth --
                test_missing_token_is_unauthorized,
                test_invalid_token_on_optional_route,
                test_get_me,
                test_role_assignment,
                // -- Photos --
                test_visitor_cannot_upload,
                test_upload_without_file,
                test_private_photo_visibility,
                test_edit_photo,
                test_delete_survives_cdn_failure,
                // -- Legacy --
                test_legacy_upload_and_reorder,
                test_legacy_delete_requires_privilege,
                test_like_toggle_twice,
                // -- Comments --
                test_legacy_comments,
                test_comment_lifecycle,
                // -- Albums --
                test_album_lifecycle,
                // -- Search --
                test_search_sunset,
                test_malformed_json_is_bad_request,
            ]
        );

        Ok(())
    }
}
