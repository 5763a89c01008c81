use crate::runner::context::test_context::TestContext;
use crate::test_constants::{
    ADMIN_TOKEN, EDITOR_EMAIL, EDITOR_TOKEN, EDITOR_UID, VISITOR_TOKEN, VISITOR_UID,
};
use crate::test_helpers::{error_message, expect_status};
use color_eyre::Result;
use common_services::database::UserStore;
use common_services::database::app_user::UserRole;
use reqwest::StatusCode;
use reqwest::header::WWW_AUTHENTICATE;
use serde_json::Value;

pub async fn test_missing_token_is_unauthorized(context: &TestContext) -> Result<()> {
    // ACT
    let response = context
        .http_client
        .get(context.url("/users/me"))
        .send()
        .await?;

    // ASSERT
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
    assert!(!error_message(response).await?.is_empty());

    Ok(())
}

pub async fn test_invalid_token_on_optional_route(context: &TestContext) -> Result<()> {
    // ACT
    let anonymous = context
        .http_client
        .get(context.url("/photos"))
        .send()
        .await?;
    let forged = context
        .http_client
        .get(context.url("/photos"))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;

    // ASSERT
    assert_eq!(anonymous.status(), StatusCode::OK);
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

pub async fn test_get_me(context: &TestContext) -> Result<()> {
    // ACT
    let response = context
        .http_client
        .get(context.url("/users/me"))
        .bearer_auth(EDITOR_TOKEN)
        .send()
        .await?;
    let response = expect_status(response, StatusCode::OK).await?;
    let profile: Value = response.json().await?;

    // ASSERT
    assert_eq!(profile["id"], EDITOR_UID);
    assert_eq!(profile["email"], EDITOR_EMAIL);
    assert_eq!(profile["role"], "editor");

    Ok(())
}

pub async fn test_role_assignment(context: &TestContext) -> Result<()> {
    // ARRANGE
    let client = &context.http_client;
    let url = context.url(&format!("/users/{VISITOR_UID}/role"));

    // ACT
    let by_editor = client
        .post(&url)
        .bearer_auth(EDITOR_TOKEN)
        .query(&[("role", "admin")])
        .send()
        .await?;
    let unknown_role = client
        .post(&url)
        .bearer_auth(ADMIN_TOKEN)
        .query(&[("role", "owner")])
        .send()
        .await?;
    let assigned = client
        .post(&url)
        .bearer_auth(ADMIN_TOKEN)
        .query(&[("role", "editor")])
        .send()
        .await?;

    // ASSERT
    assert_eq!(by_editor.status(), StatusCode::FORBIDDEN);
    assert_eq!(unknown_role.status(), StatusCode::BAD_REQUEST);
    let assigned = expect_status(assigned, StatusCode::OK).await?;
    let body: Value = assigned.json().await?;
    assert_eq!(body["uid"], VISITOR_UID);
    assert_eq!(body["role"], "editor");
    assert_eq!(
        UserStore::find_role(context.store.as_ref(), VISITOR_UID).await?,
        UserRole::Editor
    );

    // Later tests rely on the visitor being a visitor.
    let reset = client
        .post(&url)
        .bearer_auth(ADMIN_TOKEN)
        .query(&[("role", "visitor")])
        .send()
        .await?;
    expect_status(reset, StatusCode::OK).await?;
    let me: Value = client
        .get(context.url("/users/me"))
        .bearer_auth(VISITOR_TOKEN)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(me["role"], "visitor");

    Ok(())
}
