mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use stagiaires_api::database::models::{User, UserRole};

#[tokio::test]
async fn list_by_role_returns_only_tutors() -> Result<()> {
    let app = common::spawn_app().await?;
    let tuteur = app.fakes.insert_user(UserRole::Tuteur);
    app.fakes.insert_user(UserRole::Admin);

    let users = app
        .client
        .get(app.url("/api/users?role=tuteur"))
        .send()
        .await?
        .json::<Vec<User>>()
        .await?;
    assert_eq!(users, vec![tuteur]);

    let all = app
        .client
        .get(app.url("/api/users"))
        .send()
        .await?
        .json::<Vec<User>>()
        .await?;
    assert_eq!(all.len(), 2);
    Ok(())
}

#[tokio::test]
async fn create_user_preserves_fields() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/api/users"))
        .json(&json!({
            "email": "Claire.Martin@Example.fr",
            "nom": "Martin",
            "prenom": "Claire",
            "role": "rh",
            "telephone": "0102030405"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let user = res.json::<User>().await?;
    assert_eq!(user.email, "claire.martin@example.fr");
    assert_eq!(user.nom, "Martin");
    assert_eq!(user.prenom, "Claire");
    assert_eq!(user.role, UserRole::Rh);
    assert_eq!(user.telephone.as_deref(), Some("0102030405"));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts() -> Result<()> {
    let app = common::spawn_app().await?;
    let body = json!({ "email": "dup@example.fr", "nom": "A", "prenom": "B", "role": "stagiaire" });

    let first = app.client.post(app.url("/api/users")).json(&body).send().await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.client.post(app.url("/api/users")).json(&body).send().await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert!(second.json::<Value>().await?["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn invalid_email_is_400() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(app.url("/api/users"))
        .json(&json!({ "email": "pas-un-email", "nom": "A", "prenom": "B", "role": "tuteur" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_role_is_400() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(app.url("/api/users?role=directeur")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.fakes.calls(), 0);
    Ok(())
}
