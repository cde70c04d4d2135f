//! Integration tests for categories, tags and blogs

mod common;

use axum::http::StatusCode;
use common::unique_name;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_publishes_tagged_blog() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;
    let tech = unique_name("Tech");
    let ai = unique_name("AI");

    let category_id = app.create_category(&admin, &tech).await;
    let tag_id = app.create_tag(&admin, &ai).await;

    let (status, created) = app
        .post(
            "/api/v1/blogs",
            Some(&admin),
            json!({
                "title": "Post1",
                "author": "Ann",
                "category_id": category_id,
                "tag_ids": [tag_id, tag_id]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, blog) = app
        .get(&format!("/api/v1/blogs/{}", created["id"]), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blog["title"], "Post1");
    assert_eq!(blog["category"]["name"], tech.as_str());
    let tags = blog["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["name"], ai.as_str());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_blog_with_missing_tag_is_not_created() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, user) = app.register_user().await;

    let category_id = app.create_category(&admin, &unique_name("Cat")).await;
    let tag_id = app.create_tag(&admin, &unique_name("Tag")).await;
    let title = unique_name("Orphan");

    let (status, body) = app
        .post(
            "/api/v1/blogs",
            Some(&user),
            json!({
                "title": title,
                "author": "Ann",
                "category_id": category_id,
                "tag_ids": [tag_id, i64::MAX]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains(&i64::MAX.to_string()));

    let blogs = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blogs WHERE title = $1")
        .bind(&title)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(blogs, 0);

    let links = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blog_tags WHERE tag_id = $1")
        .bind(tag_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(links, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_blog_with_missing_category_is_rejected() {
    let app = common::TestApp::new().await;
    let (_, _, user) = app.register_user().await;

    let (status, body) = app
        .post(
            "/api/v1/blogs",
            Some(&user),
            json!({ "title": "Post", "author": "Ann", "category_id": i64::MAX }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_replaces_tag_set() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, user) = app.register_user().await;

    let category_id = app.create_category(&admin, &unique_name("Cat")).await;
    let first = app.create_tag(&admin, &unique_name("First")).await;
    let second = app.create_tag(&admin, &unique_name("Second")).await;

    let (_, created) = app
        .post(
            "/api/v1/blogs",
            Some(&user),
            json!({ "title": "Draft", "author": "Ann", "category_id": category_id, "tag_ids": [first] }),
        )
        .await;
    let path = format!("/api/v1/blogs/{}", created["id"]);

    // A failed update leaves the blog as it was
    let (status, _) = app
        .put(&path, Some(&user), json!({ "title": "Changed", "tag_ids": [second, i64::MAX] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, unchanged) = app.get(&path, Some(&user)).await;
    assert_eq!(unchanged["title"], "Draft");
    assert_eq!(unchanged["tags"][0]["id"], first);

    let (status, updated) = app
        .put(&path, Some(&user), json!({ "title": "Final", "tag_ids": [second] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["author"], "Ann");
    let tags = updated["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["id"], second);

    // Omitting tag_ids keeps the current set
    let (_, renamed) = app
        .put(&path, Some(&user), json!({ "author": "Bob" }))
        .await;
    assert_eq!(renamed["tags"][0]["id"], second);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_filters_by_category_and_tag() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;

    let category_id = app.create_category(&admin, &unique_name("Filter")).await;
    let tag_id = app.create_tag(&admin, &unique_name("Filter")).await;
    for (title, tags) in [("tagged", vec![tag_id]), ("plain", vec![])] {
        let (status, _) = app
            .post(
                "/api/v1/blogs",
                Some(&admin),
                json!({ "title": title, "author": "Ann", "category_id": category_id, "tag_ids": tags }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, by_category) = app
        .get(&format!("/api/v1/blogs?category_id={}", category_id), Some(&admin))
        .await;
    assert_eq!(by_category.as_array().unwrap().len(), 2);

    let (_, by_tag) = app
        .get(&format!("/api/v1/blogs?tag_id={}", tag_id), Some(&admin))
        .await;
    let by_tag = by_tag.as_array().unwrap();
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0]["title"], "tagged");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_category_in_use_cannot_be_deleted() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;

    let category_id = app.create_category(&admin, &unique_name("Busy")).await;
    let (_, blog) = app
        .post(
            "/api/v1/blogs",
            Some(&admin),
            json!({ "title": "Post", "author": "Ann", "category_id": category_id }),
        )
        .await;

    let category_path = format!("/api/v1/categories/{}", category_id);
    let (status, body) = app.delete(&category_path, Some(&admin)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = app
        .delete(&format!("/api/v1/blogs/{}", blog["id"]), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete(&category_path, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&category_path, Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_deleting_tag_detaches_it_from_blogs() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;

    let category_id = app.create_category(&admin, &unique_name("Cat")).await;
    let tag_id = app.create_tag(&admin, &unique_name("Gone")).await;
    let (_, blog) = app
        .post(
            "/api/v1/blogs",
            Some(&admin),
            json!({ "title": "Post", "author": "Ann", "category_id": category_id, "tag_ids": [tag_id] }),
        )
        .await;

    let (status, _) = app
        .delete(&format!("/api/v1/tags/{}", tag_id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, blog) = app
        .get(&format!("/api/v1/blogs/{}", blog["id"]), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(blog["tags"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_taxonomy_names_are_unique() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;
    let name = unique_name("Same");

    app.create_category(&admin, &name).await;
    let (status, _) = app
        .post("/api/v1/categories", Some(&admin), json!({ "name": name }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.create_tag(&admin, &name).await;
    let (status, _) = app
        .post("/api/v1/tags", Some(&admin), json!({ "name": format!("  {}  ", name) }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_permissions_on_content() {
    let app = common::TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, _, user) = app.register_user().await;

    let (status, _) = app
        .post("/api/v1/categories", Some(&user), json!({ "name": unique_name("Nope") }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/v1/categories", Some(&user)).await;
    assert_eq!(status, StatusCode::OK);

    let category_id = app.create_category(&admin, &unique_name("Open")).await;
    let (status, blog) = app
        .post(
            "/api/v1/blogs",
            Some(&user),
            json!({ "title": "Mine", "author": "Ann", "category_id": category_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .delete(&format!("/api/v1/blogs/{}", blog["id"]), Some(&user))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
