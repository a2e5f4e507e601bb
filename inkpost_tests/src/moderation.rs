use diesel::prelude::*;
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;

use inkpost::schema::comments;
use inkpost::view::PostView;

use crate::common::{approve, connection, init_rocket, insert_comment, seed};

async fn read_post(client: &Client, slug: &str) -> PostView {
    let response = client.get(format!("/post/{}", slug)).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json::<PostView>().await.unwrap()
}

#[tokio::test]
#[ignore = "needs a postgres database, run with --ignored --test-threads=1"]
async fn only_approved_comments_are_read() {
    let conn = connection();
    let seed = seed(&conn, "read-approved");
    let other = crate::common::seed(&conn, "read-approved-other");
    insert_comment(&conn, &seed.post_id, "read-approved-c1", true);
    insert_comment(&conn, &seed.post_id, "read-approved-c2", false);
    insert_comment(&conn, &other.post_id, "read-approved-c3", true);

    let client = Client::tracked(init_rocket())
        .await
        .expect("valid rocket instance");
    let view = read_post(&client, &seed.slug).await;

    let ids: Vec<_> = view.comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["read-approved-c1"]);
    assert!(view.show_comments);
}

#[tokio::test]
#[ignore = "needs a postgres database, run with --ignored --test-threads=1"]
async fn submitted_comment_appears_after_approval() {
    let conn = connection();
    let seed = seed(&conn, "approve-later");

    let client = Client::tracked(init_rocket())
        .await
        .expect("valid rocket instance");

    let body = serde_json::json!({
        "_id": seed.post_id,
        "name": "Ada",
        "email": "ada@example.com",
        "comment": "Great read",
    });
    let response = client
        .post("/api/createComment")
        .body(body.to_string())
        .header(ContentType::JSON)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let before = read_post(&client, &seed.slug).await;
    assert!(before.comments.is_empty());
    assert!(!before.show_comments);

    let id = comments::table
        .filter(comments::post_id.eq(&seed.post_id))
        .select(comments::id)
        .first::<String>(&conn)
        .unwrap();
    approve(&conn, &id);

    let after = read_post(&client, &seed.slug).await;
    assert_eq!(after.comments.len(), 1);
    assert_eq!(after.comments[0].id, id);
    assert_eq!(after.comments[0].comment, "Great read");
}

#[tokio::test]
#[ignore = "needs a postgres database, run with --ignored --test-threads=1"]
async fn unknown_slug_is_not_found() {
    let client = Client::tracked(init_rocket())
        .await
        .expect("valid rocket instance");

    let response = client.get("/post/no-such-slug").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}
