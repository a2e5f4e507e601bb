use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rocket::figment::Figment;
use rocket::http::{ContentType, Status};
use rocket::serde::json::Value;
use rocket::{Build, Rocket};

use inkpost::models::{Author, Moderation};
use inkpost::store::{Fixtures, MemoryStore, PostDocument};
use inkpost::submission::Acknowledgement;
use inkpost::view::{PostCard, PostView};

fn fixtures() -> Fixtures {
    serde_json::from_str(include_str!("fixtures.json")).unwrap()
}

fn figment() -> Figment {
    Figment::from(rocket::Config::debug_default()).merge(("images.project_id", "proj"))
}

fn init_rocket(figment: Figment) -> (Rocket<Build>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_fixtures(fixtures()));
    (inkpost::build(figment, store.clone()), store)
}

fn comment_ids(view: &PostView) -> Vec<&str> {
    let mut ids: Vec<_> = view.comments.iter().map(|c| c.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

mod blocking {
    use super::*;
    use rocket::local::blocking::Client;

    fn client() -> Client {
        let (rocket, _) = init_rocket(figment());
        Client::tracked(rocket).expect("valid rocket instance")
    }

    #[test]
    fn list_posts() {
        let client = client();
        let response = client.get("/").dispatch();
        assert_eq!(response.status(), Status::Ok);

        let mut cards = response.into_json::<Vec<PostCard>>().unwrap();
        cards.sort_by(|a, b| a.slug.cmp(&b.slug));

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].slug, "analytical-engine");
        assert_eq!(cards[0].path, "/post/analytical-engine");
        assert_eq!(cards[0].author.name, "Ada Lovelace");
        assert_eq!(
            cards[0].main_image_url.as_deref(),
            Some("https://cdn.sanity.io/images/proj/production/engine-2000x3000.jpg")
        );
        assert_eq!(cards[1].slug, "bernoulli-numbers");
        assert_eq!(cards[1].main_image_url, None);
    }

    #[test]
    fn post_shows_only_approved_comments() {
        let client = client();
        let response = client.get("/post/analytical-engine").dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Cache-Control"),
            Some("public, s-maxage=60, stale-while-revalidate")
        );

        let view = response.into_json::<PostView>().unwrap();

        assert_eq!(view.title, "Notes on the analytical engine");
        assert_eq!(comment_ids(&view), vec!["c1"]);
        assert!(view.show_comments);
    }

    #[test]
    fn comment_without_status_stays_hidden() {
        let client = client();
        let view = client
            .get("/post/bernoulli-numbers")
            .dispatch()
            .into_json::<PostView>()
            .unwrap();

        assert!(view.comments.is_empty());
        assert!(!view.show_comments);
    }

    #[test]
    fn repeated_reads_agree() {
        let client = client();
        let first = client
            .get("/post/analytical-engine")
            .dispatch()
            .into_json::<PostView>()
            .unwrap();
        let second = client
            .get("/post/analytical-engine")
            .dispatch()
            .into_json::<PostView>()
            .unwrap();

        assert_eq!(comment_ids(&first), comment_ids(&second));
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let client = client();
        let response = client.get("/post/difference-engine").dispatch();

        assert_eq!(response.status(), Status::NotFound);
        let body = response.into_json::<Value>().unwrap();
        assert_eq!(body["error"], 404);
    }

    #[test]
    fn unknown_route_is_json_not_found() {
        let client = client();
        let response = client.get("/nope/nope").dispatch();

        assert_eq!(response.status(), Status::NotFound);
        assert_eq!(response.content_type(), Some(ContentType::JSON));
    }

    #[test]
    fn enumerate_paths() {
        let client = client();
        let mut paths = client
            .get("/api/paths")
            .dispatch()
            .into_json::<Vec<String>>()
            .unwrap();
        paths.sort();

        assert_eq!(
            paths,
            vec!["/post/analytical-engine", "/post/bernoulli-numbers"]
        );
    }

    #[test]
    fn create_comment_json() {
        let client = client();
        let response = client
            .post("/api/createComment")
            .body(r#"{ "_id": "p1", "name": "Ada", "email": "ada@example.com", "comment": "Great read" }"#)
            .header(ContentType::JSON)
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        let ack = response.into_json::<Acknowledgement>().unwrap();
        assert_eq!(ack.message, "Comment submitted");
    }

    #[test]
    fn create_comment_without_content_type() {
        let client = client();
        let response = client
            .post("/api/createComment")
            .body(r#"{ "_id": "p1", "name": "Ada", "email": "ada@example.com", "comment": "Great read" }"#)
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
    }

    #[test]
    fn create_comment_form() {
        let client = client();
        let response = client
            .post("/api/createComment/form")
            .body("_id=p2&name=Ada&email=ada%40example.com&comment=Great+read")
            .header(ContentType::Form)
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
    }

    #[test]
    fn empty_comment_is_rejected() {
        let client = client();
        let response = client
            .post("/api/createComment")
            .body(r#"{ "_id": "p1", "name": "Ada", "email": "ada@example.com", "comment": "" }"#)
            .header(ContentType::JSON)
            .dispatch();

        assert_eq!(response.status(), Status::BadRequest);
        let body = response.into_json::<Value>().unwrap();
        assert_eq!(body["error"], 400);
        assert!(body["validation_error"]["comment"].is_array());
        assert!(body.get("message").is_none());
    }

    #[test]
    fn malformed_email_is_rejected() {
        let client = client();
        let response = client
            .post("/api/createComment/form")
            .body("_id=p1&name=Ada&email=ada&comment=Great+read")
            .header(ContentType::Form)
            .dispatch();

        assert_eq!(response.status(), Status::BadRequest);
    }

    #[test]
    fn missing_field_is_rejected() {
        let client = client();
        let response = client
            .post("/api/createComment")
            .body(r#"{ "_id": "p1", "name": "Ada", "comment": "Great read" }"#)
            .header(ContentType::JSON)
            .dispatch();

        assert_eq!(response.status(), Status::UnprocessableEntity);
    }

    #[test]
    fn comment_for_unknown_post_fails() {
        let client = client();
        let response = client
            .post("/api/createComment")
            .body(r#"{ "_id": "p404", "name": "Ada", "email": "ada@example.com", "comment": "Great read" }"#)
            .header(ContentType::JSON)
            .dispatch();

        assert_eq!(response.status(), Status::InternalServerError);
        let body = response.into_json::<Value>().unwrap();
        assert_eq!(body["error"], 500);
        assert!(body.get("message").is_none());
    }
}

mod asynchronous {
    use super::*;
    use rocket::local::asynchronous::Client;

    async fn read_post(client: &Client, slug: &str) -> PostView {
        client
            .get(format!("/post/{}", slug))
            .dispatch()
            .await
            .into_json::<PostView>()
            .await
            .unwrap()
    }

    async fn submit(client: &Client, post_id: &str, comment: &str) -> Status {
        let body = serde_json::json!({
            "_id": post_id,
            "name": "Ada",
            "email": "ada@example.com",
            "comment": comment,
        });

        client
            .post("/api/createComment")
            .body(body.to_string())
            .header(ContentType::JSON)
            .dispatch()
            .await
            .status()
    }

    async fn created_id(store: &MemoryStore, comment: &str) -> String {
        let created: Vec<_> = store
            .comments()
            .await
            .into_iter()
            .filter(|c| c.comment == comment)
            .collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].status, Moderation::Unapproved);
        created[0].id.clone()
    }

    #[rocket::async_test]
    async fn comment_appears_after_approval() {
        let (rocket, store) = init_rocket(figment());
        let client = Client::tracked(rocket).await.expect("valid rocket instance");

        assert_eq!(submit(&client, "p1", "Great read").await, Status::Ok);

        let id = created_id(&store, "Great read").await;
        let before = read_post(&client, "analytical-engine").await;
        assert!(!before.comments.iter().any(|c| c.id == id));

        assert!(store.approve(&id).await);

        let after = read_post(&client, "analytical-engine").await;
        let matching = after.comments.iter().filter(|c| c.id == id).count();
        assert_eq!(matching, 1);
        assert_eq!(comment_ids(&after).len(), 2);
    }

    #[rocket::async_test]
    async fn comment_stays_with_its_post() {
        let (rocket, store) = init_rocket(figment());
        let client = Client::tracked(rocket).await.expect("valid rocket instance");

        assert_eq!(submit(&client, "p1", "Only for p1").await, Status::Ok);
        let id = created_id(&store, "Only for p1").await;
        assert!(store.approve(&id).await);

        let other = read_post(&client, "bernoulli-numbers").await;
        assert!(other.comments.is_empty());

        let own = read_post(&client, "analytical-engine").await;
        assert!(own.comments.iter().any(|c| c.id == id));
    }

    #[rocket::async_test]
    async fn rejected_submission_writes_nothing() {
        let (rocket, store) = init_rocket(figment());
        let client = Client::tracked(rocket).await.expect("valid rocket instance");

        assert_eq!(submit(&client, "p1", "   ").await, Status::BadRequest);
        assert_eq!(store.comments().await.len(), 3);
    }

    fn new_post() -> (Author, PostDocument) {
        let author = Author {
            id: "a2".into(),
            name: "Charles Babbage".into(),
            image: None,
        };
        let post = PostDocument {
            id: "p3".into(),
            title: "The difference engine".into(),
            description: None,
            slug: "difference-engine".into(),
            main_image: None,
            author: "a2".into(),
            body: Value::Null,
            created_at: Utc.with_ymd_and_hms(2022, 3, 3, 9, 0, 0).unwrap(),
        };
        (author, post)
    }

    #[rocket::async_test]
    async fn new_post_is_resolved_on_demand() {
        let (rocket, store) = init_rocket(figment());
        let client = Client::tracked(rocket).await.expect("valid rocket instance");

        let (author, post) = new_post();
        store.publish(author, post).await;

        let response = client.get("/post/difference-engine").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let view = response.into_json::<PostView>().await.unwrap();
        assert_eq!(view.author.name, "Charles Babbage");
    }

    #[rocket::async_test]
    async fn new_post_is_missing_without_fallback() {
        let (rocket, store) = init_rocket(figment().merge(("fallback", "disabled")));
        let client = Client::tracked(rocket).await.expect("valid rocket instance");

        let (author, post) = new_post();
        store.publish(author, post).await;

        let response = client.get("/post/difference-engine").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.get("/post/analytical-engine").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
    }
}
