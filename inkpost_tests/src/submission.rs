use diesel::prelude::*;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;

use inkpost::schema::comments;

use crate::common::{connection, init_rocket, seed};

#[test]
#[ignore = "needs a postgres database, run with --ignored --test-threads=1"]
fn create_comment_json() {
    let conn = connection();
    let seed = seed(&conn, "create-json");

    let client = Client::tracked(init_rocket()).expect("valid rocket instance");
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
        .dispatch();

    assert_eq!(response.status(), Status::Ok);

    let stored = comments::table
        .filter(comments::post_id.eq(&seed.post_id))
        .select((comments::name, comments::comment, comments::approved))
        .load::<(String, String, bool)>(&conn)
        .unwrap();

    assert_eq!(
        stored,
        vec![("Ada".to_owned(), "Great read".to_owned(), false)]
    );
}

#[test]
#[ignore = "needs a postgres database, run with --ignored --test-threads=1"]
fn create_comment_form() {
    let conn = connection();
    let seed = seed(&conn, "create-form");

    let client = Client::tracked(init_rocket()).expect("valid rocket instance");
    let response = client
        .post("/api/createComment/form")
        .body(format!(
            "_id={}&name=Ada&email=ada%40example.com&comment=Great+read",
            seed.post_id
        ))
        .header(ContentType::Form)
        .dispatch();

    assert_eq!(response.status(), Status::Ok);

    let approved = comments::table
        .filter(comments::post_id.eq(&seed.post_id))
        .select(comments::approved)
        .load::<bool>(&conn)
        .unwrap();
    assert_eq!(approved, vec![false]);
}

#[test]
#[ignore = "needs a postgres database, run with --ignored --test-threads=1"]
fn comment_for_unknown_post_fails() {
    let client = Client::tracked(init_rocket()).expect("valid rocket instance");
    let response = client
        .post("/api/createComment")
        .body(r#"{ "_id": "no-such-post", "name": "Ada", "email": "ada@example.com", "comment": "Great read" }"#)
        .header(ContentType::JSON)
        .dispatch();

    assert_eq!(response.status(), Status::InternalServerError);
}

#[test]
#[ignore = "needs a postgres database, run with --ignored --test-threads=1"]
fn empty_comment_is_not_written() {
    let conn = connection();
    let seed = seed(&conn, "create-empty");

    let client = Client::tracked(init_rocket()).expect("valid rocket instance");
    let body = serde_json::json!({
        "_id": seed.post_id,
        "name": "Ada",
        "email": "ada@example.com",
        "comment": "",
    });
    let response = client
        .post("/api/createComment")
        .body(body.to_string())
        .header(ContentType::JSON)
        .dispatch();

    assert_eq!(response.status(), Status::BadRequest);

    let count = comments::table
        .filter(comments::post_id.eq(&seed.post_id))
        .count()
        .get_result::<i64>(&conn)
        .unwrap();
    assert_eq!(count, 0);
}
