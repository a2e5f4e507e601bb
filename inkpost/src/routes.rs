use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::{json, Json, Value};
use rocket::{Request, State};
use validator::Validate;

use crate::config::BlogConfig;
use crate::error::BlogError;
use crate::gateway::QueryGateway;
use crate::routing::{post_path, Resolution, StaticPaths};
use crate::submission::{Acknowledgement, CommentForm, CommentService};
use crate::view::{PostCard, PostView};

/// A post page, along with how long shared caches may keep it.
#[derive(rocket::Responder)]
pub struct PostPage {
    inner: Json<PostView>,
    cache_control: Header<'static>,
}

impl PostPage {
    fn new(view: PostView, revalidate: u64) -> Self {
        PostPage {
            inner: Json(view),
            cache_control: Header::new(
                "Cache-Control",
                format!("public, s-maxage={}, stale-while-revalidate", revalidate),
            ),
        }
    }
}

#[rocket::get("/")]
pub async fn index(
    gateway: &State<QueryGateway>,
    config: &State<BlogConfig>,
) -> Result<Json<Vec<PostCard>>, BlogError> {
    let posts = gateway.posts().await?;

    Ok(Json(
        posts
            .into_iter()
            .map(|post| PostCard::render(post, &config.images))
            .collect(),
    ))
}

#[rocket::get("/post/<slug>")]
pub async fn post_page(
    slug: &str,
    paths: &State<StaticPaths>,
    gateway: &State<QueryGateway>,
    config: &State<BlogConfig>,
) -> Result<PostPage, BlogError> {
    if paths.resolve(slug) == Resolution::Missing {
        return Err(BlogError::NotFound);
    }

    let post = gateway.post(slug).await?;
    Ok(PostPage::new(
        PostView::render(post, &config.images),
        config.revalidate,
    ))
}

#[rocket::get("/api/paths")]
pub async fn static_paths(gateway: &State<QueryGateway>) -> Result<Json<Vec<String>>, BlogError> {
    let slugs = gateway.slugs().await?;
    Ok(Json(slugs.iter().map(|slug| post_path(slug)).collect()))
}

async fn create_comment_help(
    service: &CommentService,
    form: CommentForm,
) -> Result<Json<Acknowledgement>, BlogError> {
    form.validate()?;
    service.submit(form.into()).await.map(Json)
}

// No `format = "json"` here: clients commonly post the JSON body without a
// content type.
#[rocket::post("/api/createComment", data = "<form>")]
pub async fn create_comment_json(
    service: &State<CommentService>,
    form: Json<CommentForm>,
) -> Result<Json<Acknowledgement>, BlogError> {
    create_comment_help(service, form.into_inner()).await
}

#[rocket::post("/api/createComment/form", data = "<form>")]
pub async fn create_comment_form(
    service: &State<CommentService>,
    form: Form<CommentForm>,
) -> Result<Json<Acknowledgement>, BlogError> {
    create_comment_help(service, form.into_inner()).await
}

#[rocket::catch(default)]
pub fn default_catcher(status: Status, _: &Request<'_>) -> (Status, Value) {
    (
        status,
        json!({
            "error": status.code,
        }),
    )
}

pub fn routes() -> Vec<rocket::Route> {
    rocket::routes![
        index,
        post_page,
        static_paths,
        create_comment_json,
        create_comment_form
    ]
}

pub fn catchers() -> Vec<rocket::Catcher> {
    rocket::catchers![default_catcher]
}
