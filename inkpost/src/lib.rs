//! Serve blog posts from a content store and accept reader comments that
//! only become visible once a moderator approves them.
//!
//! The content store is reached through [`store::ContentStore`]. Posts are
//! read through the [`gateway::QueryGateway`], comments are written through
//! the [`submission::CommentService`]. [`build`] wires both into a Rocket
//! instance:
//!
//! ```no_run
//! # fn main() -> Result<(), inkpost::store::ConnectError> {
//! let figment = rocket::Config::figment();
//! let store = inkpost::store::connect(&figment)?;
//! let rocket = inkpost::build(figment, store);
//! # drop(rocket);
//! # Ok(())
//! # }
//! ```
#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use tracing::{info, warn};

pub mod config;
pub mod error;
pub mod gateway;
pub mod image;
pub mod models;
pub mod routes;
pub mod routing;
pub mod schema;
pub mod store;
pub mod submission;
pub mod view;
pub mod visibility;

pub use crate::config::BlogConfig;
pub use crate::error::{BlogError, StoreError};
pub use crate::store::ContentStore;

use crate::gateway::QueryGateway;
use crate::routing::StaticPaths;
use crate::submission::CommentService;

/// Build a Rocket instance serving the blog from the given store.
///
/// On ignition the configuration is read, the gateway and comment service
/// are set up, and the slugs of all posts are enumerated once.
pub fn build(figment: Figment, store: Arc<dyn ContentStore>) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", routes::routes())
        .register("/", routes::catchers())
        .attach(AdHoc::config::<BlogConfig>())
        .attach(AdHoc::try_on_ignite("Content store", move |rocket| async move {
            let config = match rocket.state::<BlogConfig>() {
                Some(config) => config.clone(),
                None => return Err(rocket),
            };

            let timeout = config.store_timeout();
            let gateway = QueryGateway::new(store.clone(), timeout);
            let service = CommentService::new(store, timeout);

            let slugs = match gateway.slugs().await {
                Ok(slugs) => slugs,
                Err(e) => {
                    warn!("could not enumerate post paths, starting without any: {}", e);
                    Vec::new()
                }
            };
            let paths = StaticPaths::new(slugs, config.fallback);
            info!(count = paths.len(), fallback = ?config.fallback, "enumerated post paths");

            Ok(rocket.manage(gateway).manage(service).manage(paths))
        }))
}
