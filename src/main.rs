mod core;
mod database;
mod error;
mod handlers;
mod impls;
pub mod response;

use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::HttpServer;
use database::postgres::PgStore;
use impls::uploaders::local_storage::LocalStorage;
use sqlx::postgres::PgPoolOptions;

/// Externally reachable base URL, used for share links and file references.
#[derive(Debug, Clone)]
pub struct PublicBaseUrl(pub String);

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let upload_path = dotenv::var("UPLOAD_PATH").expect("environment variable UPLOAD_PATH not been set");
    let public_base_url = dotenv::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned());
    let bind_addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_owned());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    // one store per process so every worker shares the live event channel
    let store = PgStore::new(pool);
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(store.clone()))
            .app_data(Data::new(LocalStorage::new(upload_path.clone(), &public_base_url)))
            .app_data(Data::new(PublicBaseUrl(public_base_url.clone())))
            .service(
                scope("")
                    .service(resource("register").route(post().to(handlers::registration::create::<PgStore, LocalStorage>)))
                    .service(resource("form/{form_id}").route(get().to(handlers::form::detail::<PgStore>)))
                    .service(
                        scope("forms")
                            .route("", post().to(handlers::form::create::<PgStore>))
                            .route("", get().to(handlers::form::list::<PgStore>))
                            .service(
                                scope("{form_id}")
                                    .route("", get().to(handlers::form::detail::<PgStore>))
                                    .route("", put().to(handlers::form::update::<PgStore>))
                                    .route("", delete().to(handlers::form::delete::<PgStore>))
                                    .service(
                                        scope("responses")
                                            .route("", post().to(handlers::response::submit::<PgStore, LocalStorage>))
                                            .route("{response_id}", get().to(handlers::response::detail::<PgStore>))
                                            .route("{response_id}", put().to(handlers::response::update::<PgStore, LocalStorage>)),
                                    ),
                            ),
                    )
                    .service(
                        scope("responses")
                            .route("", get().to(handlers::response::list::<PgStore>))
                            .route("live", get().to(handlers::response::live::<PgStore>))
                            .route("{response_id}", delete().to(handlers::response::delete::<PgStore, LocalStorage>)),
                    )
                    .service(
                        scope("files")
                            .route("{path:.*}/view", get().to(handlers::file::view::<LocalStorage>))
                            .route("{path:.*}/download", get().to(handlers::file::download::<LocalStorage>)),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
