use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use wikiquiz_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().expect("configuration should be valid");
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("starting HTTP server on {host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health)
            .service(handlers::generate_quiz)
            .service(handlers::list_history)
            .service(handlers::get_quiz)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
