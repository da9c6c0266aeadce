use actix_cors::Cors;
use actix_web::{http, middleware, web, App, HttpServer};
use env_logger::Env;
use room_chat::{config::Config, db, routes};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let pool = match db::init_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("could not open database {}: {err}", config.database_url);
            std::process::exit(1);
        }
    };
    log::info!("database ready at {}", config.database_url);

    let server_addr = config.host.clone();
    let server_port = config.port;
    let config = web::Data::new(config);
    let pool_data = web::Data::new(pool);

    let app = HttpServer::new({
        let config = config.clone();
        let pool_data = pool_data.clone();
        move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
                .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
                .allowed_header(http::header::CONTENT_TYPE)
                .supports_credentials()
                .max_age(3600);
            if let Some(origin) = &config.frontend_url {
                cors = cors.allowed_origin(origin);
            }

            App::new()
                .app_data(pool_data.clone())
                .app_data(config.clone())
                .wrap(cors)
                .wrap(middleware::Logger::default())
                .configure(routes::configure)
                .wrap(middleware::NormalizePath::trim())
        }
    })
    .workers(2)
    .bind((server_addr.as_str(), server_port))?
    .run();

    log::info!("Server running at http://{server_addr}:{server_port}");

    app.await?;

    log::info!("server stopped, closing database pool");
    drop(pool_data);

    Ok(())
}
