use std::net::SocketAddr;

use game::model_loader;
use game::server::router;
use game::settings::ServeSettings;

#[tokio::main]
async fn main() {
    let settings = ServeSettings::from_env();

    if let Some(base) = settings.model_base_url.as_deref() {
        let endpoints = model_loader::endpoints_for(base);
        match model_loader::fetch_metadata(&endpoints.metadata_url).await {
            Ok(metadata) => println!("model classes: {}", metadata.labels.join(", ")),
            Err(err) => eprintln!("model metadata unavailable: {err}"),
        }
    }

    let app = router(&settings);
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    println!("listening on port: {}", settings.port);
    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("server error: {err}");
        std::process::exit(1);
    }
}
