//! Agency Backend - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if let Err(e) = agency_backend::run().await {
        eprintln!("Fatal: {}", e);
        std::process::exit(1);
    }
}
