#[tokio::main]
async fn main() {
    if let Err(e) = event_registration::run().await {
        eprintln!("event-registration failed to start: {}", e);
        std::process::exit(1);
    }
}
