#[tokio::main]
async fn main() {
    if let Err(err) = board_elements::app::run().await {
        eprintln!("board_elements failed: {}", err);
        std::process::exit(1);
    }
}
