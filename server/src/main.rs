#[tokio::main]
async fn main() {
    pacer::start_server().await;
}
