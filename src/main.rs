#[actix_web::main]
async fn main() -> std::io::Result<()> {
    acryl_backoffice::run().await
}
