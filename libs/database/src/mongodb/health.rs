use mongodb::{Client, bson::doc};

/// `true` when the server answers a `ping`.
pub async fn check_health(client: &Client) -> bool {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .is_ok()
}
