use sheets_rs::{ServiceAccountKey, Sheets};
use serde_json::json;

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::FmtSubscriber;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let blob = std::env::var("GOOGLE_SHEETS_CREDENTIALS")
        .expect("GOOGLE_SHEETS_CREDENTIALS must hold a service account key");
    let key = ServiceAccountKey::from_blob(&blob).expect("invalid service account key");

    let sheets = Sheets::authenticate(&key, None)
        .await
        .expect("authentication failed");

    let spreadsheet_id = sheets.open("IP Check Log").await.expect("spreadsheet not found");
    let worksheet = sheets
        .first_worksheet(&spreadsheet_id)
        .await
        .expect("no worksheet");

    let updated = sheets
        .append_row(
            &spreadsheet_id,
            &worksheet,
            vec![
                json!("demo-project"),
                json!("respondent-1"),
                json!("8.8.8.8"),
                json!("United States"),
                json!("US"),
                json!("VA"),
                json!("Virginia"),
                json!("Ashburn"),
                json!(chrono::Utc::now().to_rfc3339()),
            ],
        )
        .await
        .expect("append failed");

    println!("appended {}", updated["updates"]["updatedRange"]);
}
