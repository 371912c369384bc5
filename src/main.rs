use std::sync::Arc;

use signup_email::{
    DefaultEmailValidator, EmailValidationController, MemoryUniquenessChecker, PgUniquenessChecker, ScreenProps,
    SignupConfig, UniquenessChecker, db,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = SignupConfig::from_env()?;

    let checker: Arc<dyn UniquenessChecker> = if let Some(url) = config.database_url.as_deref() {
        let pool = db::init_pool(url, config.db_max_connections).await?;
        tracing::info!("using postgres uniqueness checker");
        Arc::new(PgUniquenessChecker::new(pool))
    } else {
        tracing::warn!("DATABASE_URL not set, using in-memory uniqueness checker");
        Arc::new(MemoryUniquenessChecker::new())
    };

    tracing::info!(
        skip_uniqueness_check = config.skip_uniqueness_check,
        debounce = ?config.debounce,
        discard_stale = config.discard_stale,
        "signup email step ready"
    );

    let props = ScreenProps::new(|record| {
        println!("done: {}", serde_json::to_string(&record).unwrap_or_default());
    });
    let ctrl = EmailValidationController::new(props, Arc::new(DefaultEmailValidator), checker, &config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.as_str() {
            ":quit" => break,
            ":enter" => {
                ctrl.on_key_event("Enter").await;
            }
            ":submit" => {
                ctrl.on_submit().await;
            }
            ":state" => {
                let snapshot = ctrl.snapshot();
                println!("{}", serde_json::to_string(&snapshot)?);
                println!("error: {}", ctrl.display_error().unwrap_or_default());
            }
            text => ctrl.on_text_changed(text),
        }
    }

    Ok(())
}
