use mongosnap::config::Config;
use mongosnap::{create_app_state, AppState};
use std::error::Error;

pub async fn execute(config: Config) -> Result<(), Box<dyn Error>> {
    let app_state = create_app_state(config).await?;
    println!("{}", run_once(&app_state).await?);
    Ok(())
}

/// One backup run, rendered as pretty JSON. Configuration errors come back
/// as the underlying `RequestError`.
pub async fn run_once(app_state: &AppState) -> Result<String, Box<dyn Error>> {
    let results = app_state.run_backup().await?;
    Ok(serde_json::to_string_pretty(&results)?)
}
