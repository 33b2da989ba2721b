use super::ui;
use crate::api::ApiClient;
use anyhow::Result;

pub async fn run(api: &ApiClient) -> Result<()> {
    let spinner = ui::new_spinner("Generating portfolio commentary...");
    let analysis = api.advice().await;
    spinner.finish_and_clear();

    println!(
        "{}\n\n{}",
        ui::style_text("AI Portfolio Analysis", ui::StyleType::Title),
        analysis?
    );
    Ok(())
}
