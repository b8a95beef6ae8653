use fitbit_client::{FitbitClient, config::Config, http_client::ReqwestFitbitClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects FITBIT_ACCESS_TOKEN in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestFitbitClient::new(&cfg.base_url, cfg.access_token);
    let profile = client.fetch_snapshot("today").await?;
    println!(
        "{} - BMI {} - goals: {}",
        profile.user.name,
        profile.user.bmi,
        profile.goals.join(", ")
    );
    Ok(())
}
