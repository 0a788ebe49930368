use log::info;
use allm_smoke::config::{API_KEY_ENV, PLACEHOLDER_API_KEY};
use allm_smoke::console::Console;
use allm_smoke::{selector, EndpointConfig, Harness, Selection};

/// Usage: allm-smoke [chat|code|stream]
#[tokio::main(flavor = "current_thread")]
async fn main()
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    // Keep any library that reads the variable away from real providers
    std::env::set_var(API_KEY_ENV, PLACEHOLDER_API_KEY);

    let config = EndpointConfig::default();
    let selection = Selection::from_args(std::env::args().skip(1));
    info!("Selected: {:?}", selection);

    let mut harness = Harness::new(config.clone());
    let mut console = Console::stdout();
    selector::run(&selection, &config, &mut harness, &mut console).await;
}
