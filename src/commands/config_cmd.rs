use mongosnap::config::Config;
use std::error::Error;

pub fn show_config(config: &Config) -> Result<(), Box<dyn Error>> {
    println!("{}", render_config(config)?);
    Ok(())
}

pub fn render_config(config: &Config) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&config.redacted())
}
