//! Preset listing command

use anyhow::Result;
use backdrop_particles::Preset;

pub fn run(name: &str, mobile: bool) -> Result<()> {
    let Some(preset) = Preset::parse(name) else {
        let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
        anyhow::bail!("Unknown preset '{}'; valid values: {}", name, names.join(", "));
    };

    let config = preset.config(mobile);
    println!("# {} preset{}", preset.name(), if mobile { " (mobile)" } else { "" });
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
