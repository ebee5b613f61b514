use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run() -> Result<()> {
    let path = settings_path();
    if path.exists() {
        println!("Settings already exist at {}", path.display());
        return Ok(());
    }
    save_settings(&load_settings())?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
