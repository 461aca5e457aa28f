//! `movstream prefs show|set` – read and change preferences.

use anyhow::Result;
use movstream_core::preferences::{PreferenceStore, KEYS};

pub fn run_prefs_show() -> Result<()> {
    let store = PreferenceStore::open_default()?;
    let prefs = store.current();
    for key in KEYS {
        println!("{:<30} {}", key, prefs.get(key)?);
    }
    println!("({})", store.path().display());
    Ok(())
}

pub fn run_prefs_set(key: &str, value: &str) -> Result<()> {
    let store = PreferenceStore::open_default()?;
    let prefs = store.set(key, value)?;
    println!("{} = {}", key, prefs.get(key)?);
    Ok(())
}
