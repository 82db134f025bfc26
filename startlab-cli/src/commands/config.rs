//! Effective configuration dump

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

/// Print the public configuration plus the (redacted) database target.
pub fn run_config(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path, None)?;

    let mut view = config.public_view();
    let database = match config.database.target() {
        Ok(target) => Value::String(target.describe()),
        Err(e) => Value::String(format!("not configured ({e})")),
    };
    if let Value::Object(map) = &mut view {
        map.insert("database".to_owned(), database);
        map.insert("pool_size".to_owned(), config.database.pool_size.into());
        map.insert(
            "media_dir".to_owned(),
            Value::String(config.media.dir.display().to_string()),
        );
    }

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
