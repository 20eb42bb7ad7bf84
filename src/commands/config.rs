// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - print effective settings

use crate::config::Config;
use anyhow::Result;

/// Print the effective configuration, or one key of it
pub fn run(config: &Config, key: Option<&str>) -> Result<()> {
    let mut shown = config.clone();
    if shown.token.is_some() {
        shown.token = Some("********".into());
    }

    match key {
        None => print!("{}", shown.to_toml()?),
        Some(key) => {
            let value = toml::Value::try_from(&shown)?;
            let found = key
                .split('.')
                .try_fold(&value, |v, part| v.get(part))
                .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key))?;
            match found {
                toml::Value::String(s) => println!("{s}"),
                other => println!("{other}"),
            }
        }
    }
    Ok(())
}
