use std::{fs, path::Path};

use anyhow::{Context, Result};
use train_match_core::Tuning;

/// Reads tuning overrides from a TOML file. Missing keys keep their defaults.
pub(crate) fn load(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid tuning file at {}", path.display()))
}

fn parse(contents: &str) -> Result<Tuning> {
    toml::from_str(contents).context("failed to parse tuning toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_overrides_named_keys_only() {
        let tuning = parse(
            r#"
            [timings]
            quit_delay_ms = 500

            [physics]
            acceleration = 12.5
            "#,
        )
        .expect("valid toml");

        assert_eq!(tuning.timings.quit_delay_ms, 500);
        assert_eq!(tuning.timings.summary_display_ms, 10_000);
        assert_eq!(tuning.physics.acceleration, 12.5);
        assert_eq!(tuning.physics.brake, 20.0);
    }

    #[test]
    fn absent_path_uses_defaults() {
        assert_eq!(load(None).expect("defaults"), Tuning::default());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tuning.toml");
        fs::write(&path, "[timings]\nquit_delay_ms = \"soon\"\n").expect("write");
        assert!(load(Some(&path)).is_err());
    }
}
