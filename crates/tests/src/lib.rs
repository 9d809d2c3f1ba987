//! # Integration Tests
//!
//! Cross-crate end-to-end scenarios.
//!
//! Covers:
//! - Recordings tree -> catalog -> probed durations -> synchronized playback
//! - Clip file -> telemetry samples -> overlay rows
//! - Configuration file -> engine behaviour

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod playback_e2e;

#[cfg(test)]
mod telemetry_e2e;

#[cfg(test)]
mod contract_tests {
    use contracts::PlayerConfig;

    #[test]
    fn test_default_config_round_trips_through_loader() {
        let toml = config_loader::ConfigLoader::to_toml(&PlayerConfig::default()).unwrap();
        let parsed =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();
        assert_eq!(parsed, PlayerConfig::default());
    }
}
