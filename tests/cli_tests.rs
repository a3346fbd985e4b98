#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use sonisyncrs::cli::{validate_device, Args, Command};
    use sonisyncrs::config::Settings;
    use sonisyncrs::MelodySource;
    use std::path::PathBuf;

    #[test]
    fn test_args_without_subcommand() {
        let args = Args::parse_from(["test"]);
        assert!(args.command.is_none());
        assert!(!args.device_list);
        assert!(!args.simulate);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn test_help_lists_subcommands() {
        let help = Args::command().render_help().to_string();
        assert!(help.contains("flight"));
        assert!(help.contains("weather"));
        assert!(help.contains("--simulate"));
    }

    #[test]
    fn test_device_list_flag() {
        let args = Args::parse_from(["test", "--device-list"]);
        assert!(args.device_list);
    }

    #[test]
    fn test_flight_subcommand() {
        let args = Args::parse_from(["test", "flight", "--data", "flight.csv", "--simulate"]);
        assert_eq!(
            args.command,
            Some(Command::Flight {
                data: PathBuf::from("flight.csv")
            })
        );
        assert!(args.simulate);
    }

    #[test]
    fn test_weather_subcommand_defaults_to_hourly() {
        let args = Args::parse_from(["test", "weather"]);
        assert_eq!(
            args.command,
            Some(Command::Weather {
                weather_file: None,
                melody: MelodySource::Hourly
            })
        );

        let args = Args::parse_from([
            "test",
            "weather",
            "--melody",
            "daily",
            "--weather-file",
            "forecast.json",
        ]);
        assert_eq!(
            args.command,
            Some(Command::Weather {
                weather_file: Some(PathBuf::from("forecast.json")),
                melody: MelodySource::Daily
            })
        );
    }

    #[test]
    fn test_instant_requires_simulate() {
        assert!(Args::try_parse_from(["test", "--instant", "weather"]).is_err());
        assert!(Args::try_parse_from(["test", "--simulate", "--instant", "weather"]).is_ok());
    }

    #[test]
    fn test_unknown_melody_source_is_rejected() {
        assert!(Args::try_parse_from(["test", "weather", "--melody", "weekly"]).is_err());
    }

    #[test]
    fn test_overrides_target_the_selected_section() {
        let args = Args::parse_from([
            "test",
            "weather",
            "--tempo",
            "90",
            "--scale",
            "D dorian",
            "--low",
            "D2",
            "--output-port",
            "Synth",
        ]);
        let mut settings = Settings::defaults().unwrap();
        args.apply_overrides(&mut settings);

        assert_eq!(settings.weather.tempo, 90);
        assert_eq!(settings.weather.scale, "D dorian");
        assert_eq!(settings.weather.low, "D2");
        assert_eq!(settings.weather.high, "C6");
        assert_eq!(settings.midi.output_port, Some("Synth".to_string()));
        assert_eq!(settings.midi.input_port, None);
        // The flight section is untouched
        assert_eq!(settings.flight.tempo, 64);
        assert_eq!(settings.flight.scale, "A minor blues");
    }

    #[test]
    fn test_overrides_without_flags_keep_settings() {
        let args = Args::parse_from(["test", "flight", "--data", "f.csv"]);
        let mut settings = Settings::defaults().unwrap();
        args.apply_overrides(&mut settings);
        assert_eq!(settings.flight.tempo, 64);
        assert_eq!(settings.flight.low, "A3");
        assert_eq!(settings.flight.high, "A6");
    }

    #[test]
    fn test_valid_device_binding() {
        let devices = vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()];
        assert!(validate_device("Mock Device 1", &devices).is_ok());
        // Partial names match
        assert!(validate_device("Device 2", &devices).is_ok());
    }

    #[test]
    fn test_invalid_device_binding_lists_devices() {
        let devices = vec!["Mock Device 1".to_string(), "Mock Device 2".to_string()];
        let err = validate_device("Nonexistent Device", &devices).unwrap_err();
        assert!(err.contains("Nonexistent Device"));
        assert!(err.contains("  - Mock Device 1"));
        assert!(err.contains("  - Mock Device 2"));
    }

    #[cfg(feature = "test-mock")]
    #[test]
    fn test_mock_device_list() {
        let (inputs, outputs) = sonisyncrs::midi::list_devices();
        assert_eq!(inputs, vec!["Mock Device 1", "Mock Device 2"]);
        assert_eq!(outputs, vec!["Mock Device 1"]);
    }
}
