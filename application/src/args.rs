//! [`Args`] definitions.

use clap::Parser;

/// GraphQL server of the rental management service.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file.
    ///
    /// Missing file is not an error: defaults and `CONF.*` environment
    /// variables are used then.
    #[arg(short, long, env = "CONF_FILE", default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn reads_config_path() {
        let args = Args::try_parse_from(["server", "-c", "rent.toml"]).unwrap();
        assert_eq!(args.config, "rent.toml");

        let args =
            Args::try_parse_from(["server", "--config", "/etc/rent.toml"])
                .unwrap();
        assert_eq!(args.config, "/etc/rent.toml");
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Args::try_parse_from(["server", "--port", "80"]).is_err());
    }
}
