use log::LevelFilter;
use pitchside_api::client::DEFAULT_BASE_URL;

pub const ENV_API_URL: &str = "PITCHSIDE_API_URL";
pub const ENV_TOKEN: &str = "PITCHSIDE_TOKEN";
pub const ENV_MATCH: &str = "PITCHSIDE_MATCH";
pub const ENV_LOG: &str = "PITCHSIDE_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub api_url: String,
    pub token: Option<String>,
    /// Match whose lineup board opens on startup.
    pub initial_match: Option<u64>,
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            initial_match: None,
            full_screen: false,
            log_level: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(AppSettings),
    Help,
    Version,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            api_url: get(ENV_API_URL).unwrap_or(defaults.api_url),
            token: get(ENV_TOKEN),
            initial_match: get(ENV_MATCH).and_then(|m| m.parse().ok()),
            full_screen: false,
            log_level: get(ENV_LOG).and_then(|l| l.parse().ok()),
        }
    }

    /// Apply command line flags on top of these settings.
    pub fn with_args<I, S>(mut self, args: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "-V" | "--version" => return Ok(Command::Version),
                "--api" => {
                    self.api_url = args.next().ok_or("--api needs a URL")?;
                }
                "--match" => {
                    let raw = args.next().ok_or("--match needs a match id")?;
                    let id = raw.parse().map_err(|_| format!("invalid match id: {raw}"))?;
                    self.initial_match = Some(id);
                }
                other => return Err(format!("Unknown argument: {other}")),
            }
        }
        Ok(Command::Run(self))
    }
}
