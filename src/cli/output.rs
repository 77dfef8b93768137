use crate::core::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

impl OutputOptions {
    /// Resolve output options from CLI flags over config defaults.
    /// Precedence: --json > --format > config default_format; --no-color >
    /// config color mode > NO_COLOR env > tty detection.
    pub fn resolve(
        config: &AppConfig,
        format_flag: Option<&str>,
        json_flag: bool,
        pretty: bool,
        no_color: bool,
        verbose: bool,
    ) -> Self {
        let format = if json_flag {
            OutputFormat::Json
        } else {
            match format_flag.unwrap_or(config.settings.default_format.as_str()) {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Text,
            }
        };

        let use_color = match (no_color, config.settings.color.as_str()) {
            (true, _) | (false, "never") => false,
            (false, "always") => true,
            _ => detect_color(true),
        };

        Self {
            format,
            pretty,
            use_color,
            verbose,
        }
    }

    /// Serialize a machine-readable payload per the --pretty flag.
    pub fn to_json<T: serde::Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
        } else {
            serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
        }
    }
}

pub fn detect_color(color_flag: bool) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty_stdout()
}

fn atty_stdout() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
