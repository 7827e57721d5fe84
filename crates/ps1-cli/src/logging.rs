use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "PS1_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter directives for the given `-v` count and `PS1_LOG` value.
///
/// An explicit `-v` always wins over the environment.
fn directives(verbosity: u8, env: Option<String>) -> String {
    match verbosity {
        0 => env
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the global subscriber writing to stderr.
pub fn init(verbosity: u8) {
    let directives = directives(verbosity, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(directives(0, None), "warn");
        assert_eq!(directives(0, Some("  ".to_string())), "warn");
    }

    #[test]
    fn test_env_directive() {
        assert_eq!(directives(0, Some("ps1_codec=trace".to_string())), "ps1_codec=trace");
    }

    #[test]
    fn test_verbose_overrides_env() {
        assert_eq!(directives(1, Some("error".to_string())), "info");
        assert_eq!(directives(2, None), "debug");
        assert_eq!(directives(5, None), "trace");
    }
}
