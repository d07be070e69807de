use crate::config::GitHubConfig;

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

fn env_token(var: &str) -> Option<String> {
    let token = std::env::var(var).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Find a GitHub token, trying:
/// 1. The configured env var
/// 2. The configured CLI command
///
/// Returns None when neither yields one; requests then go out anonymously.
pub fn load_token(config: &GitHubConfig) -> Option<String> {
    if let Some(token) = config.token_env.as_deref().and_then(env_token) {
        tracing::debug!("using token from environment");
        return Some(token);
    }

    if let Some(token) = config.token_command.as_deref().and_then(try_cli_token) {
        tracing::debug!("using token from token_command");
        return Some(token);
    }

    tracing::info!("no GitHub token found, continuing unauthenticated");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_token_trims_output() {
        assert_eq!(try_cli_token("echo '  abc123  '"), Some("abc123".to_string()));
    }

    #[test]
    fn cli_token_failure_is_none() {
        assert_eq!(try_cli_token("exit 1"), None);
        assert_eq!(try_cli_token("true"), None);
    }

    #[test]
    fn token_from_env_var() {
        std::env::set_var("REPOPAGE_TEST_TOKEN_SET", "from-env");
        let config = GitHubConfig {
            api_url: None,
            token_env: Some("REPOPAGE_TEST_TOKEN_SET".to_string()),
            token_command: Some("echo from-command".to_string()),
        };
        assert_eq!(load_token(&config), Some("from-env".to_string()));
    }

    #[test]
    fn falls_back_to_command() {
        let config = GitHubConfig {
            api_url: None,
            token_env: Some("REPOPAGE_TEST_TOKEN_UNSET".to_string()),
            token_command: Some("echo from-command".to_string()),
        };
        assert_eq!(load_token(&config), Some("from-command".to_string()));
    }

    #[test]
    fn no_sources_is_none() {
        let config = GitHubConfig {
            api_url: None,
            token_env: None,
            token_command: None,
        };
        assert_eq!(load_token(&config), None);
    }
}
