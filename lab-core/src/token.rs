//! Access token lookup with lazy, persisted acquisition.

use thiserror::Error;
use tracing::debug;

use crate::model::Token;
use crate::prompt::{PromptError, UserPrompt};
use crate::store::{PreferenceStore, StoreError};

/// Error type for token resolution.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Reading the token from the user failed.
    #[error("failed to read private token for {domain}: {source}")]
    Input {
        domain: String,
        #[source]
        source: PromptError,
    },

    /// The user entered nothing.
    #[error("no private token entered for {domain}")]
    Empty { domain: String },

    /// The new token could not be saved.
    #[error("failed to save private token for {domain}: {source}")]
    Persistence {
        domain: String,
        #[source]
        source: StoreError,
    },
}

/// Return the token for `domain`, asking for one if none is stored.
///
/// A stored non-empty token is returned as is, without prompting or
/// writing. Otherwise the entered token is recorded and the preferences
/// are written once; a failed write is an error.
pub fn resolve_token(
    domain: &str,
    prefs: &mut PreferenceStore,
    prompt: &mut dyn UserPrompt,
) -> Result<Token, TokenError> {
    if let Some(token) = prefs.token(domain) {
        debug!(domain, "Using stored private token");
        return Ok(token);
    }

    let answer = prompt
        .ask_secret(&format!("Please input GitLab private token for {}: ", domain))
        .map_err(|source| TokenError::Input {
            domain: domain.to_string(),
            source,
        })?;

    let token = Token::new(answer.trim());
    if token.is_empty() {
        return Err(TokenError::Empty {
            domain: domain.to_string(),
        });
    }

    prefs.add_token(domain, &token);
    prefs.persist().map_err(|source| TokenError::Persistence {
        domain: domain.to_string(),
        source,
    })?;
    debug!(domain, "Stored new private token");

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompt;
    use crate::store::{MemoryBackend, Preferences};
    use std::collections::BTreeMap;

    fn store_with_tokens(tokens: &[(&str, &str)]) -> (PreferenceStore, MemoryBackend) {
        let backend = MemoryBackend::with_data(Preferences {
            tokens: tokens
                .iter()
                .map(|(d, t)| (d.to_string(), t.to_string()))
                .collect::<BTreeMap<_, _>>(),
            ..Preferences::default()
        });
        let store = PreferenceStore::load(Box::new(backend.clone())).unwrap();
        (store, backend)
    }

    #[test]
    fn test_stored_token_needs_no_prompt() {
        let (mut prefs, backend) = store_with_tokens(&[("gitlab.a.com", "glpat-a")]);
        let mut prompt = ScriptedPrompt::default();

        let token = resolve_token("gitlab.a.com", &mut prefs, &mut prompt).unwrap();

        assert_eq!(token.expose(), "glpat-a");
        assert!(prompt.asked().is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_missing_token_is_prompted_and_saved() {
        let (mut prefs, backend) = store_with_tokens(&[("gitlab.other.com", "glpat-o")]);
        let mut prompt = ScriptedPrompt::new(["glpat-new"]);

        let token = resolve_token("gitlab.a.com", &mut prefs, &mut prompt).unwrap();

        assert_eq!(token.expose(), "glpat-new");
        assert_eq!(prompt.asked(), ["Please input GitLab private token for gitlab.a.com: "]);
        assert_eq!(prompt.secret_asked(), prompt.asked(), "token must be read without echo");
        assert_eq!(backend.write_count(), 1);
        let saved = backend.snapshot();
        assert_eq!(saved.tokens.get("gitlab.a.com").map(String::as_str), Some("glpat-new"));
        assert_eq!(saved.tokens.get("gitlab.other.com").map(String::as_str), Some("glpat-o"));
    }

    #[test]
    fn test_second_resolution_is_idempotent() {
        let (mut prefs, backend) = store_with_tokens(&[]);
        let mut prompt = ScriptedPrompt::new(["glpat-once"]);

        let first = resolve_token("gitlab.a.com", &mut prefs, &mut prompt).unwrap();
        let second = resolve_token("gitlab.a.com", &mut prefs, &mut prompt).unwrap();

        assert_eq!(first, second);
        assert_eq!(prompt.asked().len(), 1);
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_empty_stored_token_prompts_again() {
        let (mut prefs, backend) = store_with_tokens(&[("gitlab.a.com", "")]);
        let mut prompt = ScriptedPrompt::new(["glpat-filled"]);

        let token = resolve_token("gitlab.a.com", &mut prefs, &mut prompt).unwrap();

        assert_eq!(token.expose(), "glpat-filled");
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_token_without_preferred_domain_is_used() {
        let (mut prefs, _backend) = store_with_tokens(&[("gitlab.a.com", "glpat-a")]);
        assert!(prefs.preferred_domains().is_empty());

        let mut prompt = ScriptedPrompt::default();
        let token = resolve_token("gitlab.a.com", &mut prefs, &mut prompt).unwrap();

        assert_eq!(token.expose(), "glpat-a");
    }

    #[test]
    fn test_closed_input_fails() {
        let (mut prefs, backend) = store_with_tokens(&[]);
        let mut prompt = ScriptedPrompt::default();

        let result = resolve_token("gitlab.a.com", &mut prefs, &mut prompt);

        assert!(matches!(result, Err(TokenError::Input { .. })));
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_blank_answer_is_not_stored() {
        let (mut prefs, backend) = store_with_tokens(&[]);
        let mut prompt = ScriptedPrompt::new([""]);

        let result = resolve_token("gitlab.a.com", &mut prefs, &mut prompt);

        assert!(matches!(result, Err(TokenError::Empty { .. })));
        assert!(prefs.token("gitlab.a.com").is_none());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_token_answer_is_trimmed() {
        let (mut prefs, backend) = store_with_tokens(&[]);
        let mut prompt = ScriptedPrompt::new(["  glpat-padded \n"]);

        let token = resolve_token("gitlab.a.com", &mut prefs, &mut prompt).unwrap();

        assert_eq!(token.expose(), "glpat-padded");
        assert_eq!(
            backend.snapshot().tokens.get("gitlab.a.com").map(String::as_str),
            Some("glpat-padded")
        );
    }

    #[test]
    fn test_write_failure_is_fatal() {
        let (mut prefs, backend) = store_with_tokens(&[]);
        backend.fail_writes(true);
        let mut prompt = ScriptedPrompt::new(["glpat-lost"]);

        let result = resolve_token("gitlab.a.com", &mut prefs, &mut prompt);

        assert!(matches!(result, Err(TokenError::Persistence { .. })));
        assert!(backend.snapshot().tokens.is_empty());
    }
}
