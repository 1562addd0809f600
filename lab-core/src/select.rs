//! Choosing one remote among several candidates.
//!
//! Selection rules, in order:
//! 1. No candidates: nothing to select (not inside a GitLab repository).
//! 2. One candidate: use it.
//! 3. Several: the first entry of the preferred domains that matches a
//!    candidate wins.
//! 4. Otherwise ask the user, then remember the chosen domain.

use thiserror::Error;
use tracing::debug;

use crate::model::RemoteInfo;
use crate::prompt::{PromptError, UserPrompt};
use crate::store::{PreferenceStore, StoreError};

/// Error type for remote selection.
#[derive(Debug, Error)]
pub enum SelectError {
    /// The answer was not a number.
    #[error("failed to parse remote choice '{input}' as a number")]
    NotANumber { input: String },

    /// The answer was not one of the listed entries.
    #[error("invalid remote choice '{input}': expected a number from 1 to {count}")]
    OutOfRange { input: String, count: usize },

    /// Reading the answer failed.
    #[error("failed to read remote choice: {0}")]
    Input(#[source] PromptError),

    /// The chosen domain could not be remembered.
    #[error("failed to save preferred domain: {0}")]
    Persistence(#[source] StoreError),
}

/// Pick the remote to operate on.
///
/// Returns `Ok(None)` when `candidates` is empty. A preference is only
/// written after an interactive choice; if that write fails the error is
/// returned even though the choice itself was valid.
pub fn select_remote(
    candidates: Vec<RemoteInfo>,
    prefs: &mut PreferenceStore,
    prompt: &mut dyn UserPrompt,
) -> Result<Option<RemoteInfo>, SelectError> {
    if candidates.len() <= 1 {
        return Ok(candidates.into_iter().next());
    }

    if let Some(remote) = preferred_remote(&candidates, prefs.preferred_domains()) {
        debug!(domain = %remote.domain, "Selected remote from preferred domains");
        return Ok(Some(remote.clone()));
    }

    let remote = ask_for_remote(candidates, prompt)?;

    prefs.add_preferred_domain(remote.domain.clone());
    prefs.persist().map_err(SelectError::Persistence)?;
    debug!(domain = %remote.domain, "Remembered chosen domain");

    Ok(Some(remote))
}

/// First candidate matching the highest-priority preferred domain.
///
/// Priority follows the preference list, not the candidate order.
fn preferred_remote<'a>(candidates: &'a [RemoteInfo], preferred: &[String]) -> Option<&'a RemoteInfo> {
    preferred.iter().find_map(|domain| {
        candidates
            .iter()
            .find(|remote| &remote.domain == domain)
    })
}

fn ask_for_remote(
    mut candidates: Vec<RemoteInfo>,
    prompt: &mut dyn UserPrompt,
) -> Result<RemoteInfo, SelectError> {
    prompt.message("That repository has multiple GitLab remotes.");
    for (i, remote) in candidates.iter().enumerate() {
        prompt.message(&format!("{}) {}", i + 1, remote.domain));
    }

    let input = prompt
        .ask("Please choose target domain: ")
        .map_err(SelectError::Input)?;

    let choice: usize = input
        .parse()
        .map_err(|_| SelectError::NotANumber { input: input.clone() })?;

    let count = candidates.len();
    if !(1..=count).contains(&choice) {
        return Err(SelectError::OutOfRange { input, count });
    }

    Ok(candidates.swap_remove(choice - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Protocol;
    use crate::prompt::ScriptedPrompt;
    use crate::store::{MemoryBackend, Preferences};

    fn remote(domain: &str) -> RemoteInfo {
        RemoteInfo::new("origin", Protocol::Https, domain, "group", "project")
    }

    fn store_with(preferred: &[&str]) -> (PreferenceStore, MemoryBackend) {
        let backend = MemoryBackend::with_data(Preferences {
            preferred_domains: preferred.iter().map(|d| d.to_string()).collect(),
            ..Preferences::default()
        });
        let store = PreferenceStore::load(Box::new(backend.clone())).unwrap();
        (store, backend)
    }

    #[test]
    fn test_no_candidates_is_absent() {
        let (mut prefs, backend) = store_with(&[]);
        let mut prompt = ScriptedPrompt::default();

        let selected = select_remote(vec![], &mut prefs, &mut prompt).unwrap();

        assert!(selected.is_none());
        assert!(prompt.asked().is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_single_candidate_ignores_preferences() {
        let (mut prefs, backend) = store_with(&["gitlab.other.com"]);
        let mut prompt = ScriptedPrompt::default();

        let selected = select_remote(vec![remote("gitlab.a.com")], &mut prefs, &mut prompt).unwrap();

        assert_eq!(selected, Some(remote("gitlab.a.com")));
        assert!(prompt.asked().is_empty());
        assert_eq!(backend.write_count(), 0);
        assert_eq!(prefs.preferred_domains(), ["gitlab.other.com"]);
    }

    #[test]
    fn test_preference_order_beats_candidate_order() {
        let (mut prefs, backend) = store_with(&["gitlab.c.com", "gitlab.b.com", "gitlab.a.com"]);
        let mut prompt = ScriptedPrompt::default();

        let forward = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
        let backward = vec![remote("gitlab.b.com"), remote("gitlab.a.com")];

        let first = select_remote(forward, &mut prefs, &mut prompt).unwrap();
        let second = select_remote(backward, &mut prefs, &mut prompt).unwrap();

        assert_eq!(first, Some(remote("gitlab.b.com")));
        assert_eq!(second, Some(remote("gitlab.b.com")));
        assert!(prompt.asked().is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_prompt_lists_candidates_in_input_order() {
        let (mut prefs, _backend) = store_with(&[]);
        let mut prompt = ScriptedPrompt::new(["2"]);

        let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com"), remote("gitlab.c.com")];
        let selected = select_remote(candidates, &mut prefs, &mut prompt).unwrap();

        assert_eq!(selected, Some(remote("gitlab.b.com")));
        assert_eq!(
            prompt.messages(),
            [
                "That repository has multiple GitLab remotes.",
                "1) gitlab.a.com",
                "2) gitlab.b.com",
                "3) gitlab.c.com",
            ]
        );
        assert_eq!(prompt.asked(), ["Please choose target domain: "]);
    }

    #[test]
    fn test_valid_choice_is_remembered_once() {
        let (mut prefs, backend) = store_with(&["gitlab.unrelated.com"]);
        let mut prompt = ScriptedPrompt::new(["1"]);

        let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
        select_remote(candidates, &mut prefs, &mut prompt).unwrap();

        assert_eq!(prefs.preferred_domains(), ["gitlab.unrelated.com", "gitlab.a.com"]);
        assert_eq!(backend.write_count(), 1);
        assert_eq!(
            backend.snapshot().preferred_domains,
            ["gitlab.unrelated.com", "gitlab.a.com"]
        );
    }

    #[test]
    fn test_remembered_choice_skips_prompt_next_time() {
        let (mut prefs, backend) = store_with(&[]);
        let mut prompt = ScriptedPrompt::new(["2"]);

        let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
        select_remote(candidates.clone(), &mut prefs, &mut prompt).unwrap();
        let again = select_remote(candidates, &mut prefs, &mut prompt).unwrap();

        assert_eq!(again, Some(remote("gitlab.b.com")));
        assert_eq!(prompt.asked().len(), 1);
        assert_eq!(backend.write_count(), 1);
    }

    #[test]
    fn test_rejects_zero_and_past_end() {
        for answer in ["0", "3"] {
            let (mut prefs, backend) = store_with(&[]);
            let mut prompt = ScriptedPrompt::new([answer]);

            let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
            let result = select_remote(candidates, &mut prefs, &mut prompt);

            match result {
                Err(SelectError::OutOfRange { input, count }) => {
                    assert_eq!(input, answer);
                    assert_eq!(count, 2);
                }
                other => panic!("expected OutOfRange for {answer}, got {other:?}"),
            }
            assert!(prefs.preferred_domains().is_empty());
            assert_eq!(backend.write_count(), 0);
        }
    }

    #[test]
    fn test_rejects_non_numeric() {
        for answer in ["abc", "-1", "1.5", ""] {
            let (mut prefs, _backend) = store_with(&[]);
            let mut prompt = ScriptedPrompt::new([answer]);

            let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
            let result = select_remote(candidates, &mut prefs, &mut prompt);

            assert!(
                matches!(result, Err(SelectError::NotANumber { ref input }) if input == answer),
                "unexpected result for {answer:?}: {result:?}"
            );
        }
    }

    #[test]
    fn test_error_message_echoes_input() {
        let (mut prefs, _backend) = store_with(&[]);
        let mut prompt = ScriptedPrompt::new(["seven"]);

        let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
        let err = select_remote(candidates, &mut prefs, &mut prompt).unwrap_err();

        assert!(err.to_string().contains("'seven'"));
    }

    #[test]
    fn test_closed_input() {
        let (mut prefs, _backend) = store_with(&[]);
        let mut prompt = ScriptedPrompt::default();

        let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
        let result = select_remote(candidates, &mut prefs, &mut prompt);

        assert!(matches!(result, Err(SelectError::Input(PromptError::Closed))));
    }

    #[test]
    fn test_write_failure_is_fatal_but_keeps_choice_in_memory() {
        let (mut prefs, backend) = store_with(&[]);
        backend.fail_writes(true);
        let mut prompt = ScriptedPrompt::new(["1"]);

        let candidates = vec![remote("gitlab.a.com"), remote("gitlab.b.com")];
        let result = select_remote(candidates, &mut prefs, &mut prompt);

        assert!(matches!(result, Err(SelectError::Persistence(_))));
        assert_eq!(prefs.preferred_domains(), ["gitlab.a.com"]);
        assert!(backend.snapshot().preferred_domains.is_empty());
    }
}
