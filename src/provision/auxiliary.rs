//! Developer settings outside the virtual environment.

use crate::config::GitConfig;
use crate::error::Result;
use crate::host::{ConfigScope, HostEnvironment};
use crate::ui::{ConfirmationPort, UserInterface};

use super::{PROMPT_CONFIGURE_GIT_IDENTITY, PROMPT_GIT_USER_EMAIL, PROMPT_GIT_USER_NAME};

const USER_NAME: &str = "user.name";
const USER_EMAIL: &str = "user.email";
const HOOKS_PATH: &str = "core.hooksPath";

/// What happened to the global git identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityOutcome {
    /// Both name and email were already set.
    AlreadySet,
    /// The user supplied the missing values.
    Configured,
    /// The user chose to leave it unset.
    Declined,
    /// Identity configuration is turned off.
    Disabled,
}

/// Result of [`configure_auxiliary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryOutcome {
    pub identity: IdentityOutcome,
    /// The hook directory now in effect, if one is configured.
    pub hooks_path: Option<String>,
}

/// Offer to fill in a missing git identity, then point the repository at
/// its hook directory.
pub fn configure_auxiliary(
    host: &HostEnvironment,
    git: &GitConfig,
    ui: &mut dyn UserInterface,
) -> Result<AuxiliaryOutcome> {
    let identity = if git.configure_identity {
        configure_identity(host, ui)?
    } else {
        IdentityOutcome::Disabled
    };

    if let Some(hooks) = &git.hooks_path {
        host.vcs().set_config(HOOKS_PATH, hooks, ConfigScope::Local)?;
        tracing::debug!("Set {} to {}", HOOKS_PATH, hooks);
        ui.success(&format!("Git hooks path set to {}", hooks));
    }

    Ok(AuxiliaryOutcome {
        identity,
        hooks_path: git.hooks_path.clone(),
    })
}

fn configure_identity(
    host: &HostEnvironment,
    ui: &mut dyn UserInterface,
) -> Result<IdentityOutcome> {
    let name = host.vcs().get_config(USER_NAME, ConfigScope::Global)?;
    let email = host.vcs().get_config(USER_EMAIL, ConfigScope::Global)?;
    if name.is_some() && email.is_some() {
        return Ok(IdentityOutcome::AlreadySet);
    }

    let question = "Your global git user.name / user.email is not set. Configure it now?";
    if !ui.ask_yes_no(PROMPT_CONFIGURE_GIT_IDENTITY, question, false)? {
        ui.warning("Git identity left unset; commits will fail until it is configured");
        return Ok(IdentityOutcome::Declined);
    }

    let name = ui.ask_text(PROMPT_GIT_USER_NAME, "Git user name", name.as_deref())?;
    let email = ui.ask_text(PROMPT_GIT_USER_EMAIL, "Git user email", email.as_deref())?;

    let mut configured = false;
    for (key, value) in [(USER_NAME, name), (USER_EMAIL, email)] {
        if value.is_empty() {
            ui.warning(&format!("No value given for {}; leaving it unset", key));
            continue;
        }
        host.vcs().set_config(key, &value, ConfigScope::Global)?;
        configured = true;
    }

    Ok(if configured {
        IdentityOutcome::Configured
    } else {
        IdentityOutcome::Declined
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use crate::ui::MockUI;

    fn hooks_only() -> GitConfig {
        GitConfig {
            configure_identity: false,
            ..GitConfig::default()
        }
    }

    #[test]
    fn hooks_path_set_locally() {
        let mock = MockHost::new();
        let host = mock.host_environment();
        let mut ui = MockUI::new();

        let outcome = configure_auxiliary(&host, &hooks_only(), &mut ui).unwrap();

        assert_eq!(outcome.identity, IdentityOutcome::Disabled);
        assert_eq!(
            mock.git_config(ConfigScope::Local, HOOKS_PATH).as_deref(),
            Some(".githooks")
        );
        assert_eq!(
            mock.actions(),
            vec!["vcs.set_config --local core.hooksPath .githooks"]
        );
    }

    #[test]
    fn hooks_path_is_idempotent() {
        let mock = MockHost::new();
        let host = mock.host_environment();
        let mut ui = MockUI::new();

        let first = configure_auxiliary(&host, &hooks_only(), &mut ui).unwrap();
        let second = configure_auxiliary(&host, &hooks_only(), &mut ui).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            mock.git_config(ConfigScope::Local, HOOKS_PATH).as_deref(),
            Some(".githooks")
        );
    }

    #[test]
    fn no_hooks_path_leaves_repository_alone() {
        let mock = MockHost::new();
        let host = mock.host_environment();
        let mut ui = MockUI::new();
        let git = GitConfig {
            configure_identity: false,
            hooks_path: None,
        };

        let outcome = configure_auxiliary(&host, &git, &mut ui).unwrap();
        assert_eq!(outcome.hooks_path, None);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn existing_identity_is_not_prompted() {
        let mock = MockHost::new();
        mock.set_git_config(ConfigScope::Global, USER_NAME, "Ada");
        mock.set_git_config(ConfigScope::Global, USER_EMAIL, "ada@example.com");
        let host = mock.host_environment();
        let mut ui = MockUI::new();

        let outcome = configure_auxiliary(&host, &GitConfig::default(), &mut ui).unwrap();

        assert_eq!(outcome.identity, IdentityOutcome::AlreadySet);
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn missing_identity_declined_by_default() {
        let mock = MockHost::new();
        let host = mock.host_environment();
        let mut ui = MockUI::new();

        let outcome = configure_auxiliary(&host, &GitConfig::default(), &mut ui).unwrap();

        assert_eq!(outcome.identity, IdentityOutcome::Declined);
        assert_eq!(ui.prompts_shown(), &[PROMPT_CONFIGURE_GIT_IDENTITY]);
        assert_eq!(mock.git_config(ConfigScope::Global, USER_NAME), None);
        assert!(ui.has_warning("left unset"));
        // Hooks are configured regardless.
        assert!(mock.git_config(ConfigScope::Local, HOOKS_PATH).is_some());
    }

    #[test]
    fn missing_identity_configured_on_consent() {
        let mock = MockHost::new();
        mock.set_git_config(ConfigScope::Global, USER_NAME, "Ada");
        let host = mock.host_environment();
        let mut ui = MockUI::new();
        ui.set_prompt_response(PROMPT_CONFIGURE_GIT_IDENTITY, "yes");
        ui.set_prompt_response(PROMPT_GIT_USER_EMAIL, "ada@example.com");

        let outcome = configure_auxiliary(&host, &GitConfig::default(), &mut ui).unwrap();

        assert_eq!(outcome.identity, IdentityOutcome::Configured);
        assert_eq!(
            ui.prompts_shown(),
            &[
                PROMPT_CONFIGURE_GIT_IDENTITY,
                PROMPT_GIT_USER_NAME,
                PROMPT_GIT_USER_EMAIL
            ]
        );
        // Existing name is offered as the default and kept.
        assert_eq!(
            mock.git_config(ConfigScope::Global, USER_NAME).as_deref(),
            Some("Ada")
        );
        assert_eq!(
            mock.git_config(ConfigScope::Global, USER_EMAIL).as_deref(),
            Some("ada@example.com")
        );
    }

    #[test]
    fn hooks_failure_propagates() {
        let mock = MockHost::new();
        mock.fail_on("vcs.set_config", 128);
        let host = mock.host_environment();
        let mut ui = MockUI::new();

        let err = configure_auxiliary(&host, &hooks_only(), &mut ui).unwrap_err();
        assert_eq!(err.exit_code(), 128);
    }
}
