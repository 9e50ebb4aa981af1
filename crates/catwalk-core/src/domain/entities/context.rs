//! Request context: locale, project settings and session.

use serde::{Deserialize, Serialize};

/// Per-request context handed to stream handlers and field visitors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Current locale, e.g. `de_CH`.
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub project: Project,
    #[serde(default)]
    pub session: Session,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub project_id: String,
    /// Languages configured for the project, in preference order.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub default_language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Context {
    pub fn new(locale: impl Into<String>, project: Project) -> Self {
        Self {
            locale: locale.into(),
            project,
            session: Session::default(),
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Account id of a logged-in session.
    pub fn account_id(&self) -> Option<&str> {
        if !self.session.logged_in {
            return None;
        }
        self.session
            .account
            .as_ref()
            .map(|account| account.account_id.as_str())
    }
}

impl Project {
    pub fn new(
        project_id: impl Into<String>,
        languages: Vec<String>,
        default_language: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            languages,
            default_language: default_language.into(),
        }
    }
}

impl Session {
    pub fn logged_in(account_id: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            account: Some(Account {
                account_id: account_id.into(),
                email: None,
            }),
        }
    }
}
