//! Session gateway: login, logout and the startup session check.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use taskdeck_api::{endpoints, ApiClient, ApiRequest, HttpTransport};
use taskdeck_core::prelude::*;
use taskdeck_core::{CurrentUser, LoginRequest};

use crate::latch::StartupLatch;
use crate::logger::Logger;
use crate::navigation::{Navigator, Route};
use crate::notification::NotificationService;
use crate::services::report_failure;

const LOG: Logger = Logger::new("AuthServiceLog");

/// Who the client believes is logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<CurrentUser>,
}

pub struct AuthService<T> {
    client: Arc<ApiClient<T>>,
    notifications: Arc<NotificationService>,
    navigator: Arc<dyn Navigator>,
    session: watch::Sender<SessionState>,
    latch: StartupLatch,
}

impl<T> AuthService<T> {
    pub fn new(
        client: Arc<ApiClient<T>>,
        notifications: Arc<NotificationService>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (session, _) = watch::channel(SessionState::default());
        Self {
            client,
            notifications,
            navigator,
            session,
            latch: StartupLatch::new(),
        }
    }

    pub fn session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.session.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().authenticated
    }

    /// Released once the first [`AuthService::check_session`] has completed.
    pub fn startup_latch(&self) -> &StartupLatch {
        &self.latch
    }

    fn set_session(&self, authenticated: bool, user: Option<CurrentUser>) {
        self.session.send_replace(SessionState {
            authenticated,
            user,
        });
    }
}

impl<T: HttpTransport + Sync> AuthService<T> {
    /// Log in and move to the root view.
    ///
    /// The authenticated flag is left alone here; it is set by the next
    /// [`AuthService::check_session`].
    pub async fn login(&self, request: &LoginRequest) -> Result<()> {
        LOG.info("login request sent");
        match self.send_login(request).await {
            Ok(()) => {
                LOG.info("login succeeded");
                self.navigator.navigate(Route::Root);
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "login", &err);
                Err(err)
            }
        }
    }

    async fn send_login(&self, request: &LoginRequest) -> Result<()> {
        let request = ApiRequest::post(endpoints::AUTH_LOGIN, request)?;
        self.client.command(request).await
    }

    /// End the session and move to the login view.
    pub async fn logout(&self) -> Result<()> {
        LOG.info("logout request sent");
        match self
            .client
            .command(ApiRequest::delete(endpoints::AUTH_LOGIN))
            .await
        {
            Ok(()) => {
                self.set_session(false, None);
                LOG.info("logout succeeded");
                self.navigator.navigate(Route::Login);
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "logout", &err);
                Err(err)
            }
        }
    }

    /// Ask the server who is logged in and release the startup latch.
    ///
    /// A domain refusal only means "not logged in" and is not shown to the
    /// user. Transport failures are.
    pub async fn check_session(&self) -> Result<()> {
        LOG.info("me request sent");
        let outcome = self
            .client
            .envelope::<CurrentUser>(ApiRequest::get(endpoints::AUTH_ME))
            .await;

        let result = match outcome {
            Ok(user) => {
                LOG.info(format!("session active for {}", user.login));
                self.set_session(true, Some(user));
                Ok(())
            }
            Err(err) if err.is_domain() => {
                LOG.warn(format!("no active session: {}", err.user_message()));
                self.set_session(false, None);
                Err(err)
            }
            Err(err) => {
                self.set_session(false, None);
                report_failure(&LOG, &self.notifications, "me", &err);
                Err(err)
            }
        };

        if self.latch.release() {
            LOG.info("startup session check completed");
        }
        result
    }
}
