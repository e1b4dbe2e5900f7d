//! Session service - guest/registered lifecycle and reconciliation.
//!
//! Owns the session state machine:
//!
//! `Unauthenticated -> Loading -> {Guest, Registered} -> Unauthenticated`
//!
//! A registered remote session always takes precedence at startup; the
//! persisted guest state is consulted only when the remote provider reports
//! no session. The two modes are mutually exclusive at every instant.
//!
//! State is published through a `tokio::sync::watch` channel so UI
//! collaborators can observe transitions without owning the service.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use validator::Validate;

use loadout_domain::{Identity, Profile, ProfilePatch};

use crate::application::dto::requests::{
    validation_message, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::application::services::guest_service::GuestService;
use crate::ports::outbound::{AuthGatewayPort, SessionError};

/// Current session phase, with the active identity/profile when resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No session; the sign-in surface is shown
    Unauthenticated,
    /// Initial resolution or an explicit login/register call in flight
    Loading,
    /// Local-only guest session
    Guest { identity: Identity, profile: Profile },
    /// Provider-backed session
    Registered { identity: Identity, profile: Profile },
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Guest { identity, .. } | Self::Registered { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Guest { profile, .. } | Self::Registered { profile, .. } => Some(profile),
            _ => None,
        }
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[inline]
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest { .. })
    }

    #[inline]
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

/// Session lifecycle service.
///
/// Construct once at process start with the gateway adapter and the guest
/// manager; clone-free sharing goes through [`SessionService::subscribe`].
pub struct SessionService {
    gateway: Arc<dyn AuthGatewayPort>,
    guest: GuestService,
    state_tx: Arc<watch::Sender<SessionState>>,
}

impl SessionService {
    pub fn new(gateway: Arc<dyn AuthGatewayPort>, guest: GuestService) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            gateway,
            guest,
            state_tx: Arc::new(state_tx),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    fn set_state(&self, next: SessionState) {
        self.state_tx.send_replace(next);
    }

    /// Resolve the session at startup.
    ///
    /// Checks the remote provider first (registered wins); falls back to
    /// the persisted guest session; otherwise lands on `Unauthenticated`.
    pub async fn resolve(&self) -> Result<SessionState, SessionError> {
        self.set_state(SessionState::Loading);

        let remote = self.gateway.identity_stream().borrow().clone();
        if let Some(identity) = remote {
            match self.gateway.load_profile(&identity.uid).await {
                Ok(profile) => {
                    let next = SessionState::Registered { identity, profile };
                    self.set_state(next.clone());
                    return Ok(next);
                }
                Err(err) => {
                    self.set_state(SessionState::Unauthenticated);
                    return Err(err.into());
                }
            }
        }

        if let Some((identity, profile)) = self.guest.check_guest_mode() {
            let next = SessionState::Guest { identity, profile };
            self.set_state(next.clone());
            return Ok(next);
        }

        self.set_state(SessionState::Unauthenticated);
        Ok(SessionState::Unauthenticated)
    }

    /// Follow external login/logout reported by the provider.
    ///
    /// The gateway's identity stream is the sole channel for these; a
    /// `None` only tears down a registered session (guest sessions are
    /// purely local and unaffected by remote signout noise).
    pub fn spawn_identity_watcher(&self) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let state_tx = Arc::clone(&self.state_tx);
        let mut stream = gateway.identity_stream();
        tokio::spawn(async move {
            while stream.changed().await.is_ok() {
                let identity = stream.borrow_and_update().clone();
                match identity {
                    Some(identity) => match gateway.load_profile(&identity.uid).await {
                        Ok(profile) => {
                            state_tx.send_replace(SessionState::Registered { identity, profile });
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "profile load failed after identity change");
                        }
                    },
                    None => {
                        let was_registered =
                            matches!(&*state_tx.borrow(), SessionState::Registered { .. });
                        if was_registered {
                            state_tx.send_replace(SessionState::Unauthenticated);
                        }
                    }
                }
            }
        })
    }

    /// Start a local guest session (overwrites any previous one).
    pub fn start_guest_session(&self) -> Result<(Identity, Profile), SessionError> {
        let (identity, profile) = self.guest.create_guest_session()?;
        self.set_state(SessionState::Guest {
            identity: identity.clone(),
            profile: profile.clone(),
        });
        Ok((identity, profile))
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<(), SessionError> {
        request
            .validate()
            .map_err(|e| SessionError::Validation(validation_message(&e)))?;

        let previous = self.state();
        self.set_state(SessionState::Loading);
        let identity = match self.gateway.login(&request.email, &request.password).await {
            Ok(identity) => identity,
            Err(err) => {
                self.set_state(previous);
                return Err(err.into());
            }
        };
        self.finish_sign_in(identity, previous).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), SessionError> {
        request
            .validate()
            .map_err(|e| SessionError::Validation(validation_message(&e)))?;

        let previous = self.state();
        self.set_state(SessionState::Loading);
        let identity = match self
            .gateway
            .register(&request.email, &request.password, &request.display_name)
            .await
        {
            Ok(identity) => identity,
            Err(err) => {
                self.set_state(previous);
                return Err(err.into());
            }
        };
        self.finish_sign_in(identity, previous).await
    }

    pub async fn login_federated(&self) -> Result<(), SessionError> {
        let previous = self.state();
        self.set_state(SessionState::Loading);
        let identity = match self.gateway.login_federated().await {
            Ok(identity) => identity,
            Err(err) => {
                self.set_state(previous);
                return Err(err.into());
            }
        };
        self.finish_sign_in(identity, previous).await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<(), SessionError> {
        request
            .validate()
            .map_err(|e| SessionError::Validation(validation_message(&e)))?;
        self.gateway.reset_password(&request.email).await?;
        Ok(())
    }

    /// End the current session.
    ///
    /// Guests have their local state cleared; registered sessions sign out
    /// through the provider. Either way the state lands on
    /// `Unauthenticated`.
    pub async fn logout(&self) -> Result<(), SessionError> {
        match self.state() {
            SessionState::Guest { identity, .. } => {
                self.guest.clear_guest_data()?;
                tracing::info!(uid = %identity.uid, "guest session cleared");
            }
            SessionState::Registered { identity, .. } => {
                self.gateway.logout().await?;
                tracing::info!(uid = %identity.uid, "signed out");
            }
            _ => {}
        }
        self.set_state(SessionState::Unauthenticated);
        Ok(())
    }

    /// Promote the active guest session to a registered account.
    ///
    /// Sequenced, never interleaved with other session mutations:
    /// validate, register, write the preserved progression for the new
    /// uid, clear guest state, transition. A failure before the clear
    /// leaves the guest session fully intact.
    pub async fn convert_guest_to_user(&self, request: &RegisterRequest) -> Result<(), SessionError> {
        let SessionState::Guest {
            identity: guest_identity,
            profile: guest_profile,
        } = self.state()
        else {
            return Err(SessionError::NotGuest);
        };

        request
            .validate()
            .map_err(|e| SessionError::Validation(validation_message(&e)))?;

        let identity = self
            .gateway
            .register(&request.email, &request.password, &request.display_name)
            .await?;

        // progression is copied verbatim, never recomputed
        let patch = ProfilePatch::progress(guest_profile.level(), guest_profile.xp());
        self.gateway.save_profile(&identity.uid, &patch).await?;

        self.guest.clear_guest_data()?;

        let mut profile = Profile::with_progress(
            identity.uid.clone(),
            guest_profile.level(),
            guest_profile.xp(),
            identity.created_at,
        );
        profile.touch_login(identity.last_sign_in_at);

        tracing::info!(
            from = %guest_identity.uid,
            to = %identity.uid,
            level = profile.level(),
            xp = profile.xp(),
            "converted guest session to registered account"
        );
        self.set_state(SessionState::Registered { identity, profile });
        Ok(())
    }

    /// Record earned xp for the active session.
    ///
    /// Guests persist locally; registered sessions merge-write through the
    /// gateway. Without an active session the event is dropped.
    pub async fn add_xp(&self, amount: u32) -> Result<(), SessionError> {
        match self.state() {
            SessionState::Guest {
                identity,
                mut profile,
            } => {
                profile.add_xp(amount);
                self.guest
                    .update_guest_data(&ProfilePatch::progress(profile.level(), profile.xp()))?;
                self.set_state(SessionState::Guest { identity, profile });
                Ok(())
            }
            SessionState::Registered {
                identity,
                mut profile,
            } => {
                profile.add_xp(amount);
                self.gateway
                    .save_profile(
                        &identity.uid,
                        &ProfilePatch::progress(profile.level(), profile.xp()),
                    )
                    .await?;
                self.set_state(SessionState::Registered { identity, profile });
                Ok(())
            }
            _ => {
                tracing::debug!(amount, "xp event dropped: no active session");
                Ok(())
            }
        }
    }

    async fn finish_sign_in(
        &self,
        identity: Identity,
        previous: SessionState,
    ) -> Result<(), SessionError> {
        let mut profile = match self.gateway.load_profile(&identity.uid).await {
            Ok(profile) => profile,
            Err(err) => {
                self.set_state(previous);
                return Err(err.into());
            }
        };
        profile.touch_login(identity.last_sign_in_at);
        let patch = ProfilePatch {
            last_login: Some(identity.last_sign_in_at),
            ..ProfilePatch::default()
        };
        if let Err(err) = self.gateway.save_profile(&identity.uid, &patch).await {
            tracing::warn!(error = %err, "failed to record last login");
        }
        self.set_state(SessionState::Registered { identity, profile });
        Ok(())
    }
}
