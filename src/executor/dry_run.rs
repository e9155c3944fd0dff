use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::context::{ActionContext, BloggerTarget, Device, Interactor};
use crate::actions::ActionStatus;
use crate::session::SessionAction;

/// Device stand-in that only logs. Used when no device backend is linked.
#[derive(Debug, Clone)]
pub struct DryRunDevice {
    id: String,
}

impl DryRunDevice {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for DryRunDevice {
    fn default() -> Self {
        Self::new("dry-run")
    }
}

impl Device for DryRunDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn recover(&mut self) -> Result<()> {
        info!(target: "instabot::executor", device = %self.id, "DRY-RUN recover");
        Ok(())
    }
}

/// Interactor that logs the interaction it would perform and counts it as done.
///
/// The likes and the follow it would perform are reported like real ones, so the session
/// limits apply to a dry run too. Already interacted users and users rejected by
/// `is_passed_filters` are skipped.
#[derive(Debug, Clone)]
pub struct DryRunInteractor {
    handled: u32,
    rng: StdRng,
}

impl DryRunInteractor {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Use `rng` to decide which users get followed.
    pub fn with_rng(rng: StdRng) -> Self {
        Self { handled: 0, rng }
    }

    /// Number of bloggers this interactor has (pretended to have) handled.
    pub fn handled(&self) -> u32 {
        self.handled
    }
}

impl Default for DryRunInteractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Interactor for DryRunInteractor {
    fn handle_blogger(
        &mut self,
        ctx: &mut ActionContext<'_>,
        target: &BloggerTarget<'_>,
        status: &mut ActionStatus,
    ) -> Result<()> {
        if ctx.storage.is_user_interacted(target.username) {
            debug!(
                target: "instabot::executor",
                username = %target.username,
                "Already interacted; skipping"
            );
            return Ok(());
        }
        if !ctx.passes_filters(target.username) {
            debug!(
                target: "instabot::executor",
                username = %target.username,
                "Rejected by filters; skipping"
            );
            return Ok(());
        }

        info!(
            target: "instabot::executor",
            device = %ctx.device.id(),
            username = %target.username,
            likes_count = target.likes_count,
            follow_percentage = target.follow_percentage,
            "DRY-RUN handle_blogger"
        );
        self.handled += 1;
        if target.likes_count > 0 {
            ctx.report(SessionAction::Like {
                username: target.username.to_string(),
                count: target.likes_count,
            });
        }
        let follow = self.rng.random_range(0..100u8) < target.follow_percentage;
        if follow {
            info!(target: "instabot::executor", username = %target.username, "DRY-RUN follow");
            ctx.report(SessionAction::Follow {
                username: target.username.to_string(),
            });
        }
        ctx.storage.add_interacted_user(target.username, follow);
        ctx.report(SessionAction::Interact {
            source: target.source.to_string(),
            username: target.username.to_string(),
            succeed: true,
        });

        if let Some(limit) = ctx.check_limit(target.source) {
            trace!(target: "instabot::executor", %limit, "Raising limit");
            status.set_limit(limit);
        }
        Ok(())
    }
}
