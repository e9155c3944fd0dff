use anyhow::Result;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use tracing::{debug, info, warn};

use super::args::{ArgSpec, RunArgs};
use super::status::{ActionState, ActionStatus};
use super::{ActionRunner, RunReport, int_arg};
use crate::error::ActionError;
use crate::executor::{ActionContext, BloggerTarget, Interactor, run_safely};
use crate::utils::value::{CountOrRange, get_value, parse_or_default};

/// Upper bound on likes per interacted user.
pub const MAX_LIKES_PER_USER: u32 = 12;

const DEFAULT_LIKES_COUNT: u32 = 2;
const DEFAULT_USERS_AMOUNT: u32 = 100;

static ARGS: [ArgSpec; 4] = [
    ArgSpec {
        name: "likes_count",
        help: "number of likes for each interacted user, 2 by default. \
               It can be a number (e.g. 2) or a range (e.g. 2-4)",
        default: Some("2"),
        metavar: &["2-4"],
        multiple: false,
    },
    ArgSpec {
        name: "follow_percentage",
        help: "follow given percentage of interacted users, 0 by default",
        default: Some("0"),
        metavar: &["50"],
        multiple: false,
    },
    ArgSpec {
        name: "interact",
        help: "list of hashtags and usernames. Hashtags should start with \"#\" symbol; \
               any other name is taken as a username (\"@\" is optional). \
               The script will interact with hashtags' posts likers and with users' followers",
        default: None,
        metavar: &["hashtag", "@username"],
        multiple: true,
    },
    ArgSpec {
        name: "interaction_users_amount",
        help: "add this argument to select an amount of users from the interact-list \
               (users are randomized). It can be a number (e.g. 4) or a range (e.g. 3-8)",
        default: None,
        metavar: &["3-8"],
        multiple: false,
    },
];

/// Interact with the followers of a list of users (and, later, hashtag likers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractAction {
    likes_count: CountOrRange,
    follow_percentage: u8,
    interact: Vec<String>,
}

impl InteractAction {
    pub fn new() -> Self {
        Self {
            likes_count: CountOrRange::Exact(DEFAULT_LIKES_COUNT),
            follow_percentage: 0,
            interact: Vec::new(),
        }
    }

    /// Bound sources, `@user` or `#hashtag`.
    pub fn sources(&self) -> &[String] {
        &self.interact
    }

    pub fn likes_count(&self) -> CountOrRange {
        self.likes_count
    }

    pub fn follow_percentage(&self) -> u8 {
        self.follow_percentage
    }

    /// Sample the likes count for one source, clamped to [`MAX_LIKES_PER_USER`].
    pub fn effective_likes_count(&self, rng: &mut dyn RngCore) -> u32 {
        let likes_count = self.likes_count.sample(rng);
        info!(target: "instabot::actions", "Likes count: {likes_count}");
        if likes_count > MAX_LIKES_PER_USER {
            warn!(
                target: "instabot::actions",
                "Max number of likes per user is {MAX_LIKES_PER_USER}"
            );
            return MAX_LIKES_PER_USER;
        }
        likes_count
    }

    fn keep_random_sources(&mut self, raw_amount: &str, rng: &mut dyn RngCore) {
        let amount = get_value(raw_amount, "Interaction user amount", DEFAULT_USERS_AMOUNT, rng);
        let amount = usize::try_from(amount).unwrap_or(usize::MAX);
        if amount >= self.interact.len() {
            info!(
                target: "instabot::actions",
                "interaction-users-amount parameter is equal or higher then the users-interact list. \
                 Choosing all list for interaction."
            );
            return;
        }
        while self.interact.len() > amount {
            let idx = rng.random_range(0..self.interact.len());
            self.interact.remove(idx);
        }
    }
}

impl Default for InteractAction {
    fn default() -> Self {
        Self::new()
    }
}

/// `@name` and `#tag` are kept as given; a bare name is taken as a username.
fn normalize_source(raw: &str) -> Option<String> {
    let source = raw.trim();
    match source.chars().next()? {
        '@' | '#' if source.len() == 1 => None,
        '@' | '#' => Some(source.to_string()),
        _ => Some(format!("@{source}")),
    }
}

/// One guarded attempt at a source: running, hand over to the interactor, done.
fn interact_job(
    ctx: &mut ActionContext<'_>,
    interactor: &mut dyn Interactor,
    target: &BloggerTarget<'_>,
    status: &mut ActionStatus,
) -> Result<()> {
    status.set(ActionState::Running);
    if target.source.starts_with('@') {
        interactor.handle_blogger(ctx, target, status)?;
    } else {
        debug!(
            target: "instabot::actions",
            source = %target.source,
            "Hashtag interaction is not supported yet; skipping"
        );
    }
    status.set(ActionState::Done);
    Ok(())
}

impl ActionRunner for InteractAction {
    fn id(&self) -> &'static str {
        "interact"
    }

    fn args(&self) -> &'static [ArgSpec] {
        &ARGS
    }

    fn is_action_selected(&self, args: &RunArgs) -> bool {
        args.get_many("interact").is_some_and(|sources| !sources.is_empty())
    }

    fn set_params(&mut self, args: &RunArgs, rng: &mut dyn RngCore) -> Result<(), ActionError> {
        if let Some(raw) = args.get_one("likes_count") {
            self.likes_count = parse_or_default(raw, "Likes count", DEFAULT_LIKES_COUNT);
        }

        if let Some(sources) = args.get_many("interact") {
            self.interact = sources
                .iter()
                .filter_map(|raw| {
                    let normalized = normalize_source(raw);
                    if normalized.is_none() {
                        warn!(target: "instabot::actions", source = %raw, "Ignoring empty source");
                    }
                    normalized
                })
                .collect();
        }

        self.follow_percentage = int_arg(args, "follow_percentage", 0, 100)? as u8;

        if let Some(raw) = args.get_one("interaction_users_amount") {
            if !self.interact.is_empty() {
                self.keep_random_sources(raw, rng);
            }
        }

        debug!(
            target: "instabot::actions",
            sources = ?self.interact,
            likes_count = %self.likes_count,
            follow_percentage = self.follow_percentage,
            "Interact parameters bound"
        );
        Ok(())
    }

    fn run(
        &mut self,
        ctx: &mut ActionContext<'_>,
        interactor: &mut dyn Interactor,
        rng: &mut dyn RngCore,
    ) -> RunReport {
        let mut report = RunReport::default();
        self.interact.shuffle(rng);

        for source in &self.interact {
            let mut status = ActionStatus::new(ActionState::PreRun);
            let likes_count = self.effective_likes_count(rng);

            let username = source.strip_prefix('@');
            let is_myself = username.is_some_and(|name| ctx.session.is_myself(name));
            info!(
                target: "instabot::actions",
                "Handle {source}{}",
                if is_myself { " (it's you)" } else { "" }
            );

            let target = BloggerTarget {
                source,
                username: username.unwrap_or(source.trim_start_matches('#')),
                likes_count,
                follow_percentage: self.follow_percentage,
                is_myself,
            };

            while !status.is_done() {
                report.attempts += 1;
                run_safely(ctx, |ctx| {
                    interact_job(ctx, &mut *interactor, &target, &mut status)
                });
                if status.limit().is_some() {
                    break;
                }
            }

            match status.limit() {
                Some(ActionState::SessionLimitReached) => {
                    info!(target: "instabot::actions", %source, "Session limit reached; stopping");
                    report.session_limit_reached = true;
                    break;
                }
                Some(ActionState::SourceLimitReached) => {
                    info!(
                        target: "instabot::actions",
                        %source,
                        "Source limit reached; moving to the next source"
                    );
                }
                _ => {}
            }
            report.handled_sources.push(source.clone());
        }

        report
    }
}
