use rand::RngCore;
use tracing::{debug, info};

use super::args::{ArgSpec, RunArgs};
use super::{ActionRunner, RunReport, int_arg};
use crate::error::ActionError;
use crate::executor::{ActionContext, Interactor};
use crate::utils::value::get_value;

const DEFAULT_UNFOLLOW_COUNT: u32 = 100;

const MIN_FOLLOWING: ArgSpec = ArgSpec {
    name: "min_following",
    help: "minimum amount of followings, after reaching this amount unfollow stops",
    default: Some("0"),
    metavar: &["100"],
    multiple: false,
};

static UNFOLLOW_ARGS: [ArgSpec; 2] = [
    ArgSpec {
        name: "unfollow",
        help: "unfollow at most given number of users. Only users followed by this script will \
               be unfollowed. The order is from oldest to newest followings. \
               It can be a number (e.g. 100) or a range (e.g. 100-200)",
        default: None,
        metavar: &["100-200"],
        multiple: false,
    },
    MIN_FOLLOWING,
];

static UNFOLLOW_NON_FOLLOWERS_ARGS: [ArgSpec; 2] = [
    ArgSpec {
        name: "unfollow_non_followers",
        help: "unfollow at most given number of users, that don't follow you back. Only users \
               followed by this script will be unfollowed. The order is from oldest to newest \
               followings. It can be a number (e.g. 100) or a range (e.g. 100-200)",
        default: None,
        metavar: &["100-200"],
        multiple: false,
    },
    MIN_FOLLOWING,
];

static UNFOLLOW_ANY_ARGS: [ArgSpec; 2] = [
    ArgSpec {
        name: "unfollow_any",
        help: "unfollow at most given number of users. The order is from oldest to newest \
               followings. It can be a number (e.g. 100) or a range (e.g. 100-200)",
        default: None,
        metavar: &["100-200"],
        multiple: false,
    },
    MIN_FOLLOWING,
];

/// Which followings an unfollow action targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnfollowKind {
    /// Users followed by the bot.
    Followed,
    /// Users followed by the bot who don't follow back.
    NonFollowers,
    /// Any following.
    Any,
}

impl UnfollowKind {
    pub fn id(self) -> &'static str {
        match self {
            UnfollowKind::Followed => "unfollow",
            UnfollowKind::NonFollowers => "unfollow_non_followers",
            UnfollowKind::Any => "unfollow_any",
        }
    }

    fn args(self) -> &'static [ArgSpec] {
        match self {
            UnfollowKind::Followed => &UNFOLLOW_ARGS,
            UnfollowKind::NonFollowers => &UNFOLLOW_NON_FOLLOWERS_ARGS,
            UnfollowKind::Any => &UNFOLLOW_ANY_ARGS,
        }
    }

    fn label(self) -> &'static str {
        match self {
            UnfollowKind::Followed => "Unfollow",
            UnfollowKind::NonFollowers => "Unfollow non followers",
            UnfollowKind::Any => "Unfollow any",
        }
    }
}

/// Unfollow action. Parameters are bound but running it has no effect yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfollowAction {
    kind: UnfollowKind,
    count: u32,
    min_following: u32,
}

impl UnfollowAction {
    pub fn new(kind: UnfollowKind) -> Self {
        Self {
            kind,
            count: 0,
            min_following: 0,
        }
    }

    pub fn kind(&self) -> UnfollowKind {
        self.kind
    }

    /// Maximum number of users to unfollow, sampled once at binding.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn min_following(&self) -> u32 {
        self.min_following
    }
}

impl ActionRunner for UnfollowAction {
    fn id(&self) -> &'static str {
        self.kind.id()
    }

    fn args(&self) -> &'static [ArgSpec] {
        self.kind.args()
    }

    fn is_action_selected(&self, args: &RunArgs) -> bool {
        args.contains(self.kind.id())
    }

    fn set_params(&mut self, args: &RunArgs, rng: &mut dyn RngCore) -> Result<(), ActionError> {
        if let Some(raw) = args.get_one(self.kind.id()) {
            self.count = get_value(raw, self.kind.label(), DEFAULT_UNFOLLOW_COUNT, rng);
        }
        self.min_following = int_arg(args, "min_following", 0, u64::from(u32::MAX))? as u32;
        debug!(
            target: "instabot::actions",
            action = self.kind.id(),
            count = self.count,
            min_following = self.min_following,
            "Unfollow parameters bound"
        );
        Ok(())
    }

    fn run(
        &mut self,
        _ctx: &mut ActionContext<'_>,
        _interactor: &mut dyn Interactor,
        _rng: &mut dyn RngCore,
    ) -> RunReport {
        info!(
            target: "instabot::actions",
            action = self.kind.id(),
            "This action has no implementation yet; nothing to do"
        );
        RunReport::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::DryRunInteractor;
    use crate::executor::testing::{FakeDevice, Harness};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const KINDS: [UnfollowKind; 3] = [
        UnfollowKind::Followed,
        UnfollowKind::NonFollowers,
        UnfollowKind::Any,
    ];

    #[test]
    fn selected_only_by_own_flag() {
        for kind in KINDS {
            let action = UnfollowAction::new(kind);
            assert!(!action.is_action_selected(&RunArgs::new()));
            assert!(action.is_action_selected(&RunArgs::new().with(kind.id(), "10")));
            for other in KINDS.into_iter().filter(|k| *k != kind) {
                assert!(!action.is_action_selected(&RunArgs::new().with(other.id(), "10")));
            }
        }
    }

    #[test]
    fn every_kind_declares_count_and_min_following() {
        for kind in KINDS {
            let names: Vec<&str> = UnfollowAction::new(kind).args().iter().map(|a| a.name).collect();
            assert_eq!(names, [kind.id(), "min_following"]);
        }
    }

    #[test]
    fn count_range_sampled_once() {
        let mut action = UnfollowAction::new(UnfollowKind::Any);
        let args = RunArgs::new()
            .with("unfollow_any", "100-200")
            .with("min_following", "30");
        action
            .set_params(&args, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert!((100..=200).contains(&action.count()));
        assert_eq!(action.min_following(), 30);
    }

    #[test]
    fn malformed_count_uses_default() {
        let mut action = UnfollowAction::new(UnfollowKind::Followed);
        let args = RunArgs::new().with("unfollow", "lots");
        action
            .set_params(&args, &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(action.count(), DEFAULT_UNFOLLOW_COUNT);
        assert_eq!(action.min_following(), 0);
    }

    #[test]
    fn invalid_min_following_is_rejected() {
        let mut action = UnfollowAction::new(UnfollowKind::NonFollowers);
        let args = RunArgs::new()
            .with("unfollow_non_followers", "10")
            .with("min_following", "-5");
        assert!(matches!(
            action.set_params(&args, &mut StdRng::seed_from_u64(9)),
            Err(ActionError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn run_does_nothing() {
        let mut harness = Harness::new(FakeDevice::default());
        let mut action = UnfollowAction::new(UnfollowKind::Followed);
        let mut interactor = DryRunInteractor::new();
        let mut rng = StdRng::seed_from_u64(0);
        let report = harness.with_context(|ctx| action.run(ctx, &mut interactor, &mut rng));
        assert_eq!(report, RunReport::default());
        assert_eq!(interactor.handled(), 0);
        assert!(harness.storage.is_empty());
    }
}
