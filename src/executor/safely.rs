use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use anyhow::Result;
use tracing::{error, info, warn};

use super::context::ActionContext;

/// Result of one guarded job attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed,
}

/// Run one job attempt, containing its failure.
///
/// An `Err` or a panic is logged and the device is asked to recover, so the caller's
/// retry loop keeps going. Nothing escapes this boundary.
pub fn run_safely<F>(ctx: &mut ActionContext<'_>, job: F) -> JobOutcome
where
    F: FnOnce(&mut ActionContext<'_>) -> Result<()>,
{
    let failure = match panic::catch_unwind(AssertUnwindSafe(|| job(&mut *ctx))) {
        Ok(Ok(())) => return JobOutcome::Completed,
        Ok(Err(err)) => format!("{err:#}"),
        Err(payload) => format!("panic: {}", panic_message(payload.as_ref())),
    };

    error!(
        target: "instabot::executor",
        device = %ctx.device.id(), error = %failure,
        "Job failed"
    );
    match ctx.device.recover() {
        Ok(()) => info!(target: "instabot::executor", device = %ctx.device.id(), "Device recovered"),
        Err(err) => warn!(
            target: "instabot::executor",
            device = %ctx.device.id(), error = %format!("{err:#}"),
            "Device recovery failed"
        ),
    }
    JobOutcome::Failed
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::{FakeDevice, Harness};
    use anyhow::anyhow;

    #[test]
    fn completed_job_skips_recovery() {
        let mut harness = Harness::new(FakeDevice::default());
        let outcome = harness.with_context(|ctx| run_safely(ctx, |_| Ok(())));
        assert_eq!(outcome, JobOutcome::Completed);
        assert_eq!(harness.device.recoveries, 0);
    }

    #[test]
    fn error_is_contained_and_device_recovered() {
        let mut harness = Harness::new(FakeDevice::default());
        let outcome =
            harness.with_context(|ctx| run_safely(ctx, |_| Err(anyhow!("element not found"))));
        assert_eq!(outcome, JobOutcome::Failed);
        assert_eq!(harness.device.recoveries, 1);
    }

    #[test]
    fn panic_is_contained() {
        let mut harness = Harness::new(FakeDevice::default());
        let outcome = harness.with_context(|ctx| run_safely(ctx, |_| panic!("ui went away")));
        assert_eq!(outcome, JobOutcome::Failed);
        assert_eq!(harness.device.recoveries, 1);
    }

    #[test]
    fn failed_recovery_still_reports_failure() {
        let mut harness = Harness::new(FakeDevice {
            fail_recover: true,
            ..FakeDevice::default()
        });
        let outcome = harness.with_context(|ctx| run_safely(ctx, |_| Err(anyhow!("boom"))));
        assert_eq!(outcome, JobOutcome::Failed);
        assert_eq!(harness.device.recoveries, 1);
    }
}
