use std::{any::Any, panic::AssertUnwindSafe, path::PathBuf, time::Duration};

use tokio::time::timeout;

use super::{error::RenderError, render::write_chart};
use crate::readings::ReadingSet;

/// Draws `set` to `path` off the async runtime; returns the PNG size.
pub(super) async fn run_render_task(
    set: ReadingSet,
    path: PathBuf,
    render_timeout_secs: u64,
) -> Result<usize, RenderError> {
    run_bounded(render_timeout_secs, move || write_chart(&set, &path)).await
}

/// Runs `job` on the blocking pool. Panics become `RenderError::Panic` and a
/// job still running after `timeout_secs` is abandoned as `RenderError::Timeout`.
async fn run_bounded<T, F>(timeout_secs: u64, job: F) -> Result<T, RenderError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RenderError> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || {
        std::panic::catch_unwind(AssertUnwindSafe(job))
            .unwrap_or_else(|payload| Err(RenderError::Panic(panic_message(payload.as_ref()))))
    });

    timeout(Duration::from_secs(timeout_secs), handle)
        .await
        .map_err(|_| RenderError::Timeout(timeout_secs))?
        .map_err(|join_error| RenderError::Join(join_error.to_string()))?
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{panic_message, run_bounded};
    use crate::chart::RenderError;

    #[test]
    fn panic_payloads_are_described() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("owned boom")), "owned boom");
        assert_eq!(panic_message(&7u8), "non-string panic payload");
    }

    #[tokio::test]
    async fn job_result_is_passed_through() {
        let bytes = run_bounded(5, || Ok::<usize, RenderError>(42)).await.expect("job result");
        assert_eq!(bytes, 42);

        let error = run_bounded(5, || Err::<usize, _>(RenderError::Backend("draw".to_string())))
            .await
            .expect_err("job error");
        assert!(matches!(error, RenderError::Backend(_)));
    }

    #[tokio::test]
    async fn panicking_job_becomes_a_render_error() {
        let error = run_bounded(5, || -> Result<usize, RenderError> { panic!("renderer exploded") })
            .await
            .expect_err("panic must surface");

        assert!(matches!(&error, RenderError::Panic(message) if message == "renderer exploded"));
        assert_eq!(error.code(), "RENDER_TASK_PANIC");
    }

    #[tokio::test]
    async fn slow_job_times_out() {
        let error = run_bounded(0, || {
            std::thread::sleep(Duration::from_millis(200));
            Ok::<usize, RenderError>(1)
        })
        .await
        .expect_err("must time out");

        assert!(matches!(error, RenderError::Timeout(0)));
    }
}
