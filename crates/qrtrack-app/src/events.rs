use kanal::AsyncReceiver;
use qrtrack_core::{Analyzer, DisplaySurface, ScanLoopController, SessionController, SingleShotPhase};
use qrtrack_types::{Decision, ScanEvent};
use tokio_util::sync::CancellationToken;

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub frames: u64,
    pub detections: u64,
    pub failures: u64,
    pub viewport_changes: u64,
}

/// The scan loop's only consumer: one event at a time, in arrival order
pub async fn event_loop<A, S, D>(
    controller: &mut ScanLoopController<A, S, D>,
    event_rx: AsyncReceiver<ScanEvent>,
    cancel: CancellationToken,
    auto_confirm: bool,
) -> anyhow::Result<ScanSummary>
where
    A: Analyzer,
    S: SessionController,
    D: DisplaySurface,
{
    let mut summary = ScanSummary::default();
    let mut exhausted = false;
    // a Cancel that arrived while nothing was pending, applied to the next confirmation
    let mut cancel_requested = false;

    controller.start();

    loop {
        if controller.is_terminated() {
            tracing::info!("Scan session terminated");
            break;
        }
        if exhausted && controller.phase() != SingleShotPhase::ShowingConfirmation {
            break;
        }

        let event = tokio::select! {
            event = event_rx.recv() => event?,
            _ = cancel.cancelled() => {
                tracing::info!("Event loop cancelled");
                break;
            }
        };

        match event {
            ScanEvent::Frame(result) => {
                summary.frames += 1;
                summary.detections += result.detections.len() as u64;
                tracing::debug!(
                    "[SCAN] frame {} with {} detection(s)",
                    summary.frames,
                    result.detections.len()
                );
                controller.on_frame(Some(result));
            }
            ScanEvent::AnalysisFailed => {
                summary.failures += 1;
                controller.on_frame(None);
            }
            ScanEvent::ViewportChanged(viewport) => {
                summary.viewport_changes += 1;
                controller.on_viewport_changed(viewport);
            }
            ScanEvent::Decision(Decision::Cancel)
                if controller.phase() == SingleShotPhase::WaitingForDetection =>
            {
                tracing::debug!("Cancel with no confirmation pending, deferring");
                cancel_requested = true;
            }
            ScanEvent::Decision(decision) => {
                controller.on_decision(decision);
            }
            ScanEvent::SourceExhausted => {
                exhausted = true;
            }
        }

        if controller.phase() == SingleShotPhase::ShowingConfirmation {
            if cancel_requested {
                controller.on_decision(Decision::Cancel);
            } else if auto_confirm {
                controller.on_decision(Decision::Confirm);
            }
        }
    }

    Ok(summary)
}
