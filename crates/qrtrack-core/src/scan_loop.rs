//! Turns the analyzer's result stream into a stable overlay.
//!
//! Results arrive one at a time; the analyzer holds the next one back until
//! `set_analyze_image(true)` is called, so the controller never runs concurrently
//! with itself and needs no locking. Every entry point that consumes a result ends
//! in exactly one `set_analyze_image` call.

use std::time::{Duration, Instant};

use qrtrack_config::{Config, ScanMode};
use qrtrack_types::{Decision, Detection, FrameResult, ViewportSize};

use crate::collab::{Analyzer, DisplaySurface, SessionController};
use crate::compose::{OverlayOptions, border_only, compose, compose_snapshot, text_lines};
use crate::geometry::compute_transform;
use crate::payload::describe;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub mode: ScanMode,
    pub throttle_interval: Duration,
    pub text_header: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            mode: ScanMode::Continuous,
            throttle_interval: Duration::from_millis(10),
            text_header: false,
        }
    }
}

impl From<&Config> for ScanSettings {
    fn from(config: &Config) -> Self {
        Self {
            mode: config.scan.mode,
            throttle_interval: Duration::from_millis(config.scan.throttle_interval_ms),
            text_header: config.scan.text_header,
        }
    }
}

/// Continuous-mode bookkeeping. `last_render == None` forces the next render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub last_render: Option<Instant>,
    pub has_visible_detections: bool,
}

impl OverlayState {
    fn is_due(&self, now: Instant, interval: Duration) -> bool {
        match self.last_render {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= interval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleShotPhase {
    WaitingForDetection,
    ShowingConfirmation,
    Terminated,
}

/// What to tell the analyzer once a result has been handled
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnalyzeDirective {
    Resume,
    Pause,
}

pub struct ScanLoopController<A, S, D> {
    analyzer: A,
    session: S,
    surface: D,
    settings: ScanSettings,
    options: OverlayOptions,
    viewport: ViewportSize,
    overlay_state: OverlayState,
    phase: SingleShotPhase,
}

impl<A, S, D> ScanLoopController<A, S, D>
where
    A: Analyzer,
    S: SessionController,
    D: DisplaySurface,
{
    pub fn new(
        analyzer: A,
        session: S,
        surface: D,
        settings: ScanSettings,
        options: OverlayOptions,
    ) -> Self {
        Self {
            analyzer,
            session,
            surface,
            settings,
            options,
            viewport: ViewportSize::default(),
            overlay_state: OverlayState::default(),
            phase: SingleShotPhase::WaitingForDetection,
        }
    }

    /// Record the first measured surface size
    pub fn attach_viewport(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
    }

    /// Configure the session for the current mode and ask for the first frame
    pub fn start(&mut self) {
        let single_shot = self.settings.mode == ScanMode::SingleShot;
        tracing::info!(
            "Starting scan loop: mode={}, throttle={}ms, backdrop={}",
            self.settings.mode,
            self.settings.throttle_interval.as_millis(),
            self.options.show_backdrop
        );

        self.session.set_feedback(single_shot);
        self.session.set_viewfinder_visible(single_shot);
        self.analyzer.set_analyze_image(true);
    }

    /// Handle one analysis cycle; `None` means the analyzer produced nothing
    pub fn on_frame(&mut self, result: Option<FrameResult>) {
        self.on_frame_at(result, Instant::now());
    }

    pub fn on_frame_at(&mut self, result: Option<FrameResult>, now: Instant) {
        let directive = match self.settings.mode {
            ScanMode::Continuous => self.process_continuous(result, now),
            ScanMode::SingleShot => self.process_single_shot(result),
        };

        self.analyzer
            .set_analyze_image(directive == AnalyzeDirective::Resume);
    }

    /// Answer to a pending single-shot confirmation
    pub fn on_decision(&mut self, decision: Decision) {
        if self.phase != SingleShotPhase::ShowingConfirmation {
            tracing::debug!("Ignoring {:?}, no confirmation pending", decision);
            return;
        }

        self.surface.dismiss_confirmation();

        match decision {
            Decision::Confirm => {
                self.phase = SingleShotPhase::WaitingForDetection;
                self.analyzer.set_analyze_image(true);
            }
            Decision::Cancel => {
                tracing::info!("Scan cancelled by user");
                self.phase = SingleShotPhase::Terminated;
                self.analyzer.set_analyze_image(false);
                self.session.release();
            }
        }
    }

    /// Rotation or resize: drop cached handles and start from a clean overlay
    pub fn on_viewport_changed(&mut self, viewport: ViewportSize) {
        tracing::info!(
            "Viewport changed to {}x{}",
            viewport.width,
            viewport.height
        );

        self.session.release();
        self.surface.invalidate();
        self.viewport = viewport;
        self.overlay_state = OverlayState::default();

        if self.settings.mode == ScanMode::Continuous {
            self.clear();
        }
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay_state
    }

    pub fn phase(&self) -> SingleShotPhase {
        self.phase
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == SingleShotPhase::Terminated
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    fn process_continuous(&mut self, result: Option<FrameResult>, now: Instant) -> AnalyzeDirective {
        match result {
            Some(frame) if frame.has_detections() => {
                if !self
                    .overlay_state
                    .is_due(now, self.settings.throttle_interval)
                {
                    tracing::trace!("Render throttled");
                } else if self.render(&frame) {
                    self.overlay_state = OverlayState {
                        last_render: Some(now),
                        has_visible_detections: true,
                    };
                }
            }
            _ => {
                if self.overlay_state.has_visible_detections {
                    tracing::debug!("No codes detected, clearing overlay");
                    self.clear();
                    self.overlay_state.has_visible_detections = false;
                }
            }
        }

        AnalyzeDirective::Resume
    }

    fn process_single_shot(&mut self, result: Option<FrameResult>) -> AnalyzeDirective {
        if self.phase != SingleShotPhase::WaitingForDetection {
            return AnalyzeDirective::Pause;
        }

        let Some(frame) = result.filter(FrameResult::has_detections) else {
            return AnalyzeDirective::Resume;
        };

        let snapshot = compose_snapshot(&frame, &self.options);
        let text = confirmation_text(&frame.detections);

        match self.surface.present_confirmation(snapshot.as_ref(), &text) {
            Ok(()) => {
                tracing::info!("Detected {} code(s), waiting for confirmation", frame.detections.len());
                self.phase = SingleShotPhase::ShowingConfirmation;
                AnalyzeDirective::Pause
            }
            Err(e) => {
                tracing::warn!("Failed to present confirmation: {}", e);
                AnalyzeDirective::Resume
            }
        }
    }

    fn render(&mut self, frame: &FrameResult) -> bool {
        let viewport = self.viewport;
        if !viewport.is_measured() {
            tracing::debug!("Viewport not measured yet, deferring render");
            return false;
        }

        let (source_w, source_h) = frame.source_size();
        let transform = compute_transform(source_w, source_h, viewport.width, viewport.height);
        let overlay = compose(frame, &transform, viewport, &self.options);
        let text = overlay.text_block(self.settings.text_header);

        match self.surface.present(&overlay.image, &text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to present overlay: {}", e);
                false
            }
        }
    }

    fn clear(&mut self) {
        if !self.viewport.is_measured() {
            return;
        }

        let image = border_only(self.viewport, &self.options);
        if let Err(e) = self.surface.present(&image, "") {
            tracing::warn!("Failed to clear overlay: {}", e);
        }
    }
}

/// Full listing for the confirmation dialog, 0-based, with payload details
fn confirmation_text(detections: &[Detection]) -> String {
    let mut buffer = String::new();

    for (line, detection) in text_lines(detections, 0).iter().zip(detections) {
        buffer.push_str(line);
        buffer.push('\n');

        if let Some(details) = describe(detection) {
            for detail in details.lines() {
                buffer.push_str("    ");
                buffer.push_str(detail);
                buffer.push('\n');
            }
        }
    }

    buffer
}
