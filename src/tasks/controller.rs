use std::time::Duration;

use tokio::select;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::SliderError;
use crate::events::{Aligned, ControlMessage, SliderCommand, SliderEvent};
use crate::geometry::Extent;
use crate::slider::{Effect, Slider};
use crate::surface::Surface;
use crate::tasks::autoslide::AutoslideTimer;

/// Turns slider effects into timer tasks and `Aligned` notifications.
struct EffectSink {
    aligned: Sender<Aligned>,
    aligned_open: bool,
    ticks: Sender<u64>,
    timer: Option<AutoslideTimer>,
    cancel: CancellationToken,
}

impl EffectSink {
    async fn flush<S: Surface>(&mut self, slider: &mut Slider<S>) {
        for effect in slider.drain_effects() {
            match effect {
                Effect::Aligned(aligned) if self.aligned_open => {
                    select! {
                        biased;
                        _ = self.cancel.cancelled() => {
                            debug!("cancelled while publishing; dropping alignment");
                            self.aligned_open = false;
                        }
                        sent = self.aligned.send(aligned) => {
                            if sent.is_err() {
                                debug!("aligned receiver closed; no longer publishing");
                                self.aligned_open = false;
                            }
                        }
                    }
                }
                Effect::Aligned(_) => {}
                Effect::TimerStarted { generation, every } => {
                    // Replacing a handle drops, and so cancels, the previous timer.
                    self.timer = Some(AutoslideTimer::spawn(
                        generation,
                        every,
                        self.ticks.clone(),
                        &self.cancel,
                    ));
                }
                // Effects coalesce, so the stopped generation may be newer
                // than the running task. Either way nothing should tick now.
                Effect::TimerStopped { generation } => {
                    if let Some(timer) = self.timer.take() {
                        debug!(running = timer.generation(), generation, "stopping autoslide timer");
                        timer.shutdown().await;
                    }
                }
            }
        }
    }
}

fn apply_command<S: Surface>(
    slider: &mut Slider<S>,
    command: SliderCommand,
) -> Result<(), SliderError> {
    match command {
        SliderCommand::GoForward => slider.go_forward(),
        SliderCommand::GoBackward => slider.go_backward(),
        SliderCommand::GoTo(index) => slider.go_to(index)?,
        SliderCommand::Realign => slider.realign(),
        SliderCommand::DragBy(delta) => slider.drag_by(delta),
        SliderCommand::StartAutoslide => slider.start_autoslide(),
        SliderCommand::StopAutoslide => slider.stop_autoslide(),
        SliderCommand::ResetAutoslide => slider.reset_autoslide(),
        SliderCommand::Append(slide) => slider.append(slide),
        SliderCommand::Prepend(slide) => slider.prepend(slide),
        SliderCommand::InsertAt(index, slide) => slider.insert_at(index, slide)?,
        SliderCommand::RemoveAt(index) => slider.remove_at(index)?,
    }
    Ok(())
}

/// Drives a slider from `inbox` until cancelled or the inbox closes.
///
/// Rules:
/// - Messages are handled one at a time, each to completion.
/// - Resize events are coalesced and applied once `resize_debounce` has
///   passed without another resize.
/// - Timer ticks are matched against the slider's current generation, so a
///   tick queued before a stop never advances the show.
/// - Rejected commands and invalid resizes are logged and do not stop the
///   loop.
/// - Publishing an alignment never blocks cancellation.
///
/// On exit the autoslide timer is released and the slider is handed back.
pub async fn run<S: Surface>(
    mut slider: Slider<S>,
    mut inbox: Receiver<ControlMessage>,
    aligned: Sender<Aligned>,
    cancel: CancellationToken,
    resize_debounce: Duration,
) -> Slider<S> {
    let (tick_tx, mut tick_rx) = mpsc::channel::<u64>(8);
    let mut sink = EffectSink {
        aligned,
        aligned_open: true,
        ticks: tick_tx,
        timer: None,
        cancel: cancel.child_token(),
    };
    let mut pending_resize: Option<(Extent, Instant)> = None;

    sink.flush(&mut slider).await;
    info!(slides = slider.len(), align = %slider.alignment(), "slider controller running");

    loop {
        let resize_at = pending_resize.map(|(_, at)| at);
        select! {
            biased;
            _ = cancel.cancelled() => break,

            maybe_msg = inbox.recv() => {
                match maybe_msg {
                    Some(ControlMessage::Event(SliderEvent::Resize(extent))) if !extent.is_valid() => {
                        warn!(width = extent.width, height = extent.height, "ignoring invalid resize");
                    }
                    Some(ControlMessage::Event(SliderEvent::Resize(extent))) => {
                        debug!(width = extent.width, height = extent.height, "resize pending");
                        pending_resize = Some((extent, Instant::now() + resize_debounce));
                    }
                    Some(ControlMessage::Event(event)) => {
                        if let Err(err) = slider.on_event(event) {
                            warn!(?event, "slider event rejected: {err}");
                        }
                    }
                    Some(ControlMessage::Command(command)) => {
                        if let Err(err) = apply_command(&mut slider, command.clone()) {
                            warn!(?command, "slider command rejected: {err}");
                        }
                    }
                    None => {
                        debug!("controller inbox closed");
                        break;
                    }
                }
            }

            Some(generation) = tick_rx.recv() => {
                slider.on_tick(generation);
            }

            _ = sleep_until(resize_at.unwrap_or_else(Instant::now)), if resize_at.is_some() => {
                if let Some((extent, _)) = pending_resize.take() {
                    if let Err(err) = slider.resize(extent) {
                        warn!("resize rejected: {err}");
                    }
                }
            }
        }

        sink.flush(&mut slider).await;
    }

    slider.teardown();
    sink.flush(&mut slider).await;
    info!(active = slider.active_index(), "slider controller stopped");
    slider
}
