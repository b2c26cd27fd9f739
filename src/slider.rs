//! The carousel state machine.
//!
//! A [`Slider`] owns the slide list, the active index, the current offset and
//! the autoslide bookkeeping. Every index-based transition recomputes the
//! offset from scratch, applies it through the [`Surface`], refreshes the
//! pager and records an [`Effect`] for whoever drives the slider. Pending
//! effects coalesce: only the newest alignment and the net timer change are
//! kept until the driver drains them.
//!
//! The slider never sleeps or spawns anything itself. Starting and stopping
//! the timer only flips [`TimerToken`] state and queues `TimerStarted` /
//! `TimerStopped` effects; the driver turns those into real timers and feeds
//! ticks back through [`Slider::on_tick`] tagged with their generation.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::SliderSettings;
use crate::error::{ConfigError, SliderError};
use crate::events::{AlignReason, Aligned, ClickTarget, Key, SliderEvent, SwipeDirection};
use crate::geometry::{Alignment, Extent, SlideGeometry, compute_offset};
use crate::pager::Pager;
use crate::surface::{Surface, Translate};

pub type AlignHook = Box<dyn FnMut(usize, &SlideGeometry) + Send>;

/// Witness of a running autoslide timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    pub generation: u64,
}

/// Side effects produced by transitions, drained by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Aligned(Aligned),
    TimerStarted { generation: u64, every: Duration },
    TimerStopped { generation: u64 },
}

#[derive(Debug, Default)]
struct Outbox {
    timer: Option<Effect>,
    aligned: Option<Aligned>,
}

impl Outbox {
    fn push(&mut self, effect: Effect) {
        match effect {
            Effect::Aligned(aligned) => self.aligned = Some(aligned),
            timer => self.timer = Some(timer),
        }
    }

    fn drain(&mut self) -> Vec<Effect> {
        self.timer
            .take()
            .into_iter()
            .chain(self.aligned.take().map(Effect::Aligned))
            .collect()
    }
}

pub struct Slider<S> {
    slides: Vec<SlideGeometry>,
    alignment: Alignment,
    container: Extent,
    cycle: bool,
    autoslide: Option<Duration>,
    keyboard_events: bool,
    has_forward: bool,
    has_backward: bool,
    pager: Option<Pager>,
    active: usize,
    offset: f64,
    timer: Option<TimerToken>,
    generation: u64,
    surface: S,
    before_align: Option<AlignHook>,
    after_align: Option<AlignHook>,
    effects: Outbox,
}

impl<S: Surface> Slider<S> {
    /// Builds the slider, applies the initial offset and starts the timer when
    /// an autoslide interval is configured.
    pub fn new(settings: SliderSettings, surface: S) -> Result<Self, ConfigError> {
        Self::with_hooks(settings, surface, None, None)
    }

    pub fn with_hooks(
        settings: SliderSettings,
        surface: S,
        before_align: Option<AlignHook>,
        after_align: Option<AlignHook>,
    ) -> Result<Self, ConfigError> {
        if settings.slides.is_empty() {
            return Err(ConfigError::MissingSlides);
        }
        if settings.autoslide.is_some_and(|every| every.is_zero()) {
            return Err(ConfigError::ZeroAutoslide);
        }

        let pager = Pager::from_config(&settings.pager, settings.slides.len());
        let mut slider = Self {
            slides: settings.slides,
            alignment: settings.alignment,
            container: settings.container,
            cycle: settings.cycle,
            autoslide: settings.autoslide,
            keyboard_events: settings.keyboard_events,
            has_forward: settings.buttons.forward.is_some(),
            has_backward: settings.buttons.backward.is_some(),
            pager,
            active: 0,
            offset: 0.0,
            timer: None,
            generation: 0,
            surface,
            before_align,
            after_align,
            effects: Outbox::default(),
        };
        debug!(
            slides = slider.slides.len(),
            align = %slider.alignment,
            cycle = slider.cycle,
            autoslide_ms = slider.autoslide.map(|d| d.as_millis() as u64),
            "slider ready"
        );

        slider.start_autoslide();
        slider.realign();
        Ok(slider)
    }

    pub fn go_forward(&mut self) {
        if self.active + 1 < self.slides.len() {
            self.active += 1;
        } else if self.cycle {
            self.active = 0;
        }
        self.realign();
    }

    pub fn go_backward(&mut self) {
        if self.active > 0 {
            self.active -= 1;
        } else if self.cycle {
            self.active = self.slides.len() - 1;
        }
        self.realign();
    }

    /// Jumps to slide `index`; out-of-range requests leave the state untouched.
    pub fn go_to(&mut self, index: usize) -> Result<(), SliderError> {
        if index >= self.slides.len() {
            return Err(SliderError::IndexOutOfRange {
                index,
                len: self.slides.len(),
            });
        }
        self.active = index;
        self.realign();
        Ok(())
    }

    /// Recomputes the offset for the active slide and applies it.
    pub fn realign(&mut self) {
        let index = self.active;
        let slide = self.slides[index];
        if let Some(hook) = self.before_align.as_mut() {
            hook(index, &slide);
        }

        self.offset = self.offset_for(index);
        self.surface
            .apply(Translate::along(self.alignment.axis, self.offset));
        if let Some(pager) = self.pager.as_mut() {
            pager.highlight(index);
            self.surface.render_pager(pager);
        }

        if let Some(hook) = self.after_align.as_mut() {
            hook(index, &slide);
        }
        trace!(index, offset = self.offset, "aligned to active slide");
        self.effects.push(Effect::Aligned(Aligned {
            index,
            offset: self.offset,
            reason: AlignReason::Index,
        }));
    }

    /// Offset that would align slide `index` under the current geometry.
    pub fn offset_for(&self, index: usize) -> f64 {
        compute_offset(&self.slides, self.alignment, self.container, index)
    }

    /// Shifts the container by `delta` without touching the active index.
    pub fn drag_by(&mut self, delta: f64) {
        self.offset += delta;
        self.surface
            .apply(Translate::along(self.alignment.axis, self.offset));
        self.effects.push(Effect::Aligned(Aligned {
            index: self.active,
            offset: self.offset,
            reason: AlignReason::Drag,
        }));
    }

    pub fn append(&mut self, slide: SlideGeometry) {
        let len = self.slides.len();
        self.insert(len, slide);
    }

    pub fn prepend(&mut self, slide: SlideGeometry) {
        self.insert(0, slide);
    }

    /// Inserts before position `index`; `index == len` appends.
    pub fn insert_at(&mut self, index: usize, slide: SlideGeometry) -> Result<(), SliderError> {
        if index > self.slides.len() {
            return Err(SliderError::IndexOutOfRange {
                index,
                len: self.slides.len(),
            });
        }
        self.insert(index, slide);
        Ok(())
    }

    fn insert(&mut self, index: usize, slide: SlideGeometry) {
        self.slides.insert(index, slide);
        if index <= self.active {
            self.active += 1;
        }
        debug!(index, len = self.slides.len(), active = self.active, "slide inserted");
        self.rebuild_pager();
        self.realign();
    }

    /// Removes slide `index`. When the active slide goes, the next one takes
    /// its place; past the end it wraps to the first (or stays on the last
    /// when cycling is off).
    pub fn remove_at(&mut self, index: usize) -> Result<(), SliderError> {
        let len = self.slides.len();
        if index >= len {
            return Err(SliderError::IndexOutOfRange { index, len });
        }
        if len == 1 {
            return Err(SliderError::LastSlide);
        }

        self.slides.remove(index);
        let len = len - 1;
        if index < self.active {
            self.active -= 1;
        } else if self.active >= len {
            self.active = if self.cycle { 0 } else { len - 1 };
        }
        debug!(index, len, active = self.active, "slide removed");
        self.rebuild_pager();
        self.realign();
        Ok(())
    }

    /// Starts the timer unless one is already running or no interval is configured.
    pub fn start_autoslide(&mut self) {
        let Some(every) = self.autoslide else {
            trace!("autoslide not configured; ignoring start");
            return;
        };
        if self.timer.is_some() {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        self.timer = Some(TimerToken { generation });
        debug!(generation, every_ms = every.as_millis() as u64, "autoslide started");
        self.effects.push(Effect::TimerStarted { generation, every });
    }

    pub fn stop_autoslide(&mut self) {
        if let Some(TimerToken { generation }) = self.timer.take() {
            debug!(generation, "autoslide stopped");
            self.effects.push(Effect::TimerStopped { generation });
        }
    }

    /// Pushes the next automatic advance a full interval into the future.
    pub fn reset_autoslide(&mut self) {
        self.stop_autoslide();
        self.start_autoslide();
    }

    /// Handles a timer tick. Ticks from a cancelled timer are ignored.
    pub fn on_tick(&mut self, generation: u64) -> bool {
        match self.timer {
            Some(token) if token.generation == generation => {
                self.go_forward();
                true
            }
            _ => {
                trace!(generation, "dropping stale autoslide tick");
                false
            }
        }
    }

    pub fn on_event(&mut self, event: SliderEvent) -> Result<(), SliderError> {
        match event {
            SliderEvent::Click(ClickTarget::Forward) if self.has_forward => {
                self.go_forward();
                self.reset_autoslide();
            }
            SliderEvent::Click(ClickTarget::Backward) if self.has_backward => {
                self.go_backward();
                self.reset_autoslide();
            }
            SliderEvent::Click(ClickTarget::PagerItem(index)) if self.pager.is_some() => {
                self.go_to(index)?;
                self.reset_autoslide();
            }
            SliderEvent::Click(target) => {
                trace!(?target, "click on unconfigured control");
            }
            SliderEvent::KeyDown(key) if self.keyboard_events => match key {
                Key::ArrowLeft => {
                    self.go_backward();
                    self.reset_autoslide();
                }
                Key::ArrowRight => {
                    self.go_forward();
                    self.reset_autoslide();
                }
                Key::Other => {}
            },
            SliderEvent::KeyDown(_) => {}
            SliderEvent::MouseEnter => self.stop_autoslide(),
            SliderEvent::MouseLeave => self.start_autoslide(),
            SliderEvent::DragDelta(delta) => self.drag_by(delta),
            SliderEvent::DragEnd(direction) => {
                match direction {
                    SwipeDirection::Left | SwipeDirection::Up => self.go_forward(),
                    SwipeDirection::Right | SwipeDirection::Down => self.go_backward(),
                    SwipeDirection::None => self.realign(),
                }
                self.reset_autoslide();
            }
            SliderEvent::Resize(extent) => self.resize(extent)?,
        }
        Ok(())
    }

    /// Adopts a new container size and realigns the active slide against it.
    pub fn resize(&mut self, container: Extent) -> Result<(), SliderError> {
        if !container.is_valid() {
            return Err(SliderError::InvalidContainer {
                width: container.width,
                height: container.height,
            });
        }
        self.container = container;
        self.realign();
        Ok(())
    }

    /// Releases the timer. The slider stays usable for manual navigation.
    pub fn teardown(&mut self) {
        self.stop_autoslide();
    }

    /// Hands over pending effects: the net timer change first, then the
    /// latest alignment.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.effects.drain()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[SlideGeometry] {
        &self.slides
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn container(&self) -> Extent {
        self.container
    }

    pub fn is_autoslide_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<TimerToken> {
        self.timer
    }

    pub fn pager(&self) -> Option<&Pager> {
        self.pager.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn rebuild_pager(&mut self) {
        if let Some(pager) = self.pager.as_mut() {
            pager.rebuild(self.slides.len());
        }
    }
}

impl<S> std::fmt::Debug for Slider<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("slides", &self.slides.len())
            .field("alignment", &self.alignment)
            .field("active", &self.active)
            .field("offset", &self.offset)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}
