use crate::geometry::{Extent, SlideGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Forward,
    Backward,
    PagerItem(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Direction reported by the gesture tracker when a drag finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
    None,
}

/// Input from the host, dispatched through `Slider::on_event`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderEvent {
    Click(ClickTarget),
    KeyDown(Key),
    MouseEnter,
    MouseLeave,
    DragDelta(f64),
    DragEnd(SwipeDirection),
    Resize(Extent),
}

/// Direct calls on the public surface, routed through the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SliderCommand {
    GoForward,
    GoBackward,
    GoTo(usize),
    Realign,
    DragBy(f64),
    StartAutoslide,
    StopAutoslide,
    ResetAutoslide,
    Append(SlideGeometry),
    Prepend(SlideGeometry),
    InsertAt(usize, SlideGeometry),
    RemoveAt(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    Event(SliderEvent),
    Command(SliderCommand),
}

impl From<SliderEvent> for ControlMessage {
    fn from(event: SliderEvent) -> Self {
        Self::Event(event)
    }
}

impl From<SliderCommand> for ControlMessage {
    fn from(command: SliderCommand) -> Self {
        Self::Command(command)
    }
}

/// Why an offset was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignReason {
    Index,
    Drag,
}

/// Emitted every time the container transform changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aligned {
    pub index: usize,
    pub offset: f64,
    pub reason: AlignReason,
}
