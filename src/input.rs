//! Line-oriented text commands, one message per line.
//!
//! ```text
//! fw | bk | goto 2 | realign | drag -40 | release left
//! key right | click fw | click 3 | enter | leave | resize 800 600
//! start | stop | reset | append 100 80 | prepend 100 80
//! insert 1 100 80 | remove 0
//! ```

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::events::{ClickTarget, ControlMessage, Key, SliderCommand, SliderEvent, SwipeDirection};
use crate::geometry::{Extent, SlideGeometry};

/// Parses one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ControlMessage>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let msg: ControlMessage = match (verb, args.as_slice()) {
        ("fw" | "forward", []) => SliderCommand::GoForward.into(),
        ("bk" | "back" | "backward", []) => SliderCommand::GoBackward.into(),
        ("goto", [index]) => SliderCommand::GoTo(parse_index(index)?).into(),
        ("realign", []) => SliderCommand::Realign.into(),
        ("drag", [delta]) => SliderEvent::DragDelta(parse_px(delta)?).into(),
        ("release", [dir]) => SliderEvent::DragEnd(parse_direction(dir)?).into(),
        ("key", [key]) => SliderEvent::KeyDown(match *key {
            "left" => Key::ArrowLeft,
            "right" => Key::ArrowRight,
            _ => Key::Other,
        })
        .into(),
        ("click", [target]) => SliderEvent::Click(match *target {
            "fw" | "forward" => ClickTarget::Forward,
            "bk" | "backward" => ClickTarget::Backward,
            other => ClickTarget::PagerItem(parse_index(other)?),
        })
        .into(),
        ("enter", []) => SliderEvent::MouseEnter.into(),
        ("leave", []) => SliderEvent::MouseLeave.into(),
        ("resize", [w, h]) => SliderEvent::Resize(parse_extent(w, h)?).into(),
        ("start", []) => SliderCommand::StartAutoslide.into(),
        ("stop", []) => SliderCommand::StopAutoslide.into(),
        ("reset", []) => SliderCommand::ResetAutoslide.into(),
        ("append", [w, h]) => SliderCommand::Append(parse_slide(w, h)?).into(),
        ("prepend", [w, h]) => SliderCommand::Prepend(parse_slide(w, h)?).into(),
        ("insert", [index, w, h]) => {
            SliderCommand::InsertAt(parse_index(index)?, parse_slide(w, h)?).into()
        }
        ("remove", [index]) => SliderCommand::RemoveAt(parse_index(index)?).into(),
        _ => bail!("unrecognized command '{line}'"),
    };
    Ok(Some(msg))
}

fn parse_index(raw: &str) -> Result<usize> {
    raw.parse()
        .with_context(|| format!("'{raw}' is not a slide index"))
}

fn parse_px(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim_end_matches("px")
        .parse()
        .with_context(|| format!("'{raw}' is not a pixel value"))?;
    if !value.is_finite() {
        bail!("'{raw}' is not a finite pixel value");
    }
    Ok(value)
}

fn parse_extent(w: &str, h: &str) -> Result<Extent> {
    let extent = Extent::new(parse_px(w)?, parse_px(h)?);
    if !extent.is_valid() {
        bail!("container dimensions must not be negative");
    }
    Ok(extent)
}

fn parse_slide(w: &str, h: &str) -> Result<SlideGeometry> {
    let slide = SlideGeometry::new(parse_px(w)?, parse_px(h)?);
    if slide.width < 0.0 || slide.height < 0.0 {
        bail!("slide dimensions must not be negative");
    }
    Ok(slide)
}

fn parse_direction(raw: &str) -> Result<SwipeDirection> {
    Ok(match raw {
        "left" => SwipeDirection::Left,
        "right" => SwipeDirection::Right,
        "up" => SwipeDirection::Up,
        "down" => SwipeDirection::Down,
        "none" => SwipeDirection::None,
        other => bail!("unknown swipe direction '{other}'"),
    })
}

/// Blocking loop that parses `reader` line by line into `inbox`.
///
/// Meant for a dedicated OS thread: a blocked read then never holds up
/// runtime shutdown. End of input cancels `cancel`; a closed inbox or an
/// already cancelled token ends the loop quietly.
pub fn forward_lines(
    reader: impl BufRead,
    inbox: &Sender<ControlMessage>,
    cancel: &CancellationToken,
) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("failed to read input: {err}");
                break;
            }
        };
        if cancel.is_cancelled() {
            return;
        }
        match parse_line(&line) {
            Ok(Some(msg)) => {
                if inbox.blocking_send(msg).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(err) => warn!("{err:#}"),
        }
    }
    info!("input closed; initiating shutdown");
    cancel.cancel();
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn parses_navigation_and_events() {
        assert_eq!(
            parse_line("fw").unwrap(),
            Some(ControlMessage::Command(SliderCommand::GoForward))
        );
        assert_eq!(
            parse_line("  goto 3 ").unwrap(),
            Some(ControlMessage::Command(SliderCommand::GoTo(3)))
        );
        assert_eq!(
            parse_line("drag -12.5px").unwrap(),
            Some(ControlMessage::Event(SliderEvent::DragDelta(-12.5)))
        );
        assert_eq!(
            parse_line("click 2").unwrap(),
            Some(ControlMessage::Event(SliderEvent::Click(ClickTarget::PagerItem(2))))
        );
        assert_eq!(
            parse_line("release up").unwrap(),
            Some(ControlMessage::Event(SliderEvent::DragEnd(SwipeDirection::Up)))
        );
    }

    #[test]
    fn parses_list_mutations() {
        assert_eq!(
            parse_line("insert 1 120 80").unwrap(),
            Some(ControlMessage::Command(SliderCommand::InsertAt(
                1,
                SlideGeometry::new(120.0, 80.0)
            )))
        );
        assert_eq!(
            parse_line("remove 0").unwrap(),
            Some(ControlMessage::Command(SliderCommand::RemoveAt(0)))
        );
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # note").unwrap(), None);
    }

    #[test]
    fn malformed_lines_are_errors() {
        assert!(parse_line("goto").is_err());
        assert!(parse_line("goto -1").is_err());
        assert!(parse_line("resize wide 10").is_err());
        assert!(parse_line("resize -5 10").is_err());
        assert!(parse_line("resize 800 inf").is_err());
        assert!(parse_line("append -5 10").is_err());
        assert!(parse_line("release sideways").is_err());
        assert!(parse_line("launch").is_err());
    }

    #[test]
    fn forwarded_lines_reach_the_inbox_and_eof_cancels() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        forward_lines(Cursor::new("fw\nlaunch\n\ngoto 1\n"), &tx, &cancel);

        assert_eq!(
            rx.try_recv().unwrap(),
            ControlMessage::Command(SliderCommand::GoForward)
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ControlMessage::Command(SliderCommand::GoTo(1))
        );
        assert!(rx.try_recv().is_err());
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn cancelled_reader_stops_forwarding() {
        let (tx, mut rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        cancel.cancel();
        forward_lines(Cursor::new("fw\nbk\n"), &tx, &cancel);
        assert!(rx.try_recv().is_err());
    }
}
