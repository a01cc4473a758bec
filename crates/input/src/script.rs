//! Scripted input for headless runs.
//!
//! A script is a comma-separated list of steps. Each step is one tick made of
//! `+`-joined items, optionally repeated with `*N`:
//!
//! ```text
//! w*30, w+space, idle*10, look:40:-5, fire, drop, a+s*5
//! ```
//!
//! Items are control names (`w a s d space`), action names
//! (`fire drop pickup use reset`), `look:dx:dy`, or `idle`.

use crate::action::{Action, Control};
use crate::state::FrameInput;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("step {step}: unknown item `{item}`")]
    UnknownItem { step: usize, item: String },
    #[error("step {step}: bad repeat count `{count}`")]
    BadRepeat { step: usize, count: String },
    #[error("step {step}: bad look delta `{item}`, expected look:dx:dy")]
    BadLook { step: usize, item: String },
}

/// A parsed script: steps with their repeat counts, expanded one tick at a
/// time by `frames`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    steps: Vec<(FrameInput, usize)>,
}

impl InputScript {
    /// Number of ticks the script covers, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.steps
            .iter()
            .fold(0usize, |total, (_, repeat)| total.saturating_add(*repeat))
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// One `FrameInput` per tick, in order.
    pub fn frames(&self) -> impl Iterator<Item = &FrameInput> {
        self.steps
            .iter()
            .flat_map(|(frame, repeat)| std::iter::repeat_n(frame, *repeat))
    }
}

/// Parse a script. Repeats are kept as counts, so large `*N` values cost
/// nothing until the frames are walked.
pub fn parse_script(script: &str) -> Result<InputScript, ScriptError> {
    let mut steps = Vec::new();

    for (index, raw) in script.split(',').enumerate() {
        let step = index + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let (body, repeat) = match raw.rsplit_once('*') {
            Some((body, count)) => {
                let count = count.trim();
                let n = count.parse::<usize>().map_err(|_| ScriptError::BadRepeat {
                    step,
                    count: count.to_string(),
                })?;
                (body.trim(), n)
            }
            None => (raw, 1),
        };

        let frame = parse_step(step, body)?;
        if repeat > 0 {
            steps.push((frame, repeat));
        }
    }

    let script = InputScript { steps };
    tracing::debug!(frames = script.len(), "script parsed");
    Ok(script)
}

fn parse_step(step: usize, body: &str) -> Result<FrameInput, ScriptError> {
    let mut frame = FrameInput::idle();

    for item in body.split('+').map(str::trim) {
        if item == "idle" {
            continue;
        }
        if let Some(control) = Control::from_name(item) {
            frame = frame.with_held(control);
        } else if let Some(action) = Action::from_name(item) {
            frame = frame.with_action(action);
        } else if let Some(delta) = item.strip_prefix("look:") {
            let bad = || ScriptError::BadLook {
                step,
                item: item.to_string(),
            };
            let (dx, dy) = delta.split_once(':').ok_or_else(bad)?;
            let dx = dx.trim().parse::<f32>().map_err(|_| bad())?;
            let dy = dy.trim().parse::<f32>().map_err(|_| bad())?;
            frame = frame.with_look(dx, dy);
        } else {
            return Err(ScriptError::UnknownItem {
                step,
                item: item.to_string(),
            });
        }
    }

    Ok(frame)
}
