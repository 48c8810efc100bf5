// PixelViewport
// copyright zipxing@hotmail.com 2022～2025

//! Textual plugin-command surface.
//!
//! Event scripts issue commands as space-separated tokens, e.g.
//! "camera move 3 -2 1.5 60" or "camera lock". The dispatcher owns the
//! command name (configurable, empty disables it), parses the sub-command
//! into a typed CameraCommand and applies it to the controller.
//!
//! A numeric argument with a leading $ reads the numbered game variable
//! instead of a literal, so scripts can compute camera moves at runtime.
//! Malformed commands are dropped with a warning; they never error out of
//! the interpreter loop.

use crate::{
    config::ViewportParams,
    context::{GameVariables, MapContext},
    error::{Result, ViewportError},
    util::PointF32,
    viewport::ViewportController,
};
use log::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum CameraCommand {
    Move {
        offset: PointF32,
        scale: f32,
        duration: u32,
    },
    Bind,
    Unbind,
    Lock,
    Unlock,
}

pub struct CommandDispatcher {
    name: String,
}

impl CommandDispatcher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn from_params(params: &ViewportParams) -> Self {
        Self::new(&params.command_name)
    }

    /// Handle one plugin command. Returns false when the command name is
    /// not ours, so the host can fall through to other handlers. Our own
    /// commands always return true, even when dropped as malformed.
    pub fn dispatch(
        &self,
        vp: &mut ViewportController,
        ctx: &mut MapContext,
        command: &str,
        argv: &[&str],
    ) -> bool {
        if self.name.is_empty() || command != self.name {
            return false;
        }
        match parse(vp.scale(), &ctx.vars, argv) {
            Ok(cmd) => apply(vp, ctx, cmd),
            Err(e) => warn!("{} command dropped: {}", self.name, e),
        }
        true
    }
}

fn apply(vp: &mut ViewportController, ctx: &mut MapContext, cmd: CameraCommand) {
    match cmd {
        CameraCommand::Move {
            offset,
            scale,
            duration,
        } => {
            if !vp.begin_pan_zoom(offset, scale, duration) {
                warn!("move rejected: job in flight or invalid values");
            }
        }
        CameraCommand::Bind => vp.set_bound(true),
        CameraCommand::Unbind => vp.set_bound(false),
        CameraCommand::Lock => match vp.target() {
            Some(id) => vp.lock_to(ctx, id),
            None => warn!("lock dropped: {}", ViewportError::NoTarget),
        },
        CameraCommand::Unlock => vp.unlock(ctx),
    }
}

/// Parse the sub-command tokens. The move shapes are selected by arity:
/// move S | move S D | move X Y D | move X Y S D.
pub fn parse(current_scale: f32, vars: &GameVariables, argv: &[&str]) -> Result<CameraCommand> {
    let sub = argv
        .first()
        .ok_or_else(|| ViewportError::UnknownSubcommand(String::new()))?;
    match *sub {
        "move" => parse_move(current_scale, vars, argv),
        "bind" => Ok(CameraCommand::Bind),
        "unbind" => Ok(CameraCommand::Unbind),
        "lock" => Ok(CameraCommand::Lock),
        "unlock" => Ok(CameraCommand::Unlock),
        other => Err(ViewportError::UnknownSubcommand(other.to_string())),
    }
}

fn parse_move(current_scale: f32, vars: &GameVariables, argv: &[&str]) -> Result<CameraCommand> {
    match argv.len() {
        2 => Ok(CameraCommand::Move {
            offset: PointF32::default(),
            scale: vreal(vars, argv[1])?,
            duration: 1,
        }),
        3 => Ok(CameraCommand::Move {
            offset: PointF32::default(),
            scale: vreal(vars, argv[1])?,
            duration: vuint(vars, argv[2])?,
        }),
        4 => Ok(CameraCommand::Move {
            offset: PointF32::new(vreal(vars, argv[1])?, vreal(vars, argv[2])?),
            scale: current_scale,
            duration: vuint(vars, argv[3])?,
        }),
        5 => Ok(CameraCommand::Move {
            offset: PointF32::new(vreal(vars, argv[1])?, vreal(vars, argv[2])?),
            scale: vreal(vars, argv[3])?,
            duration: vuint(vars, argv[4])?,
        }),
        n => Err(ViewportError::BadArity("move".to_string(), n - 1)),
    }
}

/// Real argument: $n reads game variable n, otherwise a finite literal.
fn vreal(vars: &GameVariables, arg: &str) -> Result<f32> {
    if let Some(id) = arg.strip_prefix('$') {
        let id = id
            .parse::<u32>()
            .map_err(|_| ViewportError::BadNumber(arg.to_string()))?;
        return Ok(vars.get(id) as f32);
    }
    arg.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ViewportError::BadNumber(arg.to_string()))
}

/// Unsigned argument with the same $ indirection; negatives clamp to zero.
fn vuint(vars: &GameVariables, arg: &str) -> Result<u32> {
    let v = if let Some(id) = arg.strip_prefix('$') {
        let id = id
            .parse::<u32>()
            .map_err(|_| ViewportError::BadNumber(arg.to_string()))?;
        vars.get(id)
    } else {
        arg.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ViewportError::BadNumber(arg.to_string()))?
    };
    Ok(v.trunc().clamp(0.0, i32::MAX as f64) as u32)
}
