//! raster-paint is the command-recording core of a software 2D paint engine.
//!
//! A [`RasterEngine`] session records drawing operations (fills, strokes, blits, filters, clips
//! and masks) as immutable [`Command`] records and executes them against an [`Image`] at flush:
//!
//! - Paint state changes are tracked lazily as [`PendingFlags`] and captured into state records
//!   only when an operation needs them.
//! - Every operation is routed through a per-mode [`PaintOps`] handler picked once per session.
//!   The deferred handler supports the fill family only; other operations report
//!   [`PaintError::NotImplemented`].
//! - Sequences execute either on the calling thread ([`CpuBackend`]) or across band workers
//!   ([`DeferredExecutor`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod dispatch;
mod engine;
mod foundation;
mod paint;
mod render;

pub use crate::foundation::core::{
    Affine, BezPath, BoxD, BoxF, BoxI, PathElF, PathF, Point, PointF, PointI, Rect, RectI,
    Rgba8Premul,
};
pub use crate::foundation::error::{PaintError, PaintResult};
pub use crate::foundation::image::Image;

pub use crate::paint::context::{ClipState, EngineContext, Region};
pub use crate::paint::hints::{
    CompositeOp, FillRule, ImageQuality, LineCap, LineJoin, PaintHints, RenderQuality,
    StrokeParams,
};
pub use crate::paint::mask::{MaskLayer, MaskShape, MaskStack};
pub use crate::paint::pending::PendingFlags;
pub use crate::paint::source::{GradientStop, PatternSpec, RasterPattern, Source};

pub use crate::command::arena::{ArenaLimits, ArenaStats, CmdId, CommandArena};
pub use crate::command::record::{
    BlitCmd, Command, DomainBox, DomainPath, FillCmd, Filter, FilterCmd, ImageBlit, MaskCmd,
    PathGeom, StateCmd,
};

pub use crate::dispatch::deferred::DeferredOps;
pub use crate::dispatch::direct::DirectOps;
pub use crate::dispatch::op::{ExecutionMode, Op};
pub use crate::dispatch::ops::{EngineCore, PaintOps};
pub use crate::dispatch::table::{
    DispatchTable, init as init_dispatch, is_initialized as dispatch_initialized,
    table as dispatch_table,
};

pub use crate::render::backend::{CommandBackend, execute_commands};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::deferred::DeferredExecutor;

pub use crate::engine::opts::{ENV_MODE, ENV_THREADS, EngineOpts};
pub use crate::engine::session::RasterEngine;
