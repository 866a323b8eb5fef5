use crate::foundation::error::{PaintError, PaintResult};

/// Execution mode selecting which dispatch handler a painter session routes through.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Commands are executed on the issuing thread at flush.
    #[default]
    Direct,
    /// Commands are handed to band workers over bounded queues at flush.
    Deferred,
}

impl ExecutionMode {
    /// Number of modes; the dispatch table has one slot per mode.
    pub const COUNT: usize = 2;

    /// All modes in table order.
    pub const ALL: [ExecutionMode; Self::COUNT] = [ExecutionMode::Direct, ExecutionMode::Deferred];

    /// Table slot of this mode.
    pub fn index(self) -> usize {
        match self {
            Self::Direct => 0,
            Self::Deferred => 1,
        }
    }

    /// Decode a raw mode selector.
    pub fn from_index(i: usize) -> PaintResult<Self> {
        Self::ALL
            .get(i)
            .copied()
            .ok_or_else(|| PaintError::invalid_argument(format!("unknown execution mode {i}")))
    }

    /// Parse a mode name (`"direct"` / `"deferred"`, case-insensitive).
    pub fn parse(s: &str) -> PaintResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" | "st" => Ok(Self::Direct),
            "deferred" | "mt" => Ok(Self::Deferred),
            other => Err(PaintError::invalid_argument(format!(
                "unknown execution mode '{other}'"
            ))),
        }
    }
}

/// Closed set of operations reachable through the dispatch table.
///
/// Suffixes name the numeric domain: `I` integer, `F` single precision, `D` double precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Op {
    FillAll,
    FillBoxI,
    FillBoxF,
    FillBoxD,
    FillPathF,
    FillPathD,
    StrokePathF,
    StrokePathD,

    BlitImageD,
    BlitNormalizedImageA,
    BlitNormalizedImageI,
    BlitNormalizedImageD,

    FilterBoxI,
    FilterBoxF,
    FilterBoxD,
    FilterPathF,
    FilterPathD,

    SwitchToMask,
    DiscardMask,
    SaveMask,
    RestoreMask,
    MaskFromBoxI,
    MaskFromBoxF,
    MaskFromBoxD,
    MaskFromPathF,
    MaskFromPathD,
    MaskIntersectBoxI,
    MaskIntersectBoxF,
    MaskIntersectBoxD,
    MaskIntersectPathF,
    MaskIntersectPathD,

    SetOpacity,
    SetOpacityAndColor,
    SetOpacityAndPattern,
    SetPaintHints,
    SetClipBox,
    SetClipRegion,
}

impl Op {
    /// `true` for the state-snapshot opcodes emitted by the pending-state resolver.
    pub fn is_state(self) -> bool {
        matches!(
            self,
            Op::SetOpacity
                | Op::SetOpacityAndColor
                | Op::SetOpacityAndPattern
                | Op::SetPaintHints
                | Op::SetClipBox
                | Op::SetClipRegion
        )
    }
}
