//! Display state management
//!
//! Tracks the current snapshot of the simulated match as reported by the
//! monitor session: game time, play mode, team names and score.
//! The event loop is the only writer; the dispatcher and the frontend read it.

use crate::protocol::{MonitorPacket, ShowFrame};

/// Server play modes, indexed the same way as the monitor protocol's `(pm N)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Null,
    BeforeKickOff,
    TimeOver,
    PlayOn,
    KickOffLeft,
    KickOffRight,
    KickInLeft,
    KickInRight,
    FreeKickLeft,
    FreeKickRight,
    CornerKickLeft,
    CornerKickRight,
    GoalKickLeft,
    GoalKickRight,
    AfterGoalLeft,
    AfterGoalRight,
    DropBall,
    OffSideLeft,
    OffSideRight,
    /// Any mode we don't name (penalties, fouls, pause, ...)
    Other(u8),
}

impl PlayMode {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Null,
            1 => Self::BeforeKickOff,
            2 => Self::TimeOver,
            3 => Self::PlayOn,
            4 => Self::KickOffLeft,
            5 => Self::KickOffRight,
            6 => Self::KickInLeft,
            7 => Self::KickInRight,
            8 => Self::FreeKickLeft,
            9 => Self::FreeKickRight,
            10 => Self::CornerKickLeft,
            11 => Self::CornerKickRight,
            12 => Self::GoalKickLeft,
            13 => Self::GoalKickRight,
            14 => Self::AfterGoalLeft,
            15 => Self::AfterGoalRight,
            16 => Self::DropBall,
            17 => Self::OffSideLeft,
            18 => Self::OffSideRight,
            n => Self::Other(n),
        }
    }

    /// Short name used on the status line
    pub fn label(&self) -> String {
        let name = match self {
            Self::Null => "null",
            Self::BeforeKickOff => "before_kick_off",
            Self::TimeOver => "time_over",
            Self::PlayOn => "play_on",
            Self::KickOffLeft => "kick_off_l",
            Self::KickOffRight => "kick_off_r",
            Self::KickInLeft => "kick_in_l",
            Self::KickInRight => "kick_in_r",
            Self::FreeKickLeft => "free_kick_l",
            Self::FreeKickRight => "free_kick_r",
            Self::CornerKickLeft => "corner_kick_l",
            Self::CornerKickRight => "corner_kick_r",
            Self::GoalKickLeft => "goal_kick_l",
            Self::GoalKickRight => "goal_kick_r",
            Self::AfterGoalLeft => "goal_l",
            Self::AfterGoalRight => "goal_r",
            Self::DropBall => "drop_ball",
            Self::OffSideLeft => "offside_l",
            Self::OffSideRight => "offside_r",
            Self::Other(n) => return format!("pm{}", n),
        };
        name.to_string()
    }
}

/// One team's entry on the scoreboard
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeamInfo {
    pub name: Option<String>,
    pub score: u32,
}

/// Snapshot of the match shown by the monitor
#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    /// Simulation cycle of the last show frame
    pub time: u32,

    /// Play mode of the last show frame
    pub playmode: PlayMode,

    pub left: TeamInfo,
    pub right: TeamInfo,

    /// Packets received since the last clear, of any kind
    pub packets: u64,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything; called when a new connection is established
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_time_over(&self) -> bool {
        self.playmode == PlayMode::TimeOver
    }

    /// Fold a received packet into the snapshot
    pub fn apply(&mut self, packet: &MonitorPacket) {
        self.packets += 1;

        if let MonitorPacket::Show(frame) = packet {
            self.apply_show(frame);
        }
    }

    fn apply_show(&mut self, frame: &ShowFrame) {
        self.time = frame.time;
        self.playmode = frame.playmode;

        if let Some((left, right)) = &frame.teams {
            self.left = left.clone();
            self.right = right.clone();
        }
    }

    /// Scoreboard text, e.g. `HELIOS 2 - 1 Cyrus`
    pub fn scoreboard(&self) -> String {
        format!(
            "{} {} - {} {}",
            self.left.name.as_deref().unwrap_or("(none)"),
            self.left.score,
            self.right.score,
            self.right.name.as_deref().unwrap_or("(none)"),
        )
    }
}
