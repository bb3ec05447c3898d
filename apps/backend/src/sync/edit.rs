//! Single-row edit buffers.

use std::fmt;
use std::str::FromStr;

use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::player_stats::PlayerStat;
use crate::repos::scores::Score;
use crate::store::Record;
use crate::sync::parse::parse_points;

/// A record with integer columns that can be edited in place.
pub trait Editable: Record {
    type Field: Copy + fmt::Debug + Send + Sync;

    fn get(&self, field: Self::Field) -> i32;
    fn set(&mut self, field: Self::Field, value: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    Tsim,
    Jason,
    Wai,
    MumSoup,
}

impl ScoreField {
    pub const ALL: [ScoreField; 4] = [Self::Tsim, Self::Jason, Self::Wai, Self::MumSoup];

    /// Column heading, also the player name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Tsim => "Tsim",
            Self::Jason => "Jason",
            Self::Wai => "Wai",
            Self::MumSoup => "MumSoup",
        }
    }
}

impl FromStr for ScoreField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "tsim" => Ok(Self::Tsim),
            "jason" => Ok(Self::Jason),
            "wai" => Ok(Self::Wai),
            "mumsoup" => Ok(Self::MumSoup),
            _ => Err(DomainError::validation(format!(
                "unknown score field '{s}' (expected tsim, jason, wai or mumSoup)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    WinByOthers,
    SelfDrawn,
    PaidOut,
    SpecialBonus,
}

impl StatField {
    pub const ALL: [StatField; 4] = [
        Self::WinByOthers,
        Self::SelfDrawn,
        Self::PaidOut,
        Self::SpecialBonus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::WinByOthers => "食胡",
            Self::SelfDrawn => "自摸",
            Self::PaidOut => "出統",
            Self::SpecialBonus => "特別賞罰",
        }
    }
}

impl FromStr for StatField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "winbyothers" => Some(Self::WinByOthers),
            "selfdrawn" => Some(Self::SelfDrawn),
            "paidout" => Some(Self::PaidOut),
            "specialbonus" => Some(Self::SpecialBonus),
            _ => None,
        };
        field
            .or_else(|| Self::ALL.into_iter().find(|f| f.label() == s))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "unknown stat field '{s}' (expected winByOthers, selfDrawn, paidOut or specialBonus)"
                ))
            })
    }
}

impl Editable for Score {
    type Field = ScoreField;

    fn get(&self, field: ScoreField) -> i32 {
        match field {
            ScoreField::Tsim => self.tsim,
            ScoreField::Jason => self.jason,
            ScoreField::Wai => self.wai,
            ScoreField::MumSoup => self.mum_soup,
        }
    }

    fn set(&mut self, field: ScoreField, value: i32) {
        match field {
            ScoreField::Tsim => self.tsim = value,
            ScoreField::Jason => self.jason = value,
            ScoreField::Wai => self.wai = value,
            ScoreField::MumSoup => self.mum_soup = value,
        }
    }
}

impl Editable for PlayerStat {
    type Field = StatField;

    fn get(&self, field: StatField) -> i32 {
        match field {
            StatField::WinByOthers => self.win_by_others,
            StatField::SelfDrawn => self.self_drawn,
            StatField::PaidOut => self.paid_out,
            StatField::SpecialBonus => self.special_bonus,
        }
    }

    fn set(&mut self, field: StatField, value: i32) {
        match field {
            StatField::WinByOthers => self.win_by_others = value,
            StatField::SelfDrawn => self.self_drawn = value,
            StatField::PaidOut => self.paid_out = value,
            StatField::SpecialBonus => self.special_bonus = value,
        }
    }
}

/// At most one uncommitted working copy per table.
#[derive(Debug, Clone, PartialEq)]
pub enum EditState<R> {
    Idle,
    Editing { id: i64, buffer: R },
}

impl<R> Default for EditState<R> {
    fn default() -> Self {
        EditState::Idle
    }
}

impl<R: Editable> EditState<R> {
    /// Start editing a copy of `record`. Re-beginning the same row keeps the
    /// buffered changes; another row while one is open is a conflict.
    pub fn begin(&mut self, record: &R) -> Result<(), DomainError> {
        match self {
            EditState::Idle => {
                *self = EditState::Editing {
                    id: record.id(),
                    buffer: record.clone(),
                };
                Ok(())
            }
            EditState::Editing { id, .. } if *id == record.id() => Ok(()),
            EditState::Editing { id, .. } => Err(DomainError::conflict(
                ConflictKind::EditInProgress,
                format!("row {id} is already being edited"),
            )),
        }
    }

    /// Parse `raw` and write it into the buffer. Returns false when idle.
    pub fn change(&mut self, field: R::Field, raw: &str) -> bool {
        match self {
            EditState::Idle => false,
            EditState::Editing { buffer, .. } => {
                buffer.set(field, parse_points(raw));
                true
            }
        }
    }

    /// Take the buffer for committing and return to idle.
    pub fn take(&mut self) -> Option<R> {
        match std::mem::replace(self, EditState::Idle) {
            EditState::Idle => None,
            EditState::Editing { buffer, .. } => Some(buffer),
        }
    }

    pub fn cancel(&mut self) {
        *self = EditState::Idle;
    }

    pub fn editing_id(&self) -> Option<i64> {
        match self {
            EditState::Idle => None,
            EditState::Editing { id, .. } => Some(*id),
        }
    }

    pub fn buffer(&self) -> Option<&R> {
        match self {
            EditState::Idle => None,
            EditState::Editing { buffer, .. } => Some(buffer),
        }
    }

    /// What to render for `record`: the buffer if it is the row being edited.
    pub fn display<'a>(&'a self, record: &'a R) -> &'a R {
        match self {
            EditState::Editing { id, buffer } if *id == record.id() => buffer,
            _ => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn score(id: i64) -> Score {
        Score {
            id,
            round_number: id as i32,
            tsim: 1,
            jason: 2,
            wai: 3,
            mum_soup: 4,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("mumSoup".parse::<ScoreField>().unwrap(), ScoreField::MumSoup);
        assert_eq!("mum_soup".parse::<ScoreField>().unwrap(), ScoreField::MumSoup);
        assert_eq!("TSIM".parse::<ScoreField>().unwrap(), ScoreField::Tsim);
        assert!("bob".parse::<ScoreField>().is_err());

        assert_eq!("selfDrawn".parse::<StatField>().unwrap(), StatField::SelfDrawn);
        assert_eq!("特別賞罰".parse::<StatField>().unwrap(), StatField::SpecialBonus);
        assert!("wins".parse::<StatField>().is_err());
    }

    #[test]
    fn change_is_noop_when_idle() {
        let mut edit = EditState::<Score>::Idle;
        assert!(!edit.change(ScoreField::Tsim, "9"));
        assert_eq!(edit, EditState::Idle);
    }

    #[test]
    fn change_writes_parsed_value_to_buffer_only() {
        let stored = score(1);
        let mut edit = EditState::Idle;
        edit.begin(&stored).unwrap();
        assert!(edit.change(ScoreField::Wai, "-7"));
        assert!(edit.change(ScoreField::Jason, "oops"));

        let buffer = edit.buffer().unwrap();
        assert_eq!((buffer.wai, buffer.jason, buffer.tsim), (-7, 0, 1));
        assert_eq!(stored.wai, 3);
        assert_eq!(edit.display(&stored).wai, -7);
    }

    #[test]
    fn rebegin_same_row_keeps_changes() {
        let stored = score(1);
        let mut edit = EditState::Idle;
        edit.begin(&stored).unwrap();
        edit.change(ScoreField::Tsim, "8");
        edit.begin(&stored).unwrap();
        assert_eq!(edit.buffer().unwrap().tsim, 8);
    }

    #[test]
    fn begin_other_row_conflicts() {
        let mut edit = EditState::Idle;
        edit.begin(&score(1)).unwrap();
        let err = edit.begin(&score(2)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Conflict(ConflictKind::EditInProgress, _)
        ));
        assert_eq!(edit.editing_id(), Some(1));
    }

    #[test]
    fn cancel_restores_stored_view() {
        let stored = score(1);
        let mut edit = EditState::Idle;
        edit.begin(&stored).unwrap();
        edit.change(ScoreField::Tsim, "100");
        edit.cancel();
        assert_eq!(edit.display(&stored), &stored);
        assert!(edit.take().is_none());
    }

    #[test]
    fn take_returns_full_buffer_and_idles() {
        let mut edit = EditState::Idle;
        edit.begin(&score(3)).unwrap();
        edit.change(ScoreField::MumSoup, "12");
        let buffer = edit.take().unwrap();
        assert_eq!(buffer, Score { mum_soup: 12, ..score(3) });
        assert_eq!(edit, EditState::Idle);
    }
}
