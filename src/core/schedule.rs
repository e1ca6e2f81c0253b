//! Schedule policies: which (action, time) pairs apply to a calendar date.
//!
//! Everything here is pure. Times are local wall-clock times attached to the
//! target `NaiveDate`; nothing is derived from "now", so no timezone
//! conversion can move an event to another day.

use crate::errors::{AppError, AppResult};
use crate::models::clock_action::ClockAction;
use crate::models::event::PlannedEvent;
use crate::models::policy::{FillOptions, FillPolicy};
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

/// Times of one WorkDay-policy day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkDayTimes {
    pub check_in: NaiveTime,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
    pub check_out: NaiveTime,
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

/// WorkDay table. Mon–Thu depend on `start_early`, Friday is fixed,
/// weekends have no schedule.
pub fn workday_times(weekday: Weekday, options: FillOptions) -> AppResult<WorkDayTimes> {
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => {
            let (check_in, check_out) = if options.start_early {
                (hm(8, 0), hm(17, 30))
            } else {
                (hm(9, 0), hm(18, 30))
            };
            Ok(WorkDayTimes {
                check_in,
                break_start: hm(13, 0),
                break_end: hm(14, 0),
                check_out,
            })
        }
        Weekday::Fri => Ok(WorkDayTimes {
            check_in: hm(9, 0),
            break_start: hm(13, 0),
            break_end: hm(14, 0),
            check_out: hm(16, 0),
        }),
        Weekday::Sat | Weekday::Sun => Err(AppError::UnsupportedDay(weekday)),
    }
}

/// Ordered events of `date` under `policy`.
pub fn compute_events(
    policy: FillPolicy,
    date: NaiveDate,
    options: FillOptions,
) -> AppResult<Vec<PlannedEvent>> {
    let times: Vec<(ClockAction, NaiveTime)> = match policy {
        FillPolicy::AllDay => ClockAction::FULL_DAY
            .iter()
            .map(|a| (*a, a.default_time()))
            .collect(),
        FillPolicy::HalfDay => ClockAction::HALF_DAY
            .into_iter()
            .zip([hm(10, 0), hm(14, 0)])
            .collect(),
        FillPolicy::WorkDay => {
            let t = workday_times(date.weekday(), options)?;
            vec![
                (ClockAction::CheckIn, t.check_in),
                (ClockAction::Break, t.break_start),
                (ClockAction::Return, t.break_end),
                (ClockAction::CheckOut, t.check_out),
            ]
        }
    };

    Ok(times
        .into_iter()
        .map(|(action, time)| PlannedEvent {
            action,
            at: date.and_time(time),
        })
        .collect())
}

/// A single action on `date`, at `time` or at the action's default time.
pub fn single_event(action: ClockAction, date: NaiveDate, time: Option<NaiveTime>) -> PlannedEvent {
    PlannedEvent {
        action,
        at: date.and_time(time.unwrap_or_else(|| action.default_time())),
    }
}
