use std::collections::HashMap;

use chrono::{Local, NaiveDate};

/// Day-level status emitted by the upstream calendar renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayStatus {
    Present,
    FullAbsent,
    PartialAbsent,
    /// Statuses only used for display styling upstream; carried verbatim.
    Other(String),
}

impl DayStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "present" => DayStatus::Present,
            "full_absent" => DayStatus::FullAbsent,
            "partial_absent" => DayStatus::PartialAbsent,
            other => DayStatus::Other(other.to_string()),
        }
    }
}

/// Which half of the day a half-day leave covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfDayType {
    Am,
    Pm,
}

impl HalfDayType {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "am" => Some(HalfDayType::Am),
            "pm" => Some(HalfDayType::Pm),
            // "None" and empty both mean no half-day marker
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            HalfDayType::Am => "Morning",
            HalfDayType::Pm => "Afternoon",
        }
    }
}

/// Approval workflow stage of a leave request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveState {
    Confirm,
    Validate,
    Validate1,
    Other(String),
    Missing,
}

impl LeaveState {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "confirm" => LeaveState::Confirm,
            "validate" => LeaveState::Validate,
            "validate1" => LeaveState::Validate1,
            "" => LeaveState::Missing,
            other => LeaveState::Other(other.to_string()),
        }
    }

    /// Badge text shown to the employee.
    pub fn label(&self) -> String {
        match self {
            LeaveState::Confirm => "Pending".to_string(),
            LeaveState::Validate => "Approved".to_string(),
            LeaveState::Validate1 => "Wait for 2nd Approval".to_string(),
            LeaveState::Other(raw) => raw.clone(),
            LeaveState::Missing => "Unknown".to_string(),
        }
    }

    /// Badge background color.
    pub fn color(&self) -> &'static str {
        match self {
            LeaveState::Confirm => "#FFA500",
            LeaveState::Validate => "#28a745",
            LeaveState::Validate1 => "#FFD700",
            LeaveState::Other(_) | LeaveState::Missing => "#6c757d",
        }
    }
}

/// Leave details attached to a calendar day.
#[derive(Debug, Clone, Default)]
pub struct LeaveInfo {
    pub name: String,
    pub from: String,
    pub to: String,
    pub duration: String,
    pub reason: String,
    pub first_approver: String,
    pub second_approver: String,
}

/// One calendar cell, decoded from the attribute map the portal page posts.
///
/// The attribute names are the wire format between the server-rendered markup
/// and this service; boolean flags arrive as the literal string "1".
#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: String,
    pub status: DayStatus,
    pub is_future: bool,
    pub is_leave: bool,
    pub is_half_leave: bool,
    pub has_attendance: bool,
    pub is_weekend: bool,
    pub has_check_in: bool,
    pub has_check_out: bool,
    pub is_public_holiday: bool,
    pub is_invalid_half_leave: bool,

    pub shift: Option<String>,
    pub checkin: Option<String>,
    pub checkout: Option<String>,
    pub late_minutes: Option<i64>,
    pub working_hours: Option<f64>,
    pub attendance_fraction: f64,

    pub leave: LeaveInfo,
    pub half_day_type: Option<HalfDayType>,
    pub leave_state: LeaveState,

    pub holiday_name: String,
}

fn flag(attrs: &HashMap<String, String>, name: &str) -> bool {
    attrs.get(name).map(|v| v == "1").unwrap_or(false)
}

fn text(attrs: &HashMap<String, String>, name: &str) -> String {
    attrs.get(name).cloned().unwrap_or_default()
}

fn opt_text(attrs: &HashMap<String, String>, name: &str) -> Option<String> {
    attrs.get(name).filter(|v| !v.is_empty()).cloned()
}

impl DayCell {
    /// Decodes a cell from its attribute map. Never fails: malformed or
    /// missing attributes degrade to their absent/default value.
    pub fn from_attrs(attrs: &HashMap<String, String>) -> Self {
        Self::from_attrs_at(attrs, Local::now().date_naive())
    }

    /// Same as [`from_attrs`](Self::from_attrs) with an explicit "today",
    /// used when the `data-is-future` flag is absent and the ISO date has to
    /// be compared instead.
    pub fn from_attrs_at(attrs: &HashMap<String, String>, today: NaiveDate) -> Self {
        let is_future = if attrs.contains_key("data-is-future") {
            flag(attrs, "data-is-future")
        } else {
            opt_text(attrs, "data-date-iso")
                .and_then(|iso| NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok())
                .map(|d| d > today)
                .unwrap_or(false)
        };

        Self {
            date: text(attrs, "data-date"),
            status: DayStatus::from_raw(&text(attrs, "data-status")),
            is_future,
            is_leave: flag(attrs, "data-leave"),
            is_half_leave: flag(attrs, "data-is-half-leave"),
            has_attendance: flag(attrs, "data-has-attendance"),
            is_weekend: flag(attrs, "data-is-weekend"),
            has_check_in: flag(attrs, "data-has-check-in"),
            has_check_out: flag(attrs, "data-has-check-out"),
            is_public_holiday: flag(attrs, "data-is-public-holiday"),
            is_invalid_half_leave: flag(attrs, "data-is-invalid-half-leave"),
            shift: opt_text(attrs, "data-shift"),
            checkin: opt_text(attrs, "data-checkin"),
            checkout: opt_text(attrs, "data-checkout"),
            late_minutes: attrs.get("data-late").and_then(|v| v.parse().ok()),
            working_hours: attrs.get("data-working-hours").and_then(|v| v.parse().ok()),
            attendance_fraction: attrs
                .get("data-attendance-fraction")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0),
            leave: LeaveInfo {
                name: text(attrs, "data-leave-name"),
                from: text(attrs, "data-leave-from"),
                to: text(attrs, "data-leave-to"),
                duration: text(attrs, "data-leave-duration"),
                reason: text(attrs, "data-leave-reason"),
                first_approver: text(attrs, "data-first-approver"),
                second_approver: text(attrs, "data-second-approver"),
            },
            half_day_type: HalfDayType::from_raw(&text(attrs, "data-leave-half-day-type")),
            leave_state: LeaveState::from_raw(&text(attrs, "data-leave-state")),
            holiday_name: text(attrs, "data-holiday-name"),
        }
    }

    /// Leave duration with the half-day suffix, e.g. "0.5 (Morning)".
    pub fn leave_duration_display(&self) -> String {
        match self.half_day_type {
            Some(half) => format!("{} ({})", self.leave.duration, half.display()),
            None => self.leave.duration.clone(),
        }
    }
}
