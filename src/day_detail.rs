use crate::calendar::{DayCell, DayStatus};

/// Outcome of resolving a clicked calendar day.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The day is not interactive; no modal is shown.
    Blocked,
    Plan(RenderPlan),
}

/// Everything the modal needs to render one day.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub date: String,
    pub section: Section,
}

/// Exactly one section is visible per plan; precedence is
/// public holiday > leave > attendance.
#[derive(Debug, Clone)]
pub enum Section {
    PublicHoliday {
        name: String,
    },
    Leave {
        view: LeaveView,
        /// Present when the leave day also has attendance (partial leave).
        attendance: Option<AttendanceView>,
    },
    Attendance(AttendanceView),
    /// Nothing beyond the date: no holiday, no leave, no attendance.
    DateOnly,
}

/// Leave fields already formatted for display.
#[derive(Debug, Clone)]
pub struct LeaveView {
    pub type_name: String,
    pub from: String,
    pub to: String,
    pub duration: String,
    pub reason: String,
    pub first_approver: String,
    pub second_approver: String,
    pub state_label: String,
    pub state_color: String,
}

/// Visual grouping of the attendance status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Present,
    Partial,
}

impl StatusStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusStyle::Present => "agb-status-present",
            StatusStyle::Partial => "agb-status-partial",
        }
    }
}

/// Attendance fields already formatted for display.
#[derive(Debug, Clone)]
pub struct AttendanceView {
    pub shift: String,
    pub checkin: String,
    pub checkout: String,
    pub late: String,
    pub status_label: String,
    pub status_style: StatusStyle,
    pub fraction: String,
}

/// Decides which modal view a clicked day gets, if any.
///
/// Pure function of the decoded cell; reads the same `is_leave` field for
/// both the gate and the section selection.
pub fn resolve(cell: &DayCell) -> Resolution {
    // Non-interactive days get nothing at all. The gate runs before any
    // section selection, so a full absence stays blocked even when other
    // flags are set.
    if cell.status == DayStatus::FullAbsent {
        return Resolution::Blocked;
    }
    if cell.is_future && !cell.is_leave {
        return Resolution::Blocked;
    }

    // Public holidays suppress leave and attendance unconditionally.
    if cell.is_public_holiday {
        return Resolution::Plan(RenderPlan {
            date: cell.date.clone(),
            section: Section::PublicHoliday {
                name: cell.holiday_name.clone(),
            },
        });
    }

    let section = if cell.is_leave {
        Section::Leave {
            view: leave_view(cell),
            attendance: cell.has_attendance.then(|| attendance_view(cell)),
        }
    } else if cell.has_attendance {
        Section::Attendance(attendance_view(cell))
    } else {
        Section::DateOnly
    };

    Resolution::Plan(RenderPlan {
        date: cell.date.clone(),
        section,
    })
}

fn leave_view(cell: &DayCell) -> LeaveView {
    LeaveView {
        type_name: cell.leave.name.clone(),
        from: cell.leave.from.clone(),
        to: cell.leave.to.clone(),
        duration: cell.leave_duration_display(),
        reason: cell.leave.reason.clone(),
        first_approver: cell.leave.first_approver.clone(),
        second_approver: cell.leave.second_approver.clone(),
        state_label: cell.leave_state.label(),
        state_color: cell.leave_state.color().to_string(),
    }
}

/// Attendance status badge, first matching rule wins.
///
/// Working hours strictly between 4 and 8 with both punches present fall
/// through to plain "Present"; that matches the shipped behavior and is
/// pinned by a test.
pub fn attendance_status(cell: &DayCell) -> String {
    let hours = cell.working_hours;
    if cell.is_leave && cell.has_attendance {
        "Partial Leave + Attendance".to_string()
    } else if cell.has_check_in && cell.has_check_out && hours.map_or(false, |h| h >= 8.0) {
        "Present - Full Day".to_string()
    } else if cell.has_check_in && cell.has_check_out && hours.map_or(false, |h| h <= 4.0) {
        "Present - Half Day".to_string()
    } else if cell.has_check_in && !cell.has_check_out {
        "Partial - Check Out Missing".to_string()
    } else if !cell.has_check_in && cell.has_check_out {
        "Partial - Check In Missing".to_string()
    } else if cell.status == DayStatus::PartialAbsent {
        "Partial Absent".to_string()
    } else {
        "Present".to_string()
    }
}

fn status_style(label: &str) -> StatusStyle {
    if label.contains("Full Day") {
        StatusStyle::Present
    } else if label.contains("Partial") {
        StatusStyle::Partial
    } else {
        StatusStyle::Present
    }
}

fn attendance_view(cell: &DayCell) -> AttendanceView {
    let status_label = attendance_status(cell);
    let style = status_style(&status_label);
    AttendanceView {
        shift: cell.shift.clone().unwrap_or_else(|| "Not Assigned".to_string()),
        checkin: cell.checkin.clone().unwrap_or_else(|| "Not recorded".to_string()),
        checkout: cell.checkout.clone().unwrap_or_else(|| "Not recorded".to_string()),
        late: format!("{} minutes", cell.late_minutes.unwrap_or(0)),
        status_label,
        status_style: style,
        fraction: format!("{:.1}", cell.attendance_fraction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cell(pairs: &[(&str, &str)]) -> DayCell {
        let attrs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DayCell::from_attrs(&attrs)
    }

    #[test]
    fn test_gate_blocks_full_absent() {
        let c = cell(&[("data-status", "full_absent"), ("data-has-attendance", "1")]);
        assert!(matches!(resolve(&c), Resolution::Blocked));
    }

    #[test]
    fn test_gate_blocks_future_non_leave() {
        let c = cell(&[("data-is-future", "1")]);
        assert!(matches!(resolve(&c), Resolution::Blocked));

        // a future leave day stays clickable
        let c = cell(&[("data-is-future", "1"), ("data-leave", "1")]);
        assert!(matches!(
            resolve(&c),
            Resolution::Plan(RenderPlan {
                section: Section::Leave { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_public_holiday_wins_over_everything() {
        let c = cell(&[
            ("data-is-public-holiday", "1"),
            ("data-holiday-name", "Union Day"),
            ("data-leave", "1"),
            ("data-has-attendance", "1"),
        ]);
        match resolve(&c) {
            Resolution::Plan(plan) => match plan.section {
                Section::PublicHoliday { name } => assert_eq!(name, "Union Day"),
                other => panic!("expected holiday section, got {:?}", other),
            },
            Resolution::Blocked => panic!("holiday must not be blocked"),
        }
    }

    #[test]
    fn test_leave_with_attendance_nests_attendance() {
        let c = cell(&[
            ("data-leave", "1"),
            ("data-has-attendance", "1"),
            ("data-leave-name", "Annual Leave"),
            ("data-leave-state", "validate1"),
        ]);
        match resolve(&c) {
            Resolution::Plan(plan) => match plan.section {
                Section::Leave { view, attendance } => {
                    assert_eq!(view.type_name, "Annual Leave");
                    assert_eq!(view.state_label, "Wait for 2nd Approval");
                    assert_eq!(view.state_color, "#FFD700");
                    let att = attendance.expect("attendance nested under leave");
                    assert_eq!(att.status_label, "Partial Leave + Attendance");
                }
                other => panic!("expected leave section, got {:?}", other),
            },
            Resolution::Blocked => panic!("leave day must not be blocked"),
        }
    }

    #[test]
    fn test_plain_day_without_attendance_is_date_only() {
        let c = cell(&[("data-date", "Monday, June 2, 2025")]);
        match resolve(&c) {
            Resolution::Plan(plan) => {
                assert_eq!(plan.date, "Monday, June 2, 2025");
                assert!(matches!(plan.section, Section::DateOnly));
            }
            Resolution::Blocked => panic!("plain past day must not be blocked"),
        }
    }

    #[test]
    fn test_status_label_thresholds() {
        let base = [("data-has-check-in", "1"), ("data-has-check-out", "1")];

        let mut c = cell(&base);
        c.working_hours = Some(8.0);
        assert_eq!(attendance_status(&c), "Present - Full Day");

        c.working_hours = Some(4.0);
        assert_eq!(attendance_status(&c), "Present - Half Day");

        // both punches, 6 hours: plain Present
        c.working_hours = Some(6.0);
        assert_eq!(attendance_status(&c), "Present");

        c.working_hours = None;
        assert_eq!(attendance_status(&c), "Present");
    }

    #[test]
    fn test_status_label_missing_punches() {
        let c = cell(&[("data-has-check-in", "1")]);
        assert_eq!(attendance_status(&c), "Partial - Check Out Missing");

        let c = cell(&[("data-has-check-out", "1")]);
        assert_eq!(attendance_status(&c), "Partial - Check In Missing");

        let c = cell(&[("data-status", "partial_absent")]);
        assert_eq!(attendance_status(&c), "Partial Absent");

        let c = cell(&[]);
        assert_eq!(attendance_status(&c), "Present");
    }

    #[test]
    fn test_status_style_grouping() {
        assert_eq!(status_style("Present - Full Day"), StatusStyle::Present);
        assert_eq!(status_style("Partial - Check Out Missing"), StatusStyle::Partial);
        assert_eq!(status_style("Partial Absent"), StatusStyle::Partial);
        assert_eq!(status_style("Present"), StatusStyle::Present);
        // leave+attendance contains "Partial"
        assert_eq!(status_style("Partial Leave + Attendance"), StatusStyle::Partial);
    }

    #[test]
    fn test_attendance_view_fallbacks() {
        let c = cell(&[("data-has-attendance", "1")]);
        match resolve(&c) {
            Resolution::Plan(plan) => match plan.section {
                Section::Attendance(att) => {
                    assert_eq!(att.shift, "Not Assigned");
                    assert_eq!(att.checkin, "Not recorded");
                    assert_eq!(att.checkout, "Not recorded");
                    assert_eq!(att.late, "0 minutes");
                    assert_eq!(att.fraction, "0.0");
                }
                other => panic!("expected attendance section, got {:?}", other),
            },
            Resolution::Blocked => panic!("attendance day must not be blocked"),
        }
    }

    #[test]
    fn test_attendance_view_formats_fields() {
        let c = cell(&[
            ("data-has-attendance", "1"),
            ("data-shift", "Morning Shift"),
            ("data-checkin", "08:55"),
            ("data-checkout", "17:30"),
            ("data-late", "12"),
            ("data-attendance-fraction", "0.75"),
        ]);
        match resolve(&c) {
            Resolution::Plan(plan) => match plan.section {
                Section::Attendance(att) => {
                    assert_eq!(att.shift, "Morning Shift");
                    assert_eq!(att.late, "12 minutes");
                    assert_eq!(att.fraction, "0.8");
                }
                other => panic!("expected attendance section, got {:?}", other),
            },
            Resolution::Blocked => panic!("attendance day must not be blocked"),
        }
    }
}
