use std::fmt::Write;

use crate::balance_service::GridView;
use crate::day_detail::{AttendanceView, LeaveView, RenderPlan, Section};
use crate::leave_balance::{format_figure, BalanceCard};

/// Minimal HTML escaping for data-derived text.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the day-details modal body for a resolved plan. The element ids
/// match the slots the portal page already styles.
pub fn render_day_modal(plan: &RenderPlan) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<div class=\"agb-modal-body\"><h3 id=\"modal-date\">{}</h3>",
        escape(&plan.date)
    );

    match &plan.section {
        Section::PublicHoliday { name } => {
            let _ = write!(
                html,
                "<div class=\"public-holiday-section\">\
                 <span id=\"modal-holiday-name\">{}</span></div>",
                escape(name)
            );
        }
        Section::Leave { view, attendance } => {
            html.push_str(&leave_section(view));
            if let Some(att) = attendance {
                html.push_str(&attendance_section(att));
            }
        }
        Section::Attendance(att) => {
            html.push_str(&attendance_section(att));
        }
        Section::DateOnly => {}
    }

    html.push_str("</div>");
    html
}

fn leave_section(view: &LeaveView) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"leave-section\">");
    html.push_str("<div class=\"section-divider agb-modal-section-header\"></div>");
    let _ = write!(html, "<span id=\"modal-leave-type\">{}</span>", escape(&view.type_name));
    let _ = write!(html, "<span id=\"modal-leave-from\">{}</span>", escape(&view.from));
    let _ = write!(html, "<span id=\"modal-leave-to\">{}</span>", escape(&view.to));
    let _ = write!(html, "<span id=\"modal-leave-duration\">{}</span>", escape(&view.duration));
    let _ = write!(html, "<span id=\"modal-leave-reason\">{}</span>", escape(&view.reason));
    let _ = write!(
        html,
        "<span id=\"modal-leave-approver1\">{}</span>",
        escape(&view.first_approver)
    );
    let _ = write!(
        html,
        "<span id=\"modal-leave-approver2\">{}</span>",
        escape(&view.second_approver)
    );
    let _ = write!(
        html,
        "<span id=\"modal-leave-state\" style=\"background-color:{};color:#fff;\
         padding:2px 6px;border-radius:20px;display:inline-block\">{}</span>",
        escape(&view.state_color),
        escape(&view.state_label)
    );
    html.push_str("</div>");
    html
}

fn attendance_section(att: &AttendanceView) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"attendance-section\">");
    html.push_str("<div class=\"section-divider agb-modal-section-header\"></div>");
    let _ = write!(html, "<span id=\"modal-shift\">{}</span>", escape(&att.shift));
    let _ = write!(html, "<span id=\"modal-checkin\">{}</span>", escape(&att.checkin));
    let _ = write!(html, "<span id=\"modal-checkout\">{}</span>", escape(&att.checkout));
    let _ = write!(html, "<span id=\"modal-late\">{}</span>", escape(&att.late));
    let _ = write!(
        html,
        "<span id=\"modal-status\" class=\"agb-status-badge {}\">{}</span>",
        att.status_style.css_class(),
        escape(&att.status_label)
    );
    let _ = write!(html, "<span id=\"modal-attendance\">{}</span>", escape(&att.fraction));
    html.push_str("</div>");
    html
}

/// Renders the leave-balance grid: one card per qualifying type, or the
/// no-data placeholder, or the error placeholder with its retry button.
pub fn render_balance_grid(view: &GridView) -> String {
    match view {
        GridView::Cards(cards) => {
            let mut html = String::new();
            for (index, card) in cards.iter().enumerate() {
                html.push_str(&balance_card(card, index));
            }
            html
        }
        GridView::NoData => concat!(
            "<div class=\"agb-loading-card\">",
            "<i class=\"fa fa-info-circle\"></i>",
            "<p>No leave balance data available.</p>",
            "<p style=\"margin-top: 8px; font-size: 14px; color: #9ca3af;\">",
            "Please contact HR for more information.</p>",
            "</div>"
        )
        .to_string(),
        GridView::Error(message) => format!(
            "<div class=\"agb-loading-card\">\
             <i class=\"fa fa-exclamation-triangle\"></i>\
             <p>Error: {}</p>\
             <button onclick=\"loadLeaveBalances()\" class=\"agb-btn agb-btn-primary\" \
             style=\"margin-top: 16px;\"><i class=\"fa fa-refresh\"></i> Retry</button>\
             </div>",
            escape(message)
        ),
    }
}

fn balance_card(card: &BalanceCard, index: usize) -> String {
    let lt = &card.leave_type;
    let figures = &card.figures;
    format!(
        "<div class=\"agb-balance-card agb-balance-{class}\" style=\"animation-delay:{delay:.1}s\" tabindex=\"0\">\
         <div class=\"agb-balance-card-header\">\
         <div class=\"agb-balance-title-section\">\
         <i class=\"fa {icon} agb-balance-icon\"></i>\
         <h3 class=\"agb-balance-title\">{name}</h3>\
         </div>\
         <div class=\"agb-balance-total-badge\">\
         <span class=\"agb-total-label\">Total:</span>\
         <span class=\"agb-total-value\">{total}</span>\
         </div>\
         </div>\
         <div class=\"agb-balance-metrics-grid\">\
         <div class=\"agb-metric-box agb-metric-taken\">\
         <div class=\"agb-metric-value\">{taken}</div>\
         <div class=\"agb-metric-label\">Taken</div>\
         </div>\
         <div class=\"agb-metric-box agb-metric-balance\">\
         <div class=\"agb-metric-value\">{balance}</div>\
         <div class=\"agb-metric-label\">Balance</div>\
         </div>\
         <div class=\"agb-metric-box agb-metric-pending\">\
         <div class=\"agb-metric-value\">{pending}</div>\
         <div class=\"agb-metric-label\">Pending</div>\
         </div>\
         </div>\
         </div>",
        class = lt.css_class,
        delay = index as f64 * 0.1,
        icon = lt.icon,
        name = escape(lt.name),
        total = format_figure(figures.total),
        taken = format_figure(figures.taken),
        balance = format_figure(figures.available),
        pending = format_figure(figures.pending),
    )
}
