use std::collections::HashMap;

use serde::Deserialize;

/// One entry of the fixed leave-type catalog.
#[derive(Debug, Clone, Copy)]
pub struct LeaveType {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub css_class: &'static str,
}

/// Catalog of the known leave categories, in render order.
pub const LEAVE_TYPES: [LeaveType; 8] = [
    LeaveType { key: "annual", name: "Annual Leave", icon: "fa-calendar-check-o", css_class: "annual" },
    LeaveType { key: "casual", name: "Casual Leave", icon: "fa-coffee", css_class: "casual" },
    LeaveType { key: "maternity", name: "Maternity Leave", icon: "fa-female", css_class: "maternity" },
    LeaveType { key: "medical", name: "Medical Leave", icon: "fa-medkit", css_class: "medical" },
    LeaveType { key: "funeral", name: "Funeral Leave", icon: "fa-frown-o", css_class: "funeral" },
    LeaveType { key: "marriage", name: "Married Leave", icon: "fa-heart", css_class: "marriage" },
    LeaveType { key: "unpaid", name: "Unpaid Leave", icon: "fa-ban", css_class: "unpaid" },
    LeaveType { key: "paternity", name: "Paternity Leave", icon: "fa-male", css_class: "paternity" },
];

/// Balance figures for one leave type, as returned by the upstream API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BalanceFigures {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub taken: f64,
    #[serde(default)]
    pub available: f64,
    #[serde(default)]
    pub pending: f64,
}

impl BalanceFigures {
    /// A card is only worth rendering when something is non-zero besides
    /// the remaining balance.
    pub fn is_meaningful(&self) -> bool {
        self.total > 0.0 || self.taken > 0.0 || self.pending > 0.0
    }
}

/// One renderable summary card.
#[derive(Debug, Clone)]
pub struct BalanceCard {
    pub leave_type: LeaveType,
    pub figures: BalanceFigures,
}

/// "Annual Leave" -> "annual". Lowercased first whitespace-delimited word
/// of the display name; this is the join key between the type catalog and
/// the balance map.
pub fn normalize_key(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Joins the fetched leave types with the balance map. Every fetched type
/// gets an entry; types the balance map does not know get all zeroes.
pub fn merge_balances(
    type_names: &[String],
    balances: &HashMap<String, BalanceFigures>,
) -> HashMap<String, BalanceFigures> {
    let mut merged = HashMap::new();
    for name in type_names {
        let key = normalize_key(name);
        let figures = balances.get(&key).copied().unwrap_or_default();
        merged.insert(key, figures);
    }
    merged
}

/// Builds the card list in fixed catalog order, dropping types with no
/// meaningful data.
pub fn build_cards(merged: &HashMap<String, BalanceFigures>) -> Vec<BalanceCard> {
    LEAVE_TYPES
        .iter()
        .filter_map(|lt| {
            let figures = merged.get(lt.key)?;
            figures.is_meaningful().then(|| BalanceCard {
                leave_type: *lt,
                figures: *figures,
            })
        })
        .collect()
}

/// Renders a figure the way the portal shows it: integers without a
/// decimal point, fractions as-is ("12", "12.5").
pub fn format_figure(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
