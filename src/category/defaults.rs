//! The categories every owner starts with.

use crate::entry_type::EntryType;

/// A category that is seeded for each owner the first time they list their categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub kind: EntryType,
}

const fn expense(name: &'static str, icon: &'static str, color: &'static str) -> DefaultCategory {
    DefaultCategory {
        name,
        icon,
        color,
        kind: EntryType::Expense,
    }
}

const fn income(name: &'static str, icon: &'static str, color: &'static str) -> DefaultCategory {
    DefaultCategory {
        name,
        icon,
        color,
        kind: EntryType::Income,
    }
}

/// The fixed default set: 9 expense and 6 income categories.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 15] = [
    expense("Food & Dining", "🍔", "#EF4444"),
    expense("Transportation", "🚗", "#F59E0B"),
    expense("Shopping", "🛍️", "#EC4899"),
    expense("Entertainment", "🎬", "#8B5CF6"),
    expense("Bills & Utilities", "💡", "#3B82F6"),
    expense("Healthcare", "🏥", "#10B981"),
    expense("Education", "📚", "#6366F1"),
    expense("Travel", "✈️", "#14B8A6"),
    expense("Other", "📌", "#6B7280"),
    income("Salary", "💰", "#10B981"),
    income("Business", "💼", "#3B82F6"),
    income("Investments", "📈", "#8B5CF6"),
    income("Freelance", "💻", "#06B6D4"),
    income("Gifts", "🎁", "#EC4899"),
    income("Other", "💵", "#6B7280"),
];
