// src/tier.rs

use serde::Deserialize;


/// Subscription level of the caller. Anything other than premium is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    #[default]
    Free,
    Premium,
}

impl Tier {
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("premium") => Self::Premium,
            _ => Self::Free,
        }
    }
}


/// Free-tier result caps, per endpoint. `[tiers]` in config.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TierLimits {
    pub opportunities: usize,
    pub search: usize,
    pub top: usize,
    /// Free callers may open an opportunity only if it ranks below this within its product.
    pub opportunity_detail: usize,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            opportunities: 5,
            search: 3,
            top: 3,
            opportunity_detail: 3,
        }
    }
}


/// Truncate `items` to `free_limit` for free callers; premium sees everything.
pub fn gate<T>(mut items: Vec<T>, tier: Tier, free_limit: usize) -> Vec<T> {
    if tier == Tier::Free {
        items.truncate(free_limit);
    }
    items
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_parsing() {
        assert_eq!(Tier::from_header(Some("premium")), Tier::Premium);
        assert_eq!(Tier::from_header(Some(" Premium ")), Tier::Premium);
        assert_eq!(Tier::from_header(Some("free")), Tier::Free);
        assert_eq!(Tier::from_header(Some("gold")), Tier::Free);
        assert_eq!(Tier::from_header(None), Tier::Free);
    }

    #[test]
    fn gate_only_truncates_free() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(gate(items.clone(), Tier::Free, 3), vec![0, 1, 2]);
        assert_eq!(gate(items.clone(), Tier::Premium, 3).len(), 10);
        assert_eq!(gate(vec![1, 2], Tier::Free, 5), vec![1, 2]);
    }
}
