//! Tenant predicate shared by every read, upsert, and replace-set.
//!
//! One predicate type parameterizes all-tenant and single-tenant execution,
//! so there is no separate truncate path that could miss the tenant scope.

use lf_core::TenantId;

/// Tenant scope of one store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantFilter {
    /// Every tenant the registry knows.
    All,
    /// A single tenant.
    One(TenantId),
}

impl TenantFilter {
    pub fn from_option(tenant: Option<TenantId>) -> Self {
        match tenant {
            Some(t) => TenantFilter::One(t),
            None => TenantFilter::All,
        }
    }

    pub fn tenant(&self) -> Option<TenantId> {
        match self {
            TenantFilter::All => None,
            TenantFilter::One(t) => Some(*t),
        }
    }

    pub fn matches(&self, tenant: TenantId) -> bool {
        match self {
            TenantFilter::All => true,
            TenantFilter::One(t) => *t == tenant,
        }
    }

    /// Parameter for the `(? IS NULL OR tenant_id = ?)` SQL clause; bind it
    /// twice.
    pub(crate) fn as_param(&self) -> Option<i64> {
        self.tenant().map(TenantId::raw)
    }
}

impl From<Option<TenantId>> for TenantFilter {
    fn from(tenant: Option<TenantId>) -> Self {
        Self::from_option(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches() {
        let all = TenantFilter::All;
        let one = TenantFilter::One(TenantId::new(3));

        assert!(all.matches(TenantId::new(1)));
        assert!(one.matches(TenantId::new(3)));
        assert!(!one.matches(TenantId::new(4)));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(TenantFilter::from_option(None), TenantFilter::All);
        assert_eq!(
            TenantFilter::from_option(Some(TenantId::new(9))).tenant(),
            Some(TenantId::new(9))
        );
    }
}
