use serde::{Deserialize, Serialize};

/// Account role driving route-level authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Management,
    MarketingStaff,
    CompanyRepresentative,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::Management,
        Role::MarketingStaff,
        Role::CompanyRepresentative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Management => "MANAGEMENT",
            Role::MarketingStaff => "MARKETING_STAFF",
            Role::CompanyRepresentative => "COMPANY_REPRESENTATIVE",
        }
    }

    /// Descriptive capability tags per role.
    ///
    /// This table documents intended product scope and is kept for future
    /// fine-grained enforcement. The mechanism actually enforced today is
    /// the per-route allow-list checked by the role middleware; do not
    /// assume an endpoint is gated on one of these tags.
    pub fn capabilities(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[
                "create_users",
                "manage_roles",
                "assign_projects",
                "view_all_dashboards",
                "export_data",
                "view_all_contacts",
                "view_all_projects",
                "track_all_interactions",
                "set_commissions",
                "view_conversion_reports",
                "send_to_project_team",
                "view_hr_outsourced_roles",
                "view_user_profile_data",
                "view_contact_timeline",
                "define_project_types",
            ],
            Role::Management => &[
                "oversee_assigned_projects",
                "view_team_data",
                "view_team_dashboard",
                "track_team_interactions",
                "view_conversion_reports",
                "define_commission_split",
                "view_contact_timeline",
                "view_user_profile_data",
            ],
            Role::MarketingStaff => &[
                "track_personal_interactions",
                "view_own_dashboard",
                "convert_leads",
                "send_lead_to_closer",
                "view_own_conversion_stats",
                "view_own_commission_income",
                "filter_assigned_contacts",
            ],
            Role::CompanyRepresentative => &[
                "view_own_business_interactions",
                "view_own_growth_metrics",
                "convert_leads",
                "send_lead_to_closer",
                "view_own_conversion_stats",
                "view_own_commission_income",
            ],
        }
    }

    pub fn can(&self, capability: &str) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MANAGEMENT" => Ok(Role::Management),
            "MARKETING_STAFF" => Ok(Role::MarketingStaff),
            "COMPANY_REPRESENTATIVE" => Ok(Role::CompanyRepresentative),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Route-group allow-lists. A request passes the role gate iff its decoded
/// role appears in the group's list.
pub mod allow {
    use super::Role;

    pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
    pub const REPRESENTATIVE: &[Role] = &[Role::Admin, Role::CompanyRepresentative];
    pub const STAFF: &[Role] = &[Role::Admin, Role::Management, Role::MarketingStaff];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_strings() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("SUPERUSER".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn allow_lists_admit_exactly_their_members() {
        let table: &[(&[Role], &[Role])] = &[
            (allow::ADMIN_ONLY, &[Role::Admin]),
            (allow::REPRESENTATIVE, &[Role::Admin, Role::CompanyRepresentative]),
            (allow::STAFF, &[Role::Admin, Role::Management, Role::MarketingStaff]),
        ];

        for (list, members) in table {
            for role in Role::ALL {
                assert_eq!(
                    list.contains(&role),
                    members.contains(&role),
                    "role {role} vs list {list:?}"
                );
            }
        }
    }

    #[test]
    fn capability_table_covers_every_role() {
        for role in Role::ALL {
            assert!(!role.capabilities().is_empty());
        }
        // Spot checks against the documented policy.
        assert!(Role::Admin.can("view_all_contacts"));
        assert!(Role::Admin.can("export_data"));
        assert!(Role::Management.can("view_team_dashboard"));
        assert!(!Role::Management.can("create_users"));
        assert!(Role::MarketingStaff.can("filter_assigned_contacts"));
        assert!(!Role::CompanyRepresentative.can("filter_assigned_contacts"));
        assert!(Role::CompanyRepresentative.can("view_own_growth_metrics"));
    }
}
