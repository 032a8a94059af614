use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Trial,
    Active,
    Suspended,
}

/// One onboarded funeral home. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub slug: String,
    #[serde(alias = "name")]
    pub funeral_home_name: String,
    pub email: String,
    pub status: TenantStatus,
    pub created_at: i64,
    pub trial_ends_at: i64,
    #[serde(default)]
    pub paid_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_color: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, bool>,
    // Present only while a password reset is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_expiry: Option<i64>,
}

impl Tenant {
    pub fn to_view(&self) -> TenantView {
        TenantView {
            slug: self.slug.clone(),
            funeral_home_name: self.funeral_home_name.clone(),
            email: self.email.clone(),
            status: self.status,
            created_at: self.created_at,
            trial_ends_at: self.trial_ends_at,
            paid_at: self.paid_at,
            logo: self.logo.clone(),
            brand_color: self.brand_color.clone(),
            features: self.features.clone(),
        }
    }

    pub fn to_listing(&self) -> TenantListing {
        TenantListing {
            slug: self.slug.clone(),
            funeral_home_name: self.funeral_home_name.clone(),
            logo: self.logo.clone(),
            brand_color: self.brand_color.clone(),
        }
    }
}

/// Tenant as returned over HTTP; never carries reset state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantView {
    pub slug: String,
    pub funeral_home_name: String,
    pub email: String,
    pub status: TenantStatus,
    pub created_at: i64,
    pub trial_ends_at: i64,
    pub paid_at: Option<i64>,
    pub logo: Option<String>,
    pub brand_color: Option<String>,
    pub features: BTreeMap<String, bool>,
}

/// Entry in the public tenant directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantListing {
    pub slug: String,
    pub funeral_home_name: String,
    pub logo: Option<String>,
    pub brand_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantStatusReport {
    pub slug: String,
    pub status: TenantStatus,
    pub trial_ends_at: i64,
    pub trial_expired: bool,
    pub paid_at: Option<i64>,
    pub days_remaining: i64,
}

/// Settings a tenant admin may change on their own record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TenantSettings {
    #[serde(alias = "name")]
    pub funeral_home_name: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub brand_color: Option<String>,
    pub features: Option<BTreeMap<String, bool>>,
}

/// Superadmin edit: tenant settings plus lifecycle status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TenantUpdate {
    #[serde(alias = "name")]
    pub funeral_home_name: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
    pub brand_color: Option<String>,
    pub features: Option<BTreeMap<String, bool>>,
    pub status: Option<TenantStatus>,
}

impl From<TenantSettings> for TenantUpdate {
    fn from(settings: TenantSettings) -> Self {
        Self {
            funeral_home_name: settings.funeral_home_name,
            email: settings.email,
            logo: settings.logo,
            brand_color: settings.brand_color,
            features: settings.features,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_name_field_is_accepted() {
        let tenant: Tenant = serde_json::from_value(json!({
            "slug": "w-edwards",
            "name": "W. Edwards Funeral Services",
            "email": "office@wedwards.example",
            "status": "active",
            "createdAt": 1,
            "trialEndsAt": 2
        }))
        .unwrap();
        assert_eq!(tenant.funeral_home_name, "W. Edwards Funeral Services");
        assert!(tenant.features.is_empty());
        assert_eq!(tenant.paid_at, None);
    }

    #[test]
    fn view_hides_reset_state() {
        let tenant = Tenant {
            slug: "a".into(),
            funeral_home_name: "A".into(),
            email: "a@example.com".into(),
            status: TenantStatus::Trial,
            created_at: 0,
            trial_ends_at: 0,
            paid_at: None,
            logo: None,
            brand_color: None,
            features: BTreeMap::new(),
            reset_token_hash: Some("abc".into()),
            reset_expiry: Some(5),
        };
        let value = serde_json::to_value(tenant.to_view()).unwrap();
        assert!(value.get("resetTokenHash").is_none());
        assert!(value.get("resetExpiry").is_none());
    }

    #[test]
    fn settings_reject_unknown_keys() {
        let err = serde_json::from_value::<TenantSettings>(json!({"slug": "new-slug"}));
        assert!(err.is_err());
        let err = serde_json::from_value::<TenantSettings>(json!({"status": "active"}));
        assert!(err.is_err());
    }
}
