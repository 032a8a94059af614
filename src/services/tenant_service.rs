use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};

use crate::models::{Tenant, TenantStatus, TenantStatusReport, TenantUpdate};
use crate::store::{JsonStore, StoreError};

const TENANTS_FILE: &str = "tenants.json";
const MAX_SLUG_LEN: usize = 64;

/// Slugs that would shadow static route segments.
const RESERVED_SLUGS: &[&str] = &[
    "admin", "api", "auth", "health", "memorials", "signup", "superadmin", "tenant", "tenants", "uploads",
];

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("tenant '{0}' not found")]
    NotFound(String),
    #[error("tenant '{0}' already exists")]
    AlreadyExists(String),
    #[error("email '{0}' is already registered")]
    EmailTaken(String),
    #[error("invalid tenant: {0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for creating a tenant.
#[derive(Debug, Clone, Default)]
pub struct NewTenant {
    pub funeral_home_name: String,
    pub email: String,
    /// Explicit slug requested by a superadmin; derived from the name otherwise.
    pub slug: Option<String>,
    /// Reject the request when another tenant already uses this email.
    pub unique_email: bool,
}

/// Lower-case ASCII letters and digits are kept; every run of anything else
/// becomes a single `-`, and dashes never lead or trail.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    slug.trim_end_matches('-').to_string()
}

/// Whether `slug` is a well-formed slug. Guards every path built from one.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

/// First free slug among `base`, `base-1`, `base-2`, ... The base is cut
/// short where needed so the suffixed slug stays within `MAX_SLUG_LEN`.
fn unique_slug(base: &str, tenants: &[Tenant]) -> String {
    let taken = |candidate: &str| is_reserved(candidate) || tenants.iter().any(|t| t.slug == candidate);

    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| {
            let suffix = format!("-{n}");
            // Slugs are ASCII, so byte slicing is safe.
            let stem = &base[..base.len().min(MAX_SLUG_LEN - suffix.len())];
            format!("{}{suffix}", stem.trim_end_matches('-'))
        })
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn validate_email(email: &str) -> Result<String, TenantError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace) => {
            Ok(email.to_string())
        }
        _ => Err(TenantError::Invalid(format!("'{email}' is not a valid email address"))),
    }
}

fn validate_name(name: &str) -> Result<String, TenantError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TenantError::Invalid("funeral home name is required".to_string()));
    }
    if name.len() > 200 {
        return Err(TenantError::Invalid("funeral home name must be at most 200 characters".to_string()));
    }
    Ok(name.to_string())
}

/// Derive `{status, trialExpired}` for a tenant at `now`. Pure.
pub fn compute_status(tenant: &Tenant, now: DateTime<Utc>) -> TenantStatusReport {
    let now_ms = now.timestamp_millis();
    let trial_expired = tenant.status != TenantStatus::Active && now_ms > tenant.trial_ends_at;
    let days_remaining = if tenant.status == TenantStatus::Active {
        0
    } else {
        let ms_left = (tenant.trial_ends_at - now_ms).max(0);
        // Round partial days up so "ends in 3 hours" still reads as 1 day.
        (ms_left + 86_400_000 - 1) / 86_400_000
    };

    TenantStatusReport {
        slug: tenant.slug.clone(),
        status: tenant.status,
        trial_ends_at: tenant.trial_ends_at,
        trial_expired,
        paid_at: tenant.paid_at,
        days_remaining,
    }
}

#[derive(Clone, Debug)]
pub struct TenantRegistry {
    store: JsonStore,
    path: PathBuf,
    trial: Duration,
}

impl TenantRegistry {
    pub fn new(store: JsonStore, trial_days: u32) -> Self {
        let path = store.path(TENANTS_FILE);
        Self {
            store,
            path,
            trial: Duration::days(i64::from(trial_days)),
        }
    }

    pub async fn list(&self) -> Vec<Tenant> {
        self.store.read(&self.path, Vec::new()).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Tenant, TenantError> {
        self.list()
            .await
            .into_iter()
            .find(|t| t.slug == slug)
            .ok_or_else(|| TenantError::NotFound(slug.to_string()))
    }

    /// Every tenant registered under `email`; superadmins may reuse an address.
    pub async fn find_all_by_email(&self, email: &str) -> Vec<Tenant> {
        let email = email.trim();
        self.list()
            .await
            .into_iter()
            .filter(|t| t.email.eq_ignore_ascii_case(email))
            .collect()
    }

    pub async fn create(&self, new: NewTenant, now: DateTime<Utc>) -> Result<Tenant, TenantError> {
        let name = validate_name(&new.funeral_home_name)?;
        let email = validate_email(&new.email)?;

        let requested = match new.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) if is_valid_slug(slug) && !is_reserved(slug) => Some(slug.to_string()),
            Some(slug) => return Err(TenantError::Invalid(format!("'{slug}' is not a usable slug"))),
            None => None,
        };
        let base = slugify(&name);
        if requested.is_none() && base.is_empty() {
            return Err(TenantError::Invalid(
                "funeral home name must contain at least one letter or digit".to_string(),
            ));
        }

        let trial_ends_at = (now + self.trial).timestamp_millis();
        let unique_email = new.unique_email;

        let tenant = self
            .store
            .update(&self.path, Vec::<Tenant>::new(), move |tenants| {
                if unique_email && tenants.iter().any(|t| t.email.eq_ignore_ascii_case(&email)) {
                    return Err(TenantError::EmailTaken(email));
                }

                let slug = match requested {
                    Some(slug) if tenants.iter().any(|t| t.slug == slug) => {
                        return Err(TenantError::AlreadyExists(slug));
                    }
                    Some(slug) => slug,
                    None => unique_slug(&base, tenants),
                };
                if !is_valid_slug(&slug) {
                    return Err(TenantError::Invalid(format!("derived slug '{slug}' is not usable")));
                }

                let tenant = Tenant {
                    slug,
                    funeral_home_name: name,
                    email,
                    status: TenantStatus::Trial,
                    created_at: now.timestamp_millis(),
                    trial_ends_at,
                    paid_at: None,
                    logo: None,
                    brand_color: None,
                    features: BTreeMap::new(),
                    reset_token_hash: None,
                    reset_expiry: None,
                };
                tenants.push(tenant.clone());
                Ok(tenant)
            })
            .await?;

        tracing::info!(slug = %tenant.slug, "tenant created");
        Ok(tenant)
    }

    /// Shallow-merge the provided settings. The slug never changes.
    pub async fn update_settings(&self, slug: &str, update: TenantUpdate) -> Result<Tenant, TenantError> {
        let name = update.funeral_home_name.as_deref().map(validate_name).transpose()?;
        let email = update.email.as_deref().map(validate_email).transpose()?;

        self.modify(slug, move |tenant| {
            if let Some(name) = name {
                tenant.funeral_home_name = name;
            }
            if let Some(email) = email {
                tenant.email = email;
            }
            if let Some(logo) = update.logo {
                tenant.logo = Some(logo).filter(|l| !l.trim().is_empty());
            }
            if let Some(color) = update.brand_color {
                tenant.brand_color = Some(color).filter(|c| !c.trim().is_empty());
            }
            if let Some(features) = update.features {
                tenant.features = features;
            }
            if let Some(status) = update.status {
                tenant.status = status;
            }
            Ok(())
        })
        .await
    }

    pub async fn mark_paid(&self, slug: &str, now: DateTime<Utc>) -> Result<Tenant, TenantError> {
        let tenant = self
            .modify(slug, move |tenant| {
                tenant.status = TenantStatus::Active;
                tenant.paid_at = Some(now.timestamp_millis());
                Ok(())
            })
            .await?;
        tracing::info!(slug = %tenant.slug, "tenant marked paid");
        Ok(tenant)
    }

    pub async fn delete(&self, slug: &str) -> Result<bool, TenantError> {
        let slug = slug.to_string();
        self.store
            .update(&self.path, Vec::<Tenant>::new(), move |tenants| {
                let before = tenants.len();
                tenants.retain(|t| t.slug != slug);
                Ok(tenants.len() != before)
            })
            .await
    }

    pub(crate) async fn modify<F>(&self, slug: &str, change: F) -> Result<Tenant, TenantError>
    where
        F: FnOnce(&mut Tenant) -> Result<(), TenantError> + Send,
    {
        let slug = slug.to_string();
        self.store
            .update(&self.path, Vec::<Tenant>::new(), move |tenants| {
                let tenant = tenants
                    .iter_mut()
                    .find(|t| t.slug == slug)
                    .ok_or_else(|| TenantError::NotFound(slug.clone()))?;
                change(tenant)?;
                Ok(tenant.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    fn new_tenant(name: &str, email: &str) -> NewTenant {
        NewTenant {
            funeral_home_name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn slugify_is_deterministic() {
        assert_eq!(slugify("St. Mary's Home"), "st-mary-s-home");
        assert_eq!(slugify("St. Mary's Home"), slugify("St. Mary's Home"));
        assert_eq!(slugify("  W. Edwards  Funeral Services "), "w-edwards-funeral-services");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("Café 21"), "caf-21");
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("st-mary-s-home"));
        assert!(is_valid_slug("home-2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../x"));
        assert!(!is_valid_slug("Upper"));
        assert!(!is_valid_slug("-lead"));
        assert!(!is_valid_slug("double--dash"));
    }

    #[test]
    fn trial_expiry_rules() {
        let now = Utc::now();
        let mut tenant = Tenant {
            slug: "a".into(),
            funeral_home_name: "A".into(),
            email: "a@example.com".into(),
            status: TenantStatus::Trial,
            created_at: 0,
            trial_ends_at: now.timestamp_millis() - 1,
            paid_at: None,
            logo: None,
            brand_color: None,
            features: BTreeMap::new(),
            reset_token_hash: None,
            reset_expiry: None,
        };
        let report = compute_status(&tenant, now);
        assert!(report.trial_expired);
        assert_eq!(report.days_remaining, 0);

        tenant.status = TenantStatus::Active;
        for ends in [i64::MIN, 0, now.timestamp_millis() - 1, now.timestamp_millis() + 1] {
            tenant.trial_ends_at = ends;
            assert!(!compute_status(&tenant, now).trial_expired);
        }

        tenant.status = TenantStatus::Trial;
        tenant.trial_ends_at = (now + Duration::hours(30)).timestamp_millis();
        let report = compute_status(&tenant, now);
        assert!(!report.trial_expired);
        assert_eq!(report.days_remaining, 2);
    }

    #[tokio::test]
    async fn colliding_names_get_suffixed() {
        let ctx = TestContext::new();
        let registry = &ctx.state.tenants;
        let now = Utc::now();

        let mut slugs = Vec::new();
        for (i, name) in ["St. Mary's Home", "St Mary's Home", "st-mary-s home", "ST. MARY'S HOME!"].iter().enumerate() {
            let tenant = registry
                .create(new_tenant(name, &format!("owner{i}@example.com")), now)
                .await
                .unwrap();
            slugs.push(tenant.slug);
        }
        assert_eq!(slugs, vec!["st-mary-s-home", "st-mary-s-home-1", "st-mary-s-home-2", "st-mary-s-home-3"]);
        assert_eq!(registry.list().await.len(), 4);
    }

    #[tokio::test]
    async fn suffixed_long_slugs_stay_usable() {
        let ctx = TestContext::new();
        let registry = &ctx.state.tenants;
        let name = "a".repeat(70);

        let first = registry.create(new_tenant(&name, "one@example.com"), Utc::now()).await.unwrap();
        let second = registry.create(new_tenant(&name, "two@example.com"), Utc::now()).await.unwrap();
        assert_eq!(first.slug, "a".repeat(MAX_SLUG_LEN));
        assert_eq!(second.slug, format!("{}-1", "a".repeat(MAX_SLUG_LEN - 2)));
        assert!(is_valid_slug(&second.slug));

        let stored = ctx
            .state
            .appointments
            .add(
                &second.slug,
                crate::models::AppointmentDraft {
                    client_name: Some("Someone".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(stored.tenant_slug, second.slug);
    }

    #[test]
    fn suffix_never_leaves_a_dash_before_it() {
        // Cutting this base to make room for "-1" ends it on a dash.
        let base = format!("{}-bc", "a".repeat(61));
        let tenants = vec![Tenant {
            slug: base.clone(),
            funeral_home_name: "x".into(),
            email: "x@example.com".into(),
            status: TenantStatus::Trial,
            created_at: 0,
            trial_ends_at: 0,
            paid_at: None,
            logo: None,
            brand_color: None,
            features: BTreeMap::new(),
            reset_token_hash: None,
            reset_expiry: None,
        }];
        let slug = unique_slug(&base, &tenants);
        assert_eq!(slug, format!("{}-1", "a".repeat(61)));
        assert!(is_valid_slug(&slug));
    }

    #[tokio::test]
    async fn reserved_words_are_never_issued() {
        let ctx = TestContext::new();
        let tenant = ctx
            .state
            .tenants
            .create(new_tenant("Admin", "a@example.com"), Utc::now())
            .await
            .unwrap();
        assert_eq!(tenant.slug, "admin-1");
    }

    #[tokio::test]
    async fn explicit_slug_conflicts_are_rejected() {
        let ctx = TestContext::new();
        let registry = &ctx.state.tenants;
        let mut request = new_tenant("Grace Chapel", "g@example.com");
        request.slug = Some("grace".into());
        registry.create(request.clone(), Utc::now()).await.unwrap();

        let err = registry.create(request, Utc::now()).await.unwrap_err();
        assert!(matches!(err, TenantError::AlreadyExists(ref s) if s == "grace"));

        let mut bad = new_tenant("Grace Chapel", "g@example.com");
        bad.slug = Some("../grace".into());
        assert!(matches!(registry.create(bad, Utc::now()).await, Err(TenantError::Invalid(_))));
    }

    #[tokio::test]
    async fn unique_email_is_enforced_when_asked() {
        let ctx = TestContext::new();
        let registry = &ctx.state.tenants;
        let mut first = new_tenant("Alpha", "owner@example.com");
        first.unique_email = true;
        registry.create(first, Utc::now()).await.unwrap();

        let mut second = new_tenant("Beta", "OWNER@example.com");
        second.unique_email = true;
        assert!(matches!(registry.create(second, Utc::now()).await, Err(TenantError::EmailTaken(_))));

        // Superadmin creation may reuse an owner's address.
        registry.create(new_tenant("Gamma", "owner@example.com"), Utc::now()).await.unwrap();
    }

    #[tokio::test]
    async fn new_tenants_start_on_trial() {
        let ctx = TestContext::new();
        let now = Utc::now();
        let tenant = ctx
            .state
            .tenants
            .create(new_tenant("Alpha", "a@example.com"), now)
            .await
            .unwrap();
        assert_eq!(tenant.status, TenantStatus::Trial);
        assert_eq!(tenant.trial_ends_at - tenant.created_at, 14 * 86_400_000);
        assert!(!compute_status(&tenant, now).trial_expired);
    }

    #[tokio::test]
    async fn settings_merge_and_mark_paid() {
        let ctx = TestContext::new();
        let registry = &ctx.state.tenants;
        let tenant = registry.create(new_tenant("Alpha", "a@example.com"), Utc::now()).await.unwrap();

        let update = TenantUpdate {
            brand_color: Some("#306CDE".into()),
            features: Some(BTreeMap::from([("Memorial Pages".to_string(), true)])),
            ..Default::default()
        };
        let updated = registry.update_settings(&tenant.slug, update).await.unwrap();
        assert_eq!(updated.brand_color.as_deref(), Some("#306CDE"));
        assert_eq!(updated.funeral_home_name, "Alpha");
        assert_eq!(updated.email, "a@example.com");
        assert_eq!(updated.slug, tenant.slug);

        let paid = registry.mark_paid(&tenant.slug, Utc::now()).await.unwrap();
        assert_eq!(paid.status, TenantStatus::Active);
        assert!(paid.paid_at.is_some());

        assert!(matches!(
            registry.update_settings("ghost", TenantUpdate::default()).await,
            Err(TenantError::NotFound(_))
        ));
        assert!(matches!(registry.mark_paid("ghost", Utc::now()).await, Err(TenantError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_reports_whether_tenant_existed() {
        let ctx = TestContext::new();
        let registry = &ctx.state.tenants;
        let tenant = registry.create(new_tenant("Alpha", "a@example.com"), Utc::now()).await.unwrap();

        assert!(registry.delete(&tenant.slug).await.unwrap());
        assert!(!registry.delete(&tenant.slug).await.unwrap());
        assert!(matches!(registry.find_by_slug(&tenant.slug).await, Err(TenantError::NotFound(_))));
    }
}
