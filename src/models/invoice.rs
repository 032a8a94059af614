use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::collection::{required, CollectionError, Resource};

use super::merge;

pub const DEFAULT_INVOICE_STATUS: &str = "Unpaid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub tenant_slug: String,
    pub client_name: String,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<String>,
    /// Free text; `Unpaid` unless the caller says otherwise.
    pub status: String,
    pub memorial_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InvoiceDraft {
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub memorial_id: Option<String>,
    pub notes: Option<String>,
}

pub type InvoicePatch = InvoiceDraft;

impl Resource for Invoice {
    type Draft = InvoiceDraft;
    type Patch = InvoicePatch;

    const KIND: &'static str = "invoice";
    const ID_PREFIX: &'static str = "inv";
    const FILE_NAME: &'static str = "invoices.json";

    fn create(id: String, tenant_slug: &str, d: InvoiceDraft, created_at: DateTime<Utc>) -> Result<Self, CollectionError> {
        let status = d
            .status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_INVOICE_STATUS.to_string());

        Ok(Self {
            id,
            tenant_slug: tenant_slug.to_string(),
            client_name: required(d.client_name, "clientName")?,
            description: d.description,
            amount: validate_amount(d.amount)?,
            due_date: d.due_date,
            status,
            memorial_id: d.memorial_id,
            notes: d.notes,
            created_at,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_slug(&self) -> &str {
        &self.tenant_slug
    }

    fn apply(&mut self, p: InvoicePatch) -> Result<(), CollectionError> {
        if p.client_name.is_some() {
            self.client_name = required(p.client_name, "clientName")?;
        }
        if p.status.is_some() {
            self.status = required(p.status, "status")?;
        }
        if p.amount.is_some() {
            self.amount = validate_amount(p.amount)?;
        }
        merge(&mut self.description, p.description);
        merge(&mut self.due_date, p.due_date);
        merge(&mut self.memorial_id, p.memorial_id);
        merge(&mut self.notes, p.notes);
        Ok(())
    }
}

fn validate_amount(amount: Option<Decimal>) -> Result<Option<Decimal>, CollectionError> {
    match amount {
        Some(a) if a.is_sign_negative() => Err(CollectionError::InvalidField {
            field: "amount",
            reason: "must not be negative".to_string(),
        }),
        other => Ok(other),
    }
}
