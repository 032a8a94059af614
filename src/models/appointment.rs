use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::collection::{required, CollectionError, Resource};

use super::merge;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub tenant_slug: String,
    pub client_name: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub purpose: Option<String>,
    pub location: Option<String>,
    pub staff_member: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub memorial_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppointmentDraft {
    pub client_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub purpose: Option<String>,
    pub location: Option<String>,
    pub staff_member: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub memorial_id: Option<String>,
}

/// Same allow-list as the draft; absent fields are left untouched.
pub type AppointmentPatch = AppointmentDraft;

impl Resource for Appointment {
    type Draft = AppointmentDraft;
    type Patch = AppointmentPatch;

    const KIND: &'static str = "appointment";
    const ID_PREFIX: &'static str = "appt";
    const FILE_NAME: &'static str = "appointments.json";

    fn create(id: String, tenant_slug: &str, d: AppointmentDraft, created_at: DateTime<Utc>) -> Result<Self, CollectionError> {
        Ok(Self {
            id,
            tenant_slug: tenant_slug.to_string(),
            client_name: required(d.client_name, "clientName")?,
            date: d.date,
            time: d.time,
            purpose: d.purpose,
            location: d.location,
            staff_member: d.staff_member,
            phone: d.phone,
            notes: d.notes,
            memorial_id: d.memorial_id,
            created_at,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_slug(&self) -> &str {
        &self.tenant_slug
    }

    fn apply(&mut self, p: AppointmentPatch) -> Result<(), CollectionError> {
        if p.client_name.is_some() {
            self.client_name = required(p.client_name, "clientName")?;
        }
        merge(&mut self.date, p.date);
        merge(&mut self.time, p.time);
        merge(&mut self.purpose, p.purpose);
        merge(&mut self.location, p.location);
        merge(&mut self.staff_member, p.staff_member);
        merge(&mut self.phone, p.phone);
        merge(&mut self.notes, p.notes);
        merge(&mut self.memorial_id, p.memorial_id);
        Ok(())
    }
}
