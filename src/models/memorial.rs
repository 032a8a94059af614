use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::collection::{required, CollectionError, Resource};

use super::merge;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memorial {
    pub id: String,
    pub tenant_slug: String,
    pub full_name: String,
    pub dob: Option<String>,
    pub dod: Option<String>,
    pub summary: Option<String>,
    pub obituary: Option<String>,
    pub viewing_date: Option<String>,
    pub viewing_time: Option<String>,
    pub viewing_location: Option<String>,
    pub service_date: Option<String>,
    pub service_time: Option<String>,
    pub service_location: Option<String>,
    pub burial_place: Option<String>,
    pub burial_date: Option<String>,
    pub burial_time: Option<String>,
    pub livestream_link: Option<String>,
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemorialDraft {
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub dod: Option<String>,
    pub summary: Option<String>,
    pub obituary: Option<String>,
    pub viewing_date: Option<String>,
    pub viewing_time: Option<String>,
    pub viewing_location: Option<String>,
    pub service_date: Option<String>,
    pub service_time: Option<String>,
    pub service_location: Option<String>,
    pub burial_place: Option<String>,
    pub burial_date: Option<String>,
    pub burial_time: Option<String>,
    pub livestream_link: Option<String>,
    /// Set by the upload handler, never by the client.
    #[serde(skip)]
    pub photo_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemorialPatch {
    pub full_name: Option<String>,
    pub dob: Option<String>,
    pub dod: Option<String>,
    pub summary: Option<String>,
    pub obituary: Option<String>,
    pub viewing_date: Option<String>,
    pub viewing_time: Option<String>,
    pub viewing_location: Option<String>,
    pub service_date: Option<String>,
    pub service_time: Option<String>,
    pub service_location: Option<String>,
    pub burial_place: Option<String>,
    pub burial_date: Option<String>,
    pub burial_time: Option<String>,
    pub livestream_link: Option<String>,
}

impl Resource for Memorial {
    type Draft = MemorialDraft;
    type Patch = MemorialPatch;

    const KIND: &'static str = "memorial";
    const ID_PREFIX: &'static str = "mem";
    const FILE_NAME: &'static str = "memorials.json";

    fn create(id: String, tenant_slug: &str, d: MemorialDraft, created_at: DateTime<Utc>) -> Result<Self, CollectionError> {
        Ok(Self {
            id,
            tenant_slug: tenant_slug.to_string(),
            full_name: required(d.full_name, "fullName")?,
            dob: d.dob,
            dod: d.dod,
            summary: d.summary,
            obituary: d.obituary,
            viewing_date: d.viewing_date,
            viewing_time: d.viewing_time,
            viewing_location: d.viewing_location,
            service_date: d.service_date,
            service_time: d.service_time,
            service_location: d.service_location,
            burial_place: d.burial_place,
            burial_date: d.burial_date,
            burial_time: d.burial_time,
            livestream_link: d.livestream_link,
            photo_path: d.photo_path,
            created_at,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_slug(&self) -> &str {
        &self.tenant_slug
    }

    fn apply(&mut self, p: MemorialPatch) -> Result<(), CollectionError> {
        if p.full_name.is_some() {
            self.full_name = required(p.full_name, "fullName")?;
        }
        merge(&mut self.dob, p.dob);
        merge(&mut self.dod, p.dod);
        merge(&mut self.summary, p.summary);
        merge(&mut self.obituary, p.obituary);
        merge(&mut self.viewing_date, p.viewing_date);
        merge(&mut self.viewing_time, p.viewing_time);
        merge(&mut self.viewing_location, p.viewing_location);
        merge(&mut self.service_date, p.service_date);
        merge(&mut self.service_time, p.service_time);
        merge(&mut self.service_location, p.service_location);
        merge(&mut self.burial_place, p.burial_place);
        merge(&mut self.burial_date, p.burial_date);
        merge(&mut self.burial_time, p.burial_time);
        merge(&mut self.livestream_link, p.livestream_link);
        Ok(())
    }
}
