pub mod appointment;
pub mod invoice;
pub mod memorial;
pub mod superadmin;
pub mod tenant;

pub use appointment::{Appointment, AppointmentDraft, AppointmentPatch};
pub use invoice::{Invoice, InvoiceDraft, InvoicePatch};
pub use memorial::{Memorial, MemorialDraft, MemorialPatch};
pub use superadmin::SuperadminAccount;
pub use tenant::{Tenant, TenantListing, TenantSettings, TenantStatus, TenantStatusReport, TenantUpdate, TenantView};

/// Overwrite `field` only when the patch carries a value.
fn merge(field: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *field = value;
    }
}
