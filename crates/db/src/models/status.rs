//! Form status mapping to the SMALLINT `status_id` column.

use leadform_core::webform::FormStatus;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

pub const ACTIVE: StatusId = 1;
pub const INACTIVE: StatusId = 2;

/// Return the database status ID for a form status.
pub fn status_id(status: FormStatus) -> StatusId {
    match status {
        FormStatus::Active => ACTIVE,
        FormStatus::Inactive => INACTIVE,
    }
}

/// Map a stored status ID back to a form status.
pub fn form_status(id: StatusId) -> Option<FormStatus> {
    match id {
        ACTIVE => Some(FormStatus::Active),
        INACTIVE => Some(FormStatus::Inactive),
        _ => None,
    }
}
