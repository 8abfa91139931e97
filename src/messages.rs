//! Centralized catalog of user-visible response messages.
//!
//! Registry operations never surface raw database or validation internals;
//! they pick a message from here so the wire contract stays stable.

pub mod registration {
    pub const USERNAME_EXISTS: &str = "Username is already taken.";
    pub const EMAIL_EXISTS: &str = "Email is already registered.";
    pub const SIGNUP_SUCCESS: &str = "You are successfully signed up.";
}

pub mod login {
    pub const USER_NOT_FOUND: &str = "User is not found. Invalid login credentials.";
    pub const LOGIN_SUCCESS: &str = "You are successfully logged in.";
    pub const WRONG_PASSWORD: &str = "Incorrect password.";
}

pub mod user {
    pub const NOT_FOUND: &str = "User not found";
    pub const WRONG_CURRENT_PASSWORD: &str = "Incorrect current password";
    pub const PASSWORD_UPDATED: &str = "Password updated successfully";
    pub const STATUS_REQUIRED: &str = "Status field is required";
    pub const INVALID_STATUS: &str = "Invalid status value";
    pub const STATUS_UPDATED: &str = "User status updated successfully";
}

pub mod business {
    pub const NOT_FOUND: &str = "Business not found";
    pub const DELETED: &str = "This business was deleted";
    pub const CREATED: &str = "Business added successfully";
    pub const UPDATED: &str = "Business updated successfully";
    pub const STATUS_REQUIRED: &str = "Status is required";
    pub const STATUS_UPDATED: &str = "Business status updated";
    pub const INTERACTION_UPDATED: &str = "Business last interaction date updated";
    pub const NAME_QUERY_REQUIRED: &str = "Business name query is required";
    pub const NONE_MATCHING: &str = "No matching businesses found";
    pub const MATCHING_RETRIEVED: &str = "Matching businesses retrieved successfully";
    pub const NONE_WITH_STATUS: &str = "No businesses found with the specified status";
    pub const RETRIEVED: &str = "Businesses retrieved successfully";
    pub const INVALID_STATUS: &str = "Invalid business status";
}

pub mod contact {
    pub const NOT_FOUND: &str = "Contact not found";
    pub const DELETED: &str = "This contact was deleted";
    pub const CREATED: &str = "Contact added successfully";
    pub const UPDATED: &str = "Contact updated successfully";
    pub const REMOVED: &str = "Contact deleted permanently";
    pub const EMAIL_REQUIRED: &str = "Email is required";
    pub const EMAIL_EXISTS: &str = "A contact with this email already exists";
    pub const STATUS_REQUIRED: &str = "Status is required";
    pub const STATUS_UPDATED: &str = "Contact status updated successfully";
    pub const INVALID_STATUS: &str = "Invalid contact status";
    pub const NONE_WITH_STATUS: &str = "No contacts found with the specified status";
    pub const INVALID_BUSINESS_ID: &str = "Invalid Business ID for company field";
    pub const INVALID_USER_ID: &str = "Invalid User ID for assignedTo field";
    pub const ASSIGNEE_NOT_FOUND: &str = "Assigned user not found";
    pub const RETRIEVED: &str = "Contacts retrieved successfully";
    pub const NOTES_REQUIRED: &str = "Notes and outcome are required";
    pub const NOTE_ADDED: &str = "Note added successfully";
    pub const HISTORY_ID_NOT_NUMERIC: &str = "History id must be numeric";
    pub const HISTORY_ENTRY_NOT_FOUND: &str = "History entry not found";
    pub const HISTORY_ENTRY_REMOVED: &str = "History entry deleted successfully";
}

pub mod lifecycle {
    pub const INVALID_TYPE: &str = "Invalid type";
    pub const INVALID_ID: &str = "Invalid ID format";
    pub const ALREADY_DELETED: &str = "Record is already deleted";
    pub const NOT_DELETED: &str = "Record is not deleted";
    pub const PURGE_REQUIRES_SOFT_DELETE: &str =
        "Record must be soft-deleted before it can be permanently removed";
    pub const SOFT_DELETED: &str = "Data deleted temporarily";
    pub const RESTORED: &str = "Data restored successfully";
    pub const PURGED: &str = "Data deleted successfully";
    pub const PURGED_ALL: &str = "All temporarily deleted records permanently removed";
}

pub mod schedule {
    pub const CONTACTS_REQUIRED: &str = "At least one contact id is required";
    pub const DATE_REQUIRED: &str = "A scheduled date is required";
    pub const NOT_PERMITTED: &str = "Some contacts were not found or are not permitted";
    pub const CREATED: &str = "Calls scheduled successfully";
    pub const RETRIEVED: &str = "Scheduled calls retrieved successfully";
    pub const NOT_FOUND: &str = "Scheduled call not found";
    pub const NOT_OWNER: &str = "You do not own this scheduled call";
    pub const REMOVED: &str = "Scheduled call deleted";
    pub const INVALID_STATUS_FILTER: &str = "Invalid status filter";
    pub const INVALID_TIMEFRAME: &str = "Invalid timeframe filter";
}

pub mod auth {
    pub const NO_TOKEN: &str = "No token provided";
    pub const INVALID_TOKEN: &str = "Invalid token";
    pub const ACCESS_DENIED: &str = "Access denied: insufficient role";
}
