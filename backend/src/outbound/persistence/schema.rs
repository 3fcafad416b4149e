//! Diesel table definitions for the booking schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hospital directory. `name` is unique.
    hospitals (id) {
        id -> Uuid,
        name -> Varchar,
        address -> Text,
        district -> Text,
        province -> Text,
        postalcode -> Varchar,
        tel -> Nullable<Text>,
        region -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bookings. `hospital_id` is a loose reference without a foreign key.
    appointments (id) {
        id -> Uuid,
        user_id -> Uuid,
        hospital_id -> Uuid,
        appt_date -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    vac_centers (id) {
        id -> Int4,
        name -> Text,
        tel -> Nullable<Text>,
    }
}

diesel::joinable!(appointments -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(appointments, hospitals, users, vac_centers);
