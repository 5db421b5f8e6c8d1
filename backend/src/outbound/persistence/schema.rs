//! Diesel table definitions. Must match `backend/migrations` exactly.

diesel::table! {
    users (id) {
        id -> Int8,
        email -> Text,
        full_name -> Text,
        role -> Text,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    programs (id) {
        id -> Int8,
        name -> Text,
        description -> Text,
        start_date -> Date,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    enrollments (user_id, program_id) {
        user_id -> Int8,
        program_id -> Int8,
        enrolled_at -> Timestamptz,
    }
}

diesel::joinable!(enrollments -> users (user_id));
diesel::joinable!(enrollments -> programs (program_id));

diesel::allow_tables_to_appear_in_same_query!(users, programs, enrollments);
